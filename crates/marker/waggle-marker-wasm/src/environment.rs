//! Viewport width and reduced-motion observation.

use gloo_events::EventListener;
use web_sys::{MediaQueryList, Window};

use waggle_marker_core::{Config, EnvironmentSignal, MotionContext};

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

fn viewport_width(window: &Window) -> Option<f32> {
    window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .map(|w| w as f32)
}

fn reduced_motion_query(window: &Window) -> Option<MediaQueryList> {
    window.match_media(REDUCED_MOTION_QUERY).ok().flatten()
}

/// Read both flags synchronously so the first render is already correct.
pub fn read_environment(window: Option<&Window>, cfg: &Config) -> MotionContext {
    let Some(window) = window else {
        return MotionContext::default();
    };
    let reduced = reduced_motion_query(window)
        .map(|q| q.matches())
        .unwrap_or(false);
    match viewport_width(window) {
        Some(w) => MotionContext::from_environment(w, reduced, cfg),
        None => MotionContext {
            prefers_reduced_motion: reduced,
            ..MotionContext::default()
        },
    }
}

/// Live `resize` and media-query `change` subscriptions, removed on drop.
pub struct EnvListeners {
    _resize: EventListener,
    _motion: Option<EventListener>,
}

impl EnvListeners {
    pub fn install<F>(window: &Window, on_signal: F) -> Self
    where
        F: Fn(EnvironmentSignal) + Clone + 'static,
    {
        let resize = {
            let w = window.clone();
            let on_signal = on_signal.clone();
            EventListener::new(window, "resize", move |_| {
                if let Some(width) = viewport_width(&w) {
                    on_signal(EnvironmentSignal::ViewportWidth(width));
                }
            })
        };

        let motion = match reduced_motion_query(window) {
            Some(query) => {
                let q = query.clone();
                Some(EventListener::new(&query, "change", move |_| {
                    on_signal(EnvironmentSignal::ReducedMotion(q.matches()));
                }))
            }
            None => {
                log::debug!("matchMedia unavailable; reduced-motion changes will not be observed");
                None
            }
        };

        Self {
            _resize: resize,
            _motion: motion,
        }
    }
}
