//! Milestone selection: pointer/touch triggers → driver commands.

use serde::{Deserialize, Serialize};

use crate::motion::MotionContext;

/// How the visitor interacts. Desktop uses the pointer, mobile uses touch;
/// events from the other mode are ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Pointer,
    Touch,
}

impl InputMode {
    #[inline]
    pub fn for_layout(is_mobile_layout: bool) -> Self {
        if is_mobile_layout {
            InputMode::Touch
        } else {
            InputMode::Pointer
        }
    }
}

/// Driver command requested by an interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    GoTo(usize),
    Hide,
}

/// Result of one interaction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    pub command: Option<Command>,
    /// `Some(new)` when the active stop changed.
    pub active_changed: Option<Option<usize>>,
}

/// Tracks which stop is highlighted.
#[derive(Clone, Debug, Default)]
pub struct SelectionSurface {
    active: Option<usize>,
}

impl SelectionSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    fn accepts(mode: InputMode, ctx: &MotionContext) -> bool {
        mode == InputMode::for_layout(ctx.is_mobile_layout())
    }

    fn set_active(&mut self, next: Option<usize>) -> Option<Option<usize>> {
        if self.active == next {
            None
        } else {
            self.active = next;
            Some(next)
        }
    }

    /// Hover (desktop) or touch-start (mobile) on stop `stop`.
    pub fn enter(
        &mut self,
        stop: usize,
        stop_count: usize,
        mode: InputMode,
        ctx: &MotionContext,
    ) -> Reaction {
        if ctx.prefers_reduced_motion || !Self::accepts(mode, ctx) || stop >= stop_count {
            return Reaction::default();
        }
        Reaction {
            command: Some(Command::GoTo(stop)),
            active_changed: self.set_active(Some(stop)),
        }
    }

    /// Mouse-leave (desktop) or touch-end (mobile) on a stop. Clears the
    /// highlight only; the marker stays where it is.
    pub fn leave(&mut self, _stop: usize, mode: InputMode, ctx: &MotionContext) -> Reaction {
        if ctx.prefers_reduced_motion || !Self::accepts(mode, ctx) {
            return Reaction::default();
        }
        Reaction {
            command: None,
            active_changed: self.set_active(None),
        }
    }

    /// Pointer left the whole timeline. Desktop only: touch has no equivalent
    /// gesture, so on mobile the marker is never hidden this way.
    pub fn container_leave(&mut self, ctx: &MotionContext) -> Reaction {
        if ctx.is_mobile_layout() {
            return Reaction::default();
        }
        Reaction {
            command: Some(Command::Hide),
            active_changed: self.set_active(None),
        }
    }

    /// Forget the highlight without reporting it (used on section reset).
    pub fn clear(&mut self) -> Option<Option<usize>> {
        self.set_active(None)
    }
}
