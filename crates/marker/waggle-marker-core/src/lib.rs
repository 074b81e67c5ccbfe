//! Waggle marker core (renderer-agnostic)
//!
//! Moves a marker along a planar curve to the position of a selected stop,
//! oriented to the curve tangent. The crate owns geometry, the stop → progress
//! mapping, the frame-driven interpolation and the selection rules; hosts
//! supply frames and environment signals and apply the emitted [`Outputs`].

pub mod config;
pub mod decor;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod outputs;
pub mod progress;
pub mod schedule;
pub mod stops;
pub mod surface;
pub mod timeline;

// Re-exports for consumers (adapters)
pub use config::{Config, ProgressAdjustments};
pub use decor::{card_pose, stroke_reveal, CardPose, StrokeReveal};
pub use driver::{Driver, DriverState, Interpolation};
pub use error::{PathError, StopListError, WaggleError};
pub use geometry::{
    heading_deg, Curve, CurveDef, CurveGeometry, CurvePair, CurveVariant, MarkerPose, Vec2,
};
pub use motion::{EnvironmentSignal, LayoutClass, MotionContext};
pub use outputs::{MarkerChange, MarkerEvent, Outputs};
pub use progress::{base_progress, progress_for};
pub use schedule::{FrameHandle, FrameScheduler, ManualScheduler, NoFrames};
pub use stops::{Stop, StopList, StopPayload};
pub use surface::{Command, InputMode, Reaction, SelectionSurface};
pub use timeline::Timeline;
