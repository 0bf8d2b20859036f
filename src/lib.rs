pub mod camera;
pub mod cli;
pub mod core;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod scenes;
pub mod types;

pub use crate::camera::{OrbitCameraController, OrbitConfig};
pub use crate::core::{FrameScheduler, FrameTarget, RedrawSignal, RenderListener, SchedulerError, SchedulerStatus};
