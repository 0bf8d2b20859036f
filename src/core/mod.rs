//! Render-loop core: frame scheduling, listener ordering and the wgpu surface
//! boundary the scheduler renders through.

pub mod clock;
pub mod error;
pub mod frame_scheduler;
pub mod gpu_context;
pub mod input_adapter;
pub mod listener;
pub mod redraw_signal;
pub mod surface;
pub mod surface_target;

pub use clock::Clock;
pub use error::SchedulerError;
pub use frame_scheduler::{FrameScheduler, FrameTarget, SchedulerStatus};
pub use gpu_context::GpuContext;
pub use input_adapter::OrbitInput;
pub use listener::{Draw, Drawable, FrameContext, ListenerHandle, ListenerRegistry, PassDescriptor, RenderListener};
pub use redraw_signal::RedrawSignal;
pub use surface::SurfaceSize;
pub use surface_target::{DepthBuffer, SurfacePass, SurfaceTarget, DEPTH_FORMAT};
