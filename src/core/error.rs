use thiserror::Error;

/// Frame-level failures. Any of these aborts the frame and flips the scheduler to `Fail`.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("redraw signal closed before the next frame")]
    SignalClosed,

    #[error("surface has no drawable area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    #[error("failed to acquire surface texture: {0}")]
    Surface(String),

    #[error("failed to create depth buffer: {0}")]
    DepthBuffer(String),

    #[error("failed to submit frame: {0}")]
    Submit(String),
}
