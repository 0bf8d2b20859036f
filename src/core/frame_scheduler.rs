use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use super::error::SchedulerError;
use super::listener::{FrameContext, ListenerHandle, ListenerRegistry, PassDescriptor, RenderListener};
use super::redraw_signal::RedrawSignal;
use super::surface::SurfaceSize;
use crate::math::Rgba;

const PASS_LABEL: &str = "frame scheduler pass";

/// Device/surface boundary the scheduler renders through
pub trait FrameTarget {
    /// Depth attachment shared by every listener in a frame
    type DepthBuffer;
    /// Open render pass handed to listeners
    type Pass;

    /// Current drawable size of the surface
    fn surface_size(&self) -> SurfaceSize;

    fn create_depth_buffer(&mut self, size: SurfaceSize) -> Result<Self::DepthBuffer, SchedulerError>;

    /// Release GPU memory held by a depth buffer that is being replaced
    fn release_depth_buffer(&mut self, buffer: Self::DepthBuffer);

    /// Acquire the current target view and begin a pass that clears color and depth
    fn begin_pass(
        &mut self,
        depth: &Self::DepthBuffer,
        descriptor: &PassDescriptor,
    ) -> Result<Self::Pass, SchedulerError>;

    /// End the pass and submit its command buffer
    fn submit(&mut self, pass: Self::Pass) -> Result<(), SchedulerError>;
}

/// Lifecycle of the most recent `trigger()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    Init,
    Pending,
    Done,
    Fail,
}

impl fmt::Display for SchedulerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchedulerStatus::Init => "init",
            SchedulerStatus::Pending => "pending",
            SchedulerStatus::Done => "done",
            SchedulerStatus::Fail => "fail",
        };
        f.write_str(name)
    }
}

struct SizedDepth<D> {
    size: SurfaceSize,
    buffer: D,
}

/// Drives one frame per animation tick through a shared render pass.
///
/// Single-threaded and single-flight: a `trigger()` while another frame is pending
/// is dropped, not queued. Share it behind an `Rc`.
///
/// A listener that returns `Err` or panics is logged and skipped; the rest of the
/// frame still draws and submits.
pub struct FrameScheduler<T: FrameTarget> {
    target: RefCell<T>,
    signal: RedrawSignal,
    status: Cell<SchedulerStatus>,
    listeners: RefCell<ListenerRegistry<T::Pass>>,
    depth: RefCell<Option<SizedDepth<T::DepthBuffer>>>,
    clear_color: Cell<Rgba>,
    frames_submitted: Cell<u64>,
}

impl<T: FrameTarget> FrameScheduler<T> {
    pub fn new(target: T, signal: RedrawSignal) -> Self {
        Self {
            target: RefCell::new(target),
            signal,
            status: Cell::new(SchedulerStatus::Init),
            listeners: RefCell::new(ListenerRegistry::new()),
            depth: RefCell::new(None),
            clear_color: Cell::new(Rgba::WHITE),
            frames_submitted: Cell::new(0),
        }
    }

    pub fn with_clear_color(self, color: Rgba) -> Self {
        self.clear_color.set(color);
        self
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status.get()
    }

    pub fn signal(&self) -> &RedrawSignal {
        &self.signal
    }

    pub fn set_clear_color(&self, color: Rgba) {
        self.clear_color.set(color);
    }

    /// Number of command buffers submitted so far
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted.get()
    }

    pub fn add_listener(&self, listener: RenderListener<T::Pass>) -> ListenerHandle {
        self.listeners.borrow_mut().add(listener)
    }

    pub fn remove_listener(&self, handle: ListenerHandle) -> bool {
        self.listeners.borrow_mut().remove(handle)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Mutable access to the target, e.g. to reconfigure after a resize.
    ///
    /// Panics if called from inside `FrameTarget` code.
    pub fn with_target<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.target.borrow_mut())
    }

    /// Render one frame on the next display refresh.
    ///
    /// Returns `Pending` without doing anything if a frame is already in flight.
    pub async fn trigger(&self) -> Result<SchedulerStatus, SchedulerError> {
        if self.status.get() == SchedulerStatus::Pending {
            log::warn!("render already in progress");
            return Ok(SchedulerStatus::Pending);
        }

        self.status.set(SchedulerStatus::Pending);

        match self.render_frame().await {
            Ok(()) => {
                self.status.set(SchedulerStatus::Done);
                Ok(SchedulerStatus::Done)
            }
            Err(err) => {
                self.status.set(SchedulerStatus::Fail);
                log::error!("render frame failed: {err}");
                Err(err)
            }
        }
    }

    async fn render_frame(&self) -> Result<(), SchedulerError> {
        self.signal.wait().await?;

        let surface_size = self.ensure_depth_buffer()?;
        let descriptor = PassDescriptor {
            label: PASS_LABEL,
            surface_size,
            clear_color: self.clear_color.get(),
            depth_clear: 1.0,
        };

        let pass = {
            let depth = self.depth.borrow();
            let depth = depth
                .as_ref()
                .ok_or_else(|| SchedulerError::DepthBuffer("depth buffer missing".into()))?;
            self.target.borrow_mut().begin_pass(&depth.buffer, &descriptor)?
        };

        let mut frame = FrameContext::new(descriptor, pass);
        let listeners = self.listeners.borrow().snapshot();

        for (index, listener) in listeners.iter().enumerate() {
            let outcome = AssertUnwindSafe(async { listener.draw(&mut frame).settle().await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => log::error!(
                    "render listener {index} (priority {}) failed: {err:#}",
                    listener.priority()
                ),
                Err(panic) => log::error!(
                    "render listener {index} (priority {}) panicked: {}",
                    listener.priority(),
                    panic_message(panic.as_ref())
                ),
            }
        }

        self.target.borrow_mut().submit(frame.into_pass())?;
        self.frames_submitted.set(self.frames_submitted.get() + 1);
        log::trace!("frame {} submitted", self.frames_submitted.get());

        Ok(())
    }

    /// Reuse the depth buffer while the surface size is unchanged, otherwise replace it
    fn ensure_depth_buffer(&self) -> Result<SurfaceSize, SchedulerError> {
        let mut target = self.target.borrow_mut();
        let size = target.surface_size();
        if size.is_empty() {
            return Err(SchedulerError::EmptySurface {
                width: size.width,
                height: size.height,
            });
        }

        let mut depth = self.depth.borrow_mut();
        if depth.as_ref().is_some_and(|current| current.size == size) {
            return Ok(size);
        }

        if let Some(old) = depth.take() {
            log::debug!(
                "releasing {}x{} depth buffer",
                old.size.width,
                old.size.height
            );
            target.release_depth_buffer(old.buffer);
        }

        let buffer = target.create_depth_buffer(size)?;
        *depth = Some(SizedDepth { size, buffer });
        log::debug!("created {}x{} depth buffer", size.width, size.height);

        Ok(size)
    }

    /// Release the depth buffer and drop every listener
    pub fn destroy(&self) {
        if let Some(old) = self.depth.borrow_mut().take() {
            self.target.borrow_mut().release_depth_buffer(old.buffer);
        }
        self.listeners.borrow_mut().clear();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_payloads() {
        let text: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(text.as_ref()), "boom");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(owned.as_ref()), "owned boom");

        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SchedulerStatus::Init.to_string(), "init");
        assert_eq!(SchedulerStatus::Pending.to_string(), "pending");
        assert_eq!(SchedulerStatus::Done.to_string(), "done");
        assert_eq!(SchedulerStatus::Fail.to_string(), "fail");
    }
}
