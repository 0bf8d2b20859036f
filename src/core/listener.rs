use std::cmp::Ordering;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::surface::SurfaceSize;
use crate::math::Rgba;

/// Static description of the render pass every listener draws into
#[derive(Debug, Clone, PartialEq)]
pub struct PassDescriptor {
    pub label: &'static str,
    pub surface_size: SurfaceSize,
    pub clear_color: Rgba,
    pub depth_clear: f32,
}

/// Per-frame context lent to each listener.
///
/// Lives for exactly one render pass. Listeners get it by `&mut` and must not keep
/// anything borrowed from it past their own invocation.
pub struct FrameContext<P> {
    pub descriptor: PassDescriptor,
    pub pass: P,
}

impl<P> FrameContext<P> {
    pub fn new(descriptor: PassDescriptor, pass: P) -> Self {
        Self { descriptor, pass }
    }

    /// Aspect ratio of the surface this frame renders to
    pub fn aspect_ratio(&self) -> f32 {
        self.descriptor.surface_size.aspect_ratio()
    }

    pub fn into_pass(self) -> P {
        self.pass
    }
}

/// Result of a single listener invocation
pub enum Draw<'a> {
    /// Finished synchronously
    Ready(anyhow::Result<()>),
    /// Must be awaited before the next listener runs
    Deferred(LocalBoxFuture<'a, anyhow::Result<()>>),
}

impl<'a> Draw<'a> {
    pub fn done() -> Self {
        Draw::Ready(Ok(()))
    }

    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<()>> + 'a,
    {
        Draw::Deferred(Box::pin(future))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Draw::Deferred(_))
    }

    /// Drive the draw to completion
    pub async fn settle(self) -> anyhow::Result<()> {
        match self {
            Draw::Ready(result) => result,
            Draw::Deferred(future) => future.await,
        }
    }
}

impl From<anyhow::Result<()>> for Draw<'_> {
    fn from(result: anyhow::Result<()>) -> Self {
        Draw::Ready(result)
    }
}

/// Anything that can record draw commands into a frame
pub trait Drawable<P> {
    fn draw<'a>(&'a self, frame: &'a mut FrameContext<P>) -> Draw<'a>;
}

impl<P, F> Drawable<P> for F
where
    F: Fn(&mut FrameContext<P>) -> anyhow::Result<()>,
{
    fn draw<'a>(&'a self, frame: &'a mut FrameContext<P>) -> Draw<'a> {
        Draw::Ready(self(frame))
    }
}

/// A draw callback tagged with the priority that orders it within a frame.
///
/// Lower priorities draw first.
pub struct RenderListener<P> {
    priority: i32,
    callback: Rc<dyn Drawable<P>>,
}

impl<P> RenderListener<P> {
    pub fn new(priority: i32, callback: Rc<dyn Drawable<P>>) -> Self {
        Self { priority, callback }
    }

    /// Wrap a synchronous closure
    pub fn from_fn<F>(priority: i32, f: F) -> Self
    where
        F: Fn(&mut FrameContext<P>) -> anyhow::Result<()> + 'static,
        P: 'static,
    {
        Self::new(priority, Rc::new(f))
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn draw<'a>(&'a self, frame: &'a mut FrameContext<P>) -> Draw<'a> {
        self.callback.draw(frame)
    }
}

impl<P> Clone for RenderListener<P> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            callback: Rc::clone(&self.callback),
        }
    }
}

/// Opaque handle for removing a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

/// Ordering key: priority ascending, then registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OrderKey {
    priority: i32,
    sequence: u64,
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.priority.cmp(&other.priority) {
            Ordering::Equal => self.sequence.cmp(&other.sequence),
            o => o,
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Entry<P> {
    handle: ListenerHandle,
    key: OrderKey,
    listener: RenderListener<P>,
}

/// Collection of draw callbacks registered by independent scene objects
pub struct ListenerRegistry<P> {
    entries: Vec<Entry<P>>,
    next_sequence: u64,
}

impl<P> ListenerRegistry<P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_sequence: 0,
        }
    }

    pub fn add(&mut self, listener: RenderListener<P>) -> ListenerHandle {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let handle = ListenerHandle(sequence);
        self.entries.push(Entry {
            handle,
            key: OrderKey {
                priority: listener.priority(),
                sequence,
            },
            listener,
        });
        handle
    }

    /// Returns false if the handle was already removed
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listeners in draw order, detached from the registry so it can change mid-frame
    pub fn snapshot(&self) -> Vec<RenderListener<P>> {
        let mut ordered: Vec<&Entry<P>> = self.entries.iter().collect();
        ordered.sort_by_key(|entry| entry.key);
        ordered.into_iter().map(|entry| entry.listener.clone()).collect()
    }
}

impl<P> Default for ListenerRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
