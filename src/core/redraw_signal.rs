use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;

use super::error::SchedulerError;

/// Display-refresh notification.
///
/// `wait()` parks the caller until the host calls `fire()`, which the event loop does
/// on every `RedrawRequested`. The first waiter of a tick asks the host for a redraw
/// through the request hook.
#[derive(Clone)]
pub struct RedrawSignal {
    inner: Rc<SignalInner>,
}

struct SignalInner {
    waiters: RefCell<Vec<oneshot::Sender<()>>>,
    request: Box<dyn Fn()>,
}

impl RedrawSignal {
    pub fn new<F>(request: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            inner: Rc::new(SignalInner {
                waiters: RefCell::new(Vec::new()),
                request: Box::new(request),
            }),
        }
    }

    /// Signal with no host hook; ticks are driven purely by `fire()`
    pub fn manual() -> Self {
        Self::new(|| {})
    }

    /// Resolves on the next `fire()`, or fails if every `RedrawSignal` clone is gone
    pub async fn wait(&self) -> Result<(), SchedulerError> {
        let (sender, receiver) = oneshot::channel();
        let first = {
            let mut waiters = self.inner.waiters.borrow_mut();
            // Waiters whose future was dropped no longer count toward this tick
            waiters.retain(|waiter| !waiter.is_canceled());
            waiters.push(sender);
            waiters.len() == 1
        };
        if first {
            (self.inner.request)();
        }

        receiver.await.map_err(|_| SchedulerError::SignalClosed)
    }

    /// Wake everyone currently waiting. Returns how many waiters were woken.
    pub fn fire(&self) -> usize {
        let waiters: Vec<_> = self.inner.waiters.borrow_mut().drain(..).collect();
        waiters
            .into_iter()
            .filter_map(|sender| sender.send(()).ok())
            .count()
    }

    /// Drop all pending waiters; their `wait()` fails with `SignalClosed`
    pub fn close(&self) {
        self.inner.waiters.borrow_mut().clear();
    }

    pub fn pending(&self) -> usize {
        self.inner.waiters.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;

    #[test]
    fn test_wait_resolves_on_fire() {
        let mut pool = LocalPool::new();
        let signal = RedrawSignal::manual();
        let done = Rc::new(Cell::new(false));

        let waiter = signal.clone();
        let flag = Rc::clone(&done);
        pool.spawner()
            .spawn_local(async move {
                waiter.wait().await.unwrap();
                flag.set(true);
            })
            .unwrap();

        pool.run_until_stalled();
        assert!(!done.get());
        assert_eq!(signal.pending(), 1);

        assert_eq!(signal.fire(), 1);
        pool.run_until_stalled();
        assert!(done.get());
        assert_eq!(signal.pending(), 0);
    }

    #[test]
    fn test_request_hook_runs_once_per_tick() {
        let requests = Rc::new(Cell::new(0));
        let counter = Rc::clone(&requests);
        let signal = RedrawSignal::new(move || counter.set(counter.get() + 1));

        let mut pool = LocalPool::new();
        for _ in 0..3 {
            let waiter = signal.clone();
            pool.spawner()
                .spawn_local(async move {
                    let _ = waiter.wait().await;
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert_eq!(requests.get(), 1);

        signal.fire();
        pool.run_until_stalled();

        let waiter = signal.clone();
        pool.spawner()
            .spawn_local(async move {
                let _ = waiter.wait().await;
            })
            .unwrap();
        pool.run_until_stalled();
        assert_eq!(requests.get(), 2);
    }

    #[test]
    fn test_close_fails_waiters() {
        let mut pool = LocalPool::new();
        let signal = RedrawSignal::manual();
        let outcome = Rc::new(RefCell::new(None));

        let waiter = signal.clone();
        let slot = Rc::clone(&outcome);
        pool.spawner()
            .spawn_local(async move {
                *slot.borrow_mut() = Some(waiter.wait().await);
            })
            .unwrap();

        pool.run_until_stalled();
        signal.close();
        pool.run_until_stalled();

        assert!(matches!(
            outcome.borrow().as_ref(),
            Some(Err(SchedulerError::SignalClosed))
        ));
    }

    #[test]
    fn test_abandoned_wait_does_not_swallow_redraw_request() {
        use futures::FutureExt;

        let requests = Rc::new(Cell::new(0));
        let counter = Rc::clone(&requests);
        let signal = RedrawSignal::new(move || counter.set(counter.get() + 1));

        // Polled once then dropped before the tick
        assert!(signal.wait().now_or_never().is_none());
        assert_eq!(requests.get(), 1);

        let mut pool = LocalPool::new();
        let waiter = signal.clone();
        pool.spawner()
            .spawn_local(async move {
                let _ = waiter.wait().await;
            })
            .unwrap();
        pool.run_until_stalled();

        assert_eq!(requests.get(), 2);
        assert_eq!(signal.pending(), 1);
        assert_eq!(signal.fire(), 1);
    }

    #[test]
    fn test_fire_skips_dropped_waiters() {
        use futures::FutureExt;

        let signal = RedrawSignal::manual();
        assert!(signal.wait().now_or_never().is_none());
        assert_eq!(signal.pending(), 1);
        assert_eq!(signal.fire(), 0);
        assert_eq!(signal.pending(), 0);
    }

    #[test]
    fn test_fire_without_waiters() {
        let signal = RedrawSignal::manual();
        assert_eq!(signal.fire(), 0);
    }
}
