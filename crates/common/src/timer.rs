//! Cancellable trailing-edge debounce timer.
//!
//! `schedule` cancels whatever is pending and arms a new one-shot callback
//! that runs after `delay` of quiet. Only the most recently scheduled
//! callback can ever run.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::trace;

#[derive(Clone)]
pub struct DebounceTimer {
    delay: Duration,
    inner: Arc<Mutex<Slot>>,
}

#[derive(Default)]
struct Slot {
    generation: u64,
    pending: Option<CancellationToken>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: Arc::new(Mutex::new(Slot::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer, replacing any pending callback.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let generation = {
            let mut slot = self.inner.lock();
            if let Some(previous) = slot.pending.replace(token.clone()) {
                previous.cancel();
            }
            slot.generation += 1;
            slot.generation
        };

        let slot = Arc::downgrade(&self.inner);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    trace!(generation, "debounce timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let Some(slot) = slot.upgrade() else { return };
                    // A cancel may have raced the sleep; commit under the lock.
                    let fire = {
                        let mut slot = slot.lock();
                        if slot.generation == generation && !token.is_cancelled() {
                            slot.pending = None;
                            true
                        } else {
                            false
                        }
                    };
                    if fire {
                        trace!(generation, "debounce timer fired");
                        callback();
                    }
                }
            }
        });
    }

    /// Cancel the pending callback, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.inner.lock().pending.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock().pending.is_some()
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        // Last handle gone: nothing may fire afterwards.
        if Arc::strong_count(&self.inner) == 1 {
            self.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (count, move || {
            let c = c.clone();
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_period() {
        let timer = DebounceTimer::new(Duration::from_millis(300));
        let (count, make) = counter();

        timer.schedule(make());
        assert!(timer.is_pending());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_keeps_only_the_trailing_call() {
        let timer = DebounceTimer::new(Duration::from_millis(300));
        let hits = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let hits = hits.clone();
            timer.schedule(move || hits.lock().push(i));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(*hits.lock(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let timer = DebounceTimer::new(Duration::from_millis(100));
        let (count, make) = counter();

        timer.schedule(make());
        assert!(timer.cancel());
        assert!(!timer.cancel());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_cancels_pending_callback() {
        let (count, make) = counter();
        {
            let timer = DebounceTimer::new(Duration::from_millis(100));
            timer.schedule(make());
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
