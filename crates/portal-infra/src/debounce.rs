//! Trailing-edge debouncer for input-driven actions such as search boxes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs the wrapped action once the calls stop for `delay`, with the
/// argument of the last call. Each call cancels the pending one.
///
/// Must be used inside a tokio runtime.
pub struct Debouncer<A> {
    action: Arc<dyn Fn(A) + Send + Sync>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn call(&self, arg: A) {
        let action = Arc::clone(&self.action);
        let delay = self.delay;
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(arg);
        }));
    }

    /// Drop the pending invocation, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take() {
            previous.abort();
        }
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().ok().and_then(Option::take) {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_rapid_calls_fire_once_with_last_argument() {
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(None));
        let debouncer = {
            let calls = calls.clone();
            let last = last.clone();
            Debouncer::new(Duration::from_millis(50), move |arg: u32| {
                calls.fetch_add(1, Ordering::SeqCst);
                *last.lock().unwrap() = Some(arg);
            })
        };

        for i in 1..=5 {
            debouncer.call(i);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let debouncer = {
            let calls = calls.clone();
            Debouncer::new(Duration::from_millis(20), move |_: ()| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        debouncer.call(());
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
