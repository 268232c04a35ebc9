use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A one-shot timer that posts an event after a delay.
///
/// The timer is tied to its owner: dropping it aborts the pending task, so an
/// event is never delivered for a page that no longer exists.
pub struct ScopedTimer {
    handle: JoinHandle<()>,
}

impl ScopedTimer {
    pub fn spawn<T: Send + 'static>(delay: Duration, tx: mpsc::UnboundedSender<T>, event: T) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        });
        Self { handle }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
