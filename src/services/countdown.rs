use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// Cancellable countdown backing the "resend code" button.
///
/// Publishes the remaining seconds once per second on a watch channel and
/// stops at zero. Dropping or cancelling aborts the task so no stale ticks
/// reach a screen the user has already left.
pub struct ResendCountdown {
    remaining: watch::Receiver<u64>,
    handle: JoinHandle<()>,
}

impl ResendCountdown {
    pub fn start(seconds: u64) -> Self {
        let (tx, rx) = watch::channel(seconds);

        let handle = tokio::spawn(async move {
            let mut left = seconds;
            while left > 0 {
                sleep(Duration::from_secs(1)).await;
                left -= 1;
                if tx.send(left).is_err() {
                    break;
                }
            }
        });

        Self {
            remaining: rx,
            handle,
        }
    }

    pub fn remaining(&self) -> u64 {
        *self.remaining.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for ResendCountdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
