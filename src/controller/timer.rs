use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Fired into the controller's event channel when the submit delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SubmitDelayElapsed,
}

/// One-shot delay timer with an owned cancellation handle. The armed task
/// is cancelled on teardown (or drop) so no callback outlives the page.
#[derive(Debug)]
pub struct SubmitTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SubmitTimer {
    pub fn arm(delay: Duration, events: UnboundedSender<TimerEvent>) -> Self {
        let token = CancellationToken::new();
        let armed = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = armed.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // Receiver gone means the page is gone; nothing to do
                    let _ = events.send(TimerEvent::SubmitDelayElapsed);
                }
            }
        });

        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SubmitTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = SubmitTimer::arm(Duration::from_millis(500), tx);

        // Let the spawned task register its sleep before touching the clock
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err(), "Timer must not fire early");

        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.try_recv(), Ok(TimerEvent::SubmitDelayElapsed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = SubmitTimer::arm(Duration::from_millis(500), tx);

        timer.cancel();
        tokio::time::advance(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;

        assert!(rx.try_recv().is_err());
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = SubmitTimer::arm(Duration::from_millis(500), tx);

        drop(timer);
        tokio::time::advance(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;

        assert!(rx.try_recv().is_err());
    }
}
