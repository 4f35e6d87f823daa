//! Trailing-edge debounce stage.
//!
//! A value is forwarded only after its source has been quiet for the whole
//! window. Every new value restarts the wait, nothing is emitted on the
//! leading edge, and dropping the [`Debouncer`] aborts its timer task so a
//! pending value is never delivered into a torn-down consumer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// Timer bookkeeping for one debounced value, independent of any runtime.
#[derive(Debug)]
pub struct DebounceState<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> DebounceState<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Records a change at `now`, replacing any pending value and restarting the wait.
    pub fn record(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Takes the pending value if its quiet period has fully elapsed at `now`.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(due) if due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Debounce stage running on its own task.
///
/// Values are pushed synchronously and come out of the `output` channel
/// given to [`Debouncer::spawn`].
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
    window: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the stage. Must be called from within a tokio runtime.
    pub fn spawn(window: Duration, output: mpsc::Sender<T>) -> Self {
        let (input, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_debounce(DebounceState::new(window), receiver, output));

        Self {
            input,
            task,
            window,
        }
    }

    /// Feeds a new value. Returns false once the stage has stopped.
    pub fn push(&self, value: T) -> bool {
        self.input.send(value).is_ok()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_debounce<T>(
    mut state: DebounceState<T>,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::Sender<T>,
) {
    loop {
        let deadline = state.deadline();

        tokio::select! {
            received = input.recv() => match received {
                Some(value) => state.record(value, Instant::now()),
                // Owner went away: the pending value dies with us
                None => break,
            },
            () = sleep_until_deadline(deadline) => {
                if let Some(value) = state.fire(Instant::now()) {
                    if output.send(value).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    tracing::trace!(dropped_pending = state.has_pending(), "Debounce stage stopped");
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(due) => sleep_until(due).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    fn stage() -> (Debouncer<String>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(16);
        (Debouncer::spawn(WINDOW, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let (debouncer, mut rx) = stage();

        for value in ["b", "ba", "bat", "batm"] {
            debouncer.push(value.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(WINDOW).await;

        assert_eq!(rx.recv().await.as_deref(), Some("batm"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_restarts_the_wait() {
        let (debouncer, mut rx) = stage();

        debouncer.push("a".to_string());
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.push("ab".to_string());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(rx.try_recv().ok().as_deref(), Some("ab"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_leading_edge_emission() {
        let (debouncer, mut rx) = stage();

        debouncer.push("x".to_string());
        tokio::task::yield_now().await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_emission_per_quiet_period() {
        let (debouncer, mut rx) = stage();

        debouncer.push("first".to_string());
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.push("second".to_string());
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(rx.recv().await.as_deref(), Some("first"));
        assert_eq!(rx.recv().await.as_deref(), Some("second"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_emission() {
        let (debouncer, mut rx) = stage();

        debouncer.push("late".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(debouncer);
        tokio::time::sleep(Duration::from_secs(2)).await;

        // Task aborted: the output sender is gone without sending anything
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_state_fires_only_after_window() {
        let start = Instant::now();
        let mut state = DebounceState::new(WINDOW);

        state.record(1, start);
        assert_eq!(state.fire(start + Duration::from_millis(499)), None);
        assert_eq!(state.fire(start + WINDOW), Some(1));
        assert_eq!(state.fire(start + WINDOW * 2), None);
    }

    proptest! {
        /// Values typed closer together than the window never reach the output;
        /// only the last value before each quiet gap does.
        #[test]
        fn prop_only_values_before_quiet_gaps_are_emitted(
            gaps in proptest::collection::vec(0u64..1_000, 1..40)
        ) {
            let start = Instant::now();
            let mut state = DebounceState::new(WINDOW);
            let mut now = start;
            let mut emitted = Vec::new();
            let mut expected = Vec::new();

            for (index, gap) in gaps.iter().enumerate() {
                state.record(index, now);
                let next = now + Duration::from_millis(*gap);
                if let Some(due) = state.deadline() {
                    if due <= next {
                        emitted.extend(state.fire(due));
                    }
                }
                if Duration::from_millis(*gap) >= WINDOW {
                    expected.push(index);
                }
                now = next;
            }
            emitted.extend(state.fire(now + WINDOW));
            if gaps.last().is_some_and(|gap| Duration::from_millis(*gap) < WINDOW) {
                expected.push(gaps.len() - 1);
            }

            prop_assert_eq!(emitted, expected);
        }
    }
}
