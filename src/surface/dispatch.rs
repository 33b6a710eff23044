//! Posting widget changes back to the thread that owns the form.

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ProgressFraction, RunSummary};

/// A widget change produced by the download loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiUpdate {
    Progress(ProgressFraction),
    Reset(RunSummary),
}

/// Creates a single-consumer FIFO queue: many posters, one UI-side drain.
pub fn channel() -> (UiPoster, UiQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiPoster { tx }, UiQueue { rx })
}

/// Sending half, safe to move onto a worker thread.
#[derive(Debug, Clone)]
pub struct UiPoster {
    tx: mpsc::UnboundedSender<UiUpdate>,
}

impl UiPoster {
    /// Queues `update` for the owner thread and returns immediately.
    pub fn post(&self, update: UiUpdate) {
        if let Err(err) = self.tx.send(update) {
            tracing::debug!(update = ?err.0, "UI queue closed, dropping update");
        }
    }
}

/// Receiving half, drained on the owner thread.
#[derive(Debug)]
pub struct UiQueue {
    rx: mpsc::UnboundedReceiver<UiUpdate>,
}

impl UiQueue {
    /// Next queued update without waiting.
    pub fn try_next(&mut self) -> Option<UiUpdate> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next update; `None` once every poster is gone and the
    /// queue is empty. Must not be called from inside an async runtime.
    pub fn blocking_next(&mut self) -> Option<UiUpdate> {
        self.rx.blocking_recv()
    }

    /// Turns the queue into a stream for the UI runtime to drain.
    pub fn into_stream(self) -> BoxStream<'static, UiUpdate> {
        stream::unfold(self.rx, |mut rx| async move {
            rx.recv().await.map(|update| (update, rx))
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_updates_arrive_in_submission_order() {
        let (poster, mut queue) = channel();
        let worker = thread::spawn(move || {
            for i in 1..=5 {
                poster.post(UiUpdate::Progress(ProgressFraction::from_units(i, 5)));
            }
        });
        worker.join().unwrap();

        let mut seen = Vec::new();
        while let Some(update) = queue.blocking_next() {
            seen.push(update);
        }
        let expected: Vec<_> = (1..=5)
            .map(|i| UiUpdate::Progress(ProgressFraction::from_units(i, 5)))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_post_after_drop_is_silent() {
        let (poster, queue) = channel();
        drop(queue);
        poster.post(UiUpdate::Progress(ProgressFraction::COMPLETE));
    }

    #[test]
    fn test_try_next_on_empty_queue() {
        let (_poster, mut queue) = channel();
        assert_eq!(queue.try_next(), None);
    }

    #[tokio::test]
    async fn test_stream_ends_when_posters_drop() {
        let (poster, queue) = channel();
        poster.post(UiUpdate::Progress(ProgressFraction::new(0.5)));
        drop(poster);

        let updates: Vec<_> = queue.into_stream().collect().await;
        assert_eq!(
            updates,
            vec![UiUpdate::Progress(ProgressFraction::new(0.5))]
        );
    }
}
