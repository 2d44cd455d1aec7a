//! Debounced text input.
//!
//! Raw keystrokes go in through `push`; a settled value comes out only after
//! the input has been quiet for the debounce interval.

use std::time::Duration;
use tokio::sync::{mpsc, watch};

pub struct Debouncer {
    input: watch::Sender<String>,
    settled: mpsc::Receiver<String>,
}

impl Debouncer {
    /// Spawn the debounce task. Must be called inside a tokio runtime.
    pub fn spawn(delay: Duration) -> Self {
        let (input, watcher) = watch::channel(String::new());
        let (tx, settled) = mpsc::channel(16);
        tokio::spawn(run(watcher, tx, delay));
        Self { input, settled }
    }

    /// Record the latest raw text.
    pub fn push(&self, text: impl Into<String>) {
        // Errors only after the task has exited.
        let _ = self.input.send(text.into());
    }

    /// Wait for the next settled value. Consecutive duplicates are suppressed.
    pub async fn next_settled(&mut self) -> Option<String> {
        self.settled.recv().await
    }

    /// Stop accepting input; a pending value is still flushed.
    pub fn close(self) -> mpsc::Receiver<String> {
        let Self { input, settled } = self;
        drop(input);
        settled
    }
}

async fn run(mut input: watch::Receiver<String>, tx: mpsc::Sender<String>, delay: Duration) {
    let mut last_sent: Option<String> = None;

    while input.changed().await.is_ok() {
        // Restart the quiet period on every change.
        loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => break,
                changed = input.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let value = input.borrow_and_update().clone();
        if last_sent.as_ref() == Some(&value) {
            continue;
        }

        tracing::debug!(term = %value, "search term settled");
        if tx.send(value.clone()).await.is_err() {
            break;
        }
        last_sent = Some(value);
    }
}
