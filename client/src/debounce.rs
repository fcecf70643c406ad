//! Debouncing for search-as-you-type input.

use std::time::Duration;

use tokio::sync::watch;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Yields the watched text once it has stopped changing for `delay`.
///
/// Keystrokes are published into a `watch` channel; each settled value is
/// yielded once, and a settled value equal to the previous one is skipped.
pub struct Debouncer {
    rx: watch::Receiver<String>,
    delay: Duration,
    last: String,
}

impl Debouncer {
    pub fn new(rx: watch::Receiver<String>, delay: Duration) -> Self {
        let last = rx.borrow().clone();
        Self { rx, delay, last }
    }

    /// A sender/debouncer pair starting from empty text.
    pub fn channel(delay: Duration) -> (watch::Sender<String>, Self) {
        let (tx, rx) = watch::channel(String::new());
        (tx, Self::new(rx, delay))
    }

    /// The next settled value, or `None` once the sender is gone and nothing
    /// is pending.
    pub async fn next(&mut self) -> Option<String> {
        loop {
            self.rx.changed().await.ok()?;
            loop {
                match tokio::time::timeout(self.delay, self.rx.changed()).await {
                    Ok(Ok(())) => continue,
                    Ok(Err(_)) | Err(_) => break,
                }
            }
            let value = self.rx.borrow_and_update().clone();
            if value != self.last {
                self.last = value.clone();
                return Some(value);
            }
        }
    }
}
