//! Navigation debouncing
//!
//! The host emits a navigation event whenever the page's route changes.
//! Bursts are common (redirect chains, SPA route settling), so events
//! arriving within the window are coalesced and only the last one acts.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::constants::DEFAULT_DEBOUNCE_MS;

pub struct NavigationDebouncer {
    window: Duration,
}

impl NavigationDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Consume navigation events until the sender hangs up, invoking the
    /// callback once per burst with the last URL seen.
    pub async fn run<F>(&self, mut events: mpsc::UnboundedReceiver<String>, mut on_navigate: F)
    where
        F: FnMut(String),
    {
        while let Some(first) = events.recv().await {
            let mut last = first;

            loop {
                match tokio::time::timeout(self.window, events.recv()).await {
                    // Another event inside the window resets it
                    Ok(Some(next)) => last = next,
                    // Channel closed mid-burst: act on what we have
                    Ok(None) => {
                        on_navigate(last);
                        return;
                    }
                    // Window elapsed quietly: the burst is over
                    Err(_) => break,
                }
            }

            tracing::debug!(url = %last, "Navigation settled");
            on_navigate(last);
        }
    }
}

impl Default for NavigationDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}
