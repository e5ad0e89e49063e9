//! Quiescence-window debouncing for bursty input.
//!
//! Each flow that needs debouncing owns its own `Debouncer`; the search flow
//! and the geocode flow never share one, so their windows stay independent.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Coalesces bursts of submissions: a submitted future only runs once no
/// newer submission has arrived for the whole quiescence window. Superseded
/// submissions are dropped without running.
pub struct Debouncer {
    quiet: Duration,
    seq: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, seq: Arc::new(AtomicU64::new(0)) }
    }

    /// Schedule `fut` to run after the quiescence window, unless a newer
    /// submission lands first. Returns the spawned task handle, mainly so
    /// tests can await settlement.
    pub fn submit<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let seq = Arc::clone(&self.seq);
        let quiet = self.quiet;
        tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if seq.load(Ordering::SeqCst) == token {
                fut.await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn burst_of_submissions_runs_only_the_last() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let hits = Arc::new(AtomicUsize::new(0));

        let mut last = None;
        for _ in 0..5 {
            let hits = Arc::clone(&hits);
            last = Some(debouncer.submit(async move {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        last.unwrap().await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn isolated_submission_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(5));
        let hits = Arc::new(AtomicUsize::new(0));
        let h = {
            let hits = Arc::clone(&hits);
            debouncer.submit(async move {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        h.await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
