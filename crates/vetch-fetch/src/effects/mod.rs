//! I/O operations with trait abstraction.

pub mod downloader;
pub mod fetcher;
pub mod http;
pub mod integrity;
pub mod log;
pub mod redirect;
pub mod remover;
pub mod retry;
pub mod transfer;

use std::future::Future;
use std::time::Duration;

use crate::error::{FetchError, Result};

/// Await `future`, bounded by `deadline` when one is configured.
pub(crate) async fn with_deadline<F: Future>(deadline: Option<Duration>, future: F) -> Result<F::Output> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .map_err(|_| FetchError::Timeout(limit)),
        None => Ok(future.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses() {
        let slow = tokio::time::sleep(Duration::from_secs(60));
        let result = with_deadline(Some(Duration::from_secs(1)), slow).await;
        assert!(matches!(result, Err(FetchError::Timeout(limit)) if limit == Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_no_deadline_passes_output_through() {
        let value = with_deadline(None, async { 42 }).await.unwrap();
        assert_eq!(value, 42);
    }
}
