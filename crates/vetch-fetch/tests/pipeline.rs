//! Download pipeline tests against in-memory HTTP and transfer doubles.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use tempfile::{TempDir, tempdir};
use vetch_fetch::{
    Algorithm, BoxStream, Checksum, DownloadRequest, FetchConfig, FetchError, Fetcher, HttpClient,
    IntegrityChecker, Logger, Severity, TransferAgent,
};

const SOURCE_URL: &str = "https://mirror.test/releases/tool-1.2.3.tar.gz";

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct MockError(String);

/// HTTP double: canned redirects and a fixed Content-Length.
#[derive(Default)]
struct MockClient {
    redirects:      Vec<(String, String)>,
    content_length: Option<u64>,
    refuse:         bool,
    redirect_calls: AtomicUsize,
    head_calls:     AtomicUsize,
}

impl MockClient {
    fn sized(len: usize) -> Self {
        Self {
            content_length: Some(len as u64),
            ..Self::default()
        }
    }

    fn network_calls(&self) -> usize {
        self.redirect_calls.load(Ordering::SeqCst) + self.head_calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for MockClient {
    type Error = MockError;

    async fn redirect_target(&self, url: &str) -> Result<Option<String>, Self::Error> {
        self.redirect_calls.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(MockError("connection refused".into()));
        }
        Ok(self
            .redirects
            .iter()
            .find(|(from, _)| from == url)
            .map(|(_, to)| to.clone()))
    }

    async fn content_length(&self, _url: &str) -> Result<Option<u64>, Self::Error> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.content_length)
    }

    async fn stream(
        &self,
        _url: &str,
    ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
        Err(MockError("streaming is handled by the transfer double".into()))
    }
}

/// Transfer double: fails the first `fail_first` calls after leaving a
/// truncated file behind, then writes `payload` (or a directory).
#[derive(Default)]
struct MockAgent {
    payload:       Vec<u8>,
    fail_first:    usize,
    write_nothing: bool,
    write_dir:     bool,
    hang:          bool,
    calls:         AtomicUsize,
    urls:          Mutex<Vec<String>>,
}

impl MockAgent {
    fn serving(payload: &[u8]) -> Self {
        Self {
            payload: payload.to_vec(),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl TransferAgent for MockAgent {
    type Error = MockError;

    async fn transfer(&self, url: &str, destination: &Path) -> Result<(), Self::Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_owned());
        if self.hang {
            std::future::pending::<()>().await;
        }
        if call < self.fail_first {
            let truncated = &self.payload[..self.payload.len() / 2];
            std::fs::write(destination, truncated).map_err(|e| MockError(e.to_string()))?;
            return Err(MockError("connection reset by peer".into()));
        }
        if self.write_nothing {
            return Ok(());
        }
        if self.write_dir {
            return std::fs::create_dir(destination).map_err(|e| MockError(e.to_string()));
        }
        std::fs::write(destination, &self.payload).map_err(|e| MockError(e.to_string()))
    }
}

#[derive(Default)]
struct RecordingLogger {
    entries: Mutex<Vec<(String, Severity, String)>>,
}

impl RecordingLogger {
    fn from_source(&self, source: &str) -> Vec<(String, Severity)> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, _, s)| s == source)
            .map(|(m, severity, _)| (m.clone(), *severity))
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, message: &str, severity: Severity, source: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((message.to_owned(), severity, source.to_owned()));
    }
}

fn sha256_hex(data: &[u8]) -> String {
    use vetch_verify::Hasher;

    let mut hasher = Algorithm::Sha256.hasher();
    hasher.update(data);
    hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
}

fn payload() -> Vec<u8> { (0..4096u32).map(|i| (i * 7 % 256) as u8).collect() }

fn scratch() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let destination = dir.path().join("tool-1.2.3.tar.gz");
    (dir, destination)
}

fn quick_config() -> FetchConfig { FetchConfig::default().retry_delay(Duration::ZERO) }

fn verified_request(destination: &Path, data: &[u8]) -> DownloadRequest {
    let checksum = Checksum::new(Algorithm::Sha256, sha256_hex(data)).unwrap();
    DownloadRequest::new(SOURCE_URL, destination).checksum(checksum)
}

#[tokio::test]
async fn test_valid_partial_file_skips_network_and_transfer() {
    let data = payload();
    let (_dir, destination) = scratch();
    std::fs::write(&destination, &data).unwrap();

    let fetcher =
        Fetcher::new(MockClient::sized(data.len()), MockAgent::serving(&data), quick_config()).unwrap();
    let done = fetcher.download(&verified_request(&destination, &data)).await.unwrap();

    assert!(done);
    assert_eq!(fetcher.agent().calls(), 0);
    assert_eq!(fetcher.client().network_calls(), 0);
    assert_eq!(std::fs::read(&destination).unwrap(), data);
}

#[tokio::test]
async fn test_stale_partial_file_is_replaced() {
    let data = payload();
    let (_dir, destination) = scratch();
    std::fs::write(&destination, b"leftover from an interrupted run").unwrap();

    let logger = Arc::new(RecordingLogger::default());
    let fetcher =
        Fetcher::new(MockClient::sized(data.len()), MockAgent::serving(&data), quick_config())
            .unwrap()
            .with_logger(logger.clone());
    let done = fetcher.download(&verified_request(&destination, &data)).await.unwrap();

    assert!(done);
    assert_eq!(fetcher.agent().calls(), 1);
    assert_eq!(std::fs::read(&destination).unwrap(), data);
    assert!(
        logger
            .from_source("download")
            .iter()
            .any(|(m, severity)| m.contains("discarding") && *severity == Severity::Warning)
    );
}

#[tokio::test]
async fn test_uppercase_checksum_verifies() {
    let data = payload();
    let (_dir, destination) = scratch();
    let checksum = Checksum::new(Algorithm::Sha256, sha256_hex(&data).to_ascii_uppercase()).unwrap();
    let request = DownloadRequest::new(SOURCE_URL, &destination).checksum(checksum);

    let fetcher =
        Fetcher::new(MockClient::sized(data.len()), MockAgent::serving(&data), quick_config()).unwrap();

    assert!(fetcher.download(&request).await.unwrap());
    assert!(destination.exists());
}

#[tokio::test]
async fn test_missing_content_length_is_probe_error() {
    let data = payload();
    let (_dir, destination) = scratch();
    let fetcher =
        Fetcher::new(MockClient::default(), MockAgent::serving(&data), quick_config()).unwrap();

    let err = fetcher.download(&verified_request(&destination, &data)).await.unwrap_err();

    assert!(matches!(err, FetchError::Probe { .. }));
    assert_eq!(fetcher.agent().calls(), 0);
}

#[tokio::test]
async fn test_transfer_without_artifact_returns_false() {
    let (_dir, destination) = scratch();
    let agent = MockAgent {
        write_nothing: true,
        ..MockAgent::default()
    };
    let fetcher = Fetcher::new(MockClient::sized(10), agent, quick_config()).unwrap();

    let done = fetcher
        .download(&DownloadRequest::new(SOURCE_URL, &destination))
        .await
        .unwrap();

    assert!(!done);
}

#[tokio::test]
async fn test_size_mismatch_after_transfer_removes_artifact() {
    let data = payload();
    let (_dir, destination) = scratch();
    let fetcher =
        Fetcher::new(MockClient::sized(data.len() + 1), MockAgent::serving(&data), quick_config())
            .unwrap();

    let err = fetcher.download(&verified_request(&destination, &data)).await.unwrap_err();

    match err {
        FetchError::SizeMismatch { expected, actual } => {
            assert_eq!(expected, data.len() as u64 + 1);
            assert_eq!(actual, data.len() as u64);
        }
        other => panic!("expected SizeMismatch, got {other:?}"),
    }
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_hash_mismatch_after_transfer_removes_artifact() {
    let data = payload();
    let (_dir, destination) = scratch();
    let request = verified_request(&destination, b"some other release");
    let fetcher =
        Fetcher::new(MockClient::sized(data.len()), MockAgent::serving(&data), quick_config()).unwrap();

    let err = fetcher.download(&request).await.unwrap_err();

    assert!(matches!(err, FetchError::HashMismatch { .. }));
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_unvalidated_download_ignores_probed_size() {
    let data = payload();
    let (_dir, destination) = scratch();
    let fetcher =
        Fetcher::new(MockClient::sized(1), MockAgent::serving(&data), quick_config()).unwrap();

    let done = fetcher
        .download(&DownloadRequest::new(SOURCE_URL, &destination))
        .await
        .unwrap();

    assert!(done);
    assert_eq!(std::fs::read(&destination).unwrap(), data);
}

#[tokio::test]
async fn test_redirect_resolves_exactly_one_hop() {
    let data = payload();
    let (_dir, destination) = scratch();
    let hop = "https://cdn.test/tool-1.2.3.tar.gz";
    let client = MockClient {
        redirects: vec![
            (SOURCE_URL.to_owned(), hop.to_owned()),
            (hop.to_owned(), "https://edge.cdn.test/tool-1.2.3.tar.gz".to_owned()),
        ],
        ..MockClient::sized(data.len())
    };
    let fetcher = Fetcher::new(client, MockAgent::serving(&data), quick_config()).unwrap();

    assert_eq!(fetcher.resolve_redirect(SOURCE_URL).await.unwrap(), hop);

    fetcher
        .download(&DownloadRequest::new(SOURCE_URL, &destination))
        .await
        .unwrap();
    assert_eq!(*fetcher.agent().urls.lock().unwrap(), vec![hop.to_owned()]);
}

#[tokio::test]
async fn test_retry_bound_and_final_cleanup() {
    let data = payload();
    let (_dir, destination) = scratch();
    let agent = MockAgent {
        fail_first: usize::MAX,
        ..MockAgent::serving(&data)
    };
    let fetcher = Fetcher::new(
        MockClient::sized(data.len()),
        agent,
        quick_config().max_attempts(4),
    )
    .unwrap();

    let err = fetcher
        .download_with_retry(&DownloadRequest::new(SOURCE_URL, &destination))
        .await
        .unwrap_err();

    match err {
        FetchError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 4);
            assert!(matches!(*last, FetchError::Transfer(_)));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(fetcher.agent().calls(), 4);
    assert!(!destination.exists());
}

#[tokio::test(start_paused = true)]
async fn test_two_failures_then_success() {
    let data = payload();
    let (_dir, destination) = scratch();
    let delay = Duration::from_secs(5);
    let agent = MockAgent {
        fail_first: 2,
        ..MockAgent::serving(&data)
    };
    let logger = Arc::new(RecordingLogger::default());
    let fetcher = Fetcher::new(
        MockClient::sized(data.len()),
        agent,
        FetchConfig::default().retry_delay(delay),
    )
    .unwrap()
    .with_logger(logger.clone());

    let start = tokio::time::Instant::now();
    fetcher
        .download_with_retry(&DownloadRequest::new(SOURCE_URL, &destination))
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(fetcher.agent().calls(), 3);
    assert!(elapsed >= delay * 2 && elapsed < delay * 3, "elapsed {elapsed:?}");
    assert_eq!(std::fs::read(&destination).unwrap(), data);
    assert!(logger.from_source("remove").is_empty());

    let retries = logger
        .from_source("retry")
        .into_iter()
        .filter(|(_, severity)| *severity == Severity::Warning)
        .count();
    assert_eq!(retries, 2);
}

#[tokio::test]
async fn test_verification_without_checksum_is_not_retried() {
    let data = payload();
    let (_dir, destination) = scratch();
    std::fs::write(&destination, b"kept from a previous run").unwrap();
    let fetcher =
        Fetcher::new(MockClient::sized(data.len()), MockAgent::serving(&data), quick_config()).unwrap();
    let request = DownloadRequest::new(SOURCE_URL, &destination).with_validation(true);

    let err = fetcher.download_with_retry(&request).await.unwrap_err();

    match err {
        FetchError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 1);
            assert!(matches!(*last, FetchError::InvalidRequest(_)));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(fetcher.agent().calls(), 0);
    assert!(destination.exists());
}

#[tokio::test]
async fn test_terminal_failure_after_retry_removes_destination() {
    let data = payload();
    let (_dir, destination) = scratch();
    let agent = MockAgent {
        fail_first: 1,
        write_dir: true,
        ..MockAgent::serving(&data)
    };
    let fetcher =
        Fetcher::new(MockClient::sized(data.len()), agent, quick_config().max_attempts(5)).unwrap();

    let err = fetcher
        .download_with_retry(&verified_request(&destination, &data))
        .await
        .unwrap_err();

    match err {
        FetchError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(matches!(*last, FetchError::FileNotFound(_)));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(fetcher.agent().calls(), 2);
    assert!(!destination.exists());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_undeletable_artifact_surfaces_removal_error() {
    let logger = RecordingLogger::default();
    let err = IntegrityChecker::new(&logger)
        .check_full(Path::new("/proc/version"), 1, Algorithm::Sha256, &"0".repeat(64))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Removal(_)), "{err:?}");
    assert!(
        logger
            .from_source("remove")
            .iter()
            .any(|(_, severity)| *severity == Severity::Error)
    );
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_failed_final_cleanup_keeps_exhausted_error() {
    let destination = Path::new("/proc/version");
    let agent = MockAgent {
        fail_first: usize::MAX,
        ..MockAgent::serving(&payload())
    };
    let logger = Arc::new(RecordingLogger::default());
    let fetcher = Fetcher::new(MockClient::sized(1), agent, quick_config().max_attempts(2))
        .unwrap()
        .with_logger(logger.clone());

    let err = fetcher
        .download_with_retry(&DownloadRequest::new(SOURCE_URL, destination))
        .await
        .unwrap_err();

    match err {
        FetchError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(matches!(*last, FetchError::Transfer(_)));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert!(destination.exists());
    assert!(
        logger
            .from_source("retry")
            .iter()
            .any(|(message, severity)| *severity == Severity::Warning && message.contains("cleanup"))
    );
}

#[tokio::test]
async fn test_network_errors_are_retried() {
    let (_dir, destination) = scratch();
    let client = MockClient {
        refuse: true,
        ..MockClient::default()
    };
    let fetcher = Fetcher::new(client, MockAgent::default(), quick_config().max_attempts(2)).unwrap();

    let err = fetcher
        .download_with_retry(&DownloadRequest::new(SOURCE_URL, &destination))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::RetriesExhausted { attempts: 2, ref last } if matches!(**last, FetchError::Network(_))
    ));
    assert_eq!(fetcher.client().redirect_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_transfer_deadline() {
    let (_dir, destination) = scratch();
    let agent = MockAgent {
        hang: true,
        ..MockAgent::default()
    };
    let config = quick_config().timeout(Duration::from_secs(30));
    let fetcher = Fetcher::new(MockClient::sized(1), agent, config).unwrap();

    let err = fetcher
        .download(&DownloadRequest::new(SOURCE_URL, &destination))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Timeout(limit) if limit == Duration::from_secs(30)));
    assert!(err.is_retryable());
}

#[test]
fn test_zero_attempts_rejected_at_construction() {
    let result = Fetcher::new(
        MockClient::default(),
        MockAgent::default(),
        FetchConfig::default().max_attempts(0),
    );
    assert!(matches!(result, Err(FetchError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_one_mebibyte_scenario() {
    const SIZE: usize = 1_048_576;
    let dir = tempdir().unwrap();
    let data: Vec<u8> = (0..SIZE).map(|i| (i % 253) as u8).collect();
    let hash = sha256_hex(&data);
    let checker_logger = RecordingLogger::default();
    let checker = IntegrityChecker::new(&checker_logger);

    let exact = dir.path().join("exact.bin");
    std::fs::write(&exact, &data).unwrap();
    checker
        .check_full(&exact, SIZE as u64, Algorithm::Sha256, &hash)
        .await
        .unwrap();
    assert!(exact.exists());

    let short = dir.path().join("short.bin");
    std::fs::write(&short, &data[..SIZE - 1]).unwrap();
    let verdict = checker
        .verdict(&short, SIZE as u64, Algorithm::Sha256, &hash)
        .await
        .unwrap();
    assert_eq!(verdict.hash_match, None);
    assert_eq!(verdict.actual_digest, None);

    let err = checker
        .check_full(&short, SIZE as u64, Algorithm::Sha256, &hash)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FetchError::SizeMismatch {
            expected: 1_048_576,
            actual: 1_048_575,
        }
    ));
    assert!(!short.exists());
}

#[tokio::test]
async fn test_verify_file_reports_mismatch_as_false() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("artifact.bin");
    std::fs::write(&path, b"hello world").unwrap();
    let fetcher = Fetcher::new(MockClient::default(), MockAgent::default(), quick_config()).unwrap();

    let lower = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
    assert!(fetcher.verify_file(&path, 11, Algorithm::Sha256, lower).await.unwrap());
    assert!(
        fetcher
            .verify_file(&path, 11, Algorithm::Sha256, &lower.to_ascii_uppercase())
            .await
            .unwrap()
    );

    assert!(!fetcher.verify_file(&path, 11, Algorithm::Md5, &"0".repeat(32)).await.unwrap());
    assert!(!path.exists());

    let err = fetcher.verify_file(&path, 11, Algorithm::Sha256, lower).await.unwrap_err();
    assert!(matches!(err, FetchError::FileNotFound(_)));
}
