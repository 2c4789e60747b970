use std::path::Path;
use std::sync::Arc;

use vetch_verify::Algorithm;

use crate::data::{DownloadRequest, FetchConfig};
use crate::effects::downloader::Downloader;
use crate::effects::http::HttpClient;
use crate::effects::integrity;
use crate::effects::log::{Logger, TracingLogger};
use crate::effects::redirect::RedirectResolver;
use crate::effects::retry::RetryOrchestrator;
use crate::effects::transfer::TransferAgent;
use crate::error::Result;

/// Entry point bundling an HTTP client, a transfer agent, configuration and
/// a logger.
///
/// A `Fetcher` holds no per-download state and can serve any number of
/// requests, but two requests for the same destination must not run at the
/// same time.
pub struct Fetcher<C: HttpClient, T: TransferAgent> {
    client: C,
    agent:  T,
    config: FetchConfig,
    logger: Arc<dyn Logger>,
}

#[cfg(feature = "reqwest")]
impl Fetcher<crate::ReqwestClient, crate::HttpTransfer<crate::ReqwestClient>> {
    /// Fetcher backed by reqwest for both probing and transfer.
    pub fn with_reqwest(config: FetchConfig) -> Result<Self> {
        let client = crate::ReqwestClient::new().map_err(|e| crate::FetchError::Network(Box::new(e)))?;
        let agent = crate::HttpTransfer::new(client.clone());
        Self::new(client, agent, config)
    }
}

impl<C: HttpClient, T: TransferAgent> Fetcher<C, T> {
    /// Fails with [`crate::FetchError::InvalidConfig`] if `config` does not validate.
    pub fn new(client: C, agent: T, config: FetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client,
            agent,
            config,
            logger: Arc::new(TracingLogger),
        })
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &FetchConfig { &self.config }

    pub fn client(&self) -> &C { &self.client }

    pub fn agent(&self) -> &T { &self.agent }

    /// Download with bounded retries. Either succeeds or returns
    /// [`crate::FetchError::RetriesExhausted`].
    pub async fn download_with_retry(&self, request: &DownloadRequest) -> Result<()> {
        RetryOrchestrator::new(
            self.downloader(),
            self.logger.as_ref(),
            self.config.max_attempts,
            self.config.retry_delay,
        )
        .run_with_retry(request)
        .await
    }

    /// A single attempt, for callers running their own retry policy.
    pub async fn download(&self, request: &DownloadRequest) -> Result<bool> {
        self.downloader().run(request).await
    }

    /// See [`integrity::verify_file`].
    pub async fn verify_file(
        &self,
        path: &Path,
        expected_size: u64,
        algorithm: Algorithm,
        expected_hex: &str,
    ) -> Result<bool> {
        integrity::verify_file(self.logger.as_ref(), path, expected_size, algorithm, expected_hex)
            .await
    }

    /// Single-hop redirect resolution.
    pub async fn resolve_redirect(&self, url: &str) -> Result<String> {
        RedirectResolver::new(&self.client, self.logger.as_ref())
            .deadline(self.config.timeout)
            .resolve(url)
            .await
    }

    fn downloader(&self) -> Downloader<'_, C, T> {
        Downloader::new(&self.client, &self.agent, self.logger.as_ref(), &self.config)
    }
}
