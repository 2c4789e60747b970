use crate::data::{DownloadRequest, FetchConfig, PartialFile};
use crate::effects::http::HttpClient;
use crate::effects::integrity::IntegrityChecker;
use crate::effects::log::{Logger, Severity};
use crate::effects::redirect::RedirectResolver;
use crate::effects::remover::FileRemover;
use crate::effects::transfer::TransferAgent;
use crate::effects::with_deadline;
use crate::error::{FetchError, Result};

const SOURCE: &str = "download";

/// One complete download attempt.
///
/// Steps, each aborting the attempt on failure:
/// 1. resume decision on a leftover destination file (only when validating)
/// 2. single-hop redirect resolution
/// 3. HEAD probe for the expected size
/// 4. transfer through the [`TransferAgent`]
/// 5. size and digest verification (only when validating)
///
/// The destination is assumed to be owned exclusively by this attempt.
pub struct Downloader<'a, C: HttpClient, T: TransferAgent> {
    client: &'a C,
    agent:  &'a T,
    logger: &'a dyn Logger,
    config: &'a FetchConfig,
}

impl<'a, C: HttpClient, T: TransferAgent> Downloader<'a, C, T> {
    pub fn new(client: &'a C, agent: &'a T, logger: &'a dyn Logger, config: &'a FetchConfig) -> Self {
        Self {
            client,
            agent,
            logger,
            config,
        }
    }

    /// `Ok(true)` when the destination holds a complete (and, if requested,
    /// verified) artifact; `Ok(false)` when the transfer left nothing behind.
    pub async fn run(&self, request: &DownloadRequest) -> Result<bool> {
        let checksum = request.verification()?;
        let destination = request.destination();

        if let Some(checksum) = checksum
            && vetch_fs::exists(destination)
        {
            let state = IntegrityChecker::new(self.logger)
                .check_partial(destination, checksum)
                .await;
            match state {
                PartialFile::Valid => {
                    self.logger.log(
                        &format!(
                            "{} already matches {}, skipping transfer",
                            destination.display(),
                            checksum.algorithm()
                        ),
                        Severity::Info,
                        SOURCE,
                    );
                    return Ok(true);
                }
                PartialFile::Invalid => {
                    self.logger.log(
                        &format!("discarding stale partial file {}", destination.display()),
                        Severity::Warning,
                        SOURCE,
                    );
                    FileRemover::new(self.logger).remove(destination)?;
                }
                PartialFile::Absent => {}
            }
        }

        let effective_url = RedirectResolver::new(self.client, self.logger)
            .deadline(self.config.timeout)
            .resolve(request.source_url())
            .await?;
        let expected_size = self.probe_size(&effective_url).await?;

        self.logger.log(
            &format!(
                "transferring {effective_url} ({expected_size} bytes) to {}",
                destination.display()
            ),
            Severity::Info,
            SOURCE,
        );
        with_deadline(self.config.timeout, self.agent.transfer(&effective_url, destination))
            .await?
            .map_err(|e| FetchError::Transfer(Box::new(e)))?;

        if !vetch_fs::exists(destination) {
            self.logger.log(
                &format!("transfer finished but {} is missing", destination.display()),
                Severity::Error,
                SOURCE,
            );
            return Ok(false);
        }

        if let Some(checksum) = checksum {
            IntegrityChecker::new(self.logger)
                .check_full(destination, expected_size, checksum.algorithm(), checksum.hex())
                .await?;
        }
        Ok(true)
    }

    async fn probe_size(&self, url: &str) -> Result<u64> {
        with_deadline(self.config.timeout, self.client.content_length(url))
            .await?
            .map_err(|e| FetchError::Network(Box::new(e)))?
            .ok_or_else(|| FetchError::Probe {
                url:    url.to_owned(),
                reason: "missing or malformed Content-Length",
            })
    }
}
