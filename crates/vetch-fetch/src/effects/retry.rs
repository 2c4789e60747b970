use std::time::Duration;

use crate::core::{classify, retry_delay};
use crate::data::{AttemptOutcome, DownloadRequest};
use crate::effects::downloader::Downloader;
use crate::effects::http::HttpClient;
use crate::effects::log::{Logger, Severity};
use crate::effects::remover::FileRemover;
use crate::effects::transfer::TransferAgent;
use crate::error::{FetchError, Result};

const SOURCE: &str = "retry";

/// Bounded retry loop around [`Downloader`] with a constant delay.
pub struct RetryOrchestrator<'a, C: HttpClient, T: TransferAgent> {
    downloader:   Downloader<'a, C, T>,
    logger:       &'a dyn Logger,
    max_attempts: u32,
    delay:        Duration,
}

impl<'a, C: HttpClient, T: TransferAgent> RetryOrchestrator<'a, C, T> {
    pub fn new(
        downloader: Downloader<'a, C, T>,
        logger: &'a dyn Logger,
        max_attempts: u32,
        delay: Duration,
    ) -> Self {
        Self {
            downloader,
            logger,
            max_attempts,
            delay,
        }
    }

    /// Run attempts until one succeeds or the bound is reached.
    ///
    /// Returns `Ok(())` or [`FetchError::RetriesExhausted`]; nothing else.
    /// Errors that no retry can fix end the loop early. On the first attempt
    /// they leave the destination alone; after that, and when the bound is
    /// reached, the destination is removed best-effort. A failing cleanup is
    /// logged and does not replace the reported error.
    pub async fn run_with_retry(&self, request: &DownloadRequest) -> Result<()> {
        let mut attempt = 1;
        loop {
            self.logger.log(
                &format!(
                    "attempt {attempt} of {} for {}",
                    self.max_attempts,
                    request.source_url()
                ),
                Severity::Info,
                SOURCE,
            );

            let result = self.downloader.run(request).await;
            let reason = match classify(result, request.destination()) {
                AttemptOutcome::Success => {
                    self.logger.log(
                        &format!("downloaded {}", request.destination().display()),
                        Severity::Info,
                        SOURCE,
                    );
                    return Ok(());
                }
                AttemptOutcome::RecoverableFailure(reason) => reason,
                AttemptOutcome::TerminalFailure(reason) => {
                    self.logger.log(
                        &format!("attempt {attempt} failed and cannot be retried: {reason}"),
                        Severity::Error,
                        SOURCE,
                    );
                    if attempt == 1 {
                        return Err(FetchError::RetriesExhausted {
                            attempts: attempt,
                            last:     Box::new(reason),
                        });
                    }
                    // earlier attempts may have left a truncated file
                    return Err(self.give_up(request, attempt, reason));
                }
            };

            attempt += 1;
            if attempt > self.max_attempts {
                self.logger.log(
                    &format!("all {} attempts failed, last error: {reason}", self.max_attempts),
                    Severity::Error,
                    SOURCE,
                );
                return Err(self.give_up(request, self.max_attempts, reason));
            }

            let delay = retry_delay(attempt, self.delay);
            self.logger.log(
                &format!("attempt {} failed: {reason}; retrying in {delay:?}", attempt - 1),
                Severity::Warning,
                SOURCE,
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn give_up(&self, request: &DownloadRequest, attempts: u32, last: FetchError) -> FetchError {
        if let Err(cleanup) = FileRemover::new(self.logger).remove(request.destination()) {
            self.logger.log(
                &format!("cleanup after final failure did not complete: {cleanup}"),
                Severity::Warning,
                SOURCE,
            );
        }
        FetchError::RetriesExhausted {
            attempts,
            last: Box::new(last),
        }
    }
}
