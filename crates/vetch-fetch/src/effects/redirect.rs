use std::time::Duration;

use crate::effects::http::HttpClient;
use crate::effects::log::{Logger, Severity};
use crate::effects::with_deadline;
use crate::error::{FetchError, Result};

const SOURCE: &str = "redirect";

/// Resolves the URL a server redirects to, following **one hop only**.
///
/// A chain `A -> B -> C` resolves `A` to `B`, not `C`. Callers that need the
/// final target of a longer chain have to resolve repeatedly themselves.
pub struct RedirectResolver<'a, C: HttpClient> {
    client:   &'a C,
    logger:   &'a dyn Logger,
    deadline: Option<Duration>,
}

impl<'a, C: HttpClient> RedirectResolver<'a, C> {
    pub fn new(client: &'a C, logger: &'a dyn Logger) -> Self {
        Self {
            client,
            logger,
            deadline: None,
        }
    }

    pub fn deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Effective URL for `url`: the redirect target if the server answers
    /// with one, otherwise `url` itself. Network failures are not retried here.
    pub async fn resolve(&self, url: &str) -> Result<String> {
        let target = with_deadline(self.deadline, self.client.redirect_target(url))
            .await?
            .map_err(|e| FetchError::Network(Box::new(e)))?;

        match target {
            Some(target) if target != url => {
                self.logger
                    .log(&format!("{url} redirects to {target}"), Severity::Info, SOURCE);
                Ok(target)
            }
            _ => Ok(url.to_owned()),
        }
    }
}
