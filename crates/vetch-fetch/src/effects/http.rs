use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface the download pipeline needs:
/// a single non-following redirect probe, a header-only size probe and a
/// streaming body for the default transfer agent.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a GET with redirect following disabled.
    ///
    /// Returns `Ok(Some(target))` when the response is a redirect with a
    /// usable `Location` (resolved against `url` if relative), `Ok(None)`
    /// otherwise. The response body is never read.
    fn redirect_target(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Issue a HEAD request and return the parsed `Content-Length`.
    ///
    /// `Ok(None)` if the header is absent or is not an unsigned 64-bit integer.
    fn content_length(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Option<u64>, Self::Error>> + Send;

    /// Open a GET and return the response body as a stream.
    ///
    /// Non-success statuses are errors.
    fn stream(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use reqwest::header::{CONTENT_LENGTH, LOCATION};
    use reqwest::redirect::Policy;

    use super::*;
    use crate::core::{is_redirect, parse_content_length};

    /// Production HTTP client implementation using reqwest.
    ///
    /// Holds two connection pools: one that never follows redirects, used for
    /// redirect probing, and one with reqwest's default policy.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client:      reqwest::Client,
        no_redirect: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self, reqwest::Error> {
            Ok(Self {
                client:      reqwest::Client::builder().build()?,
                no_redirect: reqwest::Client::builder().redirect(Policy::none()).build()?,
            })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn redirect_target(&self, url: &str) -> Result<Option<String>, Self::Error> {
            let response = self.no_redirect.get(url).send().await?;
            if !is_redirect(response.status().as_u16()) {
                return Ok(None);
            }
            let target = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|location| response.url().join(location).ok())
                .map(|target| target.to_string());
            Ok(target)
        }

        async fn content_length(&self, url: &str) -> Result<Option<u64>, Self::Error> {
            let response = self.client.head(url).send().await?.error_for_status()?;
            let length = response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_content_length);
            Ok(length)
        }

        async fn stream(
            &self,
            url: &str,
        ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok(Box::pin(response.bytes_stream()))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
