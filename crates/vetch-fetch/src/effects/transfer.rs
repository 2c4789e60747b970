use std::future::Future;
use std::io;
use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::effects::http::HttpClient;

/// Capability that moves bytes from a URL to a local path.
///
/// Implementations either populate `destination` completely or return an
/// error. A truncated file left behind on error is acceptable: the next
/// attempt's partial-file check or size check catches it.
pub trait TransferAgent: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn transfer(
        &self,
        url: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum HttpTransferError<E: std::error::Error + 'static> {
    #[error("request failed: {0}")]
    Http(#[source] E),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Default [`TransferAgent`]: streams a GET body straight to the destination.
#[derive(Debug, Clone)]
pub struct HttpTransfer<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> HttpTransfer<C> {
    pub fn new(client: C) -> Self { Self { client } }
}

impl<C: HttpClient> TransferAgent for HttpTransfer<C> {
    type Error = HttpTransferError<C::Error>;

    async fn transfer(&self, url: &str, destination: &Path) -> Result<(), Self::Error> {
        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut stream = self.client.stream(url).await.map_err(HttpTransferError::Http)?;
        let mut file = tokio::fs::File::create(destination).await?;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(HttpTransferError::Http)?;
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}
