use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::FetchError;

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: u32 = 5;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("vendor-prep/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Fetch: Send + Sync {
    /// Downloads `url` into `dest`. On error nothing is left at `dest`.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .redirect(Policy::none())
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    async fn fetch_staged(&self, url: &str, dest: &Path, staging: &Path) -> Result<(), FetchError> {
        let mut current = url.to_string();
        let mut remaining = MAX_REDIRECTS;

        loop {
            let response = self
                .client
                .get(current.as_str())
                .send()
                .await
                .map_err(|source| FetchError::Network {
                    url: current.clone(),
                    source,
                })?;

            let status = response.status();
            if is_redirect(status) {
                let next = redirect_target(&current, &response).ok_or_else(|| {
                    FetchError::MalformedRedirect {
                        url: current.clone(),
                    }
                })?;
                if remaining == 0 {
                    return Err(FetchError::TooManyRedirects {
                        url: url.to_string(),
                        limit: MAX_REDIRECTS,
                    });
                }
                remaining -= 1;
                debug!(from = %current, to = %next, remaining, "following redirect");
                current = next;
                continue;
            }

            if status != StatusCode::OK {
                return Err(FetchError::HttpStatus {
                    url: current,
                    code: status.as_u16(),
                });
            }

            let written = write_body(response, &current, staging).await?;
            tokio::fs::rename(staging, dest)
                .await
                .map_err(|source| FetchError::Io {
                    path: dest.to_path_buf(),
                    source,
                })?;

            info!(url = %current, dest = %dest.display(), bytes = written, "download complete");
            return Ok(());
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        // The body lands in a sibling staging file and is renamed into place once
        // complete, so `dest` is either whole or absent.
        let staging = staging_path(dest);
        let result = self.fetch_staged(url, dest, &staging).await;
        if result.is_err() {
            remove_staging(&staging).await;
        }
        result
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

fn redirect_target(current: &str, response: &Response) -> Option<String> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?.trim();
    if location.is_empty() {
        return None;
    }
    let base = Url::parse(current).ok()?;
    base.join(location).ok().map(String::from)
}

async fn write_body(mut response: Response, url: &str, staging: &Path) -> Result<u64, FetchError> {
    let io_err = |source| FetchError::Io {
        path: staging.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(staging).await.map_err(io_err)?;
    let mut written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?
    {
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(io_err)?;
    file.sync_all().await.map_err(io_err)?;
    Ok(written)
}

async fn remove_staging(staging: &Path) {
    match tokio::fs::remove_file(staging).await {
        Ok(()) => debug!(path = %staging.display(), "removed partial download"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(
            path = %staging.display(),
            "failed to remove partial download: {err}"
        ),
    }
}

fn staging_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("download"));
    name.push(".part");
    dest.with_file_name(name)
}
