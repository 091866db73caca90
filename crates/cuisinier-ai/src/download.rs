//! Fetch startup artifacts over HTTP when they are not on disk yet.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Server { status: u16, url: String },
    #[error("writing artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Make sure `path` exists, downloading it from `url` if it does not.
///
/// Returns `true` when a download happened. An existing file is never
/// re-fetched. The body lands in `<file name>.part` next to `path` and is
/// renamed into place once complete; the partial file is removed if either
/// step fails.
pub async fn ensure_artifact(url: &str, path: &Path) -> Result<bool, DownloadError> {
    if path.exists() {
        return Ok(false);
    }

    info!(url, path = %path.display(), "downloading artifact");
    let resp = reqwest::get(url).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(DownloadError::Server {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let bytes = resp.bytes().await?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    write_via_partial(path, &bytes).await?;

    info!(bytes = bytes.len(), path = %path.display(), "artifact downloaded");
    Ok(true)
}

/// `model.json` -> `model.json.part`.
fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

async fn write_via_partial(path: &Path, bytes: &[u8]) -> Result<(), DownloadError> {
    let partial = partial_path(path);
    let result = async {
        tokio::fs::write(&partial, bytes).await?;
        tokio::fs::rename(&partial, path).await
    }
    .await;

    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }
    Ok(())
}
