//! Fetching of web installers and remote images.

use std::fs::{self, File};
use std::time::Duration;

use anyhow::{Context, Result};
use camino::Utf8Path;
use reqwest::blocking::Client;

use super::checksum::{matches_checksum, verify_checksum};
use crate::error::VsInstallError;
use crate::request::is_remote_source;

/// Connect timeout for downloads. Transfers of multi-gigabyte images are not
/// bounded.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for placing a source file at a destination path.
pub trait Downloader: Send + Sync {
    /// Fetches `source` (URL or local path) to `dest`, verifying `checksum`
    /// when given.
    fn download(&self, source: &str, checksum: Option<&str>, dest: &Utf8Path) -> Result<()>;
}

/// Downloader backed by a blocking reqwest client. Local paths are copied.
pub struct HttpDownloader {
    client: Client,
    dry_run: bool,
}

impl std::fmt::Debug for HttpDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDownloader")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl HttpDownloader {
    pub fn new(dry_run: bool) -> Result<Self, VsInstallError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None::<Duration>)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VsInstallError::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, dry_run })
    }

    fn fetch(&self, url: &str, partial: &Utf8Path) -> Result<()> {
        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| VsInstallError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let mut file = File::create(partial)
            .map_err(|e| VsInstallError::io(format!("failed to create file: {}", partial), e))?;
        let bytes = response.copy_to(&mut file).map_err(|e| VsInstallError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(bytes, "downloaded {}", url);
        Ok(())
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, source: &str, checksum: Option<&str>, dest: &Utf8Path) -> Result<()> {
        if let Some(expected) = checksum
            && matches_checksum(dest, expected)
        {
            tracing::info!("{} is up to date, skipping download", dest);
            return Ok(());
        }

        if self.dry_run {
            tracing::info!("dry run: download {} to {}", source, dest);
            return Ok(());
        }

        if let Some(parent) = dest.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| VsInstallError::io(format!("failed to create directory: {}", parent), e))?;
        }

        let partial = camino::Utf8PathBuf::from(format!("{}.part", dest));
        if is_remote_source(source) {
            tracing::info!("downloading {} to {}", source, dest);
            self.fetch(source, &partial)?;
        } else {
            tracing::info!("copying {} to {}", source, dest);
            fs::copy(source, &partial)
                .map_err(|e| VsInstallError::io(format!("failed to copy source: {}", source), e))?;
        }

        if let Some(expected) = checksum
            && let Err(e) = verify_checksum(&partial, expected)
        {
            if let Err(remove_err) = fs::remove_file(&partial) {
                tracing::warn!("failed to remove {}: {}", partial, remove_err);
            }
            return Err(e.into());
        }

        fs::rename(&partial, dest)
            .with_context(|| format!("failed to move {} to {}", partial, dest))?;
        Ok(())
    }
}
