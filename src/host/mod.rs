//! Host capabilities the orchestrator depends on.
//!
//! Each capability is a trait so tests can substitute recording fakes:
//! - [`ArchiveExtractor`]: unpack an image ([`SevenZipExtractor`])
//! - [`Downloader`]: fetch a web installer ([`HttpDownloader`])
//! - [`InstallProbe`]: detect an existing install ([`RegistryProbe`])

pub mod checksum;
pub mod download;
pub mod extract;
pub mod probe;

use std::sync::Arc;

use anyhow::Result;

pub use download::{Downloader, HttpDownloader};
pub use extract::{ArchiveExtractor, SevenZipExtractor};
pub use probe::{InstallProbe, RegistryProbe};

use crate::answer_file::{TemplateLibrary, TemplateRenderer};
use crate::executor::CommandExecutor;
use crate::settings::Settings;

/// The set of capabilities an install run uses.
#[derive(Clone)]
pub struct Capabilities {
    pub executor: Arc<dyn CommandExecutor>,
    pub extractor: Arc<dyn ArchiveExtractor>,
    pub downloader: Arc<dyn Downloader>,
    pub probe: Arc<dyn InstallProbe>,
    pub renderer: Arc<dyn TemplateRenderer>,
}

impl Capabilities {
    /// Wires the production implementations around `executor`.
    pub fn real(
        settings: &Settings,
        executor: Arc<dyn CommandExecutor>,
        dry_run: bool,
    ) -> Result<Self> {
        let downloader: Arc<dyn Downloader> = Arc::new(HttpDownloader::new(dry_run)?);
        let extractor = Arc::new(SevenZipExtractor::new(
            Arc::clone(&executor),
            Arc::clone(&downloader),
            settings.seven_zip.clone(),
            dry_run,
        ));
        Ok(Self {
            executor,
            extractor,
            downloader,
            probe: Arc::new(RegistryProbe),
            renderer: Arc::new(TemplateLibrary::new(settings.template_dir.clone())),
        })
    }
}
