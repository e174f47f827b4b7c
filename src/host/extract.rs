//! Extraction of ISO/zip/7z images with 7-Zip.

use std::sync::Arc;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use which::which;

use super::checksum::verify_checksum;
use super::download::Downloader;
use crate::error::VsInstallError;
use crate::executor::{CommandExecutor, CommandSpec, execute_checked};
use crate::request::{is_remote_source, source_file_name};

/// Executable name looked up on `PATH`.
const SEVEN_ZIP_COMMAND: &str = "7z";

/// Default install location of 7-Zip on Windows.
const SEVEN_ZIP_DEFAULT_PATH: &str = r"C:\Program Files\7-Zip\7z.exe";

/// Directory (next to the extraction directory) remote images are fetched into.
const DOWNLOAD_DIR_SUFFIX: &str = ".download";

/// Trait for unpacking an image into a directory.
pub trait ArchiveExtractor: Send + Sync {
    /// Extracts `source` (local path or URL) into `dest`, overwriting existing
    /// files. `checksum` is verified before extraction.
    fn extract(&self, source: &str, checksum: Option<&str>, dest: &Utf8Path) -> Result<()>;
}

/// Extractor that runs `7z x`.
pub struct SevenZipExtractor {
    executor: Arc<dyn CommandExecutor>,
    downloader: Arc<dyn Downloader>,
    seven_zip: Option<Utf8PathBuf>,
    dry_run: bool,
}

impl SevenZipExtractor {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        downloader: Arc<dyn Downloader>,
        seven_zip: Option<Utf8PathBuf>,
        dry_run: bool,
    ) -> Self {
        Self {
            executor,
            downloader,
            seven_zip,
            dry_run,
        }
    }

    /// Resolves the 7-Zip executable: configured path, then `PATH`, then the
    /// default install location.
    pub fn seven_zip_command(&self) -> String {
        if let Some(path) = &self.seven_zip {
            return path.to_string();
        }
        if which(SEVEN_ZIP_COMMAND).is_ok() {
            return SEVEN_ZIP_COMMAND.to_string();
        }
        SEVEN_ZIP_DEFAULT_PATH.to_string()
    }

    /// Builds the `7z x` arguments for `archive` into `dest`.
    pub fn build_args(archive: &str, dest: &Utf8Path) -> Vec<String> {
        vec![
            "x".to_string(),
            "-y".to_string(),
            format!("-o{}", dest),
            archive.to_string(),
        ]
    }

    /// Returns a local path for `source`, fetching remote images first.
    fn local_archive(&self, source: &str, checksum: Option<&str>, dest: &Utf8Path) -> Result<String> {
        if !is_remote_source(source) {
            if let Some(expected) = checksum
                && !self.dry_run
            {
                verify_checksum(Utf8Path::new(source), expected)?;
            }
            return Ok(source.to_string());
        }

        let file_name = source_file_name(source).ok_or_else(|| {
            VsInstallError::Validation(format!("cannot derive a file name from source: {}", source))
        })?;
        let download_dir = Utf8PathBuf::from(format!("{}{}", dest, DOWNLOAD_DIR_SUFFIX));
        let local = download_dir.join(file_name);
        self.downloader
            .download(source, checksum, &local)
            .with_context(|| format!("failed to fetch image {}", source))?;
        Ok(local.to_string())
    }
}

impl ArchiveExtractor for SevenZipExtractor {
    fn extract(&self, source: &str, checksum: Option<&str>, dest: &Utf8Path) -> Result<()> {
        let archive = self.local_archive(source, checksum, dest)?;
        tracing::info!("extracting {} to {}", archive, dest);

        let spec = CommandSpec::new(self.seven_zip_command(), Self::build_args(&archive, dest));
        execute_checked(self.executor.as_ref(), &spec)
            .with_context(|| format!("failed to extract {}", archive))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::executor::ExecutionResult;

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<CommandSpec>>,
    }

    impl CommandExecutor for RecordingExecutor {
        fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult> {
            self.calls.lock().unwrap().push(spec.clone());
            Ok(ExecutionResult::exited(0))
        }
    }

    #[derive(Default)]
    struct RecordingDownloader {
        calls: Mutex<Vec<(String, Utf8PathBuf)>>,
    }

    impl Downloader for RecordingDownloader {
        fn download(&self, source: &str, _checksum: Option<&str>, dest: &Utf8Path) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_string(), dest.to_path_buf()));
            Ok(())
        }
    }

    #[test]
    fn test_build_args() {
        assert_eq!(
            SevenZipExtractor::build_args("D:\\vs2013.iso", Utf8Path::new("C:/cache/2013/pro")),
            vec!["x", "-y", "-oC:/cache/2013/pro", "D:\\vs2013.iso"]
        );
    }

    #[test]
    fn test_configured_seven_zip_wins() {
        let extractor = SevenZipExtractor::new(
            Arc::new(RecordingExecutor::default()),
            Arc::new(RecordingDownloader::default()),
            Some(Utf8PathBuf::from("D:/tools/7z.exe")),
            false,
        );
        assert_eq!(extractor.seven_zip_command(), "D:/tools/7z.exe");
    }

    #[test]
    fn test_local_image_is_extracted_directly() {
        let executor = Arc::new(RecordingExecutor::default());
        let downloader = Arc::new(RecordingDownloader::default());
        let extractor = SevenZipExtractor::new(
            executor.clone(),
            downloader.clone(),
            Some(Utf8PathBuf::from("7z")),
            true,
        );

        extractor
            .extract("D:\\media\\vs2015.iso", None, Utf8Path::new("/cache/2015/pro"))
            .unwrap();

        assert!(downloader.calls.lock().unwrap().is_empty());
        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, "7z");
    }

    #[test]
    fn test_checksum_mismatch_skips_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let image = root.join("vs.iso");
        std::fs::write(&image, b"tampered image").unwrap();

        let executor = Arc::new(RecordingExecutor::default());
        let extractor = SevenZipExtractor::new(
            executor.clone(),
            Arc::new(RecordingDownloader::default()),
            Some(Utf8PathBuf::from("7z")),
            false,
        );

        let wrong = "a".repeat(64);
        let err = extractor
            .extract(image.as_str(), Some(wrong.as_str()), &root.join("unpacked"))
            .unwrap_err();

        assert!(
            matches!(
                err.downcast_ref::<VsInstallError>(),
                Some(VsInstallError::Checksum { .. })
            ),
            "got: {:#}",
            err
        );
        assert!(executor.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_remote_image_is_fetched_first() {
        let executor = Arc::new(RecordingExecutor::default());
        let downloader = Arc::new(RecordingDownloader::default());
        let extractor = SevenZipExtractor::new(
            executor.clone(),
            downloader.clone(),
            Some(Utf8PathBuf::from("7z")),
            false,
        );

        extractor
            .extract("https://example.com/media/vs2015.iso", None, Utf8Path::new("/cache/2015/pro"))
            .unwrap();

        let downloads = downloader.calls.lock().unwrap();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].1, "/cache/2015/pro.download/vs2015.iso");

        let calls = executor.calls.lock().unwrap();
        assert_eq!(
            calls[0].args,
            crate::executor::CommandArgs::List(SevenZipExtractor::build_args(
                "/cache/2015/pro.download/vs2015.iso",
                Utf8Path::new("/cache/2015/pro")
            ))
        );
    }
}
