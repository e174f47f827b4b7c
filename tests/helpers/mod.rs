use std::sync::{Arc, Mutex};

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use vsinstall::answer_file::TemplateLibrary;
use vsinstall::config::Manifest;
use vsinstall::executor::{CommandExecutor, CommandSpec, ExecutionResult};
use vsinstall::host::{ArchiveExtractor, Capabilities, Downloader, InstallProbe};

/// Executor that records every command and answers with a fixed exit code.
#[allow(dead_code)]
pub struct RecordingExecutor {
    pub calls: Mutex<Vec<CommandSpec>>,
    pub exit_code: i32,
}

#[allow(dead_code)]
impl RecordingExecutor {
    pub fn with_exit_code(exit_code: i32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_code,
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok(ExecutionResult::exited(self.exit_code))
    }
}

/// Records `(source, checksum, dest)` for extractions and downloads.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingTransfer {
    pub calls: Mutex<Vec<(String, Option<String>, Utf8PathBuf)>>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingTransfer {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, Option<String>, Utf8PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, source: &str, checksum: Option<&str>, dest: &Utf8Path) -> Result<()> {
        self.calls.lock().unwrap().push((
            source.to_string(),
            checksum.map(str::to_string),
            dest.to_path_buf(),
        ));
        if self.fail {
            anyhow::bail!("transfer of {} failed", source);
        }
        Ok(())
    }
}

impl ArchiveExtractor for RecordingTransfer {
    fn extract(&self, source: &str, checksum: Option<&str>, dest: &Utf8Path) -> Result<()> {
        self.record(source, checksum, dest)
    }
}

impl Downloader for RecordingTransfer {
    fn download(&self, source: &str, checksum: Option<&str>, dest: &Utf8Path) -> Result<()> {
        self.record(source, checksum, dest)
    }
}

/// Probe reporting a fixed list of installed package names.
#[derive(Default)]
#[allow(dead_code)]
pub struct FixedProbe {
    pub installed: Vec<String>,
}

impl InstallProbe for FixedProbe {
    fn is_installed(&self, package_name: &str) -> Result<bool> {
        Ok(self.installed.iter().any(|name| name == package_name))
    }
}

/// Fakes wired into a `Capabilities`, kept around for assertions.
#[allow(dead_code)]
pub struct Fakes {
    pub executor: Arc<RecordingExecutor>,
    pub extractor: Arc<RecordingTransfer>,
    pub downloader: Arc<RecordingTransfer>,
    pub probe: Arc<FixedProbe>,
}

#[allow(dead_code)]
impl Fakes {
    pub fn new(exit_code: i32) -> Self {
        Self {
            executor: Arc::new(RecordingExecutor::with_exit_code(exit_code)),
            extractor: Arc::new(RecordingTransfer::default()),
            downloader: Arc::new(RecordingTransfer::default()),
            probe: Arc::new(FixedProbe::default()),
        }
    }

    pub fn capabilities(&self, template_dir: Option<Utf8PathBuf>) -> Capabilities {
        Capabilities {
            executor: self.executor.clone(),
            extractor: self.extractor.clone(),
            downloader: self.downloader.clone(),
            probe: self.probe.clone(),
            renderer: Arc::new(TemplateLibrary::new(template_dir)),
        }
    }
}

/// Returns a UTF-8 path to a fresh temporary directory.
#[allow(dead_code)]
pub fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
    (dir, path)
}

/// Writes `yaml` to a temporary manifest file and loads it.
#[allow(dead_code)]
pub fn load_manifest_from_yaml(yaml: &str) -> Result<Manifest, vsinstall::VsInstallError> {
    let (_dir, root) = utf8_tempdir();
    let path = root.join("manifest.yml");
    std::fs::write(&path, yaml).expect("write manifest");
    vsinstall::config::load_manifest(&path)
}
