//! Installation of a single request.
//!
//! [`Installer::install`] runs a fixed, linear sequence:
//!
//! 1. skip everything if the product is already installed,
//! 2. extract the image, or download the web installer,
//! 3. create the install directory,
//! 4. write answer files and run the installer,
//! 5. remove the extraction directory.
//!
//! Any failure stops the sequence. Partial side effects are left in place.

use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::error::VsInstallError;
use crate::executor::{CommandSpec, execute_checked};
use crate::host::Capabilities;
use crate::options::{AnswerFile, InstallPlan};
use crate::request::InstallRequest;
use crate::settings::Settings;

/// Exit codes the vendor installers use for success.
pub const INSTALLER_SUCCESS_CODES: &[i32] = &[0, 127, 3010];

/// Exit code signalling success with a pending reboot.
pub const REBOOT_REQUIRED_CODE: i32 = 3010;

/// A side effect performed by an install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Extract { source: String, dest: Utf8PathBuf },
    Download { source: String, dest: Utf8PathBuf },
    CreateInstallDir(Utf8PathBuf),
    WriteAnswerFile(Utf8PathBuf),
    RunInstaller { command: String, options: String },
    RemoveExtractDir(Utf8PathBuf),
}

/// What an install run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The product was already installed; nothing was done.
    AlreadyInstalled,
    /// The installer ran.
    Installed {
        steps: Vec<Step>,
        reboot_required: bool,
    },
}

/// Runs install requests against a set of capabilities.
pub struct Installer {
    caps: Capabilities,
    dry_run: bool,
}

impl Installer {
    pub fn new(caps: Capabilities, dry_run: bool) -> Self {
        Self { caps, dry_run }
    }

    /// Derives the plan for `request` without touching the filesystem.
    pub fn plan(&self, request: &InstallRequest, settings: &Settings) -> Result<InstallPlan> {
        request
            .generation()
            .build_plan(request, settings, self.caps.renderer.as_ref())
    }

    /// Installs `request`.
    #[tracing::instrument(skip_all, fields(edition = %request.edition, version = %request.version))]
    pub fn install(&self, request: &InstallRequest, settings: &Settings) -> Result<InstallOutcome> {
        let package_name = request.package_name();
        if self
            .caps
            .probe
            .is_installed(&package_name)
            .with_context(|| format!("failed to check whether {} is installed", package_name))?
        {
            info!("{} is already installed, nothing to do", package_name);
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        info!("installing {}", package_name);
        let mut steps = Vec::new();
        let extract_dir = request.extract_dir(settings);
        let installer_exe = request.installer_exe(settings);
        let extracted = request.source().is_some() && request.extractable_download();

        if let Some(source) = request.source() {
            if extracted {
                self.caps
                    .extractor
                    .extract(source, request.checksum(), &extract_dir)
                    .with_context(|| format!("failed to extract {}", source))?;
                steps.push(Step::Extract {
                    source: source.to_string(),
                    dest: extract_dir.clone(),
                });
            } else {
                self.caps
                    .downloader
                    .download(source, request.checksum(), &installer_exe)
                    .with_context(|| format!("failed to download {}", source))?;
                steps.push(Step::Download {
                    source: source.to_string(),
                    dest: installer_exe.clone(),
                });
            }
        }

        if !request.install_dir.is_empty() {
            let install_dir = Utf8PathBuf::from(&request.install_dir);
            self.create_dir_all(&install_dir)?;
            steps.push(Step::CreateInstallDir(install_dir));
        }

        let plan = self.plan(request, settings)?;
        for answer_file in &plan.answer_files {
            self.write_answer_file(answer_file)?;
            steps.push(Step::WriteAnswerFile(answer_file.path.clone()));
        }

        let spec = CommandSpec::raw(installer_exe.as_str(), plan.options.as_str())
            .with_timeout(settings.installer_timeout())
            .with_success_codes(INSTALLER_SUCCESS_CODES);
        info!("running {}", installer_exe);
        let result = execute_checked(self.caps.executor.as_ref(), &spec)
            .with_context(|| format!("installer failed for {}", package_name))?;
        steps.push(Step::RunInstaller {
            command: installer_exe.to_string(),
            options: plan.options.clone(),
        });

        let reboot_required = result.code() == Some(REBOOT_REQUIRED_CODE);
        if reboot_required {
            tracing::warn!("{} installed, a reboot is required to finish", package_name);
        }

        if extracted && !request.preserve_extracted_files {
            self.remove_dir_all(&extract_dir)?;
            steps.push(Step::RemoveExtractDir(extract_dir));
        }

        info!("finished installing {}", package_name);
        Ok(InstallOutcome::Installed {
            steps,
            reboot_required,
        })
    }

    fn create_dir_all(&self, dir: &Utf8Path) -> Result<()> {
        if self.dry_run {
            info!("dry run: create directory {}", dir);
            return Ok(());
        }
        fs::create_dir_all(dir)
            .map_err(|e| VsInstallError::io(format!("failed to create directory: {}", dir), e))?;
        Ok(())
    }

    fn write_answer_file(&self, file: &AnswerFile) -> Result<()> {
        if self.dry_run {
            info!("dry run: write answer file {} ({} bytes)", file.path, file.contents.len());
            return Ok(());
        }
        if let Some(parent) = file.path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| VsInstallError::io(format!("failed to create directory: {}", parent), e))?;
        }
        fs::write(&file.path, &file.contents)
            .map_err(|e| VsInstallError::io(format!("failed to write answer file: {}", file.path), e))?;
        tracing::debug!("wrote answer file {}", file.path);
        Ok(())
    }

    fn remove_dir_all(&self, dir: &Utf8Path) -> Result<()> {
        if self.dry_run {
            info!("dry run: remove directory {}", dir);
            return Ok(());
        }
        match fs::remove_dir_all(dir) {
            Ok(()) => {
                info!("removed extracted files in {}", dir);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("extraction directory already removed: {}", dir);
                Ok(())
            }
            Err(e) => Err(VsInstallError::io(format!("failed to remove directory: {}", dir), e).into()),
        }
    }
}
