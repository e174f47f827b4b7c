pub mod answer_file;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod options;
pub mod orchestrator;
pub mod request;
mod serde_helpers;
pub mod settings;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::info;
use tracing_subscriber::{FmtSubscriber, filter::LevelFilter};

pub use error::VsInstallError;

use crate::answer_file::TemplateLibrary;
use crate::config::Manifest;
use crate::executor::CommandExecutor;
use crate::host::Capabilities;
use crate::orchestrator::{InstallOutcome, Installer};
use crate::request::win_friendly_path;

pub fn init_logging(log_level: cli::LogLevel) -> Result<()> {
    let filter = match log_level {
        cli::LogLevel::Trace => LevelFilter::TRACE,
        cli::LogLevel::Debug => LevelFilter::DEBUG,
        cli::LogLevel::Info => LevelFilter::INFO,
        cli::LogLevel::Warn => LevelFilter::WARN,
        cli::LogLevel::Error => LevelFilter::ERROR,
    };

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(filter).finish(),
    )
    .context("failed to set global default tracing subscriber")
}

fn load_validated(file: &camino::Utf8Path) -> Result<Manifest> {
    let manifest = config::load_manifest(file)
        .with_context(|| format!("failed to load manifest from {}", file))?;
    manifest.validate().context("manifest validation failed")?;
    Ok(manifest)
}

/// Installs every request of `manifest`, in order, stopping at the first failure.
pub fn install_all(manifest: &Manifest, installer: &Installer) -> Result<Vec<InstallOutcome>> {
    let total = manifest.installs.len();
    let mut outcomes = Vec::with_capacity(total);
    for (index, request) in manifest.installs.iter().enumerate() {
        info!(
            "install {}/{}: {} {}",
            index + 1,
            total,
            request.edition,
            request.version
        );
        let outcome = installer
            .install(request, &manifest.settings)
            .with_context(|| {
                format!("failed to install {} {}", request.edition, request.version)
            })?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

pub fn run_install(opts: &cli::InstallArgs, executor: Arc<dyn CommandExecutor>) -> Result<()> {
    let manifest = load_validated(&opts.common.file)?;
    let caps = Capabilities::real(&manifest.settings, executor, opts.dry_run)?;
    let installer = Installer::new(caps, opts.dry_run);

    let outcomes = install_all(&manifest, &installer)?;
    let reboot_required = outcomes.iter().any(|o| {
        matches!(
            o,
            InstallOutcome::Installed {
                reboot_required: true,
                ..
            }
        )
    });
    if reboot_required {
        tracing::warn!("one or more installs require a reboot");
    }
    Ok(())
}

pub fn run_validate(opts: &cli::ValidateArgs) -> Result<()> {
    let manifest = load_validated(&opts.common.file)?;
    info!("validation successful:\n{:#?}", manifest);
    Ok(())
}

/// Prints the derived installer command line of each request to `out`.
///
/// Answer files are rendered but not written.
pub fn run_options(opts: &cli::OptionsArgs, out: &mut dyn Write) -> Result<()> {
    let manifest = load_validated(&opts.common.file)?;
    let renderer = TemplateLibrary::new(manifest.settings.template_dir.clone());
    for request in &manifest.installs {
        let plan = request
            .generation()
            .build_plan(request, &manifest.settings, &renderer)?;
        let exe = win_friendly_path(request.installer_exe(&manifest.settings));
        writeln!(out, "{} {}", exe, plan.options).context("failed to write options")?;
    }
    Ok(())
}

pub fn run_completions(opts: &cli::CompletionsArgs, out: &mut dyn Write) {
    let mut cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(opts.shell, &mut cmd, name, out);
}
