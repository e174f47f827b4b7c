//! Installer option builders.
//!
//! Visual Studio shipped three installer generations with incompatible
//! command lines. [`Generation`] is selected from the version string and
//! each variant derives an [`InstallPlan`]: the option string passed to the
//! installer and the answer files that must exist before it runs.
//!
//! Building a plan never writes to disk; the orchestrator writes the answer
//! files as a separate step.

mod args;
pub mod legacy;
pub mod vs2010;
pub mod vs2017;

use anyhow::Result;
use camino::Utf8PathBuf;
use strum::Display;

pub use args::OptionsBuilder;

use crate::answer_file::TemplateRenderer;
use crate::request::InstallRequest;
use crate::settings::Settings;

/// Installer generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Generation {
    /// MSI-era setup with an AdminDeployment.xml answer file (2012-2015, and any
    /// version not otherwise recognized)
    Legacy,
    /// 2010 setup with an INI-style unattend file
    V2010,
    /// 2017 bootstrapper with workload flags
    V2017,
}

impl Generation {
    /// Selects the generation for a version string.
    pub fn from_version(version: &str) -> Self {
        match version {
            "2010" => Self::V2010,
            "2017" => Self::V2017,
            _ => Self::Legacy,
        }
    }

    /// Derives the install plan for `request`.
    #[tracing::instrument(skip_all, fields(generation = %self, version = %request.version, edition = %request.edition))]
    pub fn build_plan(
        &self,
        request: &InstallRequest,
        settings: &Settings,
        renderer: &dyn TemplateRenderer,
    ) -> Result<InstallPlan> {
        let plan = match self {
            Self::Legacy => legacy::build_plan(request, settings, renderer)?,
            Self::V2010 => vs2010::build_plan(request, settings, renderer)?,
            Self::V2017 => vs2017::build_plan(request, settings),
        };
        tracing::debug!(options = %plan.options, "derived installer options");
        Ok(plan)
    }
}

/// A file that must be written before the installer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFile {
    pub path: Utf8PathBuf,
    pub contents: Vec<u8>,
}

/// Installer options plus the answer files they reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub options: String,
    pub answer_files: Vec<AnswerFile>,
}

impl InstallPlan {
    /// A plan that needs no answer files.
    pub fn options_only(options: impl Into<String>) -> Self {
        Self {
            options: options.into(),
            answer_files: Vec::new(),
        }
    }
}
