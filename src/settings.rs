//! Configuration tree shared by every install request in a manifest.
//!
//! The tree is keyed by version, then edition, then install item:
//!
//! ```yaml
//! install_items: {}
//! versions:
//!   "2017":
//!     includeRecommended: true
//!     enterprise:
//!       default_install_items:
//!         Microsoft.VisualStudio.Workload.NativeDesktop:
//!           selected: true
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde_yaml::Mapping;

use crate::serde_helpers::string_keyed_map;

/// Default timeout for the vendor installer process, in seconds.
pub const DEFAULT_INSTALLER_TIMEOUT_SECS: u64 = 3600;

/// Directory name used under the system temp dir when no cache path is set.
const DEFAULT_CACHE_DIR_NAME: &str = "vsinstall";

fn default_installer_timeout_secs() -> u64 {
    DEFAULT_INSTALLER_TIMEOUT_SECS
}

/// Global settings and per-version defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base directory for extracted images (`<file_cache_path>/<version>/<edition>`)
    #[serde(default)]
    pub file_cache_path: Option<Utf8PathBuf>,
    /// Replaces the version/edition scoped extraction directory entirely
    #[serde(default)]
    pub unpack_dir: Option<Utf8PathBuf>,
    /// Directory searched for answer-file templates before the built-in ones
    #[serde(default)]
    pub template_dir: Option<Utf8PathBuf>,
    /// Explicit path to the 7-Zip executable
    #[serde(default)]
    pub seven_zip: Option<Utf8PathBuf>,
    /// Installer process timeout
    #[serde(default = "default_installer_timeout_secs")]
    pub installer_timeout_secs: u64,
    /// Item overrides layered on top of every edition's defaults (legacy installers)
    #[serde(default)]
    pub install_items: Mapping,
    /// Per-version settings keyed by version string
    #[serde(default, deserialize_with = "string_keyed_map")]
    pub versions: BTreeMap<String, VersionSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_cache_path: None,
            unpack_dir: None,
            template_dir: None,
            seven_zip: None,
            installer_timeout_secs: DEFAULT_INSTALLER_TIMEOUT_SECS,
            install_items: Mapping::new(),
            versions: BTreeMap::new(),
        }
    }
}

/// Settings for one Visual Studio version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionSettings {
    #[serde(default)]
    pub all: bool,
    #[serde(default, rename = "allWorkloads")]
    pub all_workloads: bool,
    #[serde(default, rename = "includeRecommended")]
    pub include_recommended: bool,
    #[serde(default, rename = "includeOptional")]
    pub include_optional: bool,
    /// Editions keyed by name (e.g., `professional`)
    #[serde(flatten)]
    pub editions: BTreeMap<String, EditionSettings>,
}

/// Settings for one edition of a version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditionSettings {
    /// Ordered mapping of item name to item attributes (at least `selected`)
    #[serde(default)]
    pub default_install_items: Mapping,
}

impl Settings {
    /// Returns the settings of `version`, if configured.
    pub fn version(&self, version: &str) -> Option<&VersionSettings> {
        self.versions.get(version)
    }

    /// Returns the default install items of `version`/`edition`.
    ///
    /// A missing version or edition yields an empty mapping.
    pub fn default_install_items(&self, version: &str, edition: &str) -> Mapping {
        match self.version(version).and_then(|v| v.editions.get(edition)) {
            Some(edition_settings) => edition_settings.default_install_items.clone(),
            None => {
                tracing::warn!(
                    version,
                    edition,
                    "no default install items configured, using an empty item set"
                );
                Mapping::new()
            }
        }
    }

    /// Returns the base directory for default extraction directories.
    pub fn cache_root(&self) -> Utf8PathBuf {
        match &self.file_cache_path {
            Some(path) => path.clone(),
            None => {
                let tmp = std::env::temp_dir();
                let tmp = Utf8PathBuf::from_path_buf(tmp)
                    .unwrap_or_else(|p| Utf8PathBuf::from(p.to_string_lossy().into_owned()));
                tmp.join(DEFAULT_CACHE_DIR_NAME)
            }
        }
    }

    /// Returns the installer timeout as a `Duration`.
    pub fn installer_timeout(&self) -> Duration {
        Duration::from_secs(self.installer_timeout_secs)
    }

    /// Resolves relative paths against `base` (usually the manifest's directory).
    pub(crate) fn resolve_paths(&mut self, base: &Utf8Path) {
        if let Some(dir) = &self.template_dir
            && dir.is_relative()
        {
            self.template_dir = Some(base.join(dir));
        }
    }
}
