//! Manifest loading and validation.

use std::fs::File;
use std::io::BufReader;

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::VsInstallError;
use crate::request::InstallRequest;
use crate::settings::Settings;

/// A manifest: shared settings plus the editions to install.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub installs: Vec<InstallRequest>,
}

impl Manifest {
    /// Validates every install request.
    pub fn validate(&self) -> Result<(), VsInstallError> {
        if self.installs.is_empty() {
            return Err(VsInstallError::Validation(
                "manifest must contain at least one install".to_string(),
            ));
        }
        for (index, request) in self.installs.iter().enumerate() {
            request.validate().map_err(|e| match e {
                VsInstallError::Validation(msg) => {
                    VsInstallError::Validation(format!("install {}: {}", index + 1, msg))
                }
                other => other,
            })?;
        }
        if self.settings.installer_timeout_secs == 0 {
            return Err(VsInstallError::Validation(
                "installer_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads a manifest from a YAML file.
///
/// Relative paths in the settings are resolved against the manifest's
/// directory.
pub fn load_manifest(path: &Utf8Path) -> Result<Manifest, VsInstallError> {
    let file = File::open(path).map_err(|e| VsInstallError::io(path.to_string(), e))?;
    let reader = BufReader::new(file);
    let mut manifest: Manifest = serde_yaml::from_reader(reader)
        .map_err(|e| VsInstallError::Config(format!("YAML parse error in {}: {}", path, e)))?;

    let base = path.parent().unwrap_or(Utf8Path::new("."));
    manifest.settings.resolve_paths(base);
    Ok(manifest)
}

/// Parses a manifest from a YAML string (no path resolution).
pub fn parse_manifest(yaml: &str) -> Result<Manifest, VsInstallError> {
    serde_yaml::from_str(yaml).map_err(|e| VsInstallError::Config(format!("YAML parse error: {}", e)))
}
