//! Install requests and the paths derived from them.

use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::error::VsInstallError;
use crate::options::Generation;
use crate::serde_helpers::string_or_number;
use crate::settings::Settings;

/// Image extensions that are extracted instead of downloaded as an installer.
const EXTRACTABLE_EXTENSIONS: &[&str] = &["iso", "zip", "7z"];

/// URL schemes treated as remote sources.
const REMOTE_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Installer log file name, created under the install directory.
pub const INSTALL_LOG_FILE_NAME: &str = "vsinstall.log";

static SHA256_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{64}$").expect("valid checksum regex"));

/// One edition/version to install.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallRequest {
    /// Edition name (e.g., "professional", "enterprise")
    pub edition: String,
    /// Version identifier (e.g., "2010", "2013", "2017")
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    /// Local path or URL of the image or web installer
    #[serde(default)]
    pub source: Option<String>,
    /// Expected SHA-256 of the source
    #[serde(default)]
    pub checksum: Option<String>,
    /// Target installation directory
    #[serde(default)]
    pub install_dir: String,
    /// Product key, hyphens allowed
    #[serde(default)]
    pub product_key: Option<String>,
    /// Installer executable name, defaults to `vs_<edition>.exe`
    #[serde(default)]
    pub installer_file: Option<String>,
    /// Keep the extraction directory after installing
    #[serde(default)]
    pub preserve_extracted_files: bool,
    /// Base name of the 2010 unattend file and its template
    #[serde(default)]
    pub configure_basename: Option<String>,
    /// Display name used to detect an existing installation
    #[serde(default)]
    pub package_name: Option<String>,
}

/// Converts forward slashes to backslashes for paths handed to Windows tools.
pub fn win_friendly_path(path: impl AsRef<str>) -> String {
    path.as_ref().replace('/', "\\")
}

/// Returns true if `source` is an http(s) or ftp URL.
pub fn is_remote_source(source: &str) -> bool {
    Url::parse(source)
        .map(|url| REMOTE_SCHEMES.contains(&url.scheme()))
        .unwrap_or(false)
}

/// Returns the file name component of a local path or URL.
pub fn source_file_name(source: &str) -> Option<String> {
    let path = match Url::parse(source) {
        Ok(url) if REMOTE_SCHEMES.contains(&url.scheme()) || url.scheme() == "file" => {
            url.path().to_string()
        }
        _ => source.to_string(),
    };
    path.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Returns the extension of `source` without the leading dot.
///
/// Dotfiles such as `.iso` have no extension.
fn source_extension(source: &str) -> Option<String> {
    let name = source_file_name(source)?;
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_string()),
        _ => None,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl InstallRequest {
    /// Creates a request with only the required fields set.
    pub fn new(edition: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            edition: edition.into(),
            version: version.into(),
            source: None,
            checksum: None,
            install_dir: String::new(),
            product_key: None,
            installer_file: None,
            preserve_extracted_files: false,
            configure_basename: None,
            package_name: None,
        }
    }

    /// Returns the source, treating an empty string as absent.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns the checksum, treating an empty string as absent.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns true if the source is an `.iso`, `.zip`, or `.7z` image
    /// (case-insensitive).
    pub fn extractable_download(&self) -> bool {
        self.source()
            .and_then(source_extension)
            .is_some_and(|ext| {
                EXTRACTABLE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(&ext))
            })
    }

    /// Returns the installer generation selected by the version.
    pub fn generation(&self) -> Generation {
        Generation::from_version(&self.version)
    }

    /// Returns the name used for the "already installed" check.
    pub fn package_name(&self) -> String {
        match &self.package_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Microsoft Visual Studio {} {}", capitalize(&self.edition), self.version),
        }
    }

    /// Directory the image is extracted to (and the web installer downloaded to).
    pub fn extract_dir(&self, settings: &Settings) -> Utf8PathBuf {
        match &settings.unpack_dir {
            Some(dir) => dir.clone(),
            None => settings.cache_root().join(&self.version).join(&self.edition),
        }
    }

    /// Path of the installer executable.
    ///
    /// Joined to the extraction directory whenever a source is configured at
    /// all; without a source the bare file name is used.
    pub fn installer_exe(&self, settings: &Settings) -> Utf8PathBuf {
        let installer = match &self.installer_file {
            Some(file) => file.clone(),
            None => format!("vs_{}.exe", self.edition),
        };
        if self.source.is_some() {
            self.extract_dir(settings).join(installer)
        } else {
            Utf8PathBuf::from(installer)
        }
    }

    /// Installer log file under the install directory.
    ///
    /// Without an install directory the log goes to the root of the current
    /// drive (`\vsinstall.log`).
    pub fn install_log_file(&self) -> Utf8PathBuf {
        if self.install_dir.is_empty() {
            return Utf8PathBuf::from(format!("/{}", INSTALL_LOG_FILE_NAME));
        }
        Utf8Path::new(&self.install_dir).join(INSTALL_LOG_FILE_NAME)
    }

    /// Validates the request fields.
    pub fn validate(&self) -> Result<(), VsInstallError> {
        if self.edition.trim().is_empty() {
            return Err(VsInstallError::Validation("edition must not be empty".to_string()));
        }
        if self.version.trim().is_empty() {
            return Err(VsInstallError::Validation(format!(
                "version must not be empty for edition '{}'",
                self.edition
            )));
        }
        if let Some(checksum) = self.checksum()
            && !SHA256_HEX.is_match(checksum)
        {
            return Err(VsInstallError::Validation(format!(
                "checksum '{}' is not a SHA-256 hex digest",
                checksum
            )));
        }
        if let Some(basename) = &self.configure_basename {
            if basename.is_empty() || basename.contains(['/', '\\']) || basename == ".." {
                return Err(VsInstallError::Validation(format!(
                    "configure_basename '{}' must be a plain file name",
                    basename
                )));
            }
        }
        if let Some(installer) = &self.installer_file
            && installer.trim().is_empty()
        {
            return Err(VsInstallError::Validation(
                "installer_file must not be empty when set".to_string(),
            ));
        }
        Ok(())
    }
}
