//! Detection of already installed products.

use anyhow::Result;

/// Trait for checking whether a product is installed.
pub trait InstallProbe: Send + Sync {
    /// Returns true if a product with display name `package_name` is installed.
    fn is_installed(&self, package_name: &str) -> Result<bool>;
}

/// Probe that reads the display names under the Windows uninstall keys.
///
/// On other platforms nothing is ever reported as installed.
#[derive(Debug, Default)]
pub struct RegistryProbe;

#[cfg(windows)]
mod registry {
    use windows_registry::{CURRENT_USER, Key, LOCAL_MACHINE};

    const UNINSTALL_KEYS: &[&str] = &[
        r"Software\Microsoft\Windows\CurrentVersion\Uninstall",
        r"Software\Wow6432Node\Microsoft\Windows\CurrentVersion\Uninstall",
    ];

    fn display_names(root: &Key, path: &str) -> Vec<String> {
        let Ok(uninstall) = root.open(path) else {
            tracing::debug!(path, "uninstall key not present");
            return Vec::new();
        };
        let Ok(entries) = uninstall.keys() else {
            return Vec::new();
        };
        entries
            .filter_map(|entry| uninstall.open(&entry).ok())
            .filter_map(|entry| entry.get_string("DisplayName").ok())
            .collect()
    }

    pub(super) fn installed_display_names() -> Vec<String> {
        let mut names = Vec::new();
        for root in [LOCAL_MACHINE, CURRENT_USER] {
            for path in UNINSTALL_KEYS {
                names.extend(display_names(root, path));
            }
        }
        names
    }
}

impl InstallProbe for RegistryProbe {
    #[cfg(windows)]
    fn is_installed(&self, package_name: &str) -> Result<bool> {
        let installed = registry::installed_display_names()
            .iter()
            .any(|name| name == package_name);
        tracing::debug!(package_name, installed, "checked uninstall registry");
        Ok(installed)
    }

    #[cfg(not(windows))]
    fn is_installed(&self, package_name: &str) -> Result<bool> {
        tracing::debug!(package_name, "no uninstall registry on this platform");
        Ok(false)
    }
}
