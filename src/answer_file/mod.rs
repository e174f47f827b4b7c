//! Answer-file rendering.
//!
//! Legacy installers read an `AdminDeployment.xml` built from the merged item
//! configuration; the 2010 installer reads an INI-style unattend file that is
//! rendered from a user template and then re-encoded as UTF-16LE.

pub mod encoding;
pub mod merge;

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use minijinja::{Environment, UndefinedBehavior, context};
use serde_yaml::Value;

use crate::error::VsInstallError;
use crate::options::AnswerFile;
use crate::request::{InstallRequest, win_friendly_path};
use crate::settings::Settings;

pub use encoding::utf8_to_utf16le;
pub use merge::deep_merge;

/// File name of the legacy answer file.
pub const ADMIN_DEPLOYMENT_FILE_NAME: &str = "AdminDeployment.xml";

/// Template used to render [`ADMIN_DEPLOYMENT_FILE_NAME`].
pub const ADMIN_DEPLOYMENT_TEMPLATE: &str = "AdminDeployment.xml.j2";

/// Suffix appended to answer-file base names to find their template.
pub const TEMPLATE_SUFFIX: &str = ".j2";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[(
    ADMIN_DEPLOYMENT_TEMPLATE,
    include_str!("../../templates/AdminDeployment.xml.j2"),
)];

/// Trait for rendering answer-file templates.
///
/// Keeps the template engine and template lookup out of the option builders
/// so tests can substitute fixed output.
pub trait TemplateRenderer: Send + Sync {
    /// Renders the template `template_name` with `context`.
    fn render(
        &self,
        template_name: &str,
        context: &minijinja::Value,
    ) -> Result<String, VsInstallError>;
}

/// Renders templates from an optional user directory, falling back to the
/// templates built into the binary.
pub struct TemplateLibrary {
    env: Environment<'static>,
    template_dir: Option<Utf8PathBuf>,
}

impl std::fmt::Debug for TemplateLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateLibrary")
            .field("template_dir", &self.template_dir)
            .finish()
    }
}

impl TemplateLibrary {
    pub fn new(template_dir: Option<Utf8PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env, template_dir }
    }

    fn load_source(&self, template_name: &str) -> Result<String, VsInstallError> {
        if let Some(dir) = &self.template_dir {
            let path = dir.join(template_name);
            match fs::read_to_string(&path) {
                Ok(source) => {
                    tracing::debug!("loaded template from {}", path);
                    return Ok(source);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(VsInstallError::io(format!("failed to read template: {}", path), e));
                }
            }
        }

        BUILTIN_TEMPLATES
            .iter()
            .find(|(name, _)| *name == template_name)
            .map(|(_, source)| source.to_string())
            .ok_or_else(|| VsInstallError::Template {
                template: template_name.to_string(),
                reason: match &self.template_dir {
                    Some(dir) => format!("template not found in {} or built-in templates", dir),
                    None => "template not found in built-in templates".to_string(),
                },
            })
    }
}

impl TemplateRenderer for TemplateLibrary {
    fn render(
        &self,
        template_name: &str,
        context: &minijinja::Value,
    ) -> Result<String, VsInstallError> {
        let source = self.load_source(template_name)?;
        self.env
            .render_named_str(template_name, &source, context)
            .map_err(|err| VsInstallError::Template {
                template: template_name.to_string(),
                reason: format!("{:#}", err),
            })
    }
}

/// Returns the item set written to the legacy answer file: the version/edition
/// defaults with the global `install_items` layered on top.
pub fn merged_install_items(request: &InstallRequest, settings: &Settings) -> Value {
    let defaults =
        Value::Mapping(settings.default_install_items(&request.version, &request.edition));
    deep_merge(&defaults, &Value::Mapping(settings.install_items.clone()))
}

/// Path of the legacy answer file.
pub fn admin_deployment_path(request: &InstallRequest, settings: &Settings) -> Utf8PathBuf {
    request.extract_dir(settings).join(ADMIN_DEPLOYMENT_FILE_NAME)
}

/// Renders `AdminDeployment.xml` for a legacy installer.
pub fn render_admin_deployment(
    renderer: &dyn TemplateRenderer,
    request: &InstallRequest,
    settings: &Settings,
) -> Result<AnswerFile, VsInstallError> {
    let items = merged_install_items(request, settings);
    let ctx = context! {
        items => minijinja::Value::from_serialize(&items),
        version => request.version.as_str(),
        edition => request.edition.as_str(),
    };
    let rendered = renderer.render(ADMIN_DEPLOYMENT_TEMPLATE, &ctx)?;
    Ok(AnswerFile {
        path: admin_deployment_path(request, settings),
        contents: rendered.into_bytes(),
    })
}

/// Path of the 2010 unattend file for `basename`.
pub fn unattend_path(request: &InstallRequest, settings: &Settings, basename: &str) -> Utf8PathBuf {
    request.extract_dir(settings).join(basename)
}

/// Path of the UTF-8 intermediate written next to an unattend file.
pub fn unattend_tmp_path(final_path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}.tmp", final_path))
}

/// Renders the 2010 unattend file.
///
/// Returns the UTF-8 rendering at `<basename>.tmp` followed by its UTF-16LE
/// conversion at `<basename>`. Both are written; the intermediate stays on disk.
pub fn render_unattend(
    renderer: &dyn TemplateRenderer,
    request: &InstallRequest,
    settings: &Settings,
    basename: &str,
) -> Result<Vec<AnswerFile>, VsInstallError> {
    let extracted_iso_dir = win_friendly_path(request.extract_dir(settings)).to_lowercase();
    let ctx = context! { extracted_iso_dir => extracted_iso_dir };
    let template_name = format!("{}{}", basename, TEMPLATE_SUFFIX);
    let rendered = renderer.render(&template_name, &ctx)?;

    let final_path = unattend_path(request, settings, basename);
    let converted = utf8_to_utf16le(&rendered);
    Ok(vec![
        AnswerFile {
            path: unattend_tmp_path(&final_path),
            contents: rendered.into_bytes(),
        },
        AnswerFile {
            path: final_path,
            contents: converted,
        },
    ])
}
