//! Options for MSI-era installers that take an AdminDeployment.xml file.

use anyhow::Result;

use super::{InstallPlan, OptionsBuilder};
use crate::answer_file::{TemplateRenderer, render_admin_deployment};
use crate::request::{InstallRequest, win_friendly_path};
use crate::settings::Settings;

/// Builds `/Q /norestart /noweb /log "<log>" /adminfile "<file>" [/productkey "<key>"]`.
pub fn build_plan(
    request: &InstallRequest,
    settings: &Settings,
    renderer: &dyn TemplateRenderer,
) -> Result<InstallPlan> {
    let answer_file = render_admin_deployment(renderer, request, settings)?;

    let mut builder = OptionsBuilder::new();
    builder.push_flag("/Q");
    builder.push_flag("/norestart");
    builder.push_flag("/noweb");
    builder.push_flag_quoted("/log", &win_friendly_path(request.install_log_file()));
    builder.push_flag_quoted("/adminfile", &win_friendly_path(&answer_file.path));

    if let Some(product_key) = request.product_key.as_deref().filter(|k| !k.is_empty()) {
        builder.push_flag_quoted("/productkey", &product_key.replace('-', ""));
    }

    Ok(InstallPlan {
        options: builder.into_options(),
        answer_files: vec![answer_file],
    })
}
