//! 2017 bootstrapper options.

use serde_yaml::Value;

use super::{InstallPlan, OptionsBuilder};
use crate::request::InstallRequest;
use crate::settings::Settings;

/// Returns true if an item's attributes mark it as selected.
fn is_selected(attributes: &Value) -> bool {
    attributes
        .get("selected")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Builds `--norestart --passive --wait [--installPath "<dir>"] [global flags] [--add <item>]...`.
///
/// Only items of the version/edition default item set are considered; the
/// global `install_items` overrides apply to legacy answer files.
pub fn build_plan(request: &InstallRequest, settings: &Settings) -> InstallPlan {
    let mut builder = OptionsBuilder::new();
    builder.push_flag("--norestart");
    builder.push_flag("--passive");
    builder.push_flag("--wait");

    if !request.install_dir.is_empty() {
        builder.push_flag_quoted("--installPath", &request.install_dir);
    }

    if let Some(version) = settings.version(&request.version) {
        builder.push_flag_if("--all", version.all);
        builder.push_flag_if("--allWorkloads", version.all_workloads);
        builder.push_flag_if("--includeRecommended", version.include_recommended);
        builder.push_flag_if("--includeOptional", version.include_optional);
    }

    let items = settings.default_install_items(&request.version, &request.edition);
    for (name, attributes) in &items {
        if !is_selected(attributes) {
            continue;
        }
        if let Some(name) = crate::serde_helpers::scalar_to_string(name) {
            builder.push_flag_value("--add", &name);
        }
    }

    InstallPlan::options_only(builder.into_options())
}
