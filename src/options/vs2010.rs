//! Options for the 2010 installer.

use anyhow::Result;

use super::{InstallPlan, OptionsBuilder};
use crate::answer_file::{TemplateRenderer, render_unattend, unattend_path};
use crate::request::{InstallRequest, win_friendly_path};
use crate::settings::Settings;

/// Quiet flag used when no unattend file is configured.
pub const QUIET_FLAG: &str = "/q";

/// Builds `/q`, or `/unattendfile "<file>"` when `configure_basename` is set.
pub fn build_plan(
    request: &InstallRequest,
    settings: &Settings,
    renderer: &dyn TemplateRenderer,
) -> Result<InstallPlan> {
    let Some(basename) = request.configure_basename.as_deref() else {
        return Ok(InstallPlan::options_only(QUIET_FLAG));
    };

    let answer_files = render_unattend(renderer, request, settings, basename)?;
    let path = unattend_path(request, settings, basename);

    let mut builder = OptionsBuilder::new();
    builder.push_flag_quoted("/unattendfile", &win_friendly_path(path));

    Ok(InstallPlan {
        options: builder.into_options(),
        answer_files,
    })
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;
    use crate::error::VsInstallError;

    struct FixedRenderer;

    impl TemplateRenderer for FixedRenderer {
        fn render(
            &self,
            template_name: &str,
            context: &minijinja::Value,
        ) -> Result<String, VsInstallError> {
            let dir = context.get_attr("extracted_iso_dir").unwrap();
            Ok(format!("{}:{}", template_name, dir))
        }
    }

    #[test]
    fn test_quiet_without_basename() {
        let request = InstallRequest::new("ultimate", "2010");
        let plan = build_plan(&request, &Settings::default(), &FixedRenderer).unwrap();
        assert_eq!(plan.options, "/q");
        assert!(plan.answer_files.is_empty());
    }

    #[test]
    fn test_unattend_file() {
        let settings = Settings {
            unpack_dir: Some(Utf8PathBuf::from("D:/Unpack/VS")),
            ..Settings::default()
        };
        let mut request = InstallRequest::new("ultimate", "2010");
        request.configure_basename = Some("VS2010Deployment.ini".to_string());

        let plan = build_plan(&request, &settings, &FixedRenderer).unwrap();
        assert_eq!(plan.options, "/unattendfile \"D:\\Unpack\\VS\\VS2010Deployment.ini\"");
        assert_eq!(plan.answer_files.len(), 2);
        assert_eq!(plan.answer_files[0].path, "D:/Unpack/VS/VS2010Deployment.ini.tmp");
        assert_eq!(
            plan.answer_files[0].contents,
            b"VS2010Deployment.ini.j2:d:\\unpack\\vs"
        );
        assert_eq!(plan.answer_files[1].path, "D:/Unpack/VS/VS2010Deployment.ini");
    }
}
