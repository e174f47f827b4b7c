use std::time::Duration;

use vsinstall::VsInstallError;
use vsinstall::executor::{
    CommandExecutor, CommandSpec, ExitOutcome, RealCommandExecutor, execute_checked,
};

#[test]
fn dry_run_skips_command_lookup() {
    let executor = RealCommandExecutor { dry_run: true };
    let spec = CommandSpec::raw("definitely-not-a-command", "/Q /norestart");

    let result = executor
        .execute(&spec)
        .expect("dry run should not require command to exist");
    assert_eq!(result.outcome, ExitOutcome::Skipped);
    assert!(result.code().is_none(), "dry run result should not have an exit code");
}

#[test]
fn non_dry_run_fails_for_nonexistent_command() {
    let executor = RealCommandExecutor { dry_run: false };
    let spec = CommandSpec::new("this-command-should-not-exist", Vec::new());

    let result = executor.execute(&spec);

    assert!(result.is_err());
    if let Err(e) = result {
        let msg = e.to_string();
        assert!(
            msg.contains("not found in PATH"),
            "Expected 'not found in PATH' in error, got: {}",
            msg
        );
        let typed = e.downcast_ref::<VsInstallError>();
        assert!(
            matches!(typed, Some(VsInstallError::CommandNotFound { .. })),
            "Expected CommandNotFound variant, got: {:?}",
            typed
        );
    }
}

#[cfg(unix)]
#[test]
fn raw_command_line_is_split_on_unix() {
    let executor = RealCommandExecutor { dry_run: false };
    let spec = CommandSpec::raw("sh", "-c \"exit 127\"")
        .with_timeout(Duration::from_secs(30))
        .with_success_codes(vsinstall::orchestrator::INSTALLER_SUCCESS_CODES);

    let result = execute_checked(&executor, &spec).expect("127 is an installer success code");
    assert_eq!(result.code(), Some(127));
}

#[cfg(unix)]
#[test]
fn execute_checked_reports_rejected_exit_code() {
    let executor = RealCommandExecutor { dry_run: false };
    let spec = CommandSpec::new("sh", vec!["-c".to_string(), "exit 127".to_string()])
        .with_success_codes(vsinstall::orchestrator::INSTALLER_SUCCESS_CODES);

    let result = execute_checked(&executor, &spec).expect("127 is accepted");
    assert_eq!(result.code(), Some(127));

    let strict = CommandSpec::new("sh", vec!["-c".to_string(), "exit 1".to_string()]);
    let err = execute_checked(&executor, &strict).unwrap_err();
    assert!(
        matches!(
            err.downcast_ref::<VsInstallError>(),
            Some(VsInstallError::Execution { .. })
        ),
        "Expected Execution variant, got: {:#}",
        err
    );
}
