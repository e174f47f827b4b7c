use std::process;
use std::sync::Arc;

use anyhow::Result;
use tracing::error;
use vsinstall::cli;
use vsinstall::executor::RealCommandExecutor;

fn main() -> Result<()> {
    let args = cli::parse_args()?;
    vsinstall::init_logging(args.command.log_level())?;

    let result = match &args.command {
        cli::Commands::Install(opts) => {
            let executor = Arc::new(RealCommandExecutor {
                dry_run: opts.dry_run,
            });
            vsinstall::run_install(opts, executor)
        }
        cli::Commands::Validate(opts) => vsinstall::run_validate(opts),
        cli::Commands::Options(opts) => vsinstall::run_options(opts, &mut std::io::stdout()),
        cli::Commands::Completions(opts) => {
            vsinstall::run_completions(opts, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}
