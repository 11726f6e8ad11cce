mod automation;
mod cli;
mod config;
mod error;
mod github;
mod logging;
mod model;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;

/// Usage errors exit 1 like any other failure; `--help` and `--version` exit 0.
fn usage_exit_status(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// 0 only when the action ran and reported success.
fn exit_status(result: &anyhow::Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) | Err(_) => 1,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_exit_status(&e));
        }
    };

    logging::init(cli.verbose);

    let result = cli::run(cli).await;
    if let Err(e) = &result {
        eprintln!("error: {e:#}");
    }
    ExitCode::from(exit_status(&result))
}
