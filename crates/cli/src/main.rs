mod cmd;
mod context;
mod util;

use std::process::ExitCode;

use argp::FromArgs;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(FromArgs, PartialEq, Debug)]
/// Enforce path-based approval requirements on pull requests.
struct TopLevel {
    #[argp(subcommand)]
    command: SubCommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argp(subcommand)]
enum SubCommand {
    Check(cmd::check::Args),
    Validate(cmd::validate::Args),
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::builder()
        // Default to info level
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    // The runner timestamps every line already.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_filter(env_filter),
        )
        .init();

    let args: TopLevel = argp::parse_args_or_exit(argp::DEFAULT);
    let result = match args.command {
        SubCommand::Check(args) => cmd::check::run(args).await,
        SubCommand::Validate(args) => cmd::validate::run(args).map(|()| ExitCode::SUCCESS),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:?}");
            println!("::error::Action failed with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
