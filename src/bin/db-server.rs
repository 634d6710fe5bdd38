use std::process::ExitCode;

use clap::Parser;
use tiered_relay::config::cli::DbArgs;
use tiered_relay::lifecycle::startup;
use tiered_relay::services::db;
use tiered_relay::StartupError;

#[tokio::main]
async fn main() -> ExitCode {
    startup::exit_code(run(DbArgs::parse()).await)
}

async fn run(args: DbArgs) -> Result<(), StartupError> {
    let config = args.service()?;
    startup::launch(db::NAME, config, db::router()).await
}
