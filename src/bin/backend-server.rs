use std::process::ExitCode;

use clap::Parser;
use tiered_relay::config::cli::BackendArgs;
use tiered_relay::http::UpstreamClient;
use tiered_relay::lifecycle::startup;
use tiered_relay::services::backend;
use tiered_relay::StartupError;

#[tokio::main]
async fn main() -> ExitCode {
    startup::exit_code(run(BackendArgs::parse()).await)
}

async fn run(args: BackendArgs) -> Result<(), StartupError> {
    let config = args.service()?;
    let routes = backend::router(args.backend()?, UpstreamClient::new());
    startup::launch(backend::NAME, config, routes).await
}
