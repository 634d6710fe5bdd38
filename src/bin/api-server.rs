use std::process::ExitCode;

use clap::Parser;
use tiered_relay::config::cli::ApiArgs;
use tiered_relay::http::UpstreamClient;
use tiered_relay::lifecycle::startup;
use tiered_relay::services::api;
use tiered_relay::StartupError;

#[tokio::main]
async fn main() -> ExitCode {
    startup::exit_code(run(ApiArgs::parse()).await)
}

async fn run(args: ApiArgs) -> Result<(), StartupError> {
    let config = args.service()?;
    let routes = api::router(args.api()?, UpstreamClient::new());
    startup::launch(api::NAME, config, routes).await
}
