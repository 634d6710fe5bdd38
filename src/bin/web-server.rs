use std::process::ExitCode;

use clap::Parser;
use tiered_relay::config::cli::WebArgs;
use tiered_relay::http::UpstreamClient;
use tiered_relay::lifecycle::startup;
use tiered_relay::services::web;
use tiered_relay::StartupError;

#[tokio::main]
async fn main() -> ExitCode {
    startup::exit_code(run(WebArgs::parse()).await)
}

async fn run(args: WebArgs) -> Result<(), StartupError> {
    let config = args.service()?;
    let routes = web::router(args.web()?, UpstreamClient::new());
    startup::launch(web::NAME, config, routes).await
}
