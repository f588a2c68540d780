use clap::Parser;
use dotenvy::dotenv;

use vncrevolver::cli::Cli;
use vncrevolver::config::Config;
use vncrevolver::error::AppError;
use vncrevolver::logging::init_logging;
use vncrevolver::runner;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging();

    let config = Config::from_env()
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        });

    tracing::debug!("Starting with config: {:?}", config);

    let result = match cli.into_request(&config) {
        Ok(request) => runner::run(request, &config).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
