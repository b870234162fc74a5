#![cfg(not(tarpaulin_include))]

use clap::Parser;
use sheetlens::app;
use sheetlens::config::Config;

/// Main entry point for the web application
///
/// Reads settings from the command line and environment, then serves the
/// CSV explorer until the process is stopped.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    app::run(config).await
}
