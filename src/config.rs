#![cfg(feature = "web")]
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server settings, read from the command line with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "website")]
#[command(about = "Paste CSV, clean it through the analytics service, chart the result")]
#[command(version)]
pub struct Config {
    /// Address the web server listens on
    #[arg(long, env = "SHEETLENS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Base URL of the cleaning/summary service
    #[arg(long, env = "PYTHON_BACK", default_value = "http://127.0.0.1:5000")]
    pub backend_url: String,

    /// Timeout for calls to the cleaning service, in seconds
    #[arg(long, env = "SHEETLENS_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Directory served under /static
    #[arg(long, env = "SHEETLENS_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
