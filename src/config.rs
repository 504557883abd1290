use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "bank_account", version, about = "Single-account balance service over HTTP")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "BANK_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// JSON file holding the account
    #[arg(long, env = "BANK_STORE", default_value = "account.json")]
    pub store: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "BANK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
