use std::path::PathBuf;

use clap::Parser;

/// Filter used when `RUST_LOG` is unset. The `reclamation` target prefix
/// covers the binary and every `reclamation_*` crate.
pub const DEFAULT_LOG_FILTER: &str = "reclamation=info";

#[derive(Debug, Parser)]
#[command(name = "reclamation", about = "Service-center equipment complaint form")]
pub struct Config {
    /// Server hosting the /send-to-bitrix endpoint
    #[arg(long, env = "RECLAMATION_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    pub server_url: String,

    /// Run outside the host container: nothing is told to close on success
    #[arg(long)]
    pub standalone: bool,

    /// Log file (the terminal itself is taken by the form)
    #[arg(long, env = "RECLAMATION_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("reclamation.log"))
    }
}
