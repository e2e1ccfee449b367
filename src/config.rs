//! Server configuration

use crate::cli::CLIError;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATA_DIR: &str = "data";

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Interface to listen on (env: BIND_ADDRESS)
    pub bind_address: String,
    /// HTTP port (env: PORT)
    pub port: u16,
    /// Directory holding the JSON collections (env: DATA_DIR)
    pub data_dir: PathBuf,
    /// Size of the request thread pool (env: WORKERS)
    pub workers: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.into()),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_dir: var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            workers: var("WORKERS")
                .and_then(|w| w.parse().ok())
                .filter(|w: &usize| *w > 0)
                .unwrap_or_else(|| {
                    std::thread::available_parallelism()
                        .map(|n| n.get())
                        .unwrap_or(4)
                }),
        }
    }

    /// `host:port` the server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Replace host and port with an address given on the command line
    pub fn override_address(&mut self, address: &str) -> Result<(), CLIError> {
        let (host, port) = address
            .rsplit_once(':')
            .ok_or(CLIError::InvalidUrlFormat)?;
        self.port = port.parse().map_err(|_| CLIError::InvalidUrlFormat)?;
        self.bind_address = host.to_string();
        Ok(())
    }
}
