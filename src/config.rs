use crate::storage::resolve_data_dir;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
}

impl Config {
    /// Reads `PORT` and `TRACKLIFE_DATA_DIR`; unparsable or missing values
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            data_dir: resolve_data_dir(),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
