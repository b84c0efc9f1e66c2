use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::codes::OperationCode;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub codes: CodesConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub instance_id: String,
}

#[derive(Debug, Clone)]
pub struct CodesConfig {
    /// JSON catalog of additional operation codes
    pub catalog_path: Option<PathBuf>,
    /// Code sent in place of errors that are not operation results
    pub fallback_code: OperationCode,
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            fallback_code: OperationCode::SERVICE_INTERNAL,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
                // Used only for debugging/observability. If unset, fall back to HOSTNAME if
                // present (e.g. Docker/Kubernetes), otherwise "unknown".
                instance_id: env::var("INSTANCE_ID")
                    .or_else(|_| env::var("HOSTNAME"))
                    .unwrap_or_else(|_| "unknown".to_string()),
            },
            codes: CodesConfig {
                catalog_path: env::var_os("OPRES_CODES_FILE")
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from),
                fallback_code: env::var("OPRES_FALLBACK_CODE")
                    .ok()
                    .filter(|code| !code.trim().is_empty())
                    .map(|code| OperationCode::from(code.trim().to_string()))
                    .unwrap_or(OperationCode::SERVICE_INTERNAL),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
