//! Startup Configuration
//!
//! Resolves the backend list and the few process settings the router needs.
//!
//! Backends come from `host:port` command-line arguments when any are given,
//! otherwise from a JSON file (default `servers.json`) holding an array of
//! `{"ip": ..., "port": ...}` objects. Everything else is read from the
//! environment:
//!
//! - `ROUTER_CONFIG`: path of the backend file (default `servers.json`).
//! - `ROUTER_BIND`: listen address (default `0.0.0.0:8080`).
//! - `ROUTER_BACKEND_TIMEOUT_MS`: per-backend request timeout, `0` disables it
//!   (default `5000`).

use super::types::{Backend, Backends};
use std::net::SocketAddr;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER_CONFIG: &str = "servers.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 5_000;

pub const ENV_CONFIG: &str = "ROUTER_CONFIG";
pub const ENV_BIND: &str = "ROUTER_BIND";
pub const ENV_BACKEND_TIMEOUT_MS: &str = "ROUTER_BACKEND_TIMEOUT_MS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("backend list is empty")]
    NoBackends,

    #[error("failed to read server file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse server file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("backend argument '{0}' is not of the form host:port")]
    MissingPort(String),

    #[error("port number must be numeric in '{arg}': {source}")]
    InvalidPort {
        arg: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid {name} value '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

/// Fully resolved router settings.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub backends: Backends,
    pub bind_addr: SocketAddr,
    pub backend_timeout: Option<Duration>,
}

impl RouterConfig {
    /// Builds the configuration from command-line arguments (program name
    /// already stripped) and an environment lookup.
    pub fn load<E>(args: &[String], env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let backends = if args.is_empty() {
            let path = env(ENV_CONFIG).unwrap_or_else(|| DEFAULT_SERVER_CONFIG.to_string());
            tracing::info!("Loading server list from file {}", path);
            load_backends_file(path)?
        } else {
            tracing::info!("Loading server list from command line");
            parse_backend_args(args)?
        };

        let bind_raw = env(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::InvalidEnv {
            name: ENV_BIND,
            value: bind_raw.clone(),
        })?;

        let backend_timeout = match env(ENV_BACKEND_TIMEOUT_MS) {
            None => Some(Duration::from_millis(DEFAULT_BACKEND_TIMEOUT_MS)),
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => {
                    return Err(ConfigError::InvalidEnv {
                        name: ENV_BACKEND_TIMEOUT_MS,
                        value: raw,
                    });
                }
            },
        };

        for (idx, backend) in backends.iter().enumerate() {
            tracing::info!("  - backend {} -> {}", idx, backend);
        }

        Ok(Self {
            backends,
            bind_addr,
            backend_timeout,
        })
    }
}

/// Reads a `servers.json`-style file.
pub fn load_backends_file(path: impl AsRef<Path>) -> Result<Backends, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let list: Vec<Backend> = serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Backends::new(list)
}

/// Parses `host:port` arguments, one backend each, preserving order.
pub fn parse_backend_args(args: &[String]) -> Result<Backends, ConfigError> {
    let list = args
        .iter()
        .map(|arg| parse_backend_arg(arg))
        .collect::<Result<Vec<_>, _>>()?;
    Backends::new(list)
}

fn parse_backend_arg(arg: &str) -> Result<Backend, ConfigError> {
    let (host, port) = arg
        .rsplit_once(':')
        .ok_or_else(|| ConfigError::MissingPort(arg.to_string()))?;
    if host.is_empty() {
        return Err(ConfigError::MissingPort(arg.to_string()));
    }
    let port = port.parse::<u16>().map_err(|source| ConfigError::InvalidPort {
        arg: arg.to_string(),
        source,
    })?;
    Ok(Backend::new(host, port))
}
