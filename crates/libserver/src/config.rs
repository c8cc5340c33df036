use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const PORT_ENV_VAR: &str = "APP_PORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {PORT_ENV_VAR} value {value:?}: {source}")]
    InvalidPortEnv {
        value: String,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    /// Resolves the listening port: the `APP_PORT` environment variable
    /// overrides the command-line flag, which itself defaults to 5000.
    pub fn resolve(port_flag: u16) -> Result<Self, ConfigError> {
        let env_port = std::env::var(PORT_ENV_VAR).ok();
        Self::resolve_from(env_port.as_deref(), port_flag)
    }

    fn resolve_from(env_port: Option<&str>, port_flag: u16) -> Result<Self, ConfigError> {
        let port = match env_port {
            Some(raw) => raw.trim().parse().map_err(|source| ConfigError::InvalidPortEnv {
                value: raw.to_string(),
                source,
            })?,
            None => port_flag,
        };
        Ok(Self { port })
    }

    /// Binds on all interfaces.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
