use std::{env, fmt, num::ParseIntError};

use thiserror::Error;

pub const DB_USER_ENV: &str = "DB_USER";
pub const DB_NAME_ENV: &str = "DB_NAME";
pub const DB_PASSWORD_ENV: &str = "DB_PASSWORD";
pub const DB_HOST_ENV: &str = "DB_HOST";
pub const DB_PORT_ENV: &str = "DB_PORT";

/// Every variable `DbConfig::from_env` needs, in the order they are checked.
pub const REQUIRED_ENV_VARS: &[&str] = &[
    DB_USER_ENV,
    DB_NAME_ENV,
    DB_PASSWORD_ENV,
    DB_HOST_ENV,
    DB_PORT_ENV,
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid DB_PORT value {value:?}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Connection parameters for the relational sink.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub dbname: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let user = require(DB_USER_ENV)?;
        let dbname = require(DB_NAME_ENV)?;
        let password = require(DB_PASSWORD_ENV)?;
        let host = require(DB_HOST_ENV)?;
        let raw_port = require(DB_PORT_ENV)?;

        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|source| ConfigError::InvalidPort {
                value: raw_port.clone(),
                source,
            })?;

        Ok(Self {
            user,
            dbname,
            password,
            host,
            port,
        })
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("dbname", &self.dbname)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
