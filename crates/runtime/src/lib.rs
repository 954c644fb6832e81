mod config;
pub mod logging;

pub use config::{
    ConfigError, DB_HOST_ENV, DB_NAME_ENV, DB_PASSWORD_ENV, DB_PORT_ENV, DB_USER_ENV, DbConfig,
    REQUIRED_ENV_VARS,
};

pub use logging::init;

pub const PROGRAM_NAME: &str = "tracksink";
pub const PROGRAM_LOG_LEVEL: &str = "TRACKSINK_LOG_LEVEL";

/// Records per transaction when the caller asks for a non-positive size.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Destination table for playback events.
pub const EVENT_TABLE: &str = "song_streaming";
