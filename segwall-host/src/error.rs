//! Host error types

use std::path::PathBuf;

use segwall_core::config::ConfigError as CoreConfigError;
use segwall_core::RouterError;
use segwall_drivers::PinError;
use segwall_protocol::{EncodeError, HitParseError, LineError};
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no registers configured")]
    NoRegisters,

    #[error("register '{register}': invalid pin '{pin}' (expected gpioN or pinN)")]
    InvalidPin { register: String, pin: String },

    #[error("register '{register}': {reason:?}")]
    Register {
        register: String,
        reason: CoreConfigError,
    },

    #[error("invalid register layout: {0:?}")]
    Layout(RouterError),
}

/// World connection errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no address found for {0}")]
    Resolve(String),

    #[error("connection closed by the world service")]
    Closed,

    #[error("command encoding failed: {0:?}")]
    Encode(EncodeError),

    #[error("bad response line: {0:?}")]
    Line(LineError),

    #[error("bad block hits response: {0:?}")]
    Hits(HitParseError),
}

impl ClientError {
    /// Check if reconnecting could help
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Io(_) | ClientError::Closed)
    }
}

/// Output line setup errors
#[derive(Debug, Error)]
pub enum PinSetupError {
    #[cfg(feature = "rpi")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("pin bank error: {0:?}")]
    Bank(PinError),

    #[error("line driver error: {0}")]
    Driver(String),

    #[error("built without GPIO support; use --dry-run")]
    Unsupported,
}

/// Top-level application errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Pins(#[from] PinSetupError),

    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("invalid pin '{0}' (expected gpioN or pinN)")]
    InvalidPin(String),

    #[error("scene setup failed: {0}")]
    Setup(String),
}
