//! Error types for commands and configuration loading
//!
//! Command errors are rejections: the state is left untouched and the caller
//! may ignore them. Configuration errors surface at load time.

use thiserror::Error;

use crate::sim::economy::Resource;

/// Why a session command was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session is already running")]
    AlreadyStarted,
    #[error("boat is not docked")]
    NotDocked,
    #[error("no island with index {0}")]
    UnknownIsland(usize),
    #[error("island {to} is not a neighbour of island {from}")]
    NotNeighbour { from: usize, to: usize },
    #[error("no travel curve stored for edge {from} -> {to}")]
    MissingCurve { from: usize, to: usize },
    #[error("{resource} costs {price} but only {money} coins available")]
    InsufficientFunds {
        resource: Resource,
        price: u32,
        money: u32,
    },
    #[error("{0} is not traded here")]
    NotTraded(Resource),
    #[error("no {0} left to sell")]
    OutOfStock(Resource),
    #[error("no encounter is active")]
    NoActiveEncounter,
    #[error("encounter has no option {0}")]
    InvalidOption(usize),
    #[error("time scale must be finite and positive, got {0}")]
    InvalidTimeScale(f32),
}

/// Failure loading configuration or override tables
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
