//! Setup-time error types.
//!
//! Everything here is raised while building a controller. The per-frame and
//! per-step entry points never fail; a misconfigured machine is refused before
//! it can run.

use std::path::PathBuf;

use thiserror::Error;

/// The state table is inconsistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsmError {
    /// The designated idle state was never registered.
    #[error("idle state {0} is not registered")]
    MissingIdle(String),

    /// Two states share the same id.
    #[error("state {0} is registered more than once")]
    DuplicateState(String),

    /// A transition list names a state that does not exist.
    #[error("state {from} lists unregistered transition target {to}")]
    UnknownTarget { from: String, to: String },
}

/// Tuning could not be read or is physically meaningless.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize tuning: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of its valid range.
    #[error("invalid tuning `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Anything that prevents a controller from starting.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Fsm(#[from] FsmError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The physics body has no usable state (non-finite values or no mass).
    #[error("physics body is not ready")]
    BodyNotReady,
}
