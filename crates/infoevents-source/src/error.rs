use infoevents_store::StoreError;
use thiserror::Error;

use crate::session::SessionPhase;

/// Errors raised by a query session.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection, registry, repository or query could not be set up.
    #[error("initialization failed: {context}{}", cause(.source))]
    Initialization {
        /// Step that failed.
        context: &'static str,
        /// Store error behind the failure, if the store reported one.
        #[source]
        source: Option<StoreError>,
    },
    /// A page could not be fetched.
    #[error("{operation} failed: {source}")]
    Execution {
        /// Step that failed.
        operation: &'static str,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
    /// Lifecycle call made in the wrong phase.
    #[error("{operation} is not allowed while the session is {phase}")]
    InvalidState {
        /// Rejected lifecycle call.
        operation: &'static str,
        /// Phase the session was in.
        phase: SessionPhase,
    },
    /// A required argument was not supplied.
    #[error("missing required argument '{0}'")]
    MissingArgument(&'static str),
    /// An argument is unknown or its value does not fit its declaration.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),
    /// Configuration file is not valid JSON for [`SessionConfig`](crate::SessionConfig).
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

fn cause(source: &Option<StoreError>) -> String {
    match source {
        Some(err) => format!(": {}", err),
        None => String::new(),
    }
}
