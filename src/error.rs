//! Error types for `word-histogram`.

use thiserror::Error;

/// Allocation failures inside the table or the report renderer.
///
/// Returned instead of aborting wherever the standard library offers a
/// fallible reservation. The structure that failed is left as it was before
/// the call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("word table needs at least one bucket")]
    NoBuckets,

    #[error("out of memory: failed to reserve {requested} bytes for {what}")]
    OutOfMemory {
        what: &'static str,
        requested: usize,
    },
}

/// Rejected configuration values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("bucket count must be at least 1")]
    NoBuckets,

    #[error("maximum word length must be at least 2, got {0}")]
    WordLengthTooSmall(usize),

    #[error("maximum word length {0} leaves no room for a report line")]
    WordLengthTooLarge(usize),

    #[error("initial report capacity must be at least 1")]
    ZeroReportCapacity,

    #[error("erase and sentinel bytes must differ (both are {0:#04x})")]
    ControlBytesCollide(u8),

    #[error("control byte {0:#04x} is whitespace or printable and would be read as text")]
    ControlByteIsText(u8),
}

/// A host collaborator refused to register.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct RegistrationFailure {
    pub reason: String,
}

impl RegistrationFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the histogram context and its lifecycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistogramError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] TableError),

    /// A report session is already open.
    #[error("report is busy: another reader holds it open")]
    Busy,

    /// Read or close attempted without a prior open.
    #[error("no report session is open")]
    NoSession,

    #[error("failed to register {collaborator}: {source}")]
    Registration {
        collaborator: &'static str,
        #[source]
        source: RegistrationFailure,
    },
}
