//! Result and Error types for pinlat-mgxs

use crate::tally::TallyKey;

/// Type alias for Result<T, mgxs::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `pinlat-mgxs` crate
///
/// All of these point at bad or degenerate input data. Nothing is retried and
/// nothing is replaced with a default.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("chi distribution sums to {sum}, cannot normalise")]
    InvalidChiDistribution { sum: f64 },

    #[error("balance operator is singular (determinant {determinant})")]
    SingularBalanceOperator { determinant: f64 },

    #[error("no tally mean for {key}")]
    MissingTally { key: TallyKey },

    #[error("tally {key} is outside of {groups} energy groups")]
    GroupOutOfRange { key: TallyKey, groups: usize },

    #[error("inconsistent dimensions (expected {expected}, found {found})")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("invalid group structure: {0}")]
    InvalidGroupStructure(String),

    #[error("energy {energy} eV is outside the group structure")]
    EnergyOutOfRange { energy: f64 },

    #[error("fission operator is zero, no multiplying mode exists")]
    NoFissionSource,

    #[error("eigen decomposition failed: {0}")]
    DecompositionFailed(String),

    #[error("failed input/output stream ({0})")]
    IOError(std::io::ErrorKind),

    #[error("failed to read tallies: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err.kind())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}
