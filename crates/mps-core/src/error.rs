use thiserror::Error;

/// Errors raised by the matching core.
///
/// `FingerprintCollision` is deliberately absent: it is recovered locally by
/// the Breslauer-Galil matcher (the affected progression is wiped and
/// matching continues) and is surfaced only as a `tracing::warn!` event, not
/// a propagated error.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("modulus {p} is not usable as a field modulus for value {v}")]
    InvalidModulus { v: u64, p: u64 },

    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("viable-occurrence progression inconsistency: {0}")]
    ProgressionBroken(&'static str),

    #[error("no engine registered under the name {0:?}")]
    UnknownEngineName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
