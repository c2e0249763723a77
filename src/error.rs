//! Errors raised by the arithmetic and by the sharing scheme

use num::BigInt;
use thiserror::Error;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, SecretSharingError>;

/// Every failure the scheme can report. None of them are transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretSharingError {
    /// The threshold, share count, prime or secret cannot be used together.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A modular inverse was requested for a value congruent to zero.
    #[error("division by zero modulo p")]
    DivisionByZero,

    /// Two supplied shares have the same public key, so the interpolation
    /// denominator vanishes.
    #[error("degenerate share set: public key {public_key} appears more than once")]
    DegenerateShareSet {
        /// The repeated public key, reduced modulo p
        public_key: BigInt,
    },

    /// Recovery was given a number of shares other than the threshold.
    #[error("incorrect share count: got {got}, need exactly {need}")]
    IncorrectShareCount {
        /// Number of shares supplied
        got: usize,
        /// Threshold the shares were generated with
        need: usize,
    },

    /// The supplied shares were generated under different thresholds.
    #[error("shares disagree on their threshold")]
    InconsistentShares,
}
