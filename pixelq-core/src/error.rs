//! Errors in the crate.
use thiserror::Error;

/// Errors raised by the training system.
#[derive(Debug, Error)]
pub enum PixelqError {
    /// The environment does not expose a discrete action set.
    ///
    /// Detected at startup, before any environment stepping begins.
    #[error("action space is not discrete: {0}")]
    InvalidActionSpace(String),

    /// An optimization step produced a non-finite loss.
    ///
    /// Training must not continue with corrupted parameters, so this error
    /// terminates the run instead of being masked.
    #[error("non-finite loss ({value}) at optimization step {step}")]
    NonFiniteLoss {
        /// The optimization step at which the loss was computed.
        step: usize,
        /// The offending loss value.
        value: f32,
    },

    /// A record does not contain the requested key.
    #[error("key {0} was not found in the record")]
    RecordKeyNotFound(String),

    /// A record value has a type other than the requested one.
    #[error("value for key {0} has an unexpected type")]
    RecordValueType(String),
}
