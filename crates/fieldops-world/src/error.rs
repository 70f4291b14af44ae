//! Error types for the `fieldops-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

/// Errors that can occur during region mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// A mutation was called with a `NaN` or infinite argument.
    ///
    /// Region state must never become non-finite; this always indicates a
    /// bug in the caller's rate computation.
    #[error("non-finite input to {operation}: {value}")]
    NonFinite {
        /// The mutation that rejected the input.
        operation: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Reject `NaN` and infinities before they reach region state.
pub(crate) fn ensure_finite(operation: &'static str, value: f64) -> Result<f64, WorldError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WorldError::NonFinite { operation, value })
    }
}
