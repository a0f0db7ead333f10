//! Stable error codes shared by every service error.

use serde_json::{Value, json};

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Maps an error to a stable machine-readable code such as `E_BOARD_NOT_FOUND`.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body reported for a failed command.
#[must_use]
pub fn error_json(err: &(impl ErrorCode + ?Sized)) -> Value {
    json!({
        "error": {
            "code": err.error_code(),
            "message": err.to_string(),
            "retryable": err.retryable(),
        }
    })
}
