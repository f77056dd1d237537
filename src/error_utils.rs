//! Error reporting utilities for the vico-cli application.
//!
//! Keeps user-facing error and warning output uniform. Everything goes to
//! stderr so that stdout only ever carries command results.

use tracing::error;

/// Report an error consistently with user-facing output.
pub fn report_error<E: std::fmt::Display>(error: &E) {
    error!("{}", error);
    eprintln!("Error: {}", error);
}

/// Report a warning consistently with both logging and user-facing output.
pub fn report_warning<E: std::fmt::Display>(warning: &E) {
    tracing::warn!("{}", warning);
    eprintln!("Warning: {}", warning);
}

/// Check if an error message points at a transient network condition
pub fn is_retryable_error<E: std::fmt::Display>(error: E) -> bool {
    let error_str = error.to_string().to_lowercase();

    error_str.contains("timeout")
        || error_str.contains("timed out")
        || error_str.contains("connection")
        || error_str.contains("dns")
}

/// Hint printed after an error, if one applies.
pub fn hint_for<E: std::fmt::Display>(error: E) -> Option<&'static str> {
    let error_str = error.to_string();
    if error_str.contains("VICOHOME_EMAIL") {
        Some("Set VICOHOME_EMAIL and VICOHOME_PASSWORD to your Vicohome account credentials.")
    } else if is_retryable_error(&error_str) {
        Some("Network error. Please check your internet connection and try again.")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_error() {
        assert!(is_retryable_error("Connection refused"));
        assert!(is_retryable_error("operation timed out"));
        assert!(!is_retryable_error("API error: Resource not found (code: -2000)"));
    }

    #[test]
    fn test_hint_for_missing_credentials() {
        let hint = hint_for("VICOHOME_EMAIL and VICOHOME_PASSWORD environment variables are required");
        assert!(hint.unwrap().contains("VICOHOME_PASSWORD"));
        assert!(hint_for("API error: nope (code: 5)").is_none());
    }
}
