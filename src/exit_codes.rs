//! Exit codes for the vico-cli application
//!
//! Failures are reported with a non-zero status so that scripts can tell an
//! authentication problem apart from an API or network problem.

/// Exit codes for vico-cli
///
/// These codes follow the BSD sysexits.h conventions where possible:
/// - 0: Success
/// - 64-78: Standard exit codes from sysexits.h
/// - 100+: Custom application-specific codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VicoExitCode {
    /// Success (0) - Command completed successfully
    Success = 0,

    /// Command line usage error (64) - User input error
    UsageError = 64,

    /// Data format error (65) - Response or input data was malformed
    DataError = 65,

    /// System error (71) - Local file system error
    OSError = 71,

    /// Configuration error (78) - Missing credentials or bad configuration
    ConfigError = 78,

    /// Authentication error (100) - Login or token issues
    AuthError = 100,

    /// Network error (101) - Connection or communication issues
    NetworkError = 101,

    /// API error (102) - Remote API returned an error
    ApiError = 102,
}

impl VicoExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<VicoExitCode> for i32 {
    fn from(code: VicoExitCode) -> Self {
        code.code()
    }
}

/// Broad classification shared by every error type in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Configuration,
    Transport,
    Authentication,
    Api,
    Parse,
    Cache,
}

impl From<ErrorCategory> for VicoExitCode {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Usage => VicoExitCode::UsageError,
            ErrorCategory::Configuration => VicoExitCode::ConfigError,
            ErrorCategory::Transport => VicoExitCode::NetworkError,
            ErrorCategory::Authentication => VicoExitCode::AuthError,
            ErrorCategory::Api => VicoExitCode::ApiError,
            ErrorCategory::Parse => VicoExitCode::DataError,
            ErrorCategory::Cache => VicoExitCode::OSError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(VicoExitCode::from(ErrorCategory::Configuration).code(), 78);
        assert_eq!(VicoExitCode::from(ErrorCategory::Authentication).code(), 100);
        assert_eq!(VicoExitCode::from(ErrorCategory::Api).code(), 102);
        assert_eq!(VicoExitCode::from(ErrorCategory::Transport).code(), 101);
        assert_eq!(VicoExitCode::from(ErrorCategory::Parse).code(), 65);
    }

    #[test]
    fn test_success_is_zero() {
        assert_eq!(i32::from(VicoExitCode::Success), 0);
    }
}
