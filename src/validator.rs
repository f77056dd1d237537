//! Classification of API response envelopes.
//!
//! A response is a success, a terminal API error, or an authentication error
//! meaning the token was invalidated server-side. The last case clears the
//! token cache so that the next login is not short-circuited by a stale entry.

use crate::envelope::{
    Envelope, EnvelopeError, StatusField, ERROR_ACCOUNT_KICKED, ERROR_TOKEN_MISSING,
    STATUS_SUCCESS,
};
use crate::error_utils;
use crate::exit_codes::ErrorCategory;
use crate::token_cache::TokenCache;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0}")]
    Parse(#[from] EnvelopeError),
    #[error("authentication error: {msg} (code: {code})")]
    Authentication { code: i64, msg: String },
    #[error("API error: {msg} (code: {code})")]
    Api { code: i64, msg: String },
}

impl ValidationError {
    /// True only when a fresh token could fix the call.
    pub fn needs_refresh(&self) -> bool {
        matches!(self, ValidationError::Authentication { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ValidationError::Parse(_) => ErrorCategory::Parse,
            ValidationError::Authentication { .. } => ErrorCategory::Authentication,
            ValidationError::Api { .. } => ErrorCategory::Api,
        }
    }
}

/// Codes that mean "log in again".
pub fn is_auth_error_code(code: i64) -> bool {
    code == ERROR_ACCOUNT_KICKED || code == ERROR_TOKEN_MISSING
}

pub trait ResponseValidator: Send + Sync {
    fn validate(&self, body: &[u8], field: StatusField) -> Result<(), ValidationError>;
}

/// Validator that inspects the envelope status and invalidates the token
/// cache on authentication errors.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeValidator {
    cache: Option<TokenCache>,
}

impl EnvelopeValidator {
    pub fn new(cache: Option<TokenCache>) -> Self {
        Self { cache }
    }
}

impl ResponseValidator for EnvelopeValidator {
    fn validate(&self, body: &[u8], field: StatusField) -> Result<(), ValidationError> {
        let envelope = Envelope::parse(body)?;

        let code = match envelope.status(field)? {
            None | Some(STATUS_SUCCESS) => return Ok(()),
            Some(code) => code,
        };

        if is_auth_error_code(code) {
            debug!("Token rejected by the API (code {}), clearing cache", code);
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.clear() {
                    error_utils::report_warning(&format!("failed to clear token cache: {}", e));
                }
            }
            return Err(ValidationError::Authentication {
                code,
                msg: envelope.msg,
            });
        }

        Err(ValidationError::Api {
            code,
            msg: envelope.msg,
        })
    }
}
