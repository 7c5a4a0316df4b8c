//! Error types with fix suggestions
//!
//! Error code ranges:
//! - PESO-000-009: Transport errors (HTTP status, network, response body)
//! - PESO-010-019: Resource client errors (URL composition, uploads)
//! - PESO-020-029: Session errors (login outcome, token storage)
//! - PESO-030-039: Configuration and IO errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PesoError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
///
/// `Request` displays the backend's message verbatim so bindings can surface
/// it to the user unchanged.
#[derive(Error, Debug)]
pub enum PesoError {
    // ─────────────────────────────────────────────────────────────
    // Transport errors (PESO-000 to PESO-009)
    // ─────────────────────────────────────────────────────────────
    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("[PESO-001] Request to '{url}' failed: {message}")]
    Network { url: String, message: String },

    #[error("[PESO-002] Response from '{url}' is not valid JSON: {details}")]
    InvalidResponse { url: String, details: String },

    // ─────────────────────────────────────────────────────────────
    // Resource client errors (PESO-010 to PESO-019)
    // ─────────────────────────────────────────────────────────────
    #[error("[PESO-010] Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("[PESO-011] UploadService error: {reason}")]
    Upload { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Session errors (PESO-020 to PESO-029)
    // ─────────────────────────────────────────────────────────────
    #[error("[PESO-020] Your account is deactivated. Please contact the PESO Mendez administrator.")]
    AccountDeactivated,

    #[error("[PESO-021] Token missing in response")]
    TokenMissing,

    #[error("[PESO-022] Token store error: {reason}")]
    TokenStore { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration and IO errors (PESO-030 to PESO-039)
    // ─────────────────────────────────────────────────────────────
    #[error("[PESO-030] Config error: {reason}")]
    Config { reason: String },

    #[error("[PESO-031] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[PESO-032] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PesoError {
    /// HTTP status of a transport error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            PesoError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend answered 401/403
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl FixSuggestion for PesoError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            PesoError::Request { status, .. } if *status == 401 || *status == 403 => {
                Some("Log in again with `peso login`")
            }
            PesoError::Request { .. } => None,
            PesoError::Network { .. } => {
                Some("Check that the backend is running and PESO_BASE_URL points to it")
            }
            PesoError::InvalidResponse { .. } => {
                Some("Check that PESO_BASE_URL points to the PESO API, not a web page")
            }
            PesoError::InvalidUrl { .. } => Some("Use an absolute base URL like http://localhost:3005"),
            PesoError::Upload { .. } => Some("Check the file exists and the role is valid"),
            PesoError::AccountDeactivated => None,
            PesoError::TokenMissing => Some("Check the backend's /auth/login response"),
            PesoError::TokenStore { .. } => Some("Check permissions on the session file"),
            PesoError::Config { .. } => Some("Check ~/.config/peso/config.toml syntax"),
            PesoError::Io(_) => Some("Check file path and permissions"),
            PesoError::Json(_) => Some("Check the payload is valid JSON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_backend_message_verbatim() {
        let err = PesoError::Request {
            status: 404,
            message: "Not found".to_string(),
        };
        assert_eq!(err.to_string(), "Not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn other_errors_carry_codes() {
        let err = PesoError::Network {
            url: "http://localhost:3005/jobs".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().starts_with("[PESO-001]"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn unauthorized_suggests_login() {
        let err = PesoError::Request {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.fix_suggestion(), Some("Log in again with `peso login`"));
    }

    #[test]
    fn plain_request_errors_have_no_suggestion() {
        let err = PesoError::Request {
            status: 500,
            message: "Request failed".to_string(),
        };
        assert!(!err.is_unauthorized());
        assert!(err.fix_suggestion().is_none());
    }
}
