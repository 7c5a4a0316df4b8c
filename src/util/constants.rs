//! Centralized constants for the PESO client
//!
//! All timeout, limit and storage-key values in one place for easy tuning.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════
// Backend
// ═══════════════════════════════════════════════════════════════

/// Backend used when neither config nor env names one
pub const DEFAULT_BASE_URL: &str = "http://localhost:3005";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("peso-client/", env!("CARGO_PKG_VERSION"));

// ═══════════════════════════════════════════════════════════════
// HTTP Client Limits
// ═══════════════════════════════════════════════════════════════

/// Timeout for establishing HTTP connections.
///
/// Only bounds the connect phase; a request that connected but never
/// answers keeps its binding loading unless a request timeout is configured.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of HTTP redirects to follow
pub const REDIRECT_LIMIT: usize = 5;

// ═══════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════

/// Page size large enough to fetch effectively "all" records
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

// ═══════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════

/// Key under which the bearer token is persisted
pub const TOKEN_KEY: &str = "jwt_token";

/// Message used when a failed response carries no usable error body
pub const REQUEST_FAILED: &str = "Request failed";
