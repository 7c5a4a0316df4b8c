//! Utilities Module - shared infrastructure
//!
//! - `constants`: Centralized timeouts, limits and storage keys

pub mod constants;

pub use constants::{
    CONNECT_TIMEOUT, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, REDIRECT_LIMIT, REQUEST_FAILED,
    TOKEN_KEY, USER_AGENT,
};
