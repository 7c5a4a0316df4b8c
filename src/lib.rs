//! PESO - client-side data layer for the PESO Mendez job portal
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ binding   FetchOne / FetchList  → watch {data,loading,error}
//! ├──────────────────────────────────────────────────────────┤
//! │ services  PesoClient → jobs(), users(), applications(), ...
//! ├──────────────────────────────────────────────────────────┤
//! │ transport HttpTransport::request → serde_json::Value
//! ├──────────────────────────────────────────────────────────┤
//! │ auth      AuthTokenProvider (memory / file), Claims
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! [`session::Session`] sits beside the stack and is the only writer of the
//! token; [`config::PesoConfig`] tells the client where the backend lives.

pub mod auth;
pub mod binding;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod transport;
pub mod util;

pub use auth::{AuthTokenProvider, Claims, FileTokenStore, MemoryTokenStore};
pub use binding::{
    BindingState, FetchList, FetchOne, Listing, Notifier, PageRequest, Rebind, Toast, ToastLog,
    TracingNotifier,
};
pub use config::PesoConfig;
pub use error::{FixSuggestion, PesoError, Result};
pub use services::{PesoClient, Role};
pub use session::Session;
pub use transport::HttpTransport;
