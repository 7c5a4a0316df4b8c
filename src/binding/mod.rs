//! Binding Module - Remote data bound to a consumer
//!
//! A binding pairs one remote call with an observable `{data, loading, error}`
//! state and re-runs the call only when its inputs change:
//! - `args`: typed argument vectors and the absent-argument guard
//! - `fetch_one`: single record bindings ([`FetchOne`])
//! - `fetch_list`: collection bindings with page normalization ([`FetchList`])
//! - `notify`: user-visible toasts ([`Notifier`])
//!
//! Data flow:
//! ```text
//! bind(args, deps)
//!       ↓
//! same key as last time? ──yes──▶ Unchanged
//!       ↓ no
//! every required arg present? ──no──▶ Guarded (data cleared, not loading)
//!       ↓ yes
//! generation += 1, loading = true, spawn call
//!       ↓
//! settle: generation still current? ──no──▶ dropped
//!       ↓ yes
//! data / error committed, loading = false (+ one error toast on failure)
//! ```

mod args;
mod engine;
mod fetch_list;
mod fetch_one;
mod listing;
mod notify;
mod state;

pub use args::{Arg, ArgumentVector};
pub use engine::Rebind;
pub use fetch_list::FetchList;
pub use fetch_one::FetchOne;
pub use listing::{IntoListing, Listing, Page, PageRequest};
pub use notify::{LoggedToast, Notifier, Toast, ToastLevel, ToastLog, TracingNotifier};
pub use state::BindingState;
