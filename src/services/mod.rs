//! # Resource Clients
//!
//! One method per backend operation. Every method composes an [`Endpoint`]
//! and delegates to the [`HttpTransport`]; nothing is transformed, cached
//! or retried, and errors pass through unchanged.
//!
//! ## Composition Root
//!
//! [`PesoClient`] owns the transport, the base URL and the token provider and
//! hands out borrowed resource clients:
//!
//! | Accessor | Resource |
//! |----------|----------|
//! | [`PesoClient::announcements`] | `/announcements` |
//! | [`PesoClient::applications`] | `/applications` |
//! | [`PesoClient::auth`] | `/auth` |
//! | [`PesoClient::jobs`] | `/jobs` |
//! | [`PesoClient::reports`] | `/reports` |
//! | [`PesoClient::users`] | `/users` |
//! | [`PesoClient::verifications`] | `/verifications`, `/uploads` |
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use peso::auth::MemoryTokenStore;
//! use peso::services::PesoClient;
//!
//! # async fn demo() -> peso::error::Result<()> {
//! let client = PesoClient::new("http://localhost:3005", Arc::new(MemoryTokenStore::new()))?;
//! let job = client.jobs().get_by_id(7).await?;
//! println!("{}", job["title"]);
//! # Ok(())
//! # }
//! ```

mod announcement;
mod application;
mod auth;
mod endpoint;
mod job;
mod models;
mod report;
mod user;
mod verification;

pub use announcement::AnnouncementService;
pub use application::ApplicationService;
pub use auth::AuthService;
pub use endpoint::Endpoint;
pub use job::JobService;
pub use models::{LoginCredentials, LoginResponse, ReportKind, ResetPasswordRequest, Role};
pub use report::ReportService;
pub use user::UserService;
pub use verification::{UploadFile, VerificationService};

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::AuthTokenProvider;
use crate::config::PesoConfig;
use crate::error::{PesoError, Result};
use crate::transport::{Body, HttpTransport, Method};

/// Composition root for all resource clients
///
/// Cheap to clone; bindings capture a clone inside their remote calls.
#[derive(Clone)]
pub struct PesoClient {
    transport: HttpTransport,
    base_url: Url,
    auth: Arc<dyn AuthTokenProvider>,
}

impl PesoClient {
    /// Client for `base_url` without a request timeout
    pub fn new(base_url: &str, auth: Arc<dyn AuthTokenProvider>) -> Result<Self> {
        Self::with_transport(base_url, HttpTransport::new()?, auth)
    }

    /// Client built from loaded configuration
    pub fn from_config(config: &PesoConfig, auth: Arc<dyn AuthTokenProvider>) -> Result<Self> {
        let transport = HttpTransport::with_timeout(config.timeout())?;
        Self::with_transport(&config.backend.base_url, transport, auth)
    }

    /// Client over a prepared transport; the token provider is attached to it
    pub fn with_transport(
        base_url: &str,
        transport: HttpTransport,
        auth: Arc<dyn AuthTokenProvider>,
    ) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            transport: transport.with_auth(Arc::clone(&auth)),
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth_provider(&self) -> &Arc<dyn AuthTokenProvider> {
        &self.auth
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// `{base}/{resource}`
    pub fn endpoint(&self, resource: &str) -> Endpoint {
        Endpoint::new(&self.base_url, resource)
    }

    pub fn announcements(&self) -> AnnouncementService<'_> {
        AnnouncementService::new(self)
    }

    pub fn applications(&self) -> ApplicationService<'_> {
        ApplicationService::new(self)
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn jobs(&self) -> JobService<'_> {
        JobService::new(self)
    }

    pub fn reports(&self) -> ReportService<'_> {
        ReportService::new(self)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn verifications(&self) -> VerificationService<'_> {
        VerificationService::new(self)
    }

    // ────────────────────────────────────────────────────────────
    // Delegation helpers used by every resource client
    // ────────────────────────────────────────────────────────────

    pub(crate) async fn get(&self, endpoint: Endpoint) -> Result<Value> {
        self.send(Method::GET, endpoint, Body::Empty).await
    }

    pub(crate) async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: Endpoint,
        payload: &T,
    ) -> Result<Value> {
        self.send(method, endpoint, Body::json(payload)?).await
    }

    pub(crate) async fn send(&self, method: Method, endpoint: Endpoint, body: Body) -> Result<Value> {
        self.transport
            .request(method, endpoint.as_str(), None, body)
            .await
    }
}

impl std::fmt::Debug for PesoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PesoClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).map_err(|e| PesoError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(PesoError::InvalidUrl {
            url: base_url.to_string(),
            reason: "expected an http(s) base URL".to_string(),
        });
    }

    Ok(url)
}
