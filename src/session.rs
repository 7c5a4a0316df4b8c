//! Session lifecycle on top of the token provider
//!
//! [`Session`] is the only place that writes the token: `login` stores it,
//! `logout` and expired claims clear it. Bindings and resource clients only
//! ever read it through the transport.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::{decode_claims, Claims};
use crate::error::{PesoError, Result};
use crate::services::{LoginCredentials, LoginResponse, PesoClient, Role};

/// The logged-in user as seen by this client
#[derive(Debug, Clone)]
pub struct Session {
    client: PesoClient,
}

impl Session {
    pub fn new(client: PesoClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &PesoClient {
        &self.client
    }

    /// Decoded claims of the stored token.
    ///
    /// An expired token is cleared from the provider and yields `None`.
    pub fn claims(&self) -> Option<Claims> {
        let provider = self.client.auth_provider();
        let claims = decode_claims(&provider.token()?)?;

        if claims.is_expired() {
            warn!("Stored token has expired; clearing session");
            if let Err(e) = provider.clear() {
                warn!(error = %e, "Failed to clear expired token");
            }
            return None;
        }
        Some(claims)
    }

    /// Id of the logged-in user, the usual required argument of bindings
    pub fn user_id(&self) -> Option<i64> {
        self.claims().and_then(|c| c.user_id())
    }

    pub fn role(&self) -> Option<Role> {
        self.claims().and_then(|c| c.role())
    }

    pub fn is_logged_in(&self) -> bool {
        self.claims().is_some()
    }

    /// Log in and store the issued token
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse> {
        let value = self.client.auth().login(credentials).await?;
        let response: LoginResponse = match value {
            Value::Null => LoginResponse::default(),
            other => serde_json::from_value(other)?,
        };

        if response.is_inactive() {
            return Err(PesoError::AccountDeactivated);
        }

        let token = match response.token.as_deref() {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => return Err(PesoError::TokenMissing),
        };

        self.client.auth_provider().init(token)?;
        info!(user = %credentials.email_or_username, "Logged in");
        Ok(response)
    }

    /// Forget the stored token
    pub fn logout(&self) -> Result<()> {
        self.client.auth_provider().clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Change login credentials; the old token is cleared so the user logs in again
    pub async fn update_credentials<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        let updated = self.client.users().update_credential(user).await?;
        self.logout()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthTokenProvider, MemoryTokenStore};
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::json;
    use std::sync::Arc;

    fn token(payload: &Value) -> String {
        format!(
            "e30.{}.sig",
            URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes())
        )
    }

    fn session_with(token: Option<String>) -> (Session, Arc<MemoryTokenStore>) {
        let store = Arc::new(match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        });
        let client = PesoClient::new("http://localhost:3005", store.clone()).unwrap();
        (Session::new(client), store)
    }

    #[test]
    fn no_token_means_no_claims() {
        let (session, _) = session_with(None);
        assert!(session.claims().is_none());
        assert!(!session.is_logged_in());
    }

    #[test]
    fn valid_token_yields_user_and_role() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let (session, _) = session_with(Some(token(
            &json!({"id": 0, "role": "employer", "exp": exp}),
        )));

        assert_eq!(session.user_id(), Some(0));
        assert_eq!(session.role(), Some(Role::Employer));
    }

    #[test]
    fn expired_token_is_cleared() {
        let (session, store) = session_with(Some(token(&json!({"id": 4, "exp": 1}))));

        assert!(session.claims().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn logout_clears_token() {
        let (session, store) = session_with(Some("a.b.c".to_string()));
        session.logout().unwrap();
        assert!(store.token().is_none());
    }
}
