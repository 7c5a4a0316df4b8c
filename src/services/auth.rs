//! `/auth` resource client

use serde::Serialize;
use serde_json::Value;

use super::{Endpoint, LoginCredentials, PesoClient, ResetPasswordRequest};
use crate::error::Result;
use crate::transport::Method;

const RESOURCE: &str = "auth";

/// Login, registration and password reset
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    client: &'a PesoClient,
}

impl<'a> AuthService<'a> {
    pub(super) fn new(client: &'a PesoClient) -> Self {
        Self { client }
    }

    fn endpoint(&self, path: &str) -> Endpoint {
        self.client.endpoint(RESOURCE).path(path)
    }

    /// Answers `{token, user, status}`; see [`crate::session::Session::login`]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Value> {
        self.client
            .send_json(Method::POST, self.endpoint("login"), credentials)
            .await
    }

    pub async fn register<T: Serialize + ?Sized>(&self, credentials: &T) -> Result<Value> {
        self.client
            .send_json(Method::POST, self.endpoint("register"), credentials)
            .await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Value> {
        self.client
            .send_json(Method::POST, self.endpoint("reset-password"), request)
            .await
    }
}
