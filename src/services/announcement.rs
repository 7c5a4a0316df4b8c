//! `/announcements` resource client

use serde::Serialize;
use serde_json::Value;

use super::{Endpoint, PesoClient, Role};
use crate::error::Result;
use crate::transport::Method;

const RESOURCE: &str = "announcements";

/// Announcements shown on role dashboards
#[derive(Debug, Clone, Copy)]
pub struct AnnouncementService<'a> {
    client: &'a PesoClient,
}

impl<'a> AnnouncementService<'a> {
    pub(super) fn new(client: &'a PesoClient) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> Endpoint {
        self.client.endpoint(RESOURCE)
    }

    pub async fn get_all(&self) -> Result<Value> {
        self.client.get(self.endpoint()).await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, announcement: &T) -> Result<Value> {
        self.client
            .send_json(Method::POST, self.endpoint().path("create"), announcement)
            .await
    }

    pub async fn get_by_role(&self, role: Role) -> Result<Value> {
        self.client
            .get(self.endpoint().path("get-by-audience").query("role", role))
            .await
    }
}
