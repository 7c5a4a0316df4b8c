//! `/applications` resource client

use serde_json::Value;

use super::{Endpoint, PesoClient};
use crate::error::Result;
use crate::transport::{Body, Method};

const RESOURCE: &str = "applications";

/// Job applications, addressed by job and user ids
#[derive(Debug, Clone, Copy)]
pub struct ApplicationService<'a> {
    client: &'a PesoClient,
}

impl<'a> ApplicationService<'a> {
    pub(super) fn new(client: &'a PesoClient) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> Endpoint {
        self.client.endpoint(RESOURCE)
    }

    fn by_job_user(&self, path: &str, job_id: i64, user_id: i64) -> Endpoint {
        self.endpoint()
            .path(path)
            .query("jobId", job_id)
            .query("userId", user_id)
    }

    pub async fn get_by_job_and_user(&self, job_id: i64, user_id: i64) -> Result<Value> {
        self.client
            .get(self.by_job_user("get-by-job-user", job_id, user_id))
            .await
    }

    pub async fn get_by_employer(&self, employer_id: i64) -> Result<Value> {
        self.client
            .get(self.endpoint().path("get-by-employer").query("id", employer_id))
            .await
    }

    pub async fn get_by_user(&self, user_id: i64) -> Result<Value> {
        self.client
            .get(self.endpoint().path("get-by-user").query("id", user_id))
            .await
    }

    pub async fn create(&self, job_id: i64, user_id: i64) -> Result<Value> {
        self.client
            .send(Method::POST, self.by_job_user("create", job_id, user_id), Body::Empty)
            .await
    }

    pub async fn update_status(&self, id: i64, status: &str) -> Result<Value> {
        let endpoint = self
            .endpoint()
            .path("update-status")
            .query("id", id)
            .query("status", status);
        self.client.send(Method::PATCH, endpoint, Body::Empty).await
    }

    pub async fn delete_by_job_user(&self, job_id: i64, user_id: i64) -> Result<Value> {
        self.client
            .send(
                Method::DELETE,
                self.by_job_user("delete-by-job-user", job_id, user_id),
                Body::Empty,
            )
            .await
    }
}
