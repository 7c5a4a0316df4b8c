//! `/jobs` resource client

use serde::Serialize;
use serde_json::Value;

use super::{Endpoint, PesoClient};
use crate::error::Result;
use crate::transport::{Body, Method};

const RESOURCE: &str = "jobs";

/// Job postings, skills and saved jobs
#[derive(Debug, Clone, Copy)]
pub struct JobService<'a> {
    client: &'a PesoClient,
}

impl<'a> JobService<'a> {
    pub(super) fn new(client: &'a PesoClient) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> Endpoint {
        self.client.endpoint(RESOURCE)
    }

    fn by_id(&self, path: &str, id: i64) -> Endpoint {
        self.endpoint().path(path).query("id", id)
    }

    // ────────────────────────────────────────────────────────────
    // Reads
    // ────────────────────────────────────────────────────────────

    pub async fn get_all(&self) -> Result<Value> {
        self.client.get(self.endpoint()).await
    }

    /// One page of postings (`?page=&size=`, page counted from 0)
    pub async fn get_page(&self, page: u32, size: u32) -> Result<Value> {
        let endpoint = self.endpoint().query("page", page).query("size", size);
        self.client.get(endpoint).await
    }

    pub async fn get_recommended(&self, user_id: i64) -> Result<Value> {
        self.client.get(self.by_id("get-recommended", user_id)).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Value> {
        self.client.get(self.by_id("get-by-id", id)).await
    }

    pub async fn get_job_skills(&self, id: i64) -> Result<Value> {
        self.client.get(self.by_id("get-job-skills", id)).await
    }

    pub async fn get_by_employer(&self, employer_id: i64) -> Result<Value> {
        self.client.get(self.by_id("get-by-employer", employer_id)).await
    }

    pub async fn get_saved_by_user(&self, user_id: i64) -> Result<Value> {
        self.client
            .get(self.by_id("get-all-saved-jobs-by-user", user_id))
            .await
    }

    pub async fn get_saved_by_user_job(&self, user_id: i64, job_id: i64) -> Result<Value> {
        let endpoint = self
            .endpoint()
            .path("get-saved-job-by-user-job")
            .query("userId", user_id)
            .query("jobId", job_id);
        self.client.get(endpoint).await
    }

    // ────────────────────────────────────────────────────────────
    // Writes
    // ────────────────────────────────────────────────────────────

    pub async fn create<T: Serialize + ?Sized>(&self, job: &T) -> Result<Value> {
        self.client
            .send_json(Method::POST, self.endpoint().path("create"), job)
            .await
    }

    pub async fn create_job_skill<T: Serialize + ?Sized>(&self, job_skill: &T) -> Result<Value> {
        self.client
            .send_json(Method::POST, self.endpoint().path("create-job-skill"), job_skill)
            .await
    }

    pub async fn save(&self, user_id: i64, job_id: i64) -> Result<Value> {
        let endpoint = self
            .endpoint()
            .path("save-job")
            .query("userId", user_id)
            .query("jobId", job_id);
        self.client.send(Method::POST, endpoint, Body::Empty).await
    }

    pub async fn update<T: Serialize + ?Sized>(&self, job: &T) -> Result<Value> {
        self.client
            .send_json(Method::PATCH, self.endpoint().path("update"), job)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<Value> {
        self.client
            .send(Method::DELETE, self.by_id("delete", id), Body::Empty)
            .await
    }
}
