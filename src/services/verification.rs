//! `/verifications` resource client, plus document uploads

use serde::Serialize;
use serde_json::Value;

use super::{Endpoint, PesoClient, Role};
use crate::error::{PesoError, Result};
use crate::transport::{Body, Method, MultipartForm};

const RESOURCE: &str = "verifications";
const UPLOADS: &str = "uploads";

/// A document to upload for verification
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a document from disk
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// Employer/job-seeker verification records
#[derive(Debug, Clone, Copy)]
pub struct VerificationService<'a> {
    client: &'a PesoClient,
}

impl<'a> VerificationService<'a> {
    pub(super) fn new(client: &'a PesoClient) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> Endpoint {
        self.client.endpoint(RESOURCE)
    }

    /// `None` asks for every role (`?role=`)
    pub async fn get_by_role(&self, role: Option<Role>) -> Result<Value> {
        let role = role.map(|r| r.as_str()).unwrap_or("");
        self.client.get(self.endpoint().query("role", role)).await
    }

    pub async fn get_by_user(&self, user_id: i64) -> Result<Value> {
        self.client
            .get(self.endpoint().path("get-by-user").query("id", user_id))
            .await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, verification: &T) -> Result<Value> {
        self.client
            .send_json(Method::POST, self.endpoint().path("create"), verification)
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

    /// Upload one document as the multipart `file` field to `/uploads/{role}`
    pub async fn upload_document(&self, file: UploadFile, role: Role) -> Result<Value> {
        let endpoint = self.client.endpoint(UPLOADS).path(role.as_str());
        let form = MultipartForm::new().file("file", file.file_name, file.mime, file.bytes);

        self.client
            .send(Method::POST, endpoint, Body::Multipart(form))
            .await
            .map_err(|e| match e {
                PesoError::Request { status, .. } => PesoError::Upload {
                    reason: format!("Upload failed with code {}", status),
                },
                PesoError::Upload { .. } => e,
                other => PesoError::Upload {
                    reason: other.to_string(),
                },
            })
    }
}
