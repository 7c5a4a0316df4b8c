//! `/users` resource client
//!
//! Profile sections (personal information, job reference, education,
//! eligibility, work experience, ...) each have a getter keyed by user id,
//! a creator and, for most, an updater taking the whole section payload.

use serde::Serialize;
use serde_json::Value;

use super::{Endpoint, PesoClient, Role};
use crate::error::Result;
use crate::transport::{Body, Method};

const RESOURCE: &str = "users";

/// Users and their profile sections
#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    client: &'a PesoClient,
}

impl<'a> UserService<'a> {
    pub(super) fn new(client: &'a PesoClient) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> Endpoint {
        self.client.endpoint(RESOURCE)
    }

    async fn get_section(&self, path: &str, id: i64) -> Result<Value> {
        self.client
            .get(self.endpoint().path(path).query("id", id))
            .await
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Value> {
        self.client
            .send_json(Method::POST, self.endpoint().path(path), payload)
            .await
    }

    async fn patch<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Value> {
        self.client
            .send_json(Method::PATCH, self.endpoint().path(path), payload)
            .await
    }

    // ────────────────────────────────────────────────────────────
    // Reads
    // ────────────────────────────────────────────────────────────

    pub async fn get_all(&self) -> Result<Value> {
        self.client.get(self.endpoint()).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Value> {
        self.get_section("get-by-id", id).await
    }

    pub async fn get_by_role(&self, role: Role) -> Result<Value> {
        self.client
            .get(self.endpoint().path("get-by-role").query("role", role))
            .await
    }

    /// Profile completeness as a number (the backend may answer a string)
    pub async fn get_profile_strength(&self, id: i64) -> Result<f64> {
        let value = self.get_section("get-profile-strength", id).await?;
        Ok(to_number(&value))
    }

    pub async fn get_credentials(&self, id: i64) -> Result<Value> {
        self.get_section("get-credentials", id).await
    }

    pub async fn get_personal_information(&self, id: i64) -> Result<Value> {
        self.get_section("get-personal-information", id).await
    }

    pub async fn get_job_reference(&self, id: i64) -> Result<Value> {
        self.get_section("get-job-reference", id).await
    }

    pub async fn get_language_proficiency(&self, id: i64) -> Result<Value> {
        self.get_section("get-language-profeciency", id).await
    }

    pub async fn get_educational_background(&self, id: i64) -> Result<Value> {
        self.get_section("get-educational-background", id).await
    }

    pub async fn get_tech_voc_trainings(&self, id: i64) -> Result<Value> {
        self.get_section("get-tech-voc-trainings", id).await
    }

    pub async fn get_eligibility(&self, id: i64) -> Result<Value> {
        self.get_section("get-eligibility", id).await
    }

    pub async fn get_prof_license(&self, id: i64) -> Result<Value> {
        self.get_section("get-prof-license", id).await
    }

    pub async fn get_work_experience(&self, id: i64) -> Result<Value> {
        self.get_section("get-work-experience", id).await
    }

    pub async fn get_other_skills(&self, id: i64) -> Result<Value> {
        self.get_section("get-other-skills", id).await
    }

    // ────────────────────────────────────────────────────────────
    // Creates
    // ────────────────────────────────────────────────────────────

    pub async fn create_personal_information<T: Serialize + ?Sized>(&self, info: &T) -> Result<Value> {
        self.post("create-personal-info", info).await
    }

    pub async fn create_job_reference<T: Serialize + ?Sized>(&self, job_ref: &T) -> Result<Value> {
        self.post("create-job-ref", job_ref).await
    }

    pub async fn create_language_proficiency<T: Serialize + ?Sized>(&self, language: &T) -> Result<Value> {
        self.post("create-language-prof", language).await
    }

    pub async fn create_educational_background<T: Serialize + ?Sized>(&self, education: &T) -> Result<Value> {
        self.post("create-educ-bg", education).await
    }

    pub async fn create_tech_voc_training<T: Serialize + ?Sized>(&self, training: &T) -> Result<Value> {
        self.post("create-techvoc-training", training).await
    }

    pub async fn create_eligibility<T: Serialize + ?Sized>(&self, eligibility: &T) -> Result<Value> {
        self.post("create-eligibility", eligibility).await
    }

    pub async fn create_professional_license<T: Serialize + ?Sized>(&self, license: &T) -> Result<Value> {
        self.post("create-prof-license", license).await
    }

    pub async fn create_work_experience<T: Serialize + ?Sized>(&self, work: &T) -> Result<Value> {
        self.post("create-work-exp", work).await
    }

    pub async fn create_other_skill<T: Serialize + ?Sized>(&self, skill: &T) -> Result<Value> {
        self.post("create-other-skill", skill).await
    }

    // ────────────────────────────────────────────────────────────
    // Updates
    // ────────────────────────────────────────────────────────────

    pub async fn update_credential<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        self.patch("update-credential", user).await
    }

    pub async fn update_personal_information<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        self.patch("update-personal-info", user).await
    }

    pub async fn update_job_reference<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        self.patch("update-job-ref", user).await
    }

    pub async fn update_language_proficiency<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        self.patch("update-language", user).await
    }

    pub async fn update_tech_voc_training<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        self.patch("update-techvoc-training", user).await
    }

    pub async fn update_eligibility<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        self.patch("update-eligibility", user).await
    }

    pub async fn update_professional_license<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        self.patch("update-prof-license", user).await
    }

    pub async fn update_work_experience<T: Serialize + ?Sized>(&self, user: &T) -> Result<Value> {
        self.patch("update-work-exp", user).await
    }

    // ────────────────────────────────────────────────────────────
    // Account state
    // ────────────────────────────────────────────────────────────

    pub async fn deactivate(&self, id: i64) -> Result<Value> {
        let endpoint = self.endpoint().path("deactivate").query("id", id);
        self.client.send(Method::PATCH, endpoint, Body::Empty).await
    }
}

/// Numeric coercion for loosely typed scalar answers.
///
/// Empty strings and `null` count as zero; anything unparseable is NaN.
fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}
