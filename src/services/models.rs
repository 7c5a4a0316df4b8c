//! Request and response shapes shared by the resource clients
//!
//! Most endpoints are passed through as `serde_json::Value`; only the shapes
//! the client itself inspects are typed here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Portal roles, rendered the way the backend spells them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    JobSeeker,
    Employer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "job_seeker",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "job_seeker" => Ok(Role::JobSeeker),
            "employer" => Ok(Role::Employer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Admin dashboard aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    HighestEducation,
    Genders,
    Placements,
    EmployerTypes,
    Clientele,
    Citmun,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::HighestEducation,
        ReportKind::Genders,
        ReportKind::Placements,
        ReportKind::EmployerTypes,
        ReportKind::Clientele,
        ReportKind::Citmun,
    ];

    /// Path segment under `/reports`
    pub fn path(&self) -> &'static str {
        match self {
            ReportKind::HighestEducation => "highest-education",
            ReportKind::Genders => "genders",
            ReportKind::Placements => "placements",
            ReportKind::EmployerTypes => "employer-types",
            ReportKind::Clientele => "clientele",
            ReportKind::Citmun => "citmun",
        }
    }
}

impl FromStr for ReportKind {
    type Err = String;

    /// Accepts the path segment, e.g. `employer-types`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.path() == wanted)
            .ok_or_else(|| format!("unknown report '{}'", s.trim()))
    }
}

/// Login form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub email_or_username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email_or_username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email_or_username: email_or_username.into(),
            password: password.into(),
        }
    }
}

/// Answer to `POST /auth/login`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub user: Option<Value>,

    /// `"inactive"` for deactivated accounts
    #[serde(default)]
    pub status: Option<String>,
}

impl LoginResponse {
    pub fn is_inactive(&self) -> bool {
        self.status.as_deref() == Some("inactive")
    }
}

/// Body of `POST /auth/reset-password`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_roundtrips_through_strings() {
        for role in [Role::JobSeeker, Role::Employer, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" Employer ".parse::<Role>().unwrap(), Role::Employer);
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_value(Role::JobSeeker).unwrap(), json!("job_seeker"));
    }

    #[test]
    fn credentials_use_backend_field_names() {
        let creds = LoginCredentials::new("ana@example.org", "secret");
        assert_eq!(
            serde_json::to_value(&creds).unwrap(),
            json!({"emailOrUsername": "ana@example.org", "password": "secret"})
        );
    }

    #[test]
    fn reset_password_uses_camel_case() {
        let req = ResetPasswordRequest {
            email: "a@b.c".into(),
            token: "t".into(),
            new_password: "n".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"email": "a@b.c", "token": "t", "newPassword": "n"})
        );
    }

    #[test]
    fn login_response_tolerates_missing_fields() {
        let resp: LoginResponse = serde_json::from_value(json!({"status": "inactive"})).unwrap();
        assert!(resp.is_inactive());
        assert!(resp.token.is_none());
    }

    #[test]
    fn report_paths_are_distinct() {
        let mut paths: Vec<_> = ReportKind::ALL.iter().map(|k| k.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), ReportKind::ALL.len());
    }

    #[test]
    fn report_kind_parses_path_or_snake_case() {
        assert_eq!("employer-types".parse::<ReportKind>().unwrap(), ReportKind::EmployerTypes);
        assert_eq!("highest_education".parse::<ReportKind>().unwrap(), ReportKind::HighestEducation);
        assert!("salaries".parse::<ReportKind>().is_err());
    }
}
