//! Deterministic URL composition for resource clients
//!
//! An [`Endpoint`] is a pure function of its inputs: the same base, path
//! segments and query pairs always render the same URL.

use std::fmt::Display;

use url::Url;

/// A fully composed backend URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Start at `{base}/{resource}`
    pub fn new(base: &Url, resource: &str) -> Self {
        Self { url: base.clone() }.path(resource)
    }

    /// Append one path segment (percent-encoded)
    pub fn path(mut self, segment: &str) -> Self {
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        self
    }

    /// Append one query pair (percent-encoded)
    pub fn query(mut self, key: &str, value: impl Display) -> Self {
        self.url
            .query_pairs_mut()
            .append_pair(key, &value.to_string());
        self
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:3005").unwrap()
    }

    #[test]
    fn resource_root_has_no_trailing_slash() {
        assert_eq!(
            Endpoint::new(&base(), "jobs").as_str(),
            "http://localhost:3005/jobs"
        );
    }

    #[test]
    fn path_and_query_compose_in_order() {
        let ep = Endpoint::new(&base(), "applications")
            .path("get-by-job-user")
            .query("jobId", 3)
            .query("userId", 9);
        assert_eq!(
            ep.as_str(),
            "http://localhost:3005/applications/get-by-job-user?jobId=3&userId=9"
        );
    }

    #[test]
    fn base_with_prefix_path_is_kept() {
        let base = Url::parse("https://peso.example.org/api/").unwrap();
        assert_eq!(
            Endpoint::new(&base, "users").path("get-by-id").query("id", 1).as_str(),
            "https://peso.example.org/api/users/get-by-id?id=1"
        );
    }

    #[test]
    fn empty_query_value_renders_key() {
        let ep = Endpoint::new(&base(), "verifications").query("role", "");
        assert_eq!(ep.as_str(), "http://localhost:3005/verifications?role=");
    }

    #[test]
    fn values_are_percent_encoded() {
        let ep = Endpoint::new(&base(), "applications")
            .path("update-status")
            .query("status", "for interview");
        assert_eq!(
            ep.as_str(),
            "http://localhost:3005/applications/update-status?status=for+interview"
        );
    }

    #[test]
    fn composition_is_deterministic() {
        let a = Endpoint::new(&base(), "jobs").path("get-by-id").query("id", 0);
        let b = Endpoint::new(&base(), "jobs").path("get-by-id").query("id", 0);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "http://localhost:3005/jobs/get-by-id?id=0");
    }
}
