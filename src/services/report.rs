//! `/reports` resource client

use serde_json::Value;

use super::{PesoClient, ReportKind};
use crate::error::Result;

const RESOURCE: &str = "reports";

/// Aggregated counts for the admin dashboards
#[derive(Debug, Clone, Copy)]
pub struct ReportService<'a> {
    client: &'a PesoClient,
}

impl<'a> ReportService<'a> {
    pub(super) fn new(client: &'a PesoClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, kind: ReportKind) -> Result<Value> {
        self.client
            .get(self.client.endpoint(RESOURCE).path(kind.path()))
            .await
    }

    pub async fn highest_education(&self) -> Result<Value> {
        self.get(ReportKind::HighestEducation).await
    }

    pub async fn genders(&self) -> Result<Value> {
        self.get(ReportKind::Genders).await
    }

    pub async fn placements(&self) -> Result<Value> {
        self.get(ReportKind::Placements).await
    }

    pub async fn employer_types(&self) -> Result<Value> {
        self.get(ReportKind::EmployerTypes).await
    }

    pub async fn clientele(&self) -> Result<Value> {
        self.get(ReportKind::Clientele).await
    }

    pub async fn citmun(&self) -> Result<Value> {
        self.get(ReportKind::Citmun).await
    }
}
