use serde::{Deserialize, Serialize};
use crate::models::domain::{ScholarshipDetail, Scholarships};

/// Response for the search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScholarshipsResponse {
    pub scholarships: Scholarships,
    pub total_results: usize,
}

impl From<Scholarships> for ScholarshipsResponse {
    fn from(scholarships: Scholarships) -> Self {
        Self {
            total_results: scholarships.len(),
            scholarships,
        }
    }
}

/// Response for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    pub s_uuid: String,
    pub details: ScholarshipDetail,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
