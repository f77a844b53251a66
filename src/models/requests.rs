use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Request to search on one category
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategorySearchRequest {
    #[validate(length(min = 1))]
    pub ids: Vec<String>,
}

/// Request to search with arbitrary field overrides
///
/// Keys are wire field names such as `major` or `gpa`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamsSearchRequest {
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}
