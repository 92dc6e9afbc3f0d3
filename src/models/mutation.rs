use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// Outcome of a PUT. Zero modifications is reported, not treated as an error.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub success: bool,
    pub modified_count: u64,
}

/// Outcome of a DELETE. Zero removals is reported, not treated as an error.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub success: bool,
    pub deleted_count: u64,
}

impl UpdateResult {
    pub fn from_count(modified_count: u64) -> Self {
        Self {
            success: modified_count > 0,
            modified_count,
        }
    }
}

impl DeleteResult {
    pub fn from_count(deleted_count: u64) -> Self {
        Self {
            success: deleted_count > 0,
            deleted_count,
        }
    }
}
