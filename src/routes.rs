pub mod auth;
pub mod error;
pub mod health;
pub mod listing;
pub mod profile;

use crate::error::app_error::AppError;
use uuid::Uuid;

/// `?id=` is mandatory for updates and deletes and must be a UUID.
pub(crate) fn require_id(id: Option<String>) -> Result<Uuid, AppError> {
    let id = id.filter(|value| !value.trim().is_empty()).ok_or(AppError::MissingParameter("ID"))?;
    Uuid::parse_str(id.trim()).map_err(|e| AppError::uuid(format!("Invalid id {:?}", id), e))
}
