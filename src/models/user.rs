use crate::models::profile::{Profile, Role};
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;

/// Credential record. The password is only ever held as an Argon2 PHC string.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Body shared by `?action=signup` and `?action=login`; `name` and `role` only matter for signup.
#[derive(Deserialize, Serialize, Debug, Default, Clone, JsonSchema)]
pub struct AuthRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug)]
pub struct Signup<'a> {
    pub credentials: Credentials<'a>,
    pub name: &'a str,
    pub role: Role,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AuthRequest {
    /// Email and password, both required and non-blank. The password is not trimmed.
    pub fn credentials(&self) -> Option<Credentials<'_>> {
        let email = non_blank(&self.email)?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some(Credentials { email, password })
    }

    pub fn signup(&self) -> Option<Signup<'_>> {
        let credentials = self.credentials()?;
        let name = non_blank(&self.name)?;
        let role = self.role?;
        Some(Signup { credentials, name, role })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct UserSummary {
    pub email: String,
    pub name: Option<String>,
    pub role: Option<Role>,
}

impl UserSummary {
    pub fn new(email: &str, profile: Option<&Profile>) -> Self {
        Self {
            email: email.to_string(),
            name: profile.map(|p| p.name.clone()),
            role: profile.map(|p| p.role),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}
