use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Recipient,
    Volunteer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Recipient => "recipient",
            Role::Volunteer => "volunteer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "donor" => Ok(Role::Donor),
            "recipient" => Ok(Role::Recipient),
            "volunteer" => Ok(Role::Volunteer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Validate, JsonSchema)]
pub struct ProfileRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub role: Role,
}

#[derive(Deserialize, Serialize, Debug, Default, Validate, JsonSchema)]
pub struct ProfileUpdateRequest {
    #[validate(email)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// `GET /profiles` answers with one profile for `?id=`/`?email=`, otherwise all of them.
#[derive(Serialize, Debug, JsonSchema)]
#[serde(untagged)]
pub enum ProfileLookup {
    One(ProfileResponse),
    All(Vec<ProfileResponse>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::serde::json::serde_json;

    #[test]
    fn roles_round_trip_through_storage_text() {
        for role in [Role::Donor, Role::Recipient, Role::Volunteer] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn role_wire_format_is_lowercase() {
        let request: ProfileRequest = serde_json::from_str(r#"{"email":"a@b.org","name":"Ana","role":"volunteer"}"#).unwrap();
        assert_eq!(request.role, Role::Volunteer);
        assert!(serde_json::from_str::<ProfileRequest>(r#"{"email":"a@b.org","name":"Ana","role":"Admin"}"#).is_err());
    }

    #[test]
    fn profile_request_validation() {
        let valid = ProfileRequest {
            email: "donor@farm.org".to_string(),
            name: "Green Valley Farm".to_string(),
            role: Role::Donor,
        };
        assert!(valid.validate().is_ok());

        let bad_email = ProfileRequest {
            email: "not-an-email".to_string(),
            ..valid
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(ProfileUpdateRequest::default().validate().is_ok());

        let update = ProfileUpdateRequest {
            name: Some(String::new()),
            ..ProfileUpdateRequest::default()
        };
        assert!(update.validate().is_err());
    }
}
