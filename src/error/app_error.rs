use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use rocket_okapi::OpenApiError;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal server error")]
    PasswordHash { message: String },
    #[error("Internal server error")]
    Token {
        message: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} required")]
    MissingParameter(&'static str),
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Invalid id")]
    UuidError {
        message: String,
        #[source]
        source: uuid::Error,
    },
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Malformed request body")]
    MalformedBody(#[source] serde_json::Error),
}

/// Body of every error response.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }

    pub fn uuid(message: impl Into<String>, source: uuid::Error) -> Self {
        Self::UuidError {
            message: message.into(),
            source,
        }
    }

    pub fn password_hash(message: impl Into<String>, source: password_hash::Error) -> Self {
        Self::PasswordHash {
            message: format!("{}: {}", message.into(), source),
        }
    }

    pub fn token(message: impl Into<String>, source: jsonwebtoken::errors::Error) -> Self {
        Self::Token {
            message: message.into(),
            source,
        }
    }

    /// Maps a unique-constraint violation to `Conflict(message)`, anything else to a database error.
    pub fn conflict_on_unique(source: sqlx::Error, message: impl Into<String>) -> Self {
        let is_unique = source
            .as_database_error()
            .and_then(|e| e.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION);

        if is_unique {
            Self::Conflict(message.into())
        } else {
            Self::db("Database error", source)
        }
    }
}

impl From<password_hash::Error> for AppError {
    fn from(e: password_hash::Error) -> Self {
        AppError::password_hash("Password hashing failed", e)
    }
}

impl From<uuid::Error> for AppError {
    fn from(e: uuid::Error) -> Self {
        AppError::uuid("Invalid UUID", e)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AppError::token("Token encoding failed", e)
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::InvalidCredentials => Status::Unauthorized,
            AppError::Unauthorized => Status::Unauthorized,
            AppError::PasswordHash { .. } => Status::InternalServerError,
            AppError::Token { .. } => Status::InternalServerError,
            AppError::Db { .. } => Status::InternalServerError,
            AppError::Conflict(_) => Status::Conflict,
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::MissingParameter(_) => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::MethodNotAllowed => Status::MethodNotAllowed,
            AppError::UuidError { .. } => Status::BadRequest,
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::MalformedBody(_) => Status::UnprocessableEntity,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        let status = Status::from(&self);

        if status.class().is_server_error() {
            error!(
                error = ?self,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                "request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                "request rejected"
            );
        }

        let body = serde_json::to_string(&ErrorBody { error: self.to_string() }).map_err(|_| Status::InternalServerError)?;

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
        let mut responses = Responses::default();
        for (code, description) in [
            ("400", "Bad Request"),
            ("401", "Unauthorized"),
            ("404", "Not Found"),
            ("405", "Method Not Allowed"),
            ("409", "Conflict"),
            ("422", "Unprocessable Entity"),
            ("500", "Internal Server Error"),
        ] {
            responses.responses.insert(
                code.to_string(),
                RefOr::Object(OpenApiResponse {
                    description: description.to_string(),
                    ..Default::default()
                }),
            );
        }
        Ok(responses)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::db("Database error", e),
        }
    }
}
