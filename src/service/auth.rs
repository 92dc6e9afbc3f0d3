use crate::database::postgres_repository::PostgresRepository;
use crate::database::profile::{PROFILE_EXISTS, ProfileRepository};
use crate::database::user::USER_EXISTS;
use crate::error::app_error::AppError;
use crate::models::user::{AuthRequest, AuthResponse, UserSummary};
use crate::service::token::TokenService;
use std::str::FromStr;
use tracing::info;
use validator::ValidateEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Signup,
    Login,
}

impl FromStr for AuthAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "signup" => Ok(AuthAction::Signup),
            "login" => Ok(AuthAction::Login),
            _ => Err(AppError::BadRequest("Invalid action".to_string())),
        }
    }
}

pub struct AuthService<'a> {
    repo: &'a PostgresRepository,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(repo: &'a PostgresRepository, tokens: &'a TokenService) -> Self {
        AuthService { repo, tokens }
    }

    pub async fn handle(&self, action: AuthAction, request: &AuthRequest) -> Result<AuthResponse, AppError> {
        match action {
            AuthAction::Signup => self.signup(request).await,
            AuthAction::Login => self.login(request).await,
        }
    }

    pub async fn signup(&self, request: &AuthRequest) -> Result<AuthResponse, AppError> {
        let signup = request
            .signup()
            .ok_or_else(|| AppError::BadRequest("Email, password, name and role are required".to_string()))?;
        let email = signup.credentials.email;
        if !email.validate_email() {
            return Err(AppError::BadRequest("Invalid email".to_string()));
        }

        if self.repo.get_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(USER_EXISTS.to_string()));
        }
        if self.repo.get_profile_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(PROFILE_EXISTS.to_string()));
        }

        let (user, profile) = self.repo.create_user_with_profile(&signup).await?;
        let token = self.tokens.issue(&user.id, &user.email)?;

        info!(user_id = %user.id, role = %profile.role, "user signed up");

        Ok(AuthResponse {
            token,
            user: UserSummary::new(&user.email, Some(&profile)),
        })
    }

    pub async fn login(&self, request: &AuthRequest) -> Result<AuthResponse, AppError> {
        let credentials = request
            .credentials()
            .ok_or_else(|| AppError::BadRequest("Email and password are required".to_string()))?;

        let Some(user) = self.repo.get_user_by_email(credentials.email).await? else {
            PostgresRepository::dummy_verify(credentials.password);
            return Err(AppError::InvalidCredentials);
        };
        PostgresRepository::verify_password(&user, credentials.password)?;

        let profile = self.repo.get_profile_by_email(&user.email).await?;
        let token = self.tokens.issue(&user.id, &user.email)?;

        info!(user_id = %user.id, "user logged in");

        Ok(AuthResponse {
            token,
            user: UserSummary::new(&user.email, profile.as_ref()),
        })
    }
}
