use crate::database::postgres_repository::PostgresRepository;
use crate::database::profile::{PROFILE_EXISTS, ProfileRow, profile_insert_sql};
use crate::error::app_error::AppError;
use crate::models::profile::Profile;
use crate::models::user::{Signup, User};
use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::LazyLock;

pub(crate) const USER_EXISTS: &str = "User already exists";

/// A real Argon2 hash generated once, used as a timing decoy so that login
/// attempts for unknown emails cost the same as attempts for known ones.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| password_hash("dummy-never-matches").ok());

impl PostgresRepository {
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts the credential record and its profile in one transaction.
    pub async fn create_user_with_profile(&self, signup: &Signup<'_>) -> Result<(User, Profile), AppError> {
        let hash = password_hash(signup.credentials.password)?;
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(signup.credentials.email)
        .bind(&hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, USER_EXISTS))?;

        let row = sqlx::query_as::<_, ProfileRow>(&profile_insert_sql())
            .bind(signup.credentials.email)
            .bind(signup.name)
            .bind(signup.role.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, PROFILE_EXISTS))?;

        tx.commit().await?;

        Ok((user, Profile::try_from(row)?))
    }

    pub fn verify_password(user: &User, password: &str) -> Result<(), AppError> {
        let parsed = PasswordHash::new(&user.password_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AppError::InvalidCredentials)
    }

    /// Perform a throwaway Argon2 verification to equalize response timing
    /// regardless of whether the target account exists.
    pub fn dummy_verify(password: &str) {
        if let Some(hash) = DUMMY_HASH.as_deref()
            && let Ok(parsed) = PasswordHash::new(hash)
        {
            let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
        }
    }
}

pub(crate) fn password_hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;

    Ok(hash.to_string())
}
