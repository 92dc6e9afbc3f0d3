use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::profile::{Profile, ProfileRequest, ProfileUpdateRequest};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub(crate) const PROFILE_EXISTS: &str = "Profile already exists";

const PROFILE_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

// Intermediate struct for sqlx query results with role as text
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProfileRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e| AppError::db("Stored profile has an unknown role", sqlx::Error::Decode(Box::new(e))))?;

        Ok(Profile {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn profile_insert_sql() -> String {
    format!(
        r#"
        INSERT INTO profiles (email, name, role)
        VALUES ($1, $2, $3)
        RETURNING {PROFILE_COLUMNS}
        "#
    )
}

#[async_trait::async_trait]
pub trait ProfileRepository {
    async fn create_profile(&self, request: &ProfileRequest) -> Result<Profile, AppError>;
    async fn get_profile_by_id(&self, id: &Uuid) -> Result<Option<Profile>, AppError>;
    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError>;
    async fn list_profiles(&self) -> Result<Vec<Profile>, AppError>;
    async fn update_profile(&self, id: &Uuid, request: &ProfileUpdateRequest) -> Result<u64, AppError>;
    async fn delete_profile(&self, id: &Uuid) -> Result<u64, AppError>;
}

#[async_trait::async_trait]
impl ProfileRepository for PostgresRepository {
    async fn create_profile(&self, request: &ProfileRequest) -> Result<Profile, AppError> {
        if self.get_profile_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(PROFILE_EXISTS.to_string()));
        }

        // The pre-check gives the common case a clean answer; the unique constraint settles races.
        let row = sqlx::query_as::<_, ProfileRow>(&profile_insert_sql())
            .bind(&request.email)
            .bind(&request.name)
            .bind(request.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, PROFILE_EXISTS))?;

        Profile::try_from(row)
    }

    async fn get_profile_by_id(&self, id: &Uuid) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Profile::try_from).transpose()
    }

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Profile::try_from).transpose()
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, AppError> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC, id DESC"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn update_profile(&self, id: &Uuid, request: &ProfileUpdateRequest) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET email = COALESCE($1, email),
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $4
            "#,
        )
        .bind(&request.email)
        .bind(&request.name)
        .bind(request.role.map(|role| role.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, PROFILE_EXISTS))?;

        Ok(result.rows_affected())
    }

    async fn delete_profile(&self, id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }
}
