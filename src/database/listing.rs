use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::listing::{Listing, ListingRequest, ListingUpdateRequest};
use uuid::Uuid;

const LISTING_COLUMNS: &str = "id, title, donor, quantity, expiry, location, status, user_id, created_at, updated_at";

#[async_trait::async_trait]
pub trait ListingRepository {
    async fn create_listing(&self, request: &ListingRequest) -> Result<Listing, AppError>;
    async fn get_listing_by_id(&self, id: &Uuid) -> Result<Option<Listing>, AppError>;
    async fn list_listings(&self) -> Result<Vec<Listing>, AppError>;
    /// Returns the number of listings modified (0 or 1).
    async fn update_listing(&self, id: &Uuid, request: &ListingUpdateRequest) -> Result<u64, AppError>;
    /// Returns the number of listings removed (0 or 1).
    async fn delete_listing(&self, id: &Uuid) -> Result<u64, AppError>;
}

#[async_trait::async_trait]
impl ListingRepository for PostgresRepository {
    async fn create_listing(&self, request: &ListingRequest) -> Result<Listing, AppError> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            r#"
            INSERT INTO listings (title, donor, quantity, expiry, location, status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(&request.title)
        .bind(&request.donor)
        .bind(&request.quantity)
        .bind(&request.expiry)
        .bind(&request.location)
        .bind(&request.status)
        .bind(&request.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(listing)
    }

    async fn get_listing_by_id(&self, id: &Uuid) -> Result<Option<Listing>, AppError> {
        let listing = sqlx::query_as::<_, Listing>(&format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, AppError> {
        let listings = sqlx::query_as::<_, Listing>(&format!("SELECT {LISTING_COLUMNS} FROM listings ORDER BY created_at DESC, id DESC"))
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    async fn update_listing(&self, id: &Uuid, request: &ListingUpdateRequest) -> Result<u64, AppError> {
        // updated_at must move forward even when two updates land in the same clock tick
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET title = COALESCE($1, title),
                donor = COALESCE($2, donor),
                quantity = COALESCE($3, quantity),
                expiry = COALESCE($4, expiry),
                location = COALESCE($5, location),
                status = COALESCE($6, status),
                user_id = COALESCE($7, user_id),
                updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $8
            "#,
        )
        .bind(&request.title)
        .bind(&request.donor)
        .bind(&request.quantity)
        .bind(&request.expiry)
        .bind(&request.location)
        .bind(&request.status)
        .bind(&request.user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_listing(&self, id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_repository;

    fn milk() -> ListingRequest {
        ListingRequest {
            title: "Milk".to_string(),
            donor: "Farm A".to_string(),
            quantity: "2L".to_string(),
            expiry: "2025-01-01".to_string(),
            location: "East".to_string(),
            status: "available".to_string(),
            user_id: Some("u1".to_string()),
        }
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn create_then_get_returns_input_with_server_fields() {
        let repo = test_repository().await;
        let created = repo.create_listing(&milk()).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let fetched = repo.get_listing_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Milk");
        assert_eq!(fetched.donor, "Farm A");
        assert_eq!(fetched.quantity, "2L");
        assert_eq!(fetched.user_id.as_deref(), Some("u1"));

        repo.delete_listing(&created.id).await.unwrap();
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn partial_update_touches_only_named_fields() {
        let repo = test_repository().await;
        let created = repo.create_listing(&milk()).await.unwrap();

        let update = ListingUpdateRequest {
            quantity: Some("3L".to_string()),
            ..ListingUpdateRequest::default()
        };
        assert_eq!(repo.update_listing(&created.id, &update).await.unwrap(), 1);

        let fetched = repo.get_listing_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.quantity, "3L");
        assert_eq!(fetched.title, created.title);
        assert_eq!(fetched.location, created.location);
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at > created.updated_at);

        repo.delete_listing(&created.id).await.unwrap();
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn second_delete_reports_nothing_removed() {
        let repo = test_repository().await;
        let created = repo.create_listing(&milk()).await.unwrap();

        assert_eq!(repo.delete_listing(&created.id).await.unwrap(), 1);
        assert_eq!(repo.delete_listing(&created.id).await.unwrap(), 0);
        assert!(repo.get_listing_by_id(&created.id).await.unwrap().is_none());
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn update_of_missing_listing_modifies_nothing() {
        let repo = test_repository().await;
        let update = ListingUpdateRequest {
            title: Some("Ghost".to_string()),
            ..ListingUpdateRequest::default()
        };
        assert_eq!(repo.update_listing(&Uuid::new_v4(), &update).await.unwrap(), 0);
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn listings_are_newest_first() {
        let repo = test_repository().await;
        let first = repo.create_listing(&milk()).await.unwrap();
        let second = repo.create_listing(&milk()).await.unwrap();

        let listings = repo.list_listings().await.unwrap();
        let first_pos = listings.iter().position(|l| l.id == first.id).unwrap();
        let second_pos = listings.iter().position(|l| l.id == second.id).unwrap();
        assert!(second_pos < first_pos);

        repo.delete_listing(&first.id).await.unwrap();
        repo.delete_listing(&second.id).await.unwrap();
    }
}
