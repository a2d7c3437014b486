//! Database repository for properties.
//!
//! Properties are owned resources: every lookup is keyed by `(owner, id)` and
//! every list is filtered by owner, so rows belonging to another host never
//! load in the first place. Callers render a missing row as 404.

use std::collections::HashMap;

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::properties::{PropertyCreateDBRequest, PropertyDBResponse, PropertyUpdateDBRequest},
    },
    types::{abbrev_uuid, PropertyId, UserId},
};

const PROPERTY_COLUMNS: &str = "id, user_id, name, description, address, created_at";

/// Filter for listing a host's properties
#[derive(Debug, Clone)]
pub struct PropertyFilter {
    pub user_id: UserId,
    pub skip: i64,
    pub limit: i64,
}

impl PropertyFilter {
    pub fn new(user_id: UserId, skip: i64, limit: i64) -> Self {
        Self { user_id, skip, limit }
    }
}

pub struct Properties<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Properties<'c> {
    type CreateRequest = PropertyCreateDBRequest;
    type UpdateRequest = PropertyUpdateDBRequest;
    type Response = PropertyDBResponse;
    /// Lookups are always scoped to an owner
    type Id = (UserId, PropertyId);
    type Filter = PropertyFilter;

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&request.user_id), name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let property = sqlx::query_as::<_, PropertyDBResponse>(&format!(
            r#"
            INSERT INTO properties (user_id, name, description, address)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.address)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(property)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id.0), property_id = %abbrev_uuid(&id.1)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let (user_id, property_id) = id;
        let property = sqlx::query_as::<_, PropertyDBResponse>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1 AND user_id = $2"
        ))
        .bind(property_id)
        .bind(user_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(property)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        let property_ids: Vec<PropertyId> = ids.iter().map(|(_, id)| *id).collect();
        let rows = sqlx::query_as::<_, PropertyDBResponse>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ANY($1)"
        ))
        .bind(&property_ids)
        .fetch_all(&mut *self.db)
        .await?;

        // Keep only rows whose owner matches the requested pair
        Ok(rows
            .into_iter()
            .filter(|p| ids.contains(&(p.user_id, p.id)))
            .map(|p| ((p.user_id, p.id), p))
            .collect())
    }

    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id), limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let properties = sqlx::query_as::<_, PropertyDBResponse>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE user_id = $1 ORDER BY created_at LIMIT $2 OFFSET $3"
        ))
        .bind(filter.user_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(properties)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id.0), property_id = %abbrev_uuid(&id.1)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let (user_id, property_id) = id;
        let result = sqlx::query("DELETE FROM properties WHERE id = $1 AND user_id = $2")
            .bind(property_id)
            .bind(user_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&id.0), property_id = %abbrev_uuid(&id.1)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let (user_id, property_id) = id;
        let property = sqlx::query_as::<_, PropertyDBResponse>(&format!(
            r#"
            UPDATE properties
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                address = COALESCE($5, address)
            WHERE id = $1 AND user_id = $2
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(property_id)
        .bind(user_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.address)
        .fetch_optional(&mut *self.db)
        .await?;

        property.ok_or(DbError::NotFound)
    }
}

impl<'c> Properties<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All of a host's properties, oldest first. Used for the guest view
    /// where the whole portfolio is shown without pagination.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn list_all_for_user(&mut self, user_id: UserId) -> Result<Vec<PropertyDBResponse>> {
        let properties = sqlx::query_as::<_, PropertyDBResponse>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(properties)
    }

    /// Unscoped lookup by property id alone. Callers must check the owner
    /// themselves before returning the row to anyone.
    #[instrument(skip(self), fields(property_id = %abbrev_uuid(&property_id)), err)]
    pub async fn find_by_id(&mut self, property_id: PropertyId) -> Result<Option<PropertyDBResponse>> {
        let property = sqlx::query_as::<_, PropertyDBResponse>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(property_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(property)
    }

    /// Number of properties a host owns.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn count_for_user(&mut self, user_id: UserId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM properties WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_user;
    use sqlx::PgPool;

    fn create_request(user_id: UserId, name: &str) -> PropertyCreateDBRequest {
        PropertyCreateDBRequest {
            user_id,
            name: name.to_string(),
            description: Some("A lovely place".to_string()),
            address: Some("1 Example Street".to_string()),
        }
    }

    #[test_log::test(sqlx::test)]
    async fn test_create_and_get_property(pool: PgPool) {
        let user = create_test_user(&pool, "owner@example.com", "Password1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Properties::new(&mut conn);

        let created = repo.create(&create_request(user.id, "Seaside Flat")).await.unwrap();
        assert_eq!(created.user_id, user.id);
        assert_eq!(created.name, "Seaside Flat");

        let fetched = repo.get_by_id((user.id, created.id)).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[test_log::test(sqlx::test)]
    async fn test_foreign_owner_sees_nothing(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com", "Password1").await;
        let other = create_test_user(&pool, "other@example.com", "Password1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Properties::new(&mut conn);

        let created = repo.create(&create_request(owner.id, "Hidden House")).await.unwrap();

        // Reads scoped to the wrong owner come back empty
        assert!(repo.get_by_id((other.id, created.id)).await.unwrap().is_none());
        assert!(repo.list(&PropertyFilter::new(other.id, 0, 100)).await.unwrap().is_empty());

        // Updates and deletes scoped to the wrong owner touch nothing
        let update = PropertyUpdateDBRequest {
            name: Some("Stolen".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update((other.id, created.id), &update).await,
            Err(DbError::NotFound)
        ));
        assert!(!repo.delete((other.id, created.id)).await.unwrap());

        let still_there = repo.get_by_id((owner.id, created.id)).await.unwrap().unwrap();
        assert_eq!(still_there.name, "Hidden House");
    }

    #[test_log::test(sqlx::test)]
    async fn test_partial_update_preserves_other_fields(pool: PgPool) {
        let user = create_test_user(&pool, "update@example.com", "Password1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Properties::new(&mut conn);

        let created = repo.create(&create_request(user.id, "Old Name")).await.unwrap();
        let updated = repo
            .update(
                (user.id, created.id),
                &PropertyUpdateDBRequest {
                    name: Some("New Name".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.address, created.address);
    }

    #[test_log::test(sqlx::test)]
    async fn test_list_pagination(pool: PgPool) {
        let user = create_test_user(&pool, "list@example.com", "Password1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Properties::new(&mut conn);

        for i in 0..5 {
            repo.create(&create_request(user.id, &format!("Property {i}"))).await.unwrap();
        }

        let page = repo.list(&PropertyFilter::new(user.id, 2, 2)).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "Property 2");
        assert_eq!(page[1].name, "Property 3");

        assert_eq!(repo.count_for_user(user.id).await.unwrap(), 5);
    }

    #[test_log::test(sqlx::test)]
    async fn test_get_bulk_respects_owner_pairs(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com", "Password1").await;
        let other = create_test_user(&pool, "other@example.com", "Password1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Properties::new(&mut conn);

        let first = repo.create(&create_request(owner.id, "First")).await.unwrap();
        let second = repo.create(&create_request(owner.id, "Second")).await.unwrap();

        let bulk = repo
            .get_bulk(vec![
                (owner.id, first.id),
                // Wrong owner for an existing property: dropped from the result
                (other.id, second.id),
            ])
            .await
            .unwrap();

        assert_eq!(bulk.len(), 1);
        assert_eq!(bulk[&(owner.id, first.id)].name, "First");
    }

    #[test_log::test(sqlx::test)]
    async fn test_delete_property(pool: PgPool) {
        let user = create_test_user(&pool, "delete@example.com", "Password1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Properties::new(&mut conn);

        let created = repo.create(&create_request(user.id, "Short Lived")).await.unwrap();
        assert!(repo.delete((user.id, created.id)).await.unwrap());
        assert!(!repo.delete((user.id, created.id)).await.unwrap());
        assert!(repo.get_by_id((user.id, created.id)).await.unwrap().is_none());
    }
}
