//! Repository layer for farms and their products

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};

use super::models::{FarmFields, FarmRow, ProductFields, ProductRow};
use crate::db::StoreError;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Lowest-id farm of the owner.
    async fn farm_for_owner(&self, owner_id: i64) -> Result<Option<FarmRow>, StoreError>;

    async fn farm_by_id(&self, farm_id: i64) -> Result<Option<FarmRow>, StoreError>;

    /// Fails with [`StoreError::FarmAlreadyExists`] when the owner has one.
    async fn create_farm(
        &self,
        owner_id: i64,
        fields: &FarmFields,
        image_url: &str,
    ) -> Result<FarmRow, StoreError>;

    /// `image_url = None` keeps the current picture.
    async fn update_farm(
        &self,
        farm_id: i64,
        fields: &FarmFields,
        image_url: Option<&str>,
    ) -> Result<Option<FarmRow>, StoreError>;

    async fn delete_farm(&self, farm_id: i64) -> Result<bool, StoreError>;

    async fn list_products(&self) -> Result<Vec<ProductRow>, StoreError>;

    async fn list_farm_products(&self, farm_id: i64) -> Result<Vec<ProductRow>, StoreError>;

    async fn product_in_farm(
        &self,
        product_id: i64,
        farm_id: i64,
    ) -> Result<Option<ProductRow>, StoreError>;

    /// Inserts the status row and the product atomically.
    async fn create_product(
        &self,
        farm_id: i64,
        fields: &ProductFields,
        image_url: &str,
    ) -> Result<ProductRow, StoreError>;

    /// `None` when the product is not in `farm_id`.
    async fn update_product(
        &self,
        product_id: i64,
        farm_id: i64,
        fields: &ProductFields,
        image_url: Option<&str>,
    ) -> Result<Option<ProductRow>, StoreError>;

    /// False when the product is not in `farm_id`.
    async fn delete_product(&self, product_id: i64, farm_id: i64) -> Result<bool, StoreError>;
}

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) const FARM_SELECT: &str = r#"
    SELECT f.id, f.owner_id, a.nama AS owner_name, f.name, f.farm_type,
           f.phonenumber_farm, f.email, f.description,
           ST_Y(f.location::geometry) AS latitude, ST_X(f.location::geometry) AS longitude,
           f.street, f.city, f.province, f.postal_code, f.country, f.image_farm,
           f.created_at, f.updated_at
    FROM farms f
    JOIN akun a ON a.id_user = f.owner_id"#;

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.farm_id, p.name, p.description, p.price_per_kg, p.weight_per_unit,
           p.stock_kg, p.status_id, s.name AS status_name, s.available_date,
           p.image_url, p.created_at, p.updated_at
    FROM farm_products p
    LEFT JOIN status_product s ON s.id = p.status_id"#;

async fn fetch_product<'e, E: PgExecutor<'e>>(
    executor: E,
    product_id: i64,
) -> Result<ProductRow, sqlx::Error> {
    sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
        .bind(product_id)
        .fetch_one(executor)
        .await
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn farm_for_owner(&self, owner_id: i64) -> Result<Option<FarmRow>, StoreError> {
        let row = sqlx::query_as::<_, FarmRow>(&format!(
            "{FARM_SELECT} WHERE f.owner_id = $1 ORDER BY f.id LIMIT 1"
        ))
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn farm_by_id(&self, farm_id: i64) -> Result<Option<FarmRow>, StoreError> {
        let row = sqlx::query_as::<_, FarmRow>(&format!("{FARM_SELECT} WHERE f.id = $1"))
            .bind(farm_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_farm(
        &self,
        owner_id: i64,
        fields: &FarmFields,
        image_url: &str,
    ) -> Result<FarmRow, StoreError> {
        let farm_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO farms
                 (owner_id, name, farm_type, phonenumber_farm, email, description, location,
                  street, city, province, postal_code, country, image_farm)
               VALUES ($1, $2, $3, $4, $5, $6,
                       ST_SetSRID(ST_MakePoint($7, $8), 4326)::geography,
                       $9, $10, $11, $12, $13, $14)
               RETURNING id"#,
        )
        .bind(owner_id)
        .bind(&fields.name)
        .bind(&fields.farm_type)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.description)
        .bind(fields.location.longitude)
        .bind(fields.location.latitude)
        .bind(&fields.address.street)
        .bind(&fields.address.city)
        .bind(&fields.address.province)
        .bind(&fields.address.postal_code)
        .bind(&fields.address.country)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match StoreError::from_constraint(e, "farm owner", "account") {
            StoreError::Duplicate(_) => StoreError::FarmAlreadyExists,
            other => other,
        })?;

        tracing::info!(farm_id, owner_id, "Farm created");
        self.farm_by_id(farm_id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn update_farm(
        &self,
        farm_id: i64,
        fields: &FarmFields,
        image_url: Option<&str>,
    ) -> Result<Option<FarmRow>, StoreError> {
        let result = sqlx::query(
            r#"UPDATE farms SET
                 name = $2, farm_type = $3, phonenumber_farm = $4, email = $5, description = $6,
                 location = ST_SetSRID(ST_MakePoint($7, $8), 4326)::geography,
                 street = $9, city = $10, province = $11, postal_code = $12, country = $13,
                 image_farm = COALESCE($14, image_farm), updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(farm_id)
        .bind(&fields.name)
        .bind(&fields.farm_type)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.description)
        .bind(fields.location.longitude)
        .bind(fields.location.latitude)
        .bind(&fields.address.street)
        .bind(&fields.address.city)
        .bind(&fields.address.province)
        .bind(&fields.address.postal_code)
        .bind(&fields.address.country)
        .bind(image_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.farm_by_id(farm_id).await
    }

    async fn delete_farm(&self, farm_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(farm_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_constraint(e, "farm", "farm"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self) -> Result<Vec<ProductRow>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} ORDER BY p.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_farm_products(&self, farm_id: i64) -> Result<Vec<ProductRow>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.farm_id = $1 ORDER BY p.id"
        ))
        .bind(farm_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn product_in_farm(
        &self,
        product_id: i64,
        farm_id: i64,
    ) -> Result<Option<ProductRow>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.id = $1 AND p.farm_id = $2"
        ))
        .bind(product_id)
        .bind(farm_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_product(
        &self,
        farm_id: i64,
        fields: &ProductFields,
        image_url: &str,
    ) -> Result<ProductRow, StoreError> {
        let mut tx = self.pool.begin().await?;

        let status_id: i64 = sqlx::query_scalar(
            "INSERT INTO status_product (name, available_date) VALUES ($1, $2) RETURNING id",
        )
        .bind(&fields.status_name)
        .bind(fields.available_date)
        .fetch_one(&mut *tx)
        .await?;

        let product_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO farm_products
                 (farm_id, name, description, price_per_kg, weight_per_unit, stock_kg,
                  status_id, image_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id"#,
        )
        .bind(farm_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price_per_kg)
        .bind(fields.weight_per_unit)
        .bind(fields.stock_kg)
        .bind(status_id)
        .bind(image_url)
        .fetch_one(&mut *tx)
        .await?;

        let row = fetch_product(&mut *tx, product_id).await?;
        tx.commit().await?;

        tracing::info!(product_id, farm_id, "Product created");
        Ok(row)
    }

    async fn update_product(
        &self,
        product_id: i64,
        farm_id: i64,
        fields: &ProductFields,
        image_url: Option<&str>,
    ) -> Result<Option<ProductRow>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<Option<i64>> = sqlx::query_scalar(
            "SELECT status_id FROM farm_products WHERE id = $1 AND farm_id = $2 FOR UPDATE",
        )
        .bind(product_id)
        .bind(farm_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(status_id) = current else {
            return Ok(None);
        };

        let status_id = match status_id {
            Some(id) => {
                sqlx::query("UPDATE status_product SET name = $2, available_date = $3 WHERE id = $1")
                    .bind(id)
                    .bind(&fields.status_name)
                    .bind(fields.available_date)
                    .execute(&mut *tx)
                    .await?;
                id
            }
            None => {
                sqlx::query_scalar(
                    "INSERT INTO status_product (name, available_date) VALUES ($1, $2) RETURNING id",
                )
                .bind(&fields.status_name)
                .bind(fields.available_date)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        sqlx::query(
            r#"UPDATE farm_products SET
                 name = $3, description = $4, price_per_kg = $5, weight_per_unit = $6,
                 stock_kg = $7, status_id = $8, image_url = COALESCE($9, image_url),
                 updated_at = NOW()
               WHERE id = $1 AND farm_id = $2"#,
        )
        .bind(product_id)
        .bind(farm_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price_per_kg)
        .bind(fields.weight_per_unit)
        .bind(fields.stock_kg)
        .bind(status_id)
        .bind(image_url)
        .execute(&mut *tx)
        .await?;

        let row = fetch_product(&mut *tx, product_id).await?;
        tx.commit().await?;
        Ok(Some(row))
    }

    async fn delete_product(&self, product_id: i64, farm_id: i64) -> Result<bool, StoreError> {
        let deleted: Option<Option<i64>> = sqlx::query_scalar(
            "DELETE FROM farm_products WHERE id = $1 AND farm_id = $2 RETURNING status_id",
        )
        .bind(product_id)
        .bind(farm_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_constraint(e, "product", "product"))?;

        let Some(status_id) = deleted else {
            return Ok(false);
        };

        if let Some(status_id) = status_id {
            // Orphaned status rows are harmless; the product is already gone.
            if let Err(e) = sqlx::query("DELETE FROM status_product WHERE id = $1")
                .bind(status_id)
                .execute(&self.pool)
                .await
            {
                tracing::warn!(status_id, "Failed to delete product status: {}", e);
            }
        }
        Ok(true)
    }
}
