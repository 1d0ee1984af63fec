use async_trait::async_trait;
use sqlx::PgPool;

use super::RadiusQuery;
use crate::catalog::FarmRow;
use crate::catalog::repository::FARM_SELECT;
use crate::db::StoreError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NearbyRow {
    #[sqlx(flatten)]
    pub farm: FarmRow,
    pub distance_m: f64,
}

#[async_trait]
pub trait FarmLocator: Send + Sync {
    /// Farms within the radius, closest first.
    async fn within(&self, query: &RadiusQuery) -> Result<Vec<NearbyRow>, StoreError>;
}

pub struct PgFarmLocator {
    pool: PgPool,
}

impl PgFarmLocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FarmLocator for PgFarmLocator {
    async fn within(&self, query: &RadiusQuery) -> Result<Vec<NearbyRow>, StoreError> {
        // FARM_SELECT ends at the join; wrap it so the distance can be ordered on.
        let sql = format!(
            r#"SELECT farm.*, ST_Distance(g.location, c.point) AS distance_m
               FROM ({FARM_SELECT}) AS farm
               JOIN farms g ON g.id = farm.id
               CROSS JOIN (SELECT ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography AS point) AS c
               WHERE ST_DWithin(g.location, c.point, $3)
               ORDER BY distance_m, farm.id"#
        );

        let rows = sqlx::query_as::<_, NearbyRow>(&sql)
            .bind(query.center.longitude)
            .bind(query.center.latitude)
            .bind(query.radius_meters())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            lat = query.center.latitude,
            lon = query.center.longitude,
            radius_m = query.radius_meters(),
            hits = rows.len(),
            "Radius search"
        );
        Ok(rows)
    }
}
