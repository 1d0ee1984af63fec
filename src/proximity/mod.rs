//! Radius search over farm locations.

mod locator;
mod query;

pub use locator::{FarmLocator, NearbyRow, PgFarmLocator};
pub use query::{RadiusError, RadiusQuery};

use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{Address, FarmRow, GeoPoint};
use crate::storage::to_raw_url;

#[derive(Debug, Serialize, ToSchema)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: &'static str,
    pub coordinates: GeoPoint,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct FeatureProperties {}

/// GeoJSON-like feature; coordinates are named rather than positional.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationFeature {
    #[serde(rename = "type")]
    #[schema(example = "Feature")]
    pub kind: &'static str,
    pub properties: FeatureProperties,
    pub geometry: PointGeometry,
}

impl From<GeoPoint> for LocationFeature {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Feature",
            properties: FeatureProperties::default(),
            geometry: PointGeometry {
                kind: "Point",
                coordinates: point,
            },
        }
    }
}

/// One radius-search hit.
#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyFarm {
    /// Position in the result list, `Farm 1` being the closest.
    #[schema(example = "Farm 1")]
    pub label: String,
    pub id: i64,
    pub name: String,
    pub farm_type: String,
    pub description: String,
    pub owner_name: String,
    pub phone: String,
    pub location: LocationFeature,
    pub address: Address,
    pub image_url: String,
    #[schema(example = 1250.5)]
    pub distance_m: f64,
}

impl NearbyFarm {
    /// `index` is zero-based.
    pub fn new(index: usize, row: NearbyRow) -> Self {
        let farm: FarmRow = row.farm;
        Self {
            label: format!("Farm {}", index + 1),
            location: farm.location().into(),
            address: farm.address(),
            image_url: to_raw_url(&farm.image_url),
            id: farm.id,
            name: farm.name,
            farm_type: farm.farm_type,
            description: farm.description,
            owner_name: farm.owner_name,
            phone: farm.phone,
            distance_m: row.distance_m,
        }
    }
}
