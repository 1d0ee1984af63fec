//! Catalog data models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::display_date;
use crate::storage::to_raw_url;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude must be between -90 and 90 (got {0})")]
    Latitude(f64),

    #[error("Longitude must be between -180 and 180 (got {0})")]
    Longitude(f64),
}

/// WGS84 point. Construction enforces the coordinate ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = -6.9147)]
    pub latitude: f64,
    #[schema(example = 107.6098)]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
}

// ============================================================================
// Farms
// ============================================================================

/// `farms` joined with the owner's name; coordinates are unpacked from the
/// geography column by the query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FarmRow {
    pub id: i64,
    pub owner_id: i64,
    pub owner_name: String,
    pub name: String,
    pub farm_type: String,
    #[sqlx(rename = "phonenumber_farm")]
    pub phone: String,
    pub email: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    #[sqlx(rename = "image_farm")]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FarmRow {
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn address(&self) -> Address {
        Address {
            street: self.street.clone(),
            city: self.city.clone(),
            province: self.province.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Farm {
    pub id: i64,
    pub owner_id: i64,
    #[schema(example = "Siti Aminah")]
    pub owner_name: String,
    #[schema(example = "Peternakan Sukamaju")]
    pub name: String,
    #[schema(example = "dairy")]
    pub farm_type: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub location: GeoPoint,
    pub address: Address,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FarmRow> for Farm {
    fn from(row: FarmRow) -> Self {
        let location = row.location();
        let address = row.address();
        Self {
            id: row.id,
            owner_id: row.owner_id,
            owner_name: row.owner_name,
            name: row.name,
            farm_type: row.farm_type,
            phone: row.phone,
            email: row.email,
            description: row.description,
            location,
            address,
            image_url: to_raw_url(&row.image_url),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Validated farm create/update payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmFields {
    pub name: String,
    pub farm_type: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub location: GeoPoint,
    pub address: Address,
}

// ============================================================================
// Products
// ============================================================================

/// `farm_products` left-joined with its `status_product` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub farm_id: i64,
    pub name: String,
    pub description: String,
    pub price_per_kg: Decimal,
    pub weight_per_unit: Decimal,
    pub stock_kg: Decimal,
    pub status_id: Option<i64>,
    pub status_name: Option<String>,
    pub available_date: Option<NaiveDate>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductView {
    pub id: i64,
    pub farm_id: i64,
    #[schema(example = "Susu Sapi Segar")]
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10000)]
    pub price_per_kg: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 1)]
    pub weight_per_unit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 50)]
    pub stock_kg: Decimal,
    #[schema(example = "Available")]
    pub status_name: Option<String>,
    /// `dd/Month/yy`
    #[schema(example = "03/December/24")]
    pub available_date: Option<String>,
    #[schema(example = "https://raw.githubusercontent.com/farm-market/productImages/main/Products/ab12.png")]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductView {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            farm_id: row.farm_id,
            name: row.name,
            description: row.description,
            price_per_kg: row.price_per_kg,
            weight_per_unit: row.weight_per_unit,
            stock_kg: row.stock_kg,
            status_name: row.status_name,
            available_date: row.available_date.map(display_date::format),
            image_url: to_raw_url(&row.image_url),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Validated product create/update payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price_per_kg: Decimal,
    pub weight_per_unit: Decimal,
    pub stock_kg: Decimal,
    pub status_name: String,
    pub available_date: NaiveDate,
}
