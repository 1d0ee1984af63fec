use thiserror::Error;

use crate::catalog::{CoordinateError, GeoPoint};

#[derive(Debug, Error, PartialEq)]
pub enum RadiusError {
    #[error("Query parameter '{0}' is required")]
    Missing(&'static str),

    #[error("Query parameter '{name}' must be a number (got {value:?})")]
    NotANumber { name: &'static str, value: String },

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error("Radius must be a finite, non-negative number of kilometres (got {0})")]
    Radius(f64),
}

/// Validated `lat` / `lon` / `radius` (km) triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
}

fn number(name: &'static str, raw: Option<&str>) -> Result<f64, RadiusError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(RadiusError::Missing(name))?;
    raw.parse().map_err(|_| RadiusError::NotANumber {
        name,
        value: raw.to_string(),
    })
}

impl RadiusQuery {
    pub fn parse(
        lat: Option<&str>,
        lon: Option<&str>,
        radius: Option<&str>,
    ) -> Result<Self, RadiusError> {
        let center = GeoPoint::new(number("lat", lat)?, number("lon", lon)?)?;
        let radius_km = number("radius", radius)?;
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(RadiusError::Radius(radius_km));
        }
        Ok(Self { center, radius_km })
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_km * 1000.0
    }
}
