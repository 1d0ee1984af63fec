use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use super::display_date::{self, DateFormatError};
use super::image::{ImageError, UploadedImage};
use super::models::{Address, CoordinateError, FarmFields, GeoPoint, ProductFields};

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("Field '{0}' is required")]
    Missing(&'static str),

    #[error("Field '{field}' must be a non-negative number (got {value:?})")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    Date(#[from] DateFormatError),

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

#[derive(Debug, Clone)]
pub struct FileField {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Text fields and at most one file of a multipart submission.
#[derive(Debug, Default, Clone)]
pub struct FormData {
    fields: HashMap<String, String>,
    file: Option<FileField>,
}

impl FormData {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Later files replace earlier ones.
    pub fn set_file(&mut self, file_name: impl Into<String>, content: Vec<u8>) {
        self.file = Some(FileField {
            file_name: file_name.into(),
            content,
        });
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Trimmed value, empty when absent.
    pub fn optional(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    pub fn required(&self, name: &'static str) -> Result<String, FormError> {
        let value = self.optional(name);
        if value.is_empty() {
            return Err(FormError::Missing(name));
        }
        Ok(value)
    }

    pub fn decimal(&self, name: &'static str) -> Result<Decimal, FormError> {
        let raw = self.required(name)?;
        Decimal::from_str(&raw)
            .ok()
            .filter(|d| !d.is_sign_negative())
            .ok_or(FormError::InvalidNumber {
                field: name,
                value: raw,
            })
    }

    pub fn float(&self, name: &'static str) -> Result<f64, FormError> {
        let raw = self.required(name)?;
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(FormError::InvalidNumber {
                field: name,
                value: raw,
            })
    }

    /// Validate the attached file, if any.
    pub fn image(&self) -> Result<Option<UploadedImage>, ImageError> {
        self.file
            .as_ref()
            .map(|f| UploadedImage::validate(&f.file_name, f.content.clone()))
            .transpose()
    }

    pub fn required_image(&self) -> Result<UploadedImage, ImageError> {
        self.image()?.ok_or(ImageError::Missing)
    }
}

impl ProductFields {
    pub fn from_form(form: &FormData) -> Result<Self, FormError> {
        Ok(Self {
            name: form.required("product_name")?,
            description: form.optional("description"),
            price_per_kg: form.decimal("price_per_kg")?,
            weight_per_unit: form.decimal("weight_per_kg")?,
            stock_kg: form.decimal("stock_kg")?,
            status_name: form.required("status_name")?,
            available_date: display_date::parse(&form.required("available_date")?)?,
        })
    }
}

impl FarmFields {
    pub fn from_form(form: &FormData) -> Result<Self, FormError> {
        let location = GeoPoint::new(form.float("lat")?, form.float("lon")?)?;
        Ok(Self {
            name: form.required("name")?,
            farm_type: form.optional("farm_type"),
            phone: form.optional("phone"),
            email: form.optional("email"),
            description: form.optional("description"),
            location,
            address: Address {
                street: form.optional("street"),
                city: form.optional("city"),
                province: form.optional("province"),
                postal_code: form.optional("postal_code"),
                country: form.optional("country"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn product_form() -> FormData {
        let mut form = FormData::default();
        form.insert("product_name", "Susu Sapi");
        form.insert("description", "  segar ");
        form.insert("price_per_kg", "10000");
        form.insert("weight_per_kg", "1.5");
        form.insert("stock_kg", "40");
        form.insert("status_name", "Available");
        form.insert("available_date", "03/December/24");
        form
    }

    #[test]
    fn test_product_fields_parsed() {
        let fields = ProductFields::from_form(&product_form()).unwrap();
        assert_eq!(fields.name, "Susu Sapi");
        assert_eq!(fields.description, "segar");
        assert_eq!(fields.price_per_kg, Decimal::from(10000));
        assert_eq!(fields.weight_per_unit, Decimal::from_str("1.5").unwrap());
        assert_eq!(
            fields.available_date,
            NaiveDate::from_ymd_opt(2024, 12, 3).unwrap()
        );
    }

    #[test]
    fn test_product_field_errors() {
        let mut form = product_form();
        form.insert("product_name", "   ");
        assert_eq!(
            ProductFields::from_form(&form).unwrap_err(),
            FormError::Missing("product_name")
        );

        let mut form = product_form();
        form.insert("price_per_kg", "-1");
        assert!(matches!(
            ProductFields::from_form(&form).unwrap_err(),
            FormError::InvalidNumber {
                field: "price_per_kg",
                ..
            }
        ));

        let mut form = product_form();
        form.insert("available_date", "2024-12-03");
        assert!(matches!(
            ProductFields::from_form(&form).unwrap_err(),
            FormError::Date(_)
        ));
    }

    #[test]
    fn test_farm_coordinates_validated() {
        let mut form = FormData::default();
        form.insert("name", "Sukamaju");
        form.insert("lat", "91");
        form.insert("lon", "107.6");
        assert_eq!(
            FarmFields::from_form(&form).unwrap_err(),
            FormError::Coordinate(CoordinateError::Latitude(91.0))
        );

        form.insert("lat", "-6.9");
        form.insert("city", "Bandung");
        let fields = FarmFields::from_form(&form).unwrap();
        assert_eq!(fields.location, GeoPoint::new(-6.9, 107.6).unwrap());
        assert_eq!(fields.address.city, "Bandung");
        assert!(fields.farm_type.is_empty());
    }

    #[test]
    fn test_image_optional_and_required() {
        let mut form = FormData::default();
        assert!(form.image().unwrap().is_none());
        assert_eq!(form.required_image().unwrap_err(), ImageError::Missing);

        form.set_file("cow.gif", vec![1, 2]);
        assert!(matches!(
            form.image(),
            Err(ImageError::UnsupportedExtension(_))
        ));
    }
}
