//! Farm and product catalog
//!
//! - [`models`]: rows, response views and write payloads
//! - [`form`]: multipart field access and parsing
//! - [`image`]: upload validation and content-addressed naming
//! - [`display_date`]: the `dd/Month/yy` date format used on the wire
//! - [`repository`]: the [`CatalogStore`] seam and its PostgreSQL implementation

pub mod display_date;
pub mod form;
pub mod image;
pub mod models;
pub mod repository;

pub use form::{FormData, FormError};
pub use image::{ImageError, MAX_IMAGE_BYTES, UploadedImage};
pub use models::{
    Address, CoordinateError, Farm, FarmFields, FarmRow, GeoPoint, ProductFields, ProductRow,
    ProductView,
};
pub use repository::{CatalogStore, PgCatalogStore};
