use chrono::Utc;
use std::sync::Arc;

use crate::account::AccountStore;
use crate::catalog::CatalogStore;
use crate::db::Database;
use crate::order::{InvoiceNumberGenerator, OrderStore};
use crate::proximity::FarmLocator;
use crate::storage::ImageStore;
use crate::user_auth::TokenService;

/// Object-store directories for uploaded pictures.
#[derive(Debug, Clone)]
pub struct ImageDirs {
    pub products: String,
    pub farms: String,
}

impl Default for ImageDirs {
    fn default() -> Self {
        Self {
            products: "Products".to_string(),
            farms: "Farms".to_string(),
        }
    }
}

/// Shared gateway state. Every collaborator sits behind a trait object so
/// tests can run the full router against in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
    pub locator: Arc<dyn FarmLocator>,
    pub images: Arc<dyn ImageStore>,
    pub tokens: Arc<TokenService>,
    pub image_dirs: ImageDirs,
    /// PostgreSQL pool, used by the health check only
    pub db: Option<Arc<Database>>,
    invoice_numbers: Arc<InvoiceNumberGenerator>,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        locator: Arc<dyn FarmLocator>,
        images: Arc<dyn ImageStore>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            accounts,
            catalog,
            orders,
            locator,
            images,
            tokens,
            image_dirs: ImageDirs::default(),
            db: None,
            invoice_numbers: Arc::new(InvoiceNumberGenerator::new()),
        }
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_image_dirs(mut self, dirs: ImageDirs) -> Self {
        self.image_dirs = dirs;
        self
    }

    /// Next unique invoice number for `user_id`
    pub fn next_invoice_number(&self, user_id: i64) -> String {
        self.invoice_numbers.next(user_id, Utc::now())
    }
}
