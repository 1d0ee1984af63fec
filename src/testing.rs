//! In-memory doubles for every store seam, used by router tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::account::{Account, AccountStore, AccountUpdate};
use crate::catalog::{CatalogStore, FarmFields, FarmRow, ProductFields, ProductRow};
use crate::db::StoreError;
use crate::order::{
    INVOICE_DUE_DAYS, OrderStore, OrderTotals, OrderWithInvoice, PAYMENT_PENDING, PlaceOrder,
    PlacedLine, PlacedOrder, PricedLine,
};
use crate::proximity::{FarmLocator, NearbyRow, RadiusQuery};
use crate::storage::{ImageStore, StoredImage, UploadError};

#[derive(Debug, Clone)]
pub struct InvoiceRecord {
    pub id: i64,
    pub user_id: i64,
    pub invoice_number: String,
    pub payment_status: String,
    pub payment_method: String,
    pub issued_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub total_harga: Decimal,
    pub status: String,
    pub pengiriman_id: i64,
    pub invoice_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct Data {
    accounts: Vec<Account>,
    farms: Vec<FarmRow>,
    statuses: BTreeMap<i64, (String, NaiveDate)>,
    products: Vec<ProductRow>,
    shipping: BTreeMap<i64, Decimal>,
    invoices: Vec<InvoiceRecord>,
    orders: Vec<OrderRecord>,
    next_id: i64,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owner_name(&self, owner_id: i64) -> String {
        self.accounts
            .iter()
            .find(|a| a.id == owner_id)
            .map(|a| a.name.clone())
            .unwrap_or_default()
    }

    fn hydrate(&self, product: &ProductRow) -> ProductRow {
        let mut row = product.clone();
        let status = row.status_id.and_then(|id| self.statuses.get(&id));
        row.status_name = status.map(|(name, _)| name.clone());
        row.available_date = status.map(|(_, date)| *date);
        row
    }
}

fn simulated_failure() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

/// Shared in-memory database. Writes are all-or-nothing like a transaction.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make catalog writes fail as if the database went away.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writes(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(simulated_failure());
        }
        Ok(())
    }

    pub fn add_account(&self, name: &str, phone: &str) -> i64 {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        data.accounts.push(Account {
            id,
            name: name.to_string(),
            phone: phone.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role_id: 2,
            password_hash: "$argon2id$not-a-real-hash".to_string(),
        });
        id
    }

    pub fn add_farm(&self, owner_id: i64, name: &str, latitude: f64, longitude: f64) -> i64 {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        let now = Utc::now();
        let owner_name = data.owner_name(owner_id);
        data.farms.push(FarmRow {
            id,
            owner_id,
            owner_name,
            name: name.to_string(),
            farm_type: "dairy".to_string(),
            phone: String::new(),
            email: String::new(),
            description: String::new(),
            latitude,
            longitude,
            street: String::new(),
            city: "Bandung".to_string(),
            province: String::new(),
            postal_code: String::new(),
            country: "Indonesia".to_string(),
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn add_product(&self, farm_id: i64, name: &str, price_per_kg: i64, stock_kg: i64) -> i64 {
        let mut data = self.data.lock().unwrap();
        let status_id = data.next_id();
        data.statuses.insert(
            status_id,
            (
                "Available".to_string(),
                NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
            ),
        );
        let id = data.next_id();
        let now = Utc::now();
        data.products.push(ProductRow {
            id,
            farm_id,
            name: name.to_string(),
            description: String::new(),
            price_per_kg: Decimal::from(price_per_kg),
            weight_per_unit: Decimal::ONE,
            stock_kg: Decimal::from(stock_kg),
            status_id: Some(status_id),
            status_name: None,
            available_date: None,
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn add_shipping(&self, cost: i64) -> i64 {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        data.shipping.insert(id, Decimal::from(cost));
        id
    }

    pub fn invoices(&self) -> Vec<InvoiceRecord> {
        self.data.lock().unwrap().invoices.clone()
    }

    pub fn orders(&self) -> Vec<OrderRecord> {
        self.data.lock().unwrap().orders.clone()
    }

    pub fn product(&self, id: i64) -> Option<ProductRow> {
        let data = self.data.lock().unwrap();
        data.products
            .iter()
            .find(|p| p.id == id)
            .map(|p| data.hydrate(p))
    }

    pub fn farm_count(&self) -> usize {
        self.data.lock().unwrap().farms.len()
    }

    pub fn status_count(&self) -> usize {
        self.data.lock().unwrap().statuses.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.data.lock().unwrap().accounts.clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn get_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.accounts.iter().find(|a| a.phone == phone).cloned())
    }

    async fn update(&self, id: i64, update: &AccountUpdate) -> Result<bool, StoreError> {
        let mut data = self.data.lock().unwrap();
        if data
            .accounts
            .iter()
            .any(|a| a.id != id && a.phone == update.phone)
        {
            return Err(StoreError::Duplicate("phone"));
        }
        let Some(account) = data.accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };
        account.name = update.name.clone();
        account.phone = update.phone.clone();
        account.email = update.email.clone();
        account.role_id = update.role_id;
        Ok(true)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn farm_for_owner(&self, owner_id: i64) -> Result<Option<FarmRow>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .farms
            .iter()
            .filter(|f| f.owner_id == owner_id)
            .min_by_key(|f| f.id)
            .cloned())
    }

    async fn farm_by_id(&self, farm_id: i64) -> Result<Option<FarmRow>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.farms.iter().find(|f| f.id == farm_id).cloned())
    }

    async fn create_farm(
        &self,
        owner_id: i64,
        fields: &FarmFields,
        image_url: &str,
    ) -> Result<FarmRow, StoreError> {
        self.check_writes()?;
        let mut data = self.data.lock().unwrap();
        if data.farms.iter().any(|f| f.owner_id == owner_id) {
            return Err(StoreError::FarmAlreadyExists);
        }
        let now = Utc::now();
        let row = FarmRow {
            id: data.next_id(),
            owner_id,
            owner_name: data.owner_name(owner_id),
            name: fields.name.clone(),
            farm_type: fields.farm_type.clone(),
            phone: fields.phone.clone(),
            email: fields.email.clone(),
            description: fields.description.clone(),
            latitude: fields.location.latitude,
            longitude: fields.location.longitude,
            street: fields.address.street.clone(),
            city: fields.address.city.clone(),
            province: fields.address.province.clone(),
            postal_code: fields.address.postal_code.clone(),
            country: fields.address.country.clone(),
            image_url: image_url.to_string(),
            created_at: now,
            updated_at: now,
        };
        data.farms.push(row.clone());
        Ok(row)
    }

    async fn update_farm(
        &self,
        farm_id: i64,
        fields: &FarmFields,
        image_url: Option<&str>,
    ) -> Result<Option<FarmRow>, StoreError> {
        self.check_writes()?;
        let mut data = self.data.lock().unwrap();
        let Some(farm) = data.farms.iter_mut().find(|f| f.id == farm_id) else {
            return Ok(None);
        };
        farm.name = fields.name.clone();
        farm.farm_type = fields.farm_type.clone();
        farm.phone = fields.phone.clone();
        farm.email = fields.email.clone();
        farm.description = fields.description.clone();
        farm.latitude = fields.location.latitude;
        farm.longitude = fields.location.longitude;
        farm.street = fields.address.street.clone();
        farm.city = fields.address.city.clone();
        farm.province = fields.address.province.clone();
        farm.postal_code = fields.address.postal_code.clone();
        farm.country = fields.address.country.clone();
        if let Some(url) = image_url {
            farm.image_url = url.to_string();
        }
        farm.updated_at = Utc::now();
        Ok(Some(farm.clone()))
    }

    async fn delete_farm(&self, farm_id: i64) -> Result<bool, StoreError> {
        let mut data = self.data.lock().unwrap();
        if data.products.iter().any(|p| p.farm_id == farm_id) {
            return Err(StoreError::InUse("farm"));
        }
        let before = data.farms.len();
        data.farms.retain(|f| f.id != farm_id);
        Ok(data.farms.len() < before)
    }

    async fn list_products(&self) -> Result<Vec<ProductRow>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.products.iter().map(|p| data.hydrate(p)).collect())
    }

    async fn list_farm_products(&self, farm_id: i64) -> Result<Vec<ProductRow>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .products
            .iter()
            .filter(|p| p.farm_id == farm_id)
            .map(|p| data.hydrate(p))
            .collect())
    }

    async fn product_in_farm(
        &self,
        product_id: i64,
        farm_id: i64,
    ) -> Result<Option<ProductRow>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .products
            .iter()
            .find(|p| p.id == product_id && p.farm_id == farm_id)
            .map(|p| data.hydrate(p)))
    }

    async fn create_product(
        &self,
        farm_id: i64,
        fields: &ProductFields,
        image_url: &str,
    ) -> Result<ProductRow, StoreError> {
        self.check_writes()?;
        let mut data = self.data.lock().unwrap();
        let status_id = data.next_id();
        data.statuses.insert(
            status_id,
            (fields.status_name.clone(), fields.available_date),
        );
        let now = Utc::now();
        let row = ProductRow {
            id: data.next_id(),
            farm_id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            price_per_kg: fields.price_per_kg,
            weight_per_unit: fields.weight_per_unit,
            stock_kg: fields.stock_kg,
            status_id: Some(status_id),
            status_name: None,
            available_date: None,
            image_url: image_url.to_string(),
            created_at: now,
            updated_at: now,
        };
        data.products.push(row.clone());
        Ok(data.hydrate(&row))
    }

    async fn update_product(
        &self,
        product_id: i64,
        farm_id: i64,
        fields: &ProductFields,
        image_url: Option<&str>,
    ) -> Result<Option<ProductRow>, StoreError> {
        self.check_writes()?;
        let mut data = self.data.lock().unwrap();
        let Some(index) = data
            .products
            .iter()
            .position(|p| p.id == product_id && p.farm_id == farm_id)
        else {
            return Ok(None);
        };

        let existing = data.products[index].status_id;
        let status_id = match existing {
            Some(id) => id,
            None => data.next_id(),
        };
        data.statuses.insert(
            status_id,
            (fields.status_name.clone(), fields.available_date),
        );

        let product = &mut data.products[index];
        product.name = fields.name.clone();
        product.description = fields.description.clone();
        product.price_per_kg = fields.price_per_kg;
        product.weight_per_unit = fields.weight_per_unit;
        product.stock_kg = fields.stock_kg;
        product.status_id = Some(status_id);
        if let Some(url) = image_url {
            product.image_url = url.to_string();
        }
        product.updated_at = Utc::now();

        let row = data.products[index].clone();
        Ok(Some(data.hydrate(&row)))
    }

    async fn delete_product(&self, product_id: i64, farm_id: i64) -> Result<bool, StoreError> {
        let mut data = self.data.lock().unwrap();
        if data.orders.iter().any(|o| o.product_id == product_id) {
            return Err(StoreError::InUse("product"));
        }
        let Some(index) = data
            .products
            .iter()
            .position(|p| p.id == product_id && p.farm_id == farm_id)
        else {
            return Ok(false);
        };
        let removed = data.products.remove(index);
        if let Some(status_id) = removed.status_id {
            data.statuses.remove(&status_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn place_order(&self, order: &PlaceOrder) -> Result<PlacedOrder, StoreError> {
        let mut guard = self.data.lock().unwrap();
        // Work on a copy; only a fully successful order replaces the original.
        let mut data = guard.clone();

        let shipping_cost = *data
            .shipping
            .get(&order.shipping_id)
            .ok_or(StoreError::UnknownShipping(order.shipping_id))?;

        let mut priced = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let product = data
                .products
                .iter_mut()
                .find(|p| p.id == line.product_id)
                .ok_or(StoreError::UnknownProduct(line.product_id))?;
            let qty = Decimal::from(line.quantity);
            if product.stock_kg < qty {
                return Err(StoreError::InsufficientStock(line.product_id));
            }
            product.stock_kg -= qty;
            priced.push(PricedLine {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: line.quantity,
                unit_price: product.price_per_kg,
            });
        }

        let totals = OrderTotals::compute(&priced, shipping_cost);
        if data
            .invoices
            .iter()
            .any(|i| i.invoice_number == order.invoice_number)
        {
            // UNIQUE violation surfaces as a plain database error
            return Err(simulated_failure());
        }

        let issued_date = Utc::now();
        let due_date = issued_date + Duration::days(INVOICE_DUE_DAYS);
        let invoice_id = data.next_id();
        data.invoices.push(InvoiceRecord {
            id: invoice_id,
            user_id: order.user_id,
            invoice_number: order.invoice_number.clone(),
            payment_status: PAYMENT_PENDING.to_string(),
            payment_method: order.payment_method.clone(),
            issued_date,
            due_date,
            total_amount: totals.subtotal,
        });

        let mut lines = Vec::with_capacity(priced.len());
        for line in &priced {
            let order_id = data.next_id();
            data.orders.push(OrderRecord {
                id: order_id,
                user_id: order.user_id,
                product_id: line.product_id,
                quantity: line.quantity,
                total_harga: line.line_total(),
                status: PAYMENT_PENDING.to_string(),
                pengiriman_id: order.shipping_id,
                invoice_id,
                created_at: issued_date,
            });
            lines.push(PlacedLine {
                order_id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_harga: line.line_total(),
            });
        }

        let total_amount: Decimal = data
            .orders
            .iter()
            .filter(|o| o.invoice_id == invoice_id)
            .map(|o| o.total_harga)
            .sum();
        if let Some(invoice) = data.invoices.iter_mut().find(|i| i.id == invoice_id) {
            invoice.total_amount = total_amount;
        }

        *guard = data;

        Ok(PlacedOrder {
            invoice_id,
            invoice_number: order.invoice_number.clone(),
            product_name: lines
                .first()
                .map(|l| l.product_name.clone())
                .unwrap_or_default(),
            payment_status: PAYMENT_PENDING.to_string(),
            issued_date,
            due_date,
            shipping_cost,
            subtotal: total_amount,
            total_harga: total_amount + shipping_cost,
            orders: lines,
        })
    }

    async fn orders_for_products(
        &self,
        product_ids: &[i64],
    ) -> Result<Vec<OrderWithInvoice>, StoreError> {
        let data = self.data.lock().unwrap();
        let rows = data
            .orders
            .iter()
            .filter(|o| product_ids.contains(&o.product_id))
            .filter_map(|o| {
                let invoice = data.invoices.iter().find(|i| i.id == o.invoice_id)?;
                let product = data.products.iter().find(|p| p.id == o.product_id)?;
                Some(OrderWithInvoice {
                    id: o.id,
                    user_id: o.user_id,
                    product_id: o.product_id,
                    product_name: product.name.clone(),
                    quantity: o.quantity,
                    total_harga: o.total_harga,
                    status: o.status.clone(),
                    pengiriman_id: o.pengiriman_id,
                    invoice_id: o.invoice_id,
                    invoice_number: invoice.invoice_number.clone(),
                    payment_status: invoice.payment_status.clone(),
                    payment_method: invoice.payment_method.clone(),
                    issued_date: invoice.issued_date,
                    due_date: invoice.due_date,
                    total_amount: invoice.total_amount,
                    created_at: o.created_at,
                })
            })
            .collect();
        Ok(rows)
    }
}

const EARTH_RADIUS_M: f64 = 6_371_008.8;

fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

#[async_trait]
impl FarmLocator for MemoryStore {
    async fn within(&self, query: &RadiusQuery) -> Result<Vec<NearbyRow>, StoreError> {
        let data = self.data.lock().unwrap();
        let mut rows: Vec<NearbyRow> = data
            .farms
            .iter()
            .map(|f| NearbyRow {
                distance_m: haversine_m(
                    query.center.latitude,
                    query.center.longitude,
                    f.latitude,
                    f.longitude,
                ),
                farm: f.clone(),
            })
            .filter(|r| r.distance_m <= query.radius_meters())
            .collect();
        rows.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then(a.farm.id.cmp(&b.farm.id))
        });
        Ok(rows)
    }
}

/// Records uploads and removals instead of talking to GitHub. Keeps the set of
/// live objects so repeated paths report `created: false` like the real store.
#[derive(Default)]
pub struct MemoryImageStore {
    uploads: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
    live: Mutex<BTreeSet<String>>,
    fail: AtomicBool,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.live.lock().unwrap().contains(path)
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(&self, path: &str, _content: Vec<u8>) -> Result<StoredImage, UploadError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(UploadError::Rejected {
                status: 502,
                body: "simulated outage".to_string(),
            });
        }
        self.uploads.lock().unwrap().push(path.to_string());
        let created = self.live.lock().unwrap().insert(path.to_string());
        Ok(StoredImage {
            url: format!("https://raw.githubusercontent.com/test/images/main/{}", path),
            created,
        })
    }

    async fn remove(&self, path: &str) -> Result<(), UploadError> {
        self.removed.lock().unwrap().push(path.to_string());
        self.live.lock().unwrap().remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Bandung to Jakarta, roughly 116 km
        let d = haversine_m(-6.9147, 107.6098, -6.2088, 106.8456);
        assert!((110_000.0..125_000.0).contains(&d), "got {d}");
        assert_eq!(haversine_m(1.0, 2.0, 1.0, 2.0), 0.0);
    }
}
