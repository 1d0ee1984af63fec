//! Order request/response models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("At least one product is required")]
    NoProducts,

    #[error("Product line {index} needs a product_id and a positive quantity")]
    InvalidLine { index: usize },

    #[error("pengiriman_id is required")]
    MissingShipping,

    #[error("payment_method is required")]
    MissingPaymentMethod,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    #[serde(default)]
    #[schema(example = 5)]
    pub product_id: i64,
    #[serde(default)]
    #[schema(example = 2)]
    pub quantity: i64,
}

/// `POST /order` body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateOrderRequest {
    /// Orders on behalf of another account; the caller when absent or zero.
    pub user_id: Option<i64>,
    pub products: Vec<OrderLineRequest>,
    /// Shipping method id.
    #[schema(example = 1)]
    pub pengiriman_id: i64,
    #[schema(example = "transfer")]
    pub payment_method: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// A validated order ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub user_id: i64,
    pub lines: Vec<OrderLine>,
    pub shipping_id: i64,
    pub payment_method: String,
    pub invoice_number: String,
}

impl PlaceOrder {
    /// Line indices by ascending product id. Stock rows are locked in this
    /// order, whatever order the client sent.
    pub fn lock_order(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.lines.len()).collect();
        indices.sort_by_key(|&i| self.lines[i].product_id);
        indices
    }
}

impl CreateOrderRequest {
    /// The account the order is booked to.
    pub fn owner(&self, caller_id: i64) -> i64 {
        match self.user_id {
            Some(id) if id != 0 => id,
            _ => caller_id,
        }
    }

    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.products.is_empty() {
            return Err(OrderValidationError::NoProducts);
        }
        if let Some(index) = self
            .products
            .iter()
            .position(|l| l.product_id == 0 || l.quantity <= 0)
        {
            return Err(OrderValidationError::InvalidLine { index });
        }
        if self.pengiriman_id == 0 {
            return Err(OrderValidationError::MissingShipping);
        }
        if self.payment_method.trim().is_empty() {
            return Err(OrderValidationError::MissingPaymentMethod);
        }
        Ok(())
    }

    pub fn into_command(
        self,
        caller_id: i64,
        invoice_number: impl FnOnce(i64) -> String,
    ) -> Result<PlaceOrder, OrderValidationError> {
        self.validate()?;
        let user_id = self.owner(caller_id);
        Ok(PlaceOrder {
            user_id,
            lines: self
                .products
                .iter()
                .map(|l| OrderLine {
                    product_id: l.product_id,
                    quantity: l.quantity,
                })
                .collect(),
            shipping_id: self.pengiriman_id,
            payment_method: self.payment_method.trim().to_string(),
            invoice_number: invoice_number(user_id),
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlacedLine {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10000)]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 20000)]
    pub total_harga: Decimal,
}

/// `POST /order` response data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlacedOrder {
    pub invoice_id: i64,
    #[schema(example = "INV-7-1733200000-0042")]
    pub invoice_number: String,
    /// Name of the first line's product.
    pub product_name: String,
    #[schema(example = "Pending")]
    pub payment_status: String,
    pub issued_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 5000)]
    pub shipping_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 20000)]
    pub subtotal: Decimal,
    /// Subtotal plus shipping.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 25000)]
    pub total_harga: Decimal,
    pub orders: Vec<PlacedLine>,
}

/// An order line joined with its invoice.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct OrderWithInvoice {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_harga: Decimal,
    pub status: String,
    pub pengiriman_id: i64,
    pub invoice_id: i64,
    pub invoice_number: String,
    pub payment_status: String,
    pub payment_method: String,
    pub issued_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> CreateOrderRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_request_becomes_command() {
        let req = request(
            r#"{"products":[{"product_id":5,"quantity":2}],"pengiriman_id":1,"payment_method":" cod "}"#,
        );
        let cmd = req.into_command(7, |u| format!("INV-{u}")).unwrap();
        assert_eq!(cmd.user_id, 7);
        assert_eq!(cmd.invoice_number, "INV-7");
        assert_eq!(cmd.payment_method, "cod");
        assert_eq!(
            cmd.lines,
            vec![OrderLine {
                product_id: 5,
                quantity: 2
            }]
        );
    }

    #[test]
    fn test_explicit_user_overrides_caller() {
        let req = request(r#"{"user_id":9,"products":[{"product_id":1,"quantity":1}],"pengiriman_id":1,"payment_method":"cod"}"#);
        assert_eq!(req.owner(7), 9);

        let req = request(r#"{"user_id":0}"#);
        assert_eq!(req.owner(7), 7);
    }

    #[test]
    fn test_validation_failures() {
        assert_eq!(
            request(r#"{"pengiriman_id":1,"payment_method":"cod"}"#).validate(),
            Err(OrderValidationError::NoProducts)
        );
        assert_eq!(
            request(r#"{"products":[{"product_id":0,"quantity":1}],"pengiriman_id":1,"payment_method":"cod"}"#).validate(),
            Err(OrderValidationError::InvalidLine { index: 0 })
        );
        assert_eq!(
            request(r#"{"products":[{"product_id":1,"quantity":1},{"product_id":2}],"pengiriman_id":1,"payment_method":"cod"}"#).validate(),
            Err(OrderValidationError::InvalidLine { index: 1 })
        );
        assert_eq!(
            request(r#"{"products":[{"product_id":1,"quantity":1}],"payment_method":"cod"}"#).validate(),
            Err(OrderValidationError::MissingShipping)
        );
        assert_eq!(
            request(r#"{"products":[{"product_id":1,"quantity":1}],"pengiriman_id":1}"#).validate(),
            Err(OrderValidationError::MissingPaymentMethod)
        );
    }

    #[test]
    fn test_lock_order_is_by_product_id() {
        let order = |ids: &[i64]| PlaceOrder {
            user_id: 1,
            lines: ids
                .iter()
                .map(|&product_id| OrderLine {
                    product_id,
                    quantity: 1,
                })
                .collect(),
            shipping_id: 1,
            payment_method: "cod".into(),
            invoice_number: "INV-1".into(),
        };

        // Two orders over the same products lock rows identically
        let forward = order(&[3, 8]);
        let backward = order(&[8, 3]);
        let locked = |o: &PlaceOrder| -> Vec<i64> {
            o.lock_order().iter().map(|&i| o.lines[i].product_id).collect()
        };
        assert_eq!(locked(&forward), vec![3, 8]);
        assert_eq!(locked(&backward), vec![3, 8]);
        assert_eq!(backward.lock_order(), vec![1, 0]);
    }

    #[test]
    fn test_order_line_serializes_for_docs() {
        let line = OrderLineRequest {
            product_id: 5,
            quantity: 2,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json, serde_json::json!({"product_id": 5, "quantity": 2}));
    }
}
