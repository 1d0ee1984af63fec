//! Repository layer for orders and invoices

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::invoice::{INVOICE_DUE_DAYS, PAYMENT_PENDING};
use super::models::{OrderWithInvoice, PlaceOrder, PlacedLine, PlacedOrder};
use super::totals::{OrderTotals, PricedLine};
use crate::db::StoreError;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Price every line, reserve stock, write the invoice and its orders.
    /// Nothing is persisted unless all of it succeeds.
    async fn place_order(&self, order: &PlaceOrder) -> Result<PlacedOrder, StoreError>;

    async fn orders_for_products(
        &self,
        product_ids: &[i64],
    ) -> Result<Vec<OrderWithInvoice>, StoreError>;
}

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn place_order(&self, order: &PlaceOrder) -> Result<PlacedOrder, StoreError> {
        // Dropping `tx` on any early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        let shipping_cost: Decimal =
            sqlx::query_scalar("SELECT biaya_pengiriman FROM pengiriman WHERE id = $1")
                .bind(order.shipping_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(StoreError::UnknownShipping(order.shipping_id))?;

        // Reserve in lock order; `priced` keeps the request's line order.
        let mut priced: Vec<Option<PricedLine>> = vec![None; order.lines.len()];
        for index in order.lock_order() {
            let line = &order.lines[index];
            let (product_name, unit_price): (String, Decimal) =
                sqlx::query_as("SELECT name, price_per_kg FROM farm_products WHERE id = $1")
                    .bind(line.product_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(StoreError::UnknownProduct(line.product_id))?;

            let reserved = sqlx::query(
                r#"UPDATE farm_products SET stock_kg = stock_kg - $2, updated_at = NOW()
                   WHERE id = $1 AND stock_kg >= $2"#,
            )
            .bind(line.product_id)
            .bind(Decimal::from(line.quantity))
            .execute(&mut *tx)
            .await?;
            if reserved.rows_affected() == 0 {
                return Err(StoreError::InsufficientStock(line.product_id));
            }

            priced[index] = Some(PricedLine {
                product_id: line.product_id,
                product_name,
                quantity: line.quantity,
                unit_price,
            });
        }
        let priced: Vec<PricedLine> = priced.into_iter().flatten().collect();

        let totals = OrderTotals::compute(&priced, shipping_cost);
        let issued_date = Utc::now();
        let due_date = issued_date + Duration::days(INVOICE_DUE_DAYS);

        let invoice_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO invoice
                 (user_id, invoice_number, payment_status, payment_method,
                  issued_date, due_date, total_amount)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(order.user_id)
        .bind(&order.invoice_number)
        .bind(PAYMENT_PENDING)
        .bind(&order.payment_method)
        .bind(issued_date)
        .bind(due_date)
        .bind(totals.subtotal)
        .fetch_one(&mut *tx)
        .await
        .inspect_err(|e| tracing::error!(invoice_number = %order.invoice_number, "Invoice insert failed: {}", e))?;

        let mut lines = Vec::with_capacity(priced.len());
        for line in &priced {
            let total_harga = line.line_total();
            let order_id: i64 = sqlx::query_scalar(
                r#"INSERT INTO orders
                     (user_id, product_id, quantity, total_harga, status, pengiriman_id, invoice_id)
                   VALUES ($1, $2, $3, $4, $5, $6, $7)
                   RETURNING id"#,
            )
            .bind(order.user_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(total_harga)
            .bind(PAYMENT_PENDING)
            .bind(order.shipping_id)
            .bind(invoice_id)
            .fetch_one(&mut *tx)
            .await?;

            lines.push(PlacedLine {
                order_id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_harga,
            });
        }

        // The invoice amount is whatever the committed order rows add up to.
        let total_amount: Decimal = sqlx::query_scalar(
            r#"UPDATE invoice SET
                 total_amount = (SELECT COALESCE(SUM(total_harga), 0) FROM orders WHERE invoice_id = $1),
                 updated_at = NOW()
               WHERE id = $1
               RETURNING total_amount"#,
        )
        .bind(invoice_id)
        .fetch_one(&mut *tx)
        .await?;
        if total_amount != totals.subtotal {
            tracing::warn!(
                invoice_id,
                %total_amount,
                subtotal = %totals.subtotal,
                "Invoice total differs from computed subtotal"
            );
        }

        tx.commit().await?;

        tracing::info!(
            invoice_id,
            invoice_number = %order.invoice_number,
            user_id = order.user_id,
            lines = lines.len(),
            "Order placed"
        );

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
            shipping_cost: totals.shipping_cost,
            subtotal: total_amount,
            total_harga: total_amount + totals.shipping_cost,
            orders: lines,
        })
    }

    async fn orders_for_products(
        &self,
        product_ids: &[i64],
    ) -> Result<Vec<OrderWithInvoice>, StoreError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, OrderWithInvoice>(
            r#"SELECT o.id, o.user_id, o.product_id, p.name AS product_name, o.quantity,
                      o.total_harga, o.status, o.pengiriman_id, o.invoice_id,
                      i.invoice_number, i.payment_status, i.payment_method,
                      i.issued_date, i.due_date, i.total_amount, o.created_at
               FROM orders o
               JOIN invoice i ON i.id = o.invoice_id
               JOIN farm_products p ON p.id = o.product_id
               WHERE o.product_id = ANY($1)
               ORDER BY o.id"#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
