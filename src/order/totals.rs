use rust_decimal::Decimal;

/// A requested line with its unit price resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl PricedLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of line totals; this is what the invoice amount must equal.
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub grand_total: Decimal,
}

impl OrderTotals {
    pub fn compute(lines: &[PricedLine], shipping_cost: Decimal) -> Self {
        let subtotal: Decimal = lines.iter().map(PricedLine::line_total).sum();
        Self {
            subtotal,
            shipping_cost,
            grand_total: subtotal + shipping_cost,
        }
    }
}
