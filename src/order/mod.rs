//! Order placement and invoicing
//!
//! One request becomes one invoice plus one order row per product line. The
//! whole write happens in a single transaction (see [`PgOrderStore`]).

pub mod invoice;
pub mod models;
pub mod repository;
pub mod totals;

pub use invoice::{INVOICE_DUE_DAYS, InvoiceNumberGenerator, PAYMENT_PENDING};
pub use models::{
    CreateOrderRequest, OrderLine, OrderLineRequest, OrderValidationError, OrderWithInvoice,
    PlaceOrder, PlacedLine, PlacedOrder,
};
pub use repository::{OrderStore, PgOrderStore};
pub use totals::{OrderTotals, PricedLine};
