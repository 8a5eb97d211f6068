//! Invoice and payment reduction for Tally.
//!
//! Invoices and payments are journal-shaped documents: they generate
//! their lines by business rules, then enter the same validation and
//! workflow pipeline as hand-entered journals.
//!
//! # Modules
//!
//! - `error` - Document reduction errors
//! - `invoice` - Invoice line items and their journal reduction
//! - `payment` - Payment allocations and their journal reduction

pub mod error;
pub mod invoice;
pub mod payment;

pub use error::DocumentError;
pub use invoice::{Invoice, InvoiceAccounts, InvoiceKind, InvoiceLineItem, InvoiceTotals};
pub use payment::{Payment, PaymentAccounts};
