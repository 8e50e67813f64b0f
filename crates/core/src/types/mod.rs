//! Order types.
//!
//! Inputs as handed over by the checkout workflow, and the flat record that
//! gets persisted.

pub mod checkout;
pub mod money;
pub mod record;

pub use checkout::{Address, CheckoutOutcome, LineItem};
pub use money::{CurrencyCode, CurrencyCodeError, Money, NANOS_PER_UNIT, money_to_string};
pub use record::OrderRecord;
