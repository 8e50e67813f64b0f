//! Checkout Orders Core - order record types and the record codec.
//!
//! This crate is shared by every component that touches order history:
//! - `store` - `PostgreSQL` (and in-memory) persistence of order records
//! - `cli` - Command-line tools for schema bootstrap and history lookups
//!
//! # Architecture
//!
//! The core crate contains only types and pure conversions - no I/O and no
//! database access. The optional `postgres` feature adds `sqlx::FromRow` to
//! [`OrderRecord`] so the store can read rows straight into it.
//!
//! # Modules
//!
//! - [`types`] - Money, checkout inputs, and the persisted [`OrderRecord`]
//! - [`codec`] - [`build_record`], turning a checkout into a record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod types;

pub use codec::{EncodingError, build_record};
pub use types::*;
