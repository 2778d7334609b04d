//! # OrderScope Ingestion Crate
//!
//! Turns external data into validated [`core_types::OrderRecord`]s. Two
//! sources exist: a pair of CSV files (order line items plus customer
//! attributes, left-joined by customer id) and a seeded sample generator for
//! demos and tests. All validation happens here, exactly once; downstream
//! layers trust the records they receive.

pub mod error;
pub mod loader;
pub mod sample;

pub use error::IngestError;
pub use loader::{DataSource, load};
