//! Inventory domain types: platforms, client variants, canonical records.

pub mod client;
pub mod record;

pub use client::*;
pub use record::*;
