//! Core types for SoleMate.
//!
//! This module provides type-safe wrappers for the domain concepts the
//! aggregation engine and ledger operate on.

pub mod date;
pub mod id;
pub mod money;
pub mod period;
pub mod record;

pub use date::{DateField, DatedRecord};
pub use id::*;
pub use money::Money;
pub use period::{ParsePeriodError, TimePeriod};
pub use record::{AcquisitionLogEntry, InventoryItem, SaleRecord};
