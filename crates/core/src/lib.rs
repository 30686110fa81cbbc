//! SoleMate Core - Domain types and the dashboard aggregation engine.
//!
//! This crate provides everything SoleMate computes, independent of where the
//! records come from:
//! - `cli` - Command-line front end that loads records and renders metrics
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Record collections are handed in already scoped to a single user;
//! fetching them is the caller's job.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, time periods, and record shapes
//! - [`metrics`] - Time-window filtering and the four dashboard aggregates
//! - [`dashboard`] - Explicit dashboard state container and recompute
//! - [`ledger`] - Inventory, sale, and acquisition log lifecycle rules
//! - [`breakdown`] - Brand, monthly profit, and stock value summaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod breakdown;
pub mod dashboard;
pub mod ledger;
pub mod metrics;
pub mod types;

pub use dashboard::{Collection, CollectionKind, DashboardMetrics, DashboardState, FetchFailure};
pub use ledger::{ItemUpdate, Ledger, LedgerError, NewItem, NewSale};
pub use types::*;
