//! SoleMate CLI library.
//!
//! Loads records from the configured source and runs the dashboard, sales,
//! inventory and chart commands on top of `solemate-core`. The `sm-cli`
//! binary is a thin wrapper around this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
pub mod config;
pub mod error;
pub mod store;

pub use config::CliConfig;
pub use error::CliError;
pub use store::{JsonStore, RecordSource, RestClient, StoreError};
