//! CLI command implementations.
//!
//! Every command writes its report to the given writer, either as aligned
//! text or as pretty-printed JSON.

pub mod breakdown;
pub mod dashboard;
pub mod inventory;
pub mod sales;

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CliError;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Write a value as pretty JSON followed by a newline.
pub(crate) fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

pub(crate) fn format_size(size: Option<Decimal>) -> String {
    size.map_or_else(|| "-".to_string(), |s| s.normalize().to_string())
}

/// Singular or plural noun for a count.
pub(crate) const fn plural(count: u64, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}
