//! Dashboard charts as text: brand share of stock and monthly profit.

use std::io::Write;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use solemate_core::breakdown::{BrandShare, MonthlyProfit, brand_breakdown, monthly_profit};

use super::{OutputFormat, write_json};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::store::RecordSource;

/// Width of the longest bar in a text chart.
const BAR_WIDTH: u32 = 30;

/// Show units in stock per brand.
///
/// # Errors
///
/// Returns `CliError` if inventory cannot be fetched or output fails.
pub async fn brands<W: Write>(
    source: &RecordSource,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    let inventory = source.fetch_inventory().await?;
    let shares = brand_breakdown(&inventory);
    match format {
        OutputFormat::Json => write_json(out, &shares),
        OutputFormat::Text => render_brands(&shares, out),
    }
}

/// Show profit per month over the trailing `months` months.
///
/// # Errors
///
/// Returns `CliError` if sales cannot be fetched or output fails.
pub async fn profit_chart<W: Write>(
    source: &RecordSource,
    config: &CliConfig,
    months: u32,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    let sales = source.fetch_sales().await?;
    let chart = monthly_profit(&sales, months, Utc::now());
    match format {
        OutputFormat::Json => write_json(out, &chart),
        OutputFormat::Text => render_profit_chart(&chart, &config.currency_symbol, out),
    }
}

/// Render brand shares as a bar chart.
///
/// # Errors
///
/// Returns `CliError::Output` if writing fails.
pub fn render_brands<W: Write>(shares: &[BrandShare], out: &mut W) -> Result<(), CliError> {
    writeln!(out, "Stock by brand")?;
    if shares.is_empty() {
        writeln!(out, "  No branded items in stock")?;
        return Ok(());
    }

    let max = shares.iter().map(|s| s.quantity).max().unwrap_or(0);
    for share in shares {
        writeln!(
            out,
            "  {:<16} {:>5}  {}",
            share.brand,
            share.quantity,
            bar(Decimal::from(share.quantity), Decimal::from(max)),
        )?;
    }
    Ok(())
}

/// Render monthly profit as a bar chart. Loss months get a `-` bar.
///
/// # Errors
///
/// Returns `CliError::Output` if writing fails.
pub fn render_profit_chart<W: Write>(
    chart: &[MonthlyProfit],
    symbol: &str,
    out: &mut W,
) -> Result<(), CliError> {
    writeln!(out, "Profit by month")?;
    if chart.is_empty() {
        writeln!(out, "  No sales in this window")?;
        return Ok(());
    }

    let max = chart
        .iter()
        .map(|m| m.profit.amount().abs())
        .max()
        .unwrap_or_default();
    for month in chart {
        let amount = month.profit.amount();
        let bar = bar(amount.abs(), max);
        let bar = if amount.is_sign_negative() { bar.replace('#', "-") } else { bar };
        writeln!(
            out,
            "  {:<15} {:>12}  {bar}",
            month.label(),
            month.profit.display_with(symbol),
        )?;
    }
    Ok(())
}

/// Bar of `#` scaled so that `max` fills [`BAR_WIDTH`].
fn bar(value: Decimal, max: Decimal) -> String {
    if max.is_zero() {
        return String::new();
    }
    let len = (value * Decimal::from(BAR_WIDTH) / max)
        .round()
        .to_usize()
        .unwrap_or(0);
    "#".repeat(len)
}
