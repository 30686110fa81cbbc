//! Sales page: month listing, recording and deleting sales.

use std::io::Write;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use solemate_core::breakdown::{sales_in_month, total_sales_value};
use solemate_core::{InventoryItemId, Money, NewSale, SaleId, SaleRecord};

use super::{OutputFormat, format_date, format_size, write_json};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::store::RecordSource;

#[derive(Debug, Clone, Subcommand)]
pub enum SalesCommand {
    /// List sales in a calendar month
    List {
        /// Month to show as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<YearMonth>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Record a sale against an inventory item
    Record(RecordSaleArgs),
    /// Delete a sale (stock is not restored)
    Delete {
        /// Sale ID
        id: SaleId,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RecordSaleArgs {
    /// Inventory item ID
    #[arg(short, long)]
    pub item: InventoryItemId,

    /// Units sold
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,

    /// Total received for all units
    #[arg(short, long)]
    pub price: Decimal,

    /// Sale date as YYYY-MM-DD (default: now)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// A calendar month given as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct ParseMonthError(String);

impl FromStr for YearMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(|date| Self {
                year: date.year(),
                month: date.month(),
            })
            .map_err(|_| ParseMonthError(s.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct MonthReport<'a> {
    year: i32,
    month: u32,
    total_value: Money,
    sales: Vec<&'a SaleRecord>,
}

/// Run a sales subcommand.
///
/// # Errors
///
/// Returns `CliError` if records cannot be loaded or saved, a ledger rule
/// rejects the change, or output fails.
pub async fn run<W: Write>(
    source: &RecordSource,
    config: &CliConfig,
    command: SalesCommand,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        SalesCommand::List { month, format } => {
            let month = month.unwrap_or_else(|| {
                let now = Utc::now();
                YearMonth {
                    year: now.year(),
                    month: now.month(),
                }
            });
            let sales = source.fetch_sales().await?;
            list(&sales, month, format, &config.currency_symbol, out)
        }
        SalesCommand::Record(args) => record(source, config, args, out).await,
        SalesCommand::Delete { id } => delete(source, config, id, out).await,
    }
}

/// Render the sales of one month with their total value.
///
/// # Errors
///
/// Returns `CliError` if writing fails.
pub fn list<W: Write>(
    sales: &[SaleRecord],
    month: YearMonth,
    format: OutputFormat,
    symbol: &str,
    out: &mut W,
) -> Result<(), CliError> {
    let in_month = sales_in_month(sales, month.year, month.month);
    let total_value = total_sales_value(in_month.iter().copied());

    if format == OutputFormat::Json {
        return write_json(
            out,
            &MonthReport {
                year: month.year,
                month: month.month,
                total_value,
                sales: in_month,
            },
        );
    }

    writeln!(out, "Sales for {:04}-{:02}", month.year, month.month)?;
    if in_month.is_empty() {
        writeln!(out, "  No sales recorded")?;
    }
    for sale in &in_month {
        let profit = sale
            .profit
            .map_or_else(|| "-".to_string(), |p| Money::from_decimal(p).display_with(symbol));
        writeln!(
            out,
            "  #{:<5} {:<10} {:<28} size {:<5} x{:<3} {:>10}  profit {}",
            sale.id,
            format_date(sale.sale_date),
            sale.product_name,
            format_size(sale.size),
            sale.quantity_sold,
            Money::from_decimal(sale.price_sold).display_with(symbol),
            profit,
        )?;
    }
    writeln!(
        out,
        "Total sales value: {} ({} sales)",
        total_value.display_with(symbol),
        in_month.len()
    )?;
    Ok(())
}

async fn record<W: Write>(
    source: &RecordSource,
    config: &CliConfig,
    args: RecordSaleArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let store = source.writable()?;
    let mut ledger = store.load_ledger().await?;

    let sale_date = args
        .date
        .map_or_else(Utc::now, |date| date.and_time(NaiveTime::MIN).and_utc());

    let sale_id = ledger.record_sale(NewSale {
        inventory_item_id: args.item,
        quantity_sold: args.quantity,
        price_sold: args.price,
        sale_date,
    })?;
    store.save_ledger(&ledger).await?;

    let profit = ledger
        .sales()
        .iter()
        .find(|sale| sale.id == sale_id)
        .and_then(|sale| sale.profit)
        .map(Money::from_decimal)
        .unwrap_or_default();
    info!(sale_id = %sale_id, item_id = %args.item, quantity = args.quantity, "Recorded sale");
    writeln!(
        out,
        "Recorded sale #{sale_id} (profit {})",
        profit.display_with(&config.currency_symbol)
    )?;
    Ok(())
}

async fn delete<W: Write>(
    source: &RecordSource,
    config: &CliConfig,
    id: SaleId,
    out: &mut W,
) -> Result<(), CliError> {
    let store = source.writable()?;
    let mut ledger = store.load_ledger().await?;

    let removed = ledger.delete_sale(id)?;
    store.save_ledger(&ledger).await?;

    info!(sale_id = %id, "Deleted sale");
    writeln!(
        out,
        "Deleted sale #{id} ({} for {})",
        removed.product_name,
        Money::from_decimal(removed.price_sold).display_with(&config.currency_symbol)
    )?;
    Ok(())
}
