//! Dashboard summary cards.

use std::io::Write;

use chrono::Utc;
use clap::Args;
use tracing::{debug, error};

use solemate_core::{CollectionKind, DashboardMetrics, DashboardState, TimePeriod};

use super::{OutputFormat, plural, write_json};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::store::RecordSource;

#[derive(Debug, Clone, Args)]
pub struct DashboardArgs {
    /// Time window for the Total Spent card
    #[arg(long, default_value = "all-time")]
    pub spent_period: TimePeriod,

    /// Time window for the Total Profit card
    #[arg(long, default_value = "all-time")]
    pub profit_period: TimePeriod,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Fetch all three collections concurrently into a fresh dashboard state.
///
/// A failed fetch is logged and recorded on the state rather than returned,
/// so the cards that don't depend on it still render.
pub async fn load_state(source: &RecordSource) -> DashboardState {
    let (inventory, sales, acquisition_log) = tokio::join!(
        source.fetch_inventory(),
        source.fetch_sales(),
        source.fetch_acquisition_log(),
    );

    if let Err(e) = &inventory {
        error!(collection = %CollectionKind::Inventory, error = %e, "Failed to fetch records");
    }
    if let Err(e) = &sales {
        error!(collection = %CollectionKind::Sales, error = %e, "Failed to fetch records");
    }
    if let Err(e) = &acquisition_log {
        error!(collection = %CollectionKind::AcquisitionLog, error = %e, "Failed to fetch records");
    }

    let mut state = DashboardState::new();
    state.set_inventory(inventory);
    state.set_sales(sales);
    state.set_acquisition_log(acquisition_log);
    state
}

/// Show the dashboard cards.
///
/// # Errors
///
/// Returns `CliError` only if the report cannot be written; fetch failures
/// are shown as unavailable cards instead.
pub async fn show<W: Write>(
    source: &RecordSource,
    config: &CliConfig,
    args: &DashboardArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let mut state = load_state(source).await;
    state.set_total_spent_period(args.spent_period);
    state.set_profit_period(args.profit_period);

    let metrics = state.recompute(Utc::now());
    debug!(complete = metrics.is_complete(), "Dashboard computed");

    match args.format {
        OutputFormat::Json => write_json(out, &metrics),
        OutputFormat::Text => render_text(&metrics, &config.currency_symbol, out),
    }
}

/// Render the cards as aligned text.
///
/// # Errors
///
/// Returns `CliError::Output` if writing fails.
pub fn render_text<W: Write>(
    metrics: &DashboardMetrics,
    symbol: &str,
    out: &mut W,
) -> Result<(), CliError> {
    let sales_count = u64::try_from(metrics.total_sales_count).unwrap_or(u64::MAX);

    writeln!(out, "Dashboard")?;
    writeln!(
        out,
        "  {:<14} {:>12}  ({} {})",
        "Total Revenue",
        metrics.total_revenue.display_with(symbol),
        metrics.total_sales_count,
        plural(sales_count, "sale", "sales"),
    )?;
    writeln!(
        out,
        "  {:<14} {:>12}  ({} {}, {})",
        "Total Spent",
        metrics.total_spent.display_with(symbol),
        metrics.total_items,
        plural(metrics.total_items, "item", "items"),
        metrics.total_spent_period,
    )?;
    writeln!(
        out,
        "  {:<14} {:>12}  ({})",
        "Total Profit",
        metrics.total_profit.display_with(symbol),
        metrics.profit_period,
    )?;

    for failure in &metrics.unavailable {
        writeln!(
            out,
            "  ! {} unavailable: {}",
            failure.collection, failure.message
        )?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use solemate_core::{InventoryItemId, SaleId, SaleRecord};

    use super::*;

    fn sale(price: &str, profit: &str) -> SaleRecord {
        SaleRecord {
            id: SaleId::new(1),
            inventory_item_id: InventoryItemId::new(1),
            product_name: "Gel-Lyte III".to_string(),
            brand: Some("Asics".to_string()),
            size: None,
            quantity_sold: 1,
            price_sold: Decimal::from_str(price).unwrap(),
            sale_date: Some(Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap()),
            profit: Some(Decimal::from_str(profit).unwrap()),
        }
    }

    fn render(metrics: &DashboardMetrics) -> String {
        let mut out = Vec::new();
        render_text(metrics, "£", &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_text_cards() {
        let mut state = DashboardState::new();
        state.set_inventory(Ok::<_, String>(Vec::new()));
        state.set_sales(Ok::<_, String>(vec![sale("100", "30")]));
        state.set_acquisition_log(Ok::<_, String>(Vec::new()));
        state.set_profit_period(TimePeriod::LastMonth);

        let now = Utc.with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap();
        let text = render(&state.recompute(now));

        assert!(text.contains("Total Revenue"));
        assert!(text.contains("£100.00"));
        assert!(text.contains("(1 sale)"));
        assert!(text.contains("(0 items, All Time)"));
        assert!(text.contains("£30.00"));
        assert!(text.contains("(Last Month)"));
        assert!(!text.contains("unavailable"));
    }

    #[test]
    fn test_render_text_marks_failed_collections() {
        let mut state = DashboardState::new();
        state.set_inventory(Ok::<_, String>(Vec::new()));
        state.set_sales(Err("connection refused"));
        state.set_acquisition_log(Ok::<_, String>(Vec::new()));

        let now = Utc.with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap();
        let text = render(&state.recompute(now));

        assert!(text.contains("(0 sales)"));
        assert!(text.contains("! sales unavailable: connection refused"));
    }
}
