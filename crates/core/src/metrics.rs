//! Time-window filtering and the dashboard aggregates.
//!
//! Every function here is pure and total: empty input yields zeroed output,
//! malformed records are skipped or contribute zero, and nothing returns an
//! error. `now` is always passed in so results are reproducible.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{AcquisitionLogEntry, DateField, DatedRecord, Money, SaleRecord, TimePeriod};

/// Revenue card: all-time revenue and number of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct RevenueSummary {
    pub total_revenue: Money,
    pub total_sales_count: usize,
}

/// Total Spent card: acquisition spend and units acquired in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct SpentSummary {
    pub total_spent: Money,
    pub total_items: u64,
}

/// Keep the records whose `date_field` falls inside `period` ending at `now`.
///
/// The cutoff is inclusive (`date >= cutoff`). [`TimePeriod::AllTime`] returns
/// every record, dated or not. Under any bounded period a record without a
/// usable date is dropped with a warning. Order is preserved.
#[must_use]
pub fn filter_by_time_period<T: DatedRecord>(
    records: &[T],
    period: TimePeriod,
    date_field: DateField,
    now: DateTime<Utc>,
) -> Vec<&T> {
    let Some(cutoff) = period.cutoff(now) else {
        return records.iter().collect();
    };

    records
        .iter()
        .filter(|record| match record.date_of(date_field) {
            Some(date) => date >= cutoff,
            None => {
                tracing::warn!(
                    record = %record.describe(),
                    field = %date_field,
                    %period,
                    "Excluding record without a usable date from time window"
                );
                false
            }
        })
        .collect()
}

/// Sum of `price_sold` over all sales, and the number of sales.
///
/// Never time-filtered: the revenue card always shows all-time figures.
#[must_use]
pub fn compute_revenue_and_count(sales: &[SaleRecord]) -> RevenueSummary {
    RevenueSummary {
        total_revenue: Money::sum_of(sales.iter().map(|sale| sale.price_sold)),
        total_sales_count: sales.len(),
    }
}

/// Money spent acquiring stock, from the acquisition log, within `period`.
///
/// Entries without a price add nothing to `total_spent` but their quantity
/// still counts towards `total_items`. A missing quantity counts as zero.
#[must_use]
pub fn compute_total_spent(
    acquisition_log: &[AcquisitionLogEntry],
    period: TimePeriod,
    now: DateTime<Utc>,
) -> SpentSummary {
    let entries = filter_by_time_period(acquisition_log, period, DateField::DateAdded, now);

    let total_spent = Money::sum_of(entries.iter().filter_map(|entry| {
        entry
            .price
            .map(|price| Decimal::from(entry.quantity.unwrap_or(0)) * price)
    }));
    let total_items = entries
        .iter()
        .map(|entry| u64::from(entry.quantity.unwrap_or(0)))
        .sum();

    SpentSummary {
        total_spent,
        total_items,
    }
}

/// Sum of `profit` over sales made within `period`. Missing profit is zero.
#[must_use]
pub fn compute_total_profit(
    sales: &[SaleRecord],
    period: TimePeriod,
    now: DateTime<Utc>,
) -> Money {
    Money::sum_of(
        filter_by_time_period(sales, period, DateField::SaleDate, now)
            .into_iter()
            .map(|sale| sale.profit.unwrap_or_default()),
    )
}
