//! Secondary dashboard and page summaries.
//!
//! Brand share of current stock, profit per calendar month, the Sales page's
//! month view, and stock valuation.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{InventoryItem, Money, SaleRecord};

/// Units held for one brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandShare {
    pub brand: String,
    pub quantity: u64,
}

/// Profit for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyProfit {
    pub year: i32,
    pub month: u32,
    pub profit: Money,
}

impl MonthlyProfit {
    /// Display label, e.g. "October 2024".
    #[must_use]
    pub fn label(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok())
            .map_or("Unknown", |m| m.name());
        format!("{name} {}", self.year)
    }
}

/// Units in stock per brand, in order of first appearance.
///
/// Items without a brand (or with a blank one) are left out.
#[must_use]
pub fn brand_breakdown(inventory: &[InventoryItem]) -> Vec<BrandShare> {
    let mut shares: Vec<BrandShare> = Vec::new();

    for item in inventory {
        let Some(brand) = item.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) else {
            continue;
        };
        match shares.iter_mut().find(|share| share.brand == brand) {
            Some(share) => share.quantity += u64::from(item.quantity),
            None => shares.push(BrandShare {
                brand: brand.to_string(),
                quantity: u64::from(item.quantity),
            }),
        }
    }

    shares
}

/// Profit grouped by calendar month over the trailing `months` months.
///
/// The window starts on the first day of the month `months - 1` before the
/// month containing `now`. Months are keyed by year as well, so the same month
/// in different years never merges. Only months with at least one sale appear,
/// oldest first. Sales without a date are skipped.
#[must_use]
pub fn monthly_profit(sales: &[SaleRecord], months: u32, now: DateTime<Utc>) -> Vec<MonthlyProfit> {
    if months == 0 {
        return Vec::new();
    }

    let window_start = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|first| first.checked_sub_months(Months::new(months - 1)))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc());

    let mut buckets: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for sale in sales {
        let Some(date) = sale.sale_date else {
            continue;
        };
        if window_start.is_some_and(|start| date < start) {
            continue;
        }
        *buckets.entry((date.year(), date.month())).or_default() +=
            sale.profit.unwrap_or_default();
    }

    buckets
        .into_iter()
        .map(|((year, month), profit)| MonthlyProfit {
            year,
            month,
            profit: Money::from_decimal(profit),
        })
        .collect()
}

/// Sales dated within the given calendar month, in original order.
#[must_use]
pub fn sales_in_month(sales: &[SaleRecord], year: i32, month: u32) -> Vec<&SaleRecord> {
    sales
        .iter()
        .filter(|sale| {
            sale.sale_date
                .is_some_and(|date| date.year() == year && date.month() == month)
        })
        .collect()
}

/// Sum of `price_sold` over the given sales.
#[must_use]
pub fn total_sales_value<'a, I>(sales: I) -> Money
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    Money::sum_of(sales.into_iter().map(|sale| sale.price_sold))
}

/// Purchase value of everything currently in stock.
#[must_use]
pub fn total_stock_value(inventory: &[InventoryItem]) -> Money {
    Money::sum_of(inventory.iter().map(InventoryItem::stock_value))
}
