//! Dashboard state container.
//!
//! Holds the three fetched collections and the two period selectors as plain
//! fields. [`DashboardState::recompute`] derives every card from scratch, so
//! the order in which inputs change never matters. The Total Spent and Profit
//! selectors are separate fields and never influence each other.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::metrics::{
    RevenueSummary, SpentSummary, compute_revenue_and_count, compute_total_profit,
    compute_total_spent,
};
use crate::types::{AcquisitionLogEntry, InventoryItem, Money, SaleRecord, TimePeriod};

/// Load state of one input collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection<T> {
    /// Not fetched yet. Treated as empty.
    Pending,
    /// Fetched successfully.
    Loaded(Vec<T>),
    /// The fetch failed; holds the collaborator's error message.
    Failed(String),
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<T> Collection<T> {
    /// Record the outcome of a fetch.
    pub fn from_result<E: Display>(result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(records) => Self::Loaded(records),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Records to aggregate; empty unless loaded.
    #[must_use]
    pub fn records(&self) -> &[T] {
        match self {
            Self::Loaded(records) => records.as_slice(),
            Self::Pending | Self::Failed(_) => &[],
        }
    }

    /// Error message if the fetch failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Pending | Self::Loaded(_) => None,
        }
    }
}

/// Which input collection a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Inventory,
    Sales,
    AcquisitionLog,
}

impl CollectionKind {
    /// Backend table name.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Sales => "sales",
            Self::AcquisitionLog => "shoe_log",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A collection that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub collection: CollectionKind,
    pub message: String,
}

/// Everything the dashboard cards display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub total_revenue: Money,
    pub total_sales_count: usize,
    pub total_spent: Money,
    pub total_items: u64,
    pub total_profit: Money,
    pub total_spent_period: TimePeriod,
    pub profit_period: TimePeriod,
    /// Inputs that failed to load. Cards fed by them show zero.
    pub unavailable: Vec<FetchFailure>,
}

impl DashboardMetrics {
    /// Whether every input loaded, so no card was zeroed by a failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }

    /// Whether the given collection failed to load.
    #[must_use]
    pub fn is_unavailable(&self, collection: CollectionKind) -> bool {
        self.unavailable.iter().any(|f| f.collection == collection)
    }
}

/// Inputs to the dashboard: fetched collections and period selectors.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    inventory: Collection<InventoryItem>,
    sales: Collection<SaleRecord>,
    acquisition_log: Collection<AcquisitionLogEntry>,
    total_spent_period: TimePeriod,
    profit_period: TimePeriod,
}

impl DashboardState {
    /// Empty state with both selectors on All Time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome of the inventory fetch.
    pub fn set_inventory<E: Display>(&mut self, result: Result<Vec<InventoryItem>, E>) {
        self.inventory = Collection::from_result(result);
    }

    /// Store the outcome of the sales fetch.
    pub fn set_sales<E: Display>(&mut self, result: Result<Vec<SaleRecord>, E>) {
        self.sales = Collection::from_result(result);
    }

    /// Store the outcome of the acquisition log fetch.
    pub fn set_acquisition_log<E: Display>(
        &mut self,
        result: Result<Vec<AcquisitionLogEntry>, E>,
    ) {
        self.acquisition_log = Collection::from_result(result);
    }

    /// Change the Total Spent selector only.
    pub const fn set_total_spent_period(&mut self, period: TimePeriod) {
        self.total_spent_period = period;
    }

    /// Change the Profit selector only.
    pub const fn set_profit_period(&mut self, period: TimePeriod) {
        self.profit_period = period;
    }

    #[must_use]
    pub const fn total_spent_period(&self) -> TimePeriod {
        self.total_spent_period
    }

    #[must_use]
    pub const fn profit_period(&self) -> TimePeriod {
        self.profit_period
    }

    #[must_use]
    pub const fn inventory(&self) -> &Collection<InventoryItem> {
        &self.inventory
    }

    #[must_use]
    pub const fn sales(&self) -> &Collection<SaleRecord> {
        &self.sales
    }

    #[must_use]
    pub const fn acquisition_log(&self) -> &Collection<AcquisitionLogEntry> {
        &self.acquisition_log
    }

    /// Derive every dashboard card from the current inputs.
    ///
    /// Cards fed by a failed collection are reset to zero and the failure is
    /// listed in [`DashboardMetrics::unavailable`]; stale values are never
    /// carried over.
    #[must_use]
    pub fn recompute(&self, now: DateTime<Utc>) -> DashboardMetrics {
        let mut unavailable = Vec::new();
        for (collection, failure) in [
            (CollectionKind::Inventory, self.inventory.failure()),
            (CollectionKind::Sales, self.sales.failure()),
            (CollectionKind::AcquisitionLog, self.acquisition_log.failure()),
        ] {
            if let Some(message) = failure {
                unavailable.push(FetchFailure {
                    collection,
                    message: message.to_string(),
                });
            }
        }

        // Failed collections yield no records, so their cards come out zero.
        let RevenueSummary {
            total_revenue,
            total_sales_count,
        } = compute_revenue_and_count(self.sales.records());
        let SpentSummary {
            total_spent,
            total_items,
        } = compute_total_spent(self.acquisition_log.records(), self.total_spent_period, now);
        let total_profit = compute_total_profit(self.sales.records(), self.profit_period, now);

        tracing::debug!(
            sales = self.sales.records().len(),
            log_entries = self.acquisition_log.records().len(),
            spent_period = %self.total_spent_period,
            profit_period = %self.profit_period,
            unavailable = unavailable.len(),
            "Recomputed dashboard metrics"
        );

        DashboardMetrics {
            total_revenue,
            total_sales_count,
            total_spent,
            total_items,
            total_profit,
            total_spent_period: self.total_spent_period,
            profit_period: self.profit_period,
            unavailable,
        }
    }
}
