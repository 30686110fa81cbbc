//! Record shapes as stored by the backend (`inventory`, `sales`, `shoe_log`).
//!
//! Persistence and identity belong to the store; these types only describe
//! what the engine and ledger read. Decoding is lenient: a missing, `null` or
//! malformed value becomes `None` where the field is optional and zero where
//! it isn't, so one bad row never costs the rest of its collection.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::date::{DateField, DatedRecord, lenient_timestamp};
use super::id::{InventoryItemId, SaleId};

/// Decode `null` as the type's default instead of failing.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A JSON number or numeric string as a decimal.
fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            let raw = number.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()
        }
        Value::String(raw) => {
            let raw = raw.trim();
            Decimal::from_str(raw)
                .or_else(|_| Decimal::from_scientific(raw))
                .ok()
        }
        _ => None,
    }
}

/// A whole, non-negative quantity that fits in `u32`.
fn count_from_value(value: &Value) -> Option<u32> {
    decimal_from_value(value)
        .filter(|amount| amount.fract().is_zero())
        .and_then(|amount| amount.to_u32())
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

fn lenient_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_decimal(deserializer).map(Option::unwrap_or_default)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn lenient_count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_count(deserializer).map(Option::unwrap_or_default)
}

/// One stock-keeping unit currently held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Shoe size; half sizes are common, so this is a decimal.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub size: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_count_or_zero")]
    pub quantity: u32,
    /// Unit purchase price.
    #[serde(default, deserialize_with = "lenient_decimal_or_zero")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl InventoryItem {
    /// Purchase value of the units still held (`price * quantity`).
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A recorded sale. Never updated once created; only deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: SaleId,
    pub inventory_item_id: InventoryItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub size: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_count_or_zero")]
    pub quantity_sold: u32,
    /// Total received for the whole sale (not per unit).
    #[serde(default, deserialize_with = "lenient_decimal_or_zero")]
    pub price_sold: Decimal,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub sale_date: Option<DateTime<Utc>>,
    /// `price_sold` minus the purchase cost of the units sold. Signed.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub profit: Option<Decimal>,
}

impl DatedRecord for SaleRecord {
    fn date_of(&self, field: DateField) -> Option<DateTime<Utc>> {
        match field {
            DateField::SaleDate => self.sale_date,
            DateField::DateAdded | DateField::DateRemoved => None,
        }
    }

    fn describe(&self) -> String {
        format!("sale {}", self.id)
    }
}

/// Acquisition history ("shoe log") entry, one per inventory item lifetime.
///
/// Shares its id with the inventory item it was created for. Soft-closed with
/// `is_sold` and `date_removed` when the item sells out or is deleted; never
/// removed, so it remains the source of money-spent history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionLogEntry {
    pub id: InventoryItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub size: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub quantity: Option<u32>,
    /// Unit purchase price.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_sold: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_removed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl DatedRecord for AcquisitionLogEntry {
    fn date_of(&self, field: DateField) -> Option<DateTime<Utc>> {
        match field {
            DateField::DateAdded => self.date_added,
            DateField::DateRemoved => self.date_removed,
            DateField::SaleDate => None,
        }
    }

    fn describe(&self) -> String {
        format!("shoe log entry {}", self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::TimePeriod;
    use crate::metrics::{compute_revenue_and_count, compute_total_profit, compute_total_spent};

    #[test]
    fn test_decode_inventory_row() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"id": 3, "user_id": "ignored", "product_name": "Jordan 1 Chicago",
                "brand": "Nike", "size": 9.5, "quantity": 2, "price": 180.5,
                "image_url": null}"#,
        )
        .unwrap();

        assert_eq!(item.id, InventoryItemId::new(3));
        assert_eq!(item.size, Some(Decimal::from_str("9.5").unwrap()));
        assert_eq!(item.stock_value(), Decimal::from(361));
        assert_eq!(item.image_url, None);
    }

    #[test]
    fn test_decode_sale_with_missing_fields() {
        let sale: SaleRecord = serde_json::from_str(
            r#"{"id": 1, "inventory_item_id": 3, "price_sold": null, "sale_date": "2024-10-10"}"#,
        )
        .unwrap();

        assert_eq!(sale.price_sold, Decimal::ZERO);
        assert_eq!(sale.quantity_sold, 0);
        assert_eq!(sale.profit, None);
        assert!(sale.sale_date.is_some());
        assert_eq!(sale.date_of(DateField::DateAdded), None);
    }

    #[test]
    fn test_decode_log_entry_with_null_price() {
        let entry: AcquisitionLogEntry = serde_json::from_str(
            r#"{"id": 5, "product_name": "Yeezy 350", "quantity": 1, "price": null,
                "date_added": "2024-10-10T08:00:00.123456+00:00", "is_sold": null}"#,
        )
        .unwrap();

        assert_eq!(entry.price, None);
        assert_eq!(entry.quantity, Some(1));
        assert!(!entry.is_sold);
        assert!(entry.date_of(DateField::DateAdded).is_some());
        assert_eq!(entry.date_of(DateField::DateRemoved), None);
    }

    #[test]
    fn test_malformed_numbers_decode_as_zero() {
        let sales: Vec<SaleRecord> = serde_json::from_str(
            r#"[
                {"id": 1, "inventory_item_id": 1, "quantity_sold": 1, "price_sold": 100,
                 "sale_date": "2024-10-10", "profit": 40},
                {"id": 2, "inventory_item_id": 2, "quantity_sold": "lots", "price_sold": "n/a",
                 "sale_date": "2024-10-11", "profit": "n/a", "size": "wide"}
            ]"#,
        )
        .unwrap();

        assert_eq!(sales.len(), 2);
        assert_eq!(sales[1].quantity_sold, 0);
        assert_eq!(sales[1].price_sold, Decimal::ZERO);
        assert_eq!(sales[1].profit, None);
        assert_eq!(sales[1].size, None);

        let now = Utc.with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap();
        let revenue = compute_revenue_and_count(&sales);
        assert_eq!(revenue.total_revenue.to_string(), "100.00");
        assert_eq!(revenue.total_sales_count, 2);
        assert_eq!(compute_total_profit(&sales, TimePeriod::AllTime, now).to_string(), "40.00");
    }

    #[test]
    fn test_out_of_range_quantities_decode_as_missing() {
        let log: Vec<AcquisitionLogEntry> = serde_json::from_str(
            r#"[
                {"id": 1, "quantity": 2, "price": "25.50", "date_added": "2024-10-10"},
                {"id": 2, "quantity": -1, "price": 10, "date_added": "2024-10-10"},
                {"id": 3, "quantity": 1.5, "price": {"amount": 3}, "date_added": "2024-10-10"},
                {"id": 4, "quantity": 1e2, "price": 1, "date_added": "2024-10-10"}
            ]"#,
        )
        .unwrap();

        assert_eq!(log[1].quantity, None);
        assert_eq!(log[2].quantity, None);
        assert_eq!(log[2].price, None);
        assert_eq!(log[3].quantity, Some(100));

        let now = Utc.with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap();
        let spent = compute_total_spent(&log, TimePeriod::AllTime, now);
        assert_eq!(spent.total_spent.to_string(), "151.00");
        assert_eq!(spent.total_items, 102);
    }

    #[test]
    fn test_inventory_quantity_beyond_u32_is_zero() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"id": 1, "product_name": "Samba OG", "quantity": 5000000000, "price": "75"}"#,
        )
        .unwrap();

        assert_eq!(item.quantity, 0);
        assert_eq!(item.price, Decimal::from(75));
    }
}
