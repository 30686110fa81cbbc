//! Inventory, sale, and acquisition log lifecycle.
//!
//! [`Ledger`] keeps the three collections consistent with each other:
//! - an inventory item and its acquisition log entry are created and edited in
//!   lockstep and share one id
//! - a sale can only draw on stock that exists, never more than is held
//! - an item leaves inventory exactly once, either sold out or deleted, and
//!   its log entry is then soft-closed rather than removed
//!
//! The ledger works on in-memory collections; loading and saving them is up to
//! the store that owns the data.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{AcquisitionLogEntry, InventoryItem, InventoryItemId, SaleId, SaleRecord};

/// Errors from ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Referenced inventory item does not exist.
    #[error("inventory item {0} not found")]
    ItemNotFound(InventoryItemId),

    /// Referenced sale does not exist.
    #[error("sale {0} not found")]
    SaleNotFound(SaleId),

    /// Sale asks for more units than the item holds.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// Input failed validation.
    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Input for adding an item to inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub product_name: String,
    pub brand: Option<String>,
    pub size: Option<Decimal>,
    pub quantity: u32,
    /// Unit purchase price.
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Input for editing an inventory item. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub size: Option<Decimal>,
    pub quantity: Option<u32>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
}

impl ItemUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.brand.is_none()
            && self.size.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
    }
}

/// Input for recording a sale against an inventory item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub inventory_item_id: InventoryItemId,
    pub quantity_sold: u32,
    /// Total received for all units in this sale.
    pub price_sold: Decimal,
    pub sale_date: DateTime<Utc>,
}

/// In-memory inventory, sales, and acquisition log for one user.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    inventory: Vec<InventoryItem>,
    sales: Vec<SaleRecord>,
    acquisition_log: Vec<AcquisitionLogEntry>,
    next_item_id: i64,
    next_sale_id: i64,
}

impl Ledger {
    /// Build a ledger over existing collections.
    ///
    /// New ids continue after the highest id already present; inventory items
    /// and log entries draw from the same sequence.
    #[must_use]
    pub fn new(
        inventory: Vec<InventoryItem>,
        sales: Vec<SaleRecord>,
        acquisition_log: Vec<AcquisitionLogEntry>,
    ) -> Self {
        let max_item_id = inventory
            .iter()
            .map(|item| item.id.as_i64())
            .chain(acquisition_log.iter().map(|entry| entry.id.as_i64()))
            .max()
            .unwrap_or(0);
        let max_sale_id = sales.iter().map(|sale| sale.id.as_i64()).max().unwrap_or(0);

        Self {
            inventory,
            sales,
            acquisition_log,
            next_item_id: max_item_id + 1,
            next_sale_id: max_sale_id + 1,
        }
    }

    #[must_use]
    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    #[must_use]
    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    #[must_use]
    pub fn acquisition_log(&self) -> &[AcquisitionLogEntry] {
        &self.acquisition_log
    }

    /// Look up an inventory item.
    #[must_use]
    pub fn item(&self, id: InventoryItemId) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| item.id == id)
    }

    /// Hand the collections back, e.g. for persisting.
    #[must_use]
    pub fn into_parts(self) -> (Vec<InventoryItem>, Vec<SaleRecord>, Vec<AcquisitionLogEntry>) {
        (self.inventory, self.sales, self.acquisition_log)
    }

    /// Add an item to inventory and open its acquisition log entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Invalid` if the product name is blank or the
    /// price is negative.
    pub fn add_item(
        &mut self,
        input: NewItem,
        now: DateTime<Utc>,
    ) -> Result<InventoryItemId, LedgerError> {
        let product_name = input.product_name.trim().to_string();
        if product_name.is_empty() {
            return Err(LedgerError::Invalid("product name is required".to_string()));
        }
        validate_non_negative(input.price, "price")?;

        let id = InventoryItemId::new(self.next_item_id);
        self.next_item_id += 1;

        self.acquisition_log.push(AcquisitionLogEntry {
            id,
            product_name: product_name.clone(),
            brand: input.brand.clone(),
            size: input.size,
            quantity: Some(input.quantity),
            price: Some(input.price),
            date_added: Some(now),
            is_sold: false,
            date_removed: None,
            image_url: input.image_url.clone(),
        });
        self.inventory.push(InventoryItem {
            id,
            product_name,
            brand: input.brand,
            size: input.size,
            quantity: input.quantity,
            price: input.price,
            image_url: input.image_url,
        });

        tracing::debug!(item_id = %id, "Added inventory item");
        Ok(id)
    }

    /// Edit an inventory item and mirror the edit onto its log entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ItemNotFound` if the item is not in inventory,
    /// or `LedgerError::Invalid` if the update fails validation.
    pub fn update_item(&mut self, id: InventoryItemId, update: ItemUpdate) -> Result<(), LedgerError> {
        if let Some(name) = &update.product_name
            && name.trim().is_empty()
        {
            return Err(LedgerError::Invalid("product name is required".to_string()));
        }
        if let Some(price) = update.price {
            validate_non_negative(price, "price")?;
        }

        let item = self
            .inventory
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(LedgerError::ItemNotFound(id))?;

        if let Some(name) = &update.product_name {
            item.product_name = name.trim().to_string();
        }
        if let Some(brand) = &update.brand {
            item.brand = Some(brand.clone());
        }
        if let Some(size) = update.size {
            item.size = Some(size);
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = update.price {
            item.price = price;
        }
        if let Some(image_url) = &update.image_url {
            item.image_url = Some(image_url.clone());
        }

        match self.acquisition_log.iter_mut().find(|entry| entry.id == id) {
            // Only edited fields are copied; the log keeps the bought quantity
            // after partial sales unless quantity itself is edited.
            Some(entry) => {
                if update.product_name.is_some() {
                    entry.product_name.clone_from(&item.product_name);
                }
                if update.brand.is_some() {
                    entry.brand.clone_from(&item.brand);
                }
                if update.size.is_some() {
                    entry.size = item.size;
                }
                if update.quantity.is_some() {
                    entry.quantity = Some(item.quantity);
                }
                if update.price.is_some() {
                    entry.price = Some(item.price);
                }
                if update.image_url.is_some() {
                    entry.image_url.clone_from(&item.image_url);
                }
            }
            None => tracing::warn!(item_id = %id, "Inventory item has no acquisition log entry"),
        }

        tracing::debug!(item_id = %id, "Updated inventory item");
        Ok(())
    }

    /// Remove an item from inventory and soft-close its log entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ItemNotFound` if the item is not in inventory.
    pub fn delete_item(&mut self, id: InventoryItemId, now: DateTime<Utc>) -> Result<(), LedgerError> {
        let position = self
            .inventory
            .iter()
            .position(|item| item.id == id)
            .ok_or(LedgerError::ItemNotFound(id))?;
        self.inventory.remove(position);
        self.close_log_entry(id, now);

        tracing::debug!(item_id = %id, "Deleted inventory item");
        Ok(())
    }

    /// Record a sale, drawing its units from inventory.
    ///
    /// Profit is `price_sold - unit price * quantity_sold`. The item's
    /// quantity is decremented; when it reaches zero the item is removed and
    /// its log entry is closed as sold.
    ///
    /// # Errors
    ///
    /// - `LedgerError::ItemNotFound` if the item is not in inventory
    /// - `LedgerError::Invalid` if no units are sold or the price is negative
    /// - `LedgerError::InsufficientStock` if more units are requested than held
    ///
    /// Nothing is changed when an error is returned.
    pub fn record_sale(&mut self, input: NewSale) -> Result<SaleId, LedgerError> {
        if input.quantity_sold == 0 {
            return Err(LedgerError::Invalid("quantity sold must be at least 1".to_string()));
        }
        validate_non_negative(input.price_sold, "price sold")?;

        let position = self
            .inventory
            .iter()
            .position(|item| item.id == input.inventory_item_id)
            .ok_or(LedgerError::ItemNotFound(input.inventory_item_id))?;
        let item = self
            .inventory
            .get_mut(position)
            .ok_or(LedgerError::ItemNotFound(input.inventory_item_id))?;

        if input.quantity_sold > item.quantity {
            return Err(LedgerError::InsufficientStock {
                requested: input.quantity_sold,
                available: item.quantity,
            });
        }

        let cost = item.price * Decimal::from(input.quantity_sold);
        let id = SaleId::new(self.next_sale_id);
        self.next_sale_id += 1;

        self.sales.push(SaleRecord {
            id,
            inventory_item_id: item.id,
            product_name: item.product_name.clone(),
            brand: item.brand.clone(),
            size: item.size,
            quantity_sold: input.quantity_sold,
            price_sold: input.price_sold,
            sale_date: Some(input.sale_date),
            profit: Some(input.price_sold - cost),
        });

        item.quantity -= input.quantity_sold;
        if item.quantity == 0 {
            let item_id = item.id;
            self.inventory.remove(position);
            self.close_log_entry(item_id, input.sale_date);
            tracing::debug!(sale_id = %id, item_id = %item_id, "Recorded sale; item sold out");
        } else {
            tracing::debug!(sale_id = %id, item_id = %item.id, remaining = item.quantity, "Recorded sale");
        }

        Ok(id)
    }

    /// Delete a sale record. Inventory is not restocked.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::SaleNotFound` if no such sale exists.
    pub fn delete_sale(&mut self, id: SaleId) -> Result<SaleRecord, LedgerError> {
        let position = self
            .sales
            .iter()
            .position(|sale| sale.id == id)
            .ok_or(LedgerError::SaleNotFound(id))?;

        tracing::debug!(sale_id = %id, "Deleted sale");
        Ok(self.sales.remove(position))
    }

    fn close_log_entry(&mut self, id: InventoryItemId, at: DateTime<Utc>) {
        match self.acquisition_log.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.is_sold = true;
                entry.date_removed = Some(at);
            }
            None => tracing::warn!(item_id = %id, "No acquisition log entry to close"),
        }
    }
}

fn validate_non_negative(value: Decimal, field: &str) -> Result<(), LedgerError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(LedgerError::Invalid(format!("{field} must not be negative")));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 17, 15, 0, 0).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn new_item(name: &str, quantity: u32, price: &str) -> NewItem {
        NewItem {
            product_name: name.to_string(),
            brand: Some("Nike".to_string()),
            size: Some(dec("10")),
            quantity,
            price: dec(price),
            image_url: None,
        }
    }

    fn sale_of(id: InventoryItemId, quantity_sold: u32, price_sold: &str) -> NewSale {
        NewSale {
            inventory_item_id: id,
            quantity_sold,
            price_sold: dec(price_sold),
            sale_date: now(),
        }
    }

    #[test]
    fn test_add_item_opens_log_entry_with_same_id() {
        let mut ledger = Ledger::default();
        let id = ledger.add_item(new_item("Dunk Low Panda", 2, "95"), now()).unwrap();

        assert_eq!(ledger.inventory().len(), 1);
        let entry = &ledger.acquisition_log()[0];
        assert_eq!(entry.id, id);
        assert_eq!(entry.quantity, Some(2));
        assert_eq!(entry.price, Some(dec("95")));
        assert_eq!(entry.date_added, Some(now()));
        assert!(!entry.is_sold);
    }

    #[test]
    fn test_add_item_rejects_blank_name() {
        let mut ledger = Ledger::default();
        let err = ledger.add_item(new_item("   ", 1, "10"), now()).unwrap_err();
        assert!(matches!(err, LedgerError::Invalid(_)));
        assert!(ledger.inventory().is_empty());
        assert!(ledger.acquisition_log().is_empty());
    }

    #[test]
    fn test_ids_continue_after_existing_records() {
        let mut ledger = Ledger::default();
        ledger.add_item(new_item("A", 1, "10"), now()).unwrap();
        ledger.add_item(new_item("B", 1, "10"), now()).unwrap();
        let (inventory, sales, log) = ledger.into_parts();

        // Item 2 was deleted earlier; only its log entry remains.
        let inventory: Vec<_> = inventory.into_iter().take(1).collect();
        let mut ledger = Ledger::new(inventory, sales, log);
        let id = ledger.add_item(new_item("C", 1, "10"), now()).unwrap();
        assert_eq!(id, InventoryItemId::new(3));
    }

    #[test]
    fn test_update_item_mirrors_log_entry() {
        let mut ledger = Ledger::default();
        let id = ledger.add_item(new_item("Dunk Low", 1, "95"), now()).unwrap();

        ledger
            .update_item(
                id,
                ItemUpdate {
                    product_name: Some("Dunk Low Panda".to_string()),
                    quantity: Some(3),
                    price: Some(dec("90")),
                    ..ItemUpdate::default()
                },
            )
            .unwrap();

        let item = ledger.item(id).unwrap();
        assert_eq!(item.product_name, "Dunk Low Panda");
        assert_eq!(item.quantity, 3);
        let entry = &ledger.acquisition_log()[0];
        assert_eq!(entry.product_name, "Dunk Low Panda");
        assert_eq!(entry.quantity, Some(3));
        assert_eq!(entry.price, Some(dec("90")));
        assert_eq!(entry.date_added, Some(now()));
    }

    #[test]
    fn test_update_after_partial_sale_keeps_bought_quantity() {
        let mut ledger = Ledger::default();
        let id = ledger.add_item(new_item("Samba OG", 3, "80"), now()).unwrap();
        ledger.record_sale(sale_of(id, 1, "120")).unwrap();

        ledger
            .update_item(
                id,
                ItemUpdate {
                    price: Some(dec("85")),
                    ..ItemUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(ledger.item(id).unwrap().quantity, 2);
        let entry = &ledger.acquisition_log()[0];
        assert_eq!(entry.quantity, Some(3));
        assert_eq!(entry.price, Some(dec("85")));
    }

    #[test]
    fn test_update_unknown_item() {
        let mut ledger = Ledger::default();
        let err = ledger
            .update_item(InventoryItemId::new(9), ItemUpdate::default())
            .unwrap_err();
        assert_eq!(err, LedgerError::ItemNotFound(InventoryItemId::new(9)));
    }

    #[test]
    fn test_delete_item_soft_closes_log() {
        let mut ledger = Ledger::default();
        let id = ledger.add_item(new_item("Dunk Low", 1, "95"), now()).unwrap();

        ledger.delete_item(id, now()).unwrap();

        assert!(ledger.inventory().is_empty());
        let entry = &ledger.acquisition_log()[0];
        assert!(entry.is_sold);
        assert_eq!(entry.date_removed, Some(now()));
        assert_eq!(
            ledger.delete_item(id, now()).unwrap_err(),
            LedgerError::ItemNotFound(id)
        );
    }

    #[test]
    fn test_partial_sale_decrements_stock() {
        let mut ledger = Ledger::default();
        let id = ledger.add_item(new_item("Samba OG", 3, "80"), now()).unwrap();

        let sale_id = ledger.record_sale(sale_of(id, 2, "200")).unwrap();

        assert_eq!(ledger.item(id).unwrap().quantity, 1);
        let sale = &ledger.sales()[0];
        assert_eq!(sale.id, sale_id);
        assert_eq!(sale.product_name, "Samba OG");
        assert_eq!(sale.profit, Some(dec("40")));
        assert!(!ledger.acquisition_log()[0].is_sold);
    }

    #[test]
    fn test_full_sale_removes_item_and_closes_log() {
        let mut ledger = Ledger::default();
        let id = ledger.add_item(new_item("Samba OG", 1, "80"), now()).unwrap();

        ledger.record_sale(sale_of(id, 1, "60")).unwrap();

        assert!(ledger.item(id).is_none());
        assert_eq!(ledger.sales()[0].profit, Some(dec("-20")));
        let entry = &ledger.acquisition_log()[0];
        assert!(entry.is_sold);
        assert_eq!(entry.date_removed, Some(now()));
    }

    #[test]
    fn test_oversell_is_rejected_without_changes() {
        let mut ledger = Ledger::default();
        let id = ledger.add_item(new_item("Samba OG", 2, "80"), now()).unwrap();

        let err = ledger.record_sale(sale_of(id, 3, "300")).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                requested: 3,
                available: 2
            }
        );
        assert!(ledger.sales().is_empty());
        assert_eq!(ledger.item(id).unwrap().quantity, 2);
    }

    #[test]
    fn test_sale_requires_existing_item_and_units() {
        let mut ledger = Ledger::default();
        let missing = InventoryItemId::new(5);
        assert_eq!(
            ledger.record_sale(sale_of(missing, 1, "10")).unwrap_err(),
            LedgerError::ItemNotFound(missing)
        );

        let id = ledger.add_item(new_item("Samba OG", 2, "80"), now()).unwrap();
        assert!(matches!(
            ledger.record_sale(sale_of(id, 0, "10")).unwrap_err(),
            LedgerError::Invalid(_)
        ));
    }

    #[test]
    fn test_delete_sale() {
        let mut ledger = Ledger::default();
        let id = ledger.add_item(new_item("Samba OG", 2, "80"), now()).unwrap();
        let sale_id = ledger.record_sale(sale_of(id, 1, "100")).unwrap();

        let removed = ledger.delete_sale(sale_id).unwrap();
        assert_eq!(removed.id, sale_id);
        assert!(ledger.sales().is_empty());
        // Deleting a sale does not restock.
        assert_eq!(ledger.item(id).unwrap().quantity, 1);
        assert_eq!(
            ledger.delete_sale(sale_id).unwrap_err(),
            LedgerError::SaleNotFound(sale_id)
        );
    }
}
