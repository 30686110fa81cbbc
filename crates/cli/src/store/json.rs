//! Local JSON file store.
//!
//! One file per collection in the data directory: `inventory.json`,
//! `sales.json` and `shoe_log.json`, each holding a JSON array. A missing file
//! reads as an empty collection.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use solemate_core::{CollectionKind, Ledger};

use super::StoreError;

/// Read/write store over a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    #[must_use]
    pub const fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File holding the given collection.
    #[must_use]
    pub fn path_for(&self, collection: CollectionKind) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection.table()))
    }

    /// Read one collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be read, or
    /// `StoreError::Json` if it does not decode.
    pub async fn load<T: DeserializeOwned>(
        &self,
        collection: CollectionKind,
    ) -> Result<Vec<T>, StoreError> {
        let path = self.path_for(collection);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Record file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<T> =
            serde_json::from_str(&content).map_err(|source| StoreError::Json { path: path.clone(), source })?;
        debug!(path = %path.display(), count = records.len(), "Loaded records");
        Ok(records)
    }

    /// Temporary file a collection is written to before it replaces the real one.
    fn staging_path_for(&self, collection: CollectionKind) -> PathBuf {
        self.path_for(collection).with_extension("json.tmp")
    }

    async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Io {
                path: self.data_dir.clone(),
                source,
            })
    }

    /// Write one collection to its staging file.
    async fn stage<T: Serialize>(
        &self,
        collection: CollectionKind,
        records: &[T],
    ) -> Result<(), StoreError> {
        let tmp_path = self.staging_path_for(collection);
        let content = serde_json::to_string_pretty(records).map_err(|source| StoreError::Json {
            path: self.path_for(collection),
            source,
        })?;

        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path,
                source,
            })
    }

    /// Move a staged collection over the real file.
    async fn commit(&self, collection: CollectionKind) -> Result<(), StoreError> {
        let path = self.path_for(collection);
        tokio::fs::rename(self.staging_path_for(collection), &path)
            .await
            .map_err(|source| StoreError::Io { path, source })
    }

    async fn discard_staged(&self, collections: &[CollectionKind]) {
        for &collection in collections {
            let tmp_path = self.staging_path_for(collection);
            match tokio::fs::remove_file(&tmp_path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => {
                    warn!(path = %tmp_path.display(), error = %e, "Failed to remove staging file");
                }
                _ => {}
            }
        }
    }

    /// Load all three collections into a ledger.
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError` encountered.
    pub async fn load_ledger(&self) -> Result<Ledger, StoreError> {
        let (inventory, sales, acquisition_log) = tokio::try_join!(
            self.load(CollectionKind::Inventory),
            self.load(CollectionKind::Sales),
            self.load(CollectionKind::AcquisitionLog),
        )?;
        Ok(Ledger::new(inventory, sales, acquisition_log))
    }

    /// Persist all three collections of a ledger.
    ///
    /// All three files are staged before any is replaced, so a failed write
    /// leaves the previous records untouched. Only the final renames can
    /// leave the set half-updated.
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError` encountered.
    pub async fn save_ledger(&self, ledger: &Ledger) -> Result<(), StoreError> {
        const COLLECTIONS: [CollectionKind; 3] = [
            CollectionKind::Inventory,
            CollectionKind::Sales,
            CollectionKind::AcquisitionLog,
        ];

        self.ensure_dir().await?;
        // All writes finish before any cleanup.
        let (inventory, sales, acquisition_log) = tokio::join!(
            self.stage(CollectionKind::Inventory, ledger.inventory()),
            self.stage(CollectionKind::Sales, ledger.sales()),
            self.stage(CollectionKind::AcquisitionLog, ledger.acquisition_log()),
        );
        if let Err(e) = inventory.and(sales).and(acquisition_log) {
            self.discard_staged(&COLLECTIONS).await;
            return Err(e);
        }

        for collection in COLLECTIONS {
            self.commit(collection).await?;
        }

        info!(
            dir = %self.data_dir.display(),
            inventory = ledger.inventory().len(),
            sales = ledger.sales().len(),
            log_entries = ledger.acquisition_log().len(),
            "Saved records"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use solemate_core::{InventoryItem, NewItem, NewSale, SaleRecord};

    use super::*;

    fn temp_store() -> JsonStore {
        let dir = std::env::temp_dir().join(format!("solemate-json-{}", uuid::Uuid::new_v4()));
        JsonStore::new(dir)
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let store = temp_store();
        let inventory: Vec<InventoryItem> = store.load(CollectionKind::Inventory).await.unwrap();
        assert!(inventory.is_empty());

        let ledger = store.load_ledger().await.unwrap();
        assert!(ledger.sales().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported_with_path() {
        let store = temp_store();
        tokio::fs::create_dir_all(store.data_dir()).await.unwrap();
        tokio::fs::write(store.path_for(CollectionKind::Sales), "{not json")
            .await
            .unwrap();

        let err = store.load::<SaleRecord>(CollectionKind::Sales).await.unwrap_err();
        match err {
            StoreError::Json { path, .. } => assert!(path.ends_with("sales.json")),
            other => panic!("expected JSON error, got {other:?}"),
        }

        tokio::fs::remove_dir_all(store.data_dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_ledger_persists_across_loads() {
        let store = temp_store();
        let now = Utc.with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap();

        let mut ledger = store.load_ledger().await.unwrap();
        let id = ledger
            .add_item(
                NewItem {
                    product_name: "Air Max 90".to_string(),
                    brand: Some("Nike".to_string()),
                    size: Some(Decimal::new(95, 1)),
                    quantity: 2,
                    price: Decimal::new(8000, 2),
                    image_url: None,
                },
                now,
            )
            .unwrap();
        ledger
            .record_sale(NewSale {
                inventory_item_id: id,
                quantity_sold: 1,
                price_sold: Decimal::new(12000, 2),
                sale_date: now,
            })
            .unwrap();
        store.save_ledger(&ledger).await.unwrap();

        let reloaded = store.load_ledger().await.unwrap();
        assert_eq!(reloaded.inventory(), ledger.inventory());
        assert_eq!(reloaded.sales(), ledger.sales());
        assert_eq!(reloaded.acquisition_log(), ledger.acquisition_log());
        assert_eq!(reloaded.item(id).unwrap().quantity, 1);

        tokio::fs::remove_dir_all(store.data_dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_staging_leaves_previous_records() {
        let store = temp_store();
        let now = Utc.with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap();

        let mut ledger = store.load_ledger().await.unwrap();
        let id = ledger
            .add_item(
                NewItem {
                    product_name: "Gazelle".to_string(),
                    brand: Some("Adidas".to_string()),
                    size: None,
                    quantity: 1,
                    price: Decimal::new(5000, 2),
                    image_url: None,
                },
                now,
            )
            .unwrap();
        store.save_ledger(&ledger).await.unwrap();

        ledger
            .record_sale(NewSale {
                inventory_item_id: id,
                quantity_sold: 1,
                price_sold: Decimal::new(7000, 2),
                sale_date: now,
            })
            .unwrap();
        // A directory where the inventory staging file should go makes that write fail.
        tokio::fs::create_dir_all(store.staging_path_for(CollectionKind::Inventory))
            .await
            .unwrap();

        let err = store.save_ledger(&ledger).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        let reloaded = store.load_ledger().await.unwrap();
        assert!(reloaded.sales().is_empty());
        assert_eq!(reloaded.item(id).unwrap().quantity, 1);
        let sales_staging = store.staging_path_for(CollectionKind::Sales);
        assert!(!tokio::fs::try_exists(sales_staging).await.unwrap());

        tokio::fs::remove_dir_all(store.data_dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_leaves_no_staging_files() {
        let store = temp_store();
        let ledger = store.load_ledger().await.unwrap();
        store.save_ledger(&ledger).await.unwrap();

        for collection in [
            CollectionKind::Inventory,
            CollectionKind::Sales,
            CollectionKind::AcquisitionLog,
        ] {
            let staging = store.staging_path_for(collection);
            assert!(tokio::fs::try_exists(store.path_for(collection)).await.unwrap());
            assert!(!tokio::fs::try_exists(staging).await.unwrap());
        }

        tokio::fs::remove_dir_all(store.data_dir()).await.unwrap();
    }
}
