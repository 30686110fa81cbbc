//! Record sources.
//!
//! Records are read from either a local directory of JSON files (read/write)
//! or the hosted backend's REST API (read-only). Both hand back full
//! collections for one user; the engine does the rest in memory.

mod json;
mod rest;

pub use json::JsonStore;
pub use rest::RestClient;

use std::path::PathBuf;

use thiserror::Error;

use solemate_core::{AcquisitionLogEntry, CollectionKind, InventoryItem, SaleRecord};

use crate::config::SourceConfig;

/// Errors from loading or saving records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record file did not decode.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{collection} request failed with status {status}: {body}")]
    Status {
        collection: CollectionKind,
        status: u16,
        body: String,
    },

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The configured source cannot be written to.
    #[error("{0} is read-only; use SOLEMATE_SOURCE=json to make changes")]
    ReadOnly(&'static str),
}

/// The configured record source.
#[derive(Debug, Clone)]
pub enum RecordSource {
    Json(JsonStore),
    Rest(RestClient),
}

impl RecordSource {
    /// Build the source described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &SourceConfig) -> Result<Self, StoreError> {
        Ok(match config {
            SourceConfig::Json { data_dir } => Self::Json(JsonStore::new(data_dir.clone())),
            SourceConfig::Rest(rest) => Self::Rest(RestClient::new(rest)?),
        })
    }

    /// Short human-readable description for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Json(store) => format!("json:{}", store.data_dir().display()),
            Self::Rest(client) => format!("rest:{}", client.base_url()),
        }
    }

    /// Fetch current inventory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the records cannot be read or decoded.
    pub async fn fetch_inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
        match self {
            Self::Json(store) => store.load(CollectionKind::Inventory).await,
            Self::Rest(client) => client.fetch(CollectionKind::Inventory).await,
        }
    }

    /// Fetch all sales.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the records cannot be read or decoded.
    pub async fn fetch_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        match self {
            Self::Json(store) => store.load(CollectionKind::Sales).await,
            Self::Rest(client) => client.fetch(CollectionKind::Sales).await,
        }
    }

    /// Fetch the acquisition log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the records cannot be read or decoded.
    pub async fn fetch_acquisition_log(&self) -> Result<Vec<AcquisitionLogEntry>, StoreError> {
        match self {
            Self::Json(store) => store.load(CollectionKind::AcquisitionLog).await,
            Self::Rest(client) => client.fetch(CollectionKind::AcquisitionLog).await,
        }
    }

    /// The writable store behind this source.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadOnly` for the REST source.
    pub fn writable(&self) -> Result<&JsonStore, StoreError> {
        match self {
            Self::Json(store) => Ok(store),
            Self::Rest(_) => Err(StoreError::ReadOnly("REST source")),
        }
    }
}
