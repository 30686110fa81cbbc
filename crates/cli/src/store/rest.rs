//! Read-only client for the hosted backend's REST (`PostgREST`) API.
//!
//! Each collection is one table; rows are scoped to the configured user with a
//! `user_id=eq.<uuid>` filter and returned in id order.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use solemate_core::{CollectionKind, UserId};

use super::StoreError;
use crate::config::RestConfig;

/// REST API path prefix under the project URL.
const REST_PREFIX: &str = "rest/v1/";

/// Request timeout in seconds.
const TIMEOUT_SECS: u64 = 30;

/// Read-only REST API client.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
    access_token: Option<SecretString>,
    user_id: UserId,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("user_id", &self.inner.user_id)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client for the configured project.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Http` if the HTTP client cannot be created.
    pub fn new(config: &RestConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            inner: Arc::new(RestClientInner {
                client,
                base_url: config.base_url.clone(),
                anon_key: config.anon_key.clone(),
                access_token: config.access_token.clone(),
                user_id: config.user_id,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// URL listing the user's rows of one collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Url` if the base URL cannot be joined.
    pub fn table_url(&self, collection: CollectionKind) -> Result<Url, StoreError> {
        let mut url = self
            .inner
            .base_url
            .join(REST_PREFIX)?
            .join(collection.table())?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{}", self.inner.user_id))
            .append_pair("order", "id.asc");
        Ok(url)
    }

    /// Fetch every row of one collection for the configured user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Http` on network or decode failures, and
    /// `StoreError::Status` when the API answers with a non-success status.
    #[instrument(skip(self))]
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        collection: CollectionKind,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(collection)?;
        let bearer = self
            .inner
            .access_token
            .as_ref()
            .unwrap_or(&self.inner.anon_key)
            .expose_secret();

        let response = self
            .inner
            .client
            .get(url)
            .header("apikey", self.inner.anon_key.expose_secret())
            .header("Authorization", format!("Bearer {bearer}"))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                collection,
                status: status.as_u16(),
                body,
            });
        }

        let records: Vec<T> = response.json().await?;
        debug!(count = records.len(), "Fetched records");
        Ok(records)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const USER: &str = "6f1c1d9e-6a4b-4f0e-9a53-0c8f2f3d7a11";

    fn client(base: &str) -> RestClient {
        RestClient::new(&RestConfig {
            base_url: Url::parse(base).unwrap(),
            anon_key: SecretString::from("anon-key-for-tests".to_string()),
            access_token: None,
            user_id: USER.parse().unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_table_url_scopes_to_user() {
        let url = client("https://abc.supabase.co/")
            .table_url(CollectionKind::AcquisitionLog)
            .unwrap();
        assert_eq!(
            url.as_str(),
            format!(
                "https://abc.supabase.co/rest/v1/shoe_log?select=*&user_id=eq.{USER}&order=id.asc"
            )
        );
    }

    #[test]
    fn test_table_url_keeps_base_path() {
        let url = client("https://example.test/project/")
            .table_url(CollectionKind::Sales)
            .unwrap();
        assert!(url.as_str().starts_with("https://example.test/project/rest/v1/sales?"));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug_output = format!("{:?}", client("https://abc.supabase.co/"));
        assert!(debug_output.contains("abc.supabase.co"));
        assert!(!debug_output.contains("anon-key-for-tests"));
    }
}
