//! A client for a hosted real-time database reached over its REST interface.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::{
    Error,
    stores::{PushIdGenerator, StoreError, StoreRef, TransactionStore},
    transaction::TransactionRecord,
};

/// Writes transactions to a remote real-time database.
///
/// Keys are generated locally, so a reference can be handed out before the
/// database has been contacted. A write is a `PUT` of the JSON record to
/// `{base_url}/{collection}/{key}.json`.
#[derive(Debug, Clone)]
pub struct RealtimeDatabase {
    http: Client,
    base_url: Url,
    secret: Option<String>,
    push_ids: Arc<PushIdGenerator>,
}

impl RealtimeDatabase {
    /// Create a client for the database at `base_url`, e.g.
    /// "https://my-app-default-rtdb.firebaseio.com".
    ///
    /// `secret` is sent as the `auth` query parameter of every request when
    /// given.
    ///
    /// # Errors
    /// Returns an [Error::InvalidDatabaseUrl] if `base_url` is not an absolute
    /// HTTP(S) URL, or an [Error::HttpClientError] if the HTTP client could
    /// not be built.
    pub fn new(base_url: &str, secret: Option<String>) -> Result<Self, Error> {
        // A trailing slash makes `Url::join` append to the path instead of
        // replacing the last segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));

        let base_url = Url::parse(&normalized)
            .map_err(|error| Error::InvalidDatabaseUrl(format!("{base_url}: {error}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidDatabaseUrl(format!(
                "{base_url}: the scheme must be http or https"
            )));
        }

        let http = Client::builder()
            .build()
            .map_err(|error| Error::HttpClientError(error.to_string()))?;

        Ok(Self {
            http,
            base_url,
            secret,
            push_ids: Arc::new(PushIdGenerator::new()),
        })
    }

    /// The REST URL for the location `reference`.
    pub fn reference_url(&self, reference: &StoreRef) -> Result<Url, Error> {
        let mut url = self
            .base_url
            .join(&format!("{}.json", reference.path()))
            .map_err(|error| Error::InvalidDatabaseUrl(error.to_string()))?;

        if let Some(secret) = &self.secret {
            url.query_pairs_mut().append_pair("auth", secret);
        }

        Ok(url)
    }
}

#[async_trait]
impl TransactionStore for RealtimeDatabase {
    fn create_ref(&self, collection: &str) -> StoreRef {
        StoreRef::new(collection, &self.push_ids.generate())
    }

    async fn write(
        &self,
        reference: &StoreRef,
        value: &TransactionRecord,
    ) -> Result<(), StoreError> {
        let url = self
            .reference_url(reference)
            .map_err(|error| StoreError::InvalidUrl(error.to_string()))?;

        let response = self.http.put(url).json(value).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
