//! Hosted backend speaking the Supabase REST and storage APIs.
//!
//! Records live behind PostgREST at `/rest/v1/{table}`, binary objects
//! behind `/storage/v1/object/{bucket}/{path}`.

use crate::error::{GalleryError, GalleryResult};
use crate::store::{content_type_for, Collection, GalleryStore, Query, Record, StoredObject};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Connection settings for the hosted backend
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseStoreConfig {
    pub url: String,
    pub anon_key: String,
    pub request_timeout: Duration,
}

pub struct SupabaseStore {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

/// Error body returned by PostgREST and the storage API
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SupabaseStore {
    pub fn new(config: SupabaseStoreConfig) -> GalleryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("Folio/0.1.0")
            .build()
            .map_err(|e| GalleryError::Store(format!("Client build failed: {}", e)))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            client,
        })
    }

    fn rest_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table_name())
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket,
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Turns a non-success response into a `Store` error carrying the
    /// server's message
    async fn check(response: reqwest::Response) -> GalleryResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&body)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or(body);
        Err(GalleryError::Store(format!(
            "Server returned {}: {}",
            status, message
        )))
    }
}

/// PostgREST query parameters for a `Query`
fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    if let Some(filter) = &query.filter {
        let condition = match &filter.equals {
            Value::Null => "is.null".to_string(),
            Value::String(s) => format!("eq.{}", s),
            other => format!("eq.{}", other),
        };
        params.push((filter.column.clone(), condition));
    }
    if let Some(order) = &query.order {
        let dir = if order.descending { "desc" } else { "asc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, dir)));
    }
    params
}

#[async_trait]
impl GalleryStore for SupabaseStore {
    async fn select(&self, collection: Collection, query: &Query) -> GalleryResult<Vec<Record>> {
        let url = self.rest_url(collection);
        log::debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(&url))
            .query(&query_params(query))
            .header("Accept", "application/json")
            .send()
            .await?;

        Ok(Self::check(response).await?.json::<Vec<Record>>().await?)
    }

    async fn insert(&self, collection: Collection, record: Record) -> GalleryResult<Record> {
        let url = self.rest_url(collection);
        log::debug!("POST {}", url);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;

        let mut rows = Self::check(response).await?.json::<Vec<Record>>().await?;
        if rows.is_empty() {
            return Err(GalleryError::Store(format!(
                "Insert into {} returned no row",
                collection.table_name()
            )));
        }
        log::info!("Inserted {} record", collection.table_name());
        Ok(rows.swap_remove(0))
    }

    async fn upload_binary(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> GalleryResult<StoredObject> {
        let url = self.object_url(bucket, path);
        log::debug!("Uploading {} bytes to {}", bytes.len(), url);

        let response = self
            .authorized(self.client.post(&url))
            .header("Content-Type", content_type_for(path))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await?;

        log::info!("Uploaded object {}/{}", bucket, path);
        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.to_string(),
        })
    }

    fn public_url(&self, bucket: &str, path: &str) -> GalleryResult<String> {
        if bucket.is_empty() || path.is_empty() {
            return Err(GalleryError::Store(
                "Public URL needs a bucket and a path".to_string(),
            ));
        }
        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket,
            path.trim_start_matches('/')
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SupabaseStore {
        SupabaseStore::new(SupabaseStoreConfig {
            url: "https://project.supabase.co/".to_string(),
            anon_key: "anon".to_string(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            store().public_url("photos", "/abc.jpg").unwrap(),
            "https://project.supabase.co/storage/v1/object/public/photos/abc.jpg"
        );
        assert!(store().public_url("photos", "").is_err());
    }

    #[test]
    fn test_query_params() {
        let params = query_params(&Query::newest_first().filter_eq("album_id", 42));
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("album_id".to_string(), "eq.42".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );

        let params = query_params(&Query::all().filter_eq("album_id", Value::Null));
        assert_eq!(params[1].1, "is.null");
    }

    #[test]
    fn test_rest_url() {
        assert_eq!(
            store().rest_url(Collection::Albums),
            "https://project.supabase.co/rest/v1/albums"
        );
    }
}
