//! Abstraction over the backend that persists photos, albums and image files.

use crate::error::GalleryResult;
use async_trait::async_trait;
use serde_json::Value;

/// A raw record as stored by the backend
pub type Record = Value;

/// Record collections known to the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Photos,
    Albums,
}

impl Collection {
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Photos => "photos",
            Collection::Albums => "albums",
        }
    }

    /// Columns that may be used for filtering and ordering
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Collection::Photos => &[
                "id",
                "title",
                "description",
                "image_url",
                "album_id",
                "created_at",
            ],
            Collection::Albums => &["id", "name", "description", "created_at"],
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub equals: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// Optional equality filter and ordering for `select`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,
    pub order: Option<Order>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    /// Newest records first
    pub fn newest_first() -> Self {
        Self::default().order_by("created_at", true)
    }

    pub fn filter_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter {
            column: column.to_string(),
            equals: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: &str, descending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending,
        });
        self
    }
}

/// Location of an uploaded binary object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
}

/// Structured-record and binary-object storage. Every operation is fallible.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    async fn select(&self, collection: Collection, query: &Query) -> GalleryResult<Vec<Record>>;

    /// Returns the created record including its assigned id and timestamp
    async fn insert(&self, collection: Collection, record: Record) -> GalleryResult<Record>;

    async fn upload_binary(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> GalleryResult<StoredObject>;

    /// Stable URL for a stored object
    fn public_url(&self, bucket: &str, path: &str) -> GalleryResult<String>;
}

/// Guesses a content type from a file name's extension
pub fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let q = Query::newest_first().filter_eq("album_id", 42);
        assert_eq!(q.order.as_ref().unwrap().column, "created_at");
        assert!(q.order.unwrap().descending);
        assert_eq!(q.filter.unwrap().equals, Value::from(42));
    }

    #[test]
    fn test_columns() {
        assert!(Collection::Photos.has_column("album_id"));
        assert!(!Collection::Albums.has_column("album_id"));
        assert!(!Collection::Photos.has_column("1; DROP TABLE photos"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("a/b/photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("x.webp"), "image/webp");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
