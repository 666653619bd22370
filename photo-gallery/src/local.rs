//! Self-hosted store backed by SQLite and a storage directory.
//!
//! Used when no hosted backend is configured, and by the test suites.

use crate::error::{GalleryError, GalleryResult};
use crate::schema::init_gallery_schema;
use crate::store::{Collection, GalleryStore, Query, Record, StoredObject};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, Row};
use serde_json::{Map, Number, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub struct LocalStore {
    conn: Mutex<Connection>,
    storage_path: PathBuf,
}

impl LocalStore {
    /// Opens (and if necessary creates) the database at `db_path`
    pub fn open(db_path: impl AsRef<Path>, storage_path: impl Into<PathBuf>) -> GalleryResult<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn, storage_path.into())
    }

    pub fn open_in_memory(storage_path: impl Into<PathBuf>) -> GalleryResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, storage_path.into())
    }

    fn with_connection(conn: Connection, storage_path: PathBuf) -> GalleryResult<Self> {
        init_gallery_schema(&conn)?;
        log::debug!("Local gallery store ready at {}", storage_path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            storage_path,
        })
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    fn lock(&self) -> GalleryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GalleryError::Store("Database lock poisoned".to_string()))
    }

    fn object_path(&self, bucket: &str, path: &str) -> GalleryResult<PathBuf> {
        check_relative(bucket)?;
        check_relative(path)?;
        Ok(self.storage_path.join(bucket).join(path))
    }
}

/// Rejects absolute paths and parent-directory components
fn check_relative(segment: &str) -> GalleryResult<()> {
    let path = Path::new(segment);
    let valid = !segment.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if valid {
        Ok(())
    } else {
        Err(GalleryError::Store(format!("Invalid object path: {}", segment)))
    }
}

fn json_to_sql(value: &Value) -> GalleryResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(SqlValue::Integer(i)),
            (None, Some(f)) => Ok(SqlValue::Real(f)),
            _ => Err(GalleryError::Store(format!("Unsupported number: {}", n))),
        },
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        other => Err(GalleryError::Store(format!(
            "Unsupported field value: {}",
            other
        ))),
    }
}

fn row_to_record(row: &Row, columns: &[String]) -> rusqlite::Result<Record> {
    let mut map = Map::new();
    for (idx, name) in columns.iter().enumerate() {
        let value = match row.get_ref(idx)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => Value::Null,
        };
        map.insert(name.clone(), value);
    }
    Ok(Value::Object(map))
}

fn query_records(
    conn: &Connection,
    sql: &str,
    params: Vec<SqlValue>,
) -> GalleryResult<Vec<Record>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let records = stmt
        .query_map(params_from_iter(params), |row| row_to_record(row, &columns))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

#[async_trait]
impl GalleryStore for LocalStore {
    async fn select(&self, collection: Collection, query: &Query) -> GalleryResult<Vec<Record>> {
        let table = collection.table_name();
        let mut sql = format!("SELECT {} FROM {}", collection.columns().join(", "), table);
        let mut params = Vec::new();

        if let Some(filter) = &query.filter {
            if !collection.has_column(&filter.column) {
                return Err(GalleryError::Store(format!(
                    "Unknown column {} in {}",
                    filter.column, table
                )));
            }
            match json_to_sql(&filter.equals)? {
                SqlValue::Null => sql.push_str(&format!(" WHERE {} IS NULL", filter.column)),
                value => {
                    sql.push_str(&format!(" WHERE {} = ?1", filter.column));
                    params.push(value);
                }
            }
        }

        if let Some(order) = &query.order {
            if !collection.has_column(&order.column) {
                return Err(GalleryError::Store(format!(
                    "Unknown column {} in {}",
                    order.column, table
                )));
            }
            let dir = if order.descending { "DESC" } else { "ASC" };
            // id breaks ties between rows created within the same instant
            sql.push_str(&format!(" ORDER BY {} {}, id {}", order.column, dir, dir));
        }

        let conn = self.lock()?;
        query_records(&conn, &sql, params)
    }

    async fn insert(&self, collection: Collection, record: Record) -> GalleryResult<Record> {
        let table = collection.table_name();
        let fields = match record {
            Value::Object(map) => map,
            other => {
                return Err(GalleryError::Store(format!(
                    "Expected an object for {}, got {}",
                    table, other
                )))
            }
        };

        let mut columns = Vec::new();
        let mut params = Vec::new();
        for (key, value) in &fields {
            if key == "id" || key == "created_at" {
                continue;
            }
            if !collection.has_column(key) {
                return Err(GalleryError::Store(format!(
                    "Unknown column {} in {}",
                    key, table
                )));
            }
            columns.push(key.as_str());
            params.push(json_to_sql(value)?);
        }
        columns.push("created_at");
        params.push(SqlValue::Text(
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        ));

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );

        let conn = self.lock()?;
        conn.execute(&sql, params_from_iter(params))?;
        let id = conn.last_insert_rowid();

        let select = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            collection.columns().join(", "),
            table
        );
        let created = query_records(&conn, &select, vec![SqlValue::Integer(id)])?
            .into_iter()
            .next()
            .ok_or_else(|| GalleryError::Store(format!("Inserted row {} vanished", id)))?;

        log::info!("Inserted {} record {}", table, id);
        Ok(created)
    }

    async fn upload_binary(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> GalleryResult<StoredObject> {
        let target = self.object_path(bucket, path)?;
        if target.exists() {
            return Err(GalleryError::Store(format!(
                "Object {}/{} already exists",
                bucket, path
            )));
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, bytes)?;

        log::info!("Stored object {}", target.display());
        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.to_string(),
        })
    }

    fn public_url(&self, bucket: &str, path: &str) -> GalleryResult<String> {
        Ok(self.object_path(bucket, path)?.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup_store() -> (LocalStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open_in_memory(dir.path()).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let (store, _dir) = setup_store();
        let created = store
            .insert(Collection::Albums, json!({ "name": "Weddings" }))
            .await
            .unwrap();

        assert!(created["id"].as_i64().unwrap() > 0);
        assert_eq!(created["name"], "Weddings");
        assert!(created["created_at"].is_string());
        assert!(created["description"].is_null());
    }

    #[tokio::test]
    async fn test_select_newest_first_with_filter() {
        let (store, _dir) = setup_store();
        let album = store
            .insert(Collection::Albums, json!({ "name": "Portraits" }))
            .await
            .unwrap();
        let album_id = album["id"].as_i64().unwrap();

        for (title, album) in [("a", Some(album_id)), ("b", None), ("c", Some(album_id))] {
            store
                .insert(
                    Collection::Photos,
                    json!({ "title": title, "image_url": "x.jpg", "album_id": album }),
                )
                .await
                .unwrap();
        }

        let all = store
            .select(Collection::Photos, &Query::newest_first())
            .await
            .unwrap();
        let titles: Vec<&str> = all.iter().map(|r| r["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);

        let filtered = store
            .select(
                Collection::Photos,
                &Query::newest_first().filter_eq("album_id", album_id),
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);

        let unsorted = store
            .select(Collection::Photos, &Query::all().filter_eq("album_id", Value::Null))
            .await
            .unwrap();
        assert_eq!(unsorted.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_column_rejected() {
        let (store, _dir) = setup_store();
        let result = store
            .insert(Collection::Albums, json!({ "name": "x", "owner": "me" }))
            .await;
        assert!(matches!(result, Err(GalleryError::Store(_))));

        let result = store
            .select(Collection::Albums, &Query::all().order_by("name; --", false))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_upload_and_public_url() {
        let (store, dir) = setup_store();
        let object = store
            .upload_binary("photos", "abc.jpg", vec![1, 2, 3])
            .await
            .unwrap();
        let url = store.public_url(&object.bucket, &object.path).unwrap();

        assert_eq!(std::fs::read(&url).unwrap(), vec![1, 2, 3]);
        assert!(url.starts_with(&*dir.path().to_string_lossy()));

        // Same name twice is refused
        assert!(store.upload_binary("photos", "abc.jpg", vec![4]).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_rejects_traversal() {
        let (store, _dir) = setup_store();
        assert!(store.upload_binary("photos", "../escape.jpg", vec![1]).await.is_err());
        assert!(store.upload_binary("photos", "/etc/passwd", vec![1]).await.is_err());
        assert!(store.public_url("..", "a.jpg").is_err());
    }
}
