use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type PhotoId = i64;
pub type AlbumId = i64;

const UNTITLED_PHOTO: &str = "Untitled";
const UNTITLED_ALBUM: &str = "Untitled album";

/// Represents a photo as shown in the gallery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    /// `None` means the photo is unsorted
    pub album_id: Option<AlbumId>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Represents an album photos can be filed under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw photo row as returned by the store. Every field is optional because
/// the store hands back untyped JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoRecord {
    pub id: Option<PhotoId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub album_id: Option<AlbumId>,
    pub created_at: Option<String>,
}

/// Raw album row as returned by the store
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumRecord {
    pub id: Option<AlbumId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
}

/// Insert payload for the `photos` collection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPhoto {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub album_id: Option<AlbumId>,
}

/// Insert payload for the `albums` collection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewAlbum {
    pub name: String,
    pub description: Option<String>,
}

/// Which top-level listing the gallery shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    AllPhotos,
    Albums,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    let raw = value?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            log::debug!("Ignoring unparseable timestamp {:?}: {}", raw, e);
            None
        }
    }
}

impl PhotoRecord {
    /// Applies defaults and drops rows that cannot be displayed
    pub fn into_photo(self) -> Option<Photo> {
        let id = self.id?;
        let image_url = non_blank(self.image_url)?;
        Some(Photo {
            id,
            title: non_blank(self.title).unwrap_or_else(|| UNTITLED_PHOTO.to_string()),
            description: non_blank(self.description),
            image_url,
            album_id: self.album_id,
            created_at: parse_timestamp(self.created_at),
        })
    }
}

impl AlbumRecord {
    pub fn into_album(self) -> Option<Album> {
        let id = self.id?;
        Some(Album {
            id,
            name: non_blank(self.name).unwrap_or_else(|| UNTITLED_ALBUM.to_string()),
            description: non_blank(self.description),
            created_at: parse_timestamp(self.created_at),
        })
    }
}

impl TryFrom<Value> for Photo {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let record: PhotoRecord =
            serde_json::from_value(value).map_err(|e| format!("bad photo record: {}", e))?;
        record
            .into_photo()
            .ok_or_else(|| "photo record without id or image_url".to_string())
    }
}

impl TryFrom<Value> for Album {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let record: AlbumRecord =
            serde_json::from_value(value).map_err(|e| format!("bad album record: {}", e))?;
        record
            .into_album()
            .ok_or_else(|| "album record without id".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_photo_defaults_applied_at_boundary() {
        let photo = Photo::try_from(json!({
            "id": 7,
            "title": "  ",
            "description": "",
            "image_url": "https://cdn.example.com/a.jpg",
            "created_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(photo.title, "Untitled");
        assert_eq!(photo.description, None);
        assert_eq!(photo.album_id, None);
        assert!(photo.created_at.is_some());
    }

    #[test]
    fn test_photo_without_url_is_rejected() {
        assert!(Photo::try_from(json!({ "id": 1, "title": "x" })).is_err());
        assert!(Photo::try_from(json!({ "title": "x", "image_url": "a.jpg" })).is_err());
    }

    #[test]
    fn test_album_null_fields() {
        let album = Album::try_from(json!({
            "id": 3,
            "name": null,
            "description": "Summer",
            "created_at": "not a date"
        }))
        .unwrap();

        assert_eq!(album.name, "Untitled album");
        assert_eq!(album.description.as_deref(), Some("Summer"));
        assert_eq!(album.created_at, None);
    }
}
