//! Photo upload and album creation.
//!
//! Drafts are validated before anything touches the store. Callers refresh
//! the gallery view after a successful create so the new record shows up.

use crate::error::{GalleryError, GalleryResult, ValidationError};
use crate::models::{Album, AlbumId, NewAlbum, NewPhoto, Photo};
use crate::store::{Collection, GalleryStore};
use url::Url;
use uuid::Uuid;

/// Where the image of a new photo comes from
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoSource {
    Url(String),
    File { file_name: String, bytes: Vec<u8> },
}

/// Album a new photo is filed under
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AlbumChoice {
    #[default]
    None,
    Existing(AlbumId),
    /// Create an album with this name first
    New(String),
}

impl AlbumChoice {
    /// Defaults the choice to the album the user is currently looking at
    pub fn from_filter(filter: Option<AlbumId>) -> Self {
        filter.map(AlbumChoice::Existing).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhotoDraft {
    pub title: String,
    pub description: String,
    pub source: Option<PhotoSource>,
    pub album: AlbumChoice,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlbumDraft {
    pub name: String,
    pub description: String,
}

/// Progress of a single form
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl FormStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, FormStatus::Submitting)
    }

    pub fn from_result<T>(result: &GalleryResult<T>, success: impl Into<String>) -> Self {
        match result {
            Ok(_) => FormStatus::Succeeded(success.into()),
            Err(GalleryError::Validation(e)) => FormStatus::Failed(e.to_string()),
            Err(e) => FormStatus::Failed(e.to_string()),
        }
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl PhotoDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        match &self.source {
            None => return Err(ValidationError::MissingSource),
            Some(PhotoSource::Url(url)) => validate_image_url(url)?,
            Some(PhotoSource::File { bytes, .. }) if bytes.is_empty() => {
                return Err(ValidationError::EmptyFile)
            }
            Some(PhotoSource::File { .. }) => {}
        }
        if let AlbumChoice::New(name) = &self.album {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyAlbumName);
            }
        }
        Ok(())
    }
}

impl AlbumDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyAlbumName);
        }
        Ok(())
    }
}

fn validate_image_url(raw: &str) -> Result<(), ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingSource);
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        Ok(url) => Err(ValidationError::InvalidUrl(format!(
            "unsupported scheme {}",
            url.scheme()
        ))),
        Err(e) => Err(ValidationError::InvalidUrl(e.to_string())),
    }
}

/// Unique object name for an uploaded file, keeping a sane extension
pub fn upload_path_for(file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "jpg".to_string());
    format!("{}.{}", Uuid::new_v4(), ext)
}

/// Creates an album record
pub async fn create_album<S: GalleryStore + ?Sized>(
    store: &S,
    draft: &AlbumDraft,
) -> GalleryResult<Album> {
    draft.validate()?;

    let record = serde_json::to_value(NewAlbum {
        name: draft.name.trim().to_string(),
        description: optional_text(&draft.description),
    })?;
    let created = store.insert(Collection::Albums, record).await?;
    let album = Album::try_from(created).map_err(GalleryError::Store)?;

    log::info!("Created album {} ({})", album.name, album.id);
    Ok(album)
}

/// Stores the image if needed and writes the photo record
///
/// An album requested with `AlbumChoice::New` is created first and the
/// draft is switched to `AlbumChoice::Existing` right away, so retrying a
/// draft whose photo insert failed files it under the same album.
pub async fn create_photo<S: GalleryStore + ?Sized>(
    store: &S,
    bucket: &str,
    draft: &mut PhotoDraft,
) -> GalleryResult<Photo> {
    draft.validate()?;

    let image_url = match &draft.source {
        Some(PhotoSource::Url(url)) => url.trim().to_string(),
        Some(PhotoSource::File { file_name, bytes }) => {
            let path = upload_path_for(file_name);
            let object = store.upload_binary(bucket, &path, bytes.clone()).await?;
            store.public_url(&object.bucket, &object.path)?
        }
        None => return Err(ValidationError::MissingSource.into()),
    };

    let album_id = match draft.album.clone() {
        AlbumChoice::None => None,
        AlbumChoice::Existing(id) => Some(id),
        AlbumChoice::New(name) => {
            let album = create_album(
                store,
                &AlbumDraft {
                    name,
                    description: String::new(),
                },
            )
            .await?;
            draft.album = AlbumChoice::Existing(album.id);
            Some(album.id)
        }
    };

    let record = serde_json::to_value(NewPhoto {
        title: draft.title.trim().to_string(),
        description: optional_text(&draft.description),
        image_url,
        album_id,
    })?;
    let created = store.insert(Collection::Photos, record).await?;
    let photo = Photo::try_from(created).map_err(GalleryError::Store)?;

    log::info!("Uploaded photo {} ({})", photo.title, photo.id);
    Ok(photo)
}
