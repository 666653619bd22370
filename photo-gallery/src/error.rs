use thiserror::Error;

/// A required field was missing or malformed. Raised before any store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a title")]
    EmptyTitle,
    #[error("Please choose a file or enter an image URL")]
    MissingSource,
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),
    #[error("The selected file is empty")]
    EmptyFile,
    #[error("Please enter an album name")]
    EmptyAlbumName,
}

/// Error type for photo gallery operations
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Empty or malformed user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// A collection read/write or binary upload failed
    #[error("Store error: {0}")]
    Store(String),
    /// An image source could not be loaded or measured
    #[error("Render error: {0}")]
    Render(String),
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type GalleryResult<T> = Result<T, GalleryError>;

impl GalleryError {
    pub fn is_validation(&self) -> bool {
        matches!(self, GalleryError::Validation(_))
    }
}

impl From<rusqlite::Error> for GalleryError {
    fn from(err: rusqlite::Error) -> Self {
        GalleryError::Store(format!("Database error: {}", err))
    }
}

impl From<std::io::Error> for GalleryError {
    fn from(err: std::io::Error) -> Self {
        GalleryError::Store(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(err: serde_json::Error) -> Self {
        GalleryError::Store(format!("Malformed record: {}", err))
    }
}

impl From<toml::de::Error> for GalleryError {
    fn from(err: toml::de::Error) -> Self {
        GalleryError::Config(err.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for GalleryError {
    fn from(err: reqwest::Error) -> Self {
        GalleryError::Store(format!("Request failed: {}", err))
    }
}
