use photo_gallery::GalleryError;
use thiserror::Error;

/// Central error type for the Folio app
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from the gallery library (validation, store, rendering, config)
    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Gallery(GalleryError::Validation(e)) => e.to_string(),
            AppError::Gallery(GalleryError::Store(msg)) => {
                format!("Could not reach the photo library: {}", msg)
            }
            AppError::Gallery(GalleryError::Render(_)) => "Error loading image.".to_string(),
            AppError::Gallery(GalleryError::Config(msg)) => {
                format!("The gallery is misconfigured: {}", msg)
            }
        }
    }
}
