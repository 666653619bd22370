//! # Photo Gallery
//!
//! Photo and album management on top of a hosted backend-as-a-service.
//!
//! This crate provides:
//! - A store abstraction with a hosted (Supabase) backend and a local
//!   SQLite backend
//! - Boundary DTOs that normalize raw records once at fetch time
//! - Contain-fit calculation and the state machine of a fitted image
//! - The gallery view state (view mode, album filter, lightbox selection)
//! - Photo upload and album creation forms
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_gallery::{GalleryViewState, LocalStore};
//!
//! let store = LocalStore::open("./data/gallery.db", "./data")?;
//! let mut view = GalleryViewState::new();
//! view.refresh(&store).await;
//!
//! view.open_album(42);
//! for photo in view.visible_photos() {
//!     println!("{}", photo.title);
//! }
//! ```

pub mod config;
pub mod error;
pub mod fit;
pub mod fitted;
pub mod forms;
pub mod local;
pub mod models;
pub mod probe;
pub mod schema;
pub mod store;
pub mod view_state;

#[cfg(feature = "remote")]
pub mod supabase;

#[cfg(feature = "components")]
pub mod components;

pub use config::{GalleryConfig, SupabaseSettings};
pub use error::{GalleryError, GalleryResult, ValidationError};
pub use fit::{fit_image, ContainerSize, FitDimensions, ImageDimensions};
pub use fitted::{FitPhase, FittedImageState, ProbeRequest};
pub use forms::{
    create_album, create_photo, AlbumChoice, AlbumDraft, FormStatus, PhotoDraft, PhotoSource,
};
pub use local::LocalStore;
pub use models::{Album, AlbumId, NewAlbum, NewPhoto, Photo, PhotoId, ViewMode};
pub use probe::probe_dimensions;
pub use schema::init_gallery_schema;
pub use store::{Collection, GalleryStore, Query, Record, StoredObject};
pub use view_state::{GallerySnapshot, GalleryViewState};

#[cfg(feature = "remote")]
pub use supabase::{SupabaseStore, SupabaseStoreConfig};

#[cfg(feature = "components")]
pub use components::{FittedImage, PhotoGalleryContext};
