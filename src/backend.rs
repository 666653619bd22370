//! Chooses and opens the store the app talks to.

use crate::error::AppError;
use photo_gallery::{
    GalleryConfig, GalleryStore, LocalStore, PhotoGalleryContext, SupabaseStore,
    SupabaseStoreConfig,
};
use std::sync::Arc;

/// Opens the hosted backend when credentials are configured, the local
/// SQLite store otherwise
pub fn open_store(config: &GalleryConfig) -> Result<Arc<dyn GalleryStore>, AppError> {
    match &config.supabase {
        Some(settings) => {
            log::info!("Using hosted backend at {}", settings.url);
            let store = SupabaseStore::new(SupabaseStoreConfig {
                url: settings.url.clone(),
                anon_key: settings.anon_key.clone(),
                request_timeout: config.request_timeout(),
            })?;
            Ok(Arc::new(store))
        }
        None => {
            let db_path = config.database_path();
            log::info!("Using local backend at {}", db_path.display());
            let store = LocalStore::open(&db_path, &config.storage_path)?;
            Ok(Arc::new(store))
        }
    }
}

/// Loads the configuration and opens the store
pub fn load_context() -> Result<PhotoGalleryContext, AppError> {
    let config = GalleryConfig::load(None)?;
    let store = open_store(&config)?;
    Ok(PhotoGalleryContext::new(store, config))
}
