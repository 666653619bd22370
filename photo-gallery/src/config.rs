use crate::error::{GalleryError, GalleryResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_ENV: &str = "FOLIO_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// Credentials of the hosted backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
}

/// Configuration for gallery initialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    pub site_title: String,
    /// Storage bucket uploaded files go to
    pub bucket: String,
    /// Base directory for the local backend's database and files
    pub storage_path: String,
    pub probe_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// When set, the hosted backend is used instead of the local one
    pub supabase: Option<SupabaseSettings>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            site_title: "Folio".to_string(),
            bucket: "photos".to_string(),
            storage_path: "./data".to_string(),
            probe_timeout_secs: 15,
            request_timeout_secs: 60,
            supabase: None,
        }
    }
}

impl GalleryConfig {
    pub fn from_toml_str(content: &str) -> GalleryResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config file (from `FOLIO_CONFIG`, `path`, or `folio.toml`
    /// if present) and applies environment overrides
    pub fn load(path: Option<&Path>) -> GalleryResult<Self> {
        let path = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| path.map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(&path).map_err(|e| {
                GalleryError::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            toml::from_str(&content)?
        } else {
            log::debug!("No configuration file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from environment-style variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("FOLIO_SUPABASE_URL");
        let anon_key = lookup("FOLIO_SUPABASE_ANON_KEY");
        if url.is_some() || anon_key.is_some() {
            let settings = self.supabase.get_or_insert_with(SupabaseSettings::default);
            if let Some(url) = url {
                settings.url = url;
            }
            if let Some(anon_key) = anon_key {
                settings.anon_key = anon_key;
            }
        }
        if let Some(bucket) = lookup("FOLIO_BUCKET") {
            self.bucket = bucket;
        }
        if let Some(storage_path) = lookup("FOLIO_STORAGE_PATH") {
            self.storage_path = storage_path;
        }
    }

    pub fn validate(&self) -> GalleryResult<()> {
        if self.bucket.trim().is_empty() {
            return Err(GalleryError::Config("bucket must not be empty".to_string()));
        }
        if self.probe_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(GalleryError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        if let Some(supabase) = &self.supabase {
            let url = url::Url::parse(&supabase.url).map_err(|e| {
                GalleryError::Config(format!("invalid supabase url {:?}: {}", supabase.url, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(GalleryError::Config(format!(
                    "supabase url must be http(s): {}",
                    supabase.url
                )));
            }
            if supabase.anon_key.trim().is_empty() {
                return Err(GalleryError::Config(
                    "supabase anon_key must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// SQLite database of the local backend
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_path).join("gallery.db")
    }
}
