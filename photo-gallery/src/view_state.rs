//! Navigation and selection state of the gallery UI.
//!
//! Holds the fetched photo and album collections plus the user's current
//! view, album filter and lightbox selection. One instance per session; the
//! UI passes it explicitly to whatever renders it.

use crate::error::{GalleryError, GalleryResult};
use crate::models::{Album, AlbumId, Photo, PhotoId, ViewMode};
use crate::store::{Collection, GalleryStore, Query, Record};
use std::collections::HashSet;

/// Both collections as fetched in one refresh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GallerySnapshot {
    pub photos: Vec<Photo>,
    pub albums: Vec<Album>,
}

impl GallerySnapshot {
    /// Fetches both collections, newest first. Fails as a whole if either
    /// read fails.
    pub async fn fetch<S: GalleryStore + ?Sized>(store: &S) -> GalleryResult<Self> {
        let query = Query::newest_first();
        let album_rows = store.select(Collection::Albums, &query).await?;
        let photo_rows = store.select(Collection::Photos, &query).await?;
        Ok(Self::from_records(photo_rows, album_rows))
    }

    /// Converts raw rows, dropping unusable ones and clearing album
    /// references that point nowhere
    pub fn from_records(photo_rows: Vec<Record>, album_rows: Vec<Record>) -> Self {
        let albums: Vec<Album> = album_rows
            .into_iter()
            .filter_map(|row| match Album::try_from(row) {
                Ok(album) => Some(album),
                Err(e) => {
                    log::warn!("Skipping album: {}", e);
                    None
                }
            })
            .collect();

        let known: HashSet<AlbumId> = albums.iter().map(|a| a.id).collect();
        let photos = photo_rows
            .into_iter()
            .filter_map(|row| match Photo::try_from(row) {
                Ok(photo) => Some(photo),
                Err(e) => {
                    log::warn!("Skipping photo: {}", e);
                    None
                }
            })
            .map(|mut photo| {
                if photo.album_id.is_some_and(|id| !known.contains(&id)) {
                    log::debug!("Photo {} references a missing album", photo.id);
                    photo.album_id = None;
                }
                photo
            })
            .collect();

        Self { photos, albums }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GalleryViewState {
    photos: Vec<Photo>,
    albums: Vec<Album>,
    mode: ViewMode,
    album_filter: Option<AlbumId>,
    selected_photo: Option<Photo>,
    loading: bool,
    error: Option<String>,
    /// Newest refresh started
    refresh_issued: u64,
    /// Newest refresh whose result was applied
    refresh_applied: u64,
}

impl GalleryViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn album_filter(&self) -> Option<AlbumId> {
        self.album_filter
    }

    pub fn selected_photo(&self) -> Option<&Photo> {
        self.selected_photo.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Recoverable error from the last failed refresh
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn select_all_photos(&mut self) {
        self.mode = ViewMode::AllPhotos;
        self.album_filter = None;
    }

    pub fn select_albums_view(&mut self) {
        self.mode = ViewMode::Albums;
    }

    /// Shows the photo grid filtered to one album
    pub fn open_album(&mut self, album_id: AlbumId) {
        self.mode = ViewMode::AllPhotos;
        self.album_filter = Some(album_id);
    }

    pub fn clear_album_filter(&mut self) {
        self.album_filter = None;
    }

    /// The album named by the current filter, if it exists
    pub fn active_album(&self) -> Option<&Album> {
        let id = self.album_filter?;
        self.albums.iter().find(|a| a.id == id)
    }

    /// Photos to show in the grid, in store order
    pub fn visible_photos(&self) -> Vec<&Photo> {
        match self.album_filter {
            Some(id) => self.photos_in_album(id).collect(),
            None => self.photos.iter().collect(),
        }
    }

    fn photos_in_album(&self, album_id: AlbumId) -> impl Iterator<Item = &Photo> {
        self.photos
            .iter()
            .filter(move |p| p.album_id == Some(album_id))
    }

    pub fn unsorted_photos(&self) -> Vec<&Photo> {
        self.photos.iter().filter(|p| p.album_id.is_none()).collect()
    }

    /// Every album with its photos, followed by the unsorted photos
    pub fn photos_by_album(&self) -> (Vec<(&Album, Vec<&Photo>)>, Vec<&Photo>) {
        let grouped = self
            .albums
            .iter()
            .map(|album| (album, self.photos_in_album(album.id).collect()))
            .collect();
        (grouped, self.unsorted_photos())
    }

    pub fn album_photo_count(&self, album_id: AlbumId) -> usize {
        self.photos_in_album(album_id).count()
    }

    /// First photo of the album in display order
    pub fn album_cover(&self, album_id: AlbumId) -> Option<&Photo> {
        self.photos_in_album(album_id).next()
    }

    /// Selects a photo for the lightbox. Photos not in the collection are
    /// ignored.
    pub fn open_photo(&mut self, photo_id: PhotoId) {
        if let Some(photo) = self.photos.iter().find(|p| p.id == photo_id) {
            self.selected_photo = Some(photo.clone());
        }
    }

    pub fn close_photo(&mut self) {
        self.selected_photo = None;
    }

    /// Marks a refresh as in flight and returns its token. Tokens grow
    /// monotonically; pass the token back to `apply_refresh`.
    pub fn begin_refresh(&mut self) -> u64 {
        self.refresh_issued += 1;
        self.loading = true;
        self.refresh_issued
    }

    /// Applies the outcome of the fetch started as `token`. Results older
    /// than one already applied are dropped and `false` is returned. On
    /// failure the previous collections are kept and an error marker is set.
    /// Loading stays on until the newest refresh has landed.
    pub fn apply_refresh(&mut self, token: u64, result: GalleryResult<GallerySnapshot>) -> bool {
        if token <= self.refresh_applied {
            log::debug!(
                "Dropping stale refresh {} (already applied {})",
                token,
                self.refresh_applied
            );
            return false;
        }
        self.refresh_applied = token;
        self.loading = token < self.refresh_issued;

        match result {
            Ok(snapshot) => {
                log::debug!(
                    "Refreshed gallery: {} photos, {} albums",
                    snapshot.photos.len(),
                    snapshot.albums.len()
                );
                self.photos = snapshot.photos;
                self.albums = snapshot.albums;
                self.error = None;

                if let Some(selected_id) = self.selected_photo.as_ref().map(|p| p.id) {
                    self.selected_photo = self.photos.iter().find(|p| p.id == selected_id).cloned();
                }
                if self.album_filter.is_some() && self.active_album().is_none() {
                    self.album_filter = None;
                }
            }
            Err(e) => {
                log::warn!("Failed to refresh gallery: {}", e);
                self.error = Some(match e {
                    GalleryError::Store(msg) => msg,
                    other => other.to_string(),
                });
            }
        }
        true
    }

    /// Re-fetches both collections and replaces the local copies together
    pub async fn refresh<S: GalleryStore + ?Sized>(&mut self, store: &S) {
        let token = self.begin_refresh();
        let result = GallerySnapshot::fetch(store).await;
        self.apply_refresh(token, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalStore;
    use crate::store::StoredObject;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn photo(id: PhotoId, album_id: Option<AlbumId>) -> Photo {
        Photo {
            id,
            title: format!("Photo {}", id),
            description: None,
            image_url: format!("https://cdn.example.com/{}.jpg", id),
            album_id,
            created_at: None,
        }
    }

    fn album(id: AlbumId) -> Album {
        Album {
            id,
            name: format!("Album {}", id),
            description: None,
            created_at: None,
        }
    }

    fn loaded_state() -> GalleryViewState {
        let mut state = GalleryViewState::new();
        let token = state.begin_refresh();
        state.apply_refresh(token, Ok(GallerySnapshot {
            photos: vec![
                photo(6, Some(42)),
                photo(5, None),
                photo(4, Some(7)),
                photo(3, Some(42)),
                photo(2, None),
                photo(1, Some(42)),
            ],
            albums: vec![album(42), album(7)],
        }));
        state
    }

    fn ids(photos: &[&Photo]) -> Vec<PhotoId> {
        photos.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_initial_state() {
        let state = GalleryViewState::new();
        assert_eq!(state.mode(), ViewMode::AllPhotos);
        assert_eq!(state.album_filter(), None);
        assert!(state.selected_photo().is_none());
    }

    #[test]
    fn test_open_album_filters_in_order() {
        let mut state = loaded_state();
        state.select_albums_view();
        state.open_album(42);

        assert_eq!(state.mode(), ViewMode::AllPhotos);
        assert_eq!(ids(&state.visible_photos()), vec![6, 3, 1]);
        assert_eq!(state.active_album().map(|a| a.id), Some(42));
    }

    #[test]
    fn test_select_all_photos_clears_filter() {
        let mut state = loaded_state();
        state.open_album(7);
        state.select_all_photos();

        assert_eq!(state.album_filter(), None);
        assert_eq!(ids(&state.visible_photos()), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_clear_filter_keeps_mode() {
        let mut state = loaded_state();
        state.open_album(7);
        state.select_albums_view();
        state.clear_album_filter();

        assert_eq!(state.mode(), ViewMode::Albums);
        assert_eq!(state.album_filter(), None);
    }

    #[test]
    fn test_grouping_and_counts() {
        let state = loaded_state();
        let (grouped, unsorted) = state.photos_by_album();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0.id, 42);
        assert_eq!(ids(&grouped[0].1), vec![6, 3, 1]);
        assert_eq!(ids(&unsorted), vec![5, 2]);
        assert_eq!(state.album_photo_count(7), 1);
        assert_eq!(state.album_cover(42).map(|p| p.id), Some(6));
        assert_eq!(state.album_cover(99), None);
    }

    #[test]
    fn test_open_and_close_photo() {
        let mut state = loaded_state();
        state.open_photo(3);
        assert_eq!(state.selected_photo().map(|p| p.id), Some(3));

        state.open_photo(999);
        assert_eq!(state.selected_photo().map(|p| p.id), Some(3));

        state.close_photo();
        assert!(state.selected_photo().is_none());
    }

    #[test]
    fn test_failed_refresh_keeps_previous_state() {
        let mut state = loaded_state();
        let before = state.photos().to_vec();

        let token = state.begin_refresh();
        assert!(state.is_loading());
        state.apply_refresh(token, Err(GalleryError::Store("offline".to_string())));

        assert!(!state.is_loading());
        assert_eq!(state.photos(), before.as_slice());
        assert_eq!(state.error(), Some("offline"));

        state.dismiss_error();
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_refresh_drops_vanished_selection_and_filter() {
        let mut state = loaded_state();
        state.open_album(7);
        state.open_photo(4);

        let token = state.begin_refresh();
        state.apply_refresh(token, Ok(GallerySnapshot {
            photos: vec![photo(1, None)],
            albums: vec![],
        }));

        assert!(state.selected_photo().is_none());
        assert_eq!(state.album_filter(), None);
    }

    #[test]
    fn test_out_of_order_refreshes_keep_newest() {
        let mut state = GalleryViewState::new();
        let older = state.begin_refresh();
        let newer = state.begin_refresh();
        assert!(newer > older);

        assert!(state.apply_refresh(newer, Ok(GallerySnapshot {
            photos: vec![photo(2, None), photo(1, None)],
            albums: vec![],
        })));
        assert!(!state.is_loading());

        assert!(!state.apply_refresh(older, Ok(GallerySnapshot {
            photos: vec![photo(1, None)],
            albums: vec![],
        })));
        assert_eq!(ids(&state.visible_photos()), vec![2, 1]);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_loading_until_newest_refresh_lands() {
        let mut state = GalleryViewState::new();
        let older = state.begin_refresh();
        let newer = state.begin_refresh();

        state.apply_refresh(older, Ok(GallerySnapshot {
            photos: vec![photo(1, None)],
            albums: vec![],
        }));
        assert!(state.is_loading());
        assert_eq!(ids(&state.visible_photos()), vec![1]);

        state.apply_refresh(newer, Err(GalleryError::Store("offline".to_string())));
        assert!(!state.is_loading());
        assert_eq!(ids(&state.visible_photos()), vec![1]);
        assert_eq!(state.error(), Some("offline"));
    }

    #[test]
    fn test_dangling_album_reference_is_unsorted() {
        let snapshot = GallerySnapshot::from_records(
            vec![
                json!({ "id": 1, "title": "a", "image_url": "a.jpg", "album_id": 5 }),
                json!({ "id": 2, "title": "b", "image_url": "b.jpg", "album_id": 404 }),
                json!({ "title": "no id", "image_url": "c.jpg" }),
            ],
            vec![json!({ "id": 5, "name": "Kept" })],
        );

        assert_eq!(snapshot.photos.len(), 2);
        assert_eq!(snapshot.photos[0].album_id, Some(5));
        assert_eq!(snapshot.photos[1].album_id, None);
    }

    /// Serves albums, then fails on photos when `fail_photos` is set
    struct FlakyStore {
        inner: LocalStore,
        fail_photos: AtomicBool,
    }

    #[async_trait]
    impl GalleryStore for FlakyStore {
        async fn select(&self, collection: Collection, query: &Query) -> GalleryResult<Vec<Record>> {
            if collection == Collection::Photos && self.fail_photos.load(Ordering::SeqCst) {
                return Err(GalleryError::Store("photos unavailable".to_string()));
            }
            self.inner.select(collection, query).await
        }

        async fn insert(&self, collection: Collection, record: Record) -> GalleryResult<Record> {
            self.inner.insert(collection, record).await
        }

        async fn upload_binary(
            &self,
            bucket: &str,
            path: &str,
            bytes: Vec<u8>,
        ) -> GalleryResult<StoredObject> {
            self.inner.upload_binary(bucket, path, bytes).await
        }

        fn public_url(&self, bucket: &str, path: &str) -> GalleryResult<String> {
            self.inner.public_url(bucket, path)
        }
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open_in_memory(dir.path()).unwrap();
        let album = store
            .insert(Collection::Albums, json!({ "name": "Events" }))
            .await
            .unwrap();
        for title in ["one", "two"] {
            store
                .insert(
                    Collection::Photos,
                    json!({ "title": title, "image_url": "x.jpg", "album_id": album["id"] }),
                )
                .await
                .unwrap();
        }

        let mut state = GalleryViewState::new();
        state.refresh(&store).await;
        let first: Vec<Photo> = state.visible_photos().into_iter().cloned().collect();
        state.refresh(&store).await;
        let second: Vec<Photo> = state.visible_photos().into_iter().cloned().collect();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(first[0].title, "two");
    }

    #[tokio::test]
    async fn test_partial_fetch_failure_replaces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlakyStore {
            inner: LocalStore::open_in_memory(dir.path()).unwrap(),
            fail_photos: AtomicBool::new(false),
        };
        store
            .insert(Collection::Albums, json!({ "name": "First" }))
            .await
            .unwrap();

        let mut state = GalleryViewState::new();
        state.refresh(&store).await;
        assert_eq!(state.albums().len(), 1);

        // Albums would succeed, photos fail: neither list may change
        store
            .insert(Collection::Albums, json!({ "name": "Second" }))
            .await
            .unwrap();
        store.fail_photos.store(true, Ordering::SeqCst);
        state.refresh(&store).await;

        assert_eq!(state.albums().len(), 1);
        assert_eq!(state.error(), Some("photos unavailable"));
        assert!(!state.is_loading());
    }
}
