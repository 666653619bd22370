use dioxus::prelude::*;
use photo_gallery::{
    create_album, create_photo, Album, AlbumChoice, AlbumDraft, GalleryResult, GallerySnapshot,
    GalleryViewState, Photo, PhotoDraft, PhotoGalleryContext,
};

/// Re-fetches photos and albums in the background
///
/// The view is only borrowed while marking the start and applying the
/// result, never across the fetch itself. Overlapping reloads are
/// resolved by the view's refresh token, so the newest one wins.
pub fn reload(context: &PhotoGalleryContext, mut view: Signal<GalleryViewState>) {
    let token = view.write().begin_refresh();
    let store = context.store.clone();
    spawn(async move {
        let result = GallerySnapshot::fetch(store.as_ref()).await;
        view.write().apply_refresh(token, result);
    });
}

/// Uploads a photo and refreshes the gallery once it is stored
///
/// The gallery is also refreshed when only the draft's new album made it
/// into the store, so the album can be picked on retry.
pub async fn upload_photo(
    context: PhotoGalleryContext,
    view: Signal<GalleryViewState>,
    draft: &mut PhotoDraft,
) -> GalleryResult<Photo> {
    let wants_new_album = matches!(draft.album, AlbumChoice::New(_));
    let result = create_photo(context.store.as_ref(), &context.config.bucket, draft).await;
    let album_created = wants_new_album && matches!(draft.album, AlbumChoice::Existing(_));
    if result.is_ok() || album_created {
        reload(&context, view);
    }
    result
}

/// Creates an album and refreshes the gallery
pub async fn add_album(
    context: PhotoGalleryContext,
    view: Signal<GalleryViewState>,
    draft: AlbumDraft,
) -> GalleryResult<Album> {
    let album = create_album(context.store.as_ref(), &draft).await?;
    reload(&context, view);
    Ok(album)
}
