use dioxus::prelude::*;
use dioxus_gallery::{AlbumGrid, PhotoGrid};
use dioxus_i18n::t;
use photo_gallery::GalleryViewState;

/// Album cards, followed by the photos not filed under any album
#[component]
pub fn AlbumsScreen(view: Signal<GalleryViewState>) -> Element {
    let state = view.read();
    let albums: Vec<_> = state
        .albums()
        .iter()
        .map(|album| {
            (
                album.clone(),
                state.album_cover(album.id).cloned(),
                state.album_photo_count(album.id),
            )
        })
        .collect();
    let unsorted: Vec<_> = state.unsorted_photos().into_iter().cloned().collect();
    drop(state);

    rsx! {
        div { style: "padding: 24px;",
            AlbumGrid {
                albums,
                empty_text: t!("albums-empty"),
                on_open: move |id| view.write().open_album(id),
            }
            h2 { style: "margin: 32px 0 16px 0; font-size: 18px; color: #d1d5db;",
                {t!("albums-unsorted")}
            }
            PhotoGrid {
                photos: unsorted,
                empty_text: t!("albums-unsorted-empty"),
                on_open: move |id| view.write().open_photo(id),
            }
        }
    }
}
