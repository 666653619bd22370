use dioxus::prelude::*;
use dioxus_gallery::PhotoGrid;
use dioxus_i18n::t;
use photo_gallery::GalleryViewState;

/// All photos, or only those of the album the filter points at
#[component]
pub fn GalleryScreen(view: Signal<GalleryViewState>) -> Element {
    let state = view.read();
    let photos: Vec<_> = state.visible_photos().into_iter().cloned().collect();
    let filter_name = state.active_album().map(|album| album.name.clone());
    let empty_text = if filter_name.is_some() {
        t!("gallery-album-empty")
    } else {
        t!("gallery-empty")
    };
    drop(state);

    rsx! {
        div { style: "padding: 24px;",
            if let Some(name) = filter_name {
                div { style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 16px; padding: 12px 16px; background: #312e81; border-radius: 8px;",
                    span { style: "font-weight: 600;", {t!("gallery-filter-label", name: name)} }
                    button {
                        class: "btn-secondary",
                        onclick: move |_| view.write().clear_album_filter(),
                        {t!("gallery-filter-clear")}
                    }
                }
            }
            PhotoGrid {
                photos,
                empty_text,
                on_open: move |id| view.write().open_photo(id),
            }
        }
    }
}
