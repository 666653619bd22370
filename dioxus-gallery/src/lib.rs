use dioxus::prelude::*;
use photo_gallery::{Album, AlbumId, FittedImage, Photo, PhotoId};

/// Formats a creation timestamp the way the lightbox shows it
pub fn format_created_at(photo: &Photo) -> Option<String> {
    photo
        .created_at
        .map(|ts| ts.format("%B %-d, %Y at %H:%M").to_string())
}

/// A grid of photos, each fitted into a square tile
///
/// # Example
/// ```rust,ignore
/// PhotoGrid {
///     photos: view.read().visible_photos().into_iter().cloned().collect(),
///     empty_text: "No photos yet".to_string(),
///     on_open: move |id| view.write().open_photo(id),
/// }
/// ```
#[component]
pub fn PhotoGrid(
    photos: Vec<Photo>,
    /// Shown instead of the grid when `photos` is empty
    #[props(default = "No photos available".to_string())]
    empty_text: String,
    on_open: EventHandler<PhotoId>,
) -> Element {
    if photos.is_empty() {
        return rsx! {
            div {
                style: "padding: 24px; text-align: center; background: #1f2937; border-radius: 8px; color: #9ca3af;",
                "{empty_text}"
            }
        };
    }

    rsx! {
        div {
            style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px;",
            for photo in photos {
                PhotoTile { key: "{photo.id}", photo: photo.clone(), on_open }
            }
        }
    }
}

/// Internal component for rendering a single grid tile
#[component]
fn PhotoTile(photo: Photo, on_open: EventHandler<PhotoId>) -> Element {
    let id = photo.id;

    rsx! {
        div {
            style: "position: relative; aspect-ratio: 1/1; border-radius: 8px; overflow: hidden; background: #111827; cursor: pointer;",
            onclick: move |_| on_open.call(id),
            FittedImage { src: photo.image_url.clone(), alt: photo.title.clone() }
            div {
                style: "position: absolute; left: 0; right: 0; bottom: 0; padding: 8px 12px; background: linear-gradient(transparent, rgba(0, 0, 0, 0.7)); color: white; font-size: 14px;",
                "{photo.title}"
            }
        }
    }
}

/// Album cards with cover photo and photo count
#[component]
pub fn AlbumGrid(
    /// Each album with its cover photo (if any) and number of photos
    albums: Vec<(Album, Option<Photo>, usize)>,
    on_open: EventHandler<AlbumId>,
    #[props(default = "No albums yet".to_string())] empty_text: String,
) -> Element {
    if albums.is_empty() {
        return rsx! {
            div {
                style: "padding: 24px; text-align: center; background: #1f2937; border-radius: 8px; color: #9ca3af;",
                "{empty_text}"
            }
        };
    }

    rsx! {
        div {
            style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 16px;",
            for (album, cover, count) in albums {
                div {
                    key: "{album.id}",
                    style: "border-radius: 12px; overflow: hidden; background: #1f2937; cursor: pointer;",
                    onclick: {
                        let album_id = album.id;
                        move |_| on_open.call(album_id)
                    },
                    div { style: "height: 180px; background: #111827;",
                        if let Some(cover) = cover {
                            FittedImage { src: cover.image_url.clone(), alt: album.name.clone() }
                        } else {
                            div {
                                style: "width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; color: #6b7280; font-size: 36px;",
                                "📁"
                            }
                        }
                    }
                    div { style: "padding: 12px 16px;",
                        h4 { style: "margin: 0 0 4px 0; color: #e5e7eb;", "{album.name}" }
                        if let Some(description) = &album.description {
                            p { style: "margin: 0 0 4px 0; color: #9ca3af; font-size: 14px;", "{description}" }
                        }
                        p { style: "margin: 0; color: #6b7280; font-size: 12px;", "📷 {count}" }
                    }
                }
            }
        }
    }
}

/// Lightbox showing one photo with its details
///
/// `photos` is the list the user was browsing; previous/next step through it.
#[component]
pub fn PhotoModal(
    photo: Photo,
    #[props(default)] photos: Vec<Photo>,
    on_close: EventHandler<()>,
    #[props(default)] on_navigate: Option<EventHandler<PhotoId>>,
) -> Element {
    let current_index = photos.iter().position(|p| p.id == photo.id);
    let prev_id = current_index
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| photos.get(i))
        .map(|p| p.id);
    let next_id = current_index
        .and_then(|i| photos.get(i + 1))
        .map(|p| p.id);
    let created = format_created_at(&photo);

    rsx! {
        div {
            style: "position: fixed; top: 0; left: 0; right: 0; bottom: 0; background: rgba(0, 0, 0, 0.85); z-index: 1000; display: flex; align-items: center; justify-content: center; padding: 24px;",
            onclick: move |_| on_close.call(()),
            div {
                style: "position: relative; width: min(960px, 100%); max-height: 100%; background: #1f2937; border-radius: 12px; overflow: hidden; display: flex; flex-direction: column;",
                onclick: move |evt| evt.stop_propagation(),
                button {
                    style: "position: absolute; top: 16px; right: 16px; z-index: 10; width: 40px; height: 40px; background: rgba(31, 41, 55, 0.9); color: white; border-radius: 50%; font-size: 24px; cursor: pointer; border: none;",
                    onclick: move |_| on_close.call(()),
                    "×"
                }
                div { style: "position: relative; height: 70vh;",
                    FittedImage { src: photo.image_url.clone(), alt: photo.title.clone() }
                    if let (Some(id), Some(handler)) = (prev_id, on_navigate) {
                        button {
                            style: "position: absolute; left: 16px; top: 50%; width: 48px; height: 48px; background: rgba(255, 255, 255, 0.3); color: white; border-radius: 50%; font-size: 24px; cursor: pointer; border: none;",
                            onclick: move |_| handler.call(id),
                            "‹"
                        }
                    }
                    if let (Some(id), Some(handler)) = (next_id, on_navigate) {
                        button {
                            style: "position: absolute; right: 16px; top: 50%; width: 48px; height: 48px; background: rgba(255, 255, 255, 0.3); color: white; border-radius: 50%; font-size: 24px; cursor: pointer; border: none;",
                            onclick: move |_| handler.call(id),
                            "›"
                        }
                    }
                }
                div { style: "padding: 24px; border-top: 1px solid #374151;",
                    h3 { style: "margin: 0 0 8px 0; color: #e5e7eb; font-size: 24px;", "{photo.title}" }
                    if let Some(description) = &photo.description {
                        p { style: "margin: 0 0 12px 0; color: #9ca3af;", "{description}" }
                    }
                    if let Some(created) = created {
                        p { style: "margin: 0; color: #6b7280; font-size: 14px;", "📅 {created}" }
                    }
                }
            }
        }
    }
}
