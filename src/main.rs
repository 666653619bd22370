use dioxus::prelude::*;
use dioxus_gallery::PhotoModal;
use dioxus_i18n::prelude::use_init_i18n;
use dioxus_i18n::t;
use photo_gallery::{GalleryViewState, PhotoGalleryContext, ViewMode};

mod backend;
mod components;
mod error;
mod i18n;
mod services;

use components::{AlbumFormModal, AlbumsScreen, GalleryScreen, NavigationBar, PhotoUploadModal};

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    init_logging();
    dioxus::launch(App);
}

#[cfg(not(target_os = "android"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(target_os = "android")]
fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("folio"),
    );
}

/// Entries of the header navigation
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NavTarget {
    AllPhotos,
    Albums,
    Upload,
    NewAlbum,
}

#[component]
fn App() -> Element {
    use_init_i18n(i18n::init_i18n);
    let context = use_hook(|| {
        backend::load_context().map_err(|e| {
            log::error!("Failed to start gallery: {}", e);
            e.user_message()
        })
    });

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        match context {
            Ok(context) => rsx! {
                GalleryApp { context }
            },
            Err(message) => rsx! {
                div { style: "padding: 24px;",
                    h2 { {t!("error-startup")} }
                    p { style: "color: #fca5a5;", "{message}" }
                }
            },
        }
    }
}

#[component]
fn GalleryApp(context: PhotoGalleryContext) -> Element {
    let context = use_context_provider(|| context);
    let mut view = use_signal(GalleryViewState::new);
    let mut show_upload = use_signal(|| false);
    let mut show_album_form = use_signal(|| false);

    use_hook(|| services::reload(&context, view));

    let state = view.read();
    let mode = state.mode();
    let loading = state.is_loading();
    let error = state.error().map(str::to_string);
    let selected = state.selected_photo().cloned();
    let browsing: Vec<_> = state.visible_photos().into_iter().cloned().collect();
    drop(state);

    let active = if show_upload() {
        NavTarget::Upload
    } else if show_album_form() {
        NavTarget::NewAlbum
    } else if mode == ViewMode::Albums {
        NavTarget::Albums
    } else {
        NavTarget::AllPhotos
    };

    rsx! {
        div { style: "display: flex; flex-direction: column; min-height: 100vh;",
            NavigationBar {
                title: context.config.site_title.clone(),
                active,
                on_navigate: move |target| match target {
                    NavTarget::AllPhotos => view.write().select_all_photos(),
                    NavTarget::Albums => view.write().select_albums_view(),
                    NavTarget::Upload => show_upload.set(true),
                    NavTarget::NewAlbum => show_album_form.set(true),
                },
            }

            if let Some(err) = error {
                div { style: "display: flex; justify-content: space-between; align-items: center; gap: 12px; margin: 16px 24px 0 24px; background: #451a1a; border: 1px solid #7f1d1d; color: #fca5a5; padding: 12px; border-radius: 8px; font-size: 14px;",
                    span { "⚠️ {err}" }
                    button {
                        class: "btn-secondary",
                        onclick: move |_| view.write().dismiss_error(),
                        {t!("action-dismiss")}
                    }
                }
            }

            if loading {
                div { style: "padding: 12px 24px 0 24px; color: #a855f7;",
                    "⏳ "
                    {t!("gallery-loading")}
                }
            }

            main { style: "flex: 1;",
                match mode {
                    ViewMode::AllPhotos => rsx! {
                        GalleryScreen { view }
                    },
                    ViewMode::Albums => rsx! {
                        AlbumsScreen { view }
                    },
                }
            }
        }

        if show_upload() {
            PhotoUploadModal { view, on_close: move |_| show_upload.set(false) }
        }

        if show_album_form() {
            AlbumFormModal { view, on_close: move |_| show_album_form.set(false) }
        }

        if let Some(photo) = selected {
            PhotoModal {
                photo,
                photos: browsing,
                on_close: move |_| view.write().close_photo(),
                on_navigate: move |id| view.write().open_photo(id),
            }
        }
    }
}
