use crate::services;
use dioxus::prelude::*;
use dioxus_i18n::t;
use photo_gallery::{
    AlbumChoice, FormStatus, GalleryViewState, PhotoDraft, PhotoGalleryContext, PhotoSource,
};

const NEW_ALBUM: &str = "new";

#[derive(Clone, Copy, PartialEq)]
enum SourceKind {
    Url,
    File,
}

/// Maps the album `select` value back to a choice
fn album_choice(value: &str, new_album_name: &str) -> AlbumChoice {
    match value {
        "" => AlbumChoice::None,
        NEW_ALBUM => AlbumChoice::New(new_album_name.to_string()),
        id => id
            .parse()
            .map(AlbumChoice::Existing)
            .unwrap_or(AlbumChoice::None),
    }
}

fn album_value(choice: &AlbumChoice) -> String {
    match choice {
        AlbumChoice::None => String::new(),
        AlbumChoice::Existing(id) => id.to_string(),
        AlbumChoice::New(_) => NEW_ALBUM.to_string(),
    }
}

#[cfg(not(target_os = "android"))]
async fn pick_image_file() -> Option<(String, Vec<u8>)> {
    let handle = rfd::AsyncFileDialog::new()
        .add_filter("images", &["png", "jpg", "jpeg", "gif", "webp"])
        .pick_file()
        .await?;
    let bytes = handle.read().await;
    Some((handle.file_name(), bytes))
}

#[cfg(target_os = "android")]
async fn pick_image_file() -> Option<(String, Vec<u8>)> {
    log::warn!("No file dialog on this platform");
    None
}

#[component]
pub fn PhotoUploadModal(view: Signal<GalleryViewState>, on_close: EventHandler<()>) -> Element {
    let context = use_context::<PhotoGalleryContext>();
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut source_kind = use_signal(|| SourceKind::Url);
    let mut image_url = use_signal(String::new);
    let mut file = use_signal(|| None::<(String, Vec<u8>)>);
    let mut album = use_signal(|| album_value(&AlbumChoice::from_filter(view.peek().album_filter())));
    let mut new_album_name = use_signal(String::new);
    let mut status = use_signal(FormStatus::default);

    let albums = view.read().albums().to_vec();
    let submitting = status.read().is_submitting();

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if status.peek().is_submitting() {
            return;
        }

        let source = match source_kind() {
            SourceKind::Url => Some(PhotoSource::Url(image_url())),
            SourceKind::File => file().map(|(file_name, bytes)| PhotoSource::File { file_name, bytes }),
        };
        let draft = PhotoDraft {
            title: title(),
            description: description(),
            source,
            album: album_choice(&album(), &new_album_name()),
        };
        if let Err(e) = draft.validate() {
            status.set(FormStatus::Failed(e.to_string()));
            return;
        }

        status.set(FormStatus::Submitting);
        let context = context.clone();
        let success = t!("upload-success");
        spawn(async move {
            let mut draft = draft;
            let result = services::upload_photo(context, view, &mut draft).await;
            album.set(album_value(&draft.album));
            if result.is_ok() {
                title.set(String::new());
                description.set(String::new());
                image_url.set(String::new());
                file.set(None);
                new_album_name.set(String::new());
            }
            status.set(FormStatus::from_result(&result, success));
        });
    };

    rsx! {
        div { class: "modal-overlay", onclick: move |_| on_close.call(()),
            div { class: "modal-content card", onclick: move |evt| evt.stop_propagation(),
                div { style: "display: flex; justify-content: space-between; align-items: start; margin-bottom: 20px;",
                    div {
                        h2 { style: "margin: 0; font-size: 22px;", {t!("upload-title")} }
                        p { style: "margin: 4px 0 0 0; color: #9ca3af; font-size: 14px;",
                            {t!("upload-subtitle")}
                        }
                    }
                    button {
                        class: "btn-secondary",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }

                match status() {
                    FormStatus::Failed(err) => rsx! {
                        div { style: "background: #451a1a; border: 1px solid #7f1d1d; color: #fca5a5; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                            "⚠️ {err}"
                        }
                    },
                    FormStatus::Succeeded(msg) => rsx! {
                        div { style: "background: #14342b; border: 1px solid #065f46; color: #6ee7b7; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                            "✅ {msg}"
                        }
                    },
                    _ => rsx! {},
                }

                form { onsubmit: handle_submit,
                    div { style: "margin-bottom: 16px;",
                        label { class: "label", {t!("upload-title-label")} }
                        input {
                            r#type: "text",
                            class: "input",
                            placeholder: t!("upload-title-placeholder"),
                            value: "{title}",
                            oninput: move |e| title.set(e.value()),
                            autofocus: true,
                        }
                    }

                    div { style: "margin-bottom: 16px;",
                        label { class: "label", {t!("upload-description-label")} }
                        textarea {
                            class: "input",
                            rows: "3",
                            placeholder: t!("upload-description-placeholder"),
                            value: "{description}",
                            oninput: move |e| description.set(e.value()),
                        }
                    }

                    div { style: "display: flex; gap: 8px; margin-bottom: 12px;",
                        button {
                            r#type: "button",
                            class: if source_kind() == SourceKind::Url { "btn-primary" } else { "btn-secondary" },
                            onclick: move |_| source_kind.set(SourceKind::Url),
                            "🔗 "
                            {t!("upload-source-url")}
                        }
                        if cfg!(not(target_os = "android")) {
                            button {
                                r#type: "button",
                                class: if source_kind() == SourceKind::File { "btn-primary" } else { "btn-secondary" },
                                onclick: move |_| source_kind.set(SourceKind::File),
                                "📁 "
                                {t!("upload-source-file")}
                            }
                        }
                    }

                    div { style: "margin-bottom: 16px;",
                        if source_kind() == SourceKind::Url {
                            input {
                                r#type: "url",
                                class: "input",
                                placeholder: t!("upload-url-placeholder"),
                                value: "{image_url}",
                                oninput: move |e| image_url.set(e.value()),
                            }
                        } else {
                            div { style: "display: flex; align-items: center; gap: 12px;",
                                button {
                                    r#type: "button",
                                    class: "btn-secondary",
                                    onclick: move |_| {
                                        spawn(async move {
                                            if let Some(picked) = pick_image_file().await {
                                                file.set(Some(picked));
                                            }
                                        });
                                    },
                                    {t!("upload-choose-file")}
                                }
                                span { style: "font-size: 13px; color: #9ca3af; word-break: break-all;",
                                    match file() {
                                        Some((name, _)) => rsx! { "{name}" },
                                        None => rsx! { {t!("upload-no-file")} },
                                    }
                                }
                            }
                        }
                    }

                    div { style: "margin-bottom: 16px;",
                        label { class: "label", {t!("upload-album-label")} }
                        select {
                            class: "input",
                            value: "{album}",
                            onchange: move |e| album.set(e.value()),
                            option { value: "", selected: album().is_empty(), {t!("upload-album-none")} }
                            for a in albums {
                                option {
                                    key: "{a.id}",
                                    value: "{a.id}",
                                    selected: album() == a.id.to_string(),
                                    "{a.name}"
                                }
                            }
                            option { value: NEW_ALBUM, selected: album() == NEW_ALBUM, {t!("upload-album-new")} }
                        }
                        if album() == NEW_ALBUM {
                            input {
                                r#type: "text",
                                class: "input",
                                style: "margin-top: 8px;",
                                placeholder: t!("upload-new-album-placeholder"),
                                value: "{new_album_name}",
                                oninput: move |e| new_album_name.set(e.value()),
                            }
                        }
                    }

                    div { style: "display: flex; justify-content: flex-end; gap: 8px;",
                        button {
                            r#type: "button",
                            class: "btn-secondary",
                            onclick: move |_| on_close.call(()),
                            {t!("action-cancel")}
                        }
                        button {
                            r#type: "submit",
                            class: "btn-primary",
                            disabled: submitting,
                            if submitting {
                                {t!("upload-submitting")}
                            } else {
                                {t!("upload-submit")}
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_choice_from_select_value() {
        assert_eq!(album_choice("", "ignored"), AlbumChoice::None);
        assert_eq!(album_choice("7", ""), AlbumChoice::Existing(7));
        assert_eq!(
            album_choice(NEW_ALBUM, "Summer"),
            AlbumChoice::New("Summer".to_string())
        );
        assert_eq!(album_choice("garbage", ""), AlbumChoice::None);
    }

    #[test]
    fn test_album_value_round_trips_filter_default() {
        let value = album_value(&AlbumChoice::from_filter(Some(3)));
        assert_eq!(value, "3");
        assert_eq!(album_choice(&value, ""), AlbumChoice::Existing(3));
        assert_eq!(album_value(&AlbumChoice::from_filter(None)), "");
    }
}
