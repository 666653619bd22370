use crate::services;
use dioxus::prelude::*;
use dioxus_i18n::t;
use photo_gallery::{AlbumDraft, FormStatus, GalleryViewState, PhotoGalleryContext};

/// Dialog for creating an album. Closes itself once the album exists.
#[component]
pub fn AlbumFormModal(view: Signal<GalleryViewState>, on_close: EventHandler<()>) -> Element {
    let context = use_context::<PhotoGalleryContext>();
    let mut name = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut status = use_signal(FormStatus::default);

    let submitting = status.read().is_submitting();

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if status.peek().is_submitting() {
            return;
        }

        let draft = AlbumDraft {
            name: name(),
            description: description(),
        };
        if let Err(e) = draft.validate() {
            status.set(FormStatus::Failed(e.to_string()));
            return;
        }

        status.set(FormStatus::Submitting);
        let context = context.clone();
        let success = t!("album-success");
        spawn(async move {
            let result = services::add_album(context, view, draft).await;
            status.set(FormStatus::from_result(&result, success));
            if result.is_ok() {
                name.set(String::new());
                description.set(String::new());
                on_close.call(());
            }
        });
    };

    rsx! {
        div { class: "modal-overlay", onclick: move |_| on_close.call(()),
            div { class: "modal-content card", onclick: move |evt| evt.stop_propagation(),
                h2 { style: "margin: 0; font-size: 22px;", {t!("album-form-title")} }
                p { style: "margin: 4px 0 20px 0; color: #9ca3af; font-size: 14px;",
                    {t!("album-form-subtitle")}
                }

                if let FormStatus::Failed(err) = status() {
                    div { style: "background: #451a1a; border: 1px solid #7f1d1d; color: #fca5a5; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                        "⚠️ {err}"
                    }
                }

                form { onsubmit: handle_submit,
                    div { style: "margin-bottom: 16px;",
                        label { class: "label", {t!("album-name-label")} }
                        input {
                            r#type: "text",
                            class: "input",
                            placeholder: t!("album-name-placeholder"),
                            value: "{name}",
                            oninput: move |e| name.set(e.value()),
                            autofocus: true,
                        }
                    }
                    div { style: "margin-bottom: 20px;",
                        label { class: "label", {t!("album-description-label")} }
                        textarea {
                            class: "input",
                            rows: "3",
                            placeholder: t!("album-description-placeholder"),
                            value: "{description}",
                            oninput: move |e| description.set(e.value()),
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
                                {t!("album-submitting")}
                            } else {
                                {t!("album-submit")}
                            }
                        }
                    }
                }
            }
        }
    }
}
