use crate::NavTarget;
use dioxus::prelude::*;
use dioxus_i18n::t;

const BUTTON_STYLE: &str = "padding: 8px 14px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px;";

#[component]
pub fn NavigationBar(
    title: String,
    /// Which of the view buttons is highlighted
    active: NavTarget,
    on_navigate: EventHandler<NavTarget>,
) -> Element {
    let style_for = |target: NavTarget| {
        if target == active {
            format!("{BUTTON_STYLE} background: #7c3aed; color: #ffffff;")
        } else {
            format!("{BUTTON_STYLE} background: #374151; color: #e5e7eb;")
        }
    };

    rsx! {
        header { style: "display: flex; flex-wrap: wrap; align-items: center; justify-content: space-between; gap: 12px; padding: 12px 24px; background: #1f2937; border-bottom: 1px solid #374151;",
            h1 { style: "margin: 0; font-size: 22px; color: #e5e7eb;", "{title}" }
            nav { style: "display: flex; flex-wrap: wrap; gap: 8px;",
                button {
                    style: style_for(NavTarget::AllPhotos),
                    onclick: move |_| on_navigate.call(NavTarget::AllPhotos),
                    "🖼️ "
                    {t!("nav-all-photos")}
                }
                button {
                    style: style_for(NavTarget::Albums),
                    onclick: move |_| on_navigate.call(NavTarget::Albums),
                    "📁 "
                    {t!("nav-albums")}
                }
                button {
                    style: style_for(NavTarget::Upload),
                    onclick: move |_| on_navigate.call(NavTarget::Upload),
                    "⬆️ "
                    {t!("nav-upload")}
                }
                button {
                    style: style_for(NavTarget::NewAlbum),
                    onclick: move |_| on_navigate.call(NavTarget::NewAlbum),
                    "➕ "
                    {t!("nav-new-album")}
                }
            }
        }
    }
}
