//! Dioxus UI components for photo gallery
//!
//! `FittedImage` measures its container, probes the image's intrinsic size
//! and displays it contain-fitted. Components read the store and settings
//! from a `PhotoGalleryContext` provided near the root of the app.

use crate::config::GalleryConfig;
use crate::fit::ContainerSize;
use crate::fitted::{FitPhase, FittedImageState, ProbeRequest};
use crate::probe::probe_dimensions;
use crate::store::{content_type_for, GalleryStore};
use dioxus::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Shared services for gallery components
#[derive(Clone)]
pub struct PhotoGalleryContext {
    pub store: Arc<dyn GalleryStore>,
    pub config: GalleryConfig,
}

impl PartialEq for PhotoGalleryContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store) && self.config == other.config
    }
}

impl PhotoGalleryContext {
    pub fn new(store: Arc<dyn GalleryStore>, config: GalleryConfig) -> Self {
        Self { store, config }
    }

    /// Returns something an `img` element can load. Files of the local
    /// backend are inlined as data URLs; everything else passes through.
    pub async fn display_src(&self, source: &str) -> String {
        use base64::{engine::general_purpose, Engine as _};

        if source.starts_with("http://")
            || source.starts_with("https://")
            || source.starts_with("data:")
        {
            return source.to_string();
        }

        let path = Path::new(source.strip_prefix("file://").unwrap_or(source));
        match tokio::fs::read(path).await {
            Ok(bytes) => format!(
                "data:{};base64,{}",
                content_type_for(source),
                general_purpose::STANDARD.encode(&bytes)
            ),
            Err(e) => {
                log::warn!("Failed to read local image {}: {}", path.display(), e);
                source.to_string()
            }
        }
    }
}

/// Runs a probe and reports the result back under the request's token
fn run_probe(
    mut state: Signal<FittedImageState>,
    request: ProbeRequest,
    timeout: Duration,
    on_error: Option<EventHandler<()>>,
) {
    spawn(async move {
        let result = probe_dimensions(&request.source, timeout).await;
        match result {
            Ok(dimensions) => {
                state.write().probe_succeeded(request.token, dimensions);
            }
            Err(e) => {
                log::debug!("Probe {} failed: {}", request.token, e);
                if state.write().probe_failed(request.token) {
                    if let Some(handler) = &on_error {
                        handler.call(());
                    }
                }
            }
        }
    });
}

/// Image displayed at the largest size that fits its container without
/// upscaling. Shows a spinner while measuring/loading and `fallback` once
/// the source turns out to be unusable.
#[component]
pub fn FittedImage(
    src: String,
    #[props(default = "Photo".to_string())] alt: String,
    #[props(default = "📷".to_string())] fallback: String,
    #[props(default = String::new())] class: String,
    #[props(default)] on_load: Option<EventHandler<()>>,
    #[props(default)] on_error: Option<EventHandler<()>>,
) -> Element {
    let context = use_context::<PhotoGalleryContext>();
    let timeout = context.config.probe_timeout();
    let mut state = use_signal(|| FittedImageState::new(src.clone()));
    let mut displayed = use_signal(|| false);

    // Restart the machine whenever the source prop changes
    use_effect(use_reactive!(|src| {
        displayed.set(false);
        let request = state.write().set_source(src.clone());
        if let Some(request) = request {
            run_probe(state, request, timeout, on_error);
        }
    }));

    // Local files are read and inlined off the render path
    let display_src = use_resource(use_reactive!(|src| {
        let context = context.clone();
        async move { context.display_src(&src).await }
    }));
    let display_src = display_src.read().clone();

    let phase = state.read().phase().clone();
    let opacity = if displayed() { "1" } else { "0" };
    let show_spinner = phase != FitPhase::Error && !displayed();

    rsx! {
        div {
            class: "{class}",
            style: "position: relative; width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; overflow: hidden;",
            onresize: move |evt| {
                if let Ok(size) = evt.get_content_box_size() {
                    let request = state.write().resize(ContainerSize::new(size.width, size.height));
                    if let Some(request) = request {
                        run_probe(state, request, timeout, on_error);
                    }
                }
            },
            match (phase, display_src) {
                (FitPhase::Error, _) => rsx! {
                    div {
                        style: "width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; background: #374151; color: #6b7280; font-size: 36px;",
                        "{fallback}"
                    }
                },
                (FitPhase::Loaded(fit), Some(display_src)) => rsx! {
                    img {
                        src: "{display_src}",
                        alt: "{alt}",
                        style: "width: {fit.width}px; height: {fit.height}px; object-fit: contain; opacity: {opacity}; transition: opacity 0.3s ease-in-out;",
                        onload: move |_| {
                            displayed.set(true);
                            if let Some(handler) = &on_load {
                                handler.call(());
                            }
                        },
                        onerror: move |_| {
                            state.write().display_failed();
                            if let Some(handler) = &on_error {
                                handler.call(());
                            }
                        },
                    }
                },
                _ => rsx! {},
            }
            if show_spinner {
                div {
                    style: "position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; color: #a855f7; font-size: 28px;",
                    "⏳"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalStore;

    fn context(dir: &Path) -> PhotoGalleryContext {
        let store = LocalStore::open_in_memory(dir).unwrap();
        PhotoGalleryContext::new(Arc::new(store), GalleryConfig::default())
    }

    #[tokio::test]
    async fn test_display_src_inlines_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let context = context(dir.path());

        let src = context.display_src(&path.to_string_lossy()).await;
        assert_eq!(src, "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn test_display_src_passes_urls_through() {
        let dir = tempfile::tempdir().unwrap();
        let context = context(dir.path());

        let url = "https://cdn.example.com/a.jpg";
        assert_eq!(context.display_src(url).await, url);
        assert_eq!(context.display_src("/missing/b.jpg").await, "/missing/b.jpg");
    }
}
