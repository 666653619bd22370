//! State machine behind a fitted image element.
//!
//! The element moves `Measuring -> Loading -> Loaded | Error`. Every probe
//! that is started is identified by a token; results carrying any token other
//! than the most recent one are discarded, so a slow probe for an old source
//! or an old container size can never overwrite newer state.

use crate::fit::{fit_image, ContainerSize, FitDimensions, ImageDimensions};

#[derive(Debug, Clone, PartialEq)]
pub enum FitPhase {
    /// Container size not known yet (or currently empty)
    Measuring,
    /// Waiting for the intrinsic-size probe
    Loading,
    Loaded(FitDimensions),
    /// Source was empty or failed to load. Permanent for this source.
    Error,
}

/// A probe the owner has to run and report back with the same token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub token: u64,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct FittedImageState {
    source: String,
    container: Option<ContainerSize>,
    intrinsic: Option<ImageDimensions>,
    phase: FitPhase,
    pending: Option<u64>,
    next_token: u64,
}

impl FittedImageState {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let phase = if source.trim().is_empty() {
            FitPhase::Error
        } else {
            FitPhase::Measuring
        };
        Self {
            source,
            container: None,
            intrinsic: None,
            phase,
            pending: None,
            next_token: 0,
        }
    }

    pub fn phase(&self) -> &FitPhase {
        &self.phase
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn container(&self) -> Option<ContainerSize> {
        self.container
    }

    pub fn fit(&self) -> Option<FitDimensions> {
        match self.phase {
            FitPhase::Loaded(fit) => Some(fit),
            _ => None,
        }
    }

    /// Token of the probe whose result would currently be accepted
    pub fn pending_token(&self) -> Option<u64> {
        self.pending
    }

    /// Restarts the machine for a new source. Returns the probe to run if
    /// the container is already measured.
    pub fn set_source(&mut self, source: impl Into<String>) -> Option<ProbeRequest> {
        let source = source.into();
        if source == self.source && self.phase != FitPhase::Measuring {
            return None;
        }

        log::debug!("Fitted image source changed to {}", source);
        self.source = source;
        self.intrinsic = None;
        self.pending = None;

        if self.source.trim().is_empty() {
            self.phase = FitPhase::Error;
            return None;
        }

        self.phase = FitPhase::Measuring;
        self.start_probe()
    }

    /// Records a new container measurement. Unchanged sizes are ignored so
    /// repeated layout passes don't trigger work.
    pub fn resize(&mut self, container: ContainerSize) -> Option<ProbeRequest> {
        if self.container == Some(container) {
            return None;
        }
        self.container = Some(container);

        match self.phase {
            FitPhase::Error => None,
            _ if container.is_empty() => {
                self.pending = None;
                self.phase = FitPhase::Measuring;
                None
            }
            _ => match self.intrinsic {
                // Intrinsic size is already known for this source
                Some(image) => {
                    self.apply_fit(image);
                    None
                }
                None => {
                    self.phase = FitPhase::Measuring;
                    self.start_probe()
                }
            },
        }
    }

    /// Reports a successful probe. Returns `false` if the result was stale.
    pub fn probe_succeeded(&mut self, token: u64, image: ImageDimensions) -> bool {
        if self.pending != Some(token) {
            log::debug!("Discarding stale probe result {}", token);
            return false;
        }
        self.pending = None;

        if image.width == 0 || image.height == 0 {
            self.phase = FitPhase::Error;
            return true;
        }

        self.intrinsic = Some(image);
        self.apply_fit(image);
        true
    }

    /// Reports a failed or timed-out probe. Returns `false` if the result was
    /// stale.
    pub fn probe_failed(&mut self, token: u64) -> bool {
        if self.pending != Some(token) {
            log::debug!("Discarding stale probe failure {}", token);
            return false;
        }
        log::error!("Failed to load image for dimension calculation: {}", self.source);
        self.pending = None;
        self.phase = FitPhase::Error;
        true
    }

    /// Reports that the displayed element itself failed to load
    pub fn display_failed(&mut self) {
        self.pending = None;
        self.phase = FitPhase::Error;
    }

    fn start_probe(&mut self) -> Option<ProbeRequest> {
        let container = self.container?;
        if container.is_empty() {
            return None;
        }

        self.next_token += 1;
        let token = self.next_token;
        self.pending = Some(token);
        self.phase = FitPhase::Loading;
        Some(ProbeRequest {
            token,
            source: self.source.clone(),
        })
    }

    fn apply_fit(&mut self, image: ImageDimensions) {
        self.phase = match self.container.and_then(|c| fit_image(image, c)) {
            Some(fit) => {
                log::debug!(
                    "Image fit calculation: {}x{} -> {}x{} ({:.1}%)",
                    image.width,
                    image.height,
                    fit.width,
                    fit.height,
                    fit.scale * 100.0
                );
                FitPhase::Loaded(fit)
            }
            None => FitPhase::Measuring,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> ContainerSize {
        ContainerSize::new(side, side)
    }

    #[test]
    fn test_starts_measuring_then_loads() {
        let mut state = FittedImageState::new("a.jpg");
        assert_eq!(state.phase(), &FitPhase::Measuring);

        let probe = state.resize(square(800.0)).unwrap();
        assert_eq!(probe.source, "a.jpg");
        assert_eq!(state.phase(), &FitPhase::Loading);

        assert!(state.probe_succeeded(probe.token, ImageDimensions::new(1600, 900)));
        let fit = state.fit().unwrap();
        assert_eq!((fit.width, fit.height), (800, 450));
    }

    #[test]
    fn test_empty_source_is_error() {
        let mut state = FittedImageState::new("");
        assert_eq!(state.phase(), &FitPhase::Error);
        assert_eq!(state.resize(square(100.0)), None);
        assert_eq!(state.phase(), &FitPhase::Error);
    }

    #[test]
    fn test_failure_is_permanent() {
        let mut state = FittedImageState::new("broken.jpg");
        let probe = state.resize(square(300.0)).unwrap();
        assert!(state.probe_failed(probe.token));
        assert_eq!(state.phase(), &FitPhase::Error);

        // No retry on resize
        assert_eq!(state.resize(square(500.0)), None);
        assert_eq!(state.phase(), &FitPhase::Error);
    }

    #[test]
    fn test_unchanged_size_does_not_reprobe() {
        let mut state = FittedImageState::new("a.jpg");
        assert!(state.resize(square(300.0)).is_some());
        assert_eq!(state.resize(square(300.0)), None);
    }

    #[test]
    fn test_resize_after_load_refits_without_probe() {
        let mut state = FittedImageState::new("a.jpg");
        let probe = state.resize(square(800.0)).unwrap();
        state.probe_succeeded(probe.token, ImageDimensions::new(1600, 900));

        assert_eq!(state.resize(square(400.0)), None);
        let fit = state.fit().unwrap();
        assert_eq!((fit.width, fit.height), (400, 225));
    }

    #[test]
    fn test_zero_container_goes_back_to_measuring() {
        let mut state = FittedImageState::new("a.jpg");
        let probe = state.resize(square(800.0)).unwrap();
        state.probe_succeeded(probe.token, ImageDimensions::new(100, 100));

        assert_eq!(state.resize(ContainerSize::new(0.0, 0.0)), None);
        assert_eq!(state.phase(), &FitPhase::Measuring);

        assert_eq!(state.resize(square(50.0)), None);
        assert_eq!(state.fit().map(|f| f.width), Some(50));
    }

    #[test]
    fn test_last_source_wins_regardless_of_completion_order() {
        // Newer probe finishes last
        let mut state = FittedImageState::new("old.jpg");
        let old = state.resize(square(800.0)).unwrap();
        let new = state.set_source("new.jpg").unwrap();
        assert!(!state.probe_succeeded(old.token, ImageDimensions::new(100, 100)));
        assert_eq!(state.phase(), &FitPhase::Loading);
        assert!(state.probe_succeeded(new.token, ImageDimensions::new(1600, 900)));
        assert_eq!(state.fit().map(|f| f.height), Some(450));

        // Newer probe finishes first
        let mut state = FittedImageState::new("old.jpg");
        let old = state.resize(square(800.0)).unwrap();
        let new = state.set_source("new.jpg").unwrap();
        assert!(state.probe_succeeded(new.token, ImageDimensions::new(1600, 900)));
        assert!(!state.probe_failed(old.token));
        assert_eq!(state.source(), "new.jpg");
        assert_eq!(state.fit().map(|f| f.height), Some(450));
    }

    #[test]
    fn test_new_source_after_error_restarts() {
        let mut state = FittedImageState::new("");
        state.resize(square(200.0));
        let probe = state.set_source("b.jpg").unwrap();
        assert_eq!(state.phase(), &FitPhase::Loading);
        assert!(state.probe_succeeded(probe.token, ImageDimensions::new(100, 400)));
        assert_eq!(state.fit().map(|f| (f.width, f.height)), Some((50, 200)));
    }

    #[test]
    fn test_display_failure_is_error() {
        let mut state = FittedImageState::new("a.jpg");
        let probe = state.resize(square(200.0)).unwrap();
        state.probe_succeeded(probe.token, ImageDimensions::new(100, 100));
        state.display_failed();
        assert_eq!(state.phase(), &FitPhase::Error);
    }
}
