//! Contain-fit calculation for displaying an image inside a container.
//!
//! Pure functions only; no I/O.

/// Intrinsic pixel size of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Measured size of the element the image is displayed in. Layout engines
/// report fractional pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

/// Display size of an image after fitting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDimensions {
    pub width: u32,
    pub height: u32,
    /// Ratio of display size to intrinsic size, never above 1.0
    pub scale: f64,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whole pixels available in each direction
    fn whole_pixels(&self) -> (f64, f64) {
        let clamp = |v: f64| if v.is_finite() { v.max(0.0).floor() } else { 0.0 };
        (clamp(self.width), clamp(self.height))
    }

    /// A container narrower or shorter than one pixel cannot show anything
    pub fn is_empty(&self) -> bool {
        let (w, h) = self.whole_pixels();
        w < 1.0 || h < 1.0
    }
}

/// Calculates the largest rectangle with the image's aspect ratio that fits
/// inside the container, without scaling past the image's native size.
///
/// Returns `None` when the image has a zero dimension or the container is
/// empty.
///
/// # Examples
/// ```
/// use photo_gallery::fit::{fit_image, ContainerSize, ImageDimensions};
///
/// let fit = fit_image(ImageDimensions::new(1600, 900), ContainerSize::new(800.0, 800.0)).unwrap();
/// assert_eq!((fit.width, fit.height), (800, 450));
/// assert_eq!(fit.scale, 0.5);
/// ```
pub fn fit_image(image: ImageDimensions, container: ContainerSize) -> Option<FitDimensions> {
    if image.width == 0 || image.height == 0 || container.is_empty() {
        return None;
    }

    let (cw, ch) = container.whole_pixels();
    let image_aspect = image.aspect_ratio();
    let container_aspect = cw / ch;

    let (fit_width, fit_height, scale) = if image_aspect > container_aspect {
        // Image is relatively wider: width is the limiting edge
        (cw, cw / image_aspect, cw / image.width as f64)
    } else {
        (ch * image_aspect, ch, ch / image.height as f64)
    };

    if scale >= 1.0 {
        // Never upscale: show at native resolution
        return Some(FitDimensions {
            width: image.width,
            height: image.height,
            scale: 1.0,
        });
    }

    Some(FitDimensions {
        width: (fit_width.round() as u32).max(1),
        height: (fit_height.round() as u32).max(1),
        scale,
    })
}
