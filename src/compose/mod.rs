//! Decode, shrink-to-fit, and caption the downloaded image.

pub mod text;

use crate::error::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

pub use text::{draw_description, wrap_text, OverlayStyle, TextRenderer};

/// Target screen resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<crate::config::DisplayConfig> for Resolution {
    fn from(display: crate::config::DisplayConfig) -> Self {
        Self::new(display.width, display.height)
    }
}

pub struct ComposedImage {
    pub bitmap: RgbaImage,
    /// Dimensions of the decoded image before resizing.
    pub original: (u32, u32),
    pub lines_drawn: usize,
}

impl ComposedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.bitmap.dimensions()
    }
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Largest size that fits inside the target without changing the aspect
/// ratio. Never scales up.
pub fn fit_dimensions(src_width: u32, src_height: u32, target_width: u32, target_height: u32) -> (u32, u32) {
    if src_width == 0 || src_height == 0 {
        return (src_width, src_height);
    }

    let x_ratio = target_width as f64 / src_width as f64;
    let y_ratio = target_height as f64 / src_height as f64;
    let scale = x_ratio.min(y_ratio).min(1.0);
    if scale >= 1.0 {
        return (src_width, src_height);
    }

    let width = ((src_width as f64 * scale).round() as u32).clamp(1, target_width.max(1));
    let height = ((src_height as f64 * scale).round() as u32).clamp(1, target_height.max(1));
    (width, height)
}

pub fn resize_to_fit(image: &DynamicImage, target: Resolution) -> RgbaImage {
    let (width, height) = (image.width(), image.height());
    let (new_width, new_height) = fit_dimensions(width, height, target.width, target.height);

    if (new_width, new_height) == (width, height) {
        tracing::debug!(width, height, "image already fits, not resizing");
        return image.to_rgba8();
    }

    tracing::info!(
        from = %format!("{}x{}", width, height),
        to = %format!("{}x{}", new_width, new_height),
        "resizing image"
    );
    image
        .resize_exact(new_width, new_height, FilterType::Lanczos3)
        .to_rgba8()
}

/// Decode, resize to fit `target`, and draw the description.
pub fn compose(
    bytes: &[u8],
    target: Resolution,
    description: &str,
    renderer: &TextRenderer,
    style: &OverlayStyle,
) -> Result<ComposedImage> {
    let decoded = decode(bytes)?;
    let original = (decoded.width(), decoded.height());

    let mut bitmap = resize_to_fit(&decoded, target);
    let lines_drawn = draw_description(&mut bitmap, description, renderer, style);
    tracing::debug!(lines = lines_drawn, "description drawn");

    Ok(ComposedImage {
        bitmap,
        original,
        lines_drawn,
    })
}

/// Centre `image` on a black canvas of exactly the target size.
pub fn add_matte(image: &RgbaImage, target: Resolution) -> RgbaImage {
    let mut matte = RgbaImage::from_pixel(target.width, target.height, Rgba([0, 0, 0, 255]));
    let x = target.width.saturating_sub(image.width()) / 2;
    let y = target.height.saturating_sub(image.height()) / 2;
    imageops::overlay(&mut matte, image, x as i64, y as i64);
    matte
}
