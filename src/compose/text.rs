use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

use crate::config::OverlayConfig;

const GLYPH_PX: u32 = 8;

/// Colours and spacing for the description block.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    pub margin: u32,
    pub text: Rgba<u8>,
    pub background: Rgba<u8>,
}

impl From<&OverlayConfig> for OverlayStyle {
    fn from(config: &OverlayConfig) -> Self {
        let [r, g, b] = config.text_color;
        let [br, bg, bb] = config.background;
        Self {
            margin: config.margin,
            text: Rgba([r, g, b, 255]),
            background: Rgba([br, bg, bb, 255]),
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::from(&OverlayConfig::default())
    }
}

pub enum TextRenderer {
    TrueType { font: FontVec, scale: PxScale },
    /// Embedded 8x8 glyphs, scaled by an integer factor.
    Bitmap { factor: u32 },
}

impl TextRenderer {
    /// Load a TrueType/OpenType font, falling back to the bitmap glyphs when
    /// the file is missing or unreadable.
    pub fn load(path: &Path, size: f32) -> Self {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "font unavailable, using bitmap glyphs");
                return Self::bitmap(size);
            }
        };
        match FontVec::try_from_vec(data) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), size, "loaded font");
                Self::TrueType {
                    font,
                    scale: PxScale::from(size),
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid font file, using bitmap glyphs");
                Self::bitmap(size)
            }
        }
    }

    pub fn bitmap(size: f32) -> Self {
        let factor = ((size / GLYPH_PX as f32).round() as u32).max(1);
        Self::Bitmap { factor }
    }

    pub fn line_height(&self) -> u32 {
        match self {
            Self::TrueType { font, scale } => {
                let scaled = font.as_scaled(*scale);
                (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
            }
            Self::Bitmap { factor } => (GLYPH_PX + 1) * factor,
        }
    }

    /// Rendered width of `text` in pixels.
    pub fn measure(&self, text: &str) -> u32 {
        match self {
            Self::TrueType { font, scale } => text_size(*scale, font, text).0,
            Self::Bitmap { factor } => text.chars().count() as u32 * GLYPH_PX * factor,
        }
    }

    pub fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        match self {
            Self::TrueType { font, scale } => draw_text_mut(canvas, color, x, y, *scale, font, text),
            Self::Bitmap { factor } => draw_bitmap_text(canvas, x, y, *factor, color, text),
        }
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(canvas: &mut RgbaImage, x: i32, y: i32, factor: u32, color: Rgba<u8>, text: &str) {
    let (width, height) = canvas.dimensions();
    let advance = (GLYPH_PX * factor) as i32;
    let factor = factor as i32;

    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as i32 * advance;
        // Row bytes, least significant bit is the leftmost column.
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_PX as i32 {
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                for dy in 0..factor {
                    for dx in 0..factor {
                        let px = origin_x + col * factor + dx;
                        let py = y + row as i32 * factor + dy;
                        if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                            canvas.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Draw `description` as a block anchored to the bottom-left corner, over a
/// filled background. Returns the number of lines drawn; lines that do not fit
/// vertically are dropped from the end.
pub fn draw_description(
    image: &mut RgbaImage,
    description: &str,
    renderer: &TextRenderer,
    style: &OverlayStyle,
) -> usize {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return 0;
    }

    let max_width = width.saturating_sub(style.margin.saturating_mul(2)).max(1);
    let mut lines = wrap_text(description, max_width, |s| renderer.measure(s));

    let line_height = renderer.line_height().max(1);
    let max_lines = (height / line_height) as usize;
    if lines.len() > max_lines {
        tracing::debug!(dropped = lines.len() - max_lines, "description taller than image");
        lines.truncate(max_lines);
    }
    if lines.is_empty() {
        return 0;
    }

    let x = style.margin.min(width - 1);
    let block_width = lines
        .iter()
        .map(|l| renderer.measure(l))
        .max()
        .unwrap_or(0)
        .clamp(1, width - x);
    let block_height = line_height * lines.len() as u32;
    let y = height - block_height;

    draw_filled_rect_mut(
        image,
        Rect::at(x as i32, y as i32).of_size(block_width, block_height),
        style.background,
    );
    for (i, line) in lines.iter().enumerate() {
        let line_y = y + i as u32 * line_height;
        renderer.draw(image, x as i32, line_y as i32, style.text, line);
    }
    lines.len()
}
