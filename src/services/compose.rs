//! Headless rendering of the before/after comparison
//!
//! Produces the same picture the split view shows: the processed image over a
//! checkerboard on the left, the original on a white panel on the right, and
//! a green divider at the slider position.

use crate::{
    error::{ClientError, Result},
    geometry::{self, ComparisonLayout},
    types::ProcessingResult,
};
use image::{imageops, imageops::FilterType, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

const CHECKER_TILE: u32 = 10;
const CHECKER_DARK: Rgba<u8> = Rgba([240, 240, 240, 255]);
const PANEL_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const DIVIDER_COLOR: Rgba<u8> = Rgba([34, 197, 94, 255]);
const DIVIDER_WIDTH: u32 = 4;

/// Renders comparison frames from a processing result
pub struct ComparisonRenderer;

impl ComparisonRenderer {
    /// Render the comparison at `position` (0-100)
    ///
    /// The canvas takes the processed image's dimensions; the original is
    /// resized to match when the two differ.
    pub fn render(result: &ProcessingResult, position: u8) -> Result<RgbaImage> {
        let processed = result.processed_image.decode_image()?.to_rgba8();
        let (width, height) = processed.dimensions();
        if width == 0 || height == 0 {
            return Err(ClientError::decode("processed image has no pixels"));
        }

        let mut original = result.original_image.decode_image()?.to_rgba8();
        if original.dimensions() != (width, height) {
            debug!(
                from_width = original.width(),
                from_height = original.height(),
                width,
                height,
                "Resizing original to match processed image"
            );
            original = imageops::resize(&original, width, height, FilterType::Triangle);
        }

        let layout = geometry::layout(position);
        Ok(Self::compose(&processed, &original, &layout))
    }

    /// Render and save as PNG
    pub fn save_png<P: AsRef<Path>>(
        result: &ProcessingResult,
        position: u8,
        path: P,
    ) -> Result<()> {
        let path_ref = path.as_ref();
        let canvas = Self::render(result, position)?;
        canvas
            .save_with_format(path_ref, image::ImageFormat::Png)
            .map_err(|e| ClientError::export(format!("{}: {}", path_ref.display(), e)))
    }

    fn compose(processed: &RgbaImage, original: &RgbaImage, layout: &ComparisonLayout) -> RgbaImage {
        let (width, height) = processed.dimensions();
        let split = if layout.original_panel.is_some() {
            layout.split_column(width)
        } else {
            width
        };

        let mut canvas = RgbaImage::from_fn(width, height, |x, y| {
            if x < split {
                blend(*processed.get_pixel(x, y), checker(x, y))
            } else {
                blend(*original.get_pixel(x, y), PANEL_BACKGROUND)
            }
        });
        draw_divider(&mut canvas, split);
        canvas
    }
}

/// Vertical divider centred on `split`, clipped to the canvas
fn draw_divider(canvas: &mut RgbaImage, split: u32) {
    let width = canvas.width();
    let start = split.min(width).saturating_sub(DIVIDER_WIDTH / 2);
    let end = (start + DIVIDER_WIDTH).min(width);
    for y in 0..canvas.height() {
        for x in start..end {
            canvas.put_pixel(x, y, DIVIDER_COLOR);
        }
    }
}

fn checker(x: u32, y: u32) -> Rgba<u8> {
    if ((x / CHECKER_TILE) + (y / CHECKER_TILE)) % 2 == 0 {
        CHECKER_DARK
    } else {
        PANEL_BACKGROUND
    }
}

/// Source-over blend onto an opaque background
fn blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let alpha = u32::from(src[3]);
    let mix = |s: u8, d: u8| ((u32::from(s) * alpha + u32::from(d) * (255 - alpha) + 127) / 255) as u8;
    Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255])
}
