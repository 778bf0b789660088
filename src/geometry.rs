//! Split-view geometry for the before/after comparison
//!
//! The processed image always renders at full width underneath. The original
//! image sits in a right-anchored panel covering `100 - position` percent of
//! the container. Inside that panel the original is widened to
//! `100 / (100 - position) * 100` percent of the panel and shifted by
//! `position / (100 - position) * 100` percent of its own width, so its
//! visual scale matches the processed image at every slider position.
//!
//! At `position = 100` the panel has zero width and is omitted entirely; the
//! quotients above are never evaluated with a zero denominator.

use serde::{Deserialize, Serialize};

/// Slider position the comparison starts at
pub const DEFAULT_SLIDER_POSITION: u8 = 50;

/// Largest slider position
pub const MAX_SLIDER_POSITION: u8 = 100;

/// Placement of the original image inside the comparison container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginalPanel {
    /// Panel width as a percentage of the container, anchored right
    pub width_percent: f64,
    /// Width of the original image as a percentage of the panel
    pub image_width_percent: f64,
    /// Horizontal translation of the original image, percent of its own width
    pub offset_percent: f64,
}

/// Rendering parameters for one slider position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonLayout {
    /// Slider position this layout was computed for (0-100)
    pub position: u8,
    /// Visible share of the processed image, measured from the left edge
    pub processed_clip_percent: f64,
    /// Original image panel; `None` when the panel has zero width
    pub original_panel: Option<OriginalPanel>,
    /// Divider line offset from the left edge, independent of the panel math
    pub divider_percent: f64,
}

impl ComparisonLayout {
    /// Panel width, zero when the panel is omitted
    #[must_use]
    pub fn original_panel_width_percent(&self) -> f64 {
        self.original_panel.map_or(0.0, |panel| panel.width_percent)
    }

    /// Original image offset, zero when the panel is omitted
    #[must_use]
    pub fn original_offset_percent(&self) -> f64 {
        self.original_panel.map_or(0.0, |panel| panel.offset_percent)
    }

    /// Column at which the original panel starts for a container `width` pixels wide
    #[must_use]
    pub fn split_column(&self, width: u32) -> u32 {
        let column = (f64::from(width) * f64::from(self.position) / 100.0).round();
        (column as u32).min(width)
    }
}

/// Compute the comparison layout for a slider position
///
/// Positions above 100 are treated as 100, keeping the function total.
#[must_use]
pub fn layout(position: u8) -> ComparisonLayout {
    let position = position.min(MAX_SLIDER_POSITION);
    let remaining = u32::from(MAX_SLIDER_POSITION - position);

    let original_panel = if remaining == 0 {
        None
    } else {
        let remaining = f64::from(remaining);
        Some(OriginalPanel {
            width_percent: remaining,
            image_width_percent: 100.0 / remaining * 100.0,
            offset_percent: f64::from(position) / remaining * 100.0,
        })
    };

    ComparisonLayout {
        position,
        processed_clip_percent: f64::from(position),
        original_panel,
        divider_percent: f64::from(position),
    }
}
