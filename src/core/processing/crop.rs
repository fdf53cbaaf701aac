//! Square crop planning around the visible subject of a cut-out image.
//!
//! The planner sizes a square so the padded subject covers `target_ratio` of
//! its area, centers it on the subject, and then reconciles that request with
//! the image bounds. Precedence when they conflict: stay inside the image,
//! contain the subject, stay square, keep an even side, stay centered.
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::params::validate_crop_params;
use crate::core::processing::mask::{BoundingBox, OpacityMask};
use crate::error::Result;
use crate::types::{CropPlan, SkipReason};

/// Any opacity above this counts as part of the subject.
pub const VISIBILITY_THRESHOLD: u8 = 0;

/// Crop region in source coordinates; `right` and `bottom` are exclusive.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CropWindow {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropWindow {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    pub fn contains(&self, bbox: &BoundingBox) -> bool {
        self.left <= bbox.x_min
            && self.top <= bbox.y_min
            && self.right > bbox.x_max
            && self.bottom > bbox.y_max
    }

    fn from_spans(h: Span, v: Span) -> Self {
        Self {
            left: h.start as u32,
            top: v.start as u32,
            right: h.end as u32,
            bottom: v.end as u32,
        }
    }

    fn spans(&self) -> (Span, Span) {
        (
            Span::new(self.left as i64, self.right as i64),
            Span::new(self.top as i64, self.bottom as i64),
        )
    }
}

/// Half-open interval along one axis.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
struct Span {
    start: i64,
    end: i64,
}

impl Span {
    fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    fn len(&self) -> i64 {
        self.end - self.start
    }

    /// Grow by `excess`, half on each side. Growth blocked by `0` or `dim`
    /// moves to the other side; the result never leaves `[0, dim]`.
    fn grow(self, excess: i64, dim: i64) -> Self {
        let before = excess / 2;
        let after = excess - before;
        let mut start = self.start - before;
        let mut end = self.end + after;
        if start < 0 {
            end += -start;
            start = 0;
        }
        if end > dim {
            start -= end - dim;
            end = dim;
        }
        Self::new(start.max(0), end)
    }

    /// Shrink by up to `excess` without cutting into `[lo, hi)`.
    fn trim(self, excess: i64, lo: i64, hi: i64) -> Self {
        let slack_before = (lo - self.start).max(0);
        let slack_after = (self.end - hi).max(0);
        let mut cut_before = (excess / 2).min(slack_before);
        let cut_after = (excess - cut_before).min(slack_after);
        let remaining = excess - cut_before - cut_after;
        cut_before = (cut_before + remaining).min(slack_before);
        Self::new(self.start + cut_before, self.end - cut_after)
    }
}

/// Square side needed for the padded subject to fill `target_ratio` of the
/// frame, truncated and then rounded up to an even number.
pub fn required_side(bbox: &BoundingBox, target_ratio: f64, safety_padding: f64) -> u32 {
    let padded_width = bbox.width() as f64 * (1.0 + safety_padding);
    let padded_height = bbox.height() as f64 * (1.0 + safety_padding);
    let side = (padded_width.max(padded_height) / target_ratio.sqrt()) as u32;
    let side = side.saturating_add(side % 2);
    side.max(2)
}

/// Plan a square crop centered on the visible subject.
///
/// Returns [`CropPlan::NoOp`] when the image has no opacity channel or no
/// visible pixel; the caller is expected to use the source unchanged.
pub fn plan_crop(image: &DynamicImage, target_ratio: f64, safety_padding: f64) -> Result<CropPlan> {
    validate_crop_params(target_ratio, safety_padding)?;

    let Some(mask) = OpacityMask::from_dynamic(image, VISIBILITY_THRESHOLD) else {
        debug!(color = ?image.color(), "No opacity channel, skipping crop");
        return Ok(CropPlan::NoOp(SkipReason::MissingOpacityChannel));
    };
    let Some(bbox) = mask.bounding_box() else {
        debug!("No visible pixels, skipping crop");
        return Ok(CropPlan::NoOp(SkipReason::NoVisibleContent));
    };

    let side = required_side(&bbox, target_ratio, safety_padding);
    let window = plan_window(&bbox, image.width(), image.height(), side);

    info!(
        subject_w = bbox.width(),
        subject_h = bbox.height(),
        requested_side = side,
        left = window.left,
        top = window.top,
        right = window.right,
        bottom = window.bottom,
        "Planned crop window"
    );
    Ok(CropPlan::Crop(window))
}

/// Fit a `side`-long square around `bbox` inside a `width`×`height` image.
pub fn plan_window(bbox: &BoundingBox, width: u32, height: u32, side: u32) -> CropWindow {
    let (cx, cy) = bbox.center();
    let h_span = place_span(bbox.x_min, bbox.x_max + 1, cx, side, width);
    let v_span = place_span(bbox.y_min, bbox.y_max + 1, cy, side, height);

    let window = CropWindow::from_spans(h_span, v_span);
    let window = square_up(window, bbox, width, height);
    let window = even_up(window, bbox, width, height);

    if !window.is_square() {
        warn!(
            width = window.width(),
            height = window.height(),
            image_w = width,
            image_h = height,
            "Subject does not fit a square inside the image; crop window left rectangular"
        );
    }
    window
}

/// Place a centered span of `len` along one axis, keep it inside `[0, dim]`,
/// and make it cover `[lo, hi)`.
fn place_span(lo: u32, hi: u32, center: u32, len: u32, dim: u32) -> Span {
    let (lo, hi, dim) = (lo as i64, hi as i64, dim as i64);
    let len = (len as i64).min(dim);

    let mut start = center as i64 - len / 2;
    let mut end = start + len;

    // Overflow past the far edge shifts the span back instead of shrinking it.
    if end > dim {
        let shift = end - dim;
        end = dim;
        start = (start - shift).max(0);
    }
    // Unused room on the far side is reclaimed when pushed against 0.
    if start < 0 {
        end = (end - start).min(dim);
        start = 0;
    }

    if end - start >= hi - lo {
        if start > lo {
            let d = start - lo;
            start -= d;
            end -= d;
        }
        if end < hi {
            let d = hi - end;
            start += d;
            end += d;
        }
    } else {
        start = start.min(lo);
        end = end.max(hi);
    }
    Span::new(start, end)
}

fn square_up(window: CropWindow, bbox: &BoundingBox, width: u32, height: u32) -> CropWindow {
    let (mut h_span, mut v_span) = window.spans();
    let (x_lo, x_hi) = (bbox.x_min as i64, bbox.x_max as i64 + 1);
    let (y_lo, y_hi) = (bbox.y_min as i64, bbox.y_max as i64 + 1);

    if h_span.len() > v_span.len() {
        v_span = v_span.grow(h_span.len() - v_span.len(), height as i64);
        if h_span.len() > v_span.len() {
            h_span = h_span.trim(h_span.len() - v_span.len(), x_lo, x_hi);
        }
    } else if v_span.len() > h_span.len() {
        h_span = h_span.grow(v_span.len() - h_span.len(), width as i64);
        if v_span.len() > h_span.len() {
            v_span = v_span.trim(v_span.len() - h_span.len(), y_lo, y_hi);
        }
    }
    CropWindow::from_spans(h_span, v_span)
}

fn even_up(window: CropWindow, bbox: &BoundingBox, width: u32, height: u32) -> CropWindow {
    if !window.is_square() || window.width() % 2 == 0 {
        return window;
    }
    let side = window.width() as i64;
    let (h_span, v_span) = window.spans();

    let grown_h = h_span.grow(1, width as i64);
    let grown_v = v_span.grow(1, height as i64);
    if grown_h.len() == side + 1 && grown_v.len() == side + 1 {
        return CropWindow::from_spans(grown_h, grown_v);
    }

    let trimmed_h = h_span.trim(1, bbox.x_min as i64, bbox.x_max as i64 + 1);
    let trimmed_v = v_span.trim(1, bbox.y_min as i64, bbox.y_max as i64 + 1);
    if side > 1 && trimmed_h.len() == side - 1 && trimmed_v.len() == side - 1 {
        return CropWindow::from_spans(trimmed_h, trimmed_v);
    }

    debug!(side, "Crop side left odd by image bounds");
    window
}

/// Crop exactly to `window`.
pub fn crop_to_window(image: &DynamicImage, window: &CropWindow) -> DynamicImage {
    image.crop_imm(window.left, window.top, window.width(), window.height())
}
