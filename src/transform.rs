//! Geometric transform engine.
//!
//! Keeps line boxes, baselines and rotation offsets consistent with the
//! word boxes they are derived from. Every path that changes a word box must
//! finish with [`recompute_line_bbox`] on the owning line.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{AngleAdjustment, BBox, Dimensions, Line, Page, PageFrame};

/// Angles at or below this magnitude (degrees) are treated as zero.
pub const ANGLE_DEAD_ZONE: f64 = 0.05;

fn in_dead_zone(angle: f64) -> bool {
    angle.abs() <= ANGLE_DEAD_ZONE
}

/// Horizontal and vertical shifts that move rotation about the image center
/// back to rotation about the origin.
fn center_shift(sin_angle: f64, dims: Dimensions) -> (f64, f64) {
    let shift_x = -sin_angle * (dims.width * 0.5);
    let shift_y = sin_angle * ((dims.height - shift_x) * 0.5);
    (shift_x, shift_y)
}

/// Set the line box to the union of its word boxes.
///
/// Returns `false` and leaves the box untouched when the line has no words.
pub fn recompute_line_bbox(line: &mut Line) -> bool {
    match BBox::union_all(line.words.iter().map(|w| &w.bbox)) {
        Some(union) => {
            line.bbox = union;
            true
        }
        None => false,
    }
}

/// Rotate a single word box.
///
/// The box is moved by the displacement of one pivot point near its lower
/// left corner (a third of the height above the bottom, to sit above
/// descenders). Only exact at angle 0 and only usable for narrow boxes;
/// lines go through [`rotate_line`].
pub fn rotate_bbox(bbox: &BBox, cos_angle: f64, sin_angle: f64, shift_x: f64, shift_y: f64) -> BBox {
    let x = bbox.left - shift_x / 2.0;
    let y = bbox.bottom - bbox.height() / 3.0 - shift_y / 2.0;

    let shifted = BBox::new(
        bbox.left - shift_x,
        bbox.top - shift_y,
        bbox.right - shift_x,
        bbox.bottom - shift_y,
    );

    let adj_y = (1.0 - cos_angle) * y - sin_angle * shifted.left;
    let x_rot = x * cos_angle - sin_angle * y;
    let adj_x = x - x_rot;

    BBox::new(
        (shifted.left - adj_x).round(),
        (shifted.top - adj_y).round(),
        (shifted.right - adj_x).round(),
        (shifted.bottom - adj_y).round(),
    )
}

/// Rotate a line and its words in place by `angle` degrees.
///
/// Words are rotated individually and the line box is rebuilt from them.
/// The baseline intercept absorbs the difference between a naively rotated
/// line box and the rebuilt one; the baseline slope gains the rotation.
pub fn rotate_line(line: &mut Line, angle: f64, dims: Dimensions) {
    if in_dead_zone(angle) {
        return;
    }

    let angle_rad = angle.to_radians();
    let (sin_angle, cos_angle) = angle_rad.sin_cos();
    let (shift_x, shift_y) = center_shift(sin_angle, dims);

    let slope = (line.baseline.slope.atan() + angle_rad).tan();

    for word in line.words.iter_mut() {
        word.bbox = rotate_bbox(&word.bbox, cos_angle, sin_angle, shift_x, shift_y);
    }

    let naive = rotate_bbox(&line.bbox, cos_angle, sin_angle, shift_x, shift_y);
    if !recompute_line_bbox(line) {
        line.bbox = naive;
    }

    line.baseline.slope = slope;
    line.baseline.intercept += naive.bottom - line.bbox.bottom;
    line.angle_adj = None;
}

/// Rotate every line of a page by `angle` degrees using the page dimensions.
pub fn rotate_page(page: &mut Page, angle: f64) {
    if in_dead_zone(angle) {
        return;
    }
    let dims = page.dims;
    log::debug!(
        "Rotating {} lines on page {} by {:.3} degrees",
        page.lines.len(),
        page.n,
        angle
    );
    page.lines
        .par_iter_mut()
        .for_each(|line| rotate_line(line, angle, dims));
}

/// Offset that places a rotation-corrected line on an unrotated surface.
///
/// Computed once per line and memoized; zero when the page angle is within
/// the dead zone.
pub fn line_angle_adjustment(line: &mut Line, frame: PageFrame) -> AngleAdjustment {
    if let Some(adj) = line.angle_adj {
        return adj;
    }

    let adj = if in_dead_zone(frame.angle) {
        AngleAdjustment::default()
    } else {
        let (sin_angle, cos_angle) = frame.angle.to_radians().sin_cos();
        let (shift_x, shift_y) = center_shift(sin_angle, frame.dims);

        let x = line.bbox.left;
        let y = line.bbox.bottom + line.baseline.intercept;

        let x_rot = x * cos_angle - sin_angle * y;
        let adj_x = x - x_rot;
        let adj_y = -sin_angle * (line.bbox.left + adj_x / 2.0);

        AngleAdjustment {
            x: adj_x + shift_x,
            y: adj_y + shift_y,
        }
    };

    line.angle_adj = Some(adj);
    adj
}

/// Replace a word's box and rebuild its line box.
pub fn set_word_bbox(page: &mut Page, id: &str, bbox: BBox) -> Result<()> {
    for line in page.lines.iter_mut() {
        if let Some(word) = line.words.iter_mut().find(|w| w.id == id) {
            word.bbox = bbox;
            recompute_line_bbox(line);
            line.angle_adj = None;
            return Ok(());
        }
    }
    Err(Error::WordNotFound(id.to_string()))
}
