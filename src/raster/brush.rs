//! Brush rasterization: capsule segments and the cursor indicator
//!
//! Segments are hard-edged: a pixel is covered when its center lies within the
//! brush radius of the segment. Consecutive segments sharing an endpoint
//! overlap in a full disc there, which gives round joins for free.

use super::{blend, PixelRect};
use crate::types::Point;
use image::{Rgba, RgbaImage};

/// Distance from `p` to the segment `a`-`b`
#[inline]
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > f32::EPSILON {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    ((p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy)).sqrt()
}

/// Paint a round-capped segment of the given radius, returning the pixels visited
///
/// Work is bounded by the segment's bounding box, not the target size. A
/// zero-length segment paints a disc.
pub fn stamp_segment(target: &mut RgbaImage, from: Point, to: Point, radius: f32, color: Rgba<u8>) -> PixelRect {
    // Thin brushes still cover every pixel the centerline crosses
    let reach = radius.max(std::f32::consts::FRAC_1_SQRT_2);
    let (width, height) = target.dimensions();
    let region = PixelRect::from_bounds(
        from.x.min(to.x) - reach,
        from.y.min(to.y) - reach,
        from.x.max(to.x) + reach,
        from.y.max(to.y) + reach,
        width,
        height,
    );

    for y in region.top..region.bottom {
        for x in region.left..region.right {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(center, from, to) <= reach {
                let pixel = target.get_pixel_mut(x, y);
                *pixel = blend::src_over(*pixel, color);
            }
        }
    }

    region
}

/// Draw the translucent brush cursor: a filled disc plus an optional ring
pub fn draw_cursor(target: &mut RgbaImage, center: Point, radius: f32, fill: Rgba<u8>, ring_alpha: u8) {
    let radius = radius.max(0.5);
    let (width, height) = target.dimensions();
    let outer = radius + 1.0;
    let region = PixelRect::from_bounds(
        center.x - outer,
        center.y - outer,
        center.x + outer,
        center.y + outer,
        width,
        height,
    );
    let ring = Rgba([fill[0], fill[1], fill[2], ring_alpha]);

    for y in region.top..region.bottom {
        for x in region.left..region.right {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            let d = (dx * dx + dy * dy).sqrt();
            let paint = if ring_alpha > 0 && (d - radius).abs() <= 0.5 {
                ring
            } else if d <= radius {
                fill
            } else {
                continue;
            };
            let pixel = target.get_pixel_mut(x, y);
            *pixel = blend::src_over(*pixel, paint);
        }
    }
}
