//! Square crop geometry
//!
//! The crop is always the largest centered square of the source image,
//! shifted by a signed offset and clamped back inside the image. The same
//! functions serve the on-screen preview (display space) and the export
//! (source space); callers scale the inputs, never the math.

use cgmath::Vector2;

/// A square crop region: top-left corner plus side length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// A crop region snapped to whole source pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Top-left corner of the centered square before any offset is applied
fn base_origin(width: f32, height: f32) -> Vector2<f32> {
    let size = width.min(height);

    if width > height {
        Vector2::new(((width - size) / 2.0).floor(), 0.0)
    } else {
        Vector2::new(0.0, ((height - size) / 2.0).floor())
    }
}

/// Compute the square crop rectangle for an image and an offset.
///
/// The side is `min(width, height)`. The offset moves the square away from
/// its centered position and the result is clamped so the square never
/// leaves `[0, width] x [0, height]`, however large the offset is.
pub fn compute_crop_rect(width: f32, height: f32, offset: Vector2<f32>) -> CropRect {
    let size = width.min(height);
    let base = base_origin(width, height);

    let x = (base.x + offset.x).max(0.0).min(width - size);
    let y = (base.y + offset.y).max(0.0).min(height - size);

    CropRect { x, y, size }
}

/// Offset that produces the same rectangle as `offset` but stays in range.
///
/// Dragging past an edge leaves the raw offset outside the valid range; once
/// stored, that excess would have to be dragged back before the square moves
/// again. Clamping before storing removes it.
pub fn clamp_offset(width: f32, height: f32, offset: Vector2<f32>) -> Vector2<f32> {
    let rect = compute_crop_rect(width, height, offset);
    let base = base_origin(width, height);

    Vector2::new(rect.x - base.x, rect.y - base.y)
}

impl CropRect {
    /// Snap to whole pixels of a `width` x `height` image.
    ///
    /// Offsets coming from pointer drags are fractional; the origin is
    /// rounded and clamped again so rounding can never push the square past
    /// the right or bottom edge.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let size = width.min(height);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let x = (self.x.round().max(0.0) as u32).min(width - size);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let y = (self.y.round().max(0.0) as u32).min(height - size);

        PixelRect { x, y, size }
    }

    /// Positions of the two rule-of-thirds guides along one axis
    pub fn thirds(&self) -> [f32; 2] {
        [self.size / 3.0, (self.size / 3.0) * 2.0]
    }
}

/// Pixel crop rectangle of a source image, straight from its dimensions
pub fn pixel_crop_rect(width: u32, height: u32, offset: Vector2<f32>) -> PixelRect {
    compute_crop_rect(width as f32, height as f32, offset).to_pixels(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, size: f32) -> CropRect {
        CropRect { x, y, size }
    }

    #[test]
    fn test_landscape_is_centered_horizontally() {
        let r = compute_crop_rect(1200.0, 800.0, Vector2::new(0.0, 0.0));
        assert_eq!(r, rect(200.0, 0.0, 800.0));
    }

    #[test]
    fn test_portrait_is_centered_vertically() {
        let r = compute_crop_rect(600.0, 1000.0, Vector2::new(0.0, 0.0));
        assert_eq!(r, rect(0.0, 200.0, 600.0));
    }

    #[test]
    fn test_odd_difference_floors_base() {
        // (801 - 400) / 2 = 200.5 -> 200
        let r = compute_crop_rect(801.0, 400.0, Vector2::new(0.0, 0.0));
        assert_eq!(r, rect(200.0, 0.0, 400.0));
    }

    #[test]
    fn test_square_image_has_no_base_offset() {
        let r = compute_crop_rect(512.0, 512.0, Vector2::new(0.0, 0.0));
        assert_eq!(r, rect(0.0, 0.0, 512.0));

        // Only position possible, offsets clamp back to the origin
        let r = compute_crop_rect(512.0, 512.0, Vector2::new(40.0, -25.0));
        assert_eq!(r, rect(0.0, 0.0, 512.0));
    }

    #[test]
    fn test_negative_offset_clamps_to_left_edge() {
        let r = compute_crop_rect(1200.0, 800.0, Vector2::new(-500.0, 0.0));
        assert_eq!(r, rect(0.0, 0.0, 800.0));
    }

    #[test]
    fn test_offset_moves_within_range() {
        let r = compute_crop_rect(1200.0, 800.0, Vector2::new(150.0, 0.0));
        assert_eq!(r, rect(350.0, 0.0, 800.0));

        let r = compute_crop_rect(600.0, 1000.0, Vector2::new(0.0, -120.5));
        assert_eq!(r, rect(0.0, 79.5, 600.0));
    }

    #[test]
    fn test_huge_offsets_stay_inside_bounds() {
        let dims = [(1200.0, 800.0), (800.0, 1200.0), (333.0, 334.0), (1.0, 9000.0)];
        let offsets = [
            (100_000.0, 100_000.0),
            (-100_000.0, -100_000.0),
            (100_000.0, -100_000.0),
            (-3.25, 7.75),
        ];

        for &(w, h) in &dims {
            for &(ox, oy) in &offsets {
                let r = compute_crop_rect(w, h, Vector2::new(ox, oy));
                assert_eq!(r.size, f32::min(w, h));
                assert!(r.x >= 0.0 && r.x <= w - r.size, "x out of range for {w}x{h}");
                assert!(r.y >= 0.0 && r.y <= h - r.size, "y out of range for {w}x{h}");
            }
        }
    }

    #[test]
    fn test_is_pure() {
        let offset = Vector2::new(-37.5, 12.0);
        let first = compute_crop_rect(1920.0, 1080.0, offset);
        let second = compute_crop_rect(1920.0, 1080.0, offset);
        assert_eq!(first, second);
    }

    #[test]
    fn test_clamp_offset_is_fixed_point() {
        let clamped = clamp_offset(1200.0, 800.0, Vector2::new(-500.0, 40.0));
        assert_eq!(clamped, Vector2::new(-200.0, 0.0));

        // Same rectangle, and clamping again changes nothing
        assert_eq!(
            compute_crop_rect(1200.0, 800.0, clamped),
            compute_crop_rect(1200.0, 800.0, Vector2::new(-500.0, 40.0)),
        );
        assert_eq!(clamp_offset(1200.0, 800.0, clamped), clamped);
    }

    #[test]
    fn test_clamp_offset_keeps_valid_offset() {
        let offset = Vector2::new(0.0, 55.0);
        assert_eq!(clamp_offset(600.0, 1000.0, offset), offset);
    }

    #[test]
    fn test_to_pixels_rounds_and_clamps() {
        let r = rect(199.6, 0.0, 800.0);
        assert_eq!(r.to_pixels(1200, 800), PixelRect { x: 200, y: 0, size: 800 });

        // Rounding up at the right edge must not overflow the image
        let r = rect(399.7, 0.0, 800.0);
        assert_eq!(r.to_pixels(1199, 800), PixelRect { x: 399, y: 0, size: 800 });
    }

    #[test]
    fn test_pixel_crop_rect_scenario() {
        assert_eq!(
            pixel_crop_rect(1200, 800, Vector2::new(0.0, 0.0)),
            PixelRect { x: 200, y: 0, size: 800 },
        );
        assert_eq!(
            pixel_crop_rect(1200, 800, Vector2::new(-500.0, 0.0)),
            PixelRect { x: 0, y: 0, size: 800 },
        );
    }

    #[test]
    fn test_thirds() {
        let [a, b] = rect(0.0, 0.0, 300.0).thirds();
        assert_eq!(a, 100.0);
        assert_eq!(b, 200.0);
    }
}
