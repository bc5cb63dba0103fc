//! Crop preview rendering
//!
//! Fits the source image into a bounded preview, maps the crop into display
//! space and draws the overlay (dimmed mask, border, rule-of-thirds guides)
//! onto any `Surface`. All geometry comes from `crate::crop`; nothing here
//! does crop math of its own.

use cgmath::Vector2;
use iced::widget::canvas::{self, fill, Fill, Frame, Path, Stroke};
use iced::{Color, Point, Size};

use crate::crop::{self, CropRect};

/// Dimmed area outside the crop
pub const MASK_COLOR: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.5);
pub const BORDER_COLOR: Color = Color::WHITE;
pub const BORDER_WIDTH: f32 = 2.0;
pub const GRID_COLOR: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.5);
pub const GRID_WIDTH: f32 = 1.0;

/// Uniform scale that fits an image inside a square bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLayout {
    /// Source image size in pixels
    pub source: Size,
    /// Display-to-source ratio, never above 1
    pub scale: f32,
}

impl PreviewLayout {
    /// Fit `width` x `height` so the longer side is at most `max_side`
    pub fn fit(width: u32, height: u32, max_side: f32) -> Self {
        let longest = width.max(height).max(1) as f32;
        let scale = (max_side / longest).min(1.0);

        Self {
            source: Size::new(width as f32, height as f32),
            scale,
        }
    }

    /// Size of the preview on screen
    pub fn display_size(&self) -> Size {
        Size::new(self.source.width * self.scale, self.source.height * self.scale)
    }
}

/// One guide line of the rule-of-thirds grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub from: Point,
    pub to: Point,
}

/// Everything the overlay needs, in display coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    pub canvas: Size,
    pub crop: CropRect,
}

impl OverlayGeometry {
    /// Run the crop geometry on the display size with the offset scaled
    /// into display space
    pub fn new(layout: &PreviewLayout, offset: Vector2<f32>) -> Self {
        let canvas = layout.display_size();
        let crop = crop::compute_crop_rect(canvas.width, canvas.height, offset * layout.scale);

        Self { canvas, crop }
    }

    /// Two vertical then two horizontal guides at thirds of the crop
    pub fn guides(&self) -> [Guide; 4] {
        let CropRect { x, y, size } = self.crop;
        let [a, b] = self.crop.thirds();

        [
            Guide { from: Point::new(x + a, y), to: Point::new(x + a, y + size) },
            Guide { from: Point::new(x + b, y), to: Point::new(x + b, y + size) },
            Guide { from: Point::new(x, y + a), to: Point::new(x + size, y + a) },
            Guide { from: Point::new(x, y + b), to: Point::new(x + size, y + b) },
        ]
    }
}

/// A 2D drawing target for the overlay
pub trait Surface {
    /// Fill `bounds` except the square `hole` (even-odd rule)
    fn fill_with_hole(&mut self, bounds: Size, hole: CropRect, color: Color);

    /// Outline a square
    fn stroke_square(&mut self, square: CropRect, width: f32, color: Color);

    /// Draw a straight line
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color);
}

/// Draw the full overlay. Called on every redraw; nothing is cached.
pub fn render_overlay<S: Surface>(surface: &mut S, geometry: &OverlayGeometry) {
    surface.fill_with_hole(geometry.canvas, geometry.crop, MASK_COLOR);
    surface.stroke_square(geometry.crop, BORDER_WIDTH, BORDER_COLOR);

    for guide in geometry.guides() {
        surface.stroke_line(guide.from, guide.to, GRID_WIDTH, GRID_COLOR);
    }
}

fn square_path(builder: &mut canvas::path::Builder, square: CropRect) {
    builder.rectangle(Point::new(square.x, square.y), Size::new(square.size, square.size));
}

/// iced canvas frames as overlay targets
impl Surface for Frame {
    fn fill_with_hole(&mut self, bounds: Size, hole: CropRect, color: Color) {
        let path = Path::new(|builder| {
            builder.rectangle(Point::ORIGIN, bounds);
            square_path(builder, hole);
        });

        self.fill(
            &path,
            Fill {
                style: canvas::Style::Solid(color),
                rule: fill::Rule::EvenOdd,
            },
        );
    }

    fn stroke_square(&mut self, square: CropRect, width: f32, color: Color) {
        let path = Path::new(|builder| square_path(builder, square));
        self.stroke(&path, Stroke::default().with_color(color).with_width(width));
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        let path = Path::line(from, to);
        self.stroke(&path, Stroke::default().with_color(color).with_width(width));
    }
}
