//! Crop canvas
//!
//! Feeds pointer events on the editor preview into the drag controller and
//! redraws the overlay for the current working offset.

use cgmath::{Point2, Vector2};
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Frame, Program};
use iced::{Point, Rectangle, Renderer, Theme};

use super::overlay::{render_overlay, OverlayGeometry, PreviewLayout};
use crate::crop::DragController;
use crate::Message;

/// Interactive crop overlay drawn over the editor preview
pub struct CropCanvas {
    /// Fit of the source image into the preview
    pub layout: PreviewLayout,
    /// Working offset in source pixels, unclamped while dragging
    pub offset: Vector2<f32>,
}

fn to_point2(position: Point) -> Point2<f32> {
    Point2::new(position.x, position.y)
}

impl Program<Message> for CropCanvas {
    type State = DragController;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        // Full redraw every time the offset changes
        let mut frame = Frame::new(renderer, bounds.size());
        let geometry = OverlayGeometry::new(&self.layout, self.offset);

        render_overlay(&mut frame, &geometry);

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse button press inside the preview - start dragging
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    state.press(to_point2(pos));
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - stop dragging
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_dragging() {
                    state.release();
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Cursor left the window
            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                state.release();
            }

            // Mouse move - shift the crop if dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_dragging() {
                    let Some(pos) = cursor.position_in(bounds) else {
                        // Left the preview
                        state.release();
                        return (canvas::event::Status::Captured, None);
                    };

                    if let Some(delta) = state.moved(to_point2(pos), self.layout.scale) {
                        return (canvas::event::Status::Captured, Some(Message::CropDragged(delta)));
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.is_dragging() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Size;

    fn crop_canvas() -> CropCanvas {
        // 1000x500 source shown at 500x250
        CropCanvas {
            layout: PreviewLayout::fit(1000, 500, 500.0),
            offset: Vector2::new(0.0, 0.0),
        }
    }

    fn bounds() -> Rectangle {
        Rectangle::new(Point::ORIGIN, Size::new(500.0, 250.0))
    }

    fn press() -> canvas::Event {
        canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left))
    }

    fn move_to(x: f32, y: f32) -> (canvas::Event, Cursor) {
        let position = Point::new(x, y);
        (
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }),
            Cursor::Available(position),
        )
    }

    #[test]
    fn test_press_outside_preview_is_ignored() {
        let widget = crop_canvas();
        let mut state = DragController::default();

        let (status, message) =
            widget.update(&mut state, press(), bounds(), Cursor::Available(Point::new(600.0, 100.0)));

        assert_eq!(status, canvas::event::Status::Ignored);
        assert!(message.is_none());
        assert!(!state.is_dragging());
    }

    #[test]
    fn test_drag_emits_source_space_delta() {
        let widget = crop_canvas();
        let mut state = DragController::default();

        let (status, _) =
            widget.update(&mut state, press(), bounds(), Cursor::Available(Point::new(100.0, 100.0)));
        assert_eq!(status, canvas::event::Status::Captured);
        assert!(state.is_dragging());

        let (event, cursor) = move_to(110.0, 95.0);
        let (_, message) = widget.update(&mut state, event, bounds(), cursor);

        // Display scale is 0.5
        assert!(matches!(
            message,
            Some(Message::CropDragged(delta)) if delta == Vector2::new(20.0, -10.0)
        ));
    }

    #[test]
    fn test_leaving_preview_ends_drag() {
        let widget = crop_canvas();
        let mut state = DragController::default();
        widget.update(&mut state, press(), bounds(), Cursor::Available(Point::new(100.0, 100.0)));

        let (event, cursor) = move_to(520.0, 100.0);
        let (_, message) = widget.update(&mut state, event, bounds(), cursor);
        assert!(message.is_none());
        assert!(!state.is_dragging());

        // Moving back in does not resume without a new press
        let (event, cursor) = move_to(120.0, 100.0);
        let (_, message) = widget.update(&mut state, event, bounds(), cursor);
        assert!(message.is_none());
    }

    #[test]
    fn test_cursor_left_window_and_release_end_drag() {
        let widget = crop_canvas();
        let inside = Cursor::Available(Point::new(100.0, 100.0));

        let mut state = DragController::default();
        widget.update(&mut state, press(), bounds(), inside);
        widget.update(&mut state, canvas::Event::Mouse(mouse::Event::CursorLeft), bounds(), Cursor::Unavailable);
        assert!(!state.is_dragging());

        widget.update(&mut state, press(), bounds(), inside);
        let (status, _) = widget.update(
            &mut state,
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)),
            bounds(),
            inside,
        );
        assert_eq!(status, canvas::event::Status::Captured);
        assert!(!state.is_dragging());
    }
}
