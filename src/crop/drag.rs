//! Drag-to-reposition controller
//!
//! Tracks pointer drags over the preview and turns them into crop offset
//! deltas in source-image pixels. Tracking is incremental: every move is
//! measured from the previous pointer position, not from where the drag
//! started. No clamping happens here; the geometry clamps on the next render.

use cgmath::{Point2, Vector2};

/// Pointer drag state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragController {
    #[default]
    Idle,
    Dragging {
        /// Last pointer position in display coordinates
        last: Point2<f32>,
    },
}

impl DragController {
    /// Pointer pressed inside the preview surface
    pub fn press(&mut self, position: Point2<f32>) {
        *self = DragController::Dragging { last: position };
    }

    /// Pointer moved to `position` (display coordinates).
    ///
    /// Returns the source-space delta to add to the current offset, or
    /// `None` while idle. `scale` is the display-to-source ratio of the
    /// preview; a non-positive scale cannot be inverted and yields nothing.
    pub fn moved(&mut self, position: Point2<f32>, scale: f32) -> Option<Vector2<f32>> {
        let DragController::Dragging { last } = *self else {
            return None;
        };

        if scale <= 0.0 {
            return None;
        }

        let delta = (position - last) / scale;
        *self = DragController::Dragging { last: position };

        Some(delta)
    }

    /// Pointer released or left the preview
    pub fn release(&mut self) {
        *self = DragController::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragController::Dragging { .. })
    }
}
