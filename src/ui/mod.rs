/// User interface module
///
/// This module handles:
/// - Crop overlay geometry and drawing (overlay.rs)
/// - The interactive canvas on top of the editor preview (canvas.rs)
/// - The crop editor view (editor.rs)
/// - The thumbnail grid (grid.rs)
/// - Export options and batch actions (export_panel.rs)

pub mod overlay;
pub mod canvas;
pub mod editor;
pub mod grid;
pub mod export_panel;
