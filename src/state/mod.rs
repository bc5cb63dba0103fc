/// State management module
///
/// This module handles all application state, including:
/// - Loaded images and their crop offsets (data.rs)
/// - The in-memory session list and selection (session.rs)
/// - Export settings (settings.rs)

pub mod data;
pub mod session;
pub mod settings;
