use cgmath::Vector2;
use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{event, window, Alignment, Color, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

mod config;
mod crop;
mod files;
mod state;
mod ui;

use config::AppConfig;
use files::archive::{self, ARCHIVE_NAME};
use files::export::{self, EXPORT_FAILED};
use files::loader::{self, LoadOutcome};
use files::thumbnail::{self, Thumbnail};
use state::data::ImageRecord;
use state::session::Session;
use state::settings::{normalize_export_size, CropSettings};
use ui::editor::Editor;

/// Shown when a load fails outright
const LOAD_FAILED: &str = "An error occurred while processing the images.";

/// The window reports one event per dropped file; wait this long after the
/// first one so the whole drop is loaded as one batch
const DROP_SETTLE: Duration = Duration::from_millis(150);

/// Main application state
struct SquareCropper {
    /// Startup defaults
    config: AppConfig,
    /// Loaded images and the current selection
    session: Session,
    /// Open crop editor, if any
    editor: Option<Editor>,
    /// Export size slider value
    export_size: u32,
    /// "Maintain original size" toggle
    maintain_original_size: bool,
    /// A load or export is running
    busy: bool,
    /// Dropped files waiting to be loaded together
    pending_drops: Vec<PathBuf>,
    /// Status message to display to the user
    status: String,
    /// User-visible warning or error
    error: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Add Images"
    PickFiles,
    /// User clicked "Import Folder"
    ImportFolder,
    /// One file dropped onto the window
    FileDropped(PathBuf),
    /// No more files from the current drop, load the batch
    DropSettled,
    /// Background load finished
    LoadComplete(Result<LoadOutcome, String>),
    /// A grid thumbnail was rendered
    ThumbnailReady(Result<Thumbnail, String>),
    /// Thumbnail clicked: open the editor on this image
    OpenEditor(usize),
    /// Editor preview decoded
    PreviewReady(Uuid, Result<Handle, String>),
    /// Pointer drag on the preview, source-space delta
    CropDragged(Vector2<f32>),
    ApplyCrop,
    CancelCrop,
    ExportSizeChanged(u32),
    MaintainSizeToggled(bool),
    /// Export every image into one ZIP
    ExportAll,
    /// Export one image as PNG
    ExportSingle(usize),
    /// Background export finished with a status line
    ExportComplete(Result<String, String>),
    ClearAll,
}

impl SquareCropper {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        (Self::with_config(AppConfig::load()), Task::none())
    }

    fn with_config(config: AppConfig) -> Self {
        SquareCropper {
            export_size: config.default_export_size,
            maintain_original_size: config.maintain_original_size,
            config,
            session: Session::new(),
            editor: None,
            busy: false,
            pending_drops: Vec::new(),
            status: "Ready. Add WebP images to get started.".to_string(),
            error: None,
        }
    }

    fn settings(&self) -> CropSettings {
        CropSettings::new(self.export_size, self.maintain_original_size)
    }

    /// Start loading files in the background
    fn load(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        if paths.is_empty() {
            return Task::none();
        }

        self.busy = true;
        self.error = None;
        self.status = format!("Processing {} files...", paths.len());

        Task::perform(
            {
                let max_images = self.config.max_images;
                async move { loader::load_paths(paths, max_images).await.map_err(|e| e.to_string()) }
            },
            Message::LoadComplete,
        )
    }

    /// Load whatever was dropped, unless a load is still running; the
    /// finished load picks the batch up then
    fn load_drops(&mut self) -> Task<Message> {
        if self.busy {
            return Task::none();
        }

        let paths = std::mem::take(&mut self.pending_drops);
        self.load(paths)
    }

    /// Render thumbnails for the given images
    fn request_thumbnails<'a>(&self, images: impl IntoIterator<Item = &'a ImageRecord>) -> Task<Message> {
        let size = self.config.thumbnail_size;

        Task::batch(images.into_iter().map(|image| {
            Task::perform(
                thumbnail::generate_thumbnail(image.clone(), size),
                Message::ThumbnailReady,
            )
        }))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFiles => {
                let mut dialog = FileDialog::new()
                    .set_title("Select WebP Images")
                    .add_filter("WebP images", &["webp"]);
                if let Some(dir) = &self.config.last_directory {
                    dialog = dialog.set_directory(dir);
                }

                match dialog.pick_files() {
                    Some(paths) => {
                        self.config.last_directory = paths
                            .first()
                            .and_then(|p| p.parent())
                            .map(|p| p.to_path_buf());
                        self.load(paths)
                    }
                    None => Task::none(),
                }
            }
            Message::ImportFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with WebP Images")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    log::info!("🔍 Scanning folder: {}", folder_path.display());
                    let paths = loader::collect_folder(&folder_path);
                    self.config.last_directory = Some(folder_path);

                    if paths.is_empty() {
                        self.error = Some(loader::NO_VALID_FILES.to_string());
                        return Task::none();
                    }
                    return self.load(paths);
                }

                Task::none()
            }
            Message::FileDropped(path) => {
                let first = self.pending_drops.is_empty();
                self.pending_drops.push(path);

                if !first {
                    return Task::none();
                }

                Task::perform(async { tokio::time::sleep(DROP_SETTLE).await }, |_| {
                    Message::DropSettled
                })
            }
            Message::DropSettled => self.load_drops(),
            Message::LoadComplete(Ok(outcome)) => {
                self.busy = false;

                if let Some(warning) = outcome.warning() {
                    self.status = format!("Skipped {} files.", outcome.skipped + outcome.over_limit);
                    self.error = Some(warning.to_string());
                    return self.load_drops();
                }

                self.error = None;

                self.status = format!(
                    "Added {} images ({} skipped).",
                    outcome.images.len(),
                    outcome.skipped + outcome.over_limit
                );

                let task = self.request_thumbnails(&outcome.images);
                self.session = std::mem::take(&mut self.session).with_images(outcome.images);
                Task::batch([task, self.load_drops()])
            }
            Message::LoadComplete(Err(e)) => {
                log::error!("Error processing loaded files: {}", e);
                self.busy = false;
                self.status = "Load failed.".to_string();
                self.error = Some(LOAD_FAILED.to_string());
                self.load_drops()
            }
            Message::ThumbnailReady(Ok(thumb)) => {
                self.session = std::mem::take(&mut self.session).with_thumbnail(
                    thumb.id,
                    thumb.offset,
                    thumb.handle,
                );
                Task::none()
            }
            Message::ThumbnailReady(Err(e)) => {
                log::error!("Error generating thumbnail: {}", e);
                Task::none()
            }
            Message::OpenEditor(index) => {
                let Some(record) = self.session.get(index).cloned() else {
                    return Task::none();
                };

                self.session = std::mem::take(&mut self.session).with_selection(Some(index));
                let editor = Editor::open(&record, self.config.preview_max_size);
                let (id, scale) = (editor.id, editor.layout.scale);
                self.editor = Some(editor);

                Task::perform(thumbnail::generate_preview(record, scale), move |result| {
                    Message::PreviewReady(id, result)
                })
            }
            Message::PreviewReady(id, result) => {
                match (self.editor.as_mut(), result) {
                    (Some(editor), Ok(handle)) if editor.id == id => editor.preview = Some(handle),
                    (Some(editor), Err(e)) if editor.id == id => {
                        log::error!("Error setting up preview: {}", e);
                        self.editor = None;
                        self.error = Some(LOAD_FAILED.to_string());
                    }
                    // Editor closed or switched images meanwhile
                    _ => {}
                }
                Task::none()
            }
            Message::CropDragged(delta) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.drag_by(delta);
                }
                Task::none()
            }
            Message::ApplyCrop => {
                let Some(editor) = self.editor.take() else {
                    return Task::none();
                };
                let Some(index) = self.session.position(editor.id) else {
                    return Task::none();
                };

                self.session = std::mem::take(&mut self.session).with_offset(index, editor.offset);

                match self.session.get(index) {
                    Some(record) => self.request_thumbnails([record]),
                    None => Task::none(),
                }
            }
            Message::CancelCrop => {
                self.editor = None;
                Task::none()
            }
            Message::ExportSizeChanged(size) => {
                self.export_size = normalize_export_size(size);
                Task::none()
            }
            Message::MaintainSizeToggled(maintain) => {
                self.maintain_original_size = maintain;
                Task::none()
            }
            Message::ExportAll => {
                if self.session.is_empty() {
                    return Task::none();
                }

                let mut dialog = FileDialog::new()
                    .set_title("Save Cropped Images")
                    .set_file_name(ARCHIVE_NAME)
                    .add_filter("ZIP archive", &["zip"]);
                if let Some(dir) = &self.config.last_directory {
                    dialog = dialog.set_directory(dir);
                }

                let Some(path) = dialog.save_file() else {
                    return Task::none();
                };

                self.busy = true;
                self.error = None;
                self.status = format!("Exporting {} images...", self.session.len());

                let records = self.session.images().to_vec();
                let settings = self.settings();
                Task::perform(
                    async move {
                        archive::save_archive(records, settings, path.clone())
                            .await
                            .map(|count| format!("Exported {} images to {}", count, path.display()))
                            .map_err(|e| e.to_string())
                    },
                    Message::ExportComplete,
                )
            }
            Message::ExportSingle(index) => {
                let Some(record) = self.session.get(index).cloned() else {
                    return Task::none();
                };

                let mut dialog = FileDialog::new()
                    .set_title("Save PNG")
                    .set_file_name(export::png_file_name(&record.file_name))
                    .add_filter("PNG image", &["png"]);
                if let Some(dir) = &self.config.last_directory {
                    dialog = dialog.set_directory(dir);
                }

                let Some(path) = dialog.save_file() else {
                    return Task::none();
                };

                self.busy = true;
                self.error = None;
                self.status = format!("Exporting {}...", record.file_name);

                let settings = self.settings();
                Task::perform(
                    async move {
                        export::save_png(record, settings, path)
                            .await
                            .map(|saved| format!("Saved {}", saved.display()))
                            .map_err(|e| e.to_string())
                    },
                    Message::ExportComplete,
                )
            }
            Message::ExportComplete(Ok(status)) => {
                self.busy = false;
                self.status = status;
                self.load_drops()
            }
            Message::ExportComplete(Err(e)) => {
                log::error!("Error during export: {}", e);
                self.busy = false;
                let task = self.load_drops();
                self.status = "Export failed.".to_string();
                self.error = Some(EXPORT_FAILED.to_string());
                task
            }
            Message::ClearAll => {
                self.session = std::mem::take(&mut self.session).cleared();
                self.editor = None;
                self.error = None;
                self.status = "Cleared.".to_string();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        if let Some(editor) = &self.editor {
            return editor.view();
        }

        let load_enabled = !self.busy;
        let mut content = column![
            text("WebP Square Cropper").size(40),
            row![
                button("Add Images")
                    .on_press_maybe(load_enabled.then_some(Message::PickFiles))
                    .padding(10),
                button("Import Folder")
                    .on_press_maybe(load_enabled.then_some(Message::ImportFolder))
                    .padding(10),
            ]
            .spacing(12),
            text(format!(
                "Drop up to {} WebP images here; they will be cropped to a 1:1 ratio.",
                self.config.max_images
            ))
            .size(14),
            text(&self.status).size(16),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        if let Some(error) = &self.error {
            content = content.push(text(error).size(16).color(Color::from_rgb(0.9, 0.3, 0.3)));
        }

        if !self.session.is_empty() {
            content = content
                .push(ui::grid::view(&self.session, self.config.thumbnail_size, self.busy))
                .push(ui::export_panel::view(
                    self.export_size,
                    self.maintain_original_size,
                    self.session.len(),
                    self.busy,
                ));
        }

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Files dropped anywhere on the window
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(
        "WebP Square Cropper",
        SquareCropper::update,
        SquareCropper::view,
    )
    .theme(SquareCropper::theme)
    .subscription(SquareCropper::subscription)
    .window_size((1100.0, 820.0))
    .centered()
    .run_with(SquareCropper::new)
}
