//! Crop editor
//!
//! Shows one image with the draggable crop overlay. The offset edited here
//! is a working copy: "Apply Changes" hands it back to the session,
//! "Cancel" throws it away.

use cgmath::Vector2;
use iced::widget::image::Handle;
use iced::widget::{button, canvas, column, container, horizontal_space, row, stack, text, Image};
use iced::{Alignment, ContentFit, Element, Length};
use uuid::Uuid;

use super::canvas::CropCanvas;
use super::overlay::PreviewLayout;
use crate::state::data::ImageRecord;
use crate::Message;

/// Editor state for the selected image
#[derive(Debug, Clone)]
pub struct Editor {
    /// Image being edited
    pub id: Uuid,
    pub file_name: String,
    pub layout: PreviewLayout,
    /// Working offset, source pixels
    pub offset: Vector2<f32>,
    /// Scaled source, None while it is being decoded
    pub preview: Option<Handle>,
}

impl Editor {
    pub fn open(record: &ImageRecord, max_side: f32) -> Self {
        Self {
            id: record.id,
            file_name: record.file_name.clone(),
            layout: PreviewLayout::fit(record.width, record.height, max_side),
            offset: record.offset,
            preview: None,
        }
    }

    /// Add a source-space drag delta to the working offset
    pub fn drag_by(&mut self, delta: Vector2<f32>) {
        self.offset += delta;
    }

    pub fn view(&self) -> Element<Message> {
        let size = self.layout.display_size();
        let (width, height) = (Length::Fixed(size.width), Length::Fixed(size.height));

        let preview: Element<Message> = match &self.preview {
            Some(handle) => stack![
                Image::new(handle.clone())
                    .width(width)
                    .height(height)
                    .content_fit(ContentFit::Fill),
                canvas(CropCanvas {
                    layout: self.layout,
                    offset: self.offset,
                })
                .width(width)
                .height(height),
            ]
            .into(),
            None => container(text("Loading preview..."))
                .width(width)
                .height(height)
                .center_x(width)
                .center_y(height)
                .into(),
        };

        let content = column![
            row![
                text("Adjust Crop Position").size(24),
                horizontal_space(),
                button("✕").on_press(Message::CancelCrop),
            ]
            .align_y(Alignment::Center),
            text(&self.file_name).size(14),
            container(preview).center_x(Length::Fill),
            text("Click and drag to adjust the crop position. The image will be cropped to a 1:1 ratio.")
                .size(14),
            row![
                horizontal_space(),
                button("Cancel").on_press(Message::CancelCrop).padding(10),
                button("Apply Changes")
                    .on_press_maybe(self.preview.is_some().then_some(Message::ApplyCrop))
                    .padding(10),
            ]
            .spacing(12),
        ]
        .spacing(16)
        .padding(24)
        .max_width(620.0);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}
