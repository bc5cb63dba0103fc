//! Thumbnail grid
//!
//! One tile per loaded image: the current square crop, the file name and a
//! per-image save button. Clicking a thumbnail opens the crop editor.

use iced::widget::{button, column, container, text, Image};
use iced::{Element, Length};
use iced_aw::Wrap;

use crate::state::data::ImageRecord;
use crate::state::session::Session;
use crate::Message;

pub fn view(session: &Session, thumbnail_size: u32, busy: bool) -> Element<Message> {
    let tiles: Vec<Element<Message>> = session
        .images()
        .iter()
        .enumerate()
        .map(|(index, image)| {
            tile(index, image, session.selected() == Some(index), thumbnail_size, busy)
        })
        .collect();

    column![
        text(format!("Loaded Images ({})", session.len())).size(20),
        Wrap::with_elements(tiles),
    ]
    .spacing(12)
    .into()
}

fn tile(
    index: usize,
    image: &ImageRecord,
    selected: bool,
    thumbnail_size: u32,
    busy: bool,
) -> Element<Message> {
    let side = Length::Fixed(thumbnail_size as f32);

    let preview: Element<Message> = match &image.thumbnail {
        Some(handle) => Image::new(handle.clone()).width(side).height(side).into(),
        None => container(text("…").size(24))
            .width(side)
            .height(side)
            .center_x(side)
            .center_y(side)
            .into(),
    };

    let label = if selected {
        format!("▶ {}", image.file_name)
    } else {
        image.file_name.clone()
    };

    let rect = image.pixel_rect();
    let details = format!("{}x{}, crop at {},{}", image.width, image.height, rect.x, rect.y);

    let content = column![
        button(preview)
            .on_press(Message::OpenEditor(index))
            .padding(2),
        text(label).size(12),
        text(details).size(11),
        button(text("Save PNG").size(12))
            .on_press_maybe((!busy).then_some(Message::ExportSingle(index))),
    ]
    .spacing(6)
    .width(Length::Fixed(thumbnail_size as f32 + 4.0));

    container(content).padding(8).into()
}
