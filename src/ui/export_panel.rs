//! Export panel below the thumbnail grid

use iced::widget::{button, checkbox, column, row, slider, text};
use iced::{Alignment, Element};

use crate::state::settings::{EXPORT_SIZE_STEP, MAX_EXPORT_SIZE, MIN_EXPORT_SIZE};
use crate::Message;

/// Export options: size slider, keep-original toggle and batch actions
pub fn view(
    export_size: u32,
    maintain_original_size: bool,
    image_count: usize,
    busy: bool,
) -> Element<'static, Message> {
    let enabled = !busy && image_count > 0;

    let size_row = (!maintain_original_size).then(|| {
        row![
            text("Output PNG Size:").size(14),
            slider(MIN_EXPORT_SIZE..=MAX_EXPORT_SIZE, export_size, Message::ExportSizeChanged)
                .step(EXPORT_SIZE_STEP),
            text(format!("{0}x{0}px", export_size)).size(14),
        ]
        .spacing(12)
        .align_y(Alignment::Center)
    });

    let export_label = if busy { "Processing..." } else { "Download All as ZIP" };

    column![
        text("Export Options").size(20),
        checkbox("Maintain original size (only crop to 1:1 ratio)", maintain_original_size)
            .on_toggle(Message::MaintainSizeToggled),
    ]
    .push_maybe(size_row)
    .push(
        row![
            button(export_label)
                .on_press_maybe(enabled.then_some(Message::ExportAll))
                .padding(10),
            button("Clear All")
                .on_press_maybe(enabled.then_some(Message::ClearAll))
                .padding(10),
        ]
        .spacing(12),
    )
    .spacing(16)
    .into()
}
