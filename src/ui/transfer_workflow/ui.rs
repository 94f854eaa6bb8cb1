use iced::alignment::Horizontal;
use iced::widget::{
    button, column, container, horizontal_space, progress_bar, row, scrollable, text, text_input,
};
use iced::{Alignment, Element, Length};
use usb_print_transfer::{Device, TransferSummary};

use super::TransferMessage;
use crate::style;

fn header(title: &str) -> Element<'_, TransferMessage> {
    container(text(title).size(26))
        .width(Length::Fill)
        .padding(15)
        .style(style::bordered_box)
        .into()
}

// Both device screens edit the same stored source folder
fn source_folder_field(source_folder: &str) -> Element<'_, TransferMessage> {
    column![
        text("Source folder").size(14).style(style::muted_text),
        row![
            text_input("Folder with the files to move", source_folder)
                .on_input(TransferMessage::SourceFolderEdited)
                .padding(8)
                .style(style::default_text_input),
            button("Browse")
                .on_press(TransferMessage::BrowseSourceFolder)
                .padding(8)
                .style(button::secondary),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    ]
    .spacing(6)
    .into()
}

fn failure_notice(last_failure: Option<&str>) -> Element<'_, TransferMessage> {
    match last_failure {
        Some(detail) => text(format!("The last transfer stopped early: {}", detail))
            .size(13)
            .style(style::warning_text)
            .into(),
        None => column![].into(),
    }
}

fn confirm_button<'a>() -> Element<'a, TransferMessage> {
    button("Move files")
        .on_press(TransferMessage::Confirm)
        .padding(10)
        .style(button::primary)
        .into()
}

/// Two or more drives: the user picks the target
pub fn view_device_list<'a>(
    devices: &'a [Device],
    selected_device: Option<&'a str>,
    source_folder: &'a str,
    last_failure: Option<&'a str>,
) -> Element<'a, TransferMessage> {
    let device_cards = column(devices.iter().map(|device| {
        let is_selected = selected_device == Some(device.mountpoint.as_str());

        let select_button = button(if is_selected { "Selected" } else { "Select" })
            .on_press(TransferMessage::SelectDevice(device.mountpoint.clone()))
            .padding(8)
            .style(if is_selected {
                button::success
            } else {
                button::primary
            });

        container(
            row![
                text(device.to_string()).size(16).width(Length::Fill),
                select_button
            ]
            .spacing(15)
            .padding(12)
            .align_y(Alignment::Center),
        )
        .style(if is_selected {
            style::selected_device_card_container
        } else {
            style::device_card_container
        })
        .width(Length::Fill)
        .into()
    }))
    .spacing(8)
    .width(Length::Fill);

    let refresh_button = button("Detect again")
        .on_press(TransferMessage::RefreshDevices)
        .padding(10)
        .style(button::secondary);

    column![
        header("Select USB Drive"),
        scrollable(device_cards).height(Length::Fill),
        source_folder_field(source_folder),
        failure_notice(last_failure),
        row![refresh_button, horizontal_space(), confirm_button()].align_y(Alignment::Center),
    ]
    .spacing(15)
    .padding(20)
    .into()
}

/// Exactly one drive, already chosen
pub fn view_single_device<'a>(
    mountpoint: &'a str,
    source_folder: &'a str,
    last_failure: Option<&'a str>,
) -> Element<'a, TransferMessage> {
    let device_card = container(
        column![
            text("USB drive").size(13).style(style::muted_text),
            text(mountpoint).size(18),
        ]
        .spacing(4),
    )
    .padding(15)
    .width(Length::Fill)
    .style(style::selected_device_card_container);

    column![
        header("USB Drive Found"),
        device_card,
        source_folder_field(source_folder),
        failure_notice(last_failure),
        column![].height(Length::Fill),
        row![horizontal_space(), confirm_button()],
    ]
    .spacing(15)
    .padding(20)
    .into()
}

pub fn view_no_device<'a>() -> Element<'a, TransferMessage> {
    let empty_state = container(
        column![
            text("No USB drive found").size(20),
            text("Connect a USB drive and try again").size(14),
            button("Detect again")
                .on_press(TransferMessage::RefreshDevices)
                .padding(10)
                .style(button::primary),
        ]
        .spacing(15)
        .align_x(Alignment::Center),
    )
    .padding(30)
    .width(Length::Fill)
    .style(style::bordered_box);

    column![header("Select USB Drive"), empty_state]
        .spacing(15)
        .padding(20)
        .into()
}

pub fn view_progress<'a>(percent: u8) -> Element<'a, TransferMessage> {
    let progress = column![
        text(format!("{}%", percent)).size(36),
        progress_bar(0.0..=100.0, f32::from(percent)),
        text("Please do not remove the USB drive while files are moved")
            .size(14)
            .style(style::warning_text),
    ]
    .spacing(15)
    .align_x(Alignment::Center);

    column![
        header("Moving Files"),
        container(progress)
            .padding(30)
            .width(Length::Fill)
            .style(style::bordered_box),
    ]
    .spacing(15)
    .padding(20)
    .into()
}

pub fn view_summary(summary: &TransferSummary) -> Element<'_, TransferMessage> {
    let details = column![
        text(format!("Moved {} files to the folder", summary.count))
            .size(16)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
        text(&summary.folder_name)
            .size(22)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
        text("The USB drive can be removed")
            .size(14)
            .style(style::muted_text),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    column![
        header("Done"),
        container(details)
            .padding(30)
            .width(Length::Fill)
            .style(style::bordered_box),
        column![].height(Length::Fill),
        row![
            horizontal_space(),
            button("Start over")
                .on_press(TransferMessage::Restart)
                .padding(10)
                .style(button::primary),
        ],
    ]
    .spacing(15)
    .padding(20)
    .into()
}
