use iced::Task;
use tracing::{debug, error};
use usb_print_transfer::TransferWorkflow;
use usb_print_transfer::utils::DeviceScanner;

use super::TransferMessage;
use crate::ui::messages::Message;

pub fn handle_message<S: DeviceScanner>(
    workflow: &mut TransferWorkflow<S>,
    message: TransferMessage,
) -> Task<Message> {
    // A running transfer moves one entry per Advance message
    let keeps_transfer_going = matches!(
        message,
        TransferMessage::Confirm | TransferMessage::Advance
    );

    let result = match message {
        TransferMessage::RefreshDevices => workflow.detect_devices(),
        TransferMessage::SelectDevice(mountpoint) => workflow.select_device(&mountpoint),
        TransferMessage::SourceFolderEdited(text) => workflow.edit_source_folder(text),
        TransferMessage::BrowseSourceFolder => {
            let mut dialog = rfd::FileDialog::new().set_title("Select source folder");
            if !workflow.source_folder().is_empty() {
                dialog = dialog.set_directory(workflow.source_folder());
            }

            match dialog.pick_folder() {
                Some(path) => workflow.edit_source_folder(path.to_string_lossy()),
                None => {
                    debug!("Folder picker closed without a selection");
                    Ok(())
                }
            }
        }
        TransferMessage::Confirm => workflow.confirm(),
        TransferMessage::Advance => workflow.advance(),
        TransferMessage::Restart => workflow.restart(),
    };

    if let Err(e) = result {
        error!("Unrecoverable error, exiting: {:#}", e);
        return iced::exit();
    }

    if keeps_transfer_going && workflow.progress().is_some() {
        Task::done(Message::Transfer(TransferMessage::Advance))
    } else {
        Task::none()
    }
}
