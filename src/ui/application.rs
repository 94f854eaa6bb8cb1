use anyhow::Result;
use iced::{Element, Task};
use tracing::info;
use usb_print_transfer::TransferWorkflow;
use usb_print_transfer::utils::{ConfigStore, DrivelistScanner};

use crate::ui::messages::Message;
use crate::ui::transfer_workflow;

pub struct UsbPrintTransfer {
    pub workflow: TransferWorkflow<DrivelistScanner>,
}

impl UsbPrintTransfer {
    pub fn new() -> Result<Self> {
        let config = ConfigStore::open_default()?;
        config.ensure_initialized()?;
        info!("Using config file {}", config.path().display());

        let mut workflow = TransferWorkflow::new(DrivelistScanner::new(), config);
        workflow.detect_devices()?;

        Ok(Self { workflow })
    }

    pub fn title(&self) -> String {
        String::from("USB Print Transfer")
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Transfer(transfer_msg) => {
                transfer_workflow::handler::handle_message(&mut self.workflow, transfer_msg)
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        transfer_workflow::view(&self.workflow)
    }
}
