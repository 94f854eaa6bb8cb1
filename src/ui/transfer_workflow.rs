pub mod handler;
pub mod messages;
pub mod ui;

pub use handler::*;
pub use messages::*;
pub use ui::*;

use iced::Element;
use usb_print_transfer::utils::DeviceScanner;
use usb_print_transfer::{TransferWorkflow, WorkflowState};

use crate::ui::messages::Message;

/// Module-level view function that delegates to the screen for the current workflow state
pub fn view<S: DeviceScanner>(workflow: &TransferWorkflow<S>) -> Element<'_, Message> {
    let screen = match workflow.state() {
        WorkflowState::DeviceList => ui::view_device_list(
            workflow.devices(),
            workflow.selected_device(),
            workflow.source_folder(),
            workflow.last_failure(),
        ),
        WorkflowState::SingleDevice => ui::view_single_device(
            workflow.selected_device().unwrap_or_default(),
            workflow.source_folder(),
            workflow.last_failure(),
        ),
        WorkflowState::NoDevice => ui::view_no_device(),
        WorkflowState::Transferring { percent } => ui::view_progress(*percent),
        WorkflowState::Done(summary) => ui::view_summary(summary),
    };

    screen.map(Message::Transfer)
}
