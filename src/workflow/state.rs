use crate::models::TransferSummary;

/// Where the wizard currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    DeviceList,                // Two or more devices, user picks one
    SingleDevice,              // Exactly one device, selected automatically
    NoDevice,                  // Nothing attached, detection has to be retriggered
    Transferring { percent: u8 },
    Done(TransferSummary),
}

impl WorkflowState {
    /// True for the views that offer the confirm action
    pub fn can_confirm(&self) -> bool {
        matches!(self, WorkflowState::DeviceList | WorkflowState::SingleDevice)
    }
}
