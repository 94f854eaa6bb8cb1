pub mod application;
pub mod messages;
pub mod transfer_workflow;

pub use application::UsbPrintTransfer;
