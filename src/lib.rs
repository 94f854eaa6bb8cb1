// Public library interface for usb-print-transfer
//
// This module exposes the device scanning, config persistence and file moving
// functionality together with the workflow controller that sequences them.
// The GUI binary only renders controller state and forwards user intents.

pub mod models;
pub mod utils;
pub mod workflow;

pub use models::{Device, TransferSummary};
pub use workflow::{TransferWorkflow, WorkflowState};
