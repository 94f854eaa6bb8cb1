use crate::ui::transfer_workflow::TransferMessage;

#[derive(Debug, Clone)]
pub enum Message {
    Transfer(TransferMessage),
}
