#[derive(Debug, Clone)]
pub enum TransferMessage {
    RefreshDevices,             // Scan devices again
    SelectDevice(String),       // Device clicked in the list (mountpoint)
    SourceFolderEdited(String), // Source folder field changed
    BrowseSourceFolder,         // Pick the source folder with a dialog
    Confirm,                    // Start the transfer
    Advance,                    // Move the next entry
    Restart,                    // Back from the summary to device detection
}
