/// A mounted removable volume, identified by its mountpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub mountpoint: String,
}

impl Device {
    pub fn new(mountpoint: impl Into<String>) -> Self {
        Self {
            mountpoint: mountpoint.into(),
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mountpoint)
    }
}

/// What the completion screen reports once a transfer finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    pub folder_name: String, // Name of the dated folder created on the device
    pub count: usize,        // Size of the source listing, skipped entries included
}
