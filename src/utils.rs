pub mod config_store;
pub mod devices;
pub mod logging;
pub mod mover;

pub use config_store::{ConfigError, ConfigKey, ConfigStore};
pub use devices::{DeviceScanner, DrivelistScanner};
pub use mover::{StepOutcome, TransferJob};

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Per-user directories for the config file and the error log
pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "aqwantonio", "usb-print-transfer")
        .context("Failed to determine project directories")
}
