use anyhow::{Result, anyhow};
use tracing::{debug, error, info};

use crate::models::Device;

/// Mountpoints containing this marker are treated as removable media
pub const DEFAULT_MEDIA_MARKER: &str = "media";

/// Source of the currently attached removable devices.
///
/// A failing scan is an environment error; callers do not retry it.
pub trait DeviceScanner {
    fn scan(&self) -> Result<Vec<Device>>;
}

impl<F> DeviceScanner for F
where
    F: Fn() -> Result<Vec<Device>>,
{
    fn scan(&self) -> Result<Vec<Device>> {
        self()
    }
}

/// Scans mounted partitions through `rs_drivelist`
#[derive(Debug, Clone)]
pub struct DrivelistScanner {
    marker: String,
}

impl Default for DrivelistScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DrivelistScanner {
    pub fn new() -> Self {
        Self::with_marker(DEFAULT_MEDIA_MARKER)
    }

    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl DeviceScanner for DrivelistScanner {
    fn scan(&self) -> Result<Vec<Device>> {
        info!("Getting mounted removable devices");

        let drives = rs_drivelist::drive_list().map_err(|e| {
            error!("Failed to get drive list: {}", e);
            anyhow!("Failed to query mounted partitions: {}", e)
        })?;

        let mountpoints = drives
            .into_iter()
            .flat_map(|drive| drive.mountpoints.into_iter().map(|mp| mp.path));
        let devices = removable_mountpoints(mountpoints, &self.marker);

        debug!("Found {} removable devices", devices.len());
        Ok(devices)
    }
}

/// Keep the mountpoints that look like removable media, in query order, without duplicates
pub fn removable_mountpoints<I>(mountpoints: I, marker: &str) -> Vec<Device>
where
    I: IntoIterator<Item = String>,
{
    let mut devices: Vec<Device> = Vec::new();

    for mountpoint in mountpoints {
        if !mountpoint.contains(marker) {
            continue;
        }
        if devices.iter().any(|d| d.mountpoint == mountpoint) {
            continue;
        }
        devices.push(Device::new(mountpoint));
    }

    devices
}
