use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use super::WorkflowState;
use crate::models::{Device, TransferSummary};
use crate::utils::mover::{PRINT_FOLDER_LABEL, destination_folder_name};
use crate::utils::{ConfigKey, ConfigStore, DeviceScanner, TransferJob};

/// Owns the wizard: device detection, the transfer job and the completion summary.
///
/// The view layer reads state through the accessors and forwards every user
/// action as a method call. Errors returned from these methods are environment
/// errors (device query or config file) and are fatal; transfer failures and
/// failed preconditions are handled here by detecting devices again.
pub struct TransferWorkflow<S: DeviceScanner> {
    scanner: S,
    config: ConfigStore,
    folder_label: String,
    state: WorkflowState,
    devices: Vec<Device>,
    source_folder: String,
    selected_device: Option<String>,
    job: Option<TransferJob>,
    job_folder_name: String,
    pending_failure: Option<anyhow::Error>,
    last_failure: Option<String>,
}

impl<S: DeviceScanner> TransferWorkflow<S> {
    /// Nothing is scanned until `detect_devices` is called; until then the
    /// state is `NoDevice` and the device list is empty.
    pub fn new(scanner: S, config: ConfigStore) -> Self {
        Self {
            scanner,
            config,
            folder_label: PRINT_FOLDER_LABEL.to_string(),
            state: WorkflowState::NoDevice,
            devices: Vec::new(),
            source_folder: String::new(),
            selected_device: None,
            job: None,
            job_folder_name: String::new(),
            pending_failure: None,
            last_failure: None,
        }
    }

    pub fn with_folder_label(mut self, label: impl Into<String>) -> Self {
        self.folder_label = label.into();
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Text of the source folder field
    pub fn source_folder(&self) -> &str {
        &self.source_folder
    }

    pub fn selected_device(&self) -> Option<&str> {
        self.selected_device.as_deref()
    }

    pub fn progress(&self) -> Option<u8> {
        match self.state {
            WorkflowState::Transferring { percent } => Some(percent),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&TransferSummary> {
        match &self.state {
            WorkflowState::Done(summary) => Some(summary),
            _ => None,
        }
    }

    /// Detail of the most recent failed transfer, if any
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Scan devices and pick the device-selection view for the result
    pub fn detect_devices(&mut self) -> Result<()> {
        self.job = None;
        self.pending_failure = None;
        self.devices = self.scanner.scan()?;
        info!("Detected {} removable devices", self.devices.len());

        match self.devices.len() {
            0 => {
                self.config.set(ConfigKey::CurrentDevice, "")?;
                self.selected_device = None;
                self.state = WorkflowState::NoDevice;
            }
            1 => {
                let mountpoint = self.devices[0].mountpoint.clone();
                self.config.set(ConfigKey::CurrentDevice, &mountpoint)?;
                debug!("Auto-selected the only device: {}", mountpoint);
                self.selected_device = Some(mountpoint);
                self.source_folder = self.stored_source_folder();
                self.state = WorkflowState::SingleDevice;
            }
            _ => {
                self.config.set(ConfigKey::CurrentDevice, "")?;
                self.selected_device = None;
                self.source_folder = self.stored_source_folder();
                self.state = WorkflowState::DeviceList;
            }
        }

        Ok(())
    }

    /// A device was clicked in the list
    pub fn select_device(&mut self, mountpoint: &str) -> Result<()> {
        self.config.set(ConfigKey::CurrentDevice, mountpoint)?;
        self.selected_device = Some(mountpoint.to_string());
        debug!("Selected device: {}", mountpoint);
        Ok(())
    }

    /// The source folder field was edited
    pub fn edit_source_folder(&mut self, text: impl Into<String>) -> Result<()> {
        self.source_folder = text.into();
        self.config.set(ConfigKey::SourceFolder, &self.source_folder)
    }

    /// Start a transfer dated today
    pub fn confirm(&mut self) -> Result<()> {
        self.confirm_on(Local::now().date_naive())
    }

    /// Start a transfer into the folder dated `date`.
    ///
    /// When the stored device is not among the detected ones, or the stored
    /// source folder is not a directory, devices are detected again instead.
    pub fn confirm_on(&mut self, date: NaiveDate) -> Result<()> {
        if !self.state.can_confirm() {
            debug!("Ignoring confirm while in {:?}", self.state);
            return Ok(());
        }

        let current_device = self.config.get(ConfigKey::CurrentDevice)?;
        let source_folder = self.config.get(ConfigKey::SourceFolder)?;

        if !self.is_known_device(&current_device) || !Path::new(&source_folder).is_dir() {
            info!(
                "Cannot start transfer (device {:?}, source {:?}), detecting devices again",
                current_device, source_folder
            );
            return self.detect_devices();
        }

        let folder_name = destination_folder_name(&self.folder_label, date);
        let destination = Path::new(&current_device).join(&folder_name);

        match TransferJob::prepare(&source_folder, destination) {
            Ok(job) => {
                info!("Starting transfer into {}", folder_name);
                let is_empty = job.listing_len() == 0;
                self.job = Some(job);
                self.job_folder_name = folder_name;
                self.last_failure = None;

                if is_empty {
                    self.finish_transfer();
                } else {
                    self.state = WorkflowState::Transferring { percent: 0 };
                }
                Ok(())
            }
            Err(e) => self.fail_transfer(e),
        }
    }

    /// Process the next entry of the running transfer.
    ///
    /// The percentage after each attempted entry is published as
    /// `Transferring`, the failed entry and the final 100 included. The call
    /// after that leaves the transfer: `Done` on success, device detection
    /// after a failure.
    pub fn advance(&mut self) -> Result<()> {
        if let Some(err) = self.pending_failure.take() {
            return self.fail_transfer(err);
        }

        let Some(job) = self.job.as_mut() else {
            return Ok(());
        };

        match job.step() {
            Ok(Some(_)) => {
                self.state = WorkflowState::Transferring {
                    percent: job.percent(),
                };
            }
            Ok(None) => self.finish_transfer(),
            Err(e) => {
                self.state = WorkflowState::Transferring {
                    percent: job.percent(),
                };
                self.pending_failure = Some(e);
            }
        }

        Ok(())
    }

    /// Run the remaining entries in one go
    pub fn run_transfer(&mut self) -> Result<()> {
        while self.job.is_some() {
            self.advance()?;
        }
        Ok(())
    }

    /// Leave the summary and go back to device detection
    pub fn restart(&mut self) -> Result<()> {
        self.detect_devices()
    }

    fn is_known_device(&self, mountpoint: &str) -> bool {
        self.devices.iter().any(|d| d.mountpoint == mountpoint)
    }

    fn stored_source_folder(&self) -> String {
        match self.config.get(ConfigKey::SourceFolder) {
            Ok(folder) => folder,
            Err(e) => {
                warn!("No stored source folder: {:#}", e);
                String::new()
            }
        }
    }

    fn finish_transfer(&mut self) {
        let count = self.job.take().map(|job| job.listing_len()).unwrap_or_default();
        let folder_name = std::mem::take(&mut self.job_folder_name);

        info!("Transfer finished: {} entries into {}", count, folder_name);
        self.state = WorkflowState::Done(TransferSummary { folder_name, count });
    }

    fn fail_transfer(&mut self, err: anyhow::Error) -> Result<()> {
        error!("{:#}", err);
        self.last_failure = Some(format!("{:#}", err));
        self.job = None;
        self.pending_failure = None;
        self.job_folder_name.clear();
        self.detect_devices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::{TempDir, tempdir};
    use tracing_subscriber::layer::SubscriberExt;

    use crate::utils::logging::{ERROR_LOG_FILE, error_log_layer};

    type Attached = Rc<RefCell<Vec<Device>>>;

    struct Fixture {
        _dir: TempDir,
        attached: Attached,
        workflow: TransferWorkflow<Box<dyn Fn() -> Result<Vec<Device>>>>,
    }

    fn fixture(devices: &[&str]) -> Fixture {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("config.toml"));
        store.ensure_initialized().unwrap();

        let attached: Attached = Rc::new(RefCell::new(
            devices.iter().map(|d| Device::new(*d)).collect(),
        ));
        let shared = Rc::clone(&attached);
        let scanner: Box<dyn Fn() -> Result<Vec<Device>>> =
            Box::new(move || Ok(shared.borrow().clone()));

        Fixture {
            _dir: dir,
            attached,
            workflow: TransferWorkflow::new(scanner, store),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_new_workflow_waits_for_detection() {
        let dir = tempdir().unwrap();
        let scans = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&scans);
        let scanner = move || -> Result<Vec<Device>> {
            *counter.borrow_mut() += 1;
            Ok(vec![Device::new("/media/usb")])
        };

        let mut workflow = TransferWorkflow::new(scanner, ConfigStore::at(dir.path().join("c.toml")));
        assert_eq!(workflow.state(), &WorkflowState::NoDevice);
        assert!(workflow.devices().is_empty());
        assert_eq!(*scans.borrow(), 0);

        workflow.detect_devices().unwrap();
        assert_eq!(workflow.state(), &WorkflowState::SingleDevice);
        assert_eq!(*scans.borrow(), 1);
    }

    #[test]
    fn test_no_device_clears_current_device() {
        let mut f = fixture(&[]);
        f.workflow.config().set(ConfigKey::CurrentDevice, "/media/old").unwrap();

        f.workflow.detect_devices().unwrap();

        assert_eq!(f.workflow.state(), &WorkflowState::NoDevice);
        assert_eq!(f.workflow.config().get(ConfigKey::CurrentDevice).unwrap(), "");
        assert!(!f.workflow.state().can_confirm());
    }

    #[test]
    fn test_single_device_is_auto_selected() {
        let mut f = fixture(&["/media/usb"]);
        f.workflow.config().set(ConfigKey::SourceFolder, "/srv/scans").unwrap();

        f.workflow.detect_devices().unwrap();

        assert_eq!(f.workflow.state(), &WorkflowState::SingleDevice);
        assert_eq!(f.workflow.selected_device(), Some("/media/usb"));
        assert_eq!(f.workflow.source_folder(), "/srv/scans");
        assert_eq!(
            f.workflow.config().get(ConfigKey::CurrentDevice).unwrap(),
            "/media/usb"
        );
    }

    #[test]
    fn test_several_devices_show_list_and_clear_selection() {
        let mut f = fixture(&["/media/a", "/media/b"]);
        f.workflow.config().set(ConfigKey::CurrentDevice, "/media/a").unwrap();

        f.workflow.detect_devices().unwrap();

        assert_eq!(f.workflow.state(), &WorkflowState::DeviceList);
        assert_eq!(f.workflow.devices().len(), 2);
        assert_eq!(f.workflow.selected_device(), None);
        assert_eq!(f.workflow.config().get(ConfigKey::CurrentDevice).unwrap(), "");
    }

    #[test]
    fn test_select_and_edit_persist_immediately() {
        let mut f = fixture(&["/media/a", "/media/b"]);
        f.workflow.detect_devices().unwrap();

        f.workflow.select_device("/media/b").unwrap();
        f.workflow.edit_source_folder("/home/user/print").unwrap();

        let store = f.workflow.config();
        assert_eq!(store.get(ConfigKey::CurrentDevice).unwrap(), "/media/b");
        assert_eq!(store.get(ConfigKey::SourceFolder).unwrap(), "/home/user/print");
        assert_eq!(f.workflow.selected_device(), Some("/media/b"));
    }

    #[test]
    fn test_confirm_without_selection_detects_again() {
        let source = tempdir().unwrap();
        let mut f = fixture(&["/media/a", "/media/b"]);
        f.workflow.detect_devices().unwrap();
        f.workflow
            .edit_source_folder(source.path().to_string_lossy())
            .unwrap();

        f.attached.borrow_mut().pop();
        f.workflow.confirm_on(today()).unwrap();

        // Rescanned: only one device left, so it is picked automatically
        assert_eq!(f.workflow.state(), &WorkflowState::SingleDevice);
        assert_eq!(f.workflow.devices().len(), 1);
    }

    #[test]
    fn test_confirm_with_missing_source_folder_detects_again() {
        let device = tempdir().unwrap();
        let mountpoint = device.path().to_string_lossy().to_string();
        let mut f = fixture(&[&mountpoint]);
        f.workflow.detect_devices().unwrap();
        f.workflow
            .edit_source_folder(device.path().join("missing").to_string_lossy())
            .unwrap();

        f.workflow.confirm_on(today()).unwrap();

        assert_eq!(f.workflow.state(), &WorkflowState::SingleDevice);
        assert!(fs::read_dir(device.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_confirm_with_file_as_source_folder_detects_again() {
        let device = tempdir().unwrap();
        let mountpoint = device.path().to_string_lossy().to_string();
        let source_file = device.path().join("notes.txt");
        fs::write(&source_file, "not a folder").unwrap();

        let mut f = fixture(&[&mountpoint]);
        f.workflow.detect_devices().unwrap();
        f.workflow
            .edit_source_folder(source_file.to_string_lossy())
            .unwrap();

        f.workflow.confirm_on(today()).unwrap();

        assert_eq!(f.workflow.state(), &WorkflowState::SingleDevice);
        assert!(!device.path().join("На печать 18-10-2026").exists());
    }

    #[test]
    fn test_confirm_ignored_without_devices() {
        let mut f = fixture(&[]);
        f.workflow.detect_devices().unwrap();

        f.workflow.confirm_on(today()).unwrap();

        assert_eq!(f.workflow.state(), &WorkflowState::NoDevice);
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_in_summary() {
        let device = tempdir().unwrap();
        let source = tempdir().unwrap();
        for name in ["1.pdf", "2.pdf", "3.pdf", "4.pdf"] {
            fs::write(source.path().join(name), name).unwrap();
        }

        let mountpoint = device.path().to_string_lossy().to_string();
        let mut f = fixture(&[&mountpoint]);
        f.workflow.detect_devices().unwrap();
        f.workflow
            .edit_source_folder(source.path().to_string_lossy())
            .unwrap();
        f.workflow.confirm_on(today()).unwrap();

        let mut seen = vec![f.workflow.progress().unwrap()];
        while let Some(percent) = f.workflow.progress() {
            f.workflow.advance().unwrap();
            if let Some(next) = f.workflow.progress() {
                assert!(next >= percent);
                seen.push(next);
            }
        }

        assert_eq!(seen, vec![0, 25, 50, 75, 100]);
        let summary = f.workflow.summary().unwrap();
        assert_eq!(summary.folder_name, "На печать 18-10-2026");
        assert_eq!(summary.count, 4);
        assert!(device.path().join("На печать 18-10-2026").join("4.pdf").is_file());
    }

    #[test]
    fn test_failed_entry_is_reported_then_logged_once() {
        let device = tempdir().unwrap();
        let source = tempdir().unwrap();
        let logs = tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            fs::write(source.path().join(name), name).unwrap();
        }
        let destination = device.path().join("На печать 18-10-2026");
        fs::create_dir_all(destination.join("b.txt")).unwrap();

        let mountpoint = device.path().to_string_lossy().to_string();
        let mut f = fixture(&[&mountpoint]);
        f.workflow.detect_devices().unwrap();
        f.workflow
            .edit_source_folder(source.path().to_string_lossy())
            .unwrap();

        let appender = tracing_appender::rolling::never(logs.path(), ERROR_LOG_FILE);
        let subscriber = tracing_subscriber::registry().with(error_log_layer(appender));

        let seen = tracing::subscriber::with_default(subscriber, || {
            f.workflow.confirm_on(today()).unwrap();
            let mut seen = vec![f.workflow.progress().unwrap()];
            while f.workflow.progress().is_some() {
                f.workflow.advance().unwrap();
                if let Some(percent) = f.workflow.progress() {
                    seen.push(percent);
                }
            }
            seen
        });

        // b.txt is attempted and reported before the transfer is abandoned
        assert_eq!(seen, vec![0, 33, 66]);
        assert_eq!(f.workflow.state(), &WorkflowState::SingleDevice);
        assert!(f.workflow.last_failure().unwrap().contains("b.txt"));
        assert!(destination.join("a.txt").is_file());
        assert!(source.path().join("c.txt").is_file());

        let content = fs::read_to_string(logs.path().join(ERROR_LOG_FILE)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("b.txt"));
    }

    #[test]
    fn test_empty_source_is_immediate_success() {
        let device = tempdir().unwrap();
        let source = tempdir().unwrap();
        let mountpoint = device.path().to_string_lossy().to_string();
        let mut f = fixture(&[&mountpoint]);
        f.workflow.detect_devices().unwrap();
        f.workflow
            .edit_source_folder(source.path().to_string_lossy())
            .unwrap();

        f.workflow.confirm_on(today()).unwrap();
        f.workflow.run_transfer().unwrap();

        let summary = f.workflow.summary().unwrap();
        assert_eq!(summary.count, 0);
        assert!(device.path().join(&summary.folder_name).is_dir());
    }

    #[test]
    fn test_custom_folder_label() {
        let dir = tempdir().unwrap();
        let device = tempdir().unwrap();
        let source = tempdir().unwrap();
        let mountpoint = device.path().to_string_lossy().to_string();
        let scanner = move || -> Result<Vec<Device>> { Ok(vec![Device::new(mountpoint.clone())]) };
        let mut workflow = TransferWorkflow::new(scanner, ConfigStore::at(dir.path().join("c.toml")))
            .with_folder_label("print");

        workflow.detect_devices().unwrap();
        workflow
            .edit_source_folder(source.path().to_string_lossy())
            .unwrap();
        workflow.confirm_on(today()).unwrap();
        workflow.run_transfer().unwrap();

        assert_eq!(workflow.summary().unwrap().folder_name, "print 18-10-2026");
        assert!(device.path().join("print 18-10-2026").is_dir());
    }

    #[test]
    fn test_restart_from_summary() {
        let device = tempdir().unwrap();
        let source = tempdir().unwrap();
        let mountpoint = device.path().to_string_lossy().to_string();
        let mut f = fixture(&[&mountpoint]);
        f.workflow.detect_devices().unwrap();
        f.workflow
            .edit_source_folder(source.path().to_string_lossy())
            .unwrap();
        f.workflow.confirm_on(today()).unwrap();
        f.workflow.run_transfer().unwrap();
        assert!(f.workflow.summary().is_some());

        // Confirm does nothing on the summary screen
        f.workflow.confirm_on(today()).unwrap();
        assert!(f.workflow.summary().is_some());

        f.workflow.restart().unwrap();
        assert_eq!(f.workflow.state(), &WorkflowState::SingleDevice);
    }

    #[test]
    fn test_scan_failure_is_returned() {
        let dir = tempdir().unwrap();
        let scanner = || -> Result<Vec<Device>> { Err(anyhow!("lsblk not found")) };
        let mut workflow = TransferWorkflow::new(scanner, ConfigStore::at(dir.path().join("c.toml")));

        assert!(workflow.detect_devices().is_err());
    }
}
