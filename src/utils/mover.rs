use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Label of the dated folder created on the device ("to print")
pub const PRINT_FOLDER_LABEL: &str = "На печать";

/// Folder name for a transfer started on `date`, e.g. `На печать 18-10-2026`
pub fn destination_folder_name(label: &str, date: NaiveDate) -> String {
    format!("{} {}", label, date.format("%d-%m-%Y"))
}

/// What happened to a single source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Moved(PathBuf),   // Regular file now lives in the destination
    Skipped(PathBuf), // Not a regular file, left where it is
}

/// One run of moving the entries of a source folder into a destination folder.
///
/// The source listing is snapshotted when the job is prepared and never
/// refreshed, so files appearing later are not picked up. Entries are taken in
/// file-name order. The first failed move aborts the job; whatever was already
/// moved stays in the destination.
#[derive(Debug)]
pub struct TransferJob {
    destination: PathBuf,
    entries: Vec<PathBuf>,
    cursor: usize,
    moved: usize,
    failed: bool,
}

impl TransferJob {
    /// Create the destination folder and snapshot the source listing
    pub fn prepare(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let destination = destination.into();

        fs::create_dir_all(&destination).with_context(|| {
            format!("Failed to create destination folder {}", destination.display())
        })?;

        let mut entries = fs::read_dir(&source)
            .with_context(|| format!("Failed to list source folder {}", source.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read an entry of {}", source.display()))?;
        entries.sort();

        info!(
            "Prepared transfer of {} entries from {} to {}",
            entries.len(),
            source.display(),
            destination.display()
        );

        Ok(Self {
            destination,
            entries,
            cursor: 0,
            moved: 0,
            failed: false,
        })
    }

    pub fn listing_len(&self) -> usize {
        self.entries.len()
    }

    /// Entries processed successfully so far (moved or skipped)
    pub fn processed(&self) -> usize {
        self.cursor
    }

    /// Regular files moved so far
    pub fn moved(&self) -> usize {
        self.moved
    }

    pub fn is_aborted(&self) -> bool {
        self.failed
    }

    pub fn is_finished(&self) -> bool {
        !self.failed && self.cursor == self.entries.len()
    }

    /// Whole percent of the listing attempted so far. An empty listing is complete.
    pub fn percent(&self) -> u8 {
        if self.entries.is_empty() {
            return 100;
        }
        let attempted = self.cursor + usize::from(self.failed);
        (attempted * 100 / self.entries.len()) as u8
    }

    /// Process the next entry. Returns `Ok(None)` once the listing is exhausted.
    pub fn step(&mut self) -> Result<Option<StepOutcome>> {
        if self.failed {
            bail!("Transfer to {} was aborted", self.destination.display());
        }

        let Some(entry) = self.entries.get(self.cursor).cloned() else {
            return Ok(None);
        };

        let outcome = if entry.is_file() {
            let name = entry
                .file_name()
                .ok_or_else(|| anyhow!("Source entry has no file name: {}", entry.display()))?;
            let target = self.destination.join(name);

            if let Err(e) = move_file(&entry, &target) {
                self.failed = true;
                return Err(e);
            }

            self.moved += 1;
            StepOutcome::Moved(entry)
        } else {
            debug!("Skipping non-file entry {}", entry.display());
            StepOutcome::Skipped(entry)
        };

        self.cursor += 1;
        Ok(Some(outcome))
    }

    /// Move every remaining entry, reporting the percentage after each attempt.
    ///
    /// Returns the size of the source listing on success.
    pub fn run<F: FnMut(u8)>(&mut self, mut on_progress: F) -> Result<usize> {
        if self.entries.is_empty() {
            on_progress(100);
            return Ok(0);
        }

        loop {
            match self.step() {
                Ok(Some(_)) => on_progress(self.percent()),
                Ok(None) => break,
                Err(e) => {
                    on_progress(self.percent());
                    return Err(e);
                }
            }
        }

        Ok(self.entries.len())
    }
}

/// Move one file, falling back to copy and delete when a rename is not possible
/// (for example across volumes). An existing file at `dest` is replaced.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => {
            debug!("Renamed {} -> {}", src.display(), dest.display());
            Ok(())
        }
        Err(e) => {
            warn!("Rename of {} failed ({}), falling back to copy", src.display(), e);
            fs::copy(src, dest)
                .with_context(|| format!("Copy failed {} -> {}", src.display(), dest.display()))?;
            fs::remove_file(src)
                .with_context(|| format!("Failed to remove source file {}", src.display()))?;
            Ok(())
        }
    }
}
