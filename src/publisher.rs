use crate::error::InventoryError;
use crate::run_stamp::RunStamp;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

static REPORT_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^aws-inventory-\d{8}-\d{6}(\.txt|\.pretty\.txt|\.tsv)$")
        .expect("report file pattern is valid")
});

#[derive(Debug, PartialEq)]
pub struct PublishedReport {
    pub raw: PathBuf,
    pub pretty: PathBuf,
    pub spreadsheet: PathBuf,
    pub shared_copy: Option<PathBuf>,
}

pub struct Publisher {
    output_dir: PathBuf,
    shared_output_dir: Option<PathBuf>,
}

impl Publisher {
    pub fn new(output_dir: PathBuf, shared_output_dir: Option<PathBuf>) -> Self {
        Publisher {
            output_dir,
            shared_output_dir,
        }
    }

    /// Replaces earlier reports with this run's three files and copies the
    /// spreadsheet into the shared directory.
    pub fn publish(
        &self,
        stamp: &RunStamp,
        raw: &str,
        pretty: &str,
        spreadsheet: &str,
    ) -> Result<PublishedReport, InventoryError> {
        create_dir(&self.output_dir)?;
        let shared_dir = match self.shared_output_dir {
            Some(ref shared_dir) => {
                create_dir(shared_dir)?;
                Some(shared_dir)
            }
            None => None,
        };
        let shared_is_output = match shared_dir {
            Some(shared_dir) => same_dir(&self.output_dir, shared_dir)?,
            None => false,
        };

        // Both directories are cleaned before anything of this run is written.
        let removed = remove_stale_reports(&self.output_dir)?;
        debug!("removed {} stale reports from {}", removed, self.output_dir.display());
        if let Some(shared_dir) = shared_dir {
            if !shared_is_output {
                let removed = remove_stale_reports(shared_dir)?;
                debug!("removed {} stale reports from {}", removed, shared_dir.display());
            }
        }

        let raw_path = self.output_dir.join(stamp.raw_file_name());
        let pretty_path = self.output_dir.join(stamp.pretty_file_name());
        let spreadsheet_path = self.output_dir.join(stamp.spreadsheet_file_name());
        write_file(&raw_path, raw)?;
        write_file(&pretty_path, pretty)?;
        write_file(&spreadsheet_path, spreadsheet)?;

        let shared_copy = match shared_dir {
            Some(_) if shared_is_output => {
                info!("shared directory is the output directory, skipping shared copy");
                Some(spreadsheet_path.clone())
            }
            Some(shared_dir) => {
                let destination = shared_dir.join(stamp.spreadsheet_file_name());
                fs::copy(&spreadsheet_path, &destination)
                    .map_err(|source| io_error(&destination, source))?;
                info!("copied spreadsheet report to {}", destination.display());
                Some(destination)
            }
            None => {
                warn!("no shared output directory configured, skipping shared copy");
                None
            }
        };

        Ok(PublishedReport {
            raw: raw_path,
            pretty: pretty_path,
            spreadsheet: spreadsheet_path,
            shared_copy,
        })
    }
}

/// Deletes regular files in `dir` named like a report of any earlier run.
pub fn remove_stale_reports(dir: &Path) -> Result<usize, InventoryError> {
    let entries = fs::read_dir(dir).map_err(|source| io_error(dir, source))?;
    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|source| io_error(dir, source))?;
        let path = entry.path();
        let is_report = entry
            .file_name()
            .to_str()
            .map_or(false, |name| REPORT_FILE.is_match(name));
        if !is_report || !path.is_file() {
            continue;
        }
        fs::remove_file(&path).map_err(|source| io_error(&path, source))?;
        debug!("removed {}", path.display());
        removed += 1;
    }
    Ok(removed)
}

fn same_dir(left: &Path, right: &Path) -> Result<bool, InventoryError> {
    let left = fs::canonicalize(left).map_err(|source| io_error(left, source))?;
    let right = fs::canonicalize(right).map_err(|source| io_error(right, source))?;
    Ok(left == right)
}

fn create_dir(dir: &Path) -> Result<(), InventoryError> {
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))
}

fn write_file(path: &Path, content: &str) -> Result<(), InventoryError> {
    fs::write(path, content).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> InventoryError {
    InventoryError::Io {
        path: path.to_path_buf(),
        source,
    }
}
