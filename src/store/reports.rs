//! Report archive: write-once markdown documents under `reports/`.

use regex::Regex;
use std::io::{ErrorKind, Write};
use std::sync::LazyLock;

use super::{Store, StoreError, StoreResult};

static REPORT_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*\.md$").expect("static regex"));

/// `true` if `filename` is acceptable as a report name.
pub fn is_valid_report_filename(filename: &str) -> bool {
    REPORT_FILENAME.is_match(filename)
}

fn check_filename(filename: &str) -> StoreResult<()> {
    if is_valid_report_filename(filename) {
        Ok(())
    } else {
        Err(StoreError::InvalidFilename(filename.to_string()))
    }
}

impl Store {
    /// Names of all `.md` files in the archive, newest-looking first
    /// (descending lexical order).
    pub fn list_reports(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.reports_dir())? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".md") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort_unstable_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Markdown content of report `filename`.
    pub fn get_report(&self, filename: &str) -> StoreResult<String> {
        check_filename(filename)?;

        match std::fs::read_to_string(self.reports_dir().join(filename)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::not_found("report", filename))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write a new report. Existing reports are never overwritten.
    ///
    /// Content is stored verbatim. The file is created with `create_new`, so
    /// two racing writers of the same name cannot both succeed.
    pub fn create_report(&self, filename: &str, content: &str) -> StoreResult<()> {
        check_filename(filename)?;

        let path = self.reports_dir().join(filename);
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::already_exists("report", filename));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = file.write_all(content.as_bytes()).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = std::fs::remove_file(&path);
            return Err(e.into());
        }

        tracing::info!(filename, bytes = content.len(), "report created");
        Ok(())
    }
}
