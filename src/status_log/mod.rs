//! Append-only status log.
//!
//! Every decision point writes one plain-text line here. The file is the
//! only record a caller can use to tell failures apart, so the line
//! formats are fixed.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{IfNameError, Result, VfError};
use crate::types::VfState;

pub const WRONG_VF_STATUS: &str = "wrong vf status";
pub const IFNAME_TOO_LONG: &str = "ifname too long";
pub const INVALID_IFNAME: &str = "invalid ifname";
pub const SOCKET_FAIL: &str = "socket FAIL";
pub const IOCTL_FAIL: &str = "ioctl FAIL";

/// Status log handle, threaded through the setter explicitly.
#[derive(Debug)]
pub struct StatusLog {
    path: PathBuf,
    file: Option<File>,
}

impl StatusLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| VfError::LogOpen {
                path: path.clone(),
                source,
            })?;
        debug!("Opened status log {}", path.display());
        Ok(Self {
            path,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line. Writing to a closed log is an error.
    pub fn record(&mut self, line: &str) -> Result<()> {
        let file = self.file.as_mut().ok_or_else(|| {
            VfError::LogWrite(std::io::Error::new(
                std::io::ErrorKind::Other,
                "status log already closed",
            ))
        })?;
        writeln!(file, "{}", line).map_err(VfError::LogWrite)
    }

    /// `need to make <ifname> <state>`
    pub fn record_intent(&mut self, ifname: &str, state: VfState) -> Result<()> {
        self.record(&format!("need to make {} {}", ifname, state))
    }

    /// Log line for a rejected interface name.
    pub fn record_bad_ifname(&mut self, name_err: IfNameError) -> Result<()> {
        match name_err {
            IfNameError::TooLong { .. } => self.record(IFNAME_TOO_LONG),
            _ => self.record(INVALID_IFNAME),
        }
    }

    /// Flush and close. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(VfError::LogWrite)?;
            debug!("Closed status log {}", self.path.display());
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

impl Drop for StatusLog {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("Failed to close status log {}: {}", self.path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vf.log");
        fs::write(&path, "earlier\n").unwrap();

        let mut log = StatusLog::open(&path).unwrap();
        log.record_intent("eth0", VfState::Up).unwrap();
        log.record(SOCKET_FAIL).unwrap();
        log.close().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "earlier\nneed to make eth0 up\nsocket FAIL\n"
        );
    }

    #[test]
    fn close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = StatusLog::open(dir.path().join("vf.log")).unwrap();
        assert!(log.is_open());
        log.close().unwrap();
        log.close().unwrap();
        assert!(!log.is_open());
        assert!(matches!(log.record("late"), Err(VfError::LogWrite(_))));
    }

    #[test]
    fn open_fails_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = StatusLog::open(dir.path().join("missing").join("vf.log")).unwrap_err();
        assert!(matches!(err, VfError::LogOpen { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn bad_ifname_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vf.log");
        let mut log = StatusLog::open(&path).unwrap();
        log.record_bad_ifname(IfNameError::TooLong { max: 15 }).unwrap();
        log.record_bad_ifname(IfNameError::Empty).unwrap();
        drop(log);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "ifname too long\ninvalid ifname\n"
        );
    }
}
