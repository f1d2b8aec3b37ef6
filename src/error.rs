use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code for usage errors and an unopenable status log.
pub const EXIT_USAGE: i32 = 1;

/// Exit code for every other failure (a C `return -1` as seen by the shell).
pub const EXIT_FAILURE: i32 = 255;

/// Everything that can stop a VF state change.
#[derive(Debug, Error)]
pub enum VfError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("failed to open status log {}", path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write status log")]
    LogWrite(#[source] io::Error),

    #[error("wrong vf status {0:?} (expected up or down)")]
    InvalidState(String),

    #[error("invalid interface name {name:?}: {reason}")]
    InterfaceName { name: String, reason: IfNameError },

    #[error("failed to open control socket")]
    Socket(#[source] nix::Error),

    #[error("private ioctl on {ifname} failed")]
    Ioctl {
        ifname: String,
        #[source]
        source: nix::Error,
    },
}

impl VfError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            VfError::MissingArgument(_) | VfError::LogOpen { .. } => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

/// Why an interface name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IfNameError {
    #[error("name is empty")]
    Empty,
    #[error("name is longer than {max} bytes")]
    TooLong { max: usize },
    #[error("name contains NUL, '/' or whitespace")]
    IllegalChar,
    #[error("name is not valid UTF-8")]
    NotUtf8,
}

pub type Result<T> = std::result::Result<T, VfError>;
