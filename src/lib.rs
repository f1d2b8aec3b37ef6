//! NIC virtual function state setter
//!
//! Sends a driver-private `SIOCDEVPRIINFO` ioctl that asks the NIC driver
//! to bring a VF administratively up or down:
//! - parses `<ifname> <up|down> <log-file>`
//! - appends a status line to the log at every decision point
//! - issues one ioctl over a throwaway datagram socket

pub mod commands;
pub mod config;
pub mod control;
pub mod error;
pub mod setter;
pub mod status_log;
pub mod types;

// Re-export commonly used items
pub use commands::{run_setter, run_setter_with, set_vf_state};
pub use config::{Args, SetterConfig};
pub use control::{IoctlControl, VfChannel, VfControl};
pub use error::VfError;
pub use setter::VfSetter;
pub use status_log::StatusLog;
pub use types::{IfName, VfRequest, VfState};
