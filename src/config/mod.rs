use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, VfError};

/// Set the administrative state of a NIC virtual function
#[derive(Parser, Debug)]
#[clap(
    name = "nic-vf-status",
    author,
    version,
    about,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    /// Network interface whose driver owns the VF (e.g. eth0)
    #[clap(allow_hyphen_values = true)]
    pub ifname: Option<OsString>,

    /// Desired VF state: up or down, any case
    #[clap(allow_hyphen_values = true)]
    pub state: Option<OsString>,

    /// Status log, created if absent and appended to otherwise
    #[clap(allow_hyphen_values = true)]
    pub log_file: Option<PathBuf>,

    /// Anything after the log file is ignored
    #[clap(hide = true, allow_hyphen_values = true, trailing_var_arg = true)]
    pub rest: Vec<OsString>,
}

/// What a lone `--help`/`--version` asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoRequest {
    Help,
    Version,
}

impl InfoRequest {
    /// `argv` (program name first) holding nothing but a help or version flag.
    pub fn detect(argv: &[OsString]) -> Option<Self> {
        match argv {
            [_, flag] if flag == "-h" || flag == "--help" => Some(InfoRequest::Help),
            [_, flag] if flag == "-V" || flag == "--version" => Some(InfoRequest::Version),
            _ => None,
        }
    }
}

/// One validated invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetterConfig {
    /// Interface name as given on the command line
    pub ifname: OsString,
    /// Requested state, not yet interpreted
    pub state: OsString,
    /// Status log path
    pub log_path: PathBuf,
}

impl Args {
    /// Require all three positionals. Their contents are checked later.
    pub fn into_config(self) -> Result<SetterConfig> {
        let ifname = self.ifname.ok_or(VfError::MissingArgument("interface name"))?;
        let state = self.state.ok_or(VfError::MissingArgument("state"))?;
        let log_path = self.log_file.ok_or(VfError::MissingArgument("log file"))?;

        Ok(SetterConfig {
            ifname,
            state,
            log_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn three_positionals() {
        let conf = parse(&["nic-vf-status", "eth0", "up", "/tmp/vf.log"])
            .into_config()
            .unwrap();
        assert_eq!(
            conf,
            SetterConfig {
                ifname: "eth0".into(),
                state: "up".into(),
                log_path: PathBuf::from("/tmp/vf.log"),
            }
        );
    }

    #[test]
    fn missing_positionals() {
        let err = parse(&["nic-vf-status", "eth0", "up"]).into_config().unwrap_err();
        assert!(matches!(err, VfError::MissingArgument("log file")));

        let err = parse(&["nic-vf-status"]).into_config().unwrap_err();
        assert!(matches!(err, VfError::MissingArgument("interface name")));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn hyphen_values_stay_positional() {
        for state in ["-x", "-1", "--help", "--version", "--bogus"] {
            let conf = parse(&["nic-vf-status", "eth0", state, "vf.log"])
                .into_config()
                .unwrap();
            assert_eq!(conf.state, state);
            assert_eq!(conf.log_path, PathBuf::from("vf.log"));
        }

        let conf = parse(&["nic-vf-status", "-eth0", "up", "vf.log", "-v"])
            .into_config()
            .unwrap();
        assert_eq!(conf.ifname, "-eth0");
    }

    #[test]
    fn lone_info_flags() {
        let argv = |args: &[&str]| args.iter().map(OsString::from).collect::<Vec<_>>();
        assert_eq!(
            InfoRequest::detect(&argv(&["nic-vf-status", "--help"])),
            Some(InfoRequest::Help)
        );
        assert_eq!(
            InfoRequest::detect(&argv(&["nic-vf-status", "-V"])),
            Some(InfoRequest::Version)
        );
        assert_eq!(
            InfoRequest::detect(&argv(&["nic-vf-status", "eth0", "--help", "vf.log"])),
            None
        );
    }

    #[test]
    fn trailing_arguments_ignored() {
        let conf = parse(&["nic-vf-status", "eth0", "down", "vf.log", "extra", "more"])
            .into_config()
            .unwrap();
        assert_eq!(conf.state, "down");
        assert_eq!(conf.log_path, PathBuf::from("vf.log"));
    }
}
