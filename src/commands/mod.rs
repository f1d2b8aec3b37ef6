use std::ffi::OsString;

use clap::{CommandFactory, Parser};
use tracing::{debug, error};

use crate::config::{Args, InfoRequest, SetterConfig};
use crate::control::{IoctlControl, VfControl};
use crate::error::{Result, EXIT_USAGE};
use crate::setter::VfSetter;
use crate::status_log::StatusLog;

/// Parse `argv`, change the VF state and return the process exit code.
pub fn run_setter<I, T>(argv: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    run_setter_with(argv, IoctlControl)
}

/// Same as [`run_setter`] over a caller-supplied control channel.
pub fn run_setter_with<I, T, C>(argv: I, control: C) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    C: VfControl,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();

    // Anywhere else these are ordinary positional values
    match InfoRequest::detect(&argv) {
        Some(InfoRequest::Help) => {
            println!("{}", Args::command().render_help());
            return 0;
        }
        Some(InfoRequest::Version) => {
            print!("{}", Args::command().render_version());
            return 0;
        }
        None => {}
    }

    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return EXIT_USAGE;
        }
    };

    let result = args
        .into_config()
        .and_then(|config| set_vf_state(&config, control));

    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{}", err);
            err.exit_code()
        }
    }
}

/// Open the status log, apply the requested state and close the log.
pub fn set_vf_state<C: VfControl>(config: &SetterConfig, control: C) -> Result<()> {
    let mut log = match StatusLog::open(&config.log_path) {
        Ok(log) => log,
        Err(err) => {
            println!("{}, cannot be opened", config.log_path.display());
            return Err(err);
        }
    };

    let result = VfSetter::new(control).apply(&config.ifname, &config.state, &mut log);
    let closed = log.close();
    if result.is_ok() {
        debug!("VF on {:?} set {:?}", config.ifname, config.state);
    }

    result.and(closed)
}
