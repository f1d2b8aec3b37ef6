use std::ffi::OsStr;

use tracing::{error, info, warn};

use crate::control::{VfChannel, VfControl};
use crate::error::{Result, VfError};
use crate::status_log::{StatusLog, IOCTL_FAIL, SOCKET_FAIL, WRONG_VF_STATUS};
use crate::types::{IfName, VfRequest, VfState};

/// Drives one VF state change over a control channel.
pub struct VfSetter<C> {
    control: C,
}

impl<C: VfControl> VfSetter<C> {
    pub fn new(control: C) -> Self {
        Self { control }
    }

    /// Ask the driver behind `ifname` to move its VF to `state`.
    ///
    /// Each outcome leaves its line in `log`; the log is not closed here.
    pub fn apply(
        &self,
        ifname: impl AsRef<OsStr>,
        state: impl AsRef<OsStr>,
        log: &mut StatusLog,
    ) -> Result<()> {
        let (ifname, state) = (ifname.as_ref(), state.as_ref());
        let parsed = match state.to_str() {
            Some(state) => state.parse::<VfState>(),
            None => Err(VfError::InvalidState(state.to_string_lossy().into_owned())),
        };
        let state = match parsed {
            Ok(state) => state,
            Err(err) => {
                error!("Rejected VF state {:?}", state);
                note(log, WRONG_VF_STATUS);
                return Err(err);
            }
        };
        let display_name = ifname.to_string_lossy();
        log.record_intent(&display_name, state)?;
        info!("Setting VF on {} {}", display_name, state);

        let name = match IfName::from_os(ifname) {
            Ok(name) => name,
            Err(reason) => {
                error!("Rejected interface name {:?}: {}", ifname, reason);
                if let Err(err) = log.record_bad_ifname(reason) {
                    warn!("Failed to record bad interface name: {}", err);
                }
                return Err(VfError::InterfaceName {
                    name: display_name.into_owned(),
                    reason,
                });
            }
        };

        let mut request = VfRequest::set_state(state);
        self.send_request(&name, &mut request, log)
    }

    fn send_request(
        &self,
        ifname: &IfName,
        request: &mut VfRequest,
        log: &mut StatusLog,
    ) -> Result<()> {
        let mut channel = match self.control.open_channel() {
            Ok(channel) => channel,
            Err(errno) => {
                error!("Failed to open control socket: {}", errno);
                note(log, SOCKET_FAIL);
                return Err(VfError::Socket(errno));
            }
        };

        let sent = channel.send(ifname, request);
        drop(channel);

        match sent {
            Ok(()) => {
                info!("VF on {} accepted state data={}", ifname, request.data);
                Ok(())
            }
            Err(errno) => {
                error!("Private ioctl on {} failed: {}", ifname, errno);
                note(log, IOCTL_FAIL);
                Err(VfError::Ioctl {
                    ifname: ifname.to_string(),
                    source: errno,
                })
            }
        }
    }
}

// The caller's failure wins over a failed log write.
fn note(log: &mut StatusLog, line: &str) {
    if let Err(err) = log.record(line) {
        warn!("Failed to record {:?} in {}: {}", line, log.path().display(), err);
    }
}
