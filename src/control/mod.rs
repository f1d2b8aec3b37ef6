use std::os::unix::io::RawFd;

use nix::sys::socket::{socket, AddressFamily, SockFlag, SockType};
use nix::unistd::close;
use tracing::{debug, warn};

use crate::types::{IfName, IfReq, VfRequest, SIOCDEVPRIINFO};

mod ioctl {
    use crate::types::{IfReq, SIOCDEVPRIINFO};
    nix::ioctl_write_ptr_bad!(siocdevpriinfo, SIOCDEVPRIINFO, IfReq<'_>);
}

/// Source of control channels to the NIC driver.
pub trait VfControl {
    type Channel: VfChannel;

    /// Acquire a channel. Dropping it releases the underlying handle.
    fn open_channel(&self) -> nix::Result<Self::Channel>;
}

/// One open channel able to carry private driver requests.
pub trait VfChannel {
    fn send(&mut self, ifname: &IfName, request: &mut VfRequest) -> nix::Result<()>;
}

/// Talks to the driver with `SIOCDEVPRIINFO` over an `AF_INET` datagram socket.
#[derive(Debug, Default, Clone, Copy)]
pub struct IoctlControl;

impl VfControl for IoctlControl {
    type Channel = ControlSocket;

    fn open_channel(&self) -> nix::Result<ControlSocket> {
        ControlSocket::open()
    }
}

/// Datagram socket used only as an ioctl handle. Closed on drop.
#[derive(Debug)]
pub struct ControlSocket {
    fd: RawFd,
}

impl ControlSocket {
    pub fn open() -> nix::Result<Self> {
        let fd = socket(
            AddressFamily::Inet,
            SockType::Datagram,
            SockFlag::SOCK_CLOEXEC,
            None,
        )?;
        debug!("Opened control socket fd {}", fd);
        Ok(Self { fd })
    }
}

impl VfChannel for ControlSocket {
    fn send(&mut self, ifname: &IfName, request: &mut VfRequest) -> nix::Result<()> {
        debug!(
            "ioctl {:#x} on {}: command={:#x} data={}",
            SIOCDEVPRIINFO, ifname, request.command, request.data
        );
        let ifr = IfReq::new(ifname, request);
        // SAFETY: `ifr` and the request it points at outlive the call.
        unsafe { ioctl::siocdevpriinfo(self.fd, &ifr) }.map(|_| ())
    }
}

impl Drop for ControlSocket {
    fn drop(&mut self) {
        match close(self.fd) {
            Ok(()) => debug!("Closed control socket fd {}", self.fd),
            Err(err) => warn!("Failed to close control socket fd {}: {}", self.fd, err),
        }
    }
}
