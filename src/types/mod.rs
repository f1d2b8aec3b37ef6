use std::ffi::OsStr;
use std::fmt;
use std::marker::PhantomData;
use std::os::unix::ffi::OsStrExt;
use std::str::FromStr;

use libc::{c_char, IFNAMSIZ};

use crate::error::{IfNameError, VfError};

/// Driver-private command: set VF administrative state
pub const PRIVATE_SETVF: u32 = 0x03;
/// `data` value for an up VF
pub const VF_UP: u32 = 0x01;
/// `data` value for a down VF
pub const VF_DOWN: u32 = 0x00;
/// Private ioctl request code (`SIOCDEVPRIVATE + 14`)
pub const SIOCDEVPRIINFO: u32 = 0x89FE;

/// Requested administrative state of a VF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfState {
    Up,
    Down,
}

impl VfState {
    /// Value carried in `VfRequest::data`
    pub fn data(self) -> u32 {
        match self {
            VfState::Up => VF_UP,
            VfState::Down => VF_DOWN,
        }
    }
}

impl FromStr for VfState {
    type Err = VfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("up") {
            Ok(VfState::Up)
        } else if s.eq_ignore_ascii_case("down") {
            Ok(VfState::Down)
        } else {
            Err(VfError::InvalidState(s.to_string()))
        }
    }
}

impl fmt::Display for VfState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfState::Up => f.write_str("up"),
            VfState::Down => f.write_str("down"),
        }
    }
}

/// Payload handed to the driver through `ifr_data`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VfRequest {
    /// Driver command code
    pub command: u32,
    /// Command argument
    pub data: u32,
}

impl VfRequest {
    /// Request asking the driver to move a VF to `state`.
    pub fn set_state(state: VfState) -> Self {
        Self {
            command: PRIVATE_SETVF,
            data: state.data(),
        }
    }
}

/// Interface name that is known to fit `ifr_name` with its NUL terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfName(String);

impl IfName {
    /// Longest name the kernel accepts.
    pub const MAX_LEN: usize = IFNAMSIZ - 1;

    pub fn new(name: &str) -> Result<Self, IfNameError> {
        if name.is_empty() {
            return Err(IfNameError::Empty);
        }
        if name.len() > Self::MAX_LEN {
            return Err(IfNameError::TooLong { max: Self::MAX_LEN });
        }
        if name
            .bytes()
            .any(|b| b == 0 || b == b'/' || b.is_ascii_whitespace())
        {
            return Err(IfNameError::IllegalChar);
        }
        Ok(Self(name.to_string()))
    }

    /// Same checks for a raw command-line argument.
    pub fn from_os(name: &OsStr) -> Result<Self, IfNameError> {
        let bytes = name.as_bytes();
        if bytes.len() > Self::MAX_LEN {
            return Err(IfNameError::TooLong { max: Self::MAX_LEN });
        }
        name.to_str().ok_or(IfNameError::NotUtf8).and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// NUL-padded copy for `ifr_name`.
    fn to_c_name(&self) -> [c_char; IFNAMSIZ] {
        let mut out = [0 as c_char; IFNAMSIZ];
        for (dst, src) in out.iter_mut().zip(self.0.bytes()) {
            *dst = src as c_char;
        }
        out
    }
}

impl fmt::Display for IfName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Layout-compatible `struct ifreq` whose union carries a `VfRequest` pointer.
#[repr(C)]
pub struct IfReq<'a> {
    name: [c_char; IFNAMSIZ],
    ifru: IfReqUnion,
    _request: PhantomData<&'a mut VfRequest>,
}

const IFRU_SIZE: usize = std::mem::size_of::<libc::ifreq>() - IFNAMSIZ;

#[repr(C)]
#[derive(Clone, Copy)]
union IfReqUnion {
    data: *mut VfRequest,
    _pad: [u8; IFRU_SIZE],
}

impl<'a> IfReq<'a> {
    pub fn new(name: &IfName, request: &'a mut VfRequest) -> Self {
        Self {
            name: name.to_c_name(),
            ifru: IfReqUnion {
                data: request as *mut VfRequest,
            },
            _request: PhantomData,
        }
    }

    /// Interface name as stored in the request, without the terminator.
    #[cfg(test)]
    fn name_bytes(&self) -> Vec<u8> {
        self.name
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect()
    }

    #[cfg(test)]
    fn data_ptr(&self) -> *const VfRequest {
        // SAFETY: `data` is the only member ever written by `new`.
        unsafe { self.ifru.data }
    }
}
