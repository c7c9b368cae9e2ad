//! Future Technology Devices International (FTDI) produces a family of USB
//! bridge chips (FT232R, FT2232H, FT4232H and friends) that carry a serial,
//! FIFO or MPSSE bus over USB. FTDI provides a proprietary driver for these
//! chips, called D2XX, which exposes a low-level API for interacting with the
//! devices through its DLL/shared library.
//!
//! This crate provides a safe, idiomatic Rust wrapper around FTDI's D2XX
//! library.
//!
//! # Disclaimer
//!
//! This crate is unofficial and is not affiliated with FTDI in any way.
//!
//! # What This Crate Does
//!
//! This crate wraps the device-facing portion of the D2XX API:
//! - Device enumeration
//! - Opening and closing devices
//! - Byte-stream reads and writes
//! - Serial configuration (baud rate, framing, special characters, timeouts)
//! - Bit modes, latency timer and USB transfer sizes
//! - DTR/RTS/break control signals and modem status
//! - EEPROM word access
//! - Custom VID/PID registration (non-Windows)
//!
//! The crate forwards each operation to one driver entry point and translates
//! the returned status code; it implements no USB transport or chip logic of
//! its own.
//!
//! # Requirements
//!
//! This crate is available for Linux, Windows, and macOS. The FTDI D2XX
//! library is linked statically by default (the `static` feature, enabled by
//! default, selects the library vendored by `libftd2xx-ffi`); the D2XX driver
//! must be installed for the target platform in order to communicate with
//! devices.
//!
//! # D2XX Constraints
//!
//! The D2XX API does not provide many guarantees about the behavior of the
//! driver; in particular nothing is documented about thread safety. This
//! crate therefore assumes the driver is not thread-safe: a [`Device`] is
//! neither `Send` nor `Sync`, and enumeration runs under a global lock
//! (see [`ffi::with_global_lock`]) because it is a write followed by a read
//! of the driver's device table.
//!
//! ## Error Handling
//!
//! Every fallible function returns `Result<T, D2xxError>`. The D2XX
//! documentation rarely says which errors a given entry point can produce, so
//! the error carries the raw status code and the name of the entry point that
//! failed, and callers are expected to use a catch-all approach rather than
//! match on specific codes.
//!
//! # Simple Example
//!
//! ```no_run
//! use d2xx::list_devices;
//!
//! // Scan for connected devices.
//! let mut all_devices = list_devices().expect("failed to list devices");
//!
//! // Open the first device found.
//! let device = &mut all_devices[0];
//! device.open().expect("failed to open device");
//! device.set_baud_rate(9600).expect("failed to set baud rate");
//!
//! // Write 8 bytes, then read back up to 8 bytes.
//! let out = [0u8; 8];
//! device.write(&out).expect("failed to write");
//! let mut buf = [0u8; 8];
//! let n = device.read(&mut buf).expect("failed to read");
//! println!("read {n} bytes");
//!
//! device.close().expect("failed to close device");
//! ```
#![warn(clippy::all, clippy::pedantic, clippy::cargo, missing_docs)]
// Allow missing error documentation since the D2XX documentation is vague
// about error conditions.
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod device;
mod error;
pub mod ffi;
pub mod prelude;
mod scan;
pub mod serial;

pub use device::{Device, DeviceType, Handle};
pub use error::{D2xxError, Result, Status};
pub use scan::{device_count, list_devices};

pub(crate) use error::try_ft;

/// Get the version of the D2XX library.
///
/// This is *not* the driver version; see
/// [`Device::driver_version`](crate::Device::driver_version) for that.
#[allow(clippy::cast_possible_truncation)]
pub fn library_version() -> Result<Version> {
    let mut version: ffi::DWORD = 0;
    try_ft!("FT_GetLibraryVersion", unsafe {
        ffi::FT_GetLibraryVersion(&mut version)
    })?;
    Ok(Version(version as u32))
}

/// Register a custom VID/PID combination with the driver's device list table,
/// allowing the driver to load for devices reprogrammed away from the factory
/// IDs.
///
/// On Windows this is a no-op: the D2XX driver there does not export
/// `FT_SetVIDPID`, since device matching is handled by the installed INF
/// instead. On other platforms the pair is forwarded verbatim.
#[cfg(not(windows))]
pub fn set_vid_pid(vid: u16, pid: u16) -> Result<()> {
    try_ft!("FT_SetVIDPID", unsafe {
        ffi::FT_SetVIDPID(vid.into(), pid.into())
    })
}

/// Register a custom VID/PID combination with the driver's device list table,
/// allowing the driver to load for devices reprogrammed away from the factory
/// IDs.
///
/// On Windows this is a no-op: the D2XX driver there does not export
/// `FT_SetVIDPID`, since device matching is handled by the installed INF
/// instead. On other platforms the pair is forwarded verbatim.
#[cfg(windows)]
pub fn set_vid_pid(_vid: u16, _pid: u16) -> Result<()> {
    Ok(())
}

/// D2XX library or driver version, encoded as `0x00MMmmpp`.
pub struct Version(u32);

impl Version {
    /// Major version number.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn major(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Minor version number.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn minor(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Build/patch version number.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn build(&self) -> u8 {
        self.0 as u8
    }

    /// The raw version encoding, as reported by the driver.
    #[must_use]
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_decodes_packed_bytes() {
        let version = Version(0x0003_0115);
        assert_eq!(version.major(), 3);
        assert_eq!(version.minor(), 1);
        assert_eq!(version.build(), 0x15);
        assert_eq!(version.raw(), 0x0003_0115);
    }

    #[test]
    fn version_displays_dotted_decimal() {
        assert_eq!(Version(0x0003_0115).to_string(), "3.1.21");
        assert_eq!(Version(0).to_string(), "0.0.0");
    }
}
