use std::{ffi::CStr, fmt::Display, ptr::addr_of_mut};

use log::{debug, trace};
use num_enum::FromPrimitive;

use crate::{
    ffi,
    serial::{BitMode, ModemStatus, Parity, StopBits, WordLength},
    try_ft, Result, Version,
};

/// Opaque token issued by the driver when a device is opened.
///
/// A handle is constructed only by [`Device::open`] and invalidated by
/// [`Device::close`]; no operations beyond pass-through to the driver are
/// exposed. A closed handle is the null sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle(ffi::FT_HANDLE);

impl Handle {
    pub(crate) const fn closed() -> Self {
        Self(std::ptr::null_mut())
    }

    pub(crate) fn from_raw(raw: ffi::FT_HANDLE) -> Self {
        Self(raw)
    }

    /// The raw `FT_HANDLE`.
    ///
    /// This is fairly useless on its own. Although not recommended for typical
    /// users, it may be used with the raw D2XX bindings in the [`ffi`](crate::ffi)
    /// module.
    #[must_use]
    pub fn as_raw(&self) -> ffi::FT_HANDLE {
        self.0
    }

    /// Whether this is the closed (null) sentinel.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.is_null()
    }
}

/// D2XX device type codes, as reported in the enumeration data.
///
/// The discriminants are positional in the `FT_DEVICE` code space from
/// `ftd2xx.h`; codes this crate does not know about map to
/// [`DeviceType::Unknown`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, FromPrimitive)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum DeviceType {
    Ft232B = 0,
    Ft232Am = 1,
    Ft100Ax = 2,
    #[num_enum(default)]
    Unknown = 3,
    Ft2232C = 4,
    Ft232R = 5,
    Ft2232H = 6,
    Ft4232H = 7,
    Ft232H = 8,
    FtXSeries = 9,
    Ft4222HMode0 = 10,
    Ft4222HMode1And2 = 11,
    Ft4222HMode3 = 12,
    Ft4222Prog = 13,
}

/// A D2XX device, as reported by [`list_devices`](crate::list_devices).
///
/// The descriptive fields are a snapshot of the driver's
/// `FT_DEVICE_LIST_INFO_NODE` for this device. [`Device::open`] begins a
/// session and stores the driver-issued [`Handle`]; every per-device operation
/// passes that handle back to the driver and translates a non-zero status into
/// a [`D2xxError`](crate::D2xxError) naming the failed entry point.
///
/// A `Device` is neither `Send` nor `Sync`: the driver makes no thread-safety
/// guarantees for concurrent calls on one handle, so callers must serialize.
///
/// # Example
///
/// ```no_run
/// use d2xx::list_devices;
///
/// let mut devices = list_devices().expect("failed to list devices");
/// let device = &mut devices[0];
///
/// device.open().expect("failed to open device");
/// device.set_baud_rate(115_200).expect("failed to set baud rate");
/// device.write(b"hello").expect("failed to write");
/// device.close().expect("failed to close device");
/// ```
#[derive(Debug)]
pub struct Device {
    /// Position in the enumeration this device came from.
    index: i32,
    flags: u32,
    device_type: u32,
    id: u32,
    location_id: u32,
    serial_number: String,
    description: String,
    handle: Handle,
}

impl Device {
    /// Build a descriptor from one node of the driver's device info list.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn from_info_node(index: i32, node: &ffi::FT_DEVICE_LIST_INFO_NODE) -> Self {
        // SAFETY: the driver guarantees the strings are null-terminated.
        let serial_number = unsafe { CStr::from_ptr(node.SerialNumber.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        let description = unsafe { CStr::from_ptr(node.Description.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        Self {
            index,
            flags: node.Flags as u32,
            device_type: node.Type as u32,
            id: node.ID as u32,
            location_id: node.LocId as u32,
            serial_number,
            description,
            handle: Handle::from_raw(node.ftHandle),
        }
    }

    /// Position of this device in the enumeration it came from.
    #[must_use]
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Driver-reported flag bits, plus the open state maintained by
    /// [`open`](Device::open)/[`close`](Device::close).
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Whether a session is open on this device.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.flags & ffi::FT_FLAGS_OPENED != 0
    }

    /// Whether the device is enumerated at USB Hi-Speed (480 Mb/s).
    #[must_use]
    pub fn is_high_speed(&self) -> bool {
        self.flags & ffi::FT_FLAGS_HISPEED != 0
    }

    /// The device type code, mapped onto [`DeviceType`].
    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        DeviceType::from(self.device_type)
    }

    /// Vendor-assigned identifier, encoding the USB VID in the upper half and
    /// the PID in the lower half.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The USB vendor ID.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn vendor_id(&self) -> u16 {
        (self.id >> 16) as u16
    }

    /// The USB product ID.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn product_id(&self) -> u16 {
        self.id as u16
    }

    /// The USB location ID.
    #[must_use]
    pub fn location_id(&self) -> u32 {
        self.location_id
    }

    /// Device serial number from the enumeration data.
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Device description from the enumeration data.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The session handle. Closed (null) unless a session is open.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Begin a session, storing the driver-issued handle.
    ///
    /// Fails if the native open fails, for example when the device was removed
    /// or is already opened elsewhere; the descriptor is left untouched in that
    /// case.
    pub fn open(&mut self) -> Result<()> {
        let mut handle: ffi::FT_HANDLE = std::ptr::null_mut();
        try_ft!("FT_Open", unsafe {
            ffi::FT_Open(self.index, addr_of_mut!(handle))
        })?;
        debug!("opened device {} ({})", self.index, self.serial_number);
        // Flag update comes last: the open bit must never be observable
        // alongside the closed handle sentinel.
        self.handle = Handle::from_raw(handle);
        self.flags |= ffi::FT_FLAGS_OPENED;
        Ok(())
    }

    /// End the session and invalidate the handle.
    ///
    /// Closing a device that was never opened is left to the driver, which
    /// reports it as an error status.
    pub fn close(&mut self) -> Result<()> {
        try_ft!("FT_Close", unsafe { ffi::FT_Close(self.handle.as_raw()) })?;
        debug!("closed device {} ({})", self.index, self.serial_number);
        // Handle is zeroed last; a cleared flag with a stale token is
        // harmless, the reverse is not.
        self.flags &= !ffi::FT_FLAGS_OPENED;
        self.handle = Handle::closed();
        Ok(())
    }

    /// Read from the device into `buf`.
    ///
    /// Blocks until `buf.len()` bytes arrive or the configured read timeout
    /// expires. Returns the number of bytes actually read; only that prefix of
    /// `buf` is written.
    ///
    /// # Panics
    ///
    /// Panics if `buf.len()` exceeds [`ffi::DWORD::MAX`].
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let mut bytes_read: ffi::DWORD = 0;
        try_ft!("FT_Read", unsafe {
            ffi::FT_Read(
                self.handle.as_raw(),
                buf.as_mut_ptr().cast(),
                ffi::DWORD::try_from(buf.len()).expect("buffer length exceeds DWORD::MAX"),
                addr_of_mut!(bytes_read),
            )
        })?;
        trace!("read {bytes_read} of {} requested bytes", buf.len());
        Ok(bytes_read as usize)
    }

    /// Write the whole of `buf` to the device.
    ///
    /// Returns the number of bytes actually written, which may be less than
    /// `buf.len()` if the configured write timeout expires.
    ///
    /// # Panics
    ///
    /// Panics if `buf.len()` exceeds [`ffi::DWORD::MAX`].
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let mut bytes_written: ffi::DWORD = 0;
        try_ft!("FT_Write", unsafe {
            ffi::FT_Write(
                self.handle.as_raw(),
                buf.as_ptr().cast_mut().cast(),
                ffi::DWORD::try_from(buf.len()).expect("buffer length exceeds DWORD::MAX"),
                addr_of_mut!(bytes_written),
            )
        })?;
        trace!("wrote {bytes_written} of {} bytes", buf.len());
        Ok(bytes_written as usize)
    }

    /// Send a reset command to the device.
    pub fn reset(&self) -> Result<()> {
        try_ft!("FT_ResetDevice", unsafe {
            ffi::FT_ResetDevice(self.handle.as_raw())
        })
    }

    /// Number of bytes pending in the receive queue.
    pub fn queue_status(&self) -> Result<usize> {
        let mut pending: ffi::DWORD = 0;
        try_ft!("FT_GetQueueStatus", unsafe {
            ffi::FT_GetQueueStatus(self.handle.as_raw(), addr_of_mut!(pending))
        })?;
        Ok(pending as usize)
    }

    /// The D2XX driver version.
    ///
    /// The device must be open before calling this function.
    #[allow(clippy::cast_possible_truncation)]
    pub fn driver_version(&self) -> Result<Version> {
        let mut version: ffi::DWORD = 0;
        try_ft!("FT_GetDriverVersion", unsafe {
            ffi::FT_GetDriverVersion(self.handle.as_raw(), addr_of_mut!(version))
        })?;
        Ok(Version(version as u32))
    }

    /// The modem and line status signals.
    #[allow(clippy::cast_possible_truncation)]
    pub fn modem_status(&self) -> Result<ModemStatus> {
        let mut status: ffi::ULONG = 0;
        try_ft!("FT_GetModemStatus", unsafe {
            ffi::FT_GetModemStatus(self.handle.as_raw(), addr_of_mut!(status))
        })?;
        Ok(ModemStatus::new(status as u32))
    }

    /// The instantaneous value of the data bus.
    pub fn bit_mode(&self) -> Result<u8> {
        let mut mode: ffi::UCHAR = 0;
        try_ft!("FT_GetBitMode", unsafe {
            ffi::FT_GetBitMode(self.handle.as_raw(), addr_of_mut!(mode))
        })?;
        Ok(mode)
    }

    /// Enable a chip mode.
    ///
    /// `pin_direction` sets up which bits are inputs and outputs; 0 = input,
    /// 1 = output.
    pub fn set_bit_mode(&self, pin_direction: u8, mode: BitMode) -> Result<()> {
        try_ft!("FT_SetBitMode", unsafe {
            ffi::FT_SetBitMode(self.handle.as_raw(), pin_direction, mode.into())
        })
    }

    /// Set the baud rate.
    pub fn set_baud_rate(&self, baud_rate: u32) -> Result<()> {
        try_ft!("FT_SetBaudRate", unsafe {
            ffi::FT_SetBaudRate(self.handle.as_raw(), baud_rate.into())
        })
    }

    /// The current latency timer value, in milliseconds.
    pub fn latency_timer(&self) -> Result<u8> {
        let mut timer: ffi::UCHAR = 0;
        try_ft!("FT_GetLatencyTimer", unsafe {
            ffi::FT_GetLatencyTimer(self.handle.as_raw(), addr_of_mut!(timer))
        })?;
        Ok(timer)
    }

    /// Set the latency timer value.
    ///
    /// The receive buffer timeout that is used to flush remaining data from
    /// the receive buffer is programmable at 1 ms intervals between 2 ms and
    /// 255 ms on all devices after the FT8U232AM/FT8U245AM.
    pub fn set_latency_timer(&self, timer_ms: u8) -> Result<()> {
        try_ft!("FT_SetLatencyTimer", unsafe {
            ffi::FT_SetLatencyTimer(self.handle.as_raw(), timer_ms)
        })
    }

    /// Set the special event and error characters.
    ///
    /// The enable flags are forwarded to the driver as 0/1.
    pub fn set_chars(
        &self,
        event: u8,
        event_enable: bool,
        error: u8,
        error_enable: bool,
    ) -> Result<()> {
        try_ft!("FT_SetChars", unsafe {
            ffi::FT_SetChars(
                self.handle.as_raw(),
                event,
                u8::from(event_enable),
                error,
                u8::from(error_enable),
            )
        })
    }

    /// Set the serial framing: word length, stop bits and parity.
    pub fn set_data_characteristics(
        &self,
        word_length: WordLength,
        stop_bits: StopBits,
        parity: Parity,
    ) -> Result<()> {
        try_ft!("FT_SetDataCharacteristics", unsafe {
            ffi::FT_SetDataCharacteristics(
                self.handle.as_raw(),
                word_length.into(),
                stop_bits.into(),
                parity.into(),
            )
        })
    }

    /// Assert the Data Terminal Ready (DTR) control signal.
    pub fn set_dtr(&self) -> Result<()> {
        try_ft!("FT_SetDtr", unsafe { ffi::FT_SetDtr(self.handle.as_raw()) })
    }

    /// Clear the Data Terminal Ready (DTR) control signal.
    pub fn clear_dtr(&self) -> Result<()> {
        try_ft!("FT_ClrDtr", unsafe { ffi::FT_ClrDtr(self.handle.as_raw()) })
    }

    /// Assert the Request To Send (RTS) control signal.
    pub fn set_rts(&self) -> Result<()> {
        try_ft!("FT_SetRts", unsafe { ffi::FT_SetRts(self.handle.as_raw()) })
    }

    /// Clear the Request To Send (RTS) control signal.
    pub fn clear_rts(&self) -> Result<()> {
        try_ft!("FT_ClrRts", unsafe { ffi::FT_ClrRts(self.handle.as_raw()) })
    }

    /// Set or reset the break condition.
    pub fn set_break(&self, on: bool) -> Result<()> {
        if on {
            try_ft!("FT_SetBreakOn", unsafe {
                ffi::FT_SetBreakOn(self.handle.as_raw())
            })
        } else {
            try_ft!("FT_SetBreakOff", unsafe {
                ffi::FT_SetBreakOff(self.handle.as_raw())
            })
        }
    }

    /// Set the read and write timeouts, in milliseconds.
    pub fn set_timeouts(&self, read_timeout_ms: u32, write_timeout_ms: u32) -> Result<()> {
        try_ft!("FT_SetTimeouts", unsafe {
            ffi::FT_SetTimeouts(
                self.handle.as_raw(),
                read_timeout_ms.into(),
                write_timeout_ms.into(),
            )
        })
    }

    /// Set the USB request transfer sizes.
    ///
    /// Sizes must be a multiple of 64 bytes between 64 bytes and 64 kB. The
    /// change takes effect immediately and any data held in the driver at the
    /// time is lost.
    pub fn set_usb_parameters(
        &self,
        in_transfer_size: u32,
        out_transfer_size: u32,
    ) -> Result<()> {
        try_ft!("FT_SetUSBParameters", unsafe {
            ffi::FT_SetUSBParameters(
                self.handle.as_raw(),
                in_transfer_size.into(),
                out_transfer_size.into(),
            )
        })
    }

    /// Erase the device EEPROM.
    pub fn erase_ee(&self) -> Result<()> {
        try_ft!("FT_EraseEE", unsafe { ffi::FT_EraseEE(self.handle.as_raw()) })
    }

    /// Read a 16-bit word from an EEPROM location.
    pub fn read_ee(&self, word_offset: u32) -> Result<u16> {
        let mut value: ffi::WORD = 0;
        try_ft!("FT_ReadEE", unsafe {
            ffi::FT_ReadEE(
                self.handle.as_raw(),
                word_offset.into(),
                addr_of_mut!(value),
            )
        })?;
        Ok(value)
    }

    /// Write a 16-bit word to an EEPROM location.
    pub fn write_ee(&self, word_offset: u32, value: u16) -> Result<()> {
        try_ft!("FT_WriteEE", unsafe {
            ffi::FT_WriteEE(self.handle.as_raw(), word_offset.into(), value)
        })
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dev {}: Flags={:#x} (open: {}, high speed: {}) Type={:?} ID={:#010x} LocId={:#x} SerialNumber={} Description={}",
            self.index,
            self.flags,
            self.is_open(),
            self.is_high_speed(),
            self.device_type(),
            self.id,
            self.location_id,
            self.serial_number,
            self.description,
        )
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        // A session still open when the descriptor goes away would leak the
        // driver handle.
        if self.is_open() {
            unsafe {
                ffi::FT_Close(self.handle.as_raw());
            }
        }
    }
}
