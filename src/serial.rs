//! Serial-port and chip-mode types used by [`Device`](crate::Device)
//! configuration calls.
//!
//! The values are lifted from `ftd2xx.h` and are passed through to the driver
//! unchanged.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Chip operating modes accepted by `FT_SetBitMode`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BitMode {
    /// Reset to the default UART/FIFO mode.
    Reset = 0x00,
    /// Asynchronous bit-bang.
    AsyncBitbang = 0x01,
    /// MPSSE (FT2232, FT2232H, FT4232H and FT232H only).
    Mpsse = 0x02,
    /// Synchronous bit-bang.
    SyncBitbang = 0x04,
    /// MCU host bus emulation.
    McuHost = 0x08,
    /// Fast opto-isolated serial mode.
    FastSerial = 0x10,
    /// CBUS bit-bang (FT232R and FT-X only).
    CbusBitbang = 0x20,
    /// Single-channel synchronous 245 FIFO mode.
    SyncFifo = 0x40,
}

/// Number of data bits per word.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum WordLength {
    /// Seven data bits.
    Bits7 = 7,
    /// Eight data bits.
    Bits8 = 8,
}

/// Number of stop bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum StopBits {
    /// One stop bit.
    One = 0,
    /// Two stop bits.
    Two = 2,
}

/// Parity scheme.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Parity {
    None = 0,
    Odd = 1,
    Even = 2,
    Mark = 3,
    Space = 4,
}

/// Modem and line status, as reported by `FT_GetModemStatus`.
///
/// The low byte holds the modem status signals, the second byte holds the
/// line status. Returned by [`Device::modem_status`](crate::Device::modem_status).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ModemStatus(u32);

impl ModemStatus {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw status word.
    #[must_use]
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Clear To Send is asserted.
    #[must_use]
    pub fn cts(&self) -> bool {
        self.0 & 0x10 != 0
    }

    /// Data Set Ready is asserted.
    #[must_use]
    pub fn dsr(&self) -> bool {
        self.0 & 0x20 != 0
    }

    /// Ring Indicator is asserted.
    #[must_use]
    pub fn ring_indicator(&self) -> bool {
        self.0 & 0x40 != 0
    }

    /// Data Carrier Detect is asserted.
    #[must_use]
    pub fn dcd(&self) -> bool {
        self.0 & 0x80 != 0
    }

    /// Receive overrun occurred.
    #[must_use]
    pub fn overrun_error(&self) -> bool {
        self.0 & 0x0200 != 0
    }

    /// A parity error occurred.
    #[must_use]
    pub fn parity_error(&self) -> bool {
        self.0 & 0x0400 != 0
    }

    /// A framing error occurred.
    #[must_use]
    pub fn framing_error(&self) -> bool {
        self.0 & 0x0800 != 0
    }

    /// A break condition was detected.
    #[must_use]
    pub fn break_interrupt(&self) -> bool {
        self.0 & 0x1000 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_mode_round_trips_header_values() {
        assert_eq!(u8::from(BitMode::Reset), 0x00);
        assert_eq!(u8::from(BitMode::Mpsse), 0x02);
        assert_eq!(u8::from(BitMode::SyncFifo), 0x40);
        assert_eq!(BitMode::try_from(0x01).unwrap(), BitMode::AsyncBitbang);
        assert!(BitMode::try_from(0x03).is_err());
    }

    #[test]
    fn framing_values_match_header() {
        assert_eq!(u8::from(WordLength::Bits7), 7);
        assert_eq!(u8::from(StopBits::Two), 2);
        assert_eq!(u8::from(Parity::Space), 4);
    }

    // DSR and RI asserted in the modem byte, break and parity error in the
    // line byte.
    #[test]
    fn modem_status_decodes_both_bytes() {
        let status = ModemStatus::new(0x1460);
        assert!(!status.cts());
        assert!(status.dsr());
        assert!(status.ring_indicator());
        assert!(!status.dcd());
        assert!(status.break_interrupt());
        assert!(!status.framing_error());
        assert!(!status.overrun_error());
        assert!(status.parity_error());
    }
}
