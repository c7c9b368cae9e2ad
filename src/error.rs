use std::fmt::Display;

use num_enum::FromPrimitive;

pub type Result<T, E = D2xxError> = std::result::Result<T, E>;

/// Represents a failed call into the D2XX library.
///
/// Every native entry point returns an `FT_STATUS`; zero means success and all
/// other values are failure codes. A [`D2xxError`] records the name of the
/// entry point that failed together with the status code it returned. The code
/// is kept verbatim — [`D2xxError::kind`] offers a classified view over the
/// codes documented in `ftd2xx.h`, with anything outside that space folding to
/// [`Status::OtherError`].
///
/// ```
/// use d2xx::{D2xxError, Status};
///
/// let err = D2xxError::new("FT_SetBaudRate", 7);
/// assert_eq!(err.function(), "FT_SetBaudRate");
/// assert_eq!(err.status(), 7);
/// assert_eq!(err.kind(), Status::InvalidBaudRate);
/// ```
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct D2xxError {
    function: &'static str,
    status: u32,
}

impl D2xxError {
    /// Construct an error from a function name and a non-zero status code.
    #[must_use]
    pub fn new(function: &'static str, status: u32) -> Self {
        Self { function, status }
    }

    /// Name of the D2XX entry point that failed, e.g. `"FT_Open"`.
    #[must_use]
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// The raw status code, exactly as the driver returned it.
    #[must_use]
    pub fn status(&self) -> u32 {
        self.status
    }

    /// The status code mapped onto the documented D2XX code space.
    #[must_use]
    pub fn kind(&self) -> Status {
        Status::from(self.status)
    }
}

impl Display for D2xxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.kind();
        write!(
            f,
            "{} failed: {kind:?} (status {})",
            self.function, self.status
        )
    }
}

/// Status codes defined by `ftd2xx.h`.
///
/// Codes 1 through 18 are defined as errors by the API; 0 is `FT_OK` and is
/// never stored in a [`D2xxError`]. Codes the header does not name map to
/// [`Status::OtherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum Status {
    InvalidHandle = 1,
    DeviceNotFound = 2,
    DeviceNotOpened = 3,
    IoError = 4,
    InsufficientResources = 5,
    InvalidParameter = 6,
    InvalidBaudRate = 7,
    DeviceNotOpenedForErase = 8,
    DeviceNotOpenedForWrite = 9,
    FailedToWriteDevice = 10,
    EepromReadFailed = 11,
    EepromWriteFailed = 12,
    EepromEraseFailed = 13,
    EepromNotPresent = 14,
    EepromNotProgrammed = 15,
    InvalidArgs = 16,
    NotSupported = 17,
    #[num_enum(default)]
    OtherError = 18,
}

macro_rules! try_ft {
    ($function:literal, $expr:expr) => {
        match $expr {
            0 => Ok(()),
            #[allow(clippy::cast_possible_truncation)]
            status => Err(crate::error::D2xxError::new($function, status as u32)),
        }
    };
}

pub(crate) use try_ft;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_codes_map_by_value() {
        assert_eq!(Status::from(1), Status::InvalidHandle);
        assert_eq!(Status::from(4), Status::IoError);
        assert_eq!(Status::from(7), Status::InvalidBaudRate);
        assert_eq!(Status::from(17), Status::NotSupported);
        assert_eq!(Status::from(18), Status::OtherError);
    }

    #[test]
    fn unknown_codes_fold_to_other_error() {
        assert_eq!(Status::from(0), Status::OtherError);
        assert_eq!(Status::from(1000), Status::OtherError);
    }

    #[test]
    fn unknown_code_is_kept_verbatim() {
        let err = D2xxError::new("FT_Read", 1000);
        assert_eq!(err.status(), 1000);
        assert_eq!(err.kind(), Status::OtherError);
    }

    #[test]
    fn display_names_function_and_status() {
        let err = D2xxError::new("FT_Open", 2);
        let message = err.to_string();
        assert!(message.contains("FT_Open"));
        assert!(message.contains("DeviceNotFound"));
        assert!(message.contains("status 2"));
    }

    #[test]
    fn try_ft_passes_zero_through() {
        let ok: Result<()> = try_ft!("FT_ResetDevice", 0u32);
        assert!(ok.is_ok());
        let err: Result<()> = try_ft!("FT_ResetDevice", 4u32);
        assert_eq!(err.unwrap_err(), D2xxError::new("FT_ResetDevice", 4));
    }
}
