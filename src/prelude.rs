//! Public prelude of the crate containing the most commonly used types and functions.

pub use crate::{device_count, list_devices, D2xxError, Device, DeviceType, Result, Status};
