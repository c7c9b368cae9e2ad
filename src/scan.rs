//! Device enumeration.

use log::debug;

use crate::{
    ffi::{self, with_global_lock},
    try_ft, Device, Result,
};

/// List the attached D2XX devices.
///
/// Enumeration is two-phase: the driver first rebuilds its device info table
/// and reports a count, then the table is copied out and converted into
/// [`Device`] descriptors, indexed 0..N-1 in the driver's order. When no
/// devices are attached an empty vec is returned without a second native
/// call.
///
/// Devices opened in another process appear here with their open flag set;
/// such a descriptor cannot be opened again until the other session ends.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn list_devices() -> Result<Vec<Device>> {
    // Global lock needed to prevent concurrent access to the driver's
    // internal device table between the two calls.
    let nodes = with_global_lock(|| -> Result<_> {
        let n_devices = create_device_info_list()?;
        if n_devices == 0 {
            return Ok(Vec::new());
        }
        // The output parameter is guaranteed to be exactly equal to
        // `n_devices` while the lock is held.
        let mut populated: ffi::DWORD = 0;
        let mut nodes: Vec<ffi::FT_DEVICE_LIST_INFO_NODE> = Vec::with_capacity(n_devices);
        try_ft!("FT_GetDeviceInfoList", unsafe {
            ffi::FT_GetDeviceInfoList(nodes.as_mut_ptr(), &mut populated)
        })?;
        // SAFETY: the number of devices is known to be correct and the
        // node buffer is fully populated.
        unsafe { nodes.set_len(n_devices) };
        Ok(nodes)
    })?;

    debug!("enumerated {} device(s)", nodes.len());
    Ok(nodes
        .iter()
        .enumerate()
        .map(|(index, node)| Device::from_info_node(index as i32, node))
        .collect())
}

/// Number of attached D2XX devices matching the current VID/PID settings.
///
/// This runs only the first phase of enumeration.
pub fn device_count() -> Result<usize> {
    with_global_lock(create_device_info_list)
}

fn create_device_info_list() -> Result<usize> {
    let mut num_devices: ffi::DWORD = 0;
    try_ft!("FT_CreateDeviceInfoList", unsafe {
        ffi::FT_CreateDeviceInfoList(&mut num_devices)
    })?;
    Ok(num_devices as usize)
}
