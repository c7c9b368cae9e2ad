//! Integration tests against the real driver.
//!
//! Tests without `#[ignore]` exercise enumeration and library-global calls and
//! pass with zero devices attached. Ignored tests need one FTDI device on the
//! bus; the loopback test additionally needs TXD wired to RXD. Run them with
//! `cargo test -- --ignored`.

use d2xx::{device_count, list_devices, Device};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The single attached device, opened and ready.
fn open_first_device() -> Device {
    let mut devices = list_devices().expect("failed to list devices");
    assert!(!devices.is_empty(), "no FTDI device attached");
    let mut device = devices.remove(0);
    device.open().expect("failed to open device");
    device
}

#[test]
fn enumeration_count_matches_list() {
    init_logging();
    let devices = list_devices().expect("failed to list devices");
    let count = device_count().expect("failed to count devices");
    assert_eq!(devices.len(), count);
    for (i, device) in devices.iter().enumerate() {
        assert_eq!(device.index(), i32::try_from(i).unwrap());
    }
}

#[test]
fn library_version_is_dotted_decimal() {
    let version = d2xx::library_version().expect("failed to read library version");
    assert_eq!(version.to_string().split('.').count(), 3);
}

#[test]
fn set_vid_pid_accepts_custom_ids() {
    // No-op on Windows, forwarded elsewhere; enumeration must keep working
    // either way.
    d2xx::set_vid_pid(0x0403, 0x84e0).expect("failed to register custom VID/PID");
    device_count().expect("failed to count devices");
}

#[test]
#[ignore = "requires an attached FTDI device"]
fn open_then_close_restores_descriptor() {
    init_logging();
    let mut devices = list_devices().expect("failed to list devices");
    let device = devices.first_mut().expect("no FTDI device attached");
    assert!(!device.is_open(), "device is open in another process");
    let flags_before = device.flags();
    let serial_before = device.serial_number().to_owned();

    device.open().expect("failed to open device");
    assert!(device.is_open());
    assert!(!device.handle().is_closed());

    device.close().expect("failed to close device");
    assert!(!device.is_open());
    assert!(device.handle().is_closed());
    assert_eq!(device.flags(), flags_before);
    assert_eq!(device.serial_number(), serial_before);
}

#[test]
#[ignore = "requires an attached FTDI device"]
fn configuration_calls_round_trip() {
    use d2xx::serial::{BitMode, Parity, StopBits, WordLength};

    init_logging();
    let device = open_first_device();
    device.set_baud_rate(115_200).expect("set_baud_rate failed");
    device
        .set_data_characteristics(WordLength::Bits8, StopBits::One, Parity::None)
        .expect("set_data_characteristics failed");
    device.set_timeouts(500, 500).expect("set_timeouts failed");
    device.set_latency_timer(16).expect("set_latency_timer failed");
    assert_eq!(device.latency_timer().expect("latency_timer failed"), 16);
    device
        .set_bit_mode(0x00, BitMode::Reset)
        .expect("set_bit_mode failed");
    device.set_dtr().expect("set_dtr failed");
    device.clear_dtr().expect("clear_dtr failed");
    device.set_rts().expect("set_rts failed");
    device.clear_rts().expect("clear_rts failed");
    device.modem_status().expect("modem_status failed");
    device.driver_version().expect("driver_version failed");
    device.reset().expect("reset failed");
}

#[test]
#[ignore = "requires an attached FTDI device with TXD wired to RXD"]
fn loopback_write_read_round_trip() {
    use d2xx::serial::{Parity, StopBits, WordLength};

    init_logging();
    let device = open_first_device();
    device.set_baud_rate(9600).expect("set_baud_rate failed");
    device
        .set_data_characteristics(WordLength::Bits8, StopBits::One, Parity::None)
        .expect("set_data_characteristics failed");
    device.set_timeouts(1000, 1000).expect("set_timeouts failed");

    let out = *b"loopback";
    let written = device.write(&out).expect("write failed");
    assert_eq!(written, out.len());

    // Oversized destination: only the echoed bytes come back.
    let mut buf = [0u8; 16];
    let read = device.read(&mut buf).expect("read failed");
    assert_eq!(read, out.len());
    assert_eq!(&buf[..read], &out);
    assert!(buf[read..].iter().all(|&b| b == 0));
}
