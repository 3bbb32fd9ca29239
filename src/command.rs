//! Command layer: thin functions building a 12-byte register image per
//! ATA/SMART subcommand, invoking the transport dispatcher, and
//! interpreting the result.

use std::os::unix::io::RawFd;

use crate::error::{Error, Result};
use crate::transport::{self, Direction, RegisterImage, TransportKind};

const ATA_COMMAND_IDENTIFY_DEVICE: u8 = 0xEC;
const ATA_COMMAND_CHECK_POWER_MODE: u8 = 0xE5;
const ATA_COMMAND_SMART: u8 = 0xB0;

const SMART_READ_DATA: u8 = 0xD0;
const SMART_READ_THRESHOLDS: u8 = 0xD1;
const SMART_EXECUTE_OFFLINE_IMMEDIATE: u8 = 0xD4;
const SMART_ENABLE_OPERATIONS: u8 = 0xD8;
const SMART_DISABLE_OPERATIONS: u8 = 0xD9;
const SMART_RETURN_STATUS: u8 = 0xDA;

fn smart_register_image(subcommand: u8) -> RegisterImage {
    let mut reg = RegisterImage::new();
    reg.set_feature(subcommand);
    reg.set_sector_count(1);
    reg.set_smart_signature();
    reg.set_select(0xA0);
    reg
}

/// ATA IDENTIFY DEVICE (0xEC). Returns the 512-byte IDENTIFY sector.
pub fn identify_device(fd: RawFd, kind: TransportKind) -> Result<[u8; 512]> {
    let mut reg = RegisterImage::new();
    reg.set_sector_count(1);
    let mut payload = vec![0u8; 512];

    transport::execute(fd, kind, ATA_COMMAND_IDENTIFY_DEVICE, Direction::In, &mut reg, &mut payload)?;

    payload
        .try_into()
        .map_err(|_| Error::IoError("IDENTIFY DEVICE returned a short read".into()))
}

/// ATA CHECK POWER MODE (0xE5). Returns `true` if the device is awake.
pub fn check_power_mode(fd: RawFd, kind: TransportKind) -> Result<bool> {
    let mut reg = RegisterImage::new();
    let mut payload: [u8; 0] = [];

    transport::execute(fd, kind, ATA_COMMAND_CHECK_POWER_MODE, Direction::None, &mut reg, &mut payload)?;

    if reg.status() != 0 || (reg.feature() & 1) != 0 {
        return Err(Error::IoError("CHECK POWER MODE returned an error status".into()));
    }

    Ok(reg.sector_count() == 0xFF)
}

/// SMART READ DATA (subcommand 0xD0). Returns the 512-byte SMART data
/// sector.
pub fn smart_read_data(fd: RawFd, kind: TransportKind) -> Result<[u8; 512]> {
    let mut reg = smart_register_image(SMART_READ_DATA);
    let mut payload = vec![0u8; 512];

    transport::execute(fd, kind, ATA_COMMAND_SMART, Direction::In, &mut reg, &mut payload)?;

    payload
        .try_into()
        .map_err(|_| Error::IoError("SMART READ DATA returned a short read".into()))
}

/// SMART READ THRESHOLDS (subcommand 0xD1). Returns the 512-byte SMART
/// thresholds sector. Failure here is tolerated by the caller — the
/// handle remains usable without thresholds.
pub fn smart_read_thresholds(fd: RawFd, kind: TransportKind) -> Result<[u8; 512]> {
    let mut reg = smart_register_image(SMART_READ_THRESHOLDS);
    let mut payload = vec![0u8; 512];

    transport::execute(fd, kind, ATA_COMMAND_SMART, Direction::In, &mut reg, &mut payload)?;

    payload
        .try_into()
        .map_err(|_| Error::IoError("SMART READ THRESHOLDS returned a short read".into()))
}

/// SMART EXECUTE OFFLINE IMMEDIATE (subcommand 0xD4). `selector` is
/// 1=short, 2=extended, 3=conveyance, 127=abort.
pub fn smart_execute_offline_immediate(fd: RawFd, kind: TransportKind, selector: u8) -> Result<()> {
    let mut reg = smart_register_image(SMART_EXECUTE_OFFLINE_IMMEDIATE);
    reg.set_lba_low(selector);
    let mut payload: [u8; 0] = [];

    transport::execute(fd, kind, ATA_COMMAND_SMART, Direction::None, &mut reg, &mut payload)
}

/// SMART ENABLE/DISABLE OPERATIONS (0xD8/0xD9).
pub fn smart_set_enabled(fd: RawFd, kind: TransportKind, enable: bool) -> Result<()> {
    let subcommand = if enable { SMART_ENABLE_OPERATIONS } else { SMART_DISABLE_OPERATIONS };
    let mut reg = smart_register_image(subcommand);
    let mut payload: [u8; 0] = [];

    transport::execute(fd, kind, ATA_COMMAND_SMART, Direction::None, &mut reg, &mut payload)
}

/// SMART RETURN STATUS (subcommand 0xDA). Returns `true` if the device
/// reports "good".
pub fn smart_return_status(fd: RawFd, kind: TransportKind) -> Result<bool> {
    let mut reg = smart_register_image(SMART_RETURN_STATUS);
    let mut payload: [u8; 0] = [];

    transport::execute(fd, kind, ATA_COMMAND_SMART, Direction::None, &mut reg, &mut payload)?;

    match (reg.lba_mid(), reg.lba_high()) {
        (0xC2, 0x4F) => Ok(true),
        (0x2C, 0xF4) => Ok(false),
        (mid, high) => Err(Error::IoError(format!(
            "unrecognized SMART Return Status signature (mid=0x{mid:02x} high=0x{high:02x})"
        ))),
    }
}
