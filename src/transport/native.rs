//! Native ATA backend: legacy block-device task-file ioctls
//! (`HDIO_DRIVE_CMD` for reads, `HDIO_DRIVE_TASK` for no-data commands).

use std::os::unix::io::RawFd;

use crate::error::{Error, Result};
use crate::transport::{Direction, RegisterImage};
use crate::util::log;

/// `HDIO_DRIVE_CMD` from `linux/hdreg.h`. A legacy, pre-`_IOR`-convention
/// ioctl number; it is not derivable from type/size the way modern ioctls
/// are, so it is reproduced as the literal constant the kernel defines.
const HDIO_DRIVE_CMD: libc::c_ulong = 0x031f;

/// `HDIO_DRIVE_TASK` from `linux/hdreg.h`.
const HDIO_DRIVE_TASK: libc::c_ulong = 0x031c;

fn raw_ioctl(fd: RawFd, request: libc::c_ulong, arg: *mut libc::c_void) -> Result<()> {
    // SAFETY: `arg` points at a buffer sized for `request` by the caller.
    let rc = unsafe { libc::ioctl(fd, request as _, arg) };
    if rc < 0 {
        return Err(Error::OsError(std::io::Error::last_os_error()));
    }
    Ok(())
}

/// `command` is the ATA command byte (e.g. `0xB0` for SMART); for
/// direction `In` the low byte of the header additionally special-cases
/// SMART by substituting register 9 (the SMART subcommand) for register
/// 3, matching `disk_ata_command()` in libatasmart.
const ATA_COMMAND_SMART: u8 = 0xB0;

pub fn execute(
    fd: RawFd,
    command: u8,
    direction: Direction,
    reg: &mut RegisterImage,
    payload: &mut [u8],
) -> Result<()> {
    log::command_dispatch(command, "native");

    match direction {
        Direction::In => execute_in(fd, command, reg, payload),
        Direction::None => execute_none(fd, command, reg),
        Direction::Out => unreachable!("Out is rejected by the dispatcher"),
    }
}

fn execute_in(fd: RawFd, command: u8, reg: &mut RegisterImage, payload: &mut [u8]) -> Result<()> {
    let len = payload.len();
    let mut buf = vec![0u8; 4 + len];
    buf[0] = command;
    buf[1] = if command == ATA_COMMAND_SMART { reg.lba_low() } else { reg.sector_count() };
    buf[2] = reg.feature();
    buf[3] = reg.sector_count();

    if let Err(e) = raw_ioctl(fd, HDIO_DRIVE_CMD, buf.as_mut_ptr() as *mut libc::c_void) {
        log::io_failure("native HDIO_DRIVE_CMD", &e.to_string());
        return Err(e);
    }

    *reg = RegisterImage::new();
    reg.set_status(buf[0]);
    reg.set_feature(buf[1]);
    reg.set_sector_count(buf[2]);

    payload.copy_from_slice(&buf[4..4 + len]);
    Ok(())
}

fn execute_none(fd: RawFd, command: u8, reg: &mut RegisterImage) -> Result<()> {
    let mut buf = [0u8; 7];
    buf[0] = command;
    buf[1] = reg.feature();
    buf[2] = reg.sector_count();
    buf[3] = reg.lba_low();
    buf[4] = reg.lba_mid();
    buf[5] = reg.lba_high();
    buf[6] = reg.select();

    if let Err(e) = raw_ioctl(fd, HDIO_DRIVE_TASK, buf.as_mut_ptr() as *mut libc::c_void) {
        log::io_failure("native HDIO_DRIVE_TASK", &e.to_string());
        return Err(e);
    }

    *reg = RegisterImage::new();
    reg.set_status(buf[0]);
    reg.set_feature(buf[1]);
    reg.set_sector_count(buf[2]);
    reg.set_lba_low(buf[3]);
    reg.set_lba_mid(buf[4]);
    reg.set_lba_high(buf[5]);
    reg.set_select(buf[6]);
    Ok(())
}
