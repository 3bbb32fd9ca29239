//! ATA Pass-Through 16 backend: wraps the ATA task-file into a T10 SCSI
//! command descriptor block (SAT-2 ATA PASS-THROUGH (16), opcode 0x85)
//! and submits it via the Linux SCSI generic (`SG_IO`) interface.

use std::os::unix::io::RawFd;

use crate::error::{Error, Result};
use crate::transport::{Direction, RegisterImage, SG_IO_TIMEOUT_MS};
use crate::util::log;

/// `SG_IO` ioctl number from `scsi/sg.h`: `_IOWR('S', 0x85, sg_io_hdr)`.
const SG_IO: libc::c_ulong = 0x2285;

const SG_DXFER_NONE: libc::c_int = -1;
const SG_DXFER_TO_DEV: libc::c_int = -2;
const SG_DXFER_FROM_DEV: libc::c_int = -3;

/// Mirrors `struct sg_io_hdr` from `scsi/sg.h`.
#[repr(C)]
struct SgIoHdr {
    interface_id: libc::c_int,
    dxfer_direction: libc::c_int,
    cmd_len: u8,
    mx_sb_len: u8,
    iovec_count: u16,
    dxfer_len: u32,
    dxferp: *mut libc::c_void,
    cmdp: *mut u8,
    sbp: *mut u8,
    timeout: u32,
    flags: u32,
    pack_id: i32,
    usr_ptr: *mut libc::c_void,
    status: u8,
    masked_status: u8,
    msg_status: u8,
    sb_len_wr: u8,
    host_status: u16,
    driver_status: u16,
    resid: i32,
    duration: u32,
    info: u32,
}

fn sg_io(
    fd: RawFd,
    direction: libc::c_int,
    cdb: &mut [u8; 16],
    data: &mut [u8],
    sense: &mut [u8; 32],
) -> Result<()> {
    let mut hdr = SgIoHdr {
        interface_id: b'S' as libc::c_int,
        dxfer_direction: direction,
        cmd_len: cdb.len() as u8,
        mx_sb_len: sense.len() as u8,
        iovec_count: 0,
        dxfer_len: data.len() as u32,
        dxferp: if data.is_empty() { std::ptr::null_mut() } else { data.as_mut_ptr() as *mut libc::c_void },
        cmdp: cdb.as_mut_ptr(),
        sbp: sense.as_mut_ptr(),
        timeout: SG_IO_TIMEOUT_MS,
        flags: 0,
        pack_id: 0,
        usr_ptr: std::ptr::null_mut(),
        status: 0,
        masked_status: 0,
        msg_status: 0,
        sb_len_wr: 0,
        host_status: 0,
        driver_status: 0,
        resid: 0,
        duration: 0,
        info: 0,
    };

    // SAFETY: `hdr` fully describes the buffers it points at, all of
    // which outlive this call.
    let rc = unsafe { libc::ioctl(fd, SG_IO as _, &mut hdr as *mut SgIoHdr) };
    if rc < 0 {
        return Err(Error::OsError(std::io::Error::last_os_error()));
    }
    Ok(())
}

pub fn execute(
    fd: RawFd,
    command: u8,
    direction: Direction,
    reg: &mut RegisterImage,
    payload: &mut [u8],
) -> Result<()> {
    log::command_dispatch(command, "passthrough");

    let mut cdb = [0u8; 16];
    cdb[0] = 0x85; // ATA PASS-THROUGH (16)

    let sg_direction = match direction {
        Direction::None => {
            cdb[1] = 3 << 1; // Non-Data
            cdb[2] = 0x20; // OFF_LINE=0, CK_COND=1, T_DIR=0, BYT_BLOK=0, T_LENGTH=0
            SG_DXFER_NONE
        }
        Direction::In => {
            cdb[1] = 4 << 1; // PIO Data-In
            cdb[2] = 0x2e; // OFF_LINE=0, CK_COND=1, T_DIR=1, BYT_BLOK=1, T_LENGTH=2
            SG_DXFER_FROM_DEV
        }
        Direction::Out => unreachable!("Out is rejected by the dispatcher"),
    };

    cdb[3] = 0;
    cdb[4] = reg.feature();
    cdb[5] = 0;
    cdb[6] = reg.sector_count();
    cdb[8] = reg.lba_low();
    cdb[10] = reg.lba_mid();
    cdb[12] = reg.lba_high();
    cdb[13] = reg.select() & 0x4F;
    cdb[14] = command;

    let mut sense = [0u8; 32];

    if let Err(e) = sg_io(fd, sg_direction, &mut cdb, payload, &mut sense) {
        log::io_failure("ATA pass-through SG_IO", &e.to_string());
        return Err(e);
    }

    let desc = &sense[8..];
    if sense[0] != 0x72 || desc[0] != 0x09 || desc[1] != 0x0c {
        let msg = format!(
            "unexpected ATA pass-through sense signature (sense[0]=0x{:02x} desc=0x{:02x}/0x{:02x})",
            sense[0], desc[0], desc[1]
        );
        log::io_failure("ATA pass-through sense", &msg);
        return Err(Error::IoError(msg));
    }

    *reg = RegisterImage::new();
    reg.set_feature(desc[3]);
    reg.set_sector_count(desc[5]);
    reg.set_lba_low(desc[7]);
    reg.set_lba_mid(desc[9]);
    reg.set_lba_high(desc[11]);
    reg.set_select(desc[12]);
    reg.set_status(desc[13]);

    Ok(())
}
