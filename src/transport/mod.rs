//! Transport dispatcher: delivers one logical ATA task-file over one of
//! two on-wire variants — the legacy Linux `HDIO_DRIVE_CMD`/
//! `HDIO_DRIVE_TASK` ioctls, or ATA Pass-Through 16 (T10 SAT-2) over
//! `SG_IO`.

#[cfg(target_os = "linux")]
pub mod native;
#[cfg(target_os = "linux")]
pub mod passthrough;

use crate::error::{Error, Result};

/// Data direction of a command's payload, relative to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    None,
    In,
    /// Unsupported by this library — the SMART read path never needs it.
    Out,
}

/// The 12-byte structured view of an ATA task-file register image, laid
/// out feature/error, sector count, LBA low/mid/high, device/select and
/// status/command, per ATA8-ACS register-to-task-file mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterImage(pub [u8; 12]);

impl RegisterImage {
    pub fn new() -> Self {
        Self([0u8; 12])
    }

    pub fn feature(&self) -> u8 {
        self.0[1]
    }

    pub fn set_feature(&mut self, v: u8) {
        self.0[1] = v;
    }

    pub fn sector_count(&self) -> u8 {
        self.0[3]
    }

    pub fn set_sector_count(&mut self, v: u8) {
        self.0[3] = v;
    }

    pub fn lba_high(&self) -> u8 {
        self.0[7]
    }

    pub fn set_lba_high(&mut self, v: u8) {
        self.0[7] = v;
    }

    pub fn lba_mid(&self) -> u8 {
        self.0[8]
    }

    pub fn set_lba_mid(&mut self, v: u8) {
        self.0[8] = v;
    }

    pub fn lba_low(&self) -> u8 {
        self.0[9]
    }

    pub fn set_lba_low(&mut self, v: u8) {
        self.0[9] = v;
    }

    pub fn select(&self) -> u8 {
        self.0[10]
    }

    pub fn set_select(&mut self, v: u8) {
        self.0[10] = v;
    }

    pub fn status(&self) -> u8 {
        self.0[11]
    }

    pub fn set_status(&mut self, v: u8) {
        self.0[11] = v;
    }

    /// Sets the SMART "signature" (LBA_mid=0xC2, LBA_high=0x4F), common
    /// to every SMART subcommand.
    pub fn set_smart_signature(&mut self) {
        self.set_lba_mid(0xC2);
        self.set_lba_high(0x4F);
    }
}

/// Which on-wire backend a disk handle is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    AtaNative,
    AtaPassthrough,
}

/// Fixed 2-second timeout for SCSI generic submissions. The native ATA
/// path inherits the kernel's default instead.
pub const SG_IO_TIMEOUT_MS: u32 = 2_000;

/// Executes one ATA task-file over the backend selected by `kind`.
///
/// `payload` must be exactly `payload_len` bytes for `Direction::In` and
/// empty for `Direction::None`. `Direction::Out` is always rejected.
pub fn execute(
    fd: std::os::unix::io::RawFd,
    kind: TransportKind,
    command: u8,
    direction: Direction,
    register_image: &mut RegisterImage,
    payload: &mut [u8],
) -> Result<()> {
    if direction == Direction::Out {
        return Err(Error::NotSupported("ATA Out direction is not implemented".into()));
    }

    #[cfg(target_os = "linux")]
    {
        match kind {
            TransportKind::AtaNative => native::execute(fd, command, direction, register_image, payload),
            TransportKind::AtaPassthrough => passthrough::execute(fd, command, direction, register_image, payload),
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = (fd, kind, command, direction, register_image, payload);
        Err(Error::NotSupported(
            "ATA transport is only implemented on Linux".into(),
        ))
    }
}
