//! Device handle: owns the file descriptor, the device path, the three
//! raw 512-byte sectors and their validity bits, and the cached parsed
//! records. Grounded on `sk_disk_open()`/`sk_disk_free()` in
//! libatasmart's `atasmart.c`.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::blob::{self, Snapshot};
use crate::command;
use crate::error::{Error, Result};
use crate::model::{AttributeParsed, IdentifyParsed, Overall, SelfTest, SmartParsed};
use crate::parse;
use crate::transport::TransportKind;
use crate::util::log;
use crate::verdict::{self, VerdictInputs};

use std::os::unix::io::RawFd;

/// A disk, with its raw sectors and cached parsed views.
pub struct DiskHandle {
    fd: Option<RawFd>,
    path: PathBuf,
    transport: Option<TransportKind>,
    capacity_bytes: u64,

    identify_sector: [u8; 512],
    identify_valid: bool,
    smart_data_sector: [u8; 512],
    smart_data_valid: bool,
    smart_thresholds_sector: [u8; 512],
    smart_thresholds_valid: bool,

    identify_parsed: Option<IdentifyParsed>,
    smart_parsed: Option<SmartParsed>,
}

impl DiskHandle {
    /// A handle with no backing file descriptor, usable only via
    /// [`DiskHandle::set_blob`] for offline diagnosis of a saved
    /// snapshot.
    pub fn synthetic() -> Self {
        Self {
            fd: None,
            path: PathBuf::new(),
            transport: None,
            capacity_bytes: 0,
            identify_sector: [0; 512],
            identify_valid: false,
            smart_data_sector: [0; 512],
            smart_data_valid: false,
            smart_thresholds_sector: [0; 512],
            smart_thresholds_valid: false,
            identify_parsed: None,
            smart_parsed: None,
        }
    }

    #[cfg(target_os = "linux")]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        linux::open(path.as_ref())
    }

    #[cfg(not(target_os = "linux"))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let _ = path;
        Err(Error::NotSupported("device access is only implemented on Linux".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_size(&self) -> u64 {
        self.capacity_bytes
    }

    fn fd(&self) -> Result<RawFd> {
        self.fd.ok_or_else(|| Error::NotSupported("handle has no backing file descriptor".into()))
    }

    fn transport(&self) -> Result<TransportKind> {
        self.transport.ok_or_else(|| Error::NotSupported("handle has no bound transport".into()))
    }

    pub fn check_sleep_mode(&self) -> Result<bool> {
        command::check_power_mode(self.fd()?, self.transport()?)
    }

    pub fn identify_is_available(&self) -> bool {
        self.identify_valid
    }

    pub fn identify_parse(&self) -> Result<&IdentifyParsed> {
        self.identify_parsed
            .as_ref()
            .ok_or_else(|| Error::NoData("IDENTIFY was never retrieved".into()))
    }

    /// `identify[164] & 1`, per `disk_smart_is_available()`.
    pub fn smart_is_available(&self) -> bool {
        self.identify_valid && self.identify_sector[164] & 1 != 0
    }

    /// `identify[170] & 1`, per `disk_smart_is_enabled()`.
    pub fn smart_is_enabled(&self) -> bool {
        self.identify_valid && self.identify_sector[170] & 1 != 0
    }

    pub fn smart_status(&self) -> Result<bool> {
        if !self.smart_is_available() {
            return Err(Error::NotSupported("device does not support SMART".into()));
        }
        command::smart_return_status(self.fd()?, self.transport()?)
    }

    pub fn smart_read_data(&mut self) -> Result<()> {
        if !self.smart_is_available() {
            return Err(Error::NotSupported("device does not support SMART".into()));
        }
        let sector = command::smart_read_data(self.fd()?, self.transport()?)?;
        self.smart_data_sector = sector;
        self.smart_data_valid = true;
        self.smart_parsed = Some(parse::parse_smart_status(&sector));
        Ok(())
    }

    fn try_read_thresholds(&mut self) {
        let (Ok(fd), Ok(kind)) = (self.fd(), self.transport()) else { return };
        match command::smart_read_thresholds(fd, kind) {
            Ok(sector) => {
                self.smart_thresholds_sector = sector;
                self.smart_thresholds_valid = true;
            }
            Err(e) => log::io_failure("SMART READ THRESHOLDS", &e.to_string()),
        }
    }

    pub fn smart_parse(&self) -> Result<&SmartParsed> {
        self.smart_parsed.as_ref().ok_or_else(|| Error::NoData("SMART data was never retrieved".into()))
    }

    fn model_and_firmware(&self) -> (&str, &str) {
        match &self.identify_parsed {
            Some(id) => (id.model.as_str(), id.firmware.as_str()),
            None => ("", ""),
        }
    }

    pub fn smart_parse_attributes(&self) -> Result<Vec<AttributeParsed>> {
        if !self.smart_data_valid {
            return Err(Error::NoData("SMART data was never retrieved".into()));
        }
        let (model, firmware) = self.model_and_firmware();
        let thresholds = self.smart_thresholds_valid.then_some(&self.smart_thresholds_sector);
        Ok(parse::parse_attributes(&self.smart_data_sector, thresholds, model, firmware))
    }

    pub fn smart_self_test(&self, which: SelfTest) -> Result<()> {
        let smart = self.smart_parse()?;
        if !which.is_available(smart) {
            return Err(Error::NotSupported(format!("self-test {} is not available on this device", which.as_str())));
        }
        command::smart_execute_offline_immediate(self.fd()?, self.transport()?, which as u8)
    }

    fn find_attribute_value(&self, name: &str) -> Result<u64> {
        let attrs = self.smart_parse_attributes()?;
        attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.pretty_value)
            .ok_or_else(|| Error::NoData(format!("attribute {name:?} is not present")))
    }

    pub fn smart_get_power_on(&self) -> Result<u64> {
        self.find_attribute_value("power-on-hours")
            .or_else(|_| self.find_attribute_value("power-on-minutes"))
            .or_else(|_| self.find_attribute_value("power-on-seconds"))
            .or_else(|_| self.find_attribute_value("power-on-half-minutes"))
    }

    pub fn smart_get_power_cycle(&self) -> Result<u64> {
        self.find_attribute_value("power-cycle-count")
    }

    pub fn smart_get_bad(&self) -> Result<u64> {
        let attrs = self.smart_parse_attributes()?;
        let sum = |name: &str| attrs.iter().find(|a| a.name == name).map(|a| a.pretty_value).unwrap_or(0);
        Ok(sum("reallocated-sector-count") + sum("current-pending-sector") + sum("offline-uncorrectable"))
    }

    pub fn smart_get_temperature(&self) -> Result<u64> {
        let attrs = self.smart_parse_attributes()?;
        attrs
            .iter()
            .find(|a| a.pretty_unit == crate::model::AttributeUnit::Millikelvin)
            .map(|a| a.pretty_value)
            .ok_or_else(|| Error::NoData("no temperature attribute is present".into()))
    }

    pub fn smart_get_overall(&self) -> Result<Overall> {
        let attributes = self.smart_parse_attributes()?;
        let status_good = self.smart_status()?;
        Ok(verdict::compute(&VerdictInputs {
            attributes: &attributes,
            status_good,
            capacity_bytes: self.capacity_bytes,
        }))
    }

    pub fn get_blob(&self) -> Vec<u8> {
        let snapshot = Snapshot {
            identify: self.identify_valid.then_some(self.identify_sector),
            smart_data: self.smart_data_valid.then_some(self.smart_data_sector),
            smart_thresholds: self.smart_thresholds_valid.then_some(self.smart_thresholds_sector),
        };
        blob::serialize(&snapshot)
    }

    pub fn set_blob(&mut self, bytes: &[u8]) -> Result<()> {
        let snapshot = blob::deserialize(bytes)?;

        if let Some(sector) = snapshot.identify {
            self.identify_sector = sector;
            self.identify_valid = true;
            self.identify_parsed = Some(parse::parse_identify(&sector));
        }
        if let Some(sector) = snapshot.smart_data {
            self.smart_data_sector = sector;
            self.smart_data_valid = true;
            self.smart_parsed = Some(parse::parse_smart_status(&sector));
        }
        if let Some(sector) = snapshot.smart_thresholds {
            self.smart_thresholds_sector = sector;
            self.smart_thresholds_valid = true;
        }

        Ok(())
    }

    /// Writes a multi-line human-readable report, in the shape of
    /// libatasmart's `skdump`.
    pub fn dump(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "path: {}", self.path.display())?;
        writeln!(out, "capacity: {} bytes", self.capacity_bytes)?;

        if let Ok(id) = self.identify_parse() {
            writeln!(out, "model: {}", id.model)?;
            writeln!(out, "serial: {}", id.serial)?;
            writeln!(out, "firmware: {}", id.firmware)?;
        } else {
            writeln!(out, "model: n/a (IDENTIFY not available)")?;
        }

        if !self.smart_is_available() {
            writeln!(out, "SMART: not supported")?;
            return Ok(());
        }

        writeln!(out, "SMART: enabled={}", self.smart_is_enabled())?;

        if let Ok(smart) = self.smart_parse() {
            writeln!(out, "offline status: {:?}", smart.offline_data_collection_status)?;
            writeln!(out, "self-test status: {}", smart.self_test_execution_status.to_sentence())?;
        }

        if let Ok(attrs) = self.smart_parse_attributes() {
            writeln!(out, "attributes:")?;
            for a in &attrs {
                writeln!(
                    out,
                    "  {:3} {:<32} value={:3} worst={:3} threshold={:3} raw={:?} pretty={}{}",
                    a.id,
                    a.name,
                    a.current_value,
                    a.worst_value,
                    a.threshold,
                    a.raw,
                    a.pretty_value,
                    a.pretty_unit.display_suffix()
                )?;
            }
        }

        if let Ok(overall) = self.smart_get_overall() {
            writeln!(out, "overall: {}", overall.to_sentence())?;
        }

        Ok(())
    }
}

#[cfg(target_os = "linux")]
impl Drop for DiskHandle {
    fn drop(&mut self) {
        if let Some(fd) = self.fd {
            unsafe {
                libc::close(fd);
            }
        }
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    use super::DiskHandle;
    use crate::command;
    use crate::error::{Error, Result};
    use crate::parse;
    use crate::transport::TransportKind;
    use crate::util::log;

    /// `BLKGETSIZE64` from `linux/fs.h`: `_IOR(0x12, 114, size_t)`.
    const BLKGETSIZE64: libc::c_ulong = 0x80081272;

    const PROBE_ORDER: [TransportKind; 2] = [TransportKind::AtaPassthrough, TransportKind::AtaNative];

    pub fn open(path: &Path) -> Result<DiskHandle> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| Error::InvalidArgument("device path contains a NUL byte".into()))?;

        // SAFETY: `c_path` is a valid NUL-terminated string for the
        // duration of this call.
        let fd = unsafe { libc::open(c_path.as_ptr(), libc::O_RDWR | libc::O_NOCTTY) };
        if fd < 0 {
            return Err(Error::OsError(std::io::Error::last_os_error()));
        }

        match open_on_fd(fd, path) {
            Ok(handle) => Ok(handle),
            Err(e) => {
                unsafe {
                    libc::close(fd);
                }
                Err(e)
            }
        }
    }

    fn open_on_fd(fd: libc::c_int, path: &Path) -> Result<DiskHandle> {
        // SAFETY: `stat` is zero-initialized and fully populated by fstat.
        let mut stat: libc::stat = unsafe { std::mem::zeroed() };
        if unsafe { libc::fstat(fd, &mut stat) } < 0 {
            return Err(Error::OsError(std::io::Error::last_os_error()));
        }
        if stat.st_mode & libc::S_IFMT != libc::S_IFBLK {
            return Err(Error::InvalidArgument(format!("{} is not a block device", path.display())));
        }

        let mut size: u64 = 0;
        if unsafe { libc::ioctl(fd, BLKGETSIZE64 as _, &mut size as *mut u64) } < 0 {
            return Err(Error::OsError(std::io::Error::last_os_error()));
        }
        if size == 0 {
            return Err(Error::IoError(format!("{} reported zero capacity", path.display())));
        }

        let mut handle = DiskHandle {
            fd: Some(fd),
            path: path.to_path_buf(),
            transport: None,
            capacity_bytes: size,
            identify_sector: [0; 512],
            identify_valid: false,
            smart_data_sector: [0; 512],
            smart_data_valid: false,
            smart_thresholds_sector: [0; 512],
            smart_thresholds_valid: false,
            identify_parsed: None,
            smart_parsed: None,
        };

        probe_transport(&mut handle)?;

        if handle.smart_is_available() && !handle.smart_is_enabled() {
            command::smart_set_enabled(fd, handle.transport()?, true)?;
            identify(&mut handle)?;
            if !handle.smart_is_enabled() {
                return Err(Error::IoError("device did not report SMART enabled after enabling it".into()));
            }
        }

        if handle.smart_is_available() {
            handle.try_read_thresholds();
        }

        Ok(handle)
    }

    fn probe_transport(handle: &mut DiskHandle) -> Result<()> {
        let fd = handle.fd.expect("freshly opened handle always has a file descriptor");

        for &kind in &PROBE_ORDER {
            match command::identify_device(fd, kind) {
                Ok(sector) => {
                    handle.transport = Some(kind);
                    handle.identify_sector = sector;
                    handle.identify_valid = true;
                    handle.identify_parsed = Some(parse::parse_identify(&sector));
                    return Ok(());
                }
                Err(e) => log::transport_fallback(&format!("{kind:?}"), "next probe candidate", &e.to_string()),
            }
        }

        Err(Error::NotSupported("no transport backend could deliver IDENTIFY DEVICE".into()))
    }

    fn identify(handle: &mut DiskHandle) -> Result<()> {
        let sector = command::identify_device(handle.fd.unwrap(), handle.transport()?)?;
        handle.identify_sector = sector;
        handle.identify_valid = true;
        handle.identify_parsed = Some(parse::parse_identify(&sector));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_handle_has_no_transport_or_fd() {
        let handle = DiskHandle::synthetic();
        assert!(!handle.identify_is_available());
        assert!(!handle.smart_is_available());
        assert_eq!(handle.get_size(), 0);
    }

    #[test]
    fn set_blob_then_get_blob_round_trips() {
        let mut identify_sector = [0u8; 512];
        identify_sector[164] = 1; // smart available
        identify_sector[170] = 1; // smart enabled
        let mut smart_sector = [0u8; 512];
        smart_sector[362] = 0x02; // offline collection success

        let snapshot = Snapshot { identify: Some(identify_sector), smart_data: Some(smart_sector), smart_thresholds: None };
        let bytes = blob::serialize(&snapshot);

        let mut handle = DiskHandle::synthetic();
        handle.set_blob(&bytes).unwrap();

        assert!(handle.identify_is_available());
        assert!(handle.smart_is_available());
        assert!(handle.smart_is_enabled());
        assert_eq!(handle.smart_parse().unwrap().offline_data_collection_status, crate::model::OfflineDataCollectionStatus::Success);

        let round_tripped = handle.get_blob();
        let parsed_back = blob::deserialize(&round_tripped).unwrap();
        assert_eq!(parsed_back.identify, Some(identify_sector));
        assert_eq!(parsed_back.smart_data, Some(smart_sector));
    }

    #[test]
    fn dump_on_synthetic_handle_reports_no_identify() {
        let handle = DiskHandle::synthetic();
        let mut out = Vec::new();
        handle.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("IDENTIFY not available"));
    }

    #[test]
    fn attribute_lookups_fail_without_smart_data() {
        let handle = DiskHandle::synthetic();
        assert!(handle.smart_get_power_on().is_err());
        assert!(handle.smart_get_bad().is_err());
        assert!(handle.smart_get_overall().is_err());
    }
}
