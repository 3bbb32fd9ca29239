//! Blob snapshot serialization.
//!
//! A snapshot is the concatenation of up to three tagged sections, each
//! preceded by a 2-byte little-endian tag and a 2-byte little-endian
//! length. Sections may appear in any order; unknown tags are ignored;
//! a section's validity bit is set only when it was present with the
//! expected 512-byte length.

use crate::error::{Error, Result};

const TAG_IDENTIFY: u16 = 1;
const TAG_SMART_DATA: u16 = 2;
const TAG_SMART_THRESHOLDS: u16 = 3;

const SECTOR_LEN: usize = 512;
const HEADER_LEN: usize = 4;

/// The three optional sectors a snapshot carries.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub identify: Option<[u8; 512]>,
    pub smart_data: Option<[u8; 512]>,
    pub smart_thresholds: Option<[u8; 512]>,
}

fn write_section(out: &mut Vec<u8>, tag: u16, sector: &[u8; 512]) {
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&(SECTOR_LEN as u16).to_le_bytes());
    out.extend_from_slice(sector);
}

/// Serializes a snapshot. Only sections present in `snapshot` are
/// emitted, in a fixed order (identify, smart_data, smart_thresholds).
pub fn serialize(snapshot: &Snapshot) -> Vec<u8> {
    let mut out = Vec::new();

    if let Some(sector) = &snapshot.identify {
        write_section(&mut out, TAG_IDENTIFY, sector);
    }
    if let Some(sector) = &snapshot.smart_data {
        write_section(&mut out, TAG_SMART_DATA, sector);
    }
    if let Some(sector) = &snapshot.smart_thresholds {
        write_section(&mut out, TAG_SMART_THRESHOLDS, sector);
    }

    out
}

/// Deserializes a snapshot. Sections may appear in any order; unknown
/// tags are skipped; a section whose declared length does not leave
/// enough bytes in the buffer is treated as truncated and rejected.
/// A section present with a length other than 512 is skipped without
/// setting the corresponding field.
pub fn deserialize(bytes: &[u8]) -> Result<Snapshot> {
    let mut snapshot = Snapshot::default();
    let mut cursor = 0usize;

    while cursor + HEADER_LEN <= bytes.len() {
        let tag = u16::from_le_bytes([bytes[cursor], bytes[cursor + 1]]);
        let len = u16::from_le_bytes([bytes[cursor + 2], bytes[cursor + 3]]) as usize;
        cursor += HEADER_LEN;

        if cursor + len > bytes.len() {
            return Err(Error::IoError("blob snapshot section runs past end of buffer".into()));
        }

        let body = &bytes[cursor..cursor + len];
        cursor += len;

        if len != SECTOR_LEN {
            continue;
        }

        let mut sector = [0u8; 512];
        sector.copy_from_slice(body);

        match tag {
            TAG_IDENTIFY => snapshot.identify = Some(sector),
            TAG_SMART_DATA => snapshot.smart_data = Some(sector),
            TAG_SMART_THRESHOLDS => snapshot.smart_thresholds = Some(sector),
            _ => {}
        }
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(fill: u8) -> [u8; 512] {
        [fill; 512]
    }

    #[test]
    fn round_trips_all_three_sections() {
        let snapshot = Snapshot {
            identify: Some(sector(1)),
            smart_data: Some(sector(2)),
            smart_thresholds: Some(sector(3)),
        };
        let bytes = serialize(&snapshot);
        let parsed = deserialize(&bytes).unwrap();
        assert_eq!(parsed.identify, snapshot.identify);
        assert_eq!(parsed.smart_data, snapshot.smart_data);
        assert_eq!(parsed.smart_thresholds, snapshot.smart_thresholds);
    }

    #[test]
    fn missing_sections_stay_absent() {
        let snapshot = Snapshot { identify: Some(sector(9)), smart_data: None, smart_thresholds: None };
        let bytes = serialize(&snapshot);
        let parsed = deserialize(&bytes).unwrap();
        assert!(parsed.identify.is_some());
        assert!(parsed.smart_data.is_none());
        assert!(parsed.smart_thresholds.is_none());
    }

    #[test]
    fn sections_in_reverse_order_still_parse() {
        let mut bytes = Vec::new();
        write_section(&mut bytes, TAG_SMART_THRESHOLDS, &sector(3));
        write_section(&mut bytes, TAG_IDENTIFY, &sector(1));
        let parsed = deserialize(&bytes).unwrap();
        assert_eq!(parsed.identify, Some(sector(1)));
        assert_eq!(parsed.smart_thresholds, Some(sector(3)));
        assert!(parsed.smart_data.is_none());
    }

    #[test]
    fn unknown_tag_is_ignored() {
        let mut bytes = Vec::new();
        write_section(&mut bytes, 0xFFFF, &sector(7));
        write_section(&mut bytes, TAG_IDENTIFY, &sector(1));
        let parsed = deserialize(&bytes).unwrap();
        assert_eq!(parsed.identify, Some(sector(1)));
    }

    #[test]
    fn wrong_length_section_is_skipped_without_setting_validity() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&TAG_IDENTIFY.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        let parsed = deserialize(&bytes).unwrap();
        assert!(parsed.identify.is_none());
    }

    #[test]
    fn truncated_section_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&TAG_IDENTIFY.to_le_bytes());
        bytes.extend_from_slice(&(SECTOR_LEN as u16).to_le_bytes());
        bytes.extend_from_slice(&[0u8; 10]); // short body
        assert!(deserialize(&bytes).is_err());
    }
}
