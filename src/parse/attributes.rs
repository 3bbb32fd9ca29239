//! SMART attribute table parsing and threshold binding. Grounded on
//! `sk_disk_smart_parse_attributes()` and `find_threshold()` in
//! libatasmart's `atasmart.c`.

use crate::cooker;
use crate::model::{AttributeParsed, AttributeUnit};
use crate::quirks;

const RECORD_COUNT: usize = 30;
const RECORD_LEN: usize = 12;
const TABLE_START: usize = 2;

fn value_in_range(v: u8) -> bool {
    (1..=0xFD).contains(&v)
}

/// Parses all 30 attribute records out of a 512-byte SMART data sector,
/// resolving each id's name/unit through the quirk-aware catalog and
/// binding it against the threshold sector when one is available.
/// Records whose id byte is 0 are skipped (unused slots), matching the
/// original parser.
pub fn parse_attributes(
    smart_data: &[u8; 512],
    smart_thresholds: Option<&[u8; 512]>,
    model: &str,
    firmware: &str,
) -> Vec<AttributeParsed> {
    let mut out = Vec::new();

    for n in 0..RECORD_COUNT {
        let off = TABLE_START + n * RECORD_LEN;
        let record = &smart_data[off..off + RECORD_LEN];

        let id = record[0];
        if id == 0 {
            continue;
        }

        let flags = ((record[2] as u16) << 8) | record[1] as u16;
        let prefailure = record[1] & 1 != 0;
        let online = record[1] & 2 != 0;
        let current_value = record[3];
        let current_value_valid = value_in_range(current_value);
        let worst_value = record[4];
        let worst_value_valid = value_in_range(worst_value);

        let mut raw = [0u8; 6];
        raw.copy_from_slice(&record[5..11]);

        let (name, pretty_unit) = match quirks::resolve_attribute(model, firmware, id) {
            Some(entry) => (entry.name.to_string(), entry.unit),
            None => (crate::catalog::synthetic_name(id), AttributeUnit::Unknown),
        };

        let pretty_value = cooker::cook(&name, pretty_unit, raw);

        let mut attr = AttributeParsed {
            id,
            name,
            pretty_unit,
            flags,
            online,
            prefailure,
            current_value,
            current_value_valid,
            worst_value,
            worst_value_valid,
            raw,
            pretty_value,
            threshold: 0,
            threshold_valid: false,
            good_now: false,
            good_now_valid: false,
            good_in_the_past: false,
            good_in_the_past_valid: false,
            warn: false,
        };

        bind_threshold(&mut attr, smart_thresholds);
        attr.warn = attr.prefailure && attr.good_now_valid && !attr.good_now;

        out.push(attr);
    }

    out
}

fn bind_threshold(attr: &mut AttributeParsed, smart_thresholds: Option<&[u8; 512]>) {
    let Some(thresholds) = smart_thresholds else {
        attr.threshold_valid = false;
        return;
    };

    let found = (0..RECORD_COUNT).find_map(|n| {
        let off = TABLE_START + n * RECORD_LEN;
        let record = &thresholds[off..off + RECORD_LEN];
        (record[0] == attr.id).then(|| record[1])
    });

    let Some(threshold) = found else {
        attr.threshold_valid = false;
        attr.good_now_valid = false;
        attr.good_in_the_past_valid = false;
        return;
    };

    attr.threshold = threshold;
    attr.threshold_valid = threshold != 0xFE;

    if !value_in_range(threshold) {
        return;
    }

    if attr.current_value_valid {
        attr.good_now = attr.current_value > threshold;
        attr.good_now_valid = true;
    }

    if attr.worst_value_valid {
        attr.good_in_the_past = attr.worst_value > threshold;
        attr.good_in_the_past_valid = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u8, status: u8, current: u8, worst: u8, raw: [u8; 6]) -> [u8; 12] {
        let mut r = [0u8; 12];
        r[0] = id;
        r[1] = status;
        r[3] = current;
        r[4] = worst;
        r[5..11].copy_from_slice(&raw);
        r
    }

    fn sector_with_records(records: &[(usize, [u8; 12])]) -> [u8; 512] {
        let mut sector = [0u8; 512];
        for (n, rec) in records {
            let off = TABLE_START + n * RECORD_LEN;
            sector[off..off + RECORD_LEN].copy_from_slice(rec);
        }
        sector
    }

    #[test]
    fn zero_id_slots_are_skipped() {
        let sector = sector_with_records(&[(0, record(9, 3, 100, 90, [10, 0, 0, 0, 0, 0]))]);
        let attrs = parse_attributes(&sector, None, "Generic", "1.0");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].id, 9);
    }

    #[test]
    fn unknown_id_falls_back_to_synthetic_name() {
        let sector = sector_with_records(&[(0, record(37, 0, 50, 50, [1, 0, 0, 0, 0, 0]))]);
        let attrs = parse_attributes(&sector, None, "Generic", "1.0");
        assert_eq!(attrs[0].name, "attribute-37");
        assert_eq!(attrs[0].pretty_unit, AttributeUnit::Unknown);
    }

    #[test]
    fn no_threshold_sector_leaves_threshold_and_good_invalid() {
        let sector = sector_with_records(&[(0, record(5, 3, 100, 90, [0; 6]))]);
        let attrs = parse_attributes(&sector, None, "Generic", "1.0");
        assert!(!attrs[0].threshold_valid);
        assert!(!attrs[0].good_now_valid);
        assert!(!attrs[0].good_in_the_past_valid);
    }

    #[test]
    fn threshold_crossed_marks_attribute_not_good() {
        let sector = sector_with_records(&[(0, record(5, 3, 20, 15, [0; 6]))]);
        let mut thresholds = [0u8; 512];
        thresholds[TABLE_START] = 5;
        thresholds[TABLE_START + 1] = 30; // current(20) and worst(15) both <= 30

        let attrs = parse_attributes(&sector, Some(&thresholds), "Generic", "1.0");
        assert!(attrs[0].good_now_valid);
        assert!(!attrs[0].good_now);
        assert!(!attrs[0].good_in_the_past);
    }

    #[test]
    fn sentinel_thresholds_outside_1_to_0xfd_skip_good_computation() {
        let sector = sector_with_records(&[(0, record(5, 3, 20, 15, [0; 6]))]);
        let mut thresholds = [0u8; 512];
        thresholds[TABLE_START] = 5;
        thresholds[TABLE_START + 1] = 0x00;

        let attrs = parse_attributes(&sector, Some(&thresholds), "Generic", "1.0");
        assert!(attrs[0].threshold_valid);
        assert!(!attrs[0].good_now_valid);
        assert!(!attrs[0].good_in_the_past_valid);
    }

    #[test]
    fn prefailure_attribute_failing_now_is_flagged_warn() {
        let sector = sector_with_records(&[(0, record(5, 1, 5, 90, [0; 6]))]);
        let mut thresholds = [0u8; 512];
        thresholds[TABLE_START] = 5;
        thresholds[TABLE_START + 1] = 10;

        let attrs = parse_attributes(&sector, Some(&thresholds), "Generic", "1.0");
        assert!(attrs[0].prefailure);
        assert!(attrs[0].warn);
    }
}
