//! Integration tests against the concrete seed scenarios in spec.md §8.

use ata_smart_core::blob::{self, Snapshot};
use ata_smart_core::cooker;
use ata_smart_core::model::{AttributeParsed, AttributeUnit, Overall};
use ata_smart_core::parse;
use ata_smart_core::quirks;
use ata_smart_core::verdict::{self, VerdictInputs};

fn attr(name: &str, unit: AttributeUnit, pretty_value: u64) -> AttributeParsed {
    AttributeParsed {
        id: 1,
        name: name.to_string(),
        pretty_unit: unit,
        flags: 0,
        online: true,
        prefailure: false,
        current_value: 100,
        current_value_valid: true,
        worst_value: 100,
        worst_value_valid: true,
        raw: [0; 6],
        pretty_value,
        threshold: 10,
        threshold_valid: true,
        good_now: true,
        good_now_valid: true,
        good_in_the_past: true,
        good_in_the_past_valid: true,
        warn: false,
    }
}

// Scenario 1: Signature check.
#[test]
fn signature_check_drives_bad_status_regardless_of_attributes() {
    let attrs = vec![attr("power-cycle-count", AttributeUnit::None, 12)];

    let good = verdict::compute(&VerdictInputs { attributes: &attrs, status_good: true, capacity_bytes: 1_000_000_000_000 });
    assert_eq!(good, Overall::Good);

    let bad = verdict::compute(&VerdictInputs { attributes: &attrs, status_good: false, capacity_bytes: 1_000_000_000_000 });
    assert_eq!(bad, Overall::BadStatus);
}

// Scenario 2: Cooked temperature, with and without the 10x-Celsius quirk.
#[test]
fn cooked_temperature_with_and_without_quirk() {
    let unquirked = cooker::cook("temperature-celsius-2", AttributeUnit::Millikelvin, [0x2A, 0x00, 0, 0, 0, 0]);
    assert_eq!(unquirked, 42 * 1000 + 273_150);
    assert_eq!(unquirked, 315_150);

    let quirked = cooker::cook("temperature-centi-celsius", AttributeUnit::Millikelvin, [0xFA, 0x01, 0, 0, 0, 0]);
    assert_eq!(quirked, 506 * 100 + 273_150);
    assert_eq!(quirked, 323_750);
}

// Scenario 3: Power-on hours, no quirk.
#[test]
fn power_on_hours_pretty_value() {
    let v = cooker::cook("power-on-hours", AttributeUnit::Milliseconds, [0xD0, 0x07, 0, 0, 0, 0]);
    assert_eq!(v, 2000 * 3_600_000);
    assert_eq!(v, 7_200_000_000);
}

// Scenario 4: Maxtor quirk renames id 9 and changes its unit multiplier.
#[test]
fn maxtor_quirk_renames_attribute_9_to_power_on_minutes() {
    let resolved = quirks::resolve_attribute("Maxtor 6Y120P0", "YAR41BW0", 9).expect("id 9 is cataloged");
    assert_eq!(resolved.name, "power-on-minutes");

    let raw_minutes: u64 = 120;
    let pretty = cooker::cook(resolved.name, resolved.unit, [raw_minutes as u8, 0, 0, 0, 0, 0]);
    assert_eq!(pretty, raw_minutes * 60_000);
}

// Scenario 5: Bad-sector threshold, capacity-scaled tolerance.
#[test]
fn bad_sector_threshold_is_capacity_scaled() {
    let capacity = 250_000_000_000u64; // 250 GB -> tolerance 251

    let mild = vec![attr("current-pending-sector", AttributeUnit::Sectors, 5)];
    let overall = verdict::compute(&VerdictInputs { attributes: &mild, status_good: true, capacity_bytes: capacity });
    assert_eq!(overall, Overall::BadSector);

    let severe = vec![attr("reallocated-sector-count", AttributeUnit::Sectors, 300)];
    let overall = verdict::compute(&VerdictInputs { attributes: &severe, status_good: true, capacity_bytes: capacity });
    assert_eq!(overall, Overall::BadSectorMany);
}

// Scenario 6: IDENTIFY string cleanup, the "WDC" worked example.
#[test]
fn identify_model_string_cleanup_worked_example() {
    const MODEL_WORD_OFFSET: usize = 27;
    let model = "WDC WD10EZEX-08W";
    let mut sector = [0u8; 512];
    let byte_offset = MODEL_WORD_OFFSET * 2;
    for (i, pair) in model.as_bytes().chunks(2).enumerate() {
        let lo = pair[0];
        let hi = pair.get(1).copied().unwrap_or(b' ');
        sector[byte_offset + i * 2] = hi;
        sector[byte_offset + i * 2 + 1] = lo;
    }

    let parsed = parse::parse_identify(&sector);
    assert_eq!(parsed.model, model);
}

// Full blob round-trip across all three sectors, exercising serialize/deserialize together
// rather than each in isolation.
#[test]
fn full_blob_round_trip_preserves_all_three_sectors() {
    let identify = [7u8; 512];
    let smart_data = [11u8; 512];
    let smart_thresholds = [13u8; 512];

    let snapshot = Snapshot {
        identify: Some(identify),
        smart_data: Some(smart_data),
        smart_thresholds: Some(smart_thresholds),
    };
    let bytes = blob::serialize(&snapshot);
    let parsed = blob::deserialize(&bytes).expect("well-formed blob parses");

    assert_eq!(parsed.identify, Some(identify));
    assert_eq!(parsed.smart_data, Some(smart_data));
    assert_eq!(parsed.smart_thresholds, Some(smart_thresholds));
}

// End-to-end pipeline: a synthetic SMART data + thresholds sector pair, parsed into
// attributes with threshold binding and quirk resolution all exercised together.
#[test]
fn attribute_pipeline_binds_thresholds_and_resolves_quirked_names() {
    const RECORD_LEN: usize = 12;
    const TABLE_START: usize = 2;

    let mut smart_data = [0u8; 512];
    // id 9 (power-on-hours, renamed by the Maxtor quirk), raw = 100 (hours-ish), current=90
    let rec9 = [9u8, 0, 0, 90, 80, 100, 0, 0, 0, 0, 0, 0];
    smart_data[TABLE_START..TABLE_START + RECORD_LEN].copy_from_slice(&rec9);
    // id 5 (reallocated-sector-count), current below threshold -> not good now
    let rec5 = [5u8, 1, 0, 5, 5, 3, 0, 0, 0, 0, 0, 0];
    smart_data[TABLE_START + RECORD_LEN..TABLE_START + 2 * RECORD_LEN].copy_from_slice(&rec5);

    let mut thresholds = [0u8; 512];
    thresholds[TABLE_START] = 9;
    thresholds[TABLE_START + 1] = 1;
    thresholds[TABLE_START + RECORD_LEN] = 5;
    thresholds[TABLE_START + RECORD_LEN + 1] = 10;

    let attrs = parse::parse_attributes(&smart_data, Some(&thresholds), "Maxtor 6Y120P0", "YAR41BW0");
    assert_eq!(attrs.len(), 2);

    let a9 = attrs.iter().find(|a| a.id == 9).unwrap();
    assert_eq!(a9.name, "power-on-minutes");
    assert_eq!(a9.pretty_value, 100 * 60_000);
    assert!(a9.good_now);

    let a5 = attrs.iter().find(|a| a.id == 5).unwrap();
    assert_eq!(a5.name, "reallocated-sector-count");
    assert!(a5.good_now_valid);
    assert!(!a5.good_now); // current(5) <= threshold(10)
    assert!(a5.prefailure);
    assert!(a5.warn);
}
