//! Overall health verdict synthesis.
//!
//! Unlike the rest of the core, this rule cascade has no counterpart in
//! libatasmart's `atasmart.c` — `sk_disk_smart_get_overall()` is declared
//! in `atasmart.h` but its body was never published upstream. The
//! cascade below escalates through bad-attribute-in-the-past, bad-sector,
//! bad-attribute-now, many-bad-sectors and bad-status, in that order of
//! severity.

use crate::model::{AttributeParsed, Overall};

/// Inputs to the verdict cascade. `capacity_bytes` is the disk's byte
/// capacity as reported by the handle; `status_good` is the device's
/// SMART Return Status.
pub struct VerdictInputs<'a> {
    pub attributes: &'a [AttributeParsed],
    pub status_good: bool,
    pub capacity_bytes: u64,
}

fn attribute_count(attributes: &[AttributeParsed], name: &str) -> u64 {
    attributes.iter().find(|a| a.name == name).map(|a| a.pretty_value).unwrap_or(0)
}

/// Computes the overall verdict as the highest-severity rule that fires.
pub fn compute(inputs: &VerdictInputs) -> Overall {
    let mut overall = Overall::Good;

    let any_bad_in_the_past = inputs
        .attributes
        .iter()
        .any(|a| a.good_in_the_past_valid && !a.good_in_the_past);
    if any_bad_in_the_past {
        overall = overall.max(Overall::BadAttributeInThePast);
    }

    let n_realloc = attribute_count(inputs.attributes, "reallocated-sector-count");
    let n_pending = attribute_count(inputs.attributes, "current-pending-sector");
    let n_offline = attribute_count(inputs.attributes, "offline-uncorrectable");
    let bad_sectors = n_realloc + n_pending + n_offline;

    if bad_sectors > 0 {
        overall = overall.max(Overall::BadSector);
    }

    let any_bad_now = inputs.attributes.iter().any(|a| a.good_now_valid && !a.good_now);
    if any_bad_now {
        overall = overall.max(Overall::BadAttributeNow);
    }

    let tolerance = inputs.capacity_bytes / 1_000_000_000 + 1;
    if bad_sectors > tolerance {
        overall = overall.max(Overall::BadSectorMany);
    }

    if !inputs.status_good {
        overall = overall.max(Overall::BadStatus);
    }

    overall
}
