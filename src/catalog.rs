//! Static id → (name, unit) attribute catalog.
//!
//! Reproduced verbatim from `attribute_info[255]` in libatasmart
//! (itself credited there to smartmontools). Ids 192/228 and 193/225
//! are deliberately kept as distinct, differently-named entries — on
//! some vendors' drives they alias the same physical counter, but
//! nothing here should guess that; the table is reproduced as-is.

use crate::model::AttributeUnit;

/// A catalog entry: canonical name plus canonical unit. A lookup either
/// returns both or neither.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub unit: AttributeUnit,
}

macro_rules! entry {
    ($name:expr, $unit:expr) => {
        Some(CatalogEntry { name: $name, unit: $unit })
    };
}

/// Looks up the static catalog entry for `id`, ignoring quirks. Use
/// [`crate::quirks::resolve_attribute`] for the quirk-aware lookup used
/// by the attribute parser.
pub fn lookup(id: u8) -> Option<CatalogEntry> {
    use AttributeUnit::*;
    match id {
        1 => entry!("raw-read-error-rate", None),
        2 => entry!("throughput-perfomance", Unknown),
        3 => entry!("spin-up-time", Milliseconds),
        4 => entry!("start-stop-count", None),
        5 => entry!("reallocated-sector-count", None),
        6 => entry!("read-channel-margin", Unknown),
        7 => entry!("seek-error-rate", None),
        8 => entry!("seek-time-perfomance", Unknown),
        9 => entry!("power-on-hours", Milliseconds),
        10 => entry!("spin-retry-count", None),
        11 => entry!("calibration-retry-count", None),
        12 => entry!("power-cycle-count", None),
        13 => entry!("read-soft-error-rate", None),
        187 => entry!("reported-uncorrect", Sectors),
        189 => entry!("high-fly-writes", None),
        190 => entry!("airflow-temperature-celsius", Millikelvin),
        191 => entry!("g-sense-error-rate", None),
        192 => entry!("power-off-retract-count-1", None),
        193 => entry!("load-cycle-count-1", None),
        194 => entry!("temperature-celsius-2", Millikelvin),
        195 => entry!("hardware-ecc-recovered", None),
        196 => entry!("reallocated-event-count", None),
        197 => entry!("current-pending-sector", Sectors),
        198 => entry!("offline-uncorrectable", Sectors),
        199 => entry!("udma-crc-error-count", None),
        200 => entry!("multi-zone-error-rate", None),
        201 => entry!("soft-read-error-rate", None),
        202 => entry!("ta-increase-count", None),
        203 => entry!("run-out-cancel", None),
        204 => entry!("shock-count-write-opern", None),
        205 => entry!("shock-rate-write-opern", None),
        206 => entry!("flying-height", Unknown),
        207 => entry!("spin-high-current", Unknown),
        208 => entry!("spin-buzz", Unknown),
        209 => entry!("offline-seek-perfomance", Unknown),
        220 => entry!("disk-shift", Unknown),
        221 => entry!("g-sense-error-rate-2", None),
        222 => entry!("loaded-hours", Milliseconds),
        223 => entry!("load-retry-count", None),
        224 => entry!("load-friction", Unknown),
        225 => entry!("load-cycle-count-2", None),
        226 => entry!("load-in-time", Milliseconds),
        227 => entry!("torq-amp-count", None),
        228 => entry!("power-off-retract-count-2", None),
        230 => entry!("head-amplitude", Unknown),
        231 => entry!("temperature-celsius-1", Millikelvin),
        240 => entry!("head-flying-hours", Milliseconds),
        250 => entry!("read-error-retry-rate", None),
        _ => Option::None,
    }
}

/// Synthetic name used when the catalog (and any quirk) misses.
pub fn synthetic_name(id: u8) -> String {
    format!("attribute-{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_always_pairs_name_with_unit() {
        let e = lookup(9).expect("id 9 is cataloged");
        assert_eq!(e.name, "power-on-hours");
        assert_eq!(e.unit, AttributeUnit::Milliseconds);
    }

    #[test]
    fn miss_yields_no_entry() {
        assert!(lookup(0).is_none());
        assert!(lookup(14).is_none());
        assert!(lookup(254).is_none());
    }

    #[test]
    fn ids_192_228_and_193_225_are_distinct_entries() {
        assert_eq!(lookup(192).unwrap().name, "power-off-retract-count-1");
        assert_eq!(lookup(228).unwrap().name, "power-off-retract-count-2");
        assert_eq!(lookup(193).unwrap().name, "load-cycle-count-1");
        assert_eq!(lookup(225).unwrap().name, "load-cycle-count-2");
    }

    #[test]
    fn synthetic_name_format() {
        assert_eq!(synthetic_name(37), "attribute-37");
    }
}
