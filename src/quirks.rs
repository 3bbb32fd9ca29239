//! Per-vendor quirk engine.
//!
//! A quirk database is an ordered list of `(model_regex, firmware_regex,
//! quirk_mask)` rows. For a given `(model, firmware)` pair, the first row
//! whose nonempty regexes both match contributes its mask; matching stops
//! at the first hit — reproduced verbatim from `quirk_database[]` and
//! `lookup_quirks()` in libatasmart's `atasmart.c`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::{self, CatalogEntry};
use crate::error::{Error, Result};
use crate::model::AttributeUnit;

pub const QUIRK_9_POWERONMINUTES: u16 = 1 << 0;
pub const QUIRK_9_POWERONSECONDS: u16 = 1 << 1;
pub const QUIRK_9_POWERONHALFMINUTES: u16 = 1 << 2;
pub const QUIRK_192_EMERGENCYRETRACTCYCLECT: u16 = 1 << 3;
pub const QUIRK_193_LOADUNLOAD: u16 = 1 << 4;
pub const QUIRK_194_10XCELSIUS: u16 = 1 << 5;
pub const QUIRK_194_UNKNOWN: u16 = 1 << 6;
pub const QUIRK_200_WRITEERRORCOUNT: u16 = 1 << 7;
pub const QUIRK_201_DETECTEDTACOUNT: u16 = 1 << 8;

struct QuirkRow {
    model: Option<&'static str>,
    firmware: Option<&'static str>,
    mask: u16,
}

/// Traversal order is significant: the first matching row wins.
const QUIRK_DATABASE: &[QuirkRow] = &[
    QuirkRow {
        model: Some("^FUJITSU MHR2040AT$"),
        firmware: None,
        mask: QUIRK_9_POWERONSECONDS | QUIRK_192_EMERGENCYRETRACTCYCLECT | QUIRK_200_WRITEERRORCOUNT,
    },
    QuirkRow {
        model: Some("^FUJITSU MHS20[6432]0AT(  .)?$"),
        firmware: None,
        mask: QUIRK_9_POWERONSECONDS
            | QUIRK_192_EMERGENCYRETRACTCYCLECT
            | QUIRK_200_WRITEERRORCOUNT
            | QUIRK_201_DETECTEDTACOUNT,
    },
    QuirkRow {
        model: Some("^SAMSUNG SV4012H$"),
        firmware: None,
        mask: QUIRK_9_POWERONHALFMINUTES,
    },
    QuirkRow {
        model: Some("^SAMSUNG SV0412H$"),
        firmware: None,
        mask: QUIRK_9_POWERONHALFMINUTES | QUIRK_194_10XCELSIUS,
    },
    QuirkRow {
        model: Some("^SAMSUNG SV1204H$"),
        firmware: None,
        mask: QUIRK_9_POWERONHALFMINUTES | QUIRK_194_10XCELSIUS,
    },
    QuirkRow {
        model: Some("^SAMSUNG SP40A2H$"),
        firmware: Some("^RR100-07$"),
        mask: QUIRK_9_POWERONHALFMINUTES,
    },
    QuirkRow {
        model: Some("^SAMSUNG SP8004H$"),
        firmware: Some("^QW100-61$"),
        mask: QUIRK_9_POWERONHALFMINUTES,
    },
    QuirkRow {
        model: Some("^SAMSUNG"),
        firmware: Some(".*-(2[3-9]|3[0-9])$"),
        mask: QUIRK_9_POWERONHALFMINUTES,
    },
    QuirkRow {
        model: Some("^Maxtor 2B0(0[468]|1[05]|20)H1$"),
        firmware: None,
        mask: QUIRK_9_POWERONMINUTES | QUIRK_194_UNKNOWN,
    },
    QuirkRow {
        model: Some("^Maxtor 4G(120J6|160J[68])$"),
        firmware: None,
        mask: QUIRK_9_POWERONMINUTES | QUIRK_194_UNKNOWN,
    },
    QuirkRow {
        model: Some("^Maxtor 4D0(20H1|40H2|60H3|80H4)$"),
        firmware: None,
        mask: QUIRK_9_POWERONMINUTES | QUIRK_194_UNKNOWN,
    },
    QuirkRow {
        model: Some("^HITACHI_DK14FA-20B$"),
        firmware: None,
        mask: QUIRK_9_POWERONMINUTES | QUIRK_193_LOADUNLOAD,
    },
    QuirkRow {
        model: Some("^HITACHI_DK23..-..B?$"),
        firmware: None,
        mask: QUIRK_9_POWERONMINUTES | QUIRK_193_LOADUNLOAD,
    },
    QuirkRow {
        model: Some("^(HITACHI_DK23FA-20J|HTA422020F9AT[JN]0)$"),
        firmware: None,
        mask: QUIRK_9_POWERONMINUTES | QUIRK_193_LOADUNLOAD,
    },
    QuirkRow { model: Some("Maxtor"), firmware: None, mask: QUIRK_9_POWERONMINUTES },
    QuirkRow { model: Some("MAXTOR"), firmware: None, mask: QUIRK_9_POWERONMINUTES },
    QuirkRow { model: Some("Fujitsu"), firmware: None, mask: QUIRK_9_POWERONSECONDS },
    QuirkRow { model: Some("FUJITSU"), firmware: None, mask: QUIRK_9_POWERONSECONDS },
];

lazy_static! {
    /// Regexes are compiled lazily and cached once per row, keyed by
    /// position in `QUIRK_DATABASE`, since the database is fixed at
    /// build time.
    static ref COMPILED: Vec<(Option<Regex>, Option<Regex>)> = QUIRK_DATABASE
        .iter()
        .map(|row| {
            (
                row.model.map(|p| Regex::new(p).expect("quirk model regex is valid")),
                row.firmware.map(|p| Regex::new(p).expect("quirk firmware regex is valid")),
            )
        })
        .collect();
}

/// Returns the mask contributed by the first matching row, or 0 if none
/// match. `model`/`firmware` are matched with extended POSIX semantics
/// (via the `regex` crate, which is a compatible superset for anchored
/// patterns like these).
pub fn lookup_quirks(model: &str, firmware: &str) -> u16 {
    for (row, (model_re, firmware_re)) in QUIRK_DATABASE.iter().zip(COMPILED.iter()) {
        if let Some(re) = model_re {
            if !re.is_match(model) {
                continue;
            }
        }
        if let Some(re) = firmware_re {
            if !re.is_match(firmware) {
                continue;
            }
        }
        return row.mask;
    }
    0
}

/// Quirk-aware attribute lookup: quirk bindings win over the static
/// catalog for the id they target.
pub fn resolve_attribute(model: &str, firmware: &str, id: u8) -> Option<CatalogEntry> {
    let quirk = lookup_quirks(model, firmware);

    if quirk != 0 {
        match id {
            9 => {
                if quirk & QUIRK_9_POWERONMINUTES != 0 {
                    return Some(CatalogEntry { name: "power-on-minutes", unit: AttributeUnit::Milliseconds });
                } else if quirk & QUIRK_9_POWERONSECONDS != 0 {
                    return Some(CatalogEntry { name: "power-on-seconds", unit: AttributeUnit::Milliseconds });
                } else if quirk & QUIRK_9_POWERONHALFMINUTES != 0 {
                    return Some(CatalogEntry { name: "power-on-half-minutes", unit: AttributeUnit::Milliseconds });
                }
            }
            192 => {
                if quirk & QUIRK_192_EMERGENCYRETRACTCYCLECT != 0 {
                    return Some(CatalogEntry { name: "emergency-retract-cycle-count", unit: AttributeUnit::None });
                }
            }
            194 => {
                if quirk & QUIRK_194_10XCELSIUS != 0 {
                    return Some(CatalogEntry { name: "temperature-centi-celsius", unit: AttributeUnit::Millikelvin });
                } else if quirk & QUIRK_194_UNKNOWN != 0 {
                    return None;
                }
            }
            200 => {
                if quirk & QUIRK_200_WRITEERRORCOUNT != 0 {
                    return Some(CatalogEntry { name: "write-error-count", unit: AttributeUnit::None });
                }
            }
            201 => {
                if quirk & QUIRK_201_DETECTEDTACOUNT != 0 {
                    return Some(CatalogEntry { name: "detected-ta-count", unit: AttributeUnit::None });
                }
            }
            _ => {}
        }
    }

    catalog::lookup(id)
}

/// Validates a user-supplied regex, for callers who want to extend or
/// test quirk rows of their own. Not used by the built-in database
/// (which is validated at compile time via `expect` above) but kept as
/// the one place `InvalidArgument` regex errors are surfaced.
pub fn validate_regex(pattern: &str) -> Result<()> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| Error::InvalidArgument(format!("bad regex {pattern:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maxtor_quirk_applies_power_on_minutes() {
        let mask = lookup_quirks("Maxtor 6Y120P0", "YAR41BW0");
        assert_ne!(mask & QUIRK_9_POWERONMINUTES, 0);

        let resolved = resolve_attribute("Maxtor 6Y120P0", "YAR41BW0", 9).unwrap();
        assert_eq!(resolved.name, "power-on-minutes");
    }

    #[test]
    fn first_matching_row_wins() {
        // "^SAMSUNG SV0412H$" (row with 194_10XCELSIUS) is defined before
        // the bare "Fujitsu"/"Maxtor" fallbacks, and no row overlaps it,
        // so this is purely a specificity check that the quirk matches.
        let mask = lookup_quirks("SAMSUNG SV0412H", "");
        assert_eq!(mask, QUIRK_9_POWERONHALFMINUTES | QUIRK_194_10XCELSIUS);
    }

    #[test]
    fn no_match_yields_zero_mask_and_catalog_fallback() {
        assert_eq!(lookup_quirks("Seagate ST1000DM003", "CC4H"), 0);
        let resolved = resolve_attribute("Seagate ST1000DM003", "CC4H", 9).unwrap();
        assert_eq!(resolved.name, "power-on-hours");
    }

    #[test]
    fn quirk_194_unknown_forces_catalog_miss() {
        let resolved = resolve_attribute("Maxtor 2B008H1", "", 194);
        assert!(resolved.is_none());
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(validate_regex("(unterminated").is_err());
        assert!(validate_regex("^ok$").is_ok());
    }
}
