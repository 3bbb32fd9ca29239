//! SMART data sector status parsing (offsets 362..377). Reproduced
//! from `sk_disk_smart_parse()` in libatasmart's `atasmart.c`, byte
//! offset for byte offset.

use crate::model::{OfflineDataCollectionStatus, SelfTestExecutionStatus, SmartParsed};

fn offline_status(byte: u8) -> OfflineDataCollectionStatus {
    match byte {
        0x00 | 0x80 => OfflineDataCollectionStatus::Never,
        0x02 | 0x82 => OfflineDataCollectionStatus::Success,
        0x03 => OfflineDataCollectionStatus::InProgress,
        0x04 | 0x84 => OfflineDataCollectionStatus::Suspended,
        0x05 | 0x85 => OfflineDataCollectionStatus::Aborted,
        0x06 | 0x86 => OfflineDataCollectionStatus::Fatal,
        _ => OfflineDataCollectionStatus::Unknown,
    }
}

/// Parses the status block of a 512-byte SMART data sector.
pub fn parse_smart_status(sector: &[u8; 512]) -> SmartParsed {
    let conveyance_available = sector[367] & 32 != 0;
    let short_and_extended_available = sector[367] & 16 != 0;
    let start_available = sector[367] & 1 != 0;
    let abort_available = sector[367] & 41 != 0;

    let extended_test_polling_minutes = if sector[373] != 0xFF {
        sector[373] as u16
    } else {
        (sector[376] as u16) << 8 | sector[375] as u16
    };

    SmartParsed {
        offline_data_collection_status: offline_status(sector[362]),
        self_test_execution_status: SelfTestExecutionStatus::from_nibble((sector[363] >> 4) & 0xF),
        self_test_percent_remaining: 10 * (sector[363] & 0xF),
        total_offline_seconds: sector[364] as u16 | ((sector[365] as u16) << 8),
        short_and_extended_available,
        conveyance_available,
        start_available,
        abort_available,
        short_test_polling_minutes: sector[372] as u16,
        extended_test_polling_minutes,
        conveyance_test_polling_minutes: sector[374] as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_sector() -> [u8; 512] {
        [0u8; 512]
    }

    #[test]
    fn offline_status_high_bit_variants_are_equivalent() {
        let mut a = blank_sector();
        a[362] = 0x02;
        let mut b = blank_sector();
        b[362] = 0x82;
        assert_eq!(
            parse_smart_status(&a).offline_data_collection_status,
            parse_smart_status(&b).offline_data_collection_status
        );
    }

    #[test]
    fn self_test_status_and_percent_split_byte_363() {
        let mut sector = blank_sector();
        sector[363] = 0x25; // status nibble 2 (Interrupted), 5*10=50%
        let parsed = parse_smart_status(&sector);
        assert_eq!(parsed.self_test_execution_status, SelfTestExecutionStatus::Interrupted);
        assert_eq!(parsed.self_test_percent_remaining, 50);
    }

    #[test]
    fn capability_bits_follow_the_abort_mask_quirk() {
        let mut sector = blank_sector();
        sector[367] = 1; // only "start" bit set
        let parsed = parse_smart_status(&sector);
        assert!(parsed.start_available);
        assert!(parsed.abort_available); // mask 41 includes bit 1
        assert!(!parsed.short_and_extended_available);
        assert!(!parsed.conveyance_available);
    }

    #[test]
    fn extended_polling_minutes_widens_past_0xff() {
        let mut sector = blank_sector();
        sector[373] = 0xFF;
        sector[375] = 0x34;
        sector[376] = 0x12;
        let parsed = parse_smart_status(&sector);
        assert_eq!(parsed.extended_test_polling_minutes, 0x1234);
    }

    #[test]
    fn extended_polling_minutes_stays_narrow_below_0xff() {
        let mut sector = blank_sector();
        sector[373] = 30;
        let parsed = parse_smart_status(&sector);
        assert_eq!(parsed.extended_test_polling_minutes, 30);
    }
}
