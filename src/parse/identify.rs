//! IDENTIFY DEVICE string extraction.

use crate::model::IdentifyParsed;

const SERIAL_WORD_OFFSET: usize = 10;
const SERIAL_WORD_COUNT: usize = 10;
const FIRMWARE_WORD_OFFSET: usize = 23;
const FIRMWARE_WORD_COUNT: usize = 4;
const MODEL_WORD_OFFSET: usize = 27;
const MODEL_WORD_COUNT: usize = 20;

/// ATA identification strings are stored as a sequence of 16-bit words,
/// each byte-swapped relative to string order. Pulls `word_count` words
/// starting at `word_offset` out of `sector`, swaps each pair back,
/// blanks non-printable bytes, collapses runs of spaces, and trims.
fn extract_string(sector: &[u8; 512], word_offset: usize, word_count: usize) -> String {
    let byte_offset = word_offset * 2;
    let byte_len = word_count * 2;
    let mut raw = Vec::with_capacity(byte_len);

    for pair in sector[byte_offset..byte_offset + byte_len].chunks_exact(2) {
        raw.push(pair[1]);
        raw.push(pair[0]);
    }

    let cleaned: String = raw
        .into_iter()
        .map(|b| if (0x20..=0x7e).contains(&b) { b as char } else { ' ' })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim().to_string()
}

/// Extracts the serial number, firmware revision and model name out of a
/// 512-byte IDENTIFY DEVICE sector (ATA8-ACS words 10..20, 23..27 and
/// 27..47 respectively).
pub fn parse_identify(sector: &[u8; 512]) -> IdentifyParsed {
    IdentifyParsed {
        serial: extract_string(sector, SERIAL_WORD_OFFSET, SERIAL_WORD_COUNT),
        firmware: extract_string(sector, FIRMWARE_WORD_OFFSET, FIRMWARE_WORD_COUNT),
        model: extract_string(sector, MODEL_WORD_OFFSET, MODEL_WORD_COUNT),
    }
}
