//! Data model shared by the parsers, the quirk engine and the verdict
//! engine.

use serde::{Deserialize, Serialize};

/// ASCII identification strings pulled out of the 512-byte IDENTIFY
/// sector. Always null-terminated internally; the public fields are
/// already-trimmed owned `String`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyParsed {
    pub serial: String,
    pub firmware: String,
    pub model: String,
}

/// `SK_SMART_OFFLINE_DATA_COLLECTION_STATUS_*` (ATA8 §7.52).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfflineDataCollectionStatus {
    Never,
    Success,
    InProgress,
    Suspended,
    Aborted,
    Fatal,
    Unknown,
}

/// 10 defined self-test execution status codes (byte 363 high nibble).
/// Terminal unless `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfTestExecutionStatus {
    SuccessOrNever,
    Aborted,
    Interrupted,
    Fatal,
    ErrorUnknown,
    ErrorElectrical,
    ErrorServo,
    ErrorRead,
    ErrorHandling,
    InProgress,
    /// A code in 9..15 exclusive of the defined ones above; ATA8 reserves
    /// these, but the field is still a valid nibble so we keep the raw
    /// value around instead of collapsing it to `Unknown`.
    Reserved(u8),
}

impl SelfTestExecutionStatus {
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble {
            0 => Self::SuccessOrNever,
            1 => Self::Aborted,
            2 => Self::Interrupted,
            3 => Self::Fatal,
            4 => Self::ErrorUnknown,
            5 => Self::ErrorElectrical,
            6 => Self::ErrorServo,
            7 => Self::ErrorRead,
            8 => Self::ErrorHandling,
            15 => Self::InProgress,
            other => Self::Reserved(other),
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn to_sentence(self) -> &'static str {
        match self {
            Self::SuccessOrNever => "The previous self-test routine completed without error or no self-test has ever been run.",
            Self::Aborted => "The self-test routine was aborted by the host.",
            Self::Interrupted => "The self-test routine was interrupted by the host with a hardware or software reset.",
            Self::Fatal => "A fatal error or unknown test error occurred while the device was executing its self-test routine and the device was unable to complete the self-test routine.",
            Self::ErrorUnknown => "The previous self-test completed having a test element that failed and the test element that failed is unknown.",
            Self::ErrorElectrical => "The previous self-test completed having the electrical element of the test failed.",
            Self::ErrorServo => "The previous self-test completed having the servo (and/or seek) test element of the test failed.",
            Self::ErrorRead => "The previous self-test completed having the read element of the test failed.",
            Self::ErrorHandling => "The previous self-test completed having a test element that failed and the device is suspected of having handling damage.",
            Self::InProgress => "Self-test routine in progress.",
            Self::Reserved(_) => "Reserved self-test execution status.",
        }
    }
}

/// Parsed contents of offsets 362..377 of the SMART data sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartParsed {
    pub offline_data_collection_status: OfflineDataCollectionStatus,
    pub self_test_execution_status: SelfTestExecutionStatus,
    /// 0-100, always a multiple of 10.
    pub self_test_percent_remaining: u8,
    pub total_offline_seconds: u16,
    pub short_and_extended_available: bool,
    pub conveyance_available: bool,
    pub start_available: bool,
    pub abort_available: bool,
    pub short_test_polling_minutes: u16,
    pub extended_test_polling_minutes: u16,
    pub conveyance_test_polling_minutes: u16,
}

/// Self-test kind, matching the ATA8 §7.52.5.2 selector values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfTest {
    Short = 1,
    Extended = 2,
    Conveyance = 3,
    Abort = 127,
}

impl SelfTest {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Extended => "extended",
            Self::Conveyance => "conveyance",
            Self::Abort => "abort",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "short" => Some(Self::Short),
            "extended" => Some(Self::Extended),
            "conveyance" => Some(Self::Conveyance),
            "abort" => Some(Self::Abort),
            _ => None,
        }
    }

    pub fn is_available(self, smart: &SmartParsed) -> bool {
        if !smart.start_available {
            return false;
        }
        match self {
            Self::Short | Self::Extended => smart.short_and_extended_available,
            Self::Conveyance => smart.conveyance_available,
            Self::Abort => smart.abort_available,
        }
    }

    pub fn polling_minutes(self, smart: &SmartParsed) -> u16 {
        if !self.is_available(smart) {
            return 0;
        }
        match self {
            Self::Short => smart.short_test_polling_minutes,
            Self::Extended => smart.extended_test_polling_minutes,
            Self::Conveyance => smart.conveyance_test_polling_minutes,
            Self::Abort => 0,
        }
    }
}

/// Canonical unit an attribute's pretty value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeUnit {
    Unknown,
    None,
    Milliseconds,
    Sectors,
    Millikelvin,
    SmallPercent,
    Percent,
    Megabytes,
}

impl AttributeUnit {
    pub fn display_suffix(self) -> &'static str {
        match self {
            Self::Unknown => "n/a",
            Self::None => "",
            Self::Milliseconds => "ms",
            Self::Sectors => "sectors",
            Self::Millikelvin => "mK",
            Self::SmallPercent | Self::Percent => "%",
            Self::Megabytes => "MB",
        }
    }
}

/// One parsed SMART attribute record, cross-referenced against the
/// threshold table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeParsed {
    pub id: u8,
    pub name: String,
    pub pretty_unit: AttributeUnit,
    pub flags: u16,
    pub online: bool,
    pub prefailure: bool,
    pub current_value: u8,
    pub current_value_valid: bool,
    pub worst_value: u8,
    pub worst_value_valid: bool,
    pub raw: [u8; 6],
    pub pretty_value: u64,
    pub threshold: u8,
    pub threshold_valid: bool,
    pub good_now: bool,
    pub good_now_valid: bool,
    pub good_in_the_past: bool,
    pub good_in_the_past_valid: bool,
    pub warn: bool,
}

/// Overall health verdict, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Overall {
    Good,
    BadAttributeInThePast,
    BadSector,
    BadAttributeNow,
    BadSectorMany,
    BadStatus,
}

impl Overall {
    pub fn to_sentence(self) -> &'static str {
        match self {
            Self::Good => "Disk is OK.",
            Self::BadAttributeInThePast => "This disk had a fully failed attribute in the past, but is OK now.",
            Self::BadSector => "This disk has a few bad sectors.",
            Self::BadAttributeNow => "This disk has a fully failed attribute.",
            Self::BadSectorMany => "This disk has many bad sectors.",
            Self::BadStatus => "This disk is dying. It has many bad sectors and/or a fully failed attribute. It might be dying right now, or it might already be dead.",
        }
    }
}
