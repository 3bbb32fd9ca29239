//! Thin wrappers around `tracing` macros used at transport/command
//! boundaries. A library does not own a global subscriber — that's the
//! embedding application's job — so this module only emits events; it
//! never installs one.

pub(crate) fn command_dispatch(command: u8, direction: &str) {
    tracing::debug!(command = format_args!("0x{command:02x}"), direction, "dispatching ATA command");
}

pub(crate) fn transport_fallback(from: &str, to: &str, reason: &str) {
    tracing::warn!(from, to, reason, "transport backend failed, falling back");
}

pub(crate) fn io_failure(context: &str, detail: &str) {
    tracing::error!(context, detail, "ATA/SCSI I/O failure");
}
