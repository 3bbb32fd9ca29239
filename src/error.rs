use serde::Serialize;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the SMART core, matching the categories a caller
/// needs to tell apart: a capability the device lacks, a bad argument,
/// missing data, a transport failure, and a bare OS error.
#[derive(Error, Debug)]
pub enum Error {
    /// The device lacks SMART/IDENTIFY, or the requested direction is not
    /// implementable on the selected transport backend.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A bad regex in the quirk database, or an unknown self-test selector.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller asked for data (SMART attributes, thresholds) that was
    /// never retrieved from the device.
    #[error("no data: {0}")]
    NoData(String),

    /// The transport returned an unexpected status, a short read, a bad
    /// sense signature, or an unrecognized SMART Return Status signature.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Allocation failure while naming an attribute.
    #[error("out of memory")]
    OutOfMemory,

    /// The underlying system call failed; wraps the OS error verbatim.
    #[error("OS error: {0}")]
    OsError(#[from] io::Error),
}

// Serialize as a plain string so embedding applications (or a JSON-based
// IPC boundary) get a message, not a tagged enum shape.
impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_os_error_verbatim() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such device");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("no such device"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let err = Error::NotSupported("smart".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"not supported: smart\"");
    }
}
