pub mod blob;
pub mod catalog;
mod command;
pub mod cooker;
pub mod disk;
pub mod error;
pub mod model;
pub mod parse;
pub mod quirks;
pub mod transport;
pub mod verdict;
mod util;

pub use disk::DiskHandle;
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_error_type_round_trips_through_result_alias() {
        let err: Result<()> = Err(Error::NotSupported("probe".into()));
        assert!(err.is_err());
    }
}
