use thiserror::Error;

pub mod config;
pub mod cursor;
pub mod entry;
pub mod entry_type;
pub mod header;
pub mod value_input;
pub mod value_output;
pub mod value_writer;


pub use config::{CodecConfiguration, ConfigError, WriterConfig};
pub use cursor::{ReadCursor, WriteCursor};
pub use entry::Entry;
pub use entry_type::EntryType;
pub use value_writer::{IoSink, Sink, ValueWriter, WriterError};

pub use relir_util::{BitView, Date, DatetimeInterval, Decimal, TimeOfDay, TimePoint};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("expected a {expected} entry but found {found}")]
    KindMismatch {
        expected: EntryType,
        found: EntryType,
    },
    #[error("encountered an unknown entry header 0x{0:02x}")]
    UnknownHeader(u8),
    #[error("entry was cut short: needed {needed} more bytes but only {remaining} remain")]
    Truncated { needed: usize, remaining: usize },
    #[error("malformed {kind} entry: {reason}")]
    Malformed {
        kind: EntryType,
        reason: &'static str,
    },
    #[error("{what} {value} is out of range")]
    OutOfRange { what: &'static str, value: u64 },
}

impl Error {
    /// Whether the input bytes themselves are corrupt, as opposed to the caller
    /// asking for the wrong kind or an unencodable value.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::UnknownHeader(_) | Error::Truncated { .. } | Error::Malformed { .. }
        )
    }
}
