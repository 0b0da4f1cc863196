//! Crate-wide error type.
//!
//! Shaped like `webern-midi_file`'s `error.rs`: a public opaque [`Error`] wrapping a
//! crate-private, `snafu`-derived enum with one variant per failure kind named in the
//! specification (malformed MIDI data, unsupported operations, invalid configuration, I/O).

use snafu::Snafu;
use std::io;

/// The public result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The public error type for this crate.
#[derive(Debug, Snafu)]
pub struct Error(pub(crate) LibError);

pub(crate) type LibResult<T> = std::result::Result<T, LibError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum LibError {
    #[snafu(display("invalid MIDI data at {}: {}", site, description))]
    InvalidMidiData { site: String, description: String },

    #[snafu(display("unsupported operation at {}: {}", site, description))]
    UnsupportedOperation { site: String, description: String },

    #[snafu(display("invalid analysis config: {}", description))]
    InvalidConfig { description: String },

    #[snafu(display("I/O error at {}: {}", site, source))]
    Io { site: String, source: io::Error },
}

macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

/// Builds and returns an `Err(LibError::InvalidMidiData { .. })` from the current call site.
macro_rules! invalid_midi {
    ($msg:expr) => {
        return crate::error::InvalidMidiData {
            site: crate::error::site!(),
            description: String::from($msg),
        }
        .fail()
    };
    ($fmt:expr, $($arg:expr),+) => {
        return crate::error::InvalidMidiData {
            site: crate::error::site!(),
            description: format!($fmt, $($arg),+),
        }
        .fail()
    };
}

/// Builds and returns an `Err(LibError::UnsupportedOperation { .. })` from the current call site.
macro_rules! unsupported {
    ($msg:expr) => {
        return crate::error::UnsupportedOperation {
            site: crate::error::site!(),
            description: String::from($msg),
        }
        .fail()
    };
}

pub(crate) use invalid_midi;
pub(crate) use site;
pub(crate) use unsupported;
