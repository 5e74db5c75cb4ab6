use thiserror::Error;

/// Fatal container-level failures.
///
/// These abort [`SpcFile::from_bytes`](crate::SpcFile::from_bytes) with no
/// partial result. Per-field problems inside an otherwise well-formed
/// container are [`ParseWarning`]s instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The input ends before the fixed 0x10200-byte container layout does.
    #[error("input is {actual:#x} bytes, below the 0x10200-byte minimum")]
    TooShort {
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input does not start with the SPC700 signature string.
    #[error("missing SNES-SPC700 signature")]
    BadSignature,
}

/// A non-fatal diagnostic raised while parsing metadata.
///
/// The offending field or record is skipped and parsing continues; the
/// warnings are collected on [`ParsedSpc`](crate::ParsedSpc).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseWarning {
    /// The ID666 text-format dumped date did not parse as a date.
    #[error("unparsable ID666 dumped date")]
    LegacyDate,
    /// The ID666 text-format playback length was not a decimal number.
    #[error("unparsable ID666 playback length")]
    LegacyIntroLength,
    /// The ID666 text-format fade length was not a decimal number.
    #[error("unparsable ID666 fade length")]
    LegacyFadeLength,
    /// The ID666 text-format emulator id was not a decimal digit.
    #[error("unparsable ID666 emulator id")]
    LegacyEmulatorId,
    /// An xid6 record carried an id outside the documented tag set.
    #[error("unknown xid6 tag id {id:#04x}")]
    UnknownTagId {
        /// The undocumented id byte.
        id: u8,
    },
    /// An xid6 record carried a type byte other than length/string/integer.
    #[error("unknown xid6 tag type {ty} for id {id:#04x}")]
    UnknownTagType {
        /// Id byte of the record.
        id: u8,
        /// The undocumented type byte.
        ty: u8,
    },
    /// An xid6 record claims a payload extending past the chunk boundary.
    #[error("xid6 record {id:#04x} claims {length} bytes past the chunk end")]
    OversizedRecord {
        /// Id byte of the record.
        id: u8,
        /// Declared payload length.
        length: u16,
    },
}

/// Rejected time strings (see [`time_string_to_ticks`](crate::time::time_string_to_ticks)).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    /// More than two `:` separators.
    #[error("more than two ':' separators")]
    TooManyFields,
    /// A field between separators was empty.
    #[error("empty time field")]
    EmptyField,
    /// A field was signed or not a number.
    #[error("time field is not an unsigned number")]
    InvalidField,
}

/// Rejected date strings (see [`DumpedDate::parse`](crate::time::DumpedDate::parse)).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    /// Not three `/`-, `-`- or `.`-separated numbers.
    #[error("expected three '/'-, '-'- or '.'-separated numbers")]
    Malformed,
    /// Neither the first nor the last field exceeds 31, so the year
    /// position cannot be determined.
    #[error("cannot tell the year field apart from a day-of-month")]
    AmbiguousOrder,
    /// Month or day outside the calendar range.
    #[error("month or day out of range")]
    OutOfRange,
}

/// Failure to load a container from the filesystem.
#[cfg(feature = "std")]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The file contents are not an SPC container.
    #[error(transparent)]
    Format(#[from] FormatError),
}
