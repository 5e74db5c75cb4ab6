#![doc = r#"
Tick, time-string, and dump-date conversions.

All duration tags, legacy and extended, count in a fixed unit of
[`TICK_UNIT`] (64000) ticks per second. Human-readable time strings render
as `H:MM:SS.mmm`, omitting the hours field when zero; "unpadded" mode also
trims trailing zero fraction digits and empty higher fields.
"#]

use crate::error::{DateError, TimeError};
use alloc::{format, string::String, vec::Vec};

/// Number of ticks per second in duration tags.
pub const TICK_UNIT: u32 = 64_000;

/// Converts a tick count to whole milliseconds (truncating).
pub const fn ticks_to_ms(ticks: u32) -> u32 {
    ticks / (TICK_UNIT / 1000)
}

/// Converts milliseconds to ticks.
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms * (TICK_UNIT / 1000)
}

/// Renders a tick count as `H:MM:SS.mmm`.
///
/// The hours field is omitted when zero. With `padding` off, the minutes
/// field is also omitted when zero and trailing zero fraction digits (and a
/// then-trailing `.`) are trimmed, so 1500ms renders as `"1.5"`.
pub fn ticks_to_time_string(ticks: u32, padding: bool) -> String {
    let total_ms = ticks_to_ms(ticks);
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    let mut out = if hours != 0 {
        format!("{hours}:{minutes:02}:{seconds:02}.{ms:03}")
    } else if padding || minutes != 0 {
        format!("{minutes}:{seconds:02}.{ms:03}")
    } else {
        format!("{seconds}.{ms:03}")
    };

    if !padding {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }

    out
}

/// Parses `SS[.mmm]`, `MM:SS[.mmm]`, or `H:MM:SS[.mmm]` into ticks.
///
/// An empty string parses to zero ticks. More than two colons, an empty or
/// signed field, or a non-numeric field is a format error.
pub fn time_string_to_ticks(s: &str) -> Result<u32, TimeError> {
    if s.is_empty() {
        return Ok(0);
    }

    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() > 3 {
        return Err(TimeError::TooManyFields);
    }

    let mut hours = 0u64;
    let mut minutes = 0u64;
    let seconds_field = *fields.last().unwrap();
    match fields.len() {
        2 => minutes = parse_int_field(fields[0])?,
        3 => {
            hours = parse_int_field(fields[0])?;
            minutes = parse_int_field(fields[1])?;
        }
        _ => {}
    }
    let seconds = parse_seconds_field(seconds_field)?;

    let tv = (hours * 3600 + minutes * 60) as f64 + seconds;
    Ok((tv * TICK_UNIT as f64 + 0.5) as u32)
}

fn parse_int_field(field: &str) -> Result<u64, TimeError> {
    if field.is_empty() {
        return Err(TimeError::EmptyField);
    }
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::InvalidField);
    }
    field.parse().map_err(|_| TimeError::InvalidField)
}

fn parse_seconds_field(field: &str) -> Result<f64, TimeError> {
    if field.is_empty() {
        return Err(TimeError::EmptyField);
    }
    // digits with at most one '.', so "+5", "1e3" and "inf" are rejected
    let mut seen_dot = false;
    for b in field.bytes() {
        match b {
            b'0'..=b'9' => {}
            b'.' if !seen_dot => seen_dot = true,
            _ => return Err(TimeError::InvalidField),
        }
    }
    field.parse().map_err(|_| TimeError::InvalidField)
}

/// A dump date, as carried by the dumped-date tag.
///
/// The tag payload packs the date as the decimal number `yyyymmdd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DumpedDate {
    /// Four-digit year.
    pub year: u32,
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
}

impl DumpedDate {
    /// Parses a date string.
    ///
    /// Accepts three numbers separated by `/`, `-` or `.`. The field order
    /// is `YYYY/MM/DD` when the first number exceeds 31 (it cannot be a
    /// day-of-month), `MM/DD/YYYY` when the last one does, and is rejected
    /// as ambiguous otherwise.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let sep = ['/', '-', '.']
            .into_iter()
            .find(|&sep| s.contains(sep))
            .ok_or(DateError::Malformed)?;

        let mut numbers = [0u32; 3];
        let mut fields = s.split(sep);
        for number in &mut numbers {
            let field = fields.next().ok_or(DateError::Malformed)?;
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DateError::Malformed);
            }
            *number = field.parse().map_err(|_| DateError::Malformed)?;
        }
        if fields.next().is_some() {
            return Err(DateError::Malformed);
        }

        let [n1, n2, n3] = numbers;
        let date = if n1 > 31 {
            Self {
                year: n1,
                month: n2,
                day: n3,
            }
        } else if n3 > 31 {
            Self {
                year: n3,
                month: n1,
                day: n2,
            }
        } else {
            return Err(DateError::AmbiguousOrder);
        };

        if (1..=12).contains(&date.month) && (1..=31).contains(&date.day) {
            Ok(date)
        } else {
            Err(DateError::OutOfRange)
        }
    }

    /// Decodes the packed `yyyymmdd` tag payload.
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            year: packed / 10000,
            month: (packed / 100) % 100,
            day: packed % 100,
        }
    }

    /// Packs the date into the `yyyymmdd` tag payload.
    pub const fn packed(&self) -> u32 {
        self.year * 10000 + self.month * 100 + self.day
    }

    /// Renders the date in the legacy `MM/DD/YYYY` text form.
    pub fn to_legacy_string(&self) -> String {
        format!("{:02}/{:02}/{}", self.month, self.day, self.year)
    }

    /// Renders the date as `YYYY/MM/DD`.
    pub fn to_iso_string(&self) -> String {
        format!("{}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl core::fmt::Display for DumpedDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}
