//! The legacy ID666 metadata block embedded in the container header.
//!
//! The block exists in two sub-formats distinguished by the byte at header
//! offset 0xd2: values below 0x30 (that is, below ASCII `'0'`) mean the
//! binary layout, anything else the text layout. Parsing produces entries
//! in the shared [`TagStore`]; unparsable subfields are skipped with a
//! warning and never abort the load. Writing always uses the text layout.

use crate::{
    error::ParseWarning,
    tag::{TagId, TagStore},
    time::{DumpedDate, TICK_UNIT, ms_to_ticks, ticks_to_ms},
};
use alloc::{format, string::String, vec::Vec};

const SONG_OFFSET: usize = 0x2e;
const GAME_OFFSET: usize = 0x4e;
const DUMPER_OFFSET: usize = 0x6e;
const COMMENT_OFFSET: usize = 0x7e;
const DATE_OFFSET: usize = 0x9e;
const INTRO_OFFSET: usize = 0xa9;
const FADE_OFFSET: usize = 0xac;
const BINARY_ARTIST_OFFSET: usize = 0xb0;
const TEXT_ARTIST_OFFSET: usize = 0xb1;
const BINARY_EMULATOR_OFFSET: usize = 0xd1;
const TEXT_EMULATOR_OFFSET: usize = 0xd2;

/// Byte slice up to the first NUL, as a string.
fn field_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn field_number(bytes: &[u8]) -> Option<Result<u32, ()>> {
    let field = field_str(bytes);
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    if field.bytes().all(|b| b.is_ascii_digit()) {
        Some(field.parse().map_err(|_| ()))
    } else {
        Some(Err(()))
    }
}

/// Parses the legacy block out of the 256-byte header into `tags`.
///
/// The caller has already established that the presence marker at offset
/// 0x23 is set.
pub(crate) fn parse(header: &[u8], tags: &mut TagStore, warnings: &mut Vec<ParseWarning>) {
    let set_string =
        |tags: &mut TagStore, id, offset, width| tags.set_string(id, &field_str(&header[offset..offset + width]));

    set_string(tags, TagId::SongName, SONG_OFFSET, 32);
    set_string(tags, TagId::GameName, GAME_OFFSET, 32);
    set_string(tags, TagId::DumperName, DUMPER_OFFSET, 16);
    set_string(tags, TagId::Comment, COMMENT_OFFSET, 32);

    if header[TEXT_EMULATOR_OFFSET] < 0x30 {
        parse_binary(header, tags);
    } else {
        parse_text(header, tags, warnings);
    }
}

fn parse_binary(header: &[u8], tags: &mut TagStore) {
    let date = u32::from_le_bytes(header[DATE_OFFSET..DATE_OFFSET + 4].try_into().unwrap());
    if date != 0 {
        tags.set_integer(TagId::DumpedDate, date, 4);
    }

    // the length fields hold tick counts; the tags keep the lossy legacy
    // renditions (whole seconds, milliseconds) like the original dumps do
    let intro = u32::from_le_bytes([
        header[INTRO_OFFSET],
        header[INTRO_OFFSET + 1],
        header[INTRO_OFFSET + 2],
        0,
    ]);
    let has_length = intro != 0;
    if has_length {
        tags.set_integer(TagId::IntroLength, ticks_to_ms(intro) / 1000, 4);
    }

    let fade = u32::from_le_bytes(header[FADE_OFFSET..FADE_OFFSET + 4].try_into().unwrap());
    if has_length || fade != 0 {
        tags.set_integer(TagId::FadeLength, ticks_to_ms(fade), 4);
    }

    tags.set_string(
        TagId::ArtistName,
        &field_str(&header[BINARY_ARTIST_OFFSET..BINARY_ARTIST_OFFSET + 32]),
    );

    tags.set_integer(TagId::Emulator, header[BINARY_EMULATOR_OFFSET] as u32, 1);
}

fn parse_text(header: &[u8], tags: &mut TagStore, warnings: &mut Vec<ParseWarning>) {
    let date_field = field_str(&header[DATE_OFFSET..DATE_OFFSET + 11]);
    if !date_field.is_empty() {
        match DumpedDate::parse(date_field.trim()) {
            Ok(date) => tags.set_integer(TagId::DumpedDate, date.packed(), 4),
            Err(_) => warnings.push(ParseWarning::LegacyDate),
        }
    }

    // the text fields are whole seconds and milliseconds; the tags count
    // ticks, so invert the scaling the writer applies
    match field_number(&header[INTRO_OFFSET..INTRO_OFFSET + 3]) {
        Some(Ok(seconds)) => tags.set_integer(TagId::IntroLength, seconds * TICK_UNIT, 4),
        Some(Err(())) => warnings.push(ParseWarning::LegacyIntroLength),
        None => {}
    }

    match field_number(&header[FADE_OFFSET..FADE_OFFSET + 5]) {
        Some(Ok(ms)) => tags.set_integer(TagId::FadeLength, ms_to_ticks(ms), 4),
        Some(Err(())) => warnings.push(ParseWarning::LegacyFadeLength),
        None => {}
    }

    tags.set_string(
        TagId::ArtistName,
        &field_str(&header[TEXT_ARTIST_OFFSET..TEXT_ARTIST_OFFSET + 32]),
    );

    match field_number(&header[TEXT_EMULATOR_OFFSET..TEXT_EMULATOR_OFFSET + 1]) {
        Some(Ok(id)) => tags.set_integer(TagId::Emulator, id, 1),
        Some(Err(())) => warnings.push(ParseWarning::LegacyEmulatorId),
        None => {}
    }
}

fn write_str(header: &mut [u8], offset: usize, width: usize, value: &str) {
    let bytes = value.as_bytes();
    let n = bytes.len().min(width);
    header[offset..offset + n].copy_from_slice(&bytes[..n]);
}

/// Writes the legacy block into the (pre-zeroed) header, text sub-format.
///
/// String values are truncated to their field widths; the playback and
/// fade lengths are re-derived from the tick tags and clamped to the
/// legacy digit counts. An absent emulator id is written as `'0'`,
/// "format unspecified", which also keeps the sub-format discriminant in
/// the text range.
pub(crate) fn write(header: &mut [u8], tags: &TagStore) {
    let string = |id| tags.string(id).unwrap_or_default();

    write_str(header, SONG_OFFSET, 32, &string(TagId::SongName));
    write_str(header, GAME_OFFSET, 32, &string(TagId::GameName));
    write_str(header, DUMPER_OFFSET, 16, &string(TagId::DumperName));
    write_str(header, COMMENT_OFFSET, 32, &string(TagId::Comment));

    if let Some(packed) = tags.integer(TagId::DumpedDate) {
        let date = DumpedDate::from_packed(packed);
        write_str(header, DATE_OFFSET, 11, &date.to_legacy_string());
    }

    let length_ticks = tags.playback_length();
    if length_ticks != 0 {
        let seconds = (ticks_to_ms(length_ticks) / 1000).min(999);
        write_str(header, INTRO_OFFSET, 3, &format!("{seconds}"));
    }

    if let Some(ticks) = tags.integer(TagId::FadeLength) {
        let ms = ticks_to_ms(ticks).min(99_999);
        write_str(header, FADE_OFFSET, 5, &format!("{ms}"));
    }

    write_str(header, TEXT_ARTIST_OFFSET, 32, &string(TagId::ArtistName));

    if let Some(emulator) = tags.integer(TagId::Emulator) {
        write_str(header, TEXT_EMULATOR_OFFSET, 1, &format!("{emulator}"));
    } else {
        header[TEXT_EMULATOR_OFFSET] = b'0';
    }
}
