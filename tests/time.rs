use pretty_assertions::assert_eq;
use spcx::prelude::*;
use spcx::{DateError, TimeError};

#[test]
fn tick_conversions() {
    assert_eq!(ticks_to_ms(TICK_UNIT), 1000);
    assert_eq!(ms_to_ticks(1000), TICK_UNIT);
    assert_eq!(ms_to_ticks(ticks_to_ms(238_304_000)), 238_304_000);
    // sub-millisecond ticks truncate
    assert_eq!(ticks_to_ms(63), 0);
}

#[test]
fn formats_time_strings() {
    assert_eq!(ticks_to_time_string(238_304_000, true), "1:02:03.500");
    assert_eq!(ticks_to_time_string(96_000, true), "0:01.500");
    assert_eq!(ticks_to_time_string(0, true), "0:00.000");

    // unpadded mode trims empty fields and trailing fraction zeros
    assert_eq!(ticks_to_time_string(96_000, false), "1.5");
    assert_eq!(ticks_to_time_string(90 * TICK_UNIT, false), "1:30");
    assert_eq!(ticks_to_time_string(0, false), "0");
}

#[test]
fn parses_time_strings() {
    assert_eq!(time_string_to_ticks("1:02:03.500"), Ok(238_304_000));
    assert_eq!(time_string_to_ticks("1:30"), Ok(90 * TICK_UNIT));
    assert_eq!(time_string_to_ticks("63"), Ok(63 * TICK_UNIT));
    assert_eq!(time_string_to_ticks("1.5"), Ok(96_000));
    assert_eq!(time_string_to_ticks(""), Ok(0));
}

#[test]
fn rejects_malformed_time_strings() {
    assert_eq!(
        time_string_to_ticks("1:2:3:4"),
        Err(TimeError::TooManyFields)
    );
    assert_eq!(time_string_to_ticks("1::5"), Err(TimeError::EmptyField));
    assert_eq!(time_string_to_ticks("+5"), Err(TimeError::InvalidField));
    assert_eq!(time_string_to_ticks("1e3"), Err(TimeError::InvalidField));
    assert_eq!(time_string_to_ticks("abc"), Err(TimeError::InvalidField));
}

#[test]
fn parses_dates_in_either_field_order() {
    let date = DumpedDate {
        year: 2009,
        month: 3,
        day: 15,
    };
    assert_eq!(DumpedDate::parse("03/15/2009"), Ok(date));
    assert_eq!(DumpedDate::parse("2009/03/15"), Ok(date));
    assert_eq!(DumpedDate::parse("2009-03-15"), Ok(date));
    assert_eq!(DumpedDate::parse("2009.3.15"), Ok(date));
}

#[test]
fn rejects_bad_dates() {
    assert_eq!(DumpedDate::parse("yesterday"), Err(DateError::Malformed));
    assert_eq!(DumpedDate::parse("2009/03"), Err(DateError::Malformed));
    assert_eq!(DumpedDate::parse("2009/03/15/1"), Err(DateError::Malformed));
    // every field could be a day-of-month
    assert_eq!(DumpedDate::parse("1/2/3"), Err(DateError::AmbiguousOrder));
    assert_eq!(DumpedDate::parse("2009/13/01"), Err(DateError::OutOfRange));
    assert_eq!(DumpedDate::parse("2009/00/01"), Err(DateError::OutOfRange));
}

#[test]
fn packs_and_renders_dates() {
    let date = DumpedDate {
        year: 2009,
        month: 3,
        day: 15,
    };
    assert_eq!(date.packed(), 2009_03_15);
    assert_eq!(DumpedDate::from_packed(2009_03_15), date);
    assert_eq!(date.to_legacy_string(), "03/15/2009");
    assert_eq!(date.to_iso_string(), "2009/03/15");
    assert_eq!(date.to_string(), "2009/03/15");
}

#[test]
fn playback_length_sums_the_duration_tags() {
    let mut tags = TagStore::new();
    tags.set_integer(TagId::IntroLength, 100, 4);
    assert_eq!(tags.playback_length(), 100);

    // the loop plays once unless a count says otherwise
    tags.set_integer(TagId::LoopLength, 50, 4);
    assert_eq!(tags.playback_length(), 150);
    tags.set_length(TagId::LoopCount, 3);
    assert_eq!(tags.playback_length(), 250);

    tags.set_integer(TagId::EndLength, 25, 4);
    assert_eq!(tags.playback_length(), 275);
}
