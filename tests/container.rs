use pretty_assertions::assert_eq;
use spcx::prelude::*;

/// Builds a minimal well-formed container with no metadata.
fn empty_container() -> Vec<u8> {
    let mut bytes = vec![0u8; 0x10200];
    bytes[..33].copy_from_slice(b"SNES-SPC700 Sound File Data v0.30");
    bytes[0x21] = 0x1a;
    bytes[0x22] = 0x1a;
    bytes[0x23] = 0x1b; // no ID666 block
    bytes[0x24] = 30;
    bytes
}

fn write_at(bytes: &mut [u8], offset: usize, data: &[u8]) {
    bytes[offset..offset + data.len()].copy_from_slice(data);
}

#[test]
fn rejects_short_input() {
    let bytes = empty_container();
    assert_eq!(
        SpcFile::from_bytes(&bytes[..0x100]).unwrap_err(),
        FormatError::TooShort { actual: 0x100 }
    );
}

#[test]
fn rejects_bad_signature() {
    let mut bytes = empty_container();
    bytes[0] = b'X';
    assert_eq!(
        SpcFile::from_bytes(&bytes).unwrap_err(),
        FormatError::BadSignature
    );

    let mut bytes = empty_container();
    bytes[0x22] = 0;
    assert_eq!(
        SpcFile::from_bytes(&bytes).unwrap_err(),
        FormatError::BadSignature
    );
}

#[test]
fn reads_registers_and_memory() {
    let mut bytes = empty_container();
    write_at(&mut bytes, 0x25, &[0x34, 0x12, 0xaa, 0xbb, 0xcc, 0x42, 0xef]);
    bytes[0x100] = 0x11; // ram[0]
    bytes[0x100ff] = 0x22; // ram[0xffff]
    bytes[0x10100] = 0x33; // dsp[0]
    bytes[0x101c0] = 0x44; // extra_ram[0]

    let parsed = SpcFile::from_bytes(&bytes).unwrap();
    assert!(parsed.warnings.is_empty());

    let spc = parsed.file;
    assert_eq!(
        spc.regs,
        SpcRegisters {
            pc: 0x1234,
            a: 0xaa,
            x: 0xbb,
            y: 0xcc,
            psw: 0x42,
            sp: 0xef,
        }
    );
    assert_eq!(spc.ram[0], 0x11);
    assert_eq!(spc.ram[0xffff], 0x22);
    assert_eq!(spc.dsp[0], 0x33);
    assert_eq!(spc.extra_ram[0], 0x44);
    assert!(spc.tags.is_empty());
}

#[test]
fn parses_text_format_legacy_block() {
    let mut bytes = empty_container();
    bytes[0x23] = 0x1a;
    write_at(&mut bytes, 0x2e, b"Dancing Mad");
    write_at(&mut bytes, 0x4e, b"Final Fantasy III");
    write_at(&mut bytes, 0x6e, b"Datschge");
    write_at(&mut bytes, 0x7e, b"a comment");
    write_at(&mut bytes, 0x9e, b"03/15/2009");
    write_at(&mut bytes, 0xa9, b"100");
    write_at(&mut bytes, 0xac, b"5000");
    write_at(&mut bytes, 0xb1, b"Nobuo Uematsu");
    bytes[0xd2] = b'2'; // also selects the text sub-format

    let parsed = SpcFile::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.warnings, vec![]);

    let tags = &parsed.file.tags;
    assert_eq!(tags.string(TagId::SongName).as_deref(), Some("Dancing Mad"));
    assert_eq!(
        tags.string(TagId::GameName).as_deref(),
        Some("Final Fantasy III")
    );
    assert_eq!(tags.string(TagId::DumperName).as_deref(), Some("Datschge"));
    assert_eq!(tags.string(TagId::Comment).as_deref(), Some("a comment"));
    assert_eq!(
        tags.string(TagId::ArtistName).as_deref(),
        Some("Nobuo Uematsu")
    );
    assert_eq!(tags.integer(TagId::DumpedDate), Some(2009_03_15));
    assert_eq!(tags.integer(TagId::IntroLength), Some(100 * TICK_UNIT));
    assert_eq!(tags.integer(TagId::FadeLength), Some(ms_to_ticks(5000)));
    assert_eq!(tags.integer(TagId::Emulator), Some(2));
}

#[test]
fn parses_binary_format_legacy_block() {
    let mut bytes = empty_container();
    bytes[0x23] = 0x1a;
    write_at(&mut bytes, 0x2e, b"Song");
    write_at(&mut bytes, 0x9e, &2009_03_15u32.to_le_bytes());
    write_at(&mut bytes, 0xa9, &6_400_000u32.to_le_bytes()[..3]); // 100s in ticks
    write_at(&mut bytes, 0xac, &640_000u32.to_le_bytes()); // 10s in ticks
    write_at(&mut bytes, 0xb0, b"Artist");
    bytes[0xd1] = 2;
    bytes[0xd2] = 0; // binary sub-format

    let parsed = SpcFile::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.warnings, vec![]);

    let tags = &parsed.file.tags;
    assert_eq!(tags.string(TagId::SongName).as_deref(), Some("Song"));
    assert_eq!(tags.string(TagId::ArtistName).as_deref(), Some("Artist"));
    assert_eq!(tags.integer(TagId::DumpedDate), Some(2009_03_15));
    // the binary branch keeps the lossy legacy renditions
    assert_eq!(tags.integer(TagId::IntroLength), Some(100));
    assert_eq!(tags.integer(TagId::FadeLength), Some(10_000));
    assert_eq!(tags.integer(TagId::Emulator), Some(2));
}

#[test]
fn bad_legacy_subfields_warn_but_do_not_abort() {
    let mut bytes = empty_container();
    bytes[0x23] = 0x1a;
    write_at(&mut bytes, 0x2e, b"Still parsed");
    write_at(&mut bytes, 0x9e, b"yesterday");
    write_at(&mut bytes, 0xa9, b"12a");
    write_at(&mut bytes, 0xac, b"x9000");
    bytes[0xd2] = b'?';

    let parsed = SpcFile::from_bytes(&bytes).unwrap();
    assert_eq!(
        parsed.warnings,
        vec![
            ParseWarning::LegacyDate,
            ParseWarning::LegacyIntroLength,
            ParseWarning::LegacyFadeLength,
            ParseWarning::LegacyEmulatorId,
        ]
    );

    let tags = &parsed.file.tags;
    assert_eq!(tags.string(TagId::SongName).as_deref(), Some("Still parsed"));
    assert_eq!(tags.integer(TagId::DumpedDate), None);
    assert_eq!(tags.integer(TagId::IntroLength), None);
    assert_eq!(tags.integer(TagId::FadeLength), None);
    assert_eq!(tags.integer(TagId::Emulator), None);
}

fn with_xid6(mut bytes: Vec<u8>, records: &[u8]) -> Vec<u8> {
    bytes.extend_from_slice(b"xid6");
    bytes.extend_from_slice(&(records.len() as u32).to_le_bytes());
    bytes.extend_from_slice(records);
    bytes
}

#[test]
fn parses_xid6_records() {
    let mut records = Vec::new();
    // string record, padded to the next 32-bit boundary
    records.extend_from_slice(&[0x10, 1, 13, 0]);
    records.extend_from_slice(b"Soundtrack X\0");
    records.extend_from_slice(&[0, 0, 0]);
    // length record: the value lives in the length field
    records.extend_from_slice(&[0x14, 0]);
    records.extend_from_slice(&1994u16.to_le_bytes());
    // integer record
    records.extend_from_slice(&[0x30, 4, 4, 0]);
    records.extend_from_slice(&6_400_000u32.to_le_bytes());

    let bytes = with_xid6(empty_container(), &records);
    let parsed = SpcFile::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.warnings, vec![]);

    let tags = &parsed.file.tags;
    assert_eq!(tags.string(TagId::OstTitle).as_deref(), Some("Soundtrack X"));
    assert_eq!(tags.integer(TagId::CopyrightYear), Some(1994));
    assert_eq!(tags.get(TagId::CopyrightYear).unwrap().kind(), TagType::Length);
    assert_eq!(tags.integer(TagId::IntroLength), Some(6_400_000));
}

#[test]
fn clamps_oversized_xid6_declared_size() {
    let mut records = Vec::new();
    records.extend_from_slice(&[0x14, 0]);
    records.extend_from_slice(&1994u16.to_le_bytes());

    let mut bytes = empty_container();
    bytes.extend_from_slice(b"xid6");
    bytes.extend_from_slice(&10_000u32.to_le_bytes()); // reaches past EOF
    bytes.extend_from_slice(&records);

    let parsed = SpcFile::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.file.tags.integer(TagId::CopyrightYear), Some(1994));
}

#[test]
fn skips_bad_xid6_records_and_continues() {
    let mut records = Vec::new();
    // undocumented id
    records.extend_from_slice(&[0x7f, 4, 4, 0]);
    records.extend_from_slice(&7u32.to_le_bytes());
    // payload claims to reach past the chunk end
    records.extend_from_slice(&[0x01, 1, 200, 0]);

    let bytes = with_xid6(empty_container(), &records);
    let parsed = SpcFile::from_bytes(&bytes).unwrap();
    assert_eq!(
        parsed.warnings,
        vec![
            ParseWarning::UnknownTagId { id: 0x7f },
            ParseWarning::OversizedRecord { id: 0x01, length: 200 },
        ]
    );
    assert!(parsed.file.tags.is_empty());
}

#[test]
fn save_without_tags_marks_legacy_absent() {
    let spc = SpcFile::new();
    let bytes = spc.to_bytes();
    assert_eq!(bytes.len(), 0x10200);
    assert_eq!(bytes[0x23], 0x1b);
}

#[test]
fn legacy_representable_tags_roundtrip() {
    let mut spc = SpcFile::new();
    spc.regs.pc = 0x0500;
    spc.regs.sp = 0xcf;
    spc.tags.set_string(TagId::SongName, "Dancing Mad");
    spc.tags.set_string(TagId::GameName, "Final Fantasy III");
    spc.tags.set_string(TagId::DumperName, "Datschge");
    spc.tags.set_string(TagId::Comment, "a comment");
    spc.tags.set_string(TagId::ArtistName, "Nobuo Uematsu");
    spc.tags.set_integer(TagId::DumpedDate, 2009_03_15, 4);
    spc.tags.set_integer(TagId::IntroLength, 120 * TICK_UNIT, 4);
    spc.tags.set_integer(TagId::FadeLength, ms_to_ticks(8000), 4);
    spc.tags.set_integer(TagId::Emulator, 2, 1);

    let bytes = spc.to_bytes();
    // every tag fits the legacy block, so no xid6 chunk is emitted
    assert_eq!(bytes.len(), 0x10200);

    let reloaded = SpcFile::from_bytes(&bytes).unwrap();
    assert_eq!(reloaded.warnings, vec![]);

    spc.rescan_samples();
    assert_eq!(reloaded.file, spc);
}

#[test]
fn long_strings_roundtrip_through_xid6() {
    let long_title = "A Song Title Well Past The Thirty-Two Byte Legacy Field";

    let mut spc = SpcFile::new();
    spc.tags.set_string(TagId::SongName, long_title);

    let bytes = spc.to_bytes();
    assert!(bytes.len() > 0x10200);
    assert_eq!(&bytes[0x10200..0x10204], b"xid6");

    let reloaded = SpcFile::from_bytes(&bytes).unwrap();
    // the legacy field holds the truncation; the xid6 record wins
    assert_eq!(
        reloaded.file.tags.string(TagId::SongName).as_deref(),
        Some(long_title)
    );
}

#[test]
fn extended_only_tags_always_roundtrip() {
    let mut spc = SpcFile::new();
    spc.tags.set_integer(TagId::LoopLength, 30 * TICK_UNIT, 4);
    spc.tags.set_length(TagId::LoopCount, 2);
    spc.tags.set_length(TagId::MutedVoices, 0b0001_0001);
    spc.tags.set_integer(TagId::Volume, 0x18000, 4); // 1.5

    let bytes = spc.to_bytes();
    assert!(bytes.len() > 0x10200);

    let reloaded = SpcFile::from_bytes(&bytes).unwrap();
    let tags = &reloaded.file.tags;
    assert_eq!(tags.integer(TagId::LoopLength), Some(30 * TICK_UNIT));
    assert_eq!(tags.integer(TagId::LoopCount), Some(2));
    assert_eq!(tags.get(TagId::LoopCount).unwrap().kind(), TagType::Length);
    assert_eq!(tags.integer(TagId::MutedVoices), Some(0b0001_0001));
    assert_eq!(tags.integer(TagId::Volume), Some(0x18000));
}

#[test]
fn song_title_prefers_the_tag() {
    let mut spc = SpcFile::new();
    assert_eq!(spc.song_title("dump.spc"), "dump.spc");

    spc.tags.set_string(TagId::SongName, "Dancing Mad");
    assert_eq!(spc.song_title("dump.spc"), "Dancing Mad (dump.spc)");
}
