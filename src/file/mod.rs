#![doc = r#"
The fixed-layout SPC snapshot container.

| Offset  | Size    | Field                                   |
|---------|---------|-----------------------------------------|
| 0x00    | 0x21    | signature `"SNES-SPC700 Sound File Data v0.30"` |
| 0x21    | 2       | `0x1a 0x1a`                             |
| 0x23    | 1       | ID666 presence (`0x1a` yes / `0x1b` no) |
| 0x24    | 1       | version minor (30)                      |
| 0x25    | 7       | pc (LE), a, x, y, psw, sp               |
| 0x2e    | —       | ID666 fields (sub-format dependent)     |
| 0x100   | 0x10000 | ram image                               |
| 0x10100 | 0x80    | DSP registers                           |
| 0x10180 | 0x40    | reserved, zero on write                 |
| 0x101c0 | 0x40    | extra ram                               |
| 0x10200 | 8 + n   | optional xid6 chunk                     |
"#]

mod id666;

use crate::{
    error::{FormatError, ParseWarning},
    reader::Cursor,
    sample::{self, SampleEntry},
    tag::{TagId, TagStore, xid6},
};
use alloc::{boxed::Box, format, string::String, vec::Vec};

/// Full signature written on save.
pub const SIGNATURE: &[u8; 33] = b"SNES-SPC700 Sound File Data v0.30";

/// The version-independent signature prefix checked on load.
const SIGNATURE_HEAD: &[u8] = b"SNES-SPC700 Sound File Data";

/// Minimum container size: everything up to the optional xid6 chunk.
pub const MIN_FILE_SIZE: usize = 0x10200;

/// Size of the ram image.
pub const RAM_SIZE: usize = 0x10000;

/// Size of the DSP register file.
pub const DSP_SIZE: usize = 0x80;

/// Size of the extra ram region.
pub const EXTRA_RAM_SIZE: usize = 0x40;

const RAM_OFFSET: usize = 0x100;
const DSP_OFFSET: usize = 0x10100;
const EXTRA_RAM_OFFSET: usize = 0x101c0;
const XID6_OFFSET: usize = 0x10200;

/// The SPC700 register snapshot from the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpcRegisters {
    /// Program counter.
    pub pc: u16,
    /// Accumulator.
    pub a: u8,
    /// Index register X.
    pub x: u8,
    /// Index register Y.
    pub y: u8,
    /// Program status word.
    pub psw: u8,
    /// Stack pointer.
    pub sp: u8,
}

/// A successful parse: the container plus any non-fatal diagnostics.
#[derive(Debug)]
pub struct ParsedSpc {
    /// The parsed container.
    pub file: SpcFile,
    /// Skipped-field diagnostics, in the order encountered.
    pub warnings: Vec<ParseWarning>,
}

/// An SPC snapshot: register state, memory images, and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpcFile {
    /// SPC700 registers.
    pub regs: SpcRegisters,
    /// The 64KB ram image.
    pub ram: Box<[u8; RAM_SIZE]>,
    /// The DSP register file.
    pub dsp: [u8; DSP_SIZE],
    /// The extra ram region.
    pub extra_ram: [u8; EXTRA_RAM_SIZE],
    /// The unified tag store fed by both metadata systems.
    pub tags: TagStore,
    samples: Vec<SampleEntry>,
}

impl Default for SpcFile {
    fn default() -> Self {
        Self::new()
    }
}

impl SpcFile {
    /// Creates an empty snapshot with uninitialized-looking (0xff) memory.
    pub fn new() -> Self {
        Self {
            regs: SpcRegisters::default(),
            ram: Box::new([0xff; RAM_SIZE]),
            dsp: [0xff; DSP_SIZE],
            extra_ram: [0xff; EXTRA_RAM_SIZE],
            tags: TagStore::new(),
            samples: Vec::new(),
        }
    }

    /// Quick signature check without parsing.
    pub fn is_spc(bytes: &[u8]) -> bool {
        bytes.len() >= MIN_FILE_SIZE
            && bytes.starts_with(SIGNATURE_HEAD)
            && bytes[0x21] == 0x1a
            && bytes[0x22] == 0x1a
    }

    /// Parses a container from bytes.
    ///
    /// Fails only for a truncated input or a missing signature; malformed
    /// metadata subfields and extended-tag records are skipped and
    /// surfaced as [`ParsedSpc::warnings`]. The sample directory is
    /// scanned as the final step.
    pub fn from_bytes(bytes: &[u8]) -> Result<ParsedSpc, FormatError> {
        if bytes.len() < MIN_FILE_SIZE {
            return Err(FormatError::TooShort {
                actual: bytes.len(),
            });
        }
        if !Self::is_spc(bytes) {
            return Err(FormatError::BadSignature);
        }

        let mut file = Self::new();
        let mut warnings = Vec::new();

        let mut cursor = Cursor::new(bytes);
        cursor.set_position(0x25);
        file.regs = SpcRegisters {
            pc: cursor.u16_le().unwrap(),
            a: cursor.u8().unwrap(),
            x: cursor.u8().unwrap(),
            y: cursor.u8().unwrap(),
            psw: cursor.u8().unwrap(),
            sp: cursor.u8().unwrap(),
        };

        file.ram
            .copy_from_slice(&bytes[RAM_OFFSET..RAM_OFFSET + RAM_SIZE]);
        file.dsp
            .copy_from_slice(&bytes[DSP_OFFSET..DSP_OFFSET + DSP_SIZE]);
        file.extra_ram
            .copy_from_slice(&bytes[EXTRA_RAM_OFFSET..EXTRA_RAM_OFFSET + EXTRA_RAM_SIZE]);

        if bytes[0x23] == 0x1a {
            id666::parse(&bytes[..RAM_OFFSET], &mut file.tags, &mut warnings);
        }

        // a declared chunk size reaching past the end of input is clamped,
        // not fatal
        if bytes.len() > XID6_OFFSET + 8 && bytes[XID6_OFFSET..XID6_OFFSET + 4] == xid6::SIGNATURE {
            cursor.set_position(XID6_OFFSET + 4);
            let declared = cursor.u32_le().unwrap() as usize;
            let records_start = XID6_OFFSET + 8;
            let size = declared.min(bytes.len() - records_start);
            xid6::decode(
                &bytes[records_start..records_start + size],
                &mut file.tags,
                &mut warnings,
            );
        }

        file.rescan_samples();

        Ok(ParsedSpc { file, warnings })
    }

    /// Serializes the container.
    ///
    /// The ID666 block is emitted in text sub-format whenever any tag is
    /// set, and marked absent otherwise. The xid6 chunk is appended only
    /// if some tag cannot be represented within the legacy widths; when
    /// every tag fits, omitting the chunk loses nothing.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut header = [0u8; RAM_OFFSET];
        header[..SIGNATURE.len()].copy_from_slice(SIGNATURE);
        header[0x21] = 0x1a;
        header[0x22] = 0x1a;
        header[0x24] = 30;

        header[0x25..0x27].copy_from_slice(&self.regs.pc.to_le_bytes());
        header[0x27] = self.regs.a;
        header[0x28] = self.regs.x;
        header[0x29] = self.regs.y;
        header[0x2a] = self.regs.psw;
        header[0x2b] = self.regs.sp;

        if self.tags.is_empty() {
            header[0x23] = 0x1b;
        } else {
            header[0x23] = 0x1a;
            id666::write(&mut header, &self.tags);
        }

        let mut bytes = Vec::with_capacity(MIN_FILE_SIZE);
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(self.ram.as_ref());
        bytes.extend_from_slice(&self.dsp);
        bytes.extend_from_slice(&[0u8; 0x40]);
        bytes.extend_from_slice(&self.extra_ram);

        if xid6::is_required(&self.tags) {
            bytes.extend_from_slice(&xid6::encode(&self.tags));
        }

        bytes
    }

    /// The scanned sample directory, one entry per populated slot.
    pub fn samples(&self) -> &[SampleEntry] {
        &self.samples
    }

    /// Number of populated directory slots (up to 256).
    pub fn directory_length(&self) -> usize {
        self.samples.len()
    }

    /// The directory entry for `srcn`, if that slot was populated.
    pub fn sample(&self, srcn: u8) -> Option<&SampleEntry> {
        self.samples.get(srcn as usize)
    }

    /// Rescans the sample directory from the current ram and DSP state.
    ///
    /// Called by [`SpcFile::from_bytes`]; call it again after editing the
    /// ram image or the directory base register.
    pub fn rescan_samples(&mut self) {
        self.samples = sample::scan_directory(&self.ram, &self.dsp);
    }

    /// A display title: the song-name tag when present, annotated with
    /// `fallback` (typically the file name), or `fallback` alone.
    pub fn song_title(&self, fallback: &str) -> String {
        match self.tags.string(TagId::SongName) {
            Some(song) => format!("{song} ({fallback})"),
            None => String::from(fallback),
        }
    }

    /// The raw BRR byte range for slot `srcn`, or `None` for an empty or
    /// inverted range.
    ///
    /// With `with_loop_header`, the data is prefixed by the 2-byte
    /// little-endian loop point (relative to the sample start) expected by
    /// addmusic-style tools; a missing or out-of-range loop point is
    /// written as the sample length.
    pub fn brr_data(&self, srcn: u8, with_loop_header: bool) -> Option<Vec<u8>> {
        let sample = self.sample(srcn)?;
        if sample.compressed_size() == 0 {
            return None;
        }

        let start = sample.start_address as usize;
        let end = sample.end_address as usize;

        let mut data = Vec::with_capacity(2 + (end - start));
        if with_loop_header {
            let loop_in_range = sample.loop_address >= sample.start_address
                && sample.loop_address < sample.end_address;
            let loop_point = if sample.looped && loop_in_range {
                sample.loop_address - sample.start_address
            } else {
                sample.end_address - sample.start_address
            };
            data.extend_from_slice(&loop_point.to_le_bytes());
        }
        data.extend_from_slice(&self.ram[start..end]);
        Some(data)
    }
}

#[cfg(feature = "std")]
impl SpcFile {
    /// Reads and parses a container from a file.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<ParsedSpc, crate::error::LoadError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes)?)
    }

    /// Serializes the container to a file.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())
    }

    /// Signature check against a file on disk.
    pub fn is_spc_file<P: AsRef<std::path::Path>>(path: P) -> bool {
        std::fs::read(path)
            .map(|bytes| Self::is_spc(&bytes))
            .unwrap_or(false)
    }
}
