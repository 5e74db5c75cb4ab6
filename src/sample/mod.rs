#![doc = r#"
The BRR sample directory embedded in the ram image.

The DSP addresses samples through a directory table at
`dsp[0x5d] << 8`: four bytes per slot, a little-endian start address
followed by a little-endian loop address. The end address is not stored
anywhere; it is recovered by walking 9-byte BRR blocks from the start
address until one carries the end flag.

A [`SampleEntry`] records what that walk found. *Structural* validity only
says the addresses are internally consistent with the BRR framing; whether
the region is genuine audio rather than incidental engine data is the
stronger judgment made by [`validate`].
"#]

pub mod brr;
pub use brr::BRR_BLOCK_SIZE;

pub mod validate;

use crate::file::RAM_SIZE;
use alloc::vec::Vec;

/// One sample directory slot, derived from the ram contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleEntry {
    /// Start address of the BRR data ("SA").
    pub start_address: u16,
    /// Loop start address ("LSA").
    pub loop_address: u16,
    /// One past the last BRR block, recovered by scanning.
    pub end_address: u16,
    /// Whether the end block carries the loop flag.
    pub looped: bool,
    /// An end-flagged block was found and the addresses are consistent.
    pub structurally_valid: bool,
    /// A non-end block carried a shift range above 12 during the scan.
    ///
    /// Some real-world dumps contain this (Actraiser); it is informational
    /// and does not invalidate the sample on its own.
    pub wild_shift_range: bool,
}

impl SampleEntry {
    /// Reads one directory slot and scans its BRR framing.
    pub(crate) fn scan(ram: &[u8; RAM_SIZE], start_address: u16, loop_address: u16) -> Self {
        let mut entry = Self {
            start_address,
            loop_address,
            ..Self::default()
        };

        let mut pos = start_address as usize;
        let mut found_end = false;
        while pos + BRR_BLOCK_SIZE <= RAM_SIZE {
            let header = ram[pos];
            pos += BRR_BLOCK_SIZE;

            if header & 1 != 0 {
                entry.looped = header & 2 != 0;
                found_end = true;
                break;
            }
            if header >> 4 > 0x0c {
                entry.wild_shift_range = true;
            }
        }

        entry.end_address = pos as u16;
        entry.structurally_valid = found_end && entry.valid_addresses();
        entry
    }

    /// Whether the addresses satisfy the framing invariants: start before
    /// end, and for looped samples a block-aligned loop point inside
    /// `[start, end)`.
    pub fn valid_addresses(&self) -> bool {
        if self.start_address >= self.end_address {
            return false;
        }

        if self.looped {
            let offset = self.loop_address as i32 - self.start_address as i32;
            if offset % BRR_BLOCK_SIZE as i32 != 0 {
                return false;
            }
            if self.loop_address < self.start_address || self.loop_address >= self.end_address {
                return false;
            }
        }

        true
    }

    /// Size of the BRR data in bytes, zero when the range is inverted.
    pub const fn compressed_size(&self) -> usize {
        if self.start_address <= self.end_address {
            (self.end_address - self.start_address) as usize
        } else {
            0
        }
    }

    /// Number of PCM samples the BRR data decodes to.
    pub const fn sample_count(&self) -> usize {
        self.compressed_size() / BRR_BLOCK_SIZE * 16
    }

    /// PCM sample index of the loop point.
    pub const fn loop_sample(&self) -> usize {
        if self.start_address <= self.loop_address {
            (self.loop_address - self.start_address) as usize / BRR_BLOCK_SIZE * 16
        } else {
            0
        }
    }
}

/// Scans the sample directory out of the ram image.
///
/// Slots are read until index 255 or until a slot's four directory bytes
/// would cross the end of the image, whichever comes first.
pub(crate) fn scan_directory(ram: &[u8; RAM_SIZE], dsp: &[u8; 0x80]) -> Vec<SampleEntry> {
    let base = (dsp[0x5d] as usize) << 8;

    let mut entries = Vec::new();
    for slot in 0..256 {
        let offset = base + slot * 4;
        if offset + 4 > RAM_SIZE {
            break;
        }

        let start = u16::from_le_bytes([ram[offset], ram[offset + 1]]);
        let loop_address = u16::from_le_bytes([ram[offset + 2], ram[offset + 3]]);
        entries.push(SampleEntry::scan(ram, start, loop_address));
    }
    entries
}
