#![doc = r#"
Heuristic classification of directory slots.

Structural validity (see [`SampleEntry`](super::SampleEntry)) only checks
BRR framing, and the directory table routinely points at engine data,
pointer tables, or the echo buffer. These checks cross-reference the DSP
state to decide which slots plausibly hold genuine audio:

- samples do not live in the direct pages (below 0x200),
- a sample does not overlap the directory table that references it,
- an active echo region would have destroyed anything stored there,
- very short samples are usually garbage unless their loop metadata is
  coherent, and
- overlapping samples must agree on block alignment.

Classification never fails; implausible slots are simply excluded.
"#]

use super::{BRR_BLOCK_SIZE, SampleEntry};
use crate::file::SpcFile;
use alloc::vec::Vec;

/// Echo buffer placement derived from the DSP registers.
struct EchoRegion {
    enabled: bool,
    start: u16,
    /// One past the last echo byte, wrapping mod 64K.
    end: u16,
}

impl EchoRegion {
    fn from_dsp(dsp: &[u8; 0x80]) -> Self {
        let flags = dsp[0x6c];
        let start = (dsp[0x6d] as u16) << 8;
        let delay = dsp[0x7d] & 15;

        // EDL of zero still reserves a 4-byte region
        let size: u16 = if delay != 0 { 2048 * delay as u16 } else { 4 };

        Self {
            enabled: flags & 0x20 == 0,
            start,
            end: start.wrapping_add(size),
        }
    }

    fn overlaps(&self, sample: &SampleEntry) -> bool {
        let (sa, ea) = (sample.start_address, sample.end_address);
        if self.start < self.end {
            (sa >= self.start && sa < self.end) || (ea > self.start && ea <= self.end)
        } else {
            // echo region wraps past the top of ram
            sa >= self.start || sa < self.end || ea > self.start || ea <= self.end
        }
    }
}

/// Whether directory slot `srcn` plausibly holds genuine audio.
///
/// Implies structural validity; the additional checks are the heuristics
/// listed in the module docs.
pub fn is_plausible_sample(spc: &SpcFile, srcn: u8) -> bool {
    let Some(sample) = spc.sample(srcn) else {
        return false;
    };

    if !sample.structurally_valid {
        return false;
    }

    // the loop address must be block-aligned even for one-shot samples
    let loop_offset = sample.loop_address as i32 - sample.start_address as i32;
    if loop_offset % BRR_BLOCK_SIZE as i32 != 0 {
        return false;
    }

    // samples should not live in the direct pages
    if sample.start_address < 0x200 {
        return false;
    }

    // the slot's own directory entry must exist in full, and the sample
    // must not overlap the table up to and including that entry
    let dir = (spc.dsp[0x5d] as u32) << 8;
    let dir_end = dir + (srcn as u32 + 1) * 4;
    if dir_end >= 0x10000 {
        return false;
    }
    let (sa, ea) = (sample.start_address as u32, sample.end_address as u32);
    if (sa >= dir && sa < dir_end) || (ea > dir && ea <= dir_end) {
        return false;
    }

    // short regions are rarely real samples; below 8 blocks require the
    // loop metadata to be coherent, below 2 reject outright
    // (test cases: Dragon Quest III, Wagan Paradise)
    let blocks = sample.compressed_size() / BRR_BLOCK_SIZE;
    if blocks < 8 {
        if blocks < 2 {
            return false;
        }
        if !sample.looped
            && (sample.loop_address < sample.start_address
                || sample.loop_address >= sample.end_address)
        {
            return false;
        }
    }

    // anything inside an active echo region has been overwritten
    let echo = EchoRegion::from_dsp(&spc.dsp);
    if echo.enabled && echo.overlaps(sample) {
        return false;
    }

    true
}

/// Returns the plausible-audio slot indices, in ascending order.
///
/// On top of [`is_plausible_sample`], slots that overlap an already
/// accepted slot must share its block alignment; a mismatched overlap
/// means at least one of the two reads the region off-frame.
pub fn plausible_srcns(spc: &SpcFile) -> Vec<u8> {
    let mut srcns: Vec<u8> = Vec::new();

    for srcn in 0..spc.directory_length() {
        let srcn = srcn as u8;
        if !is_plausible_sample(spc, srcn) {
            continue;
        }
        let sample = spc.sample(srcn).unwrap();

        let aligned = srcns.iter().all(|&accepted| {
            let other = spc.sample(accepted).unwrap();
            let overlaps = (sample.start_address >= other.start_address
                && sample.start_address < other.end_address)
                || (sample.end_address > other.start_address
                    && sample.end_address <= other.end_address);
            !overlaps
                || sample.start_address % BRR_BLOCK_SIZE as u16
                    == other.start_address % BRR_BLOCK_SIZE as u16
        });

        if aligned {
            srcns.push(srcn);
        }
    }

    srcns
}

/// Filters `srcns` down to the slots with a non-empty, exportable range.
pub fn dumpable_srcns(spc: &SpcFile, srcns: &[u8]) -> Vec<u8> {
    srcns
        .iter()
        .copied()
        .filter(|&srcn| {
            spc.sample(srcn)
                .is_some_and(|sample| sample.compressed_size() != 0)
        })
        .collect()
}
