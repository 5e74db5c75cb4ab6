#![doc = r#"
Parse, edit, and re-serialize SNES-SPC700 snapshot containers (`.spc`).

An SPC file freezes the whole state of the SNES sound module: the SPC700
registers, the 64KB ram image, the DSP register file, and the "extra ram"
page, plus two coexisting metadata systems:

- the fixed-offset **ID666** block embedded in the 256-byte header, with a
  binary and a text sub-format, and
- the optional trailing **xid6** chunk, a 32-bit-aligned TLV record stream
  for arbitrary-length tags.

Both feed a single typed [`TagStore`](crate::tag::TagStore). On save the
ID666 block is always re-emitted in text form, and the xid6 chunk is
appended only when some tag cannot be represented within the legacy widths.

The ram image also holds the DSP's BRR sample directory. [`SpcFile`]
scans it at parse time into up to 256 [`SampleEntry`](crate::sample::SampleEntry)
slots, and [`sample::brr`](crate::sample::brr) decodes the 9-byte BRR blocks
to linear PCM. Because the directory shares the ram with unrelated engine
data, [`sample::validate`](crate::sample::validate) classifies which slots
plausibly hold genuine audio.

# Example

```no_run
use spcx::prelude::*;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let bytes = std::fs::read("song.spc")?;
let parsed = SpcFile::from_bytes(&bytes)?;
for warning in &parsed.warnings {
    eprintln!("warning: {warning}");
}

let spc = parsed.file;
for srcn in plausible_srcns(&spc) {
    let sample = spc.sample(srcn).unwrap();
    let (pcm, looped) = spcx::sample::brr::decode(
        &spc.ram[sample.start_address as usize..sample.end_address as usize],
    );
    println!("${srcn:02x}: {} samples, looped: {looped}", pcm.len());
}
# Ok(())
# }
```
"#]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod error;
pub use error::*;

pub mod file;
pub use file::{ParsedSpc, SpcFile, SpcRegisters};

pub mod sample;

pub mod tag;

pub mod time;

mod reader;

pub mod prelude;
