#![doc = r#"
Re-exports the common surface of the crate.

```rust
use spcx::prelude::*;
```
"#]

pub use crate::{
    error::*,
    file::{ParsedSpc, SpcFile, SpcRegisters},
    sample::{
        BRR_BLOCK_SIZE, SampleEntry,
        brr::decode,
        validate::{dumpable_srcns, is_plausible_sample, plausible_srcns},
    },
    tag::{EmulatorId, TagId, TagStore, TagType, TagValue},
    time::{
        DumpedDate, TICK_UNIT, ms_to_ticks, ticks_to_ms, ticks_to_time_string,
        time_string_to_ticks,
    },
};
