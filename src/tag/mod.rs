#![doc = r#"
The typed tag dictionary shared by both metadata systems.

Tags are identified by the closed [`TagId`] set and carry one of three
payload shapes ([`TagType`]): a 2-byte "length" value stored inline in the
record header, a NUL-terminated string, or a little-endian integer of up to
4 bytes. The [`TagStore`] maps ids to values; absence of an id means "no
value", which is distinct from zero.

The legacy ID666 block (see [`crate::file`]) can only represent a subset of
tags within fixed field widths; [`TagStore::requires_extended`] decides
which entries must round-trip through the xid6 chunk instead.
"#]

mod emulator;
pub use emulator::*;

pub mod xid6;

mod psf;
pub use psf::*;

use crate::time::{TICK_UNIT, ticks_to_ms};
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Width of most legacy string fields.
pub const LEGACY_STRING_WIDTH: usize = 32;

/// Width of the legacy dumper-name field.
pub const LEGACY_DUMPER_WIDTH: usize = 16;

/// The documented tag identifiers.
///
/// This is a closed set; xid6 records with ids outside it are skipped with
/// a warning rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TagId {
    /// Song title.
    SongName = 0x01,
    /// Game title.
    GameName = 0x02,
    /// Artist of the song.
    ArtistName = 0x03,
    /// Name of the person who dumped the snapshot.
    DumperName = 0x04,
    /// Date of the dump, packed as decimal `yyyymmdd`.
    DumpedDate = 0x05,
    /// Emulator used for the dump (see [`EmulatorId`]).
    Emulator = 0x06,
    /// Free-form comment.
    Comment = 0x07,
    /// Official soundtrack title.
    OstTitle = 0x10,
    /// Official soundtrack disc number.
    OstDisc = 0x11,
    /// Official soundtrack track number, `(track << 8) | symbol`.
    OstTrackNumber = 0x12,
    /// Publisher name.
    PublisherName = 0x13,
    /// Copyright year.
    CopyrightYear = 0x14,
    /// Intro length in ticks.
    IntroLength = 0x30,
    /// Loop length in ticks.
    LoopLength = 0x31,
    /// End length in ticks.
    EndLength = 0x32,
    /// Fade length in ticks.
    FadeLength = 0x33,
    /// Bitmask of voices muted during the dump.
    MutedVoices = 0x34,
    /// Number of times to play the loop section.
    LoopCount = 0x35,
    /// Preamp volume, 16.16 fixed point.
    Volume = 0x36,
}

/// Payload shape of a tag value, as encoded in xid6 records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TagType {
    /// A 2-byte value carried in the record's length field itself.
    Length = 0,
    /// A NUL-terminated string payload.
    String = 1,
    /// A 4-byte little-endian integer payload.
    Integer = 4,
}

/// A tagged payload: shape plus raw little-endian bytes.
///
/// String payloads are NUL-terminated within `bytes`; integer and length
/// payloads are at most 4 bytes, little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagValue {
    kind: TagType,
    bytes: Vec<u8>,
}

impl TagValue {
    /// The payload shape.
    pub const fn kind(&self) -> TagType {
        self.kind
    }

    /// The raw payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The payload interpreted as a little-endian integer (first 4 bytes).
    pub fn as_integer(&self) -> u32 {
        let mut value = 0u32;
        for (i, &byte) in self.bytes.iter().take(4).enumerate() {
            value |= (byte as u32) << (8 * i);
        }
        value
    }

    /// The payload interpreted as a string, cut at the first NUL.
    pub fn as_string(&self) -> String {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.bytes.len());
        String::from_utf8_lossy(&self.bytes[..end]).into_owned()
    }
}

/// Mapping from [`TagId`] to [`TagValue`], iterated in id order.
///
/// Setters never fail: they store the value, or for an empty string remove
/// the tag. Getters return `None` for absent ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagStore {
    entries: BTreeMap<TagId, TagValue>,
}

impl TagStore {
    /// Creates an empty store.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// True if no tag is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tags set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if `id` has a value.
    pub fn contains(&self, id: TagId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Iterates entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TagId, &TagValue)> {
        self.entries.iter().map(|(&id, value)| (id, value))
    }

    /// Returns the raw value for `id`.
    pub fn get(&self, id: TagId) -> Option<&TagValue> {
        self.entries.get(&id)
    }

    /// Returns the value for `id` as a little-endian integer.
    pub fn integer(&self, id: TagId) -> Option<u32> {
        self.entries.get(&id).map(TagValue::as_integer)
    }

    /// Returns the value for `id` as a string, cut at the first NUL.
    pub fn string(&self, id: TagId) -> Option<String> {
        self.entries.get(&id).map(TagValue::as_string)
    }

    /// Stores `value` as a little-endian integer of `size` bytes (max 4).
    pub fn set_integer(&mut self, id: TagId, value: u32, size: usize) {
        let bytes = value
            .to_le_bytes()
            .into_iter()
            .take(size.min(4))
            .collect();
        self.entries.insert(
            id,
            TagValue {
                kind: TagType::Integer,
                bytes,
            },
        );
    }

    /// Stores `value` as a 2-byte "length" tag.
    pub fn set_length(&mut self, id: TagId, value: u16) {
        self.entries.insert(
            id,
            TagValue {
                kind: TagType::Length,
                bytes: value.to_le_bytes().to_vec(),
            },
        );
    }

    /// Stores a NUL-terminated string tag; an empty string removes the tag.
    pub fn set_string(&mut self, id: TagId, value: &str) {
        if value.is_empty() {
            self.entries.remove(&id);
        } else {
            let mut bytes = Vec::with_capacity(value.len() + 1);
            bytes.extend_from_slice(value.as_bytes());
            bytes.push(0);
            self.entries.insert(
                id,
                TagValue {
                    kind: TagType::String,
                    bytes,
                },
            );
        }
    }

    /// Removes the tag for `id`, if any.
    pub fn remove(&mut self, id: TagId) {
        self.entries.remove(&id);
    }

    pub(crate) fn set_raw(&mut self, id: TagId, kind: TagType, bytes: &[u8]) {
        self.entries.insert(
            id,
            TagValue {
                kind,
                bytes: bytes.to_vec(),
            },
        );
    }

    /// Total playback length in ticks: intro + loop × loop-count + end.
    ///
    /// The loop count defaults to 1 when the loop-count tag is absent; each
    /// term contributes only if its source tag exists.
    pub fn playback_length(&self) -> u32 {
        let mut ticks = 0u32;

        if let Some(intro) = self.integer(TagId::IntroLength) {
            ticks = ticks.wrapping_add(intro);
        }

        if let Some(loop_len) = self.integer(TagId::LoopLength) {
            let count = self.integer(TagId::LoopCount).unwrap_or(1) as u8;
            ticks = ticks.wrapping_add(loop_len.wrapping_mul(count as u32));
        }

        if let Some(end) = self.integer(TagId::EndLength) {
            ticks = ticks.wrapping_add(end);
        }

        ticks
    }

    /// Whether the tag set for `id` cannot be represented in the legacy
    /// ID666 block and must be written to the xid6 chunk.
    ///
    /// Strings require xid6 when longer than their legacy field; intro and
    /// fade lengths require it when their tick values do not fall on the
    /// legacy unit grid or exceed the legacy digit widths. Dumped date and
    /// emulator id always fit. Every other tag has no legacy field at all.
    pub fn requires_extended(&self, id: TagId) -> bool {
        match id {
            TagId::SongName | TagId::GameName | TagId::Comment | TagId::ArtistName => {
                self.string(id).is_some_and(|s| s.len() > LEGACY_STRING_WIDTH)
            }
            TagId::DumperName => self
                .string(id)
                .is_some_and(|s| s.len() > LEGACY_DUMPER_WIDTH),
            TagId::IntroLength => {
                let ticks = self.integer(id).unwrap_or(0);
                ticks % TICK_UNIT != 0 || ticks_to_ms(ticks) > 999_999
            }
            TagId::FadeLength => {
                let ticks = self.integer(id).unwrap_or(0);
                ticks % (TICK_UNIT / 1000) != 0 || ticks_to_ms(ticks) > 99_999
            }
            TagId::DumpedDate | TagId::Emulator => false,
            _ => true,
        }
    }
}
