#![doc = r#"
The extended ("xid6") tag chunk codec.

The chunk trails the fixed container layout: a 4-byte `"xid6"` signature, a
32-bit little-endian size covering only the records, then a stream of TLV
records. Each record is a 1-byte [`TagId`], a 1-byte [`TagType`], and a
2-byte little-endian length field:

- [`TagType::Length`]: the length field *is* the value; no payload.
- [`TagType::Integer`]: the length field is 4; a 4-byte payload follows.
- [`TagType::String`]: the length counts the NUL-terminated payload, which
  is zero-padded so the next record starts 32-bit aligned.

Decoding is tolerant: a record whose payload would cross the chunk boundary,
or whose id or type is undocumented, is skipped with a warning and decoding
resumes at the next aligned offset.
"#]

use super::{TagId, TagStore, TagType};
use crate::{error::ParseWarning, reader::Cursor};
use alloc::vec::Vec;

/// Chunk signature.
pub const SIGNATURE: [u8; 4] = *b"xid6";

const fn align32(n: usize) -> usize {
    (n + 3) & !3
}

/// Decodes the record region of an xid6 chunk into `store`.
///
/// `records` must already be clamped to the available input; the declared
/// chunk size is the caller's concern.
pub fn decode(records: &[u8], store: &mut TagStore, warnings: &mut Vec<ParseWarning>) {
    let mut cursor = Cursor::new(records);

    while cursor.remaining() >= 4 {
        let record_start = cursor.position();
        let id_byte = cursor.u8().unwrap();
        let type_byte = cursor.u8().unwrap();
        let length = cursor.u16_le().unwrap();

        let id = TagId::try_from(id_byte).ok();
        let ty = TagType::try_from(type_byte).ok();
        if id.is_none() {
            warnings.push(ParseWarning::UnknownTagId { id: id_byte });
        } else if ty.is_none() {
            warnings.push(ParseWarning::UnknownTagType {
                id: id_byte,
                ty: type_byte,
            });
        }

        match ty {
            Some(TagType::Length) => {
                if let Some(id) = id {
                    store.set_raw(id, TagType::Length, &length.to_le_bytes());
                }
            }
            _ => {
                // undocumented types are advanced over like payload records
                if let Some(payload) = cursor.bytes(length as usize) {
                    if let (Some(id), Some(ty)) = (id, ty) {
                        store.set_raw(id, ty, payload);
                    }
                } else {
                    warnings.push(ParseWarning::OversizedRecord {
                        id: id_byte,
                        length,
                    });
                }
                cursor.set_position(record_start + 4 + align32(length as usize));
            }
        }
    }
}

/// Encodes the full xid6 chunk, signature and size field included.
///
/// Included are the entries that [`TagStore::requires_extended`] flags,
/// plus the dumped date and the intro/fade lengths whenever present (their
/// legacy fields are lossy renditions). A store with no such entry still
/// encodes to a valid, record-less chunk.
pub fn encode(store: &TagStore) -> Vec<u8> {
    let mut chunk = Vec::new();
    chunk.extend_from_slice(&SIGNATURE);
    chunk.extend_from_slice(&[0; 4]);

    for (id, value) in store.iter() {
        let keep = store.requires_extended(id)
            || matches!(
                id,
                TagId::DumpedDate | TagId::IntroLength | TagId::FadeLength
            );
        if !keep {
            continue;
        }

        match value.kind() {
            TagType::Length => {
                chunk.push(id.into());
                chunk.push(TagType::Length.into());
                chunk.extend_from_slice(&(value.as_integer() as u16).to_le_bytes());
            }
            TagType::Integer => {
                chunk.push(id.into());
                chunk.push(TagType::Integer.into());
                chunk.extend_from_slice(&4u16.to_le_bytes());
                chunk.extend_from_slice(&value.as_integer().to_le_bytes());
            }
            TagType::String => {
                let bytes = value.bytes();
                let size = bytes
                    .iter()
                    .position(|&b| b == 0)
                    .map(|nul| nul + 1)
                    .unwrap_or(bytes.len());

                chunk.push(id.into());
                chunk.push(TagType::String.into());
                chunk.extend_from_slice(&(size as u16).to_le_bytes());
                chunk.extend_from_slice(&bytes[..size]);
                chunk.resize(chunk.len() + (align32(size) - size), 0);
            }
        }
    }

    let record_size = (chunk.len() - 8) as u32;
    chunk[4..8].copy_from_slice(&record_size.to_le_bytes());
    chunk
}

/// True if some tag in `store` must be written to the xid6 chunk.
pub fn is_required(store: &TagStore) -> bool {
    store.iter().any(|(id, _)| store.requires_extended(id))
}
