//! Room table extraction.

use std::collections::BTreeMap;

use crate::error::DecodeError;
use crate::memory::MemoryImage;
use crate::text::decode_string;

use super::ROOMS_ADDR;

/// One exit out of a room: `dir` is a verb id (e.g. the id for "NORTH"),
/// `dest` the destination room id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Exit {
    /// Verb id that triggers this exit.
    pub dir: u8,
    /// Destination room id.
    pub dest: u16,
}

/// A decoded room record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Room {
    /// The room's id, referenced by `TO`, `AT`, movement, and `DESC`/`LOOK`.
    pub id: u16,
    /// Id of the graphic record shown when the room is described.
    pub graphic_id: u16,
    /// Exits out of the room, in table order.
    pub exits: Vec<Exit>,
    /// The room's description text.
    pub desc: String,
}

/// Walks the rooms table, decoding every `[id: u16][len: u16][graphic_id:
/// u16][exit_list: ...0x00][desc_bytes]` record until `id == 0`.
///
/// `len` counts bytes from `graphic_id` through the end of `desc_bytes`; the
/// description consumes whatever remains after the exit list.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedRecord`] if `len` is too small to hold the
/// exit list actually present, or a text-decoding error from malformed description bytes.
pub fn extract_rooms(image: &MemoryImage) -> Result<BTreeMap<u16, Room>, DecodeError> {
    let mut result = BTreeMap::new();
    let mut addr = image.read16(ROOMS_ADDR);

    loop {
        let id = image.read16(addr);
        if id == 0 {
            break;
        }
        let len = image.read16(addr.wrapping_add(2));
        let graphic_id = image.read16(addr.wrapping_add(4));

        let mut exits = Vec::new();
        let mut exit_addr = addr.wrapping_add(6);
        loop {
            let dir = image.read8(exit_addr);
            if dir == 0 {
                exit_addr = exit_addr.wrapping_add(1);
                break;
            }
            let dest = image.read16(exit_addr.wrapping_add(1));
            exits.push(Exit { dir, dest });
            exit_addr = exit_addr.wrapping_add(3);
        }

        let exit_bytes = exit_addr.wrapping_sub(addr.wrapping_add(6));
        let consumed = 2u16.wrapping_add(exit_bytes);
        if len < consumed {
            return Err(DecodeError::truncated("rooms", addr));
        }
        let desc_len = len - consumed;
        let desc = decode_string(image, exit_addr, desc_len)?;

        result.insert(
            id,
            Room {
                id,
                graphic_id,
                exits,
                desc,
            },
        );

        addr = addr.wrapping_add(4).wrapping_add(len);
    }

    Ok(result)
}
