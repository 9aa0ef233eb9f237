//! Object table extraction.

use crate::error::DecodeError;
use crate::memory::MemoryImage;
use crate::text::decode_string;

use super::OBJECTS_ADDR;

/// A decoded object record.
///
/// `loc` is a decode-time snapshot equal to `initial_loc` (`0` = nowhere,
/// `255` = carried, otherwise a room id). The database is immutable at
/// runtime; the interpreter tracks each object's current location separately
/// in `MachineState::object_locations`, seeded from this field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Object {
    /// The object's id, referenced by condition-script opcodes (`GET obj`, `TO obj room`, ...).
    pub id: u8,
    /// Carry weight, checked against the player's `max_weight` budget by `GET`.
    pub weight: u8,
    /// The room id (or 0/255) the object starts in.
    pub initial_loc: u16,
    /// The object's display name.
    pub name: String,
    /// Current location; equals `initial_loc` until the interpreter moves it.
    pub loc: u16,
}

/// Walks the objects table, decoding every `[id: u8][len: u8][weight:
/// u8][initial_loc: u16][name_bytes: len-3]` record until `id == 0`.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedRecord`] if a record's declared length
/// underflows the fixed fields, or a text-decoding error from malformed name bytes.
pub fn extract_objects(image: &MemoryImage) -> Result<Vec<Object>, DecodeError> {
    let mut result = Vec::new();
    let mut addr = image.read16(OBJECTS_ADDR);

    loop {
        let id = image.read8(addr);
        if id == 0 {
            break;
        }
        let len = u16::from(image.read8(addr.wrapping_add(1)));
        if len < 3 {
            return Err(DecodeError::truncated("objects", addr));
        }
        let weight = image.read8(addr.wrapping_add(2));
        let initial_loc = image.read16(addr.wrapping_add(3));
        let name_addr = addr.wrapping_add(5);
        let name_len = len - 3;
        let name = decode_string(image, name_addr, name_len)?;

        result.push(Object {
            id,
            weight,
            initial_loc,
            name,
            loc: initial_loc,
        });

        addr = addr.wrapping_add(2).wrapping_add(len);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TOKENS_ADDR;

    fn build_image(records: &[(u8, u8, u16, &str)]) -> MemoryImage {
        let mut ram = vec![0u8; 0x10000];
        let tokens_base = 0x6000u16;
        ram[usize::from(TOKENS_ADDR)] = (tokens_base & 0xFF) as u8;
        ram[usize::from(TOKENS_ADDR) + 1] = (tokens_base >> 8) as u8;

        let mut token_addr = tokens_base;
        let mut obj_addr = 0x7000u16;
        ram[usize::from(OBJECTS_ADDR)] = (obj_addr & 0xFF) as u8;
        ram[usize::from(OBJECTS_ADDR) + 1] = (obj_addr >> 8) as u8;

        for (id, weight, initial_loc, name) in records {
            let bytes = name.as_bytes();
            ram[usize::from(token_addr)] = bytes.len() as u8;
            token_addr = token_addr.wrapping_add(1);
            for (i, &b) in bytes.iter().enumerate() {
                let last = i + 1 == bytes.len();
                ram[usize::from(token_addr)] = if last { b | 0x80 } else { b };
                token_addr = token_addr.wrapping_add(1);
            }
            let record_token_ordinal = records
                .iter()
                .take_while(|r| r.3 != *name)
                .count() as u16;

            let name_len = 2u8; // one compressed word
            ram[usize::from(obj_addr)] = *id;
            ram[usize::from(obj_addr) + 1] = 3 + name_len;
            ram[usize::from(obj_addr) + 2] = *weight;
            ram[usize::from(obj_addr) + 3] = (*initial_loc & 0xFF) as u8;
            ram[usize::from(obj_addr) + 4] = (*initial_loc >> 8) as u8;
            let word = (2u16 << 14) | (record_token_ordinal & 0x7FF);
            ram[usize::from(obj_addr) + 5] = (word & 0xFF) as u8;
            ram[usize::from(obj_addr) + 6] = (word >> 8) as u8;
            obj_addr = obj_addr.wrapping_add(7);
        }
        ram[usize::from(obj_addr)] = 0;

        MemoryImage::from_ram(ram)
    }

    #[test]
    fn test_extract_objects_empty() {
        let image = build_image(&[]);
        assert!(extract_objects(&image).unwrap().is_empty());
    }

    #[test]
    fn test_extract_objects_single() {
        let image = build_image(&[(1, 5, 2, "LAMP")]);
        let objects = extract_objects(&image).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id, 1);
        assert_eq!(objects[0].weight, 5);
        assert_eq!(objects[0].initial_loc, 2);
        assert_eq!(objects[0].loc, 2);
        assert_eq!(objects[0].name, "Lamp");
    }

    #[test]
    fn test_extract_objects_loc_starts_at_initial_loc() {
        let image = build_image(&[(7, 1, 255, "KEY")]);
        let objects = extract_objects(&image).unwrap();
        assert_eq!(objects[0].loc, 255);
        assert_eq!(objects[0].initial_loc, 255);
    }
}
