//! The aggregated, portable game database.
//!
//! [`Database`] is the JSON-serializable hand-off point between the decoder
//! (C1–C4) and the interpreter (C6–C9): built once by [`Database::decode`],
//! then free to travel across a process boundary (or just to disk) before
//! being loaded back with [`Database::load_file`].

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bytecode::{self, Op};
use crate::error::{DecodeError, RuntimeError};
use crate::memory::MemoryImage;
use crate::tables::{
    self, GraphicInstruction, Object, Room, ADVERBS_ADDR, CHARS_SYSVAR_ADDR,
    CUSTOM_FONT_MIN_ADDR, HPCS_ADDR, LCS_ADDR, LPCS_ADDR, NOUNS_ADDR, PRONOUN_NOUN_ID,
    PUNCTUATION_ADDR, STARTROOM_ADDR,
};

/// Number of 8-byte rows in a custom font's glyph set (96 printable ASCII characters).
const CUSTOM_FONT_GLYPHS: u16 = 96;

/// The fully decoded, portable representation of a game.
///
/// Field shapes and names match the external document format in spec §6;
/// `locations` is this document's name for the rooms table (kept to match
/// the reference database's JSON key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// 96 extracted 8x8 glyphs (768 bytes), or empty when the ROM font is used.
    pub font: Vec<u8>,
    /// Verb vocabulary: uppercase word -> id.
    pub verbs: BTreeMap<String, u8>,
    /// Noun vocabulary (pronoun entries excluded): uppercase word -> id.
    pub nouns: BTreeMap<String, u8>,
    /// Adverb vocabulary: uppercase word -> id.
    pub adverbs: BTreeMap<String, u8>,
    /// Noun-table entries with id 255, stored as plain words (the pronoun marker itself
    /// is not preserved per-word — all pronouns share the reserved id).
    pub pronouns: Vec<String>,
    /// Message id -> text.
    pub messages: BTreeMap<u8, String>,
    /// Decoded objects, in table order.
    pub objects: Vec<Object>,
    /// Decoded rooms, keyed by room id (serialized as `"locations"`).
    #[serde(rename = "locations")]
    pub rooms: BTreeMap<u16, Room>,
    /// The global high-priority condition script.
    pub hpcs: Vec<Op>,
    /// The global low-priority condition script.
    pub lpcs: Vec<Op>,
    /// Local condition scripts, keyed by room id.
    pub lcs: BTreeMap<u16, Vec<Op>>,
    /// Graphic records, keyed by graphic id.
    pub gfx: BTreeMap<u16, Vec<GraphicInstruction>>,
    /// Identifies the host toolkit variant this snapshot came from. Always `"SPECTRUM"`.
    pub model: String,
    /// The eight punctuation glyphs, in `PUNCTUATION` index order.
    pub punctuation: Vec<u8>,
    /// Extra word-level statement separators (defaults to `["then", "and"]`).
    pub separators: Vec<String>,
    /// The room id the player starts in. Must be non-zero for `start_adventure` to succeed.
    pub init_loc: u16,
    /// Message shown by front-ends listing an empty container. Defaults to `"Nothing"`.
    pub no_objs_msg: String,
}

impl Database {
    /// Decodes a complete database from a fixed-up memory image.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::BadMagic`] if the punctuation signature is
    /// absent, or any table extractor's error if a record is malformed.
    pub fn decode(image: &MemoryImage) -> Result<Self, DecodeError> {
        image.check_magic()?;
        log::debug!("magic check passed, decoding tables");

        let verbs = tables::extract_verbs(image)?;
        let (nouns, pronouns) = split_pronouns(tables::extract_vocabulary_table(image, NOUNS_ADDR)?);
        let adverbs = tables::extract_vocabulary_table(image, ADVERBS_ADDR)?;
        let messages = tables::extract_messages(image)?;
        let objects = tables::extract_objects(image)?;
        let rooms = tables::extract_rooms(image)?;
        log::debug!(
            "decoded {} verbs, {} nouns, {} adverbs, {} messages, {} objects, {} rooms",
            verbs.len(),
            nouns.len(),
            adverbs.len(),
            messages.len(),
            objects.len(),
            rooms.len()
        );

        let hpcs = bytecode::disassemble(image, image.read16(HPCS_ADDR));
        let lpcs = bytecode::disassemble(image, image.read16(LPCS_ADDR));
        let lcs = bytecode::extract_lcs(image, image.read16(LCS_ADDR))?;
        let gfx = tables::extract_graphics(image)?;

        let punctuation = (0..8).map(|i| image.read8(PUNCTUATION_ADDR + i)).collect();
        let init_loc = image.read16(STARTROOM_ADDR);
        let font = extract_font(image);

        Ok(Database {
            font,
            verbs,
            nouns,
            adverbs,
            pronouns,
            messages,
            objects,
            rooms,
            hpcs,
            lpcs,
            lcs,
            gfx,
            model: "SPECTRUM".to_string(),
            punctuation,
            separators: vec!["then".to_string(), "and".to_string()],
            init_loc,
            no_objs_msg: "Nothing".to_string(),
        })
    }

    /// Serializes this database to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Io`] or [`RuntimeError::Json`] on failure.
    pub fn save_file(&self, path: &Path) -> Result<(), RuntimeError> {
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads and validates a database from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Io`], [`RuntimeError::Json`], or
    /// [`RuntimeError::SchemaViolation`] if the document is malformed.
    pub fn load_file(path: &Path) -> Result<Self, RuntimeError> {
        let bytes = std::fs::read(path)?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Database::try_from(value)
    }
}

/// Required top-level keys, per the reference loader's `__check_ddb` schema check.
const REQUIRED_FIELDS: &[&str] = &[
    "font",
    "verbs",
    "nouns",
    "adverbs",
    "pronouns",
    "messages",
    "objects",
    "locations",
    "hpcs",
    "lpcs",
    "lcs",
    "gfx",
    "model",
    "punctuation",
    "separators",
    "init_loc",
    "no_objs_msg",
];

impl TryFrom<serde_json::Value> for Database {
    type Error = RuntimeError;

    /// Validates the document has every required key before trusting serde's
    /// structural deserialization, so a missing field reports its own name
    /// rather than a generic "missing field" message from deep inside serde.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let obj = value.as_object().ok_or_else(|| RuntimeError::SchemaViolation {
            reason: "database document must be a JSON object".to_string(),
        })?;
        for key in REQUIRED_FIELDS {
            if !obj.contains_key(*key) {
                return Err(RuntimeError::SchemaViolation {
                    reason: format!("missing field '{key}'"),
                });
            }
        }
        serde_json::from_value(value).map_err(|e| RuntimeError::SchemaViolation {
            reason: e.to_string(),
        })
    }
}

/// Splits a noun table into `(plain nouns, pronoun words)`, moving every
/// entry whose id is [`PRONOUN_NOUN_ID`] into the pronoun list.
fn split_pronouns(nouns: BTreeMap<String, u8>) -> (BTreeMap<String, u8>, Vec<String>) {
    let mut plain = BTreeMap::new();
    let mut pronouns = Vec::new();
    for (word, id) in nouns {
        if id == PRONOUN_NOUN_ID {
            pronouns.push(word);
        } else {
            plain.insert(word, id);
        }
    }
    (plain, pronouns)
}

/// Extracts the custom 8x8 bitmap font, if one was redefined.
///
/// The Spectrum `CHARS` system variable holds `font_addr - 256`; if the
/// resulting address is below [`CUSTOM_FONT_MIN_ADDR`] the ROM font is in
/// use and no glyphs are extracted.
fn extract_font(image: &MemoryImage) -> Vec<u8> {
    let font_addr = image.read16(CHARS_SYSVAR_ADDR).wrapping_add(256);
    if font_addr < CUSTOM_FONT_MIN_ADDR {
        return Vec::new();
    }
    let mut font = Vec::with_capacity(usize::from(CUSTOM_FONT_GLYPHS) * 8);
    for i in 0..CUSTOM_FONT_GLYPHS * 8 {
        font.push(image.read8(font_addr.wrapping_add(i)));
    }
    font
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_image() -> MemoryImage {
        let mut ram = vec![0u8; 0x10000];
        // punctuation magic
        let magic = b"\0 .,-!?:";
        for (i, &b) in magic.iter().enumerate() {
            ram[usize::from(PUNCTUATION_ADDR) + i] = b;
        }
        // tokens table (empty, base anywhere valid)
        let tokens_base = 0x6000u16;
        ram[usize::from(tables::TOKENS_ADDR)] = (tokens_base & 0xFF) as u8;
        ram[usize::from(tables::TOKENS_ADDR) + 1] = (tokens_base >> 8) as u8;
        // every other table pointer points at a zeroed address, which reads
        // as an immediate terminator byte (0) for every extractor
        let zero_table = 0x6100u16;
        for addr in [
            NOUNS_ADDR,
            ADVERBS_ADDR,
            tables::OBJECTS_ADDR,
            tables::ROOMS_ADDR,
            HPCS_ADDR,
            LCS_ADDR,
            LPCS_ADDR,
            tables::MESSAGES_ADDR,
            tables::GRAPHICS_ADDR,
        ] {
            ram[usize::from(addr)] = (zero_table & 0xFF) as u8;
            ram[usize::from(addr) + 1] = (zero_table >> 8) as u8;
        }
        ram[usize::from(tables::VERBS_ADDR)] = 0; // verbs read inline, id==0 terminator
        ram[usize::from(STARTROOM_ADDR)] = 1;
        ram[usize::from(STARTROOM_ADDR) + 1] = 0;
        MemoryImage::from_ram(ram)
    }

    #[test]
    fn test_decode_minimal_database() {
        let image = minimal_image();
        let db = Database::decode(&image).unwrap();
        assert_eq!(db.model, "SPECTRUM");
        assert_eq!(db.init_loc, 1);
        assert!(db.verbs.is_empty());
        assert_eq!(db.punctuation, b"\0 .,-!?:".to_vec());
        assert_eq!(db.separators, vec!["then", "and"]);
        assert_eq!(db.no_objs_msg, "Nothing");
        assert!(db.font.is_empty());
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut ram = vec![0u8; 0x10000];
        ram[usize::from(PUNCTUATION_ADDR)] = 0x20;
        let image = MemoryImage::from_ram(ram);
        assert!(matches!(
            Database::decode(&image),
            Err(DecodeError::BadMagic)
        ));
    }

    #[test]
    fn test_split_pronouns() {
        let mut nouns = BTreeMap::new();
        nouns.insert("LAMP".to_string(), 3u8);
        nouns.insert("IT".to_string(), PRONOUN_NOUN_ID);
        let (plain, pronouns) = split_pronouns(nouns);
        assert_eq!(plain.get("LAMP"), Some(&3));
        assert!(!plain.contains_key("IT"));
        assert_eq!(pronouns, vec!["IT".to_string()]);
    }

    #[test]
    fn test_try_from_missing_field() {
        let value = serde_json::json!({ "font": [] });
        let result = Database::try_from(value);
        assert!(matches!(result, Err(RuntimeError::SchemaViolation { .. })));
    }

    #[test]
    fn test_round_trip_through_json() {
        let image = minimal_image();
        let db = Database::decode(&image).unwrap();
        let json = serde_json::to_value(&db).unwrap();
        let reloaded = Database::try_from(json).unwrap();
        assert_eq!(reloaded, db);
    }
}
