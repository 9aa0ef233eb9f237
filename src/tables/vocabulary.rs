//! Vocabulary table extraction (verbs, nouns, adverbs).
//!
//! All three vocabulary kinds share one record layout — `[id: u8][token_ref:
//! u16]*` terminated by `id == 0` — differing only in where their base
//! address comes from: verbs live at a fixed inline address, while nouns and
//! adverbs are read through a header pointer.

use std::collections::BTreeMap;

use crate::error::DecodeError;
use crate::memory::MemoryImage;
use crate::tables::{TOKENS_ADDR, VERBS_ADDR};
use crate::text::{find_token, PUNCTUATION};

/// Decodes a vocabulary entry's packed token reference into a plain word.
///
/// The 16-bit value is laid out exactly like a compressed-string word
/// (`top:2, punct:3, value:11`), but vocabulary entries never carry a
/// trailing punctuation glyph — only the token bytes (case-mapped per `top`,
/// same rule as [`crate::text::decode_string`]) are emitted.
fn decode_vocab_word(image: &MemoryImage, word: u16) -> Result<String, DecodeError> {
    let tokens_base = image.read16(TOKENS_ADDR);
    let top = (word >> 14) & 0x3;
    let punct = ((word >> 11) & 0x7) as usize;

    if top == 3 {
        let glyph = PUNCTUATION[punct];
        let count = word & 0xFF;
        if glyph == 0 {
            return Ok(String::new());
        }
        return Ok(std::iter::repeat(glyph as char).take(count as usize).collect());
    }

    let token_ref = word & 0x7FF;
    let mut addr = find_token(image, tokens_base, token_ref);
    let mut bytes = Vec::new();
    let mut case_mode = top;
    loop {
        let raw = image.read8(addr);
        let ch = match case_mode {
            0 => {
                case_mode = 1;
                raw
            }
            1 => {
                if raw & 0x40 != 0 {
                    raw | 0x20
                } else {
                    raw
                }
            }
            _ => raw,
        };
        bytes.push(ch & 0x7F);
        addr = addr.wrapping_add(1);
        if raw & 0x80 != 0 {
            break;
        }
    }
    for &b in &bytes {
        if b > 0x7F {
            return Err(DecodeError::InvalidText { offset: addr, byte: b });
        }
    }
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Walks a `[id: u8][token_ref: u16]*` vocabulary table starting at `base`,
/// terminated by `id == 0`, returning a map from uppercase word to id.
///
/// Ids are not required to be unique across the three vocabulary kinds; this
/// extractor makes no distinction for the noun-specific pronoun id (255) —
/// callers that care (the nouns table) split those entries out themselves.
pub fn extract_word_table(image: &MemoryImage, base: u16) -> Result<BTreeMap<String, u8>, DecodeError> {
    let mut result = BTreeMap::new();
    let mut addr = base;
    loop {
        let id = image.read8(addr);
        if id == 0 {
            break;
        }
        let word = image.read16(addr.wrapping_add(1));
        let text = decode_vocab_word(image, word)?;
        result.insert(text, id);
        addr = addr.wrapping_add(3);
    }
    Ok(result)
}

/// Extracts the verbs table, read from its fixed inline address (no pointer
/// indirection, unlike nouns/adverbs).
pub fn extract_verbs(image: &MemoryImage) -> Result<BTreeMap<String, u8>, DecodeError> {
    extract_word_table(image, VERBS_ADDR)
}

/// Extracts a vocabulary table reached through a header pointer (nouns, adverbs).
pub fn extract_vocabulary_table(
    image: &MemoryImage,
    pointer_addr: u16,
) -> Result<BTreeMap<String, u8>, DecodeError> {
    let base = image.read16(pointer_addr);
    extract_word_table(image, base)
}
