//! Message table extraction.

use std::collections::BTreeMap;

use crate::error::DecodeError;
use crate::memory::MemoryImage;
use crate::text::decode_string;

use super::MESSAGES_ADDR;

/// Walks the messages table, decoding every `[id: u8][len: u8][bytes: len]` record
/// until `id == 0`.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedRecord`] if a record's declared length would read
/// past the addressable image, or a text-decoding error from malformed bytes.
pub fn extract_messages(image: &MemoryImage) -> Result<BTreeMap<u8, String>, DecodeError> {
    let mut result = BTreeMap::new();
    let mut addr = image.read16(MESSAGES_ADDR);

    loop {
        let id = image.read8(addr);
        if id == 0 {
            break;
        }
        let len = u16::from(image.read8(addr.wrapping_add(1)));
        let body_addr = addr.wrapping_add(2);
        let text = decode_string(image, body_addr, len)?;
        result.insert(id, text);
        addr = body_addr.wrapping_add(len);
    }

    Ok(result)
}
