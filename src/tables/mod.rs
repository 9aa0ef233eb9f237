//! Table extractors and the fixed header pointer addresses.
//!
//! Each submodule walks one table out of the memory image until the
//! documented terminator, per spec §4.3 and §6.

pub mod graphics;
pub mod messages;
pub mod objects;
pub mod rooms;
pub mod vocabulary;

pub use graphics::{extract_graphics, GraphicInstruction};
pub use messages::extract_messages;
pub use objects::{extract_objects, Object};
pub use rooms::{extract_rooms, Exit, Room};
pub use vocabulary::{extract_verbs, extract_vocabulary_table};

/// Address of the 8-byte punctuation glyph table (doubles as the database magic).
pub const PUNCTUATION_ADDR: u16 = 0xA1E5;
/// Pointer to the nouns vocabulary table.
pub const NOUNS_ADDR: u16 = 0xA51F;
/// Pointer to the adverbs vocabulary table.
pub const ADVERBS_ADDR: u16 = 0xA521;
/// Pointer to the objects table.
pub const OBJECTS_ADDR: u16 = 0xA523;
/// Pointer to the rooms table.
pub const ROOMS_ADDR: u16 = 0xA525;
/// Pointer to the high-priority condition script.
pub const HPCS_ADDR: u16 = 0xA527;
/// Pointer to the local condition script table (keyed by room id).
pub const LCS_ADDR: u16 = 0xA529;
/// Pointer to the low-priority condition script.
pub const LPCS_ADDR: u16 = 0xA52B;
/// Pointer to the messages table.
pub const MESSAGES_ADDR: u16 = 0xA52D;
/// Pointer to the graphics table.
pub const GRAPHICS_ADDR: u16 = 0xA52F;
/// Pointer to the token table.
pub const TOKENS_ADDR: u16 = 0xA531;
/// Address of the initial room id.
pub const STARTROOM_ADDR: u16 = 0xA54D;
/// Inline (non-pointer) address of the verbs vocabulary table.
pub const VERBS_ADDR: u16 = 0xA54F;

/// Reserved location id meaning "nowhere" (destroyed/not yet placed).
pub const NOWHERE_LOC: u16 = 0;
/// Reserved location id meaning "carried by the player".
pub const CARRIED_LOC: u16 = 255;

/// Reserved noun id marking a vocabulary entry as a pronoun rather than a plain noun.
pub const PRONOUN_NOUN_ID: u8 = 255;

/// Address of the Spectrum `CHARS` system variable, pointing just past the
/// active character set minus 256 (per the ROM's font-pointer convention).
pub const CHARS_SYSVAR_ADDR: u16 = 23606;
/// Below this pointer value the ROM font is in use and no custom glyphs were
/// redefined; see spec §3 (font extraction).
pub const CUSTOM_FONT_MIN_ADDR: u16 = 0x5B00;
