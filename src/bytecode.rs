//! Condition-script bytecode disassembler.
//!
//! Decodes a condition script into a flat list of [`Op`] values, stopping at
//! `Op::End` (opcode `0x00`). Every decoded instruction is represented as a
//! single sum type rather than a tagged tuple: `Op::Push` carries the only
//! opcode-level immediate, the PUSH value; every other opcode is a unit
//! variant whose operands live on the VM stack at execution time.

use crate::error::DecodeError;
use crate::memory::MemoryImage;

/// One decoded condition-script instruction.
///
/// Variant names mirror the mnemonics in the external opcode table, except
/// `0x00` (table name "END-of-script") which is `Op::End`, and `0x3F` (table
/// name "END", the `IF`/`END` block closer) which is `Op::BlockEnd` to avoid
/// a name clash with the two distinct operations the source calls "END".
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Op {
    /// Pushes a 16-bit immediate onto the stack.
    Push(u16),
    /// Terminates the condition script (opcode `0x00`).
    End,
    /// Pops two, pushes their bitwise AND.
    And,
    /// Pops two, pushes their bitwise OR.
    Or,
    /// Pops one, pushes its logical negation (0/1).
    Not,
    /// Pops two, pushes their bitwise XOR.
    Xor,
    /// Waits for a keypress or a frame-count timeout (pops the frame count).
    Hold,
    /// Picks up an object, subject to the weight budget (pops object id).
    Get,
    /// Drops a carried object (pops object id).
    Drop,
    /// Swaps the locations of two objects (pops two object ids).
    Swap,
    /// Relocates an object to a room. Pops the room first (it is on top of
    /// stack), then the object id.
    To,
    /// Prints an object's name, followed by a newline (pops object id).
    Obj,
    /// Sets a flag (pops flag index).
    Set,
    /// Clears a flag (pops flag index).
    Reset,
    /// Pushes whether a flag is set (pops flag index).
    SetQ,
    /// Pushes whether a flag is clear (pops flag index).
    ResetQ,
    /// Sets a counter to a value (pops value, then counter index).
    Cset,
    /// Pushes a counter's value (pops counter index).
    Ctr,
    /// Decrements a counter, saturating at 0 (pops counter index).
    Decr,
    /// Increments a counter, saturating at 255 (pops counter index).
    Incr,
    /// Pushes whether two values are equal (pops two).
    EquQ,
    /// Prints a room's description, subject to lighting (pops room id).
    Desc,
    /// Prints the current room's description, subject to lighting.
    Look,
    /// Prints a message (pops message id).
    Mess,
    /// Prints a decimal value (pops value).
    Prin,
    /// Pushes a random integer in `[0, n]` inclusive (pops `n`).
    Rand,
    /// Pops two, pushes whether `s1 < s0`.
    Lt,
    /// Pops two, pushes whether `s1 > s0`.
    Gt,
    /// Pops two, pushes whether `s1 == s0`.
    Eq,
    /// Serializes machine state to the save slot.
    Save,
    /// Restores machine state from the save slot.
    Load,
    /// Pushes whether the player is in a given room (pops room id).
    Here,
    /// Pushes whether an object is carried (pops object id).
    Carr,
    /// Pushes whether an object is available (carried or in the current room; pops object id).
    Avail,
    /// Pops two, pushes their sum.
    Add,
    /// Pops two, pushes their difference.
    Sub,
    /// Pushes the 16-bit turn counter.
    Turn,
    /// Pushes whether the player currently occupies a room (pops room id; no object involved).
    At,
    /// Named in the opcode table but never implemented by the reference interpreter;
    /// the VM treats it like any other unrecognized opcode (logs and continues).
    Bring,
    /// Named in the opcode table but never implemented by the reference interpreter;
    /// the VM treats it like any other unrecognized opcode (logs and continues).
    Find,
    /// Named in the opcode table but never implemented by the reference interpreter;
    /// the VM treats it like any other unrecognized opcode (logs and continues).
    In,
    /// No-op.
    Nop,
    /// Prints message 254, signals `done`.
    Okay,
    /// Signals `done` without output.
    Wait,
    /// Prompts with message 244 and terminates the game on an affirmative answer.
    Quit,
    /// Terminates the game unconditionally.
    Exit,
    /// Pushes the current room id.
    Room,
    /// Pushes the current noun1 id.
    Noun,
    /// Pushes the current verb id.
    Verb,
    /// Pushes the current adverb id.
    Adve,
    /// Unconditionally jumps within the script (pops a script offset).
    Goto,
    /// Pushes the current noun1 id (pronoun-resolved).
    No1,
    /// Pushes the current noun2 id.
    No2,
    /// Pushes the current verb id (despite the mnemonic, not tied to a noun).
    Vbno,
    /// Prints the names of every object located in a room (pops room id).
    List,
    /// Switches to picture display mode (stubbed no-op; no graphical front-end in core).
    Pict,
    /// Switches to text-only display mode (stubbed no-op).
    Text,
    /// Pushes whether two rooms are connected (pops two room ids).
    Conn,
    /// Pushes an object's weight (pops object id).
    Weig,
    /// Pushes the reserved "carried" location constant (255), unconditionally. No pop.
    With,
    /// Sets the maximum carry weight budget (pops the new value).
    Stren,
    /// Prints a newline.
    Lf,
    /// Pops a value; zero enters skip mode (all opcodes but `BlockEnd` ignored).
    If,
    /// Closes an `IF` block: clears skip mode and empties the stack.
    BlockEnd,
}

fn opcode_from_masked(byte: u8) -> Op {
    match byte & 0x3F {
        0x00 => Op::End,
        0x01 => Op::And,
        0x02 => Op::Or,
        0x03 => Op::Not,
        0x04 => Op::Xor,
        0x05 => Op::Hold,
        0x06 => Op::Get,
        0x07 => Op::Drop,
        0x08 => Op::Swap,
        0x09 => Op::To,
        0x0A => Op::Obj,
        0x0B => Op::Set,
        0x0C => Op::Reset,
        0x0D => Op::SetQ,
        0x0E => Op::ResetQ,
        0x0F => Op::Cset,
        0x10 => Op::Ctr,
        0x11 => Op::Decr,
        0x12 => Op::Incr,
        0x13 => Op::EquQ,
        0x14 => Op::Desc,
        0x15 => Op::Look,
        0x16 => Op::Mess,
        0x17 => Op::Prin,
        0x18 => Op::Rand,
        0x19 => Op::Lt,
        0x1A => Op::Gt,
        0x1B => Op::Eq,
        0x1C => Op::Save,
        0x1D => Op::Load,
        0x1E => Op::Here,
        0x1F => Op::Carr,
        0x20 => Op::Avail,
        0x21 => Op::Add,
        0x22 => Op::Sub,
        0x23 => Op::Turn,
        0x24 => Op::At,
        0x25 => Op::Bring,
        0x26 => Op::Find,
        0x27 => Op::In,
        0x28 | 0x29 => Op::Nop,
        0x2A => Op::Okay,
        0x2B => Op::Wait,
        0x2C => Op::Quit,
        0x2D => Op::Exit,
        0x2E => Op::Room,
        0x2F => Op::Noun,
        0x30 => Op::Verb,
        0x31 => Op::Adve,
        0x32 => Op::Goto,
        0x33 => Op::No1,
        0x34 => Op::No2,
        0x35 => Op::Vbno,
        0x36 => Op::List,
        0x37 => Op::Pict,
        0x38 => Op::Text,
        0x39 => Op::Conn,
        0x3A => Op::Weig,
        0x3B => Op::With,
        0x3C => Op::Stren,
        0x3D => Op::Lf,
        0x3E => Op::If,
        0x3F => Op::BlockEnd,
        _ => unreachable!("masking with 0x3F yields a value in 0..=0x3F"),
    }
}

/// Disassembles a condition script starting at `addr`, consuming bytes until
/// `Op::End` (opcode `0x00`) is produced.
///
/// Byte-level grammar: a byte with its high bit set is a `PUSH` immediate,
/// formed from this byte's low 7 bits and the next byte (`((byte & 0x7F) <<
/// 8) | next`); otherwise the byte is masked with `0x3F` and looked up in the
/// opcode table.
#[must_use]
pub fn disassemble(image: &MemoryImage, addr: u16) -> Vec<Op> {
    let mut ops = Vec::new();
    let mut pc = addr;
    loop {
        let byte = image.read8(pc);
        if byte & 0x80 != 0 {
            let next = image.read8(pc.wrapping_add(1));
            let value = (u16::from(byte & 0x7F) << 8) | u16::from(next);
            ops.push(Op::Push(value));
            pc = pc.wrapping_add(2);
        } else {
            let op = opcode_from_masked(byte);
            pc = pc.wrapping_add(1);
            let is_end = op == Op::End;
            ops.push(op);
            if is_end {
                break;
            }
        }
    }
    ops
}

/// Walks the LC table, decoding a `[room: u16][script...]*` sequence into a
/// mapping from room id to its disassembled local condition script,
/// terminated by `room == 0`.
///
/// # Errors
///
/// This extractor itself cannot fail (disassembly never errors), but returns
/// a `Result` to match the other table extractors' signatures and leave room
/// for future validation.
pub fn extract_lcs(
    image: &MemoryImage,
    base: u16,
) -> Result<std::collections::BTreeMap<u16, Vec<Op>>, DecodeError> {
    let mut result = std::collections::BTreeMap::new();
    let mut addr = base;
    loop {
        let room = image.read16(addr);
        if room == 0 {
            break;
        }
        let script_addr = addr.wrapping_add(2);
        let ops = disassemble(image, script_addr);
        let mut end_addr = script_addr;
        for op in &ops {
            end_addr = end_addr.wrapping_add(if matches!(op, Op::Push(_)) { 2 } else { 1 });
        }
        result.insert(room, ops);
        addr = end_addr;
    }
    Ok(result)
}
