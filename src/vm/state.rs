//! Runtime machine state for the condition VM.

use std::collections::{BTreeMap, VecDeque};

use crate::database::Database;

/// Reserved location id meaning "nowhere" (destroyed / not yet placed).
pub const NOWHERE_LOC: u16 = 0;
/// Reserved location id meaning "carried by the player".
pub const CARRIED_LOC: u16 = 255;

/// Number of counters in the fixed-size counter bank.
pub const NUM_COUNTERS: usize = 128;
/// Number of flags in the fixed-size flag bank.
pub const NUM_FLAGS: usize = 256;

/// Flag index: room description should be (re)printed.
pub const FLAG_ROOM_DESC: usize = 0;
/// Flag index: the room-lighting flag.
pub const FLAG_LIGHTING: usize = 1;
/// Flag index: the lamp (portable light source) flag.
pub const FLAG_LAMP: usize = 2;
/// Flag index: whether the score is displayed.
pub const FLAG_SCORE_DIS: usize = 3;

/// Counter index holding the turn counter's high byte.
pub const TURN_CNT_H: usize = 127;
/// Counter index holding the turn counter's low byte.
pub const TURN_CNT_L: usize = 126;

/// Standard, fixed-meaning message ids the VM and driver print by number.
pub mod messages {
    /// "What now?" turn prompt.
    pub const ASK: u8 = 240;
    /// Printed when no IF matched and a verb was parsed ("can't do that").
    pub const CANTDO: u8 = 241;
    /// Printed when no IF matched and no verb was parsed ("don't understand").
    pub const NOTUNDERSTAND: u8 = 242;
    /// Prompt message id for "are you sure?" (unused directly by the core VM).
    pub const RESTART: u8 = 243;
    /// `QUIT`'s confirmation prompt.
    pub const YOUSURE: u8 = 244;
    /// Reserved for front-ends ("already have").
    pub const ALREADYHAVE: u8 = 245;
    /// `DROP` when the object isn't carried.
    pub const DONTHAVE: u8 = 246;
    /// `GET` when the object isn't present in the room.
    pub const CANTSEE: u8 = 247;
    /// `GET` when carrying it would exceed `max_weight`.
    pub const TOOMUCH: u8 = 248;
    /// Reserved for front-ends ("your score").
    pub const YOURSCORE: u8 = 249;
    /// Reserved for front-ends ("you took").
    pub const YOUTOOK: u8 = 250;
    /// Printed by `__display_room`-equivalent logic when the room is dark.
    pub const ITSDARK: u8 = 251;
    /// Reserved for front-ends ("can't find").
    pub const CANTFIND: u8 = 252;
    /// Prefix printed before listing objects present in a room.
    pub const OBJHERE: u8 = 253;
    /// `OKAY`'s message.
    pub const OKAY: u8 = 254;
    /// Reserved for front-ends ("turns").
    pub const TURNS: u8 = 255;
}

/// Tunable knobs for a run, settable from CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Output line width, in columns, used by the I/O façade's word wrap.
    pub display_width: usize,
    /// Path the `SAVE`/`LOAD` opcodes persist machine state to.
    pub save_path: std::path::PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            display_width: 64,
            save_path: std::path::PathBuf::from("gac-save.json"),
        }
    }
}

/// The interpreter's mutable world state: flags, counters, object locations,
/// player location, and parser slots. Owned exclusively by the interpreter;
/// the decoded [`Database`] is never mutated.
#[derive(Debug, Clone)]
pub struct MachineState {
    /// `counters[0..128]`, saturating on `DECR`/`INCR`.
    pub counters: [u8; NUM_COUNTERS],
    /// `flags[0..256]`.
    pub flags: [bool; NUM_FLAGS],
    /// The room the player currently occupies.
    pub current_loc: u16,
    /// Current parser verb slot.
    pub verb: u16,
    /// Current parser adverb slot.
    pub adverb: u16,
    /// Current parser noun1 slot.
    pub noun1: u16,
    /// Current parser noun2 slot (never filled by ordinary parse flow; see [`crate::parser`]).
    pub noun2: u16,
    /// The most recently resolved noun1, used to fill a pronoun reference.
    pub old_noun: u16,
    /// Maximum total carry weight.
    pub max_weight: u8,
    /// The condition VM's evaluation stack, reset at script entry and at every `BlockEnd`.
    pub stack: Vec<u16>,
    /// Post-split input fragments awaiting parse.
    pub pending_statements: VecDeque<String>,
    /// Current location of every object, keyed by object id.
    pub object_locations: BTreeMap<u8, u16>,
    /// Set once `QUIT` (affirmed) or `EXIT` fires; ends the turn loop.
    pub finished: bool,
    /// Set when the player has just moved into a new room (triggers a room description).
    pub new_room: bool,
}

impl MachineState {
    /// Builds the initial state for `start_adventure`: `current_loc = database.init_loc`,
    /// the lighting flag set, objects placed at their `initial_loc`, counters and flags
    /// otherwise zeroed, stack empty.
    #[must_use]
    pub fn start(database: &Database) -> Self {
        let mut flags = [false; NUM_FLAGS];
        flags[FLAG_LIGHTING] = true;

        let object_locations = database
            .objects
            .iter()
            .map(|o| (o.id, o.initial_loc))
            .collect();

        MachineState {
            counters: [0; NUM_COUNTERS],
            flags,
            current_loc: database.init_loc,
            verb: 0,
            adverb: 0,
            noun1: 0,
            noun2: 0,
            old_noun: 0,
            max_weight: 255,
            stack: Vec::new(),
            pending_statements: VecDeque::new(),
            object_locations,
            finished: false,
            new_room: true,
        }
    }

    /// Pushes the 16-bit turn counter, combining the low/high counter bytes.
    #[must_use]
    pub fn turn_counter(&self) -> u16 {
        u16::from(self.counters[TURN_CNT_H]) * 256 + u16::from(self.counters[TURN_CNT_L])
    }

    /// Advances the turn counter by one, saturating the low byte into the high
    /// byte, which itself saturates at 255 (matching `counters[126]/[127]`'s
    /// general saturating-counter behavior).
    pub fn advance_turn(&mut self) {
        if self.counters[TURN_CNT_L] == 255 {
            if self.counters[TURN_CNT_H] < 255 {
                self.counters[TURN_CNT_H] += 1;
                self.counters[TURN_CNT_L] = 0;
            }
        } else {
            self.counters[TURN_CNT_L] += 1;
        }
    }

    /// Total weight of all carried objects.
    #[must_use]
    pub fn carried_weight(&self, database: &Database) -> u16 {
        database
            .objects
            .iter()
            .filter(|o| self.object_locations.get(&o.id) == Some(&CARRIED_LOC))
            .map(|o| u16::from(o.weight))
            .sum()
    }

    /// Whether the current room is lit (either the room-lighting flag or the lamp flag is set).
    #[must_use]
    pub fn room_is_lit(&self) -> bool {
        self.flags[FLAG_LIGHTING] || self.flags[FLAG_LAMP]
    }
}
