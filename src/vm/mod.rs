//! The condition-script stack machine.
//!
//! [`run_script`] executes a disassembled [`crate::bytecode::Op`] list against
//! a [`MachineState`], driving the `IF`/`BlockEnd` skip-mode state machine and
//! every opcode's side effects. Three tiers of script share this one
//! executor, differing only in their `exit_if_done` flag (see the per-turn
//! driver in [`crate::driver`]):
//!
//! - HPC (`exit_if_done = false`): runs every opcode in the script even after
//!   `OKAY`/`WAIT`/`QUIT`/`EXIT` marks the script "done" — only those
//!   opcodes' own effects take hold early.
//! - LC / LPC (`exit_if_done = true`): execution stops the instant the script
//!   is marked done.

pub mod state;

pub use state::{messages, MachineState, RunConfig};

use crate::bytecode::Op;
use crate::database::Database;
use crate::io::IoFacade;

/// What happened during one [`run_script`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptOutcome {
    /// Whether any `IF` in this run popped a non-zero value (the script "matched").
    pub matched: bool,
    /// Whether `OKAY`, `WAIT`, `QUIT` (affirmed or not), or `EXIT` ran.
    pub done: bool,
}

/// Executes one condition script to completion (or early termination).
///
/// The evaluation stack is reset at entry, matching the reference
/// interpreter resetting it at the top of every `__perfom_conditions` call.
///
/// `rng` supplies `RAND`'s draw; pass a closure wrapping a seeded generator
/// for deterministic tests, or one backed by [`rand::thread_rng`] in
/// production.
pub fn run_script(
    ops: &[Op],
    state: &mut MachineState,
    database: &Database,
    config: &RunConfig,
    io: &mut dyn IoFacade,
    rng: &mut dyn FnMut(u16) -> u16,
    exit_if_done: bool,
) -> ScriptOutcome {
    state.stack.clear();
    let mut skip = false;
    let mut done = false;
    let mut matched = false;
    let mut pos = 0;

    while pos < ops.len() && !(done && exit_if_done) {
        let op = ops[pos];
        pos += 1;

        if op == Op::End {
            break;
        }
        if skip && op != Op::BlockEnd {
            continue;
        }

        match op {
            Op::Push(value) => state.stack.push(value),
            Op::End => unreachable!("handled above"),
            Op::And => {
                let (s0, s1) = pop2(state);
                state.stack.push(s0 & s1);
            }
            Op::Or => {
                let (s0, s1) = pop2(state);
                state.stack.push(s0 | s1);
            }
            Op::Xor => {
                let (s0, s1) = pop2(state);
                state.stack.push(s0 ^ s1);
            }
            Op::Not => {
                let s0 = pop(state);
                state.stack.push(u16::from(s0 == 0));
            }
            Op::Hold => {
                let frames = pop(state);
                io.wait_key_or_timeout(frames);
            }
            Op::Get => exec_get(state, database, io),
            Op::Drop => exec_drop(state, database, io),
            Op::Swap => exec_swap(state, database),
            Op::To => exec_to(state, database),
            Op::Obj => exec_obj(state, database, io),
            Op::Set => set_flag(state, true),
            Op::Reset => set_flag(state, false),
            Op::SetQ => query_flag(state, false),
            Op::ResetQ => query_flag(state, true),
            Op::Cset => exec_cset(state),
            Op::Ctr => exec_ctr(state),
            Op::Incr => saturating_adjust(state, 1),
            Op::Decr => saturating_adjust(state, -1),
            Op::EquQ => exec_equ(state),
            Op::Desc => exec_desc(state, database, io),
            Op::Look => display_room(state.current_loc, state, database, io),
            Op::Mess => exec_mess(state, database, io),
            Op::Prin => {
                let value = pop(state);
                io.print(&value.to_string());
            }
            Op::Rand => {
                let n = pop(state);
                state.stack.push(rng(n));
            }
            Op::Lt => {
                let (s0, s1) = pop2(state);
                state.stack.push(u16::from(s1 < s0));
            }
            Op::Gt => {
                let (s0, s1) = pop2(state);
                state.stack.push(u16::from(s1 > s0));
            }
            Op::Eq => {
                let (s0, s1) = pop2(state);
                state.stack.push(u16::from(s1 == s0));
            }
            Op::Save => exec_save(state, config),
            Op::Load => exec_load(state, config),
            Op::Here => exec_object_query(state, database, |loc, cur, _| loc == cur),
            Op::Carr => exec_object_query(state, database, |loc, _, carried| loc == carried),
            Op::Avail => {
                exec_object_query(state, database, |loc, cur, carried| loc == cur || loc == carried);
            }
            Op::Add => {
                let (s0, s1) = pop2(state);
                state.stack.push(s1.wrapping_add(s0));
            }
            Op::Sub => {
                let (s0, s1) = pop2(state);
                state.stack.push(s1.wrapping_sub(s0));
            }
            Op::Turn => state.stack.push(state.turn_counter()),
            Op::At => {
                let r = pop(state);
                state.stack.push(u16::from(r == state.current_loc));
            }
            Op::Bring | Op::Find | Op::In => {
                log::warn!("unimplemented opcode {op:?} reached (never implemented by the source toolkit)");
            }
            Op::Nop => {}
            Op::Okay => {
                print_message(database, io, messages::OKAY, true);
                done = true;
            }
            Op::Wait => done = true,
            Op::Quit => {
                io.print(&database_message(database, messages::YOUSURE));
                let answer = io.input();
                let answer = answer.to_uppercase();
                if matches!(answer.as_str(), "YES" | "Y" | "SI" | "S") {
                    state.finished = true;
                }
            }
            Op::Exit => state.finished = true,
            Op::Room => state.stack.push(state.current_loc),
            Op::Noun => {
                let r = pop(state);
                state.stack.push(u16::from(r == state.noun1 || r == state.noun2));
            }
            Op::Verb => {
                let r = pop(state);
                state.stack.push(u16::from(r == state.verb));
            }
            Op::Adve => {
                let r = pop(state);
                state.stack.push(u16::from(r == state.adverb));
            }
            Op::Goto => {
                let r = pop(state);
                state.current_loc = r;
                if database.rooms.contains_key(&r) {
                    display_room(state.current_loc, state, database, io);
                }
            }
            Op::No1 => state.stack.push(state.noun1),
            Op::No2 => state.stack.push(state.noun2),
            Op::Vbno => state.stack.push(state.verb),
            Op::List => exec_list(state, database, io),
            Op::Pict | Op::Text => {}
            Op::Conn => exec_conn(state, database),
            Op::Weig => exec_weig(state, database),
            Op::With => state.stack.push(state::CARRIED_LOC),
            Op::Stren => {
                let value = pop(state);
                state.max_weight = value.min(u16::from(u8::MAX)) as u8;
            }
            Op::Lf => io.print("\n"),
            Op::If => {
                let s0 = pop(state);
                if s0 == 0 {
                    skip = true;
                } else {
                    matched = true;
                    skip = false;
                }
            }
            Op::BlockEnd => {
                skip = false;
                state.stack.clear();
            }
        }
    }

    ScriptOutcome { matched, done }
}

fn pop(state: &mut MachineState) -> u16 {
    state.stack.pop().unwrap_or_else(|| {
        log::warn!("condition script popped an empty stack");
        0
    })
}

/// Pops two values, `(s0, s1)` in pop order (`s0` popped first, i.e. it was on top).
fn pop2(state: &mut MachineState) -> (u16, u16) {
    let s0 = pop(state);
    let s1 = pop(state);
    (s0, s1)
}

fn set_flag(state: &mut MachineState, value: bool) {
    let f = usize::from(pop(state));
    if f < state::NUM_FLAGS {
        state.flags[f] = value;
    }
}

fn query_flag(state: &mut MachineState, invert: bool) {
    let f = usize::from(pop(state));
    let result = if f < state::NUM_FLAGS {
        state.flags[f] != invert
    } else {
        invert
    };
    state.stack.push(u16::from(result));
}

fn exec_cset(state: &mut MachineState) {
    let (index, value) = pop2(state);
    let index = usize::from(index);
    if index < state::NUM_COUNTERS {
        state.counters[index] = (value & 0xFF) as u8;
    }
}

fn exec_ctr(state: &mut MachineState) {
    let index = usize::from(pop(state));
    let value = if index < state::NUM_COUNTERS {
        u16::from(state.counters[index])
    } else {
        0
    };
    state.stack.push(value);
}

fn saturating_adjust(state: &mut MachineState, delta: i16) {
    let index = usize::from(pop(state));
    if index < state::NUM_COUNTERS {
        let current = state.counters[index];
        state.counters[index] = if delta > 0 {
            current.saturating_add(1)
        } else {
            current.saturating_sub(1)
        };
    }
}

fn exec_equ(state: &mut MachineState) {
    let (index, compare) = pop2(state);
    let index = usize::from(index);
    let result = index < state::NUM_COUNTERS && u16::from(state.counters[index]) == compare;
    state.stack.push(u16::from(result));
}

fn exec_desc(state: &mut MachineState, database: &Database, io: &mut dyn IoFacade) {
    let room = pop(state);
    if database.rooms.contains_key(&room) {
        display_room(room, state, database, io);
    }
}

fn exec_mess(state: &mut MachineState, database: &Database, io: &mut dyn IoFacade) {
    let id = pop(state);
    if let Ok(id) = u8::try_from(id) {
        if let Some(text) = database.messages.get(&id) {
            io.print(text);
        }
    }
}

/// Looks up a message by its fixed id, or an empty string if undefined.
pub(crate) fn database_message(database: &Database, id: u8) -> String {
    database.messages.get(&id).cloned().unwrap_or_default()
}

/// Prints a fixed-id message, optionally appending a newline.
pub(crate) fn print_message(database: &Database, io: &mut dyn IoFacade, id: u8, trailing_newline: bool) {
    let mut text = database_message(database, id);
    if trailing_newline {
        text.push('\n');
    }
    io.print(&text);
}

/// Prints a room's description (subject to lighting) and, if lit, the
/// comma-joined names of every object currently in it.
pub(crate) fn display_room(room: u16, state: &MachineState, database: &Database, io: &mut dyn IoFacade) {
    if !state.room_is_lit() {
        io.print(&database_message(database, messages::ITSDARK));
        return;
    }
    if let Some(r) = database.rooms.get(&room) {
        io.print(&r.desc);
    }
    let names: Vec<&str> = database
        .objects
        .iter()
        .filter(|o| state.object_locations.get(&o.id) == Some(&room))
        .map(|o| o.name.as_str())
        .collect();
    if !names.is_empty() {
        let mut line = database_message(database, messages::OBJHERE);
        line.push_str(&names.join(","));
        io.print(&line);
    }
}

fn find_object<'a>(database: &'a Database, id: u8) -> Option<&'a crate::tables::Object> {
    database.objects.iter().find(|o| o.id == id)
}

fn exec_get(state: &mut MachineState, database: &Database, io: &mut dyn IoFacade) {
    let id = pop(state);
    let Ok(id) = u8::try_from(id) else { return };
    let Some(obj) = find_object(database, id) else { return };
    if state.object_locations.get(&id) != Some(&state.current_loc) {
        print_message(database, io, messages::CANTSEE, true);
        return;
    }
    let carried = state.carried_weight(database);
    if carried + u16::from(obj.weight) > u16::from(state.max_weight) {
        print_message(database, io, messages::TOOMUCH, true);
    } else {
        state.object_locations.insert(id, state::CARRIED_LOC);
    }
}

fn exec_drop(state: &mut MachineState, database: &Database, io: &mut dyn IoFacade) {
    let id = pop(state);
    let Ok(id) = u8::try_from(id) else { return };
    if find_object(database, id).is_none() {
        return;
    }
    if state.object_locations.get(&id) == Some(&state::CARRIED_LOC) {
        let current = state.current_loc;
        state.object_locations.insert(id, current);
    } else {
        print_message(database, io, messages::DONTHAVE, true);
    }
}

fn exec_swap(state: &mut MachineState, database: &Database) {
    let (s0, s1) = pop2(state);
    let (Ok(id0), Ok(id1)) = (u8::try_from(s0), u8::try_from(s1)) else { return };
    if find_object(database, id0).is_none() || find_object(database, id1).is_none() {
        return;
    }
    let loc0 = state.object_locations.get(&id0).copied().unwrap_or(state::NOWHERE_LOC);
    let loc1 = state.object_locations.get(&id1).copied().unwrap_or(state::NOWHERE_LOC);
    state.object_locations.insert(id0, loc1);
    state.object_locations.insert(id1, loc0);
}

fn exec_to(state: &mut MachineState, database: &Database) {
    let room = pop(state);
    let obj = pop(state);
    let Ok(id) = u8::try_from(obj) else { return };
    if find_object(database, id).is_some() {
        state.object_locations.insert(id, room);
    }
}

fn exec_obj(state: &mut MachineState, database: &Database, io: &mut dyn IoFacade) {
    let id = pop(state);
    let Ok(id) = u8::try_from(id) else { return };
    if let Some(obj) = find_object(database, id) {
        io.print(&obj.name);
        io.print("\n");
    }
}

fn exec_object_query(
    state: &mut MachineState,
    database: &Database,
    predicate: impl Fn(u16, u16, u16) -> bool,
) {
    let id = pop(state);
    let result = u8::try_from(id)
        .ok()
        .and_then(|id| state.object_locations.get(&id))
        .is_some_and(|&loc| predicate(loc, state.current_loc, state::CARRIED_LOC));
    state.stack.push(u16::from(result));
}

fn exec_list(state: &mut MachineState, database: &Database, io: &mut dyn IoFacade) {
    let room = pop(state);
    for obj in &database.objects {
        if state.object_locations.get(&obj.id) == Some(&room) {
            io.print(&obj.name);
            io.print("\n");
        }
    }
}

fn exec_conn(state: &mut MachineState, database: &Database) {
    let dir = pop(state);
    let Ok(dir) = u8::try_from(dir) else {
        state.stack.push(0);
        return;
    };
    let dest = database
        .rooms
        .get(&state.current_loc)
        .and_then(|room| room.exits.iter().find(|e| e.dir == dir))
        .map_or(0, |e| e.dest);
    state.stack.push(dest);
}

fn exec_weig(state: &mut MachineState, database: &Database) {
    let id = pop(state);
    let weight = u8::try_from(id)
        .ok()
        .and_then(|id| find_object(database, id))
        .map_or(0, |o| u16::from(o.weight));
    state.stack.push(weight);
}

/// The persisted-state shape `SAVE`/`LOAD` round-trip through `RunConfig::save_path`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SaveSlot {
    counters: [u8; state::NUM_COUNTERS],
    flags: Vec<bool>,
    current_loc: u16,
    max_weight: u8,
    object_locations: std::collections::BTreeMap<u8, u16>,
}

fn exec_save(state: &MachineState, config: &RunConfig) {
    let slot = SaveSlot {
        counters: state.counters,
        flags: state.flags.to_vec(),
        current_loc: state.current_loc,
        max_weight: state.max_weight,
        object_locations: state.object_locations.clone(),
    };
    match serde_json::to_vec_pretty(&slot) {
        Ok(bytes) => {
            if let Err(e) = std::fs::write(&config.save_path, bytes) {
                log::warn!("SAVE failed to write {}: {e}", config.save_path.display());
            }
        }
        Err(e) => log::warn!("SAVE failed to serialize state: {e}"),
    }
}

fn exec_load(state: &mut MachineState, config: &RunConfig) {
    let bytes = match std::fs::read(&config.save_path) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("LOAD failed to read {}: {e}", config.save_path.display());
            return;
        }
    };
    match serde_json::from_slice::<SaveSlot>(&bytes) {
        Ok(slot) => {
            state.counters = slot.counters;
            for (i, v) in slot.flags.into_iter().enumerate().take(state::NUM_FLAGS) {
                state.flags[i] = v;
            }
            state.current_loc = slot.current_loc;
            state.max_weight = slot.max_weight;
            state.object_locations = slot.object_locations;
        }
        Err(e) => log::warn!("LOAD failed to deserialize state: {e}"),
    }
}
