//! The per-turn orchestration loop.
//!
//! [`start_adventure`] builds the initial [`MachineState`] and configures the
//! I/O façade; [`run_turn`] executes exactly one pass of the turn sequence
//! (`run_adventure`'s loop body in the source toolkit), returning whether the
//! game has finished. [`run_until_finished`] drives turns to completion for
//! callers (like the CLI) that don't need to observe individual turns.

use crate::database::Database;
use crate::error::RuntimeError;
use crate::io::IoFacade;
use crate::parser::{parse_statement, split_statements};
use crate::vm::{self, messages, run_script, MachineState, RunConfig};

/// Validates the database and builds the interpreter's initial state,
/// configuring `io`'s width and word-wrap separators (the decoded
/// punctuation glyphs — not the statement separators, which only ever
/// matter to [`split_statements`]).
///
/// # Errors
///
/// Returns [`RuntimeError::BadInitialLocation`] if `database.init_loc == 0`.
pub fn start_adventure(
    database: &Database,
    config: &RunConfig,
    io: &mut dyn IoFacade,
) -> Result<MachineState, RuntimeError> {
    if database.init_loc == 0 {
        return Err(RuntimeError::BadInitialLocation);
    }
    io.set_width(config.display_width);
    let punctuation: Vec<String> = database
        .punctuation
        .iter()
        .map(|&b| (b as char).to_string())
        .collect();
    io.set_separators(punctuation);
    Ok(MachineState::start(database))
}

/// Runs one full turn: HPC, the input prompt (when no statement is
/// pending), statement processing and movement, then LC and LPC — in that
/// order, each step able to short-circuit the rest, exactly mirroring
/// `run_adventure`'s loop body.
///
/// Returns `true` once the game has finished (`state.finished`).
pub fn run_turn(
    state: &mut MachineState,
    database: &Database,
    config: &RunConfig,
    io: &mut dyn IoFacade,
    rng: &mut dyn FnMut(u16) -> u16,
) -> bool {
    if state.new_room {
        vm::display_room(state.current_loc, state, database, io);
        state.new_room = false;
    }

    state.advance_turn();

    run_script(&database.hpcs, state, database, config, io, rng, false);
    if state.finished {
        return true;
    }

    if !state.new_room && state.pending_statements.is_empty() {
        prompt_for_statements(state, database, io);
    }

    process_pending_statements(state, database);

    if state.new_room || state.finished {
        return state.finished;
    }

    let lc_outcome = database
        .lcs
        .get(&state.current_loc)
        .map_or_else(vm::ScriptOutcome::default, |lc| {
            run_script(lc, state, database, config, io, rng, true)
        });
    if state.new_room || lc_outcome.done {
        return state.finished;
    }

    let lpc_outcome = run_script(&database.lpcs, state, database, config, io, rng, true);
    if state.new_room || lpc_outcome.done {
        return state.finished;
    }

    if !lc_outcome.matched && !lpc_outcome.matched {
        let id = if state.verb == 0 { messages::NOTUNDERSTAND } else { messages::CANTDO };
        vm::print_message(database, io, id, true);
    }

    state.finished
}

/// Runs turns until the game ends.
pub fn run_until_finished(
    state: &mut MachineState,
    database: &Database,
    config: &RunConfig,
    io: &mut dyn IoFacade,
    rng: &mut dyn FnMut(u16) -> u16,
) {
    while !run_turn(state, database, config, io, rng) {}
}

/// Blocks on the `ASK` prompt until a non-blank line arrives, splits it into
/// statement fragments, and resets `old_noun` (the source clears it "after
/// new text input" so a pronoun from a prior line can't leak across turns).
fn prompt_for_statements(state: &mut MachineState, database: &Database, io: &mut dyn IoFacade) {
    loop {
        io.print("\n");
        io.print(&vm::database_message(database, messages::ASK));
        let input = io.input();
        if !input.is_empty() {
            state.pending_statements = split_statements(&input, database);
            state.old_noun = 0;
            return;
        }
    }
}

/// Pops and parses statement fragments until one fills a parser slot (or
/// requests `*QUIT`), checking the current room's exit table for a matching
/// verb on a successful parse.
fn process_pending_statements(state: &mut MachineState, database: &Database) {
    while let Some(statement) = state.pending_statements.pop_front() {
        let outcome = parse_statement(&statement, database, state);
        if outcome.quit_requested {
            state.finished = true;
            break;
        }
        if outcome.any_slot_filled {
            if let Some(room) = database.rooms.get(&state.current_loc) {
                if let Some(exit) = room.exits.iter().find(|e| u16::from(e.dir) == state.verb) {
                    state.current_loc = exit.dest;
                    state.new_room = true;
                }
            }
            break;
        }
    }
}
