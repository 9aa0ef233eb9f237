//! Player input tokenization against the decoded vocabulary.
//!
//! Two independent steps feed the turn driver: [`split_statements`] breaks a
//! raw input line into separator-delimited fragments ("get lamp then go
//! north" -> `["get lamp", " go north"]`), and [`parse_statement`] fills the
//! verb/noun1/adverb parser slots from one such fragment.

use std::collections::{BTreeMap, VecDeque};

use crate::database::Database;
use crate::vm::MachineState;

/// What happened parsing one statement fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    /// Whether a verb or noun1 slot ended up non-zero.
    pub any_slot_filled: bool,
    /// Whether the reserved `*QUIT` word was seen, ending input processing immediately.
    pub quit_requested: bool,
}

/// Breaks a raw line of input into statement fragments.
///
/// Every word-level separator (`database.separators`, e.g. `"then"`,
/// `"and"`) and every non-space punctuation glyph (`database.punctuation`)
/// is replaced with `.` (as plain substring replacement, not word-bounded —
/// matching the source toolkit's behavior), and the result is split on `.`.
#[must_use]
pub fn split_statements(raw: &str, database: &Database) -> VecDeque<String> {
    let mut separators: Vec<String> = database.separators.clone();
    for &byte in &database.punctuation {
        let ch = byte as char;
        if ch != ' ' {
            separators.push(ch.to_string());
        }
    }

    let mut text = raw.to_string();
    for sep in &separators {
        if !sep.is_empty() {
            text = text.replace(sep.as_str(), ".");
        }
    }

    text.split('.').map(str::to_string).collect()
}

/// Fills the verb/adverb/noun1/noun2 parser slots from one statement
/// fragment, resetting them first.
///
/// Per-word slot order is verb, then noun1 (with pronoun resolution via
/// [`MachineState::old_noun`]), then adverb; the first matching slot wins
/// and a word never fills two slots. `noun2` is never filled by ordinary
/// input — the source toolkit's own slot-filling condition for it is
/// permanently false (`noun2 == 0 && noun2 != 0`), preserved here rather
/// than "fixed", since scripts may rely on its having never been wired up.
pub fn parse_statement(input: &str, database: &Database, state: &mut MachineState) -> ParseOutcome {
    state.verb = 0;
    state.adverb = 0;
    state.noun1 = 0;
    state.noun2 = 0;

    let upper = input.to_uppercase();
    for word in upper.split_whitespace() {
        if word == "*QUIT" {
            return ParseOutcome { any_slot_filled: true, quit_requested: true };
        }

        let mut matched = false;

        if state.verb == 0 {
            state.verb = u16::from(find_word(&database.verbs, word));
            matched = state.verb != 0;
        }

        if state.noun1 == 0 && !matched {
            let candidate = find_word(&database.nouns, word);
            state.noun1 = u16::from(candidate);
            if state.noun1 != 0 {
                state.old_noun = state.noun1;
            } else if database.pronouns.iter().any(|p| p == word) {
                state.noun1 = state.old_noun;
            }
            matched = state.noun1 != 0;
        }

        if state.adverb == 0 && !matched {
            state.adverb = u16::from(find_word(&database.adverbs, word));
            matched = state.adverb != 0;
        }

        #[allow(clippy::nonminimal_bool)]
        if state.noun2 == 0 && state.noun2 != 0 && !matched {
            state.noun2 = u16::from(find_word(&database.nouns, word));
        }
    }

    ParseOutcome {
        any_slot_filled: state.verb != 0 || state.noun1 != 0,
        quit_requested: false,
    }
}

/// Looks up `word` in a vocabulary table using the source toolkit's
/// truncate-the-dictionary-entry matching rule: a dictionary key longer
/// than `word` is truncated to `word`'s length before comparing, so a
/// stored word like `"NORTH"` matches typed input `"NOR"`. Iterates in
/// `BTreeMap` (sorted key) order; returns the first match, or `0`.
fn find_word(dictionary: &BTreeMap<String, u8>, word: &str) -> u8 {
    for (key, &id) in dictionary {
        let truncated = if key.len() > word.len() { &key[..word.len()] } else { key.as_str() };
        if truncated == word {
            return id;
        }
    }
    0
}
