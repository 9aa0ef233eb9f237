//! # GAC Adventure
//!
//! A decoder and interpreter for games authored with a 1980s-era
//! adventure-creation toolkit ("GAC") that stored a complete game —
//! vocabulary, rooms, objects, messages, condition scripts, and vector
//! graphics — inside a memory snapshot of an 8-bit home computer.
//!
//! Two coupled subsystems:
//! - **Decoder**: recovers a structured, portable [`database::Database`] from
//!   a raw 48KB memory snapshot (format recovery over pointer-threaded,
//!   variable-length, byte-packed records).
//! - **Interpreter**: runs the extracted game — tokenizing player input
//!   against the vocabulary ([`parser`]) and executing the three-tier
//!   condition-script engine ([`vm`]) through a per-turn driver
//!   ([`driver`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use gac_adventure::memory::MemoryImage;
//! use gac_adventure::database::Database;
//! use gac_adventure::error::Result;
//!
//! fn decode_snapshot(path: &std::path::Path) -> Result<Database> {
//!     let image = MemoryImage::load_file(path)?;
//!     let database = Database::decode(&image)?;
//!     Ok(database)
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result aliases for decode/runtime operations
//! - [`memory`] - Flat byte-addressable view of a fixed-up snapshot
//! - [`text`] - Compressed-string and token decompression
//! - [`tables`] - Table extractors (vocabulary, messages, objects, rooms, graphics)
//! - [`bytecode`] - Condition-script disassembler
//! - [`database`] - The aggregated, portable game database
//! - [`parser`] - Player input tokenization against the vocabulary
//! - [`vm`] - The condition-script stack machine and its runtime state
//! - [`driver`] - The per-turn orchestration loop
//! - [`io`] - The text I/O façade contract and a reference implementation
//!
//! ## Format Reference
//!
//! - 64KiB address space; only `0x5C00..=0xFFFF` is meaningful
//! - Fixed header pointer table at `0xA51F..=0xA54F`
//! - Punctuation magic bytes `\0 .,-!?:` at `0xA1E5` double as the database
//!   validity signature
//!
//! All multi-byte integers are stored in little-endian byte order.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bytecode;
pub mod database;
pub mod driver;
pub mod error;
pub mod io;
pub mod memory;
pub mod parser;
pub mod tables;
pub mod text;
pub mod vm;

// Re-export commonly used types at the crate root
pub use bytecode::{disassemble, Op};
pub use database::Database;
pub use error::{GacError, Result};
pub use memory::MemoryImage;
pub use parser::{parse_statement, ParseOutcome};
pub use vm::{run_script, MachineState, RunConfig, ScriptOutcome};
