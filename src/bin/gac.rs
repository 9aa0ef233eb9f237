//! GAC adventure decoder and interpreter CLI
//!
//! ## Commands
//!
//! - `decode` - Decode a raw memory snapshot into a portable JSON database
//! - `run` - Play a decoded (or freshly decoded) database interactively

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gac_adventure::database::Database;
use gac_adventure::driver::{run_until_finished, start_adventure};
use gac_adventure::io::TextIo;
use gac_adventure::memory::MemoryImage;
use gac_adventure::vm::RunConfig;

/// GAC adventure decoder and interpreter
#[derive(Parser)]
#[command(name = "gac")]
#[command(about = "GAC adventure decoder and interpreter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw memory snapshot into a portable JSON database
    Decode {
        /// Path to the raw snapshot file
        input: PathBuf,
        /// Path the decoded JSON database is written to
        output: PathBuf,
    },
    /// Play a database interactively
    Run {
        /// Path to a decoded JSON database, or a raw snapshot if `--snapshot` is given
        file: PathBuf,
        /// Treat `file` as a raw memory snapshot instead of a decoded database
        #[arg(long)]
        snapshot: bool,
        /// Output line width, in columns
        #[arg(long, default_value_t = 64)]
        width: usize,
        /// Path the `SAVE`/`LOAD` opcodes persist state to
        #[arg(long, default_value = "gac-save.json")]
        save_path: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode { input, output } => cmd_decode(&input, &output),
        Commands::Run { file, snapshot, width, save_path } => {
            cmd_run(&file, snapshot, width, save_path)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_decode(input: &std::path::Path, output: &std::path::Path) -> Result<(), gac_adventure::GacError> {
    let image = MemoryImage::load_file(input)?;
    let database = Database::decode(&image)?;
    database.save_file(output)?;
    eprintln!(
        "Decoded {} verbs, {} nouns, {} objects, {} rooms -> {}",
        database.verbs.len(),
        database.nouns.len(),
        database.objects.len(),
        database.rooms.len(),
        output.display()
    );
    Ok(())
}

fn cmd_run(
    file: &std::path::Path,
    snapshot: bool,
    width: usize,
    save_path: PathBuf,
) -> Result<(), gac_adventure::GacError> {
    let database = if snapshot {
        let image = MemoryImage::load_file(file)?;
        Database::decode(&image)?
    } else {
        Database::load_file(file)?
    };

    let config = RunConfig { display_width: width, save_path };
    let mut io = TextIo::new();
    let mut state = start_adventure(&database, &config, &mut io)?;
    let mut thread_rng = rand::thread_rng();
    let mut rng = |max: u16| rand::Rng::gen_range(&mut thread_rng, 0..=max);
    run_until_finished(&mut state, &database, &config, &mut io, &mut rng);
    Ok(())
}
