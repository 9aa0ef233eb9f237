//! Read-only inspection tool for a decoded GAC database
//!
//! Usage: gac-dump <database.json> [--hpcs] [--lpcs] [--lc ROOM]

use std::env;
use std::path::PathBuf;

use gac_adventure::database::Database;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <database.json> [--hpcs] [--lpcs] [--lc ROOM]", args[0]);
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let database = Database::load_file(&path).unwrap_or_else(|e| {
        eprintln!("Failed to load database: {e}");
        std::process::exit(1);
    });

    print_summary(&database);

    if args.iter().any(|a| a == "--hpcs") {
        println!("\n=== HPCs ===");
        print_ops(&database.hpcs);
    }
    if args.iter().any(|a| a == "--lpcs") {
        println!("\n=== LPCs ===");
        print_ops(&database.lpcs);
    }
    if let Some(idx) = args.iter().position(|a| a == "--lc") {
        if let Some(room_str) = args.get(idx + 1) {
            match room_str.parse::<u16>() {
                Ok(room) => match database.lcs.get(&room) {
                    Some(ops) => {
                        println!("\n=== LC for room {room} ===");
                        print_ops(ops);
                    }
                    None => println!("\nNo LC defined for room {room}"),
                },
                Err(_) => eprintln!("--lc requires a numeric room id"),
            }
        } else {
            eprintln!("--lc requires a room id argument");
        }
    }
}

fn print_summary(database: &Database) {
    println!("=== Database Summary ===");
    println!("Model: {}", database.model);
    println!("Init location: {}", database.init_loc);
    println!("Verbs: {}", database.verbs.len());
    println!("Nouns: {}", database.nouns.len());
    println!("Adverbs: {}", database.adverbs.len());
    println!("Pronouns: {}", database.pronouns.len());
    println!("Messages: {}", database.messages.len());
    println!("Objects: {}", database.objects.len());
    println!("Rooms: {}", database.rooms.len());
    println!("HPC ops: {}", database.hpcs.len());
    println!("LPC ops: {}", database.lpcs.len());
    println!("LCs defined: {}", database.lcs.len());
    println!("Graphics: {}", database.gfx.len());
    println!("Font bytes: {}", database.font.len());

    println!("\n=== Rooms ===");
    for (id, room) in &database.rooms {
        println!("  {id}: {} ({} exits)", room.desc, room.exits.len());
    }

    println!("\n=== Objects ===");
    for object in &database.objects {
        println!(
            "  {}: {} (weight {}, initial_loc {})",
            object.id, object.name, object.weight, object.initial_loc
        );
    }
}

fn print_ops(ops: &[gac_adventure::Op]) {
    for (i, op) in ops.iter().enumerate() {
        println!("  {i:4}: {op:?}");
    }
}
