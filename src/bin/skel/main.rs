//! skel-cli - Tool for inspecting and re-encoding skeleton chunks.

use skel_codec::binary::Chunk;
use skel_codec::skel::{self, linearize, ChunkLayout, SkelChunk};
use skel_codec::Result;
use std::env;
use std::fs;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // a second init (tests, embedding) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "info" | "i" => match filtered_args.get(1) {
            Some(path) => cmd_info(path),
            None => usage("info <file>"),
        },
        "dump" | "d" => match filtered_args.get(1) {
            Some(path) => cmd_dump(path),
            None => usage("dump <file>"),
        },
        "hierarchy" | "t" => match filtered_args.get(1) {
            Some(path) => cmd_hierarchy(path),
            None => usage("hierarchy <file>"),
        },
        "rewrite" | "c" => match (filtered_args.get(1), filtered_args.get(2)) {
            (Some(input), Some(output)) => cmd_rewrite(input, output),
            _ => usage("rewrite <in> <out>"),
        },
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn usage(form: &str) -> Result<()> {
    eprintln!("Error: missing arguments");
    eprintln!("Usage: skel-cli {}", form);
    std::process::exit(1);
}

fn print_help() {
    println!("skel-cli - skeleton chunk toolkit");
    println!();
    println!("USAGE:");
    println!("    skel-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info      <file>          Show counts, header pointers and section ends");
    println!("    d, dump      <file>          Print every primitive the reader consumed");
    println!("    t, hierarchy <file>          Show stored hierarchy lines next to recomputed ones");
    println!("    c, rewrite   <in> <out>      Read, re-encode and report whether bytes match");
    println!("    h, help                      Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("RUST_LOG overrides the level chosen by the options.");
}

fn cmd_info(path: &str) -> Result<()> {
    info!("Opening skeleton: {}", path);
    let chunk = skel::open(path)?;
    let layout = chunk.header.layout;
    let skeleton = &chunk.skeleton;

    println!("File: {}", path);
    println!("Bones:       {}", skeleton.num_bones());
    println!("Roots:       {}", skeleton.roots().count());
    println!("UV channels: {}", skeleton.num_uv_channels());
    println!("Hierarchy lines: {}", layout.num_bone_hierarchy_data_lines);
    println!();
    println!("Sections (relative pointer -> absolute end):");
    let rows = [
        ("bone hierarchy data", layout.rel_ptr_to_end_of_bone_hierarchy_data, layout.end_of_bone_hierarchy_data()),
        ("bone definitions", layout.rel_ptr_to_end_of_bone_defs, layout.end_of_bone_defs()),
        ("parent bones", layout.rel_ptr_to_end_of_parent_bones, layout.end_of_parent_bones()),
        ("parent bones chunk", layout.rel_ptr_to_end_of_parent_bones_chunk, layout.end_of_parent_bones_chunk()),
        ("bone name hashes", layout.rel_ptr_bone_name_hashes, layout.end_of_bone_name_hashes()),
        ("unknown data 3", layout.unknown_rel_ptr_3, layout.end_of_unknown_data_3()),
    ];
    for (name, rel, end) in rows {
        println!("  {:<20} {:>8} -> {:>8}", name, rel, end);
    }
    println!();
    println!("Total bytes: {}", layout.total_bytes);
    println!("Bytes after parent bones chunk: {}", layout.remaining_bytes_after_parent_bones_chunk);

    let derived = ChunkLayout::compute(
        skeleton.num_bones(),
        skeleton.num_uv_channels(),
        layout.num_bone_hierarchy_data_lines as usize,
    )?;
    println!(
        "Header pointers: {}",
        if derived == layout { "consistent" } else { "differ from the derived layout" }
    );
    Ok(())
}

fn cmd_dump(path: &str) -> Result<()> {
    let mut reader = skel::file::open_reader(path)?;
    let result = SkelChunk::read(&mut reader);

    for (i, entry) in reader.header().iter().enumerate() {
        let line = entry.to_string();
        if line.chars().count() > 120 {
            let head: String = line.chars().take(117).collect();
            println!("{:>4}: {}... ({} values)", i, head, entry.values().len());
        } else {
            println!("{:>4}: {}", i, line);
        }
    }
    debug!("{} entries traced", reader.header().len());

    result.map(|_| ())
}

fn cmd_hierarchy(path: &str) -> Result<()> {
    let chunk = skel::open(path)?;
    let recomputed = linearize(&chunk.skeleton.parent_bones)?;

    println!("{:>4}  {:<39}  {:<39}", "line", "stored", "recomputed");
    let rows = chunk.hierarchy_lines.len().max(recomputed.len());
    for i in 0..rows {
        let stored = chunk.hierarchy_lines.get(i).map(|l| l.to_string()).unwrap_or_default();
        let derived = recomputed.get(i).map(|l| l.to_string()).unwrap_or_default();
        let marker = if stored == derived { " " } else { "*" };
        println!("{:>4}{} {:<39}  {:<39}", i, marker, stored, derived);
    }
    println!();
    if chunk.hierarchy_lines == recomputed {
        println!("Stored lines match the parent indices.");
    } else {
        println!("Stored lines differ from the parent indices (marked *).");
    }
    Ok(())
}

fn cmd_rewrite(input: &str, output: &str) -> Result<()> {
    info!("Reading {}", input);
    let chunk = skel::open(input)?;
    let original = fs::read(input)?;

    skel::save(output, &chunk.skeleton)?;
    let written = fs::read(output)?;

    println!("Input:  {} ({} bytes)", input, original.len());
    println!("Output: {} ({} bytes)", output, written.len());
    if original == written {
        println!("Round trip: identical");
    } else {
        let first = original.iter().zip(&written).position(|(a, b)| a != b);
        match first {
            Some(offset) => println!("Round trip: differs, first difference at offset {:#x}", offset),
            None => println!("Round trip: differs in length"),
        }
    }
    Ok(())
}
