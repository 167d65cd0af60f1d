//! svg-recolor CLI
//!
//! Usage:
//!   svg-recolor [OPTIONS] [FILE]
//!
//! Reads a rendered SVG from FILE (or stdin), rewrites its paints into theme
//! variable references and prints the result. `--palette-css` prints the
//! matching theme stylesheet instead.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use sha2::{Digest, Sha256};

use svg_recolor::{palette, recolor, PresetTable, RenderParams};

#[derive(Parser)]
#[command(name = "svg-recolor")]
#[command(about = "Rewrite a rendered SVG's colors into theme variable references")]
struct Cli {
    /// Input SVG file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Directive file with `key: value` lines (same syntax as front matter)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Apply a named preset before other directives
    #[arg(long)]
    preset: Option<String>,

    /// Additional preset definitions (TOML, same shape as the built-ins)
    #[arg(long, value_name = "FILE")]
    presets: Option<PathBuf>,

    /// Set a single directive, e.g. `--param ellipse-fill=keep-shade`;
    /// applied last, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Instance hash used to namespace ids (default: SHA-256 of the input)
    #[arg(long)]
    hash: Option<String>,

    /// Print the generated theme palette stylesheet and exit
    #[arg(long)]
    palette_css: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.palette_css {
        print!("{}", palette::generate_css());
        return;
    }

    // Interactive invocation with nothing to read: show a short intro
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let presets = match &cli.presets {
        Some(path) => match PresetTable::with_file(path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Error loading presets '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => PresetTable::builtin(),
    };

    let mut params = RenderParams::new();

    if let Some(path) = &cli.config {
        match fs::read_to_string(path) {
            Ok(content) => svg_recolor::apply_directive_block(&content, &presets, &mut params),
            Err(e) => {
                eprintln!("Error reading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    if let Some(name) = &cli.preset {
        if !presets.apply(name, &mut params) {
            eprintln!("Error: unknown preset: {name}");
            std::process::exit(1);
        }
    }

    for entry in &cli.params {
        match entry.split_once('=') {
            Some((key, value)) => params.set(key.trim(), value.trim()),
            None => params.set(entry.trim(), "1"),
        }
    }

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {e}");
                    std::process::exit(1);
                }
            }
        }
    };

    let hash = cli.hash.clone().unwrap_or_else(|| content_hash(&source));

    match recolor(&source, &params, &hash) {
        Ok(svg) => print!("{svg}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Truncated SHA-256 of the input, the default namespacing salt
fn content_hash(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    let mut hash = String::with_capacity(16);
    for byte in &digest[..8] {
        hash.push_str(&format!("{byte:02x}"));
    }
    hash
}

fn print_intro() {
    println!("svg-recolor - rewrite a rendered SVG's colors into theme variable references");
    println!();
    println!("Pipe a rendered SVG in, or pass a file:");
    println!("  dot -Tsvg graph.dot | svg-recolor");
    println!("  svg-recolor --param ellipse-fill=keep-shade diagram.svg");
    println!();
    println!("Generate the companion stylesheet with `svg-recolor --palette-css`.");
    println!("See `svg-recolor --help` for all options.");
}
