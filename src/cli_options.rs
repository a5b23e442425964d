/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Dotlink.

Dotlink is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Dotlink is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Dotlink. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! # Examples
//!
//! Generate a hard 10x10 puzzle and print its solution:
//!
//! ```
//! $ dotlink -s 10 -m hard --seed ABC123 --solution
//! ```
//!
//! Share a puzzle, and then rebuild it from its level code:
//!
//! ```
//! $ dotlink -s 6 --seed ABC123 -f code
//! 6.0a1b...
//! $ dotlink --decode 6.0a1b...
//! ```
//!
//! Verify a player's solution, stored in a JSON file:
//!
//! ```
//! $ dotlink -s 6 --seed ABC123 --verify solution.json
//! ```

use clap::{Parser, ValueEnum};
use log::{Level, debug, log_enabled};
use serde::Serialize;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::draw::{Draw, View};
use crate::generator::flow_generator::GeneratorConfig;
use crate::generator::point::Point;
use crate::level_code::{self, LevelLayout};
use crate::puzzle::{MAX_SIZE, MIN_SIZE, Mode, Puzzle, PuzzleError};
use crate::saver::puzzle::SaverPuzzle;
use crate::verify::{self, Solution, Verdict};

/// Output format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
enum Format {
    /// Drawing of the grid.
    #[default]
    Text,

    /// JSON document.
    Json,

    /// Level code only.
    Code,
}

/// Generate, share, and verify connect-the-dots puzzles.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// Number of rows and columns of the grid
    #[arg(short, long, default_value_t = 8,
          value_parser = clap::value_parser!(u8).range((MIN_SIZE as i64)..=(MAX_SIZE as i64)))]
    size: u8,

    /// Puzzle mode
    #[arg(value_enum, short, long, default_value_t = Mode::Normal)]
    mode: Mode,

    /// Seed for the first puzzle (random if not provided)
    #[arg(long)]
    seed: Option<String>,

    /// Number of puzzles to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Output format
    #[arg(value_enum, short, long, default_value_t = Format::Text)]
    format: Format,

    /// Draw the routes found by the generator
    #[arg(long, default_value_t = false)]
    solution: bool,

    /// Save the last generated puzzle in that JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a puzzle previously saved with --output
    #[arg(long, group = "action")]
    load: Option<PathBuf>,

    /// Rebuild a puzzle from its level code
    #[arg(long, group = "action")]
    decode: Option<String>,

    /// Verify the solution stored in that JSON file against the puzzle given by --size, --mode,
    /// and --seed
    #[arg(long, group = "action", requires = "seed")]
    verify: Option<PathBuf>,

    /// Number of generation attempts before giving up on a seed
    #[arg(long, default_value_t = GeneratorConfig::default().max_attempts as u16,
          value_parser = clap::value_parser!(u16).range(1..))]
    max_attempts: u16,

    /// Print some statistics after generating the puzzles
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Decoded level code with its hint routes, for the JSON output.
#[derive(Serialize)]
struct DecodedLevel<'a> {
    layout: &'a LevelLayout,
    hints: Vec<Option<Vec<Point>>>,
}

/// Verification result, for the JSON output.
#[derive(Serialize)]
struct VerifyReport<'a> {
    seed: &'a str,
    complete: bool,
    verdict: &'a Verdict,
}

/// Parse and process command-line options. Return the process exit status.
pub fn run() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let ret: Result<u8, Box<dyn Error>> = if let Some(code) = &args.decode {
        decode(code, &args)
    } else if let Some(file) = &args.load {
        load(file, &args)
    } else if let Some(file) = &args.verify {
        verify_solution(file, &args)
    } else {
        generate(&args)
    };

    match ret {
        Ok(status) => status,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

/// Generate the requested number of puzzles.
fn generate(args: &Args) -> Result<u8, Box<dyn Error>> {
    let size: usize = args.size as usize;
    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut attempts: usize = 0;
    let mut errors: usize = 0;
    let mut last: Option<Puzzle> = None;
    let config = GeneratorConfig {
        max_attempts: args.max_attempts as usize,
        ..Default::default()
    };

    // Do not leave a previous puzzle behind if the generation fails
    let saver: Option<SaverPuzzle> = args.output.clone().map(SaverPuzzle::new);
    if let Some(saver) = &saver {
        saver.delete_save();
    }

    for i in 0..args.count {
        debug!("Puzzle {i}");
        let seed: Option<&str> = if i == 0 { args.seed.as_deref() } else { None };

        match Puzzle::generate_with_config(size, args.mode, seed, config.clone()) {
            Ok(puzzle) => {
                total += puzzle.duration;
                if puzzle.duration > max {
                    max = puzzle.duration;
                }
                attempts += puzzle.attempts;
                print_puzzle(&puzzle, args)?;
                last = Some(puzzle);
            }
            Err(e @ PuzzleError::Exhausted { .. }) => {
                errors += 1;
                eprintln!("{e}");
            }
            Err(e) => return Err(Box::new(e)),
        }
    }

    if let (Some(saver), Some(file), Some(puzzle)) = (&saver, &args.output, &last) {
        saver.save_puzzle(puzzle)?;
        println!("Puzzle saved in {}", file.display());
    }

    if args.summary {
        let generated: usize = args.count - errors;
        println!(
            "
        total time = {}s
      average time = {}s
          max time = {}s
average attempts = {}
            errors = {}",
            total,
            total / generated.max(1) as f32,
            max,
            attempts / generated.max(1),
            errors
        );
    }

    Ok(if last.is_some() { 0 } else { 1 })
}

/// Print a puzzle in the requested format.
fn print_puzzle(puzzle: &Puzzle, args: &Args) -> Result<(), Box<dyn Error>> {
    match args.format {
        Format::Text => {
            println!(
                "Puzzle {}x{} ({}), seed {}: {} pairs, {} stones",
                puzzle.size,
                puzzle.size,
                puzzle.mode,
                puzzle.seed,
                puzzle.pairs.len(),
                puzzle.stones.len()
            );
            let view: View = if args.solution {
                View::Solution
            } else {
                View::Dots
            };
            print!("{}", Draw::puzzle(puzzle, view).render());
            println!("Level code: {}\n", level_code::encode(puzzle));
            if log_enabled!(Level::Debug) {
                debug!("Solution grid:\n{}", puzzle.solution_grid().dump());
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(puzzle)?),
        Format::Code => println!("{}", level_code::encode(puzzle)),
    }
    Ok(())
}

/// Print the puzzle described by a level code, with hint routes.
fn decode(code: &str, args: &Args) -> Result<u8, Box<dyn Error>> {
    let layout: LevelLayout = level_code::decode(code)?;
    let hints: Vec<Option<Vec<Point>>> = layout.hint_routes();

    match args.format {
        Format::Json => {
            let decoded = DecodedLevel {
                layout: &layout,
                hints,
            };
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Format::Code => println!("{}", level_code::encode_layout(&layout)),
        Format::Text => {
            println!(
                "Puzzle {}x{}: {} pairs, {} stones",
                layout.size,
                layout.size,
                layout.pairs.len(),
                layout.stones.len()
            );
            let mut draw: Draw = Draw::new(layout.size);
            draw.stones(&layout.stones);
            for (i, ((start, end), hint)) in layout.pairs.iter().zip(hints.iter()).enumerate() {
                let label: String = (i + 1).to_string();
                match hint {
                    Some(route) if args.solution => draw.route(route, label),
                    _ => draw.route(&[*start, *end], label),
                }
                if hint.is_none() {
                    println!("Pair {} cannot be joined", i + 1);
                }
            }
            print!("{}", draw.render());
        }
    }
    Ok(0)
}

/// Print a puzzle saved in a file.
fn load(file: &Path, args: &Args) -> Result<u8, Box<dyn Error>> {
    match SaverPuzzle::new(file.to_path_buf()).get_puzzle()? {
        Some(saved) => {
            if args.format == Format::Text {
                println!("Saved on {}", saved.generated_at);
            }
            print_puzzle(&saved.puzzle, args)?;
            Ok(0)
        }
        None => Err(format!("{}: file not found", file.display()).into()),
    }
}

/// Verify a solution file. The exit status is 0 only if the puzzle is solved.
fn verify_solution(file: &Path, args: &Args) -> Result<u8, Box<dyn Error>> {
    let reader: BufReader<File> = BufReader::new(File::open(file)?);
    let solution: Solution = serde_json::from_reader(reader)?;
    let seed: &str = args.seed.as_deref().unwrap_or_default();

    let result = verify::verify(args.size as usize, args.mode, seed, &solution)?;
    let verdict: &Verdict = &result.verdict;

    match args.format {
        Format::Json | Format::Code => {
            let report = VerifyReport {
                seed,
                complete: verdict.is_complete(),
                verdict,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Text => {
            print!("{}", Draw::solution(&result.puzzle, &solution).render());
            for problem in &verdict.problems {
                println!("- {problem}");
            }
            println!(
                "{}/{} pairs joined, {}/{} cells covered: {}",
                verdict.connected,
                verdict.pairs,
                verdict.covered,
                verdict.open_cells,
                if verdict.solved { "solved" } else { "not solved" }
            );
        }
    }
    Ok(if verdict.solved { 0 } else { 1 })
}
