//! `xword`: the CLI surface over the `xword_solver` library. A thin shell:
//! all solving logic lives in the library, and this binary only parses
//! arguments, loads files, and prints results.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use xword_solver::grid::Grid;
use xword_solver::solver::{SolveConfig, Solver};
use xword_solver::word_list::WordList;

#[derive(Parser)]
#[command(name = "xword", about = "Crossword constraint-satisfaction solver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a grid against a dictionary and print the filled grid plus
    /// across/down word lists.
    Solve {
        grid_path: PathBuf,
        dictionary_path: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        max_solutions: u32,
    },
    /// Validate a dictionary file and report any rejected entries.
    LoadDictionary { dictionary_path: PathBuf },
    /// Validate a grid file and print its discovered slot table.
    LoadGrid { grid_path: PathBuf },
    /// Solve a grid and re-emit it as the `{grid, slots}` JSON object shape.
    #[cfg(feature = "serde")]
    ExportSolution {
        grid_path: PathBuf,
        dictionary_path: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Solve {
            grid_path,
            dictionary_path,
            seed,
            max_solutions,
        } => run_solve(&grid_path, &dictionary_path, seed, max_solutions),
        Command::LoadDictionary { dictionary_path } => run_load_dictionary(&dictionary_path),
        Command::LoadGrid { grid_path } => run_load_grid(&grid_path),
        #[cfg(feature = "serde")]
        Command::ExportSolution {
            grid_path,
            dictionary_path,
            seed,
        } => run_export_solution(&grid_path, &dictionary_path, seed),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn read_grid(path: &PathBuf) -> Result<Grid, String> {
    let text = fs::read_to_string(path).map_err(|err| format!("reading {path:?}: {err}"))?;
    Grid::parse(&text).map_err(|err| err.to_string())
}

fn run_solve(
    grid_path: &PathBuf,
    dictionary_path: &PathBuf,
    seed: Option<u64>,
    max_solutions: u32,
) -> Result<(), String> {
    let grid = read_grid(grid_path)?;
    let word_list = WordList::load_from_path(dictionary_path);
    let solver = Solver::new(word_list);
    let config = SolveConfig {
        max_solutions,
        rng_seed: seed,
        ..SolveConfig::default()
    };

    let result = solver.solve(&grid, &config).map_err(|err| err.to_string())?;
    print_solution(&result.solution);
    println!();
    println!(
        "{} recursive call(s), {} backtrack(s), {:?} elapsed",
        result.statistics.recursive_calls, result.statistics.backtracks, result.statistics.elapsed
    );
    if !result.additional_solutions.is_empty() {
        println!(
            "{} additional solution(s) found but not printed",
            result.additional_solutions.len()
        );
    }
    Ok(())
}

fn print_solution(solution: &xword_solver::report::Solution) {
    for row in 0..solution.rows {
        let mut line = String::new();
        for col in 0..solution.cols {
            let ch = solution.letter_at(xword_solver::types::Position::new(row, col));
            line.push(ch.unwrap_or('#'));
            line.push(' ');
        }
        println!("{}", line.trim_end());
    }
    println!();
    println!("ACROSS");
    for slot in &solution.across {
        println!("  {:>3}. {}", slot.number, slot.word);
    }
    println!("DOWN");
    for slot in &solution.down {
        println!("  {:>3}. {}", slot.number, slot.word);
    }
}

fn run_load_dictionary(dictionary_path: &PathBuf) -> Result<(), String> {
    let text = fs::read_to_string(dictionary_path).map_err(|err| format!("reading {dictionary_path:?}: {err}"))?;
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    let diagnostics = WordList::diagnose(lines.iter().copied());
    if diagnostics.is_empty() {
        println!("{} entries, all accepted", lines.len());
    } else {
        for diagnostic in &diagnostics {
            println!("{diagnostic}");
        }
        println!("{} of {} entries rejected", diagnostics.len(), lines.len());
    }
    Ok(())
}

fn run_load_grid(grid_path: &PathBuf) -> Result<(), String> {
    let grid = read_grid(grid_path)?;
    let analyzed = xword_solver::slots::analyze(&grid).map_err(|err| err.to_string())?;
    for slot in &analyzed.slots {
        println!("{:<10} len={}", slot.name, slot.len());
    }
    println!("{} slot(s), {} prefilled cell(s)", analyzed.slots.len(), analyzed.prefilled.len());
    Ok(())
}

#[cfg(feature = "serde")]
fn run_export_solution(grid_path: &PathBuf, dictionary_path: &PathBuf, seed: Option<u64>) -> Result<(), String> {
    use std::collections::HashMap;

    let grid = read_grid(grid_path)?;
    let word_list = WordList::load_from_path(dictionary_path);
    let solver = Solver::new(word_list);
    let config = SolveConfig {
        rng_seed: seed,
        ..SolveConfig::default()
    };
    let result = solver.solve(&grid, &config).map_err(|err| err.to_string())?;

    let analyzed = xword_solver::slots::analyze(&grid).map_err(|err| err.to_string())?;

    let rows: Vec<Vec<String>> = (0..result.solution.rows)
        .map(|row| {
            (0..result.solution.cols)
                .map(|col| {
                    result
                        .solution
                        .letter_at(xword_solver::types::Position::new(row, col))
                        .map_or_else(|| "#".to_string(), |ch| ch.to_string())
                })
                .collect()
        })
        .collect();

    let slots: HashMap<String, Vec<(usize, usize)>> = analyzed
        .slots
        .iter()
        .map(|slot| {
            let positions = slot.positions.iter().map(|pos| (pos.row, pos.col)).collect();
            (slot.name.clone(), positions)
        })
        .collect();

    let export = serde_json::json!({
        "grid": rows,
        "slots": slots,
    });
    println!("{}", serde_json::to_string_pretty(&export).map_err(|err| err.to_string())?);
    Ok(())
}
