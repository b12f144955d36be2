//! Replays record-stream fixtures through the assembler and compares each
//! module against its `<name>.expected.json` golden file.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use apidoc_tree::{assemble, records::records_from_value};
use clap::Parser;
use colored::Colorize;
use serde_json::Value;

const EXPECTED_SUFFIX: &str = ".expected.json";

#[derive(Parser, Debug)]
struct Args {
    /// fixture directory
    #[arg(default_value = "tests/fixtures")]
    dir: PathBuf,

    /// rewrite golden files from the current output
    #[arg(long)]
    bless: bool,
}

enum Outcome {
    Pass,
    Blessed,
    Mismatch { expected: Value, actual: Value },
    Broken(String),
}

fn main() -> ExitCode {
    let args = Args::parse();
    let fixtures = match list_fixtures(&args.dir) {
        Ok(fixtures) => fixtures,
        Err(error) => {
            eprintln!("{} {}: {error}", "error".red(), args.dir.display());
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0;
    for fixture in &fixtures {
        let label = fixture.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        match run_fixture(fixture, &label, args.bless) {
            Outcome::Pass => println!("{} {label}", "pass".green()),
            Outcome::Blessed => println!("{} {label}", "blessed".cyan()),
            Outcome::Mismatch { expected, actual } => {
                failed += 1;
                println!("{} {label}", "FAIL".red().bold());
                println!("  expected: {}", serde_json::to_string(&expected).unwrap_or_default().dimmed());
                println!("  actual:   {}", serde_json::to_string(&actual).unwrap_or_default());
            }
            Outcome::Broken(message) => {
                failed += 1;
                println!("{} {label}: {message}", "ERROR".red().bold());
            }
        }
    }

    println!("{} fixtures, {failed} failed", fixtures.len());
    if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn list_fixtures(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        if name.ends_with(".json") && !name.ends_with(EXPECTED_SUFFIX) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn expected_path(fixture: &Path) -> PathBuf {
    let stem = fixture.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    fixture.with_file_name(format!("{stem}{EXPECTED_SUFFIX}"))
}

fn run_fixture(fixture: &Path, label: &str, bless: bool) -> Outcome {
    let source = match std::fs::read_to_string(fixture) {
        Ok(source) => source,
        Err(error) => return Outcome::Broken(error.to_string()),
    };
    let mut de = serde_json::Deserializer::from_str(&source);
    let stream: Value = match serde_path_to_error::deserialize(&mut de) {
        Ok(value) => value,
        Err(error) => return Outcome::Broken(format!("{} at {}", error.inner(), error.path())),
    };

    let assembly = assemble(label, &records_from_value(stream));
    for diagnostic in &assembly.diagnostics {
        println!("  {} {}", "note".yellow(), serde_json::to_string(diagnostic).unwrap_or_default());
    }
    let actual = match serde_json::to_value(&assembly.module) {
        Ok(value) => value,
        Err(error) => return Outcome::Broken(error.to_string()),
    };

    let golden = expected_path(fixture);
    if bless {
        let text = match serde_json::to_string_pretty(&actual) {
            Ok(text) => text,
            Err(error) => return Outcome::Broken(error.to_string()),
        };
        return match std::fs::write(&golden, text + "\n") {
            Ok(()) => Outcome::Blessed,
            Err(error) => Outcome::Broken(error.to_string()),
        };
    }

    let expected: Value = match std::fs::read_to_string(&golden) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(error) => return Outcome::Broken(format!("{}: {error}", golden.display())),
        },
        Err(_) => return Outcome::Broken(format!("missing {} (run with --bless)", golden.display())),
    };
    if expected == actual { Outcome::Pass } else { Outcome::Mismatch { expected, actual } }
}
