//! Cool Compiler
//!
//! Frontend for Cool (Classroom Object-Oriented Language): lexing,
//! parsing and semantic analysis producing a fully typed AST.

mod frontend;
mod semant;
mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use frontend::intern::Interner;
use frontend::lexer::Lexer;
use frontend::parser::Parser as CoolParser;
use semant::analyze;

/// Cool Compiler
#[derive(Parser, Debug)]
#[command(name = "coolc")]
#[command(version = "0.1.0")]
#[command(about = "Cool compiler frontend - parsing and semantic analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input source file (.cl)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Print diagnostics as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full frontend over a source file
    Check {
        /// Input source file
        input: PathBuf,
    },
    /// Parse a source file and print its class layout
    Parse {
        /// Input source file
        input: PathBuf,
    },
    /// Print version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Check { input }) => check_file(input, cli.json),
        Some(Commands::Parse { input }) => parse_file(input),
        Some(Commands::Version) => {
            println!("coolc 0.1.0");
            println!("Compiler frontend for Cool (Classroom Object-Oriented Language)");
            println!("License: Apache-2.0");
        }
        None => match &cli.input {
            Some(input) => check_file(input, cli.json),
            None => {
                eprintln!("Error: No input file specified");
                eprintln!("Usage: coolc <FILE> or coolc check <FILE>");
                process::exit(1);
            }
        },
    }
}

fn read_source(input: &Path) -> anyhow::Result<String> {
    fs::read_to_string(input).with_context(|| format!("could not read {}", input.display()))
}

fn report_parse_error(input: &Path, error: &utils::Error) {
    match error.line() {
        Some(line) => eprintln!("{}:{}: {}", input.display(), line, error),
        None => eprintln!("{}: {}", input.display(), error),
    }
}

/// Parse and analyze one source file, reporting every diagnostic
fn check_file(input: &Path, json: bool) {
    println!("Checking: {}", input.display());

    let source = match read_source(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let mut interner = Interner::new();
    let lexer = Lexer::new(&source, 0);
    let mut parser = CoolParser::new(lexer, &mut interner, &input.to_string_lossy());
    let mut program = match parser.parse_program() {
        Ok(program) => program,
        Err(e) => {
            report_parse_error(input, &e);
            process::exit(1);
        }
    };
    println!("  [✓] Parsed {} classes", program.classes.len());

    let analysis = analyze(&mut program, &mut interner);
    if json {
        println!("{}", analysis.diagnostics.to_json(&interner));
    } else {
        for diagnostic in analysis.diagnostics.records() {
            eprintln!("{}", analysis.diagnostics.render(diagnostic, &interner));
        }
    }
    if !analysis.diagnostics.is_clean() {
        eprintln!("Compilation halted due to static semantic errors.");
        process::exit(1);
    }

    println!("  [✓] Semantic analysis passed ({} classes)", analysis.hierarchy.len());
    println!("✅ No errors found");
}

/// Parse only: show what the grammar made of the file
fn parse_file(input: &Path) {
    println!("Parsing: {}", input.display());

    let source = match read_source(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let mut interner = Interner::new();
    let lexer = Lexer::new(&source, 0);
    let mut parser = CoolParser::new(lexer, &mut interner, &input.to_string_lossy());
    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(e) => {
            report_parse_error(input, &e);
            process::exit(1);
        }
    };

    println!("  [✓] Parsed {} classes", program.classes.len());
    for class in &program.classes {
        let parent = class
            .parent
            .map(|p| format!(" inherits {}", interner.resolve(p)))
            .unwrap_or_default();
        println!(
            "    class {}{} ({} features)",
            interner.resolve(class.name),
            parent,
            class.features.len()
        );
    }
}
