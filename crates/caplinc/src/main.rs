//! Caplin Language Compiler Executable
//!
//! Command-line front end for the Caplin compilation pipeline: parses one or
//! more `.cap` source files, combines and type checks them, and reports
//! success or diagnostics.

use std::{collections::HashSet, path::PathBuf, process::exit};

use caplin_core::{
    error::{CodeSpanReportGenerator, JsonReportGenerator, ReportGenerator},
    file::SourceFile,
    nom_tools::State,
    process_ast,
    process_code,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use serde::Serialize;
use simplelog::{
    ColorChoice,
    CombinedLogger,
    ConfigBuilder,
    LevelPadding,
    TermLogger,
    TerminalMode,
    ThreadLogMode,
};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "caplinc", version, about = "The Caplin systems language compiler")]
struct Cli {
    /// Increase logging verbosity; repeatable (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all logging below errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type check one or more Caplin source files together as one program.
    Compile(CompileArgs),
}

#[derive(Parser)]
struct CompileArgs {
    /// Source files to compile. Each file becomes its own module, named
    /// after its path with the `.cap` extension stripped.
    files: Vec<PathBuf>,

    /// Compilation target triple. Accepted but not yet consumed by any
    /// backend; recorded so future lowering stages have a place to read it.
    #[arg(long)]
    target: Option<String>,

    /// Output format for diagnostics and the final result summary.
    #[arg(long, value_enum, default_value_t = ReportFormat::Plain)]
    report: ReportFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Plain,
    Json,
}

/// Errors raised while parsing or validating command-line input, before any
/// source file is touched.
#[derive(Debug, Error)]
enum CliError {
    #[error("flag `--{0}` was given more than once")]
    DuplicateFlag(String),
    #[error("could not read file {path}: {source}")]
    FileRead { path: PathBuf, source: std::io::Error },
}

#[derive(Serialize)]
struct CompileSummary {
    success: bool,
    files: Vec<String>,
    target: Option<String>,
}

fn main() {
    let raw_args: Vec<String> = std::env::args().collect();
    if let Err(error) = check_duplicate_flags(&raw_args) {
        eprintln!("error: {error}");
        exit(2);
    }

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let exit_code = match cli.command {
        Command::Compile(args) => run_compile(args),
    };
    exit(exit_code);
}

/// Rejects a repeated `--target` or `--report` flag. `clap` silently keeps
/// the last occurrence of a single-valued option, which would hide a typo'd
/// retry of the same flag; this catches it before `Cli::parse` runs.
fn check_duplicate_flags(raw_args: &[String]) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    for arg in raw_args.iter().skip(1) {
        let Some(flag) = arg.strip_prefix("--") else { continue };
        let name = flag.split('=').next().unwrap_or(flag);
        if matches!(name, "target" | "report") && !seen.insert(name.to_string()) {
            return Err(CliError::DuplicateFlag(name.to_string()));
        }
    }
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Error)
        .set_thread_mode(ThreadLogMode::Both)
        .set_level_padding(LevelPadding::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    CombinedLogger::init(vec![TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)]).unwrap();
}

/// Module name a source file is registered under: its final path segment
/// with a `.cap` extension stripped.
fn module_name(path: &PathBuf) -> String {
    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    file_name.strip_suffix(".cap").unwrap_or(file_name).to_string()
}

fn run_compile(args: CompileArgs) -> i32 {
    if args.files.is_empty() {
        eprintln!("error: `caplinc compile` requires at least one source file");
        return 2;
    }

    let mut states = Vec::new();
    for path in &args.files {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) => {
                let error = CliError::FileRead { path: path.clone(), source };
                eprintln!("error: {error}");
                return 2;
            }
        };
        states.push(State::new(SourceFile::new(vec![module_name(path)], content)));
    }

    let mut asts = Vec::new();
    for state in &states {
        match process_code(state) {
            Ok(ast) => asts.push(ast.into()),
            Err(error) => {
                report(error, args.report);
                return 1;
            }
        }
    }

    match process_ast(asts) {
        Ok(_tir_context) => {
            report_success(&args);
            0
        }
        Err(error) => {
            report(error, args.report);
            1
        }
    }
}

fn report(error: caplin_core::tir::TirError, format: ReportFormat) {
    match format {
        ReportFormat::Plain => CodeSpanReportGenerator::generate(error),
        ReportFormat::Json => JsonReportGenerator::generate(error),
    }
}

fn report_success(args: &CompileArgs) {
    match args.report {
        ReportFormat::Plain => println!("Compilation successful!"),
        ReportFormat::Json => {
            let summary = CompileSummary {
                success: true,
                files: args.files.iter().map(|path| path.display().to_string()).collect(),
                target: args.target.clone(),
            };
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{json}"),
                Err(error) => eprintln!("failed to serialize summary: {error}"),
            }
        }
    }
}
