//! Ghost library crate
//!
//! This crate provides the core functionality for the `ghost` CLI. Running the
//! binary with no subcommand executes the Ghost Protocol: it prints a fixed
//! refusal banner and exits with status 1. The `demo` subcommand runs the
//! offline traffic generator through a session and prints the resulting
//! statistics and topology.
//!
//! Modules:
//!
//! - `banner` — the refusal banner and its writer.
//! - `traffic` — packet, device and system types plus the packet filter.
//! - `session` — rolling packet log and cumulative counters.
//! - `devices` — device registry with block toggling.
//! - `topology` — node/link graph from recent packets.
//! - `demo` — offline traffic generator.
//! - `report` — demo run and its human / JSON output.
//!
//! Library functions never print or exit on their own; only `run()` does.

pub mod banner;
pub mod demo;
pub mod devices;
pub mod error;
pub mod report;
pub mod session;
pub mod topology;
pub mod traffic;

use std::io::IsTerminal;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use termcolor::StandardStream;
use tracing::Level;

use crate::banner::ghost_protocol;
use crate::error::Result;
use crate::report::{DemoOptions, run_demo, write_human, write_json};

/// Top-level CLI types and runner. Keep `main.rs` thin.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// When to use colored output
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the offline traffic demo and print session statistics
    Demo {
        /// Number of polls to simulate
        #[arg(short = 'n', long = "batches", default_value_t = 5usize)]
        batches: usize,

        /// Seed for reproducible output
        #[arg(long = "seed")]
        seed: Option<u64>,

        /// Only show packets matching this text (ip, protocol, info, process)
        #[arg(long = "filter", default_value = "")]
        filter: String,

        /// Only show attack packets
        #[arg(long = "attacks-only", action = ArgAction::SetTrue)]
        attacks_only: bool,

        /// Toggle the block state of a device by IP (repeatable)
        #[arg(long = "block", value_name = "IP")]
        block: Vec<String>,

        /// Clear the packet log and counters after this many polls
        #[arg(long = "clear-after", value_name = "N")]
        clear_after: Option<usize>,

        /// Output format
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for termcolor::ColorChoice {
    fn from(c: ColorChoice) -> Self {
        match c {
            ColorChoice::Auto => termcolor::ColorChoice::Auto,
            ColorChoice::Always => termcolor::ColorChoice::Always,
            ColorChoice::Never => termcolor::ColorChoice::Never,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the stderr log subscriber. Safe to call more than once.
fn init_logging(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn resolve_color(choice: ColorChoice) -> termcolor::ColorChoice {
    // termcolor's Auto only looks at TERM/NO_COLOR, not at whether stdout is a tty.
    match choice {
        ColorChoice::Auto if !std::io::stdout().is_terminal() => termcolor::ColorChoice::Never,
        other => other.into(),
    }
}

fn run_demo_command(
    opts: &DemoOptions,
    format: OutputFormat,
    color: termcolor::ColorChoice,
) -> Result<()> {
    let report = run_demo(opts)?;
    match format {
        OutputFormat::Json => write_json(&mut std::io::stdout().lock(), &report),
        OutputFormat::Human => write_human(&mut StandardStream::stdout(color), &report),
    }
}

/// Run the Ghost CLI and return the process exit code.
///
/// - no subcommand — print the Ghost Protocol banner; always returns `1`.
/// - arguments clap rejects — the parse error goes to stderr, then the banner
///   is shown and `1` is returned as well. `--help` and `--version` exit 0.
/// - `demo` — run the offline traffic demo; returns `0`, or `1` with an
///   `error:` line on stderr if it fails.
///
/// Example:
///
/// ```no_run
/// std::process::exit(ghost_lib::run()); // called from src/main.rs
/// ```
pub fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                init_logging(0);
                return ghost_protocol(resolve_color(ColorChoice::Auto));
            }
        },
    };
    init_logging(cli.verbose);
    let color = resolve_color(cli.color);

    match cli.command {
        None => ghost_protocol(color),
        Some(Commands::Demo {
            batches,
            seed,
            filter,
            attacks_only,
            block,
            clear_after,
            format,
        }) => {
            let opts = DemoOptions {
                batches,
                seed,
                filter,
                attacks_only,
                block,
                clear_after,
            };
            match run_demo_command(&opts, format, color) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("error: {}", e);
                    1
                }
            }
        }
    }
}
