use std::io::IsTerminal;
use std::process;

use anyhow::{Context, Result};
use cidrcalc_cidr::{Cidr, ErrorKind, Report};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::{debug, Level};

/// Show mask, host range, broadcast address and host count for an IPv4 CIDR
#[derive(Parser, Debug)]
#[command(name = "cidrcalc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// IPv4 address in CIDR notation (e.g., 10.9.19.101/23)
    #[arg(value_name = "ADDRESS/MASK")]
    cidr: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Aligned text, one line per address
    Human,
    /// JSON output (pretty-printed)
    Json,
}

fn main() -> Result<()> {
    let program = program_name();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                err.exit()
            }
            _ => usage(&program),
        },
    };

    init_logging(cli.verbose);
    debug!(input = %cli.cidr, format = ?cli.output, "analyzing");

    let cidr = match Cidr::parse(&cli.cidr) {
        Ok(cidr) => cidr,
        Err(err) if err.kind() == ErrorKind::Usage => {
            debug!(%err, "input rejected by shape check");
            println!("error - argument must be an IPv4 address in CIDR notation");
            usage(&program)
        }
        Err(err) => {
            return Err(err).with_context(|| format!("cannot analyze {}", cli.cidr));
        }
    };

    let report = Report::new(&cidr);
    match cli.output {
        OutputFormat::Human => print_human(&report)?,
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}

fn program_name() -> String {
    std::env::args()
        .next()
        .unwrap_or_else(|| "cidrcalc".to_string())
}

fn usage(program: &str) -> ! {
    println!("Usage: {} ADDRESS/MASK", program);
    println!("Example: {} 10.9.19.101/23", program);
    process::exit(1);
}

/// Diagnostics go to stderr so stdout carries only the report
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_human(report: &Report) -> Result<()> {
    colored::control::set_override(std::io::stdout().is_terminal());

    let mut out = String::new();
    report.write_lines(&mut out, |label| label.bold().to_string())?;
    print!("{}", out);
    Ok(())
}

fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&report.summary())?);
    Ok(())
}
