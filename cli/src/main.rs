//! stylemark CLI - styled text markup tool
//!
//! Encodes styled text models (JSON) to markup and decodes markup back.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use stylemark::{AttributeSet, ReadOptions, ReadReport, StyledText, Stylemark, WriteOptions};

/// Styled text to markup and back
#[derive(Parser)]
#[command(
    name = "stylemark",
    version,
    about = "Convert between styled text and inline-styled HTML markup",
    long_about = "stylemark - styled text <-> HTML markup codec.\n\n\
                  Usage:\n  \
                  stylemark encode <model.json>      Encode a JSON model to markup\n  \
                  stylemark decode <markup.html>     Decode markup to text or JSON\n  \
                  stylemark check <markup.html>      Report problems in markup\n\n\
                  Use '-' as the input path to read from stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a styled text model (JSON) to markup
    Encode {
        /// Input model path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit plain CSS without -x-* vendor declarations
        #[arg(long)]
        plain_css: bool,
    },

    /// Decode markup to plain text or a JSON model
    Decode {
        /// Input markup path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Ignore <br> elements
        #[arg(long)]
        no_line_breaks: bool,
    },

    /// Decode markup and report skipped or repaired constructs
    Check {
        /// Input markup path
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Decode output format
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Plain text only
    Text,
    /// Styled text model as JSON
    Json,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Encode {
            input,
            output,
            plain_css,
        } => {
            let model = StyledText::from_json(&read_input(&input)?)?;
            let mut options = WriteOptions::new();
            if plain_css {
                options = options.without_vendor_extensions();
            }
            let markup = Stylemark::new().with_write_options(options).encode(&model);
            write_output(output.as_ref(), &markup)?;
        }

        Commands::Decode {
            input,
            output,
            format,
            no_line_breaks,
        } => {
            let mut options = ReadOptions::new();
            if no_line_breaks {
                options = options.without_line_breaks();
            }
            let codec = Stylemark::new().with_read_options(options);
            let text = codec.decode(&read_input(&input)?, &AttributeSet::new());

            let rendered = match format {
                OutputFormat::Text => text.into_string(),
                OutputFormat::Json => text.to_json()?,
            };
            write_output(output.as_ref(), &rendered)?;
        }

        Commands::Check { input, json } => {
            let (_, report) =
                Stylemark::new().decode_with_report(&read_input(&input)?, &AttributeSet::new());
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&input, &report);
            }
            if !report.is_clean() {
                std::process::exit(2);
            }
        }

        Commands::Version => {
            println!("{} {}", "stylemark".green().bold(), env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn print_report(input: &Path, report: &ReadReport) {
    if report.is_clean() {
        println!("{} {}: no problems found", "✓".green().bold(), input.display());
        return;
    }

    println!("{}", "Decode Report".cyan().bold());
    println!("{}", "─".repeat(40));
    for (label, count) in [
        ("Malformed tags", report.malformed_tags),
        ("Orphan close tags", report.orphan_close_tags),
        ("Unclosed elements", report.unclosed_elements),
        ("Unknown elements", report.unknown_elements),
        ("Unknown entities", report.unknown_entities),
        ("Unknown properties", report.unknown_properties),
        ("Dropped declarations", report.dropped_declarations),
        ("Invalid links", report.invalid_links),
        ("Flattened elements", report.flattened_elements),
    ] {
        if count > 0 {
            println!("{}: {}", label.bold(), count.to_string().yellow());
        }
    }
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Total".bold(), report.total());
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        fs::read_to_string(path)
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
