//! textscrub CLI - sentence cleaning and deduplication tool
//!
//! Reads sentences (one per line) from a file or stdin, repairs extraction
//! artifacts, and collapses duplicates.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use textscrub::{normalize_text_strong, PolarityLexicon, Textscrub};

/// Clean and deduplicate OCR/PDF-extracted sentences
#[derive(Parser)]
#[command(
    name = "textscrub",
    version,
    about = "Clean and deduplicate OCR/PDF-extracted sentences",
    long_about = "textscrub - deterministic cleanup for extracted textbook text.\n\n\
                  Repairs ligatures, hyphenated line wraps, and stray glyphs, and\n\
                  collapses duplicate sentences without ever collapsing pairs that\n\
                  are lexically similar but semantically opposed.\n\n\
                  Usage:\n  \
                  textscrub normalize <file>      Repair extraction artifacts\n  \
                  textscrub dedupe <file>         Deduplicate sentences (one per line)\n  \
                  textscrub stats <file>          Report corpus statistics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Repair extraction artifacts in text
    Normalize {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Deduplicate sentences (one per line)
    Dedupe {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Near-duplicate Jaccard threshold (default: 0.92)
        #[arg(long)]
        jaccard: Option<f64>,

        /// Drop light stopwords from the comparison form
        #[arg(long)]
        stopwords: bool,

        /// Compare raw text (skip the strong normalization pre-pass)
        #[arg(long)]
        raw: bool,

        /// Polarity lexicon JSON file for the flip guard
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Output a JSON array instead of lines
        #[arg(long)]
        json: bool,
    },

    /// Show corpus statistics
    Stats {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Math-density cutoff (default: 0.30)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show version information
    Version,
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
        Commands::Normalize { input, output } => {
            let text = read_input(input.as_ref())?;

            let pb = create_spinner("Normalizing...");
            let cleaned: Vec<String> = text.lines().map(normalize_text_strong).collect();
            pb.finish_and_clear();

            write_output(output.as_ref(), &cleaned.join("\n"))?;

            if let Some(path) = output {
                println!(
                    "{} Normalized {} lines: {}",
                    "✓".green().bold(),
                    cleaned.len(),
                    path.display()
                );
            }
        }

        Commands::Dedupe {
            input,
            output,
            jaccard,
            stopwords,
            raw,
            lexicon,
            json,
        } => {
            let text = read_input(input.as_ref())?;
            let sentences: Vec<String> = text.lines().map(str::to_string).collect();

            let mut scrub = Textscrub::from_env().with_stopword_removal(stopwords);
            if let Some(threshold) = jaccard {
                scrub = scrub.with_jaccard(threshold);
            }
            if raw {
                scrub = scrub.without_strong_normalize();
            }
            if let Some(path) = lexicon {
                scrub = scrub.with_lexicon(PolarityLexicon::from_path(path)?);
            }

            let pb = create_spinner("Deduplicating...");
            let deduped = scrub.dedupe(&sentences);
            pb.finish_and_clear();

            let rendered = if json {
                serde_json::to_string_pretty(&deduped)?
            } else {
                deduped.join("\n")
            };
            write_output(output.as_ref(), &rendered)?;

            if let Some(path) = output {
                println!(
                    "{} Kept {} of {} sentences: {}",
                    "✓".green().bold(),
                    deduped.len(),
                    sentences.len(),
                    path.display()
                );
            }
        }

        Commands::Stats { input, threshold } => {
            let text = read_input(input.as_ref())?;
            let sentences: Vec<String> = text
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect();

            let mut scrub = Textscrub::from_env();
            if let Some(cutoff) = threshold {
                scrub = scrub.with_math_threshold(cutoff);
            }

            let pb = create_spinner("Analyzing corpus...");
            let deduped = scrub.dedupe(&sentences);
            let math_heavy = sentences.iter().filter(|s| scrub.is_math_heavy(s)).count();
            let word_count: usize = sentences.iter().map(|s| s.split_whitespace().count()).sum();
            pb.finish_and_clear();

            println!("{}", "Corpus Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Sentences".bold(), sentences.len());
            println!("{}: {}", "Words".bold(), word_count);
            println!("{}: {}", "After dedupe".bold(), deduped.len());
            println!(
                "{}: {}",
                "Duplicates removed".bold(),
                sentences.len() - deduped.len()
            );
            println!("{}: {}", "Math-heavy".bold(), math_heavy);
            println!(
                "{}: {:.2}",
                "Jaccard threshold".bold(),
                scrub.config().near_dupe_jaccard
            );
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!(
        "{} {}",
        "textscrub".green().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Deterministic cleanup and dedupe for OCR/PDF-extracted sentences");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_input(path: Option<&PathBuf>) -> Result<String, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(fs::read_to_string(p)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
