use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use prep::{Overrides, PrepConfig};
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "prep")]
#[command(about = "Tokenize and split a movie-summary corpus for word-embedding models")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "prep.toml")]
    config: PathBuf,

    /// Verbosity level (overrides the config file)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize text and print the tokens as JSON
    Tokenize {
        /// Text to tokenize ("-" reads stdin)
        text: String,

        /// Print token kinds alongside the text
        #[arg(long, default_value_t = false)]
        kinds: bool,
    },
    /// Split the corpus into train/test sets and tokenize every summary
    Split {
        /// CSV corpus (title,summary,score)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// GloVe text file used for the coverage report
        #[arg(long)]
        embeddings: Option<PathBuf>,

        /// Seed for a reproducible split
        #[arg(long)]
        seed: Option<u64>,

        /// Share of records held out for testing
        #[arg(long)]
        test_fraction: Option<f64>,

        /// Print every token sequence instead of the summary
        #[arg(long, default_value_t = false)]
        tokens: bool,
    },
}

/// Tokenize everything `input` yields; invalid UTF-8 is an error.
fn read_tokens<R: Read>(mut input: R) -> Result<Vec<prep::Token>> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;
    Ok(tokenize::tokenize_bytes(&buf)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = PrepConfig::load_or_default(&cli.config)?;

    // Setup logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    debug!(config = %cli.config.display(), "configuration loaded");

    match cli.command {
        Commands::Tokenize { text, kinds } => {
            let tokens = if text == "-" {
                read_tokens(std::io::stdin().lock())?
            } else {
                tokenize::tokenize(&text)
            };
            let output = if kinds {
                serde_json::to_string(&tokens)?
            } else {
                let texts: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
                serde_json::to_string(&texts)?
            };
            println!("{output}");
        }
        Commands::Split {
            corpus,
            embeddings,
            seed,
            test_fraction,
            tokens,
        } => {
            config.apply_overrides(Overrides {
                corpus,
                embeddings,
                seed,
                test_fraction,
            });

            let outcome = prep::run(&config)?;
            let output = if tokens {
                serde_json::to_string_pretty(&outcome.prepared)?
            } else {
                serde_json::to_string_pretty(&outcome.report)?
            };
            println!("{output}");
        }
    }

    Ok(())
}
