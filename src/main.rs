use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use lss::analyzer::{GroupAnalyzer, LssAnalyzer};
use lss::config::{Settings, TextEncoding, TokenizerBackend, VocabSize};

/// LSS: Latent semantic similarity scoring for small-group dialogue.
///
/// Loads a word-embedding model, builds one mean semantic vector per
/// speaker from their combined turns, and scores every pair of speakers
/// in a group by cosine similarity.
#[derive(Parser)]
#[command(name = "lss", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe an embedding model file and report its shape
    Inspect {
        /// Path to the embedding model file
        model: PathBuf,

        /// Text encoding of the model file (utf-8 or latin-1)
        #[arg(long)]
        encoding: Option<TextEncoding>,

        /// Write the probed shape to a settings file for later --settings use
        #[arg(long)]
        save_settings: Option<PathBuf>,
    },

    /// Score every speaker pair in each group of a groups file
    Score {
        /// Path to the groups JSON file
        groups: PathBuf,

        /// Path to the embedding model file
        #[arg(long)]
        model: Option<PathBuf>,

        /// Text encoding of the model file (utf-8 or latin-1)
        #[arg(long)]
        encoding: Option<TextEncoding>,

        /// Declared vocabulary size (row count, or "unknown" to count rows)
        #[arg(long)]
        vocab_size: Option<VocabSize>,

        /// Declared vector dimension
        #[arg(long)]
        vector_dim: Option<usize>,

        /// Tokenizer backend (word or whitespace)
        #[arg(long)]
        tokenizer: Option<TokenizerBackend>,

        /// Settings file to use instead of environment variables
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Write all pair rows to this CSV file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of groups to score in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lss=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            model,
            encoding,
            save_settings,
        } => {
            let base = Settings::from_env()?;
            let encoding = encoding.unwrap_or(base.encoding);

            println!("Inspecting model: {}", model.display());

            let metadata = fs::metadata(&model)
                .with_context(|| format!("Failed to read model file {}", model.display()))?;
            println!("  Size:       {}", human_size(metadata.len()));
            if let Ok(modified) = metadata.modified() {
                let modified: DateTime<Local> = modified.into();
                println!("  Modified:   {}", modified.format("%Y-%m-%d %H:%M"));
            }
            println!("  Encoding:   {}", encoding.name());

            let shape = lss::model::probe(&model, encoding)?;
            if shape.has_header {
                println!("  Header:     present");
            } else {
                println!("  Header:     none (shape inferred from the first data line)");
            }
            println!("  Vocabulary: {}", shape.vocab);
            println!("  Dimensions: {}", shape.dimension);

            if let Some(path) = save_settings {
                let settings = Settings {
                    model_path: Some(model),
                    encoding,
                    vocab_size: Some(shape.vocab),
                    vector_dim: Some(shape.dimension),
                    tokenizer: base.tokenizer,
                };
                settings.save(&path)?;
                println!(
                    "\n{}",
                    format!("Settings saved to: {}", path.display()).bold()
                );
                println!(
                    "{}",
                    format!("Run: lss score <groups.json> --settings {}", path.display()).dimmed()
                );
            }
        }

        Commands::Score {
            groups,
            model,
            encoding,
            vocab_size,
            vector_dim,
            tokenizer,
            settings,
            out,
            concurrency,
        } => {
            // Settings file (when given) replaces the environment baseline;
            // explicit flags win over both.
            let mut settings = match settings {
                Some(ref path) => Settings::from_file(path)?,
                None => Settings::from_env()?,
            };
            if let Some(path) = model {
                settings.model_path = Some(path);
            }
            if let Some(value) = encoding {
                settings.encoding = value;
            }
            if let Some(value) = vocab_size {
                settings.vocab_size = Some(value);
            }
            if let Some(value) = vector_dim {
                if value == 0 {
                    anyhow::bail!("--vector-dim must be at least 1");
                }
                settings.vector_dim = Some(value);
            }
            if let Some(value) = tokenizer {
                settings.tokenizer = value;
            }
            let model_path = settings.require_model()?.to_path_buf();

            let group_list = lss::group::read_groups(&groups)?;
            if group_list.is_empty() {
                println!("No groups found in {}.", groups.display());
                return Ok(());
            }

            println!("Loading embedding model: {}", model_path.display());

            let mut analyzer = LssAnalyzer::new(settings);
            analyzer.initialize()?;
            let analyzer = Arc::new(analyzer);

            let results =
                lss::pipeline::run(analyzer.clone(), group_list, concurrency as usize).await?;

            for result in &results {
                lss::output::terminal::display_group(result);
            }
            lss::output::terminal::display_summary(&results);

            if let Some(out_path) = out {
                lss::output::csv::write_results(&out_path, &results)?;
                println!(
                    "\n{}",
                    format!("Pair-score table saved to: {}", out_path.display()).bold()
                );
            }

            // The pipeline has joined every scoring task by now, so this is
            // the last reference and the model can be released explicitly.
            if let Ok(mut analyzer) = Arc::try_unwrap(analyzer) {
                analyzer.shutdown();
            }
        }
    }

    Ok(())
}

/// Format a byte count for display (binary units, one decimal).
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
