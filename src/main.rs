// src/main.rs
//! Converts a CodeSearchNet split into OpenNMT-style source/target files for
//! function name suggestion.
//!
//! ```bash
//! fn-name-pairs --data-dir java/final/jsonl/valid --newline '\n' --token-level-targets
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use fn_name_pairs::config::{DEFAULT_SOURCE_TEMPLATE, DEFAULT_TARGET_TEMPLATE};
use fn_name_pairs::extract::DEFAULT_NEWLINE_REPLACEMENT;
use fn_name_pairs::identifier::DEFAULT_CACHE_CAPACITY;
use fn_name_pairs::{BraceMode, EmitConfig, RunConfig, SourceGranularity, TargetGranularity};

#[derive(Parser)]
#[command(name = "fn-name-pairs")]
#[command(about = "Extract function body / name pairs from a CodeSearchNet split")]
#[command(version)]
struct Cli {
    /// Path to the unzipped input data (one CodeSearchNet split)
    #[arg(long, default_value = "java/final/jsonl/test")]
    data_dir: PathBuf,

    /// Replace newlines in function bodies with this
    #[arg(long, default_value = DEFAULT_NEWLINE_REPLACEMENT)]
    newline: String,

    /// Use language-specific code tokens as sources instead of the body text
    #[arg(long)]
    token_level_sources: bool,

    /// Split targets on camelCase and snake_case instead of using words or chars
    #[arg(long, conflicts_with = "word_level_targets")]
    token_level_targets: bool,

    /// Use whole function names as targets instead of chars
    #[arg(long)]
    word_level_targets: bool,

    /// Source file template, `%s` is replaced by the split name
    #[arg(long, default_value = DEFAULT_SOURCE_TEMPLATE)]
    src_file: String,

    /// Target file template, `%s` is replaced by the split name
    #[arg(long, default_value = DEFAULT_TARGET_TEMPLATE)]
    tgt_file: String,

    /// Print a data preview to stdout instead of writing files
    #[arg(long)]
    print: bool,

    /// End bodies at the matching brace instead of the last brace of the record
    #[arg(long)]
    balanced_braces: bool,

    /// Number of identifiers kept in the sub-word cache (0 disables it)
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let source = if self.token_level_sources {
            SourceGranularity::Tokens
        } else {
            SourceGranularity::Body
        };
        let target = if self.word_level_targets {
            TargetGranularity::Word
        } else if self.token_level_targets {
            TargetGranularity::SubWord
        } else {
            TargetGranularity::Char
        };
        let brace_mode = if self.balanced_braces {
            BraceMode::Balanced
        } else {
            BraceMode::LastBrace
        };

        RunConfig {
            data_dir: self.data_dir,
            newline_repl: self.newline,
            emit: EmitConfig { source, target },
            brace_mode,
            cache_capacity: self.cache_capacity,
            source_template: self.src_file,
            target_template: self.tgt_file,
            preview: self.print,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for --print
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Cli::parse().into_config();
    let stats = fn_name_pairs::run(&config)
        .with_context(|| format!("failed to process {}", config.data_dir.display()))?;

    if stats.skipped() > 0 {
        tracing::info!(
            skipped = stats.skipped(),
            "records without a usable name/body pair were left out"
        );
    }
    Ok(())
}
