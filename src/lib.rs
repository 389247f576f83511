// src/lib.rs
//! Function body / function name pairs for sequence-to-sequence training.
//!
//! A corpus split is loaded into memory ([`loader`]), each record's body is cut
//! out of its definition ([`extract`]), the name is optionally split into
//! sub-words ([`identifier`]) and both sides are written as two line-aligned
//! text files ([`emit`]).

pub mod cache;
pub mod char_class;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod identifier;
pub mod loader;
pub mod record;

use std::fs::File;
use std::io::{self, BufWriter};

use tracing::info;

pub use config::RunConfig;
pub use emit::{
    EmitConfig, EmitStats, PairEmitter, SourceGranularity, Stream, StreamError, TargetGranularity,
};
pub use error::{PairsError, Result};
pub use extract::{BodyExtractor, BraceMode, ExtractedPair, Extraction, SkipReason};
pub use identifier::{split_identifier_into_parts, IdentifierTokenizer};
pub use loader::CorpusSplit;
pub use record::Record;

/// Loads the configured split and writes (or previews) its pairs.
///
/// Nothing is created on disk unless at least one data file was found.
pub fn run(config: &RunConfig) -> Result<EmitStats> {
    let split = CorpusSplit::load(&config.data_dir)?;
    let mut emitter = PairEmitter::with_tokenizer(
        config.extractor(),
        IdentifierTokenizer::with_capacity(config.cache_capacity),
        config.emit,
    );

    if config.preview {
        let stdout = io::stdout();
        return emitter
            .preview(&split.records, stdout.lock())
            .map_err(|e| PairsError::io("<stdout>", e));
    }

    let (source_path, target_path) = config.output_paths(&split.name);
    let source = File::create(&source_path).map_err(|e| PairsError::io(&source_path, e))?;
    let target = File::create(&target_path).map_err(|e| PairsError::io(&target_path, e))?;
    let stats = emitter
        .write_to(&split.records, BufWriter::new(source), BufWriter::new(target))
        .map_err(|e| {
            let path = match e.stream {
                Stream::Source => &source_path,
                Stream::Target => &target_path,
            };
            PairsError::io(path, e.error)
        })?;

    info!(
        source = %source_path.display(),
        target = %target_path.display(),
        lines = stats.emitted,
        "wrote pairs"
    );
    Ok(stats)
}
