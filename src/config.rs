// src/config.rs
//! Run configuration resolved from the command line.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::emit::EmitConfig;
use crate::extract::{BodyExtractor, BraceMode, DEFAULT_NEWLINE_REPLACEMENT};
use crate::identifier::DEFAULT_CACHE_CAPACITY;

pub const DEFAULT_SOURCE_TEMPLATE: &str = "src-%s.txt";
pub const DEFAULT_TARGET_TEMPLATE: &str = "tgt-%s.txt";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new("%[s%]").expect("valid placeholder regex"));

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub newline_repl: String,
    pub emit: EmitConfig,
    pub brace_mode: BraceMode,
    pub cache_capacity: usize,
    pub source_template: String,
    pub target_template: String,
    /// Print a preview instead of writing the two files.
    pub preview: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("java/final/jsonl/test"),
            newline_repl: DEFAULT_NEWLINE_REPLACEMENT.to_string(),
            emit: EmitConfig::default(),
            brace_mode: BraceMode::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            source_template: DEFAULT_SOURCE_TEMPLATE.to_string(),
            target_template: DEFAULT_TARGET_TEMPLATE.to_string(),
            preview: false,
        }
    }
}

impl RunConfig {
    pub fn extractor(&self) -> BodyExtractor {
        BodyExtractor::new(self.newline_repl.clone()).with_brace_mode(self.brace_mode)
    }

    /// Paths of the source and target files for a split.
    pub fn output_paths(&self, split_name: &str) -> (PathBuf, PathBuf) {
        (
            PathBuf::from(render_template(&self.source_template, split_name)),
            PathBuf::from(render_template(&self.target_template, split_name)),
        )
    }
}

/// Substitutes `%s` with `split_name` and `%%` with `%`; everything else is literal.
pub fn render_template(template: &str, split_name: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[0] {
            "%%" => "%".to_string(),
            _ => split_name.to_string(),
        })
        .into_owned()
}
