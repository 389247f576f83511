// src/error.rs
//! Fatal errors of a run. Per-record problems are not errors, see [`crate::extract::SkipReason`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PairsError {
    #[error("could not find data files under {}", path.display())]
    NoDataFiles { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record in {} at line {line}: {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl PairsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PairsError>;
