// src/loader.rs
//! Loads one corpus split (a directory of gzipped JSON Lines files) into memory.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use flate2::read::GzDecoder;
use rayon::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{PairsError, Result};
use crate::record::Record;

/// All records of one split, in file order then line order.
#[derive(Debug, Clone, Default)]
pub struct CorpusSplit {
    /// Last component of the split directory, e.g. `valid`.
    pub name: String,
    pub records: Vec<Record>,
    pub file_count: usize,
}

impl CorpusSplit {
    pub fn load(dir: &Path) -> Result<Self> {
        let files = find_data_files(dir)?;
        info!("Total number of files: {}", files.len());
        if files.is_empty() {
            return Err(PairsError::NoDataFiles {
                path: dir.to_path_buf(),
            });
        }

        let start = Instant::now();
        // rayon's indexed collect keeps the sorted file order
        let per_file: Vec<Vec<Record>> = files
            .par_iter()
            .map(|path| load_gz_file(path))
            .collect::<Result<_>>()?;
        let records: Vec<Record> = per_file.into_iter().flatten().collect();
        info!(
            "Loading took {:.2}s for {} rows",
            start.elapsed().as_secs_f64(),
            records.len()
        );

        Ok(Self {
            name: split_name(dir),
            records,
            file_count: files.len(),
        })
    }
}

/// Final path component of `dir`, or an empty string when there is none.
pub fn split_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Every `*.gz` file below `dir`, sorted by path.
pub fn find_data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            PairsError::io(path, e.into())
        })?;
        let is_gz = entry.path().extension().is_some_and(|ext| ext == "gz");
        if entry.file_type().is_file() && is_gz {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn load_gz_file(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| PairsError::io(path, e))?;
    let records = read_records(GzDecoder::new(file), path)?;
    debug!(path = %path.display(), rows = records.len(), "loaded data file");
    Ok(records)
}

/// Parses JSON Lines records from an uncompressed reader. `origin` only labels errors.
pub fn read_records<R: Read>(reader: R, origin: &Path) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| PairsError::io(origin, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| PairsError::Json {
            path: origin.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
