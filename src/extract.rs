// src/extract.rs
//! Recovers a bare function body from a corpus record.
//!
//! The default policy is deliberately shallow: the body runs from the first `{`
//! after the function name to the *last* `}` of the record, with no depth
//! tracking. Corpora prepared with this rule depend on its exact output, so the
//! depth-aware variant is only available through [`BraceMode::Balanced`].

use crate::record::Record;

/// The two-character escape used in place of line feeds unless told otherwise.
pub const DEFAULT_NEWLINE_REPLACEMENT: &str = "\\n";

/// How the end of a function body is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BraceMode {
    /// Body ends at the rightmost `}` of the whole record.
    #[default]
    LastBrace,
    /// Body ends at the `}` closing the opening brace. Braces inside string
    /// literals and comments are counted like any other.
    Balanced,
}

/// Name and body recovered from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPair {
    /// Qualified name with its class or namespace prefix removed.
    pub name: String,
    /// Body text, trimmed, with every line feed replaced.
    pub body: String,
    /// Code tokens between the body braces, when the record carries tokens
    /// and they can be aligned with `name`.
    pub body_tokens: Option<Vec<String>>,
}

/// Why a record produced no pair. None of these abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    NameNotFound,
    NoOpeningBrace,
    NoClosingBrace,
    EmptyName,
    EmptyBody,
}

impl SkipReason {
    /// True for records that were located fine but came out empty.
    pub fn is_degenerate(self) -> bool {
        matches!(self, Self::EmptyName | Self::EmptyBody)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Pair(ExtractedPair),
    Skip(SkipReason),
}

impl Extraction {
    pub fn pair(self) -> Option<ExtractedPair> {
        match self {
            Self::Pair(pair) => Some(pair),
            Self::Skip(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BodyExtractor {
    newline_repl: String,
    brace_mode: BraceMode,
}

impl Default for BodyExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_NEWLINE_REPLACEMENT)
    }
}

impl BodyExtractor {
    pub fn new(newline_repl: impl Into<String>) -> Self {
        Self {
            newline_repl: newline_repl.into(),
            brace_mode: BraceMode::default(),
        }
    }

    pub fn with_brace_mode(mut self, brace_mode: BraceMode) -> Self {
        self.brace_mode = brace_mode;
        self
    }

    pub fn extract(&self, record: &Record) -> Extraction {
        let name = short_name(&record.qualified_name);
        if name.is_empty() {
            return Extraction::Skip(SkipReason::EmptyName);
        }

        let raw = record.raw_code.as_str();
        let Some(name_start) = raw.find(name) else {
            return Extraction::Skip(SkipReason::NameNotFound);
        };
        let after_name = name_start + name.len();
        let Some(open) = raw[after_name..].find('{').map(|i| after_name + i) else {
            return Extraction::Skip(SkipReason::NoOpeningBrace);
        };
        let close = match self.brace_mode {
            BraceMode::LastBrace => raw.rfind('}'),
            BraceMode::Balanced => matching_close(raw, open),
        };
        let Some(close) = close else {
            return Extraction::Skip(SkipReason::NoClosingBrace);
        };

        // `{` is one byte, so `open + 1` is a char boundary. A last `}` sitting
        // before the opening brace leaves nothing in between.
        let body_start = open + 1;
        let sliced = if close > body_start {
            &raw[body_start..close]
        } else {
            ""
        };
        let body = sliced.trim();
        if body.is_empty() {
            return Extraction::Skip(SkipReason::EmptyBody);
        }

        let body_tokens = record
            .code_tokens
            .as_deref()
            .and_then(|tokens| body_tokens(tokens, name, self.brace_mode));

        Extraction::Pair(ExtractedPair {
            name: name.to_string(),
            body: body.replace('\n', &self.newline_repl),
            body_tokens,
        })
    }
}

/// Text after the last `.` of a qualified name, or the whole name.
pub fn short_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or(qualified_name, |(_, name)| name)
}

/// Byte offset of the `}` that closes the `{` at `open`.
fn matching_close(raw: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in raw[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Token-level body: skip the name and the token right after it (the opening
/// parenthesis), then take everything between the next `{` and the final token.
fn body_tokens(tokens: &[String], name: &str, brace_mode: BraceMode) -> Option<Vec<String>> {
    let name_idx = tokens.iter().position(|t| t == name)?;
    let rest = tokens.get(name_idx + 2..)?;
    let open = rest.iter().position(|t| t == "{")?;
    let start = open + 1;

    let end = match brace_mode {
        BraceMode::LastBrace => rest.len() - 1,
        BraceMode::Balanced => {
            let mut depth = 0usize;
            let mut close = None;
            for (i, token) in rest.iter().enumerate().skip(open) {
                match token.as_str() {
                    "{" => depth += 1,
                    "}" => {
                        depth -= 1;
                        if depth == 0 {
                            close = Some(i);
                            break;
                        }
                    }
                    _ => {}
                }
            }
            close?
        }
    };

    if start >= end {
        return Some(Vec::new());
    }
    Some(rest[start..end].to_vec())
}
