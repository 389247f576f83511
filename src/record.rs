// src/record.rs

use serde::Deserialize;

/// One corpus entry: a function definition plus its qualified name.
///
/// Field names follow the CodeSearchNet JSON Lines layout; any other columns
/// in the data are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// Full definition including signature and body.
    #[serde(rename = "code")]
    pub raw_code: String,
    /// Function name, possibly prefixed with `Class.` or `package.Class.`.
    #[serde(rename = "func_name")]
    pub qualified_name: String,
    /// Pre-tokenized form of `raw_code`, when the corpus provides one.
    #[serde(default)]
    pub code_tokens: Option<Vec<String>>,
}

impl Record {
    pub fn new(raw_code: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self {
            raw_code: raw_code.into(),
            qualified_name: qualified_name.into(),
            code_tokens: None,
        }
    }

    pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.code_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }
}
