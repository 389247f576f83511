// src/emit.rs
//! Renders extracted pairs into two index-aligned line streams.

use std::convert::Infallible;
use std::io::{self, Write};

use thiserror::Error;
use tracing::{info, trace};

use crate::extract::{BodyExtractor, Extraction};
use crate::identifier::IdentifierTokenizer;
use crate::record::Record;

/// Width of each column in preview output.
const PREVIEW_WIDTH: usize = 40;

/// What goes on a source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceGranularity {
    /// The newline-normalized body text.
    #[default]
    Body,
    /// Body tokens joined by spaces; records without tokens fall back to the body text.
    Tokens,
}

/// What goes on a target line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetGranularity {
    /// The function name as is.
    Word,
    /// Lower-cased sub-word tokens of the name joined by spaces.
    SubWord,
    /// Characters of the name joined by spaces.
    #[default]
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitConfig {
    pub source: SourceGranularity,
    pub target: TargetGranularity,
}

/// Aggregate counts of one emitting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitStats {
    pub records: usize,
    pub emitted: usize,
    /// Name or braces could not be located.
    pub unextractable: usize,
    /// Name or body came out empty.
    pub degenerate: usize,
}

impl EmitStats {
    pub fn skipped(&self) -> usize {
        self.unextractable + self.degenerate
    }
}

/// Which of the two output streams an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Source,
    Target,
}

#[derive(Error, Debug)]
#[error("failed writing the {stream:?} stream: {error}")]
pub struct StreamError {
    pub stream: Stream,
    #[source]
    pub error: io::Error,
}

impl StreamError {
    fn in_source(error: io::Error) -> Self {
        Self {
            stream: Stream::Source,
            error,
        }
    }

    fn in_target(error: io::Error) -> Self {
        Self {
            stream: Stream::Target,
            error,
        }
    }
}

/// Both streams held in memory; `source[i]` and `target[i]` come from the same record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmittedLines {
    pub source: Vec<String>,
    pub target: Vec<String>,
    pub stats: EmitStats,
}

pub struct PairEmitter {
    extractor: BodyExtractor,
    tokenizer: IdentifierTokenizer,
    config: EmitConfig,
}

impl PairEmitter {
    pub fn new(extractor: BodyExtractor, config: EmitConfig) -> Self {
        Self::with_tokenizer(extractor, IdentifierTokenizer::default(), config)
    }

    pub fn with_tokenizer(
        extractor: BodyExtractor,
        tokenizer: IdentifierTokenizer,
        config: EmitConfig,
    ) -> Self {
        Self {
            extractor,
            tokenizer,
            config,
        }
    }

    /// Collects both streams in memory.
    pub fn lines(&mut self, records: &[Record]) -> EmittedLines {
        let mut source = Vec::new();
        let mut target = Vec::new();
        let mut stats = EmitStats::default();
        let collected = self.for_each_pair(records, &mut stats, |src, tgt| {
            source.push(src.to_string());
            target.push(tgt.to_string());
            Ok::<(), Infallible>(())
        });
        match collected {
            Ok(()) => {}
            Err(never) => match never {},
        }
        log_stats(&stats);
        EmittedLines {
            source,
            target,
            stats,
        }
    }

    /// Writes one line per retained record to each writer.
    pub fn write_to<S: Write, T: Write>(
        &mut self,
        records: &[Record],
        mut source: S,
        mut target: T,
    ) -> Result<EmitStats, StreamError> {
        let mut stats = EmitStats::default();
        self.for_each_pair(records, &mut stats, |src, tgt| {
            writeln!(source, "{src}").map_err(StreamError::in_source)?;
            writeln!(target, "{tgt}").map_err(StreamError::in_target)
        })?;
        source.flush().map_err(StreamError::in_source)?;
        target.flush().map_err(StreamError::in_target)?;
        log_stats(&stats);
        Ok(stats)
    }

    /// Prints truncated `'target' - 'source'` rows instead of writing files.
    ///
    /// A closed reader (e.g. `| head`) ends the preview without an error; the
    /// stats then cover the records seen up to that point.
    pub fn preview<W: Write>(&mut self, records: &[Record], mut out: W) -> io::Result<EmitStats> {
        let mut stats = EmitStats::default();
        let result = self
            .for_each_pair(records, &mut stats, |src, tgt| {
                writeln!(
                    out,
                    "'{:width$}' - '{:width$}'",
                    truncate_chars(tgt, PREVIEW_WIDTH),
                    truncate_chars(src, PREVIEW_WIDTH),
                    width = PREVIEW_WIDTH
                )
            })
            .and_then(|()| out.flush());
        ignore_broken_pipe(result)?;
        log_stats(&stats);
        Ok(stats)
    }

    /// Feeds every retained pair to `sink`, counting into `stats` as it goes
    /// so the counts survive a sink error.
    fn for_each_pair<E, F>(
        &mut self,
        records: &[Record],
        stats: &mut EmitStats,
        mut sink: F,
    ) -> Result<(), E>
    where
        F: FnMut(&str, &str) -> Result<(), E>,
    {
        for (idx, record) in records.iter().enumerate() {
            stats.records += 1;
            let pair = match self.extractor.extract(record) {
                Extraction::Pair(pair) => pair,
                Extraction::Skip(reason) => {
                    trace!(record = idx, ?reason, "skipping record");
                    if reason.is_degenerate() {
                        stats.degenerate += 1;
                    } else {
                        stats.unextractable += 1;
                    }
                    continue;
                }
            };

            let source = match (self.config.source, &pair.body_tokens) {
                (SourceGranularity::Tokens, Some(tokens)) => tokens.join(" "),
                _ => pair.body.clone(),
            };
            let target = match self.config.target {
                TargetGranularity::Word => pair.name.clone(),
                TargetGranularity::SubWord => self.tokenizer.tokenize(&pair.name).join(" "),
                TargetGranularity::Char => join_chars(&pair.name),
            };

            sink(&source, &target)?;
            stats.emitted += 1;
        }
        Ok(())
    }
}

fn log_stats(stats: &EmitStats) {
    info!(
        records = stats.records,
        emitted = stats.emitted,
        unextractable = stats.unextractable,
        degenerate = stats.degenerate,
        "finished emitting pairs"
    );
}

fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn join_chars(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for (i, c) in s.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DEFAULT_NEWLINE_REPLACEMENT;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn emitter(source: SourceGranularity, target: TargetGranularity) -> PairEmitter {
        PairEmitter::new(
            BodyExtractor::new(DEFAULT_NEWLINE_REPLACEMENT),
            EmitConfig { source, target },
        )
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new("int getValue() {\n  return v;\n}", "Foo.getValue").with_tokens([
                "int", "getValue", "(", ")", "{", "return", "v", ";", "}",
            ]),
            Record::new("def broken(): pass", "broken"),
            Record::new("void XMLParser() {\n  a();\n  b();\n}", "pkg.XMLParser"),
            Record::new("void empty() { }", "empty"),
            Record::new("void bar() { return 1; }", "com.example.Foo.bar"),
        ]
    }

    #[test]
    fn char_targets_by_default() {
        let out = PairEmitter::new(BodyExtractor::default(), EmitConfig::default()).lines(&[
            Record::new("void bar() { return 1; }", "Foo.bar"),
        ]);
        assert_eq!(out.target, vec!["b a r"]);
        assert_eq!(out.source, vec!["return 1;"]);
    }

    #[test]
    fn word_and_subword_targets() {
        let records = sample();
        let words = emitter(SourceGranularity::Body, TargetGranularity::Word).lines(&records);
        assert_eq!(words.target, vec!["getValue", "XMLParser", "bar"]);

        let subwords = emitter(SourceGranularity::Body, TargetGranularity::SubWord).lines(&records);
        assert_eq!(subwords.target, vec!["get value", "xml parser", "bar"]);
        assert_eq!(
            subwords.source,
            vec!["return v;", "a();\\n  b();", "return 1;"]
        );
    }

    #[test]
    fn token_sources_fall_back_to_body_text() {
        let out = emitter(SourceGranularity::Tokens, TargetGranularity::Word).lines(&sample());
        assert_eq!(out.source, vec!["return v ;", "a();\\n  b();", "return 1;"]);
    }

    #[test]
    fn skips_are_counted_and_keep_streams_aligned() {
        let out = emitter(SourceGranularity::Body, TargetGranularity::Char).lines(&sample());
        assert_eq!(out.source.len(), out.target.len());
        assert_eq!(
            out.stats,
            EmitStats {
                records: 5,
                emitted: 3,
                unextractable: 1,
                degenerate: 1,
            }
        );
        assert_eq!(out.stats.skipped(), 2);
    }

    #[test]
    fn writes_aligned_lines() {
        let mut src = Vec::new();
        let mut tgt = Vec::new();
        let stats = emitter(SourceGranularity::Body, TargetGranularity::Word)
            .write_to(&sample(), &mut src, &mut tgt)
            .unwrap();
        assert_eq!(stats.emitted, 3);
        assert_eq!(
            String::from_utf8(src).unwrap(),
            "return v;\na();\\n  b();\nreturn 1;\n"
        );
        assert_eq!(String::from_utf8(tgt).unwrap(), "getValue\nXMLParser\nbar\n");
    }

    #[test]
    fn preview_truncates_and_pads() {
        let long_body = "x".repeat(50);
        let records = vec![Record::new(format!("void f() {{{long_body}}}"), "f")];
        let mut out = Vec::new();
        emitter(SourceGranularity::Body, TargetGranularity::Word)
            .preview(&records, &mut out)
            .unwrap();
        let expected = format!("'f{}' - '{}'\n", " ".repeat(39), "x".repeat(40));
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn preview_stops_quietly_on_closed_pipe() {
        let result = emitter(SourceGranularity::Body, TargetGranularity::Word)
            .preview(&sample(), ClosedPipe);
        assert!(result.is_ok());
    }

    /// Accepts `lines` complete lines, then reports a closed pipe.
    struct PipeClosingAfter {
        lines: usize,
        written: Vec<u8>,
    }

    impl Write for PipeClosingAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.lines == 0 {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            self.lines -= buf.iter().filter(|&&b| b == b'\n').count().min(self.lines);
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn preview_keeps_counts_seen_before_pipe_closed() {
        let mut out = PipeClosingAfter {
            lines: 1,
            written: Vec::new(),
        };
        let stats = emitter(SourceGranularity::Body, TargetGranularity::Word)
            .preview(&sample(), &mut out)
            .unwrap();
        // first pair printed, broken record skipped, third pair hit the closed pipe
        assert_eq!(
            stats,
            EmitStats {
                records: 3,
                emitted: 1,
                unextractable: 1,
                degenerate: 0,
            }
        );
        assert!(String::from_utf8(out.written).unwrap().starts_with("'getValue"));
    }

    struct Failing;

    impl Write for Failing {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_name_the_failing_stream() {
        let err = emitter(SourceGranularity::Body, TargetGranularity::Word)
            .write_to(&sample(), Vec::new(), Failing)
            .unwrap_err();
        assert_eq!(err.stream, Stream::Target);

        let err = emitter(SourceGranularity::Body, TargetGranularity::Word)
            .write_to(&sample(), Failing, Vec::new())
            .unwrap_err();
        assert_eq!(err.stream, Stream::Source);
    }

    #[test]
    fn helpers() {
        assert_eq!(join_chars("bar"), "b a r");
        assert_eq!(join_chars("é1"), "é 1");
        assert_eq!(join_chars(""), "");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        (
            "[a-zA-Z]{1,6}",
            prop_oneof![
                Just("void NAME() {\n  x();\n}".to_string()),
                Just("void NAME() { }".to_string()),
                Just("void other() { y(); }".to_string()),
                Just("NAME without braces".to_string()),
                Just("} NAME {".to_string()),
            ],
            proptest::option::of(Just(vec!["NAME".to_string(), "(".to_string()])),
        )
            .prop_map(|(name, template, tokens)| Record {
                raw_code: template.replace("NAME", &name),
                qualified_name: format!("Cls.{name}"),
                code_tokens: tokens,
            })
    }

    proptest! {
        #[test]
        fn streams_stay_aligned(records in proptest::collection::vec(arb_record(), 0..30)) {
            let out = emitter(SourceGranularity::Tokens, TargetGranularity::SubWord).lines(&records);
            prop_assert_eq!(out.source.len(), out.target.len());
            prop_assert_eq!(out.stats.emitted, out.source.len());
            prop_assert_eq!(out.stats.emitted + out.stats.skipped(), records.len());

            // every retained line pair comes from the same record, in order
            let expected: Vec<(String, String)> = records
                .iter()
                .filter_map(|r| BodyExtractor::default().extract(r).pair())
                .map(|p| (p.body, split_name(&p.name)))
                .collect();
            let actual: Vec<(String, String)> = out.source.into_iter().zip(out.target).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    fn split_name(name: &str) -> String {
        crate::identifier::split_identifier_into_parts(name).join(" ")
    }
}
