use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use fn_name_pairs::{
    CorpusSplit, EmitConfig, PairsError, RunConfig, SourceGranularity, TargetGranularity,
};

fn write_gz(path: &Path, lines: &[&str]) {
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    for line in lines {
        writeln!(encoder, "{line}").unwrap();
    }
    encoder.finish().unwrap();
}

fn fixture_split(root: &Path) -> std::path::PathBuf {
    let split = root.join("java").join("valid");
    fs::create_dir_all(split.join("nested")).unwrap();
    write_gz(
        &split.join("java_valid_0.jsonl.gz"),
        &[
            r#"{"code": "public int getValue() {\n    return value;\n}", "func_name": "Foo.getValue", "code_tokens": ["public", "int", "getValue", "(", ")", "{", "return", "value", ";", "}"]}"#,
            r#"{"code": "abstract void run();", "func_name": "Task.run"}"#,
        ],
    );
    write_gz(
        &split.join("nested").join("java_valid_1.jsonl.gz"),
        &[
            r#"{"code": "void parse_JSON2Data(String s) {\n  a(s);\n  b();\n}", "func_name": "p.Parser.parse_JSON2Data"}"#,
            r#"{"code": "void noop() { }", "func_name": "noop"}"#,
        ],
    );
    // not a data file
    fs::write(split.join("README.txt"), "ignored").unwrap();
    split
}

#[test]
fn loads_files_sorted_by_path() {
    let tmp = TempDir::new().unwrap();
    let split = CorpusSplit::load(&fixture_split(tmp.path())).unwrap();
    assert_eq!(split.name, "valid");
    assert_eq!(split.file_count, 2);
    let names: Vec<&str> = split.records.iter().map(|r| r.qualified_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Foo.getValue", "Task.run", "p.Parser.parse_JSON2Data", "noop"]
    );
}

#[test]
fn missing_data_is_fatal_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let empty = tmp.path().join("empty");
    fs::create_dir_all(&empty).unwrap();

    let config = RunConfig {
        data_dir: empty.clone(),
        source_template: tmp.path().join("src-%s.txt").to_string_lossy().into_owned(),
        target_template: tmp.path().join("tgt-%s.txt").to_string_lossy().into_owned(),
        ..RunConfig::default()
    };
    let err = fn_name_pairs::run(&config).unwrap_err();
    assert!(matches!(err, PairsError::NoDataFiles { .. }));
    assert!(!tmp.path().join("src-empty.txt").exists());
    assert!(!tmp.path().join("tgt-empty.txt").exists());
}

#[test]
fn writes_aligned_subword_files() {
    let tmp = TempDir::new().unwrap();
    let data_dir = fixture_split(tmp.path());
    let out = tmp.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let config = RunConfig {
        data_dir,
        emit: EmitConfig {
            source: SourceGranularity::Tokens,
            target: TargetGranularity::SubWord,
        },
        source_template: out.join("src-%s.txt").to_string_lossy().into_owned(),
        target_template: out.join("tgt-%s.txt").to_string_lossy().into_owned(),
        ..RunConfig::default()
    };
    let stats = fn_name_pairs::run(&config).unwrap();
    assert_eq!(stats.records, 4);
    assert_eq!(stats.emitted, 2);
    assert_eq!(stats.skipped(), 2);

    let source = fs::read_to_string(out.join("src-valid.txt")).unwrap();
    let target = fs::read_to_string(out.join("tgt-valid.txt")).unwrap();
    assert_eq!(source, "return value ;\na(s);\\n  b();\n");
    assert_eq!(target, "get value\nparse json 2 data\n");
}

#[test]
fn char_targets_with_custom_newline() {
    let tmp = TempDir::new().unwrap();
    let data_dir = fixture_split(tmp.path());

    let config = RunConfig {
        data_dir,
        newline_repl: " NL ".to_string(),
        source_template: tmp.path().join("%s.src").to_string_lossy().into_owned(),
        target_template: tmp.path().join("%s.tgt").to_string_lossy().into_owned(),
        ..RunConfig::default()
    };
    fn_name_pairs::run(&config).unwrap();

    let source = fs::read_to_string(tmp.path().join("valid.src")).unwrap();
    let target = fs::read_to_string(tmp.path().join("valid.tgt")).unwrap();
    assert_eq!(source, "return value;\na(s); NL   b();\n");
    assert_eq!(
        target,
        "g e t V a l u e\np a r s e _ J S O N 2 D a t a\n"
    );
}
