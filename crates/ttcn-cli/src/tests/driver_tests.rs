use clap::Parser;
use std::path::Path;
use ttcn_binder::SymbolFlags;

use super::args::CliArgs;
use super::driver::{collect_files, run, symbol_kind};

fn write_file(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create test directory");
    }
    std::fs::write(path, contents).expect("failed to write test file");
}

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["ttcn", "--color", "never"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("args should parse")
}

fn run_in(dir: &Path, extra: &[&str]) -> (bool, String) {
    let mut out = Vec::new();
    let failed = run(&args(extra), dir, &mut out).expect("run should succeed");
    (failed, String::from_utf8(out).expect("utf-8 output"))
}

const A: &str = "module A {\n  import from B all;\n  function f() return integer { return x }\n}\n";
const B: &str = "module B {\n  const integer x := 1;\n}\n";

#[test]
fn clean_sources_pass() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "a.ttcn", A);
    write_file(dir.path(), "b.ttcn", B);

    let (failed, output) = run_in(dir.path(), &[]);
    assert!(!failed, "unexpected failure:\n{output}");
    assert_eq!(output, "0 errors, 0 warnings in 2 files\n");
}

#[test]
fn unresolved_reference_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "a.ttcn", A);

    let (failed, output) = run_in(dir.path(), &[]);
    assert!(failed);
    assert!(output.contains("warning TTCN3002: module 'B' not found"), "{output}");
    assert!(output.contains("error TTCN3001: cannot find 'x' in this scope"), "{output}");
    assert!(output.ends_with("1 error, 1 warning in 1 file\n"), "{output}");
}

#[test]
fn json_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "a.ttcn", A);
    write_file(dir.path(), "b.ttcn", B);

    let (failed, output) = run_in(dir.path(), &["--format", "json", "--symbols"]);
    assert!(!failed);
    let report: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

    assert_eq!(report["files"].as_array().map(|f| f.len()), Some(2));
    assert_eq!(report["diagnostics"], serde_json::json!([]));
    assert_eq!(report["modules"][0]["name"], "A");
    assert_eq!(
        report["modules"][0]["symbols"],
        serde_json::json!([
            { "name": "B", "kind": "import" },
            { "name": "f", "kind": "function" },
        ])
    );
    assert_eq!(
        report["modules"][1]["symbols"],
        serde_json::json!([{ "name": "x", "kind": "variable" }])
    );
}

#[test]
fn json_diagnostics() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "a.ttcn", "module A {\n  const integer a := q;\n}\n");

    let (failed, output) = run_in(dir.path(), &["--format", "json"]);
    assert!(failed);
    let report: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
    let diagnostic = &report["diagnostics"][0];
    assert_eq!(diagnostic["code"], 3001);
    assert_eq!(diagnostic["category"], "error");
    assert_eq!(diagnostic["range"]["begin"], 32);
    assert_eq!(
        diagnostic["location"]["start"],
        serde_json::json!({ "line": 1, "column": 21 })
    );
    assert_eq!(
        diagnostic["location"]["end"],
        serde_json::json!({ "line": 1, "column": 22 })
    );
    assert!(report.get("modules").is_none());
}

#[test]
fn text_symbols() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "b.ttcn", B);

    let (_, output) = run_in(dir.path(), &["--symbols"]);
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[0].starts_with("module B ("), "{output}");
    assert_eq!(lines[1], format!("  {:<12} x", "variable"));
}

#[test]
fn list_files_stops_before_checking() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "src/a.ttcn", "module A { syntax error here");
    write_file(dir.path(), "src/b.ttcn3", B);
    write_file(dir.path(), "docs/readme.md", "");

    let (failed, output) = run_in(dir.path(), &["--list-files", "src"]);
    assert!(!failed);
    let listed: Vec<String> = output
        .lines()
        .map(|line| {
            Path::new(line)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect();
    assert_eq!(listed, ["a.ttcn", "b.ttcn3"]);
}

#[test]
fn project_file_selects_sources() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(
        dir.path(),
        "proj/ttcn.json",
        r#"{ "include": ["src/**"], "exclude": ["src/skip/**"] }"#,
    );
    write_file(dir.path(), "proj/src/a.ttcn", B);
    write_file(dir.path(), "proj/src/skip/b.ttcn", B);
    write_file(dir.path(), "proj/c.ttcn", B);

    let files = collect_files(&args(&["--project", "proj"]), dir.path()).expect("collect");
    assert_eq!(files, [dir.path().join("proj/src/a.ttcn")]);
}

#[test]
fn project_file_found_in_working_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "ttcn.json", r#"{ "extensions": ["ttcn3"] }"#);
    write_file(dir.path(), "a.ttcn", B);
    write_file(dir.path(), "b.ttcn3", B);

    let files = collect_files(&args(&[]), dir.path()).expect("collect");
    assert_eq!(files, [dir.path().join("b.ttcn3")]);
}

#[test]
fn bad_project_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "ttcn.json", "{ broken");
    assert!(collect_files(&args(&[]), dir.path()).is_err());
}

#[test]
fn symbol_kinds() {
    assert_eq!(symbol_kind(SymbolFlags::CLASS_TYPE), "class");
    assert_eq!(symbol_kind(SymbolFlags::UNION_TYPE), "union");
    assert_eq!(symbol_kind(SymbolFlags::STRUCTURAL_TYPE), "record");
    assert_eq!(symbol_kind(SymbolFlags::CONSTRUCTOR_FUNCTION), "constructor");
    assert_eq!(symbol_kind(SymbolFlags::COMPONENT_TYPE), "component");
    assert_eq!(symbol_kind(SymbolFlags::VARIABLE), "variable");
    assert_eq!(symbol_kind(SymbolFlags::empty()), "symbol");
}
