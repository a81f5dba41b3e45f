use super::reporter::Reporter;
use ttcn_program::Program;

fn program(path: &str, text: &str) -> Program {
    let mut program = Program::new();
    program.commit(|m| m.update(path, text));
    program
}

#[test]
fn formats_location_and_snippet() {
    let program = program("a.ttcn", "module A {\n  const integer a := q;\n}\n");
    let diagnostics = program.diagnostics("a.ttcn");
    assert_eq!(diagnostics.len(), 1);

    let rendered = Reporter::new(false).render(&program, &diagnostics);
    let expected = format!(
        "a.ttcn:2:22 - error TTCN3001: cannot find 'q' in this scope\n    2     const integer a := q;\n        {}~",
        " ".repeat(21)
    );
    assert_eq!(rendered, expected);
}

#[test]
fn underlines_the_whole_range() {
    let program = program("m.ttcn", "module M { import from Missing all; }");
    let diagnostics = program.diagnostics("m.ttcn");
    assert_eq!(diagnostics.len(), 1);

    let rendered = Reporter::new(false).render(&program, &diagnostics);
    let first_line = rendered.lines().next().expect("header line");
    assert_eq!(
        first_line,
        "m.ttcn:1:24 - warning TTCN3002: module 'Missing' not found"
    );
    let underline = rendered.lines().last().expect("underline line");
    let range = diagnostics[0].range;
    assert_eq!(
        underline.trim_start().len(),
        (range.end - range.begin) as usize
    );
    assert!(underline.trim_start().chars().all(|c| c == '~'));
}

#[test]
fn summary_counts() {
    let program = program("a.ttcn", "module A { import from Z all; const integer a := q; }");
    let diagnostics = program.diagnostics("a.ttcn");
    let reporter = Reporter::new(false);
    assert_eq!(
        reporter.summary(&diagnostics, 1),
        "1 error, 1 warning in 1 file"
    );
    assert_eq!(reporter.summary(&[], 3), "0 errors, 0 warnings in 3 files");
}

#[test]
fn unknown_file_has_no_snippet() {
    let program = Program::new();
    let diagnostic = ttcn_common::Diagnostic::error(
        "gone.ttcn",
        ttcn_common::TextRange::new(0, 1),
        "lost",
        ttcn_common::diagnostic_codes::SYNTAX_ERROR,
    );
    let rendered = Reporter::new(false).format_diagnostic(&program, &diagnostic);
    assert_eq!(rendered, "gone.ttcn - error TTCN1000: lost");
}
