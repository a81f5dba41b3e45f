//! Tests for syntax error reporting and recovery.

use ttcn_common::diagnostic_codes;
use ttcn_parser::{NodeKind, parse};

#[test]
fn test_unterminated_string_reports_and_returns() {
    let tree = parse("test.ttcn", "module M { var charstring s := \"abc");
    assert!(!tree.errors.is_empty());
    assert!(
        tree.errors
            .iter()
            .any(|e| e.code == diagnostic_codes::UNTERMINATED_TOKEN),
        "errors: {:?}",
        tree.errors
    );
    assert_eq!(tree.modules().count(), 1);
}

#[test]
fn test_malformed_token_is_reported_once() {
    let tree = parse("test.ttcn", "module M { const bitstring b := '0101'X; }");
    let malformed = tree
        .errors
        .iter()
        .filter(|e| e.code == diagnostic_codes::MALFORMED_TOKEN)
        .count();
    assert_eq!(malformed, 1, "errors: {:?}", tree.errors);
}

#[test]
fn test_missing_closing_brace() {
    let tree = parse("test.ttcn", "module M { var integer x := 1 ");
    assert!(
        tree.errors.iter().any(|e| e.description == "expected '}'"),
        "errors: {:?}",
        tree.errors
    );
    let module = tree.arena.as_module(tree.top_level()[0]).unwrap();
    assert_eq!(module.defs.len(), 1);
}

#[test]
fn test_garbage_stops_at_top_level() {
    let tree = parse("test.ttcn", "} } ) ; @@@ module M {}");
    assert!(!tree.errors.is_empty());
    assert!(
        tree.errors
            .iter()
            .any(|e| e.description.starts_with("unexpected '}'")),
        "errors: {:?}",
        tree.errors
    );
}

#[test]
fn test_recovery_keeps_following_definitions() {
    let source = "module M { type 42; const integer c := 1; function f() {} }";
    let tree = parse("test.ttcn", source);
    assert!(!tree.errors.is_empty());

    let mut kinds = Vec::new();
    tree.arena.accept(tree.root, |_, node| {
        kinds.push(node.kind());
        true
    });
    assert!(kinds.contains(&NodeKind::Error));
    assert!(kinds.contains(&NodeKind::ValueDecl));
    assert!(kinds.contains(&NodeKind::FuncDecl));
}

#[test]
fn test_errors_are_sorted_by_position() {
    let tree = parse(
        "test.ttcn",
        "module M { const bitstring b := '01'X; var integer := ; function }",
    );
    assert!(tree.errors.len() >= 2);
    assert!(
        tree.errors
            .windows(2)
            .all(|w| w[0].range.begin <= w[1].range.begin),
        "errors: {:?}",
        tree.errors
    );
}

#[test]
fn test_failed_speculation_leaves_no_errors() {
    let tree = parse("test.ttcn", "module M { control { if (a < b) { } } }");
    assert!(tree.errors.is_empty(), "errors: {:?}", tree.errors);
}

#[test]
fn test_statement_garbage_in_block_terminates() {
    let tree = parse(
        "test.ttcn",
        "module M { function f() { case case else else ] ] ) } }",
    );
    assert!(!tree.errors.is_empty());
    assert_eq!(tree.modules().count(), 1);
}

#[test]
fn test_deep_nesting_is_bounded() {
    // run on a thread with a generous stack: the guard limits depth, not
    // frame size
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let depth = 2000;
            let source = format!("x := {}1{}", "(".repeat(depth), ")".repeat(depth));
            let tree = parse("deep.ttcn", &source);
            tree.errors
                .iter()
                .any(|e| e.description == "nesting too deep")
        })
        .unwrap();
    assert!(handle.join().unwrap());
}

#[test]
fn test_diagnostics_carry_file_name() {
    let tree = parse("broken.ttcn", "module M { var }");
    let diagnostics = tree.diagnostics();
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(|d| d.file == "broken.ttcn"));
    assert!(diagnostics.iter().all(|d| d.is_error()));
}

#[test]
fn test_truncated_input_keeps_children_inside_parents() {
    for source in [
        "module M { function f() { select (",
        "module M { const integer x := 1 +",
        "module M { var integer   ",
    ] {
        let tree = parse("test.ttcn", source);
        assert!(!tree.errors.is_empty(), "{source}");
        tree.arena.accept(tree.root, |index, _| {
            let parent = tree.arena.range(index);
            for child in tree.arena.children(index) {
                let range = tree.arena.range(child);
                assert!(
                    parent.contains_range(range),
                    "{source}: {:?} {range:?} outside {parent:?}",
                    tree.arena.kind(child)
                );
            }
            true
        });
    }
}
