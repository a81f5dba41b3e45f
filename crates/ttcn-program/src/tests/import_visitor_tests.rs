//! Tests for import visibility walks.

use crate::import_visitor::ImportVisitor;
use crate::program::Program;

fn program(files: &[(&str, &str)]) -> Program {
    let mut program = Program::new();
    program.commit(|m| {
        for (path, text) in files {
            m.update(*path, *text);
        }
    });
    program
}

#[test]
fn test_transit_imports_follow_public_imports_only() {
    let program = program(&[
        ("a.ttcn", "module A { import from B all; import from C { import all }; }"),
        ("b.ttcn", "module B { const integer b := 1 }"),
        (
            "c.ttcn",
            "module C { public import from D all; import from E all; public import from F { import all }; }",
        ),
        ("d.ttcn", "module D { const integer d := 1 }"),
        ("e.ttcn", "module E { const integer e := 1 }"),
        ("f.ttcn", "module F { public import from G all; }"),
        ("g.ttcn", "module G { const integer g := 1 }"),
    ]);

    let a = program.get_module("A").unwrap();
    let walk = ImportVisitor::new(&program).run(a);
    assert!(walk.complete);
    assert!(walk.missing.is_empty());

    let visible: Vec<_> = walk.visible.iter().map(|v| (v.name(), v.via)).collect();
    assert_eq!(visible, [("B", None), ("D", Some("C")), ("G", Some("C"))]);

    for name in ["B", "C", "D", "F", "G"] {
        assert!(walk.watched.contains(name), "{name}");
    }
    assert!(!walk.watched.contains("E"));
}

#[test]
fn test_missing_module_makes_walk_incomplete() {
    let program = program(&[(
        "a.ttcn",
        "module A { import from X all; import from Y { import all }; import from X { const c }; }",
    )]);

    let walk = ImportVisitor::new(&program).run(program.get_module("A").unwrap());
    assert!(!walk.complete);
    assert_eq!(walk.missing, ["X", "Y"]);
    assert!(walk.visible.is_empty());
    assert!(walk.watched.contains("X") && walk.watched.contains("Y"));
}

#[test]
fn test_transit_cycle_terminates() {
    let program = program(&[
        ("p.ttcn", "module P { import from Q { import all }; public import from R all; }"),
        ("q.ttcn", "module Q { public import from P { import all }; public import from S all; }"),
        ("r.ttcn", "module R { const integer r := 1 }"),
        ("s.ttcn", "module S { const integer s := 1 }"),
    ]);

    let walk = ImportVisitor::new(&program).run(program.get_module("P").unwrap());
    let names: Vec<_> = walk.visible.iter().map(|v| v.name()).collect();
    assert_eq!(names, ["R", "S"]);
    assert!(walk.complete);
}
