//! Tests for the grammar: declarations, statements, expressions and ranges.

use ttcn_parser::{NodeIndex, NodeKind, SyntaxTree, parse};
use ttcn_scanner::TokenKind;

fn parse_ok(source: &str) -> SyntaxTree {
    let tree = parse("test.ttcn", source);
    assert!(
        tree.errors.is_empty(),
        "unexpected syntax errors: {:?}",
        tree.errors
    );
    tree
}

fn text<'a>(tree: &SyntaxTree, source: &'a str, node: NodeIndex) -> &'a str {
    tree.arena.text(source, node)
}

/// First node of `kind` in pre-order.
fn find(tree: &SyntaxTree, kind: NodeKind) -> NodeIndex {
    let mut found = NodeIndex::NONE;
    tree.arena.accept(tree.root, |index, node| {
        if found.is_none() && node.kind() == kind {
            found = index;
        }
        found.is_none()
    });
    found
}

fn count(tree: &SyntaxTree, kind: NodeKind) -> usize {
    let mut n = 0;
    tree.arena.accept(tree.root, |_, node| {
        if node.kind() == kind {
            n += 1;
        }
        true
    });
    n
}

const SAMPLE: &str = r#"module Sample language "TTCN-3:2018" {
  import from Types all;
  import from Other { type T1, T2; template all except t3; import all };
  type record Msg {
    integer id,
    charstring payload optional
  }
  type record of Msg MsgList;
  type enumerated Color { red, green(2), blue }
  type union U { integer i, boolean b }
  type port P message { inout Msg; map param (integer n) }
  type component C {
    port P p;
    var integer counter := 0;
    timer t := 5.0;
  }
  const integer K := 10;
  template Msg m_msg(integer p_id) := { id := p_id, payload := ? }
  function f(in integer a, out integer b) runs on C return integer {
    var integer i;
    for (i := 0; i < K; i := i + 1) {
      counter := counter + a;
    }
    if (a > 1) { b := 2 } else if (a == 0) { b := 0 } else { b := 1 }
    select (a) {
      case (1) { return 1 }
      case else { }
    }
    alt {
      [] p.receive(m_msg(1)) -> value b { repeat }
      [] t.timeout { }
      [else] { }
    }
    while (a < 10) { a := a + 1 }
    do { a := a - 1 } while (a > 0)
    return a;
  }
  testcase tc() runs on C system C {
    setverdict(pass);
  }
  control {
    execute(tc());
  }
} with { encode "JSON" }
"#;

#[test]
fn test_single_module_with_variable() {
    let source = "module M { var integer x := 1; }";
    let tree = parse_ok(source);

    let modules: Vec<_> = tree.modules().collect();
    assert_eq!(modules.len(), 1);
    let module = tree.arena.as_module(modules[0]).unwrap();
    assert_eq!(text(&tree, source, module.name), "M");
    assert_eq!(module.defs.len(), 1);

    let def = tree.arena.as_module_def(module.defs[0]).unwrap();
    assert!(def.visibility.is_none());
    let decl = tree.arena.as_value_decl(def.def).unwrap();
    assert_eq!(decl.kind.map(|t| t.kind), Some(TokenKind::Var));
    assert_eq!(text(&tree, source, decl.ty), "integer");
    assert_eq!(decl.decls.len(), 1);

    let declarator = tree.arena.as_declarator(decl.decls[0]).unwrap();
    assert_eq!(tree.arena.kind(declarator.name), Some(NodeKind::NameIdent));
    assert_eq!(text(&tree, source, declarator.name), "x");
    assert_eq!(text(&tree, source, declarator.value), "1");
}

#[test]
fn test_root_spans_whole_source() {
    let source = "  module M {}  \n";
    let tree = parse_ok(source);
    let root = tree.arena.get(tree.root).unwrap();
    assert_eq!(root.range.begin, 0);
    assert_eq!(root.range.end as usize, source.len());
    assert_eq!(tree.arena.kind(tree.root), Some(NodeKind::Root));
}

#[test]
fn test_realistic_module_parses_cleanly() {
    let tree = parse_ok(SAMPLE);
    let module = tree.arena.as_module(tree.top_level()[0]).unwrap();
    assert!(module.language.is_some());
    assert!(module.with.is_some());
    assert_eq!(module.defs.len(), 13);

    assert_eq!(count(&tree, NodeKind::ImportDecl), 2);
    assert_eq!(count(&tree, NodeKind::StructTypeDecl), 2);
    assert_eq!(count(&tree, NodeKind::SubTypeDecl), 1);
    assert_eq!(count(&tree, NodeKind::EnumTypeDecl), 1);
    assert_eq!(count(&tree, NodeKind::PortTypeDecl), 1);
    assert_eq!(count(&tree, NodeKind::ComponentTypeDecl), 1);
    assert_eq!(count(&tree, NodeKind::TemplateDecl), 1);
    assert_eq!(count(&tree, NodeKind::FuncDecl), 2);
    assert_eq!(count(&tree, NodeKind::ControlPart), 1);
    assert_eq!(count(&tree, NodeKind::ForStmt), 1);
    assert_eq!(count(&tree, NodeKind::IfStmt), 2);
    assert_eq!(count(&tree, NodeKind::CaseClause), 2);
    assert_eq!(count(&tree, NodeKind::CommClause), 3);
    assert_eq!(count(&tree, NodeKind::RedirectExpr), 1);
    assert_eq!(count(&tree, NodeKind::WhileStmt), 1);
    assert_eq!(count(&tree, NodeKind::DoWhileStmt), 1);
}

#[test]
fn test_import_forms() {
    let tree = parse_ok(SAMPLE);
    let import = find(&tree, NodeKind::ImportDecl);
    let all = tree.arena.as_import_decl(import).unwrap();
    assert_eq!(all.list.len(), 1);
    let kind = tree.arena.as_def_kind_expr(all.list[0]).unwrap();
    assert!(kind.kind.is_none());

    let mut specs = Vec::new();
    tree.arena.accept(tree.root, |index, node| {
        if node.kind() == NodeKind::ImportDecl && index != import {
            specs.extend(tree.arena.as_import_decl(index).unwrap().list.iter().copied());
        }
        true
    });
    let kinds: Vec<_> = specs
        .iter()
        .map(|&s| tree.arena.as_def_kind_expr(s).unwrap().kind.unwrap().kind)
        .collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Type, TokenKind::Template, TokenKind::Import]
    );
    let except = tree.arena.as_def_kind_expr(specs[1]).unwrap();
    assert_eq!(tree.arena.kind(except.list[0]), Some(NodeKind::ExceptExpr));
}

#[test]
fn test_parse_is_deterministic() {
    let first = parse("a.ttcn", SAMPLE);
    let second = parse("a.ttcn", SAMPLE);
    let ranges = |tree: &SyntaxTree| -> Vec<_> {
        tree.arena
            .iter()
            .map(|(_, node)| (node.kind(), node.range, node.parent))
            .collect()
    };
    assert_eq!(ranges(&first), ranges(&second));
    assert_eq!(first.errors, second.errors);
}

#[test]
fn test_children_lie_within_parents() {
    let tree = parse_ok(SAMPLE);
    for (index, node) in tree.arena.iter() {
        if node.parent.is_none() {
            assert_eq!(index, tree.root, "only the root has no parent");
            continue;
        }
        let parent = tree.arena.get(node.parent).unwrap();
        assert!(
            parent.range.contains_range(node.range),
            "{} {:?} escapes its parent {} {:?}",
            node.kind(),
            node.range,
            parent.kind(),
            parent.range
        );
    }
}

#[test]
fn test_sibling_ranges_are_ordered() {
    let tree = parse_ok(SAMPLE);
    for (index, _) in tree.arena.iter() {
        let children = tree.arena.children(index);
        for pair in children.windows(2) {
            let a = tree.arena.range(pair[0]);
            let b = tree.arena.range(pair[1]);
            assert!(a.end <= b.begin, "children out of order: {a:?} {b:?}");
        }
    }
}

#[test]
fn test_node_at_finds_deepest_node() {
    let source = "module M { const integer K := 10 }";
    let tree = parse_ok(source);
    let offset = source.find("10").unwrap() as u32;
    let node = tree.node_at(offset);
    assert_eq!(tree.arena.kind(node), Some(NodeKind::ValueLiteral));
    assert_eq!(text(&tree, source, node), "10");
}

#[test]
fn test_type_parameters_are_speculative() {
    let source = "module M { var R<integer> x; }";
    let tree = parse_ok(source);
    let decl = tree.arena.as_value_decl(find(&tree, NodeKind::ValueDecl)).unwrap();
    let ty = tree.arena.as_parametrized_ident(decl.ty).unwrap();
    assert_eq!(text(&tree, source, ty.ident), "R");
    assert_eq!(text(&tree, source, decl.ty), "R<integer>");
    assert_eq!(tree.arena.as_paren_expr(ty.params).unwrap().list.len(), 1);
}

#[test]
fn test_less_than_is_a_comparison() {
    let source = "x := a < b;";
    let tree = parse_ok(source);
    let assign = tree.arena.as_assignment_expr(find(&tree, NodeKind::AssignmentExpr)).unwrap();
    let cmp = tree.arena.as_binary_expr(assign.value).unwrap();
    assert_eq!(cmp.op.kind, TokenKind::Lt);
    assert_eq!(count(&tree, NodeKind::ParametrizedIdent), 0);
}

#[test]
fn test_operator_precedence() {
    let source = "x := 1 + 2 * 3";
    let tree = parse_ok(source);
    let assign = tree.arena.as_assignment_expr(find(&tree, NodeKind::AssignmentExpr)).unwrap();
    assert_eq!(text(&tree, source, assign.property), "x");

    let sum = tree.arena.as_binary_expr(assign.value).unwrap();
    assert_eq!(sum.op.kind, TokenKind::Add);
    assert_eq!(text(&tree, source, sum.x), "1");
    let product = tree.arena.as_binary_expr(sum.y).unwrap();
    assert_eq!(product.op.kind, TokenKind::Mul);
    assert_eq!(text(&tree, source, sum.y), "2 * 3");
}

#[test]
fn test_binary_operators_associate_left() {
    let source = "1 - 2 - 3";
    let tree = parse_ok(source);
    let outer = tree.arena.as_binary_expr(find(&tree, NodeKind::BinaryExpr)).unwrap();
    assert_eq!(text(&tree, source, outer.x), "1 - 2");
    assert_eq!(text(&tree, source, outer.y), "3");
}

#[test]
fn test_call_statement_with_response_block() {
    let source = r#"module M {
  function f() runs on C {
    p.call(S:{}) {
      [] p.getreply {}
    }
  }
}"#;
    let tree = parse_ok(source);
    let call = tree.arena.as_call_stmt(find(&tree, NodeKind::CallStmt)).unwrap();
    assert_eq!(tree.arena.kind(call.stmt), Some(NodeKind::ExprStmt));
    assert_eq!(tree.arena.kind(call.body), Some(NodeKind::BlockStmt));
    assert_eq!(count(&tree, NodeKind::CommClause), 1);
}

#[test]
fn test_for_range_statement() {
    let source = "module M { function f() { for (var integer i in list) { log(i) } } }";
    let tree = parse_ok(source);
    let stmt = tree.arena.as_for_range_stmt(find(&tree, NodeKind::ForRangeStmt)).unwrap();
    assert_eq!(tree.arena.kind(stmt.init), Some(NodeKind::DeclStmt));
    assert_eq!(text(&tree, source, stmt.range), "list");
}

#[test]
fn test_not_used_value() {
    let source = "x := { -, 1 }";
    let tree = parse_ok(source);
    let literal = tree
        .arena
        .as_composite_literal(find(&tree, NodeKind::CompositeLiteral))
        .unwrap();
    let dash = tree.arena.as_value_literal(literal.list[0]).unwrap();
    assert_eq!(dash.tok.kind, TokenKind::Sub);
}

#[test]
fn test_class_with_constructor_and_finally() {
    let source = r#"module M {
  type class @abstract Base {
    var integer v;
    create(integer p) { v := p }
    function @abstract f();
  } finally { log("done") }
}"#;
    let tree = parse_ok(source);
    let class = tree
        .arena
        .as_class_type_decl(find(&tree, NodeKind::ClassTypeDecl))
        .unwrap();
    assert!(!class.external);
    assert_eq!(class.modif.map(|t| t.kind), Some(TokenKind::Modif));
    assert_eq!(class.defs.len(), 3);
    assert!(class.finally.is_some());
    assert_eq!(count(&tree, NodeKind::ConstructorDecl), 1);
}

#[test]
fn test_module_parameter_group() {
    let source = "module M { modulepar { integer a := 1; boolean b } }";
    let tree = parse_ok(source);
    let group = tree
        .arena
        .as_module_parameter_group(find(&tree, NodeKind::ModuleParameterGroup))
        .unwrap();
    assert_eq!(group.decls.len(), 2);
}

#[test]
fn test_visibility_and_friend() {
    let source = "module M { friend module N; private const integer c := 1; public function g() {} }";
    let tree = parse_ok(source);
    let module = tree.arena.as_module(tree.top_level()[0]).unwrap();
    let visibility: Vec<_> = module
        .defs
        .iter()
        .map(|&d| tree.arena.as_module_def(d).unwrap().visibility.map(|t| t.kind))
        .collect();
    assert_eq!(
        visibility,
        vec![None, Some(TokenKind::Private), Some(TokenKind::Public)]
    );
    assert_eq!(count(&tree, NodeKind::FriendDecl), 1);
}
