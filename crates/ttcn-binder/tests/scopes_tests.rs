//! Tests for scope nesting, shadowing, point queries and builtins.

use ttcn_binder::builtins::{builtin_members, builtins_tree};
use ttcn_binder::{
    ModuleBinding, NoImports, ScopeId, ScopeKind, SymbolFlags, SymbolOwner, bind, resolve_builtin,
};
use ttcn_parser::{NodeKind, parse};

fn bind_ok(source: &str) -> ModuleBinding {
    let tree = parse("test.ttcn", source);
    assert!(tree.errors.is_empty(), "unexpected syntax errors: {:?}", tree.errors);
    let result = bind(&tree, source);
    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    result.module.expect("module binding")
}

fn offset(source: &str, needle: &str) -> u32 {
    source.find(needle).expect("needle in source") as u32
}

const SHADOWING: &str = r#"module M {
  const integer x := 0;
  function f(integer p) {
    var integer x := 1;
    if (p > 0) {
      var integer x := 2;
      log(x);
    }
    log(x);
  }
}"#;

#[test]
fn test_scope_at_finds_innermost_scope() {
    let binding = bind_ok(SHADOWING);
    let scopes = &binding.scopes;

    let inner = scopes.scope_at(offset(SHADOWING, "x := 2")).unwrap();
    assert_eq!(scopes.scope(inner).unwrap().kind, ScopeKind::Block);
    let body = scopes.scope(inner).unwrap().parent.unwrap();
    assert_eq!(scopes.scope(body).unwrap().kind, ScopeKind::Block);
    let behaviour = scopes.scope(body).unwrap().parent.unwrap();
    assert_eq!(scopes.scope(behaviour).unwrap().kind, ScopeKind::Behaviour);
    assert_eq!(scopes.scope(behaviour).unwrap().parent, Some(ScopeId::ROOT));

    assert_eq!(scopes.scope_at(offset(SHADOWING, "const")), Some(ScopeId::ROOT));
    assert_eq!(scopes.scope_at(SHADOWING.len() as u32 + 10), None);
}

#[test]
fn test_inner_declaration_shadows_outer() {
    let source = SHADOWING;
    let tree = parse("test.ttcn", source);
    let binding = bind(&tree, source).module.unwrap();
    let scopes = &binding.scopes;

    let declared_value = |scope: ScopeId| {
        let resolved = scopes.resolve(scope, "x", &NoImports).unwrap();
        assert_eq!(resolved.owner, SymbolOwner::Local);
        let declarator = tree.arena.as_declarator(resolved.symbol.declaration).unwrap();
        tree.arena.text(source, declarator.value).to_string()
    };

    let inner = scopes.scope_at(offset(source, "x := 2")).unwrap();
    assert_eq!(declared_value(inner), "2");
    let body = scopes.scope_at(offset(source, "x := 1")).unwrap();
    assert_eq!(declared_value(body), "1");
    assert_eq!(declared_value(ScopeId::ROOT), "0");

    let p = scopes.resolve(inner, "p", &NoImports).unwrap();
    assert_eq!(p.symbol.flags, SymbolFlags::ARGUMENT);
    assert_eq!(tree.arena.kind(p.symbol.declaration), Some(NodeKind::FormalPar));
}

#[test]
fn test_children_are_in_source_order() {
    let binding = bind_ok("module M { function a() {} function b() {} function c() {} }");
    let root = binding.scopes.scope(ScopeId::ROOT).unwrap();
    assert_eq!(root.children.len(), 3);
    let begins: Vec<_> = root
        .children
        .iter()
        .map(|&c| binding.scopes.scope(c).unwrap().range.begin)
        .collect();
    assert!(begins.windows(2).all(|w| w[0] < w[1]), "{begins:?}");
}

#[test]
fn test_for_loop_variable_is_scoped() {
    let source = "module M { function f() { for (var integer i := 0; i < 3; i := i + 1) { log(i) } } }";
    let binding = bind_ok(source);
    let loop_scope = binding
        .scopes
        .iter()
        .find(|(_, s)| s.kind == ScopeKind::For)
        .map(|(id, _)| id)
        .unwrap();
    assert!(binding.scopes.resolve_direct(loop_scope, "i").is_some());
    assert!(binding.externals.is_empty());
}

#[test]
fn test_builtins_resolve_before_module_names() {
    let binding = bind_ok("module M { const integer int2str := 1; }");
    let resolved = binding
        .scopes
        .resolve(ScopeId::ROOT, "int2str", &NoImports)
        .unwrap();
    assert_eq!(resolved.owner, SymbolOwner::Builtin);
    assert!(
        binding
            .scopes
            .resolve_own(ScopeId::ROOT, "int2str", &NoImports)
            .is_some_and(|r| r.symbol.flags == SymbolFlags::VARIABLE)
    );
}

#[test]
fn test_builtin_types_and_functions() {
    let integer = resolve_builtin("integer").unwrap();
    assert_eq!(integer.flags, SymbolFlags::BUILTIN_TYPE);
    let ustring = resolve_builtin("universal charstring").unwrap();
    assert_eq!(ustring.flags, SymbolFlags::BUILTIN_STRING_TYPE);

    let int2str = resolve_builtin("int2str").unwrap();
    assert!(int2str.flags.contains(SymbolFlags::FUNCTION | SymbolFlags::BUILTIN));
    let tree = builtins_tree();
    assert_eq!(tree.arena.kind(int2str.declaration), Some(NodeKind::FuncDecl));

    assert!(resolve_builtin("log").is_some());
    assert!(resolve_builtin("no_such_function").is_none());
}

#[test]
fn test_timer_members() {
    let timer = resolve_builtin("timer").unwrap();
    assert!(timer.flags.is_class());
    let members = builtin_members(timer).unwrap();
    for op in ["start", "stop", "read", "running", "timeout"] {
        assert!(members.has(op), "{op}");
    }
    assert!(builtin_members(resolve_builtin("integer").unwrap()).is_none());
}
