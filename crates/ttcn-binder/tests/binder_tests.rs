//! Tests for binding single modules: declarations, errors and externals.

use ttcn_binder::{
    BindResult, ModuleBinding, NoImports, ScopeId, ScopeKind, SemanticErrorKind, SymbolFlags,
    TableRef, bind,
};
use ttcn_parser::{NodeKind, parse};

fn bind_source(source: &str) -> BindResult {
    let tree = parse("test.ttcn", source);
    assert!(tree.errors.is_empty(), "unexpected syntax errors: {:?}", tree.errors);
    bind(&tree, source)
}

fn bind_ok(source: &str) -> ModuleBinding {
    let result = bind_source(source);
    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    result.module.expect("module binding")
}

fn external_names(binding: &ModuleBinding) -> Vec<&str> {
    binding
        .externals
        .iter()
        .flat_map(|g| g.idents.iter().map(|i| i.name.as_str()))
        .collect()
}

fn error_kinds(result: &BindResult) -> Vec<SemanticErrorKind> {
    result.errors.iter().map(|e| e.kind).collect()
}

#[test]
fn test_single_module_with_variable() {
    let source = "module M { var integer x := 1; }";
    let binding = bind_ok(source);

    assert_eq!(binding.name, "M");
    assert_eq!(&source[binding.name_range.begin as usize..binding.name_range.end as usize], "M");
    let root = binding.scopes.scope(ScopeId::ROOT).unwrap();
    assert_eq!(root.kind, ScopeKind::Module);
    assert!(root.parent.is_none());

    let x = binding.scopes.resolve_direct(ScopeId::ROOT, "x").unwrap();
    assert_eq!(x.flags, SymbolFlags::VARIABLE);
    assert!(binding.externals.is_empty());
}

#[test]
fn test_redefinition_is_reported_at_second_name() {
    let source = "module M { const integer a := 1; const integer a := 2; }";
    let result = bind_source(source);

    assert_eq!(error_kinds(&result), [SemanticErrorKind::Redefinition]);
    let second = source.rfind("a :=").unwrap() as u32;
    assert_eq!(result.errors[0].range.begin, second);
    assert_eq!(result.errors[0].range.end, second + 1);
}

#[test]
fn test_multiple_modules_bind_first_only() {
    let result = bind_source("module A { const integer a := 1 } module B { const integer b := 2 }");

    assert_eq!(error_kinds(&result), [SemanticErrorKind::MultipleModulesInFile]);
    let module = result.module.unwrap();
    assert_eq!(module.name, "A");
    assert!(module.scopes.resolve_direct(ScopeId::ROOT, "b").is_none());
}

#[test]
fn test_forward_references_are_not_external() {
    let binding = bind_ok(
        r#"module M {
  function f() return integer { return g() + K }
  function g() return integer { return 1 }
  const integer K := 2;
}"#,
    );
    assert!(external_names(&binding).is_empty(), "{:?}", external_names(&binding));
}

#[test]
fn test_unknown_names_become_externals() {
    let binding = bind_ok("module M { function f() { x := y + 1 } }");
    assert_eq!(external_names(&binding), ["x", "y"]);
    assert!(binding.externals[0].provider.is_none());
}

#[test]
fn test_builtins_are_not_external() {
    let binding = bind_ok(
        r#"module M {
  function f(charstring s) return integer {
    var universal charstring u;
    return lengthof(s) + str2int(s);
  }
}"#,
    );
    assert!(external_names(&binding).is_empty(), "{:?}", external_names(&binding));
}

#[test]
fn test_enum_values_join_module_scope() {
    let binding = bind_ok("module M { type enumerated Color { red, green(2), blue } }");

    let color = binding.scopes.resolve_direct(ScopeId::ROOT, "Color").unwrap();
    assert_eq!(color.flags, SymbolFlags::ENUM_TYPE);
    for value in ["red", "green", "blue"] {
        let symbol = binding.scopes.resolve_direct(ScopeId::ROOT, value).unwrap();
        assert_eq!(symbol.flags, SymbolFlags::ENUM_MEMBER, "{value}");
    }
}

#[test]
fn test_enum_value_does_not_override_definition() {
    let binding = bind_ok("module M { const integer red := 0; type enumerated Color { red } }");
    let red = binding.scopes.resolve_direct(ScopeId::ROOT, "red").unwrap();
    assert_eq!(red.flags, SymbolFlags::VARIABLE);
}

#[test]
fn test_runs_on_non_component_is_reported() {
    let source = "module M { type record R { integer f } function f() runs on R {} }";
    let result = bind_source(source);
    assert_eq!(error_kinds(&result), [SemanticErrorKind::RunsOnRequiresComponent]);
    let clause = source.find("runs on").unwrap() as u32;
    assert_eq!(result.errors[0].range.begin, clause);
}

#[test]
fn test_runs_on_injects_component_members() {
    let binding = bind_ok(
        r#"module M {
  type component C { var integer counter := 0; timer t }
  function f() runs on C { counter := counter + 1; t.start(1.0) }
}"#,
    );
    assert!(external_names(&binding).is_empty(), "{:?}", external_names(&binding));

    let f = binding.scopes.resolve_direct(ScopeId::ROOT, "f").unwrap();
    let ttcn_binder::SymbolOrigin::Scope(scope) = f.origin else {
        panic!("function without scope: {f:?}");
    };
    let behaviour = binding.scopes.scope(scope).unwrap();
    assert_eq!(behaviour.kind, ScopeKind::Behaviour);
    assert_eq!(behaviour.augmentation.len(), 1);
    assert!(matches!(behaviour.augmentation[0], TableRef::Local(_)));
    assert!(binding.scopes.resolve(scope, "counter", &NoImports).is_some());
}

#[test]
fn test_runs_on_component_declared_later() {
    let binding = bind_ok(
        r#"module M {
  function f() runs on C { counter := 1; other := 2 }
  type component C { var integer counter }
}"#,
    );
    assert_eq!(external_names(&binding), ["other"]);
    assert!(binding.externals.iter().all(|g| g.provider.is_none()));
}

#[test]
fn test_runs_on_imported_component_waits_for_provider() {
    let binding = bind_ok(
        r#"module M {
  import from Lib all;
  function f() runs on LibComponent { counter := 1 }
}"#,
    );
    assert_eq!(binding.externals.len(), 2);
    let group = binding
        .externals
        .iter()
        .find(|g| g.provider.is_some())
        .unwrap();
    let provider = group.provider.as_ref().unwrap();
    assert_eq!(provider.name, "LibComponent");
    assert_eq!(provider.kind, ttcn_binder::AugmentationKind::RunsOn);
    assert_eq!(group.idents.len(), 1);
    assert_eq!(group.idents[0].name, "counter");
    assert_eq!(group.scopes.len(), 1);
}

#[test]
fn test_imports_are_recorded() {
    let binding = bind_ok(
        r#"module M {
  import from A all;
  public import from B { import all };
  import from A { const c };
  function f() { A.x := 1 }
}"#,
    );
    assert_eq!(binding.imports.len(), 3);
    assert!(!binding.imports[0].transit);
    assert!(binding.imports[1].transit);
    assert!(binding.imports[1].is_public);
    assert!(!binding.imports[0].is_public);
    assert_eq!(binding.imports_of("A").count(), 2);
    assert!(binding.imports_module("B"));

    let a = binding.scopes.resolve_direct(ScopeId::ROOT, "A").unwrap();
    assert_eq!(a.flags, SymbolFlags::IMPORTED_MODULE);
    assert!(binding.scopes.resolve_direct(ScopeId::ROOT, "B").is_none());
    assert!(binding.required_imports.contains("A"));
    assert!(external_names(&binding).is_empty());
}

#[test]
fn test_class_this_and_base_members() {
    let binding = bind_ok(
        r#"module M {
  type class Base { var integer v; }
  type class Derived extends Base {
    function g() { v := 1; this.v := 2; h() }
    function h() {}
  }
}"#,
    );
    assert!(external_names(&binding).is_empty(), "{:?}", external_names(&binding));

    let derived = binding.scopes.resolve_direct(ScopeId::ROOT, "Derived").unwrap();
    assert_eq!(derived.flags, SymbolFlags::CLASS_TYPE);
    let ttcn_binder::SymbolOrigin::Scope(scope) = derived.origin else {
        panic!("class without scope");
    };
    let this = binding.scopes.resolve_direct(scope, "this").unwrap();
    assert_eq!(this.flags, SymbolFlags::THIS);
    assert!(binding.scopes.resolve_direct(scope, "g").is_some());
    assert_eq!(binding.scopes.scope(scope).unwrap().augmentation.len(), 1);
}

#[test]
fn test_class_with_base_and_runs_on_sees_both_member_sets() {
    let binding = bind_ok(
        r#"module M {
  type class K extends Base runs on C {
    function f() { v := 1; w := 2; z := 3 }
  }
  type component C { var integer v }
  type class Base { var integer w }
}"#,
    );
    assert_eq!(external_names(&binding), ["z"]);
    assert!(binding.externals.iter().all(|g| g.provider.is_none()));
}

#[test]
fn test_runs_on_members_visible_in_nested_scopes() {
    let binding = bind_ok(
        r#"module M {
  function f() runs on C { if (true) { counter := 1 } }
  type component C { var integer counter }
}"#,
    );
    assert!(external_names(&binding).is_empty(), "{:?}", external_names(&binding));
}

#[test]
fn test_class_extends_non_class() {
    let result = bind_source("module M { type record R { integer f } type class D extends R {} }");
    assert_eq!(error_kinds(&result), [SemanticErrorKind::ClassCanBeExtendedByClassOnly]);
}

#[test]
fn test_abstract_function_in_concrete_class() {
    let source = "module M { type class K { function @abstract f(); } }";
    let result = bind_source(source);
    assert_eq!(
        error_kinds(&result),
        [SemanticErrorKind::CannotHaveAbstractFunctionInNonAbstractClass]
    );
    assert_eq!(result.errors[0].range.begin, source.find("@abstract").unwrap() as u32);

    let result = bind_source("module M { type class @abstract K { function @abstract f(); } }");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn test_constructor_declares_create() {
    let binding = bind_ok(
        r#"module M {
  type class K {
    var integer v;
    create(integer p) { v := p }
  }
}"#,
    );
    let k = binding.scopes.resolve_direct(ScopeId::ROOT, "K").unwrap();
    let ttcn_binder::SymbolOrigin::Scope(scope) = k.origin else {
        panic!("class without scope");
    };
    let create = binding.scopes.resolve_direct(scope, "create").unwrap();
    assert_eq!(create.flags, SymbolFlags::CONSTRUCTOR_FUNCTION);
    assert!(external_names(&binding).is_empty());
}

#[test]
fn test_group_definitions_belong_to_module() {
    let binding = bind_ok("module M { group G { const integer c := 1; } function f() { log(c) } }");
    assert!(binding.scopes.resolve_direct(ScopeId::ROOT, "c").is_some());
    assert!(
        binding
            .scopes
            .iter()
            .any(|(_, scope)| scope.kind == ScopeKind::Group)
    );
    assert!(external_names(&binding).is_empty());
}

#[test]
fn test_control_part_is_anonymous() {
    let binding = bind_ok("module M { testcase tc() {} control { var integer i := 1; execute(tc()) } }");
    let root = binding.scopes.root_table().unwrap();
    assert_eq!(root.len(), 2);
    let names: Vec<_> = root.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["tc"]);

    let control = root.lookup(ttcn_binder::CONTROL_PART_NAME).unwrap();
    assert!(control.flags.contains(SymbolFlags::CONTROL | SymbolFlags::ANONYMOUS));
    let ttcn_binder::SymbolOrigin::Scope(scope) = control.origin else {
        panic!("control part without scope");
    };
    assert_eq!(binding.scopes.scope(scope).unwrap().kind, ScopeKind::Control);
    assert!(binding.scopes.resolve_direct(scope, "i").is_some());
    assert!(binding.scopes.resolve_direct(ScopeId::ROOT, "i").is_none());
    assert!(external_names(&binding).is_empty());
}

#[test]
fn test_template_modifies_local_base() {
    let binding = bind_ok(
        r#"module M {
  type record R { integer a, integer b }
  template R t_base := { a := 1, b := 2 }
  template R t_derived modifies t_base := { a := 3 }
}"#,
    );
    let derived = binding.scopes.resolve_direct(ScopeId::ROOT, "t_derived").unwrap();
    assert_eq!(derived.flags, SymbolFlags::TEMPLATE);
    assert!(external_names(&binding).is_empty());
}

#[test]
fn test_formal_parameters_are_arguments() {
    let binding = bind_ok("module M { function f(in integer a, out integer b) { b := a } }");
    let f = binding.scopes.resolve_direct(ScopeId::ROOT, "f").unwrap();
    let ttcn_binder::SymbolOrigin::Scope(scope) = f.origin else {
        panic!("function without scope");
    };
    for name in ["a", "b"] {
        let symbol = binding.scopes.resolve_direct(scope, name).unwrap();
        assert_eq!(symbol.flags, SymbolFlags::ARGUMENT);
    }
    assert!(external_names(&binding).is_empty());
}

#[test]
fn test_nameless_file_has_no_binding() {
    let tree = parse("test.ttcn", "");
    let result = bind(&tree, "");
    assert!(result.module.is_none());
    assert!(result.errors.is_empty());
    assert_eq!(tree.arena.kind(tree.root), Some(NodeKind::Root));
}
