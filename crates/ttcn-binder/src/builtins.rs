//! Predefined types and functions.
//!
//! Builtin types are a fixed table. Predefined functions are declared in an
//! embedded TTCN-3 module that is parsed once, on first use.

use crate::scopes::ScopeTree;
use crate::symbol_flags::SymbolFlags;
use crate::symbols::{Symbol, SymbolOrigin, SymbolTable};
use once_cell::sync::Lazy;
use ttcn_parser::{NodeData, NodeIndex, SyntaxTree, parse};

pub const BUILTINS_MODULE_NAME: &str = "TTCNBuiltins";

const BUILTINS_SOURCE: &str = include_str!("builtins.ttcn");

/// Predefined operations with statement-like or variadic forms that cannot
/// be written as external functions, e.g. `log(a, b, c)`.
const OPERATIONS: &[&str] = &[
    "action",
    "activate",
    "deactivate",
    "execute",
    "getverdict",
    "kill",
    "log",
    "match",
    "setverdict",
    "stop",
    "valueof",
];

struct Builtins {
    /// Builtin type names, including the two-word `universal charstring`.
    types: SymbolTable,
    /// Predefined functions from the embedded module.
    defs: SymbolTable,
    /// Member tables of builtin types such as `timer`.
    members: ScopeTree,
    tree: SyntaxTree,
}

static BUILTINS: Lazy<Builtins> = Lazy::new(Builtins::load);

impl Builtins {
    fn load() -> Builtins {
        let mut members = ScopeTree::new();
        let timer_members = members.add_table();
        if let Some(table) = members.table_mut(timer_members) {
            for op in ["start", "stop", "read", "running", "timeout"] {
                table.add(Symbol::new(
                    op,
                    SymbolFlags::FUNCTION | SymbolFlags::BUILTIN,
                    NodeIndex::NONE,
                ));
            }
        }

        let mut types = SymbolTable::new();
        let builtin = |name: &str, flags: SymbolFlags| Symbol::new(name, flags, NodeIndex::NONE);
        types.add(builtin("anytype", SymbolFlags::BUILTIN_TYPE));
        types.add(builtin("boolean", SymbolFlags::BUILTIN_TYPE));
        types.add(builtin("integer", SymbolFlags::BUILTIN_TYPE));
        types.add(builtin("float", SymbolFlags::BUILTIN_TYPE));
        types.add(builtin("bitstring", SymbolFlags::BUILTIN_STRING_TYPE));
        types.add(builtin("charstring", SymbolFlags::BUILTIN_STRING_TYPE));
        types.add(builtin("octetstring", SymbolFlags::BUILTIN_STRING_TYPE));
        types.add(builtin("hexstring", SymbolFlags::BUILTIN_STRING_TYPE));
        types.add(builtin("universal charstring", SymbolFlags::BUILTIN_STRING_TYPE));
        types.add(builtin("verdicttype", SymbolFlags::BUILTIN_TYPE));
        types.add(builtin("default", SymbolFlags::BUILTIN_TYPE));
        types.add(builtin("object", SymbolFlags::BUILTIN_TYPE));
        types.add(
            builtin("timer", SymbolFlags::BUILTIN_TYPE | SymbolFlags::CLASS_TYPE)
                .with_origin(SymbolOrigin::Members(timer_members)),
        );
        types.add(builtin("self", SymbolFlags::VARIABLE | SymbolFlags::BUILTIN));

        let tree = parse(BUILTINS_MODULE_NAME, BUILTINS_SOURCE);
        if !tree.errors.is_empty() {
            tracing::warn!(errors = ?tree.errors, "builtin definitions have syntax errors");
        }

        let mut defs = SymbolTable::new();
        for op in OPERATIONS {
            defs.add(Symbol::new(
                *op,
                SymbolFlags::FUNCTION | SymbolFlags::BUILTIN,
                NodeIndex::NONE,
            ));
        }
        tree.arena.accept(tree.root, |index, node| match &node.data {
            NodeData::FuncDecl(func) => {
                let name = tree.arena.text(BUILTINS_SOURCE, func.name);
                if !name.is_empty() {
                    defs.add(Symbol::new(
                        name,
                        SymbolFlags::FUNCTION | SymbolFlags::BUILTIN,
                        index,
                    ));
                }
                false
            }
            NodeData::ValueDecl(decl) => {
                for &declarator in &decl.decls {
                    if let Some(d) = tree.arena.as_declarator(declarator) {
                        let name = tree.arena.text(BUILTINS_SOURCE, d.name);
                        if !name.is_empty() {
                            defs.add(Symbol::new(
                                name,
                                SymbolFlags::VARIABLE | SymbolFlags::BUILTIN,
                                declarator,
                            ));
                        }
                    }
                }
                false
            }
            _ => true,
        });

        tracing::debug!(types = types.len(), defs = defs.len(), "loaded builtins");
        Builtins {
            types,
            defs,
            members,
            tree,
        }
    }
}

/// Builtin type, predefined function or operation named `name`.
pub fn resolve_builtin(name: &str) -> Option<&'static Symbol> {
    let builtins = &*BUILTINS;
    builtins
        .types
        .lookup(name)
        .or_else(|| builtins.defs.lookup(name))
}

/// Member table of a builtin symbol, e.g. the operations of `timer`.
pub fn builtin_members(symbol: &Symbol) -> Option<&'static SymbolTable> {
    match symbol.origin {
        SymbolOrigin::Members(table) if symbol.flags.contains(SymbolFlags::BUILTIN) => {
            BUILTINS.members.table(table)
        }
        _ => None,
    }
}

/// Parsed builtins module; declarations of predefined functions point into
/// this tree.
pub fn builtins_tree() -> &'static SyntaxTree {
    &BUILTINS.tree
}
