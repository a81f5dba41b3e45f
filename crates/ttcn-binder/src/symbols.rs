//! Symbols and symbol tables.

use crate::scopes::ScopeId;
use crate::symbol_flags::SymbolFlags;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use ttcn_parser::NodeIndex;

/// Index of a symbol table inside its `ScopeTree`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableId(pub u32);

impl TableId {
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// What a symbol opens up when it is used as a prefix or injected into
/// another scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SymbolOrigin {
    None,
    /// Behaviours, templates, classes and the control part own a scope.
    Scope(ScopeId),
    /// Components, records, unions and enumerations own a member table.
    Members(TableId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    /// Declaring node in the owning module's arena; `NONE` for builtins
    /// without a source declaration.
    pub declaration: NodeIndex,
    pub origin: SymbolOrigin,
}

impl Symbol {
    pub fn new(name: impl Into<String>, flags: SymbolFlags, declaration: NodeIndex) -> Symbol {
        Symbol {
            name: name.into(),
            flags,
            declaration,
            origin: SymbolOrigin::None,
        }
    }

    pub fn with_origin(mut self, origin: SymbolOrigin) -> Symbol {
        self.origin = origin;
        self
    }

    #[inline]
    pub fn has(&self, flags: SymbolFlags) -> bool {
        self.flags.intersects(flags)
    }
}

/// Name to symbol map. Iteration follows insertion order.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    names: IndexMap<String, Symbol, FxBuildHasher>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Insert `symbol`, replacing any previous symbol of the same name.
    pub fn add(&mut self, symbol: Symbol) {
        self.names.insert(symbol.name.clone(), symbol);
    }

    #[inline]
    pub fn has(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.names.get(name)
    }

    /// Named symbols in insertion order; anonymous ones are skipped.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.names
            .values()
            .filter(|sym| !sym.flags.contains(SymbolFlags::ANONYMOUS))
    }

    /// Number of stored symbols, anonymous ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
