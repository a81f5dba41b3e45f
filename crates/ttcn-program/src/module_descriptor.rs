//! Per-module cross-file state.

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use ttcn_binder::{ExternalIdent, ModuleBinding, ScopeId, SemanticError, TableId};

/// A provider table injected into one of the module's scopes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DependencyEntry {
    pub table: TableId,
    pub injected_to: ScopeId,
}

#[derive(Debug)]
pub struct ModuleDescriptor {
    pub binding: ModuleBinding,
    /// File declaring the module.
    pub path: String,
    /// Provider module name to the tables injected from it.
    pub dependencies: IndexMap<String, Vec<DependencyEntry>, FxBuildHasher>,
    /// Modules that only forward imports to this one via `{ import all }`.
    pub vias: FxHashSet<String>,
    /// Closure of `dependencies` over the provider modules.
    pub transitive_dependency_providers: FxHashSet<String>,
    /// Modules that depend on this one.
    pub dependents: FxHashSet<String>,
    /// References no visible module provides.
    pub unresolved: Vec<ExternalIdent>,
    pub crossbind_errors: Vec<SemanticError>,
    /// Every module name the import walk looked up, found or not.
    pub watched: FxHashSet<String>,
    pub(crate) dirty: bool,
    pub(crate) registered: bool,
}

impl ModuleDescriptor {
    pub fn new(binding: ModuleBinding, path: String) -> ModuleDescriptor {
        ModuleDescriptor {
            binding,
            path,
            dependencies: IndexMap::default(),
            vias: FxHashSet::default(),
            transitive_dependency_providers: FxHashSet::default(),
            dependents: FxHashSet::default(),
            unresolved: Vec::new(),
            crossbind_errors: Vec::new(),
            watched: FxHashSet::default(),
            dirty: true,
            registered: false,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.binding.name
    }

    /// Whether the module owns its name in the program. A module whose name
    /// is already taken by another file is not registered.
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Whether the module waits for a cross-module pass.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Modules whose changes require this one to be cross-bound again.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .keys()
            .map(String::as_str)
            .chain(self.vias.iter().map(String::as_str))
    }

    /// Drop everything a previous cross-module pass produced.
    pub(crate) fn reset_crossbind(&mut self) -> Vec<String> {
        self.binding.scopes.strip_imported();
        let providers = self.providers().map(str::to_string).collect();
        self.dependencies.clear();
        self.vias.clear();
        self.unresolved.clear();
        self.crossbind_errors.clear();
        self.watched.clear();
        providers
    }
}
