//! The program: every loaded file, the module registry and the commit cycle.
//!
//! Files change only through `Program::commit`. A commit applies its batch
//! of updates and drops, registers module names, marks every module whose
//! imports touch a changed name dirty, and runs one cross-module pass over
//! the dirty modules.

use crate::crossbind::Crossbinder;
use crate::module_descriptor::ModuleDescriptor;
use crate::source_file::SourceFile;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use ttcn_binder::{
    Resolved, ScopeId, SemanticError, SemanticErrorKind, SymbolTable, TableId, TableSource,
};
use ttcn_common::{Diagnostic, diagnostic_codes};

enum Change {
    Update { path: String, text: String },
    Drop { path: String },
}

/// Batch of file changes collected by `Program::commit`.
#[derive(Default)]
pub struct Modifier {
    changes: Vec<Change>,
}

impl Modifier {
    /// Add `path` with `text`, or replace its text.
    pub fn update(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.changes.push(Change::Update {
            path: path.into(),
            text: text.into(),
        });
    }

    /// Remove `path` from the program.
    pub fn drop(&mut self, path: impl Into<String>) {
        self.changes.push(Change::Drop { path: path.into() });
    }
}

#[derive(Debug, Default)]
pub struct Program {
    files: IndexMap<String, SourceFile, FxBuildHasher>,
    /// Registered module name to the path of the file declaring it.
    modules: FxHashMap<String, String>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Apply the changes made by `f` and bring every affected module up to
    /// date.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn commit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Modifier),
    {
        let mut modifier = Modifier::default();
        f(&mut modifier);

        let mut changed: FxHashSet<String> = FxHashSet::default();
        // Replaced files stay alive until the batch is done.
        let mut retired: Vec<SourceFile> = Vec::new();

        for change in modifier.changes {
            match change {
                Change::Update { path, text } => {
                    let mut file = SourceFile::load(path.clone(), text);
                    if let Some(name) = file.module_name() {
                        changed.insert(name.to_string());
                    }
                    let keeps_name = self
                        .files
                        .get(&path)
                        .and_then(|old| old.module.as_ref())
                        .is_some_and(|old| {
                            old.registered && Some(old.name()) == file.module_name()
                        });
                    if keeps_name && let Some(module) = file.module.as_mut() {
                        module.registered = true;
                    }

                    if let Some(old) = self.files.insert(path, file) {
                        self.unlink(&old, keeps_name, &mut changed);
                        retired.push(old);
                    }
                }
                Change::Drop { path } => {
                    if let Some(old) = self.files.shift_remove(&path) {
                        self.unlink(&old, false, &mut changed);
                        retired.push(old);
                    }
                }
            }
        }

        self.register_modules(&mut changed);
        self.mark_dirty(&changed);
        self.crossbind();

        tracing::debug!(
            files = self.files.len(),
            modules = self.modules.len(),
            changed = changed.len(),
            retired = retired.len(),
            "commit done"
        );
    }

    /// Detach the module of a file leaving the program.
    fn unlink(&mut self, old: &SourceFile, keeps_name: bool, changed: &mut FxHashSet<String>) {
        let Some(module) = old.module.as_ref().filter(|m| m.registered) else {
            return;
        };
        let name = module.name();
        changed.insert(name.to_string());
        if !keeps_name {
            self.modules.remove(name);
        }
        for provider in module.providers() {
            if let Some(provider) = self.get_module_mut(provider) {
                provider.dependents.remove(name);
            }
        }
    }

    /// Give unregistered modules their name when it is free; report the
    /// others as duplicates.
    fn register_modules(&mut self, changed: &mut FxHashSet<String>) {
        for (path, file) in self.files.iter_mut() {
            let Some(module) = file.module.as_mut() else {
                continue;
            };
            if module.registered {
                continue;
            }

            let name = module.name();
            if self.modules.contains_key(name) {
                let range = module.binding.name_range;
                let reported = file
                    .semantic_errors
                    .iter()
                    .any(|e| e.kind == SemanticErrorKind::DuplicateModule);
                if !reported {
                    tracing::debug!(module = name, path = path.as_str(), "duplicate module");
                    file.semantic_errors
                        .push(SemanticError::new(range, SemanticErrorKind::DuplicateModule));
                }
                continue;
            }

            self.modules.insert(name.to_string(), path.clone());
            changed.insert(name.to_string());
            module.registered = true;
            module.dirty = true;
            file.semantic_errors
                .retain(|e| e.kind != SemanticErrorKind::DuplicateModule);
        }
    }

    fn mark_dirty(&mut self, changed: &FxHashSet<String>) {
        if changed.is_empty() {
            return;
        }
        for module in self.modules_mut() {
            if !module.dirty && module.watched.iter().any(|name| changed.contains(name)) {
                module.dirty = true;
            }
        }
    }

    /// Cross-bind every dirty module, then refresh the transitive provider
    /// sets.
    fn crossbind(&mut self) {
        let dirty: Vec<String> = self
            .modules()
            .filter(|m| m.dirty)
            .map(|m| m.name().to_string())
            .collect();
        if dirty.is_empty() {
            return;
        }
        tracing::debug!(count = dirty.len(), "crossbind");

        for name in &dirty {
            self.crossbind_module(name);
        }
        self.update_transitive_providers();
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn crossbind_module(&mut self, name: &str) {
        let Some(module) = self.get_module_mut(name) else {
            return;
        };
        let stale = module.reset_crossbind();
        for provider in stale {
            if let Some(provider) = self.get_module_mut(&provider) {
                provider.dependents.remove(name);
            }
        }

        let plan = match self.get_module(name) {
            Some(module) => Crossbinder::new(self, module).run(),
            None => return,
        };

        let providers: Vec<String> = plan
            .dependencies
            .keys()
            .chain(plan.vias.iter())
            .cloned()
            .collect();

        let Some(module) = self.get_module_mut(name) else {
            return;
        };
        for (scope, table) in plan.injections {
            module.binding.scopes.augment(scope, table);
        }
        module.dependencies = plan.dependencies;
        module.vias = plan.vias;
        module.unresolved = plan.unresolved;
        module.crossbind_errors = plan.errors;
        module.watched = plan.watched;
        module.dirty = false;

        for provider in providers {
            if let Some(provider) = self.get_module_mut(&provider) {
                provider.dependents.insert(name.to_string());
            }
        }
    }

    fn update_transitive_providers(&mut self) {
        let direct: FxHashMap<String, Vec<String>> = self
            .modules()
            .map(|m| {
                let providers = m.dependencies.keys().cloned().collect();
                (m.name().to_string(), providers)
            })
            .collect();

        for module in self.modules_mut() {
            let mut closure = FxHashSet::default();
            let mut stack: Vec<&str> = direct
                .get(module.name())
                .map(|p| p.iter().map(String::as_str).collect())
                .unwrap_or_default();
            while let Some(provider) = stack.pop() {
                if provider == module.name() || !closure.insert(provider.to_string()) {
                    continue;
                }
                if let Some(next) = direct.get(provider) {
                    stack.extend(next.iter().map(String::as_str));
                }
            }
            module.transitive_dependency_providers = closure;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Files in the order they were first added.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    /// Registered module named `name`.
    pub fn get_module(&self, name: &str) -> Option<&ModuleDescriptor> {
        let path = self.modules.get(name)?;
        self.files
            .get(path)?
            .module
            .as_ref()
            .filter(|m| m.registered)
    }

    fn get_module_mut(&mut self, name: &str) -> Option<&mut ModuleDescriptor> {
        let path = self.modules.get(name)?;
        self.files
            .get_mut(path)?
            .module
            .as_mut()
            .filter(|m| m.registered)
    }

    /// Path of the file declaring the registered module `name`.
    pub fn module_path(&self, name: &str) -> Option<&str> {
        self.get_module(name).map(|m| m.path.as_str())
    }

    /// Registered modules in file order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.files
            .values()
            .filter_map(|f| f.module.as_ref())
            .filter(|m| m.registered)
    }

    fn modules_mut(&mut self) -> impl Iterator<Item = &mut ModuleDescriptor> {
        self.files
            .values_mut()
            .filter_map(|f| f.module.as_mut())
            .filter(|m| m.registered)
    }

    /// Resolve `name` from `scope` of the module in `path`, following tables
    /// injected from other modules.
    pub fn resolve(&self, path: &str, scope: ScopeId, name: &str) -> Option<Resolved<'_>> {
        let module = self.file(path)?.module.as_ref()?;
        module.binding.scopes.resolve(scope, name, self)
    }

    /// Innermost scope of the module in `path` covering `offset`.
    pub fn scope_at(&self, path: &str, offset: u32) -> Option<ScopeId> {
        self.file(path)?.module.as_ref()?.binding.scopes.scope_at(offset)
    }

    /// Syntax, semantic and resolution diagnostics of `path`, ordered by
    /// position.
    pub fn diagnostics(&self, path: &str) -> Vec<Diagnostic> {
        let Some(file) = self.file(path) else {
            return Vec::new();
        };

        let mut out = file.tree.diagnostics();
        out.extend(file.semantic_errors.iter().map(|e| e.to_diagnostic(path)));
        out.extend(file.type_errors.iter().map(|e| e.to_diagnostic(path)));

        if let Some(module) = file.module.as_ref().filter(|m| m.registered) {
            out.extend(module.crossbind_errors.iter().map(|e| e.to_diagnostic(path)));
            for import in &module.binding.imports {
                if self.get_module(&import.module).is_none() {
                    out.push(Diagnostic::warning(
                        path,
                        import.range,
                        format!("module '{}' not found", import.module),
                        diagnostic_codes::UNRESOLVED_IMPORT,
                    ));
                }
            }
            out.extend(module.unresolved.iter().map(|ident| {
                Diagnostic::error(
                    path,
                    ident.range,
                    format!("cannot find '{}' in this scope", ident.name),
                    diagnostic_codes::UNRESOLVED_IDENTIFIER,
                )
            }));
        }

        out.sort_by_key(|d| (d.range.begin, d.range.end));
        out
    }
}

impl TableSource for Program {
    fn table(&self, module: &str, table: TableId) -> Option<&SymbolTable> {
        self.get_module(module)?.binding.scopes.table(table)
    }
}
