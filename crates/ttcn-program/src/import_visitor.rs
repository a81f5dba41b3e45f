//! Import visibility.
//!
//! A module sees the modules it imports directly, public or private. An
//! `import from M { import all }` declaration additionally makes visible
//! everything `M` imports publicly, recursively through further transit
//! imports. Modules are looked up by name; names that are not loaded are
//! recorded so that adding them later triggers a retry.

use crate::module_descriptor::ModuleDescriptor;
use crate::program::Program;
use rustc_hash::FxHashSet;
use std::ops::ControlFlow;
use ttcn_common::limits::MAX_IMPORT_CHAIN_DEPTH;

/// A module visible from the module being cross-bound.
#[derive(Copy, Clone, Debug)]
pub struct VisibleModule<'p> {
    pub module: &'p ModuleDescriptor,
    /// Transit import through which the module became visible.
    pub via: Option<&'p str>,
}

impl<'p> VisibleModule<'p> {
    #[inline]
    pub fn name(&self) -> &'p str {
        self.module.name()
    }
}

/// Result of walking the imports of one module.
#[derive(Debug, Default)]
pub struct ImportWalk<'p> {
    /// Visible modules in discovery order: direct imports first.
    pub visible: Vec<VisibleModule<'p>>,
    /// Imported module names that are not loaded.
    pub missing: Vec<String>,
    /// Every module name looked up.
    pub watched: FxHashSet<String>,
    /// `false` when a module was missing or the chain got too deep.
    pub complete: bool,
}

pub struct ImportVisitor<'p> {
    program: &'p Program,
    walk: ImportWalk<'p>,
    seen: FxHashSet<&'p str>,
    entered: FxHashSet<&'p str>,
}

impl<'p> ImportVisitor<'p> {
    pub fn new(program: &'p Program) -> ImportVisitor<'p> {
        ImportVisitor {
            program,
            walk: ImportWalk {
                complete: true,
                ..ImportWalk::default()
            },
            seen: FxHashSet::default(),
            entered: FxHashSet::default(),
        }
    }

    /// Walk the imports of `module`.
    pub fn run(mut self, module: &'p ModuleDescriptor) -> ImportWalk<'p> {
        self.seen.insert(module.name());
        self.entered.insert(module.name());
        let _ = self.visit(module, true, None, 0);
        self.walk
    }

    fn visit(
        &mut self,
        importer: &'p ModuleDescriptor,
        accept_private: bool,
        via: Option<&'p str>,
        depth: u32,
    ) -> ControlFlow<()> {
        if depth > MAX_IMPORT_CHAIN_DEPTH {
            tracing::warn!(module = importer.name(), depth, "import chain too deep");
            self.walk.complete = false;
            return ControlFlow::Break(());
        }

        let imports = importer
            .binding
            .imports
            .iter()
            .filter(|import| accept_private || import.is_public);

        // Definitions of directly imported modules first.
        for import in imports.clone().filter(|import| !import.transit) {
            if let Some(target) = self.lookup(&import.module)
                && self.seen.insert(target.name())
            {
                self.walk.visible.push(VisibleModule {
                    module: target,
                    via,
                });
            }
        }

        for import in imports.filter(|import| import.transit) {
            if let Some(target) = self.lookup(&import.module)
                && self.entered.insert(target.name())
            {
                self.visit(target, false, via.or(Some(target.name())), depth + 1)?;
            }
        }
        ControlFlow::Continue(())
    }

    fn lookup(&mut self, name: &str) -> Option<&'p ModuleDescriptor> {
        if self.walk.watched.insert(name.to_string()) {
            tracing::trace!(module = name, "import lookup");
        }
        let found = self.program.get_module(name);
        if found.is_none() {
            self.walk.complete = false;
            if !self.walk.missing.iter().any(|m| m == name) {
                self.walk.missing.push(name.to_string());
            }
        }
        found
    }
}
