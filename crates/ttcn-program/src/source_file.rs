//! One file of a program: its text, syntax tree and module.

use crate::module_descriptor::ModuleDescriptor;
use ttcn_binder::{BindResult, SemanticError, bind};
use ttcn_parser::{SyntaxTree, parse};

/// A loaded file. Replaced as a whole when its text changes.
#[derive(Debug)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
    pub tree: SyntaxTree,
    /// The file's module; `None` when the file declares no named module.
    pub module: Option<ModuleDescriptor>,
    pub semantic_errors: Vec<SemanticError>,
    /// Reserved for a type checking pass; always empty.
    pub type_errors: Vec<SemanticError>,
}

impl SourceFile {
    /// Parse and bind `text`.
    pub fn load(path: String, text: String) -> SourceFile {
        let tree = parse(&path, &text);
        let BindResult { module, errors } = bind(&tree, &text);
        SourceFile {
            module: module.map(|binding| ModuleDescriptor::new(binding, path.clone())),
            semantic_errors: errors,
            type_errors: Vec::new(),
            path,
            text,
            tree,
        }
    }

    /// Whether the file's module still waits for a cross-module pass, or
    /// for its name while another file holds it.
    pub fn is_dirty(&self) -> bool {
        self.module.as_ref().is_some_and(ModuleDescriptor::is_dirty)
    }

    /// Name of the module declared by this file.
    pub fn module_name(&self) -> Option<&str> {
        self.module.as_ref().map(|m| m.name())
    }
}
