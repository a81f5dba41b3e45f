//! Semantic errors found while binding and cross-binding modules.

use serde::Serialize;
use std::fmt;
use ttcn_common::{Diagnostic, TextRange, diagnostic_codes};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SemanticErrorKind {
    Redefinition,
    RunsOnRequiresComponent,
    ClassCanBeExtendedByClassOnly,
    CannotHaveAbstractFunctionInNonAbstractClass,
    MultipleModulesInFile,
    DuplicateModule,
}

impl SemanticErrorKind {
    pub const fn code(self) -> u32 {
        match self {
            SemanticErrorKind::Redefinition => diagnostic_codes::REDEFINITION,
            SemanticErrorKind::RunsOnRequiresComponent => {
                diagnostic_codes::RUNS_ON_REQUIRES_COMPONENT
            }
            SemanticErrorKind::ClassCanBeExtendedByClassOnly => {
                diagnostic_codes::CLASS_CAN_BE_EXTENDED_BY_CLASS_ONLY
            }
            SemanticErrorKind::CannotHaveAbstractFunctionInNonAbstractClass => {
                diagnostic_codes::ABSTRACT_FUNCTION_IN_NON_ABSTRACT_CLASS
            }
            SemanticErrorKind::MultipleModulesInFile => diagnostic_codes::MULTIPLE_MODULES_IN_FILE,
            SemanticErrorKind::DuplicateModule => diagnostic_codes::DUPLICATE_MODULE,
        }
    }
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SemanticErrorKind::Redefinition => "redefinition of an existing name",
            SemanticErrorKind::RunsOnRequiresComponent => "'runs on' requires a component type",
            SemanticErrorKind::ClassCanBeExtendedByClassOnly => "a class can only extend a class",
            SemanticErrorKind::CannotHaveAbstractFunctionInNonAbstractClass => {
                "an abstract function requires an abstract class"
            }
            SemanticErrorKind::MultipleModulesInFile => "only one module per file is supported",
            SemanticErrorKind::DuplicateModule => "a module with this name already exists",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SemanticError {
    pub range: TextRange,
    pub kind: SemanticErrorKind,
}

impl SemanticError {
    pub fn new(range: TextRange, kind: SemanticErrorKind) -> SemanticError {
        SemanticError { range, kind }
    }

    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        Diagnostic::error(file, self.range, self.kind.to_string(), self.kind.code())
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}: {}", self.range.begin, self.range.end, self.kind)
    }
}
