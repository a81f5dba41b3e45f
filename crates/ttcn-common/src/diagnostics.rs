use crate::range::TextRange;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Hint,
}

impl std::fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Hint => "hint",
        })
    }
}

/// Numeric codes, grouped by the channel that produces them:
/// 1xxx syntax, 2xxx semantic, 3xxx cross-module resolution.
pub mod diagnostic_codes {
    pub const SYNTAX_ERROR: u32 = 1000;
    pub const MALFORMED_TOKEN: u32 = 1001;
    pub const UNTERMINATED_TOKEN: u32 = 1002;

    pub const REDEFINITION: u32 = 2001;
    pub const RUNS_ON_REQUIRES_COMPONENT: u32 = 2002;
    pub const CLASS_CAN_BE_EXTENDED_BY_CLASS_ONLY: u32 = 2003;
    pub const ABSTRACT_FUNCTION_IN_NON_ABSTRACT_CLASS: u32 = 2004;
    pub const MULTIPLE_MODULES_IN_FILE: u32 = 2005;
    pub const DUPLICATE_MODULE: u32 = 2006;

    pub const UNRESOLVED_IDENTIFIER: u32 = 3001;
    pub const UNRESOLVED_IMPORT: u32 = 3002;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub range: TextRange,
    pub message: String,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        range: TextRange,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            file: file.into(),
            range,
            message: message.into(),
        }
    }

    pub fn warning(
        file: impl Into<String>,
        range: TextRange,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            ..Self::error(file, range, message, code)
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}
