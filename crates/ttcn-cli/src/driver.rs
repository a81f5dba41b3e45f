//! One run of the checker: collect sources, load them into a `Program` in a
//! single commit, and report.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use ttcn_binder::{ScopeId, SymbolFlags};
use ttcn_common::{Diagnostic, Location, diagnostic_codes};
use ttcn_program::Program;

use crate::args::{CliArgs, OutputFormat};
use crate::config::{self, DEFAULT_EXTENSIONS, Project};
use crate::reporter::Reporter;

/// Outcome of a check run.
#[derive(Debug)]
pub struct CheckResult {
    pub files: Vec<PathBuf>,
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Files named by `args`: explicit paths when given, otherwise the project
/// from `--project` or a `ttcn.json` in `cwd`, otherwise every source under
/// `cwd`.
pub fn collect_files(args: &CliArgs, cwd: &Path) -> Result<Vec<PathBuf>> {
    let project = match &args.project {
        Some(path) => Some(config::load_project(&cwd.join(path))?),
        None if args.paths.is_empty() => match config::find_project(cwd) {
            Some(path) => Some(config::load_project(&path)?),
            None => None,
        },
        None => None,
    };

    if !args.paths.is_empty() {
        let extensions = project
            .as_ref()
            .map(|p| p.config.extensions())
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect());
        let paths: Vec<PathBuf> = args.paths.iter().map(|p| cwd.join(p)).collect();
        return config::discover_paths(&paths, &extensions);
    }

    let project = project.unwrap_or_else(|| Project {
        root: cwd.to_path_buf(),
        config: Default::default(),
    });
    config::discover_project(&project)
}

/// Read every file and load them into a fresh program.
#[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
pub fn check(files: Vec<PathBuf>) -> Result<CheckResult> {
    let mut sources = Vec::with_capacity(files.len());
    for path in &files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read source: {}", path.display()))?;
        sources.push((path.display().to_string(), text));
    }

    let mut program = Program::new();
    program.commit(|m| {
        for (path, text) in sources {
            m.update(path, text);
        }
    });

    let diagnostics = program
        .files()
        .flat_map(|file| program.diagnostics(&file.path))
        .collect();
    Ok(CheckResult {
        files,
        program,
        diagnostics,
    })
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SymbolSummary {
    pub name: String,
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModuleSummary {
    pub name: String,
    pub path: String,
    pub symbols: Vec<SymbolSummary>,
}

/// Short name of the kind of declaration `flags` describe.
pub fn symbol_kind(flags: SymbolFlags) -> &'static str {
    const KINDS: &[(SymbolFlags, &str)] = &[
        (SymbolFlags::IMPORTED_MODULE, "import"),
        (SymbolFlags::CONTROL, "control"),
        (SymbolFlags::COMPONENT, "component"),
        (SymbolFlags::CLASS, "class"),
        (SymbolFlags::UNION, "union"),
        (SymbolFlags::STRUCTURAL, "record"),
        (SymbolFlags::ENUM, "enumerated"),
        (SymbolFlags::PORT, "port"),
        (SymbolFlags::LIST, "list"),
        (SymbolFlags::SUBTYPE, "subtype"),
        (SymbolFlags::TYPE, "type"),
        (SymbolFlags::CONSTRUCTOR, "constructor"),
        (SymbolFlags::FUNCTION, "function"),
        (SymbolFlags::TEMPLATE, "template"),
        (SymbolFlags::ENUM_MEMBER, "enum value"),
        (SymbolFlags::FIELD, "field"),
        (SymbolFlags::ARGUMENT, "parameter"),
        (SymbolFlags::VARIABLE, "variable"),
    ];
    KINDS
        .iter()
        .find(|(kind, _)| flags.contains(*kind))
        .map(|(_, name)| *name)
        .unwrap_or("symbol")
}

/// Top-level symbols of every registered module, in file order.
pub fn module_summaries(program: &Program) -> Vec<ModuleSummary> {
    program
        .modules()
        .map(|module| {
            let symbols = module
                .binding
                .scopes
                .symbols(ScopeId::ROOT)
                .map(|table| {
                    table
                        .iter()
                        .map(|symbol| SymbolSummary {
                            name: symbol.name.clone(),
                            kind: symbol_kind(symbol.flags),
                        })
                        .collect()
                })
                .unwrap_or_default();
            ModuleSummary {
                name: module.name().to_string(),
                path: module.path.clone(),
                symbols,
            }
        })
        .collect()
}

/// A diagnostic with its range also given as lines and columns.
#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: Vec<String>,
    diagnostics: Vec<JsonDiagnostic<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modules: Option<Vec<ModuleSummary>>,
}

/// Write the report for `result` in the format `args` asks for.
pub fn report(args: &CliArgs, result: &CheckResult, out: &mut impl Write) -> Result<()> {
    match args.format {
        OutputFormat::Json => {
            let report = JsonReport {
                files: result.files.iter().map(|f| f.display().to_string()).collect(),
                diagnostics: result
                    .diagnostics
                    .iter()
                    .map(|diagnostic| JsonDiagnostic {
                        diagnostic,
                        location: result.program.file(&diagnostic.file).map(|file| {
                            file.tree.line_map.location(&diagnostic.file, diagnostic.range)
                        }),
                    })
                    .collect(),
                modules: args.symbols.then(|| module_summaries(&result.program)),
            };
            serde_json::to_writer_pretty(&mut *out, &report)
                .context("failed to write JSON report")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let reporter = Reporter::new(args.color.enabled());
            if !result.diagnostics.is_empty() {
                writeln!(out, "{}", reporter.render(&result.program, &result.diagnostics))?;
                writeln!(out)?;
            }
            if args.symbols {
                for module in module_summaries(&result.program) {
                    writeln!(out, "module {} ({})", module.name, module.path)?;
                    for symbol in &module.symbols {
                        writeln!(out, "  {:<12} {}", symbol.kind, symbol.name)?;
                    }
                }
            }
            writeln!(out, "{}", reporter.summary(&result.diagnostics, result.files.len()))?;
        }
    }
    Ok(())
}

/// Number of unresolved imports among `diagnostics`.
pub fn missing_modules(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.code == diagnostic_codes::UNRESOLVED_IMPORT)
        .count()
}

/// Run the binary. Returns whether any error was reported.
pub fn run(args: &CliArgs, cwd: &Path, out: &mut impl Write) -> Result<bool> {
    let files = collect_files(args, cwd)?;
    tracing::debug!(count = files.len(), "collected sources");

    if args.list_files {
        for file in &files {
            writeln!(out, "{}", file.display())?;
        }
        return Ok(false);
    }

    let result = check(files)?;
    if missing_modules(&result.diagnostics) > 0 {
        tracing::info!(
            missing = missing_modules(&result.diagnostics),
            "some imported modules are not part of the checked files"
        );
    }
    report(args, &result, out)?;
    Ok(result.has_errors())
}
