use colored::Colorize;
use ttcn_common::{Diagnostic, DiagnosticCategory, LineMap, TextRange};
use ttcn_program::Program;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, program: &Program, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(program, diagnostic));
        }
        out
    }

    /// `file:line:column - category code: message`, then the source line with
    /// the range underlined. Lines and columns are printed 1-based.
    pub fn format_diagnostic(&self, program: &Program, diagnostic: &Diagnostic) -> String {
        let file = program.file(&diagnostic.file);

        let mut output = match file {
            Some(file) => {
                let position = file.tree.line_map.translate(diagnostic.range.begin);
                format!(
                    "{}:{}:{}",
                    diagnostic.file,
                    position.line + 1,
                    position.column + 1
                )
            }
            None if diagnostic.file.is_empty() => "<unknown>".to_string(),
            None => diagnostic.file.clone(),
        };

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message);

        if let Some(file) = file
            && let Some(snippet) =
                self.format_snippet(&file.text, &file.tree.line_map, diagnostic.range)
        {
            output.push_str(&snippet);
        }
        output
    }

    /// Example:
    ///     3   var integer x := y;
    ///                          ~
    fn format_snippet(&self, text: &str, line_map: &LineMap, range: TextRange) -> Option<String> {
        let position = line_map.translate(range.begin);
        let line = line_map.range_of(position.line)?;
        let line_end = (line.end as usize).min(text.len());
        let line_text = text.get(line.begin as usize..line_end)?.trim_end_matches('\r');

        let column = (position.column as usize).min(line_text.len());
        let marked_end = (range.end as usize)
            .saturating_sub(line.begin as usize)
            .clamp(column, line_text.len());

        let mut underline: String = line_text
            .get(..column)?
            .chars()
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();
        let width = line_text.get(column..marked_end)?.chars().count().max(1);
        let marks = "~".repeat(width);
        if self.color {
            underline.push_str(&marks.red().to_string());
        } else {
            underline.push_str(&marks);
        }

        Some(format!(
            "\n  {:>3}   {}\n        {}",
            position.line + 1,
            line_text,
            underline
        ))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.to_string();
        if !self.color {
            return label;
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Hint => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("TTCN{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }

    /// Closing line: counts of errors and warnings over `files` files.
    pub fn summary(&self, diagnostics: &[Diagnostic], files: usize) -> String {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Warning)
            .count();
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        };
        let text = format!(
            "{}, {} in {}",
            plural(errors, "error"),
            plural(warnings, "warning"),
            plural(files, "file")
        );
        if self.color && errors > 0 {
            text.red().to_string()
        } else {
            text
        }
    }
}
