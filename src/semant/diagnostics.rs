//! Diagnostics sink shared by the analysis passes
//!
//! Every finding is an error: a (file, line, message) record appended in
//! emission order. The driver consults the counter between phases; passes
//! never abort on their own.

use crate::frontend::intern::{Interner, Symbol};
use serde::Serialize;

/// One user-facing finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Symbol,
    pub line: u32,
    pub message: String,
}

/// Ordered sink the phase gates consult between passes
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one error
    pub fn error(&mut self, file: Symbol, line: u32, message: impl Into<String>) {
        self.records.push(Diagnostic {
            file,
            line,
            message: message.into(),
        });
    }

    /// Number of errors recorded so far
    pub fn error_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_clean(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in emission order
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Render one record the way the driver prints it
    pub fn render(&self, diagnostic: &Diagnostic, interner: &Interner) -> String {
        format!(
            "{}:{}: {}",
            interner.resolve(diagnostic.file),
            diagnostic.line,
            diagnostic.message
        )
    }

    /// Machine-readable form of every record
    pub fn to_json(&self, interner: &Interner) -> String {
        let reports: Vec<JsonDiagnostic<'_>> = self
            .records
            .iter()
            .map(|d| JsonDiagnostic {
                file: interner.resolve(d.file),
                line: d.line,
                message: &d.message,
            })
            .collect();
        serde_json::to_string_pretty(&reports).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Serializable shape of a diagnostic for `--json` output
#[derive(Debug, Serialize)]
struct JsonDiagnostic<'a> {
    file: &'a str,
    line: u32,
    message: &'a str,
}
