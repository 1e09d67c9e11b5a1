use lsp_types::{Diagnostic, DiagnosticSeverity};
use teal_core::Severity;

use crate::types::DocumentState;

pub(crate) fn diagnostic_to_lsp(diagnostic: &teal_core::Diagnostic, doc: &DocumentState) -> Diagnostic {
    Diagnostic {
        range: doc.range_for(diagnostic.position),
        severity: Some(match diagnostic.severity {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
        }),
        source: Some("teal".to_string()),
        message: diagnostic.message.clone(),
        ..Diagnostic::default()
    }
}
