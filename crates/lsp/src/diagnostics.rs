//! Parse-to-diagnostic conversion.
//!
//! Only structural errors are reported. An unbalanced `}` produces a
//! single diagnostic on its line; a document that parses has none.

use hyprls_core::text::{line_at, utf16_len};
use lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

/// Parse `content` and return any diagnostics.
pub fn compute_diagnostics(content: &str) -> Vec<Diagnostic> {
    match hyprls_core::parse(content) {
        Ok(_) => Vec::new(),
        Err(e) => {
            let line = e.line();
            let width = line_at(content, line).map(utf16_len).unwrap_or(0);
            vec![Diagnostic {
                range: Range::new(Position::new(line, 0), Position::new(line, width)),
                severity: Some(DiagnosticSeverity::ERROR),
                source: Some("hyprls".to_string()),
                message: e.to_string(),
                ..Default::default()
            }]
        }
    }
}
