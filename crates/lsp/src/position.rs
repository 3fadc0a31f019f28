//! Conversions between document positions and protocol positions.
//!
//! Both sides count columns in UTF-16 code units, so conversion is a
//! field-for-field copy.

use hyprls_core::{Position, Span};
use lsp_types::Range;

pub(crate) fn to_lsp(position: Position) -> lsp_types::Position {
    lsp_types::Position::new(position.line, position.column)
}

pub(crate) fn from_lsp(position: lsp_types::Position) -> Position {
    Position::new(position.line, position.character)
}

pub(crate) fn range(span: Span) -> Range {
    Range::new(to_lsp(span.start), to_lsp(span.end))
}

pub(crate) fn collapsed(position: Position) -> Range {
    let at = to_lsp(position);
    Range::new(at, at)
}
