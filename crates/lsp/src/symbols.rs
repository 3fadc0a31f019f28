//! Document outline.
//!
//! Assignments and custom variables become leaf symbols at their line
//! start; sections become namespaces spanning their braces, with their
//! own contents as children.

use hyprls_core::{Section, ValueKind};
use lsp_types::{DocumentSymbol, SymbolKind};

use crate::position::{collapsed, range};

/// Nested symbols for the contents of `section`, the section itself
/// excluded.
#[allow(deprecated)] // DocumentSymbol::deprecated must still be initialised
pub fn document_symbols(section: &Section) -> Vec<DocumentSymbol> {
    let mut symbols = Vec::new();

    for assignment in &section.assignments {
        let at = collapsed(assignment.position);
        symbols.push(DocumentSymbol {
            name: assignment.key.clone(),
            detail: Some(assignment.value_raw.clone()),
            kind: symbol_kind(assignment.value.kind()),
            tags: None,
            deprecated: None,
            range: at,
            selection_range: at,
            children: None,
        });
    }

    for variable in &section.variables {
        let at = collapsed(variable.position);
        symbols.push(DocumentSymbol {
            name: format!("${}", variable.key),
            detail: Some(variable.value_raw.clone()),
            kind: SymbolKind::VARIABLE,
            tags: None,
            deprecated: None,
            range: at,
            selection_range: at,
            children: None,
        });
    }

    for subsection in &section.subsections {
        let span = range(subsection.span());
        symbols.push(DocumentSymbol {
            name: subsection.name.clone(),
            detail: None,
            kind: SymbolKind::NAMESPACE,
            tags: None,
            deprecated: None,
            range: span,
            selection_range: span,
            children: Some(document_symbols(subsection)),
        });
    }

    symbols
}

fn symbol_kind(kind: ValueKind) -> SymbolKind {
    match kind {
        ValueKind::Integer | ValueKind::Float => SymbolKind::NUMBER,
        ValueKind::Bool => SymbolKind::BOOLEAN,
        ValueKind::Vec2 | ValueKind::Modmask => SymbolKind::ARRAY,
        ValueKind::String => SymbolKind::STRING,
        ValueKind::Color | ValueKind::Gradient | ValueKind::Custom => SymbolKind::FIELD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::{Position, Range};

    #[test]
    fn outline_mirrors_section_tree() {
        let root = hyprls_core::parse(
            "$mod = SUPER\nborder_size = 2\ndecoration {\n  rounding = 8\n  blur {\n    enabled = yes\n  }\n}\n",
        )
        .expect("parses");
        let symbols = document_symbols(&root);
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["border_size", "$mod", "decoration"]);

        assert_eq!(symbols[0].kind, SymbolKind::NUMBER);
        assert_eq!(symbols[0].detail.as_deref(), Some("2"));
        assert_eq!(symbols[1].kind, SymbolKind::VARIABLE);
        assert_eq!(symbols[1].range, Range::new(Position::new(0, 0), Position::new(0, 0)));

        let decoration = &symbols[2];
        assert_eq!(decoration.kind, SymbolKind::NAMESPACE);
        assert_eq!(
            decoration.range,
            Range::new(Position::new(2, 11), Position::new(7, 0))
        );
        let children = decoration.children.as_deref().expect("children");
        assert_eq!(children[0].name, "rounding");
        assert_eq!(children[1].name, "blur");
        let blur = children[1].children.as_deref().expect("blur children");
        assert_eq!(blur[0].kind, SymbolKind::BOOLEAN);
    }

    #[test]
    fn value_kinds_map_to_symbol_kinds() {
        assert_eq!(symbol_kind(ValueKind::Vec2), SymbolKind::ARRAY);
        assert_eq!(symbol_kind(ValueKind::String), SymbolKind::STRING);
        assert_eq!(symbol_kind(ValueKind::Gradient), SymbolKind::FIELD);
    }
}
