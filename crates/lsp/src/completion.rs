//! Context-aware completion provider.
//!
//! Left of `=` the cursor is naming something, so section variables not
//! yet set, statement keywords and sections not yet opened are offered.
//! Right of `=` it is writing a value: custom variables plus snippets for
//! the type the schema declares for the key.

use hyprls_core::schema::{self, SectionDefinition};
use hyprls_core::text::{byte_index_of, column_of, line_at};
use hyprls_core::{ModKey, Section, ValueKind};
use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionItemTag, CompletionTextEdit, Documentation,
    InsertTextFormat, MarkupContent, MarkupKind, Position, Range, TextEdit,
};

use crate::position::from_lsp;

/// Colour snippets: label, snippet body, documentation, deprecated.
static COLOR_SNIPPETS: &[(&str, &str, &str, bool)] = &[
    (
        "rgba(⋯)",
        "rgba(${0:ffffffff})",
        "Define a color with an alpha channel of the form rgba(RRGGBBAA) in hexadecimal notation.",
        false,
    ),
    (
        "rgb(⋯)",
        "rgb(${0:ffffff})",
        "Define a color of the form rgb(RRGGBB) in hexadecimal notation.",
        false,
    ),
    (
        "0xAARRGGBB",
        "0x${1:ffffffff}",
        "Define a color of the form 0xAARRGGBB in hexadecimal notation.",
        true,
    ),
];

/// Compute completions for the given position in the document.
///
/// Documents with unbalanced braces get no completions.
pub fn compute_completions(content: &str, position: Position) -> Vec<CompletionItem> {
    let Some(line) = line_at(content, position.line) else {
        return Vec::new();
    };
    let root = match hyprls_core::parse(content) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!(error = %e, "no completions for unbalanced document");
            return Vec::new();
        }
    };
    let cursor = byte_index_of(line, position.character);

    match line.find('=') {
        Some(equals) if equals < cursor => {
            value_completions(&root, line, equals, cursor, position.line)
        }
        _ => key_completions(&root, position),
    }
}

// ──────────────────────────────────────────────
// Right of `=`
// ──────────────────────────────────────────────

fn value_completions(
    root: &Section,
    line: &str,
    equals: usize,
    cursor: usize,
    line_no: u32,
) -> Vec<CompletionItem> {
    // Only offer values at the start of a word, never in the middle of one.
    let after_dollar = match line[..cursor].chars().next_back() {
        Some('$') => true,
        Some(c) if c.is_whitespace() => false,
        _ => return Vec::new(),
    };
    let column = column_of(line, cursor);
    let at_cursor = Range::new(Position::new(line_no, column), Position::new(line_no, column));
    // Replace an already typed `$` so accepting does not double it.
    let variable_range = if after_dollar {
        Range::new(Position::new(line_no, column - 1), at_cursor.end)
    } else {
        at_cursor
    };

    let mut items = Vec::new();
    root.walk_custom_variables(&mut |variable| {
        let label = format!("${}", variable.key);
        items.push(CompletionItem {
            label: label.clone(),
            kind: Some(CompletionItemKind::VARIABLE),
            documentation: Some(Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::PlainText,
                value: variable.value_raw.clone(),
            })),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit::new(variable_range, label))),
            ..Default::default()
        });
    });

    let kind = expected_kind(root, line, equals, cursor, line_no);
    tracing::debug!(?kind, "value completion");
    match kind {
        ValueKind::Color | ValueKind::Gradient => {
            for (label, snippet, doc, deprecated) in COLOR_SNIPPETS {
                items.push(CompletionItem {
                    label: (*label).to_owned(),
                    kind: Some(CompletionItemKind::COLOR),
                    documentation: Some(Documentation::String((*doc).to_owned())),
                    insert_text_format: Some(InsertTextFormat::SNIPPET),
                    text_edit: Some(CompletionTextEdit::Edit(TextEdit::new(
                        at_cursor,
                        (*snippet).to_owned(),
                    ))),
                    tags: deprecated.then(|| vec![CompletionItemTag::DEPRECATED]),
                    ..Default::default()
                });
            }
        }
        ValueKind::Bool => {
            for label in ["true", "false"] {
                items.push(CompletionItem {
                    label: label.to_owned(),
                    kind: Some(CompletionItemKind::VALUE),
                    ..Default::default()
                });
            }
        }
        ValueKind::Modmask => {
            for (name, _) in ModKey::NAMES {
                items.push(CompletionItem {
                    label: (*name).to_owned(),
                    kind: Some(CompletionItemKind::ENUM_MEMBER),
                    ..Default::default()
                });
            }
        }
        _ => {}
    }
    items
}

/// Declared type of the value being written on `line`.
///
/// The first argument of a `bind` statement is its modifier mask; other
/// statement arguments and unknown keys are plain strings.
fn expected_kind(
    root: &Section,
    line: &str,
    equals: usize,
    cursor: usize,
    line_no: u32,
) -> ValueKind {
    let key = line[..equals].trim();
    if let Some(keyword) = schema::find_keyword(key) {
        let first_argument = !line[equals + 1..cursor].contains(',');
        return if keyword.name == "bind" && first_argument {
            ValueKind::Modmask
        } else {
            ValueKind::String
        };
    }
    let path = section_path(root, Position::new(line_no, column_of(line, equals)));
    schema::resolve_variable(&path, key)
        .and_then(|(_, variable)| variable.value_kind())
        .unwrap_or(ValueKind::String)
}

// ──────────────────────────────────────────────
// Left of `=`
// ──────────────────────────────────────────────

fn key_completions(root: &Section, position: Position) -> Vec<CompletionItem> {
    let at = from_lsp(position);
    let section = root.innermost_at(at);
    let path = section_path(root, position);
    let definition = schema::find_section_definition(&path);

    let mut items = Vec::new();
    if let Some(definition) = definition {
        for variable in &definition.variables {
            if section.assignments.iter().any(|a| a.key == variable.name) {
                continue;
            }
            items.push(CompletionItem {
                label: variable.name.clone(),
                kind: Some(CompletionItemKind::FIELD),
                documentation: Some(markdown(format!(
                    "Type: {}\n\n{}",
                    variable.type_name, variable.description
                ))),
                ..Default::default()
            });
        }
    }

    for keyword in schema::keywords() {
        items.push(CompletionItem {
            label: keyword.name.clone(),
            kind: Some(CompletionItemKind::KEYWORD),
            documentation: Some(markdown(keyword.description.clone())),
            ..Default::default()
        });
    }

    // At the top level every schema section can be opened.
    let (candidates, parent): (&[SectionDefinition], Option<&str>) = if path.is_empty() {
        (schema::sections(), None)
    } else {
        match definition {
            Some(def) => (def.subsections.as_slice(), Some(def.name())),
            None => (&[][..], None),
        }
    };
    for candidate in candidates {
        let name = candidate.name();
        if section
            .subsections
            .iter()
            .any(|opened| opened.name.eq_ignore_ascii_case(name))
        {
            continue;
        }
        let doc = match parent {
            Some(parent) => format!("Subsection of {parent}"),
            None => "Section".to_owned(),
        };
        items.push(CompletionItem {
            label: name.to_owned(),
            kind: Some(CompletionItemKind::MODULE),
            documentation: Some(markdown(doc)),
            ..Default::default()
        });
    }
    items
}

/// Names of the sections enclosing `position`, root excluded.
fn section_path(root: &Section, position: Position) -> Vec<&str> {
    root.sections_at(from_lsp(position))
        .into_iter()
        .skip(1)
        .map(|section| section.name.as_str())
        .collect()
}

fn markdown(value: String) -> Documentation {
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    })
}
