//! Hover documentation for variables and keywords.
//!
//! The key of the line under the cursor is looked up in the schema, first
//! for the section the cursor sits in, then in any section, then among
//! the statement keywords.

use hyprls_core::schema::{self, KeywordDefinition, SectionDefinition, VariableDefinition};
use hyprls_core::text::{column_of, line_at};
use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position, Range};

use crate::position::from_lsp;

/// Compute hover information for the line at `position`.
///
/// Lines without `=` have no hover. A document with unbalanced braces
/// still gets hover, resolved without section context.
pub fn compute_hover(content: &str, position: Position) -> Option<Hover> {
    let line = line_at(content, position.line)?;
    let (key, _) = line.split_once('=')?;
    let key = key.trim();

    let path = section_path(content, position);
    let path: Vec<&str> = path.iter().map(String::as_str).collect();
    let markdown = match schema::resolve_variable(&path, key)
        .or_else(|| schema::find_variable_anywhere(key.rsplit(':').next().unwrap_or(key)))
    {
        Some((section, variable)) => variable_markdown(section, variable),
        None => keyword_markdown(schema::find_keyword(key)?),
    };

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: markdown,
        }),
        range: Some(content_range(line, position.line)),
    })
}

/// Names of the sections enclosing `position`, root excluded.
fn section_path(content: &str, position: Position) -> Vec<String> {
    match hyprls_core::parse(content) {
        Ok(root) => root
            .sections_at(from_lsp(position))
            .iter()
            .skip(1)
            .map(|section| section.name.clone())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn variable_markdown(section: &SectionDefinition, variable: &VariableDefinition) -> String {
    let mut markdown = format!(
        "### {}: {} ({})\n{}\n",
        section.path.join(":"),
        variable.name,
        variable.type_name,
        variable.description
    );
    if let Some(default) = variable.pretty_default() {
        markdown.push_str(&format!("\n- Defaults to: {default}\n"));
    }
    markdown
}

fn keyword_markdown(keyword: &KeywordDefinition) -> String {
    let flags = if keyword.flags.is_empty() {
        String::new()
    } else {
        let names: Vec<String> = keyword.flags.iter().map(char::to_string).collect();
        format!("\n- Accepts the following flags: {}\n", names.join(", "))
    };
    format!(
        "### {} [[docs]]({}){}\n{}",
        keyword.name,
        keyword.documentation_link(),
        flags,
        keyword.description
    )
}

/// Span of the line from its first to its last non-blank character.
fn content_range(line: &str, line_no: u32) -> Range {
    let blank = |c: char| c == ' ' || c == '\t';
    let start = line.len() - line.trim_start_matches(blank).len();
    let end = line.trim_end_matches(blank).len();
    Range::new(
        Position::new(line_no, column_of(line, start)),
        Position::new(line_no, column_of(line, end)),
    )
}
