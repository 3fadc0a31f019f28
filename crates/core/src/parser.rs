//! Line-oriented structural parser.
//!
//! Each physical line does at most three things, checked independently:
//! a line ending in `{` opens a section, a line containing `=` records an
//! assignment, statement or custom variable in the enclosing section, and
//! a line that is exactly `}` closes the innermost open section. Blank
//! lines and lines starting with `#` are skipped.
//!
//! Open sections live on a stack of owned nodes; a closed section is moved
//! into its parent, so no reference into the tree is held while it grows.

use crate::ast::{Assignment, CustomVariable, Position, Section, Statement, Value};
use crate::error::ParseError;
use crate::schema;
use crate::text::{column_of, indentation_column, utf16_len};
use crate::value::classify;

/// Parse a whole document into its root section.
///
/// Sections still open at the end of the input are closed at the end of
/// the last line. A `}` with nothing open is
/// [`ParseError::MalformedSectionNesting`].
pub fn parse(text: &str) -> Result<Section, ParseError> {
    let mut stack = vec![Section::root()];
    let mut last_line = 0u32;
    let mut last_line_len = 0u32;

    for (index, original) in text.split('\n').enumerate() {
        let line_no = index as u32;
        let line = original.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let enclosing = stack.len() - 1;

        if let Some(header) = line.strip_suffix('{') {
            let brace = original.rfind('{').unwrap_or_default();
            stack.push(Section::named(
                header.trim(),
                Position::new(line_no, column_of(original, brace)),
            ));
        }

        if line.contains('=') {
            record_line(&mut stack[enclosing], original, line_no);
        }

        if line == "}" {
            let brace = original.find('}').unwrap_or_default();
            close_section(&mut stack, Position::new(line_no, column_of(original, brace)))?;
        }

        last_line = line_no;
        last_line_len = utf16_len(original.trim_end());
    }

    while stack.len() > 1 {
        close_section(&mut stack, Position::new(last_line, last_line_len))?;
    }
    let mut root = stack.pop().unwrap_or_else(Section::root);
    // The root spans whole lines, but never ends before its last child.
    let child_end = root.subsections.last().map(|section| section.end);
    root.end = child_end.map_or(Position::new(last_line, 0), |end| {
        end.max(Position::new(last_line, 0))
    });
    Ok(root)
}

fn close_section(stack: &mut Vec<Section>, end: Position) -> Result<(), ParseError> {
    let unbalanced = || ParseError::MalformedSectionNesting { line: end.line };
    if stack.len() < 2 {
        return Err(unbalanced());
    }
    let mut closed = stack.pop().ok_or_else(unbalanced)?;
    closed.end = end;
    stack.last_mut().ok_or_else(unbalanced)?.subsections.push(closed);
    Ok(())
}

/// Classify a `key = value` line and append it to `section`.
fn record_line(section: &mut Section, original: &str, line_no: u32) {
    let Some(pair) = split_key_value(original, line_no) else {
        return;
    };
    let position = Position::new(line_no, indentation_column(original));

    if let Some(name) = pair.key.strip_prefix('$') {
        section.variables.push(CustomVariable {
            assignment: Assignment {
                key: name.to_owned(),
                value: classify(&pair.value, pair.value_start),
                value_raw: pair.value,
                position,
            },
        });
    } else if schema::find_keyword(&pair.key).is_some() {
        section.statements.push(Statement {
            arguments: split_arguments(&pair.value, pair.value_start),
            keyword: pair.key,
            value_raw: pair.value,
            position,
        });
    } else {
        section.assignments.push(Assignment {
            value: classify(&pair.value, pair.value_start),
            key: pair.key,
            value_raw: pair.value,
            position,
        });
    }
}

/// Key and value text of an assignment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Text before the first `=`, trimmed.
    pub key: String,
    /// Text after the first `=`, without surrounding whitespace or an
    /// inline `#` comment.
    pub value: String,
    /// Position of the value's first character. Empty values sit where
    /// they would have started.
    pub value_start: Position,
}

enum Scan {
    Key,
    BeforeValue,
    Value,
}

/// Split an assignment line into key and value with a character scan.
///
/// The first `=` ends the key; later ones belong to the value. After it,
/// whitespace is skipped up to the value's first character, and the first
/// `#` from there on starts a comment that is cut off. Returns `None` when
/// the line has no `=`.
pub fn split_key_value(original: &str, line_no: u32) -> Option<KeyValue> {
    let mut state = Scan::Key;
    let mut equals = None;
    let mut value_from = None;
    let mut value_to = original.len();

    for (index, c) in original.char_indices() {
        match state {
            Scan::Key if c == '=' => {
                equals = Some(index);
                state = Scan::BeforeValue;
            }
            Scan::Key => {}
            Scan::BeforeValue if c.is_whitespace() => {}
            Scan::BeforeValue if c == '#' => {
                value_from = Some(index);
                value_to = index;
                break;
            }
            Scan::BeforeValue => {
                value_from = Some(index);
                state = Scan::Value;
            }
            Scan::Value if c == '#' => {
                value_to = index;
                break;
            }
            Scan::Value => {}
        }
    }

    let equals = equals?;
    let value_from = value_from.unwrap_or(original.trim_end().len().max(equals + 1));
    let value = original[value_from..value_to.max(value_from)].trim_end();
    Some(KeyValue {
        key: original[..equals].trim().to_owned(),
        value: value.to_owned(),
        value_start: Position::new(line_no, column_of(original, value_from)),
    })
}

/// Comma-separated statement arguments, each trimmed and classified with
/// a span relative to `start`.
fn split_arguments(value: &str, start: Position) -> Vec<Value> {
    let mut arguments = Vec::new();
    let mut offset = 0;
    for piece in value.split(',') {
        let leading = piece.len() - piece.trim_start().len();
        let column = start.column + utf16_len(&value[..offset + leading]);
        arguments.push(classify(piece.trim(), Position::new(start.line, column)));
        offset += piece.len() + 1;
    }
    arguments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ValueData, ValueKind};

    #[test]
    fn splits_key_and_value() {
        let pair = split_key_value("  foo = bar  # comment", 5).expect("has =");
        assert_eq!(pair.key, "foo");
        assert_eq!(pair.value, "bar");
        assert_eq!(pair.value_start, Position::new(5, 8));
    }

    #[test]
    fn later_equals_signs_stay_in_the_value() {
        let pair = split_key_value("foo = a=b", 0).expect("has =");
        assert_eq!(pair.key, "foo");
        assert_eq!(pair.value, "a=b");
    }

    #[test]
    fn hash_inside_value_starts_a_comment() {
        let pair = split_key_value("col = rgb(ff0000)#tail", 0).expect("has =");
        assert_eq!(pair.value, "rgb(ff0000)");
    }

    #[test]
    fn empty_values() {
        let pair = split_key_value("foo =", 2).expect("has =");
        assert_eq!(pair.value, "");
        assert_eq!(pair.value_start, Position::new(2, 5));

        let pair = split_key_value("foo =   # nothing", 2).expect("has =");
        assert_eq!(pair.value, "");
        assert_eq!(pair.value_start, Position::new(2, 8));
    }

    #[test]
    fn lines_without_equals_are_not_pairs() {
        assert!(split_key_value("general {", 0).is_none());
    }

    #[test]
    fn statement_arguments_are_classified_separately() {
        let args = split_arguments("SUPER, Q, exec, kitty", Position::new(0, 7));
        let kinds: Vec<_> = args.iter().map(Value::kind).collect();
        assert_eq!(
            kinds,
            [
                ValueKind::Modmask,
                ValueKind::String,
                ValueKind::String,
                ValueKind::String
            ]
        );
        assert_eq!(args[1].start, Position::new(0, 14));
        assert_eq!(args[3].data, ValueData::String("kitty".into()));
        assert_eq!(args[3].start, Position::new(0, 23));
    }

    #[test]
    fn unmatched_close_is_an_error() {
        let err = parse("a = 1\n}\n").unwrap_err();
        assert_eq!(err, ParseError::MalformedSectionNesting { line: 1 });
        assert_eq!(err.to_string(), "line 2: closing brace has no matching open section");
    }

    #[test]
    fn unclosed_sections_end_with_the_document() {
        let root = parse("general {\n  gaps_in = 5\n").expect("parses");
        let general = &root.subsections[0];
        assert_eq!(general.name, "general");
        assert_eq!(general.end, Position::new(1, 13));
        assert_eq!(general.assignments.len(), 1);
        assert_eq!(root.end, Position::new(1, 13));
        assert!(root.span().end >= general.span().end);
    }

    #[test]
    fn closed_sections_leave_the_root_at_line_start() {
        let root = parse("general {
}
").expect("parses");
        assert_eq!(root.subsections[0].end, Position::new(1, 0));
        assert_eq!(root.end, Position::new(1, 0));
    }
}
