//! Typed view of a parsed configuration.
//!
//! Every assignment is checked against the schema for the section it sits
//! in and coerced to the declared type. Custom-variable references are
//! never substituted; a value that still contains one is reported as
//! unresolved instead of being guessed at.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ast::{GradientValue, Section, Statement, Value, ValueData, ValueKind};
use crate::error::DecodeError;
use crate::schema::{self, SectionDefinition};

/// Assignments grouped by section path, with custom variables and
/// statements collected alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Configuration {
    /// `$name` → raw value text, later definitions overriding earlier ones.
    pub custom_variables: BTreeMap<String, String>,
    /// `section:path` → variable → coerced value.
    pub sections: BTreeMap<String, BTreeMap<String, Value>>,
    /// Keyword statements in document order.
    pub statements: Vec<Statement>,
}

impl Configuration {
    pub fn get(&self, section: &str, variable: &str) -> Option<&Value> {
        self.sections.get(section)?.get(variable)
    }
}

/// Decode the tree rooted at `root`, stopping at the first error.
pub fn decode(root: &Section) -> Result<Configuration, DecodeError> {
    let mut config = Configuration::default();
    root.walk_custom_variables(&mut |variable| {
        config
            .custom_variables
            .insert(variable.key.clone(), variable.value_raw.clone());
    });
    decode_section(root, &mut Vec::new(), &mut config)?;
    Ok(config)
}

fn decode_section<'a>(
    section: &'a Section,
    path: &mut Vec<&'a str>,
    config: &mut Configuration,
) -> Result<(), DecodeError> {
    config.statements.extend(section.statements.iter().cloned());

    for assignment in &section.assignments {
        let (full_path, name) = schema::split_category_key(path, &assignment.key);
        let section_path = display_path(&full_path);
        let definition = schema::find_section_definition(&full_path);
        let Some(variable) = definition.and_then(|def| def.variable(name)) else {
            return Err(DecodeError::UnknownVariable {
                section: section_path,
                key: name.to_owned(),
                available: available_keys(definition),
            });
        };

        if let ValueData::Custom(raw) = &assignment.value.data {
            return Err(DecodeError::UnresolvedCustomVariable {
                section: section_path,
                key: name.to_owned(),
                raw: raw.clone(),
            });
        }

        // Types the parser has no kind for are kept as strings.
        let declared = variable.value_kind().unwrap_or(ValueKind::String);
        let Some(value) = coerce(declared, &assignment.value, &assignment.value_raw) else {
            return Err(DecodeError::TypeMismatch {
                section: section_path,
                key: name.to_owned(),
                expected: declared,
                found: assignment.value.kind(),
            });
        };
        config
            .sections
            .entry(section_path)
            .or_default()
            .insert(name.to_owned(), value);
    }

    for subsection in &section.subsections {
        path.push(&subsection.name);
        decode_section(subsection, path, config)?;
        path.pop();
    }
    Ok(())
}

/// Re-express `value` as `declared` where the classifier's precedence
/// picked a narrower kind, e.g. `1` for an integer variable.
pub fn coerce(declared: ValueKind, value: &Value, raw: &str) -> Option<Value> {
    let numeric = raw == "0" || raw == "1";
    let data = match (declared, &value.data) {
        (_, ValueData::Custom(_)) => return None,
        (kind, _) if kind == value.kind() => value.data.clone(),
        (ValueKind::String, _) => ValueData::String(raw.to_owned()),
        (ValueKind::Integer, ValueData::Bool(b)) if numeric => ValueData::Integer(i64::from(*b)),
        (ValueKind::Float, ValueData::Bool(b)) if numeric => {
            ValueData::Float(if *b { 1.0 } else { 0.0 })
        }
        (ValueKind::Float, ValueData::Integer(i)) => ValueData::Float(*i as f32),
        (ValueKind::Gradient, ValueData::Color(_)) => ValueData::Gradient(GradientValue {
            stops: vec![value.clone()],
            angle: 0.0,
        }),
        _ => return None,
    };
    Some(Value {
        data,
        start: value.start,
        end: value.end,
    })
}

fn display_path(path: &[&str]) -> String {
    if path.is_empty() {
        "general".to_owned()
    } else {
        path.join(":")
    }
}

fn available_keys(definition: Option<&SectionDefinition>) -> Vec<String> {
    definition
        .map(|def| def.variables.iter().map(|v| v.name.clone()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn decode_text(text: &str) -> Result<Configuration, DecodeError> {
        decode(&parse(text).expect("parses"))
    }

    #[test]
    fn decodes_known_variables() {
        let config = decode_text(
            "$mod = SUPER\ngeneral {\n  gaps_in = 5\n  layout = master\n}\ndecoration {\n  blur {\n    enabled = yes\n  }\n}\n",
        )
        .expect("decodes");
        assert_eq!(config.custom_variables["mod"], "SUPER");
        assert_eq!(
            config.get("general", "gaps_in").map(|v| &v.data),
            Some(&ValueData::Integer(5))
        );
        assert_eq!(
            config.get("general", "layout").map(|v| &v.data),
            Some(&ValueData::String("master".into()))
        );
        assert_eq!(
            config.get("decoration:blur", "enabled").map(|v| &v.data),
            Some(&ValueData::Bool(true))
        );
    }

    #[test]
    fn category_keys_decode_into_their_section() {
        let config = decode_text("decoration:blur:passes = 3\n").expect("decodes");
        assert_eq!(
            config.get("decoration:blur", "passes").map(|v| &v.data),
            Some(&ValueData::Integer(3))
        );
    }

    #[test]
    fn numeric_booleans_coerce_to_integers() {
        let config = decode_text("general {\n  border_size = 1\n}\n").expect("decodes");
        assert_eq!(
            config.get("general", "border_size").map(|v| &v.data),
            Some(&ValueData::Integer(1))
        );
    }

    #[test]
    fn word_booleans_do_not_coerce_to_integers() {
        let err = decode_text("general {\n  border_size = yes\n}\n").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TypeMismatch {
                expected: ValueKind::Integer,
                found: ValueKind::Bool,
                ..
            }
        ));
    }

    #[test]
    fn single_colour_is_a_one_stop_gradient() {
        let config =
            decode_text("general {\n  col.active_border = rgb(ff0000)\n}\n").expect("decodes");
        let Some(ValueData::Gradient(gradient)) =
            config.get("general", "col.active_border").map(|v| &v.data)
        else {
            panic!("expected gradient");
        };
        assert_eq!(gradient.stops.len(), 1);
    }

    #[test]
    fn unknown_variable_lists_available_keys() {
        let err = decode_text("general {\n  gap_in = 5\n}\n").unwrap_err();
        let DecodeError::UnknownVariable {
            section,
            key,
            available,
        } = &err
        else {
            panic!("expected unknown variable, got {err:?}");
        };
        assert_eq!(section, "general");
        assert_eq!(key, "gap_in");
        assert!(available.iter().any(|k| k == "gaps_in"));
        assert!(err.to_string().starts_with("unknown variable general > gap_in"));
    }

    #[test]
    fn custom_references_are_not_resolved() {
        let err = decode_text("$gap = 4\ngeneral {\n  gaps_in = $gap\n}\n").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnresolvedCustomVariable {
                section: "general".into(),
                key: "gaps_in".into(),
                raw: "$gap".into(),
            }
        );
    }

    #[test]
    fn statements_are_collected_in_order() {
        let config =
            decode_text("exec-once = waybar\nbind = SUPER, Q, exec, kitty\n").expect("decodes");
        let keywords: Vec<_> = config.statements.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, ["exec-once", "bind"]);
    }
}
