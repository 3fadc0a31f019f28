//! Read-only catalog of known sections, variables and keywords.
//!
//! The catalog ships inside the binary as JSON (`data/schema.json`) and is
//! deserialised the first time it is consulted. Nothing mutates it after
//! that, so lookups are safe from any thread.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::ast::{ValueKind, ROOT_SECTION_NAME};

static SCHEMA_JSON: &str = include_str!("../data/schema.json");

static SCHEMA: Lazy<Schema> =
    Lazy::new(|| serde_json::from_str(SCHEMA_JSON).expect("embedded schema.json is valid"));

/// Section that top-level assignments are resolved against.
const ROOT_SCHEMA_SECTION: &str = "general";

#[derive(Debug, Deserialize)]
struct Schema {
    sections: Vec<SectionDefinition>,
    keywords: Vec<KeywordDefinition>,
}

/// A documented section and its variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDefinition {
    /// Names from the outermost section down to this one.
    pub path: Vec<String>,
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub subsections: Vec<SectionDefinition>,
}

impl SectionDefinition {
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn subsection(&self, name: &str) -> Option<&SectionDefinition> {
        self.subsections
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

/// A documented variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub default: Option<String>,
}

impl VariableDefinition {
    /// Default value formatted for display, `None` when undocumented.
    pub fn pretty_default(&self) -> Option<&str> {
        match self.default.as_deref() {
            Some("[[Empty]]") => Some("*(empty)*"),
            other => other,
        }
    }

    pub fn value_kind(&self) -> Option<ValueKind> {
        ValueKind::from_type_name(&self.type_name)
    }
}

/// A statement keyword and the flag letters it accepts as a suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDefinition {
    pub name: String,
    pub description: String,
    pub documentation_file: String,
    pub documentation_heading: String,
    #[serde(default)]
    pub flags: Vec<char>,
}

impl KeywordDefinition {
    pub fn documentation_link(&self) -> String {
        format!(
            "https://wiki.hyprland.org/Configuring/{}/#{}",
            self.documentation_file, self.documentation_heading
        )
    }

    /// `key` is this keyword, optionally followed by any of its flags in
    /// any order and repetition.
    pub fn matches(&self, key: &str) -> bool {
        if key == self.name {
            return true;
        }
        if self.flags.is_empty() {
            return false;
        }
        match key.strip_prefix(self.name.as_str()) {
            Some(suffix) => suffix.chars().all(|flag| self.flags.contains(&flag)),
            None => false,
        }
    }
}

/// Top-level section definitions.
pub fn sections() -> &'static [SectionDefinition] {
    &SCHEMA.sections
}

/// All keyword definitions, in catalog order.
pub fn keywords() -> &'static [KeywordDefinition] {
    &SCHEMA.keywords
}

/// Resolve a section path as seen in a document.
///
/// A leading root section name is ignored and an empty path means the
/// top level, which resolves to the `general` section. Names compare
/// case-insensitively.
pub fn find_section_definition(path: &[&str]) -> Option<&'static SectionDefinition> {
    let path = match path.split_first() {
        Some((first, rest)) if *first == ROOT_SECTION_NAME => rest,
        _ => path,
    };
    let (first, rest) = match path.split_first() {
        Some(split) => split,
        None => return find_top_level(ROOT_SCHEMA_SECTION),
    };
    let mut current = find_top_level(first)?;
    for name in rest {
        current = current.subsection(name)?;
    }
    Some(current)
}

/// First section, at any depth, whose own name is `name`.
///
/// The root section name resolves like an empty path.
pub fn find_section_by_name(name: &str) -> Option<&'static SectionDefinition> {
    if name == ROOT_SECTION_NAME {
        return find_top_level(ROOT_SCHEMA_SECTION);
    }
    fn search<'a>(defs: &'a [SectionDefinition], name: &str) -> Option<&'a SectionDefinition> {
        defs.iter().find_map(|def| {
            if def.name().eq_ignore_ascii_case(name) {
                Some(def)
            } else {
                search(&def.subsections, name)
            }
        })
    }
    search(sections(), name)
}

/// Variable `variable_name` of the section named `section_name`.
pub fn find_variable_definition(
    section_name: &str,
    variable_name: &str,
) -> Option<&'static VariableDefinition> {
    find_section_by_name(section_name)?.variable(variable_name)
}

/// Resolve `key` as written inside the section at `path`.
///
/// Keys may carry a `category:` prefix (`decoration:blur:enabled`), which
/// extends the path before the variable is looked up.
pub fn resolve_variable(
    path: &[&str],
    key: &str,
) -> Option<(&'static SectionDefinition, &'static VariableDefinition)> {
    let (full_path, name) = split_category_key(path, key);
    let section = find_section_definition(&full_path)?;
    Some((section, section.variable(name)?))
}

/// Search every section for a variable called `name`, outermost first.
pub fn find_variable_anywhere(
    name: &str,
) -> Option<(&'static SectionDefinition, &'static VariableDefinition)> {
    fn search<'a>(
        defs: &'a [SectionDefinition],
        name: &str,
    ) -> Option<(&'a SectionDefinition, &'a VariableDefinition)> {
        defs.iter().find_map(|def| match def.variable(name) {
            Some(var) => Some((def, var)),
            None => search(&def.subsections, name),
        })
    }
    search(sections(), name)
}

/// Keyword definition matched by `key`, accepting flag suffixes.
pub fn find_keyword(key: &str) -> Option<&'static KeywordDefinition> {
    keywords().iter().find(|keyword| keyword.matches(key))
}

/// Split `a:b:var` into the extended path and the variable name.
pub fn split_category_key<'a>(path: &[&'a str], key: &'a str) -> (Vec<&'a str>, &'a str) {
    let mut full_path: Vec<&str> = path
        .iter()
        .copied()
        .filter(|name| *name != ROOT_SECTION_NAME)
        .collect();
    let mut segments: Vec<&str> = key.split(':').collect();
    let name = segments.pop().unwrap_or(key);
    full_path.extend(segments);
    (full_path, name)
}

fn find_top_level(name: &str) -> Option<&'static SectionDefinition> {
    sections()
        .iter()
        .find(|def| def.name().eq_ignore_ascii_case(name))
}
