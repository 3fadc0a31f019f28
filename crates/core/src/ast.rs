//! Document model produced by the parser.
//!
//! A parsed file is a tree of [`Section`]s rooted at an implicit top-level
//! section named [`ROOT_SECTION_NAME`]. Every node records where it came
//! from so editor features can map results back onto the text.

use std::fmt;
use std::ops::Deref;

use serde::Serialize;

use crate::color::Rgba;

/// Name given to the implicit top-level section.
pub const ROOT_SECTION_NAME: &str = "General";

// ──────────────────────────────────────────────
// Positions
// ──────────────────────────────────────────────

/// Zero-based line and UTF-16 column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// A start/end pair of positions. Containment is inclusive at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

// ──────────────────────────────────────────────
// Tree nodes
// ──────────────────────────────────────────────

/// A brace-delimited scope, or the implicit root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub start: Position,
    pub end: Position,
    pub assignments: Vec<Assignment>,
    pub variables: Vec<CustomVariable>,
    pub statements: Vec<Statement>,
    pub subsections: Vec<Section>,
}

/// `key = value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub key: String,
    pub value: Value,
    /// Value text with any trailing comment and surrounding whitespace removed.
    pub value_raw: String,
    /// First non-whitespace character of the line.
    pub position: Position,
}

/// `$key = value`, stored with the `$` stripped from the key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CustomVariable {
    pub assignment: Assignment,
}

impl Deref for CustomVariable {
    type Target = Assignment;

    fn deref(&self) -> &Assignment {
        &self.assignment
    }
}

/// A keyword invocation such as `bind = SUPER, Q, exec, kitty`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    /// The keyword as written, flags included (`binde`, `exec-once`).
    pub keyword: String,
    /// Comma-separated arguments, each classified on its own.
    pub arguments: Vec<Value>,
    pub value_raw: String,
    pub position: Position,
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Integer,
    Bool,
    Float,
    Color,
    Vec2,
    Modmask,
    String,
    Gradient,
    /// Contains a `$variable` reference; the concrete kind is unknown.
    Custom,
}

impl ValueKind {
    /// Map a type name used by the schema to a kind.
    pub fn from_type_name(name: &str) -> Option<ValueKind> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(ValueKind::Integer),
            "bool" => Some(ValueKind::Bool),
            "float" | "floatvalue" => Some(ValueKind::Float),
            "color" => Some(ValueKind::Color),
            "vec2" => Some(ValueKind::Vec2),
            "mod" | "modmask" => Some(ValueKind::Modmask),
            "str" | "string" => Some(ValueKind::String),
            "gradient" => Some(ValueKind::Gradient),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Bool => "bool",
            ValueKind::Float => "float",
            ValueKind::Color => "color",
            ValueKind::Vec2 => "vec2",
            ValueKind::Modmask => "modmask",
            ValueKind::String => "string",
            ValueKind::Gradient => "gradient",
            ValueKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyboard modifier usable in a modmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModKey {
    Shift,
    Caps,
    Control,
    Alt,
    Mod2,
    Mod3,
    Super,
    Mod5,
}

impl ModKey {
    /// Every accepted spelling, aliases included.
    pub const NAMES: &'static [(&'static str, ModKey)] = &[
        ("SHIFT", ModKey::Shift),
        ("CAPS", ModKey::Caps),
        ("CONTROL", ModKey::Control),
        ("CTRL", ModKey::Control),
        ("ALT", ModKey::Alt),
        ("MOD2", ModKey::Mod2),
        ("MOD3", ModKey::Mod3),
        ("SUPER", ModKey::Super),
        ("WIN", ModKey::Super),
        ("LOGO", ModKey::Super),
        ("MOD4", ModKey::Super),
        ("MOD5", ModKey::Mod5),
    ];

    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<ModKey> {
        ModKey::NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, key)| *key)
    }
}

/// Colour stops plus an angle in degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradientValue {
    /// Each stop is a [`ValueData::Color`] carrying its own span.
    pub stops: Vec<Value>,
    pub angle: f32,
}

/// Decoded payload of a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ValueData {
    Integer(i64),
    Bool(bool),
    Float(f32),
    Color(Rgba),
    Vec2([f32; 2]),
    Modmask(Vec<ModKey>),
    String(String),
    Gradient(GradientValue),
    Custom(String),
}

/// A classified value and the span of its text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    #[serde(flatten)]
    pub data: ValueData,
    pub start: Position,
    pub end: Position,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self.data {
            ValueData::Integer(_) => ValueKind::Integer,
            ValueData::Bool(_) => ValueKind::Bool,
            ValueData::Float(_) => ValueKind::Float,
            ValueData::Color(_) => ValueKind::Color,
            ValueData::Vec2(_) => ValueKind::Vec2,
            ValueData::Modmask(_) => ValueKind::Modmask,
            ValueData::String(_) => ValueKind::String,
            ValueData::Gradient(_) => ValueKind::Gradient,
            ValueData::Custom(_) => ValueKind::Custom,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self.data {
            ValueData::Color(color) => Some(color),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Section queries and walkers
// ──────────────────────────────────────────────

impl Section {
    /// An empty root section starting at the top of the document.
    pub fn root() -> Self {
        Section::named(ROOT_SECTION_NAME, Position::default())
    }

    pub(crate) fn named(name: &str, start: Position) -> Self {
        Section {
            name: name.to_owned(),
            start,
            end: start,
            assignments: Vec::new(),
            variables: Vec::new(),
            statements: Vec::new(),
            subsections: Vec::new(),
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Whether `position` falls between the section's braces, inclusive.
    pub fn contains(&self, position: Position) -> bool {
        self.span().contains(position)
    }

    /// Chain of sections enclosing `position`, outermost (this one) first.
    ///
    /// The root is treated as covering the whole document since its end is
    /// only recorded to line precision.
    pub fn sections_at(&self, position: Position) -> Vec<&Section> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(inner) = current
            .subsections
            .iter()
            .find(|sub| sub.contains(position))
        {
            chain.push(inner);
            current = inner;
        }
        chain
    }

    /// Innermost section enclosing `position`.
    pub fn innermost_at(&self, position: Position) -> &Section {
        self.sections_at(position)
            .last()
            .copied()
            .unwrap_or(self)
    }

    /// The assignment that starts on `line`, if any, in this section only.
    pub fn assignment_on_line(&self, line: u32) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.position.line == line)
    }

    /// First direct subsection called `name`.
    pub fn subsection(&self, name: &str) -> Option<&Section> {
        self.subsections.iter().find(|s| s.name == name)
    }

    /// Last assignment of `key` in this section; later ones override.
    pub fn assignment(&self, key: &str) -> Option<&Assignment> {
        self.assignments.iter().rev().find(|a| a.key == key)
    }

    /// Deepest nesting below this section; 0 when it has no subsections.
    pub fn max_depth(&self) -> usize {
        self.subsections
            .iter()
            .map(|s| s.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Visit every assignment value of this section and its descendants,
    /// depth first, in declaration order.
    pub fn walk_values<'a>(&'a self, f: &mut impl FnMut(&'a Assignment, &'a Value)) {
        for assignment in &self.assignments {
            f(assignment, &assignment.value);
        }
        for section in &self.subsections {
            section.walk_values(f);
        }
    }

    /// Visit every custom variable definition exactly once.
    pub fn walk_custom_variables<'a>(&'a self, f: &mut impl FnMut(&'a CustomVariable)) {
        for variable in &self.variables {
            f(variable);
        }
        for section in &self.subsections {
            section.walk_custom_variables(f);
        }
    }

    /// Visit this section and every descendant, parents before children.
    pub fn walk_sections<'a>(&'a self, f: &mut impl FnMut(&'a Section)) {
        f(self);
        for section in &self.subsections {
            section.walk_sections(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(data: ValueData) -> Value {
        Value {
            data,
            start: Position::default(),
            end: Position::default(),
        }
    }

    fn section(name: &str, start: (u32, u32), end: (u32, u32)) -> Section {
        let mut s = Section::named(name, Position::new(start.0, start.1));
        s.end = Position::new(end.0, end.1);
        s
    }

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 1) < Position::new(2, 4));
    }

    #[test]
    fn span_contains_is_inclusive() {
        let span = Span::new(Position::new(1, 4), Position::new(3, 0));
        assert!(span.contains(Position::new(1, 4)));
        assert!(span.contains(Position::new(3, 0)));
        assert!(!span.contains(Position::new(3, 1)));
        assert!(!span.contains(Position::new(1, 3)));
    }

    #[test]
    fn innermost_section_follows_nesting() {
        let mut root = Section::root();
        root.end = Position::new(20, 0);
        let mut decoration = section("decoration", (1, 11), (10, 0));
        decoration.subsections.push(section("blur", (3, 9), (6, 4)));
        root.subsections.push(decoration);

        assert_eq!(root.innermost_at(Position::new(4, 2)).name, "blur");
        assert_eq!(root.innermost_at(Position::new(8, 2)).name, "decoration");
        assert_eq!(root.innermost_at(Position::new(15, 0)).name, "General");
        let names: Vec<_> = root
            .sections_at(Position::new(4, 2))
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["General", "decoration", "blur"]);
    }

    #[test]
    fn max_depth_counts_nesting_levels() {
        let mut root = Section::root();
        assert_eq!(root.max_depth(), 0);
        let mut outer = section("a", (0, 2), (5, 0));
        outer.subsections.push(section("b", (1, 2), (2, 0)));
        root.subsections.push(outer);
        root.subsections.push(section("c", (6, 2), (7, 0)));
        assert_eq!(root.max_depth(), 2);
    }

    #[test]
    fn value_kind_reflects_payload() {
        assert_eq!(value(ValueData::Integer(3)).kind(), ValueKind::Integer);
        assert_eq!(
            value(ValueData::Custom("$x".into())).kind(),
            ValueKind::Custom
        );
        assert_eq!(
            value(ValueData::Gradient(GradientValue::default())).kind(),
            ValueKind::Gradient
        );
    }

    #[test]
    fn type_names_map_to_kinds() {
        assert_eq!(ValueKind::from_type_name("int"), Some(ValueKind::Integer));
        assert_eq!(ValueKind::from_type_name("MOD"), Some(ValueKind::Modmask));
        assert_eq!(ValueKind::from_type_name("str"), Some(ValueKind::String));
        assert_eq!(
            ValueKind::from_type_name("Gradient"),
            Some(ValueKind::Gradient)
        );
        assert_eq!(ValueKind::from_type_name("font_weight"), None);
    }

    #[test]
    fn mod_keys_accept_aliases() {
        assert_eq!(ModKey::from_name("super"), Some(ModKey::Super));
        assert_eq!(ModKey::from_name("Win"), Some(ModKey::Super));
        assert_eq!(ModKey::from_name("ctrl"), Some(ModKey::Control));
        assert_eq!(ModKey::from_name("hyper"), None);
    }
}
