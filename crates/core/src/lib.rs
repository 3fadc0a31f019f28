//! hyprls-core: parser, value model and schema registry for Hyprland
//! configuration files.
//!
//! # Public API
//!
//! Key entry points are re-exported at the crate root:
//!
//! - [`parse()`] -- build the section tree for a document
//! - [`classify()`] -- type a single value's text
//! - [`decode()`] -- coerce a parsed tree against the schema
//! - [`decode_color()`] / [`encode_color()`] -- colour literal codec
//!
//! Schema lookups live in [`schema`]; UTF-16 column helpers in [`text`].

pub mod ast;
pub mod color;
pub mod decode;
pub mod error;
pub mod parser;
pub mod schema;
pub mod text;
pub mod value;

// ── Convenience re-exports: document model ───────────────────────────

pub use ast::{
    Assignment, CustomVariable, GradientValue, ModKey, Position, Section, Span, Statement, Value,
    ValueData, ValueKind, ROOT_SECTION_NAME,
};
pub use color::{decode_color, decode_color_unit, encode_color, Rgba};
pub use error::{DecodeError, ParseError};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use decode::{decode, Configuration};
pub use parser::parse;
pub use value::classify;
