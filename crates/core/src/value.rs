//! Value classification.
//!
//! A value's text is tried against each grammar in [`GRAMMARS`] order and
//! the first one that accepts decides the kind. The order is significant:
//! `$` references win over everything, and `1`/`0` are booleans before
//! they are integers. Text no grammar accepts is kept as a string.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{GradientValue, ModKey, Position, Value, ValueData};
use crate::color::decode_color;
use crate::text::utf16_len;

static GRADIENT_ANGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)deg$").expect("angle pattern compiles"));

static MOD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("separator pattern compiles"));

type Grammar = fn(&str, Position) -> Option<ValueData>;

/// Grammars in precedence order.
const GRAMMARS: [Grammar; 8] = [
    parse_custom,
    parse_bool,
    parse_modmask,
    parse_gradient,
    parse_color,
    parse_integer,
    parse_float,
    parse_vec2,
];

/// Classify `raw`, which starts at `start` in the document.
///
/// Never fails: text that matches nothing else becomes a string. The
/// value's end is `start` advanced by the UTF-16 length of `raw`.
pub fn classify(raw: &str, start: Position) -> Value {
    let data = GRAMMARS
        .iter()
        .find_map(|grammar| grammar(raw, start))
        .unwrap_or_else(|| ValueData::String(raw.to_owned()));
    Value {
        data,
        start,
        end: Position::new(start.line, start.column + utf16_len(raw)),
    }
}

fn parse_custom(raw: &str, _: Position) -> Option<ValueData> {
    raw.contains('$').then(|| ValueData::Custom(raw.to_owned()))
}

fn parse_bool(raw: &str, _: Position) -> Option<ValueData> {
    match raw {
        "true" | "yes" | "on" | "1" => Some(ValueData::Bool(true)),
        "false" | "no" | "off" | "0" => Some(ValueData::Bool(false)),
        _ => None,
    }
}

/// Every token between runs of non-alphanumeric separators must name a
/// modifier. Only empty text is an empty mask; a leading or trailing
/// separator leaves an empty token, which names nothing.
fn parse_modmask(raw: &str, _: Position) -> Option<ValueData> {
    if raw.is_empty() {
        return Some(ValueData::Modmask(Vec::new()));
    }
    MOD_SEPARATOR
        .split(raw)
        .map(ModKey::from_name)
        .collect::<Option<Vec<_>>>()
        .map(ValueData::Modmask)
}

/// Space-separated colour stops, optionally ending in `<n>deg`.
///
/// At least two tokens are required. Runs of spaces are skipped, and each
/// stop's span is computed from its offset in `raw`.
fn parse_gradient(raw: &str, start: Position) -> Option<ValueData> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    for token in raw.split(' ') {
        if !token.is_empty() {
            tokens.push((offset, token));
        }
        offset += token.len() + 1;
    }
    if tokens.len() < 2 {
        return None;
    }

    let mut gradient = GradientValue::default();
    let last = tokens.len() - 1;
    for (index, (offset, token)) in tokens.into_iter().enumerate() {
        match decode_color(token) {
            Some(color) => {
                let column = start.column + utf16_len(&raw[..offset]);
                gradient.stops.push(Value {
                    data: ValueData::Color(color),
                    start: Position::new(start.line, column),
                    end: Position::new(start.line, column + utf16_len(token)),
                });
            }
            None if index == last => {
                let caps = GRADIENT_ANGLE.captures(token)?;
                gradient.angle = caps[1].parse().ok()?;
            }
            None => return None,
        }
    }
    Some(ValueData::Gradient(gradient))
}

fn parse_color(raw: &str, _: Position) -> Option<ValueData> {
    decode_color(raw).map(ValueData::Color)
}

fn parse_integer(raw: &str, _: Position) -> Option<ValueData> {
    raw.parse().ok().map(ValueData::Integer)
}

// `f32::from_str` also takes `inf` and `nan`, which are not numbers here.
fn parse_float(raw: &str, _: Position) -> Option<ValueData> {
    number(raw).map(ValueData::Float)
}

fn number(raw: &str) -> Option<f32> {
    if !raw.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_vec2(raw: &str, _: Position) -> Option<ValueData> {
    let mut parts = raw.split(' ');
    let x = number(parts.next()?)?;
    let y = number(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(ValueData::Vec2([x, y]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ValueKind;
    use crate::color::Rgba;

    fn kind_of(raw: &str) -> ValueKind {
        classify(raw, Position::default()).kind()
    }

    fn data_of(raw: &str) -> ValueData {
        classify(raw, Position::default()).data
    }

    #[test]
    fn custom_reference_wins_over_everything() {
        assert_eq!(kind_of("$myvar"), ValueKind::Custom);
        assert_eq!(kind_of("rgb($accent)"), ValueKind::Custom);
        assert_eq!(kind_of("$gap 10"), ValueKind::Custom);
        assert_eq!(data_of("$x"), ValueData::Custom("$x".into()));
    }

    #[test]
    fn one_and_zero_are_booleans() {
        assert_eq!(data_of("1"), ValueData::Bool(true));
        assert_eq!(data_of("0"), ValueData::Bool(false));
        assert_eq!(data_of("true"), ValueData::Bool(true));
        assert_eq!(data_of("off"), ValueData::Bool(false));
    }

    #[test]
    fn booleans_are_case_sensitive() {
        assert_eq!(kind_of("True"), ValueKind::String);
        assert_eq!(kind_of("YES"), ValueKind::String);
    }

    #[test]
    fn numbers() {
        assert_eq!(data_of("10"), ValueData::Integer(10));
        assert_eq!(data_of("-3"), ValueData::Integer(-3));
        assert_eq!(kind_of("3.14"), ValueKind::Float);
        assert_eq!(data_of("2.75"), ValueData::Float(2.75));
        assert_eq!(data_of("-0.5"), ValueData::Float(-0.5));
    }

    #[test]
    fn modmask_collects_every_modifier() {
        assert_eq!(
            data_of("SUPER,SHIFT"),
            ValueData::Modmask(vec![ModKey::Super, ModKey::Shift])
        );
        assert_eq!(
            data_of("ctrl + alt"),
            ValueData::Modmask(vec![ModKey::Control, ModKey::Alt])
        );
        assert_eq!(data_of("SUPER"), ValueData::Modmask(vec![ModKey::Super]));
        assert_eq!(data_of(""), ValueData::Modmask(vec![]));
    }

    #[test]
    fn modmask_rejects_unknown_tokens() {
        assert_eq!(kind_of("SUPER,Q"), ValueKind::String);
        assert_eq!(kind_of("hello world"), ValueKind::String);
    }

    #[test]
    fn punctuation_alone_is_not_a_modmask() {
        for raw in ["-", ",", "*", "SUPER_", ", SUPER", "SUPER,"] {
            assert_eq!(kind_of(raw), ValueKind::String, "{raw:?}");
        }
    }

    #[test]
    fn separator_runs_split_once() {
        assert_eq!(
            data_of("SUPER , SHIFT"),
            ValueData::Modmask(vec![ModKey::Super, ModKey::Shift])
        );
    }

    #[test]
    fn gradient_with_angle() {
        let value = classify("rgb(ff0000) 0deg", Position::new(3, 10));
        let ValueData::Gradient(gradient) = value.data else {
            panic!("expected gradient");
        };
        assert_eq!(gradient.angle, 0.0);
        assert_eq!(gradient.stops.len(), 1);
        assert_eq!(gradient.stops[0].as_color(), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(gradient.stops[0].start, Position::new(3, 10));
        assert_eq!(gradient.stops[0].end, Position::new(3, 21));
    }

    #[test]
    fn gradient_stop_spans_skip_extra_spaces() {
        let raw = "rgba(33ccffee)  rgba(00ff99ee) 45deg";
        let value = classify(raw, Position::new(0, 4));
        let ValueData::Gradient(gradient) = value.data else {
            panic!("expected gradient");
        };
        assert_eq!(gradient.angle, 45.0);
        let spans: Vec<_> = gradient
            .stops
            .iter()
            .map(|s| (s.start.column, s.end.column))
            .collect();
        assert_eq!(spans, [(4, 18), (20, 34)]);
    }

    #[test]
    fn gradient_without_angle() {
        let ValueData::Gradient(gradient) = data_of("0xff000000 0xffffffff") else {
            panic!("expected gradient");
        };
        assert_eq!(gradient.stops.len(), 2);
        assert_eq!(gradient.angle, 0.0);
    }

    #[test]
    fn malformed_gradients_fall_through() {
        // a lone colour is a colour, not a one-stop gradient
        assert_eq!(kind_of("rgb(ff0000)"), ValueKind::Color);
        assert_eq!(kind_of("rgb(ff0000) nope rgb(00ff00)"), ValueKind::String);
        assert_eq!(kind_of("rgb(ff0000) 45"), ValueKind::String);
        assert_eq!(kind_of("45deg"), ValueKind::String);
        assert_eq!(kind_of("foo 45deg"), ValueKind::String);
    }

    #[test]
    fn vec2_needs_exactly_two_numbers() {
        assert_eq!(data_of("1.5 -2"), ValueData::Vec2([1.5, -2.0]));
        assert_eq!(data_of("10 20"), ValueData::Vec2([10.0, 20.0]));
        assert_eq!(kind_of("1 2 3"), ValueKind::String);
        assert_eq!(kind_of("1 x"), ValueKind::String);
        assert_eq!(kind_of("inf nan"), ValueKind::String);
    }

    #[test]
    fn everything_else_is_a_string() {
        assert_eq!(data_of("hello world"), ValueData::String("hello world".into()));
        assert_eq!(kind_of("dwindle"), ValueKind::String);
        assert_eq!(kind_of("inf"), ValueKind::String);
        assert_eq!(kind_of("~/.config/hypr/shader.frag"), ValueKind::String);
    }

    #[test]
    fn value_span_covers_raw_text() {
        let value = classify("rgba(1a1a1aee)", Position::new(7, 12));
        assert_eq!(value.start, Position::new(7, 12));
        assert_eq!(value.end, Position::new(7, 26));
    }
}
