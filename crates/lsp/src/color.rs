//! Inline colour swatches and picker round-trips.

use hyprls_core::{encode_color, Rgba, Section, Value, ValueData};
use lsp_types::{Color, ColorInformation, ColorPresentation, Range, TextEdit};

use crate::position::range;

/// One entry per colour literal in assignment values, gradient stops
/// included, in document order.
pub fn document_colors(root: &Section) -> Vec<ColorInformation> {
    let mut colors = Vec::new();
    root.walk_values(&mut |_, value| match &value.data {
        ValueData::Color(color) => colors.push(information(value, *color)),
        ValueData::Gradient(gradient) => {
            for stop in &gradient.stops {
                if let Some(color) = stop.as_color() {
                    colors.push(information(stop, color));
                }
            }
        }
        _ => {}
    });
    colors
}

/// The literal a picked colour should be written back as.
pub fn color_presentations(color: Color, range: Range) -> Vec<ColorPresentation> {
    let literal = encode_color(
        f64::from(color.red),
        f64::from(color.green),
        f64::from(color.blue),
        f64::from(color.alpha),
    );
    vec![ColorPresentation {
        label: literal.clone(),
        text_edit: Some(TextEdit::new(range, literal)),
        additional_text_edits: None,
    }]
}

fn information(value: &Value, color: Rgba) -> ColorInformation {
    let [red, green, blue, alpha] = color.to_unit().map(|c| c as f32);
    ColorInformation {
        range: range(value.span()),
        color: Color {
            red,
            green,
            blue,
            alpha,
        },
    }
}
