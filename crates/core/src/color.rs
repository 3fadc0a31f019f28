//! Colour literals.
//!
//! Three spellings are accepted:
//!
//! - `rgb(RRGGBB)`, opaque
//! - `rgba(RRGGBBAA)`
//! - `0xAARRGGBB`, the legacy form with alpha first
//!
//! Decoding always yields 8-bit channels. Encoding starts from unit floats
//! (what editors send back from a colour picker) and quantises each channel
//! to two decimals before converting to hex, so that
//! `encode(decode(encode(c))) == encode(c)` holds for every input.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

static COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"rgb\((?P<rgb_r>[0-9a-fA-F]{2})(?P<rgb_g>[0-9a-fA-F]{2})(?P<rgb_b>[0-9a-fA-F]{2})\)",
        r"|",
        r"rgba\((?P<rgba_r>[0-9a-fA-F]{2})(?P<rgba_g>[0-9a-fA-F]{2})(?P<rgba_b>[0-9a-fA-F]{2})(?P<rgba_a>[0-9a-fA-F]{2})\)",
        r"|",
        r"0x(?P<legacy_a>[0-9a-fA-F]{2})(?P<legacy_r>[0-9a-fA-F]{2})(?P<legacy_g>[0-9a-fA-F]{2})(?P<legacy_b>[0-9a-fA-F]{2})",
        r")$",
    ))
    .expect("colour pattern compiles")
});

/// Four 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Channels scaled to `[0, 1]`, in `[r, g, b, a]` order.
    pub fn to_unit(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a].map(|c| f64::from(c) / 255.0)
    }
}

/// Parse one of the three literal spellings. Surrounding whitespace is
/// ignored; anything else in the text rejects.
pub fn decode_color(raw: &str) -> Option<Rgba> {
    let caps = COLOR_PATTERN.captures(raw.trim())?;
    Some(Rgba {
        r: channel(&caps, "r")?,
        g: channel(&caps, "g")?,
        b: channel(&caps, "b")?,
        a: match channel(&caps, "a") {
            Some(a) => a,
            None => 0xff,
        },
    })
}

/// Decode to unit floats rounded to two decimals, the precision used by
/// [`encode_color`].
pub fn decode_color_unit(raw: &str) -> Option<[f64; 4]> {
    decode_color(raw).map(|color| color.to_unit().map(quantize))
}

/// Render unit-float channels as a literal.
///
/// `rgb(...)` is used when alpha quantises to exactly 1, `rgba(...)`
/// otherwise. Out-of-range channels are clamped.
pub fn encode_color(red: f64, green: f64, blue: f64, alpha: f64) -> String {
    let [r, g, b, a] = [red, green, blue, alpha].map(quantize);
    if a == 1.0 {
        format!("rgb({:02x}{:02x}{:02x})", to_byte(r), to_byte(g), to_byte(b))
    } else {
        format!(
            "rgba({:02x}{:02x}{:02x}{:02x})",
            to_byte(r),
            to_byte(g),
            to_byte(b),
            to_byte(a)
        )
    }
}

// rgba wins over rgb, rgb over legacy; rgb has no alpha group.
fn channel(caps: &Captures<'_>, component: &str) -> Option<u8> {
    let mut found = caps.name(&format!("rgba_{component}"));
    if component != "a" {
        found = found.or_else(|| caps.name(&format!("rgb_{component}")));
    }
    found = found.or_else(|| caps.name(&format!("legacy_{component}")));
    u8::from_str_radix(found?.as_str(), 16).ok()
}

fn quantize(unit: f64) -> f64 {
    (unit.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rgb_as_opaque() {
        assert_eq!(decode_color("rgb(ff0000)"), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(
            decode_color_unit("rgb(ff0000)"),
            Some([1.0, 0.0, 0.0, 1.0])
        );
    }

    #[test]
    fn decodes_rgba_with_alpha() {
        assert_eq!(
            decode_color("rgba(0000ffff)"),
            Some(Rgba::new(0, 0, 255, 255))
        );
        assert_eq!(
            decode_color("rgba(33ccff80)"),
            Some(Rgba::new(0x33, 0xcc, 0xff, 0x80))
        );
    }

    #[test]
    fn legacy_literal_puts_alpha_first() {
        assert_eq!(
            decode_color("0xff00ff00"),
            Some(Rgba::new(0, 255, 0, 255))
        );
        assert_eq!(
            decode_color("0x80112233"),
            Some(Rgba::new(0x11, 0x22, 0x33, 0x80))
        );
    }

    #[test]
    fn hex_digits_are_case_insensitive() {
        assert_eq!(decode_color("rgb(FFaa00)"), Some(Rgba::new(255, 170, 0, 255)));
    }

    #[test]
    fn rejects_other_text() {
        for raw in [
            "",
            "red",
            "#ff0000",
            "rgb(ff00)",
            "rgba(ff0000)",
            "0xff00ff",
            "rgb(ff0000) trailing",
            "rgb(gg0000)",
        ] {
            assert_eq!(decode_color(raw), None, "{raw:?} should not decode");
        }
    }

    #[test]
    fn encodes_opaque_as_rgb() {
        assert_eq!(encode_color(1.0, 0.0, 0.0, 1.0), "rgb(ff0000)");
        assert_eq!(encode_color(0.0, 0.0, 1.0, 0.999), "rgb(0000ff)");
    }

    #[test]
    fn encodes_translucent_as_rgba() {
        assert_eq!(encode_color(0.0, 1.0, 0.0, 0.5), "rgba(00ff0080)");
        assert_eq!(encode_color(0.2, 0.8, 1.0, 0.0), "rgba(33ccff00)");
    }

    #[test]
    fn encoding_is_stable_through_decode() {
        let mut seed = 0x2545_f491_u32;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            f64::from(seed % 1001) / 1000.0
        };
        for _ in 0..500 {
            let encoded = encode_color(next(), next(), next(), next());
            let [r, g, b, a] = decode_color_unit(&encoded).expect("own output decodes");
            assert_eq!(encode_color(r, g, b, a), encoded);
        }
    }
}
