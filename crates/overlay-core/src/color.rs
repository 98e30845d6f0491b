use crate::category::{CategorySet, CategoryValue};
use std::fmt;

pub const CATEGORY_SATURATION: f64 = 70.0;
pub const CATEGORY_LIGHTNESS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn to_rgb(self) -> Rgb {
        let s = self.saturation / 100.0;
        let l = self.lightness / 100.0;
        let chroma = (1.0 - 2.0f64.mul_add(l, -1.0).abs()) * s;
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let x = chroma * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match h {
            h if h < 1.0 => (chroma, x, 0.0),
            h if h < 2.0 => (x, chroma, 0.0),
            h if h < 3.0 => (0.0, chroma, x),
            h if h < 4.0 => (0.0, x, chroma),
            h if h < 5.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Rgb(channel(r + m), channel(g + m), channel(b + m))
    }

    pub fn css(self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            trim_float(self.hue),
            trim_float(self.saturation),
            trim_float(self.lightness)
        )
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn trim_float(value: f64) -> String {
    let text = format!("{value:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);

    pub const fn from_hex(hex: u32) -> Self {
        Self(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        )
    }

    /// Composites this color with `opacity` over `background`.
    pub fn over(self, background: Self, opacity: f64) -> Self {
        let alpha = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| {
            channel(alpha.mul_add(f64::from(fg), (1.0 - alpha) * f64::from(bg)) / 255.0)
        };
        Self(
            mix(self.0, background.0),
            mix(self.1, background.1),
            mix(self.2, background.2),
        )
    }

    pub fn css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Color for `value` within its dataset's category set.
///
/// The hue is the value's rank in sorted order spread evenly over the color
/// wheel. Values outside the set take rank 0.
pub fn category_color(value: &CategoryValue, categories: &CategorySet) -> Hsl {
    let count = categories.len().max(1);
    let index = categories.rank(value).unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let hue = 360.0 * (index as f64 / count as f64);
    Hsl {
        hue,
        saturation: CATEGORY_SATURATION,
        lightness: CATEGORY_LIGHTNESS,
    }
}
