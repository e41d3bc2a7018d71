use serde::{Deserialize, Serialize};

/// Linear RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

const KNOWN_CATEGORIES: [(&str, u32); 8] = [
    ("Food", 0xff6384),
    ("Transport", 0x36a2eb),
    ("Utilities", 0xffce56),
    ("Shopping", 0x4bc0c0),
    ("Investments", 0x9966ff),
    ("Entertainment", 0xff9f40),
    ("Health", 0xc9cbcf),
    ("Other", 0x777777),
];

/// Color for a category label. Known categories use the fixed palette, any
/// other label gets a hue derived from its FNV-1a hash so it stays stable
/// across rebuilds and sessions.
pub fn category_color(category: &str) -> Rgb {
    KNOWN_CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, hex)| Rgb::from_hex(*hex))
        .unwrap_or_else(|| hashed_color(category))
}

fn hashed_color(category: &str) -> Rgb {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in category.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    let hue = (hash % 360) as f32;
    hsl_to_rgb(hue, 0.65, 0.6)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    Rgb {
        r: r + m,
        g: g + m,
        b: b + m,
    }
}

#[cfg(test)]
mod tests {
    use super::{category_color, Rgb};

    #[test]
    fn known_categories_use_fixed_palette() {
        assert_eq!(category_color("Food").to_hex(), 0xff6384);
        assert_eq!(category_color("Transport").to_hex(), 0x36a2eb);
        assert_eq!(category_color("Other").to_hex(), 0x777777);
    }

    #[test]
    fn unknown_categories_are_stable_and_in_range() {
        let first = category_color("Pets");
        let second = category_color("Pets");
        assert_eq!(first, second);
        for channel in first.to_array() {
            assert!((0.0..=1.0).contains(&channel), "channel {channel}");
        }
        assert_ne!(category_color("Pets"), category_color("Travel"));
    }

    #[test]
    fn hex_round_trips_through_rgb() {
        assert_eq!(Rgb::from_hex(0x4bc0c0).to_hex(), 0x4bc0c0);
    }
}
