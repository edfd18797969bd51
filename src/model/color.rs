//! `#RRGGBB` / `#RRGGBBAA` serde helper for `Color32`, so funnel files stay
//! hand-editable.

use egui::Color32;
use serde::{self, Deserialize, Deserializer, Serializer};

pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_hex(*color))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_hex(&s).map_err(serde::de::Error::custom)
}

pub fn to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_array();
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

pub fn parse_hex(s: &str) -> Result<Color32, String> {
    let s = s.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .ok_or_else(|| format!("Invalid hex color '{}'", s))
            .and_then(|c| u8::from_str_radix(c, 16).map_err(|e| e.to_string()))
    };
    match s.len() {
        6 => Ok(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Ok(Color32::from_rgba_unmultiplied(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(format!("Invalid hex color '{}': expected 6 or 8 hex digits", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex("#3B82F6"), Ok(Color32::from_rgb(59, 130, 246)));
        assert_eq!(parse_hex("10b981"), Ok(Color32::from_rgb(16, 185, 129)));
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#zz0000").is_err());
    }

    #[test]
    fn opaque_colors_print_six_digits() {
        assert_eq!(to_hex(Color32::from_rgb(239, 68, 68)), "#EF4444");
    }
}
