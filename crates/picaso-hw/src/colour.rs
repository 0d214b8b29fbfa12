//! RGB565 colour helpers.
//!
//! The module takes every colour argument as a single 16-bit RGB565 word.

/// RGB565 colour word.
pub type Colour = u16;

pub const BLACK: Colour = 0x0000;
pub const WHITE: Colour = 0xFFFF;
pub const RED: Colour = 0b11111 << 11;
pub const GREEN: Colour = 0b111111 << 5;
pub const BLUE: Colour = 0b11111;

/// Converts RGB888 to RGB565.
#[inline]
pub fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> Colour {
    let r5 = (r >> 3) as u16;
    let g6 = (g >> 2) as u16;
    let b5 = (b >> 3) as u16;
    (r5 << 11) | (g6 << 5) | b5
}

/// Parses `#RRGGBB` (hash optional) or a named primary to RGB565.
pub fn parse_colour(s: &str) -> Option<Colour> {
    match s.to_lowercase().as_str() {
        "black" => return Some(BLACK),
        "white" => return Some(WHITE),
        "red" => return Some(RED),
        "green" => return Some(GREEN),
        "blue" => return Some(BLUE),
        _ => {}
    }

    let hex = s.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(rgb888_to_rgb565(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_conversion() {
        assert_eq!(rgb888_to_rgb565(255, 0, 0), RED);
        assert_eq!(rgb888_to_rgb565(0, 255, 0), GREEN);
        assert_eq!(rgb888_to_rgb565(0, 0, 255), BLUE);
        assert_eq!(rgb888_to_rgb565(255, 255, 255), WHITE);
        assert_eq!(rgb888_to_rgb565(0, 0, 0), BLACK);
    }

    #[test]
    fn test_parse_colour() {
        assert_eq!(parse_colour("#FF0000"), Some(0xF800));
        assert_eq!(parse_colour("00FF00"), Some(0x07E0));
        assert_eq!(parse_colour("Blue"), Some(0x001F));
        assert_eq!(parse_colour("invalid"), None);
        assert_eq!(parse_colour("#12345"), None);
    }
}
