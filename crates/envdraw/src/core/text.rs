//! Text metrics in canvas units
//!
//! Labels are measured by display width so that wide glyphs get room for two
//! columns.

use unicode_width::UnicodeWidthStr;

use super::{floor_to_grid, Size, GRID_STEP};

/// Canvas units per display column
pub const COLUMN_WIDTH: i32 = 7;

/// Canvas units per text line
pub const LINE_HEIGHT: i32 = 15;

/// Number of display columns `text` occupies
pub fn display_columns(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Extent of a single line of text
///
/// # Example
/// ```
/// use envdraw::core::{measure_text, Size};
///
/// assert_eq!(measure_text("x:"), Size::new(14, 15));
/// ```
pub fn measure_text(text: &str) -> Size {
    let columns = i32::try_from(display_columns(text)).unwrap_or(i32::MAX / COLUMN_WIDTH);
    Size::new(columns * COLUMN_WIDTH, LINE_HEIGHT)
}

/// Text extent floored to the grid, never smaller than one grid step
pub fn grid_text_extent(text: &str) -> Size {
    let raw = measure_text(text);
    Size::new(
        floor_to_grid(raw.width).max(GRID_STEP),
        floor_to_grid(raw.height).max(GRID_STEP),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_ascii() {
        assert_eq!(measure_text("hello"), Size::new(35, 15));
        assert_eq!(measure_text(""), Size::new(0, 15));
    }

    #[test]
    fn test_measure_wide_glyphs() {
        // Each CJK glyph is two columns wide
        assert_eq!(display_columns("日本"), 4);
        assert_eq!(measure_text("日本"), Size::new(28, 15));
    }

    #[test]
    fn test_grid_extent_floors() {
        assert_eq!(grid_text_extent("hello"), Size::new(30, 10));
        assert_eq!(grid_text_extent(""), Size::new(10, 10));
        assert_eq!(grid_text_extent("x"), Size::new(10, 10));
    }
}
