//! Box drawing characters for node outlines
//!
//! Frames are drawn with a double outline and functions with a rounded one so
//! the two node kinds stay distinguishable in a text preview.

use super::{AsciiCanvas, CharacterSet};

/// Box drawing characters for rendering rectangular outlines
#[derive(Debug, Clone, Copy)]
pub struct BoxChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BoxChars {
    /// Outline used for frames
    pub fn frame(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self {
                top_left: '#',
                top_right: '#',
                bottom_left: '#',
                bottom_right: '#',
                horizontal: '=',
                vertical: '#',
            },
            CharacterSet::Unicode => Self {
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
                horizontal: '═',
                vertical: '║',
            },
        }
    }

    /// Outline used for function objects
    pub fn function(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self::ascii(),
            CharacterSet::Unicode => Self {
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
                horizontal: '─',
                vertical: '│',
            },
        }
    }

    /// ASCII-only box characters
    pub fn ascii() -> Self {
        Self {
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            horizontal: '-',
            vertical: '|',
        }
    }

    /// Outline the cell rectangle `left..=right` x `top..=bottom`
    pub fn draw(&self, canvas: &mut AsciiCanvas, left: usize, top: usize, right: usize, bottom: usize) {
        if right <= left || bottom <= top {
            canvas.set_char(left, top, self.top_left);
            return;
        }
        canvas.draw_horizontal_line(left + 1, top, right - left - 1, self.horizontal);
        canvas.draw_horizontal_line(left + 1, bottom, right - left - 1, self.horizontal);
        canvas.draw_vertical_line(left, top + 1, bottom - top - 1, self.vertical);
        canvas.draw_vertical_line(right, top + 1, bottom - top - 1, self.vertical);
        canvas.set_char(left, top, self.top_left);
        canvas.set_char(right, top, self.top_right);
        canvas.set_char(left, bottom, self.bottom_left);
        canvas.set_char(right, bottom, self.bottom_right);
    }
}

impl Default for BoxChars {
    fn default() -> Self {
        Self::frame(CharacterSet::Unicode)
    }
}

/// Glyph for the small marker disc on frames and functions
pub fn marker_glyph(style: CharacterSet) -> char {
    match style {
        CharacterSet::Ascii => 'o',
        CharacterSet::Unicode => '●',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_chars() {
        assert_eq!(BoxChars::frame(CharacterSet::Unicode).top_left, '╔');
        assert_eq!(BoxChars::frame(CharacterSet::Ascii).horizontal, '=');
    }

    #[test]
    fn test_function_chars() {
        assert_eq!(BoxChars::function(CharacterSet::Unicode).bottom_right, '╯');
        assert_eq!(BoxChars::function(CharacterSet::Ascii).top_left, '+');
    }

    #[test]
    fn test_draw_outline() {
        let mut canvas = AsciiCanvas::new(10, 5);
        BoxChars::ascii().draw(&mut canvas, 1, 1, 5, 3);
        assert_eq!(canvas.get_char(1, 1), '+');
        assert_eq!(canvas.get_char(3, 1), '-');
        assert_eq!(canvas.get_char(5, 2), '|');
        assert_eq!(canvas.get_char(5, 3), '+');
        assert_eq!(canvas.get_char(3, 2), ' ');
    }

    #[test]
    fn test_marker_glyph() {
        assert_eq!(marker_glyph(CharacterSet::Ascii), 'o');
    }
}
