//! Connector drawing for text previews
//!
//! Paints an orthogonal route, given as corner cells, onto an [`AsciiCanvas`]:
//! straight runs, corner glyphs chosen from the headings on either side of a
//! bend, crossings where two connectors meet, and a final arrow glyph.

use super::{AsciiCanvas, CharacterSet, Heading};

/// Character set for edge drawing
#[derive(Debug, Clone, Copy)]
pub struct EdgeChars {
    pub horizontal: char,
    pub vertical: char,
    pub corner_top_left: char,     // ┌ (goes RIGHT and DOWN)
    pub corner_top_right: char,    // ┐ (goes LEFT and DOWN)
    pub corner_bottom_left: char,  // └ (goes RIGHT and UP)
    pub corner_bottom_right: char, // ┘ (goes LEFT and UP)
    pub cross: char,
    pub arrow_up: char,
    pub arrow_down: char,
    pub arrow_left: char,
    pub arrow_right: char,
}

impl EdgeChars {
    /// Get edge characters for the given style
    pub fn for_style(style: CharacterSet) -> Self {
        if style.is_ascii() {
            Self::ascii()
        } else {
            Self::unicode()
        }
    }

    /// ASCII edge characters
    pub fn ascii() -> Self {
        Self {
            horizontal: '-',
            vertical: '|',
            corner_top_left: '+',
            corner_top_right: '+',
            corner_bottom_left: '+',
            corner_bottom_right: '+',
            cross: '+',
            arrow_up: '^',
            arrow_down: 'v',
            arrow_left: '<',
            arrow_right: '>',
        }
    }

    /// Unicode box-drawing edge characters
    pub fn unicode() -> Self {
        Self {
            horizontal: '─',
            vertical: '│',
            corner_top_left: '┌',
            corner_top_right: '┐',
            corner_bottom_left: '└',
            corner_bottom_right: '┘',
            cross: '┼',
            arrow_up: '▲',
            arrow_down: '▼',
            arrow_left: '◀',
            arrow_right: '▶',
        }
    }

    /// Arrow glyph pointing along `heading`
    pub fn arrow(&self, heading: Heading) -> char {
        match heading {
            Heading::Up => self.arrow_up,
            Heading::Down => self.arrow_down,
            Heading::Left => self.arrow_left,
            Heading::Right => self.arrow_right,
        }
    }

    /// Corner glyph for a bend from `incoming` travel to `outgoing` travel
    pub fn corner(&self, incoming: Heading, outgoing: Heading) -> char {
        // The corner cell connects back along the incoming run and forward
        // along the outgoing one.
        let back = incoming.opposite();
        let opens = |h: Heading| back == h || outgoing == h;
        match (opens(Heading::Right), opens(Heading::Down)) {
            _ if incoming == outgoing || back == outgoing => {
                if incoming.is_vertical() {
                    self.vertical
                } else {
                    self.horizontal
                }
            }
            (true, true) => self.corner_top_left,
            (false, true) => self.corner_top_right,
            (true, false) => self.corner_bottom_left,
            (false, false) => self.corner_bottom_right,
        }
    }
}

/// Draws connector routes onto a canvas
pub struct EdgePainter {
    pub chars: EdgeChars,
}

impl EdgePainter {
    /// Create a new edge painter with the given character set
    pub fn new(style: CharacterSet) -> Self {
        Self {
            chars: EdgeChars::for_style(style),
        }
    }

    /// Create an edge painter with custom characters
    pub fn with_chars(chars: EdgeChars) -> Self {
        Self { chars }
    }

    fn put_line(&self, canvas: &mut AsciiCanvas, x: usize, y: usize, c: char) {
        let existing = canvas.get_char(x, y);
        let crossing = (c == self.chars.horizontal && existing == self.chars.vertical)
            || (c == self.chars.vertical && existing == self.chars.horizontal);
        if crossing {
            canvas.set_char(x, y, self.chars.cross);
        } else {
            canvas.set_char(x, y, c);
        }
    }

    /// Draw a horizontal line from x1 to x2 at y
    pub fn draw_horizontal(&self, canvas: &mut AsciiCanvas, y: usize, x1: usize, x2: usize) {
        let (start, end) = (x1.min(x2), x1.max(x2));
        for x in start..=end {
            self.put_line(canvas, x, y, self.chars.horizontal);
        }
    }

    /// Draw a vertical line from y1 to y2 at x
    pub fn draw_vertical(&self, canvas: &mut AsciiCanvas, x: usize, y1: usize, y2: usize) {
        let (start, end) = (y1.min(y2), y1.max(y2));
        for y in start..=end {
            self.put_line(canvas, x, y, self.chars.vertical);
        }
    }

    /// Draw an arrow glyph at the given cell
    pub fn draw_arrow(&self, canvas: &mut AsciiCanvas, x: usize, y: usize, heading: Heading) {
        canvas.set_char(x, y, self.chars.arrow(heading));
    }

    /// Draw a route through the given corner cells, ending in an arrow
    ///
    /// Diagonal hops (only produced by stub routes) are drawn as a horizontal
    /// run followed by a vertical one.
    pub fn draw_route(&self, canvas: &mut AsciiCanvas, cells: &[(usize, usize)]) {
        let mut corners: Vec<(usize, usize)> = Vec::with_capacity(cells.len() + 2);
        for &cell in cells {
            if let Some(&(px, py)) = corners.last() {
                if (px, py) == cell {
                    continue;
                }
                if px != cell.0 && py != cell.1 {
                    corners.push((cell.0, py));
                }
            }
            corners.push(cell);
        }

        let Some(&(last_x, last_y)) = corners.last() else {
            return;
        };
        if corners.len() == 1 {
            self.draw_arrow(canvas, last_x, last_y, Heading::Right);
            return;
        }

        for pair in corners.windows(2) {
            let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
            if y1 == y2 {
                self.draw_horizontal(canvas, y1, x1, x2);
            } else {
                self.draw_vertical(canvas, x1, y1, y2);
            }
        }

        let headings: Vec<Heading> = corners
            .windows(2)
            .filter_map(|pair| heading_between(pair[0], pair[1]))
            .collect();
        for (i, turn) in headings.windows(2).enumerate() {
            let (x, y) = corners[i + 1];
            canvas.set_char(x, y, self.chars.corner(turn[0], turn[1]));
        }
        if let Some(&heading) = headings.last() {
            self.draw_arrow(canvas, last_x, last_y, heading);
        }
    }
}

fn heading_between(from: (usize, usize), to: (usize, usize)) -> Option<Heading> {
    match (from.0.cmp(&to.0), from.1.cmp(&to.1)) {
        (std::cmp::Ordering::Less, std::cmp::Ordering::Equal) => Some(Heading::Right),
        (std::cmp::Ordering::Greater, std::cmp::Ordering::Equal) => Some(Heading::Left),
        (std::cmp::Ordering::Equal, std::cmp::Ordering::Less) => Some(Heading::Down),
        (std::cmp::Ordering::Equal, std::cmp::Ordering::Greater) => Some(Heading::Up),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_chars_unicode() {
        let chars = EdgeChars::unicode();
        assert_eq!(chars.horizontal, '─');
        assert_eq!(chars.vertical, '│');
        assert_eq!(chars.arrow(Heading::Down), '▼');
    }

    #[test]
    fn test_edge_chars_ascii() {
        let chars = EdgeChars::ascii();
        assert_eq!(chars.horizontal, '-');
        assert_eq!(chars.arrow(Heading::Left), '<');
    }

    #[test]
    fn test_corner_glyphs() {
        let chars = EdgeChars::unicode();
        assert_eq!(chars.corner(Heading::Right, Heading::Down), '┐');
        assert_eq!(chars.corner(Heading::Right, Heading::Up), '┘');
        assert_eq!(chars.corner(Heading::Left, Heading::Down), '┌');
        assert_eq!(chars.corner(Heading::Left, Heading::Up), '└');
        assert_eq!(chars.corner(Heading::Down, Heading::Right), '└');
        assert_eq!(chars.corner(Heading::Down, Heading::Left), '┘');
        assert_eq!(chars.corner(Heading::Up, Heading::Right), '┌');
        assert_eq!(chars.corner(Heading::Up, Heading::Left), '┐');
        assert_eq!(chars.corner(Heading::Up, Heading::Up), '│');
    }

    #[test]
    fn test_draw_horizontal() {
        let painter = EdgePainter::new(CharacterSet::Unicode);
        let mut canvas = AsciiCanvas::new(10, 5);
        painter.draw_horizontal(&mut canvas, 2, 1, 5);
        for x in 1..=5 {
            assert_eq!(canvas.get_char(x, 2), '─');
        }
    }

    #[test]
    fn test_crossing_lines() {
        let painter = EdgePainter::new(CharacterSet::Ascii);
        let mut canvas = AsciiCanvas::new(10, 10);
        painter.draw_horizontal(&mut canvas, 3, 0, 6);
        painter.draw_vertical(&mut canvas, 3, 0, 6);
        assert_eq!(canvas.get_char(3, 3), '+');
        assert_eq!(canvas.get_char(3, 1), '|');
    }

    #[test]
    fn test_draw_route_with_bend() {
        let painter = EdgePainter::new(CharacterSet::Unicode);
        let mut canvas = AsciiCanvas::new(10, 10);
        painter.draw_route(&mut canvas, &[(0, 0), (4, 0), (4, 3)]);
        assert_eq!(canvas.get_char(0, 0), '─');
        assert_eq!(canvas.get_char(4, 0), '┐');
        assert_eq!(canvas.get_char(4, 1), '│');
        assert_eq!(canvas.get_char(4, 3), '▼');
    }

    #[test]
    fn test_draw_diagonal_stub() {
        let painter = EdgePainter::new(CharacterSet::Ascii);
        let mut canvas = AsciiCanvas::new(10, 10);
        painter.draw_route(&mut canvas, &[(0, 0), (3, 2)]);
        assert_eq!(canvas.get_char(1, 0), '-');
        assert_eq!(canvas.get_char(3, 0), '+');
        assert_eq!(canvas.get_char(3, 2), 'v');
    }
}
