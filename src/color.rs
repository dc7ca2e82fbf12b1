//! Color type representing each player side.

use std::fmt;

/// Represents each side of player. Black player moves first.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// Returns an iterator over both colors, Black first.
    pub fn iter() -> ColorIter {
        ColorIter { current: Some(Color::Black) }
    }

    /// Returns the opponent.
    #[must_use]
    pub fn flip(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Converts the instance into the unique number for array indexing purpose.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Creates a color from its numeric side (0 or 1).
    pub fn from_index(side: u8) -> Option<Color> {
        match side {
            0 => Some(Color::Black),
            1 => Some(Color::White),
            _ => None,
        }
    }

    /// Returns the shogi symbol used in move descriptions (☗ / ☖).
    pub fn symbol(self) -> &'static str {
        match self {
            Color::Black => "☗",
            Color::White => "☖",
        }
    }

    /// Returns the triangle marker used by KI2 records (▲ / △).
    pub fn triangle(self) -> &'static str {
        match self {
            Color::Black => "▲",
            Color::White => "△",
        }
    }

    /// Returns the CSA sign (`+` / `-`).
    pub fn csa_sign(self) -> char {
        match self {
            Color::Black => '+',
            Color::White => '-',
        }
    }

    /// Returns the Japanese role name (先手 / 後手).
    pub fn japanese(self) -> &'static str {
        match self {
            Color::Black => "先手",
            Color::White => "後手",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Color::Black => write!(f, "b"),
            Color::White => write!(f, "w"),
        }
    }
}

/// Iterator over both colors.
pub struct ColorIter {
    current: Option<Color>,
}

impl Iterator for ColorIter {
    type Item = Color;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current;

        if let Some(current) = self.current {
            self.current = match current {
                Color::Black => Some(Color::White),
                Color::White => None,
            }
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip() {
        assert_eq!(Color::White, Color::Black.flip());
        assert_eq!(Color::Black, Color::White.flip());
    }

    #[test]
    fn iter() {
        let colors: Vec<Color> = Color::iter().collect();
        assert_eq!(vec![Color::Black, Color::White], colors);
    }

    #[test]
    fn from_index() {
        assert_eq!(Some(Color::Black), Color::from_index(0));
        assert_eq!(Some(Color::White), Color::from_index(1));
        assert_eq!(None, Color::from_index(2));
    }
}
