use crate::Color;
use std::fmt;
use std::iter;
use std::str::FromStr;

const ASCII_1: u8 = b'1';
const ASCII_LOWER_A: u8 = b'a';

const FILE_JAPANESE: [&str; 9] = ["１", "２", "３", "４", "５", "６", "７", "８", "９"];
const RANK_KANJI: [&str; 9] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// Represents a cell of the 9×9 board.
///
/// The index layout is `col + 9 * row`: `col` 0 is file 9 (the leftmost file
/// from Black's seat) and `row` 0 is rank 1 (`a`, White's back rank).
///
/// # Examples
///
/// ```
/// use shogi_kifu::Square;
///
/// let sq = Square::new(2, 6).unwrap();
/// assert_eq!("7g", sq.to_string());
/// assert_eq!(7, sq.file());
/// assert_eq!(7, sq.rank());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// The total number of squares on the board.
    pub const NUM_SQUARES: usize = 81;

    /// Creates a new instance of `Square`.
    ///
    /// `col` and `row` can take a value from 0 to 8.
    pub fn new(col: u8, row: u8) -> Option<Square> {
        if col >= 9 || row >= 9 {
            return None;
        }

        Some(Square(col + 9 * row))
    }

    /// Creates a square from board coordinates as printed on a board:
    /// `file` 1..=9 (right to left) and `rank` 1..=9 (top to bottom).
    pub fn from_file_rank(file: u8, rank: u8) -> Option<Square> {
        if !(1..=9).contains(&file) || !(1..=9).contains(&rank) {
            return None;
        }

        Square::new(9 - file, rank - 1)
    }

    /// Creates a new instance of `Square` from USI formatted string such as `7g`.
    pub fn from_usi(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return None;
        }

        let file = bytes[0].checked_sub(ASCII_1)?;
        let rank = bytes[1].checked_sub(ASCII_LOWER_A)?;

        Square::from_file_rank(file + 1, rank + 1)
    }

    /// Creates a square from the two-digit form used by KIF and CSA (`77`).
    pub fn from_digits(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = chars.next()?.to_digit(10)?;
        let rank = chars.next()?.to_digit(10)?;

        if chars.next().is_some() {
            return None;
        }

        Square::from_file_rank(file as u8, rank as u8)
    }

    /// Creates a new instance of `Square` with the given index value.
    pub fn from_index(index: u8) -> Option<Square> {
        if index as usize >= Self::NUM_SQUARES {
            return None;
        }

        Some(Square(index))
    }

    /// Returns an iterator of all squares on the board, row by row from the top-left.
    pub fn iter() -> SquareIter {
        SquareIter { current: 0 }
    }

    /// Returns the column (0 = file 9).
    pub fn col(self) -> u8 {
        self.0 % 9
    }

    /// Returns the row (0 = rank 1).
    pub fn row(self) -> u8 {
        self.0 / 9
    }

    /// Returns the file number written on the board (1..=9).
    pub fn file(self) -> u8 {
        9 - self.col()
    }

    /// Returns the rank number written on the board (1..=9).
    pub fn rank(self) -> u8 {
        self.row() + 1
    }

    /// Returns a new `Square` instance by moving the column and the row values.
    ///
    /// # Examples
    ///
    /// ```
    /// use shogi_kifu::square::consts::*;
    ///
    /// let shifted = SQ_5E.shift(1, -2).unwrap();
    /// assert_eq!(SQ_4C, shifted);
    /// assert!(SQ_9A.shift(-1, 0).is_none());
    /// ```
    #[must_use]
    pub fn shift(self, dc: i8, dr: i8) -> Option<Square> {
        let c = self.col() as i8 + dc;
        let r = self.row() as i8 + dr;

        if !(0..9).contains(&c) || !(0..9).contains(&r) {
            return None;
        }

        Square::new(c as u8, r as u8)
    }

    /// Returns the row as if the specified color were Black (0 = the far side).
    pub fn relative_row(self, c: Color) -> u8 {
        if c == Color::Black {
            self.row()
        } else {
            8 - self.row()
        }
    }

    /// Returns true if the square lies in the promotion zone of the given color.
    pub fn is_promotion_zone(self, c: Color) -> bool {
        self.relative_row(c) < 3
    }

    /// Converts the instance into the unique number for array indexing purpose.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the two-digit form (`77`) used by KIF and CSA.
    pub fn to_digits(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Returns the file in Japanese notation (full-width numeral).
    pub fn file_japanese(self) -> &'static str {
        FILE_JAPANESE[(self.file() - 1) as usize]
    }

    /// Returns the rank in Japanese notation (kanji numeral).
    pub fn rank_japanese(self) -> &'static str {
        RANK_KANJI[self.row() as usize]
    }

    /// Returns the square in Japanese notation (e.g., "７六").
    ///
    /// # Examples
    ///
    /// ```
    /// use shogi_kifu::square::consts::*;
    ///
    /// assert_eq!("７六", SQ_7F.to_japanese());
    /// ```
    pub fn to_japanese(self) -> String {
        format!("{}{}", self.file_japanese(), self.rank_japanese())
    }

    /// Creates a square from Japanese notation string.
    ///
    /// Accepts full-width or half-width file digits followed by a kanji or
    /// digit rank, e.g. "７六", "7六", "76".
    pub fn from_japanese(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = japanese_digit(chars.next()?)?;
        let rank = japanese_digit(chars.next()?)?;

        if chars.next().is_some() {
            return None;
        }

        Square::from_file_rank(file, rank)
    }
}

/// Maps a half-width, full-width or kanji numeral in 1..=9 to its value.
pub(crate) fn japanese_digit(c: char) -> Option<u8> {
    match c {
        '1'..='9' => Some(c as u8 - b'0'),
        '１'..='９' => Some((c as u32 - '１' as u32) as u8 + 1),
        _ => RANK_KANJI
            .iter()
            .position(|k| k.starts_with(c))
            .map(|i| i as u8 + 1),
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "{}{}",
            (self.file() - 1 + ASCII_1) as char,
            (self.row() + ASCII_LOWER_A) as char
        )
    }
}

/// Error type for parsing a square from USI notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSquareError;

impl fmt::Display for ParseSquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid square notation")
    }
}

impl std::error::Error for ParseSquareError {}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_usi(s).ok_or(ParseSquareError)
    }
}

/// Square constants, named by their USI coordinates.
pub mod consts {
    use super::Square;

    macro_rules! make_square {
        {$n:expr, $t:ident $($ts:ident)+} => {
            pub const $t: Square = Square($n);
            make_square!{($n + 1), $($ts)*}
        };
        {$n:expr, $t:ident} => {
            pub const $t: Square = Square($n);
        };
    }

    make_square! {0, SQ_9A SQ_8A SQ_7A SQ_6A SQ_5A SQ_4A SQ_3A SQ_2A SQ_1A
    SQ_9B SQ_8B SQ_7B SQ_6B SQ_5B SQ_4B SQ_3B SQ_2B SQ_1B
    SQ_9C SQ_8C SQ_7C SQ_6C SQ_5C SQ_4C SQ_3C SQ_2C SQ_1C
    SQ_9D SQ_8D SQ_7D SQ_6D SQ_5D SQ_4D SQ_3D SQ_2D SQ_1D
    SQ_9E SQ_8E SQ_7E SQ_6E SQ_5E SQ_4E SQ_3E SQ_2E SQ_1E
    SQ_9F SQ_8F SQ_7F SQ_6F SQ_5F SQ_4F SQ_3F SQ_2F SQ_1F
    SQ_9G SQ_8G SQ_7G SQ_6G SQ_5G SQ_4G SQ_3G SQ_2G SQ_1G
    SQ_9H SQ_8H SQ_7H SQ_6H SQ_5H SQ_4H SQ_3H SQ_2H SQ_1H
    SQ_9I SQ_8I SQ_7I SQ_6I SQ_5I SQ_4I SQ_3I SQ_2I SQ_1I}
}

/// This struct is created by the [`iter`] method on [`Square`].
///
/// [`iter`]: ./struct.Square.html#method.iter
/// [`Square`]: struct.Square.html
pub struct SquareIter {
    current: u8,
}

impl iter::Iterator for SquareIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.current;

        if cur as usize >= Square::NUM_SQUARES {
            return None;
        }

        self.current += 1;
        Some(Square(cur))
    }
}

#[cfg(test)]
mod tests {
    use super::consts::*;
    use super::*;

    #[test]
    fn new() {
        for col in 0..9 {
            for row in 0..9 {
                let sq = Square::new(col, row).unwrap();
                assert_eq!(col, sq.col());
                assert_eq!(row, sq.row());
                assert_eq!((col + 9 * row) as usize, sq.index());
            }
        }

        assert_eq!(None, Square::new(9, 0));
        assert_eq!(None, Square::new(0, 9));
    }

    #[test]
    fn from_usi() {
        let ok_cases = [("9a", 0, 0), ("1a", 8, 0), ("5e", 4, 4), ("9i", 0, 8), ("1i", 8, 8)];
        let ng_cases = ["", "9j", "_a", "a9", "0a", "9 ", " a", "9", "foo"];

        for (i, case) in ok_cases.iter().enumerate() {
            let sq = Square::from_usi(case.0).unwrap_or_else(|| panic!("failed at #{i}"));
            assert_eq!(case.1, sq.col(), "failed at #{i}");
            assert_eq!(case.2, sq.row(), "failed at #{i}");
            assert_eq!(case.0, sq.to_string(), "failed at #{i}");
        }

        for case in ng_cases.iter() {
            assert!(Square::from_usi(case).is_none(), "{case} should cause an error");
        }
    }

    #[test]
    fn digits() {
        assert_eq!("77", SQ_7G.to_digits());
        assert_eq!(Some(SQ_7G), Square::from_digits("77"));
        assert_eq!(Some(SQ_1A), Square::from_digits("11"));
        assert_eq!(None, Square::from_digits("00"));
        assert_eq!(None, Square::from_digits("771"));
    }

    #[test]
    fn consts() {
        for (i, sq) in Square::iter().enumerate() {
            assert_eq!(i, sq.index());
        }
        assert_eq!(7, SQ_7G.file());
        assert_eq!(7, SQ_7G.rank());
        assert_eq!(2, SQ_7G.col());
        assert_eq!(6, SQ_7G.row());
    }

    #[test]
    fn shift() {
        let ok_cases = [(-4, -4, SQ_9A), (4, 4, SQ_1I), (0, 0, SQ_5E), (1, -1, SQ_4D)];
        let ng_cases = [(-5, 0), (0, -5), (5, 0), (0, 5)];

        for case in ok_cases.iter() {
            assert_eq!(Some(case.2), SQ_5E.shift(case.0, case.1));
        }

        for case in ng_cases.iter() {
            assert!(SQ_5E.shift(case.0, case.1).is_none());
        }
    }

    #[test]
    fn relative_row() {
        assert_eq!(6, SQ_1G.relative_row(Color::Black));
        assert_eq!(2, SQ_1G.relative_row(Color::White));
        assert!(SQ_2C.is_promotion_zone(Color::Black));
        assert!(!SQ_2D.is_promotion_zone(Color::Black));
        assert!(SQ_2G.is_promotion_zone(Color::White));
    }

    #[test]
    fn japanese_notation() {
        assert_eq!("７", SQ_7F.file_japanese());
        assert_eq!("六", SQ_7F.rank_japanese());
        assert_eq!("１一", SQ_1A.to_japanese());
        assert_eq!("９九", SQ_9I.to_japanese());

        assert_eq!(Some(SQ_7F), Square::from_japanese("７六"));
        assert_eq!(Some(SQ_7F), Square::from_japanese("7六"));
        assert_eq!(Some(SQ_7F), Square::from_japanese("76"));
        assert!(Square::from_japanese("").is_none());
        assert!(Square::from_japanese("７").is_none());
        assert!(Square::from_japanese("7f").is_none());
        assert!(Square::from_japanese("０一").is_none());
    }

    #[test]
    fn roundtrip_japanese() {
        for sq in Square::iter() {
            assert_eq!(Some(sq), Square::from_japanese(&sq.to_japanese()));
        }
    }
}
