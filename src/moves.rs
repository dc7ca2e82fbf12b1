use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::piece_type::PieceType;
use crate::square::Square;

const TO_MASK: u32 = 0x7f;
const PROMOTE_FLAG: u32 = 1 << 7;
const FROM_SHIFT: u32 = 9;
const FROM_MASK: u32 = 0x7f << FROM_SHIFT;
const DROP_FLAG: u32 = 1 << 16;

/// Represents a move which either is a normal move or a drop move.
///
/// A move packs into `to | (promote << 7) | (from << 9)`; drops carry
/// `DROP_FLAG` and store the dropped kind in the `from` field.
/// `Move::NONE` (`0`) is the "no move" sentinel.
///
/// # Examples
///
/// ```
/// use shogi_kifu::{Move, Origin, PieceType};
/// use shogi_kifu::square::consts::*;
///
/// let m = Move::normal(SQ_7G, SQ_7F, false);
/// assert_eq!(Some(SQ_7F), m.to());
/// assert_eq!(Some(Origin::Square(SQ_7G)), m.origin());
/// assert_eq!("7g7f", m.to_string());
///
/// let d: Move = "S*5e".parse().unwrap();
/// assert!(d.is_drop());
/// assert_eq!(Some(Origin::Hand(PieceType::Silver)), d.origin());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Default)]
pub struct Move(u32);

/// Where a move starts: a board square, or a kind taken from hand.
///
/// Used as the key of legal-destination tables.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Origin {
    Square(Square),
    Hand(PieceType),
}

impl Move {
    /// The "no move" sentinel.
    pub const NONE: Move = Move(0);

    /// Creates a board move.
    pub fn normal(from: Square, to: Square, promote: bool) -> Move {
        let mut bits = to.index() as u32 | ((from.index() as u32) << FROM_SHIFT);
        if promote {
            bits |= PROMOTE_FLAG;
        }
        Move(bits)
    }

    /// Creates a drop of `piece_type` (its base kind) onto `to`.
    pub fn drop(piece_type: PieceType, to: Square) -> Move {
        Move(
            to.index() as u32
                | ((piece_type.base().bits() as u32) << FROM_SHIFT)
                | DROP_FLAG,
        )
    }

    /// Returns the packed value.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Reinterprets a packed value, rejecting out-of-range fields.
    pub fn from_bits(bits: u32) -> Option<Move> {
        let m = Move(bits);
        if m.is_none() {
            return Some(m);
        }

        Square::from_index((bits & TO_MASK) as u8)?;
        let from = ((bits & FROM_MASK) >> FROM_SHIFT) as u8;
        if m.is_drop() {
            PieceType::from_bits(from).filter(|pt| pt.is_hand_piece())?;
        } else {
            Square::from_index(from)?;
        }

        Some(m)
    }

    /// Returns true for the sentinel.
    pub fn is_none(self) -> bool {
        self == Move::NONE
    }

    /// Returns the destination square, or `None` for the sentinel.
    pub fn to(self) -> Option<Square> {
        if self.is_none() {
            return None;
        }
        Square::from_index((self.0 & TO_MASK) as u8)
    }

    /// Returns the origin of the move, or `None` for the sentinel.
    pub fn origin(self) -> Option<Origin> {
        if self.is_none() {
            return None;
        }

        let from = ((self.0 & FROM_MASK) >> FROM_SHIFT) as u8;
        if self.is_drop() {
            PieceType::from_bits(from).map(Origin::Hand)
        } else {
            Square::from_index(from).map(Origin::Square)
        }
    }

    /// Returns the origin square of a board move.
    pub fn from_square(self) -> Option<Square> {
        match self.origin()? {
            Origin::Square(sq) => Some(sq),
            Origin::Hand(_) => None,
        }
    }

    /// Returns the dropped kind of a drop move.
    pub fn dropped(self) -> Option<PieceType> {
        match self.origin()? {
            Origin::Hand(pt) => Some(pt),
            Origin::Square(_) => None,
        }
    }

    /// Returns true if the move promotes the moved piece.
    pub fn is_promotion(self) -> bool {
        self.0 & PROMOTE_FLAG != 0
    }

    /// Returns true if the move is a drop.
    pub fn is_drop(self) -> bool {
        self.0 & DROP_FLAG != 0
    }

    /// Creates a new instance of `Move` from USI formatted string.
    pub fn from_usi(s: &str) -> Option<Move> {
        let bytes = s.as_bytes();
        if !s.is_ascii() || !(bytes.len() == 4 || (bytes.len() == 5 && bytes[4] == b'+')) {
            return None;
        }

        if bytes[1] == b'*' {
            if bytes.len() != 4 || !bytes[0].is_ascii_uppercase() {
                return None;
            }
            let piece_type = PieceType::from_usi_char(bytes[0] as char)
                .filter(|pt| pt.is_hand_piece())?;
            let to = Square::from_usi(&s[2..4])?;
            return Some(Move::drop(piece_type, to));
        }

        let from = Square::from_usi(&s[0..2])?;
        let to = Square::from_usi(&s[2..4])?;
        Some(Move::normal(from, to, bytes.len() == 5))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let (Some(origin), Some(to)) = (self.origin(), self.to()) else {
            return write!(f, "none");
        };

        match origin {
            Origin::Square(from) => {
                write!(f, "{}{}{}", from, to, if self.is_promotion() { "+" } else { "" })
            }
            Origin::Hand(pt) => write!(f, "{}*{}", pt.usi_char(), to),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Origin::Square(sq) => write!(f, "{sq}"),
            Origin::Hand(pt) => write!(f, "{}*", pt.usi_char()),
        }
    }
}

/// Error type for parsing a move from USI notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoveError;

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid move notation")
    }
}

impl std::error::Error for ParseMoveError {}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_usi(s).ok_or(ParseMoveError)
    }
}

/// A legal-move list supplied by the engine, grouped by origin.
///
/// # Examples
///
/// ```
/// use shogi_kifu::{LegalMoves, Origin};
/// use shogi_kifu::square::consts::*;
///
/// let legal = LegalMoves::parse("7g7f 2g2f 8h2b+ 8h2b").unwrap();
/// assert_eq!(2, legal.destinations(Origin::Square(SQ_8H)).len());
/// assert!(legal.destinations(Origin::Square(SQ_5I)).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoves {
    by_origin: BTreeMap<Origin, Vec<Move>>,
}

impl LegalMoves {
    /// Parses a space-separated list of USI moves. Fails on the first bad token.
    pub fn parse(s: &str) -> Result<LegalMoves, ParseMoveError> {
        s.split_whitespace()
            .map(Move::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(LegalMoves::from_iter)
    }

    /// Returns the moves starting at `origin`.
    pub fn destinations(&self, origin: Origin) -> &[Move] {
        self.by_origin.get(&origin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the origins having at least one move.
    pub fn origins(&self) -> impl Iterator<Item = Origin> + '_ {
        self.by_origin.keys().copied()
    }

    /// Returns all moves, grouped by origin.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.by_origin.values().flatten().copied()
    }

    pub fn contains(&self, m: Move) -> bool {
        m.origin()
            .map_or(false, |origin| self.destinations(origin).contains(&m))
    }

    pub fn len(&self) -> usize {
        self.by_origin.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }
}

impl FromIterator<Move> for LegalMoves {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut by_origin: BTreeMap<Origin, Vec<Move>> = BTreeMap::new();
        for m in iter {
            if let Some(origin) = m.origin() {
                by_origin.entry(origin).or_default().push(m);
            }
        }
        LegalMoves { by_origin }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::consts::*;

    #[test]
    fn from_usi() {
        let ok_cases = [
            ("9a1i", Move::normal(SQ_9A, SQ_1I, false)),
            ("9a1i+", Move::normal(SQ_9A, SQ_1I, true)),
            ("S*5e", Move::drop(PieceType::Silver, SQ_5E)),
        ];
        let ng_cases = [
            "9j1i", "9a1j", "9a1", "9aj", "j1i", "9a1i1", "9a1i-", "S+5e", "S 5e", "Z*5e",
            "K*5e", "s*5e", "P*5e+", "７六歩",
        ];

        for (i, case) in ok_cases.iter().enumerate() {
            assert_eq!(Some(case.1), Move::from_usi(case.0), "failed at #{i}");
            assert_eq!(case.0, case.1.to_string(), "failed at #{i}");
        }

        for (i, case) in ng_cases.iter().enumerate() {
            assert!(Move::from_usi(case).is_none(), "failed at #{i}");
        }
    }

    #[test]
    fn packing() {
        let m = Move::normal(SQ_7G, SQ_7F, true);
        assert_eq!(
            SQ_7F.index() as u32 | PROMOTE_FLAG | ((SQ_7G.index() as u32) << 9),
            m.bits()
        );
        assert!(m.is_promotion());
        assert!(!m.is_drop());
        assert_eq!(Some(m), Move::from_bits(m.bits()));

        let d = Move::drop(PieceType::Pawn, SQ_5E);
        assert!(d.is_drop());
        assert_eq!(Some(PieceType::Pawn), d.dropped());
        assert_eq!(None, d.from_square());
        assert_eq!(Some(SQ_5E), d.to());

        assert_eq!(None, Move::from_bits(DROP_FLAG | (8 << 9)));
        assert_eq!(None, Move::from_bits(81));
    }

    #[test]
    fn drop_uses_base_kind() {
        assert_eq!(
            Move::drop(PieceType::Bishop, SQ_5E),
            Move::drop(PieceType::Horse, SQ_5E)
        );
    }

    #[test]
    fn sentinel() {
        assert!(Move::NONE.is_none());
        assert_eq!(None, Move::NONE.to());
        assert_eq!(None, Move::NONE.origin());
        assert_eq!("none", Move::NONE.to_string());
        assert_eq!(Move::NONE, Move::default());
    }

    #[test]
    fn legal_moves() {
        let legal = LegalMoves::parse("7g7f 7g7f+ P*5e P*5d 5i4h").unwrap();
        assert_eq!(5, legal.len());
        assert_eq!(3, legal.origins().count());
        assert_eq!(2, legal.destinations(Origin::Hand(PieceType::Pawn)).len());
        assert!(legal.contains(Move::normal(SQ_5I, SQ_4H, false)));
        assert!(!legal.contains(Move::normal(SQ_5I, SQ_5H, false)));
        assert!(LegalMoves::parse("7g7f bogus").is_err());
        assert!(LegalMoves::parse("").unwrap().is_empty());
    }
}
