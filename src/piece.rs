use std::fmt;

use crate::color::Color;
use crate::piece_type::PieceType;

/// Represents a piece on the game board.
///
/// A piece packs into a small integer as `kind | (side << 4)`, see
/// [`Piece::to_bits`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

const SIDE_SHIFT: u8 = 4;

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Piece {
        Piece { piece_type, color }
    }

    /// Packs the piece as `kind | (side << 4)`.
    pub fn to_bits(self) -> u8 {
        self.piece_type.bits() | ((self.color as u8) << SIDE_SHIFT)
    }

    /// Unpacks a value produced by [`Piece::to_bits`]. `0` (empty) yields `None`.
    pub fn from_bits(bits: u8) -> Option<Piece> {
        let piece_type = PieceType::from_bits(bits & 0x0f)?;
        let color = Color::from_index(bits >> SIDE_SHIFT)?;
        Some(Piece { piece_type, color })
    }

    /// Creates a new instance of `Piece` from its SFEN letter.
    /// Uppercase letters are Black, lowercase letters are White.
    pub fn from_sfen(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_usi_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::Black
        } else {
            Color::White
        };

        Some(Piece { piece_type, color })
    }

    /// Returns an instance which has the same piece type but the opposite color.
    #[must_use]
    pub fn flip(self) -> Piece {
        Piece {
            piece_type: self.piece_type,
            color: self.color.flip(),
        }
    }

    /// Returns the promoted piece, if the kind can promote.
    pub fn promote(self) -> Option<Piece> {
        self.piece_type.promote().map(|pt| Piece::new(pt, self.color))
    }

    /// Returns the unpromoted piece, if the kind is promoted.
    pub fn unpromote(self) -> Option<Piece> {
        self.piece_type.unpromote().map(|pt| Piece::new(pt, self.color))
    }

    /// Returns true if the piece belongs to the given color.
    pub fn is_color(self, c: Color) -> bool {
        self.color == c
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.piece_type.is_promoted() {
            write!(f, "+")?;
        }

        let c = self.piece_type.usi_char();
        match self.color {
            Color::Black => write!(f, "{c}"),
            Color::White => write!(f, "{}", c.to_ascii_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits() {
        let cases = [
            (PieceType::Pawn, Color::Black, 0x01),
            (PieceType::Dragon, Color::Black, 0x0e),
            (PieceType::Pawn, Color::White, 0x11),
            (PieceType::King, Color::White, 0x18),
        ];

        for (i, case) in cases.iter().enumerate() {
            let pc = Piece::new(case.0, case.1);
            assert_eq!(case.2, pc.to_bits(), "failed at #{i}");
            assert_eq!(Some(pc), Piece::from_bits(case.2), "failed at #{i}");
        }

        assert_eq!(None, Piece::from_bits(0));
        assert_eq!(None, Piece::from_bits(0x20 | 1));
    }

    #[test]
    fn from_sfen() {
        assert_eq!(
            Some(Piece::new(PieceType::Knight, Color::Black)),
            Piece::from_sfen('N')
        );
        assert_eq!(
            Some(Piece::new(PieceType::Rook, Color::White)),
            Piece::from_sfen('r')
        );
        assert_eq!(None, Piece::from_sfen('x'));
    }

    #[test]
    fn to_sfen() {
        assert_eq!("P", Piece::new(PieceType::Pawn, Color::Black).to_string());
        assert_eq!("+r", Piece::new(PieceType::Dragon, Color::White).to_string());
    }

    #[test]
    fn flip_and_promote() {
        let pc = Piece::new(PieceType::Silver, Color::Black);
        assert_eq!(Color::White, pc.flip().color);
        assert_eq!(PieceType::ProSilver, pc.promote().unwrap().piece_type);
        assert_eq!(Some(pc), pc.promote().and_then(Piece::unpromote));
        assert_eq!(None, Piece::new(PieceType::Gold, Color::Black).promote());
    }
}
