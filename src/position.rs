use std::fmt;

use crate::color::Color;
use crate::error::Result;
use crate::hand::Hand;
use crate::moves::{Move, Origin};
use crate::notation::sfen;
use crate::piece::Piece;
use crate::piece_type::PieceType;
use crate::square::Square;

#[derive(Clone, PartialEq, Eq)]
struct PieceGrid([Option<Piece>; 81]);

impl PieceGrid {
    fn get(&self, sq: Square) -> Option<Piece> {
        self.0[sq.index()]
    }

    fn set(&mut self, sq: Square, pc: Option<Piece>) {
        self.0[sq.index()] = pc;
    }
}

impl fmt::Debug for PieceGrid {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "PieceGrid {{ ")?;

        for pc in self.0.iter() {
            match pc {
                Some(pc) => write!(fmt, "{pc} ")?,
                None => write!(fmt, ". ")?,
            }
        }
        write!(fmt, "}}")
    }
}

/// Represents a state of the game: board, hands, side to move and move number.
///
/// The position performs no legality checks. It trusts the caller (usually
/// the external engine) to supply legal moves; a malformed move leaves an
/// inconsistent position behind instead of failing.
///
/// # Examples
///
/// ```
/// use shogi_kifu::{Move, Position};
/// use shogi_kifu::square::consts::*;
///
/// let mut pos = Position::startpos();
/// pos.do_move(Move::normal(SQ_7G, SQ_7F, false));
///
/// assert_eq!(
///     "lnsgkgsnl/1r5b1/ppppppppp/9/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL w - 2",
///     pos.to_sfen()
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: PieceGrid,
    hand: Hand,
    side_to_move: Color,
    ply: u32,
}

/////////////////////////////////////////////////////////////////////////////
// Type implementation
/////////////////////////////////////////////////////////////////////////////

impl Position {
    /// Creates a new instance of `Position` with an empty board.
    pub fn new() -> Position {
        Default::default()
    }

    /// Creates the even-game starting position.
    pub fn startpos() -> Position {
        const BACK_RANK: [PieceType; 9] = [
            PieceType::Lance,
            PieceType::Knight,
            PieceType::Silver,
            PieceType::Gold,
            PieceType::King,
            PieceType::Gold,
            PieceType::Silver,
            PieceType::Knight,
            PieceType::Lance,
        ];

        let mut pos = Position::new();
        for (col, &pt) in (0u8..).zip(BACK_RANK.iter()) {
            for (color, back, pawns) in [(Color::White, 0, 2), (Color::Black, 8, 6)] {
                pos.put(col, back, Piece::new(pt, color));
                pos.put(col, pawns, Piece::new(PieceType::Pawn, color));
            }
        }
        pos.put(1, 1, Piece::new(PieceType::Rook, Color::White));
        pos.put(7, 1, Piece::new(PieceType::Bishop, Color::White));
        pos.put(1, 7, Piece::new(PieceType::Bishop, Color::Black));
        pos.put(7, 7, Piece::new(PieceType::Rook, Color::Black));
        pos
    }

    fn put(&mut self, col: u8, row: u8, pc: Piece) {
        if let Some(sq) = Square::new(col, row) {
            self.board.set(sq, Some(pc));
        }
    }

    /// Parses an SFEN string.
    pub fn from_sfen(s: &str) -> Result<Position> {
        sfen::parse(s)
    }

    /// Converts the position into SFEN formatted string.
    pub fn to_sfen(&self) -> String {
        sfen::format(self)
    }

    /////////////////////////////////////////////////////////////////////////
    // Accessors
    /////////////////////////////////////////////////////////////////////////

    /// Returns a piece at the given square.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    /// Places `pc` on the square, or empties it.
    pub fn set_piece(&mut self, sq: Square, pc: Option<Piece>) {
        self.board.set(sq, pc);
    }

    /// Returns the hands of both players.
    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Returns the number of `piece_type` held by `color`.
    pub fn hand_count(&self, color: Color, piece_type: PieceType) -> u8 {
        self.hand.get(color, piece_type)
    }

    /// Sets the number of `piece_type` held by `color`.
    pub fn set_hand_count(&mut self, color: Color, piece_type: PieceType, count: u8) {
        self.hand.set(color, piece_type, count);
    }

    /// Adds `delta` to the number of `piece_type` held by `color`.
    pub fn add_hand_count(&mut self, color: Color, piece_type: PieceType, delta: i16) {
        self.hand.add(color, piece_type, delta);
    }

    /// Returns the side to make a move next.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, c: Color) {
        self.side_to_move = c;
    }

    /// Returns the 1-based move number.
    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn set_ply(&mut self, ply: u32) {
        self.ply = ply;
    }

    /// Returns the occupied squares with their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |sq| self.piece_at(sq).map(|pc| (sq, pc)))
    }

    /// Returns the piece a move would move or drop, if any.
    pub fn moving_piece(&self, m: Move) -> Option<Piece> {
        match m.origin()? {
            Origin::Square(from) => self.piece_at(from),
            Origin::Hand(pt) => Some(Piece::new(pt, self.side_to_move)),
        }
    }

    /////////////////////////////////////////////////////////////////////////
    // Making a move
    /////////////////////////////////////////////////////////////////////////

    /// Applies the move and returns the captured piece, if any.
    ///
    /// Drops take the piece out of the mover's hand. Board moves lift the
    /// piece, promote it when flagged, and add the demoted kind of whatever
    /// stood on the destination to the mover's hand. The side to move flips
    /// and the move number increments. The sentinel move is ignored.
    pub fn do_move(&mut self, m: Move) -> Option<Piece> {
        let (Some(origin), Some(to)) = (m.origin(), m.to()) else {
            tracing::trace!("ignoring sentinel move");
            return None;
        };

        let stm = self.side_to_move;
        let captured = match origin {
            Origin::Hand(pt) => {
                self.hand.add(stm, pt, -1);
                self.board.set(to, Some(Piece::new(pt, stm)));
                None
            }
            Origin::Square(from) => {
                let moved = self.board.get(from);
                if moved.is_none() {
                    tracing::trace!(%m, "moving from an empty square");
                }

                let captured = self.board.get(to);
                if let Some(cap) = captured {
                    self.hand.add(stm, cap.piece_type.base(), 1);
                }

                let placed = moved.map(|pc| {
                    if m.is_promotion() {
                        pc.promote().unwrap_or(pc)
                    } else {
                        pc
                    }
                });
                self.board.set(from, None);
                self.board.set(to, placed);
                captured
            }
        };

        self.side_to_move = stm.flip();
        self.ply = self.ply.saturating_add(1);
        captured
    }

    /////////////////////////////////////////////////////////////////////////
    // Movement templates
    /////////////////////////////////////////////////////////////////////////

    /// Returns true if `pc` standing on `from` could move to `to` following its
    /// movement template, with slides stopped by any piece in between.
    pub fn reaches(&self, pc: Piece, from: Square, to: Square) -> bool {
        if from == to {
            return false;
        }

        let orient = |(dc, dr): (i8, i8)| match pc.color {
            Color::Black => (dc, dr),
            Color::White => (-dc, -dr),
        };

        let dc = to.col() as i8 - from.col() as i8;
        let dr = to.row() as i8 - from.row() as i8;
        if pc
            .piece_type
            .neighbours()
            .iter()
            .any(|&step| orient(step) == (dc, dr))
        {
            return true;
        }

        pc.piece_type.slides().iter().any(|&dir| {
            let (sc, sr) = orient(dir);
            let mut cur = from;
            while let Some(next) = cur.shift(sc, sr) {
                if next == to {
                    return true;
                }
                if self.piece_at(next).is_some() {
                    return false;
                }
                cur = next;
            }
            false
        })
    }

    /// Returns every square holding `pc` from which it could reach `to`.
    pub fn origins_reaching(&self, to: Square, pc: Piece) -> Vec<Square> {
        self.pieces()
            .filter(|&(sq, p)| p == pc && self.reaches(pc, sq, to))
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Returns true if the move could promote: a promotable, unpromoted piece
    /// moving from or into the mover's promotion zone.
    pub fn can_promote(&self, m: Move) -> bool {
        let (Some(from), Some(to)) = (m.from_square(), m.to()) else {
            return false;
        };

        match self.piece_at(from) {
            Some(pc) => {
                pc.piece_type.can_promote()
                    && (from.is_promotion_zone(pc.color) || to.is_promotion_zone(pc.color))
            }
            None => false,
        }
    }
}

/////////////////////////////////////////////////////////////////////////////
// Trait implementations
/////////////////////////////////////////////////////////////////////////////

impl Default for Position {
    fn default() -> Position {
        Position {
            board: PieceGrid([None; 81]),
            hand: Default::default(),
            side_to_move: Color::Black,
            ply: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "   9   8   7   6   5   4   3   2   1")?;
        writeln!(f, "+---+---+---+---+---+---+---+---+---+")?;

        for row in 0..9u8 {
            write!(f, "|")?;
            for col in 0..9u8 {
                match Square::new(col, row).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => write!(f, "{:>3}|", piece.to_string())?,
                    None => write!(f, "   |")?,
                }
            }

            writeln!(f, " {}", (b'a' + row) as char)?;
            writeln!(f, "+---+---+---+---+---+---+---+---+---+")?;
        }

        writeln!(
            f,
            "Side to move: {}",
            if self.side_to_move == Color::Black {
                "Black"
            } else {
                "White"
            }
        )?;

        for color in Color::iter() {
            write!(
                f,
                "Hand ({}): ",
                if color == Color::Black { "Black" } else { "White" }
            )?;
            for (pt, n) in self.hand.iter(color) {
                write!(f, "{}{n} ", Piece::new(pt, color))?;
            }
            writeln!(f)?;
        }

        write!(f, "Ply: {}", self.ply)
    }
}
