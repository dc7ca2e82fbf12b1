//! Free-form move and position input.
//!
//! Moves may be typed as USI tokens (`7g7f`) or in Japanese (`７六歩`,
//! `76歩`, `同歩`, `５八金左`, `２二角成`, `５五角打`), optionally prefixed by
//! a side mark. Positions may be SFEN, a USI `position` line or a BOD
//! diagram.
//!
//! ```
//! use shogi_kifu::notation::text::parse_move_text;
//! use shogi_kifu::Position;
//!
//! let pos = Position::startpos();
//! assert_eq!("6i5h", parse_move_text(&pos, "☗５八金左").unwrap().to_string());
//! ```

use crate::error::{ParseError, Result};
use crate::moves::Move;
use crate::notation::japanese::{modifiers, Modifier};
use crate::notation::{bod, sfen, usi};
use crate::piece::Piece;
use crate::piece_type::PieceType;
use crate::position::Position;
use crate::square::Square;

const SIDE_MARKS: [char; 4] = ['☗', '▲', '☖', '△'];

/// Parses a move typed as USI or Japanese text in `pos`.
pub fn parse_move_text(pos: &Position, text: &str) -> Result<Move> {
    parse_move_text_after(pos, text, None)
}

/// Like [`parse_move_text`], with `last_to` resolving `同`.
pub fn parse_move_text_after(pos: &Position, text: &str, last_to: Option<Square>) -> Result<Move> {
    let err = || ParseError::Move(text.to_string());

    let s = text.trim().trim_start_matches(SIDE_MARKS);
    if let Some(m) = Move::from_usi(s) {
        return Ok(m);
    }

    let (to, rest) = if let Some(rest) = s.strip_prefix('同') {
        (last_to.ok_or_else(err)?, rest.trim_start_matches(['　', ' ']))
    } else {
        let split = s.char_indices().nth(2).map_or(s.len(), |(i, _)| i);
        (Square::from_japanese(&s[..split]).ok_or_else(err)?, &s[split..])
    };

    let (piece_type, len) = PieceType::strip_japanese(rest).ok_or_else(err)?;
    let mut rest = &rest[len..];

    let mut given = Vec::new();
    while let Some((modifier, len)) = Modifier::strip(rest) {
        given.push(modifier);
        rest = &rest[len..];
    }
    let promote = given.contains(&Modifier::Promote);

    if let Some(origin) = rest.strip_prefix('(') {
        let from = origin.get(..2).and_then(Square::from_digits).ok_or_else(err)?;
        return Ok(Move::normal(from, to, promote));
    }
    if !rest.trim().is_empty() {
        return Err(err());
    }

    let stm = pos.side_to_move();
    let drop = Move::drop(piece_type, to);
    if given.contains(&Modifier::Drop) {
        return if piece_type.is_hand_piece() {
            Ok(drop)
        } else {
            Err(err())
        };
    }

    let positional: Vec<Modifier> = given.iter().copied().filter(|m| m.is_positional()).collect();
    let candidates: Vec<Move> = pos
        .origins_reaching(to, Piece::new(piece_type, stm))
        .into_iter()
        .map(|from| Move::normal(from, to, promote))
        .filter(|&m| {
            let needed = modifiers(pos, m);
            positional.iter().all(|p| needed.contains(p))
        })
        .collect();

    match candidates.as_slice() {
        [m] => Ok(*m),
        [] if positional.is_empty()
            && !promote
            && piece_type.is_hand_piece()
            && pos.hand_count(stm, piece_type) > 0 =>
        {
            Ok(drop)
        }
        [] => Err(err()),
        _ => {
            tracing::debug!(text, count = candidates.len(), "ambiguous move text");
            Err(err())
        }
    }
}

/// Parses a position given as a USI `position` line (taking the end of its
/// move list), an SFEN string or a BOD diagram.
pub fn parse_position_any(s: &str) -> Result<Position> {
    if let Ok(game) = usi::parse_game(s) {
        return Ok(game.tree[game.main_line_end()].position().clone());
    }
    if let Ok(pos) = sfen::parse(s) {
        return Ok(pos);
    }
    if bod::is_bod(s) {
        return bod::parse(s);
    }
    Err(ParseError::NoMatch)
}

/// Parses a whitespace separated list of USI moves, as sent by the engine.
pub fn parse_moves_usi(s: &str) -> Result<Vec<Move>> {
    usi::parse_moves(s)
}
