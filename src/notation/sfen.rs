//! SFEN position notation.
//!
//! ```
//! use shogi_kifu::notation::sfen;
//!
//! let s = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";
//! let pos = sfen::parse(s).unwrap();
//! assert_eq!(s, sfen::format(&pos));
//! ```

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::color::Color;
use crate::error::{ParseError, Result};
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

/// The even-game starting position.
pub const STARTPOS: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

lazy_static! {
    static ref SFEN_RE: Regex = Regex::new(
        r"^(?:[1-9]|\+?[KRBGSNLPkrbgsnlp])+(?:/(?:[1-9]|\+?[KRBGSNLPkrbgsnlp])+){8} [bw] (?:-|(?:[0-9]*[RBGSNLPrbgsnlp])+) [0-9]+$"
    )
    .unwrap();
}

/// Returns true if `s` passes the structural check of an SFEN string.
pub fn is_sfen(s: &str) -> bool {
    SFEN_RE.is_match(s.trim())
}

/// Parses an SFEN string. Piece-count invariants are not validated.
pub fn parse(s: &str) -> Result<Position> {
    let s = s.trim();
    if !SFEN_RE.is_match(s) {
        tracing::debug!(sfen = s, "rejected by structural check");
        return Err(ParseError::Sfen(s.to_string()));
    }

    let mut pos = Position::new();
    let mut parts = s.split(' ');
    let missing = || ParseError::Sfen(s.to_string());

    parse_board(&mut pos, parts.next().ok_or_else(missing)?).ok_or_else(missing)?;
    parse_stm(&mut pos, parts.next().ok_or_else(missing)?).ok_or_else(missing)?;
    parse_hand(&mut pos, parts.next().ok_or_else(missing)?).ok_or_else(missing)?;
    pos.set_ply(parts.next().ok_or_else(missing)?.parse().map_err(|_| missing())?);

    Ok(pos)
}

fn parse_board(pos: &mut Position, s: &str) -> Option<()> {
    for (row, text) in (0u8..).zip(s.split('/')) {
        let mut col = 0u8;
        let mut is_promoted = false;

        for c in text.chars() {
            match c {
                '+' => is_promoted = true,
                n if n.is_ascii_digit() => {
                    col = col.checked_add(n.to_digit(10)? as u8)?;
                    if col > 9 {
                        return None;
                    }
                }
                c => {
                    let mut piece = Piece::from_sfen(c)?;
                    if is_promoted {
                        piece = piece.promote()?;
                        is_promoted = false;
                    }
                    pos.set_piece(Square::new(col, row)?, Some(piece));
                    col += 1;
                }
            }
        }

        if col != 9 {
            return None;
        }
    }

    Some(())
}

fn parse_stm(pos: &mut Position, s: &str) -> Option<()> {
    pos.set_side_to_move(match s {
        "b" => Color::Black,
        "w" => Color::White,
        _ => return None,
    });
    Some(())
}

fn parse_hand(pos: &mut Position, s: &str) -> Option<()> {
    if s == "-" {
        return Some(());
    }

    let mut num_pieces: u8 = 0;
    for c in s.chars() {
        match c {
            n if n.is_ascii_digit() => {
                num_pieces = num_pieces.checked_mul(10)?.checked_add(n.to_digit(10)? as u8)?;
            }
            c => {
                let p = Piece::from_sfen(c)?;
                let n = if num_pieces == 0 { 1 } else { num_pieces };
                pos.set_hand_count(p.color, p.piece_type, n);
                num_pieces = 0;
            }
        }
    }

    Some(())
}

/// Converts the position into SFEN formatted string.
pub fn format(pos: &Position) -> String {
    format!(
        "{} {} {} {}",
        format_board(pos),
        pos.side_to_move(),
        format_hand(pos),
        pos.ply()
    )
}

fn format_board(pos: &Position) -> String {
    (0..9)
        .map(|row| {
            let mut s = String::new();
            let mut num_spaces = 0;
            for col in 0..9 {
                match Square::new(col, row).and_then(|sq| pos.piece_at(sq)) {
                    Some(pc) => {
                        if num_spaces > 0 {
                            s.push_str(&num_spaces.to_string());
                            num_spaces = 0;
                        }

                        s.push_str(&pc.to_string());
                    }
                    None => num_spaces += 1,
                }
            }

            if num_spaces > 0 {
                s.push_str(&num_spaces.to_string());
            }

            s
        })
        .join("/")
}

fn format_hand(pos: &Position) -> String {
    let hand = Color::iter()
        .map(|c| {
            pos.hand()
                .iter(c)
                .map(|(pt, n)| {
                    let pc = Piece::new(pt, c);
                    if n == 1 {
                        format!("{pc}")
                    } else {
                        format!("{n}{pc}")
                    }
                })
                .join("")
        })
        .join("");

    if hand.is_empty() {
        "-".to_string()
    } else {
        hand
    }
}
