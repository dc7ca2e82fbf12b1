//! USI `position` lines: `position startpos|sfen <SFEN>[ moves <move>...]`.
//!
//! ```
//! use shogi_kifu::notation::usi;
//!
//! let game = usi::parse_game("startpos moves 7g7f 3c3d").unwrap();
//! assert_eq!("position startpos moves 7g7f 3c3d", usi::format_game(&game));
//! ```

use itertools::Itertools;

use crate::error::{ParseError, Result};
use crate::game::Game;
use crate::moves::Move;
use crate::notation::sfen;
use crate::termination::Termination;
use crate::tree::{GameTree, StepId};

/// Parses a USI `position` line. The leading `position` keyword is optional.
///
/// Trailing result keywords such as `resign` end the line with a terminal step.
pub fn parse_game(s: &str) -> Result<Game> {
    let err = || ParseError::Usi(s.trim().to_string());

    let mut tokens = s.split_whitespace().peekable();
    if tokens.peek() == Some(&"position") {
        tokens.next();
    }

    let position = match tokens.next() {
        Some("startpos") => sfen::parse(sfen::STARTPOS)?,
        Some("sfen") => {
            let fields: Vec<&str> = tokens.by_ref().take(4).collect();
            sfen::parse(&fields.join(" ")).map_err(|_| err())?
        }
        _ => return Err(err()),
    };

    let mut game = Game::new(position);
    match tokens.next() {
        None => return Ok(game),
        Some("moves") => {}
        Some(_) => return Err(err()),
    }

    let mut cur = game.root();
    for token in tokens {
        let next = if let Some(m) = Move::from_usi(token) {
            game.tree.append_move(cur, m)
        } else if let Some(t) = Termination::from_usi(token) {
            game.tree.append_end(cur, t)
        } else {
            None
        };
        cur = next.ok_or_else(err)?;
    }

    Ok(game)
}

/// Formats the main line of the game. Terminal steps are not encoded.
pub fn format_game(game: &Game) -> String {
    format_position(&game.tree, game.main_line_end())
}

/// Formats the `position` command reaching `id` from the root.
pub fn format_position(tree: &GameTree, id: StepId) -> String {
    let start = sfen::format(tree[tree.root()].position());
    let mut s = if start == sfen::STARTPOS {
        "position startpos".to_string()
    } else {
        format!("position sfen {start}")
    };

    let moves = tree.moves_to(id);
    if !moves.is_empty() {
        s.push_str(" moves ");
        s.push_str(&moves.iter().join(" "));
    }
    s
}

/// Parses a space-separated list of USI moves, as sent by the engine.
pub fn parse_moves(s: &str) -> Result<Vec<Move>> {
    s.split_whitespace()
        .map(|token| Move::from_usi(token).ok_or_else(|| ParseError::Move(token.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn round_trip() {
        let cases = [
            "position startpos",
            "position startpos moves 7g7f 3c3d",
            "position startpos moves 7g7f 3c3d 8h2b+ 3a2b B*4e",
            "position sfen lnsgkgsn1/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1 moves 5a4b",
            "position sfen 4k4/9/9/9/9/9/9/9/4K4 b 2G 1",
        ];

        for (i, case) in cases.iter().enumerate() {
            let game = parse_game(case).unwrap_or_else(|e| panic!("failed at #{i}: {e}"));
            assert_eq!(*case, format_game(&game), "failed at #{i}");
        }
    }

    #[test]
    fn startpos_alias() {
        let game =
            parse_game(&format!("position sfen {} moves 2g2f", sfen::STARTPOS)).unwrap();
        assert_eq!("position startpos moves 2g2f", format_game(&game));
    }

    #[test]
    fn result_keywords() {
        let game = parse_game("startpos moves 7g7f resign").unwrap();
        let end = game.main_line_end();
        assert_eq!(Some(&Termination::Resign), game.tree[end].termination());
        assert_eq!("position startpos moves 7g7f", format_game(&game));

        assert_matches!(
            parse_game("startpos moves 7g7f resign 3c3d"),
            Err(ParseError::Usi(_))
        );
    }

    #[test]
    fn invalid() {
        let cases = [
            "",
            "position",
            "position sfen",
            "position sfen 9/9 b - 1",
            "position startpos 7g7f",
            "position startpos moves 7g7z",
            "moves 7g7f",
        ];

        for (i, case) in cases.iter().enumerate() {
            assert!(parse_game(case).is_err(), "failed at #{i}");
        }
    }

    #[test]
    fn move_lists() {
        assert_eq!(3, parse_moves("7g7f 2g2f P*5e").unwrap().len());
        assert!(parse_moves("").unwrap().is_empty());
        assert_matches!(parse_moves("7g7f nope"), Err(ParseError::Move(t)) if t == "nope");
    }
}
