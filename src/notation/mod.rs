//! Text notations for positions and games.
//!
//! Every notation is reachable through the [`Codec`] trait, so callers can
//! try several formats in turn without special cases:
//!
//! ```
//! use shogi_kifu::notation::{self, Codec, Csa, UsiGame};
//!
//! let game = notation::parse_game_any("startpos moves 7g7f 3c3d").unwrap();
//! let csa = Csa.format(&game);
//! let back = Csa.parse(&csa).unwrap();
//! assert_eq!(UsiGame.format(&game), UsiGame.format(&back));
//! ```

pub mod bod;
pub mod csa;
pub mod japanese;
pub mod ki2;
pub mod kif;
pub mod sfen;
pub mod text;
pub mod usi;

pub use self::csa::Csa;
pub use self::ki2::{Ki2, Ki2Options};
pub use self::kif::{Kif, KifOptions};

use crate::error::{ParseError, Result};
use crate::game::Game;
use crate::position::Position;

/// A bidirectional text notation for values of type `Item`.
pub trait Codec {
    type Item;

    /// Short name of the notation, e.g. `"KIF"`.
    fn name(&self) -> &'static str;

    fn format(&self, item: &Self::Item) -> String;

    fn parse(&self, s: &str) -> Result<Self::Item>;
}

/// SFEN position text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sfen;

impl Codec for Sfen {
    type Item = Position;

    fn name(&self) -> &'static str {
        "SFEN"
    }

    fn format(&self, pos: &Position) -> String {
        sfen::format(pos)
    }

    fn parse(&self, s: &str) -> Result<Position> {
        sfen::parse(s)
    }
}

/// BOD diagram text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bod;

impl Codec for Bod {
    type Item = Position;

    fn name(&self) -> &'static str {
        "BOD"
    }

    fn format(&self, pos: &Position) -> String {
        bod::format(pos)
    }

    fn parse(&self, s: &str) -> Result<Position> {
        bod::parse(s)
    }
}

/// USI `position` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsiGame;

impl Codec for UsiGame {
    type Item = Game;

    fn name(&self) -> &'static str {
        "USI"
    }

    fn format(&self, game: &Game) -> String {
        usi::format_game(game)
    }

    fn parse(&self, s: &str) -> Result<Game> {
        usi::parse_game(s)
    }
}

/// Tries the game notations in priority order (USI, SFEN, CSA, KIF) and
/// returns the first success.
pub fn parse_game_any(s: &str) -> Result<Game> {
    let attempts: [(&str, fn(&str) -> Result<Game>); 4] = [
        ("USI", |s| UsiGame.parse(s)),
        ("SFEN", |s| Sfen.parse(s).map(Game::new)),
        ("CSA", |s| Csa.parse(s)),
        ("KIF", |s| Kif::default().parse(s)),
    ];

    for (name, parse) in attempts {
        match parse(s) {
            Ok(game) => return Ok(game),
            Err(e) => tracing::debug!(notation = name, error = %e, "notation did not match"),
        }
    }

    Err(ParseError::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn priority_order() {
        let game = parse_game_any("position startpos moves 7g7f").unwrap();
        assert_eq!(1, game.tree.main_line(game.root()).len());

        let game = parse_game_any(sfen::STARTPOS).unwrap();
        assert!(game.tree.main_line(game.root()).is_empty());

        let game = parse_game_any("V2.2\nPI\n+\n+7776FU\n-3334FU\n").unwrap();
        assert_eq!("position startpos moves 7g7f 3c3d", UsiGame.format(&game));

        let game = parse_game_any("手数----指手---------消費時間--\n   1 ７六歩(77)\n").unwrap();
        assert_eq!("position startpos moves 7g7f", UsiGame.format(&game));
    }

    #[test]
    fn nothing_matches() {
        assert_matches!(parse_game_any("hello"), Err(ParseError::NoMatch));
    }

    #[test]
    fn names() {
        assert_eq!("SFEN", Sfen.name());
        assert_eq!("BOD", Bod.name());
        assert_eq!("USI", UsiGame.name());
        assert_eq!("CSA", Csa.name());
        assert_eq!("KIF", Kif::default().name());
        assert_eq!("KI2", Ki2::default().name());
    }
}
