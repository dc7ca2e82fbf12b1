//! Named starting configurations (手合割).

use crate::notation::sfen;
use crate::position::Position;

/// A standard handicap. The handicapped player (上手) is White and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handicap {
    Even,
    Lance,
    RightLance,
    Bishop,
    Rook,
    RookLance,
    TwoPieces,
    FourPieces,
    SixPieces,
    EightPieces,
    TenPieces,
}

static TABLE: [(Handicap, &str, &str); 11] = [
    (Handicap::Even, "平手", sfen::STARTPOS),
    (
        Handicap::Lance,
        "香落ち",
        "lnsgkgsn1/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::RightLance,
        "右香落ち",
        "1nsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::Bishop,
        "角落ち",
        "lnsgkgsnl/1r7/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::Rook,
        "飛車落ち",
        "lnsgkgsnl/7b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::RookLance,
        "飛香落ち",
        "lnsgkgsn1/7b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::TwoPieces,
        "二枚落ち",
        "lnsgkgsnl/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::FourPieces,
        "四枚落ち",
        "1nsgkgsn1/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::SixPieces,
        "六枚落ち",
        "2sgkgs2/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::EightPieces,
        "八枚落ち",
        "3gkg3/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        Handicap::TenPieces,
        "十枚落ち",
        "4k4/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    ),
];

impl Handicap {
    pub fn iter() -> impl Iterator<Item = Handicap> {
        TABLE.iter().map(|&(h, _, _)| h)
    }

    /// Returns the KIF name, e.g. `香落ち`.
    pub fn japanese(self) -> &'static str {
        self.entry().1
    }

    /// Returns the SFEN of the starting position.
    pub fn sfen(self) -> &'static str {
        self.entry().2
    }

    /// Returns the starting position.
    pub fn position(self) -> Position {
        match self {
            Handicap::Even => Position::startpos(),
            _ => sfen::parse(self.sfen()).unwrap_or_else(|_| Position::startpos()),
        }
    }

    pub fn from_japanese(name: &str) -> Option<Handicap> {
        TABLE
            .iter()
            .find(|(_, n, _)| *n == name.trim())
            .map(|&(h, _, _)| h)
    }

    /// Finds the handicap whose starting position is `sfen`.
    pub fn from_sfen(sfen: &str) -> Option<Handicap> {
        TABLE
            .iter()
            .find(|(_, _, s)| *s == sfen.trim())
            .map(|&(h, _, _)| h)
    }

    fn entry(self) -> &'static (Handicap, &'static str, &'static str) {
        &TABLE[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn table_order() {
        for (i, h) in Handicap::iter().enumerate() {
            assert_eq!(h as usize, i, "failed at #{i}");
            assert_eq!(Some(h), Handicap::from_japanese(h.japanese()), "failed at #{i}");
            assert_eq!(Some(h), Handicap::from_sfen(h.sfen()), "failed at #{i}");
        }
    }

    #[test]
    fn positions_parse() {
        for (i, h) in Handicap::iter().enumerate() {
            let pos = sfen::parse(h.sfen()).unwrap_or_else(|e| panic!("failed at #{i}: {e}"));
            assert_eq!(h.sfen(), sfen::format(&pos), "failed at #{i}");
            let expected = if h == Handicap::Even {
                Color::Black
            } else {
                Color::White
            };
            assert_eq!(expected, pos.side_to_move(), "failed at #{i}");
        }
    }
}
