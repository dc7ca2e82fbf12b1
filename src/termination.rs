//! Game results that end a line of play.

use std::fmt;

use crate::color::Color;

/// The result recorded on a terminal step.
///
/// The Japanese label is the canonical name, shared by KIF and KI2. USI
/// keywords and CSA tokens map onto the same vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Termination {
    Resign,
    Checkmate,
    Abort,
    Repetition,
    Timeout,
    IllegalWin,
    IllegalLoss,
    Jishogi,
    EnteringKing,
    Draw,
    NoMate,
    Matta,
    Error,
    Superior,
    Inferior,
    Other(String),
}

const NAMES: [(Termination, &str); 15] = [
    (Termination::Resign, "投了"),
    (Termination::Checkmate, "詰み"),
    (Termination::Abort, "中断"),
    (Termination::Repetition, "千日手"),
    (Termination::Timeout, "切れ負け"),
    (Termination::IllegalWin, "反則勝ち"),
    (Termination::IllegalLoss, "反則負け"),
    (Termination::Jishogi, "持将棋"),
    (Termination::EnteringKing, "入玉勝ち"),
    (Termination::Draw, "引き分け"),
    (Termination::NoMate, "不詰"),
    (Termination::Matta, "待った"),
    (Termination::Error, "エラー"),
    (Termination::Superior, "優等局面"),
    (Termination::Inferior, "劣等局面"),
];

const USI_KEYWORDS: [(&str, Termination); 9] = [
    ("resign", Termination::Resign),
    ("win", Termination::EnteringKing),
    ("draw", Termination::Draw),
    ("timeout", Termination::Timeout),
    ("rep_draw", Termination::Repetition),
    ("rep_win", Termination::IllegalWin),
    ("rep_lose", Termination::IllegalLoss),
    ("rep_sup", Termination::Superior),
    ("rep_inf", Termination::Inferior),
];

impl Termination {
    /// Returns the Japanese label.
    pub fn japanese(&self) -> &str {
        match self {
            Termination::Other(label) => label,
            t => NAMES
                .iter()
                .find(|(known, _)| known == t)
                .map_or("", |(_, name)| name),
        }
    }

    /// Looks up a label, falling back to `Other` for anything unknown.
    pub fn from_label(label: &str) -> Termination {
        NAMES
            .iter()
            .find(|(_, name)| *name == label)
            .map_or_else(|| Termination::Other(label.to_string()), |(t, _)| t.clone())
    }

    /// Maps a USI result keyword such as `resign` or `rep_draw`.
    pub fn from_usi(keyword: &str) -> Option<Termination> {
        USI_KEYWORDS
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, t)| t.clone())
    }

    /// Maps a CSA `%` token. `side_to_move` resolves the side-specific
    /// illegal-action tokens into a win or a loss for the side to move;
    /// `%ILLEGAL_MOVE` is always a loss for the side to move.
    pub fn from_csa(token: &str, side_to_move: Color) -> Option<Termination> {
        let loses = |c: Color| {
            if c == side_to_move {
                Termination::IllegalLoss
            } else {
                Termination::IllegalWin
            }
        };

        Some(match token {
            "%TORYO" => Termination::Resign,
            "%CHUDAN" => Termination::Abort,
            "%SENNICHITE" => Termination::Repetition,
            "%TIME_UP" => Termination::Timeout,
            "%ILLEGAL_MOVE" => Termination::IllegalLoss,
            "%+ILLEGAL_ACTION" => loses(Color::Black),
            "%-ILLEGAL_ACTION" => loses(Color::White),
            "%JISHOGI" => Termination::Jishogi,
            "%KACHI" => Termination::EnteringKing,
            "%HIKIWAKE" => Termination::Draw,
            "%MATTA" => Termination::Matta,
            "%TSUMI" => Termination::Checkmate,
            "%FUZUMI" => Termination::NoMate,
            "%ERROR" => Termination::Error,
            _ => return None,
        })
    }

    /// Returns the CSA token for this result. `side_to_move` is the side
    /// whose turn it was when the game ended.
    pub fn to_csa(&self, side_to_move: Color) -> Option<&'static str> {
        let illegal = |c: Color| match c {
            Color::Black => "%+ILLEGAL_ACTION",
            Color::White => "%-ILLEGAL_ACTION",
        };

        Some(match self {
            Termination::Resign => "%TORYO",
            Termination::Abort => "%CHUDAN",
            Termination::Repetition => "%SENNICHITE",
            Termination::Timeout => "%TIME_UP",
            Termination::IllegalWin => illegal(side_to_move.flip()),
            Termination::IllegalLoss => illegal(side_to_move),
            Termination::Jishogi => "%JISHOGI",
            Termination::EnteringKing => "%KACHI",
            Termination::Draw => "%HIKIWAKE",
            Termination::Matta => "%MATTA",
            Termination::Checkmate => "%TSUMI",
            Termination::NoMate => "%FUZUMI",
            Termination::Error => "%ERROR",
            Termination::Superior | Termination::Inferior | Termination::Other(_) => return None,
        })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.japanese())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        for (i, (t, name)) in NAMES.iter().enumerate() {
            assert_eq!(*name, t.japanese(), "failed at #{i}");
            assert_eq!(*t, Termination::from_label(name), "failed at #{i}");
        }

        assert_eq!(
            Termination::Other("封じ手".to_string()),
            Termination::from_label("封じ手")
        );
        assert_eq!("封じ手", Termination::from_label("封じ手").to_string());
    }

    #[test]
    fn usi_keywords() {
        assert_eq!(Some(Termination::Resign), Termination::from_usi("resign"));
        assert_eq!(Some(Termination::Repetition), Termination::from_usi("rep_draw"));
        assert_eq!(Some(Termination::EnteringKing), Termination::from_usi("win"));
        assert_eq!(None, Termination::from_usi("7g7f"));
    }

    #[test]
    fn csa_tokens() {
        assert_eq!(
            Some(Termination::IllegalLoss),
            Termination::from_csa("%+ILLEGAL_ACTION", Color::Black)
        );
        assert_eq!(
            Some(Termination::IllegalWin),
            Termination::from_csa("%+ILLEGAL_ACTION", Color::White)
        );
        assert_eq!(None, Termination::from_csa("%BOGUS", Color::Black));

        for c in Color::iter() {
            assert_eq!(
                Some(Termination::IllegalLoss),
                Termination::from_csa("%ILLEGAL_MOVE", c),
                "{c:?}"
            );
        }

        for c in Color::iter() {
            for (t, _) in NAMES.iter() {
                if let Some(token) = t.to_csa(c) {
                    assert_eq!(Some(t.clone()), Termination::from_csa(token, c), "{t:?}");
                }
            }
        }
    }
}
