//! Messages exchanged with a USI engine.
//!
//! The engine process itself lives outside this crate. This module formats
//! the commands sent to it and decodes what it answers, most importantly
//! the `info` search reports:
//!
//! ```
//! use shogi_kifu::engine::{format_score, Info, Score};
//! use shogi_kifu::Color;
//!
//! let info = Info::from_line("info depth 12 score cp -150 pv 3c3d").unwrap();
//! assert_eq!(Some(Score::Cp(-150)), info.score);
//! assert_eq!("☖150", format_score(Score::Cp(-150), Color::Black));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::color::Color;
use crate::error::{ParseError, Result};
use crate::moves::Move;
use crate::notation::japanese::describe_move;
use crate::notation::usi;
use crate::position::Position;
use crate::termination::Termination;
use crate::tree::{GameTree, StepId};

/// Evaluations at or beyond this magnitude denote a decided position
/// rather than a material balance.
pub const SUPERIOR_THRESHOLD: i32 = 28000;

/// Keys of an `info` line and how many value tokens each takes. `None`
/// means the rest of the line.
const INFO_KEYS: [(&str, Option<usize>); 14] = [
    ("depth", Some(1)),
    ("seldepth", Some(1)),
    ("score", Some(2)),
    ("lowerbound", Some(0)),
    ("upperbound", Some(0)),
    ("multipv", Some(1)),
    ("nodes", Some(1)),
    ("nps", Some(1)),
    ("hashfull", Some(1)),
    ("time", Some(1)),
    ("currmove", Some(1)),
    ("currmovenumber", Some(1)),
    ("pv", None),
    ("string", None),
];

/// Keys that are consumed but not reported.
const IGNORED_KEYS: [&str; 3] = ["currmove", "currmovenumber", "string"];

/// Splits an `info` line into its keys and value tokens.
///
/// Returns `None` if the line is not an `info` line. Unknown tokens are
/// skipped.
pub fn parse_info(line: &str) -> Option<BTreeMap<&'static str, Vec<&str>>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.first() != Some(&"info") {
        return None;
    }

    let mut map = BTreeMap::new();
    let mut i = 1;
    while i < parts.len() {
        let Some(&(key, arity)) = INFO_KEYS.iter().find(|(k, _)| *k == parts[i]) else {
            tracing::trace!(token = parts[i], "skipping unknown info token");
            i += 1;
            continue;
        };

        let end = match arity {
            Some(n) => (i + 1 + n).min(parts.len()),
            None => parts.len(),
        };
        if !IGNORED_KEYS.contains(&key) {
            map.insert(key, parts[i + 1..end].to_vec());
        }
        i = end;
    }
    Some(map)
}

/// An evaluation from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawn-like evaluation.
    Cp(i32),
    /// Mate in the given number of plies; negative when being mated.
    Mate(i32),
    /// Mate of unknown length (`mate +` / `mate -`).
    MateUnknown { winning: bool },
}

impl Score {
    fn parse(kind: &str, value: &str) -> Option<Score> {
        match (kind, value) {
            ("cp", v) => v.parse().ok().map(Score::Cp),
            ("mate", "+") => Some(Score::MateUnknown { winning: true }),
            ("mate", "-") => Some(Score::MateUnknown { winning: false }),
            ("mate", v) => v.parse().ok().map(Score::Mate),
            _ => None,
        }
    }
}

/// Which side of the true value a score is bounded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// A decoded `info` report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
    pub score: Option<Score>,
    pub bound: Option<Bound>,
    pub multipv: Option<u32>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    pub hashfull: Option<u32>,
    pub time: Option<u64>,
    /// Principal variation as USI move tokens.
    pub pv: Vec<String>,
}

impl Info {
    /// Decodes an `info` line. Malformed numbers are an error rather than
    /// silently zero.
    pub fn from_line(line: &str) -> Result<Info> {
        let err = || ParseError::Usi(line.trim().to_string());
        let map = parse_info(line).ok_or_else(err)?;

        fn number<T: std::str::FromStr>(
            map: &BTreeMap<&'static str, Vec<&str>>,
            key: &str,
        ) -> std::result::Result<Option<T>, ()> {
            match map.get(key).and_then(|v| v.first()) {
                Some(v) => v.parse().map(Some).map_err(|_| ()),
                None => Ok(None),
            }
        }

        let score = match map.get("score").map(Vec::as_slice) {
            Some([kind, value]) => Some(Score::parse(kind, value).ok_or_else(err)?),
            Some(_) => return Err(err()),
            None => None,
        };

        let bound = if map.contains_key("lowerbound") {
            Some(Bound::Lower)
        } else if map.contains_key("upperbound") {
            Some(Bound::Upper)
        } else {
            None
        };

        Ok(Info {
            depth: number(&map, "depth").map_err(|_| err())?,
            seldepth: number(&map, "seldepth").map_err(|_| err())?,
            score,
            bound,
            multipv: number(&map, "multipv").map_err(|_| err())?,
            nodes: number(&map, "nodes").map_err(|_| err())?,
            nps: number(&map, "nps").map_err(|_| err())?,
            hashfull: number(&map, "hashfull").map_err(|_| err())?,
            time: number(&map, "time").map_err(|_| err())?,
            pv: map
                .get("pv")
                .map(|v| v.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default(),
        })
    }
}

/// Formats a score reported while `side` is to move.
///
/// The leading mark names the side the score favours: `☗123`, `☖5手詰`.
/// Evaluations past [`SUPERIOR_THRESHOLD`] read `優等局面`/`劣等局面` for the
/// side to move.
pub fn format_score(score: Score, side: Color) -> String {
    let favoured = |positive: bool| (if positive { side } else { side.flip() }).symbol();

    match score {
        Score::Cp(0) => "0".to_string(),
        Score::Cp(cp) if cp >= SUPERIOR_THRESHOLD => format!("{}{}", side.symbol(), Termination::Superior),
        Score::Cp(cp) if cp <= -SUPERIOR_THRESHOLD => format!("{}{}", side.symbol(), Termination::Inferior),
        Score::Cp(cp) => format!("{}{}", favoured(cp > 0), cp.unsigned_abs()),
        Score::Mate(n) => format!("{}{}手詰", favoured(n > 0), n.unsigned_abs()),
        Score::MateUnknown { winning } => format!("{}詰み", favoured(winning)),
    }
}

/// Renders a principal variation from `position` as Japanese moves,
/// e.g. `☗２二角成 ☖同銀`.
///
/// Tokens are replayed on a scratch tree. Replay stops once a token can no
/// longer be appended, i.e. after a result.
pub fn format_pv<S: AsRef<str>>(position: &Position, tokens: &[S]) -> Vec<String> {
    let mut tree = GameTree::new(position.clone());
    let mut cur = tree.root();
    let mut out = Vec::new();

    for token in tokens {
        let token = token.as_ref();
        let Some(next) = tree.append_move_usi(cur, token) else {
            tracing::warn!(token, "PV replay stopped");
            break;
        };
        out.push(describe_pv_step(&tree, next));
        cur = next;
    }
    out
}

fn describe_pv_step(tree: &GameTree, id: StepId) -> String {
    let step = &tree[id];
    let Some(parent) = step.parent() else {
        return String::new();
    };

    let before = tree[parent].position();
    let mark = before.side_to_move().symbol();
    match (step.mv(), step.termination()) {
        (Some(m), _) => {
            let prev_to = tree[parent].mv().and_then(Move::to);
            format!("{mark}{}", describe_move(before, m, prev_to, "同"))
        }
        (None, Some(t)) => format!("{mark}{t}"),
        (None, None) => String::new(),
    }
}

/// A command line sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    UsiNewGame,
    /// A full `position ...` line.
    Position(String),
    /// Search with a per-move byoyomi in milliseconds.
    Go { byoyomi: u64 },
    /// Ask for the legal moves of the current position.
    Moves,
    /// Ask for the checking moves of the current position.
    Checks,
}

impl Command {
    /// Builds the `position` command reaching `id` in `tree`.
    pub fn position(tree: &GameTree, id: StepId) -> Command {
        Command::Position(usi::format_position(tree, id))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::UsiNewGame => f.write_str("usinewgame"),
            Command::Position(s) => f.write_str(s),
            Command::Go { byoyomi } => write!(f, "go btime 0 wtime 0 byoyomi {byoyomi}"),
            Command::Moves => f.write_str("moves"),
            Command::Checks => f.write_str("checks"),
        }
    }
}

/// A line received from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    BestMove(Move),
    /// `bestmove resign` and other result keywords.
    BestEnd(Termination),
    Info(Info),
    /// A plain list of moves, answering [`Command::Moves`] or
    /// [`Command::Checks`].
    Moves(Vec<Move>),
}

impl Response {
    pub fn parse(line: &str) -> Result<Response> {
        let line = line.trim();
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("bestmove") => {
                let token = tokens.next().ok_or_else(|| ParseError::Usi(line.to_string()))?;
                if let Some(m) = Move::from_usi(token) {
                    Ok(Response::BestMove(m))
                } else if let Some(t) = Termination::from_usi(token) {
                    Ok(Response::BestEnd(t))
                } else {
                    Err(ParseError::Move(token.to_string()))
                }
            }
            Some("info") => Info::from_line(line).map(Response::Info),
            _ => usi::parse_moves(line).map(Response::Moves),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::sfen;
    use assert_matches::assert_matches;

    #[test]
    fn info_keys() {
        let map = parse_info(
            "info depth 10 seldepth 14 score cp 35 upperbound multipv 1 nodes 1000 nps 5000 hashfull 3 time 200 currmove 7g7f string hello world",
        )
        .unwrap();
        assert_eq!(Some(&vec!["10"]), map.get("depth"));
        assert_eq!(Some(&vec!["cp", "35"]), map.get("score"));
        assert_eq!(Some(&vec![]), map.get("upperbound"));
        assert!(!map.contains_key("currmove"));
        assert!(!map.contains_key("string"));
        assert!(!map.contains_key("pv"));

        assert!(parse_info("bestmove 7g7f").is_none());
    }

    #[test]
    fn info_report() {
        let info = Info::from_line("info depth 8 score mate -3 lowerbound nodes 42 pv 7g7f 3c3d").unwrap();
        assert_eq!(
            Info {
                depth: Some(8),
                score: Some(Score::Mate(-3)),
                bound: Some(Bound::Lower),
                nodes: Some(42),
                pv: vec!["7g7f".to_string(), "3c3d".to_string()],
                ..Info::default()
            },
            info
        );

        let info = Info::from_line("info score mate +").unwrap();
        assert_eq!(Some(Score::MateUnknown { winning: true }), info.score);

        assert_matches!(Info::from_line("info depth x"), Err(ParseError::Usi(_)));
        assert_matches!(Info::from_line("info score cp"), Err(ParseError::Usi(_)));
    }

    #[test]
    fn scores() {
        let cases = [
            (Score::Cp(0), Color::Black, "0"),
            (Score::Cp(123), Color::Black, "☗123"),
            (Score::Cp(-123), Color::Black, "☖123"),
            (Score::Cp(123), Color::White, "☖123"),
            (Score::Mate(5), Color::Black, "☗5手詰"),
            (Score::Mate(-2), Color::White, "☗2手詰"),
            (Score::Cp(30000), Color::Black, "☗優等局面"),
            (Score::Cp(-28000), Color::White, "☖劣等局面"),
            (Score::MateUnknown { winning: false }, Color::Black, "☖詰み"),
        ];

        for (i, case) in cases.iter().enumerate() {
            assert_eq!(case.2, format_score(case.0, case.1), "failed at #{i}");
        }
    }

    #[test]
    fn principal_variation() {
        let pos = sfen::parse("lnsgkgsnl/1r5b1/pppppp1pp/6p2/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL b - 3").unwrap();
        assert_eq!(
            vec!["☗２二角成", "☖同銀", "☗４五角"],
            format_pv(&pos, &["8h2b+", "3a2b", "B*4e"])
        );
        assert_eq!(
            vec!["☗５八金左", "☖投了"],
            format_pv(&Position::startpos(), &["6i5h", "resign", "7g7f"])
        );
    }

    #[test]
    fn commands() {
        let tree = GameTree::new(Position::startpos());
        assert_eq!("position startpos", Command::position(&tree, tree.root()).to_string());
        assert_eq!("usinewgame", Command::UsiNewGame.to_string());
        assert_eq!("go btime 0 wtime 0 byoyomi 1000", Command::Go { byoyomi: 1000 }.to_string());
        assert_eq!("moves", Command::Moves.to_string());
        assert_eq!("checks", Command::Checks.to_string());
    }

    #[test]
    fn responses() {
        assert_eq!(
            Response::BestMove(Move::from_usi("7g7f").unwrap()),
            Response::parse("bestmove 7g7f ponder 3c3d").unwrap()
        );
        assert_eq!(
            Response::BestEnd(Termination::Resign),
            Response::parse("bestmove resign").unwrap()
        );
        assert_matches!(Response::parse("info depth 3"), Ok(Response::Info(_)));
        assert_matches!(Response::parse("7g7f 2g2f"), Ok(Response::Moves(ref v)) if v.len() == 2);
        assert_eq!(Response::Moves(vec![]), Response::parse("").unwrap());
        assert!(Response::parse("bestmove").is_err());
        assert!(Response::parse("readyok").is_err());
    }
}
