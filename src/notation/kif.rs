//! KIF game records.
//!
//! ```text
//! 手合割：平手
//! 先手：先手の人
//! 後手：後手の人
//! 手数----指手---------消費時間--
//!    1 ７六歩(77)
//!    2 ３四歩(33)
//!    3 投了
//! まで2手で後手の勝ち
//!
//! 変化：2手
//!    2 ８四歩(83)
//! ```
//!
//! Variations follow the main line in depth-first order, each introduced by
//! a `変化：N手` line naming the move number where it branches off.

use crate::color::Color;
use crate::error::{ParseError, Result};
use crate::game::Game;
use crate::handicap::Handicap;
use crate::moves::Move;
use crate::notation::japanese::kif_move;
use crate::notation::{bod, Codec};
use crate::piece_type::PieceType;
use crate::position::Position;
use crate::square::Square;
use crate::termination::Termination;
use crate::tree::{GameTree, StepId};

pub(crate) const MOVES_HEADER: &str = "手数----指手---------消費時間--";
const SAME: &str = "同　";

/// Output settings for [`Kif`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KifOptions {
    /// Write the handicap, diagram and player lines.
    pub header: bool,
    /// Write the `まで…` line after a terminated main line.
    pub summary: bool,
}

impl Default for KifOptions {
    fn default() -> KifOptions {
        KifOptions {
            header: true,
            summary: true,
        }
    }
}

/// The KIF notation.
#[derive(Debug, Clone, Default)]
pub struct Kif {
    pub options: KifOptions,
}

impl Codec for Kif {
    type Item = Game;

    fn name(&self) -> &'static str {
        "KIF"
    }

    fn format(&self, game: &Game) -> String {
        format(game, &self.options)
    }

    fn parse(&self, s: &str) -> Result<Game> {
        parse(s)
    }
}

/// Player labels: 先手/後手, or 下手/上手 in handicap games.
pub(crate) fn player_label(game: &Game, c: Color) -> &'static str {
    let handicapped = matches!(game.handicap, Some(h) if h != Handicap::Even);
    match (handicapped, c) {
        (false, Color::Black) => "先手",
        (false, Color::White) => "後手",
        (true, Color::Black) => "下手",
        (true, Color::White) => "上手",
    }
}

/// Header lines shared with KI2.
pub(crate) fn header(game: &Game) -> Vec<String> {
    let mut lines = Vec::new();
    match game.handicap {
        Some(h) => lines.push(format!("手合割：{}", h.japanese())),
        None => lines.extend(
            bod::format(game.start_position())
                .lines()
                .map(str::to_string),
        ),
    }

    for c in Color::iter() {
        if let Some(name) = game.player(c) {
            lines.push(format!("{}：{}", player_label(game, c), name));
        }
    }
    lines
}

/// Returns the `まで…` line closing a line of play ending at `end`.
pub(crate) fn summary(game: &Game, end: StepId) -> Option<String> {
    let tree = &game.tree;
    let t = tree[end].termination()?;
    let moves = tree.depth(end) - 1;
    let mover = tree[end].position().side_to_move();
    let loser = player_label(game, mover);
    let winner = player_label(game, mover.flip());

    Some(match t {
        Termination::Resign | Termination::Checkmate => {
            format!("まで{moves}手で{winner}の勝ち")
        }
        Termination::Timeout => format!("まで{moves}手で時間切れにより{winner}の勝ち"),
        Termination::IllegalLoss => format!("まで{moves}手で{loser}の反則負け"),
        Termination::IllegalWin => format!("まで{moves}手で{loser}の反則勝ち"),
        Termination::EnteringKing => format!("まで{moves}手で{loser}の入玉勝ち"),
        t => format!("まで{moves}手で{t}"),
    })
}

/// Formats the game as KIF, main line first, then variations.
pub fn format(game: &Game, options: &KifOptions) -> String {
    let mut lines = Vec::new();
    if options.header {
        lines.extend(header(game));
    }
    lines.push(MOVES_HEADER.to_string());

    let tree = &game.tree;
    let root = tree.root();
    write_line(tree, root, &mut lines);

    let end = game.main_line_end();
    if options.summary {
        lines.extend(summary(game, end));
    }

    write_variations(tree, root, &mut lines);

    lines.join("\n") + "\n"
}

fn move_line(tree: &GameTree, id: StepId) -> String {
    let step = &tree[id];
    let number = tree.depth(id);
    let Some(parent) = step.parent() else {
        return String::new();
    };

    let text = match (step.mv(), step.termination()) {
        (Some(m), _) => {
            let prev_to = tree[parent].mv().and_then(Move::to);
            kif_move(tree[parent].position(), m, prev_to, SAME)
        }
        (None, Some(t)) => t.to_string(),
        (None, None) => String::new(),
    };
    format!("{number:>4} {text}")
}

/// Writes the first-child line starting below `id`.
fn write_line(tree: &GameTree, id: StepId, lines: &mut Vec<String>) {
    for step in tree.main_line(id) {
        lines.push(move_line(tree, step));
    }
}

/// Writes every later sibling along the tree below `id`, deepest branch first.
fn write_variations(tree: &GameTree, id: StepId, lines: &mut Vec<String>) {
    let mut line = vec![id];
    line.extend(tree.main_line(id));

    for &step in line.iter().rev() {
        for &sibling in tree.children(step).iter().skip(1) {
            lines.push(String::new());
            lines.push(format!("変化：{}手", tree.depth(sibling)));
            lines.push(move_line(tree, sibling));
            write_line(tree, sibling, lines);
            write_variations(tree, sibling, lines);
        }
    }
}

/// Parses a KIF record. Only the move text of each numbered line is read;
/// time fields, `+` branch flags and comments are ignored.
pub fn parse(s: &str) -> Result<Game> {
    let lines: Vec<&str> = s.lines().map(|l| l.trim_end_matches('\r')).collect();
    let body_start = lines.iter().position(|l| l.starts_with("手数----"));

    let head = &lines[..body_start.unwrap_or(0)];
    let mut game = parse_header(head)?;

    let first_move = body_start.map_or(0, |i| i + 1);
    let mut seen = false;
    let mut by_ply: Vec<StepId> = vec![game.root()];

    for (i, line) in lines.iter().enumerate().skip(first_move) {
        let line_no = i + 1;
        let trimmed = line.trim();

        if trimmed.is_empty()
            || trimmed.starts_with('*')
            || trimmed.starts_with('#')
            || trimmed.starts_with('&')
            || trimmed.starts_with("まで")
        {
            continue;
        }

        // The marker only validates; the next move number picks the branch point.
        if let Some(rest) = trimmed.strip_prefix("変化：") {
            let n: usize = rest
                .trim_end_matches('手')
                .trim()
                .parse()
                .map_err(|_| ParseError::kif(line_no, "bad variation marker"))?;
            if n == 0 || n > by_ply.len() {
                return Err(ParseError::kif(line_no, "variation has no parent"));
            }
            continue;
        }

        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if digits_end == 0 {
            if body_start.is_none() {
                tracing::debug!(line = line_no, "not a KIF move line");
                return Err(ParseError::kif(line_no, "expected a numbered move"));
            }
            continue;
        }

        let number: usize = trimmed[..digits_end]
            .parse()
            .map_err(|_| ParseError::kif(line_no, "bad move number"))?;
        if number == 0 || number > by_ply.len() {
            return Err(ParseError::kif(line_no, "move number out of sequence"));
        }

        let parent = by_ply[number - 1];
        let text = trimmed[digits_end..].trim_start();
        let step = append(&mut game.tree, parent, text)
            .ok_or_else(|| ParseError::kif(line_no, format!("cannot read move `{text}`")))?;

        by_ply.truncate(number);
        by_ply.push(step);
        seen = true;
    }

    if body_start.is_none() && !seen {
        return Err(ParseError::kif(1, "not a KIF record"));
    }

    Ok(game)
}

fn parse_header(lines: &[&str]) -> Result<Game> {
    let mut handicap = None;
    let mut players: [Option<String>; 2] = Default::default();
    let mut has_diagram = false;

    for (i, line) in lines.iter().enumerate() {
        if let Some(name) = line.strip_prefix("手合割：") {
            handicap = Some(
                Handicap::from_japanese(name.trim())
                    .ok_or_else(|| ParseError::kif(i + 1, format!("unknown handicap `{name}`")))?,
            );
        } else if let Some(name) = line
            .strip_prefix("先手：")
            .or_else(|| line.strip_prefix("下手："))
        {
            players[0] = Some(name.trim().to_string());
        } else if let Some(name) = line
            .strip_prefix("後手：")
            .or_else(|| line.strip_prefix("上手："))
        {
            players[1] = Some(name.trim().to_string());
        } else if line.starts_with('|') {
            has_diagram = true;
        }
    }

    let mut game = if has_diagram {
        Game::new(bod::parse(&lines.join("\n"))?)
    } else {
        Game::from_handicap(handicap.unwrap_or(Handicap::Even))
    };

    for (c, name) in Color::iter().zip(players) {
        if let Some(name) = name {
            game.set_player(c, name);
        }
    }
    Ok(game)
}

/// Appends the move or result written in `text` below `parent`.
fn append(tree: &mut GameTree, parent: StepId, text: &str) -> Option<StepId> {
    match read_move(tree, parent, text) {
        Some(m) => tree.append_move(parent, m),
        None => {
            let label = text.split_whitespace().next()?;
            // An unreadable move is an error, not a result label.
            let looks_like_move =
                |c: char| c == '同' || c.is_ascii_digit() || ('１'..='９').contains(&c);
            if label.starts_with(looks_like_move) {
                return None;
            }
            tree.append_end(parent, Termination::from_label(label))
        }
    }
}

/// Reads `７六歩(77)`, `同　歩(77)`, `５五角打` or `２二角成(88)`.
fn read_move(tree: &GameTree, parent: StepId, text: &str) -> Option<Move> {
    let pos: &Position = tree[parent].position();

    let (to, rest) = if let Some(rest) = text.strip_prefix('同') {
        (tree[parent].mv()?.to()?, rest.trim_start_matches(['　', ' ']))
    } else {
        let split = text.char_indices().nth(2).map_or(text.len(), |(i, _)| i);
        (Square::from_japanese(&text[..split])?, &text[split..])
    };

    let (piece_type, len) = PieceType::strip_japanese(rest)?;
    let mut rest = &rest[len..];

    let mut promote = false;
    let mut drop = false;
    if let Some(r) = rest.strip_prefix("不成") {
        rest = r;
    } else if let Some(r) = rest.strip_prefix('成') {
        promote = true;
        rest = r;
    } else if let Some(r) = rest.strip_prefix('打') {
        drop = true;
        rest = r;
    }

    if drop {
        if !piece_type.is_hand_piece() || pos.hand_count(pos.side_to_move(), piece_type) == 0 {
            tracing::warn!(%to, "drop of a piece not in hand");
        }
        return Some(Move::drop(piece_type, to));
    }

    let origin = rest.strip_prefix('(')?;
    let from = Square::from_digits(origin.get(..2)?)?;
    Some(Move::normal(from, to, promote))
}
