//! CSA game records.
//!
//! ```text
//! V2.2
//! N+Black
//! N-White
//! PI
//! +
//! +7776FU
//! -3334FU
//! %TORYO
//! ```
//!
//! Only the main line is written; CSA has no variations.

use crate::color::Color;
use crate::error::{ParseError, Result};
use crate::game::Game;
use crate::moves::{Move, Origin};
use crate::notation::{sfen, Codec};
use crate::piece::Piece;
use crate::piece_type::PieceType;
use crate::position::Position;
use crate::square::Square;
use crate::termination::Termination;

const VERSION: &str = "V2.2";
const EMPTY_CELL: &str = " * ";

const TOTALS: [(PieceType, u8); 7] = [
    (PieceType::Rook, 2),
    (PieceType::Bishop, 2),
    (PieceType::Gold, 4),
    (PieceType::Silver, 4),
    (PieceType::Knight, 4),
    (PieceType::Lance, 4),
    (PieceType::Pawn, 18),
];

/// The CSA notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Csa;

impl Codec for Csa {
    type Item = Game;

    fn name(&self) -> &'static str {
        "CSA"
    }

    fn format(&self, game: &Game) -> String {
        format(game)
    }

    fn parse(&self, s: &str) -> Result<Game> {
        parse(s)
    }
}

fn format_board(pos: &Position) -> Vec<String> {
    let mut lines = Vec::new();
    for row in 0..9u8 {
        let mut line = format!("P{}", row + 1);
        for col in 0..9u8 {
            match Square::new(col, row).and_then(|sq| pos.piece_at(sq)) {
                Some(pc) => {
                    line.push(pc.color.csa_sign());
                    line.push_str(pc.piece_type.csa());
                }
                None => line.push_str(EMPTY_CELL),
            }
        }
        lines.push(line);
    }

    for c in Color::iter() {
        if pos.hand().is_empty(c) {
            continue;
        }
        let mut line = format!("P{}", c.csa_sign());
        for (pt, n) in pos.hand().iter(c) {
            for _ in 0..n {
                line.push_str("00");
                line.push_str(pt.csa());
            }
        }
        lines.push(line);
    }
    lines
}

fn format_move(pos: &Position, m: Move) -> Option<String> {
    let to = m.to()?;
    let (from, kind) = match m.origin()? {
        Origin::Hand(pt) => ("00".to_string(), pt),
        Origin::Square(from) => {
            let pc = pos.piece_at(from)?;
            let kind = if m.is_promotion() {
                pc.piece_type.promote().unwrap_or(pc.piece_type)
            } else {
                pc.piece_type
            };
            (from.to_digits(), kind)
        }
    };

    Some(format!(
        "{}{}{}{}",
        pos.side_to_move().csa_sign(),
        from,
        to.to_digits(),
        kind.csa()
    ))
}

/// Formats the main line of the game as CSA.
pub fn format(game: &Game) -> String {
    let mut lines = vec![VERSION.to_string()];
    for c in Color::iter() {
        if let Some(name) = game.player(c) {
            lines.push(format!("N{}{}", c.csa_sign(), name));
        }
    }

    let start = game.start_position();
    if sfen::format(start) == sfen::STARTPOS {
        lines.push("PI".to_string());
    } else {
        lines.extend(format_board(start));
    }
    lines.push(start.side_to_move().csa_sign().to_string());

    let tree = &game.tree;
    for id in tree.main_line(game.root()) {
        let step = &tree[id];
        let Some(parent) = step.parent() else {
            continue;
        };
        let before = tree[parent].position();

        match (step.mv(), step.termination()) {
            (Some(m), _) => lines.extend(format_move(before, m)),
            (None, Some(t)) => match t.to_csa(before.side_to_move()) {
                Some(token) => lines.push(token.to_string()),
                None => lines.push(format!("'{t}")),
            },
            (None, None) => {}
        }
    }

    lines.join("\n") + "\n"
}

fn parse_pi(rest: &str) -> Option<Position> {
    let mut pos = Position::startpos();
    let bytes = rest.as_bytes();
    if bytes.len() % 4 != 0 || !rest.is_ascii() {
        return None;
    }

    for chunk in rest.as_bytes().chunks(4) {
        let entry = std::str::from_utf8(chunk).ok()?;
        let sq = Square::from_digits(&entry[..2])?;
        let pt = PieceType::from_csa(&entry[2..])?;
        if pos.piece_at(sq).map(|pc| pc.piece_type) != Some(pt) {
            return None;
        }
        pos.set_piece(sq, None);
    }
    Some(pos)
}

fn parse_row(pos: &mut Position, row: u8, rest: &str) -> Option<()> {
    if !rest.is_ascii() {
        return None;
    }

    let cells = rest.as_bytes().chunks(3).collect::<Vec<_>>();
    if cells.len() != 9 {
        return None;
    }

    for (col, cell) in (0u8..).zip(cells) {
        let cell = std::str::from_utf8(cell).ok()?;
        if cell.trim() == "*" {
            continue;
        }

        let color = sign(cell.as_bytes()[0])?;
        let pt = PieceType::from_csa(cell.get(1..)?)?;
        pos.set_piece(Square::new(col, row)?, Some(Piece::new(pt, color)));
    }
    Some(())
}

/// Reads `P+00HI00KA` style placements. `00AL` hands out every remaining piece.
fn parse_placements(pos: &mut Position, c: Color, rest: &str) -> Option<()> {
    if !rest.is_ascii() || rest.len() % 4 != 0 {
        return None;
    }

    for chunk in rest.as_bytes().chunks(4) {
        let entry = std::str::from_utf8(chunk).ok()?;
        if &entry[2..] == "AL" {
            for (pt, total) in TOTALS {
                let on_board = pos
                    .pieces()
                    .filter(|(_, pc)| pc.piece_type.base() == pt)
                    .count() as u8;
                let held = pos
                    .hand_count(Color::Black, pt)
                    .saturating_add(pos.hand_count(Color::White, pt));
                let spare = total.saturating_sub(on_board.saturating_add(held));
                pos.add_hand_count(c, pt, spare as i16);
            }
            continue;
        }

        let pt = PieceType::from_csa(&entry[2..])?;
        if &entry[..2] == "00" {
            if !pt.is_hand_piece() {
                return None;
            }
            pos.add_hand_count(c, pt, 1);
        } else {
            pos.set_piece(Square::from_digits(&entry[..2])?, Some(Piece::new(pt, c)));
        }
    }
    Some(())
}

fn sign(b: u8) -> Option<Color> {
    match b {
        b'+' => Some(Color::Black),
        b'-' => Some(Color::White),
        _ => None,
    }
}

fn parse_move(pos: &Position, s: &str) -> Option<Move> {
    if s.len() != 7 || !s.is_ascii() {
        return None;
    }

    let to = Square::from_digits(&s[3..5])?;
    let kind = PieceType::from_csa(&s[5..7])?;
    if &s[1..3] == "00" {
        return kind.is_hand_piece().then(|| Move::drop(kind, to));
    }

    let from = Square::from_digits(&s[1..3])?;
    let promote = match pos.piece_at(from) {
        Some(pc) => pc.piece_type != kind && pc.piece_type.promote() == Some(kind),
        None => {
            tracing::warn!(%from, "CSA move from an empty square");
            false
        }
    };
    Some(Move::normal(from, to, promote))
}

/// Parses a CSA record. Comments (`'`), information lines (`$`), time
/// statements (`T10`) and comma-joined statements are accepted.
pub fn parse(s: &str) -> Result<Game> {
    let mut names: [Option<String>; 2] = Default::default();
    let mut setup: Option<Position> = None;
    let mut rows = 0u8;
    let mut game: Option<Game> = None;
    let mut cur = None;

    for (i, raw) in s.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end_matches('\r');
        if line.starts_with('\'') {
            continue;
        }

        for stmt in line.split(',') {
            let stmt = stmt.trim();
            let fail = |reason: &str| ParseError::csa(line_no, format!("{reason}: `{stmt}`"));

            if stmt.is_empty()
                || stmt.starts_with('$')
                || stmt.starts_with('T')
                || stmt.starts_with('V')
            {
                continue;
            }

            if let Some(rest) = stmt.strip_prefix('N') {
                let c = rest.bytes().next().and_then(sign).ok_or_else(|| fail("bad name"))?;
                names[c.index()] = Some(rest[1..].to_string());
                continue;
            }

            if let Some(rest) = stmt.strip_prefix("PI") {
                setup = Some(parse_pi(rest).ok_or_else(|| fail("bad PI line"))?);
                continue;
            }

            if let Some(rest) = stmt.strip_prefix('P') {
                let pos = setup.get_or_insert_with(Position::new);
                let ok = match rest.as_bytes().first() {
                    Some(&d @ b'1'..=b'9') => {
                        let row = d - b'1';
                        rows += 1;
                        parse_row(pos, row, &rest[1..])
                    }
                    Some(&b) => match sign(b) {
                        Some(c) => parse_placements(pos, c, &rest[1..]),
                        None => None,
                    },
                    None => None,
                };
                ok.ok_or_else(|| fail("bad position line"))?;
                continue;
            }

            if stmt == "+" || stmt == "-" {
                let mut pos = setup.take().ok_or_else(|| fail("side to move before position"))?;
                if rows != 0 && rows != 9 {
                    return Err(fail("incomplete board"));
                }
                pos.set_side_to_move(if stmt == "+" { Color::Black } else { Color::White });

                let mut g = Game::new(pos);
                for (c, name) in Color::iter().zip(names.iter()) {
                    if let Some(name) = name {
                        g.set_player(c, name.as_str());
                    }
                }
                cur = Some(g.root());
                game = Some(g);
                continue;
            }

            let (Some(g), Some(id)) = (game.as_mut(), cur) else {
                return Err(fail("unexpected statement"));
            };

            if stmt.starts_with('%') {
                let stm = g.tree[id].position().side_to_move();
                let t = Termination::from_csa(stmt, stm).ok_or_else(|| fail("unknown result"))?;
                cur = Some(g.tree.append_end(id, t).ok_or_else(|| fail("result after result"))?);
                continue;
            }

            if stmt.starts_with(['+', '-']) {
                let pos = g.tree[id].position();
                if sign(stmt.as_bytes()[0]) != Some(pos.side_to_move()) {
                    tracing::warn!(line = line_no, "CSA move sign does not match the side to move");
                }
                let m = parse_move(pos, stmt).ok_or_else(|| fail("bad move"))?;
                cur = Some(g.tree.append_move(id, m).ok_or_else(|| fail("move after result"))?);
                continue;
            }

            return Err(fail("unknown statement"));
        }
    }

    game.ok_or_else(|| ParseError::csa(s.lines().count().max(1), "no position"))
}
