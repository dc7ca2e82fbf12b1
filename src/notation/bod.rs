//! BOD board diagrams.
//!
//! ```text
//! 後手の持駒：なし
//!   ９ ８ ７ ６ ５ ４ ３ ２ １
//! +---------------------------+
//! |v香v桂v銀v金v玉v金v銀v桂v香|一
//! | ・v飛 ・ ・ ・ ・ ・v角 ・|二
//! ...
//! +---------------------------+
//! 先手の持駒：なし
//! 先手番
//! ```

use crate::color::Color;
use crate::error::{ParseError, Result};
use crate::piece::Piece;
use crate::piece_type::PieceType;
use crate::position::Position;
use crate::square::Square;

const COLUMN_HEADER: &str = "  ９ ８ ７ ６ ５ ４ ３ ２ １";
const FRAME: &str = "+---------------------------+";
const RANK_KANJI: [&str; 9] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];
const EMPTY: char = '・';

/// Renders a count as a kanji numeral (`二`, `十`, `十八`).
pub(crate) fn kanji_number(n: u8) -> String {
    let mut s = String::new();
    if n >= 20 {
        s.push_str(RANK_KANJI[(n / 10 - 1) as usize % 9]);
    }
    if n >= 10 {
        s.push('十');
    }
    if n % 10 != 0 {
        s.push_str(RANK_KANJI[(n % 10 - 1) as usize]);
    }
    s
}

/// Reads a kanji numeral below 100. An empty string counts as one.
pub(crate) fn parse_kanji_number(s: &str) -> Option<u8> {
    if s.is_empty() {
        return Some(1);
    }

    let digit = |c: char| RANK_KANJI.iter().position(|k| k.starts_with(c)).map(|i| i as u8 + 1);
    match s.split_once('十') {
        Some((tens, ones)) => {
            let tens = if tens.is_empty() {
                1
            } else {
                let mut cs = tens.chars();
                let d = digit(cs.next()?)?;
                if cs.next().is_some() {
                    return None;
                }
                d
            };
            let ones = match ones.chars().collect::<Vec<_>>().as_slice() {
                [] => 0,
                [c] => digit(*c)?,
                _ => return None,
            };
            Some(tens * 10 + ones)
        }
        None => {
            let mut cs = s.chars();
            let d = digit(cs.next()?)?;
            if cs.next().is_some() {
                return None;
            }
            Some(d)
        }
    }
}

fn format_hand(pos: &Position, c: Color) -> String {
    let label = match c {
        Color::Black => "先手の持駒：",
        Color::White => "後手の持駒：",
    };

    if pos.hand().is_empty(c) {
        return format!("{label}なし");
    }

    let mut s = label.to_string();
    for (pt, n) in pos.hand().iter(c) {
        s.push_str(pt.japanese());
        if n > 1 {
            s.push_str(&kanji_number(n));
        }
        s.push('　');
    }
    s
}

/// Renders the position as a BOD diagram. The move number is written as
/// `手数＝N` (moves played) when the position is past the first move.
pub fn format(pos: &Position) -> String {
    let mut lines = vec![
        format_hand(pos, Color::White),
        COLUMN_HEADER.to_string(),
        FRAME.to_string(),
    ];

    for row in 0..9u8 {
        let mut line = String::from("|");
        for col in 0..9u8 {
            match Square::new(col, row).and_then(|sq| pos.piece_at(sq)) {
                Some(pc) => {
                    line.push(if pc.color == Color::White { 'v' } else { ' ' });
                    line.push(pc.piece_type.glyph());
                }
                None => {
                    line.push(' ');
                    line.push(EMPTY);
                }
            }
        }
        line.push('|');
        line.push_str(RANK_KANJI[row as usize]);
        lines.push(line);
    }

    lines.push(FRAME.to_string());
    lines.push(format_hand(pos, Color::Black));
    if pos.ply() > 1 {
        lines.push(format!("手数＝{}", pos.ply() - 1));
    }
    lines.push(format!("{}番", pos.side_to_move().japanese()));

    lines.join("\n") + "\n"
}

fn parse_hand(pos: &mut Position, c: Color, s: &str) -> Option<()> {
    let s = s.trim();
    if s == "なし" || s.is_empty() {
        return Some(());
    }

    for entry in s.split(['　', ' ']).filter(|e| !e.is_empty()) {
        let (pt, len) = PieceType::strip_japanese(entry)?;
        if !pt.is_hand_piece() {
            return None;
        }
        pos.set_hand_count(c, pt, parse_kanji_number(&entry[len..])?);
    }
    Some(())
}

fn parse_row(pos: &mut Position, row: u8, line: &str) -> Option<()> {
    let body = line.strip_prefix('|')?;
    let body = &body[..body.find('|')?];

    let mut chars = body.chars();
    for col in 0..9u8 {
        let color = match chars.next()? {
            'v' | 'V' => Color::White,
            ' ' | '^' => Color::Black,
            _ => return None,
        };
        let glyph = chars.next()?;
        if glyph == EMPTY {
            continue;
        }

        let mut buf = [0u8; 4];
        let (pt, _) = PieceType::strip_japanese(glyph.encode_utf8(&mut buf))?;
        pos.set_piece(Square::new(col, row)?, Some(Piece::new(pt, color)));
    }

    if chars.next().is_some() {
        return None;
    }
    Some(())
}

/// Parses a BOD diagram. Lines outside the diagram are ignored, so a diagram
/// embedded in a KIF header parses as well.
pub fn parse(s: &str) -> Result<Position> {
    let mut pos = Position::new();
    let mut rows = 0u8;

    for line in s.lines() {
        let line = line.trim_end_matches('\r');
        let fail = || ParseError::Bod(line.to_string());

        if let Some(rest) = line
            .strip_prefix("後手の持駒：")
            .or_else(|| line.strip_prefix("上手の持駒："))
        {
            parse_hand(&mut pos, Color::White, rest).ok_or_else(fail)?;
        } else if let Some(rest) = line
            .strip_prefix("先手の持駒：")
            .or_else(|| line.strip_prefix("下手の持駒："))
        {
            parse_hand(&mut pos, Color::Black, rest).ok_or_else(fail)?;
        } else if line.starts_with('|') {
            if rows >= 9 {
                return Err(fail());
            }
            parse_row(&mut pos, rows, line).ok_or_else(fail)?;
            rows += 1;
        } else if let Some(rest) = line.strip_prefix("手数＝") {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            let played: u32 = digits.parse().map_err(|_| fail())?;
            pos.set_ply(played.saturating_add(1));
        } else if line.starts_with("先手番") || line.starts_with("下手番") {
            pos.set_side_to_move(Color::Black);
        } else if line.starts_with("後手番") || line.starts_with("上手番") {
            pos.set_side_to_move(Color::White);
        }
    }

    if rows != 9 {
        tracing::debug!(rows, "BOD diagram is incomplete");
        return Err(ParseError::Bod(format!("expected 9 board rows, found {rows}")));
    }

    Ok(pos)
}

/// Returns true if `s` looks like it contains a BOD diagram.
pub fn is_bod(s: &str) -> bool {
    s.lines().any(|l| l.starts_with(FRAME))
}
