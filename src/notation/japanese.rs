//! Japanese move descriptions and the disambiguation engine.
//!
//! When several pieces of the same kind could reach a square, a Japanese
//! move is qualified by where the moving piece stands relative to the
//! others: 左/右/直 for the horizontal relation, 上/引/寄 for the vertical
//! one. Drops are marked 打 only when a board piece could have made the
//! same move. Promotion is written 成, and a declined promotion 不成.
//!
//! ```
//! use shogi_kifu::notation::japanese::{modifiers, Modifier};
//! use shogi_kifu::square::consts::*;
//! use shogi_kifu::{Move, Position};
//!
//! let pos = Position::startpos();
//! let m = Move::normal(SQ_6I, SQ_5H, false);
//! assert_eq!(vec![Modifier::Left], modifiers(&pos, m));
//! ```

use std::fmt;

use crate::color::Color;
use crate::moves::{Move, Origin};
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;
use crate::tree::{GameTree, StepId};

/// A qualifier appended to a Japanese move description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Left,
    Right,
    Straight,
    Up,
    Down,
    Sideways,
    Drop,
    Promote,
    NoPromote,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Left => "左",
            Modifier::Right => "右",
            Modifier::Straight => "直",
            Modifier::Up => "上",
            Modifier::Down => "引",
            Modifier::Sideways => "寄",
            Modifier::Drop => "打",
            Modifier::Promote => "成",
            Modifier::NoPromote => "不成",
        }
    }

    /// Returns true for the relative-position tokens (左 右 直 上 引 寄).
    pub fn is_positional(self) -> bool {
        !matches!(self, Modifier::Drop | Modifier::Promote | Modifier::NoPromote)
    }

    /// Matches a modifier at the start of `s`, returning it and the bytes consumed.
    pub fn strip(s: &str) -> Option<(Modifier, usize)> {
        const ALL: [Modifier; 9] = [
            Modifier::NoPromote,
            Modifier::Left,
            Modifier::Right,
            Modifier::Straight,
            Modifier::Up,
            Modifier::Down,
            Modifier::Sideways,
            Modifier::Drop,
            Modifier::Promote,
        ];

        ALL.iter()
            .find(|m| s.starts_with(m.as_str()))
            .map(|&m| (m, m.as_str().len()))
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column and row seen from `c`'s seat: column 0 is the mover's left,
/// row 0 the far side.
fn relative(sq: Square, c: Color) -> (i8, i8) {
    match c {
        Color::Black => (sq.col() as i8, sq.row() as i8),
        Color::White => (8 - sq.col() as i8, 8 - sq.row() as i8),
    }
}

fn horizontal(from: Square, to: Square, c: Color) -> Modifier {
    let (fc, _) = relative(from, c);
    let (tc, _) = relative(to, c);
    match fc.cmp(&tc) {
        std::cmp::Ordering::Less => Modifier::Left,
        std::cmp::Ordering::Greater => Modifier::Right,
        std::cmp::Ordering::Equal => Modifier::Straight,
    }
}

fn vertical(from: Square, to: Square, c: Color) -> Modifier {
    let (_, fr) = relative(from, c);
    let (_, tr) = relative(to, c);
    match fr.cmp(&tr) {
        std::cmp::Ordering::Greater => Modifier::Up,
        std::cmp::Ordering::Less => Modifier::Down,
        std::cmp::Ordering::Equal => Modifier::Sideways,
    }
}

/// Returns the modifiers needed to describe `m` unambiguously in `pos`,
/// the position before the move.
pub fn modifiers(pos: &Position, m: Move) -> Vec<Modifier> {
    let (Some(origin), Some(to)) = (m.origin(), m.to()) else {
        return Vec::new();
    };

    let from = match origin {
        Origin::Hand(pt) => {
            let piece = Piece::new(pt, pos.side_to_move());
            return if pos.origins_reaching(to, piece).is_empty() {
                Vec::new()
            } else {
                vec![Modifier::Drop]
            };
        }
        Origin::Square(from) => from,
    };

    let Some(piece) = pos.piece_at(from) else {
        return Vec::new();
    };

    let mut mods = positional(pos, piece, from, to);
    if m.is_promotion() {
        mods.push(Modifier::Promote);
    } else if pos.can_promote(m) {
        mods.push(Modifier::NoPromote);
    }
    mods
}

fn positional(pos: &Position, piece: Piece, from: Square, to: Square) -> Vec<Modifier> {
    let c = piece.color;
    let alternatives: Vec<Square> = pos
        .origins_reaching(to, piece)
        .into_iter()
        .filter(|&sq| sq != from)
        .collect();

    if alternatives.is_empty() {
        return Vec::new();
    }

    debug_assert!(
        !alternatives.iter().any(|&a| horizontal(a, to, c) == horizontal(from, to, c)
            && vertical(a, to, c) == vertical(from, to, c)),
        "two origins share both relations to {to}"
    );

    let v = vertical(from, to, c);
    let same_row: Vec<Square> = alternatives
        .iter()
        .copied()
        .filter(|&a| vertical(a, to, c) == v)
        .collect();
    if same_row.is_empty() {
        return vec![v];
    }

    let h = horizontal(from, to, c);
    if h == Modifier::Straight && piece.piece_type.is_promoted_slider() {
        // A straight slide can start on the same column as a diagonal step;
        // tell them apart by where the other piece stands.
        let (fc, _) = relative(from, c);
        let (ac, _) = relative(same_row[0], c);
        return vec![if fc < ac { Modifier::Left } else { Modifier::Right }];
    }

    if !alternatives.iter().any(|&a| horizontal(a, to, c) == h) {
        return vec![h];
    }

    if h == Modifier::Straight {
        vec![h]
    } else {
        vec![h, v]
    }
}

fn destination(to: Square, prev_to: Option<Square>, same: &str) -> String {
    if prev_to == Some(to) {
        same.to_string()
    } else {
        to.to_japanese()
    }
}

/// Formats a move the way KIF lists it: `７六歩(77)`, `同　歩(33)`, `５五角打`.
///
/// `prev_to` is the destination of the previous move; `same` replaces the
/// destination when they coincide.
pub fn kif_move(pos: &Position, m: Move, prev_to: Option<Square>, same: &str) -> String {
    let (Some(origin), Some(to)) = (m.origin(), m.to()) else {
        return String::new();
    };

    let dest = destination(to, prev_to, same);
    match origin {
        Origin::Hand(pt) => format!("{dest}{}打", pt.japanese()),
        Origin::Square(from) => {
            let name = pos.piece_at(from).map_or("", |pc| pc.piece_type.japanese());
            let promotion = if m.is_promotion() {
                "成"
            } else if pos.can_promote(m) {
                "不成"
            } else {
                ""
            };
            format!("{dest}{name}{promotion}({})", from.to_digits())
        }
    }
}

/// Describes a move with disambiguation modifiers, as in KI2: `５八金左`,
/// `同　角成`.
pub fn describe_move(pos: &Position, m: Move, prev_to: Option<Square>, same: &str) -> String {
    let Some(to) = m.to() else {
        return String::new();
    };
    let Some(piece) = pos.moving_piece(m) else {
        return String::new();
    };

    let mut s = destination(to, prev_to, same);
    s.push_str(piece.piece_type.japanese());
    for modifier in modifiers(pos, m) {
        s.push_str(modifier.as_str());
    }
    s
}

/// Formats a step with the mover's symbol, e.g. `☗２二角成(88)`.
///
/// Terminal steps render as their result, the root as `開始局面`.
pub fn format_step(tree: &GameTree, id: StepId) -> String {
    let step = &tree[id];
    let Some(parent) = step.parent() else {
        return "開始局面".to_string();
    };

    let before = tree[parent].position();
    let mover = before.side_to_move().symbol();
    match (step.mv(), step.termination()) {
        (Some(m), _) => {
            let prev_to = tree[parent].mv().and_then(Move::to);
            format!("{mover}{}", kif_move(before, m, prev_to, "同"))
        }
        (None, Some(t)) => format!("{mover}{t}"),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece_type::PieceType;
    use crate::square::consts::*;

    fn pos(sfen: &str) -> Position {
        Position::from_sfen(sfen).unwrap()
    }

    #[test]
    fn gold_left_from_start() {
        let start = Position::startpos();
        assert_eq!(
            vec![Modifier::Left],
            modifiers(&start, Move::normal(SQ_6I, SQ_5H, false))
        );
        assert_eq!(
            vec![Modifier::Right],
            modifiers(&start, Move::normal(SQ_4I, SQ_5H, false))
        );
        assert!(modifiers(&start, Move::normal(SQ_7G, SQ_7F, false)).is_empty());
        assert!(modifiers(&start, Move::normal(SQ_6I, SQ_7H, false)).is_empty());
    }

    #[test]
    fn disambiguation_cases() {
        let cases = [
            // Vertical relation alone.
            ("4k4/9/9/9/9/9/9/4G4/3G1K3 b - 1", SQ_5H, SQ_5G, vec![]),
            ("4k4/9/9/9/9/9/9/3G5/4G1K2 b - 1", SQ_6H, SQ_5H, vec![Modifier::Sideways]),
            ("4k4/9/9/9/9/9/9/3G5/4G1K2 b - 1", SQ_5I, SQ_5H, vec![Modifier::Up]),
            ("4k4/9/9/9/9/9/4G4/5G3/6K2 b - 1", SQ_5G, SQ_5H, vec![Modifier::Down]),
            // Straight forward versus a diagonal step.
            ("4k4/9/9/9/9/9/9/9/3GG1K2 b - 1", SQ_5I, SQ_5H, vec![Modifier::Straight]),
            // Both relations needed.
            (
                "4k4/9/9/9/9/9/9/3G5/3G1G1K1 b - 1",
                SQ_6I,
                SQ_5H,
                vec![Modifier::Left, Modifier::Up],
            ),
            // Knights.
            ("4k4/9/9/9/9/9/9/9/2N1K1N2 b - 1", SQ_7I, SQ_6G, vec![]),
            ("4k4/9/9/9/9/9/9/9/3NKN3 b - 1", SQ_6I, SQ_5G, vec![Modifier::Left]),
        ];

        for (i, case) in cases.iter().enumerate() {
            let p = pos(case.0);
            assert_eq!(
                case.3,
                modifiers(&p, Move::normal(case.1, case.2, false)),
                "failed at #{i}"
            );
        }
    }

    #[test]
    fn white_is_mirrored() {
        let p = pos("3gkg3/9/9/9/9/9/9/9/4K4 w - 1");
        // From White's seat 6a is on the right.
        assert_eq!(
            vec![Modifier::Right],
            modifiers(&p, Move::normal(SQ_6A, SQ_5B, false))
        );
        assert_eq!(
            vec![Modifier::Left],
            modifiers(&p, Move::normal(SQ_4A, SQ_5B, false))
        );
    }

    #[test]
    fn dragon_tie_break() {
        // Dragons on 5a and 4b can both reach 5c by sliding and stepping back.
        let p = pos("4+R4/5+R3/9/9/9/9/9/9/k3K4 b - 1");
        assert_eq!(
            vec![Modifier::Left],
            modifiers(&p, Move::normal(SQ_5A, SQ_5C, false))
        );
        assert_eq!(
            vec![Modifier::Right],
            modifiers(&p, Move::normal(SQ_4B, SQ_5C, false))
        );
    }

    fn adjacent_origins(pt: PieceType) -> Vec<Square> {
        let p = Position::new();
        let piece = Piece::new(pt, Color::Black);
        Square::iter()
            .filter(|&sq| sq != SQ_5E && p.reaches(piece, sq, SQ_5E))
            .filter(|&sq| sq.col().abs_diff(SQ_5E.col()) <= 1)
            .filter(|&sq| sq.row().abs_diff(SQ_5E.row()) <= 1)
            .collect()
    }

    #[test]
    fn pairs_always_differ() {
        for pt in [
            PieceType::Silver,
            PieceType::Gold,
            PieceType::Horse,
            PieceType::Dragon,
        ] {
            let piece = Piece::new(pt, Color::Black);
            let origins = adjacent_origins(pt);

            for &a in &origins {
                for &b in origins.iter().filter(|&&b| b != a) {
                    let mut p = Position::new();
                    p.set_piece(a, Some(piece));
                    p.set_piece(b, Some(piece));

                    let ma = modifiers(&p, Move::normal(a, SQ_5E, false));
                    let mb = modifiers(&p, Move::normal(b, SQ_5E, false));
                    assert!(!ma.is_empty(), "{pt:?} from {a}");
                    assert_ne!(ma, mb, "{pt:?} from {a} and {b}");
                }
            }
        }
    }

    #[test]
    fn crowded_generals_differ() {
        // Every square a general can reach 5e from is occupied.
        for pt in [PieceType::Silver, PieceType::Gold] {
            let piece = Piece::new(pt, Color::Black);
            let origins = adjacent_origins(pt);
            let mut p = Position::new();
            for &sq in &origins {
                p.set_piece(sq, Some(piece));
            }

            let mut seen: Vec<Vec<Modifier>> = Vec::new();
            for &sq in &origins {
                let mods = modifiers(&p, Move::normal(sq, SQ_5E, false));
                assert!(!mods.is_empty(), "{pt:?} from {sq}");
                assert!(!seen.contains(&mods), "{pt:?} from {sq}: {mods:?}");
                seen.push(mods);
            }
        }
    }

    #[test]
    fn promotion_tokens() {
        let p = pos("4k4/9/9/2S6/9/9/9/9/4K4 b - 1");
        assert_eq!(
            vec![Modifier::Promote],
            modifiers(&p, Move::normal(SQ_7D, SQ_7C, true))
        );
        assert_eq!(
            vec![Modifier::NoPromote],
            modifiers(&p, Move::normal(SQ_7D, SQ_7C, false))
        );
        assert!(modifiers(&p, Move::normal(SQ_7D, SQ_6E, false)).is_empty());
    }

    #[test]
    fn drop_token() {
        let p = pos("4k4/9/9/9/9/9/9/3G5/4K4 b G 1");
        assert_eq!(
            vec![Modifier::Drop],
            modifiers(&p, Move::drop(PieceType::Gold, SQ_6G))
        );
        assert!(modifiers(&p, Move::drop(PieceType::Gold, SQ_1A)).is_empty());
    }

    #[test]
    fn kif_and_ki2_text() {
        let start = Position::startpos();
        assert_eq!(
            "７六歩(77)",
            kif_move(&start, Move::normal(SQ_7G, SQ_7F, false), None, "同　")
        );
        assert_eq!(
            "同　歩(77)",
            kif_move(&start, Move::normal(SQ_7G, SQ_7F, false), Some(SQ_7F), "同　")
        );
        assert_eq!(
            "５八金左",
            describe_move(&start, Move::normal(SQ_6I, SQ_5H, false), None, "同　")
        );

        let p = pos("4k4/9/9/9/9/9/9/9/4K4 b B 1");
        assert_eq!(
            "５五角打",
            kif_move(&p, Move::drop(PieceType::Bishop, SQ_5E), None, "同　")
        );
        assert_eq!(
            "５五角",
            describe_move(&p, Move::drop(PieceType::Bishop, SQ_5E), None, "同　")
        );
    }

    #[test]
    fn format_step_text() {
        let mut tree = GameTree::default();
        let mut cur = tree.root();
        assert_eq!("開始局面", format_step(&tree, cur));

        for token in ["7g7f", "3c3d", "8h2b+"] {
            cur = tree.append_move_usi(cur, token).unwrap();
        }
        assert_eq!("☗２二角成(88)", format_step(&tree, cur));

        let recapture = tree.append_move_usi(cur, "3a2b").unwrap();
        assert_eq!("☖同銀(31)", format_step(&tree, recapture));

        let end = tree.append_move_usi(recapture, "resign").unwrap();
        assert_eq!("☗投了", format_step(&tree, end));
    }
}
