//! KI2 game records (export only).
//!
//! Moves are written inline with side marks and disambiguation modifiers:
//!
//! ```text
//! 手合割：平手
//! ▲７六歩 △３四歩 ▲２二角成 △同　銀
//! まで4手で後手の勝ち
//! ```

use itertools::Itertools;

use crate::error::{ParseError, Result};
use crate::game::Game;
use crate::moves::Move;
use crate::notation::japanese::describe_move;
use crate::notation::kif::{header, summary};
use crate::notation::Codec;
use crate::tree::{GameTree, StepId};

const SAME: &str = "同　";

/// Output settings for [`Ki2`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ki2Options {
    /// Moves written on one line before wrapping.
    pub moves_per_line: usize,
    /// Marks for Black and White.
    pub symbols: [&'static str; 2],
    pub header: bool,
}

impl Default for Ki2Options {
    fn default() -> Ki2Options {
        Ki2Options {
            moves_per_line: 6,
            symbols: ["▲", "△"],
            header: true,
        }
    }
}

/// The KI2 notation.
#[derive(Debug, Clone, Default)]
pub struct Ki2 {
    pub options: Ki2Options,
}

impl Codec for Ki2 {
    type Item = Game;

    fn name(&self) -> &'static str {
        "KI2"
    }

    fn format(&self, game: &Game) -> String {
        format(game, &self.options)
    }

    fn parse(&self, _s: &str) -> Result<Game> {
        Err(ParseError::Unsupported("KI2"))
    }
}

fn describe(tree: &GameTree, id: StepId, options: &Ki2Options) -> Option<String> {
    let step = &tree[id];
    let m = step.mv()?;
    let parent = step.parent()?;
    let before = tree[parent].position();
    let prev_to = tree[parent].mv().and_then(Move::to);

    Some(format!(
        "{}{}",
        options.symbols[before.side_to_move().index()],
        describe_move(before, m, prev_to, SAME)
    ))
}

/// Writes `steps` wrapped at `moves_per_line`, then the closing line if the
/// last step is terminal.
fn write_line(game: &Game, steps: &[StepId], options: &Ki2Options, lines: &mut Vec<String>) {
    let tree = &game.tree;
    let moves: Vec<String> = steps
        .iter()
        .filter_map(|&id| describe(tree, id, options))
        .collect();

    for chunk in &moves.into_iter().chunks(options.moves_per_line.max(1)) {
        lines.push(chunk.collect::<Vec<_>>().join(" "));
    }

    if let Some(&last) = steps.last() {
        lines.extend(summary(game, last));
    }
}

fn write_variations(game: &Game, id: StepId, options: &Ki2Options, lines: &mut Vec<String>) {
    let tree = &game.tree;
    let mut line = vec![id];
    line.extend(tree.main_line(id));

    for &step in line.iter().rev() {
        for &sibling in tree.children(step).iter().skip(1) {
            lines.push(String::new());
            lines.push(format!("変化：{}手", tree.depth(sibling)));

            let mut steps = vec![sibling];
            steps.extend(tree.main_line(sibling));
            write_line(game, &steps, options, lines);
            write_variations(game, sibling, options, lines);
        }
    }
}

/// Formats the game as KI2.
pub fn format(game: &Game, options: &Ki2Options) -> String {
    let mut lines = Vec::new();
    if options.header {
        lines.extend(header(game));
    }

    let root = game.root();
    write_line(game, &game.tree.main_line(root), options, &mut lines);
    write_variations(game, root, options, &mut lines);

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::usi;

    #[test]
    fn main_line() {
        let game = usi::parse_game("startpos moves 7g7f 3c3d 8h2b+ 3a2b resign").unwrap();
        assert_eq!(
            "手合割：平手\n▲７六歩 △３四歩 ▲２二角成 △同　銀\nまで4手で後手の勝ち\n",
            format(&game, &Ki2Options::default())
        );
    }

    #[test]
    fn modifiers_and_wrapping() {
        let game = usi::parse_game("startpos moves 6i5h 4a5b 4i4h").unwrap();
        let options = Ki2Options {
            moves_per_line: 2,
            symbols: ["☗", "☖"],
            header: false,
        };
        assert_eq!(
            "☗５八金左 ☖５二金左\n☗４八金上\n",
            format(&game, &options)
        );
    }

    #[test]
    fn variations() {
        let mut game = usi::parse_game("startpos moves 7g7f 3c3d").unwrap();
        let first = game.tree.children(game.root())[0];
        game.tree.append_move_usi(first, "8c8d").unwrap();

        let text = format(&game, &Ki2Options::default());
        assert!(text.ends_with("▲７六歩 △３四歩\n\n変化：2手\n△８四歩\n"));
    }

    #[test]
    fn parse_is_unsupported() {
        assert_eq!(
            Err(ParseError::Unsupported("KI2")),
            Ki2::default().parse("▲７六歩")
        );
    }
}
