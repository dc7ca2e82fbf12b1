use crate::color::Color;
use crate::handicap::Handicap;
use crate::position::Position;
use crate::tree::{GameTree, StepId};

/// A game record: the move tree plus descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub tree: GameTree,
    /// Show the board from White's side.
    pub flipped: bool,
    pub handicap: Option<Handicap>,
    players: [Option<String>; 2],
}

impl Game {
    /// Creates a game starting from `position`.
    ///
    /// A position matching a handicap table entry records that handicap.
    pub fn new(position: Position) -> Game {
        let handicap = Handicap::from_sfen(&position.to_sfen());
        Game {
            tree: GameTree::new(position),
            flipped: false,
            handicap,
            players: Default::default(),
        }
    }

    pub fn from_handicap(handicap: Handicap) -> Game {
        Game {
            tree: GameTree::new(handicap.position()),
            flipped: false,
            handicap: Some(handicap),
            players: Default::default(),
        }
    }

    pub fn root(&self) -> StepId {
        self.tree.root()
    }

    pub fn start_position(&self) -> &Position {
        self.tree[self.tree.root()].position()
    }

    pub fn player(&self, color: Color) -> Option<&str> {
        self.players[color.index()].as_deref()
    }

    pub fn set_player(&mut self, color: Color, name: impl Into<String>) {
        let name = name.into();
        self.players[color.index()] = if name.is_empty() { None } else { Some(name) };
    }

    /// Returns the last step of the main line.
    pub fn main_line_end(&self) -> StepId {
        self.tree
            .main_line(self.root())
            .last()
            .copied()
            .unwrap_or_else(|| self.root())
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new(Position::startpos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handicap_detection() {
        assert_eq!(Some(Handicap::Even), Game::new(Position::startpos()).handicap);
        assert_eq!(None, Game::new(Position::new()).handicap);

        let game = Game::from_handicap(Handicap::Bishop);
        assert_eq!(Color::White, game.start_position().side_to_move());
    }

    #[test]
    fn players() {
        let mut game = Game::default();
        game.set_player(Color::Black, "羽生善治");
        game.set_player(Color::White, "");

        assert_eq!(Some("羽生善治"), game.player(Color::Black));
        assert_eq!(None, game.player(Color::White));
    }

    #[test]
    fn main_line_end() {
        let mut game = Game::default();
        assert_eq!(game.root(), game.main_line_end());

        let root = game.root();
        let a = game.tree.append_move_usi(root, "7g7f").unwrap();
        assert_eq!(a, game.main_line_end());
    }
}
