//! Branching history of a game.
//!
//! Steps live in an arena owned by [`GameTree`] and are addressed by
//! [`StepId`]. Parent links are plain ids used for upward traversal only.
//! The first child of a step is its main line; later children are
//! variations in the order they were explored.
//!
//! ```
//! use shogi_kifu::{GameTree, Position};
//!
//! let mut tree = GameTree::new(Position::startpos());
//! let root = tree.root();
//! let a = tree.append_move_usi(root, "7g7f").unwrap();
//! let end = tree.append_move_usi(a, "resign").unwrap();
//!
//! assert!(tree[end].is_terminal());
//! assert_eq!(None, tree.append_move_usi(end, "3c3d"));
//! ```

use std::ops::Index;

use crate::moves::Move;
use crate::piece::Piece;
use crate::position::Position;
use crate::termination::Termination;

/// Handle of a step inside its [`GameTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(usize);

impl StepId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the game tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    parent: Option<StepId>,
    children: Vec<StepId>,
    mv: Option<Move>,
    position: Position,
    captured: Option<Piece>,
    termination: Option<Termination>,
}

impl Step {
    pub fn parent(&self) -> Option<StepId> {
        self.parent
    }

    pub fn children(&self) -> &[StepId] {
        &self.children
    }

    /// The move that produced this step. `None` at the root and on terminal steps.
    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    /// The position after the move.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.termination.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTree {
    steps: Vec<Step>,
}

impl GameTree {
    /// Creates a tree holding only the root step.
    pub fn new(position: Position) -> GameTree {
        GameTree {
            steps: vec![Step {
                parent: None,
                children: Vec::new(),
                mv: None,
                position,
                captured: None,
                termination: None,
            }],
        }
    }

    pub fn root(&self) -> StepId {
        StepId(0)
    }

    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.steps.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn parent(&self, id: StepId) -> Option<StepId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: StepId) -> &[StepId] {
        self.get(id).map_or(&[], |s| s.children.as_slice())
    }

    /// Appends the step reached by playing `mv` from `id`.
    ///
    /// Returns `None` if `id` is terminal or unknown, or if `mv` is the
    /// sentinel move.
    pub fn append_move(&mut self, id: StepId, mv: Move) -> Option<StepId> {
        if mv.is_none() {
            return None;
        }

        let parent = self.open_step(id)?;
        let mut position = parent.position.clone();
        let captured = position.do_move(mv);

        Some(self.push(Step {
            parent: Some(id),
            children: Vec::new(),
            mv: Some(mv),
            position,
            captured,
            termination: None,
        }))
    }

    /// Appends a terminal step. The step keeps the parent's position.
    pub fn append_end(&mut self, id: StepId, termination: Termination) -> Option<StepId> {
        let position = self.open_step(id)?.position.clone();

        Some(self.push(Step {
            parent: Some(id),
            children: Vec::new(),
            mv: None,
            position,
            captured: None,
            termination: Some(termination),
        }))
    }

    /// Appends a USI move, a USI result keyword (`resign`, `rep_draw`, ...)
    /// or, failing both, a literal result label.
    pub fn append_move_usi(&mut self, id: StepId, token: &str) -> Option<StepId> {
        if let Some(mv) = Move::from_usi(token) {
            return self.append_move(id, mv);
        }

        let termination =
            Termination::from_usi(token).unwrap_or_else(|| Termination::from_label(token));
        self.append_end(id, termination)
    }

    /// Returns the existing child reached by `mv`, if any.
    pub fn find_child(&self, id: StepId, mv: Move) -> Option<StepId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.steps[c.0].mv == Some(mv))
    }

    /// Follows `mv` from `id`, reusing an identical child instead of
    /// appending a duplicate.
    pub fn find_or_append_move(&mut self, id: StepId, mv: Move) -> Option<StepId> {
        match self.find_child(id, mv) {
            Some(child) => Some(child),
            None => self.append_move(id, mv),
        }
    }

    /// Returns the steps following the first children from `id`, excluding `id`.
    pub fn main_line(&self, id: StepId) -> Vec<StepId> {
        let mut line = Vec::new();
        let mut cur = id;
        while let Some(&next) = self.children(cur).first() {
            line.push(next);
            cur = next;
        }
        line
    }

    /// Returns the steps from the root down to `id`, both included.
    pub fn path_from_root(&self, id: StepId) -> Vec<StepId> {
        let mut path = vec![id];
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            path.push(parent);
            cur = parent;
        }
        path.reverse();
        path
    }

    /// Returns the number of ancestors of `id`.
    pub fn depth(&self, id: StepId) -> usize {
        self.path_from_root(id).len() - 1
    }

    /// Returns the moves from the root to `id`.
    pub fn moves_to(&self, id: StepId) -> Vec<Move> {
        self.path_from_root(id)
            .into_iter()
            .filter_map(|s| self.steps[s.0].mv)
            .collect()
    }

    fn open_step(&self, id: StepId) -> Option<&Step> {
        let step = self.get(id)?;
        if step.is_terminal() {
            tracing::debug!(step = id.0, "cannot append past a terminal step");
            return None;
        }
        Some(step)
    }

    fn push(&mut self, step: Step) -> StepId {
        let id = StepId(self.steps.len());
        if let Some(parent) = step.parent {
            self.steps[parent.0].children.push(id);
        }
        self.steps.push(step);
        id
    }
}

impl Default for GameTree {
    fn default() -> GameTree {
        GameTree::new(Position::startpos())
    }
}

impl Index<StepId> for GameTree {
    type Output = Step;

    fn index(&self, id: StepId) -> &Step {
        &self.steps[id.0]
    }
}
