use crate::color::Color;
use crate::piece_type::{PieceType, HAND_PIECE_TYPES};

/// Manages the number of each piece in each player's hand.
///
/// Only droppable base kinds are tracked; asking for any other kind yields
/// zero and updates to it are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Hand {
    counts: [[u8; 7]; 2],
}

impl Hand {
    /// Returns the number of `piece_type` pieces held by `color`.
    pub fn get(&self, color: Color, piece_type: PieceType) -> u8 {
        piece_type
            .hand_index()
            .map_or(0, |i| self.counts[color.index()][i])
    }

    /// Sets the number of `piece_type` pieces held by `color`.
    pub fn set(&mut self, color: Color, piece_type: PieceType, count: u8) {
        if let Some(i) = piece_type.hand_index() {
            self.counts[color.index()][i] = count;
        }
    }

    /// Adds `delta` to the count, saturating at zero.
    pub fn add(&mut self, color: Color, piece_type: PieceType, delta: i16) {
        let current = self.get(color, piece_type) as i16;
        self.set(color, piece_type, (current + delta).clamp(0, u8::MAX as i16) as u8);
    }

    /// Returns true if the color holds nothing.
    pub fn is_empty(&self, color: Color) -> bool {
        self.counts[color.index()].iter().all(|&n| n == 0)
    }

    /// Iterates the non-zero entries of a color in canonical order (R B G S N L P).
    pub fn iter(&self, color: Color) -> impl Iterator<Item = (PieceType, u8)> + '_ {
        HAND_PIECE_TYPES
            .iter()
            .map(move |&pt| (pt, self.get(color, pt)))
            .filter(|&(_, n)| n > 0)
    }

    /// Clears the hand.
    pub fn clear(&mut self) {
        self.counts = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set() {
        let mut hand = Hand::default();
        hand.set(Color::Black, PieceType::Pawn, 3);
        hand.set(Color::White, PieceType::Rook, 1);

        assert_eq!(3, hand.get(Color::Black, PieceType::Pawn));
        assert_eq!(0, hand.get(Color::White, PieceType::Pawn));
        assert_eq!(1, hand.get(Color::White, PieceType::Rook));
        assert!(!hand.is_empty(Color::Black));

        hand.set(Color::Black, PieceType::King, 1);
        assert_eq!(0, hand.get(Color::Black, PieceType::King));

        hand.clear();
        assert!(hand.is_empty(Color::Black));
        assert!(hand.is_empty(Color::White));
    }

    #[test]
    fn add() {
        let mut hand = Hand::default();
        hand.add(Color::Black, PieceType::Silver, 2);
        hand.add(Color::Black, PieceType::Silver, -1);
        assert_eq!(1, hand.get(Color::Black, PieceType::Silver));

        hand.add(Color::Black, PieceType::Silver, -5);
        assert_eq!(0, hand.get(Color::Black, PieceType::Silver));
    }

    #[test]
    fn iter_order() {
        let mut hand = Hand::default();
        hand.set(Color::Black, PieceType::Pawn, 2);
        hand.set(Color::Black, PieceType::Rook, 1);
        hand.set(Color::Black, PieceType::Gold, 1);

        let listed: Vec<_> = hand.iter(Color::Black).collect();
        assert_eq!(
            vec![
                (PieceType::Rook, 1),
                (PieceType::Gold, 1),
                (PieceType::Pawn, 2)
            ],
            listed
        );
    }
}
