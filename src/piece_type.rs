use std::fmt;

/// Represents a kind of pieces.
///
/// The discriminants are the packed kind values: promoted kinds are their
/// base kind with the `PROMOTED_BIT` set.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum PieceType {
    Pawn = 1,
    Lance = 2,
    Knight = 3,
    Silver = 4,
    Bishop = 5,
    Rook = 6,
    Gold = 7,
    King = 8,
    ProPawn = 9,
    ProLance = 10,
    ProKnight = 11,
    ProSilver = 12,
    Horse = 13,
    Dragon = 14,
}

/// Bit added to a base kind by promotion.
pub const PROMOTED_BIT: u8 = 8;

/// Droppable kinds in the canonical listing order of hands (R B G S N L P).
pub const HAND_PIECE_TYPES: [PieceType; 7] = [
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Gold,
    PieceType::Silver,
    PieceType::Knight,
    PieceType::Lance,
    PieceType::Pawn,
];

const ALL: [PieceType; 14] = [
    PieceType::Pawn,
    PieceType::Lance,
    PieceType::Knight,
    PieceType::Silver,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Gold,
    PieceType::King,
    PieceType::ProPawn,
    PieceType::ProLance,
    PieceType::ProKnight,
    PieceType::ProSilver,
    PieceType::Horse,
    PieceType::Dragon,
];

// Offsets are (column delta, row delta) seen from Black: a negative row delta
// moves toward rank 1.
const FORWARD: [(i8, i8); 1] = [(0, -1)];
const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const KNIGHT_STEPS: [(i8, i8); 2] = [(-1, -2), (1, -2)];
const SILVER_STEPS: [(i8, i8); 5] = [(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)];
const GOLD_STEPS: [(i8, i8); 6] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl PieceType {
    /// Returns an iterator over all kinds, unpromoted first.
    pub fn iter() -> impl Iterator<Item = PieceType> {
        ALL.iter().copied()
    }

    /// Decodes a packed kind value (1..=14).
    pub fn from_bits(kind: u8) -> Option<PieceType> {
        ALL.get((kind as usize).checked_sub(1)?).copied()
    }

    /// Returns the packed kind value.
    #[inline(always)]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Returns true if the kind is a promoted one.
    pub fn is_promoted(self) -> bool {
        self.bits() > PieceType::King.bits()
    }

    /// Returns true if the kind can promote.
    pub fn can_promote(self) -> bool {
        self.promote().is_some()
    }

    /// Returns the promoted kind, if any.
    pub fn promote(self) -> Option<PieceType> {
        match self {
            PieceType::Gold | PieceType::King => None,
            pt if pt.is_promoted() => None,
            pt => PieceType::from_bits(pt.bits() | PROMOTED_BIT),
        }
    }

    /// Returns the unpromoted kind, if the kind is promoted.
    pub fn unpromote(self) -> Option<PieceType> {
        if self.is_promoted() {
            PieceType::from_bits(self.bits() & !PROMOTED_BIT)
        } else {
            None
        }
    }

    /// Returns the base kind: the unpromoted kind, or the kind itself.
    pub fn base(self) -> PieceType {
        self.unpromote().unwrap_or(self)
    }

    /// Returns true if the kind can be held in hand.
    pub fn is_hand_piece(self) -> bool {
        self.hand_index().is_some()
    }

    /// Returns the slot of the kind in a hand table, if droppable.
    pub fn hand_index(self) -> Option<usize> {
        match self {
            PieceType::Pawn => Some(0),
            PieceType::Lance => Some(1),
            PieceType::Knight => Some(2),
            PieceType::Silver => Some(3),
            PieceType::Bishop => Some(4),
            PieceType::Rook => Some(5),
            PieceType::Gold => Some(6),
            _ => None,
        }
    }

    /// Returns true for the promoted sliders (horse and dragon).
    pub fn is_promoted_slider(self) -> bool {
        matches!(self, PieceType::Horse | PieceType::Dragon)
    }

    /// Single-step offsets of the kind, from Black's point of view.
    pub fn neighbours(self) -> &'static [(i8, i8)] {
        match self {
            PieceType::Pawn => &FORWARD,
            PieceType::Knight => &KNIGHT_STEPS,
            PieceType::Silver => &SILVER_STEPS,
            PieceType::Gold
            | PieceType::ProPawn
            | PieceType::ProLance
            | PieceType::ProKnight
            | PieceType::ProSilver => &GOLD_STEPS,
            PieceType::King => &KING_STEPS,
            PieceType::Horse => &ORTHOGONAL,
            PieceType::Dragon => &DIAGONAL,
            PieceType::Lance | PieceType::Bishop | PieceType::Rook => &[],
        }
    }

    /// Unbounded slide directions of the kind, from Black's point of view.
    pub fn slides(self) -> &'static [(i8, i8)] {
        match self {
            PieceType::Lance => &FORWARD,
            PieceType::Bishop | PieceType::Horse => &DIAGONAL,
            PieceType::Rook | PieceType::Dragon => &ORTHOGONAL,
            _ => &[],
        }
    }

    /// Returns the USI/SFEN letter of the base kind (uppercase).
    pub fn usi_char(self) -> char {
        match self.base() {
            PieceType::Pawn => 'P',
            PieceType::Lance => 'L',
            PieceType::Knight => 'N',
            PieceType::Silver => 'S',
            PieceType::Gold => 'G',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            _ => 'K',
        }
    }

    /// Creates an unpromoted kind from its USI/SFEN letter (either case).
    pub fn from_usi_char(c: char) -> Option<PieceType> {
        Some(match c.to_ascii_uppercase() {
            'P' => PieceType::Pawn,
            'L' => PieceType::Lance,
            'N' => PieceType::Knight,
            'S' => PieceType::Silver,
            'G' => PieceType::Gold,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'K' => PieceType::King,
            _ => return None,
        })
    }

    /// Returns the two-letter CSA code.
    pub fn csa(self) -> &'static str {
        match self {
            PieceType::Pawn => "FU",
            PieceType::Lance => "KY",
            PieceType::Knight => "KE",
            PieceType::Silver => "GI",
            PieceType::Gold => "KI",
            PieceType::Bishop => "KA",
            PieceType::Rook => "HI",
            PieceType::King => "OU",
            PieceType::ProPawn => "TO",
            PieceType::ProLance => "NY",
            PieceType::ProKnight => "NK",
            PieceType::ProSilver => "NG",
            PieceType::Horse => "UM",
            PieceType::Dragon => "RY",
        }
    }

    /// Creates a kind from its CSA code.
    pub fn from_csa(s: &str) -> Option<PieceType> {
        PieceType::iter().find(|pt| pt.csa() == s)
    }

    /// Returns the name used in move descriptions (KIF/KI2).
    pub fn japanese(self) -> &'static str {
        match self {
            PieceType::Pawn => "歩",
            PieceType::Lance => "香",
            PieceType::Knight => "桂",
            PieceType::Silver => "銀",
            PieceType::Gold => "金",
            PieceType::Bishop => "角",
            PieceType::Rook => "飛",
            PieceType::King => "玉",
            PieceType::ProPawn => "と",
            PieceType::ProLance => "成香",
            PieceType::ProKnight => "成桂",
            PieceType::ProSilver => "成銀",
            PieceType::Horse => "馬",
            PieceType::Dragon => "龍",
        }
    }

    /// Returns the one-character glyph used in BOD diagrams.
    pub fn glyph(self) -> char {
        match self {
            PieceType::ProLance => '杏',
            PieceType::ProKnight => '圭',
            PieceType::ProSilver => '全',
            pt => pt.japanese().chars().next().unwrap_or('？'),
        }
    }

    /// Matches a piece name at the start of `s`, returning the kind and the
    /// number of bytes consumed. Longer names win (`成香` before `香`).
    pub fn strip_japanese(s: &str) -> Option<(PieceType, usize)> {
        const NAMES: [(&str, PieceType); 19] = [
            ("成香", PieceType::ProLance),
            ("成桂", PieceType::ProKnight),
            ("成銀", PieceType::ProSilver),
            ("歩", PieceType::Pawn),
            ("香", PieceType::Lance),
            ("桂", PieceType::Knight),
            ("銀", PieceType::Silver),
            ("金", PieceType::Gold),
            ("角", PieceType::Bishop),
            ("飛", PieceType::Rook),
            ("玉", PieceType::King),
            ("王", PieceType::King),
            ("と", PieceType::ProPawn),
            ("杏", PieceType::ProLance),
            ("圭", PieceType::ProKnight),
            ("全", PieceType::ProSilver),
            ("馬", PieceType::Horse),
            ("龍", PieceType::Dragon),
            ("竜", PieceType::Dragon),
        ];

        NAMES
            .iter()
            .find(|(name, _)| s.starts_with(name))
            .map(|(name, pt)| (*pt, name.len()))
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_promoted() {
            write!(f, "+")?;
        }
        write!(f, "{}", self.usi_char().to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_adds_bit() {
        for pt in PieceType::iter() {
            match pt.promote() {
                Some(promoted) => {
                    assert_eq!(pt.bits() | PROMOTED_BIT, promoted.bits(), "{pt:?}");
                    assert_eq!(Some(pt), promoted.unpromote());
                }
                None => assert!(
                    pt.is_promoted() || pt == PieceType::Gold || pt == PieceType::King
                ),
            }
        }
        assert_eq!(Some(PieceType::Horse), PieceType::Bishop.promote());
        assert_eq!(Some(PieceType::Dragon), PieceType::Rook.promote());
        assert_eq!(PieceType::Pawn, PieceType::ProPawn.base());
    }

    #[test]
    fn hand_pieces() {
        let count = PieceType::iter().filter(|pt| pt.is_hand_piece()).count();
        assert_eq!(7, count);
        assert!(!PieceType::King.is_hand_piece());
        assert!(!PieceType::ProPawn.is_hand_piece());
        for pt in HAND_PIECE_TYPES {
            assert!(pt.is_hand_piece());
        }
    }

    #[test]
    fn from_bits() {
        for pt in PieceType::iter() {
            assert_eq!(Some(pt), PieceType::from_bits(pt.bits()));
        }
        assert_eq!(None, PieceType::from_bits(0));
        assert_eq!(None, PieceType::from_bits(15));
    }

    #[test]
    fn csa_codes() {
        for pt in PieceType::iter() {
            assert_eq!(Some(pt), PieceType::from_csa(pt.csa()));
        }
        assert_eq!(None, PieceType::from_csa("XX"));
    }

    #[test]
    fn japanese_names() {
        for pt in PieceType::iter() {
            assert_eq!(
                Some((pt, pt.japanese().len())),
                PieceType::strip_japanese(pt.japanese())
            );
            let glyph = pt.glyph().to_string();
            assert_eq!(Some(pt), PieceType::strip_japanese(&glyph).map(|(p, _)| p));
        }
        assert_eq!(
            Some((PieceType::Dragon, "竜".len())),
            PieceType::strip_japanese("竜(28)")
        );
    }

    #[test]
    fn templates() {
        assert_eq!(1, PieceType::Pawn.neighbours().len());
        assert!(PieceType::Pawn.slides().is_empty());
        assert_eq!(4, PieceType::Dragon.slides().len());
        assert_eq!(4, PieceType::Dragon.neighbours().len());
        assert_eq!(PieceType::Gold.neighbours(), PieceType::ProSilver.neighbours());
    }

    #[test]
    fn display() {
        assert_eq!("p", PieceType::Pawn.to_string());
        assert_eq!("+b", PieceType::Horse.to_string());
    }
}
