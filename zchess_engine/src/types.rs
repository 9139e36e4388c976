
pub use crate::bitboard::*;
pub use crate::coords::*;
pub use crate::game::*;
pub use crate::hashing::*;
pub use crate::error::*;

pub use self::{Color::*,Piece::*};

use serde::{Serialize,Deserialize};

pub type Depth = i16;

pub const MAX_PLY: Depth = 64;

#[derive(Debug,Hash,Eq,PartialEq,Ord,PartialOrd,Clone,Copy,Serialize,Deserialize)]
pub enum Color {
    White,
    Black,
}

#[derive(Debug,Hash,Eq,PartialEq,Ord,PartialOrd,Clone,Copy,Serialize,Deserialize)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Default for Color {
    fn default() -> Self { White }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            White => Black,
            Black => White,
        }
    }
}

impl<T> std::ops::Index<Color> for [T; 2] {
    type Output = T;
    fn index(&self, col: Color) -> &Self::Output {
        &self[col.index()]
    }
}

impl<T> std::ops::IndexMut<Color> for [T; 2] {
    fn index_mut(&mut self, col: Color) -> &mut Self::Output {
        &mut self[col.index()]
    }
}

impl Color {
    pub fn index(self) -> usize {
        match self {
            White => 0,
            Black => 1,
        }
    }

    /// +1 for White, -1 for Black
    pub fn fold<T: std::ops::Neg<Output = T>>(self, x: T) -> T {
        match self {
            White => x,
            Black => -x,
        }
    }

    pub fn iter() -> impl Iterator<Item = Color> {
        [White,Black].into_iter()
    }
}

impl Piece {

    pub const PROMOTIONS: [Piece; 4] = [Queen,Rook,Bishop,Knight];

    pub fn index(self) -> usize {
        match self {
            Pawn   => 0,
            Knight => 1,
            Bishop => 2,
            Rook   => 3,
            Queen  => 4,
            King   => 5,
        }
    }

    pub fn iter_pieces() -> impl Iterator<Item = Piece> {
        [Pawn,Knight,Bishop,Rook,Queen,King].into_iter()
    }

    pub fn to_char(self, col: Color) -> char {
        let c = match self {
            Pawn   => 'p',
            Knight => 'n',
            Bishop => 'b',
            Rook   => 'r',
            Queen  => 'q',
            King   => 'k',
        };
        if col == White { c.to_ascii_uppercase() } else { c }
    }

    pub fn from_char(c: char) -> Option<(Piece,Color)> {
        let col = if c.is_ascii_uppercase() { White } else { Black };
        let pc = match c.to_ascii_lowercase() {
            'p' => Pawn,
            'n' => Knight,
            'b' => Bishop,
            'r' => Rook,
            'q' => Queen,
            'k' => King,
            _   => return None,
        };
        Some((pc,col))
    }

}

#[derive(Debug,Hash,Eq,PartialEq,Ord,PartialOrd,Clone,Copy,Serialize,Deserialize)]
pub enum MoveFlag {
    Quiet,
    DoublePush,
    EnPassant,
    CastleKing,
    CastleQueen,
}

/// Captures and promotions are carried by `captured` and `promotion`,
/// the flag only marks moves with side effects.
#[derive(Debug,Hash,Eq,PartialEq,Ord,PartialOrd,Clone,Copy,Serialize,Deserialize)]
pub struct Move {
    pub from:        Coord,
    pub to:          Coord,
    pub piece:       Piece,
    pub captured:    Option<Piece>,
    pub promotion:   Option<Piece>,
    pub flag:        MoveFlag,
}

/// creation
impl Move {

    pub fn new_quiet(from: Coord, to: Coord, piece: Piece) -> Self {
        Self { from, to, piece, captured: None, promotion: None, flag: MoveFlag::Quiet }
    }

    pub fn new_capture(from: Coord, to: Coord, piece: Piece, victim: Piece) -> Self {
        Self { from, to, piece, captured: Some(victim), promotion: None, flag: MoveFlag::Quiet }
    }

    pub fn new_promotion(from: Coord, to: Coord, victim: Option<Piece>, new_piece: Piece) -> Self {
        Self { from, to, piece: Pawn, captured: victim, promotion: Some(new_piece), flag: MoveFlag::Quiet }
    }

    pub fn new_double_push(from: Coord, to: Coord) -> Self {
        Self { from, to, piece: Pawn, captured: None, promotion: None, flag: MoveFlag::DoublePush }
    }

    pub fn new_en_passant(from: Coord, to: Coord) -> Self {
        Self { from, to, piece: Pawn, captured: Some(Pawn), promotion: None, flag: MoveFlag::EnPassant }
    }

    pub fn new_castle(from: Coord, to: Coord, king_side: bool) -> Self {
        let flag = if king_side { MoveFlag::CastleKing } else { MoveFlag::CastleQueen };
        Self { from, to, piece: King, captured: None, promotion: None, flag }
    }

}

/// queries
impl Move {

    /// Captures and promotions, the moves searched by quiescence
    pub fn is_tactical(&self) -> bool {
        self.captured.is_some() || self.promotion.is_some()
    }

    /// Pawn moves and captures reset the halfmove clock
    pub fn is_irreversible(&self) -> bool {
        self.piece == Pawn || self.captured.is_some()
    }

}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(pc) = self.promotion {
            write!(f, "{}", pc.to_char(Black))?;
        }
        Ok(())
    }
}
