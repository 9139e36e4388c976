
use crate::types::*;

use serde::{Serialize,Deserialize};

pub use self::D::*;

#[derive(Debug,Hash,Eq,PartialEq,Ord,PartialOrd,Clone,Copy)]
pub enum D {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Little-endian rank-file mapping, A1 = 0, H8 = 63
#[derive(Hash,Eq,PartialEq,Ord,PartialOrd,Clone,Copy,Default,Serialize,Deserialize)]
pub struct Coord(pub u8);

impl D {

    pub const ALL: [D; 8] = [N,NE,E,SE,S,SW,W,NW];

    pub const ROOK: [D; 4] = [N,E,S,W];
    pub const BISHOP: [D; 4] = [NE,SE,SW,NW];

    pub fn index(self) -> usize {
        match self {
            N  => 0,
            NE => 1,
            E  => 2,
            SE => 3,
            S  => 4,
            SW => 5,
            W  => 6,
            NW => 7,
        }
    }

    pub fn shift(&self) -> i8 {
        match *self {
            N  => 8,
            NE => 9,
            E  => 1,
            SE => -7,
            S  => -8,
            SW => -9,
            W  => -1,
            NW => 7,
        }
    }

    /// Rays with a positive shift run toward H8, their first blocker
    /// is found with a forward bitscan
    pub fn is_positive(&self) -> bool {
        self.shift() > 0
    }

    /// None when stepping off the board
    pub fn shift_coord(&self, c0: Coord) -> Option<Coord> {
        let (f,r) = (c0.file() as i8, c0.rank() as i8);
        let (df,dr) = match *self {
            N  => (0,1),
            NE => (1,1),
            E  => (1,0),
            SE => (1,-1),
            S  => (0,-1),
            SW => (-1,-1),
            W  => (-1,0),
            NW => (-1,1),
        };
        let (f,r) = (f + df, r + dr);
        if (0..8).contains(&f) && (0..8).contains(&r) {
            Some(Coord::new(f as u8, r as u8))
        } else {
            None
        }
    }

}

impl Coord {

    pub fn new(file: u8, rank: u8) -> Self {
        Coord(rank * 8 + file)
    }

    pub fn new_int(sq: u8) -> Self {
        Coord(sq)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn file(&self) -> u8 {
        self.0 & 7
    }

    pub fn rank(&self) -> u8 {
        self.0 >> 3
    }

    /// Rank from `side`'s point of view, 0 = own back rank
    pub fn relative_rank(&self, side: Color) -> u8 {
        match side {
            White => self.rank(),
            Black => 7 - self.rank(),
        }
    }

    /// Vertical mirror, A1 <-> A8
    pub fn flip_vertical(&self) -> Coord {
        Coord(self.0 ^ 56)
    }

}

impl<T> std::ops::Index<Coord> for [T; 64] {
    type Output = T;
    fn index(&self, c0: Coord) -> &Self::Output {
        &self[c0.0 as usize]
    }
}

impl<T> std::ops::IndexMut<Coord> for [T; 64] {
    fn index_mut(&mut self, c0: Coord) -> &mut Self::Output {
        &mut self[c0.0 as usize]
    }
}

impl std::str::FromStr for Coord {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cs = s.chars();
        match (cs.next(), cs.next(), cs.next()) {
            (Some(f @ 'a'..='h'), Some(r @ '1'..='8'), None) => {
                Ok(Coord::new(f as u8 - b'a', r as u8 - b'1'))
            },
            _ => Err(ParseError::BadSquare(s.to_string())),
        }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{}{}", file, rank)
    }
}

impl std::fmt::Debug for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<&str> for Coord {
    /// Panics on a malformed square, only for literals in tests and tables
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().parse() {
            Ok(c) => c,
            Err(e) => panic!("Coord::from({:?}): {}", s, e),
        }
    }
}
