
use crate::types::*;

use serde::{Serialize,Deserialize};
use derive_more::*;

#[derive(Serialize,Deserialize,Hash,Eq,PartialEq,PartialOrd,Clone,Copy,
         BitAnd,BitAndAssign,BitOr,BitOrAssign,BitXor,BitXorAssign,Not,
         From,Into,
)]
pub struct BitBoard(pub u64);

pub const MASK_FILES: [BitBoard; 8] = [
    BitBoard(0x0101010101010101 << 0),
    BitBoard(0x0101010101010101 << 1),
    BitBoard(0x0101010101010101 << 2),
    BitBoard(0x0101010101010101 << 3),
    BitBoard(0x0101010101010101 << 4),
    BitBoard(0x0101010101010101 << 5),
    BitBoard(0x0101010101010101 << 6),
    BitBoard(0x0101010101010101 << 7),
];

pub const MASK_RANKS: [BitBoard; 8] = [
    BitBoard(0xff << 0),
    BitBoard(0xff << 8),
    BitBoard(0xff << 16),
    BitBoard(0xff << 24),
    BitBoard(0xff << 32),
    BitBoard(0xff << 40),
    BitBoard(0xff << 48),
    BitBoard(0xff << 56),
];

pub const LIGHT_SQUARES: BitBoard = BitBoard(0x55aa55aa55aa55aa);

impl Iterator for BitBoard {
    type Item = Coord;
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            None
        } else {
            Some(self.bitscan_reset_mut())
        }
    }
}

/// creation
impl BitBoard {

    pub fn new<T>(cs: &[T]) -> BitBoard where
        T: Into<Coord> + Copy,
    {
        let mut b = BitBoard::empty();
        for c in cs.iter() {
            b.set_one_mut((*c).into());
        }
        b
    }

    pub const fn empty() -> BitBoard {
        BitBoard(0)
    }

    pub fn single(c: Coord) -> BitBoard {
        BitBoard(1u64 << c.0)
    }

}

/// Queries
impl BitBoard {

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_not_empty(&self) -> bool {
        self.0 != 0
    }

    pub fn is_zero_at(&self, c0: Coord) -> bool {
        (*self & BitBoard::single(c0)).is_empty()
    }

    #[inline(always)]
    pub fn is_one_at(&self, c0: Coord) -> bool {
        (*self & BitBoard::single(c0)).is_not_empty()
    }

    pub fn more_than_one(&self) -> bool {
        (self.0 & self.0.wrapping_sub(1)) != 0
    }

    pub fn popcount(&self) -> u8 {
        self.0.count_ones() as u8
    }

}

/// Modification
impl BitBoard {

    pub fn set_one_mut(&mut self, c: Coord) {
        *self |= Self::single(c);
    }

}

/// Masks, Bitscan
impl BitBoard {

    pub fn mask_rank(r: u8) -> BitBoard {
        MASK_RANKS[r as usize]
    }

    pub fn mask_file(f: u8) -> BitBoard {
        MASK_FILES[f as usize]
    }

    pub fn bitscan_safe(&self) -> Option<Coord> {
        if self.is_empty() {
            None
        } else {
            Some(self.bitscan())
        }
    }

    /// Bitscan Forward
    pub fn bitscan(&self) -> Coord {
        Coord::new_int(self.0.trailing_zeros() as u8)
    }

    pub fn bitscan_reset(&self) -> (Self, Coord) {
        let x = self.bitscan();
        (BitBoard(self.0 & self.0.wrapping_sub(1)),x)
    }

    pub fn bitscan_reset_mut(&mut self) -> Coord {
        let (b,x) = self.bitscan_reset();
        *self = b;
        x
    }

    /// Bitscan Reverse
    pub fn bitscan_rev(&self) -> Coord {
        Coord::new_int(63 - self.0.leading_zeros() as u8)
    }

    /// Carry-Rippler, every subset of `self` including the empty set
    pub fn iter_subsets(&self) -> Vec<BitBoard> {
        let mut out = Vec::with_capacity(1 << self.popcount());
        let mut n: u64 = 0;
        loop {
            out.push(BitBoard(n));
            n = n.wrapping_sub(self.0) & self.0;
            if n == 0 { break; }
        }
        out
    }

}

/// Fills
impl BitBoard {

    pub fn fill_north(&self) -> Self {
        let mut b = self.0;
        b |= b << 8;
        b |= b << 16;
        b |= b << 32;
        BitBoard(b)
    }

    pub fn fill_south(&self) -> Self {
        let mut b = self.0;
        b |= b >> 8;
        b |= b >> 16;
        b |= b >> 32;
        BitBoard(b)
    }

    /// Every square in front of `self` from `side`'s point of view
    pub fn front_span(&self, side: Color) -> Self {
        match side {
            White => BitBoard(self.fill_north().0 << 8),
            Black => BitBoard(self.fill_south().0 >> 8),
        }
    }

}

/// Shift
impl BitBoard {

    pub fn shift_dir(&self, d: D) -> Self {
        let not_a = !MASK_FILES[0].0;
        let not_h = !MASK_FILES[7].0;
        let b = match d {
            N  => self.0 << 8,
            NE => (self.0 << 9) & not_a,
            E  => (self.0 << 1) & not_a,
            SE => (self.0 >> 7) & not_a,
            S  => self.0 >> 8,
            SW => (self.0 >> 9) & not_h,
            W  => (self.0 >> 1) & not_h,
            NW => (self.0 << 7) & not_h,
        };
        BitBoard(b)
    }

}

impl Default for BitBoard {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ss: &str = &format!("{:0>64b}", self.0);
        f.write_str("BitBoard:\n")?;
        for y in 0..8 {
            let (c, rest) = ss.split_at(8);
            let c = c.chars().rev().collect::<String>();
            if y == 7 {
                f.write_str(&c)?;
            } else {
                f.write_str(&format!("{}\n", c))?;
            }
            ss = rest;
        }
        Ok(())
    }
}
