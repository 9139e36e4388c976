
use serde::{Serialize,Deserialize};

use rand::{prelude::StdRng,Rng};
use derive_new::new;

use crate::types::*;
use crate::tables::*;

#[derive(Default,Serialize,Deserialize,Debug,Eq,PartialEq,PartialOrd,Clone,Copy,new)]
pub struct Magic {
    /// offset into the shared attack table
    pub attacks:   usize,
    pub mask:      BitBoard,
    pub magic:     BitBoard,
    pub shift:     u8,
}

impl Magic {

    pub fn index(&self, occ: BitBoard) -> usize {
        let occ = (occ & self.mask).0;
        let occ = occ.wrapping_mul(self.magic.0);
        self.attacks + (occ >> self.shift) as usize
    }

}

/// Returns the 64 magics and the attack table they index into.
/// Deterministic for a given rng state.
pub fn gen_magics(rng: &mut StdRng, bishop: bool) -> ([Magic; 64], Vec<BitBoard>) {

    let mut magics: [Magic; 64] = [Magic::default(); 64];
    let mut table: Vec<BitBoard> = vec![];

    let mut epoch: Vec<u32>     = vec![0; 4096];
    let mut used: Vec<BitBoard> = vec![BitBoard::empty(); 4096];
    let mut cnt: u32 = 0;

    for sq in 0u8..64 {
        let c0 = Coord::new_int(sq);

        let mask  = Tables::gen_blockermask(c0, bishop);
        let n     = mask.popcount();
        let shift = 64 - n;

        let subsets = mask.iter_subsets();
        let reference: Vec<BitBoard> = subsets.iter()
            .map(|&b| Tables::gen_moveboard(b, c0, bishop))
            .collect();

        let mm = 'outer: loop {
            let mm = sparse_rand(rng);
            if (mask.0.wrapping_mul(mm) >> 56).count_ones() < 6 {
                continue;
            }

            cnt += 1;
            for (b,&result) in subsets.iter().zip(reference.iter()) {
                let idx = (b.0.wrapping_mul(mm) >> shift) as usize;
                if epoch[idx] < cnt {
                    epoch[idx] = cnt;
                    used[idx] = result;
                } else if used[idx] != result {
                    continue 'outer;
                }
            }

            break mm;
        };

        let m = Magic::new(table.len(), mask, BitBoard(mm), shift);
        table.resize(table.len() + (1 << n), BitBoard::empty());
        for (b,&result) in subsets.iter().zip(reference.iter()) {
            table[m.index(*b)] = result;
        }

        magics[sq as usize] = m;
    }

    (magics, table)
}

fn sparse_rand(rng: &mut StdRng) -> u64 {
    let x0: u64 = rng.gen();
    let x1: u64 = rng.gen();
    let x2: u64 = rng.gen();
    x0 & x1 & x2
}

/// Magic lookups
impl Tables {

    pub fn attacks_rook(&self, c0: Coord, occ: BitBoard) -> BitBoard {
        let m = &self.magics_rook[c0];
        self.table_rook[m.index(occ)]
    }

    pub fn attacks_bishop(&self, c0: Coord, occ: BitBoard) -> BitBoard {
        let m = &self.magics_bishop[c0];
        self.table_bishop[m.index(occ)]
    }

    pub fn attacks_queen(&self, c0: Coord, occ: BitBoard) -> BitBoard {
        self.attacks_rook(c0, occ) | self.attacks_bishop(c0, occ)
    }

}

/// Ray traversal
impl Tables {

    /// Relevant occupancy, the attack set on an empty board minus the last
    /// square of each ray
    pub fn gen_blockermask(c0: Coord, bishop: bool) -> BitBoard {
        let ds: &[D] = if bishop { &D::BISHOP } else { &D::ROOK };
        let mut out = BitBoard::empty();
        for d in ds.iter() {
            let mut c1 = c0;
            while let Some(c2) = d.shift_coord(c1) {
                if d.shift_coord(c2).is_none() { break; }
                out.set_one_mut(c2);
                c1 = c2;
            }
        }
        out
    }

    /// Walks each ray square by square, stopping on the first blocker
    pub fn gen_moveboard(occ: BitBoard, c0: Coord, bishop: bool) -> BitBoard {
        let ds: &[D] = if bishop { &D::BISHOP } else { &D::ROOK };
        let mut out = BitBoard::empty();
        for d in ds.iter() {
            let mut c1 = c0;
            while let Some(c2) = d.shift_coord(c1) {
                out.set_one_mut(c2);
                if occ.is_one_at(c2) { break; }
                c1 = c2;
            }
        }
        out
    }

    /// Same sets as the magic lookup, from the precomputed rays and a
    /// bitscan toward the first blocker
    pub fn attacks_sliding_ray(&self, c0: Coord, occ: BitBoard, bishop: bool) -> BitBoard {
        let ds: &[D] = if bishop { &D::BISHOP } else { &D::ROOK };
        let mut out = BitBoard::empty();
        for &d in ds.iter() {
            let ray = self.get_ray(d, c0);
            let blockers = ray & occ;
            if blockers.is_empty() {
                out |= ray;
            } else {
                let c1 = if d.is_positive() { blockers.bitscan() } else { blockers.bitscan_rev() };
                out |= ray & !self.get_ray(d, c1);
            }
        }
        out
    }

}
