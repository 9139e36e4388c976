
use crate::types::*;
use crate::evaluate::*;

use log::debug;
use serde::{Serialize,Deserialize};

/// PV,  // Exact
/// All, // UpperBound, Fail low, evaluation never exceeded alpha
/// Cut, // LowerBound, Fail high, evaluation caused cutoff
#[derive(Debug,Eq,PartialEq,PartialOrd,Hash,Clone,Copy,Serialize,Deserialize)]
pub enum Node {
    PV,
    All,
    Cut,
}

#[derive(Debug,Eq,PartialEq,Hash,Clone,Copy,Serialize,Deserialize)]
pub struct TTEntry {
    pub key:            Zobrist,
    pub best_move:      Option<Move>,
    pub score:          Score,
    pub depth:          Depth,
    pub node:           Node,
    pub age:            u8,
}

impl TTEntry {

    /// The stored score is usable as-is for this window
    pub fn can_cutoff(&self, depth: Depth, alpha: Score, beta: Score) -> bool {
        if self.depth < depth { return false; }
        match self.node {
            Node::PV  => true,
            Node::Cut => self.score >= beta,
            Node::All => self.score <= alpha,
        }
    }

}

/// One entry per slot, indexed by the low bits of the key
#[derive(Debug,Clone)]
pub struct TransTable {
    entries:    Vec<Option<TTEntry>>,
    mask:       usize,
    age:        u8,
}

/// Construction
impl TransTable {

    /// Largest power-of-two slot count that fits in `mb_size` MiB
    pub fn new(mb_size: usize) -> Self {
        let bytes = mb_size.max(1) * 1024 * 1024;
        let slots = (bytes / std::mem::size_of::<Option<TTEntry>>()).max(1);
        let slots = if slots.is_power_of_two() { slots } else { slots.next_power_of_two() / 2 };
        Self::with_slots(slots)
    }

    /// Rounded up to a power of two
    pub fn with_slots(n: usize) -> Self {
        let n = n.max(1).next_power_of_two();
        debug!("TransTable: {} slots, {} KiB", n, n * std::mem::size_of::<Option<TTEntry>>() / 1024);
        Self {
            entries: vec![None; n],
            mask:    n - 1,
            age:     0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        debug!("TransTable: clear");
        self.entries.iter_mut().for_each(|e| *e = None);
        self.age = 0;
    }

    /// Per-mille of the first thousand slots filled by the current generation
    pub fn hashfull(&self) -> u32 {
        let n = self.entries.len().min(1000);
        let used = self.entries[..n].iter()
            .filter(|e| matches!(e, Some(e) if e.age == self.age))
            .count();
        (used * 1000 / n) as u32
    }

    fn index(&self, zb: Zobrist) -> usize {
        zb.0 as usize & self.mask
    }

}

/// Probe, Store
impl TransTable {

    /// Only returns an entry whose full key matches, with mate scores
    /// re-expressed relative to `ply`
    pub fn probe(&self, zb: Zobrist, ply: Depth) -> Option<TTEntry> {
        let e = self.entries[self.index(zb)]?;
        if e.key != zb {
            return None;
        }
        Some(TTEntry { score: score_from_tt(e.score, ply), ..e })
    }

    pub fn store(
        &mut self,
        zb:          Zobrist,
        best_move:   Option<Move>,
        score:       Score,
        depth:       Depth,
        node:        Node,
        ply:         Depth,
    ) {
        let idx = self.index(zb);
        let age = self.age;
        let new = TTEntry {
            key:   zb,
            best_move,
            score: score_to_tt(score, ply),
            depth,
            node,
            age,
        };

        let slot = &mut self.entries[idx];
        match slot {
            None => *slot = Some(new),
            Some(prev) => {
                let replace = prev.age != age
                    || depth >= prev.depth
                    || (prev.key == zb && node == Node::PV && prev.node != Node::PV);

                if replace {
                    let inherited = if prev.key == zb { prev.best_move } else { None };
                    *slot = Some(TTEntry { best_move: best_move.or(inherited), ..new });
                } else if prev.key == zb && prev.best_move.is_none() {
                    prev.best_move = best_move;
                }
            },
        }
    }

}

/// Mates are stored as distance from the stored node, not from the root
fn score_to_tt(score: Score, ply: Depth) -> Score {
    if score >= MATE_THRESHOLD {
        score + ply as Score
    } else if score <= -MATE_THRESHOLD {
        score - ply as Score
    } else {
        score
    }
}

fn score_from_tt(score: Score, ply: Depth) -> Score {
    if score >= MATE_THRESHOLD {
        score - ply as Score
    } else if score <= -MATE_THRESHOLD {
        score + ply as Score
    } else {
        score
    }
}
