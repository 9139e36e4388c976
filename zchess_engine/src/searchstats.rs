
use std::time::Duration;

use serde::{Serialize,Deserialize};

#[derive(Debug,Default,PartialEq,Eq,PartialOrd,Clone,Copy,Serialize,Deserialize)]
pub struct SearchStats {
    pub nodes:          u64,
    pub qnodes:         u64,
    pub leaves:         u64,
    pub checkmates:     u64,
    pub stalemates:     u64,
    pub draws:          u64,
    pub tt_hits:        u64,
    pub tt_misses:      u64,
    pub tt_cutoffs:     u64,
    pub beta_cutoffs:   u64,
    pub max_ply:        u16,
}

impl SearchStats {

    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.qnodes
    }

    pub fn nps(&self, dt: Duration) -> f64 {
        let t = dt.as_secs_f64();
        if t <= 0.0 { return 0.0; }
        self.total_nodes() as f64 / t
    }

    pub fn print(&self, dt: Duration) {
        print!("\n");
        println!("time       = {:.3}s", dt.as_secs_f64());
        println!("nodes      = {:?}", self.nodes);
        println!("qnodes     = {:?}", self.qnodes);
        println!("rate       = {:.2} K nodes/s", self.nps(dt) / 1000.);
        println!("leaves     = {:?}", self.leaves);
        println!("checkmates = {:?}", self.checkmates);
        println!("stalemates = {:?}", self.stalemates);
        println!("draws      = {:?}", self.draws);
        println!("hits       = {:?}", self.tt_hits);
        println!("misses     = {:?}", self.tt_misses);
        println!("tt cuts    = {:?}", self.tt_cutoffs);
        println!("beta cuts  = {:?}", self.beta_cutoffs);
        println!("max ply    = {:?}", self.max_ply);
    }

}

impl std::ops::Add for SearchStats {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            nodes:          self.nodes + other.nodes,
            qnodes:         self.qnodes + other.qnodes,
            leaves:         self.leaves + other.leaves,
            checkmates:     self.checkmates + other.checkmates,
            stalemates:     self.stalemates + other.stalemates,
            draws:          self.draws + other.draws,
            tt_hits:        self.tt_hits + other.tt_hits,
            tt_misses:      self.tt_misses + other.tt_misses,
            tt_cutoffs:     self.tt_cutoffs + other.tt_cutoffs,
            beta_cutoffs:   self.beta_cutoffs + other.beta_cutoffs,
            max_ply:        u16::max(self.max_ply, other.max_ply),
        }
    }
}

impl std::ops::AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::iter::Sum<Self> for SearchStats {
    fn sum<I>(iter: I) -> Self where
        I: Iterator<Item = Self> {
        iter.fold(Self::default(), |a,b| a + b)
    }
}

impl<'a> std::iter::Sum<&'a Self> for SearchStats {
    fn sum<I>(iter: I) -> Self where
        I: Iterator<Item = &'a Self> {
        iter.fold(Self::default(), |a,b| a + *b)
    }
}
