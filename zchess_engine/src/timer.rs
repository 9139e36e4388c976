
use crate::types::*;

pub use std::sync::{
    Arc,
    atomic::{AtomicBool,Ordering},
};
use std::time::{Instant,Duration};

use serde::{Serialize,Deserialize};

pub type Seconds = f64;

/// Remaining clock for both sides
#[derive(Debug,PartialEq,PartialOrd,Clone,Copy,Serialize,Deserialize)]
pub struct TimeSettings {
    pub clock_time:      [Seconds; 2],
    pub increment:       [Seconds; 2],
    /// fraction of the clock held back
    pub safety:          Seconds,
    pub moves_to_go:     Option<u32>,
}

impl TimeSettings {

    pub fn new_f64(clock_time: f64, increment: f64) -> Self {
        Self {
            clock_time:   [clock_time; 2],
            increment:    [increment; 2],
            safety:       0.1,
            moves_to_go:  None,
        }
    }

    /// Moves to go defaults to 40, the increment is spent in full
    pub fn allocate_time(&self, side: Color) -> Duration {
        let t   = self.clock_time[side].max(0.0) * (1.0 - self.safety);
        let inc = self.increment[side].max(0.0);
        let mtg = self.moves_to_go.unwrap_or(40).clamp(1, 50) as f64;

        let alloc = (t / mtg + inc).min(t);
        Duration::from_secs_f64(alloc.max(0.001))
    }

}

/// Any unset field is unlimited
#[derive(Debug,Default,PartialEq,Eq,Clone,Copy,Serialize,Deserialize)]
pub struct SearchLimits {
    pub depth:      Option<Depth>,
    pub movetime:   Option<Duration>,
    pub nodes:      Option<u64>,
}

impl SearchLimits {

    pub fn depth(depth: Depth) -> Self {
        Self { depth: Some(depth), ..Self::default() }
    }

    pub fn movetime(t: Duration) -> Self {
        Self { movetime: Some(t), ..Self::default() }
    }

    pub fn nodes(n: u64) -> Self {
        Self { nodes: Some(n), ..Self::default() }
    }

    pub fn from_clock(settings: &TimeSettings, side: Color) -> Self {
        Self::movetime(settings.allocate_time(side))
    }

}

#[derive(Debug,Clone)]
pub struct Timer {
    pub limits:     SearchLimits,
    pub init:       Instant,
}

impl Timer {

    pub fn new(limits: SearchLimits) -> Self {
        Self {
            limits,
            init: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.init.elapsed()
    }

    pub fn out_of_time(&self) -> bool {
        match self.limits.movetime {
            Some(t) => self.elapsed() >= t,
            None    => false,
        }
    }

    pub fn out_of_nodes(&self, nodes: u64) -> bool {
        match self.limits.nodes {
            Some(n) => nodes >= n,
            None    => false,
        }
    }

    /// Whether another iteration at `depth` is worth starting
    pub fn should_search(&self, depth: Depth) -> bool {
        if let Some(max) = self.limits.depth {
            if depth > max { return false; }
        }
        if depth <= 1 { return true; }
        match self.limits.movetime {
            // an iteration that can't finish is thrown away
            Some(t) => self.elapsed() < t / 2,
            None    => true,
        }
    }

}
