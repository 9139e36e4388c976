
use crate::types::*;
use crate::tables::*;
use crate::evaluate::*;
use crate::searchstats::*;
pub use crate::timer::*;
pub use crate::trans_table::*;

use std::time::Duration;

use arrayvec::ArrayVec;
use crossbeam_channel::{Sender,Receiver,unbounded};
use itertools::Itertools;
use log::{debug,info};
use serde::{Serialize,Deserialize};

pub type PVLine = ArrayVec<Move, { MAX_PLY as usize }>;

/// Bounds the root window, one past any mate score
pub const INF: Score = CHECKMATE_VALUE + 1;

#[derive(Debug,PartialEq,Eq,Clone,Copy,Serialize,Deserialize)]
#[serde(default)]
pub struct ExConfig {
    pub tt_size_mb:       usize,
    pub use_tt:           bool,
    pub detect_draws:     bool,
    /// nodes between polls of the stop flag, clock and node limit
    pub check_interval:   u64,
    pub qsearch:          bool,
    pub max_depth:        Depth,
}

impl Default for ExConfig {
    fn default() -> Self {
        Self {
            tt_size_mb:       16,
            use_tt:           true,
            detect_draws:     true,
            check_interval:   2048,
            qsearch:          cfg!(feature = "qsearch"),
            max_depth:        32,
        }
    }
}

impl ExConfig {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Sent after each completed iteration
#[derive(Debug,PartialEq,Eq,Clone,Serialize,Deserialize)]
pub struct SearchProgress {
    pub depth:       Depth,
    pub score:       Score,
    pub pv:          Vec<Move>,
    pub nodes:       u64,
    pub elapsed:     Duration,
}

#[derive(Debug,PartialEq,Eq,Clone)]
pub struct SearchResult {
    pub best_move:   Option<Move>,
    pub score:       Score,
    /// deepest completed iteration
    pub depth:       Depth,
    pub pv:          Vec<Move>,
    pub stats:       SearchStats,
    pub elapsed:     Duration,
}

#[derive(Debug)]
pub struct Explorer {
    pub game:        Game,
    pub cfg:         ExConfig,
    pub limits:      SearchLimits,
    pub tt:          TransTable,
    pub stop:        Arc<AtomicBool>,
    pub stats:       SearchStats,
    pub timer:       Timer,
    tx:              Option<Sender<SearchProgress>>,
    aborted:         bool,
    can_abort:       bool,
}

/// New
impl Explorer {

    pub fn new(game: Game, cfg: ExConfig, limits: SearchLimits) -> Self {
        Self {
            game,
            cfg,
            limits,
            tt:         TransTable::new(cfg.tt_size_mb),
            stop:       Arc::new(AtomicBool::new(false)),
            stats:      SearchStats::default(),
            timer:      Timer::new(limits),
            tx:         None,
            aborted:    false,
            can_abort:  false,
        }
    }

    crate::builder_field!(limits, SearchLimits);
    crate::builder_field!(stop, Arc<AtomicBool>);

    /// Receives one `SearchProgress` per completed iteration
    pub fn progress_channel(&mut self) -> Receiver<SearchProgress> {
        let (tx,rx) = unbounded();
        self.tx = Some(tx);
        rx
    }

    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Replaces the position and forgets everything learned about the old game
    pub fn new_game(&mut self, game: Game) {
        self.game = game;
        self.tt.clear();
    }

}

/// Entry points
impl Explorer {

    pub fn find_best_move(&mut self, ts: &Tables) -> SearchResult {
        self.timer = Timer::new(self.limits);
        self.stats = SearchStats::default();
        self.aborted = false;
        self.tt.new_search();

        let side = self.game.state.side_to_move;
        let root_moves = self.game.generate_legal(ts);

        if root_moves.is_empty() {
            let score = if self.game.in_check(ts, side) { -CHECKMATE_VALUE } else { DRAW_VALUE };
            debug!("find_best_move: no legal moves, score {}", score);
            return SearchResult {
                best_move:  None,
                score,
                depth:      0,
                pv:         vec![],
                stats:      self.stats,
                elapsed:    self.timer.elapsed(),
            };
        }

        let max_depth = self.limits.depth
            .unwrap_or(self.cfg.max_depth)
            .min(self.cfg.max_depth)
            .clamp(1, MAX_PLY);

        let mut out = SearchResult {
            best_move:  root_moves.first().copied(),
            score:      -INF,
            depth:      0,
            pv:         vec![],
            stats:      self.stats,
            elapsed:    Duration::ZERO,
        };

        for depth in 1..=max_depth {
            if depth > 1 && (self.stop_requested() || !self.timer.should_search(depth)) {
                debug!("find_best_move: not starting depth {}", depth);
                break;
            }

            self.can_abort = depth > 1;
            let mut pv = PVLine::new();
            let score = self.alpha_beta(ts, depth, -INF, INF, 0, &mut pv);

            if self.aborted {
                debug!("find_best_move: depth {} aborted after {} nodes", depth, self.stats.total_nodes());
                break;
            }

            out.best_move = pv.first().copied().or(out.best_move);
            out.score     = score;
            out.depth     = depth;
            out.pv        = pv.to_vec();

            self.report(&out);

            // a mate within the horizon can't be improved on
            if is_mate_score(score) && CHECKMATE_VALUE - score.abs() <= depth as Score {
                break;
            }
        }

        out.stats   = self.stats;
        out.elapsed = self.timer.elapsed();
        out
    }

    fn report(&self, res: &SearchResult) {
        let progress = SearchProgress {
            depth:    res.depth,
            score:    res.score,
            pv:       res.pv.clone(),
            nodes:    self.stats.total_nodes(),
            elapsed:  self.timer.elapsed(),
        };

        info!("depth {:>2} score {:>6} nodes {:>9} time {:.3}s hashfull {} pv {}",
              progress.depth, progress.score, progress.nodes,
              progress.elapsed.as_secs_f64(), self.tt.hashfull(),
              progress.pv.iter().join(" "));

        if let Some(tx) = &self.tx {
            // receiver may be gone, the search doesn't care
            let _ = tx.send(progress);
        }
    }

}

/// Abort checks
impl Explorer {

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Polled once per node, only does work every `check_interval` nodes
    pub(crate) fn check_abort(&mut self) -> bool {
        if self.aborted { return true; }
        if !self.can_abort { return false; }

        let nodes = self.stats.total_nodes();
        if nodes % self.cfg.check_interval.max(1) != 0 {
            return false;
        }

        if self.stop_requested()
            || self.timer.out_of_time()
            || self.timer.out_of_nodes(nodes) {
            self.aborted = true;
        }
        self.aborted
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }

}
