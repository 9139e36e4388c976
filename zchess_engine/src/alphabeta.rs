
use crate::types::*;
use crate::tables::*;
use crate::evaluate::*;
use crate::explore::*;
use crate::move_ordering::*;

use log::trace;

/// Negamax, fail-hard: the result always lies in [alpha, beta]
impl Explorer {

    pub fn alpha_beta(
        &mut self,
        ts:             &Tables,
        depth:          Depth,
        mut alpha:      Score,
        beta:           Score,
        ply:            Depth,
        pv:             &mut PVLine,
    ) -> Score {
        pv.clear();

        if depth <= 0 {
            return self.leaf(ts, alpha, beta, ply);
        }

        self.stats.nodes += 1;
        if self.check_abort() {
            return 0;
        }

        let root = ply == 0;
        let side = self.game.state.side_to_move;

        if !root && self.cfg.detect_draws && self.game.is_repetition(2) {
            stats!(self.stats.draws += 1);
            return fail_hard(DRAW_VALUE, alpha, beta);
        }

        let zb = self.game.zobrist;
        let mut tt_move = None;

        if self.cfg.use_tt {
            match self.tt.probe(zb, ply) {
                Some(entry) => {
                    stats!(self.stats.tt_hits += 1);
                    tt_move = entry.best_move;
                    if !root && entry.can_cutoff(depth, alpha, beta) {
                        stats!(self.stats.tt_cutoffs += 1);
                        trace!("alpha_beta: tt cutoff, ply {}, {:?}", ply, entry);
                        return fail_hard(entry.score, alpha, beta);
                    }
                },
                None => {
                    stats!(self.stats.tt_misses += 1);
                },
            }
        }

        let mut moves = self.game.generate_legal(ts);

        if moves.is_empty() {
            stats!(self.stats.leaves += 1);
            if self.game.in_check(ts, side) {
                stats!(self.stats.checkmates += 1);
                return fail_hard(-(CHECKMATE_VALUE - ply as Score), alpha, beta);
            } else {
                stats!(self.stats.stalemates += 1);
                return fail_hard(DRAW_VALUE, alpha, beta);
            }
        }

        if !root && self.cfg.detect_draws
            && (self.game.state.halfmove >= 100 || self.game.is_insufficient_material()) {
            stats!(self.stats.draws += 1);
            return fail_hard(DRAW_VALUE, alpha, beta);
        }

        order_moves(&mut moves, tt_move);

        let mut best_move = None;
        let mut node      = Node::All;
        let mut child_pv  = PVLine::new();

        for mv in moves {
            self.game.make_move(ts, mv);
            let score = -self.alpha_beta(ts, depth - 1, -beta, -alpha, ply + 1, &mut child_pv);
            self.game.unmake_move(mv);

            if self.aborted() {
                return 0;
            }

            if score >= beta {
                stats!(self.stats.beta_cutoffs += 1);
                trace!("alpha_beta: beta cutoff, ply {}, {} >= {}, mv {}", ply, score, beta, mv);
                if self.cfg.use_tt {
                    self.tt.store(zb, Some(mv), beta, depth, Node::Cut, ply);
                }
                return beta;
            }

            if score > alpha {
                alpha     = score;
                best_move = Some(mv);
                node      = Node::PV;

                pv.clear();
                let _ = pv.try_push(mv);
                let _ = pv.try_extend_from_slice(&child_pv);
            }
        }

        if self.cfg.use_tt {
            self.tt.store(zb, best_move, alpha, depth, node, ply);
        }

        alpha
    }

    /// Depth exhausted
    pub fn leaf(&mut self, ts: &Tables, alpha: Score, beta: Score, ply: Depth) -> Score {
        if self.cfg.qsearch {
            self.qsearch(ts, alpha, beta, ply)
        } else {
            self.stats.qnodes += 1;
            stats!(self.stats.leaves += 1);
            fail_hard(self.static_score(ts, ply), alpha, beta)
        }
    }

    /// Evaluation with mate and stalemate detection, used by the unpruned leaf
    pub(crate) fn static_score(&mut self, ts: &Tables, ply: Depth) -> Score {
        let side = self.game.state.side_to_move;
        if self.game.generate_legal(ts).is_empty() {
            if self.game.in_check(ts, side) {
                return -(CHECKMATE_VALUE - ply as Score);
            }
            return DRAW_VALUE;
        }
        evaluate(&self.game, ts)
    }

}

/// Minimax
impl Explorer {

    /// Exhaustive negamax with the same terminal, draw and leaf rules as
    /// `alpha_beta`, without pruning or the TT
    pub fn minimax(&mut self, ts: &Tables, depth: Depth, ply: Depth) -> Score {
        if depth <= 0 {
            return self.leaf(ts, -INF, INF, ply);
        }

        self.stats.nodes += 1;

        if ply > 0 && self.cfg.detect_draws && self.game.is_repetition(2) {
            return DRAW_VALUE;
        }

        let side  = self.game.state.side_to_move;
        let moves = self.game.generate_legal(ts);

        if moves.is_empty() {
            if self.game.in_check(ts, side) {
                return -(CHECKMATE_VALUE - ply as Score);
            }
            return DRAW_VALUE;
        }

        if ply > 0 && self.cfg.detect_draws
            && (self.game.state.halfmove >= 100 || self.game.is_insufficient_material()) {
            return DRAW_VALUE;
        }

        let mut best = -INF;
        for mv in moves {
            self.game.make_move(ts, mv);
            let score = -self.minimax(ts, depth - 1, ply + 1);
            self.game.unmake_move(mv);
            best = best.max(score);
        }
        best
    }

}

pub fn fail_hard(score: Score, alpha: Score, beta: Score) -> Score {
    score.max(alpha).min(beta)
}
