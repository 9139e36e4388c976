
use crate::types::*;
use crate::tables::*;
use crate::evaluate::*;
use crate::explore::*;
use crate::alphabeta::fail_hard;
use crate::move_ordering::*;

use log::trace;

/// Quiescence
impl Explorer {

    /// alpha = the MINimum score that the side to move is assured of
    /// beta  = the MAXimum score that the opponent allows
    pub fn qsearch(
        &mut self,
        ts:             &Tables,
        mut alpha:      Score,
        beta:           Score,
        ply:            Depth,
    ) -> Score {
        trace!("qsearch, ply {}, a/b: {:?},{:?}", ply, alpha, beta);

        self.stats.qnodes += 1;
        stats!(self.stats.max_ply = self.stats.max_ply.max(ply as u16));

        if self.check_abort() {
            return 0;
        }

        let side = self.game.state.side_to_move;

        if self.game.in_check(ts, side) {
            return self.qsearch_evasions(ts, alpha, beta, ply);
        }

        let stand_pat = evaluate(&self.game, ts);

        if stand_pat >= beta {
            trace!("qsearch returning beta 0: {:?}, sp = {}", beta, stand_pat);
            return beta;
        }

        if stand_pat > alpha {
            alpha = stand_pat;
        }

        if ply >= MAX_PLY {
            return alpha;
        }

        let mut moves = self.game.generate_captures(ts);
        order_mvv_lva(&mut moves);

        for mv in moves {
            self.game.make_move(ts, mv);
            if self.game.in_check(ts, side) {
                self.game.unmake_move(mv);
                continue;
            }
            let score = -self.qsearch(ts, -beta, -alpha, ply + 1);
            self.game.unmake_move(mv);

            if self.aborted() {
                return 0;
            }

            if score >= beta {
                trace!("qsearch returning beta 1: {:?}", beta);
                return beta;
            }

            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    /// In check: no stand pat, every legal reply is searched
    fn qsearch_evasions(
        &mut self,
        ts:             &Tables,
        mut alpha:      Score,
        beta:           Score,
        ply:            Depth,
    ) -> Score {
        let mut moves = self.game.generate_legal(ts);

        if moves.is_empty() {
            trace!("qsearch checkmate");
            stats!(self.stats.checkmates += 1);
            return fail_hard(-(CHECKMATE_VALUE - ply as Score), alpha, beta);
        }

        if ply >= MAX_PLY {
            return fail_hard(evaluate(&self.game, ts), alpha, beta);
        }

        order_moves(&mut moves, None);

        for mv in moves {
            self.game.make_move(ts, mv);
            let score = -self.qsearch(ts, -beta, -alpha, ply + 1);
            self.game.unmake_move(mv);

            if self.aborted() {
                return 0;
            }

            if score >= beta {
                return beta;
            }

            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

}
