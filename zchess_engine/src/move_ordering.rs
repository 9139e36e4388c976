
use crate::types::*;
use crate::evaluate::*;

use std::cmp::Ordering;

/// Sort Order:
///     TT move,
///     Captures sorted by MVV/LVA, capture-promotions first
///     Quiet promotions
///     rest, in generation order
pub fn order_moves(xs: &mut [Move], tt_move: Option<Move>) {
    xs.sort_by(|a,b| {
        match (Some(*a) == tt_move, Some(*b) == tt_move) {
            (true,false) => Ordering::Less,
            (false,true) => Ordering::Greater,
            _            => _order_mvv_lva(a, b),
        }
    });
}

pub fn order_mvv_lva(xs: &mut [Move]) {
    xs.sort_by(_order_mvv_lva);
}

pub fn _order_mvv_lva(a: &Move, b: &Move) -> Ordering {
    move_rank(a).cmp(&move_rank(b)).reverse()
}

/// Higher searches earlier
fn move_rank(mv: &Move) -> Score {
    let promo = mv.promotion.map_or(0, |pc| pc.score());
    match mv.captured {
        Some(victim) => 100_000 + victim.score() * 10 - mv.piece.score() / 100 + promo,
        None if mv.promotion.is_some() => 50_000 + promo,
        None => 0,
    }
}
