
use crate::types::*;
use crate::tables::*;

/// Attacks
impl Game {

    /// Every `by` piece attacking `c0` under the current occupancy
    pub fn attackers_to(&self, ts: &Tables, c0: Coord, by: Color) -> BitBoard {
        let occ = self.all_occupied();

        let pawns   = ts.get_pawn_attacks(c0, !by) & self.get(Pawn, by);
        let knights = ts.get_knight(c0) & self.get(Knight, by);
        let kings   = ts.get_king(c0) & self.get(King, by);

        let queens  = self.get(Queen, by);
        let diag    = ts.attacks_bishop(c0, occ) & (self.get(Bishop, by) | queens);
        let ortho   = ts.attacks_rook(c0, occ) & (self.get(Rook, by) | queens);

        pawns | knights | kings | diag | ortho
    }

    pub fn is_attacked(&self, ts: &Tables, c0: Coord, by: Color) -> bool {
        self.attackers_to(ts, c0, by).is_not_empty()
    }

    pub fn in_check(&self, ts: &Tables, side: Color) -> bool {
        match self.get_king(side) {
            Some(k) => self.is_attacked(ts, k, !side),
            None    => false,
        }
    }

}
