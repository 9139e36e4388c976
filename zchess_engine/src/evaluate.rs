
use crate::types::*;
use crate::tables::*;
use crate::psqt::piece_square;

use serde::{Serialize,Deserialize};
use derive_more::{Add,Sub,AddAssign,SubAssign,Neg};

pub type Score = i32;

/// 0 = full material, 256 = bare kings
pub type Phase = u16;

pub const CHECKMATE_VALUE: Score = 100_000_000;
pub const DRAW_VALUE: Score      = 0;

pub const PHASE_MAX: Phase = 256;

/// Scores past this are mates, `CHECKMATE_VALUE - mate_score` is the ply count
pub const MATE_THRESHOLD: Score = CHECKMATE_VALUE - 1000;

const DOUBLED_PAWN: TaperedScore   = TaperedScore::new(-10, -20);
const ISOLATED_PAWN: TaperedScore  = TaperedScore::new(-15, -20);
const PASSED_PAWN: [TaperedScore; 8] = [
    TaperedScore::new(0, 0),
    TaperedScore::new(5, 10),
    TaperedScore::new(10, 20),
    TaperedScore::new(15, 35),
    TaperedScore::new(25, 60),
    TaperedScore::new(40, 100),
    TaperedScore::new(60, 150),
    TaperedScore::new(0, 0),
];
const PAWN_SHIELD: [TaperedScore; 2] = [
    TaperedScore::new(15, 0),
    TaperedScore::new(8, 0),
];
const ROOK_OPEN_FILE: TaperedScore      = TaperedScore::new(25, 10);
const ROOK_SEMIOPEN_FILE: TaperedScore  = TaperedScore::new(12, 6);
const BISHOP_PAIR: TaperedScore         = TaperedScore::new(30, 50);

#[derive(Serialize,Deserialize,Debug,Default,Eq,PartialEq,PartialOrd,Clone,Copy,
         Add,Sub,AddAssign,SubAssign,Neg)]
pub struct TaperedScore {
    pub mid: Score,
    pub end: Score,
}

impl TaperedScore {
    pub const fn new(mid: Score, end: Score) -> Self {
        Self { mid, end }
    }

    #[must_use]
    pub fn scale(&self, n: Score) -> Self {
        Self::new(self.mid * n, self.end * n)
    }

    pub fn taper(&self, phase: Phase) -> Score {
        let phase = phase.min(PHASE_MAX) as Score;
        let max   = PHASE_MAX as Score;
        (self.mid * (max - phase) + self.end * phase) / max
    }
}

/// Each term is White minus Black
#[derive(Serialize,Deserialize,Debug,Default,Eq,PartialEq,Clone,Copy)]
pub struct Eval {
    pub phase:            Phase,
    pub material:         TaperedScore,
    pub piece_positions:  TaperedScore,
    pub pawn_structure:   TaperedScore,
    pub king_safety:      TaperedScore,
    pub rooks:            TaperedScore,
}

impl Eval {

    pub fn sum_white(&self) -> Score {
        let total = self.material
            + self.piece_positions
            + self.pawn_structure
            + self.king_safety
            + self.rooks;
        total.taper(self.phase)
    }

    /// From `side`'s point of view
    pub fn sum(&self, side: Color) -> Score {
        side.fold(self.sum_white())
    }

}

/// Positive favors the side to move
pub fn evaluate(g: &Game, ts: &Tables) -> Score {
    g.evaluate(ts).sum(g.state.side_to_move)
}

/// Main Evaluation
impl Game {

    pub fn evaluate(&self, ts: &Tables) -> Eval {
        let mut out = Eval::default();
        out.phase = self.game_phase();

        for col in Color::iter() {
            let mat = self.score_material(col);
            let pos = self.score_positions(col);
            let pawns = self.score_pawns(ts, col);
            let king = self.score_king_safety(ts, col);
            let rooks = self.score_rooks(col);

            if col == White {
                out.material        += mat;
                out.piece_positions += pos;
                out.pawn_structure  += pawns;
                out.king_safety     += king;
                out.rooks           += rooks;
            } else {
                out.material        -= mat;
                out.piece_positions -= pos;
                out.pawn_structure  -= pawns;
                out.king_safety     -= king;
                out.rooks           -= rooks;
            }
        }

        out
    }

    pub fn game_phase(&self) -> Phase {
        const KNIGHT_PH: Phase = 1;
        const BISHOP_PH: Phase = 1;
        const ROOK_PH: Phase   = 2;
        const QUEEN_PH: Phase  = 4;

        let ph_total = KNIGHT_PH * 4 + BISHOP_PH * 4 + ROOK_PH * 4 + QUEEN_PH * 2;

        let present = self.get_piece(Knight).popcount() as Phase * KNIGHT_PH
            + self.get_piece(Bishop).popcount() as Phase * BISHOP_PH
            + self.get_piece(Rook).popcount() as Phase * ROOK_PH
            + self.get_piece(Queen).popcount() as Phase * QUEEN_PH;

        let ph = ph_total.saturating_sub(present);

        ((ph * PHASE_MAX + (ph_total / 2)) / ph_total).min(PHASE_MAX)
    }

}

/// Terms, each from `col`'s point of view
impl Game {

    pub fn score_material(&self, col: Color) -> TaperedScore {
        let mut out = TaperedScore::default();
        for pc in Piece::iter_pieces() {
            if pc == King { continue; }
            let n = self.get(pc, col).popcount() as Score;
            out += TaperedScore::new(pc.score(), pc.score()).scale(n);
        }
        if self.get(Bishop, col).more_than_one() {
            out += BISHOP_PAIR;
        }
        out
    }

    pub fn score_positions(&self, col: Color) -> TaperedScore {
        let mut out = TaperedScore::default();
        #[cfg(feature = "positional_scoring")]
        for pc in Piece::iter_pieces() {
            for sq in self.get(pc, col) {
                out += piece_square(pc, col, sq);
            }
        }
        out
    }

    pub fn score_pawns(&self, ts: &Tables, col: Color) -> TaperedScore {
        let mut out = TaperedScore::default();
        let pawns  = self.get(Pawn, col);
        let enemy  = self.get(Pawn, !col);

        for f in 0..8 {
            let n = (pawns & BitBoard::mask_file(f)).popcount() as Score;
            if n > 1 {
                out += DOUBLED_PAWN.scale(n - 1);
            }
        }

        for sq in pawns {
            if (pawns & ts.adjacent_files[sq.file() as usize]).is_empty() {
                out += ISOLATED_PAWN;
            }

            let blockers = ts.passed_masks[col][sq] & enemy;
            // the rearmost of doubled pawns isn't passed
            let own_ahead = BitBoard::single(sq).front_span(col) & pawns;
            if blockers.is_empty() && own_ahead.is_empty() {
                out += PASSED_PAWN[sq.relative_rank(col) as usize];
            }
        }

        out
    }

    /// Pawn shield on the two ranks in front of a king still on its back ranks
    pub fn score_king_safety(&self, ts: &Tables, col: Color) -> TaperedScore {
        let mut out = TaperedScore::default();
        let king = match self.get_king(col) {
            Some(k) => k,
            None    => return out,
        };

        let rr = king.relative_rank(col);
        if rr > 1 {
            return out;
        }

        let files = BitBoard::mask_file(king.file()) | ts.adjacent_files[king.file() as usize];
        let pawns = self.get(Pawn, col) & files;

        for (i,shield) in PAWN_SHIELD.iter().enumerate() {
            let r = rr as usize + 1 + i;
            let rank = match col {
                White => r as u8,
                Black => 7 - r as u8,
            };
            let n = (pawns & BitBoard::mask_rank(rank)).popcount() as Score;
            out += shield.scale(n);
        }

        out
    }

    pub fn score_rooks(&self, col: Color) -> TaperedScore {
        let mut out = TaperedScore::default();
        let own   = self.get(Pawn, col);
        let enemy = self.get(Pawn, !col);
        for sq in self.get(Rook, col) {
            let file = BitBoard::mask_file(sq.file());
            if (file & own).is_empty() {
                if (file & enemy).is_empty() {
                    out += ROOK_OPEN_FILE;
                } else {
                    out += ROOK_SEMIOPEN_FILE;
                }
            }
        }
        out
    }

}

impl Piece {
    pub fn score(&self) -> Score {
        match self {
            Pawn   => 100,
            Knight => 320,
            Bishop => 330,
            Rook   => 500,
            Queen  => 900,
            King   => 20_000,
        }
    }
}

pub fn is_mate_score(s: Score) -> bool {
    s.abs() >= MATE_THRESHOLD
}
