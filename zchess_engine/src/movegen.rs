
use crate::types::*;
use crate::tables::*;

pub use self::pieces::*;

use rayon::prelude::*;

#[derive(Debug,Eq,PartialEq,Ord,PartialOrd,Clone,Copy)]
pub enum MoveGenType {
    /// Captures, en passant and every promotion
    Captures,
    All,
}

#[derive(Debug,Eq,PartialEq,Clone,Copy)]
pub enum Outcome {
    /// The side that is mated
    Checkmate(Color),
    Stalemate,
    DrawFiftyMove,
    DrawRepetition,
    DrawInsufficientMaterial,
    Ongoing,
}

impl Outcome {
    pub fn is_draw(&self) -> bool {
        !matches!(self, Outcome::Checkmate(_) | Outcome::Ongoing)
    }
}

#[derive(Debug,Clone)]
pub struct MoveGen<'a> {
    ts:       &'a Tables,
    game:     &'a Game,
    side:     Color,
    gen:      MoveGenType,
    buf:      Vec<Move>,
}

impl<'a> MoveGen<'a> {

    pub fn new(ts: &'a Tables, game: &'a Game, gen: MoveGenType) -> Self {
        Self {
            ts,
            game,
            side: game.state.side_to_move,
            gen,
            buf:  Vec::with_capacity(64),
        }
    }

    pub fn generate(mut self) -> Vec<Move> {
        self.gen_pawns();
        self.gen_knights();
        self.gen_sliding(Bishop);
        self.gen_sliding(Rook);
        self.gen_sliding(Queen);
        self.gen_king();
        if self.gen == MoveGenType::All {
            self.gen_castles();
        }
        self.buf
    }

    /// Destinations for a non-pawn piece, filtered by the generation type
    fn targets(&self, moves: BitBoard) -> BitBoard {
        let enemies = self.game.get_color(!self.side);
        match self.gen {
            MoveGenType::Captures => moves & enemies,
            MoveGenType::All      => moves & !self.game.get_color(self.side),
        }
    }

    fn push_to(&mut self, from: Coord, to: Coord, pc: Piece) {
        match self.game.get_piece_at(to, !self.side) {
            Some(victim) => self.buf.push(Move::new_capture(from, to, pc, victim)),
            None         => self.buf.push(Move::new_quiet(from, to, pc)),
        }
    }

}

mod pieces {
    use super::*;

    /// Pawns
    impl<'a> MoveGen<'a> {

        pub fn gen_pawns(&mut self) {
            let occ     = self.game.all_occupied();
            let enemies = self.game.get_color(!self.side);

            let (dir,start_rank,last_rank) = match self.side {
                White => (N,1,7),
                Black => (S,6,0),
            };

            for from in self.game.get(Pawn, self.side) {
                let bb = BitBoard::single(from);

                let caps = self.ts.get_pawn_attacks(from, self.side) & enemies;
                for to in caps {
                    let victim = self.game.get_piece_at(to, !self.side);
                    if to.rank() == last_rank {
                        for pc in Piece::PROMOTIONS {
                            self.buf.push(Move::new_promotion(from, to, victim, pc));
                        }
                    } else if let Some(victim) = victim {
                        self.buf.push(Move::new_capture(from, to, Pawn, victim));
                    }
                }

                if let Some(ep) = self.game.state.en_passant {
                    if self.ts.get_pawn_attacks(from, self.side).is_one_at(ep) {
                        self.buf.push(Move::new_en_passant(from, ep));
                    }
                }

                let push = bb.shift_dir(dir) & !occ;
                if let Some(to) = push.bitscan_safe() {
                    if to.rank() == last_rank {
                        for pc in Piece::PROMOTIONS {
                            self.buf.push(Move::new_promotion(from, to, None, pc));
                        }
                    } else if self.gen == MoveGenType::All {
                        self.buf.push(Move::new_quiet(from, to, Pawn));

                        if from.rank() == start_rank {
                            let double = push.shift_dir(dir) & !occ;
                            if let Some(to2) = double.bitscan_safe() {
                                self.buf.push(Move::new_double_push(from, to2));
                            }
                        }
                    }
                }
            }
        }

    }

    /// Knights
    impl<'a> MoveGen<'a> {

        pub fn gen_knights(&mut self) {
            for from in self.game.get(Knight, self.side) {
                let ms = self.targets(self.ts.get_knight(from));
                for to in ms {
                    self.push_to(from, to, Knight);
                }
            }
        }

    }

    /// Sliding
    impl<'a> MoveGen<'a> {

        pub fn gen_sliding(&mut self, pc: Piece) {
            let occ = self.game.all_occupied();
            for from in self.game.get(pc, self.side) {
                let moves = match pc {
                    Rook   => self.ts.attacks_rook(from, occ),
                    Bishop => self.ts.attacks_bishop(from, occ),
                    _      => self.ts.attacks_queen(from, occ),
                };
                for to in self.targets(moves) {
                    self.push_to(from, to, pc);
                }
            }
        }

    }

    /// King, Castling
    impl<'a> MoveGen<'a> {

        pub fn gen_king(&mut self) {
            if let Some(from) = self.game.get_king(self.side) {
                for to in self.targets(self.ts.get_king(from)) {
                    self.push_to(from, to, King);
                }
            }
        }

        pub fn gen_castles(&mut self) {
            let home = Castling::king_home(self.side);
            if self.game.get(King, self.side).is_zero_at(home) {
                return;
            }

            let (kingside,queenside) = self.game.state.castling.get_color(self.side);
            if !kingside && !queenside {
                return;
            }

            if self.game.is_attacked(self.ts, home, !self.side) {
                return;
            }

            for (allowed,king_side) in [(kingside,true),(queenside,false)] {
                if !allowed { continue; }

                let (rook_from,_) = Castling::rook_squares(self.side, king_side);
                if self.game.get(Rook, self.side).is_zero_at(rook_from) {
                    continue;
                }

                let between = self.ts.between(home, rook_from);
                if (between & self.game.all_occupied()).is_not_empty() {
                    continue;
                }

                let to = Castling::king_target(self.side, king_side);
                let path = self.ts.between(home, to) | BitBoard::single(to);
                if path.into_iter().any(|sq| self.game.is_attacked(self.ts, sq, !self.side)) {
                    continue;
                }

                self.buf.push(Move::new_castle(home, to, king_side));
            }
        }

    }

}

/// Generation
impl Game {

    /// Ignores whether the mover's king is left attacked
    pub fn generate_pseudo_legal(&self, ts: &Tables) -> Vec<Move> {
        MoveGen::new(ts, self, MoveGenType::All).generate()
    }

    pub fn generate_captures(&self, ts: &Tables) -> Vec<Move> {
        MoveGen::new(ts, self, MoveGenType::Captures).generate()
    }

    /// True if `mv` doesn't leave the mover in check
    pub fn move_is_legal(&mut self, ts: &Tables, mv: Move) -> bool {
        let side = self.state.side_to_move;
        self.make_move(ts, mv);
        let ok = !self.in_check(ts, side);
        self.unmake_move(mv);
        ok
    }

    pub fn generate_legal(&mut self, ts: &Tables) -> Vec<Move> {
        let mut moves = self.generate_pseudo_legal(ts);
        moves.retain(|&mv| self.move_is_legal(ts, mv));
        moves
    }

    pub fn outcome(&mut self, ts: &Tables) -> Outcome {
        if self.generate_legal(ts).is_empty() {
            let side = self.state.side_to_move;
            if self.in_check(ts, side) {
                return Outcome::Checkmate(side);
            } else {
                return Outcome::Stalemate;
            }
        }

        if self.state.halfmove >= 100 {
            Outcome::DrawFiftyMove
        } else if self.is_repetition(3) {
            Outcome::DrawRepetition
        } else if self.is_insufficient_material() {
            Outcome::DrawInsufficientMaterial
        } else {
            Outcome::Ongoing
        }
    }

}

/// Perft
impl Game {

    pub fn perft(&mut self, ts: &Tables, depth: Depth) -> u64 {
        if depth <= 0 { return 1; }

        let moves = self.generate_legal(ts);
        if depth == 1 { return moves.len() as u64; }

        let mut sum = 0;
        for mv in moves {
            self.make_move(ts, mv);
            sum += self.perft(ts, depth - 1);
            self.unmake_move(mv);
        }
        sum
    }

    /// Count per root move
    pub fn perft_divide(&mut self, ts: &Tables, depth: Depth) -> Vec<(Move,u64)> {
        let depth = depth.max(1);
        let moves = self.generate_legal(ts);
        let mut out = Vec::with_capacity(moves.len());
        for mv in moves {
            self.make_move(ts, mv);
            out.push((mv, self.perft(ts, depth - 1)));
            self.unmake_move(mv);
        }
        out
    }

    /// Root moves split across the rayon pool, each worker on its own clone
    pub fn perft_par(&self, ts: &Tables, depth: Depth) -> u64 {
        if depth <= 1 {
            return self.clone().perft(ts, depth);
        }
        let moves = self.clone().generate_legal(ts);
        moves.into_par_iter()
            .map(|mv| {
                let mut g = self.clone();
                g.make_move(ts, mv);
                g.perft(ts, depth - 1)
            })
            .sum()
    }

}
