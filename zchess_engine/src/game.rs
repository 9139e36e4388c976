
use crate::types::*;
use crate::tables::*;

pub use self::castling::*;

use log::warn;

#[derive(Default,PartialEq,Eq,Clone)]
pub struct Game {
    pub state:        GameState,
    pub zobrist:      Zobrist,
    undo:             Vec<Undo>,
}

#[derive(Debug,Default,PartialEq,Eq,Hash,Clone,Copy)]
pub struct GameState {
    pub side_to_move:       Color,

    /// [color][piece]
    pub pieces:             [[BitBoard; 6]; 2],
    pub sides:              [BitBoard; 2],
    pub occupied:           BitBoard,

    pub castling:           Castling,
    pub en_passant:         Option<Coord>,

    pub halfmove:           u16,
    pub fullmove:           u16,
}

/// Everything `make_move` overwrites that the move itself can't restore
#[derive(Debug,PartialEq,Eq,Clone,Copy)]
pub struct Undo {
    pub mv:                 Move,
    pub captured:           Option<Piece>,
    pub castling:           Castling,
    pub en_passant:         Option<Coord>,
    pub halfmove:           u16,
    pub fullmove:           u16,
    pub zobrist:            Zobrist,
}

mod castling {
    use crate::types::*;

    #[derive(Debug,Default,Hash,Eq,PartialEq,PartialOrd,Clone,Copy)]
    pub struct Castling(u8);

    impl Castling {

        const WK: u8 = 0b0001;
        const WQ: u8 = 0b0010;
        const BK: u8 = 0b0100;
        const BQ: u8 = 0b1000;

        pub fn get(&self) -> u8 {
            self.0
        }

        pub fn none() -> Self {
            Castling(0)
        }

        pub fn set_king(&mut self, col: Color, b: bool) {
            match (col,b) {
                (White,true)  => { self.0 |= Self::WK; },
                (White,false) => { self.0 &= !Self::WK; },
                (Black,true)  => { self.0 |= Self::BK; },
                (Black,false) => { self.0 &= !Self::BK; },
            }
        }

        pub fn set_queen(&mut self, col: Color, b: bool) {
            match (col,b) {
                (White,true)  => { self.0 |= Self::WQ; },
                (White,false) => { self.0 &= !Self::WQ; },
                (Black,true)  => { self.0 |= Self::BQ; },
                (Black,false) => { self.0 &= !Self::BQ; },
            }
        }

        /// (king side, queen side)
        pub fn get_color(&self, col: Color) -> (bool,bool) {
            match col {
                White => ((self.0 & Self::WK) != 0,(self.0 & Self::WQ) != 0),
                Black => ((self.0 & Self::BK) != 0,(self.0 & Self::BQ) != 0),
            }
        }

        pub fn new_with(w: bool, b: bool) -> Castling {
            let mut out = 0;
            if w { out |= Self::WK | Self::WQ; }
            if b { out |= Self::BK | Self::BQ; }
            Castling(out)
        }

        /// Rights lost by a move touching `c0`, a king or rook leaving its
        /// home square or a rook being captured on it
        fn mask_for(c0: Coord) -> u8 {
            match c0.0 {
                0  => !Self::WQ,
                4  => !(Self::WK | Self::WQ),
                7  => !Self::WK,
                56 => !Self::BQ,
                60 => !(Self::BK | Self::BQ),
                63 => !Self::BK,
                _  => !0,
            }
        }

        #[must_use]
        pub fn update_for_move(&self, from: Coord, to: Coord) -> Castling {
            Castling(self.0 & Self::mask_for(from) & Self::mask_for(to))
        }

        pub fn king_home(col: Color) -> Coord {
            match col {
                White => Coord(4),
                Black => Coord(60),
            }
        }

        /// King destination
        pub fn king_target(col: Color, king_side: bool) -> Coord {
            let k = Self::king_home(col);
            if king_side { Coord(k.0 + 2) } else { Coord(k.0 - 2) }
        }

        /// (rook from, rook to)
        pub fn rook_squares(col: Color, king_side: bool) -> (Coord,Coord) {
            let k = Self::king_home(col);
            if king_side {
                (Coord(k.0 + 3),Coord(k.0 + 1))
            } else {
                (Coord(k.0 - 4),Coord(k.0 - 1))
            }
        }

        pub fn to_fen(&self) -> String {
            let mut out = String::new();
            if self.0 & Self::WK != 0 { out.push('K'); }
            if self.0 & Self::WQ != 0 { out.push('Q'); }
            if self.0 & Self::BK != 0 { out.push('k'); }
            if self.0 & Self::BQ != 0 { out.push('q'); }
            if out.is_empty() { out.push('-'); }
            out
        }

    }

}

/// creation
impl Game {

    pub fn empty() -> Game {
        let mut out = Game::default();
        out.state.castling = Castling::none();
        out.state.fullmove = 1;
        out
    }

    pub fn start_pos(ts: &Tables) -> Game {
        let mut out = Game::empty();
        let back = [Rook,Knight,Bishop,Queen,King,Bishop,Knight,Rook];
        for (f,&pc) in back.iter().enumerate() {
            let f = f as u8;
            out.put_piece(Coord::new(f,0), pc, White);
            out.put_piece(Coord::new(f,1), Pawn, White);
            out.put_piece(Coord::new(f,6), Pawn, Black);
            out.put_piece(Coord::new(f,7), pc, Black);
        }
        out.state.castling = Castling::new_with(true, true);
        out.zobrist = Zobrist::new(ts, &out);
        out
    }

    /// Places pieces with no legality checks, then rehashes from scratch
    pub fn insert_pieces_mut_unchecked<T: Into<Coord> + Copy>(&mut self, ts: &Tables, ps: &[(T,Piece,Color)]) {
        for &(c,pc,col) in ps.iter() {
            self.put_piece(c.into(), pc, col);
        }
        self.zobrist = Zobrist::new(ts, self);
    }

    pub fn recompute_zobrist(&self, ts: &Tables) -> Zobrist {
        Zobrist::new(ts, self)
    }

}

/// get bitboards
impl Game {

    pub fn get(&self, pc: Piece, col: Color) -> BitBoard {
        self.state.pieces[col][pc.index()]
    }

    pub fn get_color(&self, col: Color) -> BitBoard {
        self.state.sides[col]
    }

    pub fn get_piece(&self, pc: Piece) -> BitBoard {
        self.state.pieces[White][pc.index()] | self.state.pieces[Black][pc.index()]
    }

    pub fn all_occupied(&self) -> BitBoard {
        self.state.occupied
    }

    pub fn get_at(&self, c0: Coord) -> Option<(Color,Piece)> {
        if self.state.occupied.is_zero_at(c0) { return None; }
        let col = if self.state.sides[White].is_one_at(c0) { White } else { Black };
        Piece::iter_pieces()
            .find(|&pc| self.get(pc, col).is_one_at(c0))
            .map(|pc| (col,pc))
    }

    pub fn get_piece_at(&self, c0: Coord, col: Color) -> Option<Piece> {
        match self.get_at(c0) {
            Some((c,pc)) if c == col => Some(pc),
            _                        => None,
        }
    }

    pub fn get_king(&self, col: Color) -> Option<Coord> {
        self.get(King, col).bitscan_safe()
    }

    pub fn ply(&self) -> usize {
        self.undo.len()
    }

}

/// insertion and deletion
impl Game {

    fn put_piece(&mut self, c0: Coord, pc: Piece, col: Color) {
        let b = BitBoard::single(c0);
        self.state.pieces[col][pc.index()] |= b;
        self.state.sides[col] |= b;
        self.state.occupied |= b;
    }

    fn take_piece(&mut self, c0: Coord, pc: Piece, col: Color) {
        let b = !BitBoard::single(c0);
        self.state.pieces[col][pc.index()] &= b;
        self.state.sides[col] &= b;
        self.state.occupied &= b;
    }

    fn shift_piece(&mut self, from: Coord, to: Coord, pc: Piece, col: Color) {
        let b = BitBoard::single(from) | BitBoard::single(to);
        self.state.pieces[col][pc.index()] ^= b;
        self.state.sides[col] ^= b;
        self.state.occupied ^= b;
    }

    pub fn insert_piece_mut(&mut self, ts: &Tables, c0: Coord, pc: Piece, col: Color) {
        self.put_piece(c0, pc, col);
        self.zobrist = self.zobrist.update_piece(ts, pc, col, c0);
    }

    pub fn delete_piece_mut(&mut self, ts: &Tables, c0: Coord, pc: Piece, col: Color) {
        self.take_piece(c0, pc, col);
        self.zobrist = self.zobrist.update_piece(ts, pc, col, c0);
    }

    pub fn move_piece_mut(&mut self, ts: &Tables, from: Coord, to: Coord, pc: Piece, col: Color) {
        self.shift_piece(from, to, pc, col);
        self.zobrist = self.zobrist
            .update_piece(ts, pc, col, from)
            .update_piece(ts, pc, col, to);
    }

}

/// make move
impl Game {

    /// Pawn removed by an en passant capture landing on `to`
    pub fn en_passant_victim(to: Coord, side: Color) -> Coord {
        match side {
            White => Coord(to.0 - 8),
            Black => Coord(to.0 + 8),
        }
    }

    /// `mv` must be pseudo-legal for the current position
    pub fn make_move(&mut self, ts: &Tables, mv: Move) {
        let side = self.state.side_to_move;

        self.undo.push(Undo {
            mv,
            captured:   mv.captured,
            castling:   self.state.castling,
            en_passant: self.state.en_passant,
            halfmove:   self.state.halfmove,
            fullmove:   self.state.fullmove,
            zobrist:    self.zobrist,
        });

        if let Some(ep) = self.state.en_passant.take() {
            self.zobrist = self.zobrist.update_ep(ts, ep);
        }

        match mv.flag {
            MoveFlag::EnPassant => {
                let cap = Self::en_passant_victim(mv.to, side);
                self.delete_piece_mut(ts, cap, Pawn, !side);
                self.move_piece_mut(ts, mv.from, mv.to, Pawn, side);
            },
            MoveFlag::CastleKing | MoveFlag::CastleQueen => {
                let (rook_from,rook_to) = Castling::rook_squares(side, mv.flag == MoveFlag::CastleKing);
                self.move_piece_mut(ts, mv.from, mv.to, King, side);
                self.move_piece_mut(ts, rook_from, rook_to, Rook, side);
            },
            MoveFlag::Quiet | MoveFlag::DoublePush => {
                if let Some(victim) = mv.captured {
                    self.delete_piece_mut(ts, mv.to, victim, !side);
                }
                if let Some(new_pc) = mv.promotion {
                    self.delete_piece_mut(ts, mv.from, Pawn, side);
                    self.insert_piece_mut(ts, mv.to, new_pc, side);
                } else {
                    self.move_piece_mut(ts, mv.from, mv.to, mv.piece, side);
                }
            },
        }

        if mv.flag == MoveFlag::DoublePush {
            let ep = Coord((mv.from.0 + mv.to.0) / 2);
            self.state.en_passant = Some(ep);
            self.zobrist = self.zobrist.update_ep(ts, ep);
        }

        let castling = self.state.castling.update_for_move(mv.from, mv.to);
        if castling != self.state.castling {
            self.zobrist = self.zobrist
                .update_castling(ts, self.state.castling)
                .update_castling(ts, castling);
            self.state.castling = castling;
        }

        if mv.is_irreversible() {
            self.state.halfmove = 0;
        } else {
            self.state.halfmove = self.state.halfmove.saturating_add(1);
        }
        if side == Black {
            self.state.fullmove = self.state.fullmove.saturating_add(1);
        }

        self.state.side_to_move = !side;
        self.zobrist = self.zobrist.update_side_to_move(ts);
    }

    /// Reverts the most recent `make_move`, which must have been `mv`
    pub fn unmake_move(&mut self, mv: Move) {
        let u = match self.undo.pop() {
            Some(u) => u,
            None    => {
                warn!("unmake_move with empty undo stack: {}", mv);
                return;
            },
        };
        debug_assert_eq!(u.mv, mv);

        let side = !self.state.side_to_move;

        match mv.flag {
            MoveFlag::EnPassant => {
                self.shift_piece(mv.to, mv.from, Pawn, side);
                self.put_piece(Self::en_passant_victim(mv.to, side), Pawn, !side);
            },
            MoveFlag::CastleKing | MoveFlag::CastleQueen => {
                let (rook_from,rook_to) = Castling::rook_squares(side, mv.flag == MoveFlag::CastleKing);
                self.shift_piece(mv.to, mv.from, King, side);
                self.shift_piece(rook_to, rook_from, Rook, side);
            },
            MoveFlag::Quiet | MoveFlag::DoublePush => {
                if let Some(new_pc) = mv.promotion {
                    self.take_piece(mv.to, new_pc, side);
                    self.put_piece(mv.from, Pawn, side);
                } else {
                    self.shift_piece(mv.to, mv.from, mv.piece, side);
                }
                if let Some(victim) = u.captured {
                    self.put_piece(mv.to, victim, !side);
                }
            },
        }

        self.state.side_to_move = side;
        self.state.castling     = u.castling;
        self.state.en_passant   = u.en_passant;
        self.state.halfmove     = u.halfmove;
        self.state.fullmove     = u.fullmove;
        self.zobrist = u.zobrist;
    }

}

/// history
impl Game {

    /// Earlier positions identical to the current one, looking back no
    /// further than the last capture or pawn move
    pub fn count_repetitions(&self) -> usize {
        let n = (self.state.halfmove as usize).min(self.undo.len());
        self.undo.iter().rev()
            .take(n)
            .skip(1)
            .step_by(2)
            .filter(|u| u.zobrist == self.zobrist)
            .count()
    }

    /// True when the current position has occurred at least `count` times
    pub fn is_repetition(&self, count: usize) -> bool {
        self.count_repetitions() + 1 >= count
    }

    pub fn is_insufficient_material(&self) -> bool {
        if self.get_piece(Pawn).is_not_empty()
            || self.get_piece(Rook).is_not_empty()
            || self.get_piece(Queen).is_not_empty() {
            return false;
        }

        let knights = self.get_piece(Knight);
        let bishops = self.get_piece(Bishop);
        let minors  = knights | bishops;

        if minors.popcount() <= 1 {
            return true;
        }

        knights.is_empty()
            && ((bishops & LIGHT_SQUARES).is_empty() || (bishops & !LIGHT_SQUARES).is_empty())
    }

}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("\n")?;
        for rank in (0..8).rev() {
            let mut line = String::new();
            for file in 0..8 {
                let c = match self.get_at(Coord::new(file, rank)) {
                    Some((col,pc)) => pc.to_char(col),
                    None           => '.',
                };
                line.push(c);
                line.push(' ');
            }
            f.write_str(&format!("{} {}\n", rank + 1, line))?;
        }
        f.write_str("  a b c d e f g h\n")?;
        f.write_str(&format!("{}\n", self.to_fen()))?;
        f.write_str(&format!("zobrist: {:?}\n", self.zobrist))?;
        Ok(())
    }
}
