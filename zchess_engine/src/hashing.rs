
use crate::types::*;
use crate::tables::*;

use serde::{Serialize,Deserialize};
use rand::{Rng,SeedableRng};
use rand::prelude::StdRng;

#[derive(Hash,Eq,PartialEq,Ord,PartialOrd,Clone,Copy,Default,Serialize,Deserialize)]
pub struct Zobrist(pub u64);

impl Zobrist {

    /// From scratch, the incremental updates below must always agree with this
    pub fn new(ts: &Tables, g: &Game) -> Self {
        let mut out = Zobrist(0);

        for col in Color::iter() {
            for pc in Piece::iter_pieces() {
                for sq in g.get(pc,col) {
                    out = out.update_piece(ts, pc, col, sq);
                }
            }
        }

        if g.state.side_to_move == Black { out = out.update_side_to_move(ts); }

        out = out.update_castling(ts, g.state.castling);

        if let Some(ep) = g.state.en_passant {
            out = out.update_ep(ts, ep);
        }

        out
    }

    #[must_use]
    pub fn update_side_to_move(&self, ts: &Tables) -> Self {
        Self(self.0 ^ ts.zobrist_tables.black_to_move)
    }

    /// Xor in or out the key for one complete castling-rights state
    #[must_use]
    pub fn update_castling(&self, ts: &Tables, c: Castling) -> Self {
        Self(self.0 ^ ts.zobrist_tables.castling[c.get() as usize])
    }

    #[must_use]
    pub fn update_ep(&self, ts: &Tables, c0: Coord) -> Self {
        Self(self.0 ^ ts.zobrist_tables.en_passant[c0.file() as usize])
    }

    #[must_use]
    pub fn update_piece(&self, ts: &Tables, pc: Piece, col: Color, c0: Coord) -> Self {
        Self(self.0 ^ ts.zobrist_tables.pieces[col][pc.index()][c0])
    }

}

#[derive(Debug,Eq,PartialEq,PartialOrd,Clone,Copy)]
pub struct ZbTable {
    pub pieces:        [[[u64; 64]; 6]; 2],
    pub black_to_move: u64,
    pub castling:      [u64; 16],
    pub en_passant:    [u64; 8],
}

impl Default for ZbTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ZbTable {

    /// Fixed seed, keys are identical across runs
    pub fn new() -> ZbTable {

        let mut rng: StdRng = SeedableRng::seed_from_u64(18105974836011991331);

        use array_init::array_init;
        let pieces = array_init(|_| {
            array_init(|_| {
                array_init(|_| rng.gen())
            })
        });

        let castling = array_init(|_| rng.gen());
        let en_passant = array_init(|_| rng.gen());

        ZbTable {
            pieces,
            black_to_move: rng.gen(),
            castling,
            en_passant,
        }
    }

}

impl std::fmt::Debug for Zobrist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("{:#018x}", self.0))
    }
}
