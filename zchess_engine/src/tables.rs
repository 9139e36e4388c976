
use crate::types::*;
use crate::magics::*;

use lazy_static::lazy_static;
use log::debug;
use rand::{prelude::StdRng,SeedableRng};

lazy_static! {
    /// Built on first use, read-only afterward
    pub static ref _TABLES: Tables = Tables::new();
}

#[derive(Debug,Clone)]
pub struct Tables {
    pub knight_moves:    [BitBoard; 64],
    pub king_moves:      [BitBoard; 64],
    pub pawn_attacks:    [[BitBoard; 64]; 2],

    /// [direction][square], excluding the origin
    pub rays:            [[BitBoard; 64]; 8],
    between:             Vec<BitBoard>,

    pub magics_rook:     [Magic; 64],
    pub magics_bishop:   [Magic; 64],
    pub table_rook:      Vec<BitBoard>,
    pub table_bishop:    Vec<BitBoard>,

    pub zobrist_tables:  ZbTable,

    /// squares that must be free of enemy pawns for a pawn to be passed
    pub passed_masks:    [[BitBoard; 64]; 2],
    pub adjacent_files:  [BitBoard; 8],
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

/// creation
impl Tables {

    pub fn new() -> Self {
        let t0 = std::time::Instant::now();

        let rays = Self::gen_rays();

        let mut rng: StdRng = SeedableRng::seed_from_u64(1234u64);
        let (magics_bishop, table_bishop) = gen_magics(&mut rng, true);
        let (magics_rook, table_rook)     = gen_magics(&mut rng, false);

        let adjacent_files = array_init::array_init(|f: usize| {
            let mut b = BitBoard::empty();
            if f > 0 { b |= BitBoard::mask_file(f as u8 - 1); }
            if f < 7 { b |= BitBoard::mask_file(f as u8 + 1); }
            b
        });

        let out = Self {
            knight_moves:   array_init::array_init(|sq| Self::gen_knight_move(Coord::new_int(sq as u8))),
            king_moves:     array_init::array_init(|sq| Self::gen_king_move(Coord::new_int(sq as u8))),
            pawn_attacks:   [Self::gen_pawn_attacks(White), Self::gen_pawn_attacks(Black)],
            between:        Self::gen_between(&rays),
            rays,
            magics_rook,
            magics_bishop,
            table_rook,
            table_bishop,
            zobrist_tables: ZbTable::new(),
            passed_masks:   [
                Self::gen_passed_masks(White, &adjacent_files),
                Self::gen_passed_masks(Black, &adjacent_files),
            ],
            adjacent_files,
        };

        debug!("Tables::new: {:.3}s, attack tables {} rook + {} bishop",
               t0.elapsed().as_secs_f64(), out.table_rook.len(), out.table_bishop.len());

        out
    }

    fn gen_knight_move(c0: Coord) -> BitBoard {
        let b = BitBoard::single(c0);
        let not_a  = !BitBoard::mask_file(0).0;
        let not_h  = !BitBoard::mask_file(7).0;
        let not_ab = !(BitBoard::mask_file(0) | BitBoard::mask_file(1)).0;
        let not_gh = !(BitBoard::mask_file(6) | BitBoard::mask_file(7)).0;

        let l1 = (b.0 >> 1) & not_h;
        let l2 = (b.0 >> 2) & not_gh;
        let r1 = (b.0 << 1) & not_a;
        let r2 = (b.0 << 2) & not_ab;

        let h1 = l1 | r1;
        let h2 = l2 | r2;

        BitBoard((h1 << 16) | (h1 >> 16) | (h2 << 8) | (h2 >> 8))
    }

    fn gen_king_move(c0: Coord) -> BitBoard {
        let b = BitBoard::single(c0);
        D::ALL.iter().fold(BitBoard::empty(), |acc, &d| acc | b.shift_dir(d))
    }

    fn gen_pawn_attacks(col: Color) -> [BitBoard; 64] {
        array_init::array_init(|sq| {
            let b = BitBoard::single(Coord::new_int(sq as u8));
            match col {
                White => b.shift_dir(NE) | b.shift_dir(NW),
                Black => b.shift_dir(SE) | b.shift_dir(SW),
            }
        })
    }

    fn gen_rays() -> [[BitBoard; 64]; 8] {
        array_init::array_init(|d| {
            let d = D::ALL[d];
            array_init::array_init(|sq| {
                let mut out = BitBoard::empty();
                let mut c1 = Coord::new_int(sq as u8);
                while let Some(c2) = d.shift_coord(c1) {
                    out.set_one_mut(c2);
                    c1 = c2;
                }
                out
            })
        })
    }

    fn gen_between(rays: &[[BitBoard; 64]; 8]) -> Vec<BitBoard> {
        let mut out = vec![BitBoard::empty(); 64 * 64];
        for c0 in 0..64u8 {
            let c0 = Coord::new_int(c0);
            for d in D::ALL.iter() {
                let ray = rays[d.index()][c0];
                for c1 in ray {
                    out[c0.index() * 64 + c1.index()] =
                        ray & !rays[d.index()][c1] & !BitBoard::single(c1);
                }
            }
        }
        out
    }

    fn gen_passed_masks(col: Color, adjacent_files: &[BitBoard; 8]) -> [BitBoard; 64] {
        array_init::array_init(|sq| {
            let c0 = Coord::new_int(sq as u8);
            let files = BitBoard::mask_file(c0.file()) | adjacent_files[c0.file() as usize];
            let ahead = BitBoard::mask_rank(c0.rank()).front_span(col);
            files & ahead
        })
    }

}

/// get
impl Tables {

    pub fn get_knight(&self, c0: Coord) -> BitBoard {
        self.knight_moves[c0]
    }

    pub fn get_king(&self, c0: Coord) -> BitBoard {
        self.king_moves[c0]
    }

    /// Squares a `col` pawn on `c0` attacks
    pub fn get_pawn_attacks(&self, c0: Coord, col: Color) -> BitBoard {
        self.pawn_attacks[col][c0]
    }

    pub fn get_ray(&self, d: D, c0: Coord) -> BitBoard {
        self.rays[d.index()][c0]
    }

    /// Squares strictly between two squares on a shared line, empty otherwise
    pub fn between(&self, c0: Coord, c1: Coord) -> BitBoard {
        self.between[c0.index() * 64 + c1.index()]
    }

}
