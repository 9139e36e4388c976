
use crate::types::*;
use crate::tables::*;
use crate::movegen::*;
use crate::parsing::STARTPOS;
use crate::evaluate::*;
use crate::explore::*;

use std::time::Duration;

use rand::{Rng,SeedableRng};
use rand::prelude::StdRng;

const FEN_KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const FEN_POS3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const FEN_POS4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const FEN_POS5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .is_test(true)
        .try_init();
}

fn game(fen: &str) -> Game {
    Game::from_fen(&_TABLES, fen).unwrap()
}

fn explorer(g: Game, cfg: ExConfig, depth: Depth) -> Explorer {
    Explorer::new(g, cfg, SearchLimits::depth(depth))
}

fn no_tt() -> ExConfig {
    ExConfig { use_tt: false, ..ExConfig::default() }
}

/// Same position with colors swapped and the board flipped top to bottom
fn mirror(g: &Game) -> Game {
    let mut ps = vec![];
    for c0 in g.all_occupied() {
        if let Some((col,pc)) = g.get_at(c0) {
            ps.push((c0.flip_vertical(), pc, !col));
        }
    }
    let mut out = Game::empty();
    out.state.side_to_move = !g.state.side_to_move;
    out.insert_pieces_mut_unchecked(&_TABLES, &ps);
    out
}

// perft

fn check_perft(fen: &str, expected: &[u64]) {
    let ts = &_TABLES;
    let mut g = game(fen);
    for (d,&n) in expected.iter().enumerate() {
        let depth = d as Depth + 1;
        assert_eq!(g.perft(ts, depth), n, "perft {} at depth {}", fen, depth);
    }
}

#[test]
fn test_perft_startpos() {
    check_perft(STARTPOS, &[20, 400, 8902, 197281]);
}

#[test]
fn test_perft_startpos_5_par() {
    let ts = &_TABLES;
    let g = Game::start_pos(ts);
    assert_eq!(g.perft_par(ts, 5), 4_865_609);
}

#[test]
fn test_perft_kiwipete() {
    check_perft(FEN_KIWIPETE, &[48, 2039, 97862]);
}

#[test]
fn test_perft_pos3() {
    check_perft(FEN_POS3, &[14, 191, 2812, 43238]);
}

#[test]
fn test_perft_pos4() {
    check_perft(FEN_POS4, &[6, 264, 9467]);
}

#[test]
fn test_perft_pos5() {
    check_perft(FEN_POS5, &[44, 1486, 62379]);
}

#[test]
fn test_perft_divide_sums() {
    let ts = &_TABLES;
    let mut g = game(FEN_KIWIPETE);
    let div = g.perft_divide(ts, 3);
    assert_eq!(div.len(), 48);
    assert_eq!(div.iter().map(|(_,n)| n).sum::<u64>(), 97862);
    assert_eq!(g.perft_par(ts, 3), 97862);
}

// board

fn walk_make_unmake(ts: &Tables, g: &mut Game, depth: Depth) {
    if depth == 0 { return; }
    for mv in g.generate_legal(ts) {
        let before = g.clone();
        g.make_move(ts, mv);
        assert_eq!(g.zobrist, g.recompute_zobrist(ts), "hash drift after {} from {:?}", mv, before);
        walk_make_unmake(ts, g, depth - 1);
        g.unmake_move(mv);
        assert_eq!(*g, before, "unmake {} did not restore", mv);
    }
}

#[test]
fn test_make_unmake_restores() {
    let ts = &_TABLES;
    for fen in [STARTPOS, FEN_KIWIPETE, FEN_POS3, FEN_POS4, FEN_POS5] {
        let mut g = game(fen);
        walk_make_unmake(ts, &mut g, 3);
    }
}

#[test]
fn test_hash_transposition() {
    let ts = &_TABLES;
    let mut g0 = Game::start_pos(ts);
    let mut g1 = Game::start_pos(ts);
    g0.run_moves(ts, ["g1f3", "g8f6", "b1c3"]).unwrap();
    g1.run_moves(ts, ["b1c3", "g8f6", "g1f3"]).unwrap();
    assert_eq!(g0.zobrist, g1.zobrist);

    g0.run_moves(ts, ["e7e5"]).unwrap();
    g1.run_moves(ts, ["e7e6"]).unwrap();
    assert_ne!(g0.zobrist, g1.zobrist);
}

#[test]
fn test_start_pos_matches_fen() {
    let ts = &_TABLES;
    let g = Game::start_pos(ts);
    assert_eq!(g, game(STARTPOS));
    assert_eq!(g.to_fen(), STARTPOS);
}

#[test]
fn test_fen_roundtrip() {
    let fens = [
        STARTPOS,
        FEN_KIWIPETE,
        FEN_POS3,
        FEN_POS4,
        FEN_POS5,
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
        "4k3/8/8/8/8/8/8/4K2R b K - 12 40",
    ];
    for fen in fens {
        assert_eq!(game(fen).to_fen(), fen);
    }
}

#[test]
fn test_fen_en_passant_accepted() {
    let g = game("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1");
    assert_eq!(g.state.en_passant, Some("e3".into()));

    let g = game("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    assert_eq!(g.state.en_passant, Some("f6".into()));
}

#[test]
fn test_clock_saturates() {
    let ts = &_TABLES;
    let fen = "4k3/8/8/8/8/8/8/4K2R b - - 65535 65535";
    let mut g = game(fen);
    let g0 = g.clone();

    let mv = g.parse_move(ts, "e8d8").unwrap();
    g.make_move(ts, mv);
    assert_eq!(g.state.halfmove, u16::MAX);
    assert_eq!(g.state.fullmove, u16::MAX);

    g.unmake_move(mv);
    assert_eq!(g, g0);
    assert_eq!(g.to_fen(), fen);
}

#[test]
fn test_fen_clock_defaults() {
    let g = game("8/8/8/4k3/8/8/8/4K3 w - -");
    assert_eq!(g.state.halfmove, 0);
    assert_eq!(g.state.fullmove, 1);
    assert_eq!(g.to_fen(), "8/8/8/4k3/8/8/8/4K3 w - - 0 1");
}

#[test]
fn test_fen_errors() {
    let ts = &_TABLES;
    let cases = [
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1", "placement"),
        ("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "placement"),
        ("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "placement"),
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1", "side"),
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KX - 0 1", "castling"),
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e5 0 1", "ep"),
        ("4k3/8/8/8/8/8/3P4/4K3 w - e3 0 1", "ep"),
        ("4k3/8/8/8/8/8/8/4K3 w - e6 0 1", "ep"),
        ("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1", "ep"),
        ("4k3/4p3/8/4p3/8/8/8/4K3 w - e6 0 1", "ep"),
        ("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1", "ep"),
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w -- - 0 1", "castling"),
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KKq - 0 1", "castling"),
        ("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1", "check"),
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - a 1", "clock"),
        ("8/8/8/8/8/8/8/8 w - - 0 1", "kings"),
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra", "trailing"),
        ("", "placement"),
    ];
    for (fen,kind) in cases {
        let err = Game::from_fen(ts, fen).unwrap_err();
        let ok = match kind {
            "placement" => matches!(err, ParseError::BadPlacement(_)),
            "side"      => matches!(err, ParseError::BadSide(_)),
            "castling"  => matches!(err, ParseError::BadCastling(_)),
            "ep"        => matches!(err, ParseError::BadEnPassant(_)),
            "clock"     => matches!(err, ParseError::BadClock(_)),
            "kings"     => matches!(err, ParseError::KingCount { white: 0, black: 0 }),
            "check"     => matches!(err, ParseError::WaitingSideInCheck(Black)),
            "trailing"  => matches!(err, ParseError::TrailingInput(_)),
            _           => false,
        };
        assert!(ok, "{:?} gave {:?}", fen, err);
    }
}

#[test]
fn test_run_moves_stops_at_illegal() {
    let ts = &_TABLES;
    let mut g = Game::start_pos(ts);
    let err = g.run_moves(ts, ["e2e4", "e7e5", "e2e4", "g1f3"]).unwrap_err();
    match err {
        MoveError::Replay { index, token, source } => {
            assert_eq!(index, 2);
            assert_eq!(token, "e2e4");
            assert!(matches!(*source, MoveError::Illegal(_)));
        },
        e => panic!("wrong error: {:?}", e),
    }
    assert_eq!(g.ply(), 2);
    assert_eq!(g.to_fen(), "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2");

    let err = g.run_moves(ts, ["e9e4"]).unwrap_err();
    assert!(matches!(err, MoveError::Replay { index: 0, ref source, .. } if matches!(**source, MoveError::Malformed(_))));
    assert_eq!(g.ply(), 2);
}

#[test]
fn test_en_passant_and_promotion() {
    let ts = &_TABLES;

    let mut g = game("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    let mv = g.parse_move(ts, "e5f6").unwrap();
    assert_eq!(mv.flag, MoveFlag::EnPassant);
    g.make_move(ts, mv);
    assert_eq!(g.get_at("f5".into()), None);
    assert_eq!(g.get_at("f6".into()), Some((White,Pawn)));
    assert_eq!(g.state.en_passant, None);

    let mut g = game("8/P6k/8/8/8/8/8/K7 w - - 0 1");
    let mv = g.parse_move(ts, "a7a8n").unwrap();
    assert_eq!(mv.promotion, Some(Knight));
    assert_eq!(format!("{}", mv), "a7a8n");
    g.make_move(ts, mv);
    assert_eq!(g.get_at("a8".into()), Some((White,Knight)));
    assert!(g.get(Pawn, White).is_empty());

    let mut g = game("8/P6k/8/8/8/8/8/K7 w - - 0 1");
    assert!(matches!(g.parse_move(ts, "a7a8"), Err(MoveError::Illegal(_))));
}

#[test]
fn test_castling_rules() {
    let ts = &_TABLES;

    // f1 attacked
    let mut g = game("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1");
    let moves: Vec<String> = g.generate_legal(ts).iter().map(|m| format!("{}", m)).collect();
    assert!(!moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));

    // b1 attacked doesn't matter, only the king's path does
    let mut g = game("r3k2r/8/8/8/8/8/1r6/R3K2R w KQkq - 0 1");
    let moves: Vec<String> = g.generate_legal(ts).iter().map(|m| format!("{}", m)).collect();
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));

    // capturing a rook on its home square clears that right
    let mut g = game("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    g.run_moves(ts, ["a1a8"]).unwrap();
    assert_eq!(g.to_fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");

    let mut g = game("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    g.run_moves(ts, ["e1g1"]).unwrap();
    assert_eq!(g.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
}

#[test]
fn test_captures_subset() {
    let ts = &_TABLES;
    for fen in [FEN_KIWIPETE, FEN_POS4, FEN_POS5] {
        let g = game(fen);
        let all = g.generate_pseudo_legal(ts);
        let caps = g.generate_captures(ts);
        assert!(caps.iter().all(|m| m.is_tactical() && all.contains(m)));
        let tactical = all.iter().filter(|m| m.is_tactical()).count();
        assert_eq!(tactical, caps.len());
    }
}

// tables

#[test]
fn test_magics_match_rays() {
    let ts = &_TABLES;
    let mut rng: StdRng = SeedableRng::seed_from_u64(18105974836011991331);

    for sq in 0..64u8 {
        let c0 = Coord::new_int(sq);
        for _ in 0..200 {
            let occ = BitBoard(rng.gen::<u64>() & rng.gen::<u64>());
            for bishop in [true,false] {
                let walked = Tables::gen_moveboard(occ, c0, bishop);
                let magic = if bishop { ts.attacks_bishop(c0, occ) } else { ts.attacks_rook(c0, occ) };
                assert_eq!(magic, walked, "sq {} bishop {} occ {:?}", c0, bishop, occ);
                assert_eq!(ts.attacks_sliding_ray(c0, occ, bishop), walked);
            }
        }
    }
}

#[test]
fn test_between() {
    let ts = &_TABLES;
    assert_eq!(ts.between("e1".into(), "h1".into()), BitBoard::new(&["f1", "g1"]));
    assert_eq!(ts.between("a1".into(), "d4".into()), BitBoard::new(&["b2", "c3"]));
    assert!(ts.between("a1".into(), "b3".into()).is_empty());
}

// outcome

#[test]
fn test_outcomes() {
    let ts = &_TABLES;

    let mut g = Game::start_pos(ts);
    g.run_moves(ts, ["f2f3", "e7e5", "g2g4", "d8h4"]).unwrap();
    assert_eq!(g.outcome(ts), Outcome::Checkmate(White));

    let mut g = game("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(g.generate_legal(ts).is_empty());
    assert_eq!(g.outcome(ts), Outcome::Stalemate);

    let mut g = game("8/8/8/4k3/8/8/R7/4K3 w - - 100 80");
    assert_eq!(g.outcome(ts), Outcome::DrawFiftyMove);

    let mut g = game("8/8/8/4k3/8/8/8/2B1K3 w - - 0 1");
    assert_eq!(g.outcome(ts), Outcome::DrawInsufficientMaterial);

    let mut g = game("5b2/8/8/4k3/8/8/8/2B1K3 w - - 0 1");
    assert_eq!(g.outcome(ts), Outcome::DrawInsufficientMaterial);

    let mut g = game("2b5/8/8/4k3/8/8/8/2B1K3 w - - 0 1");
    assert_eq!(g.outcome(ts), Outcome::Ongoing);

    let mut g = game("8/8/8/4k3/8/8/8/1NN1K3 w - - 0 1");
    assert_eq!(g.outcome(ts), Outcome::Ongoing);

    assert!(Outcome::Stalemate.is_draw());
    assert!(Outcome::DrawRepetition.is_draw());
    assert!(!Outcome::Checkmate(Black).is_draw());
    assert!(!Outcome::Ongoing.is_draw());
}

#[test]
fn test_repetition() {
    let ts = &_TABLES;
    let mut g = Game::start_pos(ts);
    let cycle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    g.run_moves(ts, cycle).unwrap();
    assert!(g.is_repetition(2));
    assert!(!g.is_repetition(3));
    assert_eq!(g.outcome(ts), Outcome::Ongoing);

    g.run_moves(ts, cycle).unwrap();
    assert!(g.is_repetition(3));
    assert_eq!(g.outcome(ts), Outcome::DrawRepetition);

    // a pawn move resets the window
    g.run_moves(ts, ["e2e4"]).unwrap();
    assert_eq!(g.count_repetitions(), 0);
}

// evaluation

#[test]
fn test_eval_startpos_balanced() {
    let ts = &_TABLES;
    let g = Game::start_pos(ts);
    assert_eq!(evaluate(&g, ts), 0);
    assert_eq!(g.game_phase(), 0);
    assert_eq!(game("8/8/8/4k3/8/8/8/4K3 w - - 0 1").game_phase(), PHASE_MAX);
}

#[test]
fn test_eval_color_flip() {
    let ts = &_TABLES;
    for fen in [FEN_KIWIPETE, FEN_POS3, FEN_POS4, FEN_POS5] {
        let g = game(fen);
        let m = mirror(&g);
        assert_eq!(g.evaluate(ts).sum_white(), -m.evaluate(ts).sum_white(), "{}", fen);
        assert_eq!(evaluate(&g, ts), evaluate(&m, ts), "{}", fen);
    }
}

#[test]
fn test_eval_side_relative() {
    let ts = &_TABLES;
    let w = game(FEN_POS4);
    let b = game(&FEN_POS4.replace(" w ", " b "));
    assert_eq!(evaluate(&w, ts), -evaluate(&b, ts));

    // a queen up is good for whoever has it
    let g = game("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1");
    assert!(evaluate(&g, ts) < -800);
}

#[test]
fn test_eval_pawn_terms() {
    let ts = &_TABLES;
    let white = White;

    let passed = game("4k3/8/8/3P4/8/8/8/4K3 w - - 0 1");
    let blocked = game("4k3/3p4/8/3P4/8/8/8/4K3 w - - 0 1");
    assert!(passed.score_pawns(ts, white).end > blocked.score_pawns(ts, white).end);

    let doubled = game("4k3/8/8/3P4/3P4/8/8/4K3 w - - 0 1");
    let split   = game("4k3/8/8/3P4/4P3/8/8/4K3 w - - 0 1");
    assert!(doubled.score_pawns(ts, white).mid < split.score_pawns(ts, white).mid);

    let open = game("4k3/8/8/8/8/8/PP6/3RK3 w - - 0 1");
    assert_eq!(open.score_rooks(white), TaperedScore::new(25, 10));
}

// transposition table

#[test]
fn test_tt_store_probe() {
    let mut tt = TransTable::with_slots(16);
    let zb = Zobrist(0xdead_beef);
    let mv = Move::new_quiet("e2".into(), "e4".into(), Pawn);

    assert_eq!(tt.probe(zb, 0), None);
    tt.store(zb, Some(mv), 42, 3, Node::PV, 0);

    let e = tt.probe(zb, 0).unwrap();
    assert_eq!(e.best_move, Some(mv));
    assert_eq!(e.score, 42);
    assert_eq!(e.depth, 3);
    assert_eq!(e.node, Node::PV);
}

#[test]
fn test_tt_collision_guard() {
    let mut tt = TransTable::with_slots(16);
    let a = Zobrist(5);
    let b = Zobrist(5 + 16);
    tt.store(a, None, 10, 4, Node::PV, 0);
    assert_eq!(tt.probe(b, 0), None);
    assert!(tt.probe(a, 0).is_some());
}

#[test]
fn test_tt_replacement() {
    let mut tt = TransTable::with_slots(16);
    let a = Zobrist(3);
    let b = Zobrist(3 + 32);
    let mv = Move::new_quiet("g1".into(), "f3".into(), Knight);

    // shallower entry for another key in the same generation is dropped
    tt.store(a, None, 10, 5, Node::PV, 0);
    tt.store(b, None, 20, 3, Node::PV, 0);
    assert!(tt.probe(a, 0).is_some());
    assert_eq!(tt.probe(b, 0), None);

    // anything replaces an entry from an older search
    tt.new_search();
    tt.store(b, None, 20, 1, Node::All, 0);
    assert_eq!(tt.probe(a, 0), None);
    assert_eq!(tt.probe(b, 0).unwrap().depth, 1);

    // same key: exact beats a deeper bound
    let mut tt = TransTable::with_slots(16);
    tt.store(a, None, 10, 5, Node::Cut, 0);
    tt.store(a, None, 12, 2, Node::PV, 0);
    let e = tt.probe(a, 0).unwrap();
    assert_eq!((e.depth, e.node, e.score), (2, Node::PV, 12));

    // kept entry picks up a best move it didn't have
    let mut tt = TransTable::with_slots(16);
    tt.store(a, None, -5, 5, Node::All, 0);
    tt.store(a, Some(mv), 30, 3, Node::Cut, 0);
    let e = tt.probe(a, 0).unwrap();
    assert_eq!((e.depth, e.node, e.best_move), (5, Node::All, Some(mv)));
}

#[test]
fn test_tt_mate_scores() {
    let mut tt = TransTable::with_slots(16);
    let zb = Zobrist(7);
    tt.store(zb, None, CHECKMATE_VALUE - 5, 2, Node::PV, 3);
    assert_eq!(tt.probe(zb, 3).unwrap().score, CHECKMATE_VALUE - 5);
    assert_eq!(tt.probe(zb, 1).unwrap().score, CHECKMATE_VALUE - 3);

    tt.store(zb, None, -(CHECKMATE_VALUE - 4), 3, Node::PV, 2);
    assert_eq!(tt.probe(zb, 6).unwrap().score, -(CHECKMATE_VALUE - 8));
}

#[test]
fn test_tt_sizing() {
    let mut tt = TransTable::new(1);
    assert!(tt.capacity().is_power_of_two());
    assert!(tt.capacity() * std::mem::size_of::<Option<TTEntry>>() <= 1024 * 1024);

    let mut tt = TransTable::with_slots(1000);
    assert_eq!(tt.capacity(), 1024);
    for k in 0..100 {
        tt.store(Zobrist(k), None, 0, 1, Node::PV, 0);
    }
    assert_eq!(tt.hashfull(), 100);
    tt.new_search();
    assert_eq!(tt.hashfull(), 0);
    tt.clear();
    assert_eq!(tt.probe(Zobrist(1), 0), None);
}

// search

#[test]
fn test_alpha_beta_matches_minimax() {
    init_logger();
    let ts = &_TABLES;
    for (fen,depth) in [(STARTPOS, 3), (FEN_POS3, 3), (FEN_POS4, 2), ("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1", 3)] {
        let mut ex = explorer(game(fen), no_tt(), depth);
        let mm = ex.minimax(ts, depth, 0);
        let mut pv = PVLine::new();
        let ab = ex.alpha_beta(ts, depth, -INF, INF, 0, &mut pv);
        assert_eq!(ab, mm, "{} depth {}", fen, depth);
        assert_eq!(ex.game, game(fen));
    }
}

#[test]
fn test_tt_does_not_change_score() {
    init_logger();
    let ts = &_TABLES;

    for fen in [FEN_KIWIPETE, FEN_POS4, FEN_POS5] {
        let with = explorer(game(fen), ExConfig::default(), 3).find_best_move(ts);
        let without = explorer(game(fen), no_tt(), 3).find_best_move(ts);
        assert_eq!(with.score, without.score, "{}", fen);
    }

    let cfg = ExConfig { detect_draws: false, ..ExConfig::default() };
    let with = explorer(game(FEN_POS3), cfg, 4).find_best_move(ts);
    let without = explorer(game(FEN_POS3), ExConfig { use_tt: false, ..cfg }, 4).find_best_move(ts);
    assert_eq!(with.score, without.score);
}

#[test]
fn test_mate_in_one() {
    init_logger();
    let ts = &_TABLES;
    let g = game("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
    let res = explorer(g, ExConfig::default(), 4).find_best_move(ts);
    assert_eq!(res.score, CHECKMATE_VALUE - 1);
    assert_eq!(res.best_move.map(|m| format!("{}", m)), Some("a1a8".to_string()));
    assert_eq!(res.pv.len(), 1);
}

#[test]
fn test_stalemate_search() {
    let ts = &_TABLES;
    let g = game("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    let res = explorer(g, ExConfig::default(), 3).find_best_move(ts);
    assert_eq!(res.best_move, None);
    assert_eq!(res.score, 0);
}

#[test]
fn test_mated_root() {
    let ts = &_TABLES;
    let mut g = Game::start_pos(ts);
    g.run_moves(ts, ["f2f3", "e7e5", "g2g4", "d8h4"]).unwrap();
    let res = explorer(g, ExConfig::default(), 3).find_best_move(ts);
    assert_eq!(res.best_move, None);
    assert_eq!(res.score, -CHECKMATE_VALUE);
}

#[test]
fn test_avoids_stalemating() {
    let ts = &_TABLES;
    // Qf7 stalemates, every other queen move keeps the win
    let g = game("7k/8/6K1/8/8/8/8/5Q2 w - - 0 1");
    let res = explorer(g, ExConfig::default(), 2).find_best_move(ts);
    assert_ne!(res.best_move.map(|m| format!("{}", m)), Some("f1f7".to_string()));
    assert!(res.score > 500);
}

#[test]
fn test_search_draws() {
    let ts = &_TABLES;

    let g = game("8/8/8/4k3/8/8/8/2N1K3 w - - 0 1");
    let res = explorer(g, ExConfig::default(), 3).find_best_move(ts);
    assert_eq!(res.score, 0);

    let g = game("8/8/8/3k4/8/8/8/Q3K3 w - - 99 80");
    let res = explorer(g.clone(), ExConfig::default(), 2).find_best_move(ts);
    assert_eq!(res.score, 0);

    let cfg = ExConfig { detect_draws: false, ..ExConfig::default() };
    let res = explorer(g, cfg, 2).find_best_move(ts);
    assert!(res.score > 500);
}

#[test]
fn test_stop_before_search() {
    let ts = &_TABLES;
    let mut ex = explorer(Game::start_pos(ts), ExConfig::default(), 6);
    ex.stop.store(true, Ordering::SeqCst);
    let res = ex.find_best_move(ts);
    assert_eq!(res.depth, 1);
    assert!(res.best_move.is_some());
}

#[test]
fn test_stop_from_thread() {
    let ts = &_TABLES;
    let cfg = ExConfig { check_interval: 64, ..ExConfig::default() };
    let mut ex = Explorer::new(game(FEN_KIWIPETE), cfg, SearchLimits::default());
    let stop = ex.stop_handle();

    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        stop.store(true, Ordering::SeqCst);
    });

    let res = ex.find_best_move(ts);
    handle.join().unwrap();

    assert!(res.depth >= 1 && res.depth < cfg.max_depth);
    let mv = res.best_move.unwrap();
    let mut g = game(FEN_KIWIPETE);
    assert!(g.generate_legal(ts).contains(&mv));
}

#[test]
fn test_node_limit_keeps_last_iteration() {
    let ts = &_TABLES;
    let cfg = ExConfig { check_interval: 16, ..ExConfig::default() };
    let limits = SearchLimits { depth: Some(20), nodes: Some(20_000), movetime: None };
    let mut ex = Explorer::new(game(FEN_KIWIPETE), cfg, limits);
    let rx = ex.progress_channel();
    let res = ex.find_best_move(ts);

    assert!(ex.aborted());
    assert!(res.depth >= 1 && res.depth < 20);
    assert!(res.best_move.is_some());
    assert_eq!(res.pv.first().copied(), res.best_move);

    let last = rx.try_iter().last().unwrap();
    assert_eq!(last.depth, res.depth);
    assert_eq!(last.score, res.score);
    assert_eq!(last.pv, res.pv);

    assert_eq!(ex.game, game(FEN_KIWIPETE));
}

#[test]
fn test_new_game_clears_tt() {
    let ts = &_TABLES;
    let mut ex = explorer(Game::start_pos(ts), ExConfig::default(), 3);
    ex.find_best_move(ts);
    let zb = ex.game.zobrist;
    assert!(ex.tt.probe(zb, 0).is_some());

    ex.new_game(Game::start_pos(ts));
    assert_eq!(ex.tt.probe(zb, 0), None);
}

#[test]
fn test_progress_channel() {
    let ts = &_TABLES;
    let mut ex = explorer(Game::start_pos(ts), ExConfig::default(), 3);
    let rx = ex.progress_channel();
    let res = ex.find_best_move(ts);

    let ps: Vec<SearchProgress> = rx.try_iter().collect();
    assert_eq!(ps.iter().map(|p| p.depth).collect::<Vec<_>>(), vec![1, 2, 3]);
    let last = ps.last().unwrap();
    assert_eq!(last.score, res.score);
    assert_eq!(last.pv, res.pv);
    assert!(ps.windows(2).all(|w| w[0].nodes <= w[1].nodes));
}

#[test]
fn test_time_allocation() {
    let ts = TimeSettings::new_f64(60.0, 1.0);
    let t = SearchLimits::from_clock(&ts, White).movetime.unwrap();
    assert!(t > Duration::from_secs_f64(2.3) && t < Duration::from_secs_f64(2.4), "{:?}", t);

    let ts = TimeSettings { moves_to_go: Some(1), ..TimeSettings::new_f64(1.0, 0.0) };
    let t = ts.allocate_time(Black);
    assert!(t < Duration::from_secs_f64(0.95));
}

#[test]
fn test_config_json() {
    let cfg = ExConfig::from_json(r#"{ "tt_size_mb": 4, "use_tt": false }"#).unwrap();
    assert_eq!(cfg.tt_size_mb, 4);
    assert!(!cfg.use_tt);
    assert_eq!(cfg.check_interval, ExConfig::default().check_interval);

    let s = cfg.to_json().unwrap();
    assert_eq!(ExConfig::from_json(&s).unwrap(), cfg);

    assert!(ExConfig::from_json("{ \"tt_size_mb\": \"lots\" }").is_err());
}
