
use crate::types::*;
use crate::tables::*;

use log::warn;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{one_of,alphanumeric1,digit1},
    combinator::{all_consuming,map_res,opt},
    multi::{many1,separated_list1},
    sequence::pair,
};

pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

type Rank = Vec<Option<(Piece,Color)>>;

/// FEN
impl Game {

    /// Either a complete position or an error, never a half-built board.
    /// The two clock fields may be left off.
    pub fn from_fen(ts: &Tables, s: &str) -> ParseResult<Game> {
        let fields: Vec<&str> = s.split_whitespace().collect();

        let get = |i: usize| fields.get(i).copied().unwrap_or("");

        let ranks = all_consuming(parse_piece_lines)(get(0))
            .map_err(|_| ParseError::BadPlacement(get(0).to_string()))?.1;
        let ranks = validate_ranks(ranks, get(0))?;

        let side = all_consuming(parse_side)(get(1))
            .map_err(|_| ParseError::BadSide(get(1).to_string()))?.1;

        let castling = all_consuming(parse_castle)(get(2))
            .map_err(|_| ParseError::BadCastling(get(2).to_string()))?.1;

        let ep = all_consuming(parse_enpassant)(get(3))
            .map_err(|_| ParseError::BadEnPassant(get(3).to_string()))?.1;

        let (halfmove,fullmove) = match (fields.get(4),fields.get(5)) {
            (None,_)          => (0,1),
            (Some(hm),None)   => (parse_clock(hm)?,1),
            (Some(hm),Some(fm)) => (parse_clock(hm)?,parse_clock(fm)?.max(1)),
        };

        if fields.len() > 6 {
            return Err(ParseError::TrailingInput(fields[6..].join(" ")));
        }

        let g = build_from_fen(ts, ranks, side, castling, ep, halfmove, fullmove);

        let (w,b) = (g.get(King, White).popcount(), g.get(King, Black).popcount());
        if w != 1 || b != 1 {
            return Err(ParseError::KingCount { white: w, black: b });
        }

        if let Some(ep) = ep {
            if !en_passant_consistent(&g, ep) {
                return Err(ParseError::BadEnPassant(get(3).to_string()));
            }
        }

        if g.in_check(ts, !side) {
            return Err(ParseError::WaitingSideInCheck(!side));
        }

        Ok(g)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::new();

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.get_at(Coord::new(file, rank)) {
                    Some((col,pc)) => {
                        if empty > 0 {
                            out.push_str(&format!("{}", empty));
                            empty = 0;
                        }
                        out.push(pc.to_char(col));
                    },
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&format!("{}", empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        let side = if self.state.side_to_move == White { "w" } else { "b" };
        let ep = match self.state.en_passant {
            Some(c0) => format!("{}", c0),
            None     => "-".to_string(),
        };

        format!("{} {} {} {} {} {}",
                out, side, self.state.castling.to_fen(), ep,
                self.state.halfmove, self.state.fullmove)
    }

}

/// Coordinate notation
impl Game {

    /// `e2e4`, `e7e8q`, matched against the legal moves of the current position
    pub fn parse_move(&mut self, ts: &Tables, s: &str) -> Result<Move, MoveError> {
        let (_,(from,to,promotion)) = all_consuming(parse_coord_move)(s)
            .map_err(|_| MoveError::Malformed(s.to_string()))?;

        self.generate_legal(ts)
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
            .ok_or_else(|| MoveError::Illegal(s.to_string()))
    }

    /// Applies each token in order. On the first bad token the moves before it
    /// stay applied and the error carries its index.
    pub fn run_moves<I,S>(&mut self, ts: &Tables, tokens: I) -> Result<usize, MoveError>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>,
    {
        let mut n = 0;
        for (index,token) in tokens.into_iter().enumerate() {
            let token = token.as_ref();
            match self.parse_move(ts, token) {
                Ok(mv) => {
                    self.make_move(ts, mv);
                    n += 1;
                },
                Err(e) => {
                    warn!("run_moves: stopping at {} ({:?}): {}", index, token, e);
                    return Err(MoveError::Replay {
                        index,
                        token:  token.to_string(),
                        source: Box::new(e),
                    });
                },
            }
        }
        Ok(n)
    }

}

fn build_from_fen(
    ts:         &Tables,
    v:          Vec<Rank>,
    col:        Color,
    castling:   Castling,
    ep:         Option<Coord>,
    halfmove:   u16,
    fullmove:   u16,
) -> Game {
    let mut out = Game::empty();
    let mut ps = vec![];

    for (rank,y) in v.iter().rev().zip(0..8) {
        for (sq,x) in rank.iter().zip(0..8) {
            if let Some((p,c)) = sq {
                ps.push((Coord::new(x,y), *p, *c));
            }
        }
    }

    out.state.side_to_move = col;
    out.state.castling     = castling;
    out.state.en_passant   = ep;
    out.state.halfmove     = halfmove;
    out.state.fullmove     = fullmove;

    out.insert_pieces_mut_unchecked(ts, &ps);
    out
}

/// The target must sit behind an enemy pawn that could have just double pushed
fn en_passant_consistent(g: &Game, ep: Coord) -> bool {
    let side = g.state.side_to_move;
    let (rank,victim,origin) = match side {
        White => (5, Coord(ep.0 - 8), Coord(ep.0 + 8)),
        Black => (2, Coord(ep.0 + 8), Coord(ep.0 - 8)),
    };
    ep.rank() == rank
        && g.get_at(victim) == Some((!side,Pawn))
        && g.get_at(ep).is_none()
        && g.get_at(origin).is_none()
}

fn validate_ranks(ranks: Vec<Rank>, field: &str) -> ParseResult<Vec<Rank>> {
    if ranks.len() != 8 || ranks.iter().any(|r| r.len() != 8) {
        return Err(ParseError::BadPlacement(field.to_string()));
    }
    Ok(ranks)
}

fn parse_clock(s: &str) -> ParseResult<u16> {
    all_consuming(map_res(digit1, |d: &str| d.parse::<u16>()))(s)
        .map(|(_,n)| n)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| ParseError::BadClock(s.to_string()))
}

fn parse_side(s: &str) -> IResult<&str, Color> {
    let (s,c) = one_of("wb")(s)?;
    match c {
        'w' => Ok((s,White)),
        _   => Ok((s,Black)),
    }
}

fn parse_castle(s: &str) -> IResult<&str, Castling> {
    alt((
        nom::combinator::value(Castling::none(), tag("-")),
        parse_castle_letters,
    ))(s)
}

/// Each of `KQkq` at most once
fn parse_castle_letters(s: &str) -> IResult<&str, Castling> {
    let (rest,cs) = many1(one_of("KQkq"))(s)?;

    let mut out = Castling::none();
    for (i,c) in cs.iter().enumerate() {
        if cs[..i].contains(c) {
            return Err(nom::Err::Error(nom::error::Error::new(s, nom::error::ErrorKind::Verify)));
        }
        match c {
            'K' => out.set_king(White,true),
            'Q' => out.set_queen(White,true),
            'k' => out.set_king(Black,true),
            _   => out.set_queen(Black,true),
        }
    }
    Ok((rest,out))
}

fn parse_square(s: &str) -> IResult<&str, Coord> {
    let (s,(f,r)) = pair(one_of("abcdefgh"), one_of("12345678"))(s)?;
    Ok((s,Coord::new(f as u8 - b'a', r as u8 - b'1')))
}

fn parse_enpassant(s: &str) -> IResult<&str, Option<Coord>> {
    alt((
        nom::combinator::value(None, tag("-")),
        nom::combinator::map(
            pair(one_of("abcdefgh"), one_of("36")),
            |(f,r)| Some(Coord::new(f as u8 - b'a', r as u8 - b'1'))),
    ))(s)
}

fn parse_coord_move(s: &str) -> IResult<&str, (Coord,Coord,Option<Piece>)> {
    let (s,from) = parse_square(s)?;
    let (s,to)   = parse_square(s)?;
    let (s,pc)   = opt(one_of("qrbn"))(s)?;
    let pc = pc.and_then(Piece::from_char).map(|(pc,_)| pc);
    Ok((s,(from,to,pc)))
}

fn parse_piece_line(s: &str) -> Option<Rank> {
    let mut out = vec![];
    for c in s.chars() {
        match c {
            '1'..='8' => {
                for _ in 0..(c as u8 - b'0') {
                    out.push(None);
                }
            },
            _ => out.push(Some(Piece::from_char(c)?)),
        }
    }
    Some(out)
}

fn parse_piece_lines(s: &str) -> IResult<&str, Vec<Rank>> {
    map_res(
        separated_list1(tag("/"), alphanumeric1),
        |ss: Vec<&str>| {
            ss.iter()
                .map(|line| parse_piece_line(line).ok_or(()))
                .collect::<Result<Vec<Rank>,()>>()
        },
    )(s)
}
