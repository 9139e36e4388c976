
use crate::types::Color;

use thiserror::Error;

#[derive(Error,Debug,Clone,PartialEq,Eq)]
pub enum ParseError {
    #[error("bad piece placement: {0}")]
    BadPlacement(String),

    #[error("bad side to move: {0:?}")]
    BadSide(String),

    #[error("bad castling field: {0:?}")]
    BadCastling(String),

    #[error("bad en passant field: {0:?}")]
    BadEnPassant(String),

    #[error("bad move clock: {0:?}")]
    BadClock(String),

    #[error("bad square: {0:?}")]
    BadSquare(String),

    #[error("expected one king per side, found {white} white and {black} black")]
    KingCount { white: u8, black: u8 },

    #[error("{0:?} is in check but not on move")]
    WaitingSideInCheck(Color),

    #[error("unexpected trailing input: {0:?}")]
    TrailingInput(String),
}

#[derive(Error,Debug,Clone,PartialEq,Eq)]
pub enum MoveError {
    #[error("malformed move token: {0:?}")]
    Malformed(String),

    #[error("illegal move in this position: {0}")]
    Illegal(String),

    /// Replay stopped, moves before `index` stay applied
    #[error("move {index} ({token:?}) rejected: {source}")]
    Replay {
        index:   usize,
        token:   String,
        #[source]
        source:  Box<MoveError>,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;
