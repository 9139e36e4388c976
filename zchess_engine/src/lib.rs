#![allow(unused_imports)]

#![allow(
    clippy::restriction,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::complexity,
    clippy::style,
)]

#[macro_export]
macro_rules! builder_field {
    ($field:ident, $field_type:ty) => {
        pub fn $field(mut self, $field: $field_type) -> Self {
            self.$field = $field;
            self
        }
    };
}

#[macro_export]
macro_rules! stats {
    ($e:expr) => {
        #[cfg(feature = "keep_stats")]
        $e
    }
}

pub mod types;
pub mod error;
pub mod bitboard;
pub mod coords;
pub mod tables;
pub mod magics;
pub mod hashing;
pub mod game;
pub mod parsing;
pub mod attack_maps;
pub mod movegen;

pub mod psqt;
pub mod evaluate;
pub mod trans_table;

pub mod timer;
pub mod searchstats;
pub mod move_ordering;
pub mod explore;
pub mod alphabeta;
pub mod qsearch;

#[cfg(test)]
pub mod tests;
