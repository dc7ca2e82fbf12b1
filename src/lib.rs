//! A library for reading and writing Shogi game records.
//!
//! `shogi_kifu` provides a compact position and move model together with the
//! notations used to exchange positions and games: SFEN, USI, KIF, KI2, CSA
//! and BOD, plus the `info` reports of a USI engine.
//! See [USIプロトコルとは (What is the USI protocol?)](http://shogidokoro.starfree.jp/usi.html) for more detail about the USI protocol and SFEN format.
//!
//! The crate does not generate or validate legal moves. Moves come from
//! parsed notation or from an external engine and are trusted as given.
//!
//! # Module Organization
//!
//! - **model**: [`Square`], [`PieceType`], [`Piece`], [`Color`], [`Hand`],
//!   [`Move`] and [`Position`]
//! - **records**: [`GameTree`] of [`Step`]s, [`Game`], [`Handicap`] and
//!   [`Termination`]
//! - **notation**: one module per text format, each behind the
//!   [`notation::Codec`] trait, and the Japanese disambiguation rules
//! - **engine**: USI engine commands and responses
//!
//! # Examples
//!
//! ```
//! use shogi_kifu::notation::{japanese, usi};
//!
//! // A game can be read from a USI position line.
//! let game = usi::parse_game("position startpos moves 7g7f 3c3d 8h2b+").unwrap();
//!
//! // Every step of the game can be described in Japanese.
//! let last = game.main_line_end();
//! assert_eq!("☗２二角成(88)", japanese::format_step(&game.tree, last));
//!
//! // And written back in USI.
//! assert_eq!("position startpos moves 7g7f 3c3d 8h2b+", usi::format_game(&game));
//! ```

pub mod color;
pub mod engine;
pub mod error;
pub mod game;
pub mod hand;
pub mod handicap;
pub mod moves;
pub mod notation;
pub mod piece;
pub mod piece_type;
pub mod position;
pub mod square;
pub mod termination;
pub mod tree;

pub use self::color::Color;
pub use self::error::ParseError;
pub use self::game::Game;
pub use self::hand::Hand;
pub use self::handicap::Handicap;
pub use self::moves::{LegalMoves, Move, Origin, ParseMoveError};
pub use self::piece::Piece;
pub use self::piece_type::PieceType;
pub use self::position::Position;
pub use self::square::{ParseSquareError, Square};
pub use self::termination::Termination;
pub use self::tree::{GameTree, Step, StepId};
