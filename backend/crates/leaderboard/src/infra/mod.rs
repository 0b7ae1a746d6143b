//! Infrastructure Layer
//!
//! Concrete implementations of the domain interfaces:
//! - Chess.com HTTP rating provider
//! - File-backed JSON roster store

pub mod chess_com;
pub mod roster_file;
