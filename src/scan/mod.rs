//! Lexical extraction: line lexer, per-block scans, character definitions
//!
//! This is phase 1 of the two-phase pipeline. It reads block text and
//! produces global tables; it never resolves anything across blocks.

pub mod characters;
pub mod extract;
pub mod lexer;

pub use extract::{extract, Extraction};
