//! Full-text candidate recall for the curator engine
//!
//! This crate provides:
//! - TextIndex trait, the asynchronous-boundary contract the search
//!   coordinator talks to
//! - MemoryTextIndex, the default concurrent in-memory implementation
//! - Basic tokenizer shared by indexing and query parsing
//!
//! The index answers "which items mention this?"; relevance ordering is
//! entirely the job of the filters and ranking in `curator-filters`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod tokenizer;

pub use memory::{MemoryTextIndex, TextIndex};
pub use tokenizer::{tokenize, tokenize_unique};
