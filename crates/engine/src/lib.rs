//! Search session coordination for the curator engine
//!
//! This crate provides:
//! - SearchSession, the indexed search coordinator reconciling a changing
//!   catalog with rapid user input
//! - WorkerPool, the background scheduler index builds and queries run on
//!
//! The session owns the catalog reference, the text index lifecycle and the
//! published result; filtering and ranking semantics live in
//! `curator-filters`, candidate recall in `curator-index`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod background;
pub mod session;

pub use background::{TaskPriority, WorkerPool};
pub use session::{
    default_describe, IndexState, SearchSession, SessionBuilder, SessionConfig, SessionStats,
};
