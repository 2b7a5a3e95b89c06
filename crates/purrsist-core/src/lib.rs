//! Core types and trait definitions for the Aether archiver.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod content;
pub mod model;
pub mod store;
pub mod vote;

pub use model::{Board, Displayable, Post, PublicKey, Thread, Vote};
pub use vote::score;
