//! # edict-base
//!
//! Structural atoms for the edict workspace.
//!
//! This crate holds the pieces every other edict crate agrees on but that
//! carry no language knowledge of their own:
//!
//! - [`Arena`]: bump allocation for data that must outlive the parse that
//!   produced it (decoded string literals, joined operator names).
//! - [`Position`]: a line/column/byte-offset triple attached to every
//!   token, AST node, and diagnostic.

mod arena;
mod position;

pub use arena::Arena;
pub use position::Position;
