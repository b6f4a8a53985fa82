//! Integration test crate for the edict workspace.
//!
//! The crate itself is empty; everything lives under `tests/`.
