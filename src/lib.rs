//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof:
//! `blockfall::{types, core, engine}`.

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;
