//! # Porcelain Operations
//!
//! The higher-level operations built on top of the object store, index,
//! and ref store: checkout, reset, cherry-pick, stash, tag, and
//! reference resolution. Each submodule owns one operation; the
//! `commands::*` CLI layer is a thin wrapper over these.

pub mod checkout;
pub mod cherry_pick;
pub mod reset;
pub mod resolve;
pub mod stash;
pub mod tag;
