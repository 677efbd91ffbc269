//! Shared data model layer (structs only).
//!
//! ## Purpose
//! - Keep article/entry/plan/report structs in one place.
//! - Avoid cyclic imports between services and commands.
//! - Make `--json` output schema changes explicit and reviewable.
//!
//! ## Rule of thumb
//! Domain types are data-only: no filesystem or network side effects.

pub mod models;
