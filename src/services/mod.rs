//! Service layer containing the reconciliation logic and side-effect helpers.
//!
//! ## Service map
//! - `identity.rs` — identity/target extraction from protocol identifiers.
//! - `plan.rs` — reconciliation planner (pure classification).
//! - `sync.rs` — plan execution (live) and rendering (dry-run).
//! - `audit.rs` — duplicate-title detection over the remote snapshot.
//! - `storage.rs` — article loading, identity write-back, audit log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible; `plan` and `audit` never touch IO.
//! - Side effects are explicit and localized to `sync` and `storage`.
//! - Keep command handlers thin; delegate to services.

pub mod audit;
pub mod identity;
pub mod output;
pub mod plan;
pub mod storage;
pub mod sync;
