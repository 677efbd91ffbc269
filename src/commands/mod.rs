//! Command handler layer.
//!
//! ## Files
//! - `sync.rs` — the full reconciliation run (live and dry).
//! - `remote.rs` — read-only remote inspection (entry listing, duplicate audit).
//!
//! ## Principles
//! - Keep handlers thin; delegate classification and execution to `services/*`.
//! - One JSON document per command in `--json` mode, text rows otherwise.

pub mod remote;
pub mod sync;

pub use remote::{handle_audit, handle_entries};
pub use sync::handle_sync;
