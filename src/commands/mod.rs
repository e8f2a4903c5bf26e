//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `limits.rs`: print/set/disable project limits.
//! - `reports.rs`: one handler per inventory report, plus mysql-diff.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod limits;
pub mod reports;

pub use limits::handle_limits_command;
pub use reports::*;
