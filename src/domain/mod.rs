//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep record/report structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `catalogue.rs`: resource types and the resource catalogue.
//! - `limits.rs`: quota snapshots, desired state and change records.
//! - `models.rs`: API records, report and output structs.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and integration contracts.
//! Keep schema-impacting changes explicit and synchronized with `docs/contracts/*`.

pub mod catalogue;
pub mod limits;
pub mod models;
