//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `config.rs`: config file + environment overrides.
//! - `snapshot.rs`: current limits of one project from the API record.
//! - `desired.rs`: desired-state table and disable-list parsing.
//! - `reconcile.rs`: change planning, decision protocol, batch walk.
//! - `apply.rs`: one quota update per approved change.
//! - `render.rs`: limits CSV and review tables.
//! - `projects.rs`: project listing/selection.
//! - `inventory.rs`: cross-project listing and shared report ordering.
//! - `volumes.rs`: volume report.
//! - `vms.rs`: VM and NIC reports.
//! - `networks.rs`: network report.
//! - `snapshots.rs`: volume and VM snapshot report.
//! - `templates.rs`: template and ISO reports.
//! - `accounts.rs`: user and SSH key pair reports.
//! - `systemvms.rs`: virtual router and system VM report.
//! - `configurations.rs`: global settings report.
//! - `mysql_vars.rs`: mysqld variable differ.
//! - `storage.rs`: audit log.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod accounts;
pub mod apply;
pub mod config;
pub mod configurations;
pub mod desired;
pub mod inventory;
pub mod mysql_vars;
pub mod networks;
pub mod output;
pub mod projects;
pub mod reconcile;
pub mod render;
pub mod snapshot;
pub mod snapshots;
pub mod storage;
pub mod systemvms;
pub mod templates;
#[cfg(test)]
pub mod testing;
pub mod vms;
pub mod volumes;
