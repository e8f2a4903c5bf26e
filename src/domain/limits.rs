use crate::domain::catalogue::ResourceType;
use serde::Serialize;
use std::collections::BTreeMap;

/// Integer encoding of an unbounded limit, both in comparisons and on the wire.
pub const UNLIMITED: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaEntry {
    pub max: i64,
    pub available: Option<i64>,
}

/// Observed limits of one scope, keyed by resource type id.
///
/// Resource types the scope record does not carry are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub entries: BTreeMap<u32, QuotaEntry>,
}

impl QuotaSnapshot {
    pub fn get(&self, resource_type: u32) -> Option<&QuotaEntry> {
        self.entries.get(&resource_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredLimit {
    NoChange,
    Max(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeTarget {
    pub limits: BTreeMap<u32, DesiredLimit>,
    /// Line of the limits file the target was read from.
    pub line: Option<usize>,
}

impl ScopeTarget {
    pub fn limit(&self, resource_type: u32) -> DesiredLimit {
        self.limits
            .get(&resource_type)
            .copied()
            .unwrap_or(DesiredLimit::NoChange)
    }
}

/// Target limits, built once before any scope is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesiredState {
    /// One row per scope id, read from a limits file.
    PerScope(BTreeMap<String, ScopeTarget>),
    /// Same target for every scope (disable list).
    Uniform(ScopeTarget),
}

impl DesiredState {
    pub fn target_for(&self, scope_id: &str) -> Option<&ScopeTarget> {
        match self {
            DesiredState::PerScope(rows) => rows.get(scope_id),
            DesiredState::Uniform(target) => Some(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    NoOp,
    ApplyCandidate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub resource_type: ResourceType,
    pub available: Option<i64>,
    pub old_max: i64,
    pub new_max: i64,
    pub kind: ChangeKind,
}

impl Change {
    pub fn is_candidate(&self) -> bool {
        self.kind == ChangeKind::ApplyCandidate
    }
}
