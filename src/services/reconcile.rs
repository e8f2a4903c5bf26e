use crate::cloudstack::ControlPlane;
use crate::domain::catalogue::ResourceCatalogue;
use crate::domain::limits::{
    Change, ChangeKind, DesiredLimit, DesiredState, QuotaSnapshot, ScopeTarget,
};
use crate::domain::models::{BatchReport, ChangeReport, Outcome, Scope, ScopeReport};
use crate::services::apply::ApplyDriver;
use crate::services::render::render_change_table;
use crate::services::snapshot::fetch_snapshot;
use crate::services::storage::AuditLog;
use anyhow::Context;
use std::io::{BufRead, Write};

/// Compare observed limits with the target, one change per type in the snapshot.
pub fn plan_changes(
    catalogue: &ResourceCatalogue,
    snapshot: &QuotaSnapshot,
    target: Option<&ScopeTarget>,
) -> Vec<Change> {
    catalogue
        .iter()
        .filter_map(|t| {
            let entry = snapshot.get(t.id)?;
            let desired = target
                .map(|tg| tg.limit(t.id))
                .unwrap_or(DesiredLimit::NoChange);
            let new_max = match desired {
                DesiredLimit::Max(n) => n,
                DesiredLimit::NoChange => entry.max,
            };
            let kind = if new_max == entry.max {
                ChangeKind::NoOp
            } else {
                ChangeKind::ApplyCandidate
            };
            Some(Change {
                resource_type: t.clone(),
                available: entry.available,
                old_max: entry.max,
                new_max,
                kind,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Apply,
    Skip,
}

#[derive(thiserror::Error, Debug)]
pub enum PromptError {
    #[error("input closed while waiting for a yes/no answer")]
    InputClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub trait Decider {
    fn decide(&mut self, scope: &Scope, change: &Change) -> Result<Decision, PromptError>;
}

/// Approves every candidate without asking.
pub struct ForceDecider;

impl Decider for ForceDecider {
    fn decide(&mut self, _scope: &Scope, _change: &Change) -> Result<Decision, PromptError> {
        Ok(Decision::Apply)
    }
}

/// Asks the operator about each candidate until they answer `yes` or `no`.
pub struct PromptDecider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDecider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Decider for PromptDecider<R, W> {
    fn decide(&mut self, _scope: &Scope, change: &Change) -> Result<Decision, PromptError> {
        writeln!(
            self.output,
            "OK to change {} from \"{}\" to \"{}\"? (yes/no)",
            change.resource_type.limit_key, change.old_max, change.new_max
        )?;
        loop {
            write!(self.output, "Enter yes or no: ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(PromptError::InputClosed);
            }
            match line.trim_end_matches(['\r', '\n']) {
                "yes" => {
                    writeln!(self.output, "Do change!")?;
                    return Ok(Decision::Apply);
                }
                "no" => {
                    writeln!(self.output, "Not changing this limit.")?;
                    return Ok(Decision::Skip);
                }
                _ => writeln!(self.output, "Please enter yes or no.")?,
            }
        }
    }
}

fn report_for(change: &Change, outcome: Outcome, error: Option<String>) -> ChangeReport {
    ChangeReport {
        resource_type_id: change.resource_type.id,
        resource_type: change.resource_type.name.clone(),
        old_max: change.old_max,
        new_max: change.new_max,
        outcome,
        error,
    }
}

/// Walk the planned changes of one scope in order, applying approved ones
/// one at a time. Failed updates are recorded and do not stop the walk.
pub fn resolve_changes<C: ControlPlane>(
    driver: &ApplyDriver<'_, C>,
    scope: &Scope,
    changes: &[Change],
    decider: &mut impl Decider,
) -> Result<Vec<ChangeReport>, PromptError> {
    let mut reports = Vec::with_capacity(changes.len());
    for change in changes {
        if !change.is_candidate() {
            reports.push(report_for(change, Outcome::Unchanged, None));
            continue;
        }
        let report = match decider.decide(scope, change)? {
            Decision::Skip => report_for(change, Outcome::Skipped, None),
            Decision::Apply => match driver.apply(&scope.id, &change.resource_type, change.new_max) {
                Ok(()) => report_for(change, Outcome::Applied, None),
                Err(e) => report_for(change, Outcome::Failed, Some(e.to_string())),
            },
        };
        reports.push(report);
    }
    Ok(reports)
}

/// Reconcile every scope against the desired state.
///
/// Each scope is fetched fresh. A scope whose limits cannot be read is
/// reported and skipped. Review tables and prompts go to `out`.
pub fn reconcile_batch<C: ControlPlane>(
    api: &C,
    audit: &AuditLog,
    catalogue: &ResourceCatalogue,
    scopes: &[Scope],
    desired: &DesiredState,
    decider: &mut impl Decider,
    out: &mut impl Write,
) -> anyhow::Result<BatchReport> {
    let driver = ApplyDriver::new(api, audit);
    let mut reports = Vec::with_capacity(scopes.len());

    for scope in scopes {
        let mut report = ScopeReport {
            scope_id: scope.id.clone(),
            domain: scope.domain.clone(),
            name: scope.name.clone(),
            fetch_error: None,
            changes: vec![],
        };

        let snapshot = match fetch_snapshot(api, catalogue, &scope.id) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(project_id = %scope.id, error = %e, "cannot read project limits");
                writeln!(
                    out,
                    "\nSkipping project {} ({}): {}",
                    scope.name, scope.id, e
                )?;
                report.fetch_error = Some(e.to_string());
                reports.push(report);
                continue;
            }
        };

        let changes = plan_changes(catalogue, &snapshot, desired.target_for(&scope.id));
        out.write_all(render_change_table(scope, &changes).as_bytes())?;
        out.flush()?;

        report.changes = resolve_changes(&driver, scope, &changes, decider)
            .with_context(|| format!("aborted while reviewing project {}", scope.id))?;
        reports.push(report);
    }

    Ok(BatchReport::from_scopes(reports))
}
