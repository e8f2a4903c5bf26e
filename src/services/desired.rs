use crate::domain::catalogue::ResourceCatalogue;
use crate::domain::limits::{DesiredLimit, DesiredState, ScopeTarget, UNLIMITED};
use crate::domain::models::Scope;
use crate::services::render::limits_csv_header;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;

const SCOPE_COLUMNS: usize = 3;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DesiredStateError {
    #[error("line {line}: expected {expected} columns (domain;project;uuid and {limits} limits), found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        limits: usize,
        found: usize,
    },
    #[error("line {line}: empty project uuid")]
    MissingScopeId { line: usize },
    #[error("line {line}: project {scope_id} is listed more than once")]
    DuplicateScope { line: usize, scope_id: String },
    #[error("line {line}: project {scope_id} does not exist")]
    UnknownScope { line: usize, scope_id: String },
    #[error("line {line}, column {column} ({resource}): invalid limit {value:?}, expected an integer >= -1, `Unlimited` or `No Change`")]
    InvalidValue {
        line: usize,
        column: usize,
        resource: String,
        value: String,
    },
    #[error("disable list is empty")]
    EmptyDisableList,
    #[error("invalid resource type id in disable list: {0:?}")]
    InvalidResourceId(String),
    #[error("unknown resource type id in disable list: {id} (known ids: {known})")]
    UnknownResourceType { id: u32, known: String },
}

pub fn parse_desired_value(raw: &str) -> Option<DesiredLimit> {
    let v = raw.trim();
    if v.eq_ignore_ascii_case("no change") {
        return Some(DesiredLimit::NoChange);
    }
    if v.eq_ignore_ascii_case("unlimited") {
        return Some(DesiredLimit::Max(UNLIMITED));
    }
    match v.parse::<i64>() {
        Ok(n) if n >= UNLIMITED => Some(DesiredLimit::Max(n)),
        _ => None,
    }
}

/// Parse a `domain;project;uuid;<limit>...` table, limits in catalogue id order.
///
/// The header line written by `limits --print-limits` is skipped, as are
/// blank lines and one trailing empty field per row.
pub fn parse_desired_table(
    catalogue: &ResourceCatalogue,
    text: &str,
) -> Result<DesiredState, DesiredStateError> {
    let header = limits_csv_header(catalogue);
    let expected = SCOPE_COLUMNS + catalogue.len();
    let mut rows = BTreeMap::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim_end_matches('\r');
        if trimmed.trim().is_empty() || trimmed.trim_end_matches(';') == header {
            continue;
        }
        let mut fields: Vec<&str> = trimmed.split(';').collect();
        if fields.len() == expected + 1 && fields.last().is_some_and(|f| f.trim().is_empty()) {
            fields.pop();
        }
        if fields.len() != expected {
            return Err(DesiredStateError::ColumnCount {
                line,
                expected,
                limits: catalogue.len(),
                found: fields.len(),
            });
        }

        let scope_id = fields[2].trim().to_string();
        if scope_id.is_empty() {
            return Err(DesiredStateError::MissingScopeId { line });
        }

        let mut target = ScopeTarget {
            line: Some(line),
            ..ScopeTarget::default()
        };
        for (offset, t) in catalogue.iter().enumerate() {
            let column = SCOPE_COLUMNS + offset;
            let value = fields[column];
            let limit = parse_desired_value(value).ok_or_else(|| DesiredStateError::InvalidValue {
                line,
                column: column + 1,
                resource: t.name.clone(),
                value: value.to_string(),
            })?;
            target.limits.insert(t.id, limit);
        }

        if rows.insert(scope_id.clone(), target).is_some() {
            return Err(DesiredStateError::DuplicateScope { line, scope_id });
        }
    }
    Ok(DesiredState::PerScope(rows))
}

pub fn load_desired_table(catalogue: &ResourceCatalogue, path: &Path) -> anyhow::Result<DesiredState> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read limits file {}", path.display()))?;
    let state = parse_desired_table(catalogue, &raw)
        .with_context(|| format!("invalid limits file {}", path.display()))?;
    Ok(state)
}

/// Every row of a limits file must name an existing project, checked in line order.
pub fn check_scope_ids(desired: &DesiredState, known: &[Scope]) -> Result<(), DesiredStateError> {
    let DesiredState::PerScope(rows) = desired else {
        return Ok(());
    };
    let mut unknown: Vec<(usize, &str)> = rows
        .iter()
        .filter(|(id, _)| !known.iter().any(|s| &s.id == *id))
        .map(|(id, t)| (t.line.unwrap_or_default(), id.as_str()))
        .collect();
    unknown.sort();
    match unknown.first() {
        Some(&(line, scope_id)) => Err(DesiredStateError::UnknownScope {
            line,
            scope_id: scope_id.to_string(),
        }),
        None => Ok(()),
    }
}

/// Turn `"1,2,7"` into a target that sets exactly those types to unlimited.
pub fn parse_disable_list(
    catalogue: &ResourceCatalogue,
    raw: &str,
) -> Result<DesiredState, DesiredStateError> {
    let mut disable = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id: u32 = part
            .parse()
            .map_err(|_| DesiredStateError::InvalidResourceId(part.to_string()))?;
        if catalogue.get(id).is_none() {
            let known = catalogue
                .ids()
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            return Err(DesiredStateError::UnknownResourceType { id, known });
        }
        disable.push(id);
    }
    if disable.is_empty() {
        return Err(DesiredStateError::EmptyDisableList);
    }

    let mut target = ScopeTarget::default();
    for t in catalogue.iter() {
        let limit = if disable.contains(&t.id) {
            DesiredLimit::Max(UNLIMITED)
        } else {
            DesiredLimit::NoChange
        };
        target.limits.insert(t.id, limit);
    }
    Ok(DesiredState::Uniform(target))
}
