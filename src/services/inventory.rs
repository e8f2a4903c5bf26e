use crate::cloudstack::{ApiError, CloudStackClient, ControlPlane};
use crate::domain::models::Scope;
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::collections::BTreeSet;

pub const GIB: u64 = 1024 * 1024 * 1024;
const ROOT_DOMAIN: &str = "ROOT";

pub fn listall() -> Vec<(&'static str, String)> {
    vec![("listall", "true".to_string())]
}

fn with_project<'a>(params: &[(&'a str, String)], project_id: &str) -> Vec<(&'a str, String)> {
    let mut out = params.to_vec();
    out.push(("projectid", project_id.to_string()));
    out
}

/// Projects in the order reports walk them.
pub fn projects_by_name(api: &CloudStackClient) -> Result<Vec<Scope>, ApiError> {
    let mut projects = api.list_scopes()?;
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects)
}

/// Records outside projects, then the records of every project.
///
/// Plain list calls leave project-owned records out, so each project is
/// listed again with its `projectid`.
pub fn list_everywhere<T: DeserializeOwned>(
    api: &CloudStackClient,
    command: &str,
    entity: &str,
    params: &[(&str, String)],
) -> Result<Vec<T>, ApiError> {
    let mut out = api.list_records(command, entity, params)?;
    for p in projects_by_name(api)? {
        out.extend(api.list_records::<T>(command, entity, &with_project(params, &p.id))?);
    }
    Ok(out)
}

/// Keep the first record per key.
pub fn dedup_by<T, K: Ord>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut seen = BTreeSet::new();
    items.into_iter().filter(|i| seen.insert(key(i))).collect()
}

/// Domain order with `ROOT` ahead of every other domain.
pub fn domain_order(a: &str, b: &str) -> Ordering {
    (a != ROOT_DOMAIN, a).cmp(&(b != ROOT_DOMAIN, b))
}

/// Case-insensitive ordering used by the account and snapshot reports.
pub fn caseless(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn text_or_na<T: ToString>(v: &Option<T>) -> String {
    v.as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "n.a.".to_string())
}
