use crate::cloudstack::{ApiError, ControlPlane};
use crate::domain::models::Scope;

#[derive(thiserror::Error, Debug)]
pub enum ScopeSelectionError {
    #[error("Project id \"{id}\" is not valid, please choose a UUID from below:\n{listing}")]
    UnknownScope { id: String, listing: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub fn sort_scopes(scopes: &mut [Scope]) {
    scopes.sort_by(|a, b| (&a.domain, &a.name, &a.id).cmp(&(&b.domain, &b.name, &b.id)));
}

pub fn scope_listing(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(|s| {
            format!(
                "Domain: {}; Project Name: {}; Project UUID: {}",
                s.domain, s.name, s.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// All projects sorted by domain and name, or only the one with `only` as id.
pub fn select_scopes(
    api: &impl ControlPlane,
    only: Option<&str>,
) -> Result<Vec<Scope>, ScopeSelectionError> {
    select_from(api.list_scopes()?, only)
}

/// [`select_scopes`] over an already fetched project list.
pub fn select_from(
    mut scopes: Vec<Scope>,
    only: Option<&str>,
) -> Result<Vec<Scope>, ScopeSelectionError> {
    sort_scopes(&mut scopes);
    let Some(id) = only else {
        return Ok(scopes);
    };
    let selected: Vec<Scope> = scopes.iter().filter(|s| s.id == id).cloned().collect();
    if selected.is_empty() {
        return Err(ScopeSelectionError::UnknownScope {
            id: id.to_string(),
            listing: scope_listing(&scopes),
        });
    }
    Ok(selected)
}

pub fn projects_csv(scopes: &[Scope]) -> String {
    let mut out = String::from("Domain;Project Name;Project UUID\n");
    for s in scopes {
        out.push_str(&format!("{};{};{}\n", s.domain, s.name, s.id));
    }
    out
}
