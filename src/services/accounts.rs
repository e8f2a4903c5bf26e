use crate::cloudstack::{ApiError, CloudStackClient};
use crate::domain::models::{SshKeyPair, User};
use crate::services::inventory::{caseless, domain_order, listall, projects_by_name};

pub fn collect_users(api: &CloudStackClient) -> Result<Vec<User>, ApiError> {
    api.list_records("listUsers", "user", &listall())
}

pub fn sort_users(users: &mut [User]) {
    users.sort_by(|a, b| {
        caseless(&a.domain, &b.domain)
            .then_with(|| caseless(&a.account, &b.account))
            .then_with(|| caseless(&a.username, &b.username))
    });
}

pub fn users_csv(users: &[User]) -> String {
    let mut out = String::from("Domain;Username;First Name;Last Name;Email;Created;\n");
    for u in users {
        out.push_str(&format!(
            "{};{};{};{};{};{}\n",
            u.domain, u.username, u.firstname, u.lastname, u.email, u.created
        ));
    }
    out
}

/// Key pairs outside projects, then those of every project tagged with its name.
pub fn collect_ssh_keypairs(api: &CloudStackClient) -> Result<Vec<SshKeyPair>, ApiError> {
    let mut keys: Vec<SshKeyPair> = api.list_records("listSSHKeyPairs", "sshkeypair", &listall())?;
    for p in projects_by_name(api)? {
        let mut params = listall();
        params.push(("projectid", p.id.clone()));
        let mut owned: Vec<SshKeyPair> =
            api.list_records("listSSHKeyPairs", "sshkeypair", &params)?;
        for k in &mut owned {
            k.project = p.name.clone();
        }
        keys.extend(owned);
    }
    Ok(keys)
}

pub fn filter_ssh_keypairs(keys: Vec<SshKeyPair>, project: Option<&str>) -> Vec<SshKeyPair> {
    keys.into_iter()
        .filter(|k| project.map(|p| k.project == p).unwrap_or(true))
        .collect()
}

pub fn sort_ssh_keypairs(keys: &mut [SshKeyPair]) {
    keys.sort_by(|a, b| {
        domain_order(&a.domain, &b.domain)
            .then_with(|| (&a.project, &a.name).cmp(&(&b.project, &b.name)))
    });
}

pub fn ssh_keypairs_csv(keys: &[SshKeyPair]) -> String {
    let mut out = String::from("Domain;Project;Name\n");
    for k in keys {
        out.push_str(&format!("{};{};{}\n", k.domain, k.project, k.name));
    }
    out
}
