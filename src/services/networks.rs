use crate::cloudstack::{ApiError, CloudStackClient};
use crate::domain::models::Network;
use crate::services::inventory::{dedup_by, domain_order, list_everywhere, listall};

#[derive(Debug, Default, Clone)]
pub struct NetworkFilter {
    pub project: Option<String>,
    pub only_isolated: bool,
    pub only_shared: bool,
    pub only_redundant_vr: bool,
    pub only_not_redundant_vr: bool,
}

/// Networks of every project, each network once.
pub fn collect_networks(api: &CloudStackClient) -> Result<Vec<Network>, ApiError> {
    let networks: Vec<Network> = list_everywhere(api, "listNetworks", "network", &listall())?;
    Ok(dedup_by(networks, |n| n.id.clone()))
}

pub fn filter_networks(networks: Vec<Network>, filter: &NetworkFilter) -> Vec<Network> {
    networks
        .into_iter()
        .filter(|n| !filter.only_isolated || n.kind == "Isolated")
        .filter(|n| !filter.only_shared || n.kind == "Shared")
        .filter(|n| !filter.only_redundant_vr || n.redundantrouter)
        .filter(|n| !filter.only_not_redundant_vr || !n.redundantrouter)
        .filter(|n| filter.project.as_ref().map(|p| &n.project == p).unwrap_or(true))
        .collect()
}

pub fn sort_networks(networks: &mut [Network]) {
    networks.sort_by(|a, b| {
        domain_order(&a.domain, &b.domain)
            .then_with(|| (&a.project, &a.name).cmp(&(&b.project, &b.name)))
    });
}

pub fn networks_csv(networks: &[Network]) -> String {
    let mut out = String::from(
        "Domain;Project;Name;Type;State;Restart Required;CIDR;VLAN;Is Redundant\n",
    );
    for n in networks {
        out.push_str(&format!(
            "{};{};{};{};{};{};{};{};{}\n",
            n.domain,
            n.project,
            n.name,
            n.kind,
            n.state,
            n.restartrequired,
            n.cidr,
            n.vlan,
            n.redundantrouter
        ));
    }
    out
}
