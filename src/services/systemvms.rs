use crate::cloudstack::{ApiError, CloudStackClient};
use crate::domain::models::{Router, SystemVm, SystemVmRow};
use crate::services::inventory::{listall, projects_by_name};

pub const VIRTUAL_ROUTER: &str = "virtual router";
pub const SECONDARY_STORAGE_VM: &str = "secondarystoragevm";
const NA: &str = "n.a.";

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemVmFilter {
    pub only_virtual_routers: bool,
    pub only_secondary_storage_vms: bool,
}

/// Virtual routers of every project plus the zone-wide system VMs.
pub fn collect_system_vms(api: &CloudStackClient) -> Result<Vec<SystemVmRow>, ApiError> {
    let routers: Vec<Router> = api.list_records("listRouters", "router", &listall())?;
    let mut rows: Vec<SystemVmRow> = routers.into_iter().map(|r| router_row(r, "")).collect();

    let system_vms: Vec<SystemVm> = api.list_records("listSystemVms", "systemvm", &listall())?;
    rows.extend(system_vms.into_iter().map(system_vm_row));

    for p in projects_by_name(api)? {
        let mut params = listall();
        params.push(("projectid", p.id.clone()));
        let routers: Vec<Router> = api.list_records("listRouters", "router", &params)?;
        rows.extend(routers.into_iter().map(|r| router_row(r, &p.name)));
    }
    Ok(rows)
}

/// Host, link-local address and network are only meaningful while the router runs.
pub fn router_row(r: Router, project: &str) -> SystemVmRow {
    let running = r.state == "Running";
    let if_running = |v: String| if running { v } else { NA.to_string() };
    let public_ip = r
        .nic
        .first()
        .map(|n| n.ipaddress.clone())
        .unwrap_or_else(|| NA.to_string());
    SystemVmRow {
        project: project.to_string(),
        kind: VIRTUAL_ROUTER.to_string(),
        network: if_running(r.guestnetworkname),
        redundant: r.isredundantrouter.to_string(),
        redundant_state: r.redundantstate,
        state: r.state.clone(),
        name: r.name,
        hostname: if_running(r.hostname),
        public_ip,
        linklocal_ip: if_running(r.linklocalip),
    }
}

pub fn system_vm_row(s: SystemVm) -> SystemVmRow {
    SystemVmRow {
        project: String::new(),
        kind: s.systemvmtype,
        network: NA.to_string(),
        redundant: NA.to_string(),
        redundant_state: NA.to_string(),
        state: s.state,
        name: s.name,
        hostname: s.hostname,
        public_ip: s.publicip,
        linklocal_ip: s.linklocalip,
    }
}

pub fn filter_system_vms(rows: Vec<SystemVmRow>, filter: SystemVmFilter) -> Vec<SystemVmRow> {
    rows.into_iter()
        .filter(|r| !filter.only_virtual_routers || r.kind == VIRTUAL_ROUTER)
        .filter(|r| !filter.only_secondary_storage_vms || r.kind == SECONDARY_STORAGE_VM)
        .collect()
}

pub fn sort_system_vms(rows: &mut [SystemVmRow]) {
    rows.sort_by(|a, b| (&a.project, &a.kind, &a.network).cmp(&(&b.project, &b.kind, &b.network)));
}

pub fn system_vms_csv(rows: &[SystemVmRow]) -> String {
    let mut out = String::from(
        "Projekt;System-VM Type;Networkname for VR;Is Redundant for Router;Redundant State of Router;State;Name;Hostname;Public IP;Linklocal IP\n",
    );
    for r in rows {
        out.push_str(&format!(
            "{};{};{};{};{};{};{};{};{};{}\n",
            r.project,
            r.kind,
            r.network,
            r.redundant,
            r.redundant_state,
            r.state,
            r.name,
            r.hostname,
            r.public_ip,
            r.linklocal_ip
        ));
    }
    out
}
