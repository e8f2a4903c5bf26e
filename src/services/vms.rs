use crate::cloudstack::{ApiError, CloudStackClient};
use crate::domain::models::{NicRow, VirtualMachine, Volume, VolumeTotals};
use crate::services::inventory::{domain_order, list_everywhere, listall, GIB};

#[derive(Debug, Default, Clone)]
pub struct VmFilter {
    pub project: Option<String>,
    pub host: Option<String>,
    pub only_running: bool,
    pub only_stopped: bool,
}

pub fn collect_vms(api: &CloudStackClient) -> Result<Vec<VirtualMachine>, ApiError> {
    list_everywhere(api, "listVirtualMachines", "virtualmachine", &listall())
}

/// Fill in the size and count of every VM's volumes.
pub fn add_volume_totals(api: &CloudStackClient, vms: &mut [VirtualMachine]) -> Result<(), ApiError> {
    for vm in vms.iter_mut() {
        let mut params = listall();
        params.push(("virtualmachineid", vm.id.clone()));
        if vm.in_project() {
            params.push(("projectid", vm.projectid.clone()));
        }
        let volumes: Vec<Volume> = api.list_records("listVolumes", "volume", &params)?;
        vm.volumes = Some(volume_totals(&volumes));
    }
    Ok(())
}

pub fn volume_totals(volumes: &[Volume]) -> VolumeTotals {
    VolumeTotals {
        size_gib: volumes.iter().map(|v| v.size).sum::<u64>() / GIB,
        count: volumes.len(),
    }
}

pub fn filter_vms(vms: Vec<VirtualMachine>, filter: &VmFilter) -> Vec<VirtualMachine> {
    vms.into_iter()
        .filter(|v| !filter.only_running || v.state == "Running")
        .filter(|v| !filter.only_stopped || v.state == "Stopped")
        .filter(|v| filter.host.as_ref().map(|h| &v.hostname == h).unwrap_or(true))
        .filter(|v| filter.project.as_ref().map(|p| &v.project == p).unwrap_or(true))
        .collect()
}

pub fn sort_vms(vms: &mut [VirtualMachine]) {
    vms.sort_by(|a, b| (&a.domain, &a.project, &a.name).cmp(&(&b.domain, &b.project, &b.name)));
}

/// VM listing; volume columns when totals were collected, NIC columns when `with_networks`.
pub fn vms_csv(vms: &[VirtualMachine], with_networks: bool) -> String {
    let with_volumes = vms.iter().any(|v| v.volumes.is_some());
    let mut out = String::from("Domain;Project;Name;State;Hostname;CPUs;RAM [GB]");
    if with_volumes {
        out.push_str(";Volumes Total [GB];Volumes Count");
    }
    if with_networks {
        let max_nics = vms.iter().map(|v| v.nic.len()).max().unwrap_or(0);
        for i in 0..max_nics {
            out.push_str(&format!(";[{i}] Is Default;[{i}] Network Name"));
        }
    }
    out.push('\n');

    for v in vms {
        out.push_str(&format!(
            "{};{};{};{};{};{};{}",
            v.domain,
            v.project,
            v.name,
            v.state,
            v.hostname,
            v.cpunumber,
            v.memory / 1024
        ));
        if let Some(t) = v.volumes {
            out.push_str(&format!(";{};{}", t.size_gib, t.count));
        }
        if with_networks {
            let mut nics: Vec<_> = v.nic.iter().collect();
            nics.sort_by(|a, b| a.networkname.cmp(&b.networkname));
            for n in nics {
                out.push_str(&format!(";{};{}", n.isdefault, n.networkname));
            }
        }
        out.push('\n');
    }
    out
}

pub fn nic_rows(vms: &[VirtualMachine]) -> Vec<NicRow> {
    vms.iter()
        .flat_map(|vm| {
            vm.nic.iter().map(move |n| NicRow {
                domain: vm.domain.clone(),
                project: vm.project.clone(),
                vmname: vm.name.clone(),
                ipaddress: n.ipaddress.clone(),
                macaddress: n.macaddress.clone(),
                isdefault: n.isdefault,
                networkname: n.networkname.clone(),
            })
        })
        .collect()
}

pub fn filter_nics(rows: Vec<NicRow>, project: Option<&str>, network: Option<&str>) -> Vec<NicRow> {
    rows.into_iter()
        .filter(|r| project.map(|p| r.project == p).unwrap_or(true))
        .filter(|r| network.map(|n| r.networkname == n).unwrap_or(true))
        .collect()
}

pub fn sort_nics(rows: &mut [NicRow]) {
    rows.sort_by(|a, b| {
        domain_order(&a.domain, &b.domain).then_with(|| {
            (&a.project, &a.vmname, &a.ipaddress).cmp(&(&b.project, &b.vmname, &b.ipaddress))
        })
    });
}

pub fn nics_csv(rows: &[NicRow]) -> String {
    let mut out =
        String::from("Domain;Project;VM Name;IP Address;MAC Address;Default;Networkname\n");
    for r in rows {
        out.push_str(&format!(
            "{};{};{};{};{};{};{}\n",
            r.domain, r.project, r.vmname, r.ipaddress, r.macaddress, r.isdefault, r.networkname
        ));
    }
    out
}
