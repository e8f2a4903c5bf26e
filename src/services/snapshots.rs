use crate::cloudstack::{ApiError, CloudStackClient};
use crate::domain::models::{
    SnapshotKind, SnapshotRow, VirtualMachine, VmSnapshot, Volume, VolumeSnapshot,
};
use crate::services::inventory::{caseless, list_everywhere, listall, text_or_na};

#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotSelection {
    pub only_volume: bool,
    pub only_vm: bool,
}

pub fn collect_snapshots(
    api: &CloudStackClient,
    selection: SnapshotSelection,
) -> Result<Vec<SnapshotRow>, ApiError> {
    let mut rows = Vec::new();
    if !selection.only_vm {
        let snapshots: Vec<VolumeSnapshot> =
            list_everywhere(api, "listSnapshots", "snapshot", &listall())?;
        for s in snapshots {
            let volume = snapshot_volume(api, &s)?;
            rows.push(volume_snapshot_row(s, volume.as_ref()));
        }
    }
    if !selection.only_volume {
        let vms: Vec<VirtualMachine> =
            list_everywhere(api, "listVirtualMachines", "virtualmachine", &listall())?;
        for vm in vms {
            let mut params = listall();
            params.push(("virtualmachineid", vm.id.clone()));
            if vm.in_project() {
                params.push(("projectid", vm.projectid.clone()));
            }
            let snapshots: Vec<VmSnapshot> =
                api.list_records("listVMSnapshot", "vmSnapshot", &params)?;
            rows.extend(snapshots.into_iter().map(|s| vm_snapshot_row(s, &vm.name)));
        }
    }
    Ok(rows)
}

/// The volume a snapshot was taken of, if it still exists.
fn snapshot_volume(api: &CloudStackClient, s: &VolumeSnapshot) -> Result<Option<Volume>, ApiError> {
    let mut params = listall();
    params.push(("id", s.volumeid.clone()));
    if let Some(project_id) = &s.projectid {
        params.push(("projectid", project_id.clone()));
    }
    let volumes: Vec<Volume> = api.list_records("listVolumes", "volume", &params)?;
    Ok(volumes.into_iter().next())
}

pub fn volume_snapshot_row(s: VolumeSnapshot, volume: Option<&Volume>) -> SnapshotRow {
    SnapshotRow {
        domain: s.domain,
        project: s.project,
        vmname: volume
            .map(|v| v.vmname.clone())
            .unwrap_or_else(|| "n.a.".to_string()),
        volume: Some(
            volume
                .map(|v| v.name.clone())
                .unwrap_or_else(|| "n.a.".to_string()),
        ),
        name: s.name,
        kind: SnapshotKind::Volume,
        state: s.state,
        created: s.created,
        physicalsize: Some(s.physicalsize),
        intervaltype: Some(s.intervaltype),
        revertable: Some(s.revertable),
        snapshottype: Some(s.snapshottype),
    }
}

pub fn vm_snapshot_row(s: VmSnapshot, vmname: &str) -> SnapshotRow {
    SnapshotRow {
        domain: s.domain,
        project: s.project,
        vmname: vmname.to_string(),
        volume: None,
        name: s.name,
        kind: SnapshotKind::Vm,
        state: s.state,
        created: s.created,
        physicalsize: None,
        intervaltype: None,
        revertable: None,
        snapshottype: None,
    }
}

pub fn sort_snapshots(rows: &mut [SnapshotRow]) {
    rows.sort_by(|a, b| {
        caseless(&a.domain, &b.domain)
            .then_with(|| caseless(&a.project, &b.project))
            .then_with(|| caseless(&a.vmname, &b.vmname))
            .then_with(|| a.created.cmp(&b.created))
    });
}

pub fn snapshots_csv(rows: &[SnapshotRow]) -> String {
    let mut out = String::from(
        "Domain;Projekt;VM Name;Volumename;Snapshot Name;VM or Volume Snapshot;State;Created;Physical Size;Intervaltype;Revertable;Type\n",
    );
    for r in rows {
        let kind = match r.kind {
            SnapshotKind::Volume => "Volume Snapshot",
            SnapshotKind::Vm => "VM Snapshot",
        };
        out.push_str(&format!(
            "{};{};{};{};{};{};{};{};{};{};{};{}\n",
            r.domain,
            r.project,
            r.vmname,
            text_or_na(&r.volume),
            r.name,
            kind,
            r.state,
            r.created,
            text_or_na(&r.physicalsize),
            text_or_na(&r.intervaltype),
            text_or_na(&r.revertable),
            text_or_na(&r.snapshottype)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{snapshots_csv, sort_snapshots, vm_snapshot_row, volume_snapshot_row};
    use crate::domain::models::{VmSnapshot, Volume, VolumeSnapshot};
    use serde_json::json;

    #[test]
    fn vm_and_volume_snapshots_share_one_listing() {
        let vol: VolumeSnapshot = serde_json::from_value(json!({
            "name": "daily-1", "domain": "customers", "project": "Shop", "projectid": "p-1",
            "volumeid": "vol-1", "state": "BackedUp", "created": "2024-03-02T01:00:00+0100",
            "physicalsize": 1024, "intervaltype": "DAILY", "revertable": true,
            "snapshottype": "RECURRING"
        }))
        .expect("volume snapshot");
        let volume: Volume = serde_json::from_value(json!({
            "name": "DATA-7", "domain": "customers", "vmname": "web-1"
        }))
        .expect("volume");
        let gone: VolumeSnapshot = serde_json::from_value(json!({
            "name": "orphan", "domain": "ROOT", "volumeid": "vol-9",
            "created": "2023-01-01T00:00:00+0100"
        }))
        .expect("orphan snapshot");
        let vm: VmSnapshot = serde_json::from_value(json!({
            "name": "before-upgrade", "domain": "customers", "project": "shop",
            "state": "Ready", "created": "2024-01-01T00:00:00+0100"
        }))
        .expect("vm snapshot");

        let mut rows = vec![
            volume_snapshot_row(vol, Some(&volume)),
            volume_snapshot_row(gone, None),
            vm_snapshot_row(vm, "Web-1"),
        ];
        sort_snapshots(&mut rows);
        let csv = snapshots_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "customers;shop;Web-1;n.a.;before-upgrade;VM Snapshot;Ready;2024-01-01T00:00:00+0100;n.a.;n.a.;n.a.;n.a."
        );
        assert_eq!(
            lines[2],
            "customers;Shop;web-1;DATA-7;daily-1;Volume Snapshot;BackedUp;2024-03-02T01:00:00+0100;1024;DAILY;true;RECURRING"
        );
        assert_eq!(
            lines[3],
            "ROOT;n.a.;n.a.;n.a.;orphan;Volume Snapshot;n.a.;2023-01-01T00:00:00+0100;0;n.a.;false;n.a."
        );
    }
}
