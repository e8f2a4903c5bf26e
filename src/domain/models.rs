use serde::{Deserialize, Serialize};

const NOT_AVAILABLE: &str = "n.a.";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// A project as returned by `listProjects`; the unit limits are managed for.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Scope {
    pub id: String,
    pub name: String,
    pub domain: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Volume {
    pub name: String,
    pub domain: String,
    #[serde(default = "not_available")]
    pub project: String,
    #[serde(default = "not_available")]
    pub projectid: String,
    #[serde(default = "not_available")]
    pub vmname: String,
    #[serde(default = "not_available")]
    pub diskofferingname: String,
    #[serde(default = "not_available")]
    pub clustername: String,
    #[serde(default = "not_available")]
    pub hypervisor: String,
    #[serde(default = "not_available")]
    pub storage: String,
    #[serde(default = "not_available")]
    pub path: String,
    #[serde(default)]
    pub size: u64,
}

impl Volume {
    pub fn is_detached(&self) -> bool {
        self.vmname == NOT_AVAILABLE
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Nic {
    #[serde(default = "not_available")]
    pub networkname: String,
    #[serde(default = "not_available")]
    pub ipaddress: String,
    #[serde(default = "not_available")]
    pub macaddress: String,
    #[serde(default)]
    pub isdefault: bool,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct VolumeTotals {
    pub size_gib: u64,
    pub count: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VirtualMachine {
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(default = "not_available")]
    pub project: String,
    #[serde(default = "not_available")]
    pub projectid: String,
    #[serde(default = "not_available")]
    pub hostname: String,
    #[serde(default = "not_available")]
    pub state: String,
    #[serde(default)]
    pub cpunumber: u32,
    /// MiB.
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub nic: Vec<Nic>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<VolumeTotals>,
}

impl VirtualMachine {
    pub fn in_project(&self) -> bool {
        self.projectid != NOT_AVAILABLE
    }
}

/// One NIC with the VM it is plugged into.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NicRow {
    pub domain: String,
    pub project: String,
    pub vmname: String,
    pub ipaddress: String,
    pub macaddress: String,
    pub isdefault: bool,
    pub networkname: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(default = "not_available")]
    pub project: String,
    #[serde(default = "not_available")]
    pub projectid: String,
    #[serde(rename = "type", default = "not_available")]
    pub kind: String,
    #[serde(default = "not_available")]
    pub state: String,
    #[serde(default)]
    pub restartrequired: bool,
    #[serde(default = "not_available")]
    pub cidr: String,
    #[serde(default = "not_available")]
    pub vlan: String,
    #[serde(default)]
    pub redundantrouter: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VolumeSnapshot {
    pub name: String,
    pub domain: String,
    #[serde(default = "not_available")]
    pub project: String,
    #[serde(default)]
    pub projectid: Option<String>,
    pub volumeid: String,
    #[serde(default = "not_available")]
    pub state: String,
    #[serde(default = "not_available")]
    pub created: String,
    #[serde(default)]
    pub physicalsize: u64,
    #[serde(default = "not_available")]
    pub intervaltype: String,
    #[serde(default)]
    pub revertable: bool,
    #[serde(default = "not_available")]
    pub snapshottype: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VmSnapshot {
    pub name: String,
    pub domain: String,
    #[serde(default = "not_available")]
    pub project: String,
    #[serde(default = "not_available")]
    pub state: String,
    #[serde(default = "not_available")]
    pub created: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    Volume,
    Vm,
}

/// Volume and VM snapshots in one listing; volume-only fields are `None` for VM snapshots.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SnapshotRow {
    pub domain: String,
    pub project: String,
    pub vmname: String,
    pub volume: Option<String>,
    pub name: String,
    pub kind: SnapshotKind,
    pub state: String,
    pub created: String,
    pub physicalsize: Option<u64>,
    pub intervaltype: Option<String>,
    pub revertable: Option<bool>,
    pub snapshottype: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(default = "not_available")]
    pub project: String,
    /// Every `templatefilter` the template was listed under, joined with `/`.
    #[serde(skip_deserializing)]
    pub filters: String,
    #[serde(default = "not_available")]
    pub status: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default = "not_available")]
    pub hypervisor: String,
    #[serde(default = "not_available")]
    pub ostypename: String,
    #[serde(default = "not_available")]
    pub format: String,
    #[serde(default)]
    pub bootable: Option<bool>,
    #[serde(default)]
    pub isdynamicallyscalable: bool,
    #[serde(default)]
    pub isextractable: bool,
    #[serde(default)]
    pub ispublic: bool,
    #[serde(default)]
    pub isready: bool,
    #[serde(default)]
    pub passwordenabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Iso {
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(default = "not_available")]
    pub project: String,
    #[serde(default = "not_available")]
    pub projectid: String,
    #[serde(default = "not_available")]
    pub displaytext: String,
    #[serde(default = "not_available")]
    pub ostypename: String,
    #[serde(default = "not_available")]
    pub status: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub bootable: bool,
    #[serde(default)]
    pub isdynamicallyscalable: bool,
    #[serde(default)]
    pub isextractable: bool,
    #[serde(default)]
    pub isfeatured: bool,
    #[serde(default)]
    pub ispublic: bool,
    #[serde(default)]
    pub isready: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    pub username: String,
    pub domain: String,
    #[serde(default)]
    pub account: String,
    #[serde(default = "not_available")]
    pub firstname: String,
    #[serde(default = "not_available")]
    pub lastname: String,
    #[serde(default = "not_available")]
    pub email: String,
    #[serde(default = "not_available")]
    pub created: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SshKeyPair {
    pub name: String,
    pub domain: String,
    #[serde(default = "not_available")]
    pub project: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Router {
    pub name: String,
    #[serde(default = "not_available")]
    pub state: String,
    #[serde(default = "not_available")]
    pub hostname: String,
    #[serde(default = "not_available")]
    pub linklocalip: String,
    #[serde(default = "not_available")]
    pub guestnetworkname: String,
    #[serde(default)]
    pub isredundantrouter: bool,
    #[serde(default = "not_available")]
    pub redundantstate: String,
    #[serde(default)]
    pub nic: Vec<Nic>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SystemVm {
    pub name: String,
    pub systemvmtype: String,
    #[serde(default = "not_available")]
    pub state: String,
    #[serde(default = "not_available")]
    pub hostname: String,
    #[serde(default = "not_available")]
    pub publicip: String,
    #[serde(default = "not_available")]
    pub linklocalip: String,
}

/// A virtual router or system VM; router-only columns are `n.a.` for system VMs.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SystemVmRow {
    pub project: String,
    pub kind: String,
    pub network: String,
    pub redundant: String,
    pub redundant_state: String,
    pub state: String,
    pub name: String,
    pub hostname: String,
    pub public_ip: String,
    pub linklocal_ip: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Setting {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScopeLimit {
    pub resource_type_id: u32,
    pub resource_type: String,
    pub max: i64,
    pub available: Option<i64>,
}

#[derive(Serialize, Clone, Debug)]
pub struct ScopeLimits {
    pub scope_id: String,
    pub domain: String,
    pub name: String,
    pub limits: Vec<ScopeLimit>,
    pub fetch_error: Option<String>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Unchanged,
    Applied,
    Skipped,
    Failed,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChangeReport {
    pub resource_type_id: u32,
    pub resource_type: String,
    pub old_max: i64,
    pub new_max: i64,
    pub outcome: Outcome,
    pub error: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct ScopeReport {
    pub scope_id: String,
    pub domain: String,
    pub name: String,
    pub fetch_error: Option<String>,
    pub changes: Vec<ChangeReport>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub scopes: usize,
    pub failed_scopes: usize,
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub unchanged: usize,
}

#[derive(Serialize, Clone, Debug)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub scopes: Vec<ScopeReport>,
}

impl BatchReport {
    pub fn from_scopes(scopes: Vec<ScopeReport>) -> Self {
        let mut summary = BatchSummary {
            scopes: scopes.len(),
            ..BatchSummary::default()
        };
        for s in &scopes {
            if s.fetch_error.is_some() {
                summary.failed_scopes += 1;
            }
            for c in &s.changes {
                match c.outcome {
                    Outcome::Unchanged => summary.unchanged += 1,
                    Outcome::Applied => summary.applied += 1,
                    Outcome::Skipped => summary.skipped += 1,
                    Outcome::Failed => summary.failed += 1,
                }
            }
        }
        Self { summary, scopes }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct VariableDiff {
    pub setting: String,
    pub cnf_param_name: String,
    pub value_new: String,
    pub value_template: String,
    pub unit: String,
    pub annotation: String,
}
