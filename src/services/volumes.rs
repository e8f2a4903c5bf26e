use crate::cloudstack::{ApiError, CloudStackClient};
use crate::domain::models::Volume;
use crate::services::inventory::{domain_order, list_everywhere, listall, GIB};

#[derive(Debug, Default, Clone)]
pub struct VolumeFilter {
    pub project: Option<String>,
    pub storage: Option<String>,
    pub only_detached: bool,
}

/// Volumes outside projects plus the volumes of every project.
pub fn collect_volumes(api: &CloudStackClient) -> Result<Vec<Volume>, ApiError> {
    list_everywhere(api, "listVolumes", "volume", &listall())
}

pub fn filter_volumes(volumes: Vec<Volume>, filter: &VolumeFilter) -> Vec<Volume> {
    volumes
        .into_iter()
        .filter(|v| filter.project.as_ref().map(|p| &v.project == p).unwrap_or(true))
        .filter(|v| filter.storage.as_ref().map(|s| &v.storage == s).unwrap_or(true))
        .filter(|v| !filter.only_detached || v.is_detached())
        .collect()
}

pub fn sort_volumes(volumes: &mut [Volume]) {
    volumes.sort_by(|a, b| {
        domain_order(&a.domain, &b.domain)
            .then_with(|| a.project.cmp(&b.project))
            .then_with(|| a.name.cmp(&b.name))
    });
}

pub fn volumes_csv(volumes: &[Volume]) -> String {
    let mut out = String::from(
        "Domain;Project;VM Name;Cluster;Hypervisor;Storage;Name;Size [GB];Diskoffering;Path\n",
    );
    for v in volumes {
        out.push_str(&format!(
            "{};{};{};{};{};{};{};{};{};{}\n",
            v.domain,
            v.project,
            v.vmname,
            v.clustername,
            v.hypervisor,
            v.storage,
            v.name,
            v.size / GIB,
            v.diskofferingname,
            v.path
        ));
    }
    out
}
