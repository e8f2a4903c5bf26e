use serde::Serialize;
use std::collections::HashSet;

/// One quota dimension and the record fields carrying its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    pub id: u32,
    pub name: String,
    pub limit_key: String,
    pub available_key: String,
}

impl ResourceType {
    pub fn new(id: u32, name: &str, limit_key: &str, available_key: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            limit_key: limit_key.to_string(),
            available_key: available_key.to_string(),
        }
    }
}

// Type 5 (project) has no per-project limit and is left out.
const CLOUDSTACK_RESOURCE_TYPES: &[(u32, &str, &str, &str)] = &[
    (0, "user_vm", "vmlimit", "vmavailable"),
    (1, "public_ip", "iplimit", "ipavailable"),
    (2, "volume", "volumelimit", "volumeavailable"),
    (3, "snapshot", "snapshotlimit", "snapshotavailable"),
    (4, "template", "templatelimit", "templateavailable"),
    (6, "network", "networklimit", "networkavailable"),
    (7, "vpc", "vpclimit", "vpcavailable"),
    (8, "cpu", "cpulimit", "cpuavailable"),
    (9, "memory", "memorylimit", "memoryavailable"),
    (
        10,
        "primary_storage",
        "primarystoragelimit",
        "primarystorageavailable",
    ),
    (
        11,
        "secondary_storage",
        "secondarystoragelimit",
        "secondarystorageavailable",
    ),
];

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("resource catalogue is empty")]
    Empty,
    #[error("duplicate resource type id: {0}")]
    DuplicateId(u32),
    #[error("resource type {0} has an empty name or record field")]
    EmptyField(u32),
    #[error("record field used by more than one resource type: {0}")]
    DuplicateField(String),
}

/// Ordered, immutable registry of resource types.
///
/// Iteration order is the canonical id order; it drives both the column
/// layout of limit files and the order changes are shown and applied in.
#[derive(Debug, Clone)]
pub struct ResourceCatalogue {
    types: Vec<ResourceType>,
}

impl ResourceCatalogue {
    pub fn new(mut types: Vec<ResourceType>) -> Result<Self, CatalogueError> {
        if types.is_empty() {
            return Err(CatalogueError::Empty);
        }
        let mut ids = HashSet::new();
        let mut fields = HashSet::new();
        for t in &types {
            if !ids.insert(t.id) {
                return Err(CatalogueError::DuplicateId(t.id));
            }
            if t.name.trim().is_empty()
                || t.limit_key.trim().is_empty()
                || t.available_key.trim().is_empty()
            {
                return Err(CatalogueError::EmptyField(t.id));
            }
            for field in [&t.limit_key, &t.available_key] {
                if !fields.insert(field.clone()) {
                    return Err(CatalogueError::DuplicateField(field.clone()));
                }
            }
        }
        types.sort_by_key(|t| t.id);
        Ok(Self { types })
    }

    /// The resource types a CloudStack project carries limits for.
    pub fn cloudstack() -> Self {
        let mut types: Vec<ResourceType> = CLOUDSTACK_RESOURCE_TYPES
            .iter()
            .map(|(id, name, limit, avail)| ResourceType::new(*id, name, limit, avail))
            .collect();
        types.sort_by_key(|t| t.id);
        Self { types }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.iter()
    }

    pub fn get(&self, id: u32) -> Option<&ResourceType> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.types.iter().map(|t| t.id).collect()
    }
}
