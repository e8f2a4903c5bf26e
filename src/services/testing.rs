use crate::cloudstack::{ApiError, ControlPlane, QuotaRecord};
use crate::domain::models::Scope;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

/// In-memory control plane recording every call.
#[derive(Default)]
pub struct FakeControlPlane {
    scopes: Vec<Scope>,
    records: HashMap<String, QuotaRecord>,
    fail_types: HashSet<u32>,
    fail_fetch: HashSet<String>,
    fetches: Cell<usize>,
    updates: RefCell<Vec<(String, u32, i64)>>,
}

impl FakeControlPlane {
    pub fn with_scope(mut self, id: &str, domain: &str, name: &str, record: serde_json::Value) -> Self {
        self.scopes.push(Scope {
            id: id.to_string(),
            name: name.to_string(),
            domain: domain.to_string(),
        });
        self.records
            .insert(id.to_string(), record.as_object().cloned().unwrap_or_default());
        self
    }

    pub fn failing_on(mut self, resource_type: u32) -> Self {
        self.fail_types.insert(resource_type);
        self
    }

    pub fn failing_fetch(mut self, scope_id: &str) -> Self {
        self.fail_fetch.insert(scope_id.to_string());
        self
    }

    pub fn scopes(&self) -> Vec<Scope> {
        self.scopes.clone()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }

    pub fn updates(&self) -> Vec<(String, u32, i64)> {
        self.updates.borrow().clone()
    }
}

impl ControlPlane for FakeControlPlane {
    fn list_scopes(&self) -> Result<Vec<Scope>, ApiError> {
        Ok(self.scopes.clone())
    }

    fn list_resource_quotas(&self, scope_id: &str) -> Result<QuotaRecord, ApiError> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail_fetch.contains(scope_id) {
            return Err(ApiError::Http {
                command: "listProjects".to_string(),
                status: 530,
                text: "unavailable".to_string(),
            });
        }
        self.records
            .get(scope_id)
            .cloned()
            .ok_or_else(|| ApiError::ScopeNotFound(scope_id.to_string()))
    }

    fn update_resource_quota(&self, scope_id: &str, resource_type: u32, max: i64) -> Result<(), ApiError> {
        self.updates
            .borrow_mut()
            .push((scope_id.to_string(), resource_type, max));
        if self.fail_types.contains(&resource_type) {
            return Err(ApiError::Api {
                command: "updateResourceLimit".to_string(),
                code: 431,
                text: format!("cannot update resource type {}", resource_type),
            });
        }
        Ok(())
    }
}
