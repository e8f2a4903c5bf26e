use crate::cloudstack::{ApiError, ControlPlane};
use crate::domain::catalogue::ResourceType;
use crate::services::storage::AuditLog;

/// Issues exactly one update call per approved change. Never retries.
pub struct ApplyDriver<'a, C: ControlPlane> {
    api: &'a C,
    audit: &'a AuditLog,
}

impl<'a, C: ControlPlane> ApplyDriver<'a, C> {
    pub fn new(api: &'a C, audit: &'a AuditLog) -> Self {
        Self { api, audit }
    }

    pub fn apply(
        &self,
        scope_id: &str,
        resource_type: &ResourceType,
        new_max: i64,
    ) -> Result<(), ApiError> {
        let result = self
            .api
            .update_resource_quota(scope_id, resource_type.id, new_max);
        let mut data = serde_json::json!({
            "project_id": scope_id,
            "resource_type": resource_type.id,
            "resource_name": resource_type.name,
            "max": new_max,
        });
        match &result {
            Ok(()) => {
                tracing::info!(
                    project_id = scope_id,
                    resource = %resource_type.name,
                    max = new_max,
                    "limit updated"
                );
                data["status"] = "applied".into();
            }
            Err(e) => {
                tracing::warn!(
                    project_id = scope_id,
                    resource = %resource_type.name,
                    max = new_max,
                    error = %e,
                    "limit update failed"
                );
                data["status"] = "failed".into();
                data["error"] = e.to_string().into();
            }
        }
        self.audit.record("update_resource_limit", data);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::ApplyDriver;
    use crate::domain::catalogue::ResourceType;
    use crate::services::storage::AuditLog;
    use crate::services::testing::FakeControlPlane;

    #[test]
    fn one_call_per_apply_and_failures_surface() {
        let api = FakeControlPlane::default().failing_on(2);
        let audit = AuditLog::disabled();
        let driver = ApplyDriver::new(&api, &audit);
        let vm = ResourceType::new(0, "user_vm", "vmlimit", "vmavailable");
        let vol = ResourceType::new(2, "volume", "volumelimit", "volumeavailable");

        assert!(driver.apply("p-1", &vm, 15).is_ok());
        assert!(driver.apply("p-1", &vol, 5).is_err());
        assert!(driver.apply("p-1", &vm, 15).is_ok());
        assert_eq!(
            api.updates(),
            vec![
                ("p-1".to_string(), 0, 15),
                ("p-1".to_string(), 2, 5),
                ("p-1".to_string(), 0, 15)
            ]
        );
    }

    #[test]
    fn attempts_are_audited() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        let api = FakeControlPlane::default().failing_on(2);
        let audit = AuditLog::at(path.clone());
        let driver = ApplyDriver::new(&api, &audit);
        let vol = ResourceType::new(2, "volume", "volumelimit", "volumeavailable");
        let _ = driver.apply("p-1", &vol, -1);

        let raw = std::fs::read_to_string(path).unwrap();
        let event: serde_json::Value = serde_json::from_str(raw.trim()).unwrap();
        assert_eq!(event["data"]["status"], "failed");
        assert_eq!(event["data"]["max"], -1);
    }
}
