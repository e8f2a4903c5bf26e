use crate::cloudstack::{ApiError, ControlPlane, QuotaRecord};
use crate::domain::catalogue::ResourceCatalogue;
use crate::domain::limits::{QuotaEntry, QuotaSnapshot, UNLIMITED};
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("field `{field}` has an unreadable value: {value}")]
    BadValue { field: String, value: String },
}

/// Read a limit or capacity value; `Unlimited` maps to -1.
fn parse_quota_value(field: &str, value: &Value, allow_fraction: bool) -> Result<i64, SnapshotError> {
    let bad = || SnapshotError::BadValue {
        field: field.to_string(),
        value: value.to_string(),
    };
    let number = match value {
        Value::String(s) if s.trim().eq_ignore_ascii_case("unlimited") => return Ok(UNLIMITED),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| bad())?,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            n.as_f64().ok_or_else(bad)?
        }
        _ => return Err(bad()),
    };
    if !number.is_finite() || (!allow_fraction && number.fract() != 0.0) {
        return Err(bad());
    }
    Ok(number.trunc() as i64)
}

/// Build a snapshot from one project record.
///
/// Resource types whose limit field is missing are left out of the
/// snapshot; a missing capacity field only blanks the display value.
pub fn snapshot_from_record(
    catalogue: &ResourceCatalogue,
    record: &QuotaRecord,
) -> Result<QuotaSnapshot, SnapshotError> {
    let mut snapshot = QuotaSnapshot::default();
    for t in catalogue.iter() {
        let Some(raw_max) = record.get(&t.limit_key) else {
            continue;
        };
        let max = parse_quota_value(&t.limit_key, raw_max, false)?;
        let available = match record.get(&t.available_key) {
            Some(v) => Some(parse_quota_value(&t.available_key, v, true)?),
            None => None,
        };
        snapshot.entries.insert(t.id, QuotaEntry { max, available });
    }
    Ok(snapshot)
}

/// Always asks the control plane; snapshots are never reused.
pub fn fetch_snapshot(
    api: &impl ControlPlane,
    catalogue: &ResourceCatalogue,
    scope_id: &str,
) -> Result<QuotaSnapshot, SnapshotError> {
    let record = api.list_resource_quotas(scope_id)?;
    snapshot_from_record(catalogue, &record)
}
