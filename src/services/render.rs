use crate::domain::catalogue::ResourceCatalogue;
use crate::domain::limits::{Change, QuotaSnapshot};
use crate::domain::models::{Scope, ScopeLimit};

const TABLE_WIDTH: usize = 84;
const NO_CHANGE: &str = "No Change";

pub fn limits_csv_header(catalogue: &ResourceCatalogue) -> String {
    let mut cols = vec![
        "Domain".to_string(),
        "Project Name".to_string(),
        "Project UUID".to_string(),
    ];
    cols.extend(catalogue.iter().map(|t| t.name.clone()));
    cols.join(";")
}

/// One CSV row in catalogue id order; types the project lacks print as `No Change`.
pub fn limits_csv_row(scope: &Scope, catalogue: &ResourceCatalogue, snapshot: &QuotaSnapshot) -> String {
    let mut cols = vec![scope.domain.clone(), scope.name.clone(), scope.id.clone()];
    cols.extend(catalogue.iter().map(|t| match snapshot.get(t.id) {
        Some(e) => e.max.to_string(),
        None => NO_CHANGE.to_string(),
    }));
    cols.join(";")
}

pub fn scope_limits(catalogue: &ResourceCatalogue, snapshot: &QuotaSnapshot) -> Vec<ScopeLimit> {
    catalogue
        .iter()
        .filter_map(|t| {
            snapshot.get(t.id).map(|e| ScopeLimit {
                resource_type_id: t.id,
                resource_type: t.name.clone(),
                max: e.max,
                available: e.available,
            })
        })
        .collect()
}

fn rule() -> String {
    "-".repeat(TABLE_WIDTH)
}

/// Fixed-width review table for one project; no-ops show `No Change`.
pub fn render_change_table(scope: &Scope, changes: &[Change]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\nLimits for domain: {} - project: {}.\n",
        scope.domain, scope.name
    ));
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!(
        "| {:3} | {:23} | {:>14} | {:>14} | {:>14} |\n",
        "ID", "Name", "Capacity Left", "Old Max", "New Max"
    ));
    out.push_str(&rule());
    out.push('\n');
    for c in changes {
        let available = c
            .available
            .map(|a| a.to_string())
            .unwrap_or_else(|| "n.a.".to_string());
        let new_max = if c.is_candidate() {
            c.new_max.to_string()
        } else {
            NO_CHANGE.to_string()
        };
        out.push_str(&format!(
            "| {:>3} | {:23} | {:>14} | {:>14} | {:>14} |\n",
            c.resource_type.id, c.resource_type.name, available, c.old_max, new_max
        ));
    }
    out.push_str(&rule());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::{limits_csv_header, limits_csv_row, render_change_table};
    use crate::domain::catalogue::{ResourceCatalogue, ResourceType};
    use crate::domain::limits::{Change, ChangeKind, QuotaEntry, QuotaSnapshot};
    use crate::domain::models::Scope;

    fn scope() -> Scope {
        Scope {
            id: "p-1".to_string(),
            name: "Web".to_string(),
            domain: "ROOT".to_string(),
        }
    }

    #[test]
    fn csv_follows_catalogue_order() {
        let c = ResourceCatalogue::new(vec![
            ResourceType::new(2, "volume", "volumelimit", "volumeavailable"),
            ResourceType::new(0, "user_vm", "vmlimit", "vmavailable"),
        ])
        .unwrap();
        assert_eq!(
            limits_csv_header(&c),
            "Domain;Project Name;Project UUID;user_vm;volume"
        );
        let mut snap = QuotaSnapshot::default();
        snap.entries.insert(
            0,
            QuotaEntry {
                max: -1,
                available: Some(-1),
            },
        );
        assert_eq!(limits_csv_row(&scope(), &c, &snap), "ROOT;Web;p-1;-1;No Change");
    }

    #[test]
    fn table_rows_are_fixed_width() {
        let changes = vec![
            Change {
                resource_type: ResourceType::new(0, "user_vm", "vmlimit", "vmavailable"),
                available: Some(3),
                old_max: 10,
                new_max: 15,
                kind: ChangeKind::ApplyCandidate,
            },
            Change {
                resource_type: ResourceType::new(2, "volume", "volumelimit", "volumeavailable"),
                available: None,
                old_max: 20,
                new_max: 20,
                kind: ChangeKind::NoOp,
            },
        ];
        let table = render_change_table(&scope(), &changes);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[1], "Limits for domain: ROOT - project: Web.");
        assert!(lines[2..].iter().all(|l| l.len() == 84));
        assert_eq!(
            lines[5],
            "|   0 | user_vm                 |              3 |             10 |             15 |"
        );
        assert!(lines[6].ends_with("|           n.a. |             20 |      No Change |"));
    }
}
