use crate::domain::models::VariableDiff;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const SECTION_MARKER: &str = "---------";
const NOT_PROVIDED: &str = "setting not provided";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub cnf_param_name: String,
    pub unit: String,
    pub annotation: String,
}

/// Read the variable table printed by `mysqld --verbose --help`.
///
/// The table starts after the dashed separator line and ends at the next
/// empty line. The value is whatever follows the name, trimmed.
pub fn parse_variable_set(text: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    let mut in_table = false;
    for line in text.lines() {
        if !in_table {
            in_table = line.starts_with(SECTION_MARKER);
            continue;
        }
        if line.is_empty() {
            in_table = false;
            continue;
        }
        let Some(name) = line.split_whitespace().next() else {
            continue;
        };
        let value = line.trim_start()[name.len()..].trim();
        vars.insert(name.to_string(), value.to_string());
    }
    vars
}

/// `name;cnf_param_name[;unit[;annotation]]` per line.
pub fn parse_annotations(text: &str) -> BTreeMap<String, Annotation> {
    let mut out = BTreeMap::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let cols: Vec<&str> = line.split(';').collect();
        let field = |i: usize| cols.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        out.insert(
            field(0),
            Annotation {
                cnf_param_name: field(1),
                unit: field(2),
                annotation: field(3),
            },
        );
    }
    out
}

pub fn compare_variable_sets(
    new: &BTreeMap<String, String>,
    template: &BTreeMap<String, String>,
    annotations: &BTreeMap<String, Annotation>,
) -> Vec<VariableDiff> {
    let keys: BTreeSet<&String> = new.keys().chain(template.keys()).collect();
    keys.into_iter()
        .filter_map(|key| {
            let (value_new, value_template) = match (new.get(key), template.get(key)) {
                (Some(n), Some(t)) if n == t => return None,
                (Some(n), Some(t)) => (n.clone(), t.clone()),
                (Some(n), None) => (n.clone(), NOT_PROVIDED.to_string()),
                (None, Some(t)) => (NOT_PROVIDED.to_string(), t.clone()),
                (None, None) => return None,
            };
            let a = annotations.get(key).cloned().unwrap_or_default();
            Some(VariableDiff {
                setting: key.clone(),
                cnf_param_name: a.cnf_param_name,
                value_new,
                value_template,
                unit: a.unit,
                annotation: a.annotation,
            })
        })
        .collect()
}

pub fn differences_csv(diffs: &[VariableDiff]) -> String {
    let mut out = String::from("Setting;CNF Param Name;New Value;Template Value;Unit;Annotation\n");
    for d in diffs {
        out.push_str(&format!(
            "{};{};{};{};{};{}\n",
            d.setting, d.cnf_param_name, d.value_new, d.value_template, d.unit, d.annotation
        ));
    }
    out
}

pub fn diff_files(
    new_settings: &Path,
    template_settings: &Path,
    annotations: Option<&Path>,
) -> anyhow::Result<Vec<VariableDiff>> {
    let read = |p: &Path| {
        std::fs::read_to_string(p).with_context(|| format!("cannot read {}", p.display()))
    };
    let new = parse_variable_set(&read(new_settings)?);
    let template = parse_variable_set(&read(template_settings)?);
    let annotations = match annotations {
        Some(p) => parse_annotations(&read(p)?),
        None => BTreeMap::new(),
    };
    Ok(compare_variable_sets(&new, &template, &annotations))
}
