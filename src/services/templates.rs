use crate::cloudstack::{ApiError, CloudStackClient};
use crate::domain::models::{Iso, Template};
use crate::services::inventory::{
    dedup_by, domain_order, list_everywhere, listall, projects_by_name, text_or_na,
};

pub const DEFAULT_TEMPLATE_FILTERS: [&str; 6] = [
    "featured",
    "self",
    "selfexecutable",
    "sharedexecutable",
    "executable",
    "community",
];

/// Filters that list the same templates with or without a project.
const GLOBAL_FILTERS: [&str; 3] = ["featured", "community", "executable"];

pub fn parse_template_filters(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(r) => r
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect(),
        None => DEFAULT_TEMPLATE_FILTERS.iter().map(|f| f.to_string()).collect(),
    }
}

/// Templates listed under every filter, per project and outside projects.
pub fn collect_templates(
    api: &CloudStackClient,
    filters: &[String],
) -> Result<Vec<Template>, ApiError> {
    let mut out = Vec::new();
    for p in projects_by_name(api)? {
        for f in filters.iter().filter(|f| !GLOBAL_FILTERS.contains(&f.as_str())) {
            out.extend(list_templates(api, f, Some(&p.id))?);
        }
    }
    for f in filters {
        out.extend(list_templates(api, f, None)?);
    }
    Ok(merge_filters(out))
}

fn list_templates(
    api: &CloudStackClient,
    filter: &str,
    project_id: Option<&str>,
) -> Result<Vec<Template>, ApiError> {
    let mut params = listall();
    params.push(("templatefilter", filter.to_string()));
    if let Some(id) = project_id {
        params.push(("projectid", id.to_string()));
    }
    let mut templates: Vec<Template> = api.list_records("listTemplates", "template", &params)?;
    for t in &mut templates {
        t.filters = filter.to_string();
    }
    Ok(templates)
}

/// One record per template id, naming every filter it was listed under.
pub fn merge_filters(mut templates: Vec<Template>) -> Vec<Template> {
    templates.sort_by(|a, b| (&a.id, &a.filters).cmp(&(&b.id, &b.filters)));
    let mut out: Vec<Template> = Vec::new();
    for t in templates {
        match out.last_mut() {
            Some(last) if last.id == t.id => {
                if !last.filters.split('/').any(|f| f == t.filters) {
                    last.filters = format!("{}/{}", last.filters, t.filters);
                }
            }
            _ => out.push(t),
        }
    }
    out
}

pub fn sort_templates(templates: &mut [Template]) {
    templates.sort_by(|a, b| (&a.domain, &a.project, &a.name).cmp(&(&b.domain, &b.project, &b.name)));
}

pub fn templates_csv(templates: &[Template]) -> String {
    let mut out = String::from(
        "Domain;Project;Name;Templatetype;Status;Size;Hypervisor;OSTypename;Format;Bootable;isDynamicallyScalable;isExtractable;isPublic;isReady;Passwordenabled\n",
    );
    for t in templates {
        out.push_str(&format!(
            "{};{};{};{};{};{};{};{};{};{};{};{};{};{};{}\n",
            t.domain,
            t.project,
            t.name,
            t.filters,
            t.status,
            text_or_na(&t.size),
            t.hypervisor,
            t.ostypename,
            t.format,
            text_or_na(&t.bootable),
            t.isdynamicallyscalable,
            t.isextractable,
            t.ispublic,
            t.isready,
            t.passwordenabled
        ));
    }
    out
}

#[derive(Debug, Default, Clone)]
pub struct IsoFilter {
    pub project: Option<String>,
    pub only_public: bool,
    pub only_featured: bool,
}

pub fn collect_isos(api: &CloudStackClient) -> Result<Vec<Iso>, ApiError> {
    let mut isos: Vec<Iso> = list_everywhere(api, "listIsos", "iso", &listall())?;
    isos.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(dedup_by(isos, |i| i.id.clone()))
}

pub fn filter_isos(isos: Vec<Iso>, filter: &IsoFilter) -> Vec<Iso> {
    isos.into_iter()
        .filter(|i| !filter.only_public || i.ispublic)
        .filter(|i| !filter.only_featured || i.isfeatured)
        .filter(|i| filter.project.as_ref().map(|p| &i.project == p).unwrap_or(true))
        .collect()
}

pub fn sort_isos(isos: &mut [Iso]) {
    isos.sort_by(|a, b| {
        domain_order(&a.domain, &b.domain)
            .then_with(|| (&a.project, &a.name).cmp(&(&b.project, &b.name)))
    });
}

pub fn isos_csv(isos: &[Iso]) -> String {
    let mut out = String::from(
        "Domain;Project;Name;Displaytext;OS Type;Status;Size;Bootable;Dynamically Scalable;Extractable;Featured;Public;Ready\n",
    );
    for i in isos {
        out.push_str(&format!(
            "{};{};{};{};{};{};{};{};{};{};{};{};{}\n",
            i.domain,
            i.project,
            i.name,
            i.displaytext,
            i.ostypename,
            i.status,
            text_or_na(&i.size),
            i.bootable,
            i.isdynamicallyscalable,
            i.isextractable,
            i.isfeatured,
            i.ispublic,
            i.isready
        ));
    }
    out
}
