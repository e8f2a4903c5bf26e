use crate::cloudstack::{ApiError, CloudStackClient};
use crate::domain::models::Setting;
use crate::services::inventory::text_or_na;

pub fn collect_settings(api: &CloudStackClient) -> Result<Vec<Setting>, ApiError> {
    let mut settings: Vec<Setting> = api.list_records("listConfigurations", "configuration", &[])?;
    settings.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(settings)
}

pub fn settings_csv(settings: &[Setting]) -> String {
    let mut out = String::from("Name;Value\n");
    for s in settings {
        out.push_str(&format!("{};{}\n", s.name, text_or_na(&s.value)));
    }
    out
}
