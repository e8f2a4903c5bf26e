use crate::domain::models::Scope;
use crate::services::config::ApiSettings;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};
use sha1::Sha1;
use std::time::Duration;

/// Characters left unencoded in signed query strings: RFC 3986 unreserved plus `*`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'*');

pub type QuotaRecord = Map<String, Value>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{command} failed with HTTP {status}: {text}")]
    Http {
        command: String,
        status: u16,
        text: String,
    },
    #[error("{command} failed with error {code}: {text}")]
    Api {
        command: String,
        code: i64,
        text: String,
    },
    #[error("unexpected {command} response: {reason}")]
    Malformed { command: String, reason: String },
    #[error("project not found: {0}")]
    ScopeNotFound(String),
    #[error("cannot sign request: {0}")]
    Signing(String),
}

/// The control-plane calls limit reconciliation depends on.
pub trait ControlPlane {
    fn list_scopes(&self) -> Result<Vec<Scope>, ApiError>;
    fn list_resource_quotas(&self, scope_id: &str) -> Result<QuotaRecord, ApiError>;
    fn update_resource_quota(
        &self,
        scope_id: &str,
        resource_type: u32,
        max: i64,
    ) -> Result<(), ApiError>;
}

pub struct CloudStackClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    key: String,
    secret: String,
    page_size: u32,
}

impl CloudStackClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('?').to_string(),
            key: settings.key.clone(),
            secret: settings.secret.clone(),
            page_size: settings.page_size.max(1),
        })
    }

    /// Issue one signed call and return the `<command>response` object.
    pub fn request(&self, command: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let mut all: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        all.push(("command".to_string(), command.to_string()));
        all.push(("response".to_string(), "json".to_string()));
        all.push(("apiKey".to_string(), self.key.clone()));

        let query = encode_query(&mut all);
        let signature = sign_query(&query, &self.secret)?;
        let url = format!(
            "{}?{}&signature={}",
            self.endpoint,
            query,
            utf8_percent_encode(&signature, QUERY_VALUE)
        );

        tracing::debug!(command, "cloudstack request");
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        let body = resp.text()?;
        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        if let Some((code, text)) = parsed.as_ref().and_then(error_of) {
            return Err(ApiError::Api {
                command: command.to_string(),
                code,
                text,
            });
        }
        if !status.is_success() {
            return Err(ApiError::Http {
                command: command.to_string(),
                status: status.as_u16(),
                text: body,
            });
        }

        let key = format!("{}response", command.to_ascii_lowercase());
        parsed
            .and_then(|mut v| v.get_mut(&key).map(Value::take))
            .ok_or_else(|| ApiError::Malformed {
                command: command.to_string(),
                reason: format!("missing `{}` object", key),
            })
    }

    /// Fetch every page of a list call and return the entity records.
    pub fn list_all(
        &self,
        command: &str,
        entity: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Value>, ApiError> {
        let mut out = Vec::new();
        let mut page = 1u32;
        loop {
            let mut paged = params.to_vec();
            paged.push(("page", page.to_string()));
            paged.push(("pagesize", self.page_size.to_string()));
            let resp = self.request(command, &paged)?;
            let items = entities(command, &resp, entity)?;
            let count = items.len();
            out.extend(items);
            if count < self.page_size as usize {
                break;
            }
            page += 1;
        }
        Ok(out)
    }

    /// [`list_all`](Self::list_all), decoding each record as `T`.
    pub fn list_records<T: DeserializeOwned>(
        &self,
        command: &str,
        entity: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        self.list_all(command, entity, params)?
            .into_iter()
            .map(|v| decode(command, v))
            .collect()
    }
}

impl ControlPlane for CloudStackClient {
    fn list_scopes(&self) -> Result<Vec<Scope>, ApiError> {
        self.list_records("listProjects", "project", &[("listall", "true".to_string())])
    }

    fn list_resource_quotas(&self, scope_id: &str) -> Result<QuotaRecord, ApiError> {
        let resp = self.request(
            "listProjects",
            &[
                ("listall", "true".to_string()),
                ("id", scope_id.to_string()),
            ],
        )?;
        let mut items = entities("listProjects", &resp, "project")?;
        match items.len() {
            0 => Err(ApiError::ScopeNotFound(scope_id.to_string())),
            1 => match items.remove(0) {
                Value::Object(record) => Ok(record),
                _ => Err(ApiError::Malformed {
                    command: "listProjects".to_string(),
                    reason: "project record is not an object".to_string(),
                }),
            },
            n => Err(ApiError::Malformed {
                command: "listProjects".to_string(),
                reason: format!("{} projects returned for id {}", n, scope_id),
            }),
        }
    }

    fn update_resource_quota(
        &self,
        scope_id: &str,
        resource_type: u32,
        max: i64,
    ) -> Result<(), ApiError> {
        self.request(
            "updateResourceLimit",
            &[
                ("projectid", scope_id.to_string()),
                ("resourcetype", resource_type.to_string()),
                ("max", max.to_string()),
            ],
        )?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(command: &str, v: Value) -> Result<T, ApiError> {
    serde_json::from_value(v).map_err(|e| ApiError::Malformed {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

fn entities(command: &str, resp: &Value, entity: &str) -> Result<Vec<Value>, ApiError> {
    // An empty list comes back as `{}` without the entity key.
    match resp.get(entity) {
        None => Ok(vec![]),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(ApiError::Malformed {
            command: command.to_string(),
            reason: format!("`{}` is not an array", entity),
        }),
    }
}

fn error_of(v: &Value) -> Option<(i64, String)> {
    let obj = v.as_object()?;
    obj.values().find_map(|inner| {
        let text = inner.get("errortext")?.as_str()?.to_string();
        let code = inner.get("errorcode").and_then(Value::as_i64).unwrap_or(0);
        Some((code, text))
    })
}

/// Sort parameters by lowercased name and join them percent-encoded.
pub fn encode_query(params: &mut [(String, String)]) -> String {
    params.sort_by(|a, b| a.0.to_ascii_lowercase().cmp(&b.0.to_ascii_lowercase()));
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_VALUE),
                utf8_percent_encode(v, QUERY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn sign_query(query: &str, secret: &str) -> Result<String, ApiError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes())
        .map_err(|e| ApiError::Signing(e.to_string()))?;
    mac.update(query.to_ascii_lowercase().as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
