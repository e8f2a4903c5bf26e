#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const API_PATH: &str = "/client/api";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    pub server: MockServer,
    cargo_home: PathBuf,
    rustup_home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(home.join(".config/csops")).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");

        let server = MockServer::start();
        let config = format!(
            "[cloudstack]\nendpoint = \"{}\"\nkey = \"test-key\"\nsecret = \"test-secret\"\npage_size = 50\n",
            server.url(API_PATH)
        );
        fs::write(home.join(".config/csops/config.toml"), config).expect("write config");

        let orig_home = std::env::var("HOME").unwrap_or_default();
        let cargo_home = PathBuf::from(&orig_home).join(".cargo");
        let rustup_home = PathBuf::from(&orig_home).join(".rustup");

        Self {
            _tmp: tmp,
            home,
            work,
            server,
            cargo_home,
            rustup_home,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("csops");
        cmd.env("HOME", &self.home)
            .env("CARGO_HOME", &self.cargo_home)
            .env("RUSTUP_HOME", &self.rustup_home)
            .env_remove("CLOUDSTACK_ENDPOINT")
            .env_remove("CLOUDSTACK_KEY")
            .env_remove("CLOUDSTACK_SECRET")
            .env_remove("CLOUDSTACK_TIMEOUT")
            .env_remove("CSOPS_LOG");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let p = self.work.join(name);
        fs::write(&p, content).expect("write fixture file");
        p
    }

    pub fn audit_lines(&self) -> Vec<Value> {
        let p = self.home.join(".config/csops/audit.jsonl");
        fs::read_to_string(p)
            .unwrap_or_default()
            .lines()
            .map(|l| serde_json::from_str(l).expect("audit line json"))
            .collect()
    }

    /// The paginated project listing.
    pub fn mock_projects(&self, projects: &[Value]) -> Mock<'_> {
        let body = json!({"listprojectsresponse": {"count": projects.len(), "project": projects}});
        self.server.mock(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("command", "listProjects")
                .query_param_exists("page")
                .query_param("apiKey", "test-key")
                .query_param_exists("signature");
            then.status(200).json_body(body);
        })
    }

    /// The single-project read used for limit snapshots.
    pub fn mock_project_record(&self, id: &str, record: Value) -> Mock<'_> {
        let body = json!({"listprojectsresponse": {"count": 1, "project": [record]}});
        self.server.mock(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("command", "listProjects")
                .query_param("id", id);
            then.status(200).json_body(body);
        })
    }

    pub fn mock_update(&self, project_id: &str, resource_type: u32, max: i64) -> Mock<'_> {
        let body = json!({"updateresourcelimitresponse": {"resourcelimit": {
            "projectid": project_id, "resourcetype": resource_type.to_string(), "max": max
        }}});
        let (resource_type, max) = (resource_type.to_string(), max.to_string());
        self.server.mock(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("command", "updateResourceLimit")
                .query_param("projectid", project_id)
                .query_param("resourcetype", resource_type.as_str())
                .query_param("max", max.as_str());
            then.status(200).json_body(body);
        })
    }

    pub fn mock_update_error(&self, project_id: &str, resource_type: u32) -> Mock<'_> {
        let body = json!({"updateresourcelimitresponse": {
            "errorcode": 431, "errortext": "Max limit is below current usage"
        }});
        let resource_type = resource_type.to_string();
        self.server.mock(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("command", "updateResourceLimit")
                .query_param("projectid", project_id)
                .query_param("resourcetype", resource_type.as_str());
            then.status(431).json_body(body);
        })
    }

    /// A list call answered with `records` under `entity`; `params` narrow the match.
    pub fn mock_list(
        &self,
        command: &str,
        params: &[(&str, &str)],
        entity: &str,
        records: Value,
    ) -> Mock<'_> {
        let mut inner = Map::new();
        inner.insert(
            "count".to_string(),
            json!(records.as_array().map(Vec::len).unwrap_or(0)),
        );
        inner.insert(entity.to_string(), records);
        let mut body = Map::new();
        body.insert(
            format!("{}response", command.to_ascii_lowercase()),
            Value::Object(inner),
        );
        self.server.mock(|when, then| {
            let mut when = when
                .method(GET)
                .path(API_PATH)
                .query_param("command", command);
            for (k, v) in params {
                when = when.query_param(*k, *v);
            }
            then.status(200).json_body(Value::Object(body));
        })
    }

    /// Any update call; used to prove none were made.
    pub fn mock_any_update(&self) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("command", "updateResourceLimit");
            then.status(200)
                .json_body(json!({"updateresourcelimitresponse": {}}));
        })
    }
}

pub fn project(id: &str, domain: &str, name: &str) -> Value {
    json!({"id": id, "name": name, "domain": domain, "state": "Active"})
}

/// A project record with every catalogue limit set; `overrides` replaces fields.
pub fn project_record(id: &str, domain: &str, name: &str, overrides: Value) -> Value {
    let mut record = json!({
        "id": id, "name": name, "domain": domain,
        "vmlimit": "20", "vmavailable": "15",
        "iplimit": "5", "ipavailable": "3",
        "volumelimit": "40", "volumeavailable": "30",
        "snapshotlimit": "100", "snapshotavailable": "100",
        "templatelimit": "10", "templateavailable": "10",
        "networklimit": "5", "networkavailable": "4",
        "vpclimit": "2", "vpcavailable": "2",
        "cpulimit": "40", "cpuavailable": "32",
        "memorylimit": "81920", "memoryavailable": "65536",
        "primarystoragelimit": "1000", "primarystorageavailable": "800",
        "secondarystoragelimit": "Unlimited", "secondarystorageavailable": "Unlimited"
    });
    if let (Some(base), Some(extra)) = (record.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    record
}

pub fn path_str(p: &Path) -> &str {
    p.to_str().expect("utf8 path")
}
