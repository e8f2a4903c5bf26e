mod common;

use common::{path_str, project, project_record, TestEnv};
use predicates::str::contains;
use serde_json::{json, Value};

const HEADER: &str = "Domain;Project Name;Project UUID;user_vm;public_ip;volume;snapshot;template;network;vpc;cpu;memory;primary_storage;secondary_storage";

fn two_projects(env: &TestEnv) {
    env.mock_projects(&[
        project("p-2", "customers", "Shop"),
        project("p-1", "ROOT", "Web"),
    ]);
}

#[test]
fn print_limits_writes_sorted_csv() {
    let env = TestEnv::new();
    two_projects(&env);
    env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    env.mock_project_record(
        "p-2",
        project_record("p-2", "customers", "Shop", json!({"cpulimit": "Unlimited"})),
    );

    let out = env
        .cmd()
        .args(["limits", "--print-limits"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).expect("utf8 stdout");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            HEADER,
            "ROOT;Web;p-1;20;5;40;100;10;5;2;40;81920;1000;-1",
            "customers;Shop;p-2;20;5;40;100;10;5;2;-1;81920;1000;-1",
        ]
    );
}

#[test]
fn print_limits_table_and_output_file() {
    let env = TestEnv::new();
    two_projects(&env);
    env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    let out_file = env.work.join("web.txt");

    env.cmd()
        .args(["limits", "--print-limits", "--format", "table", "-p", "p-1", "-o"])
        .arg(&out_file)
        .assert()
        .success();

    let table = std::fs::read_to_string(&out_file).expect("output file written");
    assert!(table.contains("Limits for domain: ROOT - project: Web."));
    assert!(table.contains("| ID  | Name"));
    assert!(table.contains("No Change"));
    assert!(!table.contains("customers"));
}

#[test]
fn printed_table_feeds_back_as_a_no_op() {
    let env = TestEnv::new();
    two_projects(&env);
    env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    env.mock_project_record("p-2", project_record("p-2", "customers", "Shop", json!({})));
    let updates = env.mock_any_update();

    let printed = env
        .cmd()
        .args(["limits", "--print-limits"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let input = env.write_file("current.csv", &String::from_utf8(printed).expect("utf8"));

    let v = env.run_json(&["limits", "--set-limits", "-i", path_str(&input)]);
    assert_eq!(v["ok"], true);
    assert_eq!(v["data"]["summary"]["unchanged"], 22);
    assert_eq!(v["data"]["summary"]["applied"], 0);
    updates.assert_hits(0);
}

#[test]
fn forced_set_applies_only_differences() {
    let env = TestEnv::new();
    two_projects(&env);
    env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    env.mock_project_record("p-2", project_record("p-2", "customers", "Shop", json!({})));
    let cpu = env.mock_update("p-1", 8, 64);
    let ip = env.mock_update("p-1", 1, -1);

    let input = env.write_file(
        "desired.csv",
        &format!(
            "{}\nROOT;Web;p-1;20;Unlimited;No Change;No Change;No Change;No Change;No Change;64;No Change;1000;No Change;\n",
            HEADER
        ),
    );

    let v = env.run_json(&["limits", "--set-limits", "-i", path_str(&input), "--force"]);
    assert_eq!(v["data"]["summary"]["applied"], 2);
    assert_eq!(v["data"]["summary"]["failed"], 0);
    assert_eq!(v["data"]["scopes"].as_array().map(Vec::len), Some(2));
    cpu.assert_hits(1);
    ip.assert_hits(1);

    let audit = env.audit_lines();
    assert_eq!(audit.len(), 2);
    assert!(audit.iter().all(|l| l["data"]["project_id"] == "p-1"));
}

#[test]
fn interactive_set_asks_per_change() {
    let env = TestEnv::new();
    two_projects(&env);
    env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    let cpu = env.mock_update("p-1", 8, 64);
    let memory = env.mock_update("p-1", 9, 131072);

    let input = env.write_file(
        "desired.csv",
        "ROOT;Web;p-1;No Change;No Change;No Change;No Change;No Change;No Change;No Change;64;131072;No Change;No Change\n",
    );

    env.cmd()
        .args(["limits", "--set-limits", "-p", "p-1", "-i", path_str(&input)])
        .write_stdin("maybe\nyes\nno\n")
        .assert()
        .success()
        .stdout(contains("OK to change cpulimit from \"40\" to \"64\"? (yes/no)"))
        .stdout(contains("Please enter yes or no."))
        .stdout(contains("Do change!"))
        .stdout(contains("OK to change memorylimit from \"81920\" to \"131072\"? (yes/no)"))
        .stdout(contains("Not changing this limit."))
        .stdout(contains("applied: 1, skipped: 1, failed: 0"));

    cpu.assert_hits(1);
    memory.assert_hits(0);
}

#[test]
fn closed_prompt_input_aborts() {
    let env = TestEnv::new();
    two_projects(&env);
    env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    let updates = env.mock_any_update();
    let input = env.write_file(
        "desired.csv",
        "ROOT;Web;p-1;1;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change\n",
    );

    let out = env
        .cmd()
        .args(["--json", "limits", "--set-limits", "-p", "p-1", "-i", path_str(&input)])
        .write_stdin("")
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("json error");
    assert_eq!(v["ok"], false);
    assert_eq!(v["error"]["code"], "IO_ERROR");
    updates.assert_hits(0);
}

#[test]
fn malformed_input_fails_before_any_api_call() {
    let env = TestEnv::new();
    let listing = env.mock_projects(&[project("p-1", "ROOT", "Web")]);
    let updates = env.mock_any_update();
    let input = env.write_file("bad.csv", "ROOT;Web;p-1;20;5\n");

    let out = env
        .cmd()
        .args(["--json", "limits", "--set-limits", "-i", path_str(&input)])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("json error");
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    assert!(v["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("line 1")));
    listing.assert_hits(0);
    updates.assert_hits(0);
}

#[test]
fn unknown_disable_id_is_rejected_up_front() {
    let env = TestEnv::new();
    let listing = env.mock_projects(&[project("p-1", "ROOT", "Web")]);

    env.cmd()
        .args(["limits", "--disable-limits", "--disable-list", "1,5"])
        .assert()
        .failure()
        .stderr(contains("unknown resource type id in disable list: 5"));
    listing.assert_hits(0);
}

#[test]
fn row_for_missing_project_fails_before_any_update() {
    let env = TestEnv::new();
    env.mock_projects(&[project("p-1", "ROOT", "Web")]);
    let record = env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    let updates = env.mock_any_update();
    let input = env.write_file(
        "typo.csv",
        &format!(
            "{}\nROOT;Web;p-1;1;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change\n\
ROOT;Web;p-TYPO;99;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change;No Change\n",
            HEADER
        ),
    );

    for scope_args in [vec![], vec!["-p", "p-1"]] {
        let out = env
            .cmd()
            .args(["--json", "limits", "--set-limits", "--force", "-i", path_str(&input)])
            .args(&scope_args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        let v: Value = serde_json::from_slice(&out).expect("json error");
        assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
        let message = v["error"]["message"].as_str().unwrap_or_default();
        assert!(message.contains("line 3"), "{}", message);
        assert!(message.contains("p-TYPO"), "{}", message);
    }
    record.assert_hits(0);
    updates.assert_hits(0);
}

#[test]
fn unknown_project_lists_valid_ones() {
    let env = TestEnv::new();
    two_projects(&env);

    env.cmd()
        .args(["limits", "--print-limits", "-p", "nope"])
        .assert()
        .failure()
        .stderr(contains("Project id \"nope\" is not valid"))
        .stderr(contains("Domain: ROOT; Project Name: Web; Project UUID: p-1"))
        .stderr(contains("Domain: customers; Project Name: Shop; Project UUID: p-2"));
}

#[test]
fn failed_update_does_not_stop_the_batch() {
    let env = TestEnv::new();
    two_projects(&env);
    env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    env.mock_project_record("p-2", project_record("p-2", "customers", "Shop", json!({})));
    let failing = env.mock_update_error("p-1", 0);
    let others = [
        env.mock_update("p-1", 8, -1),
        env.mock_update("p-2", 0, -1),
        env.mock_update("p-2", 8, -1),
    ];

    let v = env.run_json(&[
        "limits",
        "--disable-limits",
        "--disable-list",
        "0,8",
        "--force",
    ]);
    let summary = &v["data"]["summary"];
    assert_eq!(summary["applied"], 3);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["unchanged"], 18);
    failing.assert_hits(1);
    for m in &others {
        m.assert_hits(1);
    }

    let web = &v["data"]["scopes"][0];
    assert_eq!(web["scope_id"], "p-1");
    let failed: Vec<&Value> = web["changes"]
        .as_array()
        .expect("changes")
        .iter()
        .filter(|c| c["outcome"] == "failed")
        .collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0]["error"]
        .as_str()
        .is_some_and(|e| e.contains("Max limit is below current usage")));
}

#[test]
fn unreadable_project_is_skipped() {
    let env = TestEnv::new();
    two_projects(&env);
    env.mock_project_record("p-1", project_record("p-1", "ROOT", "Web", json!({})));
    env.server.mock(|when, then| {
        when.query_param("command", "listProjects").query_param("id", "p-2");
        then.status(530).body("backend down");
    });
    let update = env.mock_update("p-1", 2, -1);

    env.cmd()
        .args(["limits", "--disable-limits", "--disable-list", "2", "--force"])
        .assert()
        .success()
        .stdout(contains("Skipping project Shop (p-2)"))
        .stdout(contains("(1 unreadable), applied: 1"));
    update.assert_hits(1);
}

#[test]
fn missing_api_settings_is_a_config_error() {
    let env = TestEnv::new();
    std::fs::remove_file(env.home.join(".config/csops/config.toml")).expect("remove config");

    let out = env
        .cmd()
        .args(["--json", "limits", "--print-limits"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("json error");
    assert_eq!(v["error"]["code"], "CONFIG_ERROR");

    env.cmd()
        .args(["limits", "--print-limits"])
        .env("CLOUDSTACK_ENDPOINT", env.server.url(common::API_PATH))
        .env("CLOUDSTACK_KEY", "k")
        .assert()
        .failure()
        .stderr(contains("missing CloudStack setting `secret`"));
}
