use crate::*;
use anyhow::Context;
use std::io::Write;

pub fn handle_limits_command(cli: &Cli, cfg: &ConfigFile, args: &LimitsArgs) -> anyhow::Result<()> {
    let catalogue = ResourceCatalogue::cloudstack();

    // Bad input must fail before the first API call.
    let desired = if args.set_limits {
        let path = args
            .input_file
            .as_deref()
            .context("--set-limits needs --input-file")?;
        Some(load_desired_table(&catalogue, path)?)
    } else if args.disable_limits {
        let raw = args
            .disable_list
            .as_deref()
            .context("--disable-limits needs --disable-list")?;
        Some(parse_disable_list(&catalogue, raw)?)
    } else {
        None
    };

    let api = CloudStackClient::new(&cfg.api_settings()?)?;
    let all = api.list_scopes()?;
    if let Some(desired) = &desired {
        check_scope_ids(desired, &all)
            .with_context(|| format!("invalid limits file {}", input_name(args)))?;
    }
    let scopes = select_from(all, args.project_id.as_deref())?;
    tracing::debug!(projects = scopes.len(), "selected projects");

    match desired {
        None => print_limits(cli.json, args, &api, &catalogue, &scopes),
        Some(desired) => {
            let report = reconcile(cli.json, args.force, &api, &catalogue, &scopes, &desired)?;
            print_one(cli.json, report, |r| {
                let s = &r.summary;
                format!(
                    "\nprojects: {} ({} unreadable), applied: {}, skipped: {}, failed: {}, unchanged: {}",
                    s.scopes, s.failed_scopes, s.applied, s.skipped, s.failed, s.unchanged
                )
            })
        }
    }
}

fn input_name(args: &LimitsArgs) -> String {
    args.input_file
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn print_limits(
    json: bool,
    args: &LimitsArgs,
    api: &CloudStackClient,
    catalogue: &ResourceCatalogue,
    scopes: &[Scope],
) -> anyhow::Result<()> {
    let mut rows = Vec::with_capacity(scopes.len());
    for scope in scopes {
        match fetch_snapshot(api, catalogue, &scope.id) {
            Ok(snapshot) => rows.push((scope, Ok(snapshot))),
            Err(e) => {
                tracing::warn!(project_id = %scope.id, error = %e, "cannot read project limits");
                eprintln!("Skipping project {} ({}): {}", scope.name, scope.id, e);
                rows.push((scope, Err(e.to_string())));
            }
        }
    }

    let data: Vec<ScopeLimits> = rows
        .iter()
        .map(|(scope, snapshot)| ScopeLimits {
            scope_id: scope.id.clone(),
            domain: scope.domain.clone(),
            name: scope.name.clone(),
            limits: snapshot
                .as_ref()
                .map(|s| scope_limits(catalogue, s))
                .unwrap_or_default(),
            fetch_error: snapshot.as_ref().err().cloned(),
        })
        .collect();

    emit_report(json, args.output_file.as_deref(), &data, || {
        let readable = rows
            .iter()
            .filter_map(|(scope, snapshot)| snapshot.as_ref().ok().map(|s| (*scope, s)));
        match args.format {
            ReportFormat::Csv => {
                let mut out = limits_csv_header(catalogue);
                out.push('\n');
                for (scope, snapshot) in readable {
                    out.push_str(&limits_csv_row(scope, catalogue, snapshot));
                    out.push('\n');
                }
                out
            }
            ReportFormat::Table => readable
                .map(|(scope, snapshot)| {
                    render_change_table(scope, &plan_changes(catalogue, snapshot, None))
                })
                .collect(),
        }
    })
}

fn review_stream(json: bool) -> Box<dyn Write> {
    if json {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    }
}

fn reconcile(
    json: bool,
    force: bool,
    api: &CloudStackClient,
    catalogue: &ResourceCatalogue,
    scopes: &[Scope],
    desired: &DesiredState,
) -> anyhow::Result<BatchReport> {
    let audit = AuditLog::open_default();
    let mut out = review_stream(json);
    if force {
        return reconcile_batch(api, &audit, catalogue, scopes, desired, &mut ForceDecider, &mut out);
    }
    let stdin = std::io::stdin();
    let mut decider = PromptDecider::new(stdin.lock(), review_stream(json));
    reconcile_batch(api, &audit, catalogue, scopes, desired, &mut decider, &mut out)
}
