use clap::Parser;
use std::process::ExitCode;

mod cli;
mod cloudstack;
mod commands;
mod domain;
mod logging;
mod services;

pub use cli::{
    Cli, Commands, IsosArgs, LimitsArgs, MysqlDiffArgs, NetworksArgs, NicsArgs, OutputArgs,
    ProjectReportArgs, ReportFormat, SnapshotsArgs, SystemVmsArgs, TemplatesArgs, VmsArgs,
    VolumesArgs,
};
pub use cloudstack::{ApiError, CloudStackClient, ControlPlane};
pub use commands::*;
pub use domain::catalogue::{CatalogueError, ResourceCatalogue};
pub use domain::limits::DesiredState;
pub use domain::models::{BatchReport, ErrorBody, JsonErr, Scope, ScopeLimits};
pub use logging::init_tracing;
pub use services::accounts::{
    collect_ssh_keypairs, collect_users, filter_ssh_keypairs, sort_ssh_keypairs, sort_users,
    ssh_keypairs_csv, users_csv,
};
pub use services::config::{load_config, ConfigError, ConfigFile, DEFAULT_LOG_FILTER};
pub use services::configurations::{collect_settings, settings_csv};
pub use services::desired::{
    check_scope_ids, load_desired_table, parse_disable_list, DesiredStateError,
};
pub use services::mysql_vars::{diff_files, differences_csv};
pub use services::networks::{collect_networks, filter_networks, networks_csv, sort_networks, NetworkFilter};
pub use services::output::{emit_report, print_one};
pub use services::projects::{projects_csv, select_from, select_scopes, ScopeSelectionError};
pub use services::reconcile::{
    plan_changes, reconcile_batch, ForceDecider, PromptDecider, PromptError,
};
pub use services::render::{limits_csv_header, limits_csv_row, render_change_table, scope_limits};
pub use services::snapshot::{fetch_snapshot, SnapshotError};
pub use services::snapshots::{collect_snapshots, snapshots_csv, sort_snapshots, SnapshotSelection};
pub use services::storage::AuditLog;
pub use services::systemvms::{
    collect_system_vms, filter_system_vms, sort_system_vms, system_vms_csv, SystemVmFilter,
};
pub use services::templates::{
    collect_isos, collect_templates, filter_isos, isos_csv, parse_template_filters, sort_isos,
    sort_templates, templates_csv, IsoFilter,
};
pub use services::vms::{
    add_volume_totals, collect_vms, filter_nics, filter_vms, nic_rows, nics_csv, sort_nics,
    sort_vms, vms_csv, VmFilter,
};
pub use services::volumes::{
    collect_volumes, filter_volumes, sort_volumes, volumes_csv, VolumeFilter,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(cli.json, &e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::MysqlDiff(args) => {
            init_tracing(DEFAULT_LOG_FILTER)?;
            handle_mysql_diff(cli, args)
        }
        Commands::Limits(args) => handle_limits_command(cli, &setup()?, args),
        Commands::Projects(args) => handle_projects(cli, &setup()?, args),
        Commands::Volumes(args) => handle_volumes(cli, &setup()?, args),
        Commands::Vms(args) => handle_vms(cli, &setup()?, args),
        Commands::Nics(args) => handle_nics(cli, &setup()?, args),
        Commands::Networks(args) => handle_networks(cli, &setup()?, args),
        Commands::Snapshots(args) => handle_snapshots(cli, &setup()?, args),
        Commands::Templates(args) => handle_templates(cli, &setup()?, args),
        Commands::Isos(args) => handle_isos(cli, &setup()?, args),
        Commands::Users(args) => handle_users(cli, &setup()?, args),
        Commands::SshKeypairs(args) => handle_ssh_keypairs(cli, &setup()?, args),
        Commands::SystemVms(args) => handle_system_vms(cli, &setup()?, args),
        Commands::Configurations(args) => handle_configurations(cli, &setup()?, args),
    }
}

/// Config plus logging for the commands that talk to CloudStack.
fn setup() -> anyhow::Result<ConfigFile> {
    let cfg = load_config()?;
    init_tracing(&cfg.logging.filter)?;
    Ok(cfg)
}

fn report_error(json: bool, e: &anyhow::Error) {
    if !json {
        eprintln!("error: {:#}", e);
        return;
    }
    let body = JsonErr {
        ok: false,
        error: ErrorBody {
            code: error_code(e).to_string(),
            message: format!("{:#}", e),
        },
    };
    match serde_json::to_string_pretty(&body) {
        Ok(s) => println!("{}", s),
        Err(_) => eprintln!("error: {:#}", e),
    }
}

fn error_code(e: &anyhow::Error) -> &'static str {
    for cause in e.chain() {
        if cause.is::<ConfigError>() {
            return "CONFIG_ERROR";
        }
        if cause.is::<DesiredStateError>() || cause.is::<CatalogueError>() {
            return "VALIDATION_ERROR";
        }
        if let Some(s) = cause.downcast_ref::<ScopeSelectionError>() {
            return match s {
                ScopeSelectionError::UnknownScope { .. } => "VALIDATION_ERROR",
                ScopeSelectionError::Api(_) => "API_ERROR",
            };
        }
        if cause.is::<ApiError>() || cause.is::<SnapshotError>() {
            return "API_ERROR";
        }
        if cause.is::<PromptError>() || cause.is::<std::io::Error>() {
            return "IO_ERROR";
        }
    }
    "INTERNAL_ERROR"
}
