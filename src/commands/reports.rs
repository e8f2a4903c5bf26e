use crate::*;

fn client(cfg: &ConfigFile) -> anyhow::Result<CloudStackClient> {
    Ok(CloudStackClient::new(&cfg.api_settings()?)?)
}

pub fn handle_projects(cli: &Cli, cfg: &ConfigFile, args: &OutputArgs) -> anyhow::Result<()> {
    let scopes = select_scopes(&client(cfg)?, None)?;
    emit_report(cli.json, args.output_file.as_deref(), &scopes, || {
        projects_csv(&scopes)
    })
}

pub fn handle_volumes(cli: &Cli, cfg: &ConfigFile, args: &VolumesArgs) -> anyhow::Result<()> {
    let filter = VolumeFilter {
        project: args.project.clone(),
        storage: args.storage.clone(),
        only_detached: args.only_detached,
    };
    let mut volumes = filter_volumes(collect_volumes(&client(cfg)?)?, &filter);
    sort_volumes(&mut volumes);
    emit_report(cli.json, args.output_file.as_deref(), &volumes, || {
        volumes_csv(&volumes)
    })
}

pub fn handle_vms(cli: &Cli, cfg: &ConfigFile, args: &VmsArgs) -> anyhow::Result<()> {
    let api = client(cfg)?;
    let filter = VmFilter {
        project: args.project.clone(),
        host: args.host.clone(),
        only_running: args.only_running_vms,
        only_stopped: args.only_stopped_vms,
    };
    let mut vms = filter_vms(collect_vms(&api)?, &filter);
    if args.with_total_volumes {
        add_volume_totals(&api, &mut vms)?;
    }
    sort_vms(&mut vms);
    emit_report(cli.json, args.output_file.as_deref(), &vms, || {
        vms_csv(&vms, args.with_networks)
    })
}

pub fn handle_nics(cli: &Cli, cfg: &ConfigFile, args: &NicsArgs) -> anyhow::Result<()> {
    let vms = collect_vms(&client(cfg)?)?;
    let mut nics = filter_nics(
        nic_rows(&vms),
        args.project.as_deref(),
        args.network.as_deref(),
    );
    sort_nics(&mut nics);
    emit_report(cli.json, args.output_file.as_deref(), &nics, || nics_csv(&nics))
}

pub fn handle_networks(cli: &Cli, cfg: &ConfigFile, args: &NetworksArgs) -> anyhow::Result<()> {
    let filter = NetworkFilter {
        project: args.project.clone(),
        only_isolated: args.only_isolated_nets,
        only_shared: args.only_shared_nets,
        only_redundant_vr: args.only_redundant_vr,
        only_not_redundant_vr: args.only_not_redundant_vr,
    };
    let mut networks = filter_networks(collect_networks(&client(cfg)?)?, &filter);
    sort_networks(&mut networks);
    emit_report(cli.json, args.output_file.as_deref(), &networks, || {
        networks_csv(&networks)
    })
}

pub fn handle_snapshots(cli: &Cli, cfg: &ConfigFile, args: &SnapshotsArgs) -> anyhow::Result<()> {
    let selection = SnapshotSelection {
        only_volume: args.only_volume_snapshots,
        only_vm: args.only_vm_snapshots,
    };
    let mut snapshots = collect_snapshots(&client(cfg)?, selection)?;
    sort_snapshots(&mut snapshots);
    emit_report(cli.json, args.output_file.as_deref(), &snapshots, || {
        snapshots_csv(&snapshots)
    })
}

pub fn handle_templates(cli: &Cli, cfg: &ConfigFile, args: &TemplatesArgs) -> anyhow::Result<()> {
    let filters = parse_template_filters(args.templatefilter.as_deref());
    let mut templates = collect_templates(&client(cfg)?, &filters)?;
    sort_templates(&mut templates);
    emit_report(cli.json, args.output_file.as_deref(), &templates, || {
        templates_csv(&templates)
    })
}

pub fn handle_isos(cli: &Cli, cfg: &ConfigFile, args: &IsosArgs) -> anyhow::Result<()> {
    let filter = IsoFilter {
        project: args.project.clone(),
        only_public: args.only_public,
        only_featured: args.only_featured,
    };
    let mut isos = filter_isos(collect_isos(&client(cfg)?)?, &filter);
    sort_isos(&mut isos);
    emit_report(cli.json, args.output_file.as_deref(), &isos, || isos_csv(&isos))
}

pub fn handle_users(cli: &Cli, cfg: &ConfigFile, args: &OutputArgs) -> anyhow::Result<()> {
    let mut users = collect_users(&client(cfg)?)?;
    sort_users(&mut users);
    emit_report(cli.json, args.output_file.as_deref(), &users, || users_csv(&users))
}

pub fn handle_ssh_keypairs(
    cli: &Cli,
    cfg: &ConfigFile,
    args: &ProjectReportArgs,
) -> anyhow::Result<()> {
    let mut keys = filter_ssh_keypairs(collect_ssh_keypairs(&client(cfg)?)?, args.project.as_deref());
    sort_ssh_keypairs(&mut keys);
    emit_report(cli.json, args.output_file.as_deref(), &keys, || {
        ssh_keypairs_csv(&keys)
    })
}

pub fn handle_system_vms(cli: &Cli, cfg: &ConfigFile, args: &SystemVmsArgs) -> anyhow::Result<()> {
    let filter = SystemVmFilter {
        only_virtual_routers: args.only_virtual_routers,
        only_secondary_storage_vms: args.only_secondary_storage_vms,
    };
    let mut rows = filter_system_vms(collect_system_vms(&client(cfg)?)?, filter);
    sort_system_vms(&mut rows);
    emit_report(cli.json, args.output_file.as_deref(), &rows, || {
        system_vms_csv(&rows)
    })
}

pub fn handle_configurations(cli: &Cli, cfg: &ConfigFile, args: &OutputArgs) -> anyhow::Result<()> {
    let settings = collect_settings(&client(cfg)?)?;
    emit_report(cli.json, args.output_file.as_deref(), &settings, || {
        settings_csv(&settings)
    })
}

/// Works on local files only; no config or API access.
pub fn handle_mysql_diff(cli: &Cli, args: &MysqlDiffArgs) -> anyhow::Result<()> {
    let diffs = diff_files(
        &args.new_settings,
        &args.template_settings,
        args.annotations.as_deref(),
    )?;
    emit_report(cli.json, args.output_file.as_deref(), &diffs, || {
        differences_csv(&diffs)
    })
}
