use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "csops", version, about = "CloudStack reporting and admin CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print, set or disable project resource limits
    Limits(LimitsArgs),
    /// List projects
    Projects(OutputArgs),
    /// Report volumes across all projects
    Volumes(VolumesArgs),
    /// Report virtual machines across all projects
    Vms(VmsArgs),
    /// Report VM network interfaces
    Nics(NicsArgs),
    /// Report networks across all projects
    Networks(NetworksArgs),
    /// Report volume and VM snapshots
    Snapshots(SnapshotsArgs),
    /// Report templates for the given template filters
    Templates(TemplatesArgs),
    /// Report ISO images
    Isos(IsosArgs),
    /// Report users of every domain
    Users(OutputArgs),
    /// Report SSH key pairs
    SshKeypairs(ProjectReportArgs),
    /// Report virtual routers and system VMs
    SystemVms(SystemVmsArgs),
    /// Report global configuration settings
    Configurations(OutputArgs),
    /// Compare two `mysqld --verbose --help` variable dumps
    MysqlDiff(MysqlDiffArgs),
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ProjectReportArgs {
    #[arg(long, help = "Only entries of this project name")]
    pub project: Option<String>,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VolumesArgs {
    #[arg(long, help = "Only volumes of this project name")]
    pub project: Option<String>,
    #[arg(long, help = "Only volumes on this primary storage")]
    pub storage: Option<String>,
    #[arg(long, default_value_t = false)]
    pub only_detached: bool,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VmsArgs {
    #[arg(long, help = "Only VMs of this project name")]
    pub project: Option<String>,
    #[arg(long, help = "Only VMs on this host")]
    pub host: Option<String>,
    #[arg(long, default_value_t = false, conflicts_with = "only_stopped_vms")]
    pub only_running_vms: bool,
    #[arg(long, default_value_t = false)]
    pub only_stopped_vms: bool,
    #[arg(long, default_value_t = false, help = "Add size and count of attached volumes")]
    pub with_total_volumes: bool,
    #[arg(long, default_value_t = false, help = "Add one column pair per NIC")]
    pub with_networks: bool,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NicsArgs {
    #[arg(long, help = "Only NICs of VMs in this project name")]
    pub project: Option<String>,
    #[arg(long, help = "Only NICs in this network name")]
    pub network: Option<String>,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NetworksArgs {
    #[arg(long, help = "Only networks of this project name")]
    pub project: Option<String>,
    #[arg(long, default_value_t = false, conflicts_with = "only_shared_nets")]
    pub only_isolated_nets: bool,
    #[arg(long, default_value_t = false)]
    pub only_shared_nets: bool,
    #[arg(long, default_value_t = false, conflicts_with = "only_not_redundant_vr")]
    pub only_redundant_vr: bool,
    #[arg(long, default_value_t = false)]
    pub only_not_redundant_vr: bool,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SnapshotsArgs {
    #[arg(long, default_value_t = false, conflicts_with = "only_vm_snapshots")]
    pub only_volume_snapshots: bool,
    #[arg(long, default_value_t = false)]
    pub only_vm_snapshots: bool,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TemplatesArgs {
    #[arg(
        long,
        help = "Comma separated template filters (default: featured,self,selfexecutable,sharedexecutable,executable,community)"
    )]
    pub templatefilter: Option<String>,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct IsosArgs {
    #[arg(long, help = "Only ISOs of this project name")]
    pub project: Option<String>,
    #[arg(long, default_value_t = false)]
    pub only_public: bool,
    #[arg(long, default_value_t = false)]
    pub only_featured: bool,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SystemVmsArgs {
    #[arg(long, default_value_t = false, conflicts_with = "only_secondary_storage_vms")]
    pub only_virtual_routers: bool,
    #[arg(long, default_value_t = false)]
    pub only_secondary_storage_vms: bool,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MysqlDiffArgs {
    #[arg(short = 'n', long)]
    pub new_settings: PathBuf,
    #[arg(short = 't', long)]
    pub template_settings: PathBuf,
    #[arg(short = 'a', long)]
    pub annotations: Option<PathBuf>,
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["print_limits", "set_limits", "disable_limits"])
))]
pub struct LimitsArgs {
    #[arg(
        long,
        conflicts_with_all = ["force", "input_file", "disable_list"],
        help = "Print current limits"
    )]
    pub print_limits: bool,
    #[arg(
        long,
        requires = "input_file",
        conflicts_with_all = ["format", "output_file", "disable_list"],
        help = "Set limits from an input table"
    )]
    pub set_limits: bool,
    #[arg(
        long,
        requires = "disable_list",
        conflicts_with_all = ["input_file", "format", "output_file"],
        help = "Set the listed resource types to unlimited"
    )]
    pub disable_limits: bool,
    #[arg(short, long, help = "Desired limits table (print output format)")]
    pub input_file: Option<PathBuf>,
    #[arg(long, help = "Comma separated resource type ids, e.g. \"1,2,4\"")]
    pub disable_list: Option<String>,
    #[arg(short, long, help = "Restrict to one project UUID")]
    pub project_id: Option<String>,
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv, help = "Print layout")]
    pub format: ReportFormat,
    #[arg(short, long, help = "Write printed limits to this file")]
    pub output_file: Option<PathBuf>,
    #[arg(long, default_value_t = false, help = "Apply changes without prompting")]
    pub force: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Table,
}
