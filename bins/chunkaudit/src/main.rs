use clap::{Parser, Subcommand};

mod audit;
mod list;

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

#[derive(Parser)]
#[clap(version, about = "Localstore consistency auditor")]
#[clap(propagate_version = true)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a localstore for index inconsistencies and data corruption
    Audit(audit::Command),
    /// List the localstore column families and fields
    List(list::Command),
}

fn main() {
    // Logs go to stderr; the report is printed on stdout.
    chunkaudit_core::telemetry::init_dev_subscriber_with_env_filter();

    let cli = Cli::parse();

    info!(build = %chunkaudit_core::build_info::summary(), "starting");

    let code = match cli.command {
        Commands::Audit(args) => audit::run(&args),
        Commands::List(args) => {
            list::run(&args);
            0
        }
    };
    std::process::exit(code);
}
