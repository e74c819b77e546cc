use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use cargo_latest_version::check::{check_manifest, format_annotation};
use cargo_latest_version::config::log_path;
use cargo_latest_version::logging::{LogFormat, LogTarget, init_logging};
use cargo_latest_version::version::registries::crates_io::CratesIoRegistry;
use cargo_latest_version::version::registry::Registry;

#[derive(Parser)]
#[command(name = "cargo-latest-version")]
#[command(version, about = "Language Server showing the latest crates.io version of Cargo.toml dependencies")]
struct Cli {
    /// Base URL of the crates.io compatible registry API
    #[arg(long, global = true)]
    registry_url: Option<String>,

    /// Format of log records
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the latest version of every dependency in a manifest and exit
    Check {
        /// Path to a Cargo.toml file
        path: PathBuf,
    },
}

fn build_registry(registry_url: Option<&str>) -> anyhow::Result<Arc<dyn Registry>> {
    let registry = match registry_url {
        Some(url) => CratesIoRegistry::new(url)?,
        None => CratesIoRegistry::crates_io()?,
    };
    Ok(Arc::new(registry))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let registry = build_registry(cli.registry_url.as_deref())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        None => {
            let log_file = log_path();
            let _guard = init_logging(LogTarget::File(&log_file), cli.log_format)?;
            runtime.block_on(cargo_latest_version::lsp::server::run_server(registry))
        }
        Some(Command::Check { path }) => {
            let _guard = init_logging(LogTarget::Stderr, cli.log_format)?;
            let annotations = runtime.block_on(check_manifest(&path, registry))?;
            for annotation in &annotations {
                println!("{}", format_annotation(annotation));
            }
            Ok(())
        }
    }
}
