use anyhow::{Context, Result};
use api_docs_exporter::config::ExportConfig;
use api_docs_exporter::export::{BundleExporter, SearchIndexExporter};
use api_docs_exporter::services::{ExportService, ProjectService};
use api_docs_exporter::storage::FileDownloadSink;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export API documentation projects as snapshots or static bundles
#[derive(Parser, Debug)]
#[command(name = "api-docs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-save a project snapshot with optimized images
    Snapshot(OutputArgs),

    /// Export the static bundle as a ZIP archive
    Bundle {
        #[command(flatten)]
        output: OutputArgs,

        /// Root folder inside the archive (overrides config)
        #[arg(long)]
        root: Option<String>,
    },

    /// Print the search index for a project
    SearchIndex {
        /// Project snapshot file
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Project snapshot file
    input: PathBuf,

    /// Directory the export is written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    // RUST_LOG controls the log level (default: info)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ExportConfig::from_env()?;

    match cli.command {
        Command::Snapshot(args) => {
            let project = load(&args.input).await?;
            let service = export_service(config, args.out_dir);
            let file_name = service.save_project(project.project()).await?;
            info!("Wrote {}", file_name);
        }
        Command::Bundle { output, root } => {
            if let Some(root) = root {
                config.root_folder = root;
                config.validate()?;
            }
            let project = load(&output.input).await?;
            let service = export_service(config, output.out_dir);
            let file_name = service.export_static_data(project.project()).await?;
            info!("Wrote {}", file_name);
        }
        Command::SearchIndex { input } => {
            let project = load(&input).await?;
            let index = SearchIndexExporter::export_project(project.project());
            let json = serde_json::to_string_pretty(&index)
                .context("Failed to serialize search index")?;
            println!("{}", json);
        }
    }
    Ok(())
}

async fn load(path: &Path) -> Result<ProjectService> {
    let mut service = ProjectService::new();
    service.load_snapshot_file(path).await?;
    Ok(service)
}

fn export_service(config: ExportConfig, out_dir: PathBuf) -> ExportService<FileDownloadSink> {
    ExportService::new(BundleExporter::new(config), FileDownloadSink::new(out_dir))
}
