//! Knowledge Object CLI
//!
//! Command-line tool for packaging Knowledge Objects and generating their
//! information pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ko_pack::{
    init, package, write_information_page, KoError, PackageOptions, PageOptions,
};

#[derive(Parser)]
#[command(name = "ko-pack")]
#[command(about = "Package Knowledge Objects and render information pages from JSON-LD metadata")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package the content of a Knowledge Object using its metadata
    Package(PackageArgs),
    /// Create the Knowledge Object information page from its metadata
    InfoPage(InfoPageArgs),
    /// Scaffold metadata, readme, license, and information page for a new KO
    Init(InitArgs),
}

#[derive(Args)]
struct PackageArgs {
    /// Location of the metadata file
    #[arg(default_value = "metadata.json")]
    metadata_path: PathBuf,

    /// Archive location; defaults to <dirname>-<version>.tar.gz next to the
    /// metadata file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Place all files under a <dirname>_<version>/ folder inside the
    /// archive instead of at its root
    #[arg(long)]
    nested: bool,
}

#[derive(Args)]
struct InfoPageArgs {
    /// Location of the metadata file
    #[arg(default_value = "metadata.json")]
    metadata_path: PathBuf,

    /// Output path for the generated page
    #[arg(short, long, default_value = "index.html")]
    output: PathBuf,

    /// Link to local relative paths instead of the remote repository
    #[arg(long)]
    include_relative_paths: bool,
}

#[derive(Args)]
struct InitArgs {
    /// Knowledge Object name
    name: String,
}

fn run_package(args: PackageArgs) -> Result<(), KoError> {
    let options = PackageOptions {
        output: args.output,
        nested: args.nested,
        ..Default::default()
    };
    let report = package(&args.metadata_path, &options)?;

    for path in &report.skipped {
        eprintln!(
            "{} {} does not exist and will be skipped.",
            "Warning:".red(),
            path.display()
        );
    }
    println!(
        "{} at {}",
        "- Package created".green(),
        report.archive_path.display()
    );
    Ok(())
}

fn run_info_page(args: InfoPageArgs) -> Result<(), KoError> {
    let options = PageOptions {
        include_relative_paths: args.include_relative_paths,
        ..Default::default()
    };
    write_information_page(&args.metadata_path, &args.output, &options)?;

    println!(
        "{} at {}",
        "- Knowledge object information page created".green(),
        args.output.display()
    );
    Ok(())
}

fn run_init(args: InitArgs) -> Result<(), KoError> {
    let dir = std::env::current_dir()?;
    let report = init(&args.name, &dir, &PageOptions::default())?;

    println!(
        "{} at {}",
        "- Metadata file saved".green(),
        report.metadata.display()
    );
    println!(
        "{} at {}",
        "- License file saved".green(),
        report.license.display()
    );
    println!(
        "{} at {}",
        "- Readme file saved".green(),
        report.readme.display()
    );
    println!(
        "{} at {}",
        "- Knowledge object information page created".green(),
        report.page.display()
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Package(args) => run_package(args),
        Commands::InfoPage(args) => run_info_page(args),
        Commands::Init(args) => run_init(args),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}
