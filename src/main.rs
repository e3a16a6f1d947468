use bodymetrics_site::source::{ContentSource, FileSource, SanityClient};
use bodymetrics_site::{config, fetch, generate, output, sitemap};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bodymetrics-site")]
#[command(about = "Static front-end for the Body Metrics health and nutrition site")]
#[command(long_about = "\
Static front-end for the Body Metrics health and nutrition site

Content lives in the Sanity CMS. The build fetches it into a JSON manifest,
then renders the site from that manifest:

  fetch      Sanity (or --from-file export)  →  .bodymetrics-temp/manifest.json
  generate   manifest.json                   →  dist/

Generated routes:

  /                 Home: \"top dishes\" category slider and all posts
  /food/            All recipes grouped by category
  /posts/{slug}/    Article or recipe with JSON-LD structured data
  /{slug}/          Standalone CMS page
  /sitemap.xml      Sitemap of every route

Environment:
  SITE_URL, SANITY_PROJECT_ID, SANITY_DATASET   override site.toml
  SANITY_API_READ_TOKEN                         required with --drafts
  RUST_LOG                                      log filter (default: warn)

Run 'bodymetrics-site gen-config' to generate a documented site.toml.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Site config file
    #[arg(long, default_value = "site.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for the intermediate manifest
    #[arg(long, default_value = ".bodymetrics-temp", global = true)]
    temp_dir: PathBuf,

    /// Read content from a JSON export instead of the Sanity API
    #[arg(long, global = true)]
    from_file: Option<PathBuf>,

    /// Fetch unpublished drafts (preview build)
    #[arg(long, global = true)]
    drafts: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch CMS content into a manifest
    Fetch,
    /// Produce the final HTML site from the manifest
    Generate,
    /// Run the full pipeline: fetch → generate
    Build,
    /// Fetch and validate content without writing anything
    Check,
    /// Print sitemap.xml for the current content
    Sitemap,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Fetch => {
            let manifest = run_fetch(&cli)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_fetch_output(&manifest);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let report = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            println!("==> Stage 1: Fetching content");
            let manifest = run_fetch(&cli)?;
            let manifest_path = write_manifest(&manifest, &cli.temp_dir)?;
            output::print_fetch_output(&manifest);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let manifest = run_fetch(&cli)?;
            output::print_check_output(&manifest);
        }
        Command::Sitemap => {
            let manifest = run_fetch(&cli)?;
            let entries = sitemap::build_sitemap(
                &manifest.config.base_url(),
                &manifest.sitemap,
                Utc::now(),
            );
            print!("{}", sitemap::to_xml(&entries));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for `sitemap` and `gen-config`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_fetch(cli: &Cli) -> Result<fetch::Manifest, Box<dyn std::error::Error>> {
    let mut site_config = config::load_config(&cli.config)?;
    config::apply_env_overrides(&mut site_config);

    let source: Box<dyn ContentSource> = match &cli.from_file {
        Some(path) => Box::new(FileSource::open(path)?),
        None => Box::new(SanityClient::from_config(&site_config.cms, cli.drafts)?),
    };
    Ok(fetch::fetch(source.as_ref(), &site_config, cli.drafts, Utc::now())?)
}

fn write_manifest(manifest: &fetch::Manifest, temp_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&manifest_path, json)?;
    Ok(manifest_path)
}
