use clap::{Parser, Subcommand};
use mediakit::config::{self, MediaConfig};
use mediakit::input::{load_json, read_descriptor};
use mediakit::output;
use mediakit::types::{Gallery, MediaDescriptor, Site};
use mediakit::urls::{UrlOptions, resolve_url_with, thumbnail_dimensions_with};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mediakit")]
#[command(about = "Inspect media descriptors, URLs and upload policy")]
#[command(long_about = "\
Inspect media descriptors, URLs and upload policy

Each command reads JSON in the shapes the media API returns and prints the
values an upload or gallery UI would derive from it.

Inputs:

  record.json    a media record: {\"ID\": 12, \"URL\": \"https://...\", ...}
  site.json      a site: {\"ID\": 1, \"jetpack\": false, \"options\": {...}}
  gallery.json   {\"items\": [record, ...], \"type\": \"square\", \"columns\": 3}

Where a command takes <ITEM>, a bare filename also works (photo.jpg).

Verdicts print as yes, no or unknown. Set RUST_LOG=debug to see why a policy
check failed open or a proxy URL was refused.

Run 'mediakit gen-config' to generate a documented mediakit.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing mediakit.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show extension, MIME type and upload state of an item
    Inspect {
        /// Filename or record JSON file
        item: String,
    },
    /// Resolve the display URL of a record
    Url {
        /// Record JSON file
        item: String,
        /// Rewrite through the image proxy
        #[arg(long)]
        photon: bool,
        /// Maximum width to request
        #[arg(long)]
        max_width: Option<u32>,
        /// Named thumbnail size to prefer
        #[arg(long)]
        size: Option<String>,
    },
    /// Check whether an item may be uploaded to a site
    Policy {
        /// Filename or record JSON file
        item: String,
        /// Site JSON file
        site: PathBuf,
    },
    /// Show the dimensions of a named image size
    ThumbnailSize {
        /// Size name (thumbnail, medium, large, ...)
        name: String,
        /// Site JSON file whose options override the defaults
        #[arg(long)]
        site: Option<PathBuf>,
    },
    /// Format a playtime in seconds
    Duration {
        seconds: f64,
    },
    /// Build the gallery shortcode for a gallery JSON file
    Gallery {
        gallery: PathBuf,
    },
    /// Print a stock mediakit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(dir) => config::load_config(dir)?,
        None => MediaConfig::default(),
    };

    let lines = match cli.command {
        Command::Inspect { item } => output::format_inspect_output(&read_descriptor(&item)?),
        Command::Url {
            item,
            photon,
            max_width,
            size,
        } => {
            let options = UrlOptions {
                photon,
                max_width,
                size,
            };
            let url = match read_descriptor(&item)? {
                MediaDescriptor::Record(record) => {
                    resolve_url_with(&record, &options, &config.proxy)
                }
                _ => None,
            };
            output::format_url_output(url.as_deref())
        }
        Command::Policy { item, site } => {
            let item = read_descriptor(&item)?;
            let site: Site = load_json(&site)?;
            output::format_policy_output(&item, &site, &config.policy)
        }
        Command::ThumbnailSize { name, site } => {
            let site: Option<Site> = site.as_deref().map(load_json::<Site>).transpose()?;
            let dims = thumbnail_dimensions_with(&name, site.as_ref(), &config.thumbnails);
            output::format_dimensions_output(&name, &dims)
        }
        Command::Duration { seconds } => output::format_duration_output(seconds),
        Command::Gallery { gallery } => {
            let gallery: Gallery = load_json(&gallery)?;
            output::format_gallery_output(&gallery, &config.gallery)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
    };

    output::print_lines(&lines);
    Ok(())
}

/// Diagnostics go to stderr so stdout stays parseable. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
