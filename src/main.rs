use clap::{Parser, Subcommand};
use gallery_manifest::{config, output, scan, serialize};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "gallery-manifest")]
#[command(about = "Build the JSON manifest for a static photo gallery")]
#[command(long_about = "\
Build the JSON manifest for a static photo gallery

Your filesystem is the data source. Top-level directories become categories,
their subdirectories become subcategories, and images become photos.

Asset structure:

  photos/
  ├── config.toml                  # Optional: category order, path prefixes
  ├── thumbs/                      # Thumbnails (mirrors the tree, never scanned)
  ├── kazan/                       # Category
  │   ├── _category.txt            # #CATEGORY text and #PHOTOS name | text lines
  │   ├── 1.jpg                    # Photos in natural order: 1, 2, 10
  │   └── old/                     # Subcategory
  │       ├── description.txt      # Plain description
  │       └── 3.jpg
  └── other/
      └── moscow/

Per photo:
  Alt text:  authored description, else \"category [subcategory] name\"
  Date:      EXIF DateTimeOriginal as DD-MM-YYYY, else null

Set RUST_LOG=gallery_manifest=debug for per-directory detail.
Run 'gallery-manifest gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Asset root directory
    #[arg(long, default_value = "photos", global = true)]
    source: PathBuf,

    /// Manifest file to write or check
    #[arg(long, default_value = "photos_data.json", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the asset root and write the manifest
    Build {
        /// Also print the discovered category tree
        #[arg(long)]
        list: bool,
    },
    /// Scan without writing; with --existing, validate the manifest file instead
    Check {
        /// Validate the existing manifest file at --output
        #[arg(long)]
        existing: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { list } => {
            let config = config::load_config(&cli.source)?;
            init_thread_pool(&config.processing);

            info!(source = %cli.source.display(), "scanning");
            let result = serialize::build(&cli.source, &config, &cli.output)?;

            if list {
                output::print_scan_output(&result);
            }
            output::print_build_summary(&result, &cli.output);
        }
        Command::Check { existing } => {
            if existing {
                let manifest = serialize::read_manifest(&cli.output)?;
                output::print_check_output(&manifest, &cli.output);
            } else {
                let config = config::load_config(&cli.source)?;
                init_thread_pool(&config.processing);
                let result = scan::scan_with_config(&cli.source, &config)?;
                output::print_scan_output(&result);
                println!("==> {} is valid", cli.source.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for listings and `gen-config`.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery_manifest=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
