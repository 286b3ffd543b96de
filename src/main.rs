use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wikifold::{config, generate, output, process};

#[derive(Parser)]
#[command(name = "wikifold")]
#[command(about = "Fold a directory of markdown into one self-contained HTML wiki")]
#[command(long_about = "\
Fold a directory of markdown into one self-contained HTML wiki

Every markdown file becomes a section of a single page with a sidebar that
mirrors the folder structure. Links between markdown files become in-page
navigation, and frontmatter tags become a clickable cross-reference index.

Input structure:

  docs/
  ├── wikifold.toml              # Config (optional)
  ├── index.md                   # Entry document (required, shown first)
  ├── changelog.md               # Root documents, in path order
  └── guide/                     # Folder → collapsible sidebar group
      ├── install.md
      └── setup.md               # ---
                                 # tags: [setup, intro]
                                 # ---

Titles come from file names: guide/quick-setup.md → \"Guide / Quick Setup\".

Run 'wikifold gen-config' to generate a documented wikifold.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to wikifold.toml in the input folder)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a markdown folder into a single HTML file
    Build {
        /// Folder containing the markdown documents
        input: PathBuf,
        /// Output HTML file
        #[arg(short, long, default_value = "index.html")]
        output: PathBuf,
    },
    /// Process a markdown folder and report problems without writing output
    Check {
        /// Folder containing the markdown documents
        input: PathBuf,
    },
    /// Print a stock wikifold.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build { input, output: out } => {
            let config = config::load_config(&input, cli.config.as_deref())?;
            init_thread_pool(&config.processing);

            println!("==> Converting {}", input.display());
            let conversion = process::convert(&input)?;
            generate::generate(&conversion, &config, &out)?;
            output::print_conversion(&conversion, Some(out.as_path()));
        }
        Command::Check { input } => {
            let config = config::load_config(&input, cli.config.as_deref())?;
            init_thread_pool(&config.processing);

            println!("==> Checking {}", input.display());
            let conversion = process::convert(&input)?;
            output::print_conversion(&conversion, None);
            if conversion.warnings.is_empty() {
                println!("==> Documents are valid");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the global logger. `RUST_LOG` wins over the `-v` default.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
