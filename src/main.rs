//! Flametree CLI
//!
//! Aggregates recorded stack samples into flame-graph call trees.
//! Generates JSON tree documents and SVG flamegraphs from sample files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use flametree::commands::{execute_build, validate_args, BuildArgs};
use flametree::flamegraph::FlamegraphConfig;
use flametree::input::FrameOrder;
use flametree::utils::config::SCHEMA_VERSION;

/// Flametree - stack-sample aggregation into flame-graph call trees
#[derive(Parser, Debug)]
#[command(name = "flametree")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a call tree from a sample file
    Build {
        /// Path to JSON sample file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for JSON tree document
        #[arg(short, long, default_value = "tree.json")]
        output: PathBuf,

        /// Output path for SVG flamegraph (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Frame categorization mode: line, method, class or package
        #[arg(short, long, default_value = "method")]
        mode: String,

        /// Fold direct recursive self-calls into one node
        #[arg(long)]
        collapse_recursion: bool,

        /// Override the sample file's frame order: root-first or leaf-first
        #[arg(long)]
        frame_order: Option<String>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Print text summary of the hottest paths to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a tree document JSON file
    Validate {
        /// Path to tree document JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Build {
            input,
            output,
            flamegraph,
            mode,
            collapse_recursion,
            frame_order,
            title,
            width,
            summary,
        } => {
            let frame_order = match frame_order {
                Some(order) => Some(order.parse::<FrameOrder>()?),
                None => None,
            };

            let fg_config = if flamegraph.is_some() {
                let mut config = FlamegraphConfig::new();
                if let Some(title_str) = title {
                    config = config.with_title(title_str);
                }
                config.width = width;
                Some(config)
            } else {
                None
            };

            let args = BuildArgs {
                input,
                output_json: output,
                output_svg: flamegraph,
                mode,
                collapse_recursion,
                frame_order,
                flamegraph_config: fg_config,
                print_summary: summary,
            };

            // Validate args (and the mode) first
            let policy = validate_args(&args)?;

            execute_build(args, policy)?;
        }

        Commands::Validate { file } => {
            validate_document_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a tree document JSON file
///
/// **Private** - internal command implementation
fn validate_document_file(file_path: PathBuf) -> Result<()> {
    use flametree::output::read_document;

    println!("Validating tree document: {}", file_path.display());

    let document = read_document(&file_path)?;

    println!("✓ Valid tree document");
    println!("  Version: {}", document.version);
    println!("  Mode: {}", document.mode);
    println!("  Samples: {}", document.sample_count);
    println!("  Skipped: {}", document.skipped_samples);
    println!("  Root children: {}", document.tree.children.map_or(0, |c| c.len()));

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Flametree Tree Document Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  mode: string             - Frame categorization mode");
        println!("  sample_count: number     - Samples aggregated into the tree");
        println!("  skipped_samples: number  - Samples skipped (missing/empty stacks)");
        println!("  generated_at: string     - ISO 8601 timestamp");
        println!("  tree: object             - Nested tree view");
        println!("    name: string           - Frame label ('root' at the top)");
        println!("    value: number          - Own sample count of the node");
        println!("    children: array?       - Child views, omitted for leaves");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Flametree v{}", env!("CARGO_PKG_VERSION"));
    println!("Document Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Stack-sample aggregation into flame-graph call trees.");
}
