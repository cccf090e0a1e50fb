//! Build command implementation.
//!
//! The build command:
//! 1. Reads and normalizes the sample file
//! 2. Constructs the frame identity policy
//! 3. Builds the aggregated call tree
//! 4. Serializes the tree view
//! 5. Writes the JSON document (and optional SVG flamegraph)

use crate::flamegraph::{collapse_tree, generate_flamegraph, CollapsedStack, FlamegraphConfig};
use crate::frame::FramePolicy;
use crate::input::{read_samples, FrameOrder};
use crate::output::{write_document, write_svg, TreeDocument};
use crate::tree::{build_tree, to_view};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the build command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct BuildArgs {
    /// Path to the JSON sample file
    pub input: PathBuf,

    /// Output path for the JSON tree document
    pub output_json: PathBuf,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Categorization mode name (validated at policy construction)
    pub mode: String,

    /// Fold direct recursive self-calls into one node
    pub collapse_recursion: bool,

    /// Forced frame order, overriding the file's declaration
    pub frame_order: Option<FrameOrder>,

    /// Flamegraph configuration (when SVG output is requested)
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print a text summary of the hottest paths to stdout
    pub print_summary: bool,
}

/// Validate build arguments before doing any work
///
/// **Public** - called from main.rs ahead of execute_build
///
/// Policy construction happens here so an unrecognized mode fails fast as a
/// configuration error, never mid-build.
pub fn validate_args(args: &BuildArgs) -> Result<FramePolicy> {
    if !args.input.exists() {
        anyhow::bail!("Sample file not found: {}", args.input.display());
    }
    let policy = FramePolicy::new(&args.mode, args.collapse_recursion)
        .context("Invalid categorization mode")?;
    Ok(policy)
}

/// Execute the build command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Sample file read/parse errors
/// * Output write errors
/// * Flamegraph rendering errors
pub fn execute_build(args: BuildArgs, policy: FramePolicy) -> Result<()> {
    let start_time = Instant::now();

    info!("Building tree from: {}", args.input.display());

    // Step 1: Read samples
    info!("Step 1/4: Reading samples...");
    let samples = read_samples(&args.input, args.frame_order)
        .context("Failed to read sample file")?;

    // Step 2: Build tree
    info!("Step 2/4: Aggregating {} samples (mode: {})...", samples.len(), policy.mode());
    let tree = build_tree(&samples, &policy);

    debug!(
        "Tree: {} nodes, {} samples aggregated, {} skipped",
        tree.node_count(),
        tree.aggregated_samples(),
        tree.skipped_samples()
    );

    // Step 3: Serialize
    info!("Step 3/4: Serializing tree view...");
    let view = to_view(&tree);
    let document = TreeDocument::new(
        policy.mode().to_string(),
        tree.aggregated_samples(),
        tree.skipped_samples(),
        view,
    );

    // Step 4: Write outputs
    info!("Step 4/4: Writing output files...");
    write_document(&document, &args.output_json)
        .context("Failed to write tree document")?;
    info!("✓ Tree document written to: {}", args.output_json.display());

    if args.output_svg.is_some() || args.print_summary {
        let stacks = collapse_tree(&tree);

        if let Some(svg_path) = &args.output_svg {
            let svg = generate_flamegraph(&stacks, args.flamegraph_config.as_ref())
                .context("Failed to generate flamegraph")?;
            write_svg(&svg, svg_path).context("Failed to write SVG")?;
            info!("✓ Flamegraph written to: {}", svg_path.display());
        }

        if args.print_summary {
            print_summary(&stacks, 10);
        }
    }

    info!("Done in {:.2?}", start_time.elapsed());
    Ok(())
}

/// Print the hottest collapsed paths to stdout
///
/// **Private** - internal summary rendering
fn print_summary(stacks: &[CollapsedStack], max_lines: usize) {
    let total: u64 = stacks.iter().map(|s| s.weight).sum::<u64>().max(1);

    println!("Hottest paths:");
    for stack in stacks.iter().take(max_lines) {
        let percentage = (stack.weight as f64 / total as f64) * 100.0;
        println!("  {:>10}  {:>5.1}%  {}", stack.weight, percentage, stack.stack);
    }
    if stacks.len() > max_lines {
        println!("  (showing top {} of {} unique paths)", max_lines, stacks.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(mode: &str) -> BuildArgs {
        BuildArgs {
            input: PathBuf::from("/nonexistent/samples.json"),
            output_json: PathBuf::from("tree.json"),
            output_svg: None,
            mode: mode.to_string(),
            collapse_recursion: false,
            frame_order: None,
            flamegraph_config: None,
            print_summary: false,
        }
    }

    #[test]
    fn test_validate_args_missing_input() {
        let result = validate_args(&args("method"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_args_bad_mode_fails_fast() {
        let mut bad = args("bogus");
        let temp = tempfile::NamedTempFile::new().unwrap();
        bad.input = temp.path().to_path_buf();
        let err = validate_args(&bad).unwrap_err();
        assert!(format!("{:#}", err).contains("bogus"));
    }
}
