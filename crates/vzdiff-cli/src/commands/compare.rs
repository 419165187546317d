//! Compare command
//!
//! Usage: vzdiff compare --reference <FILE> --candidate <FILE> [--format <FORMAT>] [--exit-code] [--stats]

use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use vzdiff_core::document::{load_document, DocumentFormat};
use vzdiff_core::diff::{compare_nodes, describe, render_report};
use vzdiff_core::{log_op_end, log_op_start};

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Document holding the reference (live) value
    #[arg(long)]
    pub reference: PathBuf,

    /// Document holding the candidate (desired) value; its unset fields are ignored
    #[arg(long)]
    pub candidate: PathBuf,

    /// Document format: auto, json or yaml (auto picks by file extension)
    #[arg(long, default_value = "auto")]
    pub format: DocumentFormat,

    /// Exit with status 1 when differences are found
    #[arg(long)]
    pub exit_code: bool,

    /// Print outcome counts after the report
    #[arg(long)]
    pub stats: bool,
}

pub fn execute(args: CompareArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let start = Instant::now();
    log_op_start!("compare");

    let reference = load_document(&args.reference, args.format)?;
    let candidate = load_document(&args.candidate, args.format)?;

    let reference_node = describe(&reference);
    let candidate_node = describe(&candidate);
    let tree = compare_nodes(&reference_node, &candidate_node);
    let report = render_report(&tree);
    if !report.is_empty() {
        println!("{}", report);
    }
    if args.stats {
        let stats = tree.stats();
        println!(
            "# {} added, {} removed, {} changed, {} identical, {} ignored",
            stats.added, stats.removed, stats.changed, stats.identical, stats.ignored
        );
    }

    log_op_end!(
        "compare",
        duration_ms = start.elapsed().as_millis() as u64,
        diff_lines = report.lines().count() as u64
    );

    let differs = !report.is_empty();
    Ok(if differs && args.exit_code { 1 } else { 0 })
}
