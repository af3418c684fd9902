#![warn(clippy::all)]

/// zkperf: Proving Pipeline Performance Log Analyzer
///
/// Parses tagged performance lines from proving-pipeline log output,
/// normalizes them into a CSV record table, aggregates per machine, step,
/// chip and phase, and renders comparative bar charts for one or two
/// benchmark runs.
///
/// # Architecture
///
/// The pipeline runs in two stages plus a reporting sink:
/// - [`extract`]: log-scan state machine producing the flat record table
/// - [`analyze`]: nested per-machine aggregation over the table
/// - [`charts`]: bar-chart rendering, including two-run comparisons

// Log-to-record extraction
pub mod extract;

// Record aggregation
pub mod analyze;

// Chart rendering
pub mod charts;

// Re-export main types and functions for the public API
pub use extract::{
    extract_records, extract_to_csv, perf_tokens, ExtractError, PerfRecord, ScanContext,
};

pub use analyze::{build_report, read_records, AnalyzeError, MachinePerf, PerfReport};

pub use charts::{
    compare_chip_performance, compare_step_performance, compare_summary, plot_chip_performance,
    plot_step_performance, plot_summary,
};
