/// zkperf Proving Pipeline Log Analyzer
///
/// Entry point for the performance log analysis pipeline. Run labels are
/// positional arguments; file paths derive from them: the raw log is read
/// from `logs/test_<label>.log`, the extracted record table is written to
/// `logs/perf_<label>.csv`, and charts land under `<label>/`. With two
/// labels, comparison charts are additionally written under
/// `<label0>-<label1>/`.
///
/// Any malformed log line or aggregation mismatch aborts the run; no partial
/// chart set is produced from inconsistent data.

// Pipeline stages
mod analyze;
mod charts;
mod extract;

use chrono::Utc;
use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process;

fn main() {
    println!("zkperf Proving Pipeline Log Analyzer");
    println!("====================================");

    let args: Vec<String> = env::args().collect();
    let labels: Vec<&String> = args.iter().skip(1).collect();

    if labels.is_empty() || labels.len() > 2 {
        display_usage_info();
        process::exit(1);
    }

    println!("Session started: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));

    if let Err(e) = run(&labels) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    println!("\n=== Analysis Complete ===");
}

fn run(labels: &[&String]) -> Result<(), Box<dyn Error>> {
    let mut reports = Vec::new();

    for label in labels {
        println!("\n=== Run: {} ===", label);
        let report = analyze_run(label)?;
        render_run_charts(&report, label)?;
        reports.push(report);
    }

    if let [first, second] = reports.as_slice() {
        let out_dir = PathBuf::from(format!("{}-{}", labels[0], labels[1]));
        println!("\n=== Comparison: {} vs {} ===", labels[0], labels[1]);

        charts::compare_summary(first, second, labels[0], labels[1], &out_dir)?;
        charts::compare_step_performance(first, second, labels[0], labels[1], &out_dir)?;
        charts::compare_chip_performance(first, second, labels[0], labels[1], &out_dir)?;

        println!("Comparison charts written to {}/", out_dir.display());
    }

    Ok(())
}

/// Extract one run's log into the CSV table and aggregate it
fn analyze_run(label: &str) -> Result<analyze::PerfReport, Box<dyn Error>> {
    let log_path = format!("logs/test_{}.log", label);
    let csv_path = format!("logs/perf_{}.csv", label);

    let emitted = extract::extract_to_csv(&log_path, &csv_path)?;
    println!("Extracted {} records from {} into {}", emitted, log_path, csv_path);

    let records = analyze::read_records(&csv_path)?;
    let report = analyze::build_report(&records)?;

    println!("Performance for machines:");
    println!("{}", report.summary_json()?);

    Ok(report)
}

/// Render the three single-run charts under `<label>/`
fn render_run_charts(report: &analyze::PerfReport, label: &str) -> Result<(), Box<dyn Error>> {
    let out_dir = PathBuf::from(label);

    charts::plot_summary(report, &out_dir)?;
    charts::plot_step_performance(report, &out_dir)?;
    charts::plot_chip_performance(report, &out_dir)?;

    println!("Charts written to {}/", out_dir.display());
    Ok(())
}

/// Display usage information
fn display_usage_info() {
    println!("\nUsage:");
    println!("  zkperf <label>            - analyze one run");
    println!("  zkperf <label0> <label1>  - analyze two runs and compare them");
    println!("\nPaths derive from the label:");
    println!("  input log     logs/test_<label>.log");
    println!("  record table  logs/perf_<label>.csv");
    println!("  charts        <label>/  (and <label0>-<label1>/ for comparisons)");
}
