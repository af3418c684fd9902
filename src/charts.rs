/// Chart Rendering
///
/// Bar-chart rendering for aggregated proving-pipeline performance. Consumes
/// [`PerfReport`] values and writes deterministic PNG artifacts: a per-machine
/// summary (prove time, proof size), a per-step breakdown, a per-chip stacked
/// breakdown, and paired two-run comparison variants of each.
///
/// Output directories are created on demand; any rendering failure propagates
/// to the caller.

use crate::analyze::PerfReport;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::Path;

const SUMMARY_SIZE: (u32, u32) = (1200, 1000);
const BREAKDOWN_SIZE: (u32, u32) = (1400, 1000);

const RUN0_BLUE: RGBColor = RGBColor(24, 48, 116);
const RUN1_BLUE: RGBColor = RGBColor(140, 180, 230);
const RUN0_GREEN: RGBColor = RGBColor(22, 92, 48);
const RUN1_GREEN: RGBColor = RGBColor(150, 215, 165);

fn step_color(index: usize) -> RGBColor {
    let color = Palette99::pick(index).to_rgba();
    RGBColor(color.0, color.1, color.2)
}

/// Blend a color toward white; `factor` 0.0 keeps it, 1.0 is white
fn lighten(color: RGBColor, factor: f64) -> RGBColor {
    let blend = |v: u8| (v as f64 + (255.0 - v as f64) * factor).round() as u8;
    RGBColor(blend(color.0), blend(color.1), blend(color.2))
}

/// Scale a color toward black; `factor` 1.0 keeps it
fn darken(color: RGBColor, factor: f64) -> RGBColor {
    let scale = |v: u8| (v as f64 * factor).round() as u8;
    RGBColor(scale(color.0), scale(color.1), scale(color.2))
}

/// Sorted union of the machine keys of two reports
fn machine_union(first: &PerfReport, second: &PerfReport) -> Vec<String> {
    let mut keys: BTreeSet<String> = first.machines.iter().cloned().collect();
    keys.extend(second.machines.iter().cloned());
    keys.into_iter().collect()
}

/// Sorted union of chip-level step buckets across one or two reports
fn chip_bucket_union(reports: &[&PerfReport]) -> Vec<String> {
    let mut buckets = BTreeSet::new();
    for report in reports {
        for perf in report.by_machine.values() {
            for chip in perf.chips.values() {
                buckets.extend(chip.keys().cloned());
            }
        }
    }
    buckets.into_iter().collect()
}

/// Render the single-run summary chart: prove times and proof sizes
pub fn plot_summary(report: &PerfReport, out_dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join("prove_summary.png");
    let root = BitMapBackend::new(&path, SUMMARY_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically((SUMMARY_SIZE.1 / 2) as i32);

    let machines = &report.machines;
    let prove_times: Vec<f64> = machines
        .iter()
        .map(|key| report.get(key).map_or(0, |perf| perf.prove) as f64)
        .collect();
    let proof_sizes: Vec<f64> = machines
        .iter()
        .map(|key| report.get(key).map_or(0, |perf| perf.proof_size) as f64 / 1000.0)
        .collect();

    draw_value_bars(
        &upper,
        "Prove Time for Each Machine",
        "Prove Time (ms)",
        machines,
        &prove_times,
    )?;
    draw_value_bars(
        &lower,
        "Proof Size for Each Machine",
        "Proof Size (KB)",
        machines,
        &proof_sizes,
    )?;

    root.present()?;
    Ok(())
}

/// Vertical bars with value labels on top
fn draw_value_bars(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
) -> Result<(), Box<dyn Error>> {
    let x_max = labels.len().max(1) as f64;
    let y_max = values.iter().cloned().fold(0.0, f64::max).max(1.0) * 1.15;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 26))
        .margin(20)
        .x_label_area_size(130)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    let label_fmt = |x: &f64| {
        labels
            .get(x.floor() as usize)
            .cloned()
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&label_fmt)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, &value)| {
        Rectangle::new(
            [(i as f64 + 0.3, 0.0), (i as f64 + 0.7, value)],
            BLUE.filled(),
        )
    }))?;
    chart.draw_series(values.iter().enumerate().map(|(i, &value)| {
        Text::new(
            format!("{}", value as u64),
            (i as f64 + 0.4, value),
            ("sans-serif", 15).into_font(),
        )
    }))?;

    Ok(())
}

/// Render the per-step breakdown: horizontal grouped bars per machine
pub fn plot_step_performance(report: &PerfReport, out_dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join("step_performance.png");
    let root = BitMapBackend::new(&path, BREAKDOWN_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let machines = &report.machines;
    let steps: Vec<String> = machines
        .first()
        .and_then(|key| report.get(key))
        .map(|perf| perf.steps.keys().cloned().collect())
        .unwrap_or_default();

    let bar_height = 0.8 / steps.len().max(1) as f64;
    let x_max = machines
        .iter()
        .filter_map(|key| report.get(key))
        .flat_map(|perf| perf.steps.values())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.2;

    let mut chart = ChartBuilder::on(&root)
        .caption("Step Performances for All Machines", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(170)
        .build_cartesian_2d(0f64..x_max, 0f64..machines.len().max(1) as f64)?;

    let label_fmt = |y: &f64| {
        machines
            .get(y.floor() as usize)
            .cloned()
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(machines.len().max(1))
        .y_label_formatter(&label_fmt)
        .x_desc("Time (ms)")
        .y_desc("Machines")
        .draw()?;

    for (step_idx, step) in steps.iter().enumerate() {
        let color = step_color(step_idx);
        let values: Vec<(usize, f64)> = machines
            .iter()
            .enumerate()
            .map(|(machine_idx, key)| {
                let value = report
                    .get(key)
                    .and_then(|perf| perf.steps.get(step))
                    .copied()
                    .unwrap_or(0) as f64;
                (machine_idx, value)
            })
            .collect();

        chart
            .draw_series(values.iter().map(|&(machine_idx, value)| {
                let y0 = machine_idx as f64 + 0.1 + step_idx as f64 * bar_height;
                Rectangle::new([(0.0, y0), (value, y0 + bar_height * 0.9)], color.filled())
            }))?
            .label(step.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

        chart.draw_series(values.iter().map(|&(machine_idx, value)| {
            let y0 = machine_idx as f64 + 0.1 + step_idx as f64 * bar_height;
            Text::new(
                format!("{}", value as u64),
                (value, y0 + bar_height * 0.4),
                ("sans-serif", 12).into_font(),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.85))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render the per-chip stacked breakdown, one row per machine/chip pair
pub fn plot_chip_performance(report: &PerfReport, out_dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join("chip_performances.png");
    let root = BitMapBackend::new(&path, BREAKDOWN_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let steps = chip_bucket_union(&[report]);

    // Rows are (machine key, chip name), machines in report order
    let mut rows: Vec<(String, String)> = Vec::new();
    for key in &report.machines {
        if let Some(perf) = report.get(key) {
            for chip in perf.chips.keys() {
                rows.push((key.clone(), chip.clone()));
            }
        }
    }
    let row_labels: Vec<String> = rows
        .iter()
        .map(|(machine, chip)| format!("{} / {}", machine, chip))
        .collect();

    let row_total = |machine: &str, chip: &str| -> u64 {
        report
            .get(machine)
            .and_then(|perf| perf.chips.get(chip))
            .map(|buckets| buckets.values().sum())
            .unwrap_or(0)
    };
    let x_max = rows
        .iter()
        .map(|(machine, chip)| row_total(machine, chip))
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.25;

    let mut chart = ChartBuilder::on(&root)
        .caption("Chip Performances Across Machines", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(240)
        .build_cartesian_2d(0f64..x_max, 0f64..rows.len().max(1) as f64)?;

    let label_fmt = |y: &f64| {
        row_labels
            .get(y.floor() as usize)
            .cloned()
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows.len().max(1))
        .y_label_formatter(&label_fmt)
        .x_desc("Time (ms)")
        .draw()?;

    for (step_idx, step) in steps.iter().enumerate() {
        let color = step_color(step_idx);
        let mut segments = Vec::new();
        for (row_idx, (machine, chip)) in rows.iter().enumerate() {
            let buckets = report.get(machine).and_then(|perf| perf.chips.get(chip));
            let left: u64 = steps[..step_idx]
                .iter()
                .map(|prior| buckets.and_then(|b| b.get(prior)).copied().unwrap_or(0))
                .sum();
            let value = buckets.and_then(|b| b.get(step)).copied().unwrap_or(0);
            if value > 0 {
                segments.push(Rectangle::new(
                    [
                        (left as f64, row_idx as f64 + 0.15),
                        ((left + value) as f64, row_idx as f64 + 0.85),
                    ],
                    color.filled(),
                ));
            }
        }
        chart
            .draw_series(segments)?
            .label(step.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart.draw_series(rows.iter().enumerate().map(|(row_idx, (machine, chip))| {
        let total = row_total(machine, chip);
        Text::new(
            format!("{}", total),
            (total as f64, row_idx as f64 + 0.45),
            ("sans-serif", 12).into_font(),
        )
    }))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.85))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render the two-run summary comparison
///
/// Prove times carry a leading synthetic `0-e2e` bar with each run's total
/// over the machine union; proof sizes are paired without the total.
pub fn compare_summary(
    first: &PerfReport,
    second: &PerfReport,
    first_label: &str,
    second_label: &str,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join("compare_summary.png");
    let root = BitMapBackend::new(&path, SUMMARY_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically((SUMMARY_SIZE.1 / 2) as i32);

    let machines = machine_union(first, second);
    let prove_of = |report: &PerfReport, key: &str| report.get(key).map_or(0, |perf| perf.prove);
    let size_of =
        |report: &PerfReport, key: &str| report.get(key).map_or(0, |perf| perf.proof_size);

    let total_first: u64 = machines.iter().map(|key| prove_of(first, key)).sum();
    let total_second: u64 = machines.iter().map(|key| prove_of(second, key)).sum();

    let mut prove_labels = vec!["0-e2e".to_string()];
    prove_labels.extend(machines.iter().cloned());
    let mut prove_first = vec![total_first as f64];
    prove_first.extend(machines.iter().map(|key| prove_of(first, key) as f64));
    let mut prove_second = vec![total_second as f64];
    prove_second.extend(machines.iter().map(|key| prove_of(second, key) as f64));

    let sizes_first: Vec<f64> = machines
        .iter()
        .map(|key| size_of(first, key) as f64 / 1000.0)
        .collect();
    let sizes_second: Vec<f64> = machines
        .iter()
        .map(|key| size_of(second, key) as f64 / 1000.0)
        .collect();

    draw_paired_bars(
        &upper,
        "Prove Time Comparison",
        "Prove Time (ms)",
        &prove_labels,
        (&prove_first, &prove_second),
        (first_label, second_label),
        (RUN0_BLUE, RUN1_BLUE),
    )?;
    draw_paired_bars(
        &lower,
        "Proof Size Comparison",
        "Proof Size (KB)",
        &machines,
        (&sizes_first, &sizes_second),
        (first_label, second_label),
        (RUN0_GREEN, RUN1_GREEN),
    )?;

    root.present()?;
    Ok(())
}

/// Paired vertical bars for two runs, with a legend and value labels
fn draw_paired_bars(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    y_desc: &str,
    labels: &[String],
    values: (&[f64], &[f64]),
    run_labels: (&str, &str),
    colors: (RGBColor, RGBColor),
) -> Result<(), Box<dyn Error>> {
    let x_max = labels.len().max(1) as f64;
    let y_max = values
        .0
        .iter()
        .chain(values.1.iter())
        .cloned()
        .fold(0.0, f64::max)
        .max(1.0)
        * 1.15;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 26))
        .margin(20)
        .x_label_area_size(130)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    let label_fmt = |x: &f64| {
        labels
            .get(x.floor() as usize)
            .cloned()
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&label_fmt)
        .y_desc(y_desc)
        .draw()?;

    let (first_color, second_color) = colors;
    chart
        .draw_series(values.0.iter().enumerate().map(|(i, &value)| {
            Rectangle::new(
                [(i as f64 + 0.12, 0.0), (i as f64 + 0.47, value)],
                first_color.filled(),
            )
        }))?
        .label(run_labels.0)
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], first_color.filled()));
    chart
        .draw_series(values.1.iter().enumerate().map(|(i, &value)| {
            Rectangle::new(
                [(i as f64 + 0.53, 0.0), (i as f64 + 0.88, value)],
                second_color.filled(),
            )
        }))?
        .label(run_labels.1)
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], second_color.filled()));

    for (offset, run_values) in [(0.12, values.0), (0.53, values.1)] {
        chart.draw_series(run_values.iter().enumerate().map(|(i, &value)| {
            Text::new(
                format!("{}", value as u64),
                (i as f64 + offset, value),
                ("sans-serif", 12).into_font(),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.85))
        .draw()?;

    Ok(())
}

/// Render the two-run per-step comparison
///
/// Each step bucket gets a dark (first run) and light (second run) bar per
/// machine, plus a derived `prove` pseudo-step summing every bucket.
pub fn compare_step_performance(
    first: &PerfReport,
    second: &PerfReport,
    first_label: &str,
    second_label: &str,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join("compare_step.png");
    let root = BitMapBackend::new(&path, (1600, 1000)).into_drawing_area();
    root.fill(&WHITE)?;

    // Machine set and step order follow the first run
    let machines = &first.machines;
    let mut steps: Vec<String> = machines
        .first()
        .and_then(|key| first.get(key))
        .map(|perf| perf.steps.keys().cloned().collect())
        .unwrap_or_default();
    steps.push("prove".to_string());

    fn bucket_value(report: &PerfReport, key: &str, step: &str) -> u64 {
        match report.get(key) {
            Some(perf) if step == "prove" => perf.step_total(),
            Some(perf) => perf.steps.get(step).copied().unwrap_or(0),
            None => 0,
        }
    }

    let bar_height = 0.8 / (steps.len().max(1) * 2) as f64;
    let x_max = machines
        .iter()
        .flat_map(|key| {
            steps
                .iter()
                .map(move |step| bucket_value(first, key, step).max(bucket_value(second, key, step)))
        })
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.2;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Step Performances Comparison: {} vs {}",
                first_label, second_label
            ),
            ("sans-serif", 28),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(170)
        .build_cartesian_2d(0f64..x_max, 0f64..machines.len().max(1) as f64)?;

    let label_fmt = |y: &f64| {
        machines
            .get(y.floor() as usize)
            .cloned()
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(machines.len().max(1))
        .y_label_formatter(&label_fmt)
        .x_desc("Time (ms)")
        .y_desc("Machines")
        .draw()?;

    for (step_idx, step) in steps.iter().enumerate() {
        let base = step_color(step_idx);
        let runs = [
            (first, first_label, darken(base, 0.7), 0usize),
            (second, second_label, lighten(base, 0.3), 1usize),
        ];
        for (report, run_label, color, case) in runs {
            chart
                .draw_series(machines.iter().enumerate().map(|(machine_idx, key)| {
                    let value = bucket_value(report, key, step) as f64;
                    let y0 = machine_idx as f64
                        + 0.1
                        + (step_idx * 2 + case) as f64 * bar_height;
                    Rectangle::new([(0.0, y0), (value, y0 + bar_height * 0.9)], color.filled())
                }))?
                .label(format!("{} ({})", step, run_label))
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.85))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render the two-run per-chip comparison: paired stacked rows, the second
/// run drawn in a lightened variant of each step color
pub fn compare_chip_performance(
    first: &PerfReport,
    second: &PerfReport,
    first_label: &str,
    second_label: &str,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join("compare_chip.png");
    let root = BitMapBackend::new(&path, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let machines = machine_union(first, second);
    let steps = chip_bucket_union(&[first, second]);

    // Rows are (machine key, chip name) over the union of both runs' chips
    let mut rows: Vec<(String, String)> = Vec::new();
    for key in &machines {
        let mut chips: BTreeSet<String> = BTreeSet::new();
        for report in [first, second] {
            if let Some(perf) = report.get(key) {
                chips.extend(perf.chips.keys().cloned());
            }
        }
        for chip in chips {
            rows.push((key.clone(), chip));
        }
    }
    let row_labels: Vec<String> = rows
        .iter()
        .map(|(machine, chip)| format!("{} / {}", machine, chip))
        .collect();

    let chip_total = |report: &PerfReport, machine: &str, chip: &str| -> u64 {
        report
            .get(machine)
            .and_then(|perf| perf.chips.get(chip))
            .map(|buckets| buckets.values().sum())
            .unwrap_or(0)
    };
    let x_max = rows
        .iter()
        .map(|(machine, chip)| chip_total(first, machine, chip).max(chip_total(second, machine, chip)))
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.25;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Chip Performances: {} vs {}", first_label, second_label),
            ("sans-serif", 28),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(240)
        .build_cartesian_2d(0f64..x_max, 0f64..rows.len().max(1) as f64)?;

    let label_fmt = |y: &f64| {
        row_labels
            .get(y.floor() as usize)
            .cloned()
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows.len().max(1))
        .y_label_formatter(&label_fmt)
        .x_desc("Time (ms)")
        .draw()?;

    for (step_idx, step) in steps.iter().enumerate() {
        let base = step_color(step_idx);
        let runs = [
            (first, first_label, base, 0.55f64),
            (second, second_label, lighten(base, 0.45), 0.1f64),
        ];
        for (report, run_label, color, y_offset) in runs {
            let mut segments = Vec::new();
            for (row_idx, (machine, chip)) in rows.iter().enumerate() {
                let buckets = report.get(machine).and_then(|perf| perf.chips.get(chip));
                let left: u64 = steps[..step_idx]
                    .iter()
                    .map(|prior| buckets.and_then(|b| b.get(prior)).copied().unwrap_or(0))
                    .sum();
                let value = buckets.and_then(|b| b.get(step)).copied().unwrap_or(0);
                if value > 0 {
                    let y0 = row_idx as f64 + y_offset;
                    segments.push(Rectangle::new(
                        [(left as f64, y0), ((left + value) as f64, y0 + 0.35)],
                        color.filled(),
                    ));
                }
            }
            chart
                .draw_series(segments)?
                .label(format!("{}-{}", run_label, step))
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.85))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::build_report;
    use crate::extract::PerfRecord;

    fn rec(machine: &str, step: &str, perf: &str) -> PerfRecord {
        PerfRecord {
            machine: machine.to_string(),
            chunk: String::new(),
            phase: String::new(),
            step: step.to_string(),
            chip: String::new(),
            time: String::new(),
            perf: perf.to_string(),
        }
    }

    #[test]
    fn machine_union_is_sorted_and_deduplicated() {
        let first = build_report(&[rec("b", "prove", "1"), rec("a", "prove", "2")]).unwrap();
        let second = build_report(&[rec("a", "prove", "3")]).unwrap();
        assert_eq!(
            machine_union(&first, &second),
            vec!["1-a", "1-b", "2-a"]
        );
    }

    #[test]
    fn chip_bucket_union_covers_both_reports() {
        let mut rows = vec![rec("a", "prove", "1")];
        rows[0].phase = "1".to_string();
        rows[0].step = "generate_main".to_string();
        rows[0].chip = "Program".to_string();
        rows[0].time = "cpu_time".to_string();
        rows[0].perf = "5".to_string();
        let first = build_report(&rows).unwrap();

        rows[0].step = "generate_permutation".to_string();
        let second = build_report(&rows).unwrap();

        assert_eq!(
            chip_bucket_union(&[&first, &second]),
            vec!["generate_main_ph1", "generate_permutation"]
        );
    }

    #[test]
    fn lighten_and_darken_stay_in_range() {
        let base = RGBColor(100, 150, 200);
        assert_eq!(lighten(base, 0.0), base);
        assert_eq!(lighten(base, 1.0), RGBColor(255, 255, 255));
        assert_eq!(darken(base, 1.0), base);
        assert_eq!(darken(base, 0.0), RGBColor(0, 0, 0));
    }
}
