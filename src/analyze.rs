/// Performance Aggregation
///
/// This module reads the extracted record table back from CSV and folds it
/// into nested per-machine summaries: four scalar measurements (setup, prove,
/// verify, proof size), accumulated per-step wall times, and accumulated
/// per-chip CPU times. Machines are keyed by an ordinal-prefixed name so that
/// repeated machine identifiers stay distinct and first-seen order is
/// preserved for the charts.
///
/// Step and chip buckets use lazy zero defaults: unknown keys are created on
/// first accumulation. The six `generate_main`/`commit_main` buckets are
/// pre-initialized to zero so they are always present downstream, even for
/// runs that never exercise them.

use crate::extract::PerfRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Fatal aggregation failures
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyzeError {
    /// A chip-level row carries a step outside the known chip-level step set
    UnexpectedStepForChip { step: String, chip: String },
    /// A consumed row's perf field is not an integer
    InvalidPerfValue { step: String, perf: String },
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzeError::UnexpectedStepForChip { step, chip } => {
                write!(f, "unexpected step `{}` for chip `{}` performance", step, chip)
            }
            AnalyzeError::InvalidPerfValue { step, perf } => {
                write!(f, "invalid perf value `{}` for step `{}`", perf, step)
            }
        }
    }
}

impl Error for AnalyzeError {}

/// Aggregated measurements for one machine
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MachinePerf {
    pub setup_keys: u64,
    pub prove: u64,
    pub verify: u64,
    pub proof_size: u64,
    /// Step bucket -> accumulated user time (ms)
    pub steps: BTreeMap<String, u64>,
    /// Chip name -> step bucket -> accumulated CPU time (ms)
    pub chips: BTreeMap<String, BTreeMap<String, u64>>,
}

/// Step buckets that are always present, zeroed, on a fresh machine entry
const INITIAL_STEP_BUCKETS: [&str; 6] = [
    "generate_main",
    "generate_main_ph1",
    "generate_main_ph2",
    "commit_main",
    "commit_main_ph1",
    "commit_main_ph2",
];

impl MachinePerf {
    fn new() -> Self {
        let mut steps = BTreeMap::new();
        for bucket in INITIAL_STEP_BUCKETS {
            steps.insert(bucket.to_string(), 0);
        }
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Sum of all step buckets, used as the derived `prove` pseudo-step in
    /// step comparison charts
    pub fn step_total(&self) -> u64 {
        self.steps.values().sum()
    }
}

/// Per-machine summaries with first-seen machine order preserved
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PerfReport {
    /// Synthesized machine keys (`<ordinal>-<raw name>`) in first-seen order
    pub machines: Vec<String>,
    pub by_machine: BTreeMap<String, MachinePerf>,
}

impl PerfReport {
    pub fn get(&self, machine_key: &str) -> Option<&MachinePerf> {
        self.by_machine.get(machine_key)
    }

    /// Pretty-printed JSON of the per-machine summaries
    pub fn summary_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.by_machine)
    }
}

/// Read the extracted record table from a CSV file
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<PerfRecord>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

fn perf_value(record: &PerfRecord) -> Result<u64, AnalyzeError> {
    record
        .perf
        .trim()
        .parse()
        .map_err(|_| AnalyzeError::InvalidPerfValue {
            step: record.step.clone(),
            perf: record.perf.clone(),
        })
}

/// Assign each row its synthesized machine key
///
/// A new machine entry opens whenever the raw machine value changes between
/// consecutive rows; the ordinal increments per newly opened entry. Repeated
/// raw names separated by another machine therefore get distinct keys with
/// independently accumulated data.
fn machine_keys(records: &[PerfRecord]) -> (Vec<String>, Vec<String>) {
    let mut order = Vec::new();
    let mut per_row = Vec::with_capacity(records.len());
    let mut previous: Option<&str> = None;
    let mut current = String::new();

    for record in records {
        if previous != Some(record.machine.as_str()) {
            current = format!("{}-{}", order.len() + 1, record.machine);
            order.push(current.clone());
            previous = Some(record.machine.as_str());
        }
        per_row.push(current.clone());
    }

    (order, per_row)
}

/// Fold the record table into per-machine summaries
///
/// Pass one handles the scalar fields and `user_time` step buckets; pass two
/// handles `cpu_time` chip rows. Rows with time values outside the bucket
/// rules are skipped in pass one, but an unknown step on a chip row is a
/// fatal contract violation.
pub fn build_report(records: &[PerfRecord]) -> Result<PerfReport, AnalyzeError> {
    let (order, row_keys) = machine_keys(records);

    let mut report = PerfReport {
        machines: order,
        by_machine: BTreeMap::new(),
    };
    for key in &report.machines {
        report.by_machine.insert(key.clone(), MachinePerf::new());
    }

    // Pass one: scalar fields and user_time step buckets
    for (record, key) in records.iter().zip(&row_keys) {
        let perf = match report.by_machine.get_mut(key) {
            Some(perf) => perf,
            None => continue,
        };

        match record.step.as_str() {
            "setup_keys" => perf.setup_keys = perf_value(record)?,
            "prove" => perf.prove = perf_value(record)?,
            "verify" => perf.verify = perf_value(record)?,
            "proof_size" => perf.proof_size = perf_value(record)?,
            "generate_main" | "commit_main" if record.time == "user_time" => {
                let bucket = match record.phase.as_str() {
                    "1" => format!("{}_ph1", record.step),
                    "2" => format!("{}_ph2", record.step),
                    _ => record.step.clone(),
                };
                *perf.steps.entry(bucket).or_insert(0) += perf_value(record)?;
            }
            "generate_permutation" | "commit_permutation" | "commit_quotient" | "open"
                if record.time == "user_time" =>
            {
                *perf.steps.entry(record.step.clone()).or_insert(0) += perf_value(record)?;
            }
            "compute_quotient_values" if record.time == "user_time" => {
                *perf.steps.entry("compute_quotient".to_string()).or_insert(0) +=
                    perf_value(record)?;
            }
            _ => {}
        }
    }

    // Pass two: chip buckets from cpu_time rows
    for (record, key) in records.iter().zip(&row_keys) {
        if record.chip.is_empty() || record.time != "cpu_time" {
            continue;
        }

        let bucket = match record.step.as_str() {
            "generate_main" => {
                if record.phase == "1" {
                    "generate_main_ph1".to_string()
                } else {
                    "generate_main_ph2".to_string()
                }
            }
            "generate_permutation" => "generate_permutation".to_string(),
            "compute_quotient_values" => "compute_quotient".to_string(),
            other => {
                return Err(AnalyzeError::UnexpectedStepForChip {
                    step: other.to_string(),
                    chip: record.chip.clone(),
                })
            }
        };
        let value = perf_value(record)?;

        let perf = match report.by_machine.get_mut(key) {
            Some(perf) => perf,
            None => continue,
        };
        let chip = perf.chips.entry(record.chip.clone()).or_default();
        *chip.entry(bucket).or_insert(0) += value;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_records;
    use proptest::prelude::*;

    fn rec(machine: &str, phase: &str, step: &str, chip: &str, time: &str, perf: &str) -> PerfRecord {
        PerfRecord {
            machine: machine.to_string(),
            chunk: "0".to_string(),
            phase: phase.to_string(),
            step: step.to_string(),
            chip: chip.to_string(),
            time: time.to_string(),
            perf: perf.to_string(),
        }
    }

    #[test]
    fn scalar_steps_overwrite_machine_fields() {
        let rows = vec![
            rec("a", "", "setup_keys", "", "", "7"),
            rec("a", "", "prove", "", "", "120"),
            rec("a", "", "verify", "", "", "9"),
            rec("a", "", "proof_size", "", "", "4096"),
        ];
        let report = build_report(&rows).unwrap();

        assert_eq!(report.machines, vec!["1-a"]);
        let perf = report.get("1-a").unwrap();
        assert_eq!(perf.setup_keys, 7);
        assert_eq!(perf.prove, 120);
        assert_eq!(perf.verify, 9);
        assert_eq!(perf.proof_size, 4096);
    }

    #[test]
    fn fresh_machine_has_six_zeroed_step_buckets() {
        let rows = vec![rec("a", "", "prove", "", "", "1")];
        let report = build_report(&rows).unwrap();
        let steps = &report.get("1-a").unwrap().steps;

        assert_eq!(steps.len(), 6);
        for bucket in [
            "generate_main",
            "generate_main_ph1",
            "generate_main_ph2",
            "commit_main",
            "commit_main_ph1",
            "commit_main_ph2",
        ] {
            assert_eq!(steps.get(bucket), Some(&0));
        }
    }

    #[test]
    fn phase_splits_generate_main_accumulation() {
        let rows = vec![
            rec("a", "1", "generate_main", "", "user_time", "50"),
            rec("a", "2", "generate_main", "", "user_time", "70"),
            rec("a", "1", "generate_main", "", "user_time", "5"),
        ];
        let report = build_report(&rows).unwrap();
        let steps = &report.get("1-a").unwrap().steps;

        assert_eq!(steps["generate_main_ph1"], 55);
        assert_eq!(steps["generate_main_ph2"], 70);
        assert_eq!(steps["generate_main"], 0);
    }

    #[test]
    fn phaseless_rows_accumulate_into_the_bare_bucket() {
        let rows = vec![
            rec("a", "", "commit_main", "", "user_time", "30"),
            rec("a", "", "commit_main", "", "user_time", "12"),
        ];
        let report = build_report(&rows).unwrap();
        assert_eq!(report.get("1-a").unwrap().steps["commit_main"], 42);
    }

    #[test]
    fn quotient_steps_share_and_keep_their_buckets() {
        let rows = vec![
            rec("a", "1", "compute_quotient_values", "", "user_time", "10"),
            rec("a", "2", "compute_quotient_values", "", "user_time", "15"),
            rec("a", "", "commit_quotient", "", "user_time", "3"),
            rec("a", "", "open", "", "user_time", "8"),
            rec("a", "1", "generate_permutation", "", "user_time", "4"),
        ];
        let report = build_report(&rows).unwrap();
        let steps = &report.get("1-a").unwrap().steps;

        assert_eq!(steps["compute_quotient"], 25);
        assert_eq!(steps["commit_quotient"], 3);
        assert_eq!(steps["open"], 8);
        assert_eq!(steps["generate_permutation"], 4);
    }

    #[test]
    fn cpu_time_rows_are_ignored_by_the_step_pass() {
        let rows = vec![rec("a", "1", "generate_main", "Program", "cpu_time", "30")];
        let report = build_report(&rows).unwrap();
        assert_eq!(report.get("1-a").unwrap().steps["generate_main_ph1"], 0);
    }

    #[test]
    fn chip_rows_split_generate_main_by_phase() {
        let rows = vec![
            rec("a", "1", "generate_main", "Program", "cpu_time", "30"),
            rec("a", "2", "generate_main", "Program", "cpu_time", "40"),
            rec("a", "", "generate_main", "Program", "cpu_time", "2"),
            rec("a", "1", "generate_permutation", "Memory", "cpu_time", "11"),
            rec("a", "1", "compute_quotient_values", "Program", "cpu_time", "6"),
        ];
        let report = build_report(&rows).unwrap();
        let chips = &report.get("1-a").unwrap().chips;

        assert_eq!(chips["Program"]["generate_main_ph1"], 30);
        // Rows without a 1-phase fall into the ph2 bucket
        assert_eq!(chips["Program"]["generate_main_ph2"], 42);
        assert_eq!(chips["Program"]["compute_quotient"], 6);
        assert_eq!(chips["Memory"]["generate_permutation"], 11);
    }

    #[test]
    fn unknown_chip_step_aborts_aggregation() {
        let rows = vec![rec("a", "1", "commit_main", "Program", "cpu_time", "30")];
        let err = build_report(&rows).unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::UnexpectedStepForChip {
                step: "commit_main".to_string(),
                chip: "Program".to_string(),
            }
        );
    }

    #[test]
    fn non_numeric_perf_aborts_aggregation() {
        let rows = vec![rec("a", "", "prove", "", "", "12x0")];
        let err = build_report(&rows).unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidPerfValue { .. }));
    }

    #[test]
    fn repeated_machine_names_get_distinct_ordinal_keys() {
        let rows = vec![
            rec("a", "", "prove", "", "", "100"),
            rec("b", "", "prove", "", "", "200"),
            rec("a", "", "prove", "", "", "300"),
        ];
        let report = build_report(&rows).unwrap();

        assert_eq!(report.machines, vec!["1-a", "2-b", "3-a"]);
        assert_eq!(report.get("1-a").unwrap().prove, 100);
        assert_eq!(report.get("2-b").unwrap().prove, 200);
        assert_eq!(report.get("3-a").unwrap().prove, 300);
    }

    #[test]
    fn adjacent_rows_of_one_machine_share_an_entry() {
        let rows = vec![
            rec("a", "1", "generate_main", "", "user_time", "5"),
            rec("a", "1", "generate_main", "", "user_time", "6"),
        ];
        let report = build_report(&rows).unwrap();
        assert_eq!(report.machines, vec!["1-a"]);
        assert_eq!(report.get("1-a").unwrap().steps["generate_main_ph1"], 11);
    }

    #[test]
    fn step_total_sums_every_bucket() {
        let rows = vec![
            rec("a", "1", "generate_main", "", "user_time", "5"),
            rec("a", "", "open", "", "user_time", "7"),
        ];
        let report = build_report(&rows).unwrap();
        assert_eq!(report.get("1-a").unwrap().step_total(), 12);
    }

    #[test]
    fn full_pipeline_from_log_text() {
        let text = "\
x PERF-machine=cpu_baseline
x PERF-step=setup_keys-user_time=40
x PERF-phase=1
x PERF-step=generate_main-chunk=0-chip=Program-cpu_time=30
x PERF-step=generate_main-chunk=0-user_time=50
x PERF-phase=2
x PERF-step=generate_main-chunk=0-user_time=70
x PERF-step=prove-user_time=500
x PERF-step=proof_size-4096
x PERF-step=verify-user_time=9
";
        let records = extract_records(text).unwrap();
        let report = build_report(&records).unwrap();

        assert_eq!(report.machines, vec!["1-cpu_baseline"]);
        let perf = report.get("1-cpu_baseline").unwrap();
        assert_eq!(perf.setup_keys, 40);
        assert_eq!(perf.prove, 500);
        assert_eq!(perf.proof_size, 4096);
        assert_eq!(perf.verify, 9);
        assert_eq!(perf.steps["generate_main_ph1"], 50);
        assert_eq!(perf.steps["generate_main_ph2"], 70);
        assert_eq!(perf.chips["Program"]["generate_main_ph1"], 30);
    }

    #[test]
    fn read_records_round_trips_the_csv_table() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        let csv_path = dir.path().join("perf.csv");

        std::fs::write(
            &log_path,
            "x PERF-machine=a\nx PERF-phase=1\nx PERF-step=generate_main-chunk=0-user_time=50\n",
        )
        .unwrap();
        crate::extract::extract_to_csv(&log_path, &csv_path).unwrap();

        let records = read_records(&csv_path).unwrap();
        assert_eq!(
            records,
            vec![rec("a", "1", "generate_main", "", "user_time", "50")]
        );
    }

    #[test]
    fn missing_csv_is_a_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_records(dir.path().join("absent.csv")).is_err());
    }

    proptest! {
        // Accumulation within one (machine, step, time) group is a plain sum,
        // so row order inside the group cannot change any bucket.
        #[test]
        fn step_buckets_are_order_invariant(
            values in proptest::collection::vec((0u8..3, 0u64..10_000), 1..24)
        ) {
            let rows: Vec<PerfRecord> = values
                .iter()
                .map(|(phase, value)| {
                    let phase = match phase {
                        1 => "1",
                        2 => "2",
                        _ => "",
                    };
                    rec("a", phase, "generate_main", "", "user_time", &value.to_string())
                })
                .collect();

            let mut reversed = rows.clone();
            reversed.reverse();

            prop_assert_eq!(
                build_report(&rows).unwrap(),
                build_report(&reversed).unwrap()
            );
        }
    }
}
