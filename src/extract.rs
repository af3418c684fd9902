/// Performance Log Extraction
///
/// This module scans raw proving-pipeline log output for tagged performance
/// lines and normalizes them into flat tabular records. Scope entries
/// (`machine=`, `phase=`) update the running scan context without producing a
/// record; terminal measurement entries (`step=`) emit one record each, in log
/// order. The resulting table is written as CSV with a fixed seven-column
/// header so aggregation and re-plotting never require re-parsing the log.
///
/// The log format is machine-generated and trusted: any entry that does not
/// match its expected shape aborts the whole extraction with
/// [`ExtractError::MalformedLine`].

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

/// Sentinel substring marking a performance line
pub const PERF_MARKER: &str = "PERF";

/// Lines carrying this marker are excluded from extraction
pub const IGNORE_MARKER: &str = "preprocessed";

/// One normalized measurement row, in CSV column order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfRecord {
    pub machine: String,
    pub chunk: String,
    pub phase: String,
    pub step: String,
    pub chip: String,
    pub time: String,
    pub perf: String,
}

/// Fatal extraction failures
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// A participating line's entry sequence does not match any expected
    /// transition shape
    MalformedLine { token: String, reason: String },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::MalformedLine { token, reason } => {
                write!(f, "malformed performance line `{}`: {}", token, reason)
            }
        }
    }
}

impl Error for ExtractError {}

/// Mutable scan state threaded through the line fold
///
/// All fields are strings, mirroring the tabular record. Scope-opening
/// entries fully reset every finer-grained field, so no stale context
/// survives a `machine=` or `phase=` boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanContext {
    pub machine: String,
    pub chunk: String,
    pub phase: String,
    pub step: String,
    pub chip: String,
    pub time: String,
    pub perf: String,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one performance token to the context
    ///
    /// Returns `Ok(Some(record))` when the token is a terminal measurement,
    /// `Ok(None)` for scope-only tokens, and an error for any token that
    /// violates the expected entry shapes.
    pub fn apply(&mut self, token: &str) -> Result<Option<PerfRecord>, ExtractError> {
        // The segment carrying the sentinel prefix is discarded; what remains
        // is the ordered entry sequence.
        let entries: Vec<&str> = token.split('-').skip(1).collect();
        let first = entry_at(token, &entries, 0)?;

        match entry_key(first) {
            "machine" => {
                self.machine = entry_value(token, first)?.to_string();
                self.chunk.clear();
                self.phase.clear();
                self.step.clear();
                self.chip.clear();
                self.time.clear();
                self.perf.clear();
                Ok(None)
            }
            "phase" => {
                self.phase = entry_value(token, first)?.to_string();
                self.chunk.clear();
                self.step.clear();
                self.chip.clear();
                self.time.clear();
                self.perf.clear();
                Ok(None)
            }
            "step" => {
                self.step = entry_value(token, first)?.to_string();
                match self.step.as_str() {
                    "verify" | "prove" | "setup_keys" => {
                        self.chunk.clear();
                        self.phase.clear();
                        self.chip.clear();
                        self.time.clear();
                        let second = entry_at(token, &entries, 1)?;
                        self.perf = entry_value(token, second)?.to_string();
                        Ok(Some(self.snapshot()))
                    }
                    "proof_size" => {
                        self.chunk.clear();
                        self.phase.clear();
                        self.chip.clear();
                        self.time.clear();
                        // The size entry carries no key, keep the raw token
                        self.perf = entry_at(token, &entries, 1)?.to_string();
                        Ok(Some(self.snapshot()))
                    }
                    _ => {
                        // Chunked step: chunk entry is required, then either a
                        // per-chip cpu_time or a per-chunk user_time
                        let second = entry_at(token, &entries, 1)?;
                        expect_key(token, second, "chunk")?;
                        self.chunk = entry_value(token, second)?.to_string();

                        let third = entry_at(token, &entries, 2)?;
                        if entry_key(third) == "chip" {
                            self.chip = entry_value(token, third)?.to_string();
                            let fourth = entry_at(token, &entries, 3)?;
                            expect_key(token, fourth, "cpu_time")?;
                            self.time = "cpu_time".to_string();
                            self.perf = entry_value(token, fourth)?.to_string();
                        } else {
                            expect_key(token, third, "user_time")?;
                            self.chip.clear();
                            self.time = "user_time".to_string();
                            self.perf = entry_value(token, third)?.to_string();
                        }
                        Ok(Some(self.snapshot()))
                    }
                }
            }
            other => Err(ExtractError::MalformedLine {
                token: token.to_string(),
                reason: format!("expected `machine`, `phase` or `step`, found `{}`", other),
            }),
        }
    }

    fn snapshot(&self) -> PerfRecord {
        PerfRecord {
            machine: self.machine.clone(),
            chunk: self.chunk.clone(),
            phase: self.phase.clone(),
            step: self.step.clone(),
            chip: self.chip.clone(),
            time: self.time.clone(),
            perf: self.perf.clone(),
        }
    }
}

fn entry_key(entry: &str) -> &str {
    match entry.split_once('=') {
        Some((key, _)) => key,
        None => entry,
    }
}

fn entry_value<'a>(token: &str, entry: &'a str) -> Result<&'a str, ExtractError> {
    entry
        .split_once('=')
        .map(|(_, value)| value)
        .ok_or_else(|| ExtractError::MalformedLine {
            token: token.to_string(),
            reason: format!("entry `{}` is missing a value", entry),
        })
}

fn expect_key(token: &str, entry: &str, key: &str) -> Result<(), ExtractError> {
    if entry_key(entry) == key {
        Ok(())
    } else {
        Err(ExtractError::MalformedLine {
            token: token.to_string(),
            reason: format!("expected `{}` entry, found `{}`", key, entry),
        })
    }
}

fn entry_at<'a>(token: &str, entries: &[&'a str], index: usize) -> Result<&'a str, ExtractError> {
    entries
        .get(index)
        .copied()
        .ok_or_else(|| ExtractError::MalformedLine {
            token: token.to_string(),
            reason: format!("missing entry at position {}", index),
        })
}

/// Select the performance tokens of a log blob
///
/// A line participates iff it contains the sentinel marker and not the ignore
/// marker; only its final whitespace-delimited token is parsed.
pub fn perf_tokens(log_text: &str) -> Vec<&str> {
    log_text
        .lines()
        .filter(|line| line.contains(PERF_MARKER) && !line.contains(IGNORE_MARKER))
        .filter_map(|line| line.split_whitespace().last())
        .collect()
}

/// Extract the ordered record sequence from a complete log blob
pub fn extract_records(log_text: &str) -> Result<Vec<PerfRecord>, ExtractError> {
    let mut context = ScanContext::new();
    let mut records = Vec::new();

    for token in perf_tokens(log_text) {
        if let Some(record) = context.apply(token)? {
            records.push(record);
        }
    }

    Ok(records)
}

/// Read a log file and write the extracted records as a CSV table
///
/// Returns the number of emitted records. The header row is derived from the
/// record field order: `machine,chunk,phase,step,chip,time,perf`.
pub fn extract_to_csv<P: AsRef<Path>, Q: AsRef<Path>>(
    in_path: P,
    out_path: Q,
) -> Result<usize, Box<dyn Error>> {
    let content = fs::read_to_string(in_path)?;
    let records = extract_records(&content)?;

    let mut writer = csv::Writer::from_path(out_path)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(records.len())
}
