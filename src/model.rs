// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the report data model: per-job snapshots in, ordered report rows out
// role: model/types
// outputs: BuildRef (wire-shaped) and JobSnapshot inputs, ReportRow/ReportTable for the renderer
// invariants:
// - ReportTable row keys are contiguous 1..=N in insertion order
// - ReportTable has no mutators; it is built once by the aggregator and read-only afterwards
// - total_tests None means "no test report", distinct from a genuine zero
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

/// Reference to one execution of a job. Field names match the Jenkins JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BuildRef {
  pub number: i64,
  #[serde(default)]
  pub url: String,
}

/// Everything the collector learned about one job. Read-only to the core.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct JobSnapshot {
  pub name: String,
  pub last_build_number: i64,
  /// Normalized most-recent-first by the collector.
  #[serde(default)]
  pub builds: Vec<BuildRef>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_run_start_ms: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_run_duration_ms: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub total_tests: Option<i64>,
}

/// One dashboard line. Labels are None when the job has never run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
  pub row_key: usize,
  pub job_name: String,
  pub build_count: i64,
  pub duration_label: Option<String>,
  pub elapsed_label: Option<String>,
  pub start_label: Option<String>,
  pub end_label: Option<String>,
  pub total_tests: Option<i64>,
}

impl ReportRow {
  /// Compatibility default: the artifact shows 0 for a job without a test report.
  pub fn total_tests_or_zero(&self) -> i64 {
    self.total_tests.unwrap_or(0)
  }
}

/// Ordered rows keyed 1..=N. Write-once: only the aggregator constructs one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
  rows: Vec<ReportRow>,
}

impl ReportTable {
  pub fn new(rows: Vec<ReportRow>) -> Self {
    for (i, row) in rows.iter().enumerate() {
      debug_assert_eq!(row.row_key, i + 1, "row keys must be contiguous from 1");
    }
    Self { rows }
  }

  pub fn empty() -> Self {
    Self::default()
  }

  pub fn rows(&self) -> &[ReportRow] {
    &self.rows
  }

  #[cfg(any(test, feature = "testutil"))]
  pub fn get(&self, row_key: usize) -> Option<&ReportRow> {
    row_key.checked_sub(1).and_then(|i| self.rows.get(i))
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }
}
