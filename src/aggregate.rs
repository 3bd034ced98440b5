// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fold job snapshots into the ordered report table with derived duration/elapsed/clock labels
// role: aggregation
// inputs: JobSnapshots from the collector; AggregateContext (exclusions, timezone, injected now)
// outputs: ReportTable with 1-based contiguous row keys
// side_effects: stderr diagnostics ([report] per-job lines when verbose, [jenkins] on listing failure)
// invariants:
// - Row keys are assigned after exclusion filtering, so they stay contiguous
// - Missing inputs map to absent labels, never to placeholder text
// - The end label exists only when both start and duration are known
// errors: Listing failure degrades to an empty table; aggregation itself never fails
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use crate::jenkins::{self, JenkinsApi};
use crate::model::{JobSnapshot, ReportRow, ReportTable};
use crate::timefmt::{self, TzChoice};

pub struct AggregateContext<'a> {
  pub excluded: &'a BTreeSet<String>,
  pub tz: TzChoice,
  /// Epoch milliseconds the elapsed column is measured against.
  pub now_ms: i64,
  pub verbose: bool,
}

/// Collect snapshots from the server and aggregate them. A failed listing is
/// reported and yields an empty table so the run still produces a workbook.
pub fn collect_and_aggregate(api: &dyn JenkinsApi, ctx: &AggregateContext) -> ReportTable {
  match jenkins::collect_snapshots(api) {
    Ok(snapshots) => aggregate(&snapshots, ctx),
    Err(err) => {
      eprintln!("[jenkins] no jobs to report on: {:#}", err);
      ReportTable::empty()
    }
  }
}

pub fn aggregate(snapshots: &[JobSnapshot], ctx: &AggregateContext) -> ReportTable {
  let mut rows = Vec::with_capacity(snapshots.len());

  for snap in snapshots {
    if ctx.excluded.contains(&snap.name) {
      continue;
    }

    rows.push(build_row(rows.len() + 1, snap, ctx));
  }

  ReportTable::new(rows)
}

fn build_row(row_key: usize, snap: &JobSnapshot, ctx: &AggregateContext) -> ReportRow {
  if ctx.verbose {
    eprintln!(
      "[report] job {}: last build {}, {} fetched builds",
      snap.name,
      snap.last_build_number,
      snap.builds.len()
    );
  }

  let duration_label = snap.last_run_duration_ms.map(|ms| format!("{}ms", ms));
  let elapsed_label = snap
    .last_run_start_ms
    .map(|start| timefmt::elapsed_since(ctx.now_ms, start));
  let start_label = snap.last_run_start_ms.map(|start| timefmt::clock_label(start, ctx.tz));

  // The end label needs both pieces; a start without a duration stays blank.
  let end_label = match (snap.last_run_start_ms, snap.last_run_duration_ms) {
    (Some(start), Some(duration)) => Some(timefmt::end_clock_label(start, duration, ctx.tz)),
    _ => None,
  };

  ReportRow {
    row_key,
    job_name: snap.name.clone(),
    // "Number Of Builds" has always carried the most recent build's ordinal
    // rather than a count; downstream consumers reconcile against that.
    build_count: snap.last_build_number,
    duration_label,
    elapsed_label,
    start_label,
    end_label,
    total_tests: snap.total_tests,
  }
}
