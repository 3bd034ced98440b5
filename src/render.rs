use anyhow::{bail, Result};

use crate::model::{ReportRow, ReportTable};
use crate::workbook::{CellStyle, SheetNamer, WorkbookModel};

pub const REPORT_FILE_NAME: &str = "jenkins-health-report.xlsx";

const DASHBOARD_SHEET_NAME: &str = "Dashboard";
const BACK_LINK_LABEL: &str = "Back to Dashboard";

// Validated workbook ceiling. Excel tolerates more, but larger reports have
// never been exercised; refuse rather than emit an untested artifact.
const MAX_REPORT_SHEETS: usize = 828;
const MAX_DASHBOARD_ROWS: u32 = 830;

const COL_JOB_NAME: u16 = 0;
const COL_TOTAL_TESTS: u16 = 1;
const COL_DURATION: u16 = 5;
const COL_ELAPSED: u16 = 6;
const COL_BUILD_COUNT: u16 = 7;
const COL_STARTED: u16 = 9;
const COL_ENDED: u16 = 10;

/// Column headers, written one column to the right of the title cell.
const DASHBOARD_HEADERS: [&str; 11] = [
  "Total",
  "Passing",
  "Failing",
  "Skipped",
  "Duration",
  "Time Since Last Run",
  "Number Of Builds",
  "Last Successful Build",
  "Started",
  "Ended",
  "30 Day Metric",
];

#[derive(Debug, Clone, Copy)]
pub struct WorkbookLimits {
  pub sheets: usize,
  pub dashboard_rows: u32,
}

impl Default for WorkbookLimits {
  fn default() -> Self {
    Self {
      sheets: MAX_REPORT_SHEETS,
      dashboard_rows: MAX_DASHBOARD_ROWS,
    }
  }
}

impl WorkbookLimits {
  /// Largest job count that fits: one sheet and one dashboard row are spoken
  /// for by the dashboard itself and its header.
  fn max_jobs(&self) -> usize {
    let by_sheets = self.sheets.saturating_sub(1);
    let by_rows = self.dashboard_rows.saturating_sub(1) as usize;

    by_sheets.min(by_rows)
  }
}

pub struct Renderer {
  limits: WorkbookLimits,
  title: String,
}

impl Renderer {
  pub fn new(instance_label: &str) -> Self {
    Self {
      limits: WorkbookLimits::default(),
      title: format!("JENKINS HEALTH REPORT - {}", instance_label),
    }
  }

  #[cfg(any(test, feature = "testutil"))]
  pub fn with_limits(instance_label: &str, limits: WorkbookLimits) -> Self {
    Self {
      limits,
      title: format!("JENKINS HEALTH REPORT - {}", instance_label),
    }
  }

  /// Build the workbook for `table`: a dashboard plus one detail sheet per row.
  pub fn render(&self, table: &ReportTable) -> Result<WorkbookModel> {
    if table.len() > self.limits.max_jobs() {
      bail!(
        "{} jobs exceed the report capacity of {} (sheets: {}, dashboard rows: {})",
        table.len(),
        self.limits.max_jobs(),
        self.limits.sheets,
        self.limits.dashboard_rows
      );
    }

    let mut wb = WorkbookModel::new();
    let mut namer = SheetNamer::new();

    // Dashboard row 0: title in the corner, column headers to its right.
    let dashboard = wb.add_sheet(namer.claim(DASHBOARD_SHEET_NAME, 0));
    wb.write_text(dashboard, 0, 0, self.title.as_str(), CellStyle::Header);

    for (offset, label) in DASHBOARD_HEADERS.iter().enumerate() {
      wb.write_text(dashboard, 0, (offset + 1) as u16, *label, CellStyle::Header);
    }

    for row in table.rows() {
      self.write_row(&mut wb, &mut namer, dashboard, row);
    }

    wb.set_autofit(true);
    Ok(wb)
  }

  fn write_row(&self, wb: &mut WorkbookModel, namer: &mut SheetNamer, dashboard: usize, row: &ReportRow) {
    let row_index = row.row_key as u32;

    wb.write_text(dashboard, row_index, COL_JOB_NAME, row.job_name.as_str(), CellStyle::Plain);
    wb.write_number(dashboard, row_index, COL_TOTAL_TESTS, row.total_tests_or_zero(), CellStyle::Plain);
    wb.write_number(dashboard, row_index, COL_BUILD_COUNT, row.build_count, CellStyle::Plain);

    if let Some(label) = &row.duration_label {
      wb.write_text(dashboard, row_index, COL_DURATION, label.as_str(), CellStyle::Plain);
    }

    if let Some(label) = &row.elapsed_label {
      wb.write_text(dashboard, row_index, COL_ELAPSED, label.as_str(), CellStyle::Plain);
    }

    if let Some(label) = &row.start_label {
      wb.write_text(dashboard, row_index, COL_STARTED, label.as_str(), CellStyle::Plain);
    }

    if let Some(label) = &row.end_label {
      wb.write_text(dashboard, row_index, COL_ENDED, label.as_str(), CellStyle::Plain);
    }

    // Detail sheet: back-link header plus a placeholder row where build-level
    // drill-down will eventually land.
    let detail = wb.add_sheet(namer.claim(&row.job_name, row.row_key));
    debug_assert_eq!(detail, row.row_key);

    wb.write_text(detail, 0, 0, BACK_LINK_LABEL, CellStyle::Header);
    wb.touch_row(detail, 1);
  }
}
