// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: In-memory workbook model (sheets, sparse rows, styled cells) plus xlsx serialization
// role: rendering/sink
// inputs: Cell writes from the renderer; sheet names claimed through SheetNamer
// outputs: Inspectable WorkbookModel; .xlsx bytes or file via rust_xlsxwriter
// side_effects: save writes the workbook file
// invariants:
// - Sheet indices are the order of add_sheet calls; write_* callers pass indices returned by add_sheet
// - SheetNamer never hands out the same name twice (case-insensitive) and respects the 31-char cap
// - Serialization is deterministic: rows/cells iterate in sorted order
// errors: Sheet naming and file IO surface with context; cell writes are infallible on the model
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};

pub const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
  #[default]
  Plain,
  /// Bold Arial, horizontally centered. The one custom style the dashboard uses.
  Header,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
  Text(String),
  Int(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
  pub value: CellValue,
  pub style: CellStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
  name: String,
  rows: BTreeMap<u32, BTreeMap<u16, Cell>>,
}

#[cfg(any(test, feature = "testutil"))]
impl Sheet {
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Touched rows, including placeholder rows with no cells.
  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
    self.rows.get(&row).and_then(|cols| cols.get(&col))
  }

  pub fn text(&self, row: u32, col: u16) -> Option<&str> {
    match self.cell(row, col)?.value {
      CellValue::Text(ref s) => Some(s),
      CellValue::Int(_) => None,
    }
  }

  pub fn number(&self, row: u32, col: u16) -> Option<i64> {
    match self.cell(row, col)?.value {
      CellValue::Int(n) => Some(n),
      CellValue::Text(_) => None,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookModel {
  sheets: Vec<Sheet>,
  autofit: bool,
}

impl WorkbookModel {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a sheet and return its index.
  pub fn add_sheet(&mut self, name: impl Into<String>) -> usize {
    self.sheets.push(Sheet {
      name: name.into(),
      rows: BTreeMap::new(),
    });
    self.sheets.len() - 1
  }

  pub fn write_text(&mut self, sheet: usize, row: u32, col: u16, text: impl Into<String>, style: CellStyle) {
    self.sheets[sheet].rows.entry(row).or_default().insert(
      col,
      Cell {
        value: CellValue::Text(text.into()),
        style,
      },
    );
  }

  pub fn write_number(&mut self, sheet: usize, row: u32, col: u16, value: i64, style: CellStyle) {
    self.sheets[sheet].rows.entry(row).or_default().insert(
      col,
      Cell {
        value: CellValue::Int(value),
        style,
      },
    );
  }

  /// Materialize a row without writing any cell into it.
  pub fn touch_row(&mut self, sheet: usize, row: u32) {
    self.sheets[sheet].rows.entry(row).or_default();
  }

  /// Autosize all columns on every sheet when the workbook is serialized.
  pub fn set_autofit(&mut self, on: bool) {
    self.autofit = on;
  }

  #[cfg(any(test, feature = "testutil"))]
  pub fn sheet(&self, index: usize) -> Option<&Sheet> {
    self.sheets.get(index)
  }

  #[cfg(any(test, feature = "testutil"))]
  pub fn sheet_count(&self) -> usize {
    self.sheets.len()
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    let mut workbook = self.to_xlsx()?;
    workbook
      .save(path)
      .with_context(|| format!("writing workbook to {}", path.display()))?;
    Ok(())
  }

  #[cfg(any(test, feature = "testutil"))]
  pub fn save_to_buffer(&self) -> Result<Vec<u8>> {
    let mut workbook = self.to_xlsx()?;
    workbook.save_to_buffer().context("serializing workbook to memory")
  }

  fn to_xlsx(&self) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_font_name("Arial").set_align(FormatAlign::Center);

    for sheet in &self.sheets {
      let ws = workbook.add_worksheet();
      ws.set_name(&sheet.name).with_context(|| format!("naming sheet {:?}", sheet.name))?;

      for (row, cols) in &sheet.rows {
        for (col, cell) in cols {
          match (&cell.value, cell.style) {
            (CellValue::Text(s), CellStyle::Header) => ws.write_string_with_format(*row, *col, s.as_str(), &header)?,
            (CellValue::Text(s), CellStyle::Plain) => ws.write_string(*row, *col, s.as_str())?,
            (CellValue::Int(n), CellStyle::Header) => ws.write_number_with_format(*row, *col, *n as f64, &header)?,
            (CellValue::Int(n), CellStyle::Plain) => ws.write_number(*row, *col, *n as f64)?,
          };
        }
      }

      if self.autofit {
        ws.autofit();
      }
    }

    Ok(workbook)
  }
}

static INVALID_SHEET_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[\]:*?/\\]").unwrap());

/// Excel forbids []:*?/\ in sheet names, caps them at 31 chars, and rejects
/// apostrophes at either end.
pub fn sanitize_sheet_name(raw: &str) -> String {
  let cleaned = INVALID_SHEET_CHARS.replace_all(raw, "_");
  let trimmed = cleaned.trim().trim_matches('\'');
  let name: String = trimmed.chars().take(MAX_SHEET_NAME_LEN).collect();

  if name.is_empty() {
    "Sheet".to_string()
  } else {
    name
  }
}

/// Hands out workbook-unique sheet names (Excel compares case-insensitively).
#[derive(Debug, Default)]
pub struct SheetNamer {
  used: HashSet<String>,
}

impl SheetNamer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sanitize `raw` and de-duplicate against earlier claims; `ordinal` seeds
  /// the collision suffix, which walks upward until a free name is found.
  pub fn claim(&mut self, raw: &str, ordinal: usize) -> String {
    let base = sanitize_sheet_name(raw);

    if self.used.insert(base.to_lowercase()) {
      return base;
    }

    // A suffixed candidate can itself collide with an earlier literal claim.
    let mut attempt = ordinal;
    loop {
      let suffix = format!(" #{}", attempt);
      let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.len());
      let name = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);

      if self.used.insert(name.to_lowercase()) {
        return name;
      }

      attempt += 1;
    }
  }
}
