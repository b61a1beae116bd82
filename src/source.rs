//! Source resolution: walking the prioritized list of candidate data files and
//! building the dataset from the first one that loads and is viable.
//!
//! Tier order: the file the operator named in config, then the known Excel
//! filenames (each tried across several sheet names), then the CSV backups
//! (each tried across encodings and delimiters), and finally the embedded
//! constant table. First acceptance wins; later candidates are never compared
//! or merged. The function cannot fail: the embedded tier always produces a
//! usable dataset.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::dataset::Dataset;
use crate::schema::{self, RawTable};
use crate::seeds;

/// External candidates with fewer data rows than this are rejected. The
/// embedded table is exempt by construction.
pub const MIN_EXTERNAL_ROWS: usize = 10;

const EXCEL_FILES: &[&str] = &[
  "tabla-chengyus-completa.xlsx",
  "tabla chengyus completa.xlsx",
  "chengyus.xlsx",
  "chengyus_data.xlsx",
  "data.xlsx",
];

const CSV_FILES: &[&str] = &[
  "tabla chengyus completa.csv",
  "chengyus_data.csv",
  "tabla-chengyus-completa.csv",
  "chengyus.csv",
];

const CSV_DELIMITERS: &[u8] = &[b',', b';', b'\t'];

fn default_sheets() -> Vec<SheetRef> {
  vec![
    SheetRef::Index(0),
    SheetRef::Name("Sheet1"),
    SheetRef::Name("tabla_chengyus_completa_con_ref"),
    SheetRef::Name("tabla-chengyus-completa"),
    SheetRef::Name("Datos"),
    SheetRef::Name("chengyus"),
    SheetRef::Name("Data"),
  ]
}

fn csv_encodings() -> Vec<&'static Encoding> {
  // UTF_8 also covers BOM-prefixed files (decode strips it); WINDOWS_1252
  // catches the latin-1 exports older spreadsheets produced.
  vec![UTF_8, WINDOWS_1252]
}

/// Sheet to try within a workbook, by position or by name.
#[derive(Clone, Debug)]
pub enum SheetRef {
  Index(usize),
  Name(&'static str),
}

impl std::fmt::Display for SheetRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SheetRef::Index(i) => write!(f, "#{}", i),
      SheetRef::Name(n) => write!(f, "{}", n),
    }
  }
}

/// How to read one candidate file, including the structural variants to try.
#[derive(Clone, Debug)]
pub enum CandidateKind {
  Excel { sheets: Vec<SheetRef> },
  Csv {
    encodings: Vec<&'static Encoding>,
    delimiters: Vec<u8>,
  },
}

/// A single candidate data source. Consumed once at startup.
#[derive(Clone, Debug)]
pub struct CandidateSource {
  pub path: PathBuf,
  pub kind: CandidateKind,
}

impl CandidateSource {
  pub fn excel(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), kind: CandidateKind::Excel { sheets: default_sheets() } }
  }

  pub fn csv(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      kind: CandidateKind::Csv {
        encodings: csv_encodings(),
        delimiters: CSV_DELIMITERS.to_vec(),
      },
    }
  }

  /// Pick Excel vs CSV handling from the file extension. Used for the
  /// operator-named candidate, whose format we do not control.
  pub fn from_extension(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let is_excel = path
      .extension()
      .and_then(|e| e.to_str())
      .map(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xls"))
      .unwrap_or(false);
    if is_excel { Self::excel(path) } else { Self::csv(path) }
  }
}

/// A priority group of candidates, tried in listed order.
#[derive(Clone, Debug)]
pub struct Tier {
  pub name: &'static str,
  pub candidates: Vec<CandidateSource>,
}

/// Which source the resolver settled on, for diagnostics. Logged at startup;
/// also surfaced by the health endpoint.
#[derive(Clone, Debug)]
pub struct LoadReport {
  pub tier: &'static str,
  pub source: String,
  pub detail: String,
  pub rows: usize,
  pub categories: usize,
  pub fields: Vec<String>,
}

/// The default tier list: operator-named file first, then Excel variants,
/// then CSV backups. The embedded tier is implicit in `resolve_tiers`.
pub fn candidate_tiers(cfg: &BotConfig) -> Vec<Tier> {
  let mut tiers = Vec::new();
  if let Some(path) = &cfg.data_path {
    tiers.push(Tier {
      name: "operator",
      candidates: vec![CandidateSource::from_extension(path)],
    });
  }
  tiers.push(Tier {
    name: "excel",
    candidates: EXCEL_FILES.iter().map(|f| CandidateSource::excel(*f)).collect(),
  });
  tiers.push(Tier {
    name: "csv",
    candidates: CSV_FILES.iter().map(|f| CandidateSource::csv(*f)).collect(),
  });
  tiers
}

/// Resolve the dataset from config. Never fails.
pub fn resolve(cfg: &BotConfig) -> (Dataset, LoadReport) {
  resolve_tiers(&candidate_tiers(cfg))
}

/// Walk the tiers and accept the first viable candidate; fall back to the
/// embedded table when every external candidate is rejected.
pub fn resolve_tiers(tiers: &[Tier]) -> (Dataset, LoadReport) {
  for tier in tiers {
    for cand in &tier.candidates {
      if !cand.path.exists() {
        continue;
      }
      debug!(target: "dataset", tier = tier.name, path = %cand.path.display(), "Trying candidate source");
      if let Some((table, detail)) = try_candidate(cand) {
        let report = LoadReport {
          tier: tier.name,
          source: cand.path.display().to_string(),
          detail,
          rows: table.row_count(),
          categories: schema::extract_categories(&table).len(),
          fields: canonical_fields_present(&table),
        };
        info!(
          target: "dataset",
          tier = report.tier,
          source = %report.source,
          detail = %report.detail,
          rows = report.rows,
          categories = report.categories,
          fields = ?report.fields,
          "Dataset loaded"
        );
        return (Dataset::from_table(&table), report);
      }
    }
  }

  warn!(target: "dataset", "No external candidate accepted; using embedded records");
  let records = seeds::embedded_records();
  let report = LoadReport {
    tier: "embedded",
    source: "embedded".to_string(),
    detail: String::new(),
    rows: records.len(),
    categories: Dataset::from_records(records.clone()).categories().len(),
    fields: schema::CANONICAL_FIELDS.iter().map(|f| f.to_string()).collect(),
  };
  (Dataset::from_records(records), report)
}

fn canonical_fields_present(table: &RawTable) -> Vec<String> {
  schema::CANONICAL_FIELDS
    .iter()
    .copied()
    .filter(|&f| table.column(f).is_some())
    .map(str::to_string)
    .collect()
}

/// Try every structural variant of one candidate file; return the first
/// normalized table that passes the viability checks, plus a human-readable
/// note of which variant worked.
fn try_candidate(cand: &CandidateSource) -> Option<(RawTable, String)> {
  match &cand.kind {
    CandidateKind::Excel { sheets } => try_excel(&cand.path, sheets),
    CandidateKind::Csv { encodings, delimiters } => try_csv(&cand.path, encodings, delimiters),
  }
}

fn accept(mut table: RawTable) -> Option<RawTable> {
  schema::normalize(&mut table);
  if table.row_count() < MIN_EXTERNAL_ROWS || !schema::is_viable(&table) {
    return None;
  }
  Some(table)
}

fn try_excel(path: &Path, sheets: &[SheetRef]) -> Option<(RawTable, String)> {
  let mut workbook = match open_workbook_auto(path) {
    Ok(wb) => wb,
    Err(e) => {
      debug!(target: "dataset", path = %path.display(), error = %e, "Workbook open failed");
      return None;
    }
  };
  let names = workbook.sheet_names().to_owned();
  for sheet in sheets {
    let name = match sheet {
      SheetRef::Index(i) => match names.get(*i) {
        Some(n) => n.clone(),
        None => continue,
      },
      SheetRef::Name(n) => {
        if !names.iter().any(|s| s == n) {
          continue;
        }
        (*n).to_string()
      }
    };
    let range = match workbook.worksheet_range(&name) {
      Ok(r) => r,
      Err(e) => {
        debug!(target: "dataset", path = %path.display(), sheet = %name, error = %e, "Sheet read failed");
        continue;
      }
    };
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
      Some(h) => h.iter().map(cell_to_string).collect(),
      None => continue,
    };
    let data: Vec<Vec<String>> = rows
      .map(|r| r.iter().map(cell_to_string).collect())
      .collect();
    if let Some(table) = accept(RawTable::new(headers, data)) {
      return Some((table, format!("sheet {}", name)));
    }
  }
  None
}

fn cell_to_string(cell: &Data) -> String {
  match cell {
    Data::Empty => String::new(),
    Data::String(s) => s.clone(),
    Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
    other => other.to_string(),
  }
}

fn try_csv(
  path: &Path,
  encodings: &[&'static Encoding],
  delimiters: &[u8],
) -> Option<(RawTable, String)> {
  let bytes = match fs::read(path) {
    Ok(b) => b,
    Err(e) => {
      debug!(target: "dataset", path = %path.display(), error = %e, "CSV read failed");
      return None;
    }
  };
  for enc in encodings {
    let (text, _, malformed) = enc.decode(&bytes);
    if malformed {
      continue;
    }
    for &delim in delimiters {
      let Some(raw) = parse_delimited(&text, delim) else { continue };
      if let Some(table) = accept(raw) {
        return Some((table, format!("{} / delimiter '{}'", enc.name(), delim as char)));
      }
    }
  }
  None
}

fn parse_delimited(text: &str, delimiter: u8) -> Option<RawTable> {
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(delimiter)
    .flexible(true)
    .from_reader(text.as_bytes());
  let headers: Vec<String> = reader
    .headers()
    .ok()?
    .iter()
    .map(|h| h.trim().to_string())
    .collect();
  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record.ok()?;
    let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
    // flexible() lets short rows through; pad so column lookups stay aligned.
    row.resize(headers.len().max(row.len()), String::new());
    rows.push(row);
  }
  Some(RawTable::new(headers, rows))
}
