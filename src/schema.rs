//! Schema normalization: mapping the many observed column spellings onto the
//! canonical field set.
//!
//! The historical spreadsheets of this dataset were edited by hand over years,
//! so the same column appears as "Pinyin", "pinyin", "PINYIN", the category
//! column as "Categoria"/"Categoría"/"tema", and so on. Rather than probing
//! raw names all over the rendering code, the aliases live in one explicit,
//! testable table here.

use crate::domain::Record;

/// Canonical column names. These are the only names the rest of the crate
/// ever looks up.
pub const TERM: &str = "term";
pub const PHONETIC: &str = "phonetic";
pub const LITERAL_TRANSLATION: &str = "literal_translation";
pub const FIGURATIVE_MEANING: &str = "figurative_meaning";
pub const EXAMPLE_PHRASE: &str = "example_phrase";
pub const LOCAL_EQUIVALENT: &str = "local_equivalent";
pub const CATEGORY: &str = "category";
pub const DIFFICULTY_LEVEL: &str = "difficulty_level";

/// All canonical names, in render order. Diagnostics report which of these a
/// loaded source actually provides.
pub const CANONICAL_FIELDS: [&str; 8] = [
  TERM,
  PHONETIC,
  LITERAL_TRANSLATION,
  FIGURATIVE_MEANING,
  EXAMPLE_PHRASE,
  LOCAL_EQUIVALENT,
  CATEGORY,
  DIFFICULTY_LEVEL,
];

/// Observed raw spellings -> canonical name. Order matters only among aliases
/// of the same canonical name: the first one present in the source wins.
const ALIASES: &[(&str, &str)] = &[
  ("Chengyu 成语", TERM),
  ("Chengyu", TERM),
  ("chengyu", TERM),
  ("CHENGYU", TERM),
  ("Pinyin", PHONETIC),
  ("pinyin", PHONETIC),
  ("PINYIN", PHONETIC),
  ("Traduccion Literal", LITERAL_TRANSLATION),
  ("Traducción Literal", LITERAL_TRANSLATION),
  ("traduccion literal", LITERAL_TRANSLATION),
  ("literal", LITERAL_TRANSLATION),
  ("Significado Figurativo", FIGURATIVE_MEANING),
  ("significado figurativo", FIGURATIVE_MEANING),
  ("Significado", FIGURATIVE_MEANING),
  ("significado", FIGURATIVE_MEANING),
  ("Frase de Ejemplo", EXAMPLE_PHRASE),
  ("frase de ejemplo", EXAMPLE_PHRASE),
  ("Ejemplo", EXAMPLE_PHRASE),
  ("ejemplo", EXAMPLE_PHRASE),
  ("frase", EXAMPLE_PHRASE),
  ("Equivalente en Venezolano", LOCAL_EQUIVALENT),
  ("equivalente en venezolano", LOCAL_EQUIVALENT),
  ("Equivalente", LOCAL_EQUIVALENT),
  ("equivalente", LOCAL_EQUIVALENT),
  ("Refrán", LOCAL_EQUIVALENT),
  ("Refran", LOCAL_EQUIVALENT),
  ("refrán", LOCAL_EQUIVALENT),
  ("refran", LOCAL_EQUIVALENT),
  ("venezolano", LOCAL_EQUIVALENT),
  ("Categoria", CATEGORY),
  ("Categoría", CATEGORY),
  ("categoria", CATEGORY),
  ("categoría", CATEGORY),
  ("category", CATEGORY),
  ("tema", CATEGORY),
  ("Nivel de Dificultad", DIFFICULTY_LEVEL),
  // Misspelled header present in one spreadsheet generation.
  ("Nivel de Dificulatad", DIFFICULTY_LEVEL),
  ("nivel de dificultad", DIFFICULTY_LEVEL),
  ("Nivel", DIFFICULTY_LEVEL),
  ("nivel", DIFFICULTY_LEVEL),
  ("HSK", DIFFICULTY_LEVEL),
  ("hsk", DIFFICULTY_LEVEL),
  ("Level", DIFFICULTY_LEVEL),
  ("level", DIFFICULTY_LEVEL),
];

/// A parsed tabular source before canonicalization: one header row plus data
/// rows. Cells are plain trimmed-on-demand strings; type interpretation
/// happens when records are extracted.
#[derive(Clone, Debug, Default)]
pub struct RawTable {
  pub headers: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

impl RawTable {
  pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
    Self { headers, rows }
  }

  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  /// Column position of a (canonical) header name, if present.
  pub fn column(&self, name: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == name)
  }

  /// Trimmed cell value at (row, column); None when blank or out of bounds.
  pub fn value(&self, row: usize, col: usize) -> Option<&str> {
    let cell = self.rows.get(row)?.get(col)?.trim();
    if cell.is_empty() { None } else { Some(cell) }
  }
}

/// Rename aliased headers to canonical names and drop rows that are blank
/// across every column.
///
/// First-writer-wins: an alias is only applied when the canonical name is not
/// already present, so a later, worse-formed duplicate column can never
/// clobber an earlier canonical one. Running this twice is a no-op.
pub fn normalize(table: &mut RawTable) {
  for &(alias, canonical) in ALIASES {
    if table.headers.iter().any(|h| h == canonical) {
      continue;
    }
    if let Some(pos) = table.headers.iter().position(|h| h == alias) {
      table.headers[pos] = canonical.to_string();
    }
  }
  table
    .rows
    .retain(|row| row.iter().any(|cell| !cell.trim().is_empty()));
}

/// Distinct non-empty category values in first-appearance order. A source
/// without a category column still browses: everything files under "General".
pub fn extract_categories(table: &RawTable) -> Vec<String> {
  let Some(col) = table.column(CATEGORY) else {
    return vec!["General".to_string()];
  };
  let mut seen = Vec::<String>::new();
  for row in 0..table.row_count() {
    if let Some(v) = table.value(row, col) {
      if !seen.iter().any(|s| s == v) {
        seen.push(v.to_string());
      }
    }
  }
  if seen.is_empty() {
    seen.push("General".to_string());
  }
  seen
}

/// Minimum schema for a source to be worth serving: it names the idiom, and
/// carries at least one of the two fields every query pattern leans on.
pub fn is_viable(table: &RawTable) -> bool {
  table.column(TERM).is_some()
    && (table.column(PHONETIC).is_some() || table.column(LOCAL_EQUIVALENT).is_some())
}

/// Extract canonical records from an already-normalized table.
pub fn to_records(table: &RawTable) -> Vec<Record> {
  let field = |row: usize, name: &str| -> Option<String> {
    table
      .column(name)
      .and_then(|col| table.value(row, col))
      .map(|s| s.to_string())
  };
  (0..table.row_count())
    .map(|row| Record {
      term: field(row, TERM),
      phonetic: field(row, PHONETIC),
      literal_translation: field(row, LITERAL_TRANSLATION),
      figurative_meaning: field(row, FIGURATIVE_MEANING),
      example_phrase: field(row, EXAMPLE_PHRASE),
      local_equivalent: field(row, LOCAL_EQUIVALENT),
      category: field(row, CATEGORY),
      difficulty_level: field(row, DIFFICULTY_LEVEL),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
      headers.iter().map(|s| s.to_string()).collect(),
      rows
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect(),
    )
  }

  #[test]
  fn aliases_rename_to_canonical() {
    let mut t = table(
      &["chengyu", "PINYIN", "Refrán", "tema", "hsk"],
      &[&["一举两得", "yi ju liang de", "dos pájaros", "Logro", "HSK6"]],
    );
    normalize(&mut t);
    assert_eq!(
      t.headers,
      vec![TERM, PHONETIC, LOCAL_EQUIVALENT, CATEGORY, DIFFICULTY_LEVEL]
    );
  }

  #[test]
  fn canonical_column_is_never_clobbered() {
    // "term" already canonical; the "Chengyu" alias column must stay as-is.
    let mut t = table(&["term", "Chengyu"], &[&["好", "bad-copy"]]);
    normalize(&mut t);
    assert_eq!(t.headers, vec!["term", "Chengyu"]);
    assert_eq!(t.value(0, 0), Some("好"));
  }

  #[test]
  fn normalization_is_idempotent() {
    let mut t = table(
      &["Chengyu", "Pinyin", "equivalente"],
      &[&["莫名其妙", "mo ming qi miao", "no tiene nombre"]],
    );
    normalize(&mut t);
    let once = t.clone();
    normalize(&mut t);
    assert_eq!(t.headers, once.headers);
    assert_eq!(t.rows, once.rows);
  }

  #[test]
  fn blank_rows_are_dropped() {
    let mut t = table(
      &["Chengyu", "Pinyin"],
      &[&["火上加油", "huo shang jia you"], &["", "  "], &["", ""]],
    );
    normalize(&mut t);
    assert_eq!(t.row_count(), 1);
  }

  #[test]
  fn categories_default_to_general() {
    let t = table(&["term", "phonetic"], &[&["好", "hao"]]);
    assert_eq!(extract_categories(&t), vec!["General"]);
  }

  #[test]
  fn categories_keep_first_appearance_order() {
    let mut t = table(
      &["Chengyu", "Categoria"],
      &[&["a", "Conflictos"], &["b", "Logro"], &["c", "Conflictos"]],
    );
    normalize(&mut t);
    assert_eq!(extract_categories(&t), vec!["Conflictos", "Logro"]);
  }

  #[test]
  fn viability_needs_term_plus_phonetic_or_equivalent() {
    let mut only_term = table(&["Chengyu"], &[&["好"]]);
    normalize(&mut only_term);
    assert!(!is_viable(&only_term));

    let mut with_pinyin = table(&["Chengyu", "Pinyin"], &[&["好", "hao"]]);
    normalize(&mut with_pinyin);
    assert!(is_viable(&with_pinyin));

    let mut with_equiv = table(&["Chengyu", "Refran"], &[&["好", "bueno"]]);
    normalize(&mut with_equiv);
    assert!(is_viable(&with_equiv));
  }
}
