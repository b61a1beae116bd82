//! The in-memory dataset: an ordered, immutable-after-load table of canonical
//! records plus a derived category index.
//!
//! Row position + 1 is the "day number" used by indexed lookup, so order is
//! load order and is never touched after construction. Rebuilding only happens
//! by re-running the whole load pipeline.

use std::collections::HashMap;

use crate::domain::Record;
use crate::schema::{self, RawTable};

/// Bucket used for records whose category cell is blank or whose source has
/// no category column at all. Keeps the category menu from ever being empty.
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Clone, Debug, Default)]
pub struct Dataset {
  records: Vec<Record>,
  categories: Vec<String>,
  by_category: HashMap<String, Vec<usize>>,
}

impl Dataset {
  /// Build from canonical records (embedded fallback and tests come in here).
  pub fn from_records(records: Vec<Record>) -> Self {
    let mut categories = Vec::<String>::new();
    let mut by_category = HashMap::<String, Vec<usize>>::new();
    for (row, rec) in records.iter().enumerate() {
      let key = rec
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();
      if !categories.iter().any(|c| *c == key) {
        categories.push(key.clone());
      }
      by_category.entry(key).or_default().push(row);
    }
    if categories.is_empty() {
      categories.push(DEFAULT_CATEGORY.to_string());
    }
    Self { records, categories, by_category }
  }

  /// Build from a normalized raw table.
  pub fn from_table(table: &RawTable) -> Self {
    Self::from_records(schema::to_records(table))
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Record at 0-based row position.
  pub fn get(&self, row: usize) -> Option<&Record> {
    self.records.get(row)
  }

  pub fn records(&self) -> &[Record] {
    &self.records
  }

  /// Distinct categories in first-appearance order.
  pub fn categories(&self) -> &[String] {
    &self.categories
  }

  /// Row positions filed under a category; empty slice for unknown names.
  pub fn rows_in_category(&self, name: &str) -> &[usize] {
    self
      .by_category
      .get(name)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rec(term: &str, category: Option<&str>) -> Record {
    Record {
      term: Some(term.to_string()),
      category: category.map(|c| c.to_string()),
      ..Record::default()
    }
  }

  #[test]
  fn category_index_groups_rows_in_order() {
    let ds = Dataset::from_records(vec![
      rec("A", Some("X")),
      rec("B", Some("X")),
      rec("C", Some("Y")),
    ]);
    assert_eq!(ds.categories(), ["X", "Y"]);
    assert_eq!(ds.rows_in_category("X"), [0, 1]);
    assert_eq!(ds.rows_in_category("Y"), [2]);
    assert_eq!(ds.rows_in_category("Z"), [] as [usize; 0]);
  }

  #[test]
  fn blank_category_files_under_general() {
    let ds = Dataset::from_records(vec![rec("A", None), rec("B", Some("  "))]);
    assert_eq!(ds.categories(), [DEFAULT_CATEGORY]);
    assert_eq!(ds.rows_in_category(DEFAULT_CATEGORY), [0, 1]);
  }
}
