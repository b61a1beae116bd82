//! Domain models used by the backend: canonical idiom records, the closed set
//! of difficulty levels, and the query error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One chengyu entry in canonical form.
///
/// Sources are messy: every field may be missing for a given row. Missing
/// fields render as a placeholder downstream, never as a failure. The `term`
/// requirement lives at the schema level (a source without a term column is
/// rejected), not per record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Record {
  #[serde(default)] pub term: Option<String>,
  #[serde(default)] pub phonetic: Option<String>,
  #[serde(default)] pub literal_translation: Option<String>,
  #[serde(default)] pub figurative_meaning: Option<String>,
  #[serde(default)] pub example_phrase: Option<String>,
  #[serde(default)] pub local_equivalent: Option<String>,
  #[serde(default)] pub category: Option<String>,
  #[serde(default)] pub difficulty_level: Option<String>,
}

/// Difficulty tiers accepted by level filtering. Matching happens on the
/// compact uppercase form, so "hsk 6" and "HSK6" are the same token.
pub const VALID_LEVELS: [&str; 4] = ["HSK6", "HSK7", "HSK8", "HSK9"];

/// Everything that can go wrong answering a user command. All of these map to
/// a short corrective message at the command layer; none is fatal.
#[derive(Debug, Error)]
pub enum QueryError {
  #[error("no data available")]
  NoDataAvailable,
  #[error("day out of range, valid range is 1-{max}")]
  DayOutOfRange { max: usize },
  #[error("no records in category '{0}'")]
  EmptyCategory(String),
  #[error("invalid level token '{0}'")]
  InvalidLevel(String),
  #[error("not enough records to build a quiz")]
  QuizUnavailable,
}
