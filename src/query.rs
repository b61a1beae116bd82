//! Query engine: the read patterns served over the immutable dataset.
//!
//! All operations are pure reads. Randomness comes from the thread RNG; no
//! state is kept between calls.

use rand::seq::SliceRandom;

use crate::dataset::Dataset;
use crate::domain::{QueryError, Record, VALID_LEVELS};
use crate::util::normalize_compact;

/// Uniform pick over all rows.
pub fn random_record(ds: &Dataset) -> Result<&Record, QueryError> {
  let mut rng = rand::thread_rng();
  ds.records()
    .choose(&mut rng)
    .ok_or(QueryError::NoDataAvailable)
}

/// 1-based positional lookup ("chengyu of day n").
pub fn by_day(ds: &Dataset, day: usize) -> Result<&Record, QueryError> {
  if ds.is_empty() {
    return Err(QueryError::NoDataAvailable);
  }
  if day < 1 || day > ds.len() {
    return Err(QueryError::DayOutOfRange { max: ds.len() });
  }
  Ok(&ds.records()[day - 1])
}

/// Uniform pick among the rows filed under `name`.
pub fn by_category<'a>(ds: &'a Dataset, name: &str) -> Result<&'a Record, QueryError> {
  let mut rng = rand::thread_rng();
  ds.rows_in_category(name)
    .choose(&mut rng)
    .and_then(|&row| ds.get(row))
    .ok_or_else(|| QueryError::EmptyCategory(name.to_string()))
}

/// Every record matching the level token, in load order.
///
/// Policy note: the level filter deliberately lists all matches (the caller
/// appends a count line and chunks the reply) instead of picking one at
/// random. Both sides of the comparison are uppercased and whitespace-stripped
/// at comparison time, so "hsk 6" matches a stored " HSK6".
pub fn by_level<'a>(ds: &'a Dataset, token: &str) -> Result<Vec<&'a Record>, QueryError> {
  let wanted = normalize_compact(token);
  if !VALID_LEVELS.contains(&wanted.as_str()) {
    return Err(QueryError::InvalidLevel(token.to_string()));
  }
  Ok(
    ds.records()
      .iter()
      .filter(|r| {
        r.difficulty_level
          .as_deref()
          .map(|l| normalize_compact(l) == wanted)
          .unwrap_or(false)
      })
      .collect(),
  )
}
