//! Quiz engine: 4-option multiple choice with stateless verification.
//!
//! Each question carries everything needed to judge the answer inside the
//! per-option callback tokens (option position, correct position, correct row
//! id). Verification is a pure function of the incoming event; the server
//! keeps no per-user session.

use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::dataset::Dataset;
use crate::domain::{QueryError, Record};
use crate::render::PLACEHOLDER;

pub const OPTION_COUNT: usize = 4;

/// One answer button: which dataset row it stands for and the display label.
#[derive(Clone, Debug)]
pub struct QuizOption {
  pub row: usize,
  pub label: String,
}

#[derive(Clone, Debug)]
pub struct QuizQuestion {
  pub correct_row: usize,
  pub correct_pos: usize,
  pub options: Vec<QuizOption>,
}

/// Build a question: one correct record plus three distractors sampled without
/// replacement, shuffled. `label_budget` caps option labels (chars) so the
/// transport's buttons don't overflow; truncated labels get an ellipsis.
pub fn build_question(ds: &Dataset, label_budget: usize) -> Result<QuizQuestion, QueryError> {
  if ds.len() < OPTION_COUNT {
    return Err(QueryError::QuizUnavailable);
  }
  let mut rng = rand::thread_rng();

  // Four distinct rows, then shuffle; marking a uniformly random position as
  // the correct one is equivalent to picking the correct record first and
  // shuffling it among the distractors.
  let mut rows = index::sample(&mut rng, ds.len(), OPTION_COUNT).into_vec();
  rows.shuffle(&mut rng);
  let correct_pos = rng.gen_range(0..OPTION_COUNT);
  let correct_row = rows[correct_pos];

  let options = rows
    .into_iter()
    .map(|row| QuizOption {
      row,
      label: option_label(ds.get(row), label_budget),
    })
    .collect();

  Ok(QuizQuestion { correct_row, correct_pos, options })
}

/// Judge an answer event. The correct record is re-fetched from the dataset by
/// row id (the shuffled option list from question time no longer exists).
pub fn verify(
  ds: &Dataset,
  selected: usize,
  correct_pos: usize,
  correct_row: usize,
) -> Result<(bool, &Record), QueryError> {
  let record = ds.get(correct_row).ok_or(QueryError::NoDataAvailable)?;
  Ok((selected == correct_pos, record))
}

fn option_label(record: Option<&Record>, budget: usize) -> String {
  let text = record
    .and_then(|r| r.local_equivalent.as_deref())
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .unwrap_or(PLACEHOLDER);
  if text.chars().count() <= budget {
    text.to_string()
  } else {
    let cut: String = text.chars().take(budget).collect();
    format!("{}...", cut)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rec(term: &str, equivalent: &str) -> Record {
    Record {
      term: Some(term.to_string()),
      local_equivalent: Some(equivalent.to_string()),
      ..Record::default()
    }
  }

  fn dataset(n: usize) -> Dataset {
    Dataset::from_records(
      (0..n)
        .map(|i| rec(&format!("term{}", i), &format!("equiv{}", i)))
        .collect(),
    )
  }

  #[test]
  fn questions_have_four_distinct_options_and_one_correct() {
    let ds = dataset(6);
    for _ in 0..50 {
      let q = build_question(&ds, 45).unwrap();
      assert_eq!(q.options.len(), OPTION_COUNT);
      let mut rows: Vec<usize> = q.options.iter().map(|o| o.row).collect();
      rows.sort_unstable();
      rows.dedup();
      assert_eq!(rows.len(), OPTION_COUNT, "options must be pairwise distinct");
      assert!(q.correct_pos < OPTION_COUNT);
      assert_eq!(q.options[q.correct_pos].row, q.correct_row);
    }
  }

  #[test]
  fn too_small_dataset_is_rejected() {
    let ds = dataset(3);
    assert!(matches!(build_question(&ds, 45), Err(QueryError::QuizUnavailable)));
  }

  #[test]
  fn verify_truth_table() {
    let ds = dataset(6);
    let q = build_question(&ds, 45).unwrap();
    for selected in 0..OPTION_COUNT {
      let (correct, record) = verify(&ds, selected, q.correct_pos, q.correct_row).unwrap();
      assert_eq!(correct, selected == q.correct_pos);
      // The returned record is always the originally chosen correct one.
      assert_eq!(
        record.term.as_deref(),
        ds.get(q.correct_row).unwrap().term.as_deref()
      );
    }
  }

  #[test]
  fn verify_rejects_stale_row_ids() {
    let ds = dataset(4);
    assert!(verify(&ds, 0, 0, 99).is_err());
  }

  #[test]
  fn long_labels_are_truncated_with_ellipsis() {
    let long = "x".repeat(60);
    let ds = Dataset::from_records(
      (0..4)
        .map(|i| {
          if i == 0 { rec("t", &long) } else { rec(&format!("t{}", i), "corto") }
        })
        .collect(),
    );
    let q = build_question(&ds, 45).unwrap();
    for opt in &q.options {
      assert!(opt.label.chars().count() <= 45 + 3);
      if opt.row == 0 {
        assert!(opt.label.ends_with("..."));
      }
    }
  }

  #[test]
  fn missing_equivalent_labels_fall_back_to_placeholder() {
    let ds = Dataset::from_records(
      (0..4)
        .map(|i| Record { term: Some(format!("t{}", i)), ..Record::default() })
        .collect(),
    );
    let q = build_question(&ds, 45).unwrap();
    assert!(q.options.iter().all(|o| o.label == PLACEHOLDER));
  }
}
