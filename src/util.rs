//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Uppercase a token and strip all whitespace.
/// Level comparison uses this on both sides, so "hsk 6" == "HSK6".
pub fn normalize_compact(s: &str) -> String {
  s.chars()
    .filter(|c| !c.is_whitespace())
    .collect::<String>()
    .to_uppercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn template_fills_all_keys() {
    let t = fill_template("{a} y {b}", &[("a", "uno"), ("b", "dos")]);
    assert_eq!(t, "uno y dos");
  }

  #[test]
  fn compact_form_ignores_case_and_spaces() {
    assert_eq!(normalize_compact("hsk 6"), "HSK6");
    assert_eq!(normalize_compact(" H s K6 "), "HSK6");
    assert_eq!(normalize_compact("HSK6"), "HSK6");
  }
}
