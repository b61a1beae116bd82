//! Message rendering: one record to user-facing Markdown, and chunking of
//! overlong replies to the transport's message-size ceiling.

use crate::domain::Record;
use crate::util::fill_template;

/// Shown for any missing or blank field. Rendering never fails on bad data.
pub const PLACEHOLDER: &str = "N/A";

/// Transport message-size ceiling (Telegram caps at 4096; keep headroom).
pub const DEFAULT_CHUNK_LIMIT: usize = 4000;

const RECORD_TEMPLATE: &str = "\
🎋 *{term}* ({phonetic})

📜 *Traducción literal:* {literal}
💡 *Significado:* {meaning}

🇻🇪 *Equivalente venezolano:*
\"_{equivalent}_\"
";

const EXAMPLE_TEMPLATE: &str = "
📝 *Ejemplo en chino:*
{example}
";

const FOOTER_TEMPLATE: &str = "
📌 *Categoría:* {category}
🏮 *Nivel HSK:* {level}
";

/// Trimmed field value, or the placeholder when missing/blank.
pub(crate) fn field(value: &Option<String>) -> &str {
  value
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .unwrap_or(PLACEHOLDER)
}

/// Fill the display template for one record. The example block is omitted
/// entirely when the field is blank, not rendered as a placeholder.
pub fn render_record(r: &Record) -> String {
  let mut out = fill_template(
    RECORD_TEMPLATE,
    &[
      ("term", field(&r.term)),
      ("phonetic", field(&r.phonetic)),
      ("literal", field(&r.literal_translation)),
      ("meaning", field(&r.figurative_meaning)),
      ("equivalent", field(&r.local_equivalent)),
    ],
  );
  if let Some(example) = r.example_phrase.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    out.push_str(&fill_template(EXAMPLE_TEMPLATE, &[("example", example)]));
  }
  out.push_str(&fill_template(
    FOOTER_TEMPLATE,
    &[
      ("category", field(&r.category)),
      ("level", field(&r.difficulty_level)),
    ],
  ));
  out
}

/// One line per match plus a trailing count, for the level listing.
pub fn render_level_listing(level: &str, records: &[&Record]) -> String {
  let mut out = format!("🎓 *Todos los Chengyus nivel {}* 🏮\n\n", level);
  for r in records {
    out.push_str(&format!(
      "• {} ({}) - [{}]\n",
      field(&r.term),
      field(&r.phonetic),
      field(&r.difficulty_level)
    ));
  }
  out.push_str(&format!("\nTotal: {} chengyus", records.len()));
  out
}

/// Split `text` into the smallest number of ordered, contiguous segments of at
/// most `limit` characters. Concatenating the segments reproduces the input
/// exactly. Splits are by char, never inside a UTF-8 sequence.
pub fn chunk(text: &str, limit: usize) -> Vec<String> {
  if limit == 0 || text.chars().count() <= limit {
    return vec![text.to_string()];
  }
  let mut out = Vec::new();
  let mut current = String::new();
  let mut count = 0usize;
  for ch in text.chars() {
    if count == limit {
      out.push(std::mem::take(&mut current));
      count = 0;
    }
    current.push(ch);
    count += 1;
  }
  if !current.is_empty() {
    out.push(current);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn full_record() -> Record {
    Record {
      term: Some("一举两得".into()),
      phonetic: Some("yi ju liang de".into()),
      literal_translation: Some("una acción dos ganancias".into()),
      figurative_meaning: Some("dos objetivos con una acción".into()),
      example_phrase: Some("真是一举两得。".into()),
      local_equivalent: Some("Matar dos pájaros de un solo tiro".into()),
      category: Some("Eficiencia y Logro".into()),
      difficulty_level: Some("HSK6".into()),
    }
  }

  #[test]
  fn full_record_renders_every_section() {
    let text = render_record(&full_record());
    assert!(text.contains("*一举两得* (yi ju liang de)"));
    assert!(text.contains("Matar dos pájaros"));
    assert!(text.contains("Ejemplo en chino"));
    assert!(text.contains("*Nivel HSK:* HSK6"));
    assert!(!text.contains(PLACEHOLDER));
  }

  #[test]
  fn missing_fields_render_as_placeholder() {
    let text = render_record(&Record { term: Some("好".into()), ..Record::default() });
    assert!(text.contains("*好* (N/A)"));
    assert!(text.contains("*Categoría:* N/A"));
  }

  #[test]
  fn blank_example_omits_the_section_entirely() {
    let mut r = full_record();
    r.example_phrase = Some("   ".into());
    let text = render_record(&r);
    assert!(!text.contains("Ejemplo en chino"));
    assert!(!text.contains("📝 *Ejemplo en chino:*\nN/A"));
  }

  #[test]
  fn level_listing_ends_with_count_line() {
    let a = full_record();
    let text = render_level_listing("HSK6", &[&a, &a]);
    assert!(text.starts_with("🎓"));
    assert_eq!(text.matches("• ").count(), 2);
    assert!(text.ends_with("Total: 2 chengyus"));
  }

  #[test]
  fn chunks_concatenate_to_the_original() {
    // Multibyte chars make sure splitting is char-based, not byte-based.
    let text = "añadir aceite al fuego 火上加油 ".repeat(40);
    let chunks = chunk(&text, 100);
    assert!(chunks.len() > 1);
    for c in &chunks {
      assert!(c.chars().count() <= 100);
    }
    assert_eq!(chunks.concat(), text);
  }

  #[test]
  fn short_text_is_a_single_chunk() {
    assert_eq!(chunk("hola", 4000), vec!["hola".to_string()]);
  }
}
