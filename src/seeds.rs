//! Seed data: the embedded fallback table.
//!
//! If every external candidate source fails to load, the resolver builds the
//! dataset from these records, so the bot stays useful (if repetitive) with no
//! files on disk at all. The embedded table is exempt from the minimum-row
//! check applied to external sources.

use crate::domain::Record;

fn rec(
  term: &str,
  phonetic: &str,
  literal: &str,
  meaning: &str,
  equivalent: &str,
  category: &str,
  level: &str,
  example: &str,
) -> Record {
  Record {
    term: Some(term.into()),
    phonetic: Some(phonetic.into()),
    literal_translation: Some(literal.into()),
    figurative_meaning: Some(meaning.into()),
    local_equivalent: Some(equivalent.into()),
    category: Some(category.into()),
    difficulty_level: Some(level.into()),
    example_phrase: Some(example.into()),
  }
}

/// Minimal set of built-in chengyus that guarantee the bot answers something
/// even without any external data file.
pub fn embedded_records() -> Vec<Record> {
  vec![
    rec(
      "莫名其妙",
      "mo ming qi miao",
      "sin nombre su misterio",
      "algo inexplicable sin razón aparente",
      "¡Esto no tiene nombre!",
      "Confusión y Misterio",
      "HSK6",
      "他的行为莫名其妙，让大家都很困惑。",
    ),
    rec(
      "一举两得",
      "yi ju liang de",
      "una acción dos ganancias",
      "lograr dos objetivos con una sola acción",
      "Matar dos pájaros de un solo tiro",
      "Eficiencia y Logro",
      "HSK6",
      "学习中文既能提高语言能力，又能了解文化，真是一举两得。",
    ),
    rec(
      "火上加油",
      "huo shang jia you",
      "añadir aceite al fuego",
      "empeorar una situación",
      "Echar leña al fuego",
      "Conflictos",
      "HSK7",
      "他本来就很生气，你这样说话是火上加油。",
    ),
  ]
}
