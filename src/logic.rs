//! Command dispatch shared by whatever transport delivers user events.
//!
//! Handlers here are transport-agnostic: they take a command name (or a
//! callback token) plus the shared state and return a `Reply` of text chunks
//! and optional buttons. Invalid input always becomes a short corrective
//! message, never an error that escapes to the transport.

use tracing::{info, instrument, warn};

use crate::domain::{QueryError, VALID_LEVELS};
use crate::protocol::{Button, CallbackToken, Reply};
use crate::query;
use crate::quiz;
use crate::render;
use crate::state::AppState;
use crate::util::normalize_compact;

const WELCOME: &str = "\
🇨🇳 *Bot de Chengyus Chino-Venezolanos* 🇻🇪

¡Aprende expresiones idiomáticas chinas con sus equivalentes en refranes venezolanos!

*Comandos disponibles:*
/chengyu - Obtén un chengyu aleatorio
/dia [n] - Chengyu específico por día
/categorias - Explora por categorías
/quiz - Test interactivo de práctica
/hsk [HSK6/HSK7/HSK8/HSK9] - Filtrar por nivel
/ayuda - Muestra esta ayuda

¡Empieza tu aprendizaje cultural ahora! 🎓";

const HELP: &str = "\
🇨🇳 *Ayuda - Bot de Chengyus* 🇻🇪

*Comandos:*
/start - Mensaje de bienvenida
/chengyu - Chengyu aleatorio
/dia [n] - Chengyu por número
/categorias - Explorar categorías
/hsk [HSK6-9] - Filtrar por nivel
/quiz - Quiz interactivo
/ayuda - Mostrar esta ayuda

*Ejemplos:*
`/dia 15` - Chengyu del día 15
`/hsk HSK7` - Chengyus nivel HSK7

Los chengyus son expresiones idiomáticas chinas de 4 caracteres con gran significado cultural.

¡Disfruta aprendiendo! 🎓";

const BAD_CALLBACK: &str = "❌ Error al procesar la respuesta.";

fn error_message(err: &QueryError) -> String {
  match err {
    QueryError::NoDataAvailable => {
      "❌ Servicio temporalmente no disponible. Intenta más tarde.".to_string()
    }
    QueryError::DayOutOfRange { max } => {
      format!("⚠️ El día debe estar entre 1 y {}", max)
    }
    QueryError::EmptyCategory(_) => "❌ No hay chengyus en esa categoría.".to_string(),
    QueryError::InvalidLevel(_) => {
      format!("❌ Niveles válidos: {}", VALID_LEVELS.join(", "))
    }
    QueryError::QuizUnavailable => {
      "❌ Quiz temporalmente no disponible. Intenta más tarde.".to_string()
    }
  }
}

/// Dispatch one named command. Unknown names get a usage pointer.
#[instrument(level = "info", skip(state, arg))]
pub fn handle_command(state: &AppState, command: &str, arg: Option<&str>) -> Reply {
  let limit = state.config.chunk_limit;
  match command {
    "start" => Reply::text(WELCOME, limit),
    "ayuda" | "help" => Reply::text(HELP, limit),
    "chengyu" => match query::random_record(&state.dataset) {
      Ok(r) => {
        info!(target: "commands", "Random chengyu served");
        Reply::text(render::render_record(r), limit)
      }
      Err(e) => Reply::text(error_message(&e), limit),
    },
    "dia" => day_command(state, arg),
    "categorias" => categories_command(state),
    "hsk" => level_command(state, arg),
    "quiz" => quiz_command(state),
    other => {
      warn!(target: "commands", command = other, "Unknown command");
      Reply::text("❓ Comando desconocido. Usa /ayuda para ver los comandos.", limit)
    }
  }
}

fn day_command(state: &AppState, arg: Option<&str>) -> Reply {
  let limit = state.config.chunk_limit;
  if state.dataset.is_empty() {
    return Reply::text(error_message(&QueryError::NoDataAvailable), limit);
  }
  let usage = format!("❌ Uso correcto: /dia [número 1-{}]", state.dataset.len());
  let Some(day) = arg.and_then(|a| a.trim().parse::<usize>().ok()) else {
    return Reply::text(usage, limit);
  };
  match query::by_day(&state.dataset, day) {
    Ok(r) => {
      info!(target: "commands", day, "Day lookup served");
      Reply::text(render::render_record(r), limit)
    }
    Err(e) => Reply::text(error_message(&e), limit),
  }
}

fn categories_command(state: &AppState) -> Reply {
  let limit = state.config.chunk_limit;
  let buttons: Vec<Button> = state
    .dataset
    .categories()
    .iter()
    .take(state.config.category_menu_max)
    .enumerate()
    .map(|(index, cat)| Button {
      label: cat.clone(),
      token: CallbackToken::Category { index }.encode(),
    })
    .collect();
  info!(target: "commands", shown = buttons.len(), "Category menu served");
  Reply::with_buttons(
    "📚 *Categorías disponibles:*\nSelecciona una categoría:",
    limit,
    buttons,
  )
}

fn level_command(state: &AppState, arg: Option<&str>) -> Reply {
  let limit = state.config.chunk_limit;
  if state.dataset.is_empty() {
    return Reply::text(error_message(&QueryError::NoDataAvailable), limit);
  }
  let Some(token) = arg.map(str::trim).filter(|a| !a.is_empty()) else {
    return Reply::text(
      format!("ℹ️ Niveles disponibles: {}\nEjemplo: /hsk HSK7", VALID_LEVELS.join(", ")),
      limit,
    );
  };
  match query::by_level(&state.dataset, token) {
    Ok(matches) if matches.is_empty() => Reply::text(
      format!("❌ No hay chengyus de nivel {}.", normalize_compact(token)),
      limit,
    ),
    Ok(matches) => {
      info!(target: "commands", level = %normalize_compact(token), count = matches.len(), "Level listing served");
      Reply::text(
        render::render_level_listing(&normalize_compact(token), &matches),
        limit,
      )
    }
    Err(e) => Reply::text(error_message(&e), limit),
  }
}

fn quiz_command(state: &AppState) -> Reply {
  let limit = state.config.chunk_limit;
  let question = match quiz::build_question(&state.dataset, state.config.label_budget) {
    Ok(q) => q,
    Err(e) => return Reply::text(error_message(&e), limit),
  };
  let buttons: Vec<Button> = question
    .options
    .iter()
    .enumerate()
    .map(|(pos, opt)| Button {
      label: opt.label.clone(),
      token: CallbackToken::Answer {
        chosen: pos,
        correct: question.correct_pos,
        row: question.correct_row,
      }
      .encode(),
    })
    .collect();
  // Prompt shows the correct record; re-fetch it by row id.
  let prompt = match state.dataset.get(question.correct_row) {
    Some(r) => format!(
      "❓ *Quiz:* ¿Cuál es el equivalente venezolano de:\n\n*{}* ({})?",
      render::field(&r.term),
      render::field(&r.phonetic)
    ),
    None => return Reply::text(error_message(&QueryError::QuizUnavailable), limit),
  };
  info!(target: "commands", correct_row = question.correct_row, "Quiz question served");
  Reply::with_buttons(prompt, limit, buttons)
}

/// Dispatch one button event (category pick or quiz answer).
#[instrument(level = "info", skip(state))]
pub fn handle_callback(state: &AppState, token: &str) -> Reply {
  let limit = state.config.chunk_limit;
  match CallbackToken::parse(token) {
    Some(CallbackToken::Category { index }) => {
      let Some(category) = state.dataset.categories().get(index).cloned() else {
        return Reply::text("❌ Categoría no válida.", limit);
      };
      match query::by_category(&state.dataset, &category) {
        Ok(r) => {
          info!(target: "commands", %category, "Category pick served");
          Reply::text(
            format!("📖 *Categoría: {}*\n\n{}", category, render::render_record(r)),
            limit,
          )
        }
        Err(e) => Reply::text(error_message(&e), limit),
      }
    }
    Some(CallbackToken::Answer { chosen, correct, row }) => {
      match quiz::verify(&state.dataset, chosen, correct, row) {
        Ok((is_correct, record)) => {
          info!(target: "commands", chosen, correct, row, is_correct, "Quiz answer verified");
          let prefix = if is_correct { "✅ ¡Correcto! " } else { "❌ Incorrecto. " };
          Reply::text(
            format!(
              "{}La respuesta correcta es:\n{}",
              prefix,
              render::render_record(record)
            ),
            limit,
          )
        }
        Err(_) => Reply::text(BAD_CALLBACK, limit),
      }
    }
    None => {
      warn!(target: "commands", token, "Malformed callback token");
      Reply::text(BAD_CALLBACK, limit)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::BotConfig;
  use crate::dataset::Dataset;
  use crate::domain::Record;
  use crate::source::LoadReport;

  fn rec(term: &str, category: &str) -> Record {
    Record {
      term: Some(term.to_string()),
      phonetic: Some(format!("py-{}", term)),
      local_equivalent: Some(format!("equiv-{}", term)),
      category: Some(category.to_string()),
      ..Record::default()
    }
  }

  fn state_with(records: Vec<Record>) -> AppState {
    let dataset = Dataset::from_records(records);
    let report = LoadReport {
      tier: "embedded",
      source: "test".into(),
      detail: String::new(),
      rows: dataset.len(),
      categories: dataset.categories().len(),
      fields: vec![],
    };
    AppState::from_parts(dataset, BotConfig::default(), report)
  }

  fn abc_state() -> AppState {
    state_with(vec![rec("A", "X"), rec("B", "X"), rec("C", "Y")])
  }

  #[test]
  fn day_lookup_returns_the_second_row() {
    let state = abc_state();
    let reply = handle_command(&state, "dia", Some("2"));
    assert!(reply.chunks[0].contains("*B*"));
  }

  #[test]
  fn day_without_argument_shows_usage_with_bounds() {
    let state = abc_state();
    let reply = handle_command(&state, "dia", None);
    assert_eq!(reply.chunks[0], "❌ Uso correcto: /dia [número 1-3]");
    let reply = handle_command(&state, "dia", Some("9"));
    assert_eq!(reply.chunks[0], "⚠️ El día debe estar entre 1 y 3");
  }

  #[test]
  fn category_menu_lists_distinct_categories_in_order() {
    let state = abc_state();
    let reply = handle_command(&state, "categorias", None);
    let labels: Vec<&str> = reply.buttons.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["X", "Y"]);
    assert_eq!(reply.buttons[0].token, "cat_0");
  }

  #[test]
  fn category_callback_picks_within_that_category() {
    let state = abc_state();
    let reply = handle_callback(&state, "cat_1");
    assert!(reply.chunks[0].contains("*Categoría: Y*"));
    assert!(reply.chunks[0].contains("*C*"));
  }

  #[test]
  fn out_of_range_category_index_is_rejected() {
    let state = abc_state();
    let reply = handle_callback(&state, "cat_9");
    assert_eq!(reply.chunks[0], "❌ Categoría no válida.");
  }

  #[test]
  fn quiz_round_trip_through_tokens() {
    let state = state_with(vec![
      rec("A", "X"),
      rec("B", "X"),
      rec("C", "Y"),
      rec("D", "Y"),
      rec("E", "Z"),
    ]);
    let question = handle_command(&state, "quiz", None);
    assert_eq!(question.buttons.len(), 4);
    assert!(question.chunks[0].starts_with("❓ *Quiz:*"));

    // Answer every button; exactly one must verify as correct.
    let mut correct_replies = 0;
    for button in &question.buttons {
      let reply = handle_callback(&state, &button.token);
      if reply.chunks[0].starts_with("✅ ¡Correcto!") {
        correct_replies += 1;
      } else {
        assert!(reply.chunks[0].starts_with("❌ Incorrecto."));
      }
      assert!(reply.chunks[0].contains("La respuesta correcta es:"));
    }
    assert_eq!(correct_replies, 1);
  }

  #[test]
  fn quiz_needs_at_least_four_rows() {
    let state = abc_state();
    let reply = handle_command(&state, "quiz", None);
    assert_eq!(reply.chunks[0], "❌ Quiz temporalmente no disponible. Intenta más tarde.");
  }

  #[test]
  fn malformed_tokens_get_a_corrective_message() {
    let state = abc_state();
    for bad in ["nope", "ans_1", "cat_x"] {
      let reply = handle_callback(&state, bad);
      assert_eq!(reply.chunks[0], BAD_CALLBACK);
    }
  }

  #[test]
  fn unknown_command_points_at_help() {
    let state = abc_state();
    let reply = handle_command(&state, "banana", None);
    assert!(reply.chunks[0].contains("/ayuda"));
  }

  #[test]
  fn hsk_without_argument_lists_levels() {
    let state = abc_state();
    let reply = handle_command(&state, "hsk", None);
    assert!(reply.chunks[0].contains("HSK6, HSK7, HSK8, HSK9"));
  }
}
