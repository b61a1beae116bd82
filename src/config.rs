//! Loading bot configuration from TOML.
//!
//! Everything has a default; a missing or broken config file degrades to the
//! built-in candidate lists and limits, it never stops startup.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize)]
pub struct BotConfig {
  /// Operator-named data file. When set, it forms the highest-priority
  /// candidate tier, ahead of the built-in filename lists.
  #[serde(default)]
  pub data_path: Option<String>,
  /// Transport message-size ceiling used when chunking long replies.
  #[serde(default = "default_chunk_limit")]
  pub chunk_limit: usize,
  /// Character budget for quiz answer button labels.
  #[serde(default = "default_label_budget")]
  pub label_budget: usize,
  /// Cap on how many category buttons one menu shows.
  #[serde(default = "default_category_menu_max")]
  pub category_menu_max: usize,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      data_path: None,
      chunk_limit: default_chunk_limit(),
      label_budget: default_label_budget(),
      category_menu_max: default_category_menu_max(),
    }
  }
}

fn default_chunk_limit() -> usize {
  crate::render::DEFAULT_CHUNK_LIMIT
}

fn default_label_budget() -> usize {
  45
}

fn default_category_menu_max() -> usize {
  20
}

/// Attempt to load `BotConfig` from BOT_CONFIG_PATH. On any parsing/IO error,
/// returns None and the caller falls back to defaults.
pub fn load_bot_config_from_env() -> Option<BotConfig> {
  let path = std::env::var("BOT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<BotConfig>(&s) {
      Ok(cfg) => {
        info!(target: "chengyus_backend", %path, "Loaded bot config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "chengyus_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "chengyus_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_defaults_for_the_rest() {
    let cfg: BotConfig = toml::from_str("data_path = \"mis-chengyus.xlsx\"").unwrap();
    assert_eq!(cfg.data_path.as_deref(), Some("mis-chengyus.xlsx"));
    assert_eq!(cfg.chunk_limit, default_chunk_limit());
    assert_eq!(cfg.category_menu_max, 20);
  }
}
