//! Public protocol structs for the HTTP endpoints (serde ready), plus the
//! callback-token format round-tripped through UI buttons.
//!
//! Tokens are the only state that survives between a question and its answer:
//! a compact discriminator-tagged string whose separator never appears in the
//! encoded values (they are all integers).

use serde::{Deserialize, Serialize};

use crate::render;

pub const TOKEN_SEPARATOR: char = '_';
const CATEGORY_TAG: &str = "cat";
const ANSWER_TAG: &str = "ans";

/// Decoded button identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackToken {
    /// Category menu pick: index into the dataset's ordered category list.
    Category { index: usize },
    /// Quiz answer: this option's shuffled position, the correct position,
    /// and the correct record's row id.
    Answer { chosen: usize, correct: usize, row: usize },
}

impl CallbackToken {
    pub fn encode(&self) -> String {
        let s = TOKEN_SEPARATOR;
        match self {
            CallbackToken::Category { index } => format!("{}{}{}", CATEGORY_TAG, s, index),
            CallbackToken::Answer { chosen, correct, row } => {
                format!("{}{}{}{}{}{}{}", ANSWER_TAG, s, chosen, s, correct, s, row)
            }
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        let mut parts = token.split(TOKEN_SEPARATOR);
        let decoded = match parts.next()? {
            CATEGORY_TAG => CallbackToken::Category { index: parts.next()?.parse().ok()? },
            ANSWER_TAG => CallbackToken::Answer {
                chosen: parts.next()?.parse().ok()?,
                correct: parts.next()?.parse().ok()?,
                row: parts.next()?.parse().ok()?,
            },
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(decoded)
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct CommandIn {
    pub command: String,
    #[serde(default)]
    pub arg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackIn {
    pub token: String,
}

/// One inline button: display label plus the callback token it round-trips.
#[derive(Clone, Debug, Serialize)]
pub struct Button {
    pub label: String,
    pub token: String,
}

/// One outbound reply: ordered text chunks (each within the transport's size
/// ceiling) and optional buttons attached to the last chunk.
#[derive(Debug, Serialize)]
pub struct Reply {
    pub chunks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

impl Reply {
    pub fn text(text: impl Into<String>, chunk_limit: usize) -> Self {
        Self { chunks: render::chunk(&text.into(), chunk_limit), buttons: Vec::new() }
    }

    pub fn with_buttons(text: impl Into<String>, chunk_limit: usize, buttons: Vec<Button>) -> Self {
        Self { chunks: render::chunk(&text.into(), chunk_limit), buttons }
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub rows: usize,
    pub categories: usize,
    pub source: String,
}
