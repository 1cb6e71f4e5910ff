use serde_json::{Map, Value};

use crate::engine::error::SchemaError;
use crate::model::stats::{StatKey, StatPatch};
use crate::model::turn::{Outcome, Situation};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// Parse a situation payload: `{ text, options: [2..=4 strings] }`.
pub fn parse_situation(raw: &str) -> Result<Situation, SchemaError> {
    let object = decode_object(raw)?;
    check_kind_tag(&object, &["situation"], "situation")?;

    let text = required_text(&object)?;

    let options = match object.get("options") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(SchemaError::Field {
                field: "options",
                problem: format!("not an array ({})", other),
            })
        }
        None => {
            return Err(SchemaError::Field {
                field: "options",
                problem: "missing".into(),
            })
        }
    };

    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
        return Err(SchemaError::OptionCount(options.len()));
    }

    let mut parsed = Vec::with_capacity(options.len());
    for (i, item) in options.iter().enumerate() {
        let Some(option) = item.as_str() else {
            return Err(SchemaError::Field {
                field: "options",
                problem: format!("holding a non-string entry ({})", item),
            });
        };
        let option = option.trim();
        if option.is_empty() {
            return Err(SchemaError::EmptyOption(i + 1));
        }
        parsed.push(option.to_string());
    }

    Ok(Situation {
        text,
        options: parsed,
    })
}

/// Parse an outcome payload: `{ text, stats: { statName: value }, achievement? }`.
pub fn parse_outcome(raw: &str) -> Result<Outcome, SchemaError> {
    let object = decode_object(raw)?;
    check_kind_tag(&object, &["event", "outcome"], "outcome")?;

    let text = required_text(&object)?;

    let stats = match object.get("stats") {
        Some(Value::Object(stats)) => stats,
        Some(other) => {
            return Err(SchemaError::Field {
                field: "stats",
                problem: format!("not an object ({})", other),
            })
        }
        None => {
            return Err(SchemaError::Field {
                field: "stats",
                problem: "missing".into(),
            })
        }
    };

    let mut patch = StatPatch::default();
    for (name, value) in stats {
        let key = StatKey::from_name(name)
            .ok_or_else(|| SchemaError::UnknownStat(name.clone()))?;
        patch.set_json(key, value)?;
    }

    let achievement = match object.get("achievement") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(other) => {
            return Err(SchemaError::Field {
                field: "achievement",
                problem: format!("not a string ({})", other),
            })
        }
    };

    Ok(Outcome {
        text,
        stats: patch,
        achievement,
    })
}

/// Drops one surrounding Markdown code fence, if the whole payload is fenced.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Skip the info string (```json)
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

fn decode_object(raw: &str) -> Result<Map<String, Value>, SchemaError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| SchemaError::InvalidJson(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(SchemaError::NotAnObject);
    };
    Ok(object)
}

fn check_kind_tag(
    object: &Map<String, Value>,
    accepted: &[&str],
    expected: &'static str,
) -> Result<(), SchemaError> {
    match object.get("type") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(tag)) if accepted.contains(&tag.as_str()) => Ok(()),
        Some(Value::String(tag)) => Err(SchemaError::KindMismatch {
            expected,
            found: tag.clone(),
        }),
        Some(other) => Err(SchemaError::Field {
            field: "type",
            problem: format!("not a string ({})", other),
        }),
    }
}

fn required_text(object: &Map<String, Value>) -> Result<String, SchemaError> {
    match object.get("text") {
        Some(Value::String(text)) if text.trim().is_empty() => Err(SchemaError::EmptyText),
        Some(Value::String(text)) => Ok(text.trim().to_string()),
        Some(other) => Err(SchemaError::Field {
            field: "text",
            problem: format!("not a string ({})", other),
        }),
        None => Err(SchemaError::Field {
            field: "text",
            problem: "missing".into(),
        }),
    }
}
