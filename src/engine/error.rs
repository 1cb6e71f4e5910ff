use thiserror::Error;

/// The content generator could not produce a response.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("request to content generator failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("content generator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("content generator returned no completion")]
    EmptyCompletion,
    #[error("content generator unavailable: {0}")]
    Unavailable(String),
}

/// A generator payload did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("field `{field}` is {problem}")]
    Field {
        field: &'static str,
        problem: String,
    },
    #[error("`text` is empty")]
    EmptyText,
    #[error("expected 2 to 4 options, got {0}")]
    OptionCount(usize),
    #[error("option {0} is empty")]
    EmptyOption(usize),
    #[error("unknown stat `{0}`")]
    UnknownStat(String),
    #[error("invalid value for stat `{key}`: {reason}")]
    StatValue { key: String, reason: String },
    #[error("payload is tagged `{found}` but a {expected} was requested")]
    KindMismatch {
        expected: &'static str,
        found: String,
    },
}

/// Why a turn ended without an outcome.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Generation(#[from] GenerationFailure),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("player input closed")]
    InputClosed,
}
