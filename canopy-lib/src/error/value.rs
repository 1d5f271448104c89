//! Property value errors

/// A literal that does not match its property's encoding rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected} literal: {raw:?}")]
pub struct ValueError {
    /// What the encoding rule expected (e.g. "boolean", "dimension").
    pub expected: &'static str,
    /// The offending literal.
    pub raw: String,
}

impl ValueError {
    pub fn new(expected: &'static str, raw: impl Into<String>) -> Self {
        Self {
            expected,
            raw: raw.into(),
        }
    }
}
