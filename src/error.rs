use thiserror::Error;

/// Everything that can go wrong before a generation run starts.
///
/// Once parameters validate, generation itself cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Unknown scale '{0}'..! (try `--list-scales`)")]
    UnknownScale(String),

    #[error("Invalid value for `{name}`: {reason}..!")]
    InvalidParameter { name: &'static str, reason: String },
}

impl GenerationError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;
