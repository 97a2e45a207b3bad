pub type EpicycleResult<T> = Result<T, EpicycleError>;

#[derive(thiserror::Error, Debug)]
pub enum EpicycleError {
    #[error("empty path: {0}")]
    EmptyPath(String),

    #[error("degenerate path: {0}")]
    DegeneratePath(String),

    #[error("invalid needle config: {0}")]
    InvalidNeedle(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EpicycleError {
    pub fn empty_path(msg: impl Into<String>) -> Self {
        Self::EmptyPath(msg.into())
    }

    pub fn degenerate_path(msg: impl Into<String>) -> Self {
        Self::DegeneratePath(msg.into())
    }

    pub fn invalid_needle(msg: impl Into<String>) -> Self {
        Self::InvalidNeedle(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for EpicycleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
