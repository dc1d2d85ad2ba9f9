pub type NocturneResult<T> = Result<T, NocturneError>;

#[derive(thiserror::Error, Debug)]
pub enum NocturneError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A drawing surface could not be built. Fatal for the mount that hit it.
    #[error("surface error: {0}")]
    Surface(String),

    /// The sketch runtime failed to load, or loaded without exposing its handle.
    #[error("load error: {0}")]
    Load(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NocturneError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for NocturneError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
