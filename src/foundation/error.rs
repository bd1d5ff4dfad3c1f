/// Result type used across the crate.
pub type GenieResult<T> = Result<T, GenieError>;

/// Error taxonomy for the geometry, capture, render and controller APIs.
#[derive(thiserror::Error, Debug)]
pub enum GenieError {
    /// Invalid configuration or tuning values.
    #[error("validation error: {0}")]
    Validation(String),

    /// The content snapshot could not be produced.
    #[error("capture error: {0}")]
    Capture(String),

    /// Warp target setup, upload, draw or readback failed.
    #[error("gpu error: {0}")]
    Gpu(String),

    /// API misuse by the caller, such as a wrong child count or an oversized mesh.
    #[error("usage error: {0}")]
    Usage(String),

    /// Config (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenieError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn gpu(msg: impl Into<String>) -> Self {
        Self::Gpu(msg.into())
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Boundary failures (capture, GPU setup) degrade to "no animation played".
    ///
    /// Usage errors are programming mistakes; the controller logs them at error level.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Usage(_))
    }
}

impl From<serde_json::Error> for GenieError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
