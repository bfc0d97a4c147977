use thiserror::Error;

/// Failures while building or driving an animation scene.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid store config: {0}")]
    InvalidStore(&'static str),
    #[error("invalid force params: {0}")]
    InvalidForces(&'static str),
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("frame scheduler failed: {0}")]
    Scheduler(String),
}

/// Failures talking to the chat or contact relay.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RelayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("relay returned status {status}")]
    Status { status: u16, body: String },
    #[error("could not decode relay response: {0}")]
    Decode(String),
    #[error("{0}")]
    Invalid(&'static str),
}

impl RelayError {
    /// The relay's own `error` text, when a failed response carried one.
    pub fn relay_message(&self) -> Option<String> {
        match self {
            RelayError::Status { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()?
                .get("error")?
                .as_str()
                .map(str::to_string),
            _ => None,
        }
    }
}
