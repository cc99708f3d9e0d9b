//! Error taxonomy for the agent-side runtime.

#[derive(Debug, thiserror::Error)]
pub enum AgentRuntimeError {
    #[error("keystore error: {0}")]
    Keystore(String),

    #[error("registration rejected by server: {0}")]
    RegistrationRejected(String),

    #[error("server request failed after retries: {0}")]
    Transport(String),

    #[error("server returned {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("log source {source} failed: {reason}")]
    LogSource { source: String, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type AgentRuntimeResult<T> = Result<T, AgentRuntimeError>;
