//! Identity and error types for enrollment & authentication (spec §4.1).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    Agent(String),
    Admin,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin)
    }

    /// An agent identity may only act on its own resources; an admin may
    /// act on any (spec §4.1 "Per-request auth").
    pub fn may_act_as(&self, agent_id: &str) -> bool {
        match self {
            Identity::Admin => true,
            Identity::Agent(id) => id == agent_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("bad signature")]
    BadSignature,
    #[error("agent already registered with a different public key")]
    AlreadyRegistered,
    #[error("storage error: {0}")]
    Storage(#[from] rackwatch_storage::StorageError),
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
