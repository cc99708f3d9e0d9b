//! Enrollment & authentication (spec §4.1).
//!
//! Gates first contact behind an admin token, binds an `agent_id` to the
//! public key it proves possession of, and issues the bearer token every
//! later request authenticates with.

pub mod registration;
pub mod metrics;
pub mod types;
pub mod verification;

pub use types::{AuthError, AuthResult, Identity};

use rand::RngCore;
use rackwatch_core::audit_logging::AuditLogger;
use rackwatch_storage::StorageHandle;

/// Everything the HTTP layer needs to authenticate and enroll agents,
/// bundled so handlers take one argument instead of three (spec §9
/// "pass config/audit-log singletons explicitly via context").
#[derive(Clone)]
pub struct AuthService {
    pub store: StorageHandle,
    pub audit: AuditLogger,
    pub admin_token: String,
    pub test_mode: bool,
}

impl AuthService {
    pub fn new(store: StorageHandle, audit: AuditLogger, admin_token: String, test_mode: bool) -> Self {
        Self { store, audit, admin_token, test_mode }
    }
}

/// `>= 128 bits of entropy, URL-safe` (spec §4.1 step 7).
pub fn generate_bearer_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}
