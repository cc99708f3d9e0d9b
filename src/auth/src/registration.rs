//! `Register`, `Verify`, and `Revoke` (spec §4.1 "Operations exposed").

use rackwatch_storage::Agent;

use crate::types::{AuthError, AuthResult, Identity};
use crate::verification::{canonical_registration_payload, tokens_match, verify_registration_signature};
use crate::{generate_bearer_token, AuthService};

pub struct RegisterRequest {
    pub agent_id: String,
    pub hostname: String,
    pub public_key_pem: String,
    pub nonce: String,
    pub timestamp: i64,
    pub signature_b64: String,
    pub admin_token: String,
}

const TEST_MODE_ADMIN_TOKEN: &str = "dev-admin-token";

impl AuthService {
    /// Spec §4.1 registration protocol steps 4-8.
    pub async fn register(&self, req: RegisterRequest, now: i64, remote_addr: Option<String>) -> AuthResult<String> {
        let expected_admin_token = if self.test_mode { TEST_MODE_ADMIN_TOKEN } else { &self.admin_token };
        if !tokens_match(&req.admin_token, expected_admin_token) {
            let _ = self.audit.log_authentication(None, &token_prefix(&req.admin_token), false, remote_addr);
            return Err(AuthError::Unauthenticated);
        }

        let canonical = canonical_registration_payload(
            &req.agent_id,
            &req.hostname,
            &req.public_key_pem,
            &req.nonce,
            req.timestamp,
        );
        verify_registration_signature(&req.public_key_pem, &canonical, &req.signature_b64)?;

        if let Some(existing) = self.store.get_agent(&req.agent_id).await? {
            if existing.public_key_pem != req.public_key_pem {
                return Err(AuthError::AlreadyRegistered);
            }
            return Ok(existing.bearer_token);
        }

        let bearer_token = generate_bearer_token();
        self.store
            .insert_agent(&Agent {
                agent_id: req.agent_id.clone(),
                hostname: req.hostname,
                public_key_pem: req.public_key_pem,
                bearer_token: bearer_token.clone(),
                registered_at: now,
                last_seen: now,
                revoked: false,
            })
            .await?;

        Ok(bearer_token)
    }

    /// Derives identity from a presented bearer token or admin Basic Auth
    /// credential (spec §4.1 "Verify"). Auth failures are audited by
    /// token prefix, never the full token (spec §4.1 "Failure semantics").
    pub async fn verify_bearer(&self, token: &str, remote_addr: Option<String>) -> AuthResult<Identity> {
        let expected_admin_token = if self.test_mode { TEST_MODE_ADMIN_TOKEN } else { &self.admin_token };
        if tokens_match(token, expected_admin_token) {
            return Ok(Identity::Admin);
        }

        match self.store.get_agent_by_bearer_token(token).await? {
            Some(agent) if !agent.revoked => Ok(Identity::Agent(agent.agent_id)),
            _ => {
                let _ = self.audit.log_authentication(None, &token_prefix(token), false, remote_addr);
                Err(AuthError::Unauthenticated)
            }
        }
    }

    pub fn verify_admin_basic(&self, username: &str, password: &str) -> AuthResult<Identity> {
        let expected_admin_token = if self.test_mode { TEST_MODE_ADMIN_TOKEN } else { &self.admin_token };
        if username == "admin" && tokens_match(password, expected_admin_token) {
            Ok(Identity::Admin)
        } else {
            Err(AuthError::Unauthenticated)
        }
    }

    /// Admin-only (spec §4.1 "Revoke"). Callers must check `Identity::is_admin`.
    pub async fn revoke(&self, requester: &Identity, agent_id: &str, remote_addr: Option<String>) -> AuthResult<()> {
        if !requester.is_admin() {
            return Err(AuthError::Forbidden);
        }
        self.store.revoke_agent(agent_id).await?;
        let _ = self.audit.log_admin_action("revoke_agent", agent_id, remote_addr);
        Ok(())
    }
}

fn token_prefix(token: &str) -> String {
    token.chars().take(8).collect()
}
