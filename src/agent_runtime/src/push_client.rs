//! HTTPS client for the agent → server surface (spec §6.1). Retries
//! transient failures with [`Backoff`]; a `4xx` response is never retried
//! since retrying won't change the outcome.

use rackwatch_auth::verification::canonical_registration_payload;
use rackwatch_core::wire::{
    CommandResultRequest, IngestResult, LogBatch, MetricBatch, PendingCommand, RegisterRequest, RegisterResponse,
    VerifyResponse,
};

use crate::backoff::Backoff;
use crate::keystore::Keystore;
use crate::types::{AgentRuntimeError, AgentRuntimeResult};

const MAX_ATTEMPTS: u32 = 6;

pub struct PushClient {
    http: reqwest::Client,
    server_url: String,
}

impl PushClient {
    pub fn new(server_url: &str, insecure_skip_verify: bool) -> Self {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_skip_verify)
            .build()
            .expect("reqwest client builds with static config");
        Self { http, server_url: server_url.trim_end_matches('/').to_string() }
    }

    /// Spec §4.1 steps 2-3: sign the canonical payload, then POST it along
    /// with the admin token.
    pub async fn register(
        &self,
        agent_id: &str,
        hostname: &str,
        admin_token: &str,
        nonce: &str,
        timestamp: i64,
        keystore: &Keystore,
    ) -> AgentRuntimeResult<RegisterResponse> {
        let canonical = canonical_registration_payload(agent_id, hostname, keystore.public_key_pem(), nonce, timestamp);
        let signature = keystore.sign(&canonical);

        let request = RegisterRequest {
            agent_id: agent_id.to_string(),
            hostname: hostname.to_string(),
            public_key: keystore.public_key_pem().to_string(),
            nonce: nonce.to_string(),
            timestamp,
            signature,
            admin_token: admin_token.to_string(),
        };

        self.post_with_retry("/api/clients/register", None, &request).await
    }

    pub async fn verify(&self, bearer_token: &str) -> AgentRuntimeResult<VerifyResponse> {
        self.get_with_retry("/api/client/verify", bearer_token).await
    }

    pub async fn push_metrics(&self, bearer_token: &str, batch: &MetricBatch) -> AgentRuntimeResult<IngestResult> {
        self.post_with_retry("/api/metrics", Some(bearer_token), batch).await
    }

    pub async fn push_logs(&self, bearer_token: &str, batch: &LogBatch) -> AgentRuntimeResult<()> {
        self.post_with_retry::<_, serde_json::Value>("/api/logs", Some(bearer_token), batch).await?;
        Ok(())
    }

    pub async fn poll_commands(&self, bearer_token: &str, agent_id: &str) -> AgentRuntimeResult<Vec<PendingCommand>> {
        self.get_with_retry(&format!("/api/commands/{agent_id}"), bearer_token).await
    }

    pub async fn submit_result(&self, bearer_token: &str, result: &CommandResultRequest) -> AgentRuntimeResult<()> {
        self.post_with_retry::<_, serde_json::Value>("/api/command-results", Some(bearer_token), result).await?;
        Ok(())
    }

    async fn post_with_retry<B: serde::Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        bearer_token: Option<&str>,
        body: &B,
    ) -> AgentRuntimeResult<R> {
        let mut backoff = Backoff::new();
        let mut last_err = None;

        for attempt in 0..MAX_ATTEMPTS {
            let mut req = self.http.post(format!("{}{}", self.server_url, path)).json(body);
            if let Some(token) = bearer_token {
                req = req.bearer_auth(token);
            }

            match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    crate::metrics::record_push_attempt(endpoint_label(path), "ok");
                    return resp.json::<R>().await.map_err(|e| AgentRuntimeError::Transport(e.to_string()));
                }
                Ok(resp) if resp.status().is_client_error() => {
                    crate::metrics::record_push_attempt(endpoint_label(path), "rejected");
                    let status = resp.status().as_u16();
                    let text = resp.text().await.unwrap_or_default();
                    return Err(AgentRuntimeError::ServerError { status, body: text });
                }
                Ok(resp) => {
                    crate::metrics::record_push_attempt(endpoint_label(path), "server_error");
                    last_err = Some(format!("{}", resp.status()));
                }
                Err(e) => {
                    crate::metrics::record_push_attempt(endpoint_label(path), "transport_error");
                    last_err = Some(e.to_string());
                }
            }

            if attempt + 1 < MAX_ATTEMPTS {
                tokio::time::sleep(backoff.next_delay()).await;
            }
        }

        Err(AgentRuntimeError::Transport(last_err.unwrap_or_else(|| "exhausted retries".to_string())))
    }

    async fn get_with_retry<R: serde::de::DeserializeOwned>(&self, path: &str, bearer_token: &str) -> AgentRuntimeResult<R> {
        let mut backoff = Backoff::new();
        let mut last_err = None;

        for attempt in 0..MAX_ATTEMPTS {
            let req = self.http.get(format!("{}{}", self.server_url, path)).bearer_auth(bearer_token);
            match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    crate::metrics::record_push_attempt(endpoint_label(path), "ok");
                    return resp.json::<R>().await.map_err(|e| AgentRuntimeError::Transport(e.to_string()));
                }
                Ok(resp) if resp.status().is_client_error() => {
                    crate::metrics::record_push_attempt(endpoint_label(path), "rejected");
                    let status = resp.status().as_u16();
                    let text = resp.text().await.unwrap_or_default();
                    return Err(AgentRuntimeError::ServerError { status, body: text });
                }
                Ok(resp) => last_err = Some(format!("{}", resp.status())),
                Err(e) => last_err = Some(e.to_string()),
            }

            if attempt + 1 < MAX_ATTEMPTS {
                tokio::time::sleep(backoff.next_delay()).await;
            }
        }

        Err(AgentRuntimeError::Transport(last_err.unwrap_or_else(|| "exhausted retries".to_string())))
    }
}

fn endpoint_label(path: &str) -> &'static str {
    if path.starts_with("/api/clients/register") {
        "register"
    } else if path.starts_with("/api/client/verify") {
        "verify"
    } else if path.starts_with("/api/metrics") {
        "metrics"
    } else if path.starts_with("/api/logs") {
        "logs"
    } else if path.starts_with("/api/commands/") {
        "commands_poll"
    } else if path.starts_with("/api/command-results") {
        "command_results"
    } else {
        "other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_labels_cover_every_agent_route() {
        assert_eq!(endpoint_label("/api/clients/register"), "register");
        assert_eq!(endpoint_label("/api/metrics"), "metrics");
        assert_eq!(endpoint_label("/api/commands/host01"), "commands_poll");
    }
}
