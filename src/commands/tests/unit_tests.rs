//! Cross-module command-plane coverage: enqueue an unrecognized payload
//! and confirm it survives enqueue, only failing at execution time on
//! the agent (spec §4.6).

use rackwatch_commands::CommandService;
use rackwatch_core::wire::CommandPayload;
use rackwatch_storage::{Agent, Store};

#[tokio::test]
async fn unrecognized_payload_is_accepted_at_enqueue_time() {
    let store = Store::open_in_memory().unwrap();
    store
        .insert_agent(&Agent {
            agent_id: "host01".to_string(),
            hostname: "rack3-host01".to_string(),
            public_key_pem: "pk".to_string(),
            bearer_token: "tok".to_string(),
            registered_at: 0,
            last_seen: 0,
            revoked: false,
        })
        .await
        .unwrap();

    let service = CommandService::new(store);
    let payload = CommandPayload::Other {
        command_type: "turbo_encabulate".to_string(),
        payload: serde_json::json!({"grammeters": 6}),
    };
    let command_id = service.enqueue("host01", payload, 0).await.unwrap();

    let pending = service.poll_pending("host01", 0).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].command_id, command_id);
    assert_eq!(pending[0].command.command_type(), "turbo_encabulate");
}
