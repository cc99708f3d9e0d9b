//! Cross-module integration tests for the storage crate: a single
//! ingestion-like flow through series, points, agents, commands, and the
//! retention sweep together.

use rackwatch_core::labels::LabelSet;
use rackwatch_storage::{Agent, Command, CommandStatus, Store, ValueKind};

fn seeded_store() -> Store {
    Store::open_in_memory().unwrap()
}

#[tokio::test]
async fn full_ingestion_and_retention_round_trip() {
    let store = seeded_store();
    store
        .insert_agent(&Agent {
            agent_id: "host01".to_string(),
            hostname: "host01.rack3".to_string(),
            public_key_pem: "pk".to_string(),
            bearer_token: "tok".to_string(),
            registered_at: 0,
            last_seen: 0,
            revoked: false,
        })
        .await
        .unwrap();

    let labels = LabelSet::from_pairs([("sensor", "CPU Temp")]);
    let (series, created) = store
        .find_or_create_series("host01", "temperature_celsius", &labels, ValueKind::Float, 1_000)
        .await
        .unwrap();
    assert!(created);

    store.insert_point(series.series_id, ValueKind::Float, 1_000, 42.5).await.unwrap();
    store.insert_point(series.series_id, ValueKind::Float, 1_060, 43.0).await.unwrap();

    let stats_before = store.stats().await.unwrap();
    assert_eq!(stats_before.point_count, 2);
    assert_eq!(stats_before.series_count, 1);

    let report = store.sweep_retention(100_000_000, 1, 1).await.unwrap();
    assert_eq!(report.points_deleted, 2);

    let stats_after = store.stats().await.unwrap();
    assert_eq!(stats_after.point_count, 0);
}

#[tokio::test]
async fn command_lifecycle_end_to_end() {
    let store = seeded_store();
    store
        .insert_agent(&Agent {
            agent_id: "host01".to_string(),
            hostname: "h".to_string(),
            public_key_pem: "pk".to_string(),
            bearer_token: "tok".to_string(),
            registered_at: 0,
            last_seen: 0,
            revoked: false,
        })
        .await
        .unwrap();

    store
        .insert_command(&Command {
            command_id: "cmd1".to_string(),
            agent_id: "host01".to_string(),
            payload_json: r#"{"type":"reboot","payload":{"delay_sec":0}}"#.to_string(),
            status: CommandStatus::Pending,
            created_at: 0,
            ttl_sec: 300,
            result_json: None,
            error: None,
        })
        .await
        .unwrap();

    let delivered = store.fetch_and_deliver_pending("host01", 10, 10).await.unwrap();
    assert_eq!(delivered.len(), 1);

    store
        .transition_command("cmd1", CommandStatus::Executing, None, None)
        .await
        .unwrap();
    store
        .transition_command("cmd1", CommandStatus::Completed, Some("{\"ok\":true}".to_string()), None)
        .await
        .unwrap();

    let command = store.get_command("cmd1").await.unwrap();
    assert_eq!(command.status, CommandStatus::Completed);
    assert_eq!(command.result_json.as_deref(), Some("{\"ok\":true}"));
}
