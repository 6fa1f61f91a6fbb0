//! Integration tests for the sync engine against the mock client.
//!
//! Timer tests run on a paused clock, so intervals elapse instantly.

use std::sync::Arc;
use std::time::Duration;

use carsync_core::{
    Error, FetchOutcome, MockRemoteClient, SyncEngine, SyncState, SyncStatus, VehicleCommand,
    VehicleSnapshot,
};

fn snapshot(plate: &str, indoor: f64, outdoor: f64) -> VehicleSnapshot {
    VehicleSnapshot::builder(plate)
        .indoor_temp(indoor)
        .outdoor_temp(outdoor)
        .owner("John Smith")
        .last_service("2024-01-15")
        .build()
}

fn two_car_client() -> Arc<MockRemoteClient> {
    Arc::new(
        MockRemoteClient::builder()
            .snapshot(snapshot("AAA-111", 21.0, 12.0))
            .snapshot(snapshot("BBB-222", 18.0, 4.0))
            .build(),
    )
}

#[tokio::test]
async fn test_fetch_never_ends_loading() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());

    for plate in ["AAA-111", "UNKNOWN", "BBB-222"] {
        engine.fetch(plate).await.unwrap();
        let status = engine.state().status;
        assert!(
            matches!(status, SyncStatus::Ready | SyncStatus::Error),
            "{plate} ended in {status}"
        );
    }
    assert_eq!(client.read_count(), 3);
}

#[tokio::test]
async fn test_subscriber_sees_loading_then_ready() {
    let client = two_car_client();
    client
        .set_plate_latency("AAA-111", Duration::from_millis(20))
        .await;
    let engine = SyncEngine::new(client.clone());
    let mut updates = engine.subscribe();

    let watcher = async {
        let mut seen = Vec::new();
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().status;
            seen.push(status);
            if status != SyncStatus::Loading {
                break;
            }
        }
        seen
    };

    let (outcome, seen) = tokio::join!(engine.fetch("AAA-111"), watcher);
    assert_eq!(outcome.unwrap(), FetchOutcome::Updated);
    assert_eq!(seen, vec![SyncStatus::Loading, SyncStatus::Ready]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_response_is_discarded() {
    let client = two_car_client();
    client
        .set_plate_latency("AAA-111", Duration::from_millis(200))
        .await;
    client
        .set_plate_latency("BBB-222", Duration::from_millis(50))
        .await;
    let engine = SyncEngine::new(client.clone());

    let (first, second) = tokio::join!(engine.fetch("AAA-111"), engine.fetch("BBB-222"));

    assert_eq!(first.unwrap(), FetchOutcome::Superseded);
    assert_eq!(second.unwrap(), FetchOutcome::Updated);

    let state = engine.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(state.plate, "BBB-222");
    assert_eq!(
        state.snapshot.map(|s| s.license_plate),
        Some("BBB-222".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_fast_earlier_response_is_also_superseded() {
    let client = two_car_client();
    client
        .set_plate_latency("AAA-111", Duration::from_millis(10))
        .await;
    client
        .set_plate_latency("BBB-222", Duration::from_millis(100))
        .await;
    let engine = SyncEngine::new(client.clone());

    let (first, second) = tokio::join!(engine.fetch("AAA-111"), engine.fetch("BBB-222"));

    assert_eq!(first.unwrap(), FetchOutcome::Superseded);
    assert_eq!(second.unwrap(), FetchOutcome::Updated);
    assert_eq!(engine.state().plate, "BBB-222");
}

#[tokio::test]
async fn test_failure_for_other_plate_clears_snapshot() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();

    assert_eq!(
        engine.fetch("NOPE-000").await.unwrap(),
        FetchOutcome::Failed
    );

    let state = engine.state();
    assert_eq!(state.status, SyncStatus::Error);
    assert_eq!(state.plate, "NOPE-000");
    assert!(state.snapshot.is_none());
    assert!(state.series.is_empty());
    assert!(!state.is_stale());

    // Nothing left to refresh
    assert_eq!(engine.refresh().await, None);
}

#[tokio::test]
async fn test_vehicle_removed_keeps_stale_snapshot() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();

    client.remove_snapshot("AAA-111").await;
    assert_eq!(engine.refresh().await, Some(FetchOutcome::Failed));

    let state = engine.state();
    assert!(state.is_stale());
    assert_eq!(
        state.error_message.as_deref(),
        Some("No vehicle found for license plate 'AAA-111'. Check the plate and try again.")
    );
}

#[tokio::test]
async fn test_recovers_after_stale_refresh() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();

    client.fail_next(1);
    assert_eq!(engine.refresh().await, Some(FetchOutcome::Failed));
    assert!(engine.state().is_stale());

    client.set_snapshot(snapshot("AAA-111", 23.5, 13.0)).await;
    assert_eq!(engine.refresh().await, Some(FetchOutcome::Updated));

    let state = engine.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert!(state.error_message.is_none());
    assert_eq!(state.snapshot.map(|s| s.indoor_temp), Some(23.5));
}

#[tokio::test(start_paused = true)]
async fn test_auto_refresh_fires_each_interval() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();
    assert_eq!(client.read_count(), 1);

    assert!(engine.start_auto_refresh(Duration::from_secs(30)));
    assert!(engine.is_auto_refreshing());

    tokio::time::sleep(Duration::from_secs(95)).await;
    assert_eq!(client.read_count(), 4);

    engine.stop_auto_refresh();
    assert!(!engine.is_auto_refreshing());

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(client.read_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_auto_refresh_does_not_fire_immediately() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();

    assert!(engine.start_auto_refresh(Duration::from_secs(30)));
    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(client.read_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restarting_auto_refresh_keeps_one_timer() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();

    assert!(engine.start_auto_refresh(Duration::from_secs(30)));
    assert!(engine.start_auto_refresh(Duration::from_secs(30)));

    tokio::time::sleep(Duration::from_secs(95)).await;
    assert_eq!(client.read_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_auto_refresh_uses_configured_interval() {
    let client = two_car_client();
    let options = carsync_core::SyncOptions::with_interval(Duration::from_secs(10));
    let engine = SyncEngine::with_options(client.clone(), options).unwrap();
    engine.fetch("AAA-111").await.unwrap();

    assert!(engine.start_default_auto_refresh());
    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(client.read_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_auto_refresh_keeps_stale_data_on_failure() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();
    let before = engine.state();

    client.set_should_fail(true, Some("service unavailable")).await;
    assert!(engine.start_auto_refresh(Duration::from_secs(30)));
    tokio::time::sleep(Duration::from_secs(65)).await;

    let state = engine.state();
    assert!(state.is_stale());
    assert_eq!(state.snapshot, before.snapshot);
    assert_eq!(state.series, before.series);
    // Stale data does not stop the timer
    assert!(engine.is_auto_refreshing());
    assert_eq!(client.read_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stopping_timer_lets_started_refresh_finish() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();

    client
        .set_plate_latency("AAA-111", Duration::from_secs(5))
        .await;
    assert!(engine.start_auto_refresh(Duration::from_secs(30)));
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(engine.state().is_loading());

    engine.stop_auto_refresh();
    assert!(!engine.is_auto_refreshing());

    tokio::time::sleep(Duration::from_secs(600)).await;
    let state = engine.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(state.plate, "AAA-111");
    // The in-flight refresh completed and nothing fired afterwards
    assert_eq!(client.read_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_tick_during_plate_switch_is_skipped() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();
    assert!(engine.start_auto_refresh(Duration::from_secs(30)));

    tokio::time::sleep(Duration::from_secs(25)).await;
    client
        .set_plate_latency("BBB-222", Duration::from_secs(10))
        .await;

    // The tick at 30s lands while this fetch is in flight
    let outcome = engine.fetch("BBB-222").await.unwrap();
    assert_eq!(outcome, FetchOutcome::Updated);

    let state = engine.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(state.plate, "BBB-222");
    assert_eq!(
        state.snapshot.map(|s| s.license_plate),
        Some("BBB-222".to_string())
    );
    assert_eq!(client.read_count(), 2);

    // Later ticks refresh the new plate
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(client.read_count(), 3);
    assert_eq!(engine.state().plate, "BBB-222");
    assert!(engine.is_auto_refreshing());
}

#[tokio::test(start_paused = true)]
async fn test_refresh_during_plate_switch_targets_new_plate() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();
    client
        .set_plate_latency("BBB-222", Duration::from_secs(10))
        .await;

    let (fetched, refreshed) = tokio::join!(engine.fetch("BBB-222"), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        engine.refresh().await
    });

    assert_eq!(fetched.unwrap(), FetchOutcome::Superseded);
    assert_eq!(refreshed, Some(FetchOutcome::Updated));
    assert_eq!(engine.state().plate, "BBB-222");
}

#[tokio::test(start_paused = true)]
async fn test_auto_refresh_stops_when_snapshot_is_lost() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();
    assert!(engine.start_auto_refresh(Duration::from_secs(30)));

    engine.fetch("NOPE-000").await.unwrap();
    assert!(engine.state().snapshot.is_none());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!engine.is_auto_refreshing());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(client.read_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_discards_in_flight_response() {
    let client = two_car_client();
    client
        .set_plate_latency("AAA-111", Duration::from_millis(100))
        .await;
    let engine = SyncEngine::new(client.clone());

    let (outcome, ()) = tokio::join!(engine.fetch("AAA-111"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        engine.shutdown();
    });

    assert_eq!(outcome.unwrap(), FetchOutcome::Superseded);
    let state = engine.state();
    assert!(state.snapshot.is_none());
    assert_eq!(state.status, SyncStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_timer_refresh_keeps_snapshot_ready() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();
    let before = engine.state();

    client
        .set_plate_latency("AAA-111", Duration::from_secs(5))
        .await;
    assert!(engine.start_auto_refresh(Duration::from_secs(30)));
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(engine.state().is_loading());

    engine.shutdown();
    let state = engine.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(state.snapshot, before.snapshot);

    // The discarded response does not change anything when it lands
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(engine.state(), state);
    assert_eq!(client.read_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_fetch_does_not_leave_loading() {
    let client = two_car_client();
    client
        .set_plate_latency("BBB-222", Duration::from_secs(10))
        .await;
    let engine = SyncEngine::new(client.clone());

    let timed_out = tokio::time::timeout(Duration::from_secs(1), engine.fetch("BBB-222")).await;
    assert!(timed_out.is_err());
    assert_eq!(engine.state().status, SyncStatus::Idle);

    engine.fetch("AAA-111").await.unwrap();
    let timed_out = tokio::time::timeout(Duration::from_secs(1), engine.fetch("BBB-222")).await;
    assert!(timed_out.is_err());

    let state = engine.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(state.plate, "AAA-111");
    assert_eq!(
        state.snapshot.map(|s| s.license_plate),
        Some("AAA-111".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_in_flight_response() {
    let client = two_car_client();
    client
        .set_plate_latency("AAA-111", Duration::from_millis(100))
        .await;
    let engine = SyncEngine::new(client.clone());

    let (outcome, ()) = tokio::join!(engine.fetch("AAA-111"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        engine.reset();
    });

    assert_eq!(outcome.unwrap(), FetchOutcome::Superseded);
    assert_eq!(engine.state(), SyncState::default());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_engine_stops_timer() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();
    assert!(engine.start_auto_refresh(Duration::from_secs(30)));

    drop(engine);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(client.read_count(), 1);
}

#[tokio::test]
async fn test_command_is_forwarded() {
    let client = two_car_client();
    let engine = SyncEngine::new(client.clone());

    engine
        .send_command("AAA-111", VehicleCommand::StartHeating)
        .await
        .unwrap();
    engine
        .send_command("AAA-111", VehicleCommand::ServiceMode)
        .await
        .unwrap();

    assert_eq!(
        client.sent_commands().await,
        vec![
            ("AAA-111".to_string(), VehicleCommand::StartHeating),
            ("AAA-111".to_string(), VehicleCommand::ServiceMode),
        ]
    );
    // Commands never touch the observable state
    assert_eq!(engine.state(), SyncState::default());
    assert_eq!(client.read_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_command_does_not_block_fetch() {
    let client = two_car_client();
    client.set_command_latency(Duration::from_secs(5));
    let engine = SyncEngine::new(client.clone());
    let start = tokio::time::Instant::now();

    let (sent, fetched) = tokio::join!(
        engine.send_command("AAA-111", VehicleCommand::StartHeating),
        async {
            let outcome = engine.fetch("AAA-111").await;
            (outcome, start.elapsed())
        }
    );

    sent.unwrap();
    let (outcome, elapsed) = fetched;
    assert_eq!(outcome.unwrap(), FetchOutcome::Updated);
    assert!(elapsed < Duration::from_secs(5));
    assert_eq!(client.command_count(), 1);
    assert_eq!(engine.state().status, SyncStatus::Ready);
}

#[tokio::test]
async fn test_command_failure_is_reported() {
    let client = two_car_client();
    client.set_commands_should_fail(true);
    let engine = SyncEngine::new(client.clone());
    engine.fetch("AAA-111").await.unwrap();
    let before = engine.state();

    let err = engine
        .send_command("AAA-111", VehicleCommand::ServiceMode)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::CommandFailed {
            command: VehicleCommand::ServiceMode,
            ..
        }
    ));
    assert_eq!(err.user_message(), "Failed to send service mode command");
    assert_eq!(engine.state(), before);
}
