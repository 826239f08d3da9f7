mod support;

use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;

use mediguard::application::PrimeOutcome;
use mediguard::domain::{ConnectionState, Reachability};
use mediguard::port::HttpMethod;
use mediguard::testkit::channel::{wait_for_state, Script};
use mediguard::testkit::domain::alert_frame;
use mediguard::testkit::http::{ScriptedTransport, TransportReply};

use support::{fast_config, harness};

const WAIT: Duration = Duration::from_secs(3);

fn reachable_service() -> ScriptedTransport {
    ScriptedTransport::new()
        .route(HttpMethod::Get, "/health", TransportReply::json(200, json!({"status": "ok"})))
        .route(HttpMethod::Post, "/start_stream", TransportReply::json(200, json!({"status": "started"})))
}

#[tokio::test]
async fn alerts_keep_flowing_across_reconnects() {
    let h = harness(
        fast_config(),
        reachable_service(),
        vec![
            Script::open().text(alert_frame("WARNING", "before drop")).close(),
            Script::refused("connection reset"),
            Script::open()
                .text(alert_frame("CRITICAL", "after reconnect"))
                .hold_open(),
        ],
    );
    let (tx, rx) = watch::channel(false);

    let drive = async {
        assert!(h.notifier.wait_for(2, WAIT).await, "both alerts delivered");
        let _ = tx.send(true);
    };
    let (report, ()) = tokio::join!(h.session.run(rx), drive);

    assert_eq!(report.reachability, Reachability::Reachable);
    let messages: Vec<_> = h.notifier.alerts().into_iter().map(|a| a.message).collect();
    assert_eq!(messages, vec!["before drop", "after reconnect"]);
    assert_eq!(h.connector.connect_count(), 3);
    assert_eq!(h.session.connection().state(), ConnectionState::Idle);
}

#[tokio::test]
async fn capability_fallback_counts_as_reachable() {
    let transport = ScriptedTransport::new()
        .route(HttpMethod::Get, "/health", TransportReply::text(404, "not found"))
        .route(HttpMethod::Options, "/predict", TransportReply::text(405, "method not allowed"));
    let mut config = fast_config();
    config.stream.enabled = false;
    let h = harness(config, transport, vec![Script::open().hold_open()]);
    let (tx, rx) = watch::channel(false);
    let mut states = h.session.connection().subscribe_state();

    let drive = async {
        assert!(wait_for_state(&mut states, ConnectionState::Open, WAIT).await);
        let _ = tx.send(true);
    };
    let (report, ()) = tokio::join!(h.session.run(rx), drive);

    assert_eq!(report.reachability, Reachability::Reachable);
    assert_eq!(report.primed, None);
    assert_eq!(h.transport.count_for(HttpMethod::Options, "/predict"), 1);
    assert_eq!(h.transport.count_for(HttpMethod::Post, "/start_stream"), 0);
}

#[tokio::test]
async fn failed_priming_does_not_stop_the_feed() {
    let transport = ScriptedTransport::new()
        .route(HttpMethod::Get, "/health", TransportReply::json(200, json!({})))
        .route(HttpMethod::Post, "/start_stream", TransportReply::text(500, "boom"));
    let h = harness(
        fast_config(),
        transport,
        vec![Script::open().text(alert_frame("INFO", "still here")).hold_open()],
    );
    let (tx, rx) = watch::channel(false);

    let drive = async {
        assert!(h.notifier.wait_for(1, WAIT).await);
        let _ = tx.send(true);
    };
    let (report, ()) = tokio::join!(h.session.run(rx), drive);

    assert_eq!(report.primed, Some(PrimeOutcome::Failed));
    assert_eq!(h.notifier.alerts()[0].message, "still here");
}

#[tokio::test]
async fn push_url_follows_the_http_base() {
    let mut config = fast_config();
    config.service.base_url = Some("https://guard.example.org/api/".to_string());
    let h = harness(config, ScriptedTransport::new(), vec![]);

    assert_eq!(
        h.session.endpoints().push_url().as_str(),
        "wss://guard.example.org/api/ws"
    );
    assert_eq!(h.session.connection().push_url(), h.session.endpoints().push_url());
}
