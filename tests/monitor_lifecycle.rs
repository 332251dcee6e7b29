//! Monitor lifecycle against a mock backend probe.
//!
//! These tests run with real (short) periods because the probe crosses a
//! real socket to the mock server.

mod common;

use brigade::{
    ApiClient, ClientConfig, Credential, MemoryStore, MonitorState, SessionStore, TokenMonitor,
};
use common::token_expiring_in;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PERIOD: Duration = Duration::from_millis(200);
const SETTLE: Duration = Duration::from_millis(100);

async fn probe_client(server: &MockServer) -> Arc<ApiClient> {
    let config = ClientConfig::new(&server.uri()).expect("mock server uri is valid");
    Arc::new(ApiClient::new(&config).expect("client builds"))
}

fn counter_callback() -> (brigade::OnExpired, Arc<AtomicUsize>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let cloned = fired.clone();
    let callback: brigade::OnExpired = Arc::new(move || {
        cloned.fetch_add(1, Ordering::SeqCst);
    });
    (callback, fired)
}

async fn health_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/recipes/health")
        .count()
}

#[tokio::test]
async fn accepted_credentials_keep_the_watch_alive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "UP"})))
        .mount(&server)
        .await;

    let (callback, fired) = counter_callback();
    let monitor = TokenMonitor::builder(probe_client(&server).await, callback)
        .period(PERIOD)
        .buffer(Duration::from_secs(60))
        .build();

    monitor.start_watching(Credential::parse(token_expiring_in(3600)).unwrap());
    tokio::time::sleep(PERIOD * 2 + SETTLE).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert!(health_requests(&server).await >= 2, "immediate check plus periodic checks");
    assert_eq!(monitor.state(), MonitorState::Watching);
    monitor.stop_watching();
}

#[tokio::test]
async fn rejected_probe_signals_expiry_once_and_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/health"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (callback, fired) = counter_callback();
    let monitor = TokenMonitor::builder(probe_client(&server).await, callback)
        .period(PERIOD)
        .buffer(Duration::from_secs(60))
        .build();

    monitor.start_watching(Credential::parse(token_expiring_in(3600)).unwrap());
    tokio::time::sleep(PERIOD * 3 + SETTLE).await;

    assert_eq!(fired.load(Ordering::SeqCst), 1, "expiry signaled exactly once");
    assert_eq!(health_requests(&server).await, 1, "watch ended after the rejection");
    assert_eq!(monitor.state(), MonitorState::Idle);
}

#[tokio::test]
async fn locally_expired_credentials_never_reach_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (callback, fired) = counter_callback();
    let monitor = TokenMonitor::builder(probe_client(&server).await, callback)
        .period(PERIOD)
        .buffer(Duration::from_secs(60))
        .build();

    // Expires in 30 s; the 60 s buffer fails it on the very first check.
    monitor.start_watching(Credential::parse(token_expiring_in(30)).unwrap());
    tokio::time::sleep(SETTLE).await;

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(health_requests(&server).await, 0, "no probe for a locally expired token");
}

#[tokio::test]
async fn explicit_stop_never_signals_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (callback, fired) = counter_callback();
    let monitor = TokenMonitor::builder(probe_client(&server).await, callback)
        .period(PERIOD)
        .buffer(Duration::from_secs(60))
        .build();

    monitor.start_watching(Credential::parse(token_expiring_in(3600)).unwrap());
    tokio::time::sleep(SETTLE).await;
    monitor.stop_watching();
    let after_stop = health_requests(&server).await;
    tokio::time::sleep(PERIOD * 2).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(health_requests(&server).await, after_stop, "no checks after stop");
}

#[tokio::test]
async fn swap_tears_down_the_previous_watch() {
    let old_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&old_server)
        .await;

    let (callback, fired) = counter_callback();
    let monitor = TokenMonitor::builder(probe_client(&old_server).await, callback)
        .period(PERIOD)
        .buffer(Duration::from_secs(60))
        .build();

    monitor.start_watching(Credential::parse(token_expiring_in(3600)).unwrap());
    tokio::time::sleep(SETTLE).await;
    let before_swap = health_requests(&old_server).await;
    assert_eq!(before_swap, 1);

    // Sign in as a different user without logging out first.
    let replacement = Credential::parse(token_expiring_in(7200)).unwrap();
    monitor.start_watching(replacement.clone());
    tokio::time::sleep(PERIOD + SETTLE).await;

    assert_eq!(
        monitor.watched().unwrap().expires_at(),
        replacement.expires_at(),
        "the new credential is the watched one"
    );
    // Old timer dead: exactly the swap's immediate check plus one period.
    assert_eq!(health_requests(&old_server).await, before_swap + 2);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    monitor.stop_watching();
}

#[tokio::test]
async fn expiry_flows_through_the_session_store() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/health"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
    let credential = Credential::parse(token_expiring_in(3600)).unwrap();
    store
        .login(
            brigade::model::UserProfile {
                username: "chef_amara".to_string(),
                email: None,
                first_name: None,
                last_name: None,
                roles: vec!["ROLE_ADMIN".to_string()],
                role: None,
            },
            credential.clone(),
        )
        .unwrap();

    let monitor =
        TokenMonitor::builder(probe_client(&server).await, Arc::clone(&store).expiry_callback())
        .period(PERIOD)
        .buffer(Duration::from_secs(60))
        .build();
    monitor.start_watching(credential);
    tokio::time::sleep(SETTLE).await;

    assert!(store.current().is_none(), "rejection logged the user out");
}
