#![allow(clippy::unwrap_used)]
// Platform setup and switch behaviour against a wiremock controller.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use groupblock_core::{
    ApiVersion, ClientBlockSwitch, ControllerConnectionConfig, CoreError, NOTIFICATION_ID,
    NOTIFICATION_TITLE, Notification, PlatformConfig, PlatformHost, Scheme, SetupError,
    SwitchEntity, TlsVerification, setup_platform,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingHost {
    switches: Vec<ClientBlockSwitch>,
    add_calls: usize,
    notifications: Vec<Notification>,
}

impl PlatformHost for RecordingHost {
    fn add_entities(&mut self, switches: Vec<ClientBlockSwitch>) {
        self.add_calls += 1;
        self.switches.extend(switches);
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

fn config_for(port: u16, group: &str) -> PlatformConfig {
    PlatformConfig {
        connection: ControllerConnectionConfig {
            host: "127.0.0.1".into(),
            port,
            site_id: "default".into(),
            username: "admin".into(),
            password: SecretString::from("hunter2".to_string()),
            tls: TlsVerification::SystemDefaults,
            version: ApiVersion::V4,
            scheme: Scheme::Http,
            timeout: Duration::from_secs(1),
            write_timeout: Duration::from_secs(1),
        },
        user_group_name: group.into(),
    }
}

fn ok_envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "meta": { "rc": "ok" }, "data": data })
}

fn site_path(suffix: &str) -> String {
    format!("/api/s/default/{suffix}")
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(server)
        .await;
}

async fn mount_groups(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(site_path("list/usergroup")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            { "_id": "g000", "name": "Default" },
            { "_id": "g123", "name": "Guests" },
        ]))))
        .mount(server)
        .await;
}

async fn mount_users(server: &MockServer, users: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(site_path("list/user")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(users)))
        .mount(server)
        .await;
}

fn guest_users() -> serde_json::Value {
    json!([
        { "_id": "u1", "mac": "aa:bb:cc:00:00:01", "name": "Tablet", "usergroup_id": "g123" },
        { "_id": "u2", "mac": "aa:bb:cc:00:00:02", "usergroup_id": "g123", "blocked": true },
        { "_id": "u3", "mac": "aa:bb:cc:00:00:03", "name": "Laptop", "usergroup_id": "g000" },
        { "_id": "u4", "mac": "aa:bb:cc:00:00:04", "name": "Printer" },
    ])
}

async fn mount_stat_user(server: &MockServer, mac: &str, data: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(site_path(&format!("stat/user/{mac}"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(data)))
        .mount(server)
        .await;
}

async fn guests_setup() -> (MockServer, RecordingHost) {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_groups(&server).await;
    mount_users(&server, guest_users()).await;

    let mut host = RecordingHost::default();
    let count = setup_platform(&config_for(server.address().port(), "Guests"), &mut host)
        .await
        .unwrap();
    assert_eq!(count, 2);
    (server, host)
}

// ── Setup ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_setup_registers_one_switch_per_group_member() {
    let (_server, host) = guests_setup().await;

    assert_eq!(host.add_calls, 1);
    assert!(host.notifications.is_empty());

    let names: Vec<&str> = host.switches.iter().map(SwitchEntity::name).collect();
    assert_eq!(names, ["Tablet", "no name"]);

    let ids: Vec<&str> = host.switches.iter().map(SwitchEntity::unique_id).collect();
    assert_eq!(ids, ["aa:bb:cc:00:00:01", "aa:bb:cc:00:00:02"]);

    assert!(host.switches[0].is_on(), "missing blocked flag means unblocked");
    assert!(!host.switches[1].is_on(), "blocked client starts off");
    assert!(host.switches.iter().all(SwitchEntity::available));
}

#[tokio::test]
async fn test_setup_sends_configured_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    mount_groups(&server).await;
    mount_users(&server, json!([])).await;

    let mut host = RecordingHost::default();
    setup_platform(&config_for(server.address().port(), "Guests"), &mut host)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_setup_with_empty_group_registers_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    mount_groups(&server).await;
    mount_users(
        &server,
        json!([{ "_id": "u3", "mac": "aa:bb:cc:00:00:03", "usergroup_id": "g000" }]),
    )
    .await;

    let mut host = RecordingHost::default();
    let count = setup_platform(&config_for(server.address().port(), "Guests"), &mut host)
        .await
        .unwrap();

    assert_eq!(count, 0);
    assert!(host.switches.is_empty());
    assert!(host.notifications.is_empty());
}

#[tokio::test]
async fn test_setup_fails_when_controller_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut host = RecordingHost::default();
    let err = setup_platform(&config_for(port, "Guests"), &mut host)
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::Connection(_)), "got: {err:?}");
    assert_eq!(host.add_calls, 0);
    assert_eq!(host.notifications.len(), 1);

    let note = &host.notifications[0];
    assert_eq!(note.notification_id, NOTIFICATION_ID);
    assert_eq!(note.title, NOTIFICATION_TITLE);
    assert!(note.message.starts_with("Failed to connect to Unifi."));
    assert!(note.message.ends_with("You will need to restart after fixing."));
}

#[tokio::test]
async fn test_setup_fails_on_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" },
            "data": []
        })))
        .mount(&server)
        .await;

    let mut host = RecordingHost::default();
    let err = setup_platform(&config_for(server.address().port(), "Guests"), &mut host)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::Connection(CoreError::AuthenticationFailed { .. })
    ));
    assert_eq!(host.notifications.len(), 1);
}

#[tokio::test]
async fn test_setup_fails_when_group_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    mount_groups(&server).await;
    mount_users(&server, guest_users()).await;

    let mut host = RecordingHost::default();
    let err = setup_platform(&config_for(server.address().port(), "guests"), &mut host)
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::GroupNotFound { ref name } if name == "guests"));
    assert_eq!(host.add_calls, 0);
    assert_eq!(host.notifications.len(), 1);
    assert_eq!(
        host.notifications[0].message,
        "Failed to find Unifi User Group Name: guests\nYou will need to restart after fixing."
    );
}

#[tokio::test]
async fn test_setup_enumeration_failure_is_not_notified() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path(site_path("list/usergroup")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut host = RecordingHost::default();
    let err = setup_platform(&config_for(server.address().port(), "Guests"), &mut host)
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::Enumeration(_)));
    assert_eq!(host.add_calls, 0);
    assert!(host.notifications.is_empty());
}

// ── Switch behaviour ────────────────────────────────────────────────

#[tokio::test]
async fn test_turn_off_sends_block_without_touching_state() {
    let (server, host) = guests_setup().await;
    Mock::given(method("POST"))
        .and(path(site_path("cmd/stamgr")))
        .and(body_json(json!({ "cmd": "block-sta", "mac": "aa:bb:cc:00:00:01" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let switch = &host.switches[0];
    switch.turn_off().await.unwrap();
    assert!(switch.is_on(), "state only changes on update");
}

#[tokio::test]
async fn test_turn_on_sends_unblock_without_touching_state() {
    let (server, host) = guests_setup().await;
    Mock::given(method("POST"))
        .and(path(site_path("cmd/stamgr")))
        .and(body_json(json!({ "cmd": "unblock-sta", "mac": "aa:bb:cc:00:00:02" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let switch = &host.switches[1];
    switch.turn_on().await.unwrap();
    assert!(!switch.is_on());
}

#[tokio::test]
async fn test_update_follows_blocked_flag() {
    let (server, mut host) = guests_setup().await;
    mount_stat_user(
        &server,
        "aa:bb:cc:00:00:01",
        json!([{ "_id": "u1", "mac": "aa:bb:cc:00:00:01", "blocked": true }]),
    )
    .await;

    let switch = &mut host.switches[0];
    assert!(switch.is_on());
    switch.update().await.unwrap();
    assert!(!switch.is_on());
    assert!(switch.available());
}

#[tokio::test]
async fn test_update_treats_missing_blocked_as_unblocked() {
    let (server, mut host) = guests_setup().await;
    mount_stat_user(
        &server,
        "aa:bb:cc:00:00:02",
        json!([{ "_id": "u2", "mac": "aa:bb:cc:00:00:02" }]),
    )
    .await;

    let switch = &mut host.switches[1];
    assert!(!switch.is_on());
    switch.update().await.unwrap();
    assert!(switch.is_on());
}

#[tokio::test]
async fn test_update_unknown_client_marks_unavailable() {
    let (server, mut host) = guests_setup().await;
    mount_stat_user(&server, "aa:bb:cc:00:00:01", json!([])).await;

    let switch = &mut host.switches[0];
    let err = switch.update().await.unwrap_err();

    assert!(matches!(err, CoreError::ClientNotFound { ref mac } if mac == "aa:bb:cc:00:00:01"));
    assert!(!switch.available());
    assert!(switch.is_on(), "cached state is kept on failure");
}

#[tokio::test]
async fn test_update_recovers_availability() {
    let (server, mut host) = guests_setup().await;
    Mock::given(method("GET"))
        .and(path(site_path("stat/user/aa:bb:cc:00:00:01")))
        .respond_with(ResponseTemplate::new(500).set_body_string("busy"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_stat_user(
        &server,
        "aa:bb:cc:00:00:01",
        json!([{ "_id": "u1", "mac": "aa:bb:cc:00:00:01", "blocked": false }]),
    )
    .await;

    let switch = &mut host.switches[0];
    assert!(switch.update().await.is_err());
    assert!(!switch.available());

    switch.update().await.unwrap();
    assert!(switch.available());
    assert!(switch.is_on());
}
