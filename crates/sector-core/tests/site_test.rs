#![allow(clippy::unwrap_used)]
// End-to-end tests for `Site` against a wiremock service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{any, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sector_core::{ActionOutcome, Error, Settings, Site};

const LOGIN_PAGE: &str = r#"<script src="/Scripts/main.js?v1_1_68"></script>"#;

fn overview_body(main: &str, annex: &str) -> serde_json::Value {
    json!({
        "Panel": {
            "PanelId": "123",
            "PanelDisplayName": "Home",
            "ArmedStatus": main,
            "StatusAnnex": annex,
            "PartialAvalible": true,
            "AnnexAvalible": true,
            "PanelTime": "/Date(1536156984000)/"
        }
    })
}

fn site_for(server: &MockServer) -> Site {
    let settings = Settings {
        base_url: Url::parse(&server.uri()).unwrap(),
        timeout: Duration::from_secs(5),
        json_output: false,
    };
    let password: secrecy::SecretString = "pw".to_string().into();
    Site::new("user@example.com", password, "123", settings).unwrap()
}

/// Mount the metadata and login mocks: the login page hands out request
/// cookie `m1`, the login redirect hands out session cookie `s1`.
async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/User/Login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LOGIN_PAGE)
                .insert_header("set-cookie", "ASP.NET_SessionId=m1; path=/"),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/User/Login"))
        .and(query_param("ReturnUrl", "/"))
        .and(header("cookie", "ASP.NET_SessionId=m1"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("set-cookie", ".ASPXAUTH=s1; path=/"),
        )
        .mount(server)
        .await;
}

// ── Session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn login_stores_session_and_status_presents_it() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    // The status call must carry the login cookie `s1` (not `m1`) and the
    // version scraped from the login page.
    Mock::given(method("POST"))
        .and(path("/Panel/GetOverview/"))
        .and(header("cookie", ".ASPXAUTH=s1"))
        .and(body_partial_json(json!({ "PanelId": "123", "Version": "v1_1_68" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body("armed", "disarmed")))
        .expect(1)
        .mount(&server)
        .await;

    let site = site_for(&server);
    site.login().await.unwrap();

    let status = site.status().await.unwrap();
    assert_eq!(status.armed_status, "armed");
    assert_eq!(status.annex_armed_status, "disarmed");
    assert_eq!(status.name, "Home");

    server.verify().await;
}

#[tokio::test]
async fn operations_before_login_fail_with_invalid_session() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let site = site_for(&server);

    assert!(matches!(site.status().await, Err(Error::InvalidSession)));
    assert!(matches!(site.arm("0000").await, Err(Error::InvalidSession)));
    assert!(matches!(site.locks(None).await, Err(Error::InvalidSession)));

    server.verify().await;
}

#[tokio::test]
async fn bad_credentials_surface_unmodified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/User/Login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LOGIN_PAGE)
                .insert_header("set-cookie", "ASP.NET_SessionId=m1"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/User/Login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;

    let site = site_for(&server);
    assert!(matches!(site.login().await, Err(Error::InvalidCredentials)));
}

#[tokio::test]
async fn history_defaults_to_ten_entries() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let entries: Vec<serde_json::Value> = (0..12)
        .map(|i| json!({ "Time": "/Date(1536156984000)/", "EventType": "armed", "User": format!("user-{i}") }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/Panel/GetPanelHistory/123"))
        .and(header("cookie", ".ASPXAUTH=s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "LogDetails": entries })))
        .mount(&server)
        .await;

    let site = site_for(&server);
    site.login().await.unwrap();

    let history = site.history(None).await.unwrap();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].user, "user-0");

    let fewer = site.history(Some(3)).await.unwrap();
    assert_eq!(fewer.len(), 3);
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn arm_sends_the_total_command() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/Panel/ArmPanel/"))
        .and(header("cookie", ".ASPXAUTH=s1"))
        .and(body_partial_json(json!({ "ArmCmd": "Total", "PanelCode": "0000" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "panelData": { "ArmedStatus": "armed" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site = site_for(&server);
    site.login().await.unwrap();

    let outcome = site.arm("0000").await.unwrap();
    assert_eq!(outcome.status, "success");
    assert_eq!(outcome.armed_status.as_deref(), Some("armed"));

    server.verify().await;
}

#[tokio::test]
async fn unlock_routes_to_the_unlock_endpoint() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/Locks/Unlock"))
        .and(body_partial_json(json!({ "id": "lock-1", "panelId": "123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    let site = site_for(&server);
    site.login().await.unwrap();

    let outcome = site.unlock("lock-1", "0000").await.unwrap();
    assert_eq!(outcome.status, "success");

    server.verify().await;
}

// ── Output rendering ────────────────────────────────────────────────

#[test]
fn render_honors_the_json_output_setting() {
    let outcome = ActionOutcome {
        status: "success".into(),
        armed_status: Some("armed".into()),
    };

    let site_with = |json_output| {
        let settings = Settings {
            base_url: Url::parse("https://mypagesapi.sectoralarm.net").unwrap(),
            timeout: Duration::from_secs(5),
            json_output,
        };
        let password: secrecy::SecretString = "pw".to_string().into();
        Site::new("user@example.com", password, "123", settings).unwrap()
    };

    let compact = site_with(true).render(&outcome).unwrap();
    assert_eq!(compact, r#"{"status":"success","armedStatus":"armed"}"#);

    let pretty = site_with(false).render(&outcome).unwrap();
    assert!(pretty.contains('\n'));
}

// ── Change polling ──────────────────────────────────────────────────

#[tokio::test]
async fn watch_fires_only_on_a_change() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    // Two armed responses (seed tick plus one repeat), then the status
    // flips to disarmed.
    Mock::given(method("POST"))
        .and(path("/Panel/GetOverview/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body("armed", "disarmed")))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Panel/GetOverview/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(overview_body("disarmed", "disarmed")),
        )
        .mount(&server)
        .await;

    let site = Arc::new(site_for(&server));
    site.login().await.unwrap();

    let (main_tx, mut main_rx) = tokio::sync::mpsc::unbounded_channel();
    let (annex_tx, mut annex_rx) = tokio::sync::mpsc::unbounded_channel();

    let handle = site.watch(
        Duration::from_millis(25),
        move |status| {
            let _ = main_tx.send(status.armed_status.clone());
        },
        move |status| {
            let _ = annex_tx.send(status.annex_armed_status.clone());
        },
    );

    // The first delivered notification must be the flip to disarmed --
    // if seeding had fired, an "armed" message would arrive first.
    let fired = tokio::time::timeout(Duration::from_secs(5), main_rx.recv())
        .await
        .expect("main status change notification")
        .expect("channel open");
    assert_eq!(fired, "disarmed");

    // The annex axis never changed.
    assert!(annex_rx.try_recv().is_err());

    tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
        .await
        .expect("watch task stops after cancellation");
}
