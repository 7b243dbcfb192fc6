//! RosterProvider against a stub game-data API.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use vp_client::{ClientConfig, RosterProvider};
use vp_core::{Role, Roster, WeaponCategory};

async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

async fn agents_ok() -> Json<Value> {
    Json(json!({
        "status": 200,
        "data": [
            { "uuid": "a1", "displayName": "Jett", "displayIcon": "jett.png", "role": { "displayName": "Duelist" } },
            { "uuid": "a2", "displayName": "Killjoy", "displayIcon": "kj.png", "role": { "displayName": "Sentinel" } },
            { "uuid": "a3", "displayName": "Jett", "displayIcon": "jett2.png", "role": { "displayName": "Duelist" } }
        ]
    }))
}

async fn weapons_ok() -> Json<Value> {
    Json(json!({
        "status": 200,
        "data": [
            { "uuid": "w1", "displayName": "Vandal", "displayIcon": "v.png", "category": "EEquippableCategory::Rifle" },
            { "uuid": "w2", "displayName": "Ghost", "displayIcon": "g.png", "category": "EEquippableCategory::Sidearm" }
        ]
    }))
}

#[tokio::test]
async fn test_fetch_roster_dedupes_by_name() {
    let base = spawn_stub(Router::new().route("/v1/agents", get(agents_ok))).await;
    let provider = RosterProvider::new(&base, &ClientConfig::default());

    let roster = provider.fetch_roster().await;
    assert_eq!(roster.len(), 2);
    let jett = roster.find_by_name("jett").unwrap();
    assert_eq!(jett.uuid.as_str(), "a1");
    assert_eq!(roster.bucket(Role::Sentinel).len(), 1);
}

#[tokio::test]
async fn test_fetch_roster_falls_back_on_error_status() {
    let app = Router::new().route("/v1/agents", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = spawn_stub(app).await;
    let provider = RosterProvider::new(&base, &ClientConfig::default());

    assert_eq!(provider.fetch_roster().await, Roster::fallback());
}

#[tokio::test]
async fn test_fetch_roster_falls_back_on_bad_envelope() {
    let app = Router::new().route("/v1/agents", get(|| async { Json(json!({ "status": 500, "data": [] })) }));
    let base = spawn_stub(app).await;
    let provider = RosterProvider::new(&base, &ClientConfig::default());

    assert_eq!(provider.fetch_roster().await, Roster::fallback());
}

#[tokio::test]
async fn test_fetch_roster_falls_back_when_unreachable() {
    let provider = RosterProvider::new("http://127.0.0.1:9", &ClientConfig::default());
    let roster = provider.fetch_roster().await;
    assert_eq!(roster.len(), 5);
    assert_eq!(roster.find_by_name("Omen").and_then(|a| a.role), Some(Role::Controller));
}

#[tokio::test]
async fn test_fetch_weapons() {
    let base = spawn_stub(Router::new().route("/v1/weapons", get(weapons_ok))).await;
    let provider = RosterProvider::new(&base, &ClientConfig::default());

    let weapons = provider.fetch_weapons().await;
    assert_eq!(weapons.len(), 2);
    assert_eq!(weapons[1].weapon_category(), Some(WeaponCategory::Pistol));

    let missing = RosterProvider::new("http://127.0.0.1:9", &ClientConfig::default());
    assert!(missing.fetch_weapons().await.is_empty());
}
