//! Integration tests for GET /api/effects.

mod common;

use axum::http::StatusCode;
use autodraw::models::AppConfig;
use common::{assert_commands_on_board, assert_json_error, assert_ok, TestApp};
use pretty_assertions::assert_eq;
use serde_json::Value;

#[tokio::test]
async fn test_effect_list() {
    let app = TestApp::new();
    let response = app.get("/api/effects").await;
    assert_ok(&response);

    let json: Value = response.json();
    let kinds: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["aurora", "vortex", "firefly", "cascade"]);
    assert_eq!(json[1]["label"], "Vortex bloom");
}

#[tokio::test]
async fn test_each_effect_draws_on_board() {
    let app = TestApp::new();
    for (kind, paths) in [("aurora", 12), ("vortex", 4), ("firefly", 112), ("cascade", 14)] {
        let response = app
            .get(&format!("/api/effects/{kind}?width=300&height=200&seed=3"))
            .await;
        assert_ok(&response);

        let json: Value = response.json();
        assert_eq!(json["effect"]["kind"], kind);
        assert_eq!(json["effect"]["seed"], 3);
        assert_eq!(json["effect"]["paths"], paths, "{kind}");
        assert_eq!(json["metrics"]["boardWidth"], 300.0);

        let count = json["commands"].as_array().unwrap().len();
        assert!(count > 0, "{kind} drew nothing");
        assert_eq!(json["metrics"]["estimatedStrokes"].as_u64(), Some(count as u64));
        assert_commands_on_board(&json);
    }
}

#[tokio::test]
async fn test_effect_region_and_overrides() {
    let app = TestApp::new();
    let response = app
        .get(concat!(
            "/api/effects/cascade?width=400&height=400",
            "&region_x=0.5&region_y=0.5&region_width=0.5&region_height=0.5",
            "&mirror=false&density=40&tempo=160&color=%23ff0000&seed=9"
        ))
        .await;
    assert_ok(&response);

    let json: Value = response.json();
    assert_eq!(json["effect"]["paths"], 4);
    assert_eq!(json["effect"]["timing"]["stepDelayMs"], 2);
    assert_eq!(json["effect"]["area"]["x"], 200.0);
    assert_eq!(json["metrics"]["regionActive"], true);

    // Endpoints may be nudged 0.75 px past the area edge.
    let slack = 1.0 / 400.0;
    for command in json["commands"].as_array().unwrap() {
        assert_eq!(command["color"], "#ff0000");
        for key in ["x1", "x2", "y1", "y2"] {
            assert!(command[key].as_f64().unwrap() >= 0.5 - slack, "{command}");
        }
    }
}

#[tokio::test]
async fn test_effect_seed_replays() {
    let app = TestApp::new();
    let path = "/api/effects/firefly?seed=77";
    let first: Value = app.get(path).await.json();
    let second: Value = app.get(path).await.json();
    assert_eq!(first["commands"], second["commands"]);
}

#[tokio::test]
async fn test_effect_wire_format() {
    let app = TestApp::new();
    let response = app.get("/api/effects/vortex?format=wire&seed=1").await;
    assert_ok(&response);
    assert!(response
        .header("content-type")
        .unwrap()
        .starts_with("text/plain"));
    let text = response.text();
    assert!(text.lines().count() > 0);
    assert!(text.lines().all(|l| l.starts_with(r#"42["drawcmd",0,["#)));
}

#[tokio::test]
async fn test_effect_uses_configured_defaults() {
    let mut config = AppConfig::default();
    config.effect.options.mirror = false;
    config.effect.color = "#123456".to_string();
    let app = TestApp::with_config(config);

    let json: Value = app.get("/api/effects/vortex?seed=2").await.json();
    assert_eq!(json["effect"]["paths"], 3);
    assert_eq!(json["commands"][0]["color"], "#123456");
}

#[tokio::test]
async fn test_unknown_effect_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/api/effects/sparkle").await;
    assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_effect_bad_parameters() {
    let app = TestApp::new();
    for path in [
        "/api/effects/aurora?color=blue",
        "/api/effects/aurora?mirror=maybe",
        "/api/effects/aurora?region_x=0.2&region_y=0.2&region_width=0&region_height=0.5",
    ] {
        let response = app.get(path).await;
        assert_json_error(&response, StatusCode::BAD_REQUEST);
    }
}
