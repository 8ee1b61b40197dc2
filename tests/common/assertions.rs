//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert an error response carries the JSON error body
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(expected.as_u16() as u64));
    assert!(json["error"].is_string(), "Expected error message: {json}");
}

/// Assert every command uses normalized board coordinates and a hex color
pub fn assert_commands_on_board(json: &serde_json::Value) {
    let commands = json["commands"].as_array().expect("commands array");
    for command in commands {
        for key in ["x1", "x2", "y1", "y2"] {
            let v = command[key].as_f64().expect("coordinate");
            assert!(
                (0.0..=1.0).contains(&v),
                "{key}={v} outside 0..=1 in {command}"
            );
        }
        let color = command["color"].as_str().expect("color");
        assert_eq!(color.len(), 7, "bad color {color}");
        assert!(color.starts_with('#'));
    }
}
