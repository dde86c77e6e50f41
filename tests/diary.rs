mod common;

use axum::http::StatusCode;
use common::{body_json, Auth, TestApp};
use serde_json::json;

#[tokio::test]
async fn diary_routes_require_authentication() {
    let app = TestApp::new();

    let resp = app.post_json("/api/diary", json!({}), Auth::None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(resp).await["message"].is_string());

    let resp = app.get("/api/diary", Auth::None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app.get("/api/diary/month/2025/3", Auth::Bearer("not-a-jwt")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn alice_updates_her_entry_in_place() {
    let app = TestApp::new();
    let token = app.signup("alice").await;

    let resp = app
        .post_json(
            "/api/diary",
            json!({
                "content": "A",
                "emotion": "heart",
                "weather": "sunny",
                "date": "2025-03-10T08:00:00Z",
            }),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["entry"]["id"].clone();
    assert_eq!(created["entry"]["content"], "A");

    let resp = app
        .post_json(
            "/api/diary",
            json!({
                "content": "B",
                "emotion": "low",
                "weather": "rain",
                "date": "2025-03-10T23:00:00Z",
            }),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["entry"]["id"], id);
    assert_eq!(updated["entry"]["content"], "B");
    assert_eq!(updated["entry"]["emotion"], "low");
    assert_eq!(updated["entry"]["weather"], "rain");
    assert_eq!(updated["entry"]["date"], "2025-03-10T23:00:00Z");

    let resp = app.get("/api/diary/month/2025/3", Auth::Bearer(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let march = body_json(resp).await;
    assert_eq!(march, json!([updated["entry"].clone()]));

    let resp = app.get("/api/diary/month/2025/4", Auth::Bearer(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn entry_serialization_uses_camel_case_fields() {
    let app = TestApp::new();
    let token = app.signup("alice").await;

    let resp = app
        .post_json(
            "/api/diary",
            json!({ "content": "x", "emotion": "happy", "weather": "cloudy", "date": "2025-03-10" }),
            Auth::Bearer(&token),
        )
        .await;
    let entry = body_json(resp).await["entry"].clone();
    for field in ["id", "ownerId", "date", "content", "emotion", "weather", "createdAt", "updatedAt"] {
        assert!(entry.get(field).is_some(), "missing {field}");
    }
    assert_eq!(entry["date"], "2025-03-10T00:00:00Z");
}

#[tokio::test]
async fn missing_fields_are_bad_requests() {
    let app = TestApp::new();
    let token = app.signup("alice").await;

    for body in [
        json!({ "emotion": "happy", "weather": "sunny" }),
        json!({ "content": "x", "weather": "sunny" }),
        json!({ "content": "x", "emotion": "happy" }),
        json!({ "content": "", "emotion": "happy", "weather": "sunny" }),
        json!({ "content": "x", "emotion": "happy", "weather": "sunny", "date": "not a date" }),
        json!({ "content": "x", "emotion": "happy", "weather": "sunny", "date": "+262142-12-31" }),
    ] {
        let resp = app.post_json("/api/diary", body, Auth::Bearer(&token)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["message"].is_string());
    }

    let resp = app.get("/api/diary", Auth::Bearer(&token)).await;
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let token = app.signup("alice").await;

    let req = axum::http::Request::builder()
        .uri("/api/diary")
        .method("POST")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let resp = app.request(req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn month_query_validates_path_params() {
    let app = TestApp::new();
    let token = app.signup("alice").await;

    for uri in [
        "/api/diary/month/2025/13",
        "/api/diary/month/2025/0",
        "/api/diary/month/abcd/3",
        "/api/diary/month/2025/march",
    ] {
        let resp = app.get(uri, Auth::Bearer(&token)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn year_rollover_and_history_order() {
    let app = TestApp::new();
    let token = app.signup("alice").await;

    for date in [
        "2024-12-01T00:00:00Z",
        "2025-01-01T00:00:00Z",
        "2024-12-31T23:59:59.999Z",
    ] {
        let resp = app
            .post_json(
                "/api/diary",
                json!({ "content": date, "emotion": "happy", "weather": "snow", "date": date }),
                Auth::Bearer(&token),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let december = body_json(app.get("/api/diary/month/2024/12", Auth::Bearer(&token)).await).await;
    let dates: Vec<&str> = december
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["content"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-12-01T00:00:00Z", "2024-12-31T23:59:59.999Z"]);

    let all = body_json(app.get("/api/diary", Auth::Bearer(&token)).await).await;
    let dates: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["content"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec!["2025-01-01T00:00:00Z", "2024-12-31T23:59:59.999Z", "2024-12-01T00:00:00Z"]
    );
}

#[tokio::test]
async fn owners_only_see_their_own_entries() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let resp = app
        .post_json(
            "/api/diary",
            json!({ "content": "secret", "emotion": "angry", "weather": "rain", "date": "2025-03-10" }),
            Auth::Bearer(&alice),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let bobs = body_json(app.get("/api/diary", Auth::Bearer(&bob)).await).await;
    assert_eq!(bobs, json!([]));

    // Bob writing the same day creates his own entry rather than touching alice's.
    let resp = app
        .post_json(
            "/api/diary",
            json!({ "content": "mine", "emotion": "happy", "weather": "sunny", "date": "2025-03-10" }),
            Auth::Bearer(&bob),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let alices = body_json(app.get("/api/diary", Auth::Bearer(&alice)).await).await;
    assert_eq!(alices[0]["content"], "secret");
}
