#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;

use diary_api::config::Config;
use diary_api::db::{MemoryStore, Store};
use diary_api::{build_app, AppState};

pub fn test_config() -> Config {
    Config {
        database_url: None,
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: "http://localhost:3000".into(),
        cors_extra_origins: Vec::new(),
        jwt_secret: "integration-test-secret".into(),
        jwt_ttl_secs: 3600,
        production: false,
        request_timeout_secs: 30,
        auth_rate_limit_max: 100,
        auth_rate_limit_window_secs: 60,
    }
}

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let state = AppState::new(Store::Memory(MemoryStore::new()), config);
        Self {
            router: build_app(state),
        }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value, auth: Auth<'_>) -> Response {
        let builder = Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json");
        let req = auth
            .apply(builder)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(req).await
    }

    pub async fn get(&self, uri: &str, auth: Auth<'_>) -> Response {
        let req = auth
            .apply(Request::builder().uri(uri))
            .body(Body::empty())
            .unwrap();
        self.request(req).await
    }

    pub async fn register(&self, user_id: &str, password: &str) {
        let resp = self
            .post_json(
                "/api/auth/register",
                serde_json::json!({ "userId": user_id, "password": password }),
                Auth::None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    /// Register and log in; returns the bearer token from the JSON body.
    pub async fn signup(&self, user_id: &str) -> String {
        self.register(user_id, "hunter22").await;
        let resp = self
            .post_json(
                "/api/auth/login",
                serde_json::json!({ "userId": user_id, "password": "hunter22" }),
                Auth::None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        body["token"].as_str().unwrap().to_string()
    }
}

#[derive(Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    Cookie(&'a str),
}

impl Auth<'_> {
    fn apply(self, builder: axum::http::request::Builder) -> axum::http::request::Builder {
        match self {
            Auth::None => builder,
            Auth::Bearer(token) => builder.header("authorization", format!("Bearer {token}")),
            Auth::Cookie(cookie) => builder.header("cookie", cookie),
        }
    }
}

/// Read the full response body as JSON.
pub async fn body_json(resp: Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name=value` part of the response's Set-Cookie header.
pub fn set_cookie(resp: &Response) -> String {
    resp.headers()
        .get("set-cookie")
        .expect("Response should set a cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}
