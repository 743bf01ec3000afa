use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use location_registry::auth::jwt::{encode_token, Claims};
use location_registry::config::Config;

pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";
pub const USER_AGENT: &str = "registry-tests/1.0";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Mint a bearer token for the given user, as the identity provider would.
    pub fn token_for(&self, user_id: Uuid) -> String {
        let claims = Claims::new(user_id, "Test User", chrono::Duration::minutes(15));
        encode_token(&claims, JWT_SECRET).unwrap()
    }

    /// Token for a fresh random user, returned with that user's id.
    pub fn new_user(&self) -> (Uuid, String) {
        let user_id = Uuid::now_v7();
        (user_id, self.token_for(user_id))
    }

    /// Create a company, return the company JSON.
    pub async fn create_company(&self, token: &str, name: &str, registration_number: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/companies",
                token,
                &json!({
                    "name": name,
                    "registration_number": registration_number,
                    "phone": "+94112345678",
                    "email": "info@example.com",
                    "address_line1": "1 Main Street",
                    "city": "Colombo",
                    "country": "Sri Lanka",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create company failed: {body}");
        body
    }

    /// Create a location type, return the type JSON.
    pub async fn create_location_type(&self, token: &str, name: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/location-types",
                token,
                &json!({ "name": name, "is_internal": true }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create location type failed: {body}");
        body
    }

    /// Company plus location type, the minimum a location needs. Returns their ids.
    pub async fn seed(&self, token: &str) -> (String, String) {
        let company = self.create_company(token, "Central Hospital", "REG-001").await;
        let location_type = self.create_location_type(token, "Clinic").await;
        (
            company["id"].as_str().unwrap().to_string(),
            location_type["id"].as_str().unwrap().to_string(),
        )
    }

    /// Create a location under a company, return (body, status).
    pub async fn create_location(
        &self,
        token: &str,
        company_id: &str,
        body: &Value,
    ) -> (Value, StatusCode) {
        self.post_auth(&format!("/api/v1/companies/{company_id}/locations"), token, body)
            .await
    }

    /// Create a location that must succeed, return its JSON.
    pub async fn create_location_ok(&self, token: &str, company_id: &str, body: &Value) -> Value {
        let (body, status) = self.create_location(token, company_id, body).await;
        assert_eq!(status, StatusCode::OK, "create location failed: {body}");
        body
    }

    /// Audit entries for a location, newest first.
    pub async fn audit(&self, token: &str, location_id: &str) -> Vec<Value> {
        let (body, status) = self
            .get_auth(&format!("/api/v1/locations/{location_id}/audit"), token)
            .await;
        assert_eq!(status, StatusCode::OK, "audit query failed: {body}");
        body.as_array().unwrap().clone()
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PATCH request with JSON body.
    pub async fn patch_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("patch request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// A complete, valid location request body.
pub fn location_body(location_type_id: &str, name: &str, code: &str) -> Value {
    json!({
        "location_type_id": location_type_id,
        "name": name,
        "code": code,
        "contact_person": "Dr. Perera",
        "contact_email": "perera@example.com",
        "contact_phone": "+94771234567",
        "address_line1": "12 Hospital Road",
        "city": "Kandy",
        "state": "Central",
        "country": "Sri Lanka",
        "postal_code": "20000",
    })
}

pub fn weekday_hours() -> Value {
    json!({
        "monday": "08:00-17:00",
        "tuesday": "08:00-17:00",
        "wednesday": "08:00-17:00",
        "thursday": "08:00-17:00",
        "friday": "08:00-17:00",
    })
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let db_name = format!("registry_test_{}", Uuid::now_v7().to_string().replace('-', ""));

    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        jwt_secret: JWT_SECRET.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        max_body_size: 1_048_576,
        db_max_connections: 5,
        trusted_proxies: vec![],
        log_level: "warn".to_string(),
    };

    let app = location_registry::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
