//! Integration tests for API endpoints.
//!
//! The router runs against in-memory service fakes and a disconnected
//! database handle, so no PostgreSQL instance is needed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use attendance_api::api::{create_router, AppState};
use attendance_api::domain::{
    Attendance, AttendanceWindow, NewUser, User, UserChanges, UserRole,
};
use attendance_api::errors::{AppError, AppResult};
use attendance_api::infra::Database;
use attendance_api::services::{AttendanceService, TokenService, UserService};

const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";
const PASSWORD: &str = "Password123";

// =============================================================================
// Fake services
// =============================================================================

/// In-memory user directory; the "hash" is the plaintext password.
#[derive(Default)]
struct FakeUserService {
    users: Mutex<HashMap<Uuid, User>>,
}

impl FakeUserService {
    fn insert(&self, username: &str, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: PASSWORD.to_string(),
            full_name: format!("{} full name", username),
            email: format!("{}@example.com", username),
            role,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }
}

#[async_trait]
impl UserService for FakeUserService {
    async fn register(&self, new_user: NewUser) -> AppResult<User> {
        let exists = self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.username == new_user.username || u.email == new_user.email);
        if exists {
            return Err(AppError::conflict("Username or email already exists"));
        }

        let user = self.insert(&new_user.username, new_user.role);
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username && u.password_hash == password)
            .cloned()
            .ok_or(AppError::InvalidCredentials)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.username = changes.username;
        user.full_name = changes.full_name;
        user.email = changes.email;
        user.role = changes.role;
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

/// In-memory ledger that treats every record as today's.
#[derive(Default)]
struct FakeAttendanceService {
    records: Mutex<Vec<Attendance>>,
    last_window: Mutex<Option<AttendanceWindow>>,
}

impl FakeAttendanceService {
    fn today_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }
}

#[async_trait]
impl AttendanceService for FakeAttendanceService {
    async fn check_in(
        &self,
        user_id: Uuid,
        location: Option<String>,
        notes: Option<String>,
    ) -> AppResult<Attendance> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.user_id == user_id) {
            return Err(AppError::conflict("Already checked in today"));
        }
        let record = Attendance::check_in(user_id, Self::today_date(), Utc::now(), location, notes);
        records.push(record.clone());
        Ok(record)
    }

    async fn check_out(
        &self,
        user_id: Uuid,
        location: Option<String>,
        _notes: Option<String>,
    ) -> AppResult<Attendance> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.user_id == user_id)
            .ok_or_else(|| AppError::not_found("No check-in record found for today"))?;
        let at = record.check_in + Duration::hours(8);
        record.record_check_out(at, location)?;
        Ok(record.clone())
    }

    async fn get_attendance(&self, id: Uuid) -> AppResult<Attendance> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Attendance not found"))
    }

    async fn get_user_attendances(
        &self,
        user_id: Uuid,
        window: AttendanceWindow,
    ) -> AppResult<Vec<Attendance>> {
        *self.last_window.lock().unwrap() = Some(window);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    fn today(&self) -> NaiveDate {
        Self::today_date()
    }
}

// =============================================================================
// Test harness
// =============================================================================

struct TestApp {
    router: Router,
    users: Arc<FakeUserService>,
    attendance: Arc<FakeAttendanceService>,
    tokens: Arc<TokenService>,
}

impl TestApp {
    fn new() -> Self {
        let users = Arc::new(FakeUserService::default());
        let attendance = Arc::new(FakeAttendanceService::default());
        let tokens = Arc::new(TokenService::new(SECRET, Duration::hours(1)));
        let database = Arc::new(Database::from_connection(DatabaseConnection::Disconnected));

        let state = AppState::new(users.clone(), attendance.clone(), tokens.clone(), database);

        Self {
            router: create_router(state),
            users,
            attendance,
            tokens,
        }
    }

    fn token_for(&self, user: &User) -> String {
        self.tokens.issue_for(user).unwrap().access_token
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_root_endpoint() {
    let app = TestApp::new();

    let response = app.router.clone().oneshot(get_request("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_unavailable_database() {
    let app = TestApp::new();

    let (status, body) = app.send(get_request("/health", None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"]["status"], "unhealthy");
    assert_eq!(body["database"]["error"], "Database unavailable");
}

#[tokio::test]
async fn test_register_returns_created_user_without_hash() {
    let app = TestApp::new();
    let payload = json!({
        "username": "jdoe",
        "password": PASSWORD,
        "full_name": "John Doe",
        "email": "jdoe@example.com",
        "role": "employee"
    });

    let (status, body) = app.send(json_request("POST", "/api/register", None, payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "jdoe");
    assert_eq!(body["data"]["role"], "employee");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::new();
    let payload = json!({
        "username": "jdoe",
        "password": PASSWORD,
        "full_name": "John Doe",
        "email": "not-an-email"
    });

    let (status, body) = app.send(json_request("POST", "/api/register", None, payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = TestApp::new();
    let payload = json!({
        "username": "jdoe",
        "password": PASSWORD,
        "full_name": "John Doe",
        "email": "jdoe@example.com",
        "role": "manager"
    });

    let (status, _) = app.send(json_request("POST", "/api/register", None, payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = TestApp::new();
    app.users.insert("jdoe", UserRole::Employee);
    let payload = json!({
        "username": "jdoe",
        "password": PASSWORD,
        "full_name": "John Doe",
        "email": "other@example.com"
    });

    let (status, body) = app.send(json_request("POST", "/api/register", None, payload)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_login_returns_valid_token() {
    let app = TestApp::new();
    let user = app.users.insert("jdoe", UserRole::Admin);
    let payload = json!({ "username": "jdoe", "password": PASSWORD });

    let (status, body) = app.send(json_request("POST", "/api/login", None, payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], user.id.to_string());
    let token = body["data"]["token"]["access_token"].as_str().unwrap();
    let claims = app.tokens.validate(token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.role, UserRole::Admin);
}

#[tokio::test]
async fn test_login_failures_look_identical() {
    let app = TestApp::new();
    app.users.insert("jdoe", UserRole::Employee);

    let (wrong_status, wrong_body) = app
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": "jdoe", "password": "WrongPassword" }),
        ))
        .await;
    let (missing_status, missing_body) = app
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": "ghost", "password": PASSWORD }),
        ))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, missing_body);
    assert_eq!(wrong_body["error"]["code"], "INVALID_CREDENTIALS");
}

// =============================================================================
// Authentication middleware
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = app
        .send(json_request("POST", "/api/attendance/check-in", None, json!({})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let app = TestApp::new();

    let (status, body) = app
        .send(json_request("POST", "/api/attendance/check-in", Some("garbage"), json!({})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token_is_reported() {
    let app = TestApp::new();
    let user = app.users.insert("jdoe", UserRole::Employee);
    let expired = TokenService::new(SECRET, Duration::hours(-2))
        .issue_for(&user)
        .unwrap()
        .access_token;

    let (status, body) = app
        .send(get_request(&format!("/api/users/{}", user.id), Some(&expired)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_employee_reads_own_profile_but_not_others() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);
    let bob = app.users.insert("bob", UserRole::Employee);
    let token = app.token_for(&alice);

    let (own, body) = app
        .send(get_request(&format!("/api/users/{}", alice.id), Some(&token)))
        .await;
    let (other, _) = app
        .send(get_request(&format!("/api/users/{}", bob.id), Some(&token)))
        .await;

    assert_eq!(own, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(other, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_reads_any_profile() {
    let app = TestApp::new();
    let admin = app.users.insert("root", UserRole::Admin);
    let bob = app.users.insert("bob", UserRole::Employee);

    let (status, _) = app
        .send(get_request(&format!("/api/users/{}", bob.id), Some(&app.token_for(&admin))))
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_employee_cannot_promote_self() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);
    let payload = json!({
        "username": "alice",
        "full_name": "Alice",
        "email": "alice@example.com",
        "role": "admin"
    });

    let (status, _) = app
        .send(json_request(
            "PUT",
            &format!("/api/users/{}", alice.id),
            Some(&app.token_for(&alice)),
            payload,
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_own_profile() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);
    let payload = json!({
        "username": "alice2",
        "full_name": "Alice Two",
        "email": "alice2@example.com",
        "role": "employee",
        "password": ""
    });

    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/api/users/{}", alice.id),
            Some(&app.token_for(&alice)),
            payload,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice2");
}

#[tokio::test]
async fn test_malformed_user_id_is_validation_error() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);
    let token = app.token_for(&alice);

    for uri in ["/api/users/not-a-uuid", "/api/users/not-a-uuid/attendance", "/api/attendance/42"] {
        let (status, body) = app.send(get_request(uri, Some(&token))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{}", uri);
    }
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let app = TestApp::new();
    let admin = app.users.insert("root", UserRole::Admin);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/users/{}", Uuid::new_v4()))
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token_for(&admin)))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Attendance
// =============================================================================

#[tokio::test]
async fn test_check_in_then_duplicate_is_conflict() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);
    let token = app.token_for(&alice);

    let (first, body) = app
        .send(json_request(
            "POST",
            "/api/attendance/check-in",
            Some(&token),
            json!({ "location": "Jakarta", "notes": "Working from home" }),
        ))
        .await;
    let (second, second_body) = app
        .send(json_request(
            "POST",
            "/api/attendance/check-in",
            Some(&token),
            json!({ "location": "Jakarta" }),
        ))
        .await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(body["data"]["location_in"], "Jakarta");
    assert_eq!(body["data"]["status"], "present");
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(second_body["error"]["message"], "Already checked in today");
}

#[tokio::test]
async fn test_check_out_without_check_in_is_not_found() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/attendance/check-out",
            Some(&app.token_for(&alice)),
            json!({}),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_check_out_after_check_in() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);
    let token = app.token_for(&alice);

    app.send(json_request("POST", "/api/attendance/check-in", Some(&token), json!({})))
        .await;
    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/attendance/check-out",
            Some(&token),
            json!({ "location": "Home" }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["location_out"], "Home");
    assert!(body["data"]["check_out"].is_string());
}

#[tokio::test]
async fn test_attendance_record_visible_to_owner_and_admin_only() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);
    let bob = app.users.insert("bob", UserRole::Employee);
    let admin = app.users.insert("root", UserRole::Admin);
    let record = app.attendance.check_in(alice.id, None, None).await.unwrap();
    let uri = format!("/api/attendance/{}", record.id);

    let (owner, _) = app.send(get_request(&uri, Some(&app.token_for(&alice)))).await;
    let (stranger, _) = app.send(get_request(&uri, Some(&app.token_for(&bob)))).await;
    let (by_admin, _) = app.send(get_request(&uri, Some(&app.token_for(&admin)))).await;

    assert_eq!(owner, StatusCode::OK);
    assert_eq!(stranger, StatusCode::FORBIDDEN);
    assert_eq!(by_admin, StatusCode::OK);
}

#[tokio::test]
async fn test_history_defaults_to_current_month() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);

    let (status, body) = app
        .send(get_request(
            &format!("/api/users/{}/attendance", alice.id),
            Some(&app.token_for(&alice)),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(
        *app.attendance.last_window.lock().unwrap(),
        Some(AttendanceWindow::Month { year: 2024, month: 3 })
    );
}

#[tokio::test]
async fn test_history_date_takes_precedence() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);

    let (status, _) = app
        .send(get_request(
            &format!("/api/users/{}/attendance?date=2024-02-29&month=2024-01", alice.id),
            Some(&app.token_for(&alice)),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        *app.attendance.last_window.lock().unwrap(),
        Some(AttendanceWindow::Day(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
    );
}

#[tokio::test]
async fn test_history_rejects_bad_month() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);

    let (status, body) = app
        .send(get_request(
            &format!("/api/users/{}/attendance?month=2024-13", alice.id),
            Some(&app.token_for(&alice)),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(app.attendance.last_window.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_history_rejects_undecodable_query() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);

    let (status, body) = app
        .send(get_request(
            &format!("/api/users/{}/attendance?date=2024-03-01&date=2024-03-02", alice.id),
            Some(&app.token_for(&alice)),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_history_of_other_user_is_forbidden_for_employee() {
    let app = TestApp::new();
    let alice = app.users.insert("alice", UserRole::Employee);
    let bob = app.users.insert("bob", UserRole::Employee);

    let (status, _) = app
        .send(get_request(
            &format!("/api/users/{}/attendance?year=2024", bob.id),
            Some(&app.token_for(&alice)),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
