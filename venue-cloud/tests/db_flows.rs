//! Handler tests against a migrated Postgres (`DATABASE_URL`).
//!
//! `#[sqlx::test]` creates a fresh database per test and applies
//! `./migrations`.

mod common;

use std::time::Duration;

use axum::body::Body;
use common::*;
use http::{Request, StatusCode, header};
use serde_json::json;
use sqlx::PgPool;
use venue_cloud::auth::session::AdminSession;
use venue_cloud::util::{hash_password, verify_password};

const ADMIN_PASSWORD: &str = "Correct-Horse-1";

async fn seed_order(pool: &PgPool) {
    sqlx::query(
        "INSERT INTO events (id, business_id, title, date, time, location, created_at) \
         VALUES ('evt-1', 'biz-1', 'New Year Gala', '2026-12-31', '22:00', 'Main Hall', 1)",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO sections (id, event_id, name) VALUES ('sec-vip', 'evt-1', 'VIP')")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO table_bookings \
             (id, order_id, event_id, section_id, table_number, amount, customer_name, customer_email, created_at) \
         VALUES \
             ('b1', 'ORD1', 'evt-1', 'sec-vip', '12', 50.00, 'Ada', 'ada@example.com', 1), \
             ('b2', 'ORD1', 'evt-1', 'sec-vip', '14', 50.00, 'Ada', 'ada@example.com', 2)",
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_user(pool: &PgPool, id: &str, email: &str, password: &str, is_admin: bool) {
    sqlx::query(
        "INSERT INTO users (id, email, name, password_hash, is_platform_admin, created_at) \
         VALUES ($1, $2, 'Test User', $3, $4, 1)",
    )
    .bind(id)
    .bind(email)
    .bind(hash_password(password).unwrap())
    .bind(is_admin)
    .execute(pool)
    .await
    .unwrap();
}

async fn stored_hash(pool: &PgPool, id: &str) -> String {
    sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn reset_request(token: &str, password: &str) -> Request<Body> {
    json_request(
        "POST",
        "/api/auth/reset-password",
        json!({ "token": token, "password": password }),
    )
}

fn login_request(email: &str, password: &str) -> Request<Body> {
    json_request(
        "POST",
        "/api/admin/login",
        json!({ "email": email, "password": password }),
    )
}

// ========== Booking summary ==========

#[sqlx::test(migrations = "./migrations")]
async fn test_two_vip_tables_summarize_to_one_order(pool: PgPool) {
    seed_order(&pool).await;
    let state = state_with_pool(pool);

    let response = send(app(&state), get("/api/checkout/get-table-booking?orderId=ORD1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["orderId"], "ORD1");
    assert_eq!(body["totalTables"], 2);
    assert_eq!(body["sectionName"], "2x VIP");
    assert!(body["amount"].is_number());
    assert_eq!(body["amount"].as_f64(), Some(100.0));
    assert_eq!(body["tableNumbers"], json!(["12", "14"]));
    assert_eq!(body["bookingIds"], json!(["b1", "b2"]));
    assert_eq!(body["event"]["title"], "New Year Gala");
    assert_eq!(body["customerEmail"], "ada@example.com");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_order_without_bookings_is_not_found(pool: PgPool) {
    seed_order(&pool).await;
    let state = state_with_pool(pool);

    let response = send(app(&state), get("/api/checkout/get-table-booking?orderId=ORD404")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["code"], 4002);
    assert_eq!(body["message"], "Booking not found");
}

// ========== Password reset ==========

#[sqlx::test(migrations = "./migrations")]
async fn test_reset_token_works_exactly_once(pool: PgPool) {
    seed_user(&pool, "user-1", "owner@example.com", "Old-password-1", false).await;
    let state = state_with_pool(pool.clone());
    let token = state
        .tokens
        .issue_reset_token("user-1", "owner@example.com", Duration::from_secs(600))
        .unwrap();

    let response = send(app(&state), reset_request(&token, "Brand-new-pass-2")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(verify_password("Brand-new-pass-2", &stored_hash(&pool, "user-1").await));

    // Same token again, with a different password: refused and nothing changes
    let response = send(app(&state), reset_request(&token, "Third-attempt-3")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], 1009);
    assert_eq!(body["message"], "Invalid or expired reset token");
    assert!(verify_password("Brand-new-pass-2", &stored_hash(&pool, "user-1").await));

    let consumed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consumed_reset_tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(consumed, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reset_for_deleted_user_is_an_invalid_token(pool: PgPool) {
    let state = state_with_pool(pool.clone());
    let token = state
        .tokens
        .issue_reset_token("user-gone", "gone@example.com", Duration::from_secs(600))
        .unwrap();

    let response = send(app(&state), reset_request(&token, "Brand-new-pass-2")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], 1009);

    let consumed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consumed_reset_tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(consumed, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_password_answer_does_not_depend_on_account(pool: PgPool) {
    seed_user(&pool, "user-1", "owner@example.com", "Old-password-1", false).await;
    let state = state_with_pool(pool);

    let known = send(
        app(&state),
        json_request("POST", "/api/auth/forgot-password", json!({ "email": "Owner@Example.com" })),
    )
    .await;
    let unknown = send(
        app(&state),
        json_request("POST", "/api/auth/forgot-password", json!({ "email": "nobody@example.com" })),
    )
    .await;

    assert_eq!(known.status(), StatusCode::OK);
    assert_eq!(unknown.status(), StatusCode::OK);
    assert_eq!(json_body(known).await, json_body(unknown).await);
}

// ========== Admin login ==========

#[sqlx::test(migrations = "./migrations")]
async fn test_every_failed_login_looks_the_same(pool: PgPool) {
    seed_user(&pool, "admin-1", "root@example.com", ADMIN_PASSWORD, true).await;
    seed_user(&pool, "user-2", "staff@example.com", ADMIN_PASSWORD, false).await;
    let state = state_with_pool(pool.clone());

    let mut bodies = Vec::new();
    for (email, password) in [
        ("root@example.com", "Wrong-password-9"),
        ("nobody@example.com", ADMIN_PASSWORD),
        ("staff@example.com", ADMIN_PASSWORD),
    ] {
        let response = send(app(&state), login_request(email, password)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{email}");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        bodies.push(json_body(response).await);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
    assert_eq!(bodies[0]["code"], 1002);

    let failed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM admin_login_logs WHERE status = 'failed'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(failed, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_login_sets_session_cookie(pool: PgPool) {
    seed_user(&pool, "admin-1", "root@example.com", ADMIN_PASSWORD, true).await;
    let state = state_with_pool(pool.clone());

    let response = send(app(&state), login_request("ROOT@example.com", ADMIN_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_owned();
    assert!(cookie.starts_with("admin_session="));
    assert!(cookie.contains("HttpOnly"));
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], "admin-1");

    let logs = Request::builder()
        .uri("/api/admin/login-logs?includeStats=true")
        .header(header::COOKIE, cookie.split(';').next().unwrap())
        .body(Body::empty())
        .unwrap();
    let response = send(app(&state), logs).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["logs"][0]["status"], "success");
    assert_eq!(body["stats"]["successful"], 1);
}

// ========== Settings ==========

#[sqlx::test(migrations = "./migrations")]
async fn test_settings_patch_persists_and_returns_numbers(pool: PgPool) {
    let state = state_with_pool(pool);
    let token = state
        .tokens
        .issue_session(&AdminSession {
            user_id: "admin-1".into(),
            email: "root@example.com".into(),
            name: "Root".into(),
        })
        .unwrap();
    let authorized = |mut request: Request<Body>| {
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        request
    };

    let patch = json_request(
        "PATCH",
        "/api/admin/settings",
        json!({ "platformFeePercent": 7.5, "maintenanceMode": true }),
    );
    let response = send(app(&state), authorized(patch)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(app(&state), authorized(get("/api/admin/settings"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["platformFeePercent"].as_f64(), Some(7.5));
    assert_eq!(body["maintenanceMode"], true);
    assert_eq!(body["subscriptionTrialDays"], 14);
    assert!(body["updatedAt"].is_number());
}
