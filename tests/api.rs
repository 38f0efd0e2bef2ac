//! End-to-end API tests.
//!
//! These tests need a PostgreSQL instance; set `TEST_DATABASE_URL` to run
//! them. Each test works on freshly randomized data, so no table cleanup
//! is required between runs. Without the variable the tests skip.

use axum::Router;
use axum_test::TestServer;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use eventcrew_core::core::config::{AuthConfig, MailConfig};
use eventcrew_core::core::middleware;
use eventcrew_core::features::auth::routes as auth_routes;
use eventcrew_core::features::auth::services::{AuthService, PasswordResetService, TokenService};
use eventcrew_core::features::auth::JwtValidator;
use eventcrew_core::features::events::{routes as event_routes, EventService};
use eventcrew_core::features::forms::{routes as form_routes, FormService};
use eventcrew_core::features::volunteers::{
    routes as volunteer_routes, RegistrationService, VolunteerService,
};
use eventcrew_core::modules::mailer::{LogMailer, Mailer};

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    sqlx::migrate!("./migrations").run(&pool).await.ok()?;
    Some(pool)
}

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret-0123456789abcdef".to_string(),
        token_ttl: Duration::from_secs(3600),
    }
}

fn build_app(pool: PgPool) -> Router {
    let auth_config = test_auth_config();
    let jwt_validator = Arc::new(JwtValidator::new(&auth_config.jwt_secret));
    let token_service = Arc::new(TokenService::new(&auth_config));
    let auth_service = Arc::new(AuthService::new(pool.clone(), token_service));

    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(MailConfig {
        from_email: "noreply@test.local".to_string(),
        app_url: "http://localhost:5173".to_string(),
    }));
    let reset_service = Arc::new(PasswordResetService::new(pool.clone(), mailer));

    let form_service = Arc::new(FormService::new(pool.clone()));
    let event_service = Arc::new(EventService::new(pool.clone()));
    let volunteer_service = Arc::new(VolunteerService::new(pool.clone()));
    let registration_service = Arc::new(RegistrationService::new(pool.clone()));

    let protected = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(form_routes::routes(form_service))
        .merge(event_routes::protected_routes(Arc::clone(&event_service)))
        .merge(volunteer_routes::protected_routes(
            Arc::clone(&volunteer_service),
            Arc::clone(&registration_service),
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    let public = Router::new()
        .merge(auth_routes::public_routes(auth_service, reset_service))
        .merge(event_routes::public_routes(event_service))
        .merge(volunteer_routes::public_routes(
            volunteer_service,
            registration_service,
        ));

    Router::new().merge(protected).merge(public)
}

async fn server() -> Option<TestServer> {
    let pool = test_pool().await?;
    Some(TestServer::new(build_app(pool)).unwrap())
}

/// Register an administrator and return a bearer token.
async fn admin_token(server: &TestServer) -> String {
    let email: String = SafeEmail().fake();
    let password = "Adm1nPassword";

    server
        .post("/api/auth/register")
        .json(&json!({ "name": "Test Admin", "email": &email, "password": password }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let login = server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": password }))
        .await;
    login.assert_status_ok();

    let body: Value = login.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> axum::http::HeaderValue {
    axum::http::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn future_date() -> String {
    (chrono::Utc::now().date_naive() + chrono::Days::new(30)).to_string()
}

#[tokio::test]
async fn created_entities_read_back_equal() {
    let Some(server) = server().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let token = admin_token(&server).await;

    let name = format!("Survey {}", uuid::Uuid::new_v4());
    let create = server
        .post("/api/forms")
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": &name,
            "questions": [
                { "text": "Why volunteer?", "questionType": "textual" },
                { "text": "Shirt size", "questionType": "single_choice",
                  "options": [{ "label": "S" }, { "label": "M" }] }
            ]
        }))
        .await;
    create.assert_status(axum::http::StatusCode::CREATED);
    let created: Value = create.json();
    let form_id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["name"], name.as_str());
    assert_eq!(created["data"]["questions"].as_array().unwrap().len(), 2);

    let fetched: Value = server
        .get(&format!("/api/forms/{}", form_id))
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
async fn duplicate_national_id_conflicts() {
    let Some(server) = server().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let national_id = uuid::Uuid::new_v4().simple().to_string();
    let payload = |email: &str| {
        json!({
            "name": "Ana",
            "email": &email,
            "emailConfirmation": &email,
            "nationalId": &national_id,
            "termsAccepted": true
        })
    };

    server
        .post("/api/volunteers")
        .json(&payload("ana1@example.com"))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    server
        .post("/api/volunteers")
        .json(&payload("ana2@example.com"))
        .await
        .assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn duplicate_event_registration_conflicts_but_second_event_works() {
    let Some(server) = server().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let token = admin_token(&server).await;

    let mut event_ids = Vec::new();
    for _ in 0..2 {
        let created: Value = server
            .post("/api/events")
            .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
            .json(&json!({
                "name": format!("Build day {}", uuid::Uuid::new_v4()),
                "eventDate": future_date(),
                "place": "Workshop"
            }))
            .await
            .json();
        event_ids.push(created["data"]["id"].as_str().unwrap().to_string());
    }

    let email: String = SafeEmail().fake();
    let name: String = Name().fake();
    let national_id = uuid::Uuid::new_v4().simple().to_string();
    let registration = |event_id: &str| {
        json!({
            "name": &name,
            "email": &email,
            "emailConfirmation": &email,
            "nationalId": &national_id,
            "eventId": event_id,
            "termsAccepted": true
        })
    };

    server
        .post("/api/registrations")
        .json(&registration(&event_ids[0]))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    // Same event again: conflict
    server
        .post("/api/registrations")
        .json(&registration(&event_ids[0]))
        .await
        .assert_status(axum::http::StatusCode::CONFLICT);

    // A different event: fine
    server
        .post("/api/registrations")
        .json(&registration(&event_ids[1]))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn past_event_date_rejected_today_accepted() {
    let Some(server) = server().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let token = admin_token(&server).await;

    let yesterday = (chrono::Utc::now().date_naive() - chrono::Days::new(1)).to_string();
    server
        .post("/api/events")
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": format!("Past event {}", uuid::Uuid::new_v4()),
            "eventDate": yesterday,
            "place": "Workshop"
        }))
        .await
        .assert_status(axum::http::StatusCode::BAD_REQUEST);

    let today = chrono::Utc::now().date_naive().to_string();
    server
        .post("/api/events")
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": format!("Today event {}", uuid::Uuid::new_v4()),
            "eventDate": today,
            "place": "Workshop"
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn deleting_form_cascades_to_questions_and_options() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let server = TestServer::new(build_app(pool.clone())).unwrap();
    let token = admin_token(&server).await;

    let created: Value = server
        .post("/api/forms")
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": format!("Cascade {}", uuid::Uuid::new_v4()),
            "questions": [
                { "text": "Pick", "questionType": "multiple_choice",
                  "options": [{ "label": "A" }, { "label": "B" }] }
            ]
        }))
        .await
        .json();
    let form_id: uuid::Uuid = created["data"]["id"].as_str().unwrap().parse().unwrap();

    server
        .delete(&format!("/api/forms/{}", form_id))
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    let orphans: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM questions q
        LEFT JOIN options o ON o.question_id = q.id
        WHERE q.form_id = $1
        "#,
    )
    .bind(form_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn multi_select_responses_deduplicate_in_detailed_view() {
    let Some(server) = server().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let token = admin_token(&server).await;

    // A form with one multi-select question
    let form: Value = server
        .post("/api/forms")
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": format!("Skills {}", uuid::Uuid::new_v4()),
            "questions": [
                { "text": "Skills", "questionType": "multiple_choice",
                  "options": [{ "label": "Driving" }, { "label": "Cooking" }, { "label": "First aid" }] }
            ]
        }))
        .await
        .json();
    let question = &form["data"]["questions"][0];
    let question_id = question["id"].as_str().unwrap();
    let option_ids: Vec<&str> = question["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();

    let event: Value = server
        .post("/api/events")
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": format!("Skill day {}", uuid::Uuid::new_v4()),
            "eventDate": future_date(),
            "place": "Workshop",
            "preFormId": form["data"]["id"]
        }))
        .await
        .json();
    let event_id = event["data"]["id"].as_str().unwrap();

    let email: String = SafeEmail().fake();
    let registration: Value = server
        .post("/api/registrations")
        .json(&json!({
            "name": "Ana",
            "email": &email,
            "emailConfirmation": &email,
            "nationalId": uuid::Uuid::new_v4().simple().to_string(),
            "eventId": event_id,
            "termsAccepted": true
        }))
        .await
        .json();
    let registration_id = registration["data"]["id"].as_str().unwrap();

    // Two submissions for the same question, overlapping options
    server
        .post(&format!("/api/registrations/{}/responses", registration_id))
        .json(&json!({
            "phase": "pre",
            "answers": { question_id: [option_ids[0], option_ids[1]] }
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
    server
        .post(&format!("/api/registrations/{}/responses", registration_id))
        .json(&json!({
            "phase": "pre",
            "answers": { question_id: [option_ids[1], option_ids[2]] }
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let detailed: Value = server
        .get(&format!("/api/events/{}/registrations/detailed", event_id))
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .await
        .json();

    let answers = detailed["data"][0]["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 1, "one deduplicated answer per question");
    let labels: Vec<&str> = answers[0]["optionLabels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l.as_str().unwrap())
        .collect();
    assert_eq!(labels.len(), 3, "distinct labels accumulate: {:?}", labels);
    assert!(detailed["data"][0]["preCompleted"].as_bool().unwrap());
}

#[tokio::test]
async fn reset_token_single_use_and_password_rotation() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let server = TestServer::new(build_app(pool.clone())).unwrap();

    let email: String = SafeEmail().fake();
    let old_password = "OldPassw0rd";
    server
        .post("/api/auth/register")
        .json(&json!({ "name": "Reset Admin", "email": &email, "password": old_password }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    // Request a reset; same generic answer regardless of the email
    let known = server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await;
    known.assert_status_ok();
    let unknown = server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    unknown.assert_status_ok();
    let known_body: Value = known.json();
    let unknown_body: Value = unknown.json();
    assert_eq!(known_body["message"], unknown_body["message"]);

    // The mailer is a logging stub, so read the minted token off the table
    let token: String = sqlx::query_scalar(
        r#"
        SELECT t.token
        FROM password_reset_tokens t
        JOIN administrators a ON a.id = t.administrator_id
        WHERE a.email = $1 AND t.used = FALSE
        "#,
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();

    let validation: Value = server
        .post("/api/auth/validate-reset-token")
        .json(&json!({ "token": &token }))
        .await
        .json();
    assert_eq!(validation["data"]["valid"], true);

    let new_password = "NewPassw0rd";
    server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": &token, "newPassword": new_password }))
        .await
        .assert_status_ok();

    // Used token is inert
    let validation: Value = server
        .post("/api/auth/validate-reset-token")
        .json(&json!({ "token": &token }))
        .await
        .json();
    assert_eq!(validation["data"]["valid"], false);
    server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": &token, "newPassword": "AnotherPassw0rd1" }))
        .await
        .assert_status(axum::http::StatusCode::UNAUTHORIZED);

    // Old password no longer authenticates, new one does
    server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": old_password }))
        .await
        .assert_status(axum::http::StatusCode::UNAUTHORIZED);
    server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": new_password }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn event_stats_count_accepted_registrations() {
    let Some(server) = server().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let token = admin_token(&server).await;

    let event: Value = server
        .post("/api/events")
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": format!("Stats day {}", uuid::Uuid::new_v4()),
            "eventDate": future_date(),
            "place": "Workshop"
        }))
        .await
        .json();
    let event_id = event["data"]["id"].as_str().unwrap();

    let mut registration_ids = Vec::new();
    for _ in 0..3 {
        let email: String = SafeEmail().fake();
        let registration: Value = server
            .post("/api/registrations")
            .json(&json!({
                "name": "Vol",
                "email": &email,
                "emailConfirmation": &email,
                "nationalId": uuid::Uuid::new_v4().simple().to_string(),
                "eventId": event_id,
                "termsAccepted": true
            }))
            .await
            .json();
        registration_ids.push(registration["data"]["id"].as_str().unwrap().to_string());
    }

    server
        .patch(&format!("/api/registrations/{}/acceptance", registration_ids[0]))
        .add_header(axum::http::header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "accepted": true }))
        .await
        .assert_status_ok();

    // The test database may hold events from earlier runs; page until found
    let mut entry = None;
    for page in 1..=50 {
        let stats: Value = server
            .get(&format!("/api/events/stats?page={}&page_size=100", page))
            .await
            .json();
        let events = stats["data"].as_array().unwrap().clone();
        if events.is_empty() {
            break;
        }
        if let Some(found) = events.iter().find(|e| e["id"] == event["data"]["id"]) {
            entry = Some(found.clone());
            break;
        }
    }
    let entry = entry.expect("event present in stats");
    assert_eq!(entry["totalRegistrations"], 3);
    assert_eq!(entry["acceptedRegistrations"], 1);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let Some(server) = server().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    server
        .get("/api/volunteers")
        .await
        .assert_status(axum::http::StatusCode::UNAUTHORIZED);

    server
        .post("/api/forms")
        .json(&json!({ "name": "x", "questions": [] }))
        .await
        .assert_status(axum::http::StatusCode::UNAUTHORIZED);
}
