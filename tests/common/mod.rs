#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Duration;
use internship_server::core::{AppState, CredentialCodec};
use serde_json::{Value, json};
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";
pub const TEST_PASSWORD: &str = "Password123";

fn test_codec() -> CredentialCodec {
    // costo bcrypt minimo per tenere i test veloci
    CredentialCodec::new(TEST_JWT_SECRET, Duration::minutes(30), 4)
}

/// Crea un AppState in memoria per i test
///
/// # Returns
/// Arc<AppState> con registrazione admin disabilitata
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::in_memory(test_codec(), false))
}

/// Come `create_test_state` ma con `role: admin` ammesso in registrazione
pub fn create_test_state_allowing_admins() -> Arc<AppState> {
    Arc::new(AppState::in_memory(test_codec(), true))
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `state` - AppState da utilizzare per il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = internship_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Registra un utente e restituisce il JSON dell'utente creato
pub async fn register(server: &TestServer, name: &str, email: &str, role: &str) -> Value {
    let response = server
        .post("/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": TEST_PASSWORD,
            "role": role
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// Login con la password di test, restituisce l'access token
pub async fn login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    body["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}

/// Registra e fa login, restituisce (user_id, token)
pub async fn register_and_login(server: &TestServer, name: &str, email: &str, role: &str) -> (i64, String) {
    let user = register(server, name, email, role).await;
    let token = login(server, email).await;
    (user["id"].as_i64().expect("id should be a number"), token)
}

/// Pubblica un'offerta con il token di un'azienda
pub async fn create_offer(server: &TestServer, token: &str, title: &str, category: &str) -> Value {
    let response = server
        .post("/offers")
        .authorization_bearer(token)
        .json(&json!({
            "title": title,
            "description": "Internship on real projects",
            "category": category,
            "duration": "6 months",
            "location": "Tunis",
            "price": "800 TND",
            "features": ["mentoring", "remote friday"]
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// Candidatura di uno studente, restituisce la response grezza
pub async fn apply(server: &TestServer, token: &str, offer_id: i64) -> axum_test::TestResponse {
    server
        .post("/applications")
        .authorization_bearer(token)
        .json(&json!({ "offer_id": offer_id }))
        .await
}

/// Cambia lo stato di una candidatura, restituisce la response grezza
pub async fn set_status(
    server: &TestServer,
    token: &str,
    application_id: i64,
    status: &str,
) -> axum_test::TestResponse {
    server
        .patch(&format!("/applications/{}", application_id))
        .authorization_bearer(token)
        .json(&json!({ "status": status }))
        .await
}
