//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes(state.clone()))
        .nest("/offers", configure_offer_routes(state.clone()))
        .nest("/applications", configure_application_routes(state.clone()))
        .nest("/companies", configure_company_routes(state.clone()))
        .nest("/admin", configure_admin_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Configura le routes di autenticazione (login, register, me)
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    let public_routes = Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user));

    let protected_routes = Router::new()
        .route("/me", get(get_me))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(protected_routes)
}

/// Configura le routes delle offerte: lettura pubblica, scrittura autenticata
fn configure_offer_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    let public_routes = Router::new()
        .route("/", get(list_offers))
        .route("/{offer_id}", get(get_offer));

    let protected_routes = Router::new()
        .route("/", post(create_offer))
        .route("/company", get(list_company_offers))
        .route("/{offer_id}", axum::routing::put(update_offer).delete(delete_offer))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(protected_routes)
}

/// Configura le routes delle candidature
fn configure_application_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", post(apply_to_offer))
        .route("/my-applications", get(list_my_applications))
        .route("/company", get(list_company_applications))
        .route(
            "/{application_id}",
            get(get_application).patch(update_application_status),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes dei profili aziendali
fn configure_company_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    let public_routes = Router::new().route("/{company_id}", get(get_company));

    let protected_routes = Router::new()
        .route("/{company_id}", patch(update_company))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(protected_routes)
}

/// Configura le routes di amministrazione
fn configure_admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}", axum::routing::delete(delete_user))
        .route("/companies", get(list_companies))
        .route("/applications", get(list_applications))
        .route("/stats", get(get_stats))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
