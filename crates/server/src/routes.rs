use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use common::types::{Health, Ready};
use models::{audit_logs, consignments, deliveries, inventory, issues, payments, users_extended, Resource};

use crate::state::AppState;

pub mod admin;
pub mod entities;

use entities::EntityRoutes;

pub const ENTITY_PREFIX: &str = "/api/v1/entities";

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// 200 once the database answers a ping, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Ready>) {
    let ping = match state.db.connection().await {
        Ok(conn) => conn.ping().await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match ping {
        Ok(()) => (StatusCode::OK, Json(Ready { status: "ok", database: Some("ok") })),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(Ready { status: "unavailable", database: Some("error") }))
        }
    }
}

fn entity_path<E: Resource>() -> String {
    format!("{}/{}", ENTITY_PREFIX, E::PATH)
}

/// Build the full application router: probes, entity CRUD and admin routes
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let entities = Router::new()
        .nest(&entity_path::<inventory::Entity>(), EntityRoutes::<inventory::Entity>::router())
        .nest(&entity_path::<consignments::Entity>(), EntityRoutes::<consignments::Entity>::router())
        .nest(&entity_path::<deliveries::Entity>(), EntityRoutes::<deliveries::Entity>::router())
        .nest(&entity_path::<payments::Entity>(), EntityRoutes::<payments::Entity>::router())
        .nest(&entity_path::<issues::Entity>(), EntityRoutes::<issues::Entity>::router())
        .nest(&entity_path::<audit_logs::Entity>(), EntityRoutes::<audit_logs::Entity>::router())
        .nest(&entity_path::<users_extended::Entity>(), EntityRoutes::<users_extended::Entity>::router());

    public
        .merge(entities)
        .nest("/api/v1/admin", admin::router())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
