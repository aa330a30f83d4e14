use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use common::response::not_found_response;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod enterprise;
pub mod health;

async fn fallback() -> Response {
    not_found_response()
}

/// Build the application router: the welcome root, health, the enterprise
/// routes under `/api/v1` and the Swagger UI at `/docs`.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route(
            "/EMPRESA_ESPECIFICA/:id",
            get(enterprise::get_enterprise)
                .patch(enterprise::update_enterprise)
                .delete(enterprise::delete_enterprise),
        )
        .route("/EMPRESAS", get(enterprise::list_enterprises))
        .route("/EMPRESA_FILTRO_POR_CATEGORIA/:id_categoria", get(enterprise::list_by_category))
        .route("/REGISTRAR_EMPRESA", post(enterprise::register_enterprise));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
