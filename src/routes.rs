// src/routes.rs

use axum::{
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Liveness + conexão com o banco.
async fn health(State(app_state): State<AppState>) -> (StatusCode, &'static str) {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("🔥 Health check sem banco: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "DB indisponível")
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    // Taxonomia: leitura para todos os autenticados, importação só admin
    let pcf_routes = Router::new()
        .route("/", get(handlers::taxonomy::search_or_roots))
        .route("/import", post(handlers::taxonomy::import_taxonomy))
        .route("/{node_id}", get(handlers::taxonomy::get_node))
        .route("/{node_id}/children", get(handlers::taxonomy::get_children))
        .route("/{node_id}/metrics", get(handlers::taxonomy::get_metrics));

    let organization_routes = Router::new()
        .route(
            "/",
            get(handlers::organizations::list_organizations)
                .post(handlers::organizations::create_organization),
        )
        .route(
            "/{org_id}",
            get(handlers::organizations::get_organization)
                .patch(handlers::organizations::update_organization)
                .delete(handlers::organizations::delete_organization),
        )
        .route(
            "/{org_id}/evaluations",
            post(handlers::evaluations::create_evaluation)
                .get(handlers::evaluations::list_evaluations),
        )
        .route("/{org_id}/compare", get(handlers::analytics::compare_evaluations))
        .route("/{org_id}/trend", get(handlers::analytics::get_trend));

    let evaluation_routes = Router::new()
        .route("/{eval_id}", get(handlers::evaluations::get_evaluation))
        .route("/{eval_id}/status", patch(handlers::evaluations::set_status))
        .route("/{eval_id}/seed", post(handlers::evaluations::seed_evaluation))
        .route("/{eval_id}/entries", get(handlers::evaluations::list_entries))
        .route(
            "/{eval_id}/entries/{entry_id}",
            patch(handlers::evaluations::update_entry),
        )
        .route("/{eval_id}/tree", get(handlers::analytics::get_tree))
        .route("/{eval_id}/stats", get(handlers::analytics::get_stats))
        .route("/{eval_id}/gaps", get(handlers::analytics::get_gaps))
        .route("/{eval_id}/suggestions", post(handlers::analytics::suggest_patches));

    let protected = Router::new()
        .nest("/api/pcf", pcf_routes)
        .nest("/api/organizations", organization_routes)
        .nest("/api/evaluations", evaluation_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(health))
        .merge(protected)
        .with_state(app_state)
}
