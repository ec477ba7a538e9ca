// src/handlers/taxonomy.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::taxonomy::{ImportSummary, Metric, NodeDetail, NodeList, NodePage, NodeSearch, TaxonomyImportPayload},
};

// GET /api/pcf
#[utoipa::path(
    get,
    path = "/api/pcf",
    tag = "PCF",
    params(
        ("q" = Option<String>, Query, description = "Texto buscado em ID, nome e descrição (mín. 2 caracteres)"),
        ("category" = Option<i16>, Query, description = "Filtra pela categoria (1-13)"),
        ("level" = Option<i16>, Query, description = "Filtra pelo nível (1-5)"),
        ("limit" = Option<usize>, Query, description = "Tamanho da página (padrão 100, máx. 500)"),
        ("offset" = Option<usize>, Query, description = "Deslocamento")
    ),
    responses(
        (status = 200, description = "Sem `q`: categorias de nível 1. Com `q`: página de resultados", body = NodePage),
        (status = 400, description = "Busca curta demais")
    ),
    security(("api_jwt" = []))
)]
pub async fn search_or_roots(
    State(app_state): State<AppState>,
    Query(params): Query<NodeSearch>,
) -> Result<impl IntoResponse, AppError> {
    if params.q.is_none() {
        let roots: NodeList = app_state.taxonomy_service.roots().await?;
        return Ok(Json(roots).into_response());
    }
    let page = app_state.taxonomy_service.search(&params).await?;
    Ok(Json(page).into_response())
}

// GET /api/pcf/{node_id}
#[utoipa::path(
    get,
    path = "/api/pcf/{node_id}",
    tag = "PCF",
    params(("node_id" = String, Path, description = "ID hierárquico, ex.: 1.1.2")),
    responses(
        (status = 200, description = "Elemento com contadores", body = NodeDetail),
        (status = 404, description = "Elemento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_node(
    State(app_state): State<AppState>,
    Path(node_id): Path<String>,
) -> Result<Json<NodeDetail>, AppError> {
    Ok(Json(app_state.taxonomy_service.get_node(&node_id).await?))
}

// GET /api/pcf/{node_id}/children
#[utoipa::path(
    get,
    path = "/api/pcf/{node_id}/children",
    tag = "PCF",
    params(("node_id" = String, Path, description = "ID hierárquico do pai")),
    responses(
        (status = 200, description = "Filhos em ordem da taxonomia", body = NodeList),
        (status = 404, description = "Elemento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_children(
    State(app_state): State<AppState>,
    Path(node_id): Path<String>,
) -> Result<Json<NodeList>, AppError> {
    Ok(Json(app_state.taxonomy_service.get_children(&node_id).await?))
}

// GET /api/pcf/{node_id}/metrics
#[utoipa::path(
    get,
    path = "/api/pcf/{node_id}/metrics",
    tag = "PCF",
    params(("node_id" = String, Path, description = "ID hierárquico")),
    responses(
        (status = 200, description = "Métricas de referência do elemento", body = [Metric]),
        (status = 404, description = "Elemento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_metrics(
    State(app_state): State<AppState>,
    Path(node_id): Path<String>,
) -> Result<Json<Vec<Metric>>, AppError> {
    Ok(Json(app_state.taxonomy_service.get_metrics(&node_id).await?))
}

// POST /api/pcf/import
#[utoipa::path(
    post,
    path = "/api/pcf/import",
    tag = "PCF",
    request_body = TaxonomyImportPayload,
    responses(
        (status = 201, description = "Importação aplicada", body = ImportSummary),
        (status = 400, description = "ID hierárquico inválido"),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Pai ou nó da métrica inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_taxonomy(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<TaxonomyImportPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_admin()?;
    let summary = app_state.taxonomy_service.import(payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}
