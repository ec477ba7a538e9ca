// src/handlers/analytics.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        classification::{CandidatePatch, SuggestionPayload},
        stats::{
            CompareQuery, ComparisonReport, EvaluationStats, GapOptions, GapQuery, GapReport,
            StatsQuery, TrendPoint,
        },
        tree::TreeNode,
    },
};

// GET /api/evaluations/{eval_id}/tree
#[utoipa::path(
    get,
    path = "/api/evaluations/{eval_id}/tree",
    tag = "Analytics",
    params(("eval_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Árvore pai -> filhos (níveis 1 e 2 expandidos)", body = [TreeNode]),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tree(
    State(app_state): State<AppState>,
    Path(eval_id): Path<Uuid>,
) -> Result<Json<Vec<TreeNode>>, AppError> {
    Ok(Json(app_state.evaluation_service.get_tree(eval_id).await?))
}

// GET /api/evaluations/{eval_id}/stats
#[utoipa::path(
    get,
    path = "/api/evaluations/{eval_id}/stats",
    tag = "Analytics",
    params(
        ("eval_id" = Uuid, Path, description = "ID da avaliação"),
        ("groupBy" = Option<String>, Query, description = "category | level")
    ),
    responses(
        (status = 200, description = "Agregados da avaliação", body = EvaluationStats),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    Path(eval_id): Path<Uuid>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<EvaluationStats>, AppError> {
    Ok(Json(app_state.evaluation_service.get_stats(eval_id, query.group_by).await?))
}

// GET /api/evaluations/{eval_id}/gaps
#[utoipa::path(
    get,
    path = "/api/evaluations/{eval_id}/gaps",
    tag = "Analytics",
    params(
        ("eval_id" = Uuid, Path, description = "ID da avaliação"),
        ("minLevel" = Option<i16>, Query, description = "Nível mínimo (padrão 3)"),
        ("statuses" = Option<String>, Query, description = "Status separados por vírgula (padrão inexistente,parcial)")
    ),
    responses(
        (status = 200, description = "Lacunas e ranking de categorias", body = GapReport),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_gaps(
    State(app_state): State<AppState>,
    Path(eval_id): Path<Uuid>,
    Query(query): Query<GapQuery>,
) -> Result<Json<GapReport>, AppError> {
    let options = GapOptions::from_query(&query)?;
    Ok(Json(app_state.evaluation_service.get_gaps(eval_id, &options).await?))
}

// GET /api/organizations/{org_id}/compare
#[utoipa::path(
    get,
    path = "/api/organizations/{org_id}/compare",
    tag = "Analytics",
    params(
        ("org_id" = Uuid, Path, description = "ID da organização"),
        ("a" = Uuid, Query, description = "Avaliação de referência"),
        ("b" = Uuid, Query, description = "Avaliação comparada")
    ),
    responses(
        (status = 200, description = "Comparação B - A", body = ComparisonReport),
        (status = 400, description = "Avaliações de organizações diferentes"),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn compare_evaluations(
    State(app_state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ComparisonReport>, AppError> {
    let report = app_state
        .evaluation_service
        .compare_evaluations(org_id, query.a, query.b)
        .await?;
    Ok(Json(report))
}

// GET /api/organizations/{org_id}/trend
#[utoipa::path(
    get,
    path = "/api/organizations/{org_id}/trend",
    tag = "Analytics",
    params(("org_id" = Uuid, Path, description = "ID da organização")),
    responses((status = 200, description = "Média por avaliação ao longo do tempo", body = [TrendPoint])),
    security(("api_jwt" = []))
)]
pub async fn get_trend(
    State(app_state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Vec<TrendPoint>>, AppError> {
    Ok(Json(app_state.evaluation_service.trend(org_id).await?))
}

// POST /api/evaluations/{eval_id}/suggestions
#[utoipa::path(
    post,
    path = "/api/evaluations/{eval_id}/suggestions",
    tag = "Analytics",
    request_body = SuggestionPayload,
    params(("eval_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Patches candidatos (nada é gravado)", body = [CandidatePatch]),
        (status = 403, description = "Visualizadores não recebem sugestões de edição"),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn suggest_patches(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(eval_id): Path<Uuid>,
    Json(payload): Json<SuggestionPayload>,
) -> Result<Json<Vec<CandidatePatch>>, AppError> {
    user.require_editor()?;
    Ok(Json(app_state.evaluation_service.suggest(eval_id, payload).await?))
}
