// src/handlers/evaluations.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::evaluation::{
        CreateEvaluationPayload, CreatedEvaluation, EntryDetail, EntryPatch, Evaluation,
        SeedSummary, UpdateEvaluationStatusPayload,
    },
};

// =============================================================================
//  AVALIAÇÕES
// =============================================================================

// POST /api/organizations/{org_id}/evaluations
#[utoipa::path(
    post,
    path = "/api/organizations/{org_id}/evaluations",
    tag = "Evaluations",
    request_body = CreateEvaluationPayload,
    params(("org_id" = Uuid, Path, description = "ID da organização")),
    responses(
        (status = 201, description = "Avaliação criada com as entradas do escopo", body = CreatedEvaluation),
        (status = 400, description = "Profundidade ou categorias inválidas"),
        (status = 403, description = "Visualizadores não criam avaliações"),
        (status = 404, description = "Organização não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_evaluation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateEvaluationPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_editor()?;
    let created = app_state
        .evaluation_service
        .create_evaluation(org_id, payload, user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/organizations/{org_id}/evaluations
#[utoipa::path(
    get,
    path = "/api/organizations/{org_id}/evaluations",
    tag = "Evaluations",
    params(("org_id" = Uuid, Path, description = "ID da organização")),
    responses((status = 200, description = "Avaliações, mais recentes primeiro", body = [Evaluation])),
    security(("api_jwt" = []))
)]
pub async fn list_evaluations(
    State(app_state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Vec<Evaluation>>, AppError> {
    Ok(Json(app_state.evaluation_service.list_evaluations(org_id).await?))
}

// GET /api/evaluations/{eval_id}
#[utoipa::path(
    get,
    path = "/api/evaluations/{eval_id}",
    tag = "Evaluations",
    params(("eval_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação", body = Evaluation),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_evaluation(
    State(app_state): State<AppState>,
    Path(eval_id): Path<Uuid>,
) -> Result<Json<Evaluation>, AppError> {
    Ok(Json(app_state.evaluation_service.get_evaluation(eval_id).await?))
}

// PATCH /api/evaluations/{eval_id}/status
#[utoipa::path(
    patch,
    path = "/api/evaluations/{eval_id}/status",
    tag = "Evaluations",
    request_body = UpdateEvaluationStatusPayload,
    params(("eval_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Status atualizado", body = Evaluation),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(eval_id): Path<Uuid>,
    Json(payload): Json<UpdateEvaluationStatusPayload>,
) -> Result<Json<Evaluation>, AppError> {
    user.require_editor()?;
    Ok(Json(app_state.evaluation_service.set_status(eval_id, payload.status).await?))
}

// POST /api/evaluations/{eval_id}/seed
#[utoipa::path(
    post,
    path = "/api/evaluations/{eval_id}/seed",
    tag = "Evaluations",
    params(("eval_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Entradas faltantes criadas (idempotente)", body = SeedSummary),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn seed_evaluation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(eval_id): Path<Uuid>,
) -> Result<Json<SeedSummary>, AppError> {
    user.require_editor()?;
    Ok(Json(app_state.evaluation_service.seed_evaluation(eval_id).await?))
}

// =============================================================================
//  ENTRADAS
// =============================================================================

// GET /api/evaluations/{eval_id}/entries
#[utoipa::path(
    get,
    path = "/api/evaluations/{eval_id}/entries",
    tag = "Entries",
    params(("eval_id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Entradas em ordem da taxonomia", body = [EntryDetail]),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    Path(eval_id): Path<Uuid>,
) -> Result<Json<Vec<EntryDetail>>, AppError> {
    Ok(Json(app_state.evaluation_service.get_entries(eval_id).await?))
}

// PATCH /api/evaluations/{eval_id}/entries/{entry_id}
#[utoipa::path(
    patch,
    path = "/api/evaluations/{eval_id}/entries/{entry_id}",
    tag = "Entries",
    request_body = EntryPatch,
    params(
        ("eval_id" = Uuid, Path, description = "ID da avaliação"),
        ("entry_id" = Uuid, Path, description = "ID da entrada")
    ),
    responses(
        (status = 200, description = "Entrada atualizada", body = EntryDetail),
        (status = 400, description = "Status de maturidade inválido"),
        (status = 403, description = "Visualizadores não editam"),
        (status = 404, description = "Entrada não pertence à avaliação")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_entry(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((eval_id, entry_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<EntryPatch>,
) -> Result<Json<EntryDetail>, AppError> {
    user.require_editor()?;
    let updated = app_state
        .evaluation_service
        .update_entry(eval_id, entry_id, patch, user.id)
        .await?;
    Ok(Json(updated))
}
