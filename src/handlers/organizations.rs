// src/handlers/organizations.rs

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
    models::organization::{
        CreateOrganizationPayload, Organization, OrganizationSummary, UpdateOrganizationPayload,
    },
};

// GET /api/organizations
#[utoipa::path(
    get,
    path = "/api/organizations",
    tag = "Organizations",
    responses((status = 200, description = "Organizações com o total de avaliações", body = [OrganizationSummary])),
    security(("api_jwt" = []))
)]
pub async fn list_organizations(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<OrganizationSummary>>, AppError> {
    Ok(Json(app_state.organization_service.list().await?))
}

// POST /api/organizations
#[utoipa::path(
    post,
    path = "/api/organizations",
    tag = "Organizations",
    request_body = CreateOrganizationPayload,
    responses(
        (status = 201, description = "Organização criada", body = Organization),
        (status = 400, description = "Nome ou e-mail inválido"),
        (status = 403, description = "Visualizadores não criam organizações")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_organization(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOrganizationPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_editor()?;
    let organization = app_state.organization_service.create(payload, user.id).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

// GET /api/organizations/{org_id}
#[utoipa::path(
    get,
    path = "/api/organizations/{org_id}",
    tag = "Organizations",
    params(("org_id" = Uuid, Path, description = "ID da organização")),
    responses(
        (status = 200, description = "Organização", body = Organization),
        (status = 404, description = "Organização não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_organization(
    State(app_state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Organization>, AppError> {
    Ok(Json(app_state.organization_service.get(org_id).await?))
}

// PATCH /api/organizations/{org_id}
#[utoipa::path(
    patch,
    path = "/api/organizations/{org_id}",
    tag = "Organizations",
    request_body = UpdateOrganizationPayload,
    params(("org_id" = Uuid, Path, description = "ID da organização")),
    responses(
        (status = 200, description = "Organização atualizada", body = Organization),
        (status = 400, description = "Nome ou e-mail inválido"),
        (status = 403, description = "Visualizadores não alteram organizações"),
        (status = 404, description = "Organização não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_organization(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<UpdateOrganizationPayload>,
) -> Result<Json<Organization>, AppError> {
    user.require_editor()?;
    Ok(Json(app_state.organization_service.update(org_id, payload).await?))
}

// DELETE /api/organizations/{org_id}
#[utoipa::path(
    delete,
    path = "/api/organizations/{org_id}",
    tag = "Organizations",
    params(("org_id" = Uuid, Path, description = "ID da organização")),
    responses(
        (status = 204, description = "Organização e avaliações removidas"),
        (status = 403, description = "Visualizadores não removem organizações"),
        (status = 404, description = "Organização não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_organization(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(org_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_editor()?;
    app_state.organization_service.delete(org_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
