// src/models/organization.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

/// Organização cliente (dona das avaliações).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    #[schema(example = "Distribuidora Andina")]
    pub name: String,
    #[schema(example = "Retail")]
    pub industry: Option<String>,
    #[schema(example = "Chile")]
    pub country: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha da listagem, com o total de avaliações.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub organization: Organization,
    #[schema(example = 2)]
    pub evaluation_count: i64,
}

/// Vazio é aceito (campo limpo no formulário).
fn validate_contact_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || email.trim().to_string().validate_email() {
        return Ok(());
    }
    let mut err = ValidationError::new("email");
    err.message = Some("E-mail de contato inválido.".into());
    Err(err)
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationPayload {
    #[validate(custom(function = "crate::models::evaluation::validate_name"))]
    #[schema(example = "Distribuidora Andina")]
    pub name: String,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub contact_name: Option<String>,
    #[validate(custom(function = "validate_contact_email"))]
    #[schema(example = "contacto@andina.cl")]
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

/// Campos ausentes mantêm o valor atual.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationPayload {
    #[validate(custom(function = "crate::models::evaluation::validate_name"))]
    pub name: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub contact_name: Option<String>,
    #[validate(custom(function = "validate_contact_email"))]
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

/// Texto aparado; vazio vira `None`.
pub(crate) fn clean(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
