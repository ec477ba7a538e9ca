// src/services/organization_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{organization_repo::OrganizationFields, OrganizationRepository},
    models::organization::{
        clean, CreateOrganizationPayload, Organization, OrganizationSummary, UpdateOrganizationPayload,
    },
};

#[derive(Clone)]
pub struct OrganizationService {
    organization_repo: OrganizationRepository,
    pool: PgPool,
}

impl OrganizationService {
    pub fn new(organization_repo: OrganizationRepository, pool: PgPool) -> Self {
        Self { organization_repo, pool }
    }

    pub async fn create(
        &self,
        payload: CreateOrganizationPayload,
        actor: Uuid,
    ) -> Result<Organization, AppError> {
        payload.validate()?;
        let fields = OrganizationFields {
            name: None,
            industry: clean(payload.industry.as_deref()),
            country: clean(payload.country.as_deref()),
            contact_name: clean(payload.contact_name.as_deref()),
            contact_email: clean(payload.contact_email.as_deref()),
            notes: clean(payload.notes.as_deref()),
        };
        let organization = self
            .organization_repo
            .insert(&self.pool, payload.name.trim(), &fields, actor)
            .await?;
        tracing::info!("🏢 Organização {} criada por {}", organization.id, actor);
        Ok(organization)
    }

    pub async fn list(&self) -> Result<Vec<OrganizationSummary>, AppError> {
        self.organization_repo.list_with_counts().await
    }

    pub async fn get(&self, organization_id: Uuid) -> Result<Organization, AppError> {
        self.organization_repo.find(&self.pool, organization_id).await
    }

    pub async fn update(
        &self,
        organization_id: Uuid,
        payload: UpdateOrganizationPayload,
    ) -> Result<Organization, AppError> {
        payload.validate()?;
        let fields = OrganizationFields {
            name: clean(payload.name.as_deref()),
            industry: clean(payload.industry.as_deref()),
            country: clean(payload.country.as_deref()),
            contact_name: clean(payload.contact_name.as_deref()),
            contact_email: clean(payload.contact_email.as_deref()),
            notes: clean(payload.notes.as_deref()),
        };
        self.organization_repo.update(&self.pool, organization_id, &fields).await
    }

    pub async fn delete(&self, organization_id: Uuid) -> Result<(), AppError> {
        self.organization_repo.delete(&self.pool, organization_id).await?;
        tracing::info!("🗑️ Organização {} removida", organization_id);
        Ok(())
    }
}
