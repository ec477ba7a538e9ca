// src/db/organization_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::organization::{Organization, OrganizationSummary},
};

const ORGANIZATION_COLUMNS: &str = "id, name, industry, country, contact_name, contact_email, notes, \
     created_by, created_at, updated_at";

/// Campos de cadastro já normalizados (aparados, vazios como `None`).
#[derive(Debug, Clone, Default)]
pub struct OrganizationFields {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        name: &str,
        fields: &OrganizationFields,
        created_by: Uuid,
    ) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO organizations (name, industry, country, contact_name, contact_email, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORGANIZATION_COLUMNS}
            "#
        );
        let organization = sqlx::query_as::<_, Organization>(&sql)
            .bind(name)
            .bind(&fields.industry)
            .bind(&fields.country)
            .bind(&fields.contact_name)
            .bind(&fields.contact_email)
            .bind(&fields.notes)
            .bind(created_by)
            .fetch_one(executor)
            .await?;
        Ok(organization)
    }

    /// Mais recentes primeiro, com o total de avaliações de cada uma.
    pub async fn list_with_counts(&self) -> Result<Vec<OrganizationSummary>, AppError> {
        let organizations = sqlx::query_as::<_, OrganizationSummary>(
            r#"
            SELECT
                o.id, o.name, o.industry, o.country, o.contact_name, o.contact_email,
                o.notes, o.created_by, o.created_at, o.updated_at,
                (SELECT COUNT(*) FROM evaluations e WHERE e.organization_id = o.id) AS evaluation_count
            FROM organizations o
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(organizations)
    }

    pub async fn find<'e, E>(&self, executor: E, organization_id: Uuid) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&sql)
            .bind(organization_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::OrganizationNotFound(organization_id))
    }

    /// `None` mantém o valor gravado.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        fields: &OrganizationFields,
    ) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE organizations SET
                name = COALESCE($2, name),
                industry = COALESCE($3, industry),
                country = COALESCE($4, country),
                contact_name = COALESCE($5, contact_name),
                contact_email = COALESCE($6, contact_email),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORGANIZATION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Organization>(&sql)
            .bind(organization_id)
            .bind(&fields.name)
            .bind(&fields.industry)
            .bind(&fields.country)
            .bind(&fields.contact_name)
            .bind(&fields.contact_email)
            .bind(&fields.notes)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::OrganizationNotFound(organization_id))
    }

    /// Remove a organização; avaliações e entradas caem em cascata.
    pub async fn delete<'e, E>(&self, executor: E, organization_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(organization_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::OrganizationNotFound(organization_id));
        }
        Ok(())
    }
}
