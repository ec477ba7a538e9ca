// src/db/evaluation_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::evaluation::{Entry, EntryDetail, Evaluation},
};

const EVALUATION_COLUMNS: &str = "id, organization_id, name, description, depth, included_categories, \
     status, created_by, started_at, completed_at, created_at, updated_at";

const ENTRY_COLUMNS: &str = "id, evaluation_id, node_id, maturity_status, maturity_score, is_applicable, \
     client_process_name, responsible_area, responsible_person, notes, evaluated_by, evaluated_at";

#[derive(Clone)]
pub struct EvaluationRepository {
    pool: PgPool,
}

impl EvaluationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Avaliações
    // ---

    pub async fn insert_evaluation<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        name: &str,
        description: Option<&str>,
        depth: i16,
        included_categories: &[i16],
        created_by: Uuid,
    ) -> Result<Evaluation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO evaluations (organization_id, name, description, depth, included_categories, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EVALUATION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Evaluation>(&sql)
            .bind(organization_id)
            .bind(name)
            .bind(description)
            .bind(depth)
            .bind(included_categories)
            .bind(created_by)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::OrganizationNotFound(organization_id);
                    }
                }
                AppError::from_unique_violation(e, "avaliação")
            })
    }

    pub async fn find_evaluation<'e, E>(
        &self,
        executor: E,
        evaluation_id: Uuid,
    ) -> Result<Evaluation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE id = $1");
        sqlx::query_as::<_, Evaluation>(&sql)
            .bind(evaluation_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::EvaluationNotFound(evaluation_id))
    }

    /// Mais recentes primeiro.
    pub async fn list_by_organization(&self, organization_id: Uuid) -> Result<Vec<Evaluation>, AppError> {
        let sql = format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE organization_id = $1 ORDER BY created_at DESC"
        );
        let evaluations = sqlx::query_as::<_, Evaluation>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(evaluations)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        evaluation: &Evaluation,
    ) -> Result<Evaluation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE evaluations
            SET status = $2, started_at = $3, completed_at = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {EVALUATION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Evaluation>(&sql)
            .bind(evaluation.id)
            .bind(evaluation.status)
            .bind(evaluation.started_at)
            .bind(evaluation.completed_at)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::EvaluationNotFound(evaluation.id))
    }

    // ---
    // Entradas
    // ---

    /// Cria as entradas que faltam (uma por nó). Repetir não duplica nada.
    pub async fn seed_entries<'e, E>(
        &self,
        executor: E,
        evaluation_id: Uuid,
        node_ids: &[String],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO evaluation_entries (evaluation_id, node_id, maturity_status, maturity_score)
            SELECT $1, node_id, 'no_evaluado', 0
            FROM UNNEST($2::text[]) AS node_id
            ON CONFLICT (evaluation_id, node_id) DO NOTHING
            "#,
        )
        .bind(evaluation_id)
        .bind(node_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_entries<'e, E>(&self, executor: E, evaluation_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluation_entries WHERE evaluation_id = $1")
            .bind(evaluation_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    /// Entradas com os metadados do nó (a ordem final é aplicada no serviço).
    pub async fn entries_with_nodes<'e, E>(
        &self,
        executor: E,
        evaluation_id: Uuid,
    ) -> Result<Vec<EntryDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let details = sqlx::query_as::<_, EntryDetail>(
            r#"
            SELECT
                e.id, e.evaluation_id, e.node_id, e.maturity_status, e.maturity_score,
                e.is_applicable, e.client_process_name, e.responsible_area,
                e.responsible_person, e.notes, e.evaluated_by, e.evaluated_at,
                n.name AS node_name,
                n.description AS node_description,
                n.level, n.parent_id, n.category_number
            FROM evaluation_entries e
            JOIN pcf_nodes n ON n.id = e.node_id
            WHERE e.evaluation_id = $1
            "#,
        )
        .bind(evaluation_id)
        .fetch_all(executor)
        .await?;
        Ok(details)
    }

    /// Lê e trava a linha até o fim da transação.
    pub async fn find_entry_for_update<'e, E>(
        &self,
        executor: E,
        evaluation_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Entry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM evaluation_entries WHERE id = $1 AND evaluation_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Entry>(&sql)
            .bind(entry_id)
            .bind(evaluation_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::EntryNotFound { entry_id, evaluation_id })
    }

    pub async fn update_entry<'e, E>(&self, executor: E, entry: &Entry) -> Result<Entry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE evaluation_entries SET
                maturity_status = $3,
                maturity_score = $4,
                is_applicable = $5,
                client_process_name = $6,
                responsible_area = $7,
                responsible_person = $8,
                notes = $9,
                evaluated_by = $10,
                evaluated_at = $11
            WHERE id = $1 AND evaluation_id = $2
            RETURNING {ENTRY_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Entry>(&sql)
            .bind(entry.id)
            .bind(entry.evaluation_id)
            .bind(entry.maturity_status)
            .bind(entry.maturity_score)
            .bind(entry.is_applicable)
            .bind(&entry.client_process_name)
            .bind(&entry.responsible_area)
            .bind(&entry.responsible_person)
            .bind(&entry.notes)
            .bind(entry.evaluated_by)
            .bind(entry.evaluated_at)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::EntryNotFound {
                entry_id: entry.id,
                evaluation_id: entry.evaluation_id,
            })
    }

    /// Marca a última atividade da avaliação.
    pub async fn touch<'e, E>(&self, executor: E, evaluation_id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE evaluations SET updated_at = $2 WHERE id = $1")
            .bind(evaluation_id)
            .bind(at)
            .execute(executor)
            .await?;
        Ok(())
    }
}
