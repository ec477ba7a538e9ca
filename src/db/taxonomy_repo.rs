// src/db/taxonomy_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::taxonomy::{Metric, TaxonomyNode},
};

#[derive(Clone)]
pub struct TaxonomyRepository {
    pool: PgPool,
}

impl TaxonomyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura (carga inicial do store em memória)
    // ---

    pub async fn load_nodes(&self) -> Result<Vec<TaxonomyNode>, AppError> {
        let nodes = sqlx::query_as::<_, TaxonomyNode>(
            r#"
            SELECT id, pcf_id, level, name, description, parent_id, category_number
            FROM pcf_nodes
            ORDER BY level ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(nodes)
    }

    pub async fn load_metrics(&self) -> Result<Vec<Metric>, AppError> {
        let metrics = sqlx::query_as::<_, Metric>(
            "SELECT id, node_id, name, category, formula, units FROM pcf_metrics ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(metrics)
    }

    // ---
    // Escrita (importação, sempre dentro de transação)
    // ---

    /// Upsert de um nó. Quem chama garante a ordem por nível.
    pub async fn upsert_node<'e, E>(&self, executor: E, node: &TaxonomyNode) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO pcf_nodes (id, pcf_id, level, name, description, parent_id, category_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                pcf_id = EXCLUDED.pcf_id,
                name = EXCLUDED.name,
                description = EXCLUDED.description
            "#,
        )
        .bind(&node.id)
        .bind(&node.pcf_id)
        .bind(node.level)
        .bind(&node.name)
        .bind(&node.description)
        .bind(&node.parent_id)
        .bind(node.category_number)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn upsert_metric<'e, E>(&self, executor: E, metric: &Metric) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO pcf_metrics (id, node_id, name, category, formula, units)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                node_id = EXCLUDED.node_id,
                name = EXCLUDED.name,
                category = EXCLUDED.category,
                formula = EXCLUDED.formula,
                units = EXCLUDED.units
            "#,
        )
        .bind(&metric.id)
        .bind(&metric.node_id)
        .bind(&metric.name)
        .bind(&metric.category)
        .bind(&metric.formula)
        .bind(&metric.units)
        .execute(executor)
        .await?;
        Ok(())
    }
}
