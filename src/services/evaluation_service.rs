// src/services/evaluation_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::EvaluationRepository,
    models::{
        classification::{CandidatePatch, SuggestionPayload},
        evaluation::{
            CreateEvaluationPayload, CreatedEvaluation, EntryDetail, EntryPatch, Evaluation,
            EvaluationStatus, SeedSummary,
        },
        stats::{
            ComparisonReport, EvaluationStats, GapOptions, GapReport, StatsGrouping, TrendPoint,
        },
        tree::TreeNode,
    },
    services::{
        aggregation::{aggregate, by_category, by_level},
        classification::{candidate_patches, merge_matches},
        comparison::{compare, trend},
        gap_detector::{find_gaps, rank_categories},
        taxonomy_service::SharedTaxonomy,
        tree_builder::{build_tree, sort_entries},
    },
};

#[derive(Clone)]
pub struct EvaluationService {
    evaluation_repo: EvaluationRepository,
    pool: PgPool,
    taxonomy: SharedTaxonomy,
}

impl EvaluationService {
    pub fn new(evaluation_repo: EvaluationRepository, pool: PgPool, taxonomy: SharedTaxonomy) -> Self {
        Self { evaluation_repo, pool, taxonomy }
    }

    /// IDs dos nós no escopo, em ordem da taxonomia.
    async fn scope_ids(&self, depth: i16, categories: &[i16]) -> Vec<String> {
        self.taxonomy
            .read()
            .await
            .select_scope(depth, categories)
            .into_iter()
            .map(|n| n.id.clone())
            .collect()
    }

    // ---
    // Ciclo de vida
    // ---

    /// Cria a avaliação e uma entrada `no_evaluado` por nó do escopo, tudo
    /// na mesma transação.
    pub async fn create_evaluation(
        &self,
        organization_id: Uuid,
        payload: CreateEvaluationPayload,
        actor: Uuid,
    ) -> Result<CreatedEvaluation, AppError> {
        payload.validate()?;
        let categories = payload.normalized_categories();
        let node_ids = self.scope_ids(payload.depth, &categories).await;

        let mut tx = self.pool.begin().await?;

        let evaluation = self
            .evaluation_repo
            .insert_evaluation(
                &mut *tx,
                organization_id,
                payload.name.trim(),
                payload.description.as_deref(),
                payload.depth,
                &categories,
                actor,
            )
            .await?;

        let inserted = self
            .evaluation_repo
            .seed_entries(&mut *tx, evaluation.id, &node_ids)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "📝 Avaliação {} criada para a organização {} com {} entradas",
            evaluation.id,
            organization_id,
            inserted
        );

        Ok(CreatedEvaluation {
            evaluation,
            entry_count: inserted as i64,
        })
    }

    /// Completa as entradas que faltam (ex.: após importar novos nós).
    pub async fn seed_evaluation(&self, evaluation_id: Uuid) -> Result<SeedSummary, AppError> {
        let evaluation = self.evaluation_repo.find_evaluation(&self.pool, evaluation_id).await?;
        let node_ids = self.scope_ids(evaluation.depth, &evaluation.included_categories).await;

        let mut tx = self.pool.begin().await?;
        let inserted = self.evaluation_repo.seed_entries(&mut *tx, evaluation_id, &node_ids).await?;
        let entry_count = self.evaluation_repo.count_entries(&mut *tx, evaluation_id).await?;
        tx.commit().await?;

        if inserted > 0 {
            tracing::info!("🌱 Avaliação {}: {} entradas novas", evaluation_id, inserted);
        }

        Ok(SeedSummary {
            evaluation_id,
            inserted,
            entry_count,
        })
    }

    pub async fn get_evaluation(&self, evaluation_id: Uuid) -> Result<Evaluation, AppError> {
        self.evaluation_repo.find_evaluation(&self.pool, evaluation_id).await
    }

    pub async fn list_evaluations(&self, organization_id: Uuid) -> Result<Vec<Evaluation>, AppError> {
        self.evaluation_repo.list_by_organization(organization_id).await
    }

    pub async fn set_status(
        &self,
        evaluation_id: Uuid,
        status: EvaluationStatus,
    ) -> Result<Evaluation, AppError> {
        let mut tx = self.pool.begin().await?;
        let current = self.evaluation_repo.find_evaluation(&mut *tx, evaluation_id).await?;
        let next = current.with_status(status, Utc::now());
        let saved = self.evaluation_repo.update_status(&mut *tx, &next).await?;
        tx.commit().await?;
        Ok(saved)
    }

    /// Leitura-modificação-escrita com a linha travada. Em caso de erro
    /// o rollback acontece no drop da transação.
    pub async fn update_entry(
        &self,
        evaluation_id: Uuid,
        entry_id: Uuid,
        patch: EntryPatch,
        actor: Uuid,
    ) -> Result<EntryDetail, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let current = self
            .evaluation_repo
            .find_entry_for_update(&mut *tx, evaluation_id, entry_id)
            .await?;
        let next = current.apply_patch(&patch, actor, now)?;
        let saved = self.evaluation_repo.update_entry(&mut *tx, &next).await?;
        self.evaluation_repo.touch(&mut *tx, evaluation_id, now).await?;

        // Metadados antes do commit: sem nó, nada é gravado.
        let detail = {
            let taxonomy = self.taxonomy.read().await;
            let node = taxonomy.require_node(&saved.node_id)?;
            EntryDetail::from_parts(saved, node)
        };

        tx.commit().await?;
        Ok(detail)
    }

    // ---
    // Leitura e análises
    // ---

    /// Entradas + metadados, em ordem da taxonomia.
    pub async fn get_entries(&self, evaluation_id: Uuid) -> Result<Vec<EntryDetail>, AppError> {
        self.evaluation_repo.find_evaluation(&self.pool, evaluation_id).await?;
        let mut entries = self.evaluation_repo.entries_with_nodes(&self.pool, evaluation_id).await?;
        sort_entries(&mut entries);
        Ok(entries)
    }

    pub async fn get_tree(&self, evaluation_id: Uuid) -> Result<Vec<TreeNode>, AppError> {
        let entries = self.get_entries(evaluation_id).await?;
        Ok(build_tree(&entries))
    }

    pub async fn get_stats(
        &self,
        evaluation_id: Uuid,
        group_by: Option<StatsGrouping>,
    ) -> Result<EvaluationStats, AppError> {
        let entries = self.get_entries(evaluation_id).await?;
        Ok(stats_for(&entries, group_by))
    }

    pub async fn get_gaps(&self, evaluation_id: Uuid, options: &GapOptions) -> Result<GapReport, AppError> {
        options.validate()?;
        let entries = self.get_entries(evaluation_id).await?;
        Ok(gap_report(&entries, options))
    }

    pub async fn compare_evaluations(
        &self,
        organization_id: Uuid,
        a: Uuid,
        b: Uuid,
    ) -> Result<ComparisonReport, AppError> {
        let evaluation_a = self.evaluation_repo.find_evaluation(&self.pool, a).await?;
        let evaluation_b = self.evaluation_repo.find_evaluation(&self.pool, b).await?;
        if evaluation_a.organization_id != organization_id || evaluation_b.organization_id != organization_id {
            return Err(AppError::OrganizationMismatch);
        }

        let entries_a = self.evaluation_repo.entries_with_nodes(&self.pool, a).await?;
        let entries_b = self.evaluation_repo.entries_with_nodes(&self.pool, b).await?;

        Ok(ComparisonReport {
            evaluation_a,
            evaluation_b,
            comparison: compare(&entries_a, &entries_b),
        })
    }

    pub async fn trend(&self, organization_id: Uuid) -> Result<Vec<TrendPoint>, AppError> {
        let evaluations = self.evaluation_repo.list_by_organization(organization_id).await?;

        let mut series = Vec::with_capacity(evaluations.len());
        for evaluation in evaluations {
            let entries = self.evaluation_repo.entries_with_nodes(&self.pool, evaluation.id).await?;
            series.push((evaluation, entries));
        }
        Ok(trend(&series))
    }

    /// Sugestões de classificação viram patches candidatos; nada é gravado.
    pub async fn suggest(
        &self,
        evaluation_id: Uuid,
        payload: SuggestionPayload,
    ) -> Result<Vec<CandidatePatch>, AppError> {
        payload.validate()?;
        let entries = self.get_entries(evaluation_id).await?;
        let matches = merge_matches(payload.documents.into_iter().flat_map(|d| d.results));
        Ok(candidate_patches(&matches, &entries, payload.min_alignment))
    }
}

/// Geral sempre; por categoria ou nível quando pedido.
pub fn stats_for(entries: &[EntryDetail], group_by: Option<StatsGrouping>) -> EvaluationStats {
    EvaluationStats {
        overall: aggregate(entries),
        category_stats: (group_by == Some(StatsGrouping::Category)).then(|| by_category(entries)),
        level_stats: (group_by == Some(StatsGrouping::Level)).then(|| by_level(entries)),
    }
}

pub fn gap_report(entries: &[EntryDetail], options: &GapOptions) -> GapReport {
    GapReport {
        gaps: find_gaps(entries, options).into_iter().cloned().collect(),
        categories: rank_categories(&by_category(entries)),
    }
}
