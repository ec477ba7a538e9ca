// src/services/taxonomy_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::TaxonomyRepository,
    models::taxonomy::{
        ImportSummary, Metric, NodeDetail, NodeList, NodePage, NodeSearch, TaxonomyImportPayload,
        TaxonomyNode,
    },
    services::taxonomy_store::TaxonomyStore,
};

/// Store compartilhado entre as requisições; trocado inteiro após importação.
pub type SharedTaxonomy = Arc<RwLock<TaxonomyStore>>;

#[derive(Clone)]
pub struct TaxonomyService {
    taxonomy_repo: TaxonomyRepository,
    pool: PgPool,
    store: SharedTaxonomy,
}

impl TaxonomyService {
    pub fn new(taxonomy_repo: TaxonomyRepository, pool: PgPool, store: SharedTaxonomy) -> Self {
        Self { taxonomy_repo, pool, store }
    }

    /// Carrega a taxonomia do banco para a memória (startup).
    pub async fn load(taxonomy_repo: &TaxonomyRepository) -> Result<TaxonomyStore, AppError> {
        let nodes = taxonomy_repo.load_nodes().await?;
        let metrics = taxonomy_repo.load_metrics().await?;
        let store = TaxonomyStore::from_parts(nodes, metrics)?;
        tracing::info!("📚 Taxonomia carregada: {} elementos", store.len());
        Ok(store)
    }

    pub fn store(&self) -> SharedTaxonomy {
        self.store.clone()
    }

    // --- Importação ---

    /// Valida tudo numa cópia do store, grava numa transação e só então
    /// publica a nova versão. Qualquer erro deixa banco e memória intactos.
    pub async fn import(&self, payload: TaxonomyImportPayload) -> Result<ImportSummary, AppError> {
        payload.validate()?;

        let mut nodes = payload
            .nodes
            .into_iter()
            .map(TaxonomyNode::from_import)
            .collect::<Result<Vec<_>, _>>()?;
        nodes.sort_by_key(|n| n.level);
        let metrics = payload.metrics;

        // Importações concorrentes ficam serializadas pelo lock de escrita.
        let mut guard = self.store.write().await;
        let mut staged = guard.clone();
        let node_count = staged.upsert_nodes(nodes.clone())?;
        let metric_count = staged.upsert_metrics(metrics.clone())?;

        let mut tx = self.pool.begin().await?;
        for node in &nodes {
            self.taxonomy_repo.upsert_node(&mut *tx, node).await?;
        }
        for metric in &metrics {
            self.taxonomy_repo.upsert_metric(&mut *tx, metric).await?;
        }
        tx.commit().await?;

        *guard = staged;
        tracing::info!(
            "📥 Importação do PCF: {} elementos, {} métricas (total {})",
            node_count,
            metric_count,
            guard.len()
        );

        Ok(ImportSummary {
            nodes: node_count,
            metrics: metric_count,
        })
    }

    // --- Leitura ---

    pub async fn search(&self, params: &NodeSearch) -> Result<NodePage, AppError> {
        self.store.read().await.search(params)
    }

    pub async fn roots(&self) -> Result<NodeList, AppError> {
        let store = self.store.read().await;
        let elements = store
            .roots()
            .into_iter()
            .map(|n| with_badges(&store, n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NodeList { elements })
    }

    pub async fn get_node(&self, node_id: &str) -> Result<NodeDetail, AppError> {
        let store = self.store.read().await;
        let node = store.require_node(node_id)?;
        with_badges(&store, node)
    }

    pub async fn get_children(&self, node_id: &str) -> Result<NodeList, AppError> {
        let store = self.store.read().await;
        let elements = store
            .get_children(node_id)?
            .into_iter()
            .map(|n| with_badges(&store, n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NodeList { elements })
    }

    pub async fn get_metrics(&self, node_id: &str) -> Result<Vec<Metric>, AppError> {
        Ok(self.store.read().await.metrics(node_id)?.to_vec())
    }
}

fn with_badges(store: &TaxonomyStore, node: &TaxonomyNode) -> Result<NodeDetail, AppError> {
    Ok(NodeDetail {
        badges: store.count_descendants_and_metrics(&node.id)?,
        node: node.clone(),
    })
}
