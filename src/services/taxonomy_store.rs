// src/services/taxonomy_store.rs

use std::collections::{HashMap, HashSet};

use crate::{
    common::error::AppError,
    models::taxonomy::{
        compare_hierarchy_ids, Metric, NodeBadges, NodePage, NodeSearch, TaxonomyNode, MAX_LEVEL,
    },
};

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 500;

/// Hierarquia do PCF em memória: nós indexados por ID e lista ordenada
/// de filhos por pai. Só muda por importação em massa.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyStore {
    nodes: HashMap<String, TaxonomyNode>,
    children: HashMap<String, Vec<String>>,
    roots: Vec<String>,
    metrics: HashMap<String, Vec<Metric>>,
}

impl TaxonomyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carrega a taxonomia vinda do banco (já íntegra).
    pub fn from_parts(nodes: Vec<TaxonomyNode>, metrics: Vec<Metric>) -> Result<Self, AppError> {
        let mut store = Self::new();
        store.upsert_nodes(nodes)?;
        store.upsert_metrics(metrics)?;
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mescla os nós na taxonomia (upsert por ID).
    ///
    /// Os nós são processados por nível crescente; um nó cujo pai não está
    /// no store nem antes no lote gera `ParentNodeNotFound`. Tudo ou nada:
    /// em caso de erro o store fica intacto.
    pub fn upsert_nodes(&mut self, mut nodes: Vec<TaxonomyNode>) -> Result<usize, AppError> {
        nodes.sort_by_key(|n| n.level);

        let mut staged = self.nodes.clone();
        for node in &nodes {
            if node.level < 1 || node.level > MAX_LEVEL {
                return Err(AppError::InvalidHierarchyId(node.id.clone()));
            }
            if let Some(parent_id) = &node.parent_id {
                match staged.get(parent_id) {
                    Some(parent) if parent.level == node.level - 1 => {}
                    _ => {
                        return Err(AppError::ParentNodeNotFound {
                            node_id: node.id.clone(),
                            parent_id: parent_id.clone(),
                        });
                    }
                }
            }
            staged.insert(node.id.clone(), node.clone());
        }

        let count = nodes.len();
        self.nodes = staged;
        self.rebuild_index();
        Ok(count)
    }

    /// Upsert de métricas por ID; toda métrica precisa de um nó existente.
    pub fn upsert_metrics(&mut self, metrics: Vec<Metric>) -> Result<usize, AppError> {
        if let Some(orphan) = metrics.iter().find(|m| !self.nodes.contains_key(&m.node_id)) {
            return Err(AppError::NodeNotFound(orphan.node_id.clone()));
        }

        let count = metrics.len();
        let incoming: HashSet<&str> = metrics.iter().map(|m| m.id.as_str()).collect();
        for list in self.metrics.values_mut() {
            list.retain(|m| !incoming.contains(m.id.as_str()));
        }
        for metric in metrics {
            self.metrics.entry(metric.node_id.clone()).or_default().push(metric);
        }
        for list in self.metrics.values_mut() {
            list.sort_by(|a, b| a.id.cmp(&b.id));
        }
        self.metrics.retain(|_, list| !list.is_empty());
        Ok(count)
    }

    fn rebuild_index(&mut self) {
        self.children.clear();
        self.roots.clear();
        for node in self.nodes.values() {
            match &node.parent_id {
                Some(parent) => self.children.entry(parent.clone()).or_default().push(node.id.clone()),
                None => self.roots.push(node.id.clone()),
            }
        }
        self.roots.sort_by(|a, b| compare_hierarchy_ids(a, b));
        for list in self.children.values_mut() {
            list.sort_by(|a, b| compare_hierarchy_ids(a, b));
        }
    }

    pub fn get_node(&self, id: &str) -> Option<&TaxonomyNode> {
        self.nodes.get(id)
    }

    pub fn require_node(&self, id: &str) -> Result<&TaxonomyNode, AppError> {
        self.get_node(id).ok_or_else(|| AppError::NodeNotFound(id.to_string()))
    }

    /// Categorias de nível 1, em ordem.
    pub fn roots(&self) -> Vec<&TaxonomyNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id)).collect()
    }

    pub fn get_children(&self, id: &str) -> Result<Vec<&TaxonomyNode>, AppError> {
        self.require_node(id)?;
        Ok(self
            .children
            .get(id)
            .map(|ids| ids.iter().filter_map(|c| self.nodes.get(c)).collect())
            .unwrap_or_default())
    }

    pub fn metrics(&self, id: &str) -> Result<&[Metric], AppError> {
        self.require_node(id)?;
        Ok(self.metrics.get(id).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn count_descendants_and_metrics(&self, id: &str) -> Result<NodeBadges, AppError> {
        self.require_node(id)?;

        let child_count = self.children.get(id).map_or(0, Vec::len);
        let mut descendant_count = 0;
        let mut stack: Vec<&str> = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(kids) = self.children.get(current) {
                descendant_count += kids.len();
                stack.extend(kids.iter().map(String::as_str));
            }
        }

        Ok(NodeBadges {
            child_count,
            descendant_count,
            metric_count: self.metrics.get(id).map_or(0, Vec::len),
        })
    }

    /// Busca por substring (sem diferenciar maiúsculas) em ID, nome e descrição.
    pub fn search(&self, params: &NodeSearch) -> Result<NodePage, AppError> {
        let query = params.q.as_deref().unwrap_or_default().trim().to_lowercase();
        if query.chars().count() < 2 {
            return Err(AppError::InvalidInput(
                "a busca precisa de pelo menos 2 caracteres".into(),
            ));
        }
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = params.offset.unwrap_or(0);

        let mut matches: Vec<&TaxonomyNode> = self
            .nodes
            .values()
            .filter(|n| params.category.is_none_or(|c| n.category_number == c))
            .filter(|n| params.level.is_none_or(|l| n.level == l))
            .filter(|n| {
                n.id.to_lowercase().contains(&query)
                    || n.name.to_lowercase().contains(&query)
                    || n
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&query))
            })
            .collect();
        matches.sort_by(|a, b| compare_hierarchy_ids(&a.id, &b.id));

        let total = matches.len();
        let elements = matches.into_iter().skip(offset).take(limit).cloned().collect();
        Ok(NodePage {
            elements,
            total,
            limit,
            offset,
        })
    }

    /// Nós dentro do escopo de uma avaliação, em ordem da taxonomia.
    pub fn select_scope(&self, depth: i16, categories: &[i16]) -> Vec<&TaxonomyNode> {
        let mut selected: Vec<&TaxonomyNode> = self
            .nodes
            .values()
            .filter(|n| n.level <= depth && categories.contains(&n.category_number))
            .collect();
        selected.sort_by(|a, b| compare_hierarchy_ids(&a.id, &b.id));
        selected
    }
}
