// src/models/taxonomy.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;

pub const MAX_LEVEL: i16 = 5;
pub const MAX_CATEGORY: i16 = 13;

// --- ID Hierárquico ("1.1.2") ---

/// Quebra o ID hierárquico em segmentos numéricos.
///
/// Regras: 1 a 5 segmentos, cada um inteiro positivo, e o primeiro
/// (a categoria) entre 1 e 13.
pub fn parse_hierarchy_id(id: &str) -> Result<Vec<u32>, AppError> {
    let invalid = || AppError::InvalidHierarchyId(id.to_string());

    let segments = id
        .split('.')
        .map(|s| {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            match s.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(invalid()),
            }
        })
        .collect::<Result<Vec<u32>, AppError>>()?;

    if segments.len() > MAX_LEVEL as usize {
        return Err(invalid());
    }
    if segments[0] > MAX_CATEGORY as u32 {
        return Err(invalid());
    }
    Ok(segments)
}

/// Pai = ID sem o último segmento. Categorias (nível 1) não têm pai.
pub fn parent_of(id: &str) -> Option<&str> {
    id.rfind('.').map(|pos| &id[..pos])
}

/// Ordem da taxonomia: compara segmento a segmento numericamente,
/// então "1.2" < "1.10" e todo pai vem antes dos seus descendentes.
pub fn compare_hierarchy_ids(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// `ancestor` é prefixo estrito de `id` no caminho pontuado?
pub fn is_ancestor_of(ancestor: &str, id: &str) -> bool {
    id.len() > ancestor.len()
        && id.starts_with(ancestor)
        && id.as_bytes()[ancestor.len()] == b'.'
}

// --- Elemento do PCF ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyNode {
    #[schema(example = "1.1.2")]
    pub id: String,
    #[schema(example = "10003")]
    pub pcf_id: Option<String>,
    #[schema(example = 3)]
    pub level: i16,
    #[schema(example = "Analizar el entorno externo")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "1.1")]
    pub parent_id: Option<String>,
    #[schema(example = 1)]
    pub category_number: i16,
}

impl TaxonomyNode {
    /// Constrói o nó derivando nível, pai e categoria do próprio ID.
    pub fn from_import(row: NodeImportRow) -> Result<Self, AppError> {
        let id = row.id.trim().to_string();
        let segments = parse_hierarchy_id(&id)?;
        let parent_id = parent_of(&id).map(str::to_string);

        Ok(Self {
            level: segments.len() as i16,
            category_number: segments[0] as i16,
            parent_id,
            id,
            pcf_id: row.pcf_id.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            name: row.name.trim().to_string(),
            description: row.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        })
    }
}

// --- Métricas (somente leitura, contexto descritivo) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[schema(example = "BM-10003")]
    pub id: String,
    #[schema(example = "1.1.2")]
    pub node_id: String,
    #[schema(example = "Costo del proceso por cada 1.000 de ingresos")]
    pub name: String,
    #[schema(example = "Costo")]
    pub category: Option<String>,
    pub formula: Option<String>,
    #[schema(example = "USD")]
    pub units: Option<String>,
}

// --- Importação em massa ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeImportRow {
    #[schema(example = "1.1.2")]
    pub id: String,
    pub pcf_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyImportPayload {
    #[validate(length(min = 1, message = "A importação precisa de pelo menos um elemento."))]
    pub nodes: Vec<NodeImportRow>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub nodes: usize,
    pub metrics: usize,
}

// --- Busca e navegação ---

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeSearch {
    #[schema(example = "estrategia")]
    pub q: Option<String>,
    pub category: Option<i16>,
    pub level: Option<i16>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodePage {
    pub elements: Vec<TaxonomyNode>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Contadores usados nos "badges" da interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeBadges {
    pub child_count: usize,
    pub descendant_count: usize,
    pub metric_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetail {
    #[serde(flatten)]
    pub node: TaxonomyNode,
    #[serde(flatten)]
    pub badges: NodeBadges,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeList {
    #[schema(example = json!([]))]
    pub elements: Vec<NodeDetail>,
}
