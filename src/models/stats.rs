// src/models/stats.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::evaluation::{EntryDetail, Evaluation, MaturityStatus};

// --- Agregados ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct StatusCounts {
    pub no_evaluado: u64,
    pub inexistente: u64,
    pub parcial: u64,
    pub documentado: u64,
    pub implementado: u64,
    pub optimizado: u64,
}

impl StatusCounts {
    pub fn get(&self, status: MaturityStatus) -> u64 {
        match status {
            MaturityStatus::NoEvaluado => self.no_evaluado,
            MaturityStatus::Inexistente => self.inexistente,
            MaturityStatus::Parcial => self.parcial,
            MaturityStatus::Documentado => self.documentado,
            MaturityStatus::Implementado => self.implementado,
            MaturityStatus::Optimizado => self.optimizado,
        }
    }

    pub(crate) fn bump(&mut self, status: MaturityStatus) {
        let slot = match status {
            MaturityStatus::NoEvaluado => &mut self.no_evaluado,
            MaturityStatus::Inexistente => &mut self.inexistente,
            MaturityStatus::Parcial => &mut self.parcial,
            MaturityStatus::Documentado => &mut self.documentado,
            MaturityStatus::Implementado => &mut self.implementado,
            MaturityStatus::Optimizado => &mut self.optimizado,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub evaluated: u64,
    pub pending: u64,
    pub not_applicable: u64,
    pub counts: StatusCounts,
    /// `None` quando nada foi avaliado (sem dados != tudo zero).
    #[schema(value_type = Option<f64>, example = 2.75)]
    pub avg_score: Option<Decimal>,
    pub progress_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category_number: i16,
    #[serde(flatten)]
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    pub level: i16,
    #[serde(flatten)]
    pub stats: Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatsGrouping {
    Category,
    Level,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub group_by: Option<StatsGrouping>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationStats {
    pub overall: Stats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_stats: Option<Vec<CategoryStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_stats: Option<Vec<LevelStats>>,
}

// --- Lacunas ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapOptions {
    pub min_level: i16,
    pub statuses: Vec<MaturityStatus>,
}

impl Default for GapOptions {
    fn default() -> Self {
        Self {
            min_level: 3,
            statuses: vec![MaturityStatus::Inexistente, MaturityStatus::Parcial],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GapQuery {
    #[schema(example = 3)]
    pub min_level: Option<i16>,
    /// Lista separada por vírgulas, ex.: "inexistente,parcial".
    #[schema(example = "inexistente,parcial")]
    pub statuses: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGap {
    pub category_number: i16,
    pub gap_count: u64,
    pub evaluated: u64,
    #[schema(value_type = f64, example = 0.4)]
    pub gap_ratio: Decimal,
    #[schema(example = 40)]
    pub gap_pct: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub gaps: Vec<EntryDetail>,
    pub categories: Vec<CategoryGap>,
}

// --- Comparação ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryChange {
    #[schema(example = "1.1")]
    pub node_id: String,
    pub node_name: String,
    pub category_number: i16,
    pub level: i16,
    pub status_a: MaturityStatus,
    pub score_a: i16,
    pub status_b: MaturityStatus,
    pub score_b: i16,
    #[schema(example = 3)]
    pub delta: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub stats_a: Stats,
    pub stats_b: Stats,
    pub category_stats_a: Vec<CategoryStats>,
    pub category_stats_b: Vec<CategoryStats>,
    pub changes: Vec<EntryChange>,
}

impl Comparison {
    pub fn improvements(&self) -> impl Iterator<Item = &EntryChange> {
        self.changes.iter().filter(|c| c.delta > 0)
    }

    pub fn regressions(&self) -> impl Iterator<Item = &EntryChange> {
        self.changes.iter().filter(|c| c.delta < 0)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompareQuery {
    pub a: Uuid,
    pub b: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub evaluation_a: Evaluation,
    pub evaluation_b: Evaluation,
    #[serde(flatten)]
    pub comparison: Comparison,
}

// --- Tendência ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category_number: i16,
    #[schema(value_type = f64)]
    pub avg_score: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub evaluation_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = f64)]
    pub avg_score: Decimal,
    pub evaluated: u64,
    pub total: u64,
    pub categories: Vec<CategoryScore>,
}
