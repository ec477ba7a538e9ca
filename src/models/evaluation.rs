// src/models/evaluation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    models::taxonomy::{MAX_CATEGORY, TaxonomyNode},
};

pub const MIN_DEPTH: i16 = 3;
pub const MAX_DEPTH: i16 = 5;

// --- Enums ---

/// Escala ordinal de maturidade. A pontuação é função fixa do status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "maturity_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaturityStatus {
    NoEvaluado,
    Inexistente,
    Parcial,
    Documentado,
    Implementado,
    Optimizado,
}

impl MaturityStatus {
    pub const ALL: [MaturityStatus; 6] = [
        MaturityStatus::NoEvaluado,
        MaturityStatus::Inexistente,
        MaturityStatus::Parcial,
        MaturityStatus::Documentado,
        MaturityStatus::Implementado,
        MaturityStatus::Optimizado,
    ];

    pub const fn score(self) -> i16 {
        match self {
            MaturityStatus::NoEvaluado => 0,
            MaturityStatus::Inexistente => 1,
            MaturityStatus::Parcial => 2,
            MaturityStatus::Documentado => 3,
            MaturityStatus::Implementado => 4,
            MaturityStatus::Optimizado => 5,
        }
    }

    /// Inverso de `score`. Valores fora de 0..=5 não têm status.
    pub const fn from_score(score: i16) -> Option<Self> {
        match score {
            0 => Some(MaturityStatus::NoEvaluado),
            1 => Some(MaturityStatus::Inexistente),
            2 => Some(MaturityStatus::Parcial),
            3 => Some(MaturityStatus::Documentado),
            4 => Some(MaturityStatus::Implementado),
            5 => Some(MaturityStatus::Optimizado),
            _ => None,
        }
    }

    pub const fn is_evaluated(self) -> bool {
        !matches!(self, MaturityStatus::NoEvaluado)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MaturityStatus::NoEvaluado => "no_evaluado",
            MaturityStatus::Inexistente => "inexistente",
            MaturityStatus::Parcial => "parcial",
            MaturityStatus::Documentado => "documentado",
            MaturityStatus::Implementado => "implementado",
            MaturityStatus::Optimizado => "optimizado",
        }
    }
}

impl fmt::Display for MaturityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaturityStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaturityStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| AppError::InvalidMaturityStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "evaluation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft,
    InProgress,
    Completed,
    Archived,
}

// --- Avaliação ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: Uuid,
    pub organization_id: Uuid,
    #[schema(example = "Diagnóstico inicial 2025")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 3)]
    pub depth: i16,
    #[schema(example = json!([1, 3, 7]))]
    pub included_categories: Vec<i16>,
    pub status: EvaluationStatus,
    pub created_by: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evaluation {
    /// O nó pertence ao escopo (profundidade + categorias) desta avaliação?
    pub fn covers(&self, node: &TaxonomyNode) -> bool {
        node.level <= self.depth && self.included_categories.contains(&node.category_number)
    }

    /// Nova versão com o status trocado. `started_at` só é carimbado uma vez;
    /// `completed_at` a cada conclusão.
    pub fn with_status(&self, status: EvaluationStatus, now: DateTime<Utc>) -> Evaluation {
        let mut next = self.clone();
        next.status = status;
        match status {
            EvaluationStatus::InProgress => {
                next.started_at.get_or_insert(now);
            }
            EvaluationStatus::Completed => next.completed_at = Some(now),
            EvaluationStatus::Draft | EvaluationStatus::Archived => {}
        }
        next
    }
}

fn validate_categories(categories: &[i16]) -> Result<(), ValidationError> {
    if categories.iter().any(|c| !(1..=MAX_CATEGORY).contains(c)) {
        let mut err = ValidationError::new("range");
        err.message = Some("As categorias devem estar entre 1 e 13.".into());
        return Err(err);
    }
    Ok(())
}

/// O nome é gravado sem espaços nas pontas, então o mínimo vale para o texto aparado.
pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 2 {
        let mut err = ValidationError::new("length");
        err.message = Some("O nome deve ter no mínimo 2 caracteres.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvaluationPayload {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Diagnóstico inicial 2025")]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 3, max = 5, message = "A profundidade deve estar entre 3 e 5."))]
    #[schema(example = 3)]
    pub depth: i16,

    #[validate(
        length(min = 1, message = "Selecione pelo menos uma categoria."),
        custom(function = "validate_categories")
    )]
    #[schema(example = json!([1, 3, 7]))]
    pub included_categories: Vec<i16>,
}

impl CreateEvaluationPayload {
    /// Categorias ordenadas e sem repetição, como ficam gravadas.
    pub fn normalized_categories(&self) -> Vec<i16> {
        let mut categories = self.included_categories.clone();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvaluationStatusPayload {
    pub status: EvaluationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub evaluation_id: Uuid,
    /// Entradas criadas nesta execução (0 numa repetição).
    pub inserted: u64,
    /// Entradas existentes após a execução.
    pub entry_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvaluation {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub entry_count: i64,
}

// --- Entrada (uma linha por nó da taxonomia) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub evaluation_id: Uuid,
    #[schema(example = "1.1.2")]
    pub node_id: String,
    pub maturity_status: MaturityStatus,
    #[schema(example = 3)]
    pub maturity_score: i16,
    pub is_applicable: bool,
    pub client_process_name: Option<String>,
    pub responsible_area: Option<String>,
    pub responsible_person: Option<String>,
    pub notes: Option<String>,
    pub evaluated_by: Option<Uuid>,
    pub evaluated_at: Option<DateTime<Utc>>,
}

/// Alteração parcial. Campo ausente = mantém o valor atual.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[schema(example = "documentado")]
    pub maturity_status: Option<String>,
    pub client_process_name: Option<String>,
    pub responsible_area: Option<String>,
    pub responsible_person: Option<String>,
    pub notes: Option<String>,
    pub is_applicable: Option<bool>,
}

impl Entry {
    /// Aplica o patch e devolve a nova versão da entrada.
    ///
    /// Status e pontuação mudam juntos; em caso de erro `self` não é tocado.
    pub fn apply_patch(
        &self,
        patch: &EntryPatch,
        actor: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Entry, AppError> {
        let status = match patch.maturity_status.as_deref() {
            Some(raw) => Some(raw.parse::<MaturityStatus>()?),
            None => None,
        };

        let mut next = self.clone();
        if let Some(status) = status {
            next.maturity_status = status;
            next.maturity_score = status.score();
        }
        if let Some(v) = &patch.client_process_name {
            next.client_process_name = Some(v.clone());
        }
        if let Some(v) = &patch.responsible_area {
            next.responsible_area = Some(v.clone());
        }
        if let Some(v) = &patch.responsible_person {
            next.responsible_person = Some(v.clone());
        }
        if let Some(v) = &patch.notes {
            next.notes = Some(v.clone());
        }
        if let Some(v) = patch.is_applicable {
            next.is_applicable = v;
        }
        next.evaluated_by = Some(actor);
        next.evaluated_at = Some(now);
        Ok(next)
    }
}

/// Entrada + metadados do nó. É a entrada de todas as análises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub entry: Entry,
    pub node_name: String,
    pub node_description: Option<String>,
    pub level: i16,
    pub parent_id: Option<String>,
    pub category_number: i16,
}

impl EntryDetail {
    pub fn from_parts(entry: Entry, node: &TaxonomyNode) -> Self {
        Self {
            entry,
            node_name: node.name.clone(),
            node_description: node.description.clone(),
            level: node.level,
            parent_id: node.parent_id.clone(),
            category_number: node.category_number,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.entry.node_id
    }

    pub fn status(&self) -> MaturityStatus {
        self.entry.maturity_status
    }

    pub fn score(&self) -> i16 {
        self.entry.maturity_score
    }
}
