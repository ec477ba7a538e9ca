// src/models/classification.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::evaluation::{EntryPatch, MaturityStatus};

/// Um resultado do serviço externo de classificação de documentos.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationMatch {
    #[schema(example = "8.2.1")]
    pub node_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category_number: Option<i16>,
    #[validate(range(min = 0, max = 100, message = "O alinhamento deve estar entre 0 e 100."))]
    #[schema(example = 82)]
    pub alignment: i16,
    #[validate(range(min = 0, max = 5, message = "A maturidade sugerida deve estar entre 0 e 5."))]
    #[schema(example = 3)]
    pub suggested_maturity: i16,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPayload {
    /// Um vetor de resultados por documento enviado.
    #[validate(nested)]
    pub documents: Vec<DocumentMatches>,
    #[serde(default = "default_min_alignment")]
    #[validate(range(min = 0, max = 100))]
    #[schema(example = 50)]
    pub min_alignment: i16,
}

fn default_min_alignment() -> i16 {
    50
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMatches {
    #[schema(example = "manual-ti.pdf")]
    pub filename: Option<String>,
    #[validate(nested)]
    pub results: Vec<ClassificationMatch>,
}

/// Sugestão pronta para o consultor aplicar (ou descartar).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePatch {
    pub entry_id: Uuid,
    pub node_id: String,
    pub current_status: MaturityStatus,
    pub suggested_status: MaturityStatus,
    pub alignment: i16,
    pub reasoning: Option<String>,
    pub patch: EntryPatch,
}
