// src/services/classification.rs

use std::collections::HashMap;

use crate::models::{
    classification::{CandidatePatch, ClassificationMatch},
    evaluation::{EntryDetail, EntryPatch, MaturityStatus},
};

/// Mesma tabela da pontuação; fora de 0..=5 vira `no_evaluado`.
pub fn maturity_to_status(suggested: i16) -> MaturityStatus {
    MaturityStatus::from_score(suggested).unwrap_or(MaturityStatus::NoEvaluado)
}

/// Junta os resultados de vários documentos: um por nó, o de maior alinhamento.
pub fn merge_matches<I>(matches: I) -> Vec<ClassificationMatch>
where
    I: IntoIterator<Item = ClassificationMatch>,
{
    let mut best: HashMap<String, ClassificationMatch> = HashMap::new();
    for m in matches {
        match best.get(&m.node_id) {
            Some(current) if current.alignment >= m.alignment => {}
            _ => {
                best.insert(m.node_id.clone(), m);
            }
        }
    }
    best.into_values().collect()
}

/// Sugestões aplicáveis às entradas da avaliação, maior alinhamento primeiro.
///
/// Nada é gravado aqui; aplicar é uma chamada explícita de atualização.
pub fn candidate_patches(
    matches: &[ClassificationMatch],
    entries: &[EntryDetail],
    min_alignment: i16,
) -> Vec<CandidatePatch> {
    let by_node: HashMap<&str, &EntryDetail> = entries.iter().map(|e| (e.node_id(), e)).collect();

    let mut candidates: Vec<CandidatePatch> = matches
        .iter()
        .filter(|m| m.alignment >= min_alignment)
        .filter_map(|m| {
            let entry = by_node.get(m.node_id.as_str())?;
            let suggested = maturity_to_status(m.suggested_maturity);
            if !suggested.is_evaluated() {
                return None;
            }
            Some(CandidatePatch {
                entry_id: entry.entry.id,
                node_id: m.node_id.clone(),
                current_status: entry.status(),
                suggested_status: suggested,
                alignment: m.alignment,
                reasoning: m.reasoning.clone(),
                patch: EntryPatch {
                    maturity_status: Some(suggested.as_str().to_string()),
                    notes: m.reasoning.clone(),
                    ..Default::default()
                },
            })
        })
        .collect();

    candidates.sort_by(|a, b| b.alignment.cmp(&a.alignment).then_with(|| a.node_id.cmp(&b.node_id)));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::entry;
    use uuid::Uuid;

    fn suggestion(node_id: &str, alignment: i16, maturity: i16) -> ClassificationMatch {
        ClassificationMatch {
            node_id: node_id.into(),
            name: None,
            category_number: None,
            alignment,
            suggested_maturity: maturity,
            reasoning: Some(format!("evidência para {node_id}")),
        }
    }

    #[test]
    fn maps_suggested_maturity_to_status() {
        assert_eq!(maturity_to_status(0), MaturityStatus::NoEvaluado);
        assert_eq!(maturity_to_status(3), MaturityStatus::Documentado);
        assert_eq!(maturity_to_status(5), MaturityStatus::Optimizado);
        assert_eq!(maturity_to_status(9), MaturityStatus::NoEvaluado);
        assert_eq!(maturity_to_status(-1), MaturityStatus::NoEvaluado);
    }

    #[test]
    fn merge_keeps_highest_alignment_per_node() {
        let merged = merge_matches(vec![
            suggestion("8.2.1", 40, 2),
            suggestion("8.2.1", 90, 4),
            suggestion("8.2.1", 70, 3),
            suggestion("8.3", 55, 1),
        ]);
        assert_eq!(merged.len(), 2);
        let best = merged.iter().find(|m| m.node_id == "8.2.1").unwrap();
        assert_eq!(best.alignment, 90);
        assert_eq!(best.suggested_maturity, 4);
    }

    #[test]
    fn candidates_respect_threshold_scope_and_rating() {
        let id = Uuid::new_v4();
        let entries = vec![
            entry(id, "8.2.1", MaturityStatus::NoEvaluado),
            entry(id, "8.3", MaturityStatus::Parcial),
            entry(id, "8.4", MaturityStatus::NoEvaluado),
        ];
        let matches = vec![
            suggestion("8.3", 60, 4),
            suggestion("8.2.1", 85, 3),
            suggestion("8.4", 30, 5),   // abaixo do limiar
            suggestion("8.5", 99, 5),   // fora da avaliação
            suggestion("8.4", 95, 0),   // sem maturidade sugerida
        ];

        let candidates = candidate_patches(&matches, &entries, 50);
        let ids: Vec<&str> = candidates.iter().map(|c| c.node_id.as_str()).collect();
        assert_eq!(ids, vec!["8.2.1", "8.3"]);

        let first = &candidates[0];
        assert_eq!(first.entry_id, entries[0].entry.id);
        assert_eq!(first.current_status, MaturityStatus::NoEvaluado);
        assert_eq!(first.suggested_status, MaturityStatus::Documentado);
        assert_eq!(first.patch.maturity_status.as_deref(), Some("documentado"));
        assert_eq!(candidates[1].current_status, MaturityStatus::Parcial);
    }
}
