// src/services/comparison.rs

use std::collections::HashMap;

use crate::{
    models::{
        evaluation::{EntryDetail, Evaluation},
        stats::{CategoryScore, Comparison, EntryChange, TrendPoint},
        taxonomy::compare_hierarchy_ids,
    },
    services::aggregation::{aggregate, by_category},
};

/// Compara duas avaliações da mesma organização (quem chama garante isso).
///
/// `changes` = junção por nó, só pares avaliados dos dois lados e com
/// pontuação diferente. Nós presentes em apenas um dos lados ficam de fora.
pub fn compare(entries_a: &[EntryDetail], entries_b: &[EntryDetail]) -> Comparison {
    let b_by_node: HashMap<&str, &EntryDetail> =
        entries_b.iter().map(|e| (e.node_id(), e)).collect();

    let mut changes: Vec<EntryChange> = entries_a
        .iter()
        .filter(|a| a.status().is_evaluated())
        .filter_map(|a| {
            let b = b_by_node.get(a.node_id())?;
            if !b.status().is_evaluated() || a.score() == b.score() {
                return None;
            }
            Some(EntryChange {
                node_id: a.node_id().to_string(),
                node_name: a.node_name.clone(),
                category_number: a.category_number,
                level: a.level,
                status_a: a.status(),
                score_a: a.score(),
                status_b: b.status(),
                score_b: b.score(),
                delta: b.score() - a.score(),
            })
        })
        .collect();

    // Maiores melhorias primeiro; empate pela posição na taxonomia.
    changes.sort_by(|x, y| {
        y.delta
            .cmp(&x.delta)
            .then_with(|| compare_hierarchy_ids(&x.node_id, &y.node_id))
    });

    Comparison {
        stats_a: aggregate(entries_a),
        stats_b: aggregate(entries_b),
        category_stats_a: by_category(entries_a),
        category_stats_b: by_category(entries_b),
        changes,
    }
}

/// Série temporal das médias de uma organização.
///
/// Avaliações sem nenhuma entrada avaliada não geram ponto; categorias sem
/// avaliação não aparecem no ponto.
pub fn trend(evaluations: &[(Evaluation, Vec<EntryDetail>)]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = evaluations
        .iter()
        .filter_map(|(evaluation, entries)| {
            let stats = aggregate(entries);
            let avg_score = stats.avg_score?;
            let categories = by_category(entries)
                .into_iter()
                .filter_map(|c| {
                    c.stats.avg_score.map(|avg_score| CategoryScore {
                        category_number: c.category_number,
                        avg_score,
                    })
                })
                .collect();
            Some(TrendPoint {
                evaluation_id: evaluation.id,
                name: evaluation.name.clone(),
                created_at: evaluation.created_at,
                avg_score,
                evaluated: stats.evaluated,
                total: stats.total,
                categories,
            })
        })
        .collect();

    points.sort_by_key(|p| p.created_at);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::{EvaluationStatus, MaturityStatus::*};
    use crate::services::test_support::entry;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn reports_improvement_between_evaluations() {
        let (a_id, b_id) = (Uuid::new_v4(), Uuid::new_v4());
        let a = vec![entry(a_id, "1.1", Inexistente)];
        let b = vec![entry(b_id, "1.1", Implementado)];

        let result = compare(&a, &b);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].node_id, "1.1");
        assert_eq!(result.changes[0].delta, 3);
        assert_eq!(result.improvements().count(), 1);
        assert_eq!(result.regressions().count(), 0);
    }

    #[test]
    fn skips_unrated_equal_and_one_sided_nodes() {
        let (a_id, b_id) = (Uuid::new_v4(), Uuid::new_v4());
        let a = vec![
            entry(a_id, "1.1", Parcial),
            entry(a_id, "1.2", NoEvaluado),
            entry(a_id, "1.3", Documentado),
            entry(a_id, "1.4", Optimizado),
        ];
        let b = vec![
            entry(b_id, "1.1", Parcial),
            entry(b_id, "1.2", Optimizado),
            entry(b_id, "1.3", NoEvaluado),
            entry(b_id, "1.4", Parcial),
            // categoria 2 só existe em B
            entry(b_id, "2.1", Implementado),
        ];

        let result = compare(&a, &b);
        let ids: Vec<&str> = result.changes.iter().map(|c| c.node_id.as_str()).collect();
        assert_eq!(ids, vec!["1.4"]);
        assert_eq!(result.changes[0].delta, -3);
        assert_eq!(result.regressions().count(), 1);
        assert_eq!(result.stats_b.total, 5);
        assert_eq!(result.category_stats_a.len(), 1);
        assert_eq!(result.category_stats_b.len(), 2);
    }

    #[test]
    fn deltas_are_antisymmetric_and_sorted() {
        let (a_id, b_id) = (Uuid::new_v4(), Uuid::new_v4());
        let a = vec![
            entry(a_id, "3.1", Inexistente),
            entry(a_id, "3.2", Documentado),
            entry(a_id, "3.3", Parcial),
        ];
        let b = vec![
            entry(b_id, "3.1", Documentado),
            entry(b_id, "3.2", Parcial),
            entry(b_id, "3.3", Optimizado),
        ];

        let forward = compare(&a, &b);
        let deltas: Vec<i16> = forward.changes.iter().map(|c| c.delta).collect();
        assert_eq!(deltas, vec![3, 2, -1]);

        let backward = compare(&b, &a);
        for change in &forward.changes {
            let mirror = backward.changes.iter().find(|c| c.node_id == change.node_id).unwrap();
            assert_eq!(mirror.delta, -change.delta);
        }
    }

    fn evaluation(name: &str, days_ago: i64) -> Evaluation {
        let created_at = Utc::now() - Duration::days(days_ago);
        Evaluation {
            id: Uuid::new_v4(),
            organization_id: Uuid::nil(),
            name: name.into(),
            description: None,
            depth: 3,
            included_categories: vec![1, 2],
            status: EvaluationStatus::Completed,
            created_by: None,
            started_at: None,
            completed_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn trend_orders_by_creation_and_skips_empty_evaluations() {
        let recent = evaluation("2025", 10);
        let old = evaluation("2024", 400);
        let untouched = evaluation("2025-b", 5);

        let series = vec![
            (recent.clone(), vec![entry(recent.id, "1.1", Optimizado), entry(recent.id, "2.1", NoEvaluado)]),
            (untouched.clone(), vec![entry(untouched.id, "1.1", NoEvaluado)]),
            (old.clone(), vec![entry(old.id, "1.1", Parcial), entry(old.id, "2.1", Documentado)]),
        ];

        let points = trend(&series);
        assert_eq!(points.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), vec!["2024", "2025"]);
        assert_eq!(points[0].avg_score, Decimal::new(250, 2));
        assert_eq!(points[0].categories.len(), 2);
        assert_eq!(points[1].categories.len(), 1, "categoria 2 sem avaliação");
        assert_eq!(points[1].total, 2);
    }
}
