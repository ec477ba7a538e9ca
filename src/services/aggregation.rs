// src/services/aggregation.rs

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    evaluation::EntryDetail,
    stats::{CategoryStats, LevelStats, Stats, StatusCounts},
};

/// Calcula os agregados sobre um subconjunto arbitrário de entradas.
pub fn aggregate<'a, I>(entries: I) -> Stats
where
    I: IntoIterator<Item = &'a EntryDetail>,
{
    let mut total = 0u64;
    let mut not_applicable = 0u64;
    let mut counts = StatusCounts::default();
    let mut score_sum = 0i64;

    for e in entries {
        total += 1;
        counts.bump(e.status());
        if !e.entry.is_applicable {
            not_applicable += 1;
        }
        if e.status().is_evaluated() {
            score_sum += i64::from(e.score());
        }
    }

    let pending = counts.no_evaluado;
    let evaluated = total - pending;
    let avg_score = average(score_sum, evaluated);

    Stats {
        total,
        evaluated,
        pending,
        not_applicable,
        counts,
        avg_score,
        progress_pct: percent(evaluated, total),
    }
}

/// Média com 2 casas (meio para longe do zero). `None` sem avaliações.
pub fn average(sum: i64, count: u64) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    let avg = Decimal::from(sum) / Decimal::from(count);
    Some(avg.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// round(100 * part / whole), 0 quando `whole == 0`.
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)) as u32
}

pub fn progress_pct(stats: &Stats) -> u32 {
    percent(stats.evaluated, stats.total)
}

/// Agrega por uma chave qualquer. As agregações por categoria e por
/// nível são só parametrizações desta função.
pub fn group_by<K, F>(entries: &[EntryDetail], key: F) -> BTreeMap<K, Stats>
where
    K: Ord,
    F: Fn(&EntryDetail) -> K,
{
    let mut groups: BTreeMap<K, Vec<&EntryDetail>> = BTreeMap::new();
    for e in entries {
        groups.entry(key(e)).or_default().push(e);
    }
    groups
        .into_iter()
        .map(|(k, members)| (k, aggregate(members)))
        .collect()
}

pub fn by_category(entries: &[EntryDetail]) -> Vec<CategoryStats> {
    group_by(entries, |e| e.category_number)
        .into_iter()
        .map(|(category_number, stats)| CategoryStats { category_number, stats })
        .collect()
}

pub fn by_level(entries: &[EntryDetail]) -> Vec<LevelStats> {
    group_by(entries, |e| e.level)
        .into_iter()
        .map(|(level, stats)| LevelStats { level, stats })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::{Entry, MaturityStatus};
    use uuid::Uuid;

    fn rated(id: &str, level: i16, category: i16, status: MaturityStatus) -> EntryDetail {
        EntryDetail {
            entry: Entry {
                id: Uuid::new_v4(),
                evaluation_id: Uuid::nil(),
                node_id: id.into(),
                maturity_status: status,
                maturity_score: status.score(),
                is_applicable: true,
                client_process_name: None,
                responsible_area: None,
                responsible_person: None,
                notes: None,
                evaluated_by: None,
                evaluated_at: None,
            },
            node_name: id.into(),
            node_description: None,
            level,
            parent_id: None,
            category_number: category,
        }
    }

    #[test]
    fn empty_set_has_no_average() {
        let none: Vec<EntryDetail> = Vec::new();
        let stats = aggregate(&none);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.evaluated, 0);
        assert_eq!(stats.avg_score, None);
        assert_eq!(stats.progress_pct, 0);
    }

    #[test]
    fn unrated_entries_count_but_do_not_average() {
        let entries = vec![
            rated("1.1", 2, 1, MaturityStatus::NoEvaluado),
            rated("1.1.1", 3, 1, MaturityStatus::NoEvaluado),
        ];
        let stats = aggregate(&entries);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.avg_score, None, "sem dados não é o mesmo que zero");
    }

    #[test]
    fn counts_every_status_and_rounds_average() {
        use MaturityStatus::*;
        let entries = vec![
            rated("1.1", 2, 1, Inexistente),
            rated("1.2", 2, 1, Parcial),
            rated("1.3", 2, 1, Parcial),
            rated("1.4", 2, 1, NoEvaluado),
        ];
        let stats = aggregate(&entries);

        assert_eq!(stats.evaluated, 3);
        assert_eq!(stats.counts.get(Parcial), 2);
        assert_eq!(stats.counts.get(Inexistente), 1);
        assert_eq!(stats.counts.get(Optimizado), 0);
        // (1 + 2 + 2) / 3 = 1.666...
        assert_eq!(stats.avg_score, Some(Decimal::new(167, 2)));
        assert_eq!(stats.progress_pct, 75);
    }

    #[test]
    fn not_applicable_entries_still_count() {
        let mut entry = rated("1.1", 2, 1, MaturityStatus::Optimizado);
        entry.entry.is_applicable = false;
        let stats = aggregate(&[entry]);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.not_applicable, 1);
        assert_eq!(stats.avg_score, Some(Decimal::new(500, 2)));
    }

    #[test]
    fn percent_rounds_half_up_and_handles_zero() {
        assert_eq!(percent(1, 8), 13); // 12.5
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(0, 0), 0);
        assert_eq!(average(5, 2), Some(Decimal::new(250, 2)));
        assert_eq!(average(1, 8), Some(Decimal::new(13, 2))); // 0.125
    }

    #[test]
    fn groupings_reuse_the_same_aggregate() {
        use MaturityStatus::*;
        let entries = vec![
            rated("1.1", 2, 1, Documentado),
            rated("1.1.1", 3, 1, Implementado),
            rated("3.1", 2, 3, Inexistente),
            rated("3.1.1", 3, 3, NoEvaluado),
        ];

        let categories = by_category(&entries);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category_number, 1);
        assert_eq!(categories[0].stats.avg_score, Some(Decimal::new(350, 2)));
        assert_eq!(categories[1].stats, aggregate(&entries[2..]));

        let levels = by_level(&entries);
        assert_eq!(levels.iter().map(|l| l.level).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(levels[1].stats.evaluated, 1);

        let by_applicability = group_by(&entries, |e| e.entry.is_applicable);
        assert_eq!(by_applicability[&true].total, 4);
    }
}
