// src/services/gap_detector.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        evaluation::{EntryDetail, MaturityStatus},
        stats::{CategoryGap, CategoryStats, GapOptions, GapQuery},
        taxonomy::{compare_hierarchy_ids, MAX_LEVEL},
    },
    services::aggregation::percent,
};

impl GapOptions {
    /// Converte a query string em opções, aplicando os padrões
    /// (nível 3+, inexistente/parcial).
    pub fn from_query(query: &GapQuery) -> Result<Self, AppError> {
        let mut options = GapOptions::default();
        if let Some(min_level) = query.min_level {
            options.min_level = min_level;
        }
        if let Some(raw) = query.statuses.as_deref().filter(|s| !s.trim().is_empty()) {
            options.statuses = raw
                .split(',')
                .map(str::parse::<MaturityStatus>)
                .collect::<Result<Vec<_>, _>>()?;
        }
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=MAX_LEVEL).contains(&self.min_level) {
            return Err(AppError::InvalidInput("minLevel deve estar entre 1 e 5".into()));
        }
        if self.statuses.is_empty() {
            return Err(AppError::InvalidInput("informe ao menos um status".into()));
        }
        if self.statuses.contains(&MaturityStatus::NoEvaluado) {
            return Err(AppError::InvalidInput(
                "lacunas são entradas avaliadas; no_evaluado não é aceito".into(),
            ));
        }
        Ok(())
    }
}

/// Entradas com status-alvo em nível >= `min_level`, piores primeiro:
/// pontuação, depois categoria, depois posição na taxonomia.
pub fn find_gaps<'a>(entries: &'a [EntryDetail], options: &GapOptions) -> Vec<&'a EntryDetail> {
    let mut gaps: Vec<&EntryDetail> = entries
        .iter()
        .filter(|e| e.level >= options.min_level)
        .filter(|e| options.statuses.contains(&e.status()))
        .collect();

    gaps.sort_by(|a, b| {
        a.score()
            .cmp(&b.score())
            .then(a.category_number.cmp(&b.category_number))
            .then_with(|| compare_hierarchy_ids(a.node_id(), b.node_id()))
    });
    gaps
}

/// (inexistente + parcial) / avaliadas. `None` quando nada foi avaliado.
pub fn gap_ratio(stats: &CategoryStats) -> Option<Decimal> {
    let evaluated = stats.stats.evaluated;
    if evaluated == 0 {
        return None;
    }
    let gaps = stats.stats.counts.inexistente + stats.stats.counts.parcial;
    Some(Decimal::from(gaps) / Decimal::from(evaluated))
}

/// Categorias por gravidade (maior proporção de lacunas primeiro).
/// Categorias sem nenhuma avaliação ficam de fora.
pub fn rank_categories(category_stats: &[CategoryStats]) -> Vec<CategoryGap> {
    let mut ranked: Vec<(Decimal, CategoryGap)> = category_stats
        .iter()
        .filter_map(|c| {
            let ratio = gap_ratio(c)?;
            let gap_count = c.stats.counts.inexistente + c.stats.counts.parcial;
            let gap = CategoryGap {
                category_number: c.category_number,
                gap_count,
                evaluated: c.stats.evaluated,
                gap_ratio: ratio.round_dp(4),
                gap_pct: percent(gap_count, c.stats.evaluated),
            };
            Some((ratio, gap))
        })
        .collect();

    // Ordena pela proporção exata; o arredondamento é só para exibição.
    ranked.sort_by(|(ra, a), (rb, b)| {
        rb.cmp(ra)
            .then(a.category_number.cmp(&b.category_number))
    });
    ranked.into_iter().map(|(_, gap)| gap).collect()
}
