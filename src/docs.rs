// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- PCF ---
        handlers::taxonomy::search_or_roots,
        handlers::taxonomy::get_node,
        handlers::taxonomy::get_children,
        handlers::taxonomy::get_metrics,
        handlers::taxonomy::import_taxonomy,

        // --- Organizações ---
        handlers::organizations::list_organizations,
        handlers::organizations::create_organization,
        handlers::organizations::get_organization,
        handlers::organizations::update_organization,
        handlers::organizations::delete_organization,

        // --- Avaliações ---
        handlers::evaluations::create_evaluation,
        handlers::evaluations::list_evaluations,
        handlers::evaluations::get_evaluation,
        handlers::evaluations::set_status,
        handlers::evaluations::seed_evaluation,

        // --- Entradas ---
        handlers::evaluations::list_entries,
        handlers::evaluations::update_entry,

        // --- Análises ---
        handlers::analytics::get_tree,
        handlers::analytics::get_stats,
        handlers::analytics::get_gaps,
        handlers::analytics::compare_evaluations,
        handlers::analytics::get_trend,
        handlers::analytics::suggest_patches,
    ),
    components(
        schemas(
            // --- PCF ---
            models::taxonomy::TaxonomyNode,
            models::taxonomy::Metric,
            models::taxonomy::NodeImportRow,
            models::taxonomy::TaxonomyImportPayload,
            models::taxonomy::ImportSummary,
            models::taxonomy::NodePage,
            models::taxonomy::NodeBadges,
            models::taxonomy::NodeDetail,
            models::taxonomy::NodeList,

            // --- Organizações ---
            models::organization::Organization,
            models::organization::OrganizationSummary,
            models::organization::CreateOrganizationPayload,
            models::organization::UpdateOrganizationPayload,

            // --- Avaliações ---
            models::evaluation::MaturityStatus,
            models::evaluation::EvaluationStatus,
            models::evaluation::Evaluation,
            models::evaluation::CreateEvaluationPayload,
            models::evaluation::UpdateEvaluationStatusPayload,
            models::evaluation::CreatedEvaluation,
            models::evaluation::SeedSummary,
            models::evaluation::Entry,
            models::evaluation::EntryPatch,
            models::evaluation::EntryDetail,
            models::tree::TreeNode,

            // --- Análises ---
            models::stats::StatusCounts,
            models::stats::Stats,
            models::stats::CategoryStats,
            models::stats::LevelStats,
            models::stats::StatsGrouping,
            models::stats::EvaluationStats,
            models::stats::CategoryGap,
            models::stats::GapReport,
            models::stats::EntryChange,
            models::stats::Comparison,
            models::stats::ComparisonReport,
            models::stats::CategoryScore,
            models::stats::TrendPoint,

            // --- Sugestões ---
            models::classification::ClassificationMatch,
            models::classification::DocumentMatches,
            models::classification::SuggestionPayload,
            models::classification::CandidatePatch,
        )
    ),
    tags(
        (name = "PCF", description = "Taxonomia APQC (navegação, busca e importação)"),
        (name = "Organizations", description = "Cadastro das organizações avaliadas"),
        (name = "Evaluations", description = "Ciclo de vida das avaliações de maturidade"),
        (name = "Entries", description = "Avaliação de cada processo"),
        (name = "Analytics", description = "Árvore, indicadores, lacunas, comparação e tendência")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/pcf",
            "/api/pcf/{node_id}/children",
            "/api/organizations",
            "/api/organizations/{org_id}",
            "/api/organizations/{org_id}/evaluations",
            "/api/organizations/{org_id}/compare",
            "/api/evaluations/{eval_id}/entries/{entry_id}",
            "/api/evaluations/{eval_id}/suggestions",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltou {path}");
        }
        assert!(doc.components.unwrap().security_schemes.contains_key("api_jwt"));
    }
}
