// tests/database_guarantees.rs
//
// Rodam contra um Postgres real: `#[sqlx::test]` cria um banco por teste
// (a partir de DATABASE_URL) e aplica as migrações de `migrations/`.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use pcf_backend::{
    common::error::AppError,
    db::{EvaluationRepository, OrganizationRepository, TaxonomyRepository},
    models::{
        evaluation::{CreateEvaluationPayload, CreatedEvaluation, EntryPatch, MaturityStatus},
        organization::{CreateOrganizationPayload, UpdateOrganizationPayload},
        taxonomy::{NodeImportRow, TaxonomyImportPayload},
    },
    services::{
        evaluation_service::EvaluationService,
        organization_service::OrganizationService,
        taxonomy_service::TaxonomyService,
        taxonomy_store::TaxonomyStore,
    },
};

struct Services {
    organizations: OrganizationService,
    evaluations: EvaluationService,
    taxonomy: TaxonomyService,
}

fn row(id: &str) -> NodeImportRow {
    NodeImportRow {
        id: id.into(),
        pcf_id: None,
        name: format!("Proceso {id}"),
        description: None,
    }
}

async fn services(pool: &PgPool) -> Services {
    let store = Arc::new(RwLock::new(TaxonomyStore::new()));
    let taxonomy = TaxonomyService::new(TaxonomyRepository::new(pool.clone()), pool.clone(), store.clone());
    taxonomy
        .import(TaxonomyImportPayload {
            nodes: ["1", "1.1", "1.1.1", "1.1.2", "3", "3.1", "3.1.2", "3.1.2.1"]
                .into_iter()
                .map(row)
                .collect(),
            metrics: vec![],
        })
        .await
        .unwrap();

    Services {
        organizations: OrganizationService::new(OrganizationRepository::new(pool.clone()), pool.clone()),
        evaluations: EvaluationService::new(EvaluationRepository::new(pool.clone()), pool.clone(), store),
        taxonomy,
    }
}

async fn organization(services: &Services, actor: Uuid) -> Uuid {
    services
        .organizations
        .create(
            CreateOrganizationPayload {
                name: "Distribuidora Andina".into(),
                ..Default::default()
            },
            actor,
        )
        .await
        .unwrap()
        .id
}

async fn evaluation(services: &Services, org_id: Uuid, actor: Uuid) -> CreatedEvaluation {
    services
        .evaluations
        .create_evaluation(
            org_id,
            CreateEvaluationPayload {
                name: "Diagnóstico inicial".into(),
                description: None,
                depth: 3,
                included_categories: vec![3],
            },
            actor,
        )
        .await
        .unwrap()
}

#[sqlx::test]
async fn seeding_twice_inserts_nothing_new(pool: PgPool) {
    let services = services(&pool).await;
    let actor = Uuid::new_v4();
    let org_id = organization(&services, actor).await;

    let created = evaluation(&services, org_id, actor).await;
    assert_eq!(created.entry_count, 3);

    let first = services.evaluations.seed_evaluation(created.evaluation.id).await.unwrap();
    let second = services.evaluations.seed_evaluation(created.evaluation.id).await.unwrap();
    assert_eq!(first.inserted, 0);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.entry_count, created.entry_count);

    let ids: Vec<String> = services
        .evaluations
        .get_entries(created.evaluation.id)
        .await
        .unwrap()
        .iter()
        .map(|e| e.node_id().to_string())
        .collect();
    assert_eq!(ids, vec!["3", "3.1", "3.1.2"]);
}

#[sqlx::test]
async fn reseeding_picks_up_newly_imported_nodes(pool: PgPool) {
    let services = services(&pool).await;
    let actor = Uuid::new_v4();
    let org_id = organization(&services, actor).await;
    let created = evaluation(&services, org_id, actor).await;

    services
        .taxonomy
        .import(TaxonomyImportPayload {
            nodes: vec![row("3.2"), row("3.2.1")],
            metrics: vec![],
        })
        .await
        .unwrap();

    let seeded = services.evaluations.seed_evaluation(created.evaluation.id).await.unwrap();
    assert_eq!(seeded.inserted, 2);
    assert_eq!(seeded.entry_count, 5);
}

#[sqlx::test]
async fn entry_of_another_evaluation_is_not_found(pool: PgPool) {
    let services = services(&pool).await;
    let actor = Uuid::new_v4();
    let org_id = organization(&services, actor).await;
    let a = evaluation(&services, org_id, actor).await;
    let b = evaluation(&services, org_id, actor).await;

    let entries_a = services.evaluations.get_entries(a.evaluation.id).await.unwrap();
    let entry_id = entries_a[0].entry.id;

    let patch = EntryPatch {
        maturity_status: Some("documentado".into()),
        ..Default::default()
    };
    let result = services
        .evaluations
        .update_entry(b.evaluation.id, entry_id, patch, actor)
        .await;
    assert!(matches!(
        result,
        Err(AppError::EntryNotFound { entry_id: e, evaluation_id: ev }) if e == entry_id && ev == b.evaluation.id
    ));

    let after = services.evaluations.get_entries(a.evaluation.id).await.unwrap();
    assert_eq!(after, entries_a);
}

#[sqlx::test]
async fn rejected_patch_leaves_row_unchanged(pool: PgPool) {
    let services = services(&pool).await;
    let actor = Uuid::new_v4();
    let org_id = organization(&services, actor).await;
    let created = evaluation(&services, org_id, actor).await;
    let eval_id = created.evaluation.id;

    let before = services.evaluations.get_entries(eval_id).await.unwrap();
    let target = before.iter().find(|e| e.node_id() == "3.1.2").unwrap().entry.id;

    let patch = EntryPatch {
        maturity_status: Some("excelente".into()),
        notes: Some("não deve ser gravado".into()),
        ..Default::default()
    };
    let result = services.evaluations.update_entry(eval_id, target, patch, actor).await;
    assert!(matches!(result, Err(AppError::InvalidMaturityStatus(_))));

    let after = services.evaluations.get_entries(eval_id).await.unwrap();
    assert_eq!(after, before);
}

#[sqlx::test]
async fn accepted_patch_is_persisted_with_score(pool: PgPool) {
    let services = services(&pool).await;
    let actor = Uuid::new_v4();
    let org_id = organization(&services, actor).await;
    let eval_id = evaluation(&services, org_id, actor).await.evaluation.id;

    let entries = services.evaluations.get_entries(eval_id).await.unwrap();
    let target = entries.iter().find(|e| e.node_id() == "3.1.2").unwrap().entry.id;

    let patch = EntryPatch {
        maturity_status: Some("implementado".into()),
        responsible_area: Some("Comercial".into()),
        ..Default::default()
    };
    let updated = services.evaluations.update_entry(eval_id, target, patch, actor).await.unwrap();
    assert_eq!(updated.status(), MaturityStatus::Implementado);
    assert_eq!(updated.node_name, "Proceso 3.1.2");

    let stored = services.evaluations.get_entries(eval_id).await.unwrap();
    let stored = stored.iter().find(|e| e.entry.id == target).unwrap();
    assert_eq!(stored.score(), 4);
    assert_eq!(stored.entry.responsible_area.as_deref(), Some("Comercial"));
    assert_eq!(stored.entry.evaluated_by, Some(actor));
}

#[sqlx::test]
async fn evaluation_for_unknown_organization_is_not_found(pool: PgPool) {
    let services = services(&pool).await;
    let missing = Uuid::new_v4();
    let result = services
        .evaluations
        .create_evaluation(
            missing,
            CreateEvaluationPayload {
                name: "Sem dono".into(),
                description: None,
                depth: 3,
                included_categories: vec![1],
            },
            Uuid::new_v4(),
        )
        .await;
    assert!(matches!(result, Err(AppError::OrganizationNotFound(id)) if id == missing));
}

#[sqlx::test]
async fn organization_lifecycle(pool: PgPool) {
    let services = services(&pool).await;
    let actor = Uuid::new_v4();
    let org_id = organization(&services, actor).await;
    evaluation(&services, org_id, actor).await;

    let listed = services.organizations.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].evaluation_count, 1);

    let updated = services
        .organizations
        .update(
            org_id,
            UpdateOrganizationPayload {
                country: Some(" Chile ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Distribuidora Andina");
    assert_eq!(updated.country.as_deref(), Some("Chile"));

    services.organizations.delete(org_id).await.unwrap();
    assert!(matches!(
        services.organizations.get(org_id).await,
        Err(AppError::OrganizationNotFound(_))
    ));
    assert!(services.evaluations.list_evaluations(org_id).await.unwrap().is_empty());
    assert!(matches!(
        services.organizations.delete(org_id).await,
        Err(AppError::OrganizationNotFound(_))
    ));
}
