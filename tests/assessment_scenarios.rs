// tests/assessment_scenarios.rs

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use pcf_backend::{
    models::{
        evaluation::{Entry, EntryDetail, EntryPatch, MaturityStatus},
        stats::GapOptions,
        taxonomy::{NodeImportRow, TaxonomyNode},
    },
    services::{
        aggregation::aggregate,
        comparison::compare,
        gap_detector::find_gaps,
        taxonomy_store::TaxonomyStore,
        tree_builder::{build_tree, flatten},
    },
};

fn node(id: &str) -> TaxonomyNode {
    TaxonomyNode::from_import(NodeImportRow {
        id: id.into(),
        pcf_id: None,
        name: format!("Proceso {id}"),
        description: None,
    })
    .unwrap()
}

fn store(ids: &[&str]) -> TaxonomyStore {
    let mut store = TaxonomyStore::new();
    store.upsert_nodes(ids.iter().map(|id| node(id)).collect()).unwrap();
    store
}

/// Entradas novas (`no_evaluado`) para o escopo, como o seeding grava.
fn seed(store: &TaxonomyStore, depth: i16, categories: &[i16]) -> Vec<EntryDetail> {
    let evaluation_id = Uuid::new_v4();
    store
        .select_scope(depth, categories)
        .into_iter()
        .map(|n| {
            let entry = Entry {
                id: Uuid::new_v4(),
                evaluation_id,
                node_id: n.id.clone(),
                maturity_status: MaturityStatus::NoEvaluado,
                maturity_score: 0,
                is_applicable: true,
                client_process_name: None,
                responsible_area: None,
                responsible_person: None,
                notes: None,
                evaluated_by: None,
                evaluated_at: None,
            };
            EntryDetail::from_parts(entry, n)
        })
        .collect()
}

fn rate(entries: &mut [EntryDetail], node_id: &str, status: &str) {
    let target = entries.iter_mut().find(|e| e.node_id() == node_id).unwrap();
    let patch = EntryPatch {
        maturity_status: Some(status.into()),
        ..Default::default()
    };
    target.entry = target.entry.apply_patch(&patch, Uuid::new_v4(), Utc::now()).unwrap();
}

#[test]
fn seeding_and_rating_one_process() {
    let taxonomy = store(&["3", "3.1", "3.1.2", "3.1.2.1", "4", "4.1"]);
    let mut entries = seed(&taxonomy, 3, &[3]);
    let seeded: Vec<&str> = entries.iter().map(|e| e.node_id()).collect();
    assert_eq!(seeded, vec!["3", "3.1", "3.1.2"]);

    rate(&mut entries, "3.1.2", "documentado");
    let rated = entries.iter().find(|e| e.node_id() == "3.1.2").unwrap();
    assert_eq!(rated.score(), 3);

    // só "3.1" e "3.1.2"
    let stats = aggregate(entries.iter().filter(|e| e.level >= 2));
    assert_eq!(stats.total, 2);
    assert_eq!(stats.evaluated, 1);
    assert_eq!(stats.avg_score, Some(Decimal::new(300, 2)));
}

#[test]
fn scope_selection_is_repeatable() {
    let taxonomy = store(&["1", "1.1", "1.1.1", "2", "2.1", "2.1.1", "2.1.1.1"]);
    let first: Vec<String> = seed(&taxonomy, 3, &[1, 2]).iter().map(|e| e.node_id().to_string()).collect();
    let second: Vec<String> = seed(&taxonomy, 3, &[2, 1]).iter().map(|e| e.node_id().to_string()).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
}

#[test]
fn improvement_between_two_evaluations() {
    let taxonomy = store(&["1", "1.1"]);
    let mut a = seed(&taxonomy, 3, &[1]);
    let mut b = seed(&taxonomy, 3, &[1]);
    rate(&mut a, "1.1", "inexistente");
    rate(&mut b, "1.1", "implementado");

    let result = compare(&a, &b);
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].node_id, "1.1");
    assert_eq!(result.changes[0].delta, 3);
    assert_eq!(result.improvements().count(), 1);
    assert_eq!(result.regressions().count(), 0);

    let reverse = compare(&b, &a);
    assert_eq!(reverse.changes[0].delta, -3);
}

#[test]
fn category_outside_one_evaluation_is_not_compared() {
    let taxonomy = store(&["1", "1.1", "2", "2.1"]);
    let mut c = seed(&taxonomy, 3, &[1]);
    let mut d = seed(&taxonomy, 3, &[1, 2]);
    rate(&mut c, "1.1", "parcial");
    rate(&mut d, "1.1", "optimizado");
    rate(&mut d, "2.1", "optimizado");

    let result = compare(&c, &d);
    assert!(result.changes.iter().all(|ch| ch.category_number != 2));
    assert_eq!(result.changes.len(), 1);
}

#[test]
fn tree_is_pure_and_order_independent() {
    let taxonomy = store(&["5", "5.1", "5.1.1", "5.2", "5.10", "6", "6.1"]);
    let entries = seed(&taxonomy, 3, &[5, 6]);
    let mut shuffled = entries.clone();
    shuffled.reverse();
    shuffled.swap(0, 3);

    let first = build_tree(&entries);
    assert_eq!(first, build_tree(&entries));

    let ids = |tree: &[pcf_backend::models::tree::TreeNode]| -> Vec<String> {
        flatten(tree).iter().map(|e| e.node_id().to_string()).collect()
    };
    assert_eq!(ids(&first), ids(&build_tree(&shuffled)));
}

#[test]
fn gaps_respect_level_and_statuses() {
    let taxonomy = store(&["8", "8.1", "8.1.1", "8.1.2", "8.1.3"]);
    let mut entries = seed(&taxonomy, 3, &[8]);
    rate(&mut entries, "8", "inexistente");
    rate(&mut entries, "8.1", "parcial");
    rate(&mut entries, "8.1.1", "parcial");
    rate(&mut entries, "8.1.2", "optimizado");
    rate(&mut entries, "8.1.3", "inexistente");

    let options = GapOptions::default();
    let gaps = find_gaps(&entries, &options);
    assert_eq!(gaps.iter().map(|e| e.node_id()).collect::<Vec<_>>(), vec!["8.1.3", "8.1.1"]);
    for gap in gaps {
        assert!(gap.level >= options.min_level);
        assert!(options.statuses.contains(&gap.status()));
    }
}
