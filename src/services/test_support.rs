// src/services/test_support.rs

use uuid::Uuid;

use crate::models::{
    evaluation::{Entry, EntryDetail, MaturityStatus},
    taxonomy::{parent_of, parse_hierarchy_id},
};

/// Entrada com nível, pai e categoria derivados do ID.
pub(crate) fn entry(evaluation_id: Uuid, node_id: &str, status: MaturityStatus) -> EntryDetail {
    let segments = parse_hierarchy_id(node_id).expect("ID de teste válido");
    EntryDetail {
        entry: Entry {
            id: Uuid::new_v4(),
            evaluation_id,
            node_id: node_id.to_string(),
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
        node_name: format!("Proceso {node_id}"),
        node_description: None,
        level: segments.len() as i16,
        parent_id: parent_of(node_id).map(str::to_string),
        category_number: segments[0] as i16,
    }
}
