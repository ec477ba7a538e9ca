// src/models/tree.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::evaluation::EntryDetail;

/// Visão derivada: nunca é persistida, sempre reconstruída das entradas.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub entry: EntryDetail,
    #[schema(no_recursion)]
    pub children: Vec<TreeNode>,
    pub expanded: bool,
}

impl TreeNode {
    pub fn new(entry: EntryDetail) -> Self {
        let expanded = entry.level <= 2;
        Self {
            entry,
            children: Vec::new(),
            expanded,
        }
    }

    pub fn node_id(&self) -> &str {
        self.entry.node_id()
    }
}
