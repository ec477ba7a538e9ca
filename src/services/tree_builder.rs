// src/services/tree_builder.rs

use std::collections::HashMap;

use crate::models::{
    evaluation::EntryDetail,
    taxonomy::{compare_hierarchy_ids, is_ancestor_of},
    tree::TreeNode,
};

/// Coloca as entradas na ordem da taxonomia (pré-ordem em profundidade).
pub fn sort_entries(entries: &mut [EntryDetail]) {
    entries.sort_by(|a, b| compare_hierarchy_ids(a.node_id(), b.node_id()));
}

/// Monta a árvore pai -> filhos a partir de um conjunto de entradas.
///
/// Uma entrada cujo pai não está no conjunto vira raiz. O resultado não
/// depende da ordem de entrada.
pub fn build_tree(entries: &[EntryDetail]) -> Vec<TreeNode> {
    let mut ordered = entries.to_vec();
    sort_entries(&mut ordered);

    // 1ª passada: índice por ID; 2ª passada: liga cada entrada ao pai (ou às raízes)
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); ordered.len()];
    let mut roots = Vec::new();
    {
        let index: HashMap<&str, usize> = ordered
            .iter()
            .enumerate()
            .map(|(i, e)| (e.node_id(), i))
            .collect();
        for (i, entry) in ordered.iter().enumerate() {
            match entry.parent_id.as_deref().and_then(|p| index.get(p)) {
                Some(&parent) => children[parent].push(i),
                None => roots.push(i),
            }
        }
    }

    // Descendentes vêm depois dos ancestrais, então de trás para frente
    // todo filho já está montado quando o pai é visitado.
    let mut built: Vec<Option<TreeNode>> = (0..ordered.len()).map(|_| None).collect();
    for (i, entry) in ordered.into_iter().enumerate().rev() {
        let mut node = TreeNode::new(entry);
        node.children = children[i].iter().filter_map(|&c| built[c].take()).collect();
        built[i] = Some(node);
    }

    roots.into_iter().filter_map(|i| built[i].take()).collect()
}

/// Alterna `expanded` de um único nó. Retorna `false` se o ID não existe.
pub fn toggle_expanded(roots: &mut [TreeNode], node_id: &str) -> bool {
    for node in roots.iter_mut() {
        if node.node_id() == node_id {
            node.expanded = !node.expanded;
            return true;
        }
        // Só desce por quem é prefixo do ID procurado.
        if is_ancestor_of(node.node_id(), node_id) && toggle_expanded(&mut node.children, node_id) {
            return true;
        }
    }
    false
}

/// Lista plana para revisão sequencial ("próximo/anterior").
pub fn flatten(roots: &[TreeNode]) -> Vec<&EntryDetail> {
    fn walk<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a EntryDetail>) {
        for node in nodes {
            out.push(&node.entry);
            walk(&node.children, out);
        }
    }
    let mut out = Vec::new();
    walk(roots, &mut out);
    out
}

/// Entrada seguinte na ordem da taxonomia (`entries` já ordenadas).
pub fn next_entry<'a>(entries: &'a [EntryDetail], node_id: &str) -> Option<&'a EntryDetail> {
    let pos = entries.iter().position(|e| e.node_id() == node_id)?;
    entries.get(pos + 1)
}

pub fn previous_entry<'a>(entries: &'a [EntryDetail], node_id: &str) -> Option<&'a EntryDetail> {
    let pos = entries.iter().position(|e| e.node_id() == node_id)?;
    pos.checked_sub(1).and_then(|p| entries.get(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::MaturityStatus;
    use crate::services::test_support::entry;
    use uuid::Uuid;

    fn detail(id: &str) -> EntryDetail {
        entry(Uuid::nil(), id, MaturityStatus::NoEvaluado)
    }

    fn shape(nodes: &[TreeNode]) -> Vec<(String, Vec<String>)> {
        flatten(nodes)
            .iter()
            .map(|e| e.node_id().to_string())
            .map(|id| {
                let kids = find(nodes, &id)
                    .map(|n| n.children.iter().map(|c| c.node_id().to_string()).collect())
                    .unwrap_or_default();
                (id, kids)
            })
            .collect()
    }

    fn find<'a>(nodes: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
        nodes.iter().find_map(|n| {
            if n.node_id() == id {
                Some(n)
            } else {
                find(&n.children, id)
            }
        })
    }

    #[test]
    fn attaches_children_and_defaults_expansion() {
        let entries: Vec<EntryDetail> = ["1", "1.1", "1.1.1", "1.1.2", "1.2", "2"].map(detail).to_vec();
        let tree = build_tree(&entries);

        assert_eq!(tree.len(), 2);
        let one = &tree[0];
        assert_eq!(one.node_id(), "1");
        assert!(one.expanded);
        assert_eq!(one.children.len(), 2);

        let group = &one.children[0];
        assert!(group.expanded);
        assert!(!group.children[0].expanded, "nível 3 começa recolhido");
    }

    #[test]
    fn missing_parent_becomes_root() {
        let entries: Vec<EntryDetail> = ["3.1", "3.1.2", "4.2.1"].map(detail).to_vec();
        let tree = build_tree(&entries);
        let roots: Vec<&str> = tree.iter().map(TreeNode::node_id).collect();
        assert_eq!(roots, vec!["3.1", "4.2.1"]);
    }

    #[test]
    fn result_is_independent_of_input_order() {
        let ids = ["1", "1.10", "1.2", "1.2.1", "1.1", "2", "2.1"];
        let forward: Vec<EntryDetail> = ids.map(detail).to_vec();
        let mut backward = forward.clone();
        backward.reverse();

        let a = build_tree(&forward);
        let b = build_tree(&backward);
        assert_eq!(shape(&a), shape(&b));
        assert_eq!(a, build_tree(&forward));
    }

    #[test]
    fn flatten_is_taxonomy_preorder() {
        let entries: Vec<EntryDetail> = ["2", "1.10", "1.2", "1", "1.2.1"].map(detail).to_vec();
        let tree = build_tree(&entries);
        let order: Vec<&str> = flatten(&tree).iter().map(|e| e.node_id()).collect();
        assert_eq!(order, vec!["1", "1.2", "1.2.1", "1.10", "2"]);

        let mut sorted = entries.clone();
        sort_entries(&mut sorted);
        let sorted_ids: Vec<&str> = sorted.iter().map(EntryDetail::node_id).collect();
        assert_eq!(sorted_ids, order);
    }

    #[test]
    fn toggle_touches_only_one_node() {
        let entries: Vec<EntryDetail> = ["1", "1.1", "1.1.1", "1.2", "1.2.1"].map(detail).to_vec();
        let mut tree = build_tree(&entries);
        let before = tree.clone();

        assert!(toggle_expanded(&mut tree, "1.2.1"));
        assert!(find(&tree, "1.2.1").unwrap().expanded);
        for id in ["1", "1.1", "1.1.1", "1.2"] {
            assert_eq!(find(&tree, id).unwrap().expanded, find(&before, id).unwrap().expanded);
        }
        assert!(!toggle_expanded(&mut tree, "7.7"));
    }

    #[test]
    fn next_and_previous_follow_order() {
        let mut entries: Vec<EntryDetail> = ["1.2", "1", "1.1"].map(detail).to_vec();
        sort_entries(&mut entries);

        assert_eq!(next_entry(&entries, "1").unwrap().node_id(), "1.1");
        assert_eq!(previous_entry(&entries, "1.2").unwrap().node_id(), "1.1");
        assert!(previous_entry(&entries, "1").is_none());
        assert!(next_entry(&entries, "1.2").is_none());
    }
}
