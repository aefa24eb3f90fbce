use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::categories::dtos::CategoryNode;
use crate::features::settings::dtos::HomeSettingsView;
use crate::features::websites::dtos::RecommendedWebsitesView;

/// Everything the home page renders
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HomeView {
    pub settings: HomeSettingsView,
    /// Sidebar categories; the whole forest when no selection is stored
    pub categories: Vec<CategoryNode>,
    /// Present only when `show_recommended` is on
    pub recommended: Option<RecommendedWebsitesView>,
}

/// Pick the sidebar subtrees named by `ids`, in `ids` order.
///
/// An empty selection keeps the whole forest. Unknown ids are skipped and a
/// repeated id is shown once.
pub fn select_sidebar(forest: Vec<CategoryNode>, ids: &[i64]) -> Vec<CategoryNode> {
    if ids.is_empty() {
        return forest;
    }

    let by_id: HashMap<i64, &CategoryNode> = CategoryNode::walk(&forest)
        .into_iter()
        .map(|node| (node.id, node))
        .collect();

    let mut picked = Vec::with_capacity(ids.len());
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if seen.contains(id) {
            continue;
        }
        if let Some(node) = by_id.get(id) {
            picked.push((*node).clone());
            seen.push(*id);
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, children: Vec<CategoryNode>) -> CategoryNode {
        CategoryNode {
            id,
            parent_id: None,
            name: format!("c{}", id),
            display_order: 0,
            icon_url: None,
            icon: None,
            website_count: 0,
            children,
        }
    }

    fn forest() -> Vec<CategoryNode> {
        vec![
            node(1, vec![node(2, vec![]), node(3, vec![])]),
            node(4, vec![]),
        ]
    }

    #[test]
    fn test_empty_selection_keeps_forest() {
        assert_eq!(select_sidebar(forest(), &[]), forest());
    }

    #[test]
    fn test_selection_follows_id_order() {
        let picked = select_sidebar(forest(), &[4, 1]);
        let ids: Vec<i64> = picked.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 1]);
        assert_eq!(picked[1].children.len(), 2);
    }

    #[test]
    fn test_selection_reaches_nested_and_skips_unknown() {
        let picked = select_sidebar(forest(), &[3, 99, 3]);
        let ids: Vec<i64> = picked.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3]);
    }
}
