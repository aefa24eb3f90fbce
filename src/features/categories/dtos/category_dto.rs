use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::CategoryWithCount;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub display_order: i32,
    pub icon_url: Option<String>,
    pub icon: Option<String>,
    /// Number of websites filed directly under this category
    pub website_count: i64,
}

impl From<CategoryWithCount> for CategoryResponseDto {
    fn from(row: CategoryWithCount) -> Self {
        let c = row.category;
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            display_order: c.display_order,
            icon_url: c.icon_url,
            icon: c.icon,
            website_count: row.website_count,
        }
    }
}

/// Category with its nested children; built per cache miss and never mutated afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryNode {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub display_order: i32,
    pub icon_url: Option<String>,
    pub icon: Option<String>,
    pub website_count: i64,
    pub children: Vec<CategoryNode>,
}

impl From<CategoryWithCount> for CategoryNode {
    fn from(row: CategoryWithCount) -> Self {
        let c = row.category;
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            display_order: c.display_order,
            icon_url: c.icon_url,
            icon: c.icon,
            website_count: row.website_count,
            children: Vec::new(),
        }
    }
}

/// Body of `GET /api/categories`: a flat list, or the forest when `tree=true`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryListing {
    Flat(Vec<CategoryResponseDto>),
    Tree(Vec<CategoryNode>),
}

impl CategoryListing {
    /// Number of categories listed, nested ones included
    pub fn total(&self) -> usize {
        match self {
            CategoryListing::Flat(categories) => categories.len(),
            CategoryListing::Tree(forest) => CategoryNode::walk(forest).len(),
        }
    }
}

impl CategoryNode {
    /// Build the category forest from rows already sorted by `display_order`.
    ///
    /// Siblings keep input order. A row whose parent id is unknown is placed at
    /// the top level. Rows on a parent cycle are unreachable from any root and
    /// are left out; no error is raised for them.
    pub fn build_forest(rows: Vec<CategoryWithCount>) -> Vec<CategoryNode> {
        // Index pass: id -> slot. First row wins on duplicate ids.
        let mut index: HashMap<i64, usize> = HashMap::with_capacity(rows.len());
        for (slot, row) in rows.iter().enumerate() {
            index.entry(row.category.id).or_insert(slot);
        }

        // Link pass: children lists hold slots, never references
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
        let mut roots = Vec::new();
        for (slot, row) in rows.iter().enumerate() {
            match row.category.parent_id.and_then(|p| index.get(&p)) {
                Some(&parent) => children[parent].push(slot),
                None => roots.push(slot),
            }
        }

        let mut nodes: Vec<Option<CategoryNode>> =
            rows.into_iter().map(|row| Some(row.into())).collect();

        // Post-order assembly: a node is closed after all of its children are
        let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&slot| (slot, false)).collect();
        while let Some((slot, expanded)) = stack.pop() {
            if expanded {
                let kids: Vec<CategoryNode> = children[slot]
                    .iter()
                    .filter_map(|&child| nodes[child].take())
                    .collect();
                if let Some(node) = nodes[slot].as_mut() {
                    node.children = kids;
                }
            } else {
                stack.push((slot, true));
                stack.extend(children[slot].iter().map(|&child| (child, false)));
            }
        }

        roots
            .into_iter()
            .filter_map(|slot| nodes[slot].take())
            .collect()
    }

    /// Depth-first, pre-order walk over a forest
    pub fn walk<'a>(forest: &'a [CategoryNode]) -> Vec<&'a CategoryNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&CategoryNode> = forest.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub display_order: i32,
    #[validate(url(message = "Icon URL must be a valid URL"))]
    pub icon_url: Option<String>,
    #[validate(length(max = 100, message = "Icon must be at most 100 characters"))]
    pub icon: Option<String>,
}

/// Request DTO for updating a category (full replacement)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub parent_id: Option<i64>,
    pub display_order: i32,
    #[validate(url(message = "Icon URL must be a valid URL"))]
    pub icon_url: Option<String>,
    #[validate(length(max = 100, message = "Icon must be at most 100 characters"))]
    pub icon: Option<String>,
}

/// New position of one category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryOrderDto {
    pub id: i64,
    pub display_order: i32,
}

/// Request DTO for reordering categories
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReorderCategoriesDto {
    #[validate(length(min = 1, message = "At least one category is required"))]
    pub items: Vec<CategoryOrderDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use chrono::Utc;
    use fake::faker::lorem::en::Word;
    use fake::Fake;
    use std::collections::HashSet;

    fn row(id: i64, parent_id: Option<i64>, display_order: i32, name: &str) -> CategoryWithCount {
        let now = Utc::now();
        CategoryWithCount {
            category: Category {
                id,
                parent_id,
                name: name.to_string(),
                display_order,
                icon_url: None,
                icon: None,
                created_at: now,
                updated_at: now,
            },
            website_count: 0,
        }
    }

    fn names(nodes: &[CategoryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_build_forest_nests_and_promotes_orphans() {
        let rows = vec![
            row(1, None, 0, "A"),
            row(2, Some(1), 0, "A1"),
            row(3, Some(99), 1, "Orphan"),
        ];

        let forest = CategoryNode::build_forest(rows);

        assert_eq!(names(&forest), vec!["A", "Orphan"]);
        assert_eq!(names(&forest[0].children), vec!["A1"]);
        assert!(forest[0].children[0].children.is_empty());
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_listing_shapes_and_totals() {
        let rows = vec![row(1, None, 0, "A"), row(2, Some(1), 0, "A1")];

        let flat = CategoryListing::Flat(rows.iter().cloned().map(Into::into).collect());
        let json = serde_json::to_value(&flat).unwrap();
        assert_eq!(flat.total(), 2);
        assert_eq!(json[1]["parent_id"], 1);
        assert!(json[0].get("children").is_none());

        let tree = CategoryListing::Tree(CategoryNode::build_forest(rows));
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(tree.total(), 2);
        assert_eq!(json.as_array().map(Vec::len), Some(1));
        assert_eq!(json[0]["children"][0]["name"], "A1");
    }

    #[test]
    fn test_build_forest_json_shape() {
        let forest = CategoryNode::build_forest(vec![row(1, None, 0, "A"), row(2, Some(1), 0, "A1")]);
        let json = serde_json::to_value(&forest).unwrap();

        assert_eq!(json[0]["name"], "A");
        assert_eq!(json[0]["children"][0]["name"], "A1");
        assert_eq!(json[0]["children"][0]["children"], serde_json::json!([]));
    }

    #[test]
    fn test_build_forest_keeps_sibling_order() {
        // Input arrives sorted by display_order; children are declared before their parent
        let rows = vec![
            row(10, Some(1), 0, "first"),
            row(1, None, 0, "root"),
            row(11, Some(1), 1, "second"),
            row(12, Some(1), 2, "third"),
        ];

        let forest = CategoryNode::build_forest(rows);

        assert_eq!(names(&forest), vec!["root"]);
        assert_eq!(names(&forest[0].children), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_build_forest_deep_chain() {
        let rows: Vec<_> = (1..=200)
            .map(|id| row(id, if id == 1 { None } else { Some(id - 1) }, 0, "n"))
            .collect();

        let forest = CategoryNode::build_forest(rows);

        assert_eq!(forest.len(), 1);
        assert_eq!(CategoryNode::walk(&forest).len(), 200);
    }

    #[test]
    fn test_build_forest_cycle_is_dropped_not_looped() {
        let rows = vec![
            row(1, None, 0, "root"),
            row(2, Some(3), 0, "cycle-a"),
            row(3, Some(2), 0, "cycle-b"),
            row(4, Some(4), 0, "self-parent"),
        ];

        let forest = CategoryNode::build_forest(rows);

        assert_eq!(names(&forest), vec!["root"]);
        assert_eq!(CategoryNode::walk(&forest).len(), 1);
    }

    #[test]
    fn test_build_forest_empty() {
        assert!(CategoryNode::build_forest(Vec::new()).is_empty());
    }

    #[test]
    fn test_build_forest_random_acyclic_inputs_are_preserved() {
        for _ in 0..50 {
            let size: i64 = (1..60).fake();
            // Parents always point at a lower id (acyclic) or at an unknown id (orphan)
            let mut rows: Vec<CategoryWithCount> = (1..=size)
                .map(|id| {
                    let parent = match (0..4).fake::<u8>() {
                        0 => None,
                        1 => Some(size + (1..10).fake::<i64>()),
                        _ if id > 1 => Some((1..id).fake::<i64>()),
                        _ => None,
                    };
                    let name: String = Word().fake();
                    row(id, parent, (0..5).fake(), &name)
                })
                .collect();
            rows.sort_by_key(|r| r.category.display_order);
            let input_order: Vec<i64> = rows.iter().map(|r| r.category.id).collect();
            let expected: HashSet<i64> = input_order.iter().copied().collect();

            let forest = CategoryNode::build_forest(rows);
            let flattened: Vec<i64> = CategoryNode::walk(&forest).iter().map(|n| n.id).collect();

            // no omissions, no duplicates
            assert_eq!(flattened.len(), expected.len());
            assert_eq!(flattened.iter().copied().collect::<HashSet<_>>(), expected);

            // siblings follow input order
            let position = |id: i64| input_order.iter().position(|&x| x == id).unwrap();
            let mut groups: Vec<&[CategoryNode]> = vec![forest.as_slice()];
            groups.extend(CategoryNode::walk(&forest).iter().map(|n| n.children.as_slice()));
            for siblings in groups {
                let positions: Vec<usize> = siblings.iter().map(|n| position(n.id)).collect();
                assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
