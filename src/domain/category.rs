//! Product categories and the ancestor walk over their parent links.
//!
//! Categories form a forest through the optional `parent_id`. SQLite does not
//! enforce acyclicity, so every walk over parent links is bounded by
//! [`MAX_CATEGORY_DEPTH`] and stops on the first repeated id.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::domain::types::{CategoryId, DisplayName, OrganizationId, SanitizedText, Slug};

/// Upper bound on the number of parent links followed from one category.
pub const MAX_CATEGORY_DEPTH: usize = 64;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: CategoryId,
    pub organization_id: OrganizationId,
    pub parent_id: Option<CategoryId>,
    pub name: DisplayName,
    pub slug: Slug,
    pub description: Option<SanitizedText>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewProductCategory {
    pub organization_id: OrganizationId,
    pub parent_id: Option<CategoryId>,
    pub name: DisplayName,
    pub slug: Slug,
    pub description: Option<SanitizedText>,
}

#[derive(Clone, Debug)]
pub struct UpdateProductCategory {
    pub parent_id: Option<CategoryId>,
    pub name: DisplayName,
    pub slug: Slug,
    pub description: Option<SanitizedText>,
}

/// Minimal projection of a category used in paths and breadcrumbs.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CategoryAncestor {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

impl From<&ProductCategory> for CategoryAncestor {
    fn from(category: &ProductCategory) -> Self {
        Self {
            id: category.id,
            name: category.name.to_string(),
            slug: category.slug.to_string(),
        }
    }
}

/// Resolved location of a category in the tree.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CategoryPath {
    pub category: CategoryAncestor,
    /// Ancestors ordered nearest first, the category itself excluded.
    pub ancestors: Vec<CategoryAncestor>,
    /// Root first, the category itself last.
    pub breadcrumbs: Vec<CategoryAncestor>,
    /// Breadcrumb slugs joined with `/`.
    pub path: String,
}

/// Category with its children, as rendered in tree views.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: ProductCategory,
    pub children: Vec<CategoryNode>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryPathError {
    #[error("category {0} not found")]
    NotFound(CategoryId),
    #[error("cycle detected at category {0}")]
    Cycle(CategoryId),
    #[error("category tree deeper than {} levels", MAX_CATEGORY_DEPTH)]
    TooDeep,
}

/// In-memory index over the categories of one organization.
#[derive(Debug, Default)]
pub struct CategoryForest {
    by_id: HashMap<CategoryId, ProductCategory>,
}

impl CategoryForest {
    pub fn new(categories: Vec<ProductCategory>) -> Self {
        Self {
            by_id: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: CategoryId) -> Option<&ProductCategory> {
        self.by_id.get(&id)
    }

    /// Walks parent links from `id` and returns the ancestors nearest first.
    ///
    /// A parent id pointing outside the forest ends the walk as if it were
    /// null.
    pub fn ancestors(&self, id: CategoryId) -> Result<Vec<CategoryAncestor>, CategoryPathError> {
        let start = self.get(id).ok_or(CategoryPathError::NotFound(id))?;

        let mut seen = HashSet::from([start.id]);
        let mut ancestors = Vec::new();
        let mut next = start.parent_id;

        while let Some(parent_id) = next {
            if !seen.insert(parent_id) {
                return Err(CategoryPathError::Cycle(parent_id));
            }
            if ancestors.len() >= MAX_CATEGORY_DEPTH {
                return Err(CategoryPathError::TooDeep);
            }
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            ancestors.push(CategoryAncestor::from(parent));
            next = parent.parent_id;
        }

        Ok(ancestors)
    }

    pub fn path(&self, id: CategoryId) -> Result<CategoryPath, CategoryPathError> {
        let category = self
            .get(id)
            .map(CategoryAncestor::from)
            .ok_or(CategoryPathError::NotFound(id))?;
        let ancestors = self.ancestors(id)?;

        let mut breadcrumbs: Vec<CategoryAncestor> = ancestors.iter().rev().cloned().collect();
        breadcrumbs.push(category.clone());

        let path = breadcrumbs
            .iter()
            .map(|crumb| crumb.slug.as_str())
            .collect::<Vec<_>>()
            .join("/");

        Ok(CategoryPath {
            category,
            ancestors,
            breadcrumbs,
            path,
        })
    }

    /// Returns `true` when attaching `id` under `new_parent` would make the
    /// category its own ancestor.
    pub fn would_create_cycle(
        &self,
        id: CategoryId,
        new_parent: CategoryId,
    ) -> Result<bool, CategoryPathError> {
        if id == new_parent {
            return Ok(true);
        }
        match self.ancestors(new_parent) {
            Ok(ancestors) => Ok(ancestors.iter().any(|ancestor| ancestor.id == id)),
            // The parent already sits on a corrupted chain; refuse to extend it.
            Err(CategoryPathError::Cycle(_)) => Ok(true),
            Err(err) => Err(err),
        }
    }

    /// Number of levels below `id`: zero for a leaf. Stops counting past
    /// [`MAX_CATEGORY_DEPTH`].
    pub fn height(&self, id: CategoryId) -> usize {
        let mut seen = HashSet::from([id]);
        let mut level = vec![id];
        let mut height = 0;

        while height <= MAX_CATEGORY_DEPTH {
            let next: Vec<CategoryId> = self
                .by_id
                .values()
                .filter(|category| {
                    category
                        .parent_id
                        .is_some_and(|parent_id| level.contains(&parent_id))
                })
                .map(|category| category.id)
                .filter(|child| seen.insert(*child))
                .collect();
            if next.is_empty() {
                break;
            }
            height += 1;
            level = next;
        }

        height
    }

    /// Returns `true` when a subtree `height` levels tall fits under `parent`
    /// without any category getting more than [`MAX_CATEGORY_DEPTH`]
    /// ancestors.
    pub fn fits_under(&self, parent: CategoryId, height: usize) -> Result<bool, CategoryPathError> {
        match self.ancestors(parent) {
            Ok(ancestors) => Ok(ancestors.len() + 1 + height <= MAX_CATEGORY_DEPTH),
            Err(CategoryPathError::TooDeep) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn children_of(&self, id: CategoryId) -> usize {
        self.by_id
            .values()
            .filter(|category| category.parent_id == Some(id))
            .count()
    }

    /// Builds the nested tree, siblings sorted by name.
    ///
    /// Categories whose parent is missing are treated as roots. Categories
    /// only reachable through a cycle are left out.
    pub fn tree(&self) -> Vec<CategoryNode> {
        let mut children: HashMap<Option<CategoryId>, Vec<&ProductCategory>> = HashMap::new();
        for category in self.by_id.values() {
            let parent = category
                .parent_id
                .filter(|parent_id| self.by_id.contains_key(parent_id));
            children.entry(parent).or_default().push(category);
        }
        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        }

        fn build(
            parent: Option<CategoryId>,
            children: &HashMap<Option<CategoryId>, Vec<&ProductCategory>>,
            depth: usize,
        ) -> Vec<CategoryNode> {
            if depth > MAX_CATEGORY_DEPTH {
                return Vec::new();
            }
            children
                .get(&parent)
                .map(|siblings| {
                    siblings
                        .iter()
                        .map(|category| CategoryNode {
                            category: (*category).clone(),
                            children: build(Some(category.id), children, depth + 1),
                        })
                        .collect()
                })
                .unwrap_or_default()
        }

        build(None, &children, 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn category(id: i32, parent: Option<i32>, name: &str) -> ProductCategory {
        let now = Utc::now().naive_utc();
        ProductCategory {
            id: CategoryId::new(id).unwrap(),
            organization_id: OrganizationId::new(1).unwrap(),
            parent_id: parent.map(|p| CategoryId::new(p).unwrap()),
            name: DisplayName::new(name).unwrap(),
            slug: Slug::from_name(name).unwrap(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(value: i32) -> CategoryId {
        CategoryId::new(value).unwrap()
    }

    fn sample() -> CategoryForest {
        CategoryForest::new(vec![
            category(1, None, "Food"),
            category(2, Some(1), "Fruit"),
            category(3, Some(2), "Citrus Fruit"),
            category(4, None, "Drinks"),
        ])
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let ancestors = sample().ancestors(id(3)).unwrap();
        let ids: Vec<i32> = ancestors.iter().map(|a| a.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn path_is_root_first_and_ends_with_the_category() {
        let path = sample().path(id(3)).unwrap();
        assert_eq!(path.path, "food/fruit/citrus-fruit");
        assert_eq!(path.breadcrumbs.first().unwrap().id, id(1));
        assert_eq!(path.breadcrumbs.last().unwrap().id, id(3));
        assert_eq!(path.category.slug, "citrus-fruit");
    }

    #[test]
    fn root_category_path_is_its_own_slug() {
        let path = sample().path(id(4)).unwrap();
        assert!(path.ancestors.is_empty());
        assert_eq!(path.path, "drinks");
    }

    #[test]
    fn unknown_category_is_not_found() {
        assert_eq!(
            sample().path(id(99)),
            Err(CategoryPathError::NotFound(id(99)))
        );
    }

    #[test]
    fn dangling_parent_ends_the_walk() {
        let forest = CategoryForest::new(vec![category(5, Some(42), "Orphan")]);
        assert!(forest.ancestors(id(5)).unwrap().is_empty());
    }

    #[test]
    fn corrupted_cycle_is_reported() {
        let forest = CategoryForest::new(vec![
            category(1, Some(3), "A"),
            category(2, Some(1), "B"),
            category(3, Some(2), "C"),
        ]);
        assert!(matches!(
            forest.ancestors(id(1)),
            Err(CategoryPathError::Cycle(_))
        ));
    }

    #[test]
    fn depth_is_bounded() {
        let chain = (1..=70)
            .map(|i| category(i, if i == 1 { None } else { Some(i - 1) }, &format!("c{i}")))
            .collect();
        let forest = CategoryForest::new(chain);
        assert_eq!(forest.ancestors(id(70)), Err(CategoryPathError::TooDeep));
        assert_eq!(forest.ancestors(id(60)).unwrap().len(), 59);
    }

    #[test]
    fn height_counts_levels_below() {
        let forest = sample();
        assert_eq!(forest.height(id(1)), 2);
        assert_eq!(forest.height(id(2)), 1);
        assert_eq!(forest.height(id(3)), 0);
    }

    #[test]
    fn deepest_allowed_chain_stays_walkable() {
        let chain: Vec<ProductCategory> = (1..=MAX_CATEGORY_DEPTH as i32)
            .map(|i| category(i, if i == 1 { None } else { Some(i - 1) }, &format!("c{i}")))
            .collect();
        let last = id(MAX_CATEGORY_DEPTH as i32);
        let forest = CategoryForest::new(chain);

        // One more level still fits, a second one does not.
        assert!(forest.fits_under(last, 0).unwrap());
        assert!(!forest.fits_under(last, 1).unwrap());
        assert!(!forest.fits_under(id(2), MAX_CATEGORY_DEPTH).unwrap());

        let mut extended: Vec<ProductCategory> = forest.by_id.values().cloned().collect();
        extended.push(category(1000, Some(last.get()), "leaf"));
        let extended = CategoryForest::new(extended);
        assert_eq!(
            extended.ancestors(id(1000)).unwrap().len(),
            MAX_CATEGORY_DEPTH
        );
        assert!(extended.path(id(1000)).is_ok());

        fn count(nodes: &[CategoryNode]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        assert_eq!(count(&extended.tree()), MAX_CATEGORY_DEPTH + 1);
    }

    #[test]
    fn reparenting_under_descendant_is_a_cycle() {
        let forest = sample();
        assert!(forest.would_create_cycle(id(1), id(3)).unwrap());
        assert!(forest.would_create_cycle(id(2), id(2)).unwrap());
        assert!(!forest.would_create_cycle(id(3), id(4)).unwrap());
    }

    #[test]
    fn tree_nests_children_sorted_by_name() {
        let tree = sample().tree();
        let roots: Vec<&str> = tree.iter().map(|n| n.category.name.as_str()).collect();
        assert_eq!(roots, vec!["Drinks", "Food"]);
        let food = &tree[1];
        assert_eq!(food.children.len(), 1);
        assert_eq!(food.children[0].children[0].category.id, id(3));
    }

    #[test]
    fn counts_direct_children() {
        let forest = sample();
        assert_eq!(forest.children_of(id(1)), 1);
        assert_eq!(forest.children_of(id(3)), 0);
    }
}
