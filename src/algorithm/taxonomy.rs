//! Product taxonomy traversal
//!
//! Builds the two descendant levels below a set of root categories: direct
//! children ("level 2") and grandchildren ("level 4"). The first row of a
//! category table is the header/root artifact and is never traversed.
//! Traversal is bounded to these two levels, so cycles in `parent_id` need
//! no special handling.

use std::path::Path;

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::models::Category;
use crate::utils::io::{read_rows, write_rows};

/// Descendant sets of a root category set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyIndex {
    level2: FxHashSet<i64>,
    level4: FxHashSet<i64>,
}

/// Identifiers of rows (after the first) whose parent is in `parents`
fn children_of(categories: &[Category], parents: &FxHashSet<i64>) -> FxHashSet<i64> {
    categories
        .iter()
        .skip(1)
        .filter(|c| c.parent_id.is_some_and(|p| parents.contains(&p)))
        .map(|c| c.product_id)
        .collect()
}

impl TaxonomyIndex {
    /// Compute both levels from the unmodified category table
    #[must_use]
    pub fn build(categories: &[Category], roots: &FxHashSet<i64>) -> Self {
        let level2 = children_of(categories, roots);
        let level4 = children_of(categories, &level2);
        Self { level2, level4 }
    }

    /// Direct children of the roots
    #[must_use]
    pub const fn level2(&self) -> &FxHashSet<i64> {
        &self.level2
    }

    /// Children of level-2 members
    #[must_use]
    pub const fn level4(&self) -> &FxHashSet<i64> {
        &self.level4
    }

    /// Union of both levels, the identifiers removed by the category filter
    #[must_use]
    pub fn exclusion_set(&self) -> FxHashSet<i64> {
        self.level2.union(&self.level4).copied().collect()
    }
}

/// Flatten one hierarchy level: every level-4 row is re-pointed at its
/// grandparent.
///
/// Grandparent links are resolved against the input slice, never against
/// rows already rewritten. When a product id occurs more than once the first
/// occurrence decides its parent.
#[must_use]
pub fn reparent_level4(categories: &[Category], index: &TaxonomyIndex) -> Vec<Category> {
    let mut parent_of: FxHashMap<i64, Option<i64>> = FxHashMap::default();
    for category in categories {
        parent_of
            .entry(category.product_id)
            .or_insert(category.parent_id);
    }

    categories
        .iter()
        .enumerate()
        .map(|(position, category)| {
            let mut row = category.clone();
            if position > 0 {
                if let Some(parent) = category.parent_id.filter(|p| index.level2.contains(p)) {
                    row.parent_id = parent_of.get(&parent).copied().flatten();
                }
            }
            row
        })
        .collect()
}

/// Result of rewriting a category table
#[derive(Debug, Clone)]
pub struct TaxonomyUpdate {
    pub index: TaxonomyIndex,
    /// Rows written, in source order
    pub rows: usize,
}

/// Load a category table and build the index for `roots`
pub fn load_taxonomy(path: &Path, roots: &[i64]) -> Result<TaxonomyIndex> {
    let categories: Vec<Category> = read_rows(path)?;
    let roots: FxHashSet<i64> = roots.iter().copied().collect();
    let index = TaxonomyIndex::build(&categories, &roots);
    log::info!(
        "Excluding {} level-2 and {} level-4 categories below roots {:?}",
        index.level2.len(),
        index.level4.len(),
        roots.iter().sorted().collect_vec()
    );
    Ok(index)
}

/// Rewrite a category table with every level-4 row re-pointed at its
/// grandparent
pub fn update_product_ids(
    source: &Path,
    output: &Path,
    roots: &[i64],
    write_index: bool,
) -> Result<TaxonomyUpdate> {
    let categories: Vec<Category> = read_rows(source)?;
    let roots: FxHashSet<i64> = roots.iter().copied().collect();
    let index = TaxonomyIndex::build(&categories, &roots);
    let rewritten = reparent_level4(&categories, &index);

    log::info!(
        "Re-parented level-4 categories: {:?}",
        index.level4.iter().sorted().collect_vec()
    );
    write_rows(output, &rewritten, write_index)?;

    Ok(TaxonomyUpdate {
        index,
        rows: rewritten.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i64]) -> FxHashSet<i64> {
        ids.iter().copied().collect()
    }

    fn scenario_table() -> Vec<Category> {
        vec![
            Category::new(1, "0", Some(0)),
            Category::new(2, "1", Some(0)),
            Category::new(10, "2", Some(2)),
            Category::new(20, "3", Some(10)),
        ]
    }

    #[test]
    fn two_levels_below_the_roots() {
        let index = TaxonomyIndex::build(&scenario_table(), &set(&[2]));
        assert_eq!(index.level2(), &set(&[10]));
        assert_eq!(index.level4(), &set(&[20]));
        assert_eq!(index.exclusion_set(), set(&[10, 20]));
        assert!(!index.exclusion_set().contains(&2));
    }

    #[test]
    fn first_row_is_never_traversed() {
        let table = vec![
            Category::new(5, "2", Some(2)),
            Category::new(6, "2", Some(2)),
        ];
        let index = TaxonomyIndex::build(&table, &set(&[2]));
        assert_eq!(index.level2(), &set(&[6]));
    }

    #[test]
    fn unknown_and_missing_parents_are_inert() {
        let table = vec![
            Category::new(1, "section", None),
            Category::new(30, "2digit", Some(99)),
            Category::new(31, "2digit", None),
            Category::new(32, "4digit", Some(30)),
        ];
        let index = TaxonomyIndex::build(&table, &set(&[2]));
        assert!(index.level2().is_empty());
        assert!(index.level4().is_empty());
    }

    #[test]
    fn level4_is_independent_of_row_order() {
        let mut table = scenario_table();
        let grandchild = table.remove(3);
        table.insert(1, grandchild);
        let index = TaxonomyIndex::build(&table, &set(&[2]));
        assert_eq!(index.level4(), &set(&[20]));
    }

    #[test]
    fn closure_holds_for_every_member() {
        let table = vec![
            Category::new(0, "", None),
            Category::new(2, "section", None),
            Category::new(3, "section", None),
            Category::new(21, "2digit", Some(2)),
            Category::new(22, "2digit", Some(2)),
            Category::new(31, "2digit", Some(3)),
            Category::new(2101, "4digit", Some(21)),
            Category::new(2201, "4digit", Some(22)),
            Category::new(3101, "4digit", Some(31)),
        ];
        let parent: FxHashMap<i64, Option<i64>> =
            table.iter().map(|c| (c.product_id, c.parent_id)).collect();
        let roots = set(&[2]);
        let index = TaxonomyIndex::build(&table, &roots);

        for id in index.level2() {
            assert!(roots.contains(&parent[id].unwrap()));
        }
        for id in index.level4() {
            assert!(index.level2().contains(&parent[id].unwrap()));
        }
        assert!(index.level2().is_disjoint(&roots));
        assert_eq!(index.exclusion_set(), set(&[21, 22, 2101, 2201]));
    }

    #[test]
    fn self_referential_root_is_its_own_child() {
        let table = vec![
            Category::new(1, "section", None),
            Category::new(2, "section", Some(2)),
            Category::new(21, "2digit", Some(2)),
        ];
        let roots = set(&[2]);
        let index = TaxonomyIndex::build(&table, &roots);

        assert_eq!(index.level2(), &set(&[2, 21]));
        assert_eq!(index.level2() & &roots, set(&[2]));
        assert_eq!(index.level4(), &set(&[2, 21]));
        assert_eq!(index.exclusion_set(), set(&[2, 21]));

        let rewritten = reparent_level4(&table, &index);
        assert_eq!(rewritten[1].parent_id, Some(2));
        assert_eq!(rewritten[2].parent_id, Some(2));
    }

    #[test]
    fn reparenting_uses_the_unmodified_snapshot() {
        // 40 is level 4 under 10; 10's own parent must be read before any
        // row is rewritten, even though 10 appears after 40.
        let table = vec![
            Category::new(1, "0", None),
            Category::new(40, "4digit", Some(10)),
            Category::new(10, "2digit", Some(2)),
            Category::new(20, "4digit", Some(10)),
            Category::new(50, "4digit", Some(11)),
        ];
        let index = TaxonomyIndex::build(&table, &set(&[2]));
        let rewritten = reparent_level4(&table, &index);

        let parents: Vec<_> = rewritten.iter().map(|c| (c.product_id, c.parent_id)).collect();
        assert_eq!(
            parents,
            vec![
                (1, None),
                (40, Some(2)),
                (10, Some(2)),
                (20, Some(2)),
                (50, Some(11)),
            ]
        );
        // input untouched
        assert_eq!(table[1].parent_id, Some(10));
    }
}
