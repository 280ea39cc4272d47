use std::sync::Arc;

use compact_str::CompactString;

use crate::error::{Error, Result};
use crate::result::{
    ElementCollectionResult, EntityResult, ExpandResult, NavigationId, NavigationTree, ResultTree,
};
use crate::row::Row;

/// Rows fetched for one level, mirroring the shape of the navigation tree.
#[derive(Debug, Clone)]
pub struct LevelRows {
    pub level: NavigationId,
    pub rows: Vec<Row>,
    /// Requested attribute aliases of the level, empty for all
    pub requested: Vec<CompactString>,
    pub children: Vec<LevelRows>,
}

impl LevelRows {
    pub fn new(level: NavigationId, rows: Vec<Row>) -> Self {
        Self {
            level,
            rows,
            requested: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_requested(mut self, requested: Vec<CompactString>) -> Self {
        self.requested = requested;
        self
    }

    pub fn with_child(mut self, child: LevelRows) -> Self {
        self.children.push(child);
        self
    }
}

/// Groups every level and assembles the result tree, deepest levels first.
///
/// `root.level` must be the root of `navigation`; each child level must have
/// been derived from the level it is nested under.
pub fn build_result_tree(
    navigation: Arc<NavigationTree>,
    root: LevelRows,
    count: Option<u64>,
) -> Result<ResultTree> {
    crate::relgraph_profile_scope!("result", "build_result_tree");
    let mut tree = ResultTree::new(Arc::clone(&navigation), root.rows)
        .with_count(count)
        .with_requested(root.requested);
    attach_children(&navigation, &mut tree, root.children)?;
    Ok(tree)
}

fn attach_children<R: EntityResult>(
    navigation: &Arc<NavigationTree>,
    parent: &mut R,
    children: Vec<LevelRows>,
) -> Result<()> {
    for child in children {
        let builder = navigation.builder(child.level);
        let is_collection = builder
            .navigation_path()
            .is_some_and(|path| path.is_element_collection());

        if is_collection {
            if let Some(nested) = child.children.first() {
                return Err(Error::unsupported_filter(
                    navigation.builder(nested.level).navigation_label(),
                ));
            }
            let result = ElementCollectionResult::group(Arc::clone(navigation), child.level, child.rows)?;
            parent.put_element_collection_result(result)?;
        } else {
            let mut result = ExpandResult::group(Arc::clone(navigation), child.level, child.rows)?
                .with_requested(child.requested);
            attach_children(navigation, &mut result, child.children)?;
            parent.put_expand_result(result)?;
        }
    }
    Ok(())
}
