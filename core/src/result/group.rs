use hashbrown::HashMap;

use crate::error::Result;
use crate::result::{KeyBuilder, NavigationKey};
use crate::row::Row;

/// Rows of one nesting level bucketed by the key of the entity owning them.
pub type RowGroups = HashMap<NavigationKey, Vec<Row>>;

/// Partitions the rows of `level` by the key of the entity owning them.
///
/// Rows are keyed with `owner.build_target_key(row)`, where `owner` is the
/// parent of `level` (the root groups under itself). A parent row finds its
/// bucket again through `owner.build_owning_key(parent_row)`. One pass over
/// `rows`; rows keep their query order within a bucket.
///
/// Rows an outer join produced without a match are dropped: those whose
/// owner key is entirely null, and those whose member columns at `level`
/// (see [`KeyBuilder::member_aliases`]) are all null. A parent without
/// children therefore has no bucket.
pub fn group_rows(rows: Vec<Row>, level: KeyBuilder<'_>) -> Result<RowGroups> {
    crate::relgraph_profile_scope!("result", "group_rows");
    let owner = level.parent().unwrap_or(level);
    let mut groups = RowGroups::new();
    for row in rows {
        let key = owner.build_target_key(&row)?;
        if key.is_absent() || level.is_absent_in(&row) {
            continue;
        }
        groups.entry(key).or_default().push(row);
    }
    crate::relgraph_trace_level!(
        level.navigation_label(),
        groups.values().map(Vec::len).sum::<usize>(),
        groups.len()
    );
    Ok(groups)
}
