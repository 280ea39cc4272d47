//! Row correlation and result tree assembly.
//!
//! Every nesting level of a request has a key builder in a
//! [`NavigationTree`]. Rows of a child level are grouped by the key of the
//! entity that owns them ([`group_rows`]); the groups are assembled into a
//! [`ResultTree`] that answers "which child rows belong to this parent row".

mod assemble;
mod group;
mod key;
mod navigation;
mod tree;

pub use assemble::{LevelRows, build_result_tree};
pub use group::{RowGroups, group_rows};
pub use key::{KeySegment, KeyValue, NavigationKey};
pub use navigation::{KeyBuilder, NavigationId, NavigationTree};
pub use tree::{ElementCollectionResult, EntityResult, ExpandResult, ResultChildren, ResultTree};
