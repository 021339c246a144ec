//! Report building over the cross-run queries of the run store.
//!
//! Grouping relies only on the row order the store guarantees: consecutive
//! rows with the same key belong to the same group.

pub mod duplicates;
pub mod modified;

pub use duplicates::{find_duplicate_groups, group_duplicates, render_duplicates, DuplicateGroup};
pub use modified::{find_modified_files, group_modified, render_modified, ModifiedFile};
