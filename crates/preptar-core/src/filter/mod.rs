//! Entry classification and link rewriting.
//!
//! - **`classify`**: keep/drop decision and the stripped name
//! - **`links`**: hard link target rewriting and the link registry

pub mod classify;
pub mod links;

pub use classify::DropReason;
pub use classify::KeepDecision;
pub use classify::classify;
pub use classify::is_useless_file;
pub use classify::is_useless_folder;
pub use classify::strip_top_level;
pub use links::LinkRegistry;
pub use links::rewrite_link_target;

use crate::types::RewrittenEntry;
use crate::types::SourceEntry;

/// Builds the rewritten form of a kept entry, registering it if it is a link.
pub fn rewrite(entry: SourceEntry, new_name: String, links: &mut LinkRegistry) -> RewrittenEntry {
    let link_target = links.register(&entry);
    RewrittenEntry {
        name: new_name,
        link_target,
        source: entry,
    }
}
