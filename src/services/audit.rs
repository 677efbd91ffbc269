//! Read-only integrity check over the remote snapshot: entries sharing an
//! exact title usually mean an earlier run re-created an article whose
//! identity had gone stale.

use crate::domain::models::{DuplicateGroup, DuplicateMember, RemoteEntry};
use std::collections::BTreeMap;

/// Groups every remote entry by exact title and returns the groups with two
/// or more members, sorted by title.
pub fn find_duplicates(entries: &[RemoteEntry]) -> Vec<DuplicateGroup> {
    let mut by_title: BTreeMap<&str, Vec<&RemoteEntry>> = BTreeMap::new();
    for entry in entries {
        by_title.entry(entry.title.as_str()).or_default().push(entry);
    }

    by_title
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(title, members)| DuplicateGroup {
            title: title.to_string(),
            entries: members
                .into_iter()
                .map(|e| DuplicateMember {
                    id: e.id.clone(),
                    url: e.url.clone(),
                    updated: e.updated.clone(),
                })
                .collect(),
        })
        .collect()
}
