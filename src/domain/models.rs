use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// A local Markdown article parsed from front matter + body.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    /// Custom URL slug sent to the blog as `hatenablog:custom-url`.
    pub path: String,
    /// Remote-linkage token; empty means the article has never been published
    /// through this tool.
    pub identity: String,
    pub body: String,
    pub file_path: PathBuf,
}

/// Snapshot of one remote blog entry, fetched once per run and never mutated.
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    /// Full protocol-assigned identifier (e.g. `tag:blog.hatena.ne.jp,...-<identity>`).
    pub id: String,
    pub title: String,
    pub body: String,
    pub url: String,
    /// Edit link; update/delete targets are extracted from its path.
    pub edit_url: String,
    pub updated: String,
    pub draft: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
    Skip,
    Delete,
}

/// One planned reconciliation step, bound to a local article (by index into
/// the loaded article list) and/or a remote entry.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedAction {
    pub kind: ActionKind,
    #[serde(skip)]
    pub article: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_path: Option<String>,
    /// Entry id routing the update/delete, when it could be extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    pub reason: String,
}

/// Aggregate outcome of one sync run (live or dry).
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub deleted: usize,
    pub errors: Vec<String>,
    /// Set when the remote signalled the daily posting quota; the run stops
    /// at that point and the counts above are partial.
    pub rate_limited: bool,
}

impl SyncReport {
    pub fn summary_line(&self) -> String {
        format!(
            "Created: {}, Updated: {}, Skipped: {}, Deleted: {}, Errors: {}",
            self.created,
            self.updated,
            self.skipped,
            self.deleted,
            self.errors.len()
        )
    }
}

/// Remote entries sharing one exact title (always 2 or more).
#[derive(Debug, Serialize)]
pub struct DuplicateGroup {
    pub title: String,
    pub entries: Vec<DuplicateMember>,
}

#[derive(Debug, Serialize)]
pub struct DuplicateMember {
    pub id: String,
    pub url: String,
    pub updated: String,
}

/// Row shape for the `entries` listing command.
#[derive(Debug, Serialize)]
pub struct EntryListing {
    pub id: String,
    pub title: String,
    pub draft: bool,
    pub url: String,
}
