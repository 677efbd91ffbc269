//! Applies a reconciliation plan against the remote collection (live mode)
//! or renders it without side effects (dry-run mode). Both walk the same
//! plan, so a dry run previews exactly what a live run would do.

use crate::atom::EntryEndpoint;
use crate::domain::models::{ActionKind, Article, PlannedAction, SyncReport};
use crate::services::identity::extract_identity;
use crate::services::plan::tally;
use crate::services::storage::{self, assign_identity};

/// Applies the plan in order. Per-action remote failures are recorded and the
/// run continues; a rate-limit signal stops it immediately with the partial
/// counts accumulated so far.
pub fn execute(
    endpoint: &impl EntryEndpoint,
    articles: &mut [Article],
    plan: &[PlannedAction],
    show_progress: bool,
) -> SyncReport {
    let mut report = SyncReport::default();

    for action in plan {
        match action.kind {
            ActionKind::Create => {
                let Some(idx) = action.article else { continue };
                match endpoint.create_entry(&articles[idx]) {
                    Ok(created) => {
                        record_identity(&mut articles[idx], &created.id);
                        if show_progress {
                            println!("+ {}", articles[idx].file_path.display());
                        }
                        storage::audit(
                            "create",
                            serde_json::json!({
                                "path": articles[idx].file_path.display().to_string(),
                                "identity": articles[idx].identity,
                            }),
                        );
                        report.created += 1;
                    }
                    Err(e) if e.is_rate_limit() => {
                        report.errors.push(format!(
                            "failed to create article {}: {e}",
                            articles[idx].title
                        ));
                        report.rate_limited = true;
                        return report;
                    }
                    Err(e) => report.errors.push(format!(
                        "failed to create article {}: {e}",
                        articles[idx].title
                    )),
                }
            }
            ActionKind::Update => {
                let Some(idx) = action.article else { continue };
                let Some(target) = action.target.as_deref() else {
                    report.errors.push(format!(
                        "failed to extract entry target for {}",
                        articles[idx].title
                    ));
                    continue;
                };
                match endpoint.update_entry(target, &articles[idx]) {
                    Ok(_) => {
                        if show_progress {
                            println!("~ {}", articles[idx].file_path.display());
                        }
                        storage::audit(
                            "update",
                            serde_json::json!({
                                "path": articles[idx].file_path.display().to_string(),
                                "target": target,
                            }),
                        );
                        report.updated += 1;
                    }
                    Err(e) => report.errors.push(format!(
                        "failed to update article {}: {e}",
                        articles[idx].title
                    )),
                }
            }
            ActionKind::Skip => {
                if let Some(idx) = action.article {
                    if show_progress {
                        println!("= {}", articles[idx].file_path.display());
                    }
                }
                report.skipped += 1;
            }
            ActionKind::Delete => {
                let title = action.remote_title.as_deref().unwrap_or("");
                let Some(target) = action.target.as_deref() else {
                    report
                        .errors
                        .push(format!("failed to extract entry target for {title}"));
                    continue;
                };
                match endpoint.delete_entry(target) {
                    Ok(()) => {
                        if show_progress {
                            if let Some(url) = action.remote_url.as_deref() {
                                println!("- {url}");
                            }
                        }
                        storage::audit(
                            "delete",
                            serde_json::json!({ "target": target, "title": title }),
                        );
                        report.deleted += 1;
                    }
                    Err(e) => report
                        .errors
                        .push(format!("failed to delete article {title}: {e}")),
                }
            }
        }
    }

    report
}

/// Writes the identity extracted from the created entry back into the
/// article's front matter. A conflict here means the planner's precondition
/// was violated; it is logged and the run goes on.
fn record_identity(article: &mut Article, protocol_id: &str) {
    let Some(identity) = extract_identity(protocol_id) else {
        tracing::warn!(id = protocol_id, "created entry has no recoverable identity");
        return;
    };
    let identity = identity.to_string();
    if let Err(e) = assign_identity(article, &identity) {
        tracing::warn!(
            path = %article.file_path.display(),
            "failed to record identity: {e}"
        );
    }
}

/// Renders the plan without touching the remote or the local files, and
/// returns the counts the live run would have produced.
pub fn render_dry_run(plan: &[PlannedAction], show_progress: bool) -> SyncReport {
    if show_progress {
        for action in plan {
            match action.kind {
                ActionKind::Create => {
                    if let Some(path) = action.article_path.as_deref() {
                        println!("+ {path} ({})", action.reason);
                    }
                }
                ActionKind::Update => {
                    if let Some(path) = action.article_path.as_deref() {
                        println!("~ {path} ({})", action.reason);
                    }
                }
                ActionKind::Skip => {
                    if let Some(path) = action.article_path.as_deref() {
                        println!("= {path}");
                    }
                }
                ActionKind::Delete => {
                    if let Some(url) = action.remote_url.as_deref() {
                        println!("- {url} ({})", action.reason);
                    }
                }
            }
        }
    }
    tally(plan)
}
