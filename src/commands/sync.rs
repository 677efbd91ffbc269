use crate::atom::EntryEndpoint;
use crate::commands::remote::render_duplicates;
use crate::domain::models::{Article, DuplicateGroup, JsonOut, PlannedAction, SyncReport};
use crate::services::audit::find_duplicates;
use crate::services::plan::build_plan;
use crate::services::sync::{execute, render_dry_run};
use anyhow::Context;
use serde::Serialize;

#[derive(Serialize)]
struct SyncOutput {
    dry_run: bool,
    duplicates: Vec<DuplicateGroup>,
    actions: Vec<PlannedAction>,
    report: SyncReport,
}

/// One full reconciliation run over already-loaded articles: fetch the
/// remote snapshot once, surface the duplicate audit, then execute or render
/// the plan. The caller loads the articles so it can gate destructive runs
/// before anything else happens.
pub fn handle_sync(
    json: bool,
    mut articles: Vec<Article>,
    dry_run: bool,
    delete_orphan: bool,
    endpoint: &impl EntryEndpoint,
) -> anyhow::Result<SyncReport> {
    if articles.is_empty() {
        if json {
            let out = SyncOutput {
                dry_run,
                duplicates: vec![],
                actions: vec![],
                report: SyncReport::default(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&JsonOut {
                    ok: true,
                    data: &out
                })?
            );
        } else {
            println!("No articles found");
        }
        return Ok(SyncReport::default());
    }

    let entries = endpoint
        .list_entries()
        .context("failed to get remote entries")?;

    // Integrity check before any mutation; always surfaced.
    let duplicates = find_duplicates(&entries);
    if !json {
        render_duplicates(&duplicates);
    }

    let plan = build_plan(&articles, &entries, delete_orphan);

    let report = if dry_run {
        render_dry_run(&plan, !json)
    } else {
        execute(endpoint, &mut articles, &plan, !json)
    };

    if json {
        let out = SyncOutput {
            dry_run,
            duplicates,
            actions: plan,
            report,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: &out
            })?
        );
        return Ok(out.report);
    }

    Ok(report)
}
