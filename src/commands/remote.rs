use crate::atom::EntryEndpoint;
use crate::domain::models::{DuplicateGroup, EntryListing};
use crate::services::audit::find_duplicates;
use crate::services::output::print_out;
use anyhow::Context;

pub fn handle_entries(json: bool, endpoint: &impl EntryEndpoint) -> anyhow::Result<()> {
    let entries = endpoint
        .list_entries()
        .context("failed to get remote entries")?;
    let listings: Vec<EntryListing> = entries
        .into_iter()
        .map(|e| EntryListing {
            id: e.id,
            title: e.title,
            draft: e.draft,
            url: e.url,
        })
        .collect();
    print_out(json, &listings, |e| {
        let marker = if e.draft { "draft" } else { "published" };
        format!("{}\t{}\t{}\t{}", e.id, marker, e.title, e.url)
    })
}

pub fn handle_audit(json: bool, endpoint: &impl EntryEndpoint) -> anyhow::Result<()> {
    let entries = endpoint
        .list_entries()
        .context("failed to get remote entries")?;
    let groups = find_duplicates(&entries);
    if json {
        print_out(json, &groups, |_| String::new())
    } else {
        render_duplicates(&groups);
        Ok(())
    }
}

/// Text rendering of the duplicate report. The empty case is reported
/// explicitly; silence would be indistinguishable from "not checked".
pub fn render_duplicates(groups: &[DuplicateGroup]) {
    if groups.is_empty() {
        println!("no duplicate titles on remote");
        return;
    }
    for group in groups {
        println!(
            "duplicate title on remote: \"{}\" ({} entries)",
            group.title,
            group.entries.len()
        );
        for member in &group.entries {
            println!("    {} {}", member.id, member.url);
        }
    }
}
