//! # Prompt Building
//!
//! Two prompt shapes are produced from the same inputs (the project state and
//! a [`Collection`]):
//!
//! - **first**: everything currently collected, no filtering.
//! - **update**: only the pieces whose fingerprint is not yet in the
//!   seen-set. The tree section, each file and each URL is checked on its own.
//!
//! Building a prompt never marks anything as seen. Recording digests is the
//! separate [`digests`] + [`Context::mark_all_seen`](crate::model::Context::mark_all_seen)
//! step, so an update prompt can be rebuilt and will show the same delta until
//! the user explicitly records it.

use crate::collect::Collection;
use crate::fingerprint::{fingerprint, Digest};
use crate::model::ProjectState;
use std::collections::BTreeSet;

const FIRST_CLOSING: &str = "Please analyze the above project structure and file contents, and answer any queries regarding its functionality.";
const UPDATE_CLOSING: &str = "Please analyze the above updated project structure and file contents, and answer any queries regarding its functionality.";

fn url_list<'a, I: IntoIterator<Item = &'a String>>(heading: &str, urls: I) -> String {
    let mut out = String::new();
    for (i, url) in urls.into_iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("\n## {}\n", heading));
        }
        out.push_str(&format!("- {}. {}\n", i + 1, url));
    }
    out
}

pub fn first_prompt(state: &ProjectState, collection: &Collection) -> String {
    let mut files = String::new();
    for file in &collection.files {
        files.push_str(&format!("\n### File: {}\n", file.path));
        files.push_str(&format!("\n{}\n", file.wrapped()));
    }
    let urls = url_list("URL Contents", &state.context.urls);

    format!(
        " # Project: {}\n\n## Directory Structure\n\n{}\n\n## File Contents\n\n{}\n\n{}\n\n{}",
        state.project_name, collection.tree, files, urls, FIRST_CLOSING
    )
}

pub fn update_prompt(state: &ProjectState, collection: &Collection) -> String {
    let seen = &state.context.seen_digests;

    let tree_section = if seen.contains(&fingerprint(&collection.tree)) {
        String::new()
    } else {
        format!("\n## Updated Directory Structure\n\n{}\n", collection.tree)
    };

    let mut files = String::new();
    for file in &collection.files {
        let wrapped = file.wrapped();
        if seen.contains(&fingerprint(&wrapped)) {
            continue;
        }
        files.push_str(&format!("\n### Updated File: {}\n", file.path));
        files.push_str(&format!("\n{}\n", wrapped));
    }
    let file_section = if files.is_empty() {
        String::new()
    } else {
        format!("\n## Updated File Contents\n\n{}\n", files)
    };

    let fresh_urls = state
        .context
        .urls
        .iter()
        .filter(|url| !seen.contains(&fingerprint(url)));
    let urls = url_list("Updated URL Contents", fresh_urls);

    format!(
        " # Project: {}\n{}{}\n{}\n\n{}",
        state.project_name, tree_section, file_section, urls, UPDATE_CLOSING
    )
}

/// Every fingerprint an update prompt would check: the tree, each wrapped
/// file and each URL.
pub fn digests(state: &ProjectState, collection: &Collection) -> BTreeSet<Digest> {
    std::iter::once(fingerprint(&collection.tree))
        .chain(collection.files.iter().map(|f| fingerprint(&f.wrapped())))
        .chain(state.context.urls.iter().map(|u| fingerprint(u)))
        .collect()
}

/// Tree followed by every file in its own labelled fence.
pub fn full_listing(collection: &Collection) -> String {
    let mut out = collection.tree.clone();
    for file in &collection.files {
        out.push_str(&format!(
            "\n\n--- {path} ---\n{}\n--- End of {path} ---",
            file.wrapped(),
            path = file.path
        ));
    }
    out
}
