use crate::collect::Collection;
use crate::commands::CmdResult;
use crate::prompt::full_listing;

/// Tree only; `problems` come from the same walk that built it.
pub fn tree(tree: String, problems: Vec<String>) -> CmdResult {
    let collection = Collection {
        files: Vec::new(),
        tree,
        problems,
    };
    listing_of(collection.tree.clone(), &collection)
}

pub fn all(collection: &Collection) -> CmdResult {
    listing_of(full_listing(collection), collection)
}

fn listing_of(text: String, collection: &Collection) -> CmdResult {
    CmdResult::default()
        .with_output(text)
        .with_problems(collection)
}
