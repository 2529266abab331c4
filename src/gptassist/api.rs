//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for every assistant operation, whatever front end drives it.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Owns the session**: the [`ProjectState`], the storage backend, the
//!   content collector and the clipboard sink
//! - **Collects on demand**: prompt and listing operations walk the watched
//!   directories fresh every time, so they always reflect the disk
//! - **Dispatches** to the matching `commands::*` function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no presentation logic.
//!
//! ## Generic Over StateBackend
//!
//! `AssistApi<B: StateBackend>` is generic over where saved state goes:
//! - Production: `AssistApi<FileBackend>`
//! - Testing: `AssistApi<MemBackend>`
//!
//! The clipboard is a boxed [`ClipboardSink`] so tests can capture copies
//! instead of touching the OS clipboard.

use crate::clipboard::ClipboardSink;
use crate::collect::ContentCollector;
use crate::commands::{self, prompt::Delivery, CmdResult};
use crate::error::Result;
use crate::model::ProjectState;
use crate::store::StateBackend;
use std::path::Path;

pub use crate::commands::{CmdMessage, MessageLevel};

pub struct AssistApi<B: StateBackend> {
    state: ProjectState,
    backend: B,
    collector: ContentCollector,
    clipboard: Box<dyn ClipboardSink>,
}

impl<B: StateBackend> AssistApi<B> {
    pub fn new(
        state: ProjectState,
        backend: B,
        collector: ContentCollector,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        Self {
            state,
            backend,
            collector,
            clipboard,
        }
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn set_name(&mut self, name: &str) -> Result<CmdResult> {
        Ok(commands::watch::set_name(&mut self.state, name))
    }

    pub fn add_dir(&mut self, path: &str) -> Result<CmdResult> {
        Ok(commands::watch::add_dir(&mut self.state, path))
    }

    pub fn remove_dir(&mut self, path: &str) -> Result<CmdResult> {
        Ok(commands::watch::remove_dir(&mut self.state, path))
    }

    pub fn add_ignore(&mut self, pattern: &str) -> Result<CmdResult> {
        Ok(commands::watch::add_ignore(&mut self.state, pattern))
    }

    pub fn remove_ignore(&mut self, pattern: &str) -> Result<CmdResult> {
        Ok(commands::watch::remove_ignore(&mut self.state, pattern))
    }

    pub fn add_url(&mut self, url: &str) -> Result<CmdResult> {
        Ok(commands::watch::add_url(&mut self.state, url))
    }

    pub fn remove_url(&mut self, url: &str) -> Result<CmdResult> {
        Ok(commands::watch::remove_url(&mut self.state, url))
    }

    pub fn add_extension(&mut self, ext: &str) -> Result<CmdResult> {
        Ok(commands::watch::add_extension(&mut self.state, ext))
    }

    pub fn remove_extension(&mut self, ext: &str) -> Result<CmdResult> {
        Ok(commands::watch::remove_extension(&mut self.state, ext))
    }

    pub fn status(&self) -> Result<CmdResult> {
        Ok(commands::status::run(&self.state))
    }

    pub fn print_tree(&self) -> Result<CmdResult> {
        let (tree, problems) = self.collector.tree(&self.state.context);
        Ok(commands::print::tree(tree, problems))
    }

    pub fn print_all(&self) -> Result<CmdResult> {
        let collection = self.collector.collect(&self.state.context);
        Ok(commands::print::all(&collection))
    }

    pub fn first_prompt(&self, delivery: Delivery) -> Result<CmdResult> {
        let collection = self.collector.collect(&self.state.context);
        Ok(commands::prompt::first(
            &self.state,
            &collection,
            delivery,
            self.clipboard.as_ref(),
        ))
    }

    pub fn update_prompt(&self, delivery: Delivery) -> Result<CmdResult> {
        let collection = self.collector.collect(&self.state.context);
        Ok(commands::prompt::update(
            &self.state,
            &collection,
            delivery,
            self.clipboard.as_ref(),
        ))
    }

    pub fn mark_seen(&mut self) -> Result<CmdResult> {
        let collection = self.collector.collect(&self.state.context);
        Ok(commands::prompt::mark_seen(&mut self.state, &collection))
    }

    pub fn save(&self, path: &Path) -> Result<CmdResult> {
        Ok(commands::persist::save(&self.backend, &self.state, path))
    }

    pub fn load(&mut self, path: &Path) -> Result<CmdResult> {
        Ok(commands::persist::load(&self.backend, &mut self.state, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemClipboard;
    use crate::model::Context;
    use crate::store::memory::MemBackend;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct SharedClipboard(Rc<MemClipboard>);

    impl ClipboardSink for SharedClipboard {
        fn copy(&self, text: &str) -> Result<()> {
            self.0.copy(text)
        }
    }

    fn setup() -> (TempDir, AssistApi<MemBackend>, Rc<MemClipboard>) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("proj/src")).unwrap();
        fs::write(tmp.path().join("proj/src/main.rs"), "fn main() {}").unwrap();
        fs::write(tmp.path().join("proj/notes.txt"), "todo").unwrap();

        let clip = Rc::new(MemClipboard::new());
        let api = AssistApi::new(
            ProjectState::new(Context::default()),
            MemBackend::new(),
            ContentCollector::new(tmp.path()),
            Box::new(SharedClipboard(Rc::clone(&clip))),
        );
        (tmp, api, clip)
    }

    #[test]
    fn watch_edits_reach_the_state() {
        let (_tmp, mut api, _) = setup();
        api.add_dir("proj").unwrap();
        api.add_url("https://docs.rs").unwrap();
        api.set_name("demo").unwrap();
        assert_eq!(api.state().context.allowed_dirs, vec!["proj"]);
        assert_eq!(api.state().project_name, "demo");

        let status = api.status().unwrap();
        assert_eq!(status.state.as_ref(), Some(api.state()));
    }

    #[test]
    fn prompt_reads_fresh_content() {
        let (tmp, mut api, _) = setup();
        api.add_dir("proj").unwrap();
        let text = api.first_prompt(Delivery::PRINT).unwrap().output.unwrap();
        assert!(text.contains("fn main() {}"));

        fs::write(tmp.path().join("proj/notes.txt"), "done").unwrap();
        let text = api.first_prompt(Delivery::PRINT).unwrap().output.unwrap();
        assert!(text.contains("done"));
    }

    #[test]
    fn mark_seen_narrows_the_update() {
        let (tmp, mut api, _) = setup();
        api.add_dir("proj").unwrap();
        api.mark_seen().unwrap();

        fs::write(tmp.path().join("proj/notes.txt"), "changed").unwrap();
        let text = api.update_prompt(Delivery::PRINT).unwrap().output.unwrap();
        assert!(text.contains("### Updated File: proj/notes.txt"));
        assert!(!text.contains("main.rs\n\n```"));
        assert!(!text.contains("Updated Directory Structure"));
    }

    #[test]
    fn copy_goes_to_the_sink() {
        let (_tmp, mut api, clip) = setup();
        api.add_dir("proj").unwrap();
        let r = api.update_prompt(Delivery::COPY).unwrap();
        assert!(r.output.is_none());
        assert_eq!(clip.count(), 1);
        assert!(clip.last().unwrap().contains("notes.txt"));
    }

    #[test]
    fn print_tree_does_not_need_file_contents() {
        let (_tmp, mut api, _) = setup();
        api.add_dir("proj").unwrap();
        let tree = api.print_tree().unwrap().output.unwrap();
        assert!(tree.contains("main.rs"));
        assert!(!tree.contains("fn main"));
    }

    #[test]
    fn save_and_load_through_backend() {
        let (_tmp, mut api, _) = setup();
        api.add_dir("proj").unwrap();
        api.mark_seen().unwrap();
        let saved = api.state().clone();
        assert!(!api.save(Path::new("ctx.json")).unwrap().has_errors());

        api.remove_dir("proj").unwrap();
        api.set_name("other").unwrap();
        assert!(!api.load(Path::new("ctx.json")).unwrap().has_errors());
        assert_eq!(api.state(), &saved);
    }
}
